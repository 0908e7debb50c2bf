//! The print volume view: scene, camera, picking and the render loop

use microtome_core::{MeshId, PrintScene, PrintVolume, PrintableMesh, Result};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraConfig, CanvasBounds};
use crate::input::PointerAction;
use crate::lighting::{Lighting, LightingConfig};
use crate::picking::{PickOutcome, PickingConfig, PickingSession, Readouts};
use crate::renderer::{CameraNavigator, FrameHandle, FrameScheduler, RenderBackend};

/// Configuration of a [`PrinterVolumeView`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub picking: PickingConfig,
}

impl ViewerConfig {
    /// Parse from JSON; missing sections fall back to their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Interactive view of a print scene.
///
/// The view owns the scene and drives a frame loop through the scheduler:
/// each scheduled frame is delivered back through [`render_frame`], which
/// draws and schedules the next one.
///
/// [`render_frame`]: PrinterVolumeView::render_frame
pub struct PrinterVolumeView<B, S, N> {
    config: ViewerConfig,
    scene: PrintScene,
    camera: Camera,
    picking: PickingSession,
    lighting: Lighting,
    backend: B,
    scheduler: S,
    navigator: N,
    pending_frame: Option<FrameHandle>,
}

impl<B, S, N> PrinterVolumeView<B, S, N>
where
    B: RenderBackend,
    S: FrameScheduler,
    N: CameraNavigator,
{
    pub fn new(
        config: ViewerConfig,
        scene: PrintScene,
        backend: B,
        scheduler: S,
        navigator: N,
    ) -> Result<Self> {
        let lighting = Lighting::from_config(&config.lighting)?;
        let (width, height) = backend.display_size();
        let aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
        let camera = Camera::from_config(&config.camera, aspect);
        let picking = PickingSession::new(config.picking.clone());
        Ok(Self {
            config,
            scene,
            camera,
            picking,
            lighting,
            backend,
            scheduler,
            navigator,
            pending_frame: None,
        })
    }

    /// Set up the camera and navigation, then start the frame loop
    pub fn attached(&mut self) {
        self.camera.set_up(self.config.camera.up.into());
        self.camera.set_position(self.config.camera.position.into());
        self.camera.look_at(self.scene.print_volume().position());

        self.navigator.attach(&mut self.camera);
        self.navigator.set_target(self.scene.print_volume().bounding_box());
        self.navigator.frame_target(&mut self.camera);
        self.navigator.set_enabled(true);

        tracing::info!(objects = self.scene.len(), "print volume view attached");
        self.start_rendering();
    }

    /// Stop the frame loop and release navigation
    pub fn detached(&mut self) {
        self.stop_rendering();
        self.navigator.set_enabled(false);
        tracing::info!("print volume view detached");
    }

    /// Schedule the next frame, replacing any frame already scheduled
    pub fn start_rendering(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Cancel the scheduled frame. Safe to call when nothing is scheduled.
    pub fn stop_rendering(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
            tracing::debug!(?handle, "render loop stopped");
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Frame callback for a handle issued by the scheduler.
    ///
    /// Handles other than the one currently scheduled are ignored and
    /// return `Ok(false)`. A failed draw stops the loop.
    pub fn render_frame(&mut self, handle: FrameHandle) -> Result<bool> {
        if self.pending_frame != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame");
            return Ok(false);
        }
        self.pending_frame = None;

        let display = self.backend.display_size();
        if display != self.backend.buffer_size() {
            let (width, height) = display;
            self.backend.resize_buffer(width, height);
            if height > 0 {
                self.camera.set_aspect(width as f32 / height as f32);
            }
            tracing::debug!(width, height, "resized drawing buffer");
        }

        if let Err(err) = self.backend.draw(&self.scene, &self.camera, &self.lighting) {
            tracing::error!(error = %err, "draw failed, stopping render loop");
            return Err(err);
        }

        self.pending_frame = Some(self.scheduler.request_frame());
        Ok(true)
    }

    /// Route a pointer action to the picking session
    pub fn handle_pointer(&mut self, action: &PointerAction, bounds: &CanvasBounds) -> PickOutcome {
        match action {
            PointerAction::Down(event) => {
                self.picking.pointer_down(event);
                PickOutcome::Ignored
            }
            PointerAction::Move(event) => {
                self.picking.pointer_move(event);
                PickOutcome::Ignored
            }
            PointerAction::Up(event) => {
                self.picking.pointer_up(event, bounds, &self.camera, &mut self.scene)
            }
        }
    }

    pub fn add_object(&mut self, mesh: PrintableMesh) -> Option<MeshId> {
        self.scene.add_object(mesh)
    }

    pub fn add_objects<I>(&mut self, meshes: I) -> Vec<MeshId>
    where
        I: IntoIterator<Item = PrintableMesh>,
    {
        self.scene.add_objects(meshes)
    }

    /// Remove an object, dropping it from the selection if it was selected
    pub fn remove_object(&mut self, id: MeshId) -> Option<PrintableMesh> {
        let mesh = self.scene.remove_object(id)?;
        self.picking.on_object_removed(id);
        Some(mesh)
    }

    /// Mutate the scene, then reconcile the selection with whatever it holds
    pub fn edit_scene<R>(&mut self, edit: impl FnOnce(&mut PrintScene) -> R) -> R {
        let result = edit(&mut self.scene);
        self.picking.reconcile(&self.scene);
        self.picking.refresh_readouts(&self.scene);
        result
    }

    /// Resize the print volume and retarget navigation at it
    pub fn resize_print_volume(&mut self, volume: &PrintVolume) -> Result<()> {
        self.scene.print_volume_mut().resize_by_volume(volume)?;
        self.navigator.set_target(self.scene.print_volume().bounding_box());
        Ok(())
    }

    pub fn set_overhang_angle_degrees(&mut self, degrees: f32) {
        self.scene.set_overhang_angle_degrees(degrees);
    }

    pub fn set_rotation_fields(&mut self, x: Option<&str>, y: Option<&str>, z: Option<&str>) {
        self.picking.set_rotation_fields(&mut self.scene, x, y, z);
    }

    pub fn set_scale_fields(&mut self, x: Option<&str>, y: Option<&str>, z: Option<&str>) {
        self.picking.set_scale_fields(&mut self.scene, x, y, z);
    }

    pub fn set_scatter_color(&mut self, color: &str) -> Result<()> {
        self.lighting.set_scatter_color(color)
    }

    pub fn set_sky_color(&mut self, color: &str) -> Result<()> {
        self.lighting.set_sky_color(color)
    }

    pub fn set_ground_color(&mut self, color: &str) -> Result<()> {
        self.lighting.set_ground_color(color)
    }

    pub fn scene(&self) -> &PrintScene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn picking(&self) -> &PickingSession {
        &self.picking
    }

    pub fn readouts(&self) -> &Readouts {
        self.picking.readouts()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Navigator and camera together, for feeding navigation input
    pub fn navigation_mut(&mut self) -> (&mut N, &mut Camera) {
        (&mut self.navigator, &mut self.camera)
    }
}
