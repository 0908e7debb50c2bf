//! Pointer picking and selection state
//!
//! A press with the primary button arms a pick, any drag past the configured
//! threshold cancels it (so orbiting the camera never selects anything), and
//! the release resolves the pick by casting a ray from the camera into the
//! scene. At most one print object carries the selection highlight.

use microtome_core::{Intersection, MeshId, PrintScene, PrintableMesh};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::camera::{ndc_from_pixels, CanvasBounds, Camera};

/// Bitmask value of the primary (left) button
pub const PRIMARY_BUTTON: u16 = 1;

/// A pointer event in canvas-relative pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    /// Bitmask of buttons held during the event (1 primary, 2 secondary, 4 middle)
    pub buttons: u16,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, buttons: u16) -> Self {
        Self { x, y, buttons }
    }
}

/// Tuning for the pick gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickingConfig {
    /// Exact button mask that arms a pick on press
    pub primary_buttons: u16,
    /// Pointer travel, in pixels, that cancels an armed pick. Zero cancels on
    /// any movement.
    pub drag_threshold_px: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            primary_buttons: PRIMARY_BUTTON,
            drag_threshold_px: 0.0,
        }
    }
}

/// Phase of the pick gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    /// No gesture in progress and no pick resolved yet
    Idle,
    /// Pressed, waiting for release
    Armed,
    /// Last pick missed, or the selection was cleared
    SelectedNone,
    /// Last pick hit this object
    SelectedMesh(MeshId),
}

/// Result of a pointer release
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    /// No pick was armed
    Ignored,
    /// The nearest object under the pointer was selected
    Hit(Intersection),
    /// Nothing under the pointer; the selection was cleared
    Miss,
}

/// Human-readable transform of the selection.
///
/// Rotation in whole degrees within (-360, 360) with no negative zero, scale
/// with two decimals.
/// Every field is None while nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readouts {
    pub rot_x: Option<String>,
    pub rot_y: Option<String>,
    pub rot_z: Option<String>,
    pub scale_x: Option<String>,
    pub scale_y: Option<String>,
    pub scale_z: Option<String>,
}

impl Readouts {
    fn from_mesh(mesh: &PrintableMesh) -> Self {
        let rotation = mesh.transform.rotation;
        let scale = mesh.transform.scale;
        // Round before reducing so 359.6 reads "0" rather than "360"
        let degrees = |rad: f32| format!("{}", rad.to_degrees().round() % 360.0 + 0.0);
        let factor = |s: f32| format!("{:.2}", s);
        Self {
            rot_x: Some(degrees(rotation.x)),
            rot_y: Some(degrees(rotation.y)),
            rot_z: Some(degrees(rotation.z)),
            scale_x: Some(factor(scale.x)),
            scale_y: Some(factor(scale.y)),
            scale_z: Some(factor(scale.z)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Pointer-driven selection of print objects
#[derive(Debug, Clone)]
pub struct PickingSession {
    config: PickingConfig,
    pointer_ndc: Point2<f32>,
    press_position: Option<(f32, f32)>,
    state: PickState,
    selected: Option<MeshId>,
    readouts: Readouts,
}

impl PickingSession {
    pub fn new(config: PickingConfig) -> Self {
        Self {
            config,
            pointer_ndc: Point2::origin(),
            press_position: None,
            state: PickState::Idle,
            selected: None,
            readouts: Readouts::default(),
        }
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == PickState::Armed
    }

    /// Currently selected object
    pub fn selected(&self) -> Option<MeshId> {
        self.selected
    }

    pub fn readouts(&self) -> &Readouts {
        &self.readouts
    }

    /// Normalized device coordinates of the last resolved pick
    pub fn pointer_ndc(&self) -> Point2<f32> {
        self.pointer_ndc
    }

    /// Arm a pick when exactly the primary button is down
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        if event.buttons == self.config.primary_buttons {
            self.state = PickState::Armed;
            self.press_position = Some((event.x, event.y));
            tracing::trace!(x = event.x, y = event.y, "pick armed");
        }
    }

    /// Cancel an armed pick once the pointer has travelled far enough
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if self.state != PickState::Armed {
            return;
        }
        let travelled = self
            .press_position
            .map(|(x, y)| (event.x - x).hypot(event.y - y))
            .unwrap_or(f32::INFINITY);
        if travelled >= self.config.drag_threshold_px {
            self.state = PickState::Idle;
            self.press_position = None;
            tracing::trace!(travelled, "pick cancelled by drag");
        }
    }

    /// Resolve an armed pick against the scene's print objects
    pub fn pointer_up(
        &mut self,
        event: &PointerEvent,
        bounds: &CanvasBounds,
        camera: &Camera,
        scene: &mut PrintScene,
    ) -> PickOutcome {
        if self.state != PickState::Armed {
            return PickOutcome::Ignored;
        }
        self.press_position = None;
        self.pointer_ndc = ndc_from_pixels(event.x, event.y, bounds);

        let nearest = camera
            .ray_from_ndc(&self.pointer_ndc)
            .and_then(|ray| scene.raycast(&ray).into_iter().next());

        match nearest {
            Some(hit) => {
                self.select(hit.object, scene);
                tracing::debug!(object = %hit.object, distance = hit.distance, "pick hit");
                PickOutcome::Hit(hit)
            }
            None => {
                self.clear_selection(scene);
                tracing::debug!(ndc = ?self.pointer_ndc, "pick missed");
                PickOutcome::Miss
            }
        }
    }

    /// Select an object, restoring the previous selection's materials first.
    ///
    /// Returns false, leaving the selection untouched, if the object is not in
    /// the scene.
    pub fn select(&mut self, id: MeshId, scene: &mut PrintScene) -> bool {
        if !scene.contains(id) {
            return false;
        }
        self.unhighlight(scene);
        if let Some(mesh) = scene.object_mut(id) {
            mesh.set_selected(true);
        }
        self.selected = Some(id);
        self.state = PickState::SelectedMesh(id);
        self.refresh_readouts(scene);
        true
    }

    /// Drop the selection and restore its materials
    pub fn clear_selection(&mut self, scene: &mut PrintScene) {
        self.unhighlight(scene);
        self.readouts = Readouts::default();
        self.state = PickState::SelectedNone;
    }

    fn unhighlight(&mut self, scene: &mut PrintScene) {
        if let Some(previous) = self.selected.take() {
            if let Some(mesh) = scene.object_mut(previous) {
                mesh.set_selected(false);
            }
        }
    }

    /// Forget the selection if it refers to an object that left the scene
    pub fn on_object_removed(&mut self, id: MeshId) {
        if self.selected == Some(id) {
            self.selected = None;
            self.readouts = Readouts::default();
            self.state = PickState::SelectedNone;
            tracing::debug!(%id, "selected object removed");
        }
    }

    /// Drop a selection that no longer exists in the scene
    pub fn reconcile(&mut self, scene: &PrintScene) {
        if let Some(id) = self.selected {
            if !scene.contains(id) {
                self.on_object_removed(id);
            }
        }
    }

    /// Re-derive the readouts from the selected object's transform
    pub fn refresh_readouts(&mut self, scene: &PrintScene) {
        self.readouts = self
            .selected
            .and_then(|id| scene.object(id))
            .map(Readouts::from_mesh)
            .unwrap_or_default();
    }

    /// Apply edited rotation fields (degrees) to the selection.
    ///
    /// Empty or unparsable fields leave their axis unchanged. Does nothing
    /// without a selection.
    pub fn set_rotation_fields(
        &mut self,
        scene: &mut PrintScene,
        x: Option<&str>,
        y: Option<&str>,
        z: Option<&str>,
    ) {
        let Some(mesh) = self.selected.and_then(|id| scene.object_mut(id)) else {
            return;
        };
        let rotation = &mut mesh.transform.rotation;
        for (axis, field) in [(0, x), (1, y), (2, z)] {
            if let Some(degrees) = parse_field(field) {
                rotation[axis] = degrees.to_radians();
            }
        }
        self.refresh_readouts(scene);
    }

    /// Apply edited scale fields to the selection.
    ///
    /// Empty or unparsable fields leave their axis unchanged. Does nothing
    /// without a selection.
    pub fn set_scale_fields(
        &mut self,
        scene: &mut PrintScene,
        x: Option<&str>,
        y: Option<&str>,
        z: Option<&str>,
    ) {
        let Some(mesh) = self.selected.and_then(|id| scene.object_mut(id)) else {
            return;
        };
        let scale = &mut mesh.transform.scale;
        for (axis, field) in [(0, x), (1, y), (2, z)] {
            if let Some(factor) = parse_field(field) {
                scale[axis] = factor;
            }
        }
        self.refresh_readouts(scene);
    }
}

impl Default for PickingSession {
    fn default() -> Self {
        Self::new(PickingConfig::default())
    }
}

fn parse_field(field: Option<&str>) -> Option<f32> {
    let text = field?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f32>().ok().filter(|v| v.is_finite())
}
