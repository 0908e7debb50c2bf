//! Headless walk-through of the print volume view
//!
//! This demo:
//! - Loads a printer configuration (JSON path as the first argument, or the defaults)
//! - Places a few objects in the build volume and reports their volumes
//! - Runs the frame loop against a backend that logs instead of drawing
//! - Picks objects with synthetic mouse input and edits the selection
//!
//! Set `RUST_LOG=debug` to see the view's own logging.

use std::collections::VecDeque;

use anyhow::Context;
use microtome_core::{format_volume, PrintScene, PrintableMesh, PrinterConfig, Result, TriangleMesh};
use microtome_visualization::shaders::{base_color, shader_for, OverhangUniform};
use microtome_visualization::*;
use nalgebra::{Point3, Vector3};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};

/// Backend that logs what a real renderer would draw
struct LoggingBackend {
    size: (u32, u32),
    buffer: (u32, u32),
    frames: u64,
}

impl RenderBackend for LoggingBackend {
    fn display_size(&self) -> (u32, u32) {
        self.size
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.buffer
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        self.buffer = (width, height);
    }

    fn draw(&mut self, scene: &PrintScene, camera: &Camera, lighting: &Lighting) -> Result<()> {
        self.frames += 1;
        tracing::info!(
            frame = self.frames,
            guide_lines = scene.print_volume().guide_lines().len(),
            eye = ?camera.position,
            sky = ?lighting.sky.color,
            "drawing print volume"
        );
        if !scene.objects_visible() {
            return Ok(());
        }
        for object in scene.print_objects() {
            for kind in object.materials.layers() {
                let shader = shader_for(kind);
                match base_color(kind) {
                    Some(color) => tracing::info!(
                        id = %object.id(),
                        ?kind,
                        ?color,
                        shader_bytes = shader.fragment.len(),
                        "  layer"
                    ),
                    None => tracing::info!(
                        id = %object.id(),
                        ?kind,
                        cos_angle = OverhangUniform::from(&object.materials.overhang).cos_angle_rad,
                        "  layer"
                    ),
                }
            }
        }
        Ok(())
    }
}

/// Scheduler whose frames fire when the demo pumps them
#[derive(Default)]
struct QueueScheduler {
    next: u64,
    queue: VecDeque<FrameHandle>,
}

impl FrameScheduler for QueueScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.queue.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.retain(|h| *h != handle);
    }
}

type DemoView = PrinterVolumeView<LoggingBackend, QueueScheduler, OrbitNavigator>;

fn pump_frames(view: &mut DemoView, frames: usize) -> anyhow::Result<()> {
    for _ in 0..frames {
        // Frames are delivered in the order they were requested
        let next = view.scheduler().queue.front().copied();
        let Some(handle) = next else {
            break;
        };
        view.render_frame(handle)?;
    }
    Ok(())
}

/// Left click at a canvas pixel, fed through the winit adapter
fn click(
    view: &mut DemoView,
    input: &mut PointerInput,
    bounds: &CanvasBounds,
    x: f64,
    y: f64,
) -> PickOutcome {
    let actions = [
        input.cursor_moved(PhysicalPosition::new(x, y)),
        input.mouse_input(ElementState::Pressed, MouseButton::Left),
        input.mouse_input(ElementState::Released, MouseButton::Left),
    ];
    let mut outcome = PickOutcome::Ignored;
    for action in &actions {
        outcome = view.handle_pointer(action, bounds);
    }
    outcome
}

fn pixel_of(view: &DemoView, bounds: &CanvasBounds, point: Point3<f32>) -> (f64, f64) {
    let ndc = view.camera().view_projection().transform_point(&point);
    (
        ((ndc.x + 1.0) / 2.0 * bounds.width) as f64,
        ((1.0 - ndc.y) / 2.0 * bounds.height) as f64,
    )
}

fn main() -> anyhow::Result<()> {
    let default_filter = "print_volume_walkthrough=info,microtome_visualization=info";
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    println!("microtome print volume walk-through");
    println!("===================================");

    let printer = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading printer config {}", path))?;
            PrinterConfig::from_json_str(&json)
                .with_context(|| format!("parsing printer config {}", path))?
        }
        None => PrinterConfig::default(),
    };
    println!(
        "Printer '{}' ({}): {} x {} x {} mm",
        printer.name,
        printer.description,
        printer.volume.width_mm,
        printer.volume.depth_mm,
        printer.volume.height_mm
    );

    let scene = PrintScene::with_volume(&printer.volume)?;
    let backend = LoggingBackend {
        size: (1280, 720),
        buffer: (0, 0),
        frames: 0,
    };
    let mut view = PrinterVolumeView::new(
        ViewerConfig::default(),
        scene,
        backend,
        QueueScheduler::default(),
        OrbitNavigator::new(),
    )?;

    // Objects
    let mut block = PrintableMesh::from_geometry(TriangleMesh::cuboid(30.0, 20.0, 10.0));
    block.transform.position = Vector3::new(-25.0, 0.0, 5.0);
    let buffer = TriangleMesh::cuboid(10.0, 10.0, 40.0).to_flat_vertices();
    let mut tower = PrintableMesh::from_flat_vertices(&buffer)?;
    tower.transform.position = Vector3::new(25.0, 0.0, 20.0);
    let ids = view.add_objects([block, tower]);

    println!("\nObjects:");
    for object in view.scene().print_objects() {
        println!("- {}: {} cm³", object.id(), format_volume(object.volume()));
    }
    println!("Total: {} cm³", format_volume(view.scene().total_volume()));

    view.set_overhang_angle_degrees(45.0);
    view.attached();
    pump_frames(&mut view, 2)?;
    println!(
        "\nCamera framed at {:?}, aspect {:.3}",
        view.camera().position,
        view.camera().aspect_ratio
    );

    // Picking
    let bounds = CanvasBounds::new(1280.0, 720.0);
    let mut input = PointerInput::new();
    let tower_center = Point3::new(25.0, 0.0, 20.0);
    let (x, y) = pixel_of(&view, &bounds, tower_center);
    match click(&mut view, &mut input, &bounds, x, y) {
        PickOutcome::Hit(hit) => {
            println!("\nPicked {} at distance {:.1}", hit.object, hit.distance)
        }
        other => println!("\nPick at tower centre gave {:?}", other),
    }

    view.set_scale_fields(Some("1.5"), Some("1.5"), None);
    view.set_rotation_fields(None, None, Some("30"));
    let readouts = view.readouts().clone();
    println!(
        "Readouts: rot ({:?}, {:?}, {:?}) scale ({:?}, {:?}, {:?})",
        readouts.rot_x,
        readouts.rot_y,
        readouts.rot_z,
        readouts.scale_x,
        readouts.scale_y,
        readouts.scale_z
    );
    if let Some(selected) = view.picking().selected().and_then(|id| view.scene().object(id)) {
        println!("Selected volume now {} cm³", format_volume(selected.volume()));
    }

    let outcome = click(&mut view, &mut input, &bounds, 5.0, 5.0);
    println!("Click in the corner: {:?}, state {:?}", outcome, view.picking().state());

    // Orbit a little and draw again
    {
        let (navigator, camera) = view.navigation_mut();
        let press = input.mouse_input(ElementState::Pressed, MouseButton::Left);
        navigator.handle_pointer(&press, camera);
        navigator.handle_pointer(&input.cursor_moved(PhysicalPosition::new(60.0, 5.0)), camera);
        let release = input.mouse_input(ElementState::Released, MouseButton::Left);
        navigator.handle_pointer(&release, camera);
        navigator.scroll(2.0, camera);
    }
    pump_frames(&mut view, 1)?;

    if let Some(removed) = view.remove_object(ids[0]) {
        println!("\nRemoved {}, {} object(s) left", removed.id(), view.scene().len());
    }

    view.detached();
    println!("Rendered {} frame(s), rendering: {}", view.backend().frames, view.is_rendering());
    Ok(())
}
