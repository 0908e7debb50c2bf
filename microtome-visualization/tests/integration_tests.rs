//! Integration tests for microtome-visualization
//!
//! These drive a full PrinterVolumeView through recording backend,
//! scheduler and navigator implementations.

use approx::assert_relative_eq;
use microtome_core::{
    BoundingBox, Error, Point3f, PrintScene, PrintVolume, PrintableMesh, Result, TriangleMesh,
    Vector3f,
};
use microtome_visualization::*;

#[derive(Debug, Default)]
struct RecordingBackend {
    display: (u32, u32),
    buffer: (u32, u32),
    draws: usize,
    fail: bool,
}

impl RenderBackend for RecordingBackend {
    fn display_size(&self) -> (u32, u32) {
        self.display
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.buffer
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        self.buffer = (width, height);
    }

    fn draw(&mut self, _scene: &PrintScene, _camera: &Camera, _lighting: &Lighting) -> Result<()> {
        if self.fail {
            return Err(Error::Visualization("surface lost".to_string()));
        }
        self.draws += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ManualScheduler {
    next: u64,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}

#[derive(Debug, Default)]
struct RecordingNavigator {
    calls: Vec<&'static str>,
    target: Option<BoundingBox>,
    enabled: bool,
}

impl CameraNavigator for RecordingNavigator {
    fn attach(&mut self, _camera: &mut Camera) {
        self.calls.push("attach");
    }

    fn set_target(&mut self, target: BoundingBox) {
        self.calls.push("set_target");
        self.target = Some(target);
    }

    fn frame_target(&mut self, _camera: &mut Camera) {
        self.calls.push("frame_target");
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.calls.push("set_enabled");
        self.enabled = enabled;
    }
}

type TestView = PrinterVolumeView<RecordingBackend, ManualScheduler, RecordingNavigator>;

const BOUNDS: CanvasBounds = CanvasBounds {
    width: 800.0,
    height: 600.0,
};

fn view() -> TestView {
    let backend = RecordingBackend {
        display: (800, 600),
        buffer: (800, 600),
        ..RecordingBackend::default()
    };
    let mut view = PrinterVolumeView::new(
        ViewerConfig::default(),
        PrintScene::new(),
        backend,
        ManualScheduler::default(),
        RecordingNavigator::default(),
    )
    .unwrap();
    view.attached();
    view
}

fn cube_at(size: f32, position: Vector3f) -> PrintableMesh {
    let mut mesh = PrintableMesh::from_geometry(TriangleMesh::cuboid(size, size, size));
    mesh.transform.position = position;
    mesh
}

/// Canvas pixel a world point projects to
fn pixel_of(view: &TestView, point: Point3f) -> (f32, f32) {
    let ndc = view.camera().view_projection().transform_point(&point);
    ((ndc.x + 1.0) / 2.0 * BOUNDS.width, (1.0 - ndc.y) / 2.0 * BOUNDS.height)
}

fn click(view: &mut TestView, x: f32, y: f32) -> PickOutcome {
    view.handle_pointer(&PointerAction::Down(PointerEvent::new(x, y, 1)), &BOUNDS);
    view.handle_pointer(&PointerAction::Up(PointerEvent::new(x, y, 0)), &BOUNDS)
}

fn highlighted(view: &TestView) -> usize {
    view.scene().print_objects().iter().filter(|o| o.is_selected()).count()
}

#[test]
fn test_attached_configures_camera_and_navigator() {
    let view = view();
    assert_eq!(view.camera().up, Vector3f::z());
    assert_eq!(view.camera().position, Point3f::new(0.0, 350.0, 250.0));
    assert_eq!(view.camera().target, Point3f::origin());
    assert_eq!(view.navigator().calls, ["attach", "set_target", "frame_target", "set_enabled"]);
    assert_eq!(view.navigator().target, Some(view.scene().print_volume().bounding_box()));
    assert!(view.navigator().enabled);
    assert!(view.is_rendering());
    assert_eq!(view.scheduler().pending.len(), 1);
}

#[test]
fn test_pick_at_center_selects_mesh() {
    let mut view = view();
    let id = view.add_object(cube_at(40.0, Vector3f::zeros())).unwrap();

    match click(&mut view, 400.0, 300.0) {
        PickOutcome::Hit(hit) => assert_eq!(hit.object, id),
        other => panic!("expected a hit, got {:?}", other),
    }
    assert_eq!(view.picking().state(), PickState::SelectedMesh(id));
    assert_eq!(view.readouts().rot_x.as_deref(), Some("0"));
    assert_eq!(view.readouts().scale_z.as_deref(), Some("1.00"));

    assert_eq!(click(&mut view, 5.0, 5.0), PickOutcome::Miss);
    assert_eq!(view.picking().state(), PickState::SelectedNone);
    assert_eq!(highlighted(&view), 0);
    assert!(view.readouts().is_empty());
}

#[test]
fn test_nearest_of_overlapping_meshes_wins() {
    let mut view = view();
    // Both on the line of sight; the one nearer the camera sits towards +Y
    let far = view.add_object(cube_at(20.0, Vector3f::zeros())).unwrap();
    let near = view.add_object(cube_at(20.0, Vector3f::new(0.0, 70.0, 50.0))).unwrap();

    let (x, y) = pixel_of(&view, Point3f::new(0.0, 70.0, 50.0));
    match click(&mut view, x, y) {
        PickOutcome::Hit(hit) => assert_eq!(hit.object, near),
        other => panic!("expected a hit, got {:?}", other),
    }
    assert!(!view.scene().object(far).unwrap().is_selected());
}

#[test]
fn test_selecting_b_after_a_keeps_one_highlight() {
    let mut view = view();
    let a = view.add_object(cube_at(30.0, Vector3f::new(-60.0, 0.0, 0.0))).unwrap();
    let b = view.add_object(cube_at(30.0, Vector3f::new(60.0, 0.0, 0.0))).unwrap();
    let pa = pixel_of(&view, Point3f::new(-60.0, 0.0, 0.0));
    let pb = pixel_of(&view, Point3f::new(60.0, 0.0, 0.0));

    for (pixel, id) in [(pa, a), (pb, b), (pa, a)] {
        click(&mut view, pixel.0, pixel.1);
        assert_eq!(view.picking().selected(), Some(id));
        assert_eq!(highlighted(&view), 1);
        assert!(view.scene().object(id).unwrap().is_selected());
    }
}

#[test]
fn test_drag_does_not_pick() {
    let mut view = view();
    view.add_object(cube_at(40.0, Vector3f::zeros())).unwrap();

    view.handle_pointer(&PointerAction::Down(PointerEvent::new(400.0, 300.0, 1)), &BOUNDS);
    view.handle_pointer(&PointerAction::Move(PointerEvent::new(420.0, 300.0, 1)), &BOUNDS);
    let release = PointerAction::Up(PointerEvent::new(400.0, 300.0, 0));
    let outcome = view.handle_pointer(&release, &BOUNDS);
    assert_eq!(outcome, PickOutcome::Ignored);
    assert_eq!(highlighted(&view), 0);
}

#[test]
fn test_secondary_button_does_not_pick() {
    let mut view = view();
    view.add_object(cube_at(40.0, Vector3f::zeros())).unwrap();
    view.handle_pointer(&PointerAction::Down(PointerEvent::new(400.0, 300.0, 2)), &BOUNDS);
    let release = PointerAction::Up(PointerEvent::new(400.0, 300.0, 0));
    let outcome = view.handle_pointer(&release, &BOUNDS);
    assert_eq!(outcome, PickOutcome::Ignored);
}

#[test]
fn test_hidden_objects_are_not_pickable() {
    let mut view = view();
    view.add_object(cube_at(40.0, Vector3f::zeros())).unwrap();
    view.edit_scene(|scene| scene.hide_objects());
    assert_eq!(click(&mut view, 400.0, 300.0), PickOutcome::Miss);
}

#[test]
fn test_removing_selected_mesh_clears_readouts() {
    let mut view = view();
    let id = view.add_object(cube_at(40.0, Vector3f::zeros())).unwrap();
    let other = view.add_object(cube_at(10.0, Vector3f::new(80.0, 0.0, 0.0))).unwrap();
    click(&mut view, 400.0, 300.0);
    assert!(!view.readouts().is_empty());

    let removed = view.remove_object(id).unwrap();
    assert!(!removed.is_selected());
    assert_eq!(view.picking().selected(), None);
    assert_eq!(view.picking().state(), PickState::SelectedNone);
    assert!(view.readouts().is_empty());
    assert!(view.scene().contains(other));
    assert!(view.remove_object(id).is_none());
}

#[test]
fn test_edit_scene_reconciles_selection() {
    let mut view = view();
    view.add_object(cube_at(40.0, Vector3f::zeros())).unwrap();
    click(&mut view, 400.0, 300.0);

    let cleared = view.edit_scene(|scene| scene.clear_objects());
    assert_eq!(cleared.len(), 1);
    assert!(!cleared[0].is_selected());
    assert_eq!(view.picking().selected(), None);
    assert!(view.readouts().is_empty());
}

#[test]
fn test_mesh_removed_through_edit_scene_loses_highlight() {
    let mut view = view();
    let a = view.add_object(cube_at(30.0, Vector3f::new(-60.0, 0.0, 0.0))).unwrap();
    let b = view.add_object(cube_at(30.0, Vector3f::new(60.0, 0.0, 0.0))).unwrap();
    let (x, y) = pixel_of(&view, Point3f::new(-60.0, 0.0, 0.0));
    click(&mut view, x, y);
    assert_eq!(view.picking().selected(), Some(a));

    let mut mesh = view.edit_scene(|scene| scene.remove_object(a)).unwrap();
    assert!(!mesh.is_selected());
    assert_eq!(view.picking().selected(), None);

    mesh.transform.position = Vector3f::new(-60.0, 0.0, 40.0);
    assert_eq!(view.add_object(mesh), Some(a));
    assert_eq!(highlighted(&view), 0);

    let (x, y) = pixel_of(&view, Point3f::new(60.0, 0.0, 0.0));
    click(&mut view, x, y);
    assert_eq!(view.picking().selected(), Some(b));
    assert_eq!(highlighted(&view), 1);
    assert!(!view.scene().object(a).unwrap().is_selected());
}

#[test]
fn test_readout_edits_apply_to_selection() {
    let mut view = view();
    let id = view.add_object(cube_at(10.0, Vector3f::zeros())).unwrap();
    click(&mut view, 400.0, 300.0);

    view.set_scale_fields(Some("2"), None, Some("x"));
    view.set_rotation_fields(Some("-90"), None, None);

    let transform = view.scene().object(id).unwrap().transform;
    assert_eq!(transform.scale, Vector3f::new(2.0, 1.0, 1.0));
    assert_relative_eq!(transform.rotation.x, -std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
    assert_eq!(view.readouts().rot_x.as_deref(), Some("-90"));
    assert_relative_eq!(view.scene().object(id).unwrap().volume(), 2000.0, max_relative = 1e-5);
}

#[test]
fn test_render_loop_reschedules_and_ignores_stale_handles() {
    let mut view = view();
    let first = view.scheduler().pending[0];

    assert!(view.render_frame(first).unwrap());
    assert_eq!(view.backend().draws, 1);
    let second = *view.scheduler().pending.last().unwrap();
    assert_ne!(first, second);

    // The handle that already fired is stale
    assert!(!view.render_frame(first).unwrap());
    assert_eq!(view.backend().draws, 1);

    // Restarting replaces the scheduled frame
    view.start_rendering();
    assert!(view.scheduler().cancelled.contains(&second));
    assert!(!view.render_frame(second).unwrap());
}

#[test]
fn test_stop_rendering_is_idempotent() {
    let mut view = view();
    let handle = view.scheduler().pending[0];

    view.stop_rendering();
    view.stop_rendering();
    view.detached();
    assert!(!view.is_rendering());
    assert!(view.scheduler().pending.is_empty());
    assert_eq!(view.scheduler().cancelled, [handle]);
    assert!(!view.navigator().enabled);

    // A callback already in flight does nothing once stopped
    assert!(!view.render_frame(handle).unwrap());
    assert_eq!(view.backend().draws, 0);
}

#[test]
fn test_resize_updates_buffer_and_aspect() {
    let mut view = view();
    view.backend_mut().display = (1000, 500);
    let handle = view.scheduler().pending[0];
    view.render_frame(handle).unwrap();

    assert_eq!(view.backend().buffer, (1000, 500));
    assert_relative_eq!(view.camera().aspect_ratio, 2.0);

    // Collapsed surface resizes the buffer but keeps the aspect
    view.backend_mut().display = (300, 0);
    let handle = *view.scheduler().pending.last().unwrap();
    view.render_frame(handle).unwrap();
    assert_eq!(view.backend().buffer, (300, 0));
    assert_relative_eq!(view.camera().aspect_ratio, 2.0);
}

#[test]
fn test_failed_draw_stops_loop() {
    let mut view = view();
    view.backend_mut().fail = true;
    let handle = view.scheduler().pending[0];
    assert!(view.render_frame(handle).is_err());
    assert!(!view.is_rendering());
}

#[test]
fn test_overhang_angle_reaches_late_objects() {
    let mut view = view();
    let early = view.add_object(cube_at(10.0, Vector3f::zeros())).unwrap();
    view.set_overhang_angle_degrees(45.0);
    let late = view.add_object(cube_at(10.0, Vector3f::new(30.0, 0.0, 0.0))).unwrap();

    let expected = 45.0_f32.to_radians().cos();
    for id in [early, late] {
        let cos = view.scene().object(id).unwrap().materials.overhang.cos_angle_rad;
        assert_relative_eq!(cos, expected, epsilon = 1e-6);
    }
}

#[test]
fn test_resize_print_volume_retargets_navigation() {
    let mut view = view();
    view.resize_print_volume(&PrintVolume::new(200.0, 150.0, 300.0)).unwrap();
    let target = view.navigator().target.unwrap();
    assert_eq!(target.max, Point3f::new(100.0, 75.0, 300.0));

    assert!(view.resize_print_volume(&PrintVolume::new(-1.0, 10.0, 10.0)).is_err());
    assert_eq!(view.scene().print_volume().width(), 200.0);
}

#[test]
fn test_lighting_setters_validate() {
    let mut view = view();
    view.set_sky_color("#FFFFFF").unwrap();
    assert_eq!(view.lighting().sky.color, [1.0, 1.0, 1.0]);
    assert!(view.set_ground_color("brown").is_err());
    assert!(view.set_scatter_color("#000000").is_ok());
}

#[test]
fn test_invalid_lighting_config_is_rejected() {
    let mut config = ViewerConfig::default();
    config.lighting.sky_color = "sky".to_string();
    let result = PrinterVolumeView::new(
        config,
        PrintScene::new(),
        RecordingBackend::default(),
        ManualScheduler::default(),
        RecordingNavigator::default(),
    );
    assert!(result.is_err());
}
