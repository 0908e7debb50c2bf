//! Integration tests for microtome-core
//!
//! These tests exercise the build volume, printable meshes and the print scene
//! together through the public API.

use approx::assert_relative_eq;
use microtome_core::*;

/// Outward-wound box centred at `offset`
fn offset_box(w: f32, d: f32, h: f32, offset: Vector3f) -> TriangleMesh {
    let mut mesh = TriangleMesh::cuboid(w, d, h);
    for v in &mut mesh.vertices {
        *v += offset;
    }
    mesh
}

/// Octahedron with vertices on the axes at distance `r`
fn octahedron(r: f32) -> TriangleMesh {
    let vertices = vec![
        Point3f::new(r, 0.0, 0.0),
        Point3f::new(-r, 0.0, 0.0),
        Point3f::new(0.0, r, 0.0),
        Point3f::new(0.0, -r, 0.0),
        Point3f::new(0.0, 0.0, r),
        Point3f::new(0.0, 0.0, -r),
    ];
    let faces = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];
    TriangleMesh::from_indexed_faces(vertices, faces).unwrap()
}

#[test]
fn test_box_volume_matches_dimensions() {
    for (w, d, h) in [(1.0, 1.0, 1.0), (200.0, 150.0, 300.0), (0.5, 12.0, 3.25)] {
        let mesh = PrintableMesh::from_geometry(TriangleMesh::cuboid(w, d, h));
        assert_relative_eq!(mesh.volume(), (w * d * h) as f64, max_relative = 1e-6);
    }
}

#[test]
fn test_volume_independent_of_origin() {
    let offset = Vector3f::new(55.0, -12.0, 7.0);
    let mesh = PrintableMesh::from_geometry(offset_box(10.0, 20.0, 30.0, offset));
    assert_relative_eq!(mesh.volume(), 6000.0, max_relative = 1e-5);
}

#[test]
fn test_octahedron_volume() {
    // Volume of a regular octahedron with axis radius r is 4r³/3
    let mesh = PrintableMesh::from_geometry(octahedron(3.0));
    assert_relative_eq!(mesh.volume(), 36.0, max_relative = 1e-6);
}

#[test]
fn test_scaling_multiplies_volume_without_recomputation() {
    let buffer = TriangleMesh::cuboid(4.0, 4.0, 4.0).to_flat_vertices();
    let mut mesh = PrintableMesh::from_flat_vertices(&buffer).unwrap();
    let raw = mesh.raw_volume();

    for (a, b, c) in [(2.0, 1.0, 1.0), (0.5, 3.0, 2.0), (1.5, 1.5, 1.5)] {
        mesh.transform.scale = Vector3f::new(a, b, c);
        assert_relative_eq!(mesh.volume(), raw * (a * b * c) as f64, max_relative = 1e-6);
        assert_eq!(mesh.raw_volume(), raw);
    }
}

#[test]
fn test_build_volume_bbox_after_resize() {
    let mut scene = PrintScene::new();
    scene.print_volume_mut().resize_by_dimensions(200.0, 150.0, 300.0).unwrap();
    let bbox = scene.print_volume().bounding_box();
    assert_eq!(bbox.min, Point3f::new(-100.0, -75.0, 0.0));
    assert_eq!(bbox.max, Point3f::new(100.0, 75.0, 300.0));
}

#[test]
fn test_printer_config_drives_volume() {
    let config = PrinterConfig::default();
    let scene = PrintScene::with_volume(&config.volume).unwrap();
    assert_eq!(scene.print_volume().dimensions(), config.volume);
}

#[test]
fn test_objects_fit_inside_volume() {
    let mut scene = PrintScene::new();
    let mut mesh = PrintableMesh::from_geometry(TriangleMesh::cuboid(20.0, 20.0, 20.0));
    mesh.transform.position = Vector3f::new(0.0, 0.0, 10.0);
    let id = scene.add_object(mesh).unwrap();

    let volume_box = scene.print_volume().bounding_box();
    let object_box = scene.object(id).unwrap().world_bounding_box();
    assert!(volume_box.contains_box(&object_box));

    scene.object_mut(id).unwrap().transform.position.z = 95.0;
    assert!(!volume_box.contains_box(&scene.object(id).unwrap().world_bounding_box()));
}

#[test]
fn test_overhang_angle_flow() {
    let mut scene = PrintScene::new();
    let first = scene.add_object(PrintableMesh::from_geometry(octahedron(1.0))).unwrap();

    scene.set_overhang_angle_degrees(450.0);
    assert_relative_eq!(scene.overhang_angle(), std::f32::consts::FRAC_PI_2, epsilon = 1e-6);

    scene.set_overhang_angle_degrees(30.0);
    let second = scene.add_object(PrintableMesh::from_geometry(octahedron(2.0))).unwrap();

    let expected = 30.0_f32.to_radians().cos();
    for id in [first, second] {
        let cos = scene.object(id).unwrap().materials.overhang.cos_angle_rad;
        assert_relative_eq!(cos, expected, epsilon = 1e-6);
    }
}
