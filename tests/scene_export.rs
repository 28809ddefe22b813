use std::fs;

use digiscene::export::{ExportEngine, RecordingSink};
use digiscene::gfx::scene::{Line, Linel, Point, Pointel, Quad, Surfel, Voxel};
use digiscene::prelude::*;
use rand::Rng;

fn red_voxel_scene() -> SceneStore {
    let mut scene = SceneStore::default();
    scene
        .send(Command::AddNewListOf {
            kind: PrimitiveKind::Voxel,
            depth_test: true,
        })
        .unwrap()
        .send(Color::rgb(255, 0, 0))
        .unwrap();
    scene.add_voxel(Point3::new(0.0, 0.0, 0.0)).unwrap();
    scene
}

fn marker(kind: PrimitiveKind, i: usize) -> Primitive {
    let p = Point3::new(i as f64, 0.0, 0.0);
    let q = Point3::new(i as f64, 1.0, 0.0);
    let corners = [p, q, Point3::new(i as f64, 1.0, 1.0), Point3::new(i as f64, 0.0, 1.0)];
    let color = Color::BLACK;
    match kind {
        PrimitiveKind::Voxel => Voxel { center: p, half_width: 0.5, color }.into(),
        PrimitiveKind::Line => Line { from: p, to: q, width: 1.0, color }.into(),
        PrimitiveKind::Point => Point { center: p, size: 2.0, color }.into(),
        PrimitiveKind::Quad => Quad { corners, color }.into(),
        PrimitiveKind::Surfel => Surfel { corners, color }.into(),
        PrimitiveKind::Pointel => Pointel { center: p, radius: 0.1, color }.into(),
        PrimitiveKind::Linel => Linel { from: p, to: q, width: 0.1, color }.into(),
    }
}

#[test]
fn test_randomized_appends_keep_count_and_order() {
    let mut rng = rand::rng();
    let mut scene = SceneStore::default();
    for kind in PrimitiveKind::ALL {
        scene.open_list(kind, rng.random_range(0..2) == 1);
    }

    let count = rng.random_range(20..200);
    let mut expected: Vec<Vec<usize>> = vec![Vec::new(); PrimitiveKind::ALL.len()];
    for i in 0..count {
        let slot = rng.random_range(0..PrimitiveKind::ALL.len());
        scene.append(marker(PrimitiveKind::ALL[slot], i)).unwrap();
        expected[slot].push(i);
    }

    assert_eq!(scene.primitive_count(), count);
    for (slot, kind) in PrimitiveKind::ALL.iter().enumerate() {
        let list = scene.current_list(*kind).unwrap();
        let order: Vec<usize> = list
            .primitives()
            .iter()
            .map(|primitive| {
                let points = primitive.extent_points();
                let mean_x = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;
                mean_x.round() as usize
            })
            .collect();
        assert_eq!(order, expected[slot], "order of {} list", kind);
    }
}

#[test]
fn test_append_without_list_fails_and_changes_nothing() {
    let mut scene = SceneStore::default();
    scene.open_list(PrimitiveKind::Voxel, true);
    let err = scene.add_linel(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
    assert_eq!(err, Err(SceneError::NoActiveList(PrimitiveKind::Linel)));
    assert_eq!(scene.primitive_count(), 0);
    assert_eq!(scene.lists().len(), 1);

    scene.send(Command::UpdateDisplay).unwrap();
    assert!(scene.add_voxel(Point3::new(0.0, 0.0, 0.0)).is_err());
}

#[test]
fn test_red_voxel_svg_has_one_red_shape() {
    let scene = red_voxel_scene();
    let svg = String::from_utf8(scene.render_to_bytes(ExportFormat::Svg, 100, 100).unwrap()).unwrap();

    assert_eq!(svg.matches("fill=\"rgb(255,0,0)\"").count(), 1);
    assert_eq!(svg.matches("<polygon").count(), 1);
    let again = scene.render_to_bytes(ExportFormat::Svg, 100, 100).unwrap();
    assert_eq!(svg.as_bytes(), again.as_slice());
}

#[test]
fn test_overlapping_quads_draw_farther_first() {
    let square = |z: f64| {
        [
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ]
    };
    let mut scene = SceneStore::default();
    scene
        .send(Command::AddNewListOf {
            kind: PrimitiveKind::Quad,
            depth_test: true,
        })
        .unwrap()
        .send(Color::rgb(0, 0, 255))
        .unwrap();
    scene.add_quad(square(1.0)).unwrap();
    scene.send(Color::rgb(0, 255, 0)).unwrap();
    scene.add_quad(square(-1.0)).unwrap();

    let mut sink = RecordingSink::new();
    ExportEngine::new(&scene).render(&mut sink, 200, 200).unwrap();
    let colors: Vec<Color> = sink.calls.iter().map(|call| call.color()).collect();
    assert_eq!(colors, vec![Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)]);
}

#[test]
fn test_sixth_clipping_plane_is_rejected() {
    let mut scene = SceneStore::default();
    for i in 0..5i32 {
        scene
            .send(&ClippingPlaneModifier::new(1.0, 0.0, 0.0, f64::from(i), false))
            .unwrap();
    }
    let err = scene.send(&ClippingPlaneModifier::new(0.0, 1.0, 0.0, 0.0, false)).err();
    assert_eq!(err, Some(SceneError::ClippingPlaneCapacity { max: 5 }));
    assert_eq!(scene.clipping_planes().len(), 5);
}

#[test]
fn test_custom_style_recolors_export() {
    let mut scene = red_voxel_scene();
    let style: std::rc::Rc<dyn Style> =
        std::rc::Rc::new(CustomColors::new(Color::BLACK, Color::rgb(0, 128, 0)));
    scene.send(&CustomStyle::new("Voxel", style)).unwrap();

    let svg = String::from_utf8(scene.render_to_bytes(ExportFormat::Svg, 100, 100).unwrap()).unwrap();
    assert!(svg.contains("fill=\"rgb(0,128,0)\""));
    assert!(!svg.contains("fill=\"rgb(255,0,0)\""));
}

#[test]
fn test_unknown_format_is_unsupported() {
    assert!(matches!(
        ExportFormat::from_path("scene.bmp"),
        Err(ExportError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_degenerate_camera_fails_export() {
    let mut scene = red_voxel_scene();
    scene.camera_mut().set_camera_direction(Vector3::new(0.0, 0.0, 0.0));
    assert!(matches!(
        scene.render_to_bytes(ExportFormat::Svg, 10, 10),
        Err(ExportError::Scene(SceneError::DegenerateCamera(_)))
    ));
}

#[test]
fn test_every_format_exports_to_file() {
    let scene = red_voxel_scene();
    let directory = std::env::temp_dir().join(format!("digiscene-export-{}", std::process::id()));
    fs::create_dir_all(&directory).unwrap();

    for format in ExportFormat::ALL {
        let path = directory.join(format!("voxel.{}", format.extension()));
        scene.export(&path, format, 64, 48).unwrap();
        let bytes = fs::read(&path).unwrap();
        let signature: &[u8] = match format {
            ExportFormat::Pdf => b"%PDF",
            ExportFormat::Png => b"\x89PNG",
            ExportFormat::Ps | ExportFormat::Eps => b"%!PS",
            ExportFormat::Svg => b"<?xml",
        };
        assert!(bytes.starts_with(signature), "{} signature", format);
    }

    let leftovers: Vec<_> = fs::read_dir(&directory)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_png_shows_voxel_at_center() {
    let scene = red_voxel_scene();
    let bytes = scene.render_to_bytes(ExportFormat::Png, 100, 100).unwrap();
    let image = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (100, 100));
    assert_eq!(image.get_pixel(50, 50).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
}
