//! # Voxel Scene Demo
//!
//! Builds a small digital ball, draws its boundary cells and a clipping plane,
//! then exports the scene in every supported format into the system temp
//! directory.
//!
//! Run with `RUST_LOG=debug cargo run --example voxel_scene` to follow the
//! list lifecycle.

use std::rc::Rc;

use anyhow::{Context, Result};
use digiscene::prelude::*;

/// A set of integer points drawn as voxels ("Paving") or as grid points ("Grid").
struct DigitalSet {
    points: Vec<[i32; 3]>,
}

impl DigitalSet {
    fn ball(radius: i32) -> Self {
        let mut points = Vec::new();
        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    if x * x + y * y + z * z <= radius * radius {
                        points.push([x, y, z]);
                    }
                }
            }
        }
        Self { points }
    }

    fn contains(&self, p: [i32; 3]) -> bool {
        self.points.contains(&p)
    }
}

fn to_point(p: [i32; 3]) -> Point3<f64> {
    Point3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))
}

impl Drawable for DigitalSet {
    fn style_name(&self) -> &str {
        "DigitalSet"
    }

    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
        let as_grid = scene.mode(self.style_name()) == "Grid";
        for p in &self.points {
            if as_grid {
                scene.add_point(to_point(*p))?;
            } else {
                scene.add_voxel(to_point(*p))?;
            }
        }
        Ok(())
    }
}

/// Boundary faces of a digital set, drawn as surfels between an inside voxel
/// and an outside neighbor along +z.
struct UpperBoundary<'a>(&'a DigitalSet);

impl Drawable for UpperBoundary<'_> {
    fn style_name(&self) -> &str {
        "UpperBoundary"
    }

    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
        for p in &self.0.points {
            let above = [p[0], p[1], p[2] + 1];
            if self.0.contains(above) {
                continue;
            }
            let c = to_point(*p);
            let z = c.z + 0.5;
            scene.add_surfel([
                Point3::new(c.x - 0.5, c.y - 0.5, z),
                Point3::new(c.x + 0.5, c.y - 0.5, z),
                Point3::new(c.x + 0.5, c.y + 0.5, z),
                Point3::new(c.x - 0.5, c.y + 0.5, z),
            ])?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let ball = DigitalSet::ball(3);
    let mut scene = SceneStore::new(SceneConfig::default());
    scene.camera_mut().set_camera(
        Point3::new(9.0, 7.0, 12.0),
        Vector3::new(-9.0, -7.0, -12.0),
        Vector3::unit_y(),
    );

    let translucent: Rc<dyn Style> = Rc::new(CustomColors::new(
        Color::rgb(40, 40, 40),
        Color::rgba(250, 180, 40, 120),
    ));

    scene
        .send(&ClippingPlaneModifier::new(1.0, 0.0, 0.0, 0.5, true))?
        .send(Command::AddNewListOf {
            kind: PrimitiveKind::Voxel,
            depth_test: true,
        })?
        .send(Color::rgb(90, 140, 220))?
        .send(&ball)?
        .send(Command::AddNewListOf {
            kind: PrimitiveKind::Surfel,
            depth_test: true,
        })?
        .send(&CustomStyle::new("Surfel", translucent))?
        .send(&UpperBoundary(&ball))?
        .send(&SetMode::new("DigitalSet", "Grid"))?
        .send(Command::AddNewListOf {
            kind: PrimitiveKind::Point,
            depth_test: false,
        })?
        .send(&DigitalSet::ball(1))?
        .send(Command::UpdateDisplay)?;

    let stats = scene.get_statistics();
    log::info!(
        "Scene holds {} primitives in {} lists",
        stats.primitive_count,
        stats.list_count
    );

    let directory = std::env::temp_dir();
    for format in ExportFormat::ALL {
        let path = directory.join(format!("voxel_scene.{}", format.extension()));
        scene
            .export(&path, format, 640, 480)
            .with_context(|| format!("exporting {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
