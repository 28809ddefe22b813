use std::collections::HashMap;
use std::rc::Rc;

use cgmath::Point3;

use crate::error::SceneError;
use crate::gfx::{
    camera::{CameraConfig, ProjectionCamera},
    clipping::{ClippingPlane, ClippingPlanes},
    scene::{
        bounds::Aabb,
        primitive::{Color, Line, Linel, Point, Pointel, Primitive, PrimitiveKind, Quad, Surfel, Voxel},
        registry::{ModeRegistry, Style, StyleRegistry},
    },
};

/// Colors and sizes used by the `add_*` helpers when the caller gives none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDefaults {
    pub voxel_color: Color,
    pub line_color: Color,
    pub point_color: Color,
    pub quad_color: Color,
    pub surfel_color: Color,
    pub pointel_color: Color,
    pub linel_color: Color,
    pub voxel_half_width: f64,
    /// Output units
    pub line_width: f64,
    /// Output units
    pub point_size: f64,
    /// World units
    pub pointel_radius: f64,
    /// World units
    pub linel_width: f64,
}

impl Default for KindDefaults {
    fn default() -> Self {
        Self {
            voxel_color: Color::rgb(220, 220, 220),
            line_color: Color::rgba(20, 20, 20, 200),
            point_color: Color::rgb(200, 20, 20),
            quad_color: Color::rgb(200, 200, 200),
            surfel_color: Color::rgb(180, 180, 250),
            pointel_color: Color::rgb(200, 20, 20),
            linel_color: Color::rgb(20, 20, 200),
            voxel_half_width: 0.5,
            line_width: 1.5,
            point_size: 4.0,
            pointel_radius: 0.1,
            linel_width: 0.02,
        }
    }
}

impl KindDefaults {
    pub fn color(&self, kind: PrimitiveKind) -> Color {
        match kind {
            PrimitiveKind::Voxel => self.voxel_color,
            PrimitiveKind::Line => self.line_color,
            PrimitiveKind::Point => self.point_color,
            PrimitiveKind::Quad => self.quad_color,
            PrimitiveKind::Surfel => self.surfel_color,
            PrimitiveKind::Pointel => self.pointel_color,
            PrimitiveKind::Linel => self.linel_color,
        }
    }
}

/// Everything a scene needs at construction. There are no process-wide
/// defaults; two scenes built from different configs never interact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub defaults: KindDefaults,
    pub background: Color,
    /// Color of the patches drawn for visible clipping planes.
    pub clipping_plane_color: Color,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            defaults: KindDefaults::default(),
            background: Color::WHITE,
            clipping_plane_color: Color::rgba(200, 200, 200, 100),
            camera: CameraConfig::default(),
        }
    }
}

/// Lifecycle of a primitive list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// The append target for its kind.
    Open,
    /// Superseded by a newer list or closed by `UpdateDisplay`.
    Finalized,
}

/// An ordered, append-only group of same-kind primitives.
#[derive(Debug, Clone)]
pub struct PrimitiveList {
    kind: PrimitiveKind,
    depth_test: bool,
    state: ListState,
    primitives: Vec<Primitive>,
}

impl PrimitiveList {
    fn new(kind: PrimitiveKind, depth_test: bool) -> Self {
        Self {
            kind,
            depth_test,
            state: ListState::Open,
            primitives: Vec::new(),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Whether the export pass depth-sorts this list.
    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ListState::Open
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Retained scene: primitive lists, clipping planes, registries and camera.
///
/// Lists are kept in creation order across all kinds. Each kind has at most
/// one open list, which receives every append of that kind. Appending a kind
/// that has no open list is an error; lists are never created implicitly.
#[derive(Debug)]
pub struct SceneStore {
    config: SceneConfig,
    lists: Vec<PrimitiveList>,
    current: HashMap<PrimitiveKind, usize>,
    last_kind: Option<PrimitiveKind>,
    clipping_planes: ClippingPlanes,
    modes: ModeRegistry,
    styles: StyleRegistry,
    default_color: Option<Color>,
    fill_color: Option<Color>,
    line_color: Option<Color>,
    wireframe: bool,
    camera: ProjectionCamera,
    bounds: Option<Aabb>,
}

impl SceneStore {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            lists: Vec::new(),
            current: HashMap::new(),
            last_kind: None,
            clipping_planes: ClippingPlanes::new(),
            modes: ModeRegistry::new(),
            styles: StyleRegistry::new(),
            default_color: None,
            fill_color: None,
            line_color: None,
            wireframe: false,
            camera: ProjectionCamera::new(config.camera),
            bounds: None,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // List lifecycle

    /// Opens a new empty list of `kind` and makes it the append target for
    /// that kind. The previous target of the same kind is finalized.
    pub fn open_list(&mut self, kind: PrimitiveKind, depth_test: bool) {
        if let Some(previous) = self.current.get(&kind).copied() {
            self.lists[previous].state = ListState::Finalized;
        }
        self.lists.push(PrimitiveList::new(kind, depth_test));
        let index = self.lists.len() - 1;
        self.current.insert(kind, index);
        self.last_kind = Some(kind);
        log::debug!(
            "Opened {} list #{} (depth test {})",
            kind,
            index,
            if depth_test { "on" } else { "off" }
        );
    }

    /// Appends to the open list of the primitive's kind.
    pub fn append(&mut self, primitive: impl Into<Primitive>) -> Result<(), SceneError> {
        let primitive = primitive.into();
        let kind = primitive.kind();
        let index = *self
            .current
            .get(&kind)
            .ok_or(SceneError::NoActiveList(kind))?;

        if let Some(extent) = Aabb::from_points(&primitive.extent_points()) {
            self.bounds = Some(match self.bounds {
                Some(bounds) => bounds.merge(&extent),
                None => extent,
            });
        }
        self.lists[index].primitives.push(primitive);
        self.last_kind = Some(kind);
        Ok(())
    }

    /// Finalizes every open list. Further appends need a new list.
    pub fn finalize_lists(&mut self) {
        for index in self.current.drain().map(|(_, index)| index) {
            self.lists[index].state = ListState::Finalized;
        }
    }

    /// All lists in creation order.
    pub fn lists(&self) -> &[PrimitiveList] {
        &self.lists
    }

    /// The open list for `kind`, if any.
    pub fn current_list(&self, kind: PrimitiveKind) -> Option<&PrimitiveList> {
        self.current.get(&kind).map(|&index| &self.lists[index])
    }

    /// Kind of the most recently opened list or appended primitive.
    pub fn last_kind(&self) -> Option<PrimitiveKind> {
        self.last_kind
    }

    pub fn primitive_count(&self) -> usize {
        self.lists.iter().map(PrimitiveList::len).sum()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    // Primitive helpers using the current color state and configured sizes

    pub fn add_voxel(&mut self, center: Point3<f64>) -> Result<(), SceneError> {
        let voxel = Voxel {
            center,
            half_width: self.config.defaults.voxel_half_width,
            color: self.color_for(PrimitiveKind::Voxel),
        };
        self.append(voxel)
    }

    pub fn add_line(&mut self, from: Point3<f64>, to: Point3<f64>) -> Result<(), SceneError> {
        let line = Line {
            from,
            to,
            width: self.config.defaults.line_width,
            color: self.color_for(PrimitiveKind::Line),
        };
        self.append(line)
    }

    pub fn add_point(&mut self, center: Point3<f64>) -> Result<(), SceneError> {
        let point = Point {
            center,
            size: self.config.defaults.point_size,
            color: self.color_for(PrimitiveKind::Point),
        };
        self.append(point)
    }

    pub fn add_quad(&mut self, corners: [Point3<f64>; 4]) -> Result<(), SceneError> {
        let quad = Quad {
            corners,
            color: self.color_for(PrimitiveKind::Quad),
        };
        self.append(quad)
    }

    pub fn add_surfel(&mut self, corners: [Point3<f64>; 4]) -> Result<(), SceneError> {
        let surfel = Surfel {
            corners,
            color: self.color_for(PrimitiveKind::Surfel),
        };
        self.append(surfel)
    }

    pub fn add_pointel(&mut self, center: Point3<f64>) -> Result<(), SceneError> {
        let pointel = Pointel {
            center,
            radius: self.config.defaults.pointel_radius,
            color: self.color_for(PrimitiveKind::Pointel),
        };
        self.append(pointel)
    }

    pub fn add_linel(&mut self, from: Point3<f64>, to: Point3<f64>) -> Result<(), SceneError> {
        let linel = Linel {
            from,
            to,
            width: self.config.defaults.linel_width,
            color: self.color_for(PrimitiveKind::Linel),
        };
        self.append(linel)
    }

    // Color state

    /// Color the `add_*` helpers use for `kind`: the current line color for
    /// stroked kinds or the current fill color otherwise, then the streamed
    /// default color, then the configured per-kind default.
    pub fn color_for(&self, kind: PrimitiveKind) -> Color {
        let current = if kind.is_stroked() {
            self.line_color
        } else {
            self.fill_color
        };
        current
            .or(self.default_color)
            .unwrap_or_else(|| self.config.defaults.color(kind))
    }

    pub fn set_default_color(&mut self, color: Color) {
        self.default_color = Some(color);
    }

    pub fn default_color(&self) -> Option<Color> {
        self.default_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = Some(color);
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.line_color = Some(color);
    }

    pub fn line_color(&self) -> Option<Color> {
        self.line_color
    }

    pub fn background(&self) -> Color {
        self.config.background
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    // Registries

    pub fn set_mode(&mut self, type_name: &str, mode: &str) -> Result<(), SceneError> {
        self.modes.set(type_name, mode)?;
        log::debug!("Mode for {:?} set to {:?}", type_name, mode);
        Ok(())
    }

    /// Mode registered for `type_name`, `""` when none.
    pub fn mode(&self, type_name: &str) -> &str {
        self.modes.get(type_name)
    }

    pub fn set_style(&mut self, type_name: &str, style: Rc<dyn Style>) -> Result<(), SceneError> {
        self.styles.set(type_name, style)?;
        log::debug!("Custom style registered for {:?}", type_name);
        Ok(())
    }

    pub fn style(&self, type_name: &str) -> Option<Rc<dyn Style>> {
        self.styles.get(type_name)
    }

    /// Style for `"type_name/mode"`, falling back to `"type_name"`.
    pub fn style_with_fallback(&self, type_name: &str, mode: &str) -> Option<Rc<dyn Style>> {
        self.styles.get_with_fallback(type_name, mode)
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    // Clipping

    pub fn add_clipping_plane(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        visible: bool,
    ) -> Result<(), SceneError> {
        self.clipping_planes
            .add(ClippingPlane::new(a, b, c, d, visible))?;
        log::debug!(
            "Clipping plane {}x + {}y + {}z + {} >= 0 added (visible: {})",
            a,
            b,
            c,
            d,
            visible
        );
        Ok(())
    }

    pub fn clipping_planes(&self) -> &ClippingPlanes {
        &self.clipping_planes
    }

    // Camera

    pub fn camera(&self) -> &ProjectionCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ProjectionCamera {
        &mut self.camera
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            list_count: self.lists.len(),
            open_list_count: self.current.len(),
            primitive_count: self.primitive_count(),
            clipping_plane_count: self.clipping_planes.len(),
        }
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub list_count: usize,
    pub open_list_count: usize,
    pub primitive_count: usize,
    pub clipping_plane_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Point3<f64> {
        Point3::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn test_append_without_list_fails() {
        let mut scene = SceneStore::default();
        assert_eq!(
            scene.add_voxel(origin()),
            Err(SceneError::NoActiveList(PrimitiveKind::Voxel))
        );
        assert!(scene.lists().is_empty());
        assert!(scene.bounds().is_none());
    }

    #[test]
    fn test_lists_are_typed() {
        let mut scene = SceneStore::default();
        scene.open_list(PrimitiveKind::Voxel, true);
        scene.add_voxel(origin()).unwrap();
        assert_eq!(
            scene.add_line(origin(), Point3::new(1.0, 0.0, 0.0)),
            Err(SceneError::NoActiveList(PrimitiveKind::Line))
        );
        assert_eq!(scene.lists().len(), 1);
        assert_eq!(scene.lists()[0].len(), 1);
    }

    #[test]
    fn test_open_list_switches_target() {
        let mut scene = SceneStore::default();
        scene.open_list(PrimitiveKind::Voxel, true);
        scene.add_voxel(origin()).unwrap();
        scene.open_list(PrimitiveKind::Voxel, false);
        scene.add_voxel(origin()).unwrap();
        scene.add_voxel(origin()).unwrap();

        let lists = scene.lists();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].len(), 1);
        assert_eq!(lists[0].state(), ListState::Finalized);
        assert_eq!(lists[1].len(), 2);
        assert!(lists[1].is_open());
        assert!(!lists[1].depth_test());
    }

    #[test]
    fn test_finalize_closes_all_lists() {
        let mut scene = SceneStore::default();
        scene.open_list(PrimitiveKind::Voxel, true);
        scene.open_list(PrimitiveKind::Point, true);
        scene.finalize_lists();
        assert!(scene.lists().iter().all(|l| !l.is_open()));
        assert!(scene.add_point(origin()).is_err());
    }

    #[test]
    fn test_color_resolution() {
        let mut scene = SceneStore::default();
        assert_eq!(scene.color_for(PrimitiveKind::Voxel), Color::rgb(220, 220, 220));

        scene.set_default_color(Color::rgb(1, 1, 1));
        assert_eq!(scene.color_for(PrimitiveKind::Voxel), Color::rgb(1, 1, 1));
        assert_eq!(scene.color_for(PrimitiveKind::Line), Color::rgb(1, 1, 1));

        scene.set_fill_color(Color::rgb(2, 2, 2));
        assert_eq!(scene.color_for(PrimitiveKind::Voxel), Color::rgb(2, 2, 2));
        assert_eq!(scene.color_for(PrimitiveKind::Line), Color::rgb(1, 1, 1));

        scene.set_line_color(Color::rgb(3, 3, 3));
        assert_eq!(scene.color_for(PrimitiveKind::Linel), Color::rgb(3, 3, 3));
    }

    #[test]
    fn test_bounds_grow_with_appends() {
        let mut scene = SceneStore::default();
        scene.open_list(PrimitiveKind::Voxel, true);
        scene.add_voxel(origin()).unwrap();
        let first = scene.bounds().unwrap();
        assert_eq!(first.min, Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(first.max, Point3::new(0.5, 0.5, 0.5));

        scene.add_voxel(Point3::new(2.0, 0.0, 0.0)).unwrap();
        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, Point3::new(2.5, 0.5, 0.5));
    }

    #[test]
    fn test_clipping_capacity_through_store() {
        let mut scene = SceneStore::default();
        for _ in 0..5 {
            scene.add_clipping_plane(0.0, 0.0, 1.0, 0.0, false).unwrap();
        }
        assert_eq!(
            scene.add_clipping_plane(1.0, 0.0, 0.0, 0.0, true),
            Err(SceneError::ClippingPlaneCapacity { max: 5 })
        );
        assert_eq!(scene.clipping_planes().len(), 5);
    }

    #[test]
    fn test_statistics() {
        let mut scene = SceneStore::default();
        scene.open_list(PrimitiveKind::Pointel, true);
        scene.add_pointel(origin()).unwrap();
        scene.open_list(PrimitiveKind::Linel, false);
        scene.add_linel(origin(), Point3::new(0.0, 1.0, 0.0)).unwrap();
        let stats = scene.get_statistics();
        assert_eq!(stats.list_count, 2);
        assert_eq!(stats.open_list_count, 2);
        assert_eq!(stats.primitive_count, 2);
    }
}
