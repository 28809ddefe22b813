//! # Streaming Accumulation
//!
//! Scenes are built by sending an ordered sequence of items to
//! [`SceneStore::send`]: commands that change the list lifecycle, colors that
//! set the default draw color, and drawables that append themselves.
//!
//! Every item is handled to completion before `send` returns, so a drawable
//! observes every effect of the items sent before it. Before a drawable draws
//! itself, the style registered under its name is applied, or else its own
//! [`Drawable::default_style`] for the current mode.
//!
//! ```
//! use cgmath::Point3;
//! use digiscene::prelude::*;
//!
//! struct Marker(Point3<f64>);
//!
//! impl Drawable for Marker {
//!     fn style_name(&self) -> &str {
//!         "Marker"
//!     }
//!
//!     fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
//!         if scene.mode(self.style_name()) == "Grid" {
//!             scene.add_point(self.0)
//!         } else {
//!             scene.add_voxel(self.0)
//!         }
//!     }
//! }
//!
//! let mut scene = SceneStore::default();
//! scene
//!     .send(Command::AddNewListOf { kind: PrimitiveKind::Voxel, depth_test: true })?
//!     .send(Color::rgb(255, 0, 0))?
//!     .send(&Marker(Point3::new(0.0, 0.0, 0.0)))?
//!     .send(Command::UpdateDisplay)?;
//! assert_eq!(scene.primitive_count(), 1);
//! # Ok::<(), SceneError>(())
//! ```

use std::rc::Rc;

use crate::error::SceneError;
use crate::gfx::clipping::ClippingPlane;
use crate::gfx::scene::{
    primitive::{Color, PrimitiveKind},
    registry::{CustomColors, Style},
    scene::SceneStore,
};

/// Capability required to stream a value into a scene.
///
/// Implementors append their own primitives, typically after consulting
/// the mode and style registered under [`style_name`](Drawable::style_name).
pub trait Drawable {
    /// Registry key for this type's modes and styles.
    fn style_name(&self) -> &str;

    /// Appends this value's primitives to `scene`.
    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError>;

    /// Style applied before [`self_draw`](Drawable::self_draw) when no style
    /// is registered under this type's name. `mode` is the type's current mode.
    fn default_style(&self, _mode: &str) -> Option<Rc<dyn Style>> {
        None
    }
}

/// Commands changing the scene's list lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Opens a depth-tested list of the most recently streamed kind
    /// (voxels when nothing was streamed yet).
    AddNewList,
    /// Opens a list of an explicit kind.
    AddNewListOf { kind: PrimitiveKind, depth_test: bool },
    /// Marks scene construction as complete: every open list is finalized
    /// and the scene summary is logged. Does not export.
    UpdateDisplay,
}

/// One item of the accumulation stream.
pub enum StreamItem<'a> {
    Command(Command),
    Color(Color),
    Drawable(&'a dyn Drawable),
}

impl From<Command> for StreamItem<'_> {
    fn from(command: Command) -> Self {
        StreamItem::Command(command)
    }
}

impl From<Color> for StreamItem<'_> {
    fn from(color: Color) -> Self {
        StreamItem::Color(color)
    }
}

impl<'a, T: Drawable + 'a> From<&'a T> for StreamItem<'a> {
    fn from(drawable: &'a T) -> Self {
        StreamItem::Drawable(drawable)
    }
}

impl SceneStore {
    /// Processes one stream item and returns the scene for chaining.
    pub fn send<'a>(&mut self, item: impl Into<StreamItem<'a>>) -> Result<&mut Self, SceneError> {
        match item.into() {
            StreamItem::Command(command) => self.apply_command(command),
            StreamItem::Color(color) => self.set_default_color(color),
            StreamItem::Drawable(drawable) => {
                let name = drawable.style_name();
                log::trace!("Streaming drawable {:?}", name);
                let style = self
                    .style(name)
                    .or_else(|| drawable.default_style(self.mode(name)));
                if let Some(style) = style {
                    style.apply(self);
                }
                drawable.self_draw(self)?;
            }
        }
        Ok(self)
    }

    /// Streams a trait object directly.
    pub fn send_dyn(&mut self, drawable: &dyn Drawable) -> Result<&mut Self, SceneError> {
        self.send(StreamItem::Drawable(drawable))
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::AddNewList => {
                let kind = self.last_kind().unwrap_or(PrimitiveKind::Voxel);
                self.open_list(kind, true);
            }
            Command::AddNewListOf { kind, depth_test } => self.open_list(kind, depth_test),
            Command::UpdateDisplay => {
                self.finalize_lists();
                let stats = self.get_statistics();
                log::info!(
                    "Scene complete: {} primitives in {} lists, {} clipping planes, bounds {:?}",
                    stats.primitive_count,
                    stats.list_count,
                    stats.clipping_plane_count,
                    self.bounds()
                );
            }
        }
    }
}

/// Sets the rendering mode of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMode {
    type_name: String,
    mode: String,
}

impl SetMode {
    pub fn new(type_name: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            mode: mode.into(),
        }
    }
}

impl Drawable for SetMode {
    fn style_name(&self) -> &str {
        "SetMode"
    }

    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
        scene.set_mode(&self.type_name, &self.mode)
    }
}

/// Registers a shared style for a type.
#[derive(Debug, Clone)]
pub struct CustomStyle {
    type_name: String,
    style: Rc<dyn Style>,
}

impl CustomStyle {
    pub fn new(type_name: impl Into<String>, style: Rc<dyn Style>) -> Self {
        Self {
            type_name: type_name.into(),
            style,
        }
    }
}

impl Drawable for CustomStyle {
    fn style_name(&self) -> &str {
        "CustomStyle"
    }

    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
        scene.set_style(&self.type_name, Rc::clone(&self.style))
    }
}

impl Drawable for CustomColors {
    fn style_name(&self) -> &str {
        "CustomColors"
    }

    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
        self.apply(scene);
        Ok(())
    }
}

/// Adds a clipping plane through the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingPlaneModifier(pub ClippingPlane);

impl ClippingPlaneModifier {
    pub fn new(a: f64, b: f64, c: f64, d: f64, visible: bool) -> Self {
        Self(ClippingPlane::new(a, b, c, d, visible))
    }

    pub fn equation(&self) -> [f64; 4] {
        [self.0.a, self.0.b, self.0.c, self.0.d]
    }
}

impl Drawable for ClippingPlaneModifier {
    fn style_name(&self) -> &str {
        "ClippingPlane"
    }

    fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
        let ClippingPlane { a, b, c, d, visible } = self.0;
        scene.add_clipping_plane(a, b, c, d, visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;
    use std::cell::RefCell;

    struct ModeRecorder {
        name: &'static str,
        seen: RefCell<Vec<String>>,
    }

    impl Drawable for ModeRecorder {
        fn style_name(&self) -> &str {
            self.name
        }

        fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
            self.seen
                .borrow_mut()
                .push(scene.mode(self.style_name()).to_string());
            Ok(())
        }
    }

    #[test]
    fn test_mode_is_visible_to_matching_drawable_only() {
        let mut scene = SceneStore::default();
        let voxel_recorder = ModeRecorder {
            name: "Voxel",
            seen: RefCell::new(Vec::new()),
        };
        let other_recorder = ModeRecorder {
            name: "Line",
            seen: RefCell::new(Vec::new()),
        };

        scene
            .send(&SetMode::new("Voxel", "Paving"))
            .unwrap()
            .send(&voxel_recorder)
            .unwrap()
            .send(&other_recorder)
            .unwrap();

        assert_eq!(voxel_recorder.seen.borrow().as_slice(), ["Paving"]);
        assert_eq!(other_recorder.seen.borrow().as_slice(), [""]);
    }

    #[test]
    fn test_color_token_sets_default() {
        let mut scene = SceneStore::default();
        scene
            .send(Command::AddNewListOf {
                kind: PrimitiveKind::Voxel,
                depth_test: false,
            })
            .unwrap()
            .send(Color::rgb(255, 0, 0))
            .unwrap();
        scene.add_voxel(Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(
            scene.lists()[0].primitives()[0].color(),
            Color::rgb(255, 0, 0)
        );
    }

    #[test]
    fn test_add_new_list_follows_last_kind() {
        let mut scene = SceneStore::default();
        scene.send(Command::AddNewList).unwrap();
        assert_eq!(scene.lists()[0].kind(), PrimitiveKind::Voxel);

        scene.open_list(PrimitiveKind::Line, false);
        scene
            .add_line(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        scene.send(Command::AddNewList).unwrap();

        let last = scene.lists().last().unwrap();
        assert_eq!(last.kind(), PrimitiveKind::Line);
        assert!(last.depth_test());
    }

    #[test]
    fn test_update_display_finalizes() {
        let mut scene = SceneStore::default();
        scene.send(Command::AddNewList).unwrap();
        scene.send(Command::UpdateDisplay).unwrap();
        assert!(scene.current_list(PrimitiveKind::Voxel).is_none());
        assert!(scene.add_voxel(Point3::new(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_custom_colors_and_style() {
        let mut scene = SceneStore::default();
        let colors = CustomColors::new(Color::rgb(0, 0, 255), Color::rgb(0, 255, 0));
        scene.send(&colors).unwrap();
        assert_eq!(scene.fill_color(), Some(Color::rgb(0, 255, 0)));
        assert_eq!(scene.line_color(), Some(Color::rgb(0, 0, 255)));

        let style: Rc<dyn Style> = Rc::new(colors);
        scene.send(&CustomStyle::new("Voxel/Paving", style)).unwrap();
        assert!(scene.style("Voxel/Paving").is_some());
        assert!(scene.style("Voxel").is_none());
    }

    #[test]
    fn test_clipping_plane_modifier() {
        let mut scene = SceneStore::default();
        let modifier = ClippingPlaneModifier::new(1.0, 2.0, 3.0, 4.0, true);
        assert_eq!(modifier.equation(), [1.0, 2.0, 3.0, 4.0]);
        for _ in 0..5 {
            scene.send(&modifier).unwrap();
        }
        assert!(matches!(
            scene.send(&modifier),
            Err(SceneError::ClippingPlaneCapacity { .. })
        ));
    }

    struct Tinted;

    impl Drawable for Tinted {
        fn style_name(&self) -> &str {
            "Tinted"
        }

        fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
            scene.add_voxel(Point3::new(0.0, 0.0, 0.0))
        }

        fn default_style(&self, mode: &str) -> Option<Rc<dyn Style>> {
            let fill = if mode == "Dark" {
                Color::rgb(10, 10, 10)
            } else {
                Color::rgb(0, 200, 0)
            };
            Some(Rc::new(CustomColors::new(Color::BLACK, fill)))
        }
    }

    fn first_colors(scene: &SceneStore) -> Vec<Color> {
        scene.lists()[0].primitives().iter().map(|p| p.color()).collect()
    }

    #[test]
    fn test_default_style_colors_appends() {
        let mut scene = SceneStore::default();
        scene
            .send(Command::AddNewListOf {
                kind: PrimitiveKind::Voxel,
                depth_test: false,
            })
            .unwrap()
            .send(&Tinted)
            .unwrap()
            .send(&SetMode::new("Tinted", "Dark"))
            .unwrap()
            .send(&Tinted)
            .unwrap();
        assert_eq!(
            first_colors(&scene),
            vec![Color::rgb(0, 200, 0), Color::rgb(10, 10, 10)]
        );
    }

    #[test]
    fn test_registered_style_wins_over_default() {
        let mut scene = SceneStore::default();
        let registered: Rc<dyn Style> =
            Rc::new(CustomColors::new(Color::BLACK, Color::rgb(250, 0, 250)));
        scene
            .send(Command::AddNewListOf {
                kind: PrimitiveKind::Voxel,
                depth_test: false,
            })
            .unwrap()
            .send(&CustomStyle::new("Tinted", registered))
            .unwrap()
            .send(&Tinted)
            .unwrap();
        assert_eq!(first_colors(&scene), vec![Color::rgb(250, 0, 250)]);
    }

    #[test]
    fn test_send_dyn_streams_boxed_drawables() {
        let mut scene = SceneStore::default();
        scene.open_list(PrimitiveKind::Voxel, true);
        let drawables: Vec<Box<dyn Drawable>> = vec![
            Box::new(Tinted),
            Box::new(SetMode::new("Tinted", "Dark")),
            Box::new(Tinted),
        ];
        for drawable in &drawables {
            scene.send_dyn(drawable.as_ref()).unwrap();
        }
        assert_eq!(scene.primitive_count(), 2);
        assert_eq!(scene.mode("Tinted"), "Dark");
        assert_eq!(first_colors(&scene)[1], Color::rgb(10, 10, 10));
    }

    #[test]
    fn test_failed_drawable_stops_chain() {
        struct NeedsList;
        impl Drawable for NeedsList {
            fn style_name(&self) -> &str {
                "NeedsList"
            }
            fn self_draw(&self, scene: &mut SceneStore) -> Result<(), SceneError> {
                scene.add_quad([Point3::new(0.0, 0.0, 0.0); 4])
            }
        }

        let mut scene = SceneStore::default();
        let err = scene.send(&NeedsList).err().unwrap();
        assert_eq!(err, SceneError::NoActiveList(PrimitiveKind::Quad));
        assert_eq!(scene.primitive_count(), 0);
    }
}
