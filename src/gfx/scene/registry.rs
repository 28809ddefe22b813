//! Style and mode registries
//!
//! Decouples how a type looks from what the type is. Both registries are keyed
//! by a type name string. A key may encode a type+mode composite such as
//! `"Voxel/Paving"`; lookups are exact-match and never fall back from a
//! composite key to its base key on their own.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::SceneError;
use crate::gfx::scene::{
    primitive::{Color, PrimitiveKind},
    scene::SceneStore,
};

/// A reusable look for a family of drawables.
///
/// Styles are shared: the registry and every drawable that fetched one hold
/// the same `Rc`.
pub trait Style: fmt::Debug {
    /// Prepare the scene before a drawable appends its primitives,
    /// typically by setting the current fill and line colors.
    fn apply(&self, scene: &mut SceneStore);

    /// Color the export pass should use for primitives of `kind`
    /// instead of their own.
    fn color_override(&self, _kind: PrimitiveKind) -> Option<Color> {
        None
    }
}

/// Maps type names to rendering mode names.
#[derive(Debug, Default, Clone)]
pub struct ModeRegistry {
    modes: HashMap<String, String>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode for `type_name`, overwriting any previous one.
    pub fn set(&mut self, type_name: &str, mode: &str) -> Result<(), SceneError> {
        if type_name.is_empty() {
            return Err(SceneError::InvalidKeyLookup);
        }
        self.modes.insert(type_name.to_string(), mode.to_string());
        Ok(())
    }

    /// The mode for `type_name`, or `""` when none has been set.
    pub fn get(&self, type_name: &str) -> &str {
        self.modes.get(type_name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// Maps type names to shared style objects.
#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    styles: HashMap<String, Rc<dyn Style>>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `style` for `type_name`, overwriting any previous one.
    pub fn set(&mut self, type_name: &str, style: Rc<dyn Style>) -> Result<(), SceneError> {
        if type_name.is_empty() {
            return Err(SceneError::InvalidKeyLookup);
        }
        self.styles.insert(type_name.to_string(), style);
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Option<Rc<dyn Style>> {
        self.styles.get(type_name).cloned()
    }

    /// Looks up `"type_name/mode"` first, then `"type_name"`.
    pub fn get_with_fallback(&self, type_name: &str, mode: &str) -> Option<Rc<dyn Style>> {
        if !mode.is_empty() {
            if let Some(style) = self.get(&format!("{}/{}", type_name, mode)) {
                return Some(style);
            }
        }
        self.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Custom style redefining the fill color and the line/point color.
///
/// Streamed directly it sets the scene's current colors; registered through
/// [`CustomStyle`](crate::gfx::scene::stream::CustomStyle) it also overrides
/// the export color of the primitive kind it is registered for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomColors {
    pub pen_color: Color,
    pub fill_color: Color,
}

impl CustomColors {
    pub fn new(pen_color: Color, fill_color: Color) -> Self {
        Self {
            pen_color,
            fill_color,
        }
    }
}

impl Style for CustomColors {
    fn apply(&self, scene: &mut SceneStore) {
        scene.set_fill_color(self.fill_color);
        scene.set_line_color(self.pen_color);
    }

    fn color_override(&self, kind: PrimitiveKind) -> Option<Color> {
        if kind.is_stroked() {
            Some(self.pen_color)
        } else {
            Some(self.fill_color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_empty() {
        let mut modes = ModeRegistry::new();
        assert_eq!(modes.get("Voxel"), "");
        modes.set("Voxel", "Paving").unwrap();
        assert_eq!(modes.get("Voxel"), "Paving");
        assert_eq!(modes.get("Line"), "");
    }

    #[test]
    fn test_mode_overwrite() {
        let mut modes = ModeRegistry::new();
        modes.set("Voxel", "Paving").unwrap();
        modes.set("Voxel", "Grid").unwrap();
        assert_eq!(modes.get("Voxel"), "Grid");
        assert_eq!(modes.len(), 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut modes = ModeRegistry::new();
        assert_eq!(modes.set("", "Paving"), Err(SceneError::InvalidKeyLookup));

        let mut styles = StyleRegistry::new();
        let style: Rc<dyn Style> = Rc::new(CustomColors::new(Color::BLACK, Color::WHITE));
        assert_eq!(styles.set("", style), Err(SceneError::InvalidKeyLookup));
        assert!(styles.is_empty());
    }

    #[test]
    fn test_composite_keys_are_exact() {
        let mut styles = StyleRegistry::new();
        let base: Rc<dyn Style> = Rc::new(CustomColors::new(Color::BLACK, Color::WHITE));
        styles.set("Voxel", base).unwrap();

        assert!(styles.get("Voxel/Paving").is_none());
        assert!(styles.get_with_fallback("Voxel", "Paving").is_some());
    }

    #[test]
    fn test_style_is_shared() {
        let mut styles = StyleRegistry::new();
        let style: Rc<dyn Style> = Rc::new(CustomColors::new(Color::BLACK, Color::WHITE));
        styles.set("Voxel", Rc::clone(&style)).unwrap();

        let fetched = styles.get("Voxel").unwrap();
        assert!(Rc::ptr_eq(&fetched, &style));
        assert_eq!(Rc::strong_count(&style), 3);
    }

    #[test]
    fn test_custom_colors_override() {
        let colors = CustomColors::new(Color::rgb(1, 2, 3), Color::rgb(4, 5, 6));
        assert_eq!(colors.color_override(PrimitiveKind::Line), Some(Color::rgb(1, 2, 3)));
        assert_eq!(colors.color_override(PrimitiveKind::Quad), Some(Color::rgb(4, 5, 6)));
    }
}
