//! # Scene Store
//!
//! Retained-mode storage for digital-geometry primitives. Primitives live in
//! ordered lists, one kind per list; the store also owns the per-type mode
//! and style registries, the clipping planes and the camera.
//!
//! ## Key Components
//!
//! - [`SceneStore`] - lists, registries, clipping planes and camera
//! - [`Primitive`] - the seven drawable kinds and their attributes
//! - [`Drawable`] - values that append their own primitives
//! - [`Command`] - list lifecycle tokens for [`SceneStore::send`]
//! - [`Style`] / [`CustomColors`] - per-type drawing customization
//!
//! ## List Lifecycle
//!
//! A list is opened with [`SceneStore::open_list`] (or
//! [`Command::AddNewListOf`]) and stays the target of appends of its kind until
//! a newer list of that kind is opened or [`Command::UpdateDisplay`]
//! finalizes it. Appending with no open list of the right kind fails with
//! [`SceneError::NoActiveList`](crate::error::SceneError::NoActiveList).

pub mod bounds;
pub mod primitive;
pub mod registry;
pub mod scene;
pub mod stream;

// Re-export main types
pub use bounds::Aabb;
pub use primitive::{
    Color, Line, Linel, Point, Pointel, Primitive, PrimitiveKind, Quad, Surfel, Voxel,
};
pub use registry::{CustomColors, ModeRegistry, Style, StyleRegistry};
pub use scene::{
    KindDefaults, ListState, PrimitiveList, SceneConfig, SceneStatistics, SceneStore,
};
pub use stream::{ClippingPlaneModifier, Command, CustomStyle, Drawable, SetMode, StreamItem};
