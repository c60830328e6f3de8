//! Scene graph types for representing imported scenes.
//!
//! These types are format-agnostic and are produced by every loader.
//!
//! - [`Scene`] - Node tree plus meshes and materials
//! - [`SceneNode`] - A node in the scene tree
//! - [`NodeTransform`] - TRS transform using plain arrays

mod types;

pub use types::{NodeTransform, Scene, SceneNode};
