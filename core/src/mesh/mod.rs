//! Imported mesh types.
//!
//! - [`Mesh`] - Parallel vertex attribute arrays plus faces
//! - [`Face`] - One primitive as vertex indices
//! - [`PrimitiveTypes`] - Point / line / triangle / polygon flags

mod data;

pub use data::{Face, Mesh, PrimitiveTypes};
