//! Core types and traits for the Karst voxel renderer.
//!
//! This crate provides the foundational types used throughout the renderer:
//! - Block classification and the shared vertex layout
//! - World coordinates
//! - The render sink boundary (mesh upload/release)
//! - Common error types

pub mod coords;
pub mod error;
pub mod sink;
pub mod types;

pub use coords::WorldPos;
pub use error::{Error, Result};
pub use sink::{HeadlessSink, MeshHandle, RenderSink};
pub use types::{Block, MeshVertex};
