//! wgpu render backend for the material previewer.
//!
//! Draws the preview in two passes: the backdrop and the cube, lit from
//! the ten material channels, go into an offscreen target, then a
//! fullscreen quad combines that target to the surface with tonemapping.
//!
//! # Invariants
//! - The backend never mutates session state; it only reads it.
//! - Channel swaps are picked up once per tick, before any pass encodes.
//! - The offscreen target is written in the lighting pass and sampled in
//!   the combine pass, never both in the same pass.

mod entity;
mod framebuffer;
mod geometry;
mod material;
mod renderer;
mod shaders;
mod texture;

pub use entity::{Entity, MaterialId};
pub use framebuffer::OffscreenTarget;
pub use geometry::{Geometry, Vertex};
pub use material::Material;
pub use renderer::{PassKind, PreviewRenderer, FRAME_PASSES};
pub use texture::GpuTexture;
