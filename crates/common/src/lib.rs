//! Shared spatial types used across the previewer crates.

mod types;

pub use types::Transform;
