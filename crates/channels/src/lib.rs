//! The material-channel domain: the ten PBR input slots an artist tunes,
//! plus the selectable preview [`Background`].
//!
//! Each slot holds either a constant fill value or pixels decoded from a
//! texture file. The renderer never reads files itself; it consumes the
//! decoded [`ChannelImage`] for a slot and tracks per-slot revisions to
//! pick up changes at tick boundaries.
//!
//! # Invariants
//! - Every slot always holds a value; a failed file load leaves the prior
//!   value untouched.
//! - Slot revisions are monotonic and bump on every successful mutation.

mod background;
mod kind;
mod pixels;
mod set;

pub use background::Background;
pub use kind::{ChannelKind, ChannelSource, ChannelValue};
pub use pixels::ChannelImage;
pub use set::ChannelSet;

use std::path::PathBuf;

/// Errors from channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The texture file could not be read or decoded. The channel that
    /// triggered the load keeps its previous contents.
    #[error("failed to load texture {path:?}: {source}")]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
