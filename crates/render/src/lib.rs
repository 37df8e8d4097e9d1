//! Renderer-agnostic preview state.
//!
//! The core exposes no callbacks of its own; hosts push [`PreviewEvent`]s
//! into a [`PreviewSession`] and call [`PreviewSession::advance`] once per
//! frame. A GPU backend reads the session each tick and draws it.
//!
//! # Invariants
//! - All entry points run on the render thread; hosts marshal events there.
//! - Input deltas accumulate between frames and apply on `advance`, so a
//!   frame sees camera state fixed for its whole duration.

mod camera;
mod event;
mod session;
mod viewport;

pub use camera::{CameraMatrices, OrbitCamera};
pub use event::{ChannelPayload, PreviewEvent};
pub use session::PreviewSession;
pub use viewport::Viewport;
