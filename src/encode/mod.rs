//! Frame sinks.
//!
//! Sinks consume rendered frames in output order and are driven by
//! [`RenderSession::run`](crate::RenderSession::run).

/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// Live on-screen preview through the system `ffplay`.
pub mod ffplay;
pub(crate) mod pipe;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
