//! The render loop shared by batch and live modes.

/// [`render_session::RenderSession`] and its statistics.
pub mod render_session;
