//! Drawing surfaces.

/// CPU rasterizer backed by `vello_cpu`.
pub mod cpu;
/// Surface trait, frames, and the recording surface.
pub mod surface;
