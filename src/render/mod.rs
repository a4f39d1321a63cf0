//! CPU rasterization of card layouts (3x supersampled) and PNG encoding.

/// Bottom crop, straight-alpha conversion and PNG output.
pub mod encode;
/// Layout drawing into a [`surface::CardSurface`].
pub mod raster;
/// Reusable off-screen surface.
pub mod surface;
/// Font faces and Parley text shaping.
pub mod text;
/// Watermark placement.
pub mod watermark;
