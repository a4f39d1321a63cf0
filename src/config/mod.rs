//! Process configuration and user settings.

/// File-backed pipeline configuration (roots and fonts).
pub mod card;
/// Watermark settings and their providers.
pub mod settings;
