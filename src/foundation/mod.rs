/// Per-item failure records.
pub mod diagnostics;
/// Crate error type.
pub mod error;
