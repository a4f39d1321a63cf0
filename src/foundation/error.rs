use crate::share::report::ShareReport;

/// Convenience result type used across the crate.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy for fatal (non per-item) failures.
///
/// Per-item problems inside a batch are never raised as [`CardError`]; they are recorded as
/// [`crate::ItemDiagnostic`] values instead.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid caller-provided data (ids, labels, paths, colors).
    #[error("validation error: {0}")]
    Validation(String),

    /// The off-screen rendering surface could not be acquired.
    #[error("surface error: {0}")]
    Surface(String),

    /// Drawing, readback or encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// Settings could not be read or parsed.
    #[error("settings error: {0}")]
    Settings(String),

    /// A share batch resolved zero handles.
    #[error("{0}")]
    NothingToShare(ShareReport),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Settings`] value.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
