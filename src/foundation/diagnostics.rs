use std::fmt;

use serde::Serialize;

/// Render pipeline stage that failed for a single item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStage {
    /// Building the block layout.
    Compose,
    /// Drawing into the off-screen surface and reading it back.
    Rasterize,
    /// Cropping and PNG encoding.
    Encode,
}

impl RenderStage {
    /// Stable lowercase stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compose => "compose",
            Self::Rasterize => "rasterize",
            Self::Encode => "encode",
        }
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single batch item produced no handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "stage", rename_all = "snake_case")]
pub enum FailureReason {
    /// The product repository has no record for the id.
    ProductMissing,
    /// The record carries no image, or its image bytes could not be loaded.
    ImageMissing,
    /// A render stage failed.
    RenderFailure(RenderStage),
    /// The rendered bytes could not be written to the asset store.
    PersistFailure,
    /// No rendered asset exists at the expected path.
    AssetMissing,
    /// Every resolution strategy failed for an existing asset.
    ResolutionFailure,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductMissing => f.write_str("product missing"),
            Self::ImageMissing => f.write_str("image missing"),
            Self::RenderFailure(stage) => write!(f, "render failure ({stage})"),
            Self::PersistFailure => f.write_str("persist failure"),
            Self::AssetMissing => f.write_str("asset missing"),
            Self::ResolutionFailure => f.write_str("resolution failure"),
        }
    }
}

/// Structured per-item diagnostic `{id, path, reason}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemDiagnostic {
    /// Product identifier.
    pub id: String,
    /// Expected relative asset path.
    pub path: String,
    /// Failure classification.
    pub reason: FailureReason,
    /// Free-form detail from the underlying error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ItemDiagnostic {
    pub fn new(id: impl Into<String>, path: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            reason,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

impl fmt::Display for ItemDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.id, self.path, self.reason)?;
        if let Some(d) = &self.detail {
            write!(f, " ({d})")?;
        }
        Ok(())
    }
}
