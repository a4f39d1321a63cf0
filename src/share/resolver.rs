use serde::Serialize;

use crate::{
    assets::{
        decode::encode_png_data_uri,
        store::{AssetKey, AssetStore, expected_rel_path},
    },
    foundation::{
        diagnostics::{FailureReason, ItemDiagnostic},
        error::{CardError, CardResult},
    },
    share::report::ShareReport,
};

/// Opaque reference to a card that the share collaborator accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "uri", rename_all = "snake_case")]
pub enum ShareHandle {
    /// Platform file URI of the stored card.
    FileUri(String),
    /// Self-contained `data:image/png;base64,...` payload.
    DataUri(String),
}

impl ShareHandle {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FileUri(s) | Self::DataUri(s) => s,
        }
    }
}

impl std::fmt::Display for ShareHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileUri(s) => f.write_str(s),
            Self::DataUri(s) => write!(f, "data uri ({} bytes)", s.len()),
        }
    }
}

/// One way of turning an existing card into a [`ShareHandle`].
pub trait ResolveStrategy {
    fn name(&self) -> &'static str;
    fn resolve(&self, store: &dyn AssetStore, key: &AssetKey) -> CardResult<ShareHandle>;
}

/// Ask the store for a platform handle.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformUri;

impl ResolveStrategy for PlatformUri {
    fn name(&self) -> &'static str {
        "platform_uri"
    }

    fn resolve(&self, store: &dyn AssetStore, key: &AssetKey) -> CardResult<ShareHandle> {
        store.resolve_handle(key).map(ShareHandle::FileUri)
    }
}

/// Read the card bytes and inline them as a data URI.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineDataUri;

impl ResolveStrategy for InlineDataUri {
    fn name(&self) -> &'static str {
        "inline_data_uri"
    }

    fn resolve(&self, store: &dyn AssetStore, key: &AssetKey) -> CardResult<ShareHandle> {
        let bytes = store.read(key)?;
        if bytes.is_empty() {
            return Err(CardError::validation(format!("card '{key}' is empty")));
        }
        Ok(ShareHandle::DataUri(encode_png_data_uri(&bytes)))
    }
}

/// A card that resolved, with the strategy that produced its handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedShare {
    pub id: String,
    pub path: String,
    pub handle: ShareHandle,
    pub strategy: &'static str,
}

/// Outcome of resolving a batch of keys: handles plus per-item diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShareBatch {
    pub resolved: Vec<ResolvedShare>,
    pub diagnostics: Vec<ItemDiagnostic>,
}

impl ShareBatch {
    pub fn handles(&self) -> Vec<ShareHandle> {
        self.resolved.iter().map(|r| r.handle.clone()).collect()
    }

    /// Fail with an aggregated report when nothing resolved.
    ///
    /// Partial batches succeed; their diagnostics stay attached.
    pub fn into_result(self) -> CardResult<Self> {
        if self.resolved.is_empty() {
            return Err(CardError::NothingToShare(ShareReport::new(self.diagnostics)));
        }
        Ok(self)
    }
}

/// Ordered fallback chain over an [`AssetStore`].
pub struct ShareResolver<'a> {
    store: &'a dyn AssetStore,
    strategies: Vec<Box<dyn ResolveStrategy + 'a>>,
}

impl<'a> ShareResolver<'a> {
    /// Platform URI first, inline data URI second.
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self::with_strategies(store, vec![Box::new(PlatformUri), Box::new(InlineDataUri)])
    }

    pub fn with_strategies(
        store: &'a dyn AssetStore,
        strategies: Vec<Box<dyn ResolveStrategy + 'a>>,
    ) -> Self {
        Self { store, strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve one key that is expected to exist.
    pub fn resolve_existing(&self, key: &AssetKey) -> Result<ResolvedShare, ItemDiagnostic> {
        let mut errors = Vec::new();
        for strategy in &self.strategies {
            match strategy.resolve(self.store, key) {
                Ok(handle) => {
                    if !errors.is_empty() {
                        tracing::debug!(
                            path = %key,
                            strategy = strategy.name(),
                            "resolved after fallback"
                        );
                    }
                    return Ok(ResolvedShare {
                        id: key.product_id().to_string(),
                        path: key.rel_path(),
                        handle,
                        strategy: strategy.name(),
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        path = %key,
                        strategy = strategy.name(),
                        error = %e,
                        "strategy failed"
                    );
                    errors.push(format!("{}: {e}", strategy.name()));
                }
            }
        }
        let diag = ItemDiagnostic::new(
            key.product_id(),
            key.rel_path(),
            FailureReason::ResolutionFailure,
        );
        Err(if errors.is_empty() {
            diag.with_detail("no resolution strategies configured")
        } else {
            diag.with_detail(errors.join("; "))
        })
    }

    /// Check existence, then run the strategy chain.
    pub fn resolve(&self, key: &AssetKey) -> Result<ResolvedShare, ItemDiagnostic> {
        if !self.store.exists(key) {
            return Err(ItemDiagnostic::new(
                key.product_id(),
                key.rel_path(),
                FailureReason::AssetMissing,
            ));
        }
        self.resolve_existing(key)
    }

    #[tracing::instrument(skip_all, fields(keys = keys.len()))]
    pub fn resolve_batch(&self, keys: &[AssetKey]) -> ShareBatch {
        self.collect(keys.iter().map(|k| self.resolve(k)))
    }

    /// Resolve cards of `ids` in `folder_label`.
    ///
    /// An id that cannot form an [`AssetKey`] has no card by construction and is recorded as
    /// [`FailureReason::AssetMissing`]; it never aborts the batch.
    #[tracing::instrument(skip_all, fields(ids = ids.len(), folder = folder_label))]
    pub fn resolve_ids<S: AsRef<str>>(&self, ids: &[S], folder_label: &str) -> ShareBatch {
        self.collect(ids.iter().map(|id| {
            let id = id.as_ref();
            match AssetKey::new(id, folder_label) {
                Ok(key) => self.resolve(&key),
                Err(e) => Err(ItemDiagnostic::new(
                    id,
                    expected_rel_path(id, folder_label),
                    FailureReason::AssetMissing,
                )
                .with_detail(e)),
            }
        }))
    }

    fn collect(
        &self,
        items: impl Iterator<Item = Result<ResolvedShare, ItemDiagnostic>>,
    ) -> ShareBatch {
        let mut out = ShareBatch::default();
        for item in items {
            match item {
                Ok(r) => out.resolved.push(r),
                Err(d) => {
                    tracing::warn!(diagnostic = %d, "card not shareable");
                    out.diagnostics.push(d);
                }
            }
        }
        tracing::info!(
            resolved = out.resolved.len(),
            failed = out.diagnostics.len(),
            "share batch resolved"
        );
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/resolver.rs"]
mod tests;
