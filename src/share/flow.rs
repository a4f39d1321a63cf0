use serde::Serialize;

use crate::{
    assets::store::AssetKey,
    catalogue::model::CardTarget,
    foundation::{
        diagnostics::ItemDiagnostic,
        error::{CardError, CardResult},
    },
    pipeline::batch::{CardRenderer, ProgressSink},
    render::surface::CardSurface,
    share::{
        report::ShareReport,
        resolver::{ShareBatch, ShareHandle, ShareResolver},
    },
};

/// Title passed to the share sheet.
pub const SHARE_TITLE: &str = "Share Products";

/// What the user did with the share sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    Cancelled,
}

/// Native share collaborator.
pub trait ShareSheet {
    fn share(&mut self, handles: &[ShareHandle], title: &str) -> CardResult<ShareOutcome>;
}

/// Result of a share action that reached the share sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareSummary {
    pub outcome: ShareOutcome,
    pub shared: usize,
    /// Cards rendered on demand for this share.
    pub rendered: usize,
    pub diagnostics: Vec<ItemDiagnostic>,
}

/// Render missing cards for `ids`, then hand every resolved handle to `sheet`.
///
/// Fails with [`CardError::NothingToShare`] when no handle resolved.
#[tracing::instrument(skip_all, fields(ids = ids.len(), folder = %target.folder_label))]
pub fn share_products<S: AsRef<str>>(
    renderer: &mut CardRenderer<'_>,
    surface: &mut CardSurface,
    ids: &[S],
    target: &CardTarget,
    sheet: &mut dyn ShareSheet,
    progress: &mut dyn ProgressSink,
) -> CardResult<ShareSummary> {
    let batch = renderer.render_batch(surface, ids, target, progress)?;
    let rendered = batch.rendered_count();
    let handles = batch.handles();
    if handles.is_empty() {
        return Err(CardError::NothingToShare(ShareReport::new(batch.failures)));
    }
    let outcome = sheet.share(&handles, SHARE_TITLE)?;
    tracing::info!(shared = handles.len(), ?outcome, "share sheet closed");
    Ok(ShareSummary {
        outcome,
        shared: handles.len(),
        rendered,
        diagnostics: batch.failures,
    })
}

/// Share only cards that already exist, without rendering.
pub fn share_existing(
    resolver: &ShareResolver<'_>,
    keys: &[AssetKey],
    sheet: &mut dyn ShareSheet,
) -> CardResult<ShareSummary> {
    share_resolved(resolver.resolve_batch(keys), sheet)
}

/// [`share_existing`] over raw ids; ids that cannot name a card become diagnostics.
pub fn share_existing_ids<S: AsRef<str>>(
    resolver: &ShareResolver<'_>,
    ids: &[S],
    folder_label: &str,
    sheet: &mut dyn ShareSheet,
) -> CardResult<ShareSummary> {
    share_resolved(resolver.resolve_ids(ids, folder_label), sheet)
}

fn share_resolved(batch: ShareBatch, sheet: &mut dyn ShareSheet) -> CardResult<ShareSummary> {
    let batch = batch.into_result()?;
    let handles = batch.handles();
    let outcome = sheet.share(&handles, SHARE_TITLE)?;
    Ok(ShareSummary {
        outcome,
        shared: handles.len(),
        rendered: 0,
        diagnostics: batch.diagnostics,
    })
}
