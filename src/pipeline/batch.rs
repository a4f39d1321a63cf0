use serde::Serialize;

use crate::{
    assets::{
        decode::decode_or_placeholder,
        source::ImageSource,
        store::{AssetKey, AssetStore, expected_rel_path},
    },
    catalogue::model::{CardTarget, ProductRenderSpec, ProductRepository},
    config::settings::{SettingsProvider, WatermarkConfig},
    foundation::{
        diagnostics::{FailureReason, ItemDiagnostic, RenderStage},
        error::{CardError, CardResult},
    },
    layout::compositor::compose,
    render::{
        encode::{RenderedAsset, encode_card},
        raster::CardRasterizer,
        surface::CardSurface,
        text::FontBook,
    },
    share::resolver::{ShareHandle, ShareResolver},
};

/// Receives `(processed, total)` after every batch item.
pub trait ProgressSink {
    fn report(&mut self, processed: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn report(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Progress sink that drops every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _processed: usize, _total: usize) {}
}

/// A batch item that ended with a share handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardSuccess {
    pub id: String,
    pub path: String,
    pub handle: ShareHandle,
    /// False when an existing card was reused.
    pub rendered: bool,
}

/// Successes and failures of one [`CardRenderer::render_batch`] call, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderBatch {
    pub successes: Vec<CardSuccess>,
    pub failures: Vec<ItemDiagnostic>,
}

impl RenderBatch {
    /// Number of cards that were actually rendered (not reused).
    pub fn rendered_count(&self) -> usize {
        self.successes.iter().filter(|s| s.rendered).count()
    }

    pub fn handles(&self) -> Vec<ShareHandle> {
        self.successes.iter().map(|s| s.handle.clone()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolve-or-render driver over the pipeline's collaborators.
pub struct CardRenderer<'a> {
    store: &'a dyn AssetStore,
    products: &'a dyn ProductRepository,
    images: &'a dyn ImageSource,
    settings: &'a dyn SettingsProvider,
    resolver: ShareResolver<'a>,
    raster: CardRasterizer,
}

impl<'a> CardRenderer<'a> {
    pub fn new(
        store: &'a dyn AssetStore,
        products: &'a dyn ProductRepository,
        images: &'a dyn ImageSource,
        settings: &'a dyn SettingsProvider,
        fonts: FontBook,
    ) -> Self {
        Self {
            store,
            products,
            images,
            settings,
            resolver: ShareResolver::new(store),
            raster: CardRasterizer::new(fonts),
        }
    }

    /// Replace the handle-resolution chain used after a card exists.
    pub fn with_resolver(mut self, resolver: ShareResolver<'a>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn store(&self) -> &'a dyn AssetStore {
        self.store
    }

    pub fn resolver(&self) -> &ShareResolver<'a> {
        &self.resolver
    }

    /// Make sure a card exists for every id and resolve its handle.
    ///
    /// Items are processed strictly in order. Per-item failures are recorded and never abort
    /// the batch; the only error is an invalid folder label.
    #[tracing::instrument(skip_all, fields(ids = ids.len(), folder = %target.folder_label))]
    pub fn render_batch<S: AsRef<str>>(
        &mut self,
        surface: &mut CardSurface,
        ids: &[S],
        target: &CardTarget,
        progress: &mut dyn ProgressSink,
    ) -> CardResult<RenderBatch> {
        // The placeholder id only checks that the label is a valid path segment.
        AssetKey::new("_", target.folder_label.as_str())?;

        let total = ids.len();
        let mut out = RenderBatch::default();
        for (i, id) in ids.iter().enumerate() {
            match self.render_one(surface, id.as_ref(), target) {
                Ok(s) => out.successes.push(s),
                Err(d) => {
                    tracing::warn!(diagnostic = %d, "card unavailable");
                    out.failures.push(d);
                }
            }
            progress.report(i + 1, total);
        }

        tracing::info!(
            rendered = out.rendered_count(),
            reused = out.successes.len() - out.rendered_count(),
            failed = out.failures.len(),
            "render batch finished"
        );
        Ok(out)
    }

    fn render_one(
        &mut self,
        surface: &mut CardSurface,
        id: &str,
        target: &CardTarget,
    ) -> Result<CardSuccess, ItemDiagnostic> {
        let label = target.folder_label.as_str();
        let key = AssetKey::new(id, label).map_err(|e| {
            ItemDiagnostic::new(id, expected_rel_path(id, label), FailureReason::ProductMissing)
                .with_detail(e)
        })?;

        if self.store.exists(&key) {
            let r = self.resolver.resolve_existing(&key)?;
            tracing::debug!(path = %key, "reusing existing card");
            return Ok(CardSuccess {
                id: id.to_string(),
                path: r.path,
                handle: r.handle,
                rendered: false,
            });
        }

        let diag = |reason| ItemDiagnostic::new(id, key.rel_path(), reason);
        let spec = self
            .products
            .get_by_id(id)
            .ok_or_else(|| diag(FailureReason::ProductMissing))?;

        let asset = self.render_product(surface, &spec, target)?;
        self.store
            .write(&key, &asset.png)
            .map_err(|e| diag(FailureReason::PersistFailure).with_detail(e))?;
        tracing::debug!(
            path = %key,
            sha256 = %asset.digest_hex(),
            bytes = asset.png.len(),
            "card written"
        );

        let r = self.resolver.resolve_existing(&key)?;
        Ok(CardSuccess {
            id: id.to_string(),
            path: r.path,
            handle: r.handle,
            rendered: true,
        })
    }

    /// Render `spec` for `target` without touching the asset store.
    pub fn render_product(
        &mut self,
        surface: &mut CardSurface,
        spec: &ProductRenderSpec,
        target: &CardTarget,
    ) -> Result<RenderedAsset, ItemDiagnostic> {
        let key = AssetKey::new(spec.id.as_str(), target.folder_label.as_str()).map_err(|e| {
            ItemDiagnostic::new(
                spec.id.as_str(),
                expected_rel_path(&spec.id, &target.folder_label),
                FailureReason::ProductMissing,
            )
            .with_detail(e)
        })?;
        let diag = |reason| ItemDiagnostic::new(spec.id.as_str(), key.rel_path(), reason);

        let image_ref = spec
            .image
            .as_ref()
            .ok_or_else(|| diag(FailureReason::ImageMissing))?;
        let bytes = self
            .images
            .load(image_ref)
            .map_err(|e| diag(FailureReason::ImageMissing).with_detail(e))?;
        let image = decode_or_placeholder(&bytes);

        let failed = |stage: RenderStage, e: CardError| {
            diag(FailureReason::RenderFailure(stage)).with_detail(e)
        };
        let layout =
            compose(spec, target.mode, &image).map_err(|e| failed(RenderStage::Compose, e))?;
        let mark = self.watermark();
        let frame = self
            .raster
            .rasterize(surface, &layout, &image, &mark)
            .map_err(|e| failed(RenderStage::Rasterize, e))?;
        let png = encode_card(&frame).map_err(|e| failed(RenderStage::Encode, e))?;
        Ok(RenderedAsset::new(&key, png))
    }

    fn watermark(&self) -> WatermarkConfig {
        match self.settings.watermark() {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, "settings unavailable, using default watermark");
                WatermarkConfig::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
