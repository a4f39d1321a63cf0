//! CatShare cards: deterministic product card rendering and share resolution.
//!
//! A card is a PNG composited from a product record: a price bar, the product photo with an
//! optional badge, and a details panel, with an optional watermark. The crate renders cards
//! on demand, stores them under a deterministic path and turns them into share handles.
//!
//! # Pipeline overview
//!
//! 1. **Compose**: `ProductRenderSpec + RenderMode -> CardLayout` (pure, logical units)
//! 2. **Rasterize**: `CardLayout -> RasterFrame` (3x CPU surface, blocks then watermark)
//! 3. **Encode**: `RasterFrame -> PNG` (3-row bottom crop, straight alpha)
//! 4. **Store**: `AssetKey -> {folder}/product_{id}_{folder}.png`
//! 5. **Resolve**: `AssetKey -> ShareHandle` via ordered fallback strategies
//!
//! [`CardRenderer::render_batch`] drives steps 1-5 for a batch of ids, rendering only what is
//! missing. Per-item problems are recorded as [`ItemDiagnostic`] values and never abort a
//! batch.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same record, mode and watermark settings give identical bytes.
//! - **Single surface**: one [`CardSurface`] is borrowed mutably for a whole batch.
//! - **Live settings**: watermark settings are read from a [`SettingsProvider`] on every render.
#![forbid(unsafe_code)]

/// Colors, image decoding, photo sources and card storage.
pub mod assets;
/// Product records, catalogues and render targets.
pub mod catalogue;
/// Configuration file and user settings.
pub mod config;
mod foundation;
/// Card block layout.
pub mod layout;
/// Batch orchestration.
pub mod pipeline;
/// Rasterization and encoding.
pub mod render;
/// Share handle resolution and share flow.
pub mod share;

pub use crate::assets::color::{Rgba8, is_light_background, lighten, parse_paint};
pub use crate::assets::decode::{PreparedImage, decode_image, decode_or_placeholder};
pub use crate::assets::source::{FsImageSource, ImageSource};
pub use crate::assets::store::{
    AssetKey, AssetStore, FsAssetStore, expected_rel_path, normalize_rel_path,
};
pub use crate::catalogue::model::{
    CardStyle, CardTarget, ImageRef, Measure, ProductRenderSpec, ProductRepository, RenderMode,
};
pub use crate::catalogue::repository::{JsonCatalogue, MemoryCatalogue, remove_product_assets};
pub use crate::config::card::{CardConfig, FontPaths};
pub use crate::config::settings::{
    JsonFileSettings, MemorySettings, SettingsProvider, WatermarkConfig, WatermarkPosition,
};
pub use crate::foundation::diagnostics::{FailureReason, ItemDiagnostic, RenderStage};
pub use crate::foundation::error::{CardError, CardResult};
pub use crate::layout::compositor::{Block, BlockKind, CardLayout, compose};
pub use crate::pipeline::batch::{CardRenderer, CardSuccess, NoProgress, ProgressSink, RenderBatch};
pub use crate::render::encode::{RenderedAsset, encode_card};
pub use crate::render::raster::{CardRasterizer, RasterFrame};
pub use crate::render::surface::CardSurface;
pub use crate::render::text::{FaceKind, FontBook, FontFace};
pub use crate::share::flow::{
    SHARE_TITLE, ShareOutcome, ShareSheet, ShareSummary, share_existing, share_existing_ids,
    share_products,
};
pub use crate::share::report::ShareReport;
pub use crate::share::resolver::{
    InlineDataUri, PlatformUri, ResolveStrategy, ResolvedShare, ShareBatch, ShareHandle,
    ShareResolver,
};
