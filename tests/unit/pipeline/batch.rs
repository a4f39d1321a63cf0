use std::{io::Cursor, path::PathBuf};

use super::*;
use crate::{
    assets::{source::FsImageSource, store::FsAssetStore},
    catalogue::{model::ImageRef, repository::MemoryCatalogue},
    config::{card::FontPaths, settings::MemorySettings},
};

fn fonts() -> FontBook {
    FontBook::from_paths(&FontPaths {
        regular: Some("tests/data/fonts/DejaVuSans.ttf".into()),
        italic: Some("tests/data/fonts/DejaVuSans-Oblique.ttf".into()),
    })
    .unwrap()
}

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "catshare_batch_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 40, 40, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn product(id: &str, image: Option<ImageRef>) -> ProductRenderSpec {
    let mut p = ProductRenderSpec::new(id, format!("Product {id}"));
    p.image = image;
    p
}

/// Store whose writes always fail.
struct ReadOnlyStore(FsAssetStore);

impl AssetStore for ReadOnlyStore {
    fn exists(&self, key: &AssetKey) -> bool {
        self.0.exists(key)
    }
    fn write(&self, _key: &AssetKey, _bytes: &[u8]) -> CardResult<()> {
        Err(CardError::validation("read-only store"))
    }
    fn read(&self, key: &AssetKey) -> CardResult<Vec<u8>> {
        self.0.read(key)
    }
    fn resolve_handle(&self, key: &AssetKey) -> CardResult<String> {
        self.0.resolve_handle(key)
    }
    fn delete(&self, key: &AssetKey) -> CardResult<()> {
        self.0.delete(key)
    }
}

#[test]
fn batch_records_each_failure_kind_without_aborting() {
    let root = temp_root("kinds");
    let store = FsAssetStore::new(root.join("export"));
    let images = FsImageSource::new(root.join("data"));
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::from_products([
        product("ok", Some(ImageRef::Inline(png(8, 8)))),
        product("noimg", None),
        product("badpath", Some(ImageRef::Stored("missing/photo.png".to_string()))),
        product("garbage", Some(ImageRef::Inline(b"not an image".to_vec()))),
    ]);

    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts());
    let mut surface = CardSurface::acquire().unwrap();
    let mut seen = Vec::new();
    let mut progress = |done: usize, total: usize| seen.push((done, total));
    let ids = ["ok", "ghost", "noimg", "badpath", "garbage"];
    let batch = renderer
        .render_batch(&mut surface, &ids, &CardTarget::wholesale(), &mut progress)
        .unwrap();

    assert_eq!(seen, (1..=5).map(|i| (i, 5)).collect::<Vec<_>>());
    let ok: Vec<&str> = batch.successes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ok, vec!["ok", "garbage"]);
    assert!(batch.successes.iter().all(|s| s.rendered));

    let reasons: Vec<(&str, FailureReason)> = batch
        .failures
        .iter()
        .map(|d| (d.id.as_str(), d.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("ghost", FailureReason::ProductMissing),
            ("noimg", FailureReason::ImageMissing),
            ("badpath", FailureReason::ImageMissing),
        ]
    );
    assert_eq!(batch.failures[0].path, "Wholesale/product_ghost_Wholesale.png");
    assert!(batch.failures[2].detail.is_some());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn existing_cards_are_reused_not_rerendered() {
    let root = temp_root("reuse");
    let store = FsAssetStore::new(&root);
    let images = FsImageSource::new(&root);
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::from_products([product("1", Some(ImageRef::Inline(png(4, 4))))]);
    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts());
    let mut surface = CardSurface::acquire().unwrap();

    let first = renderer
        .render_batch(&mut surface, &["1"], &CardTarget::resell(), &mut NoProgress)
        .unwrap();
    assert_eq!(first.rendered_count(), 1);
    assert!(matches!(first.successes[0].handle, ShareHandle::FileUri(_)));

    let second = renderer
        .render_batch(&mut surface, &["1"], &CardTarget::resell(), &mut NoProgress)
        .unwrap();
    assert_eq!(second.rendered_count(), 0);
    assert_eq!(second.successes.len(), 1);
    assert_eq!(surface.renders(), 1);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn failed_write_is_persist_failure() {
    let root = temp_root("persist");
    let store = ReadOnlyStore(FsAssetStore::new(&root));
    let images = FsImageSource::new(&root);
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::from_products([product("1", Some(ImageRef::Inline(png(4, 4))))]);
    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts());
    let mut surface = CardSurface::acquire().unwrap();

    let batch = renderer
        .render_batch(&mut surface, &["1"], &CardTarget::wholesale(), &mut NoProgress)
        .unwrap();
    assert!(batch.successes.is_empty());
    assert_eq!(batch.failures[0].reason, FailureReason::PersistFailure);
    assert!(!batch.is_complete());
}

#[test]
fn invalid_folder_label_is_fatal() {
    let root = temp_root("label");
    let store = FsAssetStore::new(&root);
    let images = FsImageSource::new(&root);
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::new();
    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts());
    let mut surface = CardSurface::acquire().unwrap();

    let target = CardTarget::new(crate::catalogue::model::RenderMode::Resell, "../escape");
    assert!(matches!(
        renderer.render_batch(&mut surface, &["1"], &target, &mut NoProgress),
        Err(CardError::Validation(_))
    ));
}

#[test]
fn rendered_card_has_cropped_3x_dimensions() {
    let root = temp_root("dims");
    let store = FsAssetStore::new(&root);
    let images = FsImageSource::new(&root);
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::new();
    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts());
    let mut surface = CardSurface::acquire().unwrap();

    let spec = product("1", Some(ImageRef::Inline(png(100, 50))));
    let asset = renderer
        .render_product(&mut surface, &spec, &CardTarget::wholesale())
        .unwrap();
    let layout = compose(
        &spec,
        crate::catalogue::model::RenderMode::Wholesale,
        &crate::assets::decode::decode_image(&png(100, 50)).unwrap(),
    )
    .unwrap();
    let img = image::load_from_memory(&asset.png).unwrap();
    assert_eq!(img.width(), 990);
    assert_eq!(img.height(), (layout.height * 3.0).ceil() as u32 - 3);
}

#[test]
fn fontless_render_is_a_rasterize_failure() {
    let root = temp_root("nofont");
    let store = FsAssetStore::new(&root);
    let images = FsImageSource::new(&root);
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::from_products([product("1", Some(ImageRef::Inline(png(4, 4))))]);
    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, FontBook::empty());
    let mut surface = CardSurface::acquire().unwrap();

    let batch = renderer
        .render_batch(&mut surface, &["1"], &CardTarget::wholesale(), &mut NoProgress)
        .unwrap();
    assert!(batch.successes.is_empty());
    assert_eq!(
        batch.failures[0].reason,
        FailureReason::RenderFailure(RenderStage::Rasterize)
    );
    assert!(batch.failures[0].detail.as_deref().unwrap().contains("font"));
    assert!(!store.exists(&AssetKey::new("1", "Wholesale").unwrap()));
    assert_eq!(surface.renders(), 0);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn cards_with_different_text_differ() {
    let root = temp_root("text_differs");
    let store = FsAssetStore::new(&root);
    let images = FsImageSource::new(&root);
    let settings = MemorySettings::default();
    let catalogue = MemoryCatalogue::new();
    let mut renderer = CardRenderer::new(&store, &catalogue, &images, &settings, fonts());
    let mut surface = CardSurface::acquire().unwrap();

    let mut a = product("1", Some(ImageRef::Inline(png(4, 4))));
    a.wholesale = crate::catalogue::model::Measure::new("99", "pcs");
    let mut b = a.clone();
    b.name = "Completely different".to_string();
    b.wholesale = crate::catalogue::model::Measure::new("12345", "box");

    let target = CardTarget::wholesale();
    let a = renderer.render_product(&mut surface, &a, &target).unwrap();
    let b = renderer.render_product(&mut surface, &b, &target).unwrap();
    assert_ne!(a.png, b.png);
}
