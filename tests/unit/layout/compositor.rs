use std::sync::Arc;

use super::*;
use crate::catalogue::model::Measure;

fn product() -> ProductRenderSpec {
    let mut p = ProductRenderSpec::new("1", "Frock");
    p.subtitle = Some("Cotton".to_string());
    p.colour = "Red".to_string();
    p.package = Measure::new("10", "pcs / set");
    p.age = Measure::new("3", "years");
    p.wholesale = Measure::new("250", "/ piece");
    p.resell = Measure::new("300", "None");
    p
}

fn image(w: u32, h: u32) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    }
}

fn assert_stacked(layout: &CardLayout) {
    let mut y = 0.0;
    for b in &layout.blocks {
        let r = b.rect();
        assert!(r.y0 >= y - 1e-9, "{:?} overlaps previous block", b.kind());
        assert_eq!(r.width(), LOGICAL_WIDTH);
        y = r.y1;
    }
    assert!((layout.height - y).abs() < 1e-9);
}

#[test]
fn wholesale_puts_price_bar_first() {
    let layout = compose(&product(), RenderMode::Wholesale, &image(10, 10)).unwrap();
    assert_eq!(
        layout.kinds(),
        vec![BlockKind::PriceBar, BlockKind::ImagePanel, BlockKind::Details]
    );
    assert_stacked(&layout);
}

#[test]
fn resell_puts_price_bar_last() {
    let layout = compose(&product(), RenderMode::Resell, &image(10, 10)).unwrap();
    assert_eq!(
        layout.kinds(),
        vec![BlockKind::ImagePanel, BlockKind::Details, BlockKind::PriceBar]
    );
    assert_stacked(&layout);
}

#[test]
fn mode_changes_order_not_height() {
    let p = product();
    let img = image(40, 80);
    let w = compose(&p, RenderMode::Wholesale, &img).unwrap();
    let r = compose(&p, RenderMode::Resell, &img).unwrap();
    assert!((w.height - r.height).abs() < 1e-9);
}

#[test]
fn price_text_uses_mode_channel_and_suppresses_none_unit() {
    let p = product();
    assert_eq!(
        price_text(&p, RenderMode::Wholesale),
        "Price   :   ₹250 / piece"
    );
    assert_eq!(price_text(&p, RenderMode::Resell), "Price   :   ₹300");
}

#[test]
fn placeholder_image_yields_padding_only_panel() {
    let layout = compose(&product(), RenderMode::Wholesale, &PreparedImage::placeholder()).unwrap();
    let Some(Block::ImagePanel { rect, image, .. }) = layout.block(BlockKind::ImagePanel) else {
        panic!("missing image panel");
    };
    assert_eq!(rect.height(), 2.0 * IMAGE_PADDING);
    assert!(image.is_none());
}

#[test]
fn image_is_contained_centered_and_never_upscaled() {
    assert_eq!(fit_image(100, 50), (100.0, 50.0));
    let (w, h) = fit_image(1000, 500);
    assert!((w - 298.0).abs() < 1e-9);
    assert!((h - 149.0).abs() < 1e-9);
    let (w, h) = fit_image(100, 1000);
    assert!((w - 30.0).abs() < 1e-9);
    assert!((h - IMAGE_MAX_HEIGHT).abs() < 1e-9);

    let layout = compose(&product(), RenderMode::Resell, &image(100, 50)).unwrap();
    let Some(Block::ImagePanel { rect, image, .. }) = layout.block(BlockKind::ImagePanel) else {
        panic!("missing image panel");
    };
    let dest = image.unwrap();
    assert!((dest.x0 - 115.0).abs() < 1e-9);
    assert!((dest.y0 - (rect.y0 + IMAGE_PADDING)).abs() < 1e-9);
    assert_eq!(rect.height(), 2.0 * IMAGE_PADDING + 50.0);
}

#[test]
fn badge_is_uppercased_and_anchored_bottom_right() {
    let mut p = product();
    p.badge = Some("new".to_string());
    let layout = compose(&p, RenderMode::Wholesale, &image(10, 10)).unwrap();
    let Some(Block::ImagePanel { rect, badge, .. }) = layout.block(BlockKind::ImagePanel) else {
        panic!("missing image panel");
    };
    let badge = badge.as_ref().unwrap();
    assert_eq!(badge.label, "NEW");
    assert_eq!(badge.right, rect.x1 - BADGE_INSET);
    assert_eq!(badge.bottom, rect.y1 - BADGE_INSET);
    assert_eq!(badge.fill, Rgba8::WHITE);
    assert_eq!(badge.text_color, Rgba8::BLACK);

    p.style.image_bg_color = "#222222".to_string();
    let layout = compose(&p, RenderMode::Wholesale, &image(10, 10)).unwrap();
    assert!(!layout.light_panel);
    let Some(Block::ImagePanel { badge, .. }) = layout.block(BlockKind::ImagePanel) else {
        panic!("missing image panel");
    };
    assert_eq!(badge.as_ref().unwrap().fill, Rgba8::BLACK);
}

#[test]
fn blank_badge_and_subtitle_are_omitted() {
    let mut p = product();
    p.badge = Some("  ".to_string());
    p.subtitle = None;
    let layout = compose(&p, RenderMode::Wholesale, &image(10, 10)).unwrap();
    let Some(Block::ImagePanel { badge, .. }) = layout.block(BlockKind::ImagePanel) else {
        panic!("missing image panel");
    };
    assert!(badge.is_none());
    let Some(Block::Details { lines, .. }) = layout.block(BlockKind::Details) else {
        panic!("missing details");
    };
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].text, "Frock");
    assert!(lines[1].text.starts_with("Colour"));
}

#[test]
fn details_use_lightened_background_and_italic_subtitle() {
    let layout = compose(&product(), RenderMode::Wholesale, &image(10, 10)).unwrap();
    let lighter = Rgba8::opaque(213, 255, 255);
    assert_eq!(layout.background, lighter);
    let Some(Block::Details { fill, lines, .. }) = layout.block(BlockKind::Details) else {
        panic!("missing details");
    };
    assert_eq!(*fill, lighter);
    assert_eq!(lines[1].text, "(Cotton)");
    assert!(lines[1].italic);
    assert_eq!(lines[1].align, TextAlign::Center);
    assert_eq!(lines[2].align, TextAlign::Left);
    assert!(lines[3].text.ends_with("10 pcs / set"));
    assert!(lines[4].text.ends_with("3 years"));

    let Some(Block::PriceBar { fill, .. }) = layout.block(BlockKind::PriceBar) else {
        panic!("missing price bar");
    };
    assert_eq!(*fill, Rgba8::opaque(0xad, 0xd8, 0xe6));
}
