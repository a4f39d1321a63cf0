use super::*;

#[test]
fn font_size_tracks_width_with_floor() {
    assert_eq!(font_size_px(990), 24.75);
    assert_eq!(font_size_px(400), 12.0);
    assert_eq!(font_size_px(100), 12.0);
}

#[test]
fn disabled_or_blank_watermark_is_not_placed() {
    assert!(place(&WatermarkConfig::disabled(), 990, 1500, true).is_none());
    let blank = WatermarkConfig {
        text: "   ".to_string(),
        ..WatermarkConfig::default()
    };
    assert!(place(&blank, 990, 1500, true).is_none());
}

#[test]
fn default_placement_is_centered_and_bottom_anchored() {
    let p = place(&WatermarkConfig::default(), 990, 1500, true).unwrap();
    assert_eq!(p.text, "created using CatShare");
    assert_eq!(p.position, WatermarkPosition::BottomCenter);
    assert_eq!((p.x, p.y), (495.0, 1500.0 - 24.0));
    assert_eq!(p.origin(100.0, 30.0), (445.0, 1500.0 - 24.0 - 30.0));
    assert_eq!(p.color, Rgba8 { r: 0, g: 0, b: 0, a: 64 });

    let dark = place(&WatermarkConfig::default(), 990, 1500, false).unwrap();
    assert_eq!(dark.color, Rgba8 { r: 255, g: 255, b: 255, a: 102 });
}

#[test]
fn every_grid_position_keeps_the_box_inside_the_margins() {
    let (w, h) = (990.0, 1500.0);
    let (bw, bh) = (200.0, 30.0);
    for position in WatermarkPosition::ALL {
        let config = WatermarkConfig {
            position,
            ..WatermarkConfig::default()
        };
        let p = place(&config, 990, 1500, true).unwrap();
        let (x0, y0) = p.origin(bw, bh);

        match position.anchor_x() {
            AnchorX::Left => assert_eq!(x0, EDGE_MARGIN_PX),
            AnchorX::Center => assert_eq!(x0 + bw / 2.0, w / 2.0),
            AnchorX::Right => assert_eq!(x0 + bw, w - EDGE_MARGIN_PX),
        }
        match position.anchor_y() {
            AnchorY::Top => assert_eq!(y0, EDGE_MARGIN_PX),
            AnchorY::Middle => assert_eq!(y0 + bh / 2.0, h / 2.0),
            AnchorY::Bottom => assert_eq!(y0 + bh, h - EDGE_MARGIN_PX),
        }
    }
}
