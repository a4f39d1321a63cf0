use crate::{
    assets::color::Rgba8,
    config::settings::{AnchorX, AnchorY, WatermarkConfig, WatermarkPosition},
    render::raster::SCALE,
};

/// Smallest watermark font size in device pixels.
pub const MIN_FONT_PX: f64 = 12.0;
/// Distance of the watermark line box from the edge(s) it is anchored to, in device pixels.
pub const EDGE_MARGIN_PX: f64 = 8.0 * SCALE;

/// Watermark line resolved against a concrete output size (device pixels).
#[derive(Clone, Debug, PartialEq)]
pub struct WatermarkPlacement {
    pub text: String,
    pub size_px: f64,
    pub color: Rgba8,
    pub position: WatermarkPosition,
    /// Left edge, center or right edge of the line box, per `position`.
    pub x: f64,
    /// Top, middle or bottom of the line box, per `position`.
    pub y: f64,
}

impl WatermarkPlacement {
    /// Top-left corner of a `w` x `h` line box at this anchor.
    pub fn origin(&self, w: f64, h: f64) -> (f64, f64) {
        let x = match self.position.anchor_x() {
            AnchorX::Left => self.x,
            AnchorX::Center => self.x - w / 2.0,
            AnchorX::Right => self.x - w,
        };
        let y = match self.position.anchor_y() {
            AnchorY::Top => self.y,
            AnchorY::Middle => self.y - h / 2.0,
            AnchorY::Bottom => self.y - h,
        };
        (x, y)
    }
}

/// `max(12, output_width / 40)`.
pub fn font_size_px(output_width: u32) -> f64 {
    (output_width as f64 / 40.0).max(MIN_FONT_PX)
}

/// `rgba(0,0,0,0.25)` over light panels, `rgba(255,255,255,0.4)` otherwise.
pub fn fill(light_panel: bool) -> Rgba8 {
    if light_panel {
        Rgba8::BLACK.with_alpha(64)
    } else {
        Rgba8::WHITE.with_alpha(102)
    }
}

/// Resolve the watermark for an output of `output_width` x `output_height` (after cropping).
///
/// Returns `None` when the watermark is disabled or its text is blank.
pub fn place(
    config: &WatermarkConfig,
    output_width: u32,
    output_height: u32,
    light_panel: bool,
) -> Option<WatermarkPlacement> {
    if !config.is_visible() {
        return None;
    }
    let (w, h) = (output_width as f64, output_height as f64);
    let x = match config.position.anchor_x() {
        AnchorX::Left => EDGE_MARGIN_PX,
        AnchorX::Center => w / 2.0,
        AnchorX::Right => (w - EDGE_MARGIN_PX).max(0.0),
    };
    let y = match config.position.anchor_y() {
        AnchorY::Top => EDGE_MARGIN_PX,
        AnchorY::Middle => h / 2.0,
        AnchorY::Bottom => (h - EDGE_MARGIN_PX).max(0.0),
    };
    Some(WatermarkPlacement {
        text: config.text.trim().to_string(),
        size_px: font_size_px(output_width),
        color: fill(light_panel),
        position: config.position,
        x,
        y,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/watermark.rs"]
mod tests;
