use kurbo::Rect;

use crate::{
    assets::{
        color::{Rgba8, is_light_background, lighten, parse_paint},
        decode::PreparedImage,
    },
    catalogue::model::{ProductRenderSpec, RenderMode},
    foundation::error::{CardError, CardResult},
};

/// Card width in logical units.
pub const LOGICAL_WIDTH: f64 = 330.0;
/// Line-height multiplier for text without an explicit line height.
pub const NORMAL_LINE_HEIGHT: f64 = 1.2;

pub const PRICE_PADDING: f64 = 8.0;
pub const PRICE_FONT_PX: f64 = 19.0;
pub const PRICE_LINE_HEIGHT: f64 = 1.2;

pub const IMAGE_PADDING: f64 = 16.0;
pub const IMAGE_MAX_HEIGHT: f64 = 300.0;
/// Gap below the image panel that shows the card background.
pub const IMAGE_GAP: f64 = 1.0;

pub const BADGE_FONT_PX: f64 = 13.0;
pub const BADGE_PAD_X: f64 = 10.0;
pub const BADGE_PAD_Y: f64 = 6.0;
/// Distance of the badge from the panel's bottom and right edges.
pub const BADGE_INSET: f64 = 12.0;
pub const BADGE_OPACITY: f32 = 0.95;

pub const DETAILS_PADDING: f64 = 10.0;
pub const TITLE_FONT_PX: f64 = 28.0;
pub const TITLE_MARGIN: f64 = 3.0;
pub const SUBTITLE_FONT_PX: f64 = 18.0;
pub const SUBTITLE_MARGIN: f64 = 5.0;
pub const HEADER_MARGIN_BOTTOM: f64 = 6.0;
pub const ROW_FONT_PX: f64 = 17.0;
pub const ROW_LINE_HEIGHT: f64 = 1.4;
pub const ROW_MARGIN: f64 = 2.0;

/// Largest logical height the 3x surface can hold.
const MAX_LOGICAL_HEIGHT: f64 = (u16::MAX / 3) as f64;

/// Horizontal placement of a text run inside its line box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One line of text positioned in logical units.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub size_px: f64,
    pub italic: bool,
    pub color: Rgba8,
    pub align: TextAlign,
    /// Line box the run is vertically centered in.
    pub line: Rect,
}

/// Pill-shaped label anchored to the bottom-right of the image panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    /// Upper-cased label.
    pub label: String,
    pub fill: Rgba8,
    pub text_color: Rgba8,
    pub border: Rgba8,
    /// Right edge of the pill.
    pub right: f64,
    /// Bottom edge of the pill.
    pub bottom: f64,
}

impl Badge {
    /// Pill height; the width depends on the shaped label.
    pub fn height() -> f64 {
        BADGE_FONT_PX * NORMAL_LINE_HEIGHT + 2.0 * BADGE_PAD_Y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    PriceBar,
    ImagePanel,
    Details,
}

/// Positioned card block.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    PriceBar {
        rect: Rect,
        fill: Rgba8,
        text: TextRun,
    },
    ImagePanel {
        rect: Rect,
        fill: Rgba8,
        /// Destination of the fitted photo; `None` for a placeholder.
        image: Option<Rect>,
        badge: Option<Badge>,
    },
    Details {
        rect: Rect,
        fill: Rgba8,
        lines: Vec<TextRun>,
    },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::PriceBar { .. } => BlockKind::PriceBar,
            Self::ImagePanel { .. } => BlockKind::ImagePanel,
            Self::Details { .. } => BlockKind::Details,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Self::PriceBar { rect, .. }
            | Self::ImagePanel { rect, .. }
            | Self::Details { rect, .. } => *rect,
        }
    }
}

/// Ordered blocks of a card plus its overall geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    pub width: f64,
    pub height: f64,
    /// Fill behind every block.
    pub background: Rgba8,
    /// Light/dark classification of the image panel background.
    pub light_panel: bool,
    pub blocks: Vec<Block>,
}

impl CardLayout {
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }

    pub fn block(&self, kind: BlockKind) -> Option<&Block> {
        self.blocks.iter().find(|b| b.kind() == kind)
    }
}

/// Build the block layout of one card.
///
/// `image` must already be decoded; a placeholder yields an image panel of padding only.
pub fn compose(
    spec: &ProductRenderSpec,
    mode: RenderMode,
    image: &PreparedImage,
) -> CardResult<CardLayout> {
    let font_color = parse_paint(&spec.style.font_color);
    let bar_fill = parse_paint(&spec.style.bg_color);
    let lighter = parse_paint(&lighten(&spec.style.bg_color));
    let light_panel = is_light_background(&spec.style.image_bg_color);

    let mut blocks = Vec::with_capacity(3);
    let mut y = 0.0;

    if mode.price_on_top() {
        blocks.push(price_bar(spec, mode, font_color, bar_fill, &mut y));
    }
    blocks.push(image_panel(spec, image, light_panel, &mut y)?);
    y += IMAGE_GAP;
    blocks.push(details(spec, font_color, lighter, &mut y));
    if !mode.price_on_top() {
        blocks.push(price_bar(spec, mode, font_color, bar_fill, &mut y));
    }

    if !y.is_finite() || y > MAX_LOGICAL_HEIGHT {
        return Err(CardError::render(format!(
            "card height {y} exceeds surface limit {MAX_LOGICAL_HEIGHT}"
        )));
    }

    Ok(CardLayout {
        width: LOGICAL_WIDTH,
        height: y,
        background: lighter,
        light_panel,
        blocks,
    })
}

fn price_bar(
    spec: &ProductRenderSpec,
    mode: RenderMode,
    color: Rgba8,
    fill: Rgba8,
    y: &mut f64,
) -> Block {
    let line_h = PRICE_FONT_PX * PRICE_LINE_HEIGHT;
    let rect = Rect::new(0.0, *y, LOGICAL_WIDTH, *y + 2.0 * PRICE_PADDING + line_h);
    let line = Rect::new(
        PRICE_PADDING,
        *y + PRICE_PADDING,
        LOGICAL_WIDTH - PRICE_PADDING,
        *y + PRICE_PADDING + line_h,
    );
    *y = rect.y1;
    Block::PriceBar {
        rect,
        fill,
        text: TextRun {
            text: price_text(spec, mode),
            size_px: PRICE_FONT_PX,
            italic: false,
            color,
            align: TextAlign::Center,
            line,
        },
    }
}

/// `Price   :   ₹{value} {unit}` for the mode's price channel.
pub fn price_text(spec: &ProductRenderSpec, mode: RenderMode) -> String {
    format!("Price   :   ₹{}", spec.price_for(mode).display())
}

/// Fit `w`x`h` into the panel content box: contain, never upscale.
pub fn fit_image(w: u32, h: u32) -> (f64, f64) {
    if w == 0 || h == 0 {
        return (0.0, 0.0);
    }
    let (w, h) = (w as f64, h as f64);
    let max_w = LOGICAL_WIDTH - 2.0 * IMAGE_PADDING;
    let s = (max_w / w).min(IMAGE_MAX_HEIGHT / h).min(1.0);
    (w * s, h * s)
}

fn image_panel(
    spec: &ProductRenderSpec,
    image: &PreparedImage,
    light_panel: bool,
    y: &mut f64,
) -> CardResult<Block> {
    let (iw, ih) = fit_image(image.width, image.height);
    if !iw.is_finite() || !ih.is_finite() {
        return Err(CardError::render("fitted image size is not finite"));
    }
    let rect = Rect::new(0.0, *y, LOGICAL_WIDTH, *y + 2.0 * IMAGE_PADDING + ih);
    let dest = (!image.is_empty()).then(|| {
        let x0 = (LOGICAL_WIDTH - iw) / 2.0;
        Rect::new(x0, rect.y0 + IMAGE_PADDING, x0 + iw, rect.y0 + IMAGE_PADDING + ih)
    });

    let badge = spec
        .badge
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| {
            let (fill, text_color, border) = if light_panel {
                (Rgba8::WHITE, Rgba8::BLACK, Rgba8::BLACK.with_alpha(102))
            } else {
                (Rgba8::BLACK, Rgba8::WHITE, Rgba8::WHITE.with_alpha(102))
            };
            Badge {
                label: b.to_uppercase(),
                fill,
                text_color,
                border,
                right: rect.x1 - BADGE_INSET,
                bottom: rect.y1 - BADGE_INSET,
            }
        });

    *y = rect.y1;
    Ok(Block::ImagePanel {
        rect,
        fill: parse_paint(&spec.style.image_bg_color),
        image: dest,
        badge,
    })
}

struct Column {
    x0: f64,
    x1: f64,
    cursor: f64,
    color: Rgba8,
    lines: Vec<TextRun>,
}

impl Column {
    fn push(
        &mut self,
        text: String,
        size_px: f64,
        line_h: f64,
        margin: f64,
        italic: bool,
        align: TextAlign,
    ) {
        self.cursor += margin;
        self.lines.push(TextRun {
            text,
            size_px,
            italic,
            color: self.color,
            align,
            line: Rect::new(self.x0, self.cursor, self.x1, self.cursor + line_h),
        });
        self.cursor += line_h + margin;
    }
}

fn details(spec: &ProductRenderSpec, color: Rgba8, fill: Rgba8, y: &mut f64) -> Block {
    let top = *y;
    let mut col = Column {
        x0: DETAILS_PADDING,
        x1: LOGICAL_WIDTH - DETAILS_PADDING,
        cursor: top + DETAILS_PADDING,
        color,
        lines: Vec::new(),
    };

    col.push(
        spec.name.clone(),
        TITLE_FONT_PX,
        TITLE_FONT_PX * NORMAL_LINE_HEIGHT,
        TITLE_MARGIN,
        false,
        TextAlign::Center,
    );
    if let Some(sub) = spec.subtitle.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        col.push(
            format!("({sub})"),
            SUBTITLE_FONT_PX,
            SUBTITLE_FONT_PX * NORMAL_LINE_HEIGHT,
            SUBTITLE_MARGIN,
            true,
            TextAlign::Center,
        );
    }
    col.cursor += HEADER_MARGIN_BOTTOM;

    for text in detail_rows(spec) {
        col.push(
            text,
            ROW_FONT_PX,
            ROW_FONT_PX * ROW_LINE_HEIGHT,
            ROW_MARGIN,
            false,
            TextAlign::Left,
        );
    }

    let rect = Rect::new(0.0, top, LOGICAL_WIDTH, col.cursor + DETAILS_PADDING);
    *y = rect.y1;
    Block::Details {
        rect,
        fill,
        lines: col.lines,
    }
}

/// Colour, Package and Age Group rows.
pub fn detail_rows(spec: &ProductRenderSpec) -> [String; 3] {
    [
        format!("Colour          :   {}", spec.colour),
        format!("Package       :   {}", spec.package.display()),
        format!("Age Group   :   {}", spec.age.display()),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/layout/compositor.rs"]
mod tests;
