use std::sync::Arc;

use kurbo::Shape;

use crate::{
    assets::{color::Rgba8, decode::PreparedImage},
    config::settings::WatermarkConfig,
    foundation::error::{CardError, CardResult},
    layout::compositor::{
        BADGE_FONT_PX, BADGE_OPACITY, BADGE_PAD_X, Badge, Block, CardLayout, TextAlign, TextRun,
    },
    render::{
        encode::BOTTOM_CROP_PX,
        surface::CardSurface,
        text::{FaceKind, FontBook, FontFace, TextLayoutEngine},
        watermark,
    },
};

/// Supersampling factor from logical units to device pixels.
pub const SCALE: f64 = 3.0;

/// Uncropped premultiplied RGBA8 readback of one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

/// Draws [`CardLayout`]s into a [`CardSurface`].
///
/// Holds the text layout engine so font registration is shared across a batch. Every card
/// carries text, so rasterizing with an empty [`FontBook`] is an error.
pub struct CardRasterizer {
    fonts: FontBook,
    text: TextLayoutEngine,
}

impl CardRasterizer {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            text: TextLayoutEngine::new(),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Device-pixel height of the uncropped surface for `layout`.
    pub fn surface_height(layout: &CardLayout) -> CardResult<u16> {
        let h = (layout.height * SCALE).ceil();
        if !h.is_finite() || h <= BOTTOM_CROP_PX as f64 || h > u16::MAX as f64 {
            return Err(CardError::render(format!(
                "card height {h}px is outside the surface range"
            )));
        }
        Ok(h as u16)
    }

    /// Draw background, blocks and watermark, then read the surface back.
    pub fn rasterize(
        &mut self,
        surface: &mut CardSurface,
        layout: &CardLayout,
        image: &PreparedImage,
        mark: &WatermarkConfig,
    ) -> CardResult<RasterFrame> {
        if self.fonts.is_empty() {
            return Err(CardError::render("no font configured for card text"));
        }
        let height = Self::surface_height(layout)?;
        let width = surface.width();
        let cropped_h = u32::from(height) - BOTTOM_CROP_PX;
        let placement = watermark::place(mark, u32::from(width), cropped_h, layout.light_panel);

        let photo = image_paint(image)?;
        let bytes = surface.draw(height, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            fill_rect(ctx, Rgba8::WHITE, 0.0, 0.0, width as f64, height as f64);
            fill_rect(
                ctx,
                layout.background,
                0.0,
                0.0,
                layout.width * SCALE,
                layout.height * SCALE,
            );

            for block in &layout.blocks {
                self.draw_block(ctx, block, photo.as_ref())?;
            }

            if let Some(p) = &placement {
                self.draw_watermark(ctx, p)?;
            }
            Ok(())
        })?;

        Ok(RasterFrame {
            width: u32::from(width),
            height: u32::from(height),
            rgba8_premul: bytes,
        })
    }

    fn face(&self, kind: FaceKind) -> CardResult<(FaceKind, FontFace)> {
        self.fonts
            .face(kind)
            .map(|(k, f)| (k, f.clone()))
            .ok_or_else(|| CardError::render("no font configured for card text"))
    }

    fn draw_block(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        block: &Block,
        photo: Option<&ImagePaint>,
    ) -> CardResult<()> {
        match block {
            Block::PriceBar { rect, fill, text } => {
                fill_logical(ctx, *fill, rect);
                self.draw_run(ctx, text)
            }
            Block::ImagePanel {
                rect,
                fill,
                image,
                badge,
            } => {
                fill_logical(ctx, *fill, rect);
                if let (Some(dest), Some(p)) = (image, photo) {
                    let sx = dest.width() * SCALE / p.w as f64;
                    let sy = dest.height() * SCALE / p.h as f64;
                    ctx.set_transform(
                        vello_cpu::kurbo::Affine::translate((dest.x0 * SCALE, dest.y0 * SCALE))
                            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
                    );
                    ctx.set_paint(p.paint.clone());
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        0.0, 0.0, p.w as f64, p.h as f64,
                    ));
                }
                if let Some(b) = badge {
                    self.draw_badge(ctx, b)?;
                }
                Ok(())
            }
            Block::Details { rect, fill, lines } => {
                fill_logical(ctx, *fill, rect);
                for line in lines {
                    self.draw_run(ctx, line)?;
                }
                Ok(())
            }
        }
    }

    fn draw_run(&mut self, ctx: &mut vello_cpu::RenderContext, run: &TextRun) -> CardResult<()> {
        let kind = if run.italic {
            FaceKind::Italic
        } else {
            FaceKind::Regular
        };
        let (kind, face) = self.face(kind)?;

        let line_w = run.line.width() * SCALE;
        let line_h = run.line.height() * SCALE;
        let mut size = run.size_px * SCALE;
        let mut layout = self
            .text
            .layout_line(&run.text, kind, &face, size as f32, run.color)?;
        let w = f64::from(layout.width());
        if run.align == TextAlign::Center && w > line_w && w > 0.0 {
            size *= line_w / w;
            layout = self
                .text
                .layout_line(&run.text, kind, &face, size as f32, run.color)?;
        }

        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        let x = match run.align {
            TextAlign::Left => run.line.x0 * SCALE,
            TextAlign::Center => run.line.x0 * SCALE + (line_w - w) / 2.0,
        };
        let y = run.line.y0 * SCALE + (line_h - h) / 2.0;
        fill_glyphs(ctx, &face, &layout, x, y);
        Ok(())
    }

    fn draw_badge(&mut self, ctx: &mut vello_cpu::RenderContext, badge: &Badge) -> CardResult<()> {
        let size = BADGE_FONT_PX * SCALE;
        let (kind, face) = self.face(FaceKind::Regular)?;
        let layout = self
            .text
            .layout_line(&badge.label, kind, &face, size as f32, badge.text_color)?;
        let text_w = f64::from(layout.width());

        let h = Badge::height() * SCALE;
        let x1 = badge.right * SCALE;
        let y1 = badge.bottom * SCALE;
        let x0 = x1 - text_w - 2.0 * BADGE_PAD_X * SCALE;
        let y0 = y1 - h;

        ctx.push_opacity_layer(BADGE_OPACITY);
        fill_pill(ctx, badge.border, x0, y0, x1, y1);
        fill_pill(ctx, badge.fill, x0 + SCALE, y0 + SCALE, x1 - SCALE, y1 - SCALE);
        let th = f64::from(layout.height());
        let tx = x0 + BADGE_PAD_X * SCALE;
        let ty = y0 + (h - th) / 2.0;
        fill_glyphs(ctx, &face, &layout, tx, ty);
        ctx.pop_layer();
        Ok(())
    }

    fn draw_watermark(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        p: &watermark::WatermarkPlacement,
    ) -> CardResult<()> {
        let (kind, face) = self.face(FaceKind::Regular)?;
        let layout = self
            .text
            .layout_line(&p.text, kind, &face, p.size_px as f32, p.color)?;
        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        let (x, y) = p.origin(w, h);
        fill_glyphs(ctx, &face, &layout, x, y);
        Ok(())
    }
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

fn image_paint(image: &PreparedImage) -> CardResult<Option<ImagePaint>> {
    if image.is_empty() {
        return Ok(None);
    }
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(Some(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: image.width,
        h: image.height,
    }))
}

fn fill_logical(ctx: &mut vello_cpu::RenderContext, color: Rgba8, r: &kurbo::Rect) {
    fill_rect(
        ctx,
        color,
        r.x0 * SCALE,
        r.y0 * SCALE,
        r.x1 * SCALE,
        r.y1 * SCALE,
    );
}

fn fill_rect(
    ctx: &mut vello_cpu::RenderContext,
    color: Rgba8,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color.to_paint());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x0, y0, x1, y1));
}

fn fill_pill(
    ctx: &mut vello_cpu::RenderContext,
    color: Rgba8,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let radius = (y1 - y0) / 2.0;
    let pill = kurbo::RoundedRect::new(x0, y0, x1, y1, radius).to_path(0.1);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color.to_paint());
    ctx.fill_path(&bezpath_to_cpu(&pill));
}

fn fill_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    face: &FontFace,
    layout: &parley::Layout<Rgba8>,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(brush.to_paint());
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(face.data())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CardError::render("image byte len mismatch"));
    }
    let mut translucent = false;
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            translucent |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        translucent,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
