use crate::foundation::error::{CardError, CardResult};

/// Render width in device pixels: 330 logical units at 3x.
pub const RENDER_WIDTH_PX: u16 = 990;

/// Off-screen drawing surface shared by every card of a batch.
///
/// The surface is exclusive by construction: rendering borrows it mutably, so at most one card
/// draws into it at a time. The `vello_cpu` context and readback pixmap are reused while the
/// card height stays the same and reallocated otherwise.
pub struct CardSurface {
    width: u16,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
    renders: u64,
}

impl std::fmt::Debug for CardSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardSurface")
            .field("width", &self.width)
            .field("height", &self.ctx.as_ref().map(|c| c.height()))
            .field("renders", &self.renders)
            .finish()
    }
}

impl CardSurface {
    /// Acquire a surface of the standard card width.
    pub fn acquire() -> CardResult<Self> {
        Self::acquire_with_width(RENDER_WIDTH_PX)
    }

    pub fn acquire_with_width(width: u16) -> CardResult<Self> {
        if width == 0 {
            return Err(CardError::surface("surface width must be > 0"));
        }
        tracing::debug!(width, "acquired card surface");
        Ok(Self {
            width,
            ctx: Some(vello_cpu::RenderContext::new(width, 1)),
            pixmap: None,
            renders: 0,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of completed draws.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Reset the surface to `height` rows, run `f`, and read back premultiplied RGBA8 rows.
    pub(crate) fn draw(
        &mut self,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> CardResult<()>,
    ) -> CardResult<Vec<u8>> {
        if height == 0 {
            return Err(CardError::render("surface height must be > 0"));
        }
        let width = self.width;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        if let Err(e) = out {
            self.ctx = Some(ctx);
            return Err(e);
        }

        let mut pixmap = match self.pixmap.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        let bytes = pixmap.data_as_u8_slice().to_vec();

        self.ctx = Some(ctx);
        self.pixmap = Some(pixmap);
        self.renders += 1;
        Ok(bytes)
    }
}
