use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::color::Rgba8,
    config::card::FontPaths,
    foundation::error::{CardError, CardResult},
};

/// Which face of the [`FontBook`] a run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Regular,
    Italic,
}

/// Raw font bytes plus the `vello_cpu` handle used to draw glyph outlines.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>) -> CardResult<Self> {
        if bytes.is_empty() {
            return Err(CardError::validation("font bytes must be non-empty"));
        }
        let bytes = Arc::new(bytes);
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        Ok(Self { bytes, data })
    }

    pub fn from_path(path: &Path) -> CardResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

/// Fonts available to the rasterizer. Either face may be missing.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    regular: Option<FontFace>,
    italic: Option<FontFace>,
}

impl FontBook {
    /// A book without fonts; text runs are skipped when rendering.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(regular: Option<FontFace>, italic: Option<FontFace>) -> Self {
        Self { regular, italic }
    }

    pub fn from_paths(paths: &FontPaths) -> CardResult<Self> {
        let regular = paths
            .regular
            .as_deref()
            .map(FontFace::from_path)
            .transpose()?;
        let italic = paths
            .italic
            .as_deref()
            .map(FontFace::from_path)
            .transpose()?;
        Ok(Self { regular, italic })
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.italic.is_none()
    }

    /// Face for `kind`, falling back to whichever face is loaded.
    pub fn face(&self, kind: FaceKind) -> Option<(FaceKind, &FontFace)> {
        let primary = match kind {
            FaceKind::Regular => self.regular.as_ref().map(|f| (FaceKind::Regular, f)),
            FaceKind::Italic => self.italic.as_ref().map(|f| (FaceKind::Italic, f)),
        };
        primary
            .or_else(|| self.regular.as_ref().map(|f| (FaceKind::Regular, f)))
            .or_else(|| self.italic.as_ref().map(|f| (FaceKind::Italic, f)))
    }
}

/// Stateful helper for building Parley text layouts from [`FontBook`] faces.
///
/// Each face is registered with the font collection once and then addressed by family name.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: Vec<(FaceKind, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: Vec::new(),
        }
    }

    fn family_for(&mut self, kind: FaceKind, face: &FontFace) -> CardResult<String> {
        if let Some((_, name)) = self.families.iter().find(|(k, _)| *k == kind) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::validation("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::validation("registered font family has no name"))?
            .to_string();
        self.families.push((kind, name.clone()));
        Ok(name)
    }

    /// Shape a single unwrapped line of `text`.
    pub fn layout_line(
        &mut self,
        text: &str,
        kind: FaceKind,
        face: &FontFace,
        size_px: f32,
        brush: Rgba8,
    ) -> CardResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation("text size_px must be finite and > 0"));
        }
        let family = self.family_for(kind, face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
