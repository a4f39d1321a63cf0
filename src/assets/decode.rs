use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{CardError, CardResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Zero-size stand-in used when a source photo cannot be decoded.
    pub fn placeholder() -> Self {
        Self {
            width: 0,
            height: 0,
            rgba8_premul: Arc::new(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CardResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode, falling back to [`PreparedImage::placeholder`] on error.
pub fn decode_or_placeholder(bytes: &[u8]) -> PreparedImage {
    match decode_image(bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!(error = %e, "source image decode failed, using placeholder");
            PreparedImage::placeholder()
        }
    }
}

/// Extract the payload of a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> CardResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CardError::validation("data uri must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CardError::validation("data uri has no ',' separator"))?;
    if !meta.ends_with(";base64") {
        return Err(CardError::validation("only base64 data uris are supported"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode data uri payload")
        .map_err(CardError::from)
}

/// Wrap encoded PNG bytes as a self-contained `data:` URI.
pub fn encode_png_data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
