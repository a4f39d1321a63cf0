use std::io::Cursor;

use sha2::{Digest, Sha256};

use crate::{
    assets::store::AssetKey,
    foundation::error::{CardError, CardResult},
    render::raster::RasterFrame,
};

/// Rows removed from the bottom of every rendered surface.
pub const BOTTOM_CROP_PX: u32 = 3;

/// Encoded card bytes and the relative path they belong at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedAsset {
    pub rel_path: String,
    pub png: Vec<u8>,
}

impl RenderedAsset {
    pub fn new(key: &AssetKey, png: Vec<u8>) -> Self {
        Self {
            rel_path: key.rel_path(),
            png,
        }
    }

    /// Lowercase hex SHA-256 of the PNG bytes.
    pub fn digest_hex(&self) -> String {
        digest_hex(&self.png)
    }
}

pub fn digest_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Crop [`BOTTOM_CROP_PX`] rows, convert to straight alpha, and encode lossless PNG.
pub fn encode_card(frame: &RasterFrame) -> CardResult<Vec<u8>> {
    let (width, height, rgba) = crop_and_unpremultiply(frame)?;
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| CardError::render("cropped frame size mismatch"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| CardError::render(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Cropped straight-alpha RGBA8 rows of `frame`.
pub fn crop_and_unpremultiply(frame: &RasterFrame) -> CardResult<(u32, u32, Vec<u8>)> {
    if frame.height <= BOTTOM_CROP_PX || frame.width == 0 {
        return Err(CardError::render(format!(
            "frame {}x{} is too small to crop",
            frame.width, frame.height
        )));
    }
    let row = frame.width as usize * 4;
    if frame.rgba8_premul.len() != row * frame.height as usize {
        return Err(CardError::render("frame byte len mismatch"));
    }
    let height = frame.height - BOTTOM_CROP_PX;
    let mut rgba = frame.rgba8_premul[..row * height as usize].to_vec();
    unpremultiply_rgba8_in_place(&mut rgba);
    Ok((frame.width, height, rgba))
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
