use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{decode::decode_data_uri, store::normalize_rel_path},
    catalogue::model::ImageRef,
    foundation::error::CardResult,
};

/// Supplies raw (still encoded) image bytes for a product photo.
pub trait ImageSource {
    fn load(&self, image: &ImageRef) -> CardResult<Vec<u8>>;
}

/// Resolves stored references against the app-private data root.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    data_root: PathBuf,
}

impl FsImageSource {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, image: &ImageRef) -> CardResult<Vec<u8>> {
        match image {
            ImageRef::Inline(bytes) => Ok(bytes.clone()),
            ImageRef::DataUri(uri) => decode_data_uri(uri),
            ImageRef::Stored(rel) => {
                let path = self.data_root.join(normalize_rel_path(rel)?);
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read source image '{}'", path.display()))?;
                Ok(bytes)
            }
        }
    }
}
