use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};

/// File extension of every rendered card.
pub const CARD_EXTENSION: &str = "png";

/// Deterministic identity of a rendered card: `(product_id, folder_label)`.
///
/// Maps to `{folder}/product_{id}_{folder}.png`. Both parts are validated to be single path
/// segments, so distinct folder labels can never produce the same relative path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey {
    product_id: String,
    folder_label: String,
}

impl AssetKey {
    pub fn new(product_id: impl Into<String>, folder_label: impl Into<String>) -> CardResult<Self> {
        let product_id = product_id.into();
        let folder_label = folder_label.into();
        validate_segment("product id", &product_id)?;
        validate_segment("folder label", &folder_label)?;
        Ok(Self {
            product_id,
            folder_label,
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn folder_label(&self) -> &str {
        &self.folder_label
    }

    /// `product_{id}_{folder}.png`
    pub fn file_name(&self) -> String {
        format!(
            "product_{}_{}.{CARD_EXTENSION}",
            self.product_id, self.folder_label
        )
    }

    /// `{folder}/product_{id}_{folder}.png`
    pub fn rel_path(&self) -> String {
        expected_rel_path(&self.product_id, &self.folder_label)
    }
}

/// The path convention applied to unvalidated parts, for diagnostics about ids or labels that
/// cannot form an [`AssetKey`].
pub fn expected_rel_path(product_id: &str, folder_label: &str) -> String {
    format!("{folder_label}/product_{product_id}_{folder_label}.{CARD_EXTENSION}")
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rel_path())
    }
}

fn validate_segment(what: &str, s: &str) -> CardResult<()> {
    if s.trim().is_empty() {
        return Err(CardError::validation(format!("{what} must be non-empty")));
    }
    if s.contains('/') || s.contains('\\') {
        return Err(CardError::validation(format!(
            "{what} must not contain path separators: '{s}'"
        )));
    }
    if s == "." || s == ".." {
        return Err(CardError::validation(format!("{what} must not be '{s}'")));
    }
    Ok(())
}

/// Storage for rendered cards, keyed by [`AssetKey`].
pub trait AssetStore {
    fn exists(&self, key: &AssetKey) -> bool;

    /// Write (or overwrite) the card, creating the folder if absent.
    fn write(&self, key: &AssetKey, bytes: &[u8]) -> CardResult<()>;

    fn read(&self, key: &AssetKey) -> CardResult<Vec<u8>>;

    /// Platform handle (here: `file://` URI) for a stored card.
    fn resolve_handle(&self, key: &AssetKey) -> CardResult<String>;

    /// Remove the card. A card that does not exist is not an error.
    fn delete(&self, key: &AssetKey) -> CardResult<()>;
}

/// [`AssetStore`] over a shareable export root directory.
#[derive(Clone, Debug)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return root directory cards are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) path of a card.
    pub fn path_for(&self, key: &AssetKey) -> PathBuf {
        self.root.join(key.folder_label()).join(key.file_name())
    }
}

impl AssetStore for FsAssetStore {
    fn exists(&self, key: &AssetKey) -> bool {
        self.path_for(key).is_file()
    }

    fn write(&self, key: &AssetKey, bytes: &[u8]) -> CardResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create card folder '{}'", parent.display()))?;
        }
        std::fs::write(&path, bytes)
            .with_context(|| format!("write card '{}'", path.display()))?;
        Ok(())
    }

    fn read(&self, key: &AssetKey) -> CardResult<Vec<u8>> {
        let path = self.path_for(key);
        std::fs::read(&path)
            .with_context(|| format!("read card '{}'", path.display()))
            .map_err(CardError::from)
    }

    fn resolve_handle(&self, key: &AssetKey) -> CardResult<String> {
        let path = self.path_for(key);
        let abs = path
            .canonicalize()
            .with_context(|| format!("canonicalize card path '{}'", path.display()))?;
        Ok(file_uri(&abs))
    }

    fn delete(&self, key: &AssetKey) -> CardResult<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("delete card '{}'", path.display()))
                .into()),
        }
    }
}

fn file_uri(abs: &Path) -> String {
    let s = abs.to_string_lossy().replace('\\', "/");
    if s.starts_with('/') {
        format!("file://{s}")
    } else {
        format!("file:///{s}")
    }
}

/// Normalize and validate root-relative paths.
///
/// The result is `/`-separated without `.` segments. Absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> CardResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CardError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CardError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
