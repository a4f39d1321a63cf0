use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};

/// Font files used for card text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontPaths {
    /// Upright face used for every run that is not italic.
    pub regular: Option<PathBuf>,
    /// Italic face for the subtitle. Falls back to `regular` when absent.
    pub italic: Option<PathBuf>,
}

/// Process-level configuration for the card pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    /// Shareable root that rendered cards are written under.
    pub export_root: PathBuf,
    /// App-private root that stored product images are resolved against.
    pub data_root: PathBuf,
    /// JSON settings file holding `showWatermark` / `watermarkText`.
    pub settings_path: PathBuf,
    pub fonts: FontPaths,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            export_root: PathBuf::from("cards"),
            data_root: PathBuf::from("data"),
            settings_path: PathBuf::from("settings.json"),
            fonts: FontPaths::default(),
        }
    }
}

impl CardConfig {
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| CardError::validation(format!("invalid config json: {e}")))
    }

    pub fn from_path(path: &Path) -> CardResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/card.rs"]
mod tests;
