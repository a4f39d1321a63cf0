use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};

/// Default watermark text.
pub const DEFAULT_WATERMARK_TEXT: &str = "created using CatShare";

/// Anchor of the watermark on a 3x3 grid over the card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

/// Horizontal anchor column of a [`WatermarkPosition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorX {
    Left,
    Center,
    Right,
}

/// Vertical anchor row of a [`WatermarkPosition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorY {
    Top,
    Middle,
    Bottom,
}

impl WatermarkPosition {
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Lenient parse of a stored position value.
    ///
    /// Accepts `bottom-left`, `bottom_left`, `bottomLeft` and a JSON-quoted form of each.
    /// Anything unrecognized is [`WatermarkPosition::BottomCenter`].
    pub fn parse(raw: &str) -> Self {
        let s = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw);
        let mut norm = String::with_capacity(s.len() + 1);
        let mut prev_lower = false;
        for c in s.chars() {
            if c.is_ascii_uppercase() && prev_lower {
                norm.push('-');
            }
            prev_lower = c.is_ascii_lowercase();
            norm.push(if c == '_' { '-' } else { c.to_ascii_lowercase() });
        }
        match norm.as_str() {
            "top-left" => Self::TopLeft,
            "top-center" => Self::TopCenter,
            "top-right" => Self::TopRight,
            "middle-left" => Self::MiddleLeft,
            "middle-center" => Self::MiddleCenter,
            "middle-right" => Self::MiddleRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            _ => Self::BottomCenter,
        }
    }

    pub fn anchor_x(self) -> AnchorX {
        match self {
            Self::TopLeft | Self::MiddleLeft | Self::BottomLeft => AnchorX::Left,
            Self::TopCenter | Self::MiddleCenter | Self::BottomCenter => AnchorX::Center,
            Self::TopRight | Self::MiddleRight | Self::BottomRight => AnchorX::Right,
        }
    }

    pub fn anchor_y(self) -> AnchorY {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => AnchorY::Top,
            Self::MiddleLeft | Self::MiddleCenter | Self::MiddleRight => AnchorY::Middle,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => AnchorY::Bottom,
        }
    }
}

/// Watermark overlay settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    pub enabled: bool,
    pub text: String,
    #[serde(default)]
    pub position: WatermarkPosition,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            position: WatermarkPosition::default(),
        }
    }
}

impl WatermarkConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// True when something would actually be drawn.
    pub fn is_visible(&self) -> bool {
        self.enabled && !self.text.trim().is_empty()
    }
}

/// Source of user settings consulted by the renderer.
///
/// Implementations are queried on every render; callers must not cache the returned values.
pub trait SettingsProvider {
    fn watermark(&self) -> CardResult<WatermarkConfig>;
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for &T {
    fn watermark(&self) -> CardResult<WatermarkConfig> {
        (**self).watermark()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    show_watermark: Option<bool>,
    watermark_text: Option<String>,
    watermark_position: Option<String>,
}

/// Settings stored as a JSON object (`showWatermark`, `watermarkText`, `watermarkPosition`).
///
/// The file is read on every call. A missing file yields defaults.
#[derive(Clone, Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for JsonFileSettings {
    fn watermark(&self) -> CardResult<WatermarkConfig> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "settings file absent, using defaults");
                return Ok(WatermarkConfig::default());
            }
            Err(e) => {
                return Err(CardError::settings(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        parse_settings(&raw)
    }
}

/// Parse a settings JSON document into a [`WatermarkConfig`], applying defaults.
pub fn parse_settings(raw: &str) -> CardResult<WatermarkConfig> {
    let file: SettingsFile = serde_json::from_str(raw)
        .map_err(|e| CardError::settings(format!("invalid settings json: {e}")))?;
    let defaults = WatermarkConfig::default();
    Ok(WatermarkConfig {
        enabled: file.show_watermark.unwrap_or(defaults.enabled),
        text: file.watermark_text.unwrap_or(defaults.text),
        position: file
            .watermark_position
            .as_deref()
            .map(WatermarkPosition::parse)
            .unwrap_or(defaults.position),
    })
}

/// In-memory settings that can be changed between renders.
#[derive(Debug, Default)]
pub struct MemorySettings {
    watermark: RwLock<WatermarkConfig>,
}

impl MemorySettings {
    pub fn new(watermark: WatermarkConfig) -> Self {
        Self {
            watermark: RwLock::new(watermark),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.update(|w| w.enabled = enabled);
    }

    pub fn set_position(&self, position: WatermarkPosition) {
        self.update(|w| w.position = position);
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|w| w.text = text);
    }

    fn update(&self, f: impl FnOnce(&mut WatermarkConfig)) {
        let mut guard = self
            .watermark
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
    }
}

impl SettingsProvider for MemorySettings {
    fn watermark(&self) -> CardResult<WatermarkConfig> {
        self.watermark
            .read()
            .map(|w| w.clone())
            .map_err(|_| CardError::settings("settings lock poisoned"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
