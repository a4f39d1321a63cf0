use serde::{Deserialize, Serialize};

/// Which price channel a card prints and where the price bar sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Wholesale price, price bar on top.
    Wholesale,
    /// Resell price, price bar at the bottom.
    Resell,
}

impl RenderMode {
    /// Default folder label for this mode.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Wholesale => "Wholesale",
            Self::Resell => "Resell",
        }
    }

    /// True when the price bar precedes the image panel.
    pub fn price_on_top(self) -> bool {
        matches!(self, Self::Wholesale)
    }
}

/// A render mode paired with the folder label used for storage and file naming.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardTarget {
    pub mode: RenderMode,
    pub folder_label: String,
}

impl CardTarget {
    pub fn new(mode: RenderMode, folder_label: impl Into<String>) -> Self {
        Self {
            mode,
            folder_label: folder_label.into(),
        }
    }

    pub fn wholesale() -> Self {
        Self::new(RenderMode::Wholesale, RenderMode::Wholesale.default_label())
    }

    pub fn resell() -> Self {
        Self::new(RenderMode::Resell, RenderMode::Resell.default_label())
    }

    /// Derive a target from a catalogue label: `Wholesale` prints wholesale prices, every
    /// other label (`Resell`, `Retail`, custom catalogues) prints resell prices.
    pub fn for_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let mode = if label.eq_ignore_ascii_case("wholesale") {
            RenderMode::Wholesale
        } else {
            RenderMode::Resell
        };
        Self::new(mode, label)
    }
}

/// Card colors as CSS-like strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardStyle {
    pub font_color: String,
    pub bg_color: String,
    pub image_bg_color: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            font_color: "white".to_string(),
            bg_color: "#add8e6".to_string(),
            image_bg_color: "white".to_string(),
        }
    }
}

/// A value with an optional display unit (`None` as a unit means no unit).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measure {
    pub value: String,
    pub unit: Option<String>,
}

impl Measure {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: Some(unit.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// `value unit`, omitting empty units and the literal `None`.
    pub fn display(&self) -> String {
        match self.unit.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() && u != "None" => format!("{} {u}", self.value),
            _ => self.value.clone(),
        }
    }
}

/// Where a product's source photo comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRef {
    /// Encoded image bytes held in memory.
    #[serde(skip)]
    Inline(Vec<u8>),
    /// `data:image/...;base64,...` URI.
    DataUri(String),
    /// Path relative to the app-private data root.
    Stored(String),
}

/// Everything the pipeline needs to render one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRenderSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub style: CardStyle,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub colour: String,
    #[serde(default)]
    pub package: Measure,
    #[serde(default)]
    pub age: Measure,
    #[serde(default)]
    pub wholesale: Measure,
    #[serde(default)]
    pub resell: Measure,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

impl ProductRenderSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subtitle: None,
            style: CardStyle::default(),
            badge: None,
            colour: String::new(),
            package: Measure::default(),
            age: Measure::default(),
            wholesale: Measure::default(),
            resell: Measure::default(),
            image: None,
        }
    }

    pub fn price_for(&self, mode: RenderMode) -> &Measure {
        match mode {
            RenderMode::Wholesale => &self.wholesale,
            RenderMode::Resell => &self.resell,
        }
    }
}

/// Product lookup collaborator.
pub trait ProductRepository {
    fn get_by_id(&self, id: &str) -> Option<ProductRenderSpec>;
}
