//! Controller configuration.
//!
//! Every field defaults to the standard StretchText markup and styling
//! contract, so `Config::default()` works with unmodified content.

/// Default class marking a summary element.
pub const SUMMARY_CLASS: &str = "stretchsummary";
/// Default attribute marking a summary element.
pub const SUMMARY_ATTRIBUTE: &str = "epub-type";
/// Value [`SUMMARY_ATTRIBUTE`] must carry.
pub const SUMMARY_ATTRIBUTE_VALUE: &str = "stretchsummary";
/// Class toggled on both summary and detail while open.
pub const OPEN_CLASS: &str = "stretchtext-open";
/// Tooltip shown while closed.
pub const TITLE_WHEN_CLOSED: &str = "Expand";
/// Tooltip shown while open.
pub const TITLE_WHEN_OPEN: &str = "Collapse";
/// One frame at 60 fps, used when no animation-frame facility exists.
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// How input listeners are attached to summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ListenerMode {
    /// One set of listeners per discovered summary.
    #[default]
    PerElement,
    /// A single listener at the document root; summaries are matched when
    /// an event arrives.
    Delegated,
}

/// StretchText controller settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Config {
    pub summary_class: String,
    pub summary_attribute: String,
    pub summary_attribute_value: String,
    pub open_class: String,
    pub title_when_closed: String,
    pub title_when_open: String,
    pub frame_interval_ms: f64,
    pub listeners: ListenerMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summary_class: SUMMARY_CLASS.to_string(),
            summary_attribute: SUMMARY_ATTRIBUTE.to_string(),
            summary_attribute_value: SUMMARY_ATTRIBUTE_VALUE.to_string(),
            open_class: OPEN_CLASS.to_string(),
            title_when_closed: TITLE_WHEN_CLOSED.to_string(),
            title_when_open: TITLE_WHEN_OPEN.to_string(),
            frame_interval_ms: FRAME_INTERVAL_MS,
            listeners: ListenerMode::PerElement,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary_class(mut self, class: impl Into<String>) -> Self {
        self.summary_class = class.into();
        self
    }

    pub fn with_summary_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.summary_attribute = name.into();
        self.summary_attribute_value = value.into();
        self
    }

    pub fn with_open_class(mut self, class: impl Into<String>) -> Self {
        self.open_class = class.into();
        self
    }

    pub fn with_titles(mut self, closed: impl Into<String>, open: impl Into<String>) -> Self {
        self.title_when_closed = closed.into();
        self.title_when_open = open.into();
        self
    }

    pub fn with_frame_interval_ms(mut self, interval: f64) -> Self {
        self.frame_interval_ms = interval;
        self
    }

    pub fn with_listeners(mut self, mode: ListenerMode) -> Self {
        self.listeners = mode;
        self
    }

    /// Reject settings the controller cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |msg: &str| Err(crate::Error::InvalidConfig(msg.to_string()));

        if self.summary_class.trim().is_empty() || self.summary_class.contains(char::is_whitespace)
        {
            return invalid("summaryClass must be a single class name");
        }
        if self.open_class.trim().is_empty() || self.open_class.contains(char::is_whitespace) {
            return invalid("openClass must be a single class name");
        }
        if self.open_class == self.summary_class {
            return invalid("openClass must differ from summaryClass");
        }
        if self.summary_attribute.trim().is_empty() {
            return invalid("summaryAttribute must not be empty");
        }
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms >= 0.0) {
            return invalid("frameIntervalMs must be a non-negative number");
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
