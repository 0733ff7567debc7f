//! User preferences.
//!
//! Settings are a plain value passed explicitly to rendering and export
//! calls. [`Preferences`] owns the load / merge-with-defaults / save
//! lifecycle: loaded once per session, saved after every mutation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::SETTINGS_KEY;
use crate::theme::ThemeId;
use crate::traits::KeyValueStore;

/// Font families offered for question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
}

impl FontFamily {
    /// CSS `font-family` value.
    pub fn css(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "'Segoe UI', sans-serif",
            FontFamily::Serif => "'Georgia', serif",
            FontFamily::Monospace => "'Courier New', monospace",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::SansSerif => write!(f, "sans-serif"),
            FontFamily::Serif => write!(f, "serif"),
            FontFamily::Monospace => write!(f, "monospace"),
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sans-serif" | "sans" => Ok(FontFamily::SansSerif),
            "serif" => Ok(FontFamily::Serif),
            "monospace" | "mono" => Ok(FontFamily::Monospace),
            other => Err(format!("unknown font family: {other}")),
        }
    }
}

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 24;

/// Display preferences.
///
/// Missing fields in stored JSON take their default, so older saved settings
/// keep working when new fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeId,
    pub font_size: u32,
    pub font_family: FontFamily,
    pub high_contrast: bool,
    pub reduce_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeId::Forest,
            font_size: 16,
            font_family: FontFamily::SansSerif,
            high_contrast: false,
            reduce_motion: false,
        }
    }
}

fn merge_with_defaults(value: Value) -> Settings {
    let Value::Object(stored) = value else {
        tracing::warn!("stored settings are not an object, using defaults");
        return Settings::default();
    };
    let mut merged = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(map)) => map,
        _ => return Settings::default(),
    };
    for (key, field) in stored {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), field);
        match serde_json::from_value::<Settings>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(e) => tracing::warn!("ignoring stored setting '{key}': {e}"),
        }
    }
    let mut settings: Settings = serde_json::from_value(Value::Object(merged)).unwrap_or_default();
    settings.font_size = settings.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    settings
}

/// Settings bound to the store they are persisted in.
pub struct Preferences {
    settings: Settings,
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    /// Load settings, merging stored values over the defaults.
    ///
    /// Each stored field is taken on its own, so one invalid value only
    /// resets that field. Read failures fall back to defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let settings = match store.load(SETTINGS_KEY) {
            Ok(Some(value)) => merge_with_defaults(value),
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::error!("could not load settings, using defaults: {e}");
                Settings::default()
            }
        };
        Self { settings, store }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a change and persist the result.
    ///
    /// Returns `false` when persisting failed; the change still applies for
    /// the rest of the session.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> bool {
        change(&mut self.settings);
        self.settings.font_size = self.settings.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.persist()
    }

    /// Restore defaults and persist them.
    pub fn reset(&mut self) -> bool {
        self.update(|s| *s = Settings::default())
    }

    fn persist(&self) -> bool {
        let result = serde_json::to_value(&self.settings)
            .map_err(|e| e.to_string())
            .and_then(|value| {
                self.store
                    .save(SETTINGS_KEY, &value)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("could not save settings: {e}");
                false
            }
        }
    }
}
