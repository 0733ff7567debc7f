//! Theme palette table.
//!
//! The same table drives the live application and is embedded verbatim into
//! every exported artifact, so artifacts never depend on a hosted stylesheet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Theme identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Light,
    Dark,
    #[default]
    Forest,
}

impl ThemeId {
    /// Every theme, in selector order.
    pub const ALL: [ThemeId; 3] = [ThemeId::Forest, ThemeId::Light, ThemeId::Dark];

    /// Value of the `data-theme` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Light => "light",
            ThemeId::Dark => "dark",
            ThemeId::Forest => "forest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeId::Light => "Light",
            ThemeId::Dark => "Dark",
            ThemeId::Forest => "Forest",
        }
    }

    pub fn palette(&self) -> &'static ThemePalette {
        match self {
            ThemeId::Light => &LIGHT,
            ThemeId::Dark => &DARK,
            ThemeId::Forest => &FOREST,
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeId::Light),
            "dark" => Ok(ThemeId::Dark),
            "forest" => Ok(ThemeId::Forest),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Color tokens for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg_primary: &'static str,
    pub bg_secondary: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub accent: &'static str,
    pub border_color: &'static str,
    pub correct_bg: &'static str,
    pub correct_text: &'static str,
    pub incorrect_bg: &'static str,
    pub incorrect_text: &'static str,
}

impl ThemePalette {
    /// Tokens as `(css variable name, color)` pairs, in declaration order.
    pub fn tokens(&self) -> [(&'static str, &'static str); 10] {
        [
            ("bg-primary", self.bg_primary),
            ("bg-secondary", self.bg_secondary),
            ("text-primary", self.text_primary),
            ("text-secondary", self.text_secondary),
            ("accent", self.accent),
            ("border-color", self.border_color),
            ("correct-bg", self.correct_bg),
            ("correct-text", self.correct_text),
            ("incorrect-bg", self.incorrect_bg),
            ("incorrect-text", self.incorrect_text),
        ]
    }
}

const LIGHT: ThemePalette = ThemePalette {
    bg_primary: "#f9fafb",
    bg_secondary: "#ffffff",
    text_primary: "#111827",
    text_secondary: "#4b5563",
    accent: "#3b82f6",
    border_color: "#e5e7eb",
    correct_bg: "#dcfce7",
    correct_text: "#166534",
    incorrect_bg: "#fee2e2",
    incorrect_text: "#991b1b",
};

const DARK: ThemePalette = ThemePalette {
    bg_primary: "#1f2937",
    bg_secondary: "#374151",
    text_primary: "#f9fafb",
    text_secondary: "#9ca3af",
    accent: "#60a5fa",
    border_color: "#4b5563",
    correct_bg: "#14532d",
    correct_text: "#bbf7d0",
    incorrect_bg: "#7f1d1d",
    incorrect_text: "#fecaca",
};

const FOREST: ThemePalette = ThemePalette {
    bg_primary: "#1c2c2b",
    bg_secondary: "#283c3b",
    text_primary: "#e4e5dc",
    text_secondary: "#a1aaa2",
    accent: "#8bc34a",
    border_color: "#3f5857",
    correct_bg: "#2e4b32",
    correct_text: "#a4f1ac",
    incorrect_bg: "#5a3030",
    incorrect_text: "#da6161",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_display_and_parse() {
        for theme in ThemeId::ALL {
            assert_eq!(theme.to_string().parse::<ThemeId>().unwrap(), theme);
        }
        assert_eq!("Dark".parse::<ThemeId>().unwrap(), ThemeId::Dark);
        assert!("solarized".parse::<ThemeId>().is_err());
    }

    #[test]
    fn default_theme_is_forest() {
        assert_eq!(ThemeId::default(), ThemeId::Forest);
    }

    #[test]
    fn palettes_are_distinct_and_complete() {
        let accents: std::collections::HashSet<_> =
            ThemeId::ALL.iter().map(|t| t.palette().accent).collect();
        assert_eq!(accents.len(), ThemeId::ALL.len());
        for theme in ThemeId::ALL {
            for (name, color) in theme.palette().tokens() {
                assert!(color.starts_with('#'), "{theme}/{name} is not a hex color");
            }
        }
    }
}
