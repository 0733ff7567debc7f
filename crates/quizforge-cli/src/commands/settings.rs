//! The `quizforge settings` command.

use anyhow::{Context, Result};

use quizforge_core::settings::{FontFamily, Settings, MAX_FONT_SIZE, MIN_FONT_SIZE};
use quizforge_core::theme::ThemeId;

use super::{Env, Workspace};

/// Requested changes; everything `None` just prints the current settings.
pub struct Changes {
    pub theme: Option<String>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub high_contrast: Option<bool>,
    pub reduce_motion: Option<bool>,
    pub reset: bool,
}

pub fn execute(env: &Env, changes: Changes) -> Result<()> {
    // Parse everything before touching the store so a typo changes nothing.
    let theme = changes
        .theme
        .as_deref()
        .map(str::parse::<ThemeId>)
        .transpose()
        .map_err(anyhow::Error::msg)
        .context("invalid --theme")?;
    let font_family = changes
        .font_family
        .as_deref()
        .map(str::parse::<FontFamily>)
        .transpose()
        .map_err(anyhow::Error::msg)
        .context("invalid --font-family")?;
    if let Some(size) = changes.font_size {
        anyhow::ensure!(
            (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size),
            "font size must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}"
        );
    }

    let workspace = Workspace::open(env)?;
    let mut preferences = workspace.preferences();

    let mut saved = true;
    if changes.reset {
        saved &= preferences.reset();
    }

    let any_change = theme.is_some()
        || font_family.is_some()
        || changes.font_size.is_some()
        || changes.high_contrast.is_some()
        || changes.reduce_motion.is_some();
    if any_change {
        saved &= preferences.update(|s| {
            if let Some(theme) = theme {
                s.theme = theme;
            }
            if let Some(family) = font_family {
                s.font_family = family;
            }
            if let Some(size) = changes.font_size {
                s.font_size = size;
            }
            if let Some(on) = changes.high_contrast {
                s.high_contrast = on;
            }
            if let Some(on) = changes.reduce_motion {
                s.reduce_motion = on;
            }
        });
    }

    if !saved {
        eprintln!("warning: settings apply to this run only; they could not be saved");
    }

    print_settings(preferences.settings());
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("theme          {}", settings.theme);
    println!("font-size      {}px", settings.font_size);
    println!("font-family    {}", settings.font_family);
    println!("high-contrast  {}", settings.high_contrast);
    println!("reduce-motion  {}", settings.reduce_motion);
}
