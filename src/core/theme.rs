//! # Theme Preference
//!
//! Light/dark preference, stored as a single word in `~/.trustsight/theme`.
//! Read once at startup, written on every toggle. With nothing stored, the
//! configured theme is used, then the terminal's `COLORFGBG` hint, then dark.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::app_dir;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(raw: &str) -> Option<Theme> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Reads the terminal's `COLORFGBG` ("fg;bg") hint. Backgrounds 0-6 and 8
    /// are the dark ANSI colors.
    pub fn from_colorfgbg(value: &str) -> Option<Theme> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(if bg <= 6 || bg == 8 {
            Theme::Dark
        } else {
            Theme::Light
        })
    }
}

/// Loads and saves the theme preference at a fixed path.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: Option<PathBuf>,
}

impl ThemeStore {
    /// Store at `~/.trustsight/theme` (in-memory only without a home dir).
    pub fn default_location() -> Self {
        Self {
            path: app_dir().map(|d| d.join("theme")),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The stored preference, if there is a readable one.
    pub fn load(&self) -> Option<Theme> {
        let path = self.path.as_deref()?;
        let raw = fs::read_to_string(path).ok()?;
        let theme = Theme::parse(&raw);
        if theme.is_none() {
            warn!("Ignoring unrecognized theme preference in {}", path.display());
        }
        theme
    }

    /// Stored preference → configured default → terminal hint → dark.
    pub fn initial(&self, configured: Option<Theme>) -> Theme {
        self.load()
            .or(configured)
            .or_else(|| {
                std::env::var("COLORFGBG")
                    .ok()
                    .and_then(|v| Theme::from_colorfgbg(&v))
            })
            .unwrap_or_default()
    }

    pub fn save(&self, theme: Theme) -> io::Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        write_atomic(path, theme.label())?;
        debug!("Saved theme preference '{}'", theme.label());
        Ok(())
    }
}

/// Write `.tmp` then rename, so a crash never leaves a half-written file.
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}
