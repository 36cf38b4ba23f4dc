//! Configuration management for animestream
//!
//! Handles config file loading/saving. Config is stored at
//! ~/.config/animestream/config.toml; every field is optional and the
//! accessors fill in the documented defaults (±10s skip, rate set
//! {0.5, 1, 1.5, 2}, local "media" library).

use crate::media::MediaSource;
use crate::models::Series;
use crate::playback::PlayerOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding episode files (eps_<id>.mp4)
    pub library_dir: Option<PathBuf>,
    /// Base URI of an externally hosted library; takes precedence over
    /// `library_dir` when set
    pub remote_base: Option<String>,
    /// Seconds skipped by one rewind/fast-forward action
    pub skip_seconds: Option<f64>,
    /// Offered playback-rate multipliers
    pub playback_rates: Option<Vec<f64>>,
    /// Path to the mpv binary
    pub mpv_path: Option<String>,
    /// TOML file with a catalog entry overriding the built-in series
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/animestream/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("animestream").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from an explicit path, or return default if unreadable
    pub fn load_from(path: &std::path::Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Transport options with defaults applied
    pub fn player_options(&self) -> PlayerOptions {
        let defaults = PlayerOptions::default();
        let rates = self
            .playback_rates
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or(defaults.rates);
        // The starting rate must belong to the offered set
        let default_rate = if rates
            .iter()
            .any(|r| (r - defaults.default_rate).abs() < 1e-9)
        {
            defaults.default_rate
        } else {
            rates[0]
        };
        PlayerOptions {
            rates,
            default_rate,
            skip_seconds: self.skip_seconds.unwrap_or(defaults.skip_seconds),
        }
    }

    /// Where episode media is resolved from
    pub fn media_source(&self) -> MediaSource {
        if let Some(base) = &self.remote_base {
            MediaSource::Remote(base.clone())
        } else if let Some(dir) = &self.library_dir {
            MediaSource::Library(dir.clone())
        } else {
            MediaSource::default()
        }
    }

    /// The catalog entry: the configured TOML file when present and
    /// readable, the built-in series otherwise
    pub fn series(&self) -> Series {
        self.catalog_path
            .as_ref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_else(Series::builtin)
    }
}
