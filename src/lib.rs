//! animestream - terminal front-end for an anime series catalog
//!
//! Browse one hardcoded series, pick an episode, and play it with transport
//! controls backed by an mpv subprocess.
//!
//! # Modules
//!
//! - `models` - Catalog entry, episode references, routes
//! - `playback` - The playback session state machine
//! - `media` - Media capability boundary and the mpv backend
//! - `config` - TOML configuration with documented defaults
//! - `ui` - TUI view helpers and theme
//! - `app` - Application state and navigation
//! - `cli` - Scriptable command-line surface

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod media;
pub mod models;
pub mod playback;
pub mod ui;

// Re-export commonly used types
pub use app::{App, AppState, CatalogState, GridState, WatchState};
pub use config::Config;
pub use media::{MediaCommand, MediaError, MediaEvent, MediaLocator, MediaSource};
pub use models::{EpisodeRef, Route, Series};
pub use playback::{
    PlaybackPhase, PlaybackSession, PlayerOptions, DEFAULT_RATE, DEFAULT_RATES,
    DEFAULT_SKIP_SECONDS,
};
