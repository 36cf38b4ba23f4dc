//! CLI Command Handlers
//!
//! Implements the CLI commands over the same catalog, locator, and playback
//! adapter the TUI uses. Each handler takes its args plus Output and returns
//! an ExitCode.

use serde::Serialize;

use crate::cli::{
    self, CatalogCmd, EpisodesCmd, ExitCode, LocateCmd, Output, PlayCmd,
};
use crate::config::Config;
use crate::media::{MediaCommand, MediaError, MediaLocator, MpvHandle};
use crate::models::{EpisodeRef, Route};
use crate::playback::PlaybackSession;
use crate::ui::catalog::episode_routes;

// =============================================================================
// Catalog Command
// =============================================================================

pub fn catalog_cmd(_cmd: CatalogCmd, config: &Config, output: &Output) -> ExitCode {
    let series = config.series();
    match output.print(&series) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Episodes Command
// =============================================================================

/// One catalog affordance, as seen by scripts
#[derive(Debug, Serialize)]
struct EpisodeEntry {
    episode: String,
    route: String,
    media: String,
}

pub fn episodes_cmd(_cmd: EpisodesCmd, config: &Config, output: &Output) -> ExitCode {
    let series = config.series();
    let locator = MediaLocator::new(config.media_source());

    let entries: Vec<EpisodeEntry> = episode_routes(&series)
        .into_iter()
        .map(|route| {
            let episode = match &route {
                Route::Watch(ep) => ep.clone(),
                Route::Catalog => unreachable!("episode routes are watch routes"),
            };
            EpisodeEntry {
                episode: episode.to_string(),
                media: locator.resolve(&episode),
                route: route.to_string(),
            }
        })
        .collect();

    let plain: String = entries
        .iter()
        .map(|e| e.route.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    match output.line(plain, &entries) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Locate Command
// =============================================================================

/// Resolved locator, as seen by scripts
#[derive(Debug, Serialize)]
struct LocateResult {
    episode: String,
    media: String,
}

pub fn locate_cmd(cmd: LocateCmd, config: &Config, output: &Output) -> ExitCode {
    if let Err(e) = cli::validate_episode(&cmd.episode) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    let episode = EpisodeRef::new(&cmd.episode);
    let locator = MediaLocator::new(config.media_source());
    let media = locator.resolve(&episode);

    let result = LocateResult {
        episode: episode.to_string(),
        media: media.clone(),
    };
    match output.line(media, &result) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Play Command
// =============================================================================

/// Final playback report, as seen by scripts
#[derive(Debug, Serialize)]
struct PlayReport {
    episode: String,
    status: &'static str,
}

/// Headless playback: load, start on first readiness, run until the player
/// exits or the media resource errors.
pub async fn play_cmd(cmd: PlayCmd, config: &Config, output: &Output) -> ExitCode {
    if let Err(e) = cli::validate_episode(&cmd.episode) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    let options = config.player_options();
    if let Some(rate) = cmd.rate {
        if !options.offers_rate(rate) {
            return output.error(
                format!("Rate {} is not offered (choose from {:?})", rate, options.rates),
                ExitCode::InvalidArgs,
            );
        }
    }

    let episode = EpisodeRef::new(&cmd.episode);
    let locator = MediaLocator::new(config.media_source());
    let uri = locator.resolve(&episode);
    let mut session = PlaybackSession::new(episode.clone(), options);

    output.info(format!("Playing episode {} ({})", episode, uri));

    let (mut handle, mut events) = match MpvHandle::spawn(config.mpv_path.as_deref()).await {
        Ok(pair) => pair,
        Err(MediaError::PlayerNotFound(binary)) => {
            return output.error(
                format!("Player '{}' not found. Install it first.", binary),
                ExitCode::PlayerNotFound,
            );
        }
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    if handle.send(&MediaCommand::Load(uri)).await.is_err() {
        handle.shutdown().await;
        return output.error("Player connection lost", ExitCode::Error);
    }

    let mut started = false;
    while let Some(event) = events.recv().await {
        session.handle_event(&event);

        if session.is_errored() {
            let detail = session.error_detail().unwrap_or("playback failed").to_string();
            handle.shutdown().await;
            return output.error(
                format!("Video Not Available - episode {}: {}", episode, detail),
                ExitCode::PlaybackFailed,
            );
        }

        // First readiness: start playback, apply the requested rate once
        if !started && !session.is_loading() {
            started = true;
            let mut startup = Vec::new();
            startup.extend(session.toggle_play());
            if let Some(rate) = cmd.rate {
                startup.extend(session.set_rate(rate));
            }
            for command in &startup {
                if handle.send(command).await.is_err() {
                    break;
                }
            }
            output.info(format!("{}", session.phase()));
        }
    }

    // Event stream closed: the player was quit by the user
    handle.shutdown().await;
    let report = PlayReport {
        episode: episode.to_string(),
        status: "finished",
    };
    match output.line(format!("Finished episode {}", episode), &report) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}
