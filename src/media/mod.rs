//! Media backend boundary
//!
//! The playback adapter talks to the native media capability exclusively
//! through the `MediaCommand` / `MediaEvent` contract defined here; the mpv
//! implementation lives in [`mpv`]. Anything the real player exposes beyond
//! this contract is unused.

pub mod mpv;

pub use mpv::MpvHandle;

use crate::models::EpisodeRef;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Capability Contract
// =============================================================================

/// Commands the playback adapter may issue to the media resource
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    /// (Re)load the resource at the given locator, discarding prior position
    Load(String),
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Adjust the current position by a signed offset in seconds.
    /// Clamping to the valid range is the resource's responsibility.
    SeekBy(f64),
    /// Apply a playback-rate multiplier
    SetRate(f64),
    /// Release the resource
    Stop,
}

/// Notifications the media resource delivers to the playback adapter
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// A load has begun
    LoadStart,
    /// Enough data is available to play (also fired on buffering recovery)
    CanPlay,
    /// Playback stalled waiting for data
    Waiting,
    /// Buffering telemetry: how far ahead data is available, and the total
    /// duration when known (non-positive when unknown)
    Progress { buffered_to: f64, duration: f64 },
    /// The resource failed; irrecoverable for this load
    Error(String),
}

/// Errors from the media backend itself (spawning, socket, protocol)
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Player '{0}' not found. Install it first.")]
    PlayerNotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(std::io::Error),
    #[error("Could not connect to player socket at {0}")]
    SocketUnavailable(String),
    #[error("Player connection lost: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Media Resource Locator
// =============================================================================

/// Where episode media lives
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// Files under a local directory
    Library(PathBuf),
    /// Externally hosted, addressed under a base URI
    Remote(String),
}

impl Default for MediaSource {
    fn default() -> Self {
        MediaSource::Library(PathBuf::from("media"))
    }
}

/// Builds the media resource URI for an episode reference.
///
/// A pure string-construction contract with the hosting/storage layer: the
/// episode segment is embedded verbatim as `eps_<id>.mp4`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaLocator {
    source: MediaSource,
}

impl MediaLocator {
    pub fn new(source: MediaSource) -> Self {
        Self { source }
    }

    /// File name for an episode reference
    pub fn file_name(episode: &EpisodeRef) -> String {
        format!("eps_{}.mp4", episode)
    }

    /// Resolve an episode reference to the URI handed to the media resource
    pub fn resolve(&self, episode: &EpisodeRef) -> String {
        let name = Self::file_name(episode);
        match &self.source {
            MediaSource::Library(dir) => dir.join(name).to_string_lossy().into_owned(),
            MediaSource::Remote(base) => {
                format!("{}/{}", base.trim_end_matches('/'), name)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
