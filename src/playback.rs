//! Playback session state machine
//!
//! Bridges the opaque media resource to a small explicit state machine and a
//! fixed control surface. One `PlaybackSession` exists per mounted playback
//! view; it is reset when the episode reference changes and destroyed when
//! the view unmounts. All transitions run on the application event loop,
//! never concurrently with each other.
//!
//! States: Loading → Ready ⇄ Playing ⇄ Paused, with terminal Errored
//! reachable from any of them. Errored and loading are mutually exclusive;
//! recovery from Errored requires a fresh episode reference.

use crate::media::{MediaCommand, MediaEvent};
use crate::models::EpisodeRef;
use std::fmt;

/// Skip offset applied by the transport's rewind/fast-forward actions
pub const DEFAULT_SKIP_SECONDS: f64 = 10.0;

/// Discrete playback-rate multipliers offered by the control surface
pub const DEFAULT_RATES: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

/// Rate a fresh session starts at
pub const DEFAULT_RATE: f64 = 1.0;

// =============================================================================
// Player Options
// =============================================================================

/// Transport configuration, injected from the config layer
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// Offered rate multipliers; `set_rate` rejects anything else
    pub rates: Vec<f64>,
    /// Rate applied when a session starts or resets
    pub default_rate: f64,
    /// Seconds skipped by one rewind/fast-forward action
    pub skip_seconds: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES.to_vec(),
            default_rate: DEFAULT_RATE,
            skip_seconds: DEFAULT_SKIP_SECONDS,
        }
    }
}

impl PlayerOptions {
    /// Whether a rate belongs to the offered set
    pub fn offers_rate(&self, rate: f64) -> bool {
        self.rates.iter().any(|r| (r - rate).abs() < 1e-9)
    }
}

// =============================================================================
// Playback Phase
// =============================================================================

/// Derived phase for display and the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Loading,
    Ready,
    Playing,
    Paused,
    Errored,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackPhase::Loading => write!(f, "⟳ Loading"),
            PlaybackPhase::Ready => write!(f, "Ready"),
            PlaybackPhase::Playing => write!(f, "▶ Playing"),
            PlaybackPhase::Paused => write!(f, "⏸ Paused"),
            PlaybackPhase::Errored => write!(f, "✗ Error"),
        }
    }
}

// =============================================================================
// Playback Session
// =============================================================================

/// Transient state of one playback view instance.
///
/// User actions return the `MediaCommand` to issue (None when the action is
/// rejected in the current state), keeping the machine synchronous and the
/// side effects in the caller's hands.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    episode: EpisodeRef,
    options: PlayerOptions,
    playing: bool,
    loading: bool,
    errored: bool,
    error_detail: Option<String>,
    /// Has playback been started at least once since the last reset
    started: bool,
    /// Buffered fraction of the total duration, 0–100
    buffered_pct: f64,
    rate: f64,
}

impl PlaybackSession {
    /// Start a session for an episode: loading, not playing, default rate
    pub fn new(episode: EpisodeRef, options: PlayerOptions) -> Self {
        let rate = options.default_rate;
        Self {
            episode,
            options,
            playing: false,
            loading: true,
            errored: false,
            error_detail: None,
            started: false,
            buffered_pct: 0.0,
            rate,
        }
    }

    /// Switch to another episode: discard all prior state, back to loading.
    ///
    /// The chosen rate is intentionally not carried across episodes.
    pub fn reset(&mut self, episode: EpisodeRef) {
        *self = Self::new(episode, self.options.clone());
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn episode(&self) -> &EpisodeRef {
        &self.episode
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_errored(&self) -> bool {
        self.errored
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn buffered_pct(&self) -> f64 {
        self.buffered_pct
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.errored {
            PlaybackPhase::Errored
        } else if self.loading {
            PlaybackPhase::Loading
        } else if self.playing {
            PlaybackPhase::Playing
        } else if self.started {
            PlaybackPhase::Paused
        } else {
            PlaybackPhase::Ready
        }
    }

    // -------------------------------------------------------------------------
    // Media Resource Notifications
    // -------------------------------------------------------------------------

    /// Apply a notification from the media resource
    pub fn handle_event(&mut self, event: &MediaEvent) {
        match event {
            MediaEvent::LoadStart => {
                self.loading = true;
            }
            MediaEvent::CanPlay => {
                self.loading = false;
                self.errored = false;
                self.error_detail = None;
            }
            // Re-entrant from Playing or Paused; the playing flag survives
            // so playback resumes when data arrives.
            MediaEvent::Waiting => {
                self.loading = true;
            }
            MediaEvent::Progress {
                buffered_to,
                duration,
            } => {
                self.buffered_pct = if *duration > 0.0 {
                    (buffered_to / duration * 100.0).clamp(0.0, 100.0)
                } else {
                    0.0
                };
            }
            MediaEvent::Error(detail) => {
                self.errored = true;
                self.loading = false;
                self.playing = false;
                self.error_detail = Some(detail.clone());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Control Surface
    // -------------------------------------------------------------------------

    /// Toggle between playing and paused. Rejected while loading or errored.
    pub fn toggle_play(&mut self) -> Option<MediaCommand> {
        if self.loading || self.errored {
            return None;
        }
        if self.playing {
            self.playing = false;
            Some(MediaCommand::Pause)
        } else {
            self.playing = true;
            self.started = true;
            Some(MediaCommand::Play)
        }
    }

    /// Skip backward by the configured offset
    pub fn skip_back(&mut self) -> Option<MediaCommand> {
        self.skip(-self.options.skip_seconds)
    }

    /// Skip forward by the configured offset
    pub fn skip_forward(&mut self) -> Option<MediaCommand> {
        self.skip(self.options.skip_seconds)
    }

    /// Adjust the position by a signed offset. Range clamping is the media
    /// resource's job, not the adapter's. Rejected only once errored.
    pub fn skip(&mut self, seconds: f64) -> Option<MediaCommand> {
        if self.errored {
            return None;
        }
        Some(MediaCommand::SeekBy(seconds))
    }

    /// Apply one of the offered rate multipliers. Values outside the set are
    /// rejected; so is the action while loading or errored.
    pub fn set_rate(&mut self, rate: f64) -> Option<MediaCommand> {
        if self.loading || self.errored || !self.options.offers_rate(rate) {
            return None;
        }
        self.rate = rate;
        Some(MediaCommand::SetRate(rate))
    }

    /// Apply the offered rate at the given index (keyboard quick-select)
    pub fn set_rate_index(&mut self, index: usize) -> Option<MediaCommand> {
        let rate = *self.options.rates.get(index)?;
        self.set_rate(rate)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
