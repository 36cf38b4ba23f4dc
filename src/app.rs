//! App state and core application logic
//!
//! Manages the navigation stack between the two views, the episode-grid
//! selection, and the keyboard surface. User actions that concern the media
//! resource are queued as `MediaCommand`s in an outbox; the event loop
//! drains it and forwards to the player handle, which keeps everything here
//! synchronous and directly testable.

use crate::media::{MediaCommand, MediaLocator};
use crate::models::{EpisodeRef, Route, Series};
use crate::playback::{PlaybackSession, PlayerOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Columns in the catalog's episode grid
pub const EPISODE_GRID_COLUMNS: usize = 5;

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Catalog view: series card and episode grid
    Catalog,
    /// Playback view for one episode
    Watch,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Catalog
    }
}

// =============================================================================
// Episode Grid Selection
// =============================================================================

/// Selection state for the fixed-column episode grid
#[derive(Debug, Clone, Default)]
pub struct GridState {
    /// Currently selected cell index
    pub selected: usize,
    /// Total number of cells
    pub len: usize,
    /// Cells per row
    pub columns: usize,
}

impl GridState {
    pub fn new(len: usize, columns: usize) -> Self {
        Self {
            selected: 0,
            len,
            columns: columns.max(1),
        }
    }

    pub fn left(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn right(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn down(&mut self) {
        if self.selected + self.columns < self.len {
            self.selected += self.columns;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Catalog view state
#[derive(Debug, Clone)]
pub struct CatalogState {
    /// Episode grid selection
    pub grid: GridState,
}

impl CatalogState {
    pub fn new(series: &Series) -> Self {
        Self {
            grid: GridState::new(series.episodes as usize, EPISODE_GRID_COLUMNS),
        }
    }

    /// Episode reference for the selected grid cell
    pub fn selected_episode(&self) -> EpisodeRef {
        EpisodeRef::from_number(self.grid.selected as u32 + 1)
    }
}

/// Playback view state: one session per mount
#[derive(Debug, Clone)]
pub struct WatchState {
    pub session: PlaybackSession,
}

impl WatchState {
    pub fn new(episode: EpisodeRef, options: PlayerOptions) -> Self {
        Self {
            session: PlaybackSession::new(episode, options),
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// The catalog entry, injected at construction
    pub series: Series,
    /// Transport configuration
    pub options: PlayerOptions,
    /// Media resource locator
    pub locator: MediaLocator,
    /// Current view
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Global error message (popup overlay)
    pub error: Option<String>,

    // View-specific states
    pub catalog: CatalogState,
    pub watch: Option<WatchState>,

    /// Commands awaiting delivery to the media handle
    outbox: Vec<MediaCommand>,
}

impl App {
    /// Create a new App around an injected catalog entry
    pub fn new(series: Series, options: PlayerOptions, locator: MediaLocator) -> Self {
        let catalog = CatalogState::new(&series);
        Self {
            series,
            options,
            locator,
            state: AppState::Catalog,
            nav_stack: Vec::new(),
            running: true,
            error: None,
            catalog,
            watch: None,
            outbox: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
    }

    /// Go back to the previous state. Leaving the playback view unmounts it.
    pub fn back(&mut self) -> bool {
        if let Some(prev) = self.nav_stack.pop() {
            if self.state == AppState::Watch && prev != AppState::Watch {
                self.watch = None;
            }
            self.state = prev;
            true
        } else {
            false
        }
    }

    /// Jump to a parsed route (CLI `open`, error-view recovery)
    pub fn goto_route(&mut self, route: Route) {
        match route {
            Route::Catalog => {
                while self.back() {}
                self.watch = None;
                self.state = AppState::Catalog;
            }
            Route::Watch(episode) => self.open_episode(episode),
        }
    }

    /// Current location as a route path
    pub fn route(&self) -> Route {
        match (&self.state, &self.watch) {
            (AppState::Watch, Some(watch)) => Route::Watch(watch.session.episode().clone()),
            _ => Route::Catalog,
        }
    }

    /// Open an episode in the playback view.
    ///
    /// If the view is already mounted the session resets in place and the
    /// same media resource receives a fresh load, superseding any in-flight
    /// one; otherwise the view mounts first.
    pub fn open_episode(&mut self, episode: EpisodeRef) {
        let uri = self.locator.resolve(&episode);
        match &mut self.watch {
            Some(watch) if self.state == AppState::Watch => {
                watch.session.reset(episode);
            }
            _ => {
                self.watch = Some(WatchState::new(episode, self.options.clone()));
                self.navigate(AppState::Watch);
            }
        }
        self.outbox.push(MediaCommand::Load(uri));
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Whether a media handle should currently be mounted
    pub fn wants_player(&self) -> bool {
        self.state == AppState::Watch && self.watch.is_some()
    }

    // -------------------------------------------------------------------------
    // Media Events / Commands
    // -------------------------------------------------------------------------

    /// Apply a notification from the media resource
    pub fn on_media_event(&mut self, event: &crate::media::MediaEvent) {
        if let Some(watch) = &mut self.watch {
            watch.session.handle_event(event);
        }
    }

    /// Drain the commands queued by user actions
    pub fn take_commands(&mut self) -> Vec<MediaCommand> {
        std::mem::take(&mut self.outbox)
    }

    fn push_command(&mut self, command: Option<MediaCommand>) {
        if let Some(cmd) = command {
            self.outbox.push(cmd);
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if the event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear the error popup on any keypress
        self.error = None;

        // Global quit shortcut (Ctrl+C or q)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Esc => {
                return self.back();
            }
            _ => {}
        }

        match self.state {
            AppState::Catalog => self.handle_catalog_key(key),
            AppState::Watch => self.handle_watch_key(key),
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.catalog.grid.left();
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.catalog.grid.right();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.catalog.grid.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.catalog.grid.down();
                true
            }
            KeyCode::Home => {
                self.catalog.grid.first();
                true
            }
            KeyCode::End => {
                self.catalog.grid.last();
                true
            }
            KeyCode::Enter => {
                let episode = self.catalog.selected_episode();
                self.open_episode(episode);
                true
            }
            _ => false,
        }
    }

    fn handle_watch_key(&mut self, key: KeyEvent) -> bool {
        // The error view replaces the transport; Enter is its recovery
        // affordance back to the catalog.
        if self
            .watch
            .as_ref()
            .is_some_and(|w| w.session.is_errored())
        {
            return match key.code {
                KeyCode::Enter | KeyCode::Backspace => self.back(),
                _ => false,
            };
        }

        let Some(watch) = &mut self.watch else {
            return false;
        };
        let command = match key.code {
            KeyCode::Char(' ') => watch.session.toggle_play(),
            KeyCode::Left => watch.session.skip_back(),
            KeyCode::Right => watch.session.skip_forward(),
            // Quick-select a rate by its position in the offered set
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                watch.session.set_rate_index(idx)
            }
            _ => return false,
        };
        self.push_command(command);
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
