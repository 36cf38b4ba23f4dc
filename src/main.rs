//! animestream - terminal front-end for an anime series catalog
//!
//! Browse the series, pick an episode, and play it with transport controls
//! backed by an mpv subprocess.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! animestream
//!
//! # CLI mode (for automation)
//! animestream catalog --json
//! animestream locate 3
//! animestream play 1 --rate 1.5
//! animestream open /watch/2
//! ```

// The modules are shared with the library crate; helpers the binary doesn't
// reach are exercised there and in the integration tests.
#![allow(dead_code)]

mod app;
mod cli;
mod commands;
mod config;
mod media;
mod models;
mod playback;
mod ui;

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::app::{App, AppState, EPISODE_GRID_COLUMNS};
use crate::cli::{Cli, Command, ExitCode, Output};
use crate::config::Config;
use crate::media::{MediaEvent, MediaLocator, MpvHandle};
use crate::models::Route;
use crate::ui::{catalog, player, Theme};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(&cli);
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    match cli.command {
        // TUI mode at the catalog root
        None => run_tui(&config, Route::Catalog).await,

        // TUI mode at an explicit route
        Some(Command::Open(cmd)) => match Route::parse(&cmd.route) {
            Some(route) => run_tui(&config, route).await,
            None => {
                let code = output.error(
                    format!("Unknown route: {} (try / or /watch/<episode>)", cmd.route),
                    ExitCode::InvalidArgs,
                );
                std::process::exit(code.into());
            }
        },

        // CLI mode: execute command and exit
        Some(command) => {
            let code = run_cli(command, &config, &output).await;
            std::process::exit(code.into());
        }
    }
}

/// Run a CLI command and return its exit code
async fn run_cli(command: Command, config: &Config, output: &Output) -> ExitCode {
    match command {
        Command::Catalog(cmd) => commands::catalog_cmd(cmd, config, output),
        Command::Episodes(cmd) => commands::episodes_cmd(cmd, config, output),
        Command::Locate(cmd) => commands::locate_cmd(cmd, config, output),
        Command::Play(cmd) => commands::play_cmd(cmd, config, output).await,
        // Dispatched to the TUI before reaching here
        Command::Open(_) => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive TUI starting at the given route
async fn run_tui(config: &Config, route: Route) -> Result<()> {
    let series = config.series();
    let options = config.player_options();
    let locator = MediaLocator::new(config.media_source());

    let mut app = App::new(series, options, locator);
    app.goto_route(route);

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, config).await;

    // Always restore the terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// A mounted media handle together with its event stream
struct PlayerSlot {
    handle: MpvHandle,
    events: mpsc::UnboundedReceiver<MediaEvent>,
}

/// Main event loop - mounts/unmounts the player, forwards commands and
/// notifications, handles input, renders
async fn run_event_loop(terminal: &mut Tui, app: &mut App, config: &Config) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let mut player: Option<PlayerSlot> = None;

    while app.running {
        // The handle exists exactly while a live (non-errored) playback view
        // is mounted; unmounting releases process, socket, and listener task.
        let wants_player = app.wants_player()
            && app
                .watch
                .as_ref()
                .is_some_and(|w| !w.session.is_errored());

        if wants_player && player.is_none() {
            match MpvHandle::spawn(config.mpv_path.as_deref()).await {
                Ok((handle, events)) => player = Some(PlayerSlot { handle, events }),
                Err(e) => {
                    // A backend that can't start is the same single failure
                    // kind as a resource that can't load
                    app.on_media_event(&MediaEvent::Error(e.to_string()));
                }
            }
        } else if !wants_player {
            if let Some(slot) = player.take() {
                slot.handle.shutdown().await;
            }
        }

        match &mut player {
            Some(slot) => {
                for command in app.take_commands() {
                    if slot.handle.send(&command).await.is_err() {
                        app.on_media_event(&MediaEvent::Error("player connection lost".into()));
                        break;
                    }
                }
                while let Ok(event) = slot.events.try_recv() {
                    app.on_media_event(&event);
                }
            }
            None => {
                // No resource mounted; queued commands have no destination
                app.take_commands();
            }
        }

        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    if let Some(slot) = player.take() {
        slot.handle.shutdown().await;
    }

    Ok(())
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function - dispatches to view-specific renderers
fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    match app.state {
        AppState::Catalog => render_catalog(frame, chunks[1], app),
        AppState::Watch => render_watch(frame, chunks[1], app),
    }
    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Render the header: logo and current route
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Logo
            Constraint::Min(1),     // Route
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "◉ Anime",
            ratatui::style::Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Stream",
            ratatui::style::Style::default()
                .fg(Theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let route = Paragraph::new(Line::from(vec![
        Span::styled(app.route().to_string(), Theme::accent()),
        Span::raw("  "),
        Span::styled(app.series.title.clone(), Theme::dimmed()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(route, header_chunks[1]);
}

/// Render the catalog: series card and episode grid
fn render_catalog(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" CATALOG ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = catalog::series_card_lines(&app.series);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Episodes", Theme::title())));
    lines.push(Line::from(""));

    let rows = catalog::grid_rows(app.series.episodes as usize, EPISODE_GRID_COLUMNS);
    for row in 0..rows {
        lines.push(catalog::episode_row_line(
            &app.series,
            row,
            EPISODE_GRID_COLUMNS,
            app.catalog.grid.selected,
        ));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("  ←↑↓→ ", Theme::keybind()),
        Span::styled("Select  ", Theme::dimmed()),
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled("Watch", Theme::dimmed()),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the playback view: video surface, buffer gauge, transport bar
fn render_watch(frame: &mut Frame, area: Rect, app: &App) {
    let Some(watch) = &app.watch else {
        return;
    };
    let session = &watch.session;

    // The error view replaces the whole playback surface
    if session.is_errored() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ PLAYBACK ", Theme::error()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let para = Paragraph::new(player::error_lines(session.episode()))
            .alignment(Alignment::Center);
        frame.render_widget(para, inner);
        return;
    }

    let title = player::watch_title(&app.series, session.episode());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(format!(" {} ", title), Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Video surface
            Constraint::Length(1), // Buffer gauge
            Constraint::Length(1), // Phase line
            Constraint::Length(1), // Transport bar
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let surface_text = if session.is_loading() {
        Line::from(Span::styled(
            format!("⟳ Loading episode {}...", session.episode()),
            Theme::loading(),
        ))
    } else if session.is_playing() {
        Line::from(Span::styled("▶", Theme::success()))
    } else {
        Line::from(Span::styled("⏸", Theme::dimmed()))
    };
    let surface = Paragraph::new(vec![Line::from(""), surface_text])
        .alignment(Alignment::Center)
        .style(ratatui::style::Style::default().bg(Theme::PANEL));
    frame.render_widget(surface, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Theme::buffer_bar())
        .ratio(player::buffered_ratio(session))
        .label(format!("buffered {:.0}%", session.buffered_pct()));
    frame.render_widget(gauge, chunks[1]);

    frame.render_widget(Paragraph::new(player::phase_line(session)), chunks[2]);
    frame.render_widget(Paragraph::new(player::transport_line(session)), chunks[3]);
    frame.render_widget(Paragraph::new(player::controls_hint_line()), chunks[4]);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let view_indicator = Span::styled(
        match app.state {
            AppState::Catalog => " CATALOG ",
            AppState::Watch => " WATCH ",
        },
        ratatui::style::Style::default()
            .fg(Theme::BACKGROUND)
            .bg(Theme::ACCENT),
    );

    let phase_indicator = match &app.watch {
        Some(watch) if app.state == AppState::Watch => {
            Span::styled(format!(" {} ", watch.session.phase()), Theme::dimmed())
        }
        _ => Span::styled(
            format!(" {} episodes ", app.series.episodes),
            Theme::dimmed(),
        ),
    };

    let help = Span::styled(" q:quit  ESC:back ", Theme::dimmed());

    let status_line = Line::from(vec![
        view_indicator,
        phase_indicator,
        Span::raw(" │ "),
        help,
    ]);

    frame.render_widget(Paragraph::new(status_line).style(Theme::status_bar()), area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}
