//! Playback view
//!
//! Line-building helpers for the transport bar, the buffering gauge, and
//! the error screen that replaces the whole view when the media resource
//! fails.

use crate::models::{EpisodeRef, Route, Series};
use crate::playback::{PlaybackPhase, PlaybackSession};
use crate::ui::Theme;
use ratatui::text::{Line, Span};

/// Heading for the playback view
pub fn watch_title(series: &Series, episode: &EpisodeRef) -> String {
    format!("{} - Episode {}", series.title, episode)
}

/// Compact label for a rate multiplier: 0.5x, 1x, 1.5x, 2x
pub fn rate_label(rate: f64) -> String {
    if (rate - rate.round()).abs() < 1e-9 {
        format!("{}x", rate.round() as i64)
    } else {
        format!("{}x", rate)
    }
}

/// Buffered fraction as a gauge ratio in 0..=1
pub fn buffered_ratio(session: &PlaybackSession) -> f64 {
    (session.buffered_pct() / 100.0).clamp(0.0, 1.0)
}

/// The transport bar: skip back, play/pause, skip forward, rate buttons
pub fn transport_line(session: &PlaybackSession) -> Line<'static> {
    let skip = session.options().skip_seconds.round() as i64;
    let toggle = if session.is_playing() { "⏸" } else { "▶" };
    let toggle_style = if session.is_loading() || session.is_errored() {
        Theme::dimmed()
    } else if session.is_playing() {
        Theme::success()
    } else {
        Theme::text()
    };

    let mut spans: Vec<Span> = vec![
        Span::raw("  "),
        Span::styled(format!("⏪ {}s", skip), Theme::text()),
        Span::raw("   "),
        Span::styled(toggle.to_string(), toggle_style),
        Span::raw("   "),
        Span::styled(format!("{}s ⏩", skip), Theme::text()),
        Span::raw("      "),
    ];

    for (i, rate) in session.options().rates.iter().enumerate() {
        let style = if (rate - session.rate()).abs() < 1e-9 {
            Theme::rate_selected()
        } else {
            Theme::rate_unselected()
        };
        spans.push(Span::styled(
            format!(" {}:{} ", i + 1, rate_label(*rate)),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    Line::from(spans)
}

/// One-line phase indicator under the video surface
pub fn phase_line(session: &PlaybackSession) -> Line<'static> {
    let phase = session.phase();
    let style = match phase {
        PlaybackPhase::Loading => Theme::loading(),
        PlaybackPhase::Playing => Theme::success(),
        PlaybackPhase::Errored => Theme::error(),
        _ => Theme::dimmed(),
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(phase.to_string(), style),
        Span::raw("   "),
        Span::styled(
            format!("buffered {:.0}%", session.buffered_pct()),
            Theme::dimmed(),
        ),
    ])
}

/// Keybinding hints for the transport
pub fn controls_hint_line() -> Line<'static> {
    Line::from(vec![
        Span::styled(" SPACE ", Theme::keybind()),
        Span::styled("Play/Pause  ", Theme::dimmed()),
        Span::styled(" ←→ ", Theme::keybind()),
        Span::styled("Skip  ", Theme::dimmed()),
        Span::styled(" 1-4 ", Theme::keybind()),
        Span::styled("Speed  ", Theme::dimmed()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Back", Theme::dimmed()),
    ])
}

/// Full-view replacement shown when the media resource fails.
///
/// Names the requested episode and offers the one recovery affordance:
/// back to the catalog.
pub fn error_lines(episode: &EpisodeRef) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled("Video Not Available", Theme::error())),
        Line::from(""),
        Line::from(Span::styled(
            format!("The video file for Episode {} could not be loaded.", episode),
            Theme::text(),
        )),
        Line::from(Span::styled(
            "Please make sure the video file exists in the correct format.",
            Theme::dimmed(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ENTER ", Theme::keybind()),
            Span::styled(
                format!("Return to catalog ({})", Route::Catalog),
                Theme::accent(),
            ),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaEvent;
    use crate::playback::PlayerOptions;

    fn ready_session() -> PlaybackSession {
        let mut s = PlaybackSession::new(EpisodeRef::new("1"), PlayerOptions::default());
        s.handle_event(&MediaEvent::CanPlay);
        s
    }

    #[test]
    fn test_watch_title() {
        let series = Series::builtin();
        assert_eq!(
            watch_title(&series, &EpisodeRef::new("3")),
            "Demon Slayer - Episode 3"
        );
    }

    #[test]
    fn test_rate_labels() {
        assert_eq!(rate_label(0.5), "0.5x");
        assert_eq!(rate_label(1.0), "1x");
        assert_eq!(rate_label(1.5), "1.5x");
        assert_eq!(rate_label(2.0), "2x");
    }

    #[test]
    fn test_transport_line_shows_all_rates() {
        let session = ready_session();
        let text = transport_line(&session).to_string();
        for label in ["0.5x", "1x", "1.5x", "2x"] {
            assert!(text.contains(label), "missing {} in {:?}", label, text);
        }
        assert!(text.contains("⏪ 10s"));
        assert!(text.contains("10s ⏩"));
    }

    #[test]
    fn test_transport_toggle_glyph_follows_state() {
        let mut session = ready_session();
        assert!(transport_line(&session).to_string().contains('▶'));

        session.toggle_play();
        assert!(transport_line(&session).to_string().contains('⏸'));
    }

    #[test]
    fn test_buffered_ratio() {
        let mut session = ready_session();
        session.handle_event(&MediaEvent::Progress {
            buffered_to: 30.0,
            duration: 60.0,
        });
        assert!((buffered_ratio(&session) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_phase_line_reports_buffered_pct() {
        let mut session = ready_session();
        session.handle_event(&MediaEvent::Progress {
            buffered_to: 15.0,
            duration: 60.0,
        });
        let text = phase_line(&session).to_string();
        assert!(text.contains("buffered 25%"));
    }

    #[test]
    fn test_error_view_names_episode_and_catalog_route() {
        let lines = error_lines(&EpisodeRef::new("99"));
        let text: String = lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        assert!(text.contains("Video Not Available"));
        assert!(text.contains("99"));
        assert!(text.contains(&Route::Catalog.to_string()));
    }
}
