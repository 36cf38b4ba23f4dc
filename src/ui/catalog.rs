//! Catalog view
//!
//! Pure line-building helpers for the series card and the episode grid.
//! The view is a pure render of the injected catalog entry: one navigation
//! affordance per episode index, nothing else.

use crate::models::{Route, Series};
use crate::ui::Theme;
use ratatui::text::{Line, Span};

/// One navigation affordance per episode, in order: `/watch/1`..`/watch/n`
pub fn episode_routes(series: &Series) -> Vec<Route> {
    series.episode_refs().map(Route::Watch).collect()
}

/// Rows needed to lay `len` cells out in `columns` columns
pub fn grid_rows(len: usize, columns: usize) -> usize {
    len.div_ceil(columns.max(1))
}

/// The series card: title, description, rating, genre pills, thumbnail ref
pub fn series_card_lines(series: &Series) -> Vec<Line<'static>> {
    let mut genre_spans: Vec<Span> = vec![Span::raw("  ")];
    for genre in &series.genres {
        genre_spans.push(Span::styled(format!(" {} ", genre), Theme::genre_tag()));
        genre_spans.push(Span::raw(" "));
    }

    vec![
        Line::from(Span::styled(series.title.clone(), Theme::title())),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", series.description), Theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("★ {}", series.rating), Theme::rating()),
        ]),
        Line::from(genre_spans),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(series.thumbnail.clone(), Theme::dimmed()),
        ]),
    ]
}

/// Label for one episode cell
pub fn episode_label(index: usize) -> String {
    format!("▶ Episode {}", index + 1)
}

/// One row of the episode grid as a styled line
pub fn episode_row_line(
    series: &Series,
    row: usize,
    columns: usize,
    selected: usize,
) -> Line<'static> {
    let total = series.episodes as usize;
    let mut spans: Vec<Span> = vec![Span::raw("  ")];

    for col in 0..columns {
        let idx = row * columns + col;
        if idx >= total {
            break;
        }
        let style = if idx == selected {
            Theme::episode_cell_selected()
        } else {
            Theme::episode_cell()
        };
        spans.push(Span::styled(format!("  {}  ", episode_label(idx)), style));
        spans.push(Span::raw("  "));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EpisodeRef;

    #[test]
    fn test_one_affordance_per_episode() {
        let series = Series::builtin();
        let routes = episode_routes(&series);

        assert_eq!(routes.len(), series.episodes as usize);
        for (i, route) in routes.iter().enumerate() {
            assert_eq!(*route, Route::Watch(EpisodeRef::from_number(i as u32 + 1)));
            assert_eq!(route.to_string(), format!("/watch/{}", i + 1));
        }
    }

    #[test]
    fn test_affordances_are_distinct() {
        let series = Series::builtin();
        let routes = episode_routes(&series);
        let unique: std::collections::HashSet<_> = routes.iter().collect();
        assert_eq!(unique.len(), routes.len());
    }

    #[test]
    fn test_grid_rows() {
        assert_eq!(grid_rows(5, 5), 1);
        assert_eq!(grid_rows(6, 5), 2);
        assert_eq!(grid_rows(0, 5), 0);
        assert_eq!(grid_rows(12, 5), 3);
    }

    #[test]
    fn test_series_card_contains_metadata() {
        let series = Series::builtin();
        let text: String = series_card_lines(&series)
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        assert!(text.contains("Demon Slayer"));
        assert!(text.contains("★ 4.8"));
        assert!(text.contains("Action"));
        assert!(text.contains("Fantasy"));
        assert!(text.contains("Adventure"));
        assert!(text.contains(&series.thumbnail));
    }

    #[test]
    fn test_episode_row_line_contents() {
        let series = Series::builtin();
        let row = episode_row_line(&series, 0, 5, 2).to_string();
        for n in 1..=5 {
            assert!(row.contains(&format!("Episode {}", n)));
        }

        // A second row of a 5-column grid holds nothing for 5 episodes
        let row = episode_row_line(&series, 1, 5, 0).to_string();
        assert!(!row.contains("Episode"));
    }
}
