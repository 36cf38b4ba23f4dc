//! Midnight theme for animestream
//!
//! Dark slate background with a blue action color, matching the show-card
//! look the app presents: soft white text, yellow rating star, red error.

use ratatui::style::{Color, Modifier, Style};

/// Midnight color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #111827 (near-black slate)
    pub const BACKGROUND: Color = Color::Rgb(0x11, 0x18, 0x27);

    /// Panels and cards: #1f2937
    pub const PANEL: Color = Color::Rgb(0x1f, 0x29, 0x37);

    /// Raised surfaces (unselected episode cells): #374151
    pub const SURFACE: Color = Color::Rgb(0x37, 0x41, 0x51);

    /// Action blue, used as fill behind selected affordances: #2563eb
    pub const ACTION: Color = Color::Rgb(0x25, 0x63, 0xeb);

    /// Accent blue for links and focus: #60a5fa
    pub const ACCENT: Color = Color::Rgb(0x60, 0xa5, 0xfa);

    /// Text: #e5e7eb (soft white)
    pub const TEXT: Color = Color::Rgb(0xe5, 0xe7, 0xeb);

    /// Dim: #9ca3af (muted gray)
    pub const DIM: Color = Color::Rgb(0x9c, 0xa3, 0xaf);

    /// Rating star yellow: #facc15
    pub const RATING: Color = Color::Rgb(0xfa, 0xcc, 0x15);

    /// Playing/positive green: #4ade80
    pub const SUCCESS: Color = Color::Rgb(0x4a, 0xde, 0x80);

    /// Error red: #ef4444
    pub const ERROR: Color = Color::Rgb(0xef, 0x44, 0x44);

    /// Border (quiet)
    pub const BORDER: Color = Self::SURFACE;

    /// Border when focused
    pub const BORDER_FOCUSED: Color = Self::ACCENT;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    /// Accent text (links, focused hints)
    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Rating star
    pub fn rating() -> Style {
        Style::default().fg(Self::RATING)
    }

    /// Genre pill: white on action blue
    pub fn genre_tag() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::ACTION)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    /// Positive/playing style
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS).add_modifier(Modifier::BOLD)
    }

    /// Loading indicator
    pub fn loading() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Episode cell (unselected): text on raised surface
    pub fn episode_cell() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::SURFACE)
    }

    /// Episode cell (selected): white on action blue, like the hovered card
    pub fn episode_cell_selected() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::ACTION)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected rate button in the transport bar
    pub fn rate_selected() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::ACTION)
            .add_modifier(Modifier::BOLD)
    }

    /// Unselected rate button
    pub fn rate_unselected() -> Style {
        Style::default().fg(Self::DIM).bg(Self::SURFACE)
    }

    /// Buffered-fraction gauge fill
    pub fn buffer_bar() -> Style {
        Style::default().fg(Self::ACCENT).bg(Self::PANEL)
    }

    /// Keybinding hint key
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// WCAG relative luminance of an sRGB color
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    fn lin(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * lin(r) + 0.7152 * lin(g) + 0.0722 * lin(b)
}

/// WCAG contrast ratio between two colors, 1..=21
pub fn contrast(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let a = luminance(fg.0, fg.1, fg.2);
    let b = luminance(bg.0, bg.1, bg.2);
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    (hi + 0.05) / (lo + 0.05)
}

/// Extract the RGB tuple from a ratatui Color (Rgb variant only)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        color_to_rgb(color).expect("theme colors are all RGB")
    }

    #[test]
    fn test_palette_is_rgb() {
        for color in [
            Theme::BACKGROUND,
            Theme::PANEL,
            Theme::SURFACE,
            Theme::ACTION,
            Theme::ACCENT,
            Theme::TEXT,
            Theme::DIM,
            Theme::RATING,
            Theme::SUCCESS,
            Theme::ERROR,
        ] {
            assert!(color_to_rgb(color).is_some());
        }
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(luminance(0, 0, 0) < 0.001);
        assert!((luminance(255, 255, 255) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_contrast_black_white() {
        assert!((contrast((0, 0, 0), (255, 255, 255)) - 21.0).abs() < 0.1);
    }

    #[test]
    fn test_body_text_readable() {
        // WCAG AA for normal text: >= 4.5:1
        let bg = rgb(Theme::BACKGROUND);
        assert!(contrast(rgb(Theme::TEXT), bg) >= 4.5);
        assert!(contrast(rgb(Theme::ACCENT), bg) >= 4.5);
        assert!(contrast(rgb(Theme::DIM), bg) >= 4.5);
    }

    #[test]
    fn test_signal_colors_visible() {
        // WCAG AA for large text / UI glyphs: >= 3:1
        let bg = rgb(Theme::BACKGROUND);
        for color in [Theme::RATING, Theme::SUCCESS, Theme::ERROR, Theme::ACTION] {
            let ratio = contrast(rgb(color), bg);
            assert!(ratio >= 3.0, "{:?} on background is {:.2}:1", color, ratio);
        }
    }

    #[test]
    fn test_filled_affordances_readable() {
        // Text sits on the action blue in selected cells and genre pills
        assert!(contrast(rgb(Theme::TEXT), rgb(Theme::ACTION)) >= 3.0);
        assert!(contrast(rgb(Theme::TEXT), rgb(Theme::SURFACE)) >= 4.5);
    }
}
