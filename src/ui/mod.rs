//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout; the view
//! modules hold the pure line-building helpers, the render functions live
//! with the event loop in main.

pub mod catalog;
pub mod player;
pub mod theme;

pub use theme::Theme;
