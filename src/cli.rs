//! CLI - Command Line Interface for animestream
//!
//! Every TUI capability is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Show the catalog entry
//! animestream catalog --json
//!
//! # List the episode routes
//! animestream episodes
//!
//! # Resolve an episode to its media URI
//! animestream locate 3
//!
//! # Headless playback
//! animestream play 1 --rate 1.5
//!
//! # Launch the TUI directly at a route
//! animestream open /watch/2
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Player binary not found
    PlayerNotFound = 3,
    /// The media resource signalled an error
    PlaybackFailed = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// animestream - terminal front-end for an anime series catalog
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "animestream",
    version,
    about = "Terminal front-end for an anime series catalog",
    long_about = "Browse the series catalog and play episodes with transport \
                  controls backed by mpv.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  animestream                    Launch interactive TUI\n\
                  animestream catalog --json     Print the catalog entry\n\
                  animestream play 1             Play episode 1 headless\n\
                  animestream open /watch/2      Open the TUI on episode 2"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the catalog entry
    #[command(visible_alias = "cat")]
    Catalog(CatalogCmd),

    /// List episode routes
    #[command(visible_alias = "eps")]
    Episodes(EpisodesCmd),

    /// Resolve an episode reference to its media URI
    #[command(visible_alias = "loc")]
    Locate(LocateCmd),

    /// Play an episode without the TUI
    Play(PlayCmd),

    /// Launch the TUI at a route (/ or /watch/<episode>)
    Open(OpenCmd),
}

/// Show the catalog entry
#[derive(Args, Debug)]
pub struct CatalogCmd {}

/// List episode routes
#[derive(Args, Debug)]
pub struct EpisodesCmd {}

/// Resolve an episode reference to its media URI
#[derive(Args, Debug)]
pub struct LocateCmd {
    /// Episode reference (forwarded verbatim into the locator)
    #[arg(required = true)]
    pub episode: String,
}

/// Play an episode without the TUI
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Episode reference
    #[arg(required = true)]
    pub episode: String,

    /// Playback-rate multiplier (must be one of the offered set)
    #[arg(long, short = 'r')]
    pub rate: Option<f64>,
}

/// Launch the TUI at a route
#[derive(Args, Debug)]
pub struct OpenCmd {
    /// Route path: `/` or `/watch/<episode>`
    #[arg(required = true)]
    pub route: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a plain line (non-JSON mode), or structured data (JSON mode)
    pub fn line(&self, plain: impl std::fmt::Display, data: impl Serialize) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            println!("{}", plain);
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON modes)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Episode Reference Validation
// =============================================================================

/// Validate that an episode reference can form a route segment.
///
/// The reference stays opaque (no catalog-bounds check); only strings that
/// cannot appear as a single path segment are rejected.
pub fn validate_episode(id: &str) -> Result<&str, &'static str> {
    if id.is_empty() {
        Err("Episode reference must not be empty")
    } else if id.contains('/') || id.chars().any(char::is_whitespace) {
        Err("Episode reference must be a single path segment")
    } else {
        Ok(id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>(["animestream"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_catalog_command() {
        let cli = Cli::parse_from(["animestream", "catalog"]);
        assert!(matches!(cli.command, Some(Command::Catalog(_))));

        let cli = Cli::parse_from(["animestream", "cat"]);
        assert!(matches!(cli.command, Some(Command::Catalog(_))));
    }

    #[test]
    fn test_locate_command() {
        let cli = Cli::parse_from(["animestream", "locate", "3"]);
        if let Some(Command::Locate(cmd)) = cli.command {
            assert_eq!(cmd.episode, "3");
        } else {
            panic!("Expected Locate command");
        }
    }

    #[test]
    fn test_play_command_with_rate() {
        let cli = Cli::parse_from(["animestream", "play", "2", "--rate", "1.5"]);
        if let Some(Command::Play(cmd)) = cli.command {
            assert_eq!(cmd.episode, "2");
            assert_eq!(cmd.rate, Some(1.5));
        } else {
            panic!("Expected Play command");
        }
    }

    #[test]
    fn test_open_command() {
        let cli = Cli::parse_from(["animestream", "open", "/watch/2"]);
        if let Some(Command::Open(cmd)) = cli.command {
            assert_eq!(cmd.route, "/watch/2");
        } else {
            panic!("Expected Open command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["animestream", "--json", "--quiet", "episodes"]);
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn test_validate_episode() {
        assert!(validate_episode("1").is_ok());
        assert!(validate_episode("99").is_ok());
        assert!(validate_episode("ova-special").is_ok());
        assert!(validate_episode("").is_err());
        assert!(validate_episode("1/2").is_err());
        assert!(validate_episode("episode 1").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::PlayerNotFound), 3);
        assert_eq!(i32::from(ExitCode::PlaybackFailed), 4);
    }
}
