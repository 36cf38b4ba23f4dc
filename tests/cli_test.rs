//! CLI tests
//!
//! Covers argument parsing, episode-reference validation, and exit codes.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use animestream::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>(["animestream"]);
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_catalog_command_and_alias() {
        for argv in [["animestream", "catalog"], ["animestream", "cat"]] {
            let cli = Cli::parse_from(argv);
            assert!(matches!(cli.command, Some(Command::Catalog(_))));
        }
    }

    #[test]
    fn test_episodes_command_and_alias() {
        for argv in [["animestream", "episodes"], ["animestream", "eps"]] {
            let cli = Cli::parse_from(argv);
            assert!(matches!(cli.command, Some(Command::Episodes(_))));
        }
    }

    #[test]
    fn test_locate_command() {
        let cli = Cli::parse_from(["animestream", "locate", "3"]);
        match cli.command {
            Some(Command::Locate(cmd)) => assert_eq!(cmd.episode, "3"),
            _ => panic!("Expected Locate command"),
        }
    }

    #[test]
    fn test_locate_episode_is_opaque() {
        // Out-of-range and non-numeric references parse; validation happens
        // in the handler, bounds checking never happens at all.
        let cli = Cli::parse_from(["animestream", "locate", "99"]);
        match cli.command {
            Some(Command::Locate(cmd)) => assert_eq!(cmd.episode, "99"),
            _ => panic!("Expected Locate command"),
        }
    }

    #[test]
    fn test_play_command_defaults() {
        let cli = Cli::parse_from(["animestream", "play", "1"]);
        match cli.command {
            Some(Command::Play(cmd)) => {
                assert_eq!(cmd.episode, "1");
                assert!(cmd.rate.is_none());
            }
            _ => panic!("Expected Play command"),
        }
    }

    #[test]
    fn test_play_command_with_rate() {
        let cli = Cli::parse_from(["animestream", "play", "2", "-r", "1.5"]);
        match cli.command {
            Some(Command::Play(cmd)) => {
                assert_eq!(cmd.episode, "2");
                assert_eq!(cmd.rate, Some(1.5));
            }
            _ => panic!("Expected Play command"),
        }
    }

    #[test]
    fn test_open_command_routes() {
        let cli = Cli::parse_from(["animestream", "open", "/"]);
        match cli.command {
            Some(Command::Open(cmd)) => assert_eq!(cmd.route, "/"),
            _ => panic!("Expected Open command"),
        }

        let cli = Cli::parse_from(["animestream", "open", "/watch/2"]);
        match cli.command {
            Some(Command::Open(cmd)) => assert_eq!(cmd.route, "/watch/2"),
            _ => panic!("Expected Open command"),
        }
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::parse_from(["animestream", "--json", "-q", "episodes"]);
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["animestream", "locate", "1", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::parse_from(["animestream", "-c", "/tmp/alt.toml", "catalog"]);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/alt.toml"))
        );
    }
}

// =============================================================================
// Validation Tests
// =============================================================================

mod validation {
    use animestream::cli::validate_episode;

    #[test]
    fn test_accepts_single_segments() {
        assert!(validate_episode("1").is_ok());
        assert!(validate_episode("99").is_ok());
        assert!(validate_episode("ova-special").is_ok());
    }

    #[test]
    fn test_rejects_non_segments() {
        assert!(validate_episode("").is_err());
        assert!(validate_episode("1/2").is_err());
        assert!(validate_episode("episode one").is_err());
        assert!(validate_episode("\t1").is_err());
    }
}

// =============================================================================
// Exit Code Tests
// =============================================================================

mod exit_codes {
    use animestream::cli::ExitCode;

    #[test]
    fn test_exit_codes_are_stable() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::PlayerNotFound), 3);
        assert_eq!(i32::from(ExitCode::PlaybackFailed), 4);
    }
}

// =============================================================================
// Route Grammar Tests (CLI `open` input)
// =============================================================================

mod routes {
    use animestream::Route;

    #[test]
    fn test_open_accepts_both_destinations() {
        assert!(Route::parse("/").is_some());
        assert!(Route::parse("/watch/1").is_some());
    }

    #[test]
    fn test_open_rejects_unknown_paths() {
        assert!(Route::parse("/settings").is_none());
        assert!(Route::parse("/watch/1/2").is_none());
        assert!(Route::parse("watch/1").is_none());
    }
}
