//! Command-line arguments

use std::path::PathBuf;

use browser_core::{CompletionPolicy, ConfigOverrides};
use clap::Parser;

/// Bookrec TUI - browse book recommendations from the terminal
#[derive(Parser, Debug)]
#[command(name = "bookrec-tui")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "BOOKREC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Recommendation service host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Recommendation service port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Maximum number of results per search
    #[arg(short = 'k', long, value_name = "N")]
    pub limit: Option<usize>,

    /// How late completions are handled: latest-only or last-writer-wins
    #[arg(long, value_name = "POLICY")]
    pub completion_policy: Option<CompletionPolicy>,

    /// Search for this as soon as the UI is up
    #[arg(short = 'q', long, value_name = "TEXT")]
    pub query: Option<String>,
}

impl Args {
    /// Flags that override file and environment settings
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            limit: self.limit,
            completion_policy: self.completion_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_override_nothing() {
        let args = Args::try_parse_from(["bookrec-tui"]).unwrap();
        assert_eq!(args.overrides(), ConfigOverrides::default());
        assert_eq!(args.query, None);
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let args = Args::try_parse_from([
            "bookrec-tui",
            "--host",
            "books.local",
            "-p",
            "9000",
            "--limit",
            "50",
            "--query",
            "cozy mysteries",
        ])
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(overrides.host.as_deref(), Some("books.local"));
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(overrides.limit, Some(50));
        assert_eq!(args.query.as_deref(), Some("cozy mysteries"));
    }

    #[test]
    fn test_completion_policy_flag() {
        let args =
            Args::try_parse_from(["bookrec-tui", "--completion-policy", "last-writer-wins"])
                .unwrap();
        assert_eq!(
            args.overrides().completion_policy,
            Some(CompletionPolicy::LastWriterWins)
        );

        assert!(Args::try_parse_from(["bookrec-tui", "--completion-policy", "sometimes"]).is_err());
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Args::try_parse_from(["bookrec-tui", "--port", "nope"]).is_err());
    }
}
