//! Command line and environment configuration.

use clap::{Args, Parser, Subcommand};
use navi_player::DEFAULT_HEAD_SIZE;
use navi_subsonic::config::{DEFAULT_API_PATH, DEFAULT_API_VERSION};
use navi_subsonic::{ConnectionConfig, StarTarget};

/// Voice-style playback sessions against a Subsonic server.
#[derive(Debug, Parser)]
#[command(name = "navi", version)]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Log verbosity: 0 warnings, 1 info, 2 or 3 debug. `RUST_LOG` wins when set.
    #[arg(long, env = "NAVI_DEBUG")]
    pub debug: Option<String>,

    /// Tracks resolved before playback starts; the rest load in the background.
    #[arg(long, env = "NAVI_HEAD_SIZE", default_value_t = DEFAULT_HEAD_SIZE)]
    pub head_size: usize,

    /// Maximum number of played tracks to remember.
    #[arg(long, env = "NAVI_HISTORY_LIMIT")]
    pub history_limit: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Server URL without port, e.g. `https://music.example.com`.
    #[arg(long, env = "NAVI_URL")]
    pub url: String,

    #[arg(long, env = "NAVI_PORT")]
    pub port: u16,

    #[arg(long, env = "NAVI_API_PATH", default_value = DEFAULT_API_PATH)]
    pub api_path: String,

    #[arg(long, env = "NAVI_API_VER", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    #[arg(long, env = "NAVI_USER")]
    pub user: String,

    #[arg(long, env = "NAVI_PASS", hide_env_values = true)]
    pub password: String,
}

impl ServerArgs {
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new(&self.url, self.port, &self.user, &self.password)
            .with_api_path(&self.api_path)
            .with_api_version(&self.api_version)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check the connection to the server.
    Ping,
    /// Start a session with the given songs and print what the device receives.
    Play {
        /// Song ids, in play order.
        #[arg(required = true)]
        ids: Vec<String>,
        /// Shuffle the songs resolved up front.
        #[arg(long)]
        shuffle: bool,
    },
    /// Print the metadata of a song.
    Song { id: String },
    /// Star a song, album or artist.
    Star {
        id: String,
        #[arg(long, value_enum, default_value_t = Kind::Song)]
        kind: Kind,
    },
    /// Remove a star from a song, album or artist.
    Unstar {
        id: String,
        #[arg(long, value_enum, default_value_t = Kind::Song)]
        kind: Kind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
    Song,
    Album,
    Artist,
}

impl From<Kind> for StarTarget {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Song => Self::Song,
            Kind::Album => Self::Album,
            Kind::Artist => Self::Artist,
        }
    }
}

/// Filter directive for a `NAVI_DEBUG` level.
pub fn log_filter(level: Option<&str>) -> &'static str {
    match level.map(str::trim).and_then(|l| l.parse::<u8>().ok()) {
        Some(1) => "info",
        Some(2 | 3) => "debug",
        _ => "warn",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: [&str; 9] = [
        "navi", "--url", "http://nas.local", "--port", "4533", "--user", "alice", "--password",
        "pw",
    ];

    fn parse(extra: &[&str]) -> Cli {
        Cli::try_parse_from(BASE.iter().chain(extra)).unwrap()
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(None), "warn");
        assert_eq!(log_filter(Some("0")), "warn");
        assert_eq!(log_filter(Some("1")), "info");
        assert_eq!(log_filter(Some("2")), "debug");
        assert_eq!(log_filter(Some(" 3 ")), "debug");
        assert_eq!(log_filter(Some("7")), "warn");
        assert_eq!(log_filter(Some("verbose")), "warn");
    }

    #[test]
    fn test_parse_play() {
        let cli = parse(&["play", "a", "b", "--shuffle"]);
        assert_eq!(cli.head_size, DEFAULT_HEAD_SIZE);
        assert!(cli.history_limit.is_none());
        match cli.command {
            Command::Play { ids, shuffle } => {
                assert_eq!(ids, ["a", "b"]);
                assert!(shuffle);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let config = cli.server.connection();
        assert_eq!(config.base_url(), "http://nas.local:4533/rest");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_play_requires_ids() {
        assert!(Cli::try_parse_from(BASE.iter().chain(&["play"])).is_err());
    }

    #[test]
    fn test_parse_star_kind() {
        let cli = parse(&["star", "al-1", "--kind", "album"]);
        match cli.command {
            Command::Star { id, kind } => {
                assert_eq!(id, "al-1");
                assert_eq!(StarTarget::from(kind), StarTarget::Album);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
