//! Command-line interface parsing for Club H2H CLI
//!
//! This module handles parsing of CLI arguments using clap: the global
//! configuration and cache flags, and one subcommand per lookup.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Club H2H CLI - Compare football clubs head-to-head
#[derive(Parser, Debug)]
#[command(name = "clubh2h")]
#[command(about = "Head-to-head football statistics from API-Football")]
#[command(version)]
pub struct Cli {
    /// Path to a config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for cached API responses
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep cached responses in memory only for this run
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the countries available for team selection
    Countries,

    /// List the teams of a country
    Teams {
        /// Country name, e.g. "England"
        country: String,
    },

    /// List the supported leagues
    Leagues,

    /// List the teams of a league season
    LeagueTeams {
        /// League id from `clubh2h leagues`
        league: u32,

        /// Season year (defaults to the configured season)
        #[arg(long)]
        season: Option<u16>,
    },

    /// Show the home stadium of a team
    Venue {
        /// League id from `clubh2h leagues`
        league: u32,

        /// Exact team name as listed by `clubh2h league-teams`
        team: String,

        /// Season year (defaults to the configured season)
        #[arg(long)]
        season: Option<u16>,
    },

    /// Compare two teams head-to-head
    H2h {
        /// Country of the first team
        #[arg(long)]
        country1: String,

        /// Exact name of the first team
        #[arg(long)]
        team1: String,

        /// Country of the second team
        #[arg(long)]
        country2: String,

        /// Exact name of the second team
        #[arg(long)]
        team2: String,
    },
}

/// Log filter directive for a `-v` count
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
