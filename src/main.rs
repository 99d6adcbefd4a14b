//! Club H2H CLI - Head-to-head football statistics
//!
//! Looks up countries, teams, stadiums, and the head-to-head record between
//! two clubs from API-Football, caching every response for 24 hours.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clubh2h::app::{App, ValidationError};
use clubh2h::cache::{ExpiringCache, FileStore, MemoryStore, SessionCache};
use clubh2h::cli::{log_level, Cli, Command};
use clubh2h::config::Config;
use clubh2h::data::{all_leagues, get_league_by_id, ApiGateway};
use clubh2h::render;

/// Sets up logging to stderr; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the durable cache tier from flags and config
fn build_cache(cli: &Cli, config: &Config) -> ExpiringCache {
    let max_bytes = config.cache.max_bytes;

    if cli.no_persist {
        return ExpiringCache::new(MemoryStore::with_max_bytes(max_bytes));
    }

    let store = match cli.cache_dir.clone().or_else(|| config.cache.dir.clone()) {
        Some(dir) => Some(FileStore::with_dir(dir)),
        None => FileStore::new(),
    };

    match store {
        Some(store) => {
            tracing::debug!(dir = %store.dir().display(), "using file cache");
            ExpiringCache::new(store.with_max_bytes(max_bytes))
        }
        None => {
            tracing::warn!("no cache directory available, caching in memory only");
            ExpiringCache::new(MemoryStore::with_max_bytes(max_bytes))
        }
    }
}

/// Creates the application service from flags and config
fn build_app(cli: &Cli, config: &Config) -> Result<App, Box<dyn Error>> {
    let credential = config.credential()?;
    let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
    let gateway = ApiGateway::with_client(client, config.api.base_url.clone(), credential);
    let cache = SessionCache::new(build_cache(cli, config));

    Ok(App::new(gateway, cache).with_allowed_countries(config.catalog.allowed_countries.clone()))
}

/// Loads config and builds the app for commands that talk to the API
fn connect(cli: &Cli) -> Result<(Config, App), Box<dyn Error>> {
    let config = Config::load_or_default(cli.config.as_deref())?.apply_env();
    let app = build_app(cli, &config)?;
    Ok((config, app))
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Leagues => {
            print!("{}", render::render_leagues(all_leagues()));
        }
        Command::Countries => {
            let (_, mut app) = connect(&cli)?;
            let countries = app.init_countries().await;
            print!("{}", render::render_countries(&countries));
        }
        Command::Teams { country } => {
            let (_, mut app) = connect(&cli)?;
            app.select_country(country)?;
            let teams = app.load_teams(country).await;
            print!("{}", render::render_teams(&teams));
        }
        Command::LeagueTeams { league, season } => {
            get_league_by_id(*league).ok_or(ValidationError::UnknownLeague(*league))?;
            let (config, mut app) = connect(&cli)?;
            let season = season.unwrap_or(config.catalog.season);
            let teams = app.load_league_teams(*league, season).await;
            print!("{}", render::render_teams(&teams));
        }
        Command::Venue {
            league,
            team,
            season,
        } => {
            let (config, mut app) = connect(&cli)?;
            let season = season.unwrap_or(config.catalog.season);
            match app.find_venue(*league, season, team).await? {
                Some(venue) => print!("{}", render::render_venue(team, &venue)),
                None => println!("Venue details not found for {}", team),
            }
        }
        Command::H2h {
            country1,
            team1,
            country2,
            team2,
        } => {
            let (_, mut app) = connect(&cli)?;
            match app.compare(country1, team1, country2, team2).await? {
                Some(summary) => print!("{}", render::render_h2h(&summary, team1, team2)?),
                None => return Err("No Head-2-Head data found or an error occurred".into()),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
