//! Core data models for Club H2H CLI
//!
//! This module contains the normalized entity types shared by the cache, the
//! gateway, team resolution, and the head-to-head aggregator. Wire formats
//! from the API are converted into these types once, in [`ingest`].

pub mod catalog;
pub mod gateway;
pub mod h2h;
pub mod ingest;
pub mod resolve;

pub use catalog::{all_leagues, get_league_by_id, ALLOWED_COUNTRIES, DEFAULT_SEASON};
pub use gateway::{ApiGateway, ApiRequest, Credential, GatewayError};
pub use h2h::{aggregate, oriented_score, DataIntegrityError, H2hSummary};
pub use resolve::{filter_allowed, resolve_selection, sort_by_name, Entity};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API-Football team identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A country as listed by the `countries` endpoint
///
/// The name doubles as the identifier: teams are queried by country name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: Option<String>,
    pub flag: Option<String>,
}

/// A club, scoped to the country or league it was fetched under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub code: Option<String>,
    pub country: Option<String>,
    pub founded: Option<u16>,
    pub venue: Option<Venue>,
}

/// Home stadium details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<u32>,
    pub image: Option<String>,
}

/// A competition from the fixed league catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct League {
    /// API-Football league identifier
    pub id: u32,
    /// Display name
    pub name: &'static str,
}

/// A single historical match between two clubs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Kick-off time
    pub date: DateTime<Utc>,
    pub competition_name: String,
    pub competition_country: String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Goals scored by the home side; absent for unplayed or abandoned matches
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}
