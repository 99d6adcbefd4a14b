//! API-Football wire formats and their conversion into normalized entities
//!
//! The `teams` endpoint wraps each club as `{team, venue}` and the fixtures
//! endpoint nests everything under `{fixture, league, teams, goals}`. These
//! shapes stay private to this module; callers only see [`Country`], [`Team`]
//! and [`Fixture`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Country, Fixture, Team, TeamId, Venue};

/// One element of the `countries` response
#[derive(Debug, Deserialize)]
pub struct ApiCountry {
    name: String,
    code: Option<String>,
    flag: Option<String>,
}

/// One element of the `teams` response
#[derive(Debug, Deserialize)]
pub struct ApiTeamEntry {
    team: ApiTeam,
    #[serde(default)]
    venue: Option<ApiVenue>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u32,
    name: String,
    code: Option<String>,
    country: Option<String>,
    founded: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ApiVenue {
    name: Option<String>,
    city: Option<String>,
    capacity: Option<u32>,
    image: Option<String>,
}

/// One element of the `fixtures/headtohead` response
#[derive(Debug, Deserialize)]
pub struct ApiFixture {
    fixture: ApiFixtureInfo,
    league: ApiLeague,
    teams: ApiTeams,
    goals: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiFixtureInfo {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    name: String,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiTeams {
    home: ApiSide,
    away: ApiSide,
}

#[derive(Debug, Deserialize)]
struct ApiSide {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiGoals {
    home: Option<u32>,
    away: Option<u32>,
}

impl From<ApiCountry> for Country {
    fn from(api: ApiCountry) -> Self {
        Country {
            name: api.name,
            code: api.code,
            flag: api.flag,
        }
    }
}

impl From<ApiTeamEntry> for Team {
    fn from(entry: ApiTeamEntry) -> Self {
        let venue = entry.venue.map(|v| Venue {
            name: v.name,
            city: v.city,
            capacity: v.capacity,
            image: v.image,
        });

        Team {
            id: TeamId(entry.team.id),
            name: entry.team.name,
            code: entry.team.code,
            country: entry.team.country,
            founded: entry.team.founded,
            venue,
        }
    }
}

impl From<ApiFixture> for Fixture {
    fn from(api: ApiFixture) -> Self {
        Fixture {
            date: api.fixture.date,
            competition_name: api.league.name,
            competition_country: api.league.country.unwrap_or_default(),
            home_team_name: api.teams.home.name,
            away_team_name: api.teams.away.name,
            home_goals: api.goals.home,
            away_goals: api.goals.away,
        }
    }
}

/// Converts a decoded response list into normalized entities
pub fn normalize<A, T: From<A>>(items: Vec<A>) -> Vec<T> {
    items.into_iter().map(T::from).collect()
}
