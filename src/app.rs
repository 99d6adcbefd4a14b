//! Application service for Club H2H CLI
//!
//! Composes the cache, the API gateway, list resolution, and head-to-head
//! aggregation behind the operations the command line calls. Every remote
//! lookup goes through the same path: check the cache, otherwise fetch,
//! normalize, store, return.
//!
//! Operations take `&mut self`, so one `App` never has two fetch-and-cache
//! sequences in flight at once.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::cache::SessionCache;
use crate::data::ingest::{normalize, ApiCountry, ApiFixture, ApiTeamEntry};
use crate::data::{
    aggregate, filter_allowed, get_league_by_id, resolve_selection, sort_by_name, ApiGateway,
    ApiRequest, Country, DataIntegrityError, Fixture, H2hSummary, Team, TeamId, Venue,
    ALLOWED_COUNTRIES,
};

/// A user selection that does not name a known entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Country is not in the allow-list
    #[error("Unknown country: '{0}'. Run `clubh2h countries` to see the available countries")]
    UnknownCountry(String),

    /// No team with exactly this name in the given list
    #[error("Unknown team: '{name}' is not a team in {scope}")]
    UnknownTeam { name: String, scope: String },

    /// The team list for a scope came back empty, so nothing could be matched
    #[error("No teams could be loaded for {0}; check your API key and connection")]
    NoTeamsLoaded(String),

    /// League id not in the catalogue
    #[error("Unknown league id: {0}. Run `clubh2h leagues` to see the available leagues")]
    UnknownLeague(u32),
}

/// Errors surfaced by the compound operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Inconsistent head-to-head data: {0}")]
    DataIntegrity(#[from] DataIntegrityError),
}

/// Which cache tiers a lookup uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheTier {
    /// Durable store only
    Durable,
    /// Session map in front of the durable store
    Session,
}

/// Main application service
#[derive(Debug)]
pub struct App {
    gateway: ApiGateway,
    cache: SessionCache,
    allowed_countries: Vec<String>,
}

impl App {
    /// Creates an App with the default country allow-list
    pub fn new(gateway: ApiGateway, cache: SessionCache) -> Self {
        Self {
            gateway,
            cache,
            allowed_countries: ALLOWED_COUNTRIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Replaces the country allow-list
    pub fn with_allowed_countries(mut self, allowed_countries: Vec<String>) -> Self {
        self.allowed_countries = allowed_countries;
        self
    }

    /// Loads the allowed countries, sorted by name
    ///
    /// Returns an empty list when the API is unreachable and nothing is cached.
    pub async fn init_countries(&mut self) -> Vec<Country> {
        tracing::info!("loading allowed countries");

        let Some(countries) = self
            .cached_fetch::<ApiCountry, Country>(ApiRequest::Countries, CacheTier::Durable)
            .await
        else {
            tracing::error!("could not load countries; check API key and connection");
            return Vec::new();
        };

        let allow: Vec<&str> = self.allowed_countries.iter().map(String::as_str).collect();
        filter_allowed(&countries, &allow)
    }

    /// Loads the teams of a country, sorted by name
    pub async fn load_teams(&mut self, country: &str) -> Vec<Team> {
        if country.is_empty() {
            return Vec::new();
        }
        tracing::info!(country, "loading teams");

        let request = ApiRequest::TeamsByCountry {
            country: country.to_string(),
        };
        match self
            .cached_fetch::<ApiTeamEntry, Team>(request, CacheTier::Session)
            .await
        {
            Some(teams) => sort_by_name(teams),
            None => {
                tracing::error!(country, "no teams found or an error occurred");
                Vec::new()
            }
        }
    }

    /// Loads the teams of a league season, sorted by name
    pub async fn load_league_teams(&mut self, league: u32, season: u16) -> Vec<Team> {
        tracing::info!(league, season, "loading league teams");

        let request = ApiRequest::TeamsByLeague { league, season };
        match self
            .cached_fetch::<ApiTeamEntry, Team>(request, CacheTier::Session)
            .await
        {
            Some(teams) => sort_by_name(teams),
            None => {
                tracing::error!(league, season, "no teams found for this league/season or an error occurred");
                Vec::new()
            }
        }
    }

    /// Fetches and aggregates every fixture between two teams
    ///
    /// `Ok(None)` means the API returned nothing usable. An empty fixture
    /// list is a valid, all-zero summary.
    pub async fn search_h2h(
        &mut self,
        team_a_id: TeamId,
        team_b_id: TeamId,
        team_a_name: &str,
        team_b_name: &str,
    ) -> Result<Option<H2hSummary>, DataIntegrityError> {
        tracing::info!(team_a = team_a_name, team_b = team_b_name, "fetching head-to-head");

        let request = ApiRequest::HeadToHead {
            team_a: team_a_id,
            team_b: team_b_id,
        };
        let Some(fixtures) = self
            .cached_fetch::<ApiFixture, Fixture>(request, CacheTier::Durable)
            .await
        else {
            tracing::error!("no head-to-head data found or an error occurred");
            return Ok(None);
        };

        aggregate(&fixtures, team_a_name, team_b_name).map(Some)
    }

    /// Resolves a team name within one country's or league's team list
    pub fn select_team(name: &str, teams: &[Team], scope: &str) -> Result<TeamId, ValidationError> {
        if teams.is_empty() {
            return Err(ValidationError::NoTeamsLoaded(scope.to_string()));
        }
        resolve_selection(name, teams).ok_or_else(|| ValidationError::UnknownTeam {
            name: name.to_string(),
            scope: scope.to_string(),
        })
    }

    /// Checks a country name against the allow-list
    pub fn select_country(&self, name: &str) -> Result<(), ValidationError> {
        if self.allowed_countries.iter().any(|c| c == name) {
            Ok(())
        } else {
            Err(ValidationError::UnknownCountry(name.to_string()))
        }
    }

    /// Resolves both selections and runs the head-to-head search
    ///
    /// The two team lists are loaded one after the other.
    pub async fn compare(
        &mut self,
        country_a: &str,
        team_a: &str,
        country_b: &str,
        team_b: &str,
    ) -> Result<Option<H2hSummary>, AppError> {
        self.select_country(country_a)?;
        self.select_country(country_b)?;

        let teams_a = self.load_teams(country_a).await;
        let team_a_id = Self::select_team(team_a, &teams_a, country_a)?;

        let teams_b = self.load_teams(country_b).await;
        let team_b_id = Self::select_team(team_b, &teams_b, country_b)?;

        Ok(self.search_h2h(team_a_id, team_b_id, team_a, team_b).await?)
    }

    /// Looks up the home venue of a team in a catalogue league
    ///
    /// `Ok(None)` means the team exists but the API has no venue for it.
    pub async fn find_venue(
        &mut self,
        league: u32,
        season: u16,
        team_name: &str,
    ) -> Result<Option<Venue>, ValidationError> {
        let league_info = get_league_by_id(league).ok_or(ValidationError::UnknownLeague(league))?;

        let teams = self.load_league_teams(league, season).await;
        if teams.is_empty() {
            return Err(ValidationError::NoTeamsLoaded(format!(
                "{} {}",
                league_info.name, season
            )));
        }
        let team = teams
            .into_iter()
            .find(|t| t.name == team_name)
            .ok_or_else(|| ValidationError::UnknownTeam {
                name: team_name.to_string(),
                scope: format!("{} {}", league_info.name, season),
            })?;

        Ok(team.venue.filter(|v| v.name.is_some()))
    }

    /// Returns cached entities for `request`, or fetches, normalizes, and caches them
    async fn cached_fetch<A, T>(&mut self, request: ApiRequest, tier: CacheTier) -> Option<Vec<T>>
    where
        A: DeserializeOwned,
        T: From<A> + Serialize + DeserializeOwned,
    {
        let key = request.cache_key();

        let cached: Option<Vec<T>> = match tier {
            CacheTier::Durable => self.cache.durable().get(&key),
            CacheTier::Session => self.cache.get(&key),
        };
        if let Some(items) = cached {
            tracing::info!(key, count = items.len(), "loaded from cache");
            return Some(items);
        }

        let raw: Vec<A> = self.gateway.fetch(&request).await?;
        let items: Vec<T> = normalize(raw);
        tracing::info!(key, count = items.len(), "loaded from API");

        match tier {
            CacheTier::Durable => self.cache.durable().set(&key, &items),
            CacheTier::Session => self.cache.set(&key, &items),
        }
        Some(items)
    }
}
