//! Head-to-head aggregation
//!
//! Turns a list of fixtures between two clubs into symmetric statistics. The
//! API records each match from the home side's point of view, so every fixture
//! is first oriented towards "team A" and "team B" before it is counted.

use serde::Serialize;
use thiserror::Error;

use super::Fixture;

/// A fixture that cannot be attributed to either requested club
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fixture on {date} ({home} vs {away}) involves neither {team_a} nor {team_b}")]
pub struct DataIntegrityError {
    pub date: String,
    pub home: String,
    pub away: String,
    pub team_a: String,
    pub team_b: String,
}

/// Aggregated head-to-head record between two clubs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct H2hSummary {
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub draws: u32,
    pub total_matches: u32,
    pub team_a_goals: u32,
    pub team_b_goals: u32,
    /// Newest first
    pub ordered_fixtures: Vec<Fixture>,
}

impl H2hSummary {
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }
}

/// Which requested club played at home
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    TeamAHome,
    TeamBHome,
}

fn orient(fixture: &Fixture, team_a: &str, team_b: &str) -> Result<Orientation, DataIntegrityError> {
    if fixture.home_team_name == team_a {
        Ok(Orientation::TeamAHome)
    } else if fixture.home_team_name == team_b {
        Ok(Orientation::TeamBHome)
    } else if fixture.away_team_name == team_a {
        Ok(Orientation::TeamBHome)
    } else if fixture.away_team_name == team_b {
        Ok(Orientation::TeamAHome)
    } else {
        Err(DataIntegrityError {
            date: fixture.date.format("%Y-%m-%d").to_string(),
            home: fixture.home_team_name.clone(),
            away: fixture.away_team_name.clone(),
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
        })
    }
}

/// Score of `fixture` in (team A, team B) order, keeping absent goals absent
pub fn oriented_score(
    fixture: &Fixture,
    team_a: &str,
    team_b: &str,
) -> Result<(Option<u32>, Option<u32>), DataIntegrityError> {
    Ok(match orient(fixture, team_a, team_b)? {
        Orientation::TeamAHome => (fixture.home_goals, fixture.away_goals),
        Orientation::TeamBHome => (fixture.away_goals, fixture.home_goals),
    })
}

/// Aggregates `fixtures` between `team_a` and `team_b`
///
/// Fixtures are sorted newest first. Missing goals count as zero. A fixture
/// naming neither club on either side aborts the whole aggregation.
pub fn aggregate(
    fixtures: &[Fixture],
    team_a: &str,
    team_b: &str,
) -> Result<H2hSummary, DataIntegrityError> {
    let mut ordered = fixtures.to_vec();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    let mut summary = H2hSummary::default();
    for fixture in &ordered {
        let (a, b) = oriented_score(fixture, team_a, team_b)?;
        let a = a.unwrap_or(0);
        let b = b.unwrap_or(0);

        summary.team_a_goals = summary.team_a_goals.saturating_add(a);
        summary.team_b_goals = summary.team_b_goals.saturating_add(b);
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => summary.team_a_wins += 1,
            std::cmp::Ordering::Less => summary.team_b_wins += 1,
            std::cmp::Ordering::Equal => summary.draws += 1,
        }
    }

    summary.total_matches = ordered.len() as u32;
    summary.ordered_fixtures = ordered;
    Ok(summary)
}
