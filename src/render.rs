//! Plain-text rendering for command output
//!
//! Each function returns the full text to print so output can be tested
//! without a terminal.

use std::fmt::Write;

use crate::data::{oriented_score, Country, DataIntegrityError, H2hSummary, League, Team, Venue};

/// Shown when a value is missing
const NOT_AVAILABLE: &str = "N/A";

/// One country name per line
pub fn render_countries(countries: &[Country]) -> String {
    if countries.is_empty() {
        return "No countries available. Check your API key and connection.\n".to_string();
    }
    countries.iter().map(|c| format!("{}\n", c.name)).collect()
}

/// One team name per line, with its API id
pub fn render_teams(teams: &[Team]) -> String {
    if teams.is_empty() {
        return "No teams found.\n".to_string();
    }
    let width = teams.iter().map(|t| t.id.to_string().len()).max().unwrap_or(0);
    teams
        .iter()
        .map(|t| format!("{:>width$}  {}\n", t.id, t.name, width = width))
        .collect()
}

/// The league catalogue
pub fn render_leagues(leagues: &[League]) -> String {
    leagues
        .iter()
        .map(|l| format!("{:>4}  {}\n", l.id, l.name))
        .collect()
}

/// Stadium details for a team
pub fn render_venue(team_name: &str, venue: &Venue) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", venue.name.as_deref().unwrap_or(NOT_AVAILABLE));
    let _ = writeln!(out, "Team:     {}", team_name);
    let _ = writeln!(out, "City:     {}", venue.city.as_deref().unwrap_or(NOT_AVAILABLE));
    let _ = writeln!(
        out,
        "Capacity: {}",
        venue
            .capacity
            .map(group_thousands)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    );
    if let Some(image) = &venue.image {
        let _ = writeln!(out, "Image:    {}", image);
    }
    out
}

/// Head-to-head summary followed by the match history table
pub fn render_h2h(
    summary: &H2hSummary,
    team_a: &str,
    team_b: &str,
) -> Result<String, DataIntegrityError> {
    let mut out = String::new();
    let _ = writeln!(out, "Head-2-Head: {} vs {}", team_a, team_b);

    if summary.is_empty() {
        let _ = writeln!(
            out,
            "No historical matches found between {} and {}",
            team_a, team_b
        );
        return Ok(out);
    }

    let _ = writeln!(
        out,
        "{} Wins: {} | {} Wins: {} | Draws: {}",
        team_a, summary.team_a_wins, team_b, summary.team_b_wins, summary.draws
    );
    let _ = writeln!(
        out,
        "Total Matches: {} | {} Goals: {} | {} Goals: {}",
        summary.total_matches, team_a, summary.team_a_goals, team_b, summary.team_b_goals
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Match History ({} Matches Total)", summary.total_matches);

    let rows = summary
        .ordered_fixtures
        .iter()
        .map(|f| {
            let (a, b) = oriented_score(f, team_a, team_b)?;
            Ok([
                f.date.format("%Y-%m-%d").to_string(),
                competition_label(&f.competition_name, &f.competition_country),
                format!("{} - {}", goals_label(a), goals_label(b)),
            ])
        })
        .collect::<Result<Vec<_>, DataIntegrityError>>()?;

    let comp_width = rows
        .iter()
        .map(|r| r[1].chars().count())
        .chain(std::iter::once("Competition".len()))
        .max()
        .unwrap_or(0);
    let score_width = rows
        .iter()
        .map(|r| r[2].chars().count())
        .chain(std::iter::once("Score".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(
        out,
        "{:<10}  {:<cw$}  {}  {:<sw$}  {}",
        "Date",
        "Competition",
        team_a,
        "Score",
        team_b,
        cw = comp_width,
        sw = score_width
    );
    for [date, competition, score] in rows {
        let _ = writeln!(
            out,
            "{:<10}  {:<cw$}  {}  {:<sw$}  {}",
            date,
            competition,
            team_a,
            score,
            team_b,
            cw = comp_width,
            sw = score_width
        );
    }
    Ok(out)
}

fn competition_label(name: &str, country: &str) -> String {
    if country.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, country)
    }
}

fn goals_label(goals: Option<u32>) -> String {
    goals.map_or_else(|| "-".to_string(), |g| g.to_string())
}

/// Formats 60383 as "60,383"
fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
