//! Static catalogue data: the country allow-list and the major European leagues

use super::League;

/// Countries offered for team selection
pub const ALLOWED_COUNTRIES: [&str; 13] = [
    "England",
    "Spain",
    "Germany",
    "Italy",
    "France",
    "Netherlands",
    "Sweden",
    "Norway",
    "Finland",
    "Denmark",
    "Belgium",
    "Russia",
    "Ukraine",
];

/// Season used for league team lists; 2023 is the latest completed season with full data
pub const DEFAULT_SEASON: u16 = 2023;

/// Static array of the major European leagues
pub static LEAGUES: [League; 5] = [
    League {
        id: 39,
        name: "Premier League",
    },
    League {
        id: 78,
        name: "Bundesliga",
    },
    League {
        id: 140,
        name: "La Liga",
    },
    League {
        id: 61,
        name: "Ligue 1",
    },
    League {
        id: 135,
        name: "Serie A",
    },
];

/// Get a league by its API-Football ID
///
/// # Example
///
/// ```
/// use clubh2h::data::catalog::get_league_by_id;
///
/// if let Some(league) = get_league_by_id(39) {
///     println!("Found: {}", league.name);
/// }
/// ```
pub fn get_league_by_id(id: u32) -> Option<&'static League> {
    LEAGUES.iter().find(|league| league.id == id)
}

/// Get all catalogue leagues, in display order
pub fn all_leagues() -> &'static [League] {
    &LEAGUES
}
