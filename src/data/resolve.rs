//! Country and team list preparation, and selection lookup
//!
//! Lists are ordered the way a person reading them expects: case and common
//! Latin accents are ignored for the primary order ("Ajax" < "álvaro" <
//! "Bayern"), with plain byte order as the tie-break so the result is total.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::{Country, Team, TeamId};

/// Something with a stable identifier and a display name
pub trait Entity {
    type Id: Clone;

    fn id(&self) -> Self::Id;
    fn name(&self) -> &str;
}

impl Entity for Country {
    type Id = String;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Team {
    type Id = TeamId;

    fn id(&self) -> TeamId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Keeps entities named in `allow_list`, deduplicated by name and sorted by name
pub fn filter_allowed<T: Entity + Clone>(entities: &[T], allow_list: &[&str]) -> Vec<T> {
    let allowed: Vec<T> = entities
        .iter()
        .filter(|e| allow_list.contains(&e.name()))
        .cloned()
        .collect();
    sort_by_name(allowed)
}

/// Deduplicates by name (first occurrence wins) and sorts by name
pub fn sort_by_name<T: Entity>(entities: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut unique: Vec<T> = entities
        .into_iter()
        .filter(|e| seen.insert(e.name().to_string()))
        .collect();
    unique.sort_by(|a, b| compare_names(a.name(), b.name()));
    unique
}

/// Looks up the identifier of the entity whose name is exactly `display_name`
pub fn resolve_selection<T: Entity>(display_name: &str, candidates: &[T]) -> Option<T::Id> {
    candidates
        .iter()
        .find(|c| c.name() == display_name)
        .map(|c| c.id())
}

/// Locale-style name comparison
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(fold_char);
    let folded_b = b.chars().flat_map(fold_char);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}

/// Lowercases and strips diacritics from common Latin letters
fn fold_char(c: char) -> impl Iterator<Item = char> {
    let base = match c {
        'À'..='Å' | 'à'..='å' | 'Ā' | 'ā' | 'Ą' | 'ą' => 'a',
        'Ç' | 'ç' | 'Ć' | 'ć' | 'Č' | 'č' => 'c',
        'È'..='Ë' | 'è'..='ë' | 'Ē' | 'ē' | 'Ę' | 'ę' | 'Ě' | 'ě' => 'e',
        'Ì'..='Ï' | 'ì'..='ï' | 'Ī' | 'ī' | 'İ' | 'ı' => 'i',
        'Ñ' | 'ñ' | 'Ń' | 'ń' | 'Ň' | 'ň' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō' | 'ō' | 'Ő' | 'ő' => 'o',
        'Ù'..='Ü' | 'ù'..='ü' | 'Ū' | 'ū' | 'Ů' | 'ů' | 'Ű' | 'ű' => 'u',
        'Ý' | 'ý' | 'ÿ' => 'y',
        'Ś' | 'ś' | 'Š' | 'š' | 'Ş' | 'ş' => 's',
        'Ź' | 'ź' | 'Ż' | 'ż' | 'Ž' | 'ž' => 'z',
        'Ł' | 'ł' => 'l',
        'Ř' | 'ř' => 'r',
        'Ğ' | 'ğ' => 'g',
        'ß' => return "ss".chars().collect::<Vec<_>>().into_iter(),
        other => return other.to_lowercase().collect::<Vec<_>>().into_iter(),
    };
    vec![base].into_iter()
}
