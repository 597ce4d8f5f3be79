use std::collections::BTreeSet;

use crate::models::event::SportsEvent;
use crate::models::standing::TeamStanding;

/// House teams and the mascot the standings form pre-fills for them.
const HOUSE_MASCOTS: [(&str, &str); 4] = [
    ("SKYLARIOS", "🐺"),
    ("DRACARYS", "🐉"),
    ("AETOS", "🦅"),
    ("XANTHUS", "🎠"),
];

/// Every team name seen in events or standings, sorted and de-duplicated.
pub fn known_teams(events: &[SportsEvent], standings: &[TeamStanding]) -> Vec<String> {
    let names: BTreeSet<&str> = events
        .iter()
        .flat_map(|event| event.teams.iter().map(String::as_str))
        .chain(standings.iter().map(|standing| standing.team_name.as_str()))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    names.into_iter().map(String::from).collect()
}

pub fn suggested_mascot(team_name: &str) -> Option<&'static str> {
    let team_name = team_name.trim();
    HOUSE_MASCOTS
        .iter()
        .find(|(house, _)| house.eq_ignore_ascii_case(team_name))
        .map(|(_, mascot)| *mascot)
}

const UNKNOWN_INITIALS: &str = "??";

/// First letter of every word, uppercased, e.g. "Red Dragons" -> "RD".
pub fn initials(team_name: &str) -> String {
    let initials: String = team_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        UNKNOWN_INITIALS.to_string()
    } else {
        initials
    }
}
