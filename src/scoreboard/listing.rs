use std::collections::HashMap;

use crate::models::event::SportsEvent;
use crate::models::result::MatchResult;

const ANY: &str = "all";

/// Sport and gender constraints taken from page query parameters. `all`,
/// empty or absent means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    sport: Option<String>,
    gender: Option<String>,
}

impl EventFilter {
    pub fn new(sport: Option<&str>, gender: Option<&str>) -> Self {
        Self {
            sport: constraint(sport),
            gender: constraint(gender),
        }
    }

    pub fn matches(&self, event: &SportsEvent) -> bool {
        let sport_ok = self
            .sport
            .as_deref()
            .map_or(true, |s| event.sport.label().eq_ignore_ascii_case(s));
        let gender_ok = self
            .gender
            .as_deref()
            .map_or(true, |g| event.gender.label().eq_ignore_ascii_case(g));
        sport_ok && gender_ok
    }

    pub fn apply(&self, events: Vec<SportsEvent>) -> Vec<SportsEvent> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}

fn constraint(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ANY))
        .map(String::from)
}

/// Events split by whether a result exists for them.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Earliest first.
    pub upcoming: Vec<SportsEvent>,
    /// Latest first, each paired with its result.
    pub completed: Vec<(SportsEvent, MatchResult)>,
}

/// An event is completed iff a result carries its id. Results for unknown
/// events are dropped.
pub fn partition(events: Vec<SportsEvent>, results: Vec<MatchResult>) -> Partition {
    let mut by_match: HashMap<String, MatchResult> = results
        .into_iter()
        .map(|result| (result.match_id.clone(), result))
        .collect();

    let mut split = Partition::default();
    for event in events {
        match by_match.remove(&event.id) {
            Some(result) => split.completed.push((event, result)),
            None => split.upcoming.push(event),
        }
    }

    split.upcoming.sort_by(|a, b| a.date_time.cmp(&b.date_time));
    split
        .completed
        .sort_by(|(a, _), (b, _)| b.date_time.cmp(&a.date_time));
    split
}
