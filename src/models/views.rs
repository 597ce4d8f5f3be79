use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::event::{Gender, MatchType, Sport, SportsEvent};
use crate::models::result::MatchResult;
use crate::models::standing::TeamStanding;
use crate::scoreboard::countdown::CountdownView;
use crate::scoreboard::teams::{initials, suggested_mascot};
use crate::scoreboard::DisplayZone;

/// Page query: `?sport=...&gender=...&mode=upcoming|results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub sport: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    pub mode: DisplayMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Upcoming,
    Results,
}

/// An event as rendered: display date and time in the local offset, and a
/// countdown for upcoming matches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: SportsEvent,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownView>,
}

impl EventView {
    pub fn new(event: SportsEvent, zone: DisplayZone) -> Self {
        Self {
            date: zone.date_label(event.date_time),
            time: zone.time_label(event.date_time),
            countdown: None,
            event,
        }
    }

    pub fn with_countdown(event: SportsEvent, zone: DisplayZone, now: DateTime<Utc>) -> Self {
        let countdown = CountdownView::at(now, event.date_time, zone);
        Self {
            countdown: Some(countdown),
            ..Self::new(event, zone)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBadge {
    pub team: String,
    pub score: u32,
    pub highlighted: bool,
}

/// A completed match: the event, both score badges (the winner's
/// highlighted) and the winner photo when there is one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCard {
    pub event: EventView,
    pub team1: ScoreBadge,
    pub team2: ScoreBadge,
    pub winning_team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ResultCard {
    pub fn new(event: SportsEvent, result: MatchResult, zone: DisplayZone) -> Self {
        let [first, second] = event.teams.clone();
        let team1 = ScoreBadge {
            highlighted: result.is_winner(&first),
            team: first,
            score: result.team1_score,
        };
        let team2 = ScoreBadge {
            highlighted: result.is_winner(&second),
            team: second,
            score: result.team2_score,
        };
        Self {
            event: EventView::new(event, zone),
            team1,
            team2,
            winning_team: result.winning_team,
            photo_url: result.winning_team_photo_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub position: usize,
    pub team_name: String,
    pub initials: String,
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mascot: Option<String>,
}

impl LeaderboardRow {
    /// Rows for standings that are already in rank order.
    pub fn ranked(standings: Vec<TeamStanding>) -> Vec<Self> {
        standings
            .into_iter()
            .enumerate()
            .map(|(index, standing)| Self {
                position: index + 1,
                initials: initials(&standing.team_name),
                team_name: standing.team_name,
                points: standing.points,
                mascot: standing.mascot,
            })
            .collect()
    }
}

/// Labels for the filter and form pickers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub sports: Vec<&'static str>,
    pub genders: Vec<&'static str>,
    pub match_types: Vec<&'static str>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            sports: Sport::ALL.iter().map(Sport::label).collect(),
            genders: Gender::ALL.iter().map(Gender::label).collect(),
            match_types: MatchType::ALL.iter().map(MatchType::label).collect(),
        }
    }
}

/// Only the list matching `mode` is present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub mode: DisplayMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming: Option<Vec<EventView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ResultCard>>,
    pub leaderboard: Vec<LeaderboardRow>,
    pub filters: FilterOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEvent {
    pub event: EventView,
    pub result: Option<MatchResult>,
}

/// The admin standings form for one known team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingForm {
    pub team_name: String,
    /// Whether a standing is stored for the team.
    pub stored: bool,
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mascot: Option<String>,
    /// House mascot first, then the stored one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefilled_mascot: Option<String>,
}

impl StandingForm {
    pub fn for_team(team_name: &str, standing: Option<&TeamStanding>) -> Self {
        let mascot = standing.and_then(|standing| standing.mascot.clone());
        Self {
            team_name: team_name.to_string(),
            stored: standing.is_some(),
            points: standing.map_or(0, |standing| standing.points),
            prefilled_mascot: suggested_mascot(team_name)
                .map(String::from)
                .or_else(|| mascot.clone()),
            mascot,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub events: Vec<DashboardEvent>,
    pub teams: Vec<String>,
    pub standings: Vec<StandingForm>,
    pub options: FilterOptions,
}
