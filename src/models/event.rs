use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Cricket,
    Football,
    Basketball,
    Carrom,
    Chess,
    Volleyball,
    Throwball,
    #[serde(rename = "Table Tennis", alias = "TableTennis")]
    TableTennis,
    #[serde(rename = "Kho Kho", alias = "KhoKho")]
    KhoKho,
    Badminton,
    #[serde(rename = "Athletics Indoor", alias = "AthleticsIndoor")]
    AthleticsIndoor,
    #[serde(rename = "Athletics Outdoor", alias = "AthleticsOutdoor")]
    AthleticsOutdoor,
    Other,
}

impl Sport {
    pub const ALL: [Sport; 13] = [
        Sport::Cricket,
        Sport::Football,
        Sport::Basketball,
        Sport::Carrom,
        Sport::Chess,
        Sport::Volleyball,
        Sport::Throwball,
        Sport::TableTennis,
        Sport::KhoKho,
        Sport::Badminton,
        Sport::AthleticsIndoor,
        Sport::AthleticsOutdoor,
        Sport::Other,
    ];

    /// Stored and displayed spelling.
    pub fn label(&self) -> &'static str {
        match self {
            Sport::Cricket => "Cricket",
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Carrom => "Carrom",
            Sport::Chess => "Chess",
            Sport::Volleyball => "Volleyball",
            Sport::Throwball => "Throwball",
            Sport::TableTennis => "Table Tennis",
            Sport::KhoKho => "Kho Kho",
            Sport::Badminton => "Badminton",
            Sport::AthleticsIndoor => "Athletics Indoor",
            Sport::AthleticsOutdoor => "Athletics Outdoor",
            Sport::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Sport> {
        let label = label.trim();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Boys,
    Girls,
    Mixed,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Boys, Gender::Girls, Gender::Mixed];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Boys => "Boys",
            Gender::Girls => "Girls",
            Gender::Mixed => "Mixed",
        }
    }

    pub fn from_label(label: &str) -> Option<Gender> {
        let label = label.trim();
        Gender::ALL
            .into_iter()
            .find(|gender| gender.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Normal,
    #[serde(rename = "Semi-final", alias = "SemiFinal")]
    SemiFinal,
    Final,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [MatchType::Normal, MatchType::SemiFinal, MatchType::Final];

    pub fn label(&self) -> &'static str {
        match self {
            MatchType::Normal => "Normal",
            MatchType::SemiFinal => "Semi-final",
            MatchType::Final => "Final",
        }
    }

    pub fn from_label(label: &str) -> Option<MatchType> {
        let label = label.trim();
        MatchType::ALL
            .into_iter()
            .find(|match_type| match_type.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled match between two teams. `date_time` is the only stored
/// notion of when it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsEvent {
    pub id: String,
    pub match_title: String,
    pub sport: Sport,
    pub gender: Gender,
    pub match_type: MatchType,
    pub date_time: DateTime<Utc>,
    pub teams: [String; 2],
}

impl SportsEvent {
    pub fn has_team(&self, team: &str) -> bool {
        self.teams.iter().any(|t| t == team)
    }
}

/// Admin input for creating or updating an event. `date` is `YYYY-MM-DD`
/// and `time` is `HH:MM`, both in the configured local offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub match_title: String,
    pub sport: Sport,
    pub gender: Gender,
    pub match_type: MatchType,
    pub date: String,
    pub time: String,
    pub teams: Vec<String>,
}
