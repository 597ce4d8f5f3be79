use serde::{Deserialize, Serialize};

/// A team's leaderboard entry, keyed by team name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_name: String,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mascot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingInput {
    pub points: u32,
    #[serde(default)]
    pub mascot: Option<String>,
}
