use serde::{Deserialize, Serialize};

/// Winner recorded when none was supplied.
pub const NO_WINNER: &str = "N/A";

/// Outcome of a match, keyed by the event id it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_id: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub winning_team: String,
    /// Present only when a photo is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_team_photo_url: Option<String>,
}

impl MatchResult {
    pub fn is_winner(&self, team: &str) -> bool {
        self.winning_team == team
    }
}

/// Admin input for posting a result. Missing values fall back to defaults
/// when stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    #[serde(default)]
    pub match_id: String,
    #[serde(default)]
    pub team1_score: Option<u32>,
    #[serde(default)]
    pub team2_score: Option<u32>,
    #[serde(default)]
    pub winning_team: Option<String>,
    #[serde(default)]
    pub winning_team_photo_url: Option<String>,
}
