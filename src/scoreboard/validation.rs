use chrono::{DateTime, Utc};
use url::Url;

use crate::db::DataAccessError;
use crate::models::event::{EventInput, SportsEvent};
use crate::models::result::NO_WINNER;
use crate::scoreboard::DisplayZone;

const MIN_TITLE_LENGTH: usize = 3;
const MAX_MASCOT_LENGTH: usize = 16;

/// Event input after validation: trimmed strings and a combined instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub match_title: String,
    pub teams: [String; 2],
    pub date_time: DateTime<Utc>,
}

/// Write-time checks for admin input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreboardValidator;

impl ScoreboardValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_event_input(
        &self,
        input: &EventInput,
        zone: DisplayZone,
    ) -> Result<ValidatedEvent, DataAccessError> {
        let match_title = input.match_title.trim();
        if match_title.chars().count() < MIN_TITLE_LENGTH {
            return Err(invalid("Match title must be at least 3 characters."));
        }

        let teams = self.validate_teams(&input.teams)?;
        let date_time = zone.combine(&input.date, &input.time)?;

        Ok(ValidatedEvent {
            match_title: match_title.to_string(),
            teams,
            date_time,
        })
    }

    /// Exactly two distinct, non-empty team names.
    pub fn validate_teams(&self, teams: &[String]) -> Result<[String; 2], DataAccessError> {
        let [first, second] = teams else {
            return Err(invalid(format!(
                "A match needs exactly two teams, got {}.",
                teams.len()
            )));
        };
        let first = first.trim();
        let second = second.trim();
        if first.is_empty() {
            return Err(invalid("Please enter the first team name."));
        }
        if second.is_empty() {
            return Err(invalid("Please enter the second team name."));
        }
        if first == second {
            return Err(invalid("Teams must be different."));
        }
        Ok([first.to_string(), second.to_string()])
    }

    pub fn validate_match_id(&self, match_id: &str) -> Result<(), DataAccessError> {
        if match_id.trim().is_empty() {
            return Err(invalid("Match ID is required to update a result."));
        }
        Ok(())
    }

    /// Team names double as document ids.
    pub fn validate_team_name(&self, team_name: &str) -> Result<(), DataAccessError> {
        let name = team_name.trim();
        if name.is_empty() {
            return Err(invalid("Please select a team."));
        }
        if name.contains('/') || name == "." || name == ".." {
            return Err(invalid(format!("'{}' cannot be used as a team name.", name)));
        }
        if name.starts_with("__") && name.ends_with("__") {
            return Err(invalid(format!("'{}' is a reserved name.", name)));
        }
        Ok(())
    }

    /// The winner must be one of the event's teams, or the no-winner sentinel.
    pub fn validate_winner(&self, event: &SportsEvent, winner: &str) -> Result<(), DataAccessError> {
        if winner == NO_WINNER || event.has_team(winner) {
            return Ok(());
        }
        Err(invalid(format!(
            "Winning team '{}' is not playing in '{}' ({} vs {}).",
            winner, event.match_title, event.teams[0], event.teams[1]
        )))
    }

    /// Blank means "no photo". Anything else has to be an absolute URL.
    pub fn normalize_photo_url(&self, raw: Option<&str>) -> Result<Option<String>, DataAccessError> {
        let Some(url) = raw.map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Some(url.to_string())),
            _ => Err(invalid("Please enter a valid URL.")),
        }
    }

    /// Blank means "no mascot".
    pub fn normalize_mascot(&self, raw: Option<&str>) -> Result<Option<String>, DataAccessError> {
        let Some(mascot) = raw.map(str::trim).filter(|m| !m.is_empty()) else {
            return Ok(None);
        };
        if mascot.chars().count() > MAX_MASCOT_LENGTH {
            return Err(invalid(format!(
                "Mascot must be at most {} characters.",
                MAX_MASCOT_LENGTH
            )));
        }
        Ok(Some(mascot.to_string()))
    }
}

fn invalid(message: impl Into<String>) -> DataAccessError {
    DataAccessError::InvalidArgument(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{Gender, MatchType, Sport};
    use chrono::TimeZone;

    fn input(teams: &[&str]) -> EventInput {
        EventInput {
            match_title: "  A vs B ".into(),
            sport: Sport::Cricket,
            gender: Gender::Boys,
            match_type: MatchType::Normal,
            date: "2025-01-10".into(),
            time: "10:00".into(),
            teams: teams.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn event() -> SportsEvent {
        SportsEvent {
            id: "e1".into(),
            match_title: "A vs B".into(),
            sport: Sport::Cricket,
            gender: Gender::Boys,
            match_type: MatchType::Normal,
            date_time: Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap(),
            teams: ["A".into(), "B".into()],
        }
    }

    #[test]
    fn accepts_and_normalizes_event_input() {
        let validated = ScoreboardValidator::new()
            .validate_event_input(&input(&[" A", "B "]), DisplayZone::utc())
            .unwrap();
        assert_eq!(validated.match_title, "A vs B");
        assert_eq!(validated.teams, ["A".to_string(), "B".to_string()]);
        assert_eq!(validated.date_time, Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap());
    }

    #[test]
    fn rejects_bad_team_pairs() {
        let validator = ScoreboardValidator::new();
        for teams in [&["A"][..], &["A", "B", "C"][..], &["A", "A"][..], &["A", " "][..]] {
            assert!(validator
                .validate_event_input(&input(teams), DisplayZone::utc())
                .is_err());
        }
    }

    #[test]
    fn rejects_short_titles() {
        let mut short = input(&["A", "B"]);
        short.match_title = " ab ".into();
        assert!(ScoreboardValidator::new()
            .validate_event_input(&short, DisplayZone::utc())
            .is_err());
    }

    #[test]
    fn photo_urls_are_optional_but_must_parse() {
        let validator = ScoreboardValidator::new();
        assert_eq!(validator.normalize_photo_url(None).unwrap(), None);
        assert_eq!(validator.normalize_photo_url(Some("   ")).unwrap(), None);
        assert_eq!(
            validator
                .normalize_photo_url(Some(" https://img.example.com/a.jpg "))
                .unwrap(),
            Some("https://img.example.com/a.jpg".to_string())
        );
        assert!(validator.normalize_photo_url(Some("not a url")).is_err());
        assert!(validator.normalize_photo_url(Some("ftp://example.com/a.jpg")).is_err());
    }

    #[test]
    fn winner_must_play_in_the_match() {
        let validator = ScoreboardValidator::new();
        assert!(validator.validate_winner(&event(), "A").is_ok());
        assert!(validator.validate_winner(&event(), NO_WINNER).is_ok());
        assert!(validator.validate_winner(&event(), "C").is_err());
    }

    #[test]
    fn team_names_must_be_usable_as_ids() {
        let validator = ScoreboardValidator::new();
        assert!(validator.validate_team_name("Dracarys").is_ok());
        assert!(validator.validate_team_name("").is_err());
        assert!(validator.validate_team_name("A/B").is_err());
        assert!(validator.validate_team_name("__name__").is_err());
        assert!(validator.validate_match_id("  ").is_err());
    }
}
