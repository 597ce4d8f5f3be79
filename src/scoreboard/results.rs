use futures::future::join_all;

use crate::db::{
    DataAccessError, Document, Fields, SharedStore, StoreCredential, Value, EVENTS_COLLECTION,
    RESULTS_COLLECTION,
};
use crate::models::event::SportsEvent;
use crate::models::result::{MatchResult, ResultInput, NO_WINNER};
use crate::scoreboard::events::event_from_document;
use crate::scoreboard::validation::ScoreboardValidator;

/// Reads and writes `matchResults` documents, one per event id.
pub struct ResultRepository {
    store: SharedStore,
    validator: ScoreboardValidator,
}

impl ResultRepository {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            validator: ScoreboardValidator::new(),
        }
    }

    /// The result recorded for `match_id`, if any. A read blocked by the
    /// store's rules counts as "no result".
    pub async fn get_result(&self, match_id: &str) -> Result<Option<MatchResult>, DataAccessError> {
        if match_id.trim().is_empty() {
            tracing::warn!("get_result called with an empty match id");
            return Ok(None);
        }

        match self.store.get(RESULTS_COLLECTION, match_id).await {
            Ok(document) => Ok(document.map(result_from_document)),
            Err(e) if e.is_permission_denied() => {
                tracing::warn!(
                    "Missing or insufficient permissions reading the result for {}: {}",
                    match_id,
                    e
                );
                Ok(None)
            }
            Err(e) => {
                tracing::error!(code = %e.code(), "Could not fetch result for {}: {}", match_id, e);
                Err(e)
            }
        }
    }

    /// Fetch the results of all `events` concurrently. A failed fetch only
    /// drops that event's result.
    pub async fn fetch_results_for(&self, events: &[SportsEvent]) -> Vec<MatchResult> {
        let fetched = join_all(events.iter().map(|event| self.get_result(&event.id))).await;

        fetched
            .into_iter()
            .zip(events)
            .filter_map(|(outcome, event)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Treating event {} as having no result: {}", event.id, e);
                    None
                }
            })
            .collect()
    }

    /// Create or replace the result for `input.match_id`. The event must
    /// exist and the winner must be one of its teams.
    #[tracing::instrument(
        name = "Upsert match result",
        skip(self, input, credential),
        fields(match_id = %input.match_id)
    )]
    pub async fn upsert_result(
        &self,
        input: &ResultInput,
        credential: Option<&StoreCredential>,
    ) -> Result<MatchResult, DataAccessError> {
        self.validator.validate_match_id(&input.match_id)?;
        let match_id = input.match_id.trim();

        let event = self
            .store
            .get(EVENTS_COLLECTION, match_id)
            .await?
            .map(event_from_document)
            .ok_or_else(|| DataAccessError::NotFound(format!("No sports event with id {}", match_id)))?;

        let winning_team = input
            .winning_team
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .unwrap_or(NO_WINNER)
            .to_string();
        self.validator.validate_winner(&event, &winning_team)?;

        let result = MatchResult {
            match_id: match_id.to_string(),
            team1_score: input.team1_score.unwrap_or(0),
            team2_score: input.team2_score.unwrap_or(0),
            winning_team,
            winning_team_photo_url: self
                .validator
                .normalize_photo_url(input.winning_team_photo_url.as_deref())?,
        };

        let stored = self
            .store
            .set(RESULTS_COLLECTION, match_id, result_fields(&result), credential)
            .await
            .map_err(|e| {
                tracing::error!(code = %e.code(), "Could not store result for {}: {}", match_id, e);
                e
            })?;

        tracing::info!(
            "Stored result for {}: {} - {} (winner: {})",
            match_id,
            result.team1_score,
            result.team2_score,
            result.winning_team
        );
        Ok(result_from_document(stored))
    }
}

/// The photo URL is only written when present.
fn result_fields(result: &MatchResult) -> Fields {
    let mut fields = Fields::new();
    fields.insert("matchId".into(), Value::string(result.match_id.clone()));
    fields.insert("team1Score".into(), Value::integer(result.team1_score));
    fields.insert("team2Score".into(), Value::integer(result.team2_score));
    fields.insert("winningTeam".into(), Value::string(result.winning_team.clone()));
    if let Some(url) = &result.winning_team_photo_url {
        fields.insert("winningTeamPhotoUrl".into(), Value::string(url.clone()));
    }
    fields
}

fn score(document: &Document, field: &str) -> u32 {
    document
        .i64_field(field)
        .and_then(|s| u32::try_from(s).ok())
        .unwrap_or(0)
}

/// Decode a stored result. Null or blank photo URLs read as absent.
pub fn result_from_document(document: Document) -> MatchResult {
    MatchResult {
        team1_score: score(&document, "team1Score"),
        team2_score: score(&document, "team2Score"),
        winning_team: document
            .str_field("winningTeam")
            .unwrap_or(NO_WINNER)
            .to_string(),
        winning_team_photo_url: document
            .str_field("winningTeamPhotoUrl")
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(String::from),
        match_id: document.id,
    }
}
