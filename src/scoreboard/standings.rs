use crate::db::{DataAccessError, Document, Fields, SharedStore, StoreCredential, Value, STANDINGS_COLLECTION};
use crate::models::standing::TeamStanding;
use crate::scoreboard::validation::ScoreboardValidator;

/// Reads and writes `leaderboard` documents, keyed by team name.
pub struct StandingsRepository {
    store: SharedStore,
    validator: ScoreboardValidator,
}

impl StandingsRepository {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            validator: ScoreboardValidator::new(),
        }
    }

    /// Highest points first, ties by team name. Blocked reads give an empty
    /// board.
    #[tracing::instrument(name = "List standings", skip(self))]
    pub async fn list_standings(&self) -> Result<Vec<TeamStanding>, DataAccessError> {
        let documents = match self.store.list(STANDINGS_COLLECTION).await {
            Ok(documents) => documents,
            Err(e) if e.is_permission_denied() => {
                tracing::warn!("Missing or insufficient permissions reading the leaderboard: {}", e);
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::error!(code = %e.code(), "Could not fetch the leaderboard: {}", e);
                return Err(e);
            }
        };

        let mut standings: Vec<TeamStanding> =
            documents.into_iter().map(standing_from_document).collect();
        sort_standings(&mut standings);
        Ok(standings)
    }

    /// Replace the standing for `team_name`.
    #[tracing::instrument(name = "Upsert standing", skip(self, mascot, credential))]
    pub async fn upsert_standing(
        &self,
        team_name: &str,
        points: u32,
        mascot: Option<&str>,
        credential: Option<&StoreCredential>,
    ) -> Result<TeamStanding, DataAccessError> {
        self.validator.validate_team_name(team_name)?;
        let team_name = team_name.trim();
        let mascot = self.validator.normalize_mascot(mascot)?;

        let mut fields = Fields::new();
        fields.insert("teamName".into(), Value::string(team_name));
        fields.insert("points".into(), Value::integer(points));
        if let Some(mascot) = &mascot {
            fields.insert("mascot".into(), Value::string(mascot.clone()));
        }

        let stored = self
            .store
            .set(STANDINGS_COLLECTION, team_name, fields, credential)
            .await
            .map_err(|e| {
                tracing::error!(code = %e.code(), "Could not store standing for {}: {}", team_name, e);
                e
            })?;

        tracing::info!("Standing for {} set to {} points", team_name, points);
        Ok(standing_from_document(stored))
    }
}

pub fn sort_standings(standings: &mut [TeamStanding]) {
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
}

fn standing_from_document(document: Document) -> TeamStanding {
    TeamStanding {
        points: document
            .i64_field("points")
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(0),
        mascot: document
            .str_field("mascot")
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from),
        team_name: document.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use std::sync::Arc;

    fn repository() -> (Arc<MemoryStore>, StandingsRepository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), StandingsRepository::new(store))
    }

    #[tokio::test]
    async fn standings_are_ranked_by_points_then_name() {
        let (_, repo) = repository();
        repo.upsert_standing("Xanthus", 5, None, None).await.unwrap();
        repo.upsert_standing("Aetos", 12, Some("🦅"), None).await.unwrap();
        repo.upsert_standing("Dracarys", 5, None, None).await.unwrap();

        let ranked: Vec<(String, u32)> = repo
            .list_standings()
            .await
            .unwrap()
            .into_iter()
            .map(|s| (s.team_name, s.points))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("Aetos".to_string(), 12),
                ("Dracarys".to_string(), 5),
                ("Xanthus".to_string(), 5)
            ]
        );
    }

    #[tokio::test]
    async fn upsert_replaces_and_drops_blank_mascot() {
        let (store, repo) = repository();
        repo.upsert_standing("Aetos", 3, Some("🦅"), None).await.unwrap();
        let updated = repo.upsert_standing("Aetos", 9, Some("  "), None).await.unwrap();

        assert_eq!(updated.points, 9);
        assert_eq!(updated.mascot, None);
        let raw = store.raw(STANDINGS_COLLECTION, "Aetos").await.unwrap();
        assert!(!raw.contains_key("mascot"));
        assert_eq!(repo.list_standings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_team_name_is_rejected() {
        let (_, repo) = repository();
        assert!(matches!(
            repo.upsert_standing("   ", 1, None, None).await,
            Err(DataAccessError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn permission_denied_gives_an_empty_board() {
        let (store, repo) = repository();
        repo.upsert_standing("Aetos", 3, None, None).await.unwrap();
        store.deny_reads(STANDINGS_COLLECTION).await;
        assert!(repo.list_standings().await.unwrap().is_empty());
    }
}
