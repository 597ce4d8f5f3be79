use chrono::{DateTime, Utc};

use crate::db::{DataAccessError, Document, Fields, SharedStore, StoreCredential, Value, EVENTS_COLLECTION};
use crate::models::event::{EventInput, Gender, MatchType, Sport, SportsEvent};
use crate::scoreboard::validation::{ScoreboardValidator, ValidatedEvent};
use crate::scoreboard::DisplayZone;

const DEFAULT_TITLE: &str = "Unknown Match";
const DEFAULT_TEAMS: [&str; 2] = ["Team A", "Team B"];

/// Reads and writes `sportsEvents` documents.
pub struct EventRepository {
    store: SharedStore,
    zone: DisplayZone,
    validator: ScoreboardValidator,
}

impl EventRepository {
    pub fn new(store: SharedStore, zone: DisplayZone) -> Self {
        Self {
            store,
            zone,
            validator: ScoreboardValidator::new(),
        }
    }

    /// All events, earliest first.
    #[tracing::instrument(name = "List sports events", skip(self))]
    pub async fn list_events(&self) -> Result<Vec<SportsEvent>, DataAccessError> {
        let documents = self.store.list(EVENTS_COLLECTION).await.map_err(|e| {
            tracing::error!(code = %e.code(), "Could not fetch sports events: {}", e);
            e
        })?;

        let mut events: Vec<SportsEvent> = documents.into_iter().map(event_from_document).collect();
        events.sort_by(|a, b| a.date_time.cmp(&b.date_time));

        tracing::debug!("Fetched {} sports events", events.len());
        Ok(events)
    }

    pub async fn get_event(&self, id: &str) -> Result<Option<SportsEvent>, DataAccessError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        Ok(self
            .store
            .get(EVENTS_COLLECTION, id)
            .await?
            .map(event_from_document))
    }

    #[tracing::instrument(
        name = "Create sports event",
        skip(self, input, credential),
        fields(match_title = %input.match_title)
    )]
    pub async fn create_event(
        &self,
        input: &EventInput,
        credential: Option<&StoreCredential>,
    ) -> Result<SportsEvent, DataAccessError> {
        let validated = self.validator.validate_event_input(input, self.zone)?;
        let fields = event_fields(input, &validated);

        let document = self.store.create(EVENTS_COLLECTION, fields, credential).await.map_err(|e| {
            tracing::error!(code = %e.code(), "Could not create sports event: {}", e);
            e
        })?;

        tracing::info!("Created sports event {} at {}", document.id, validated.date_time);
        Ok(build_event(document.id, input, validated))
    }

    /// Overwrite every editable field of an existing event.
    #[tracing::instrument(name = "Update sports event", skip(self, input, credential))]
    pub async fn update_event(
        &self,
        id: &str,
        input: &EventInput,
        credential: Option<&StoreCredential>,
    ) -> Result<SportsEvent, DataAccessError> {
        if id.trim().is_empty() {
            return Err(DataAccessError::InvalidArgument("Event id is required.".into()));
        }
        let validated = self.validator.validate_event_input(input, self.zone)?;
        let fields = event_fields(input, &validated);

        self.store
            .update(EVENTS_COLLECTION, id, fields, credential)
            .await
            .map_err(|e| match e {
                DataAccessError::NotFound(_) => {
                    DataAccessError::NotFound(format!("No sports event with id {}", id))
                }
                other => {
                    tracing::error!(code = %other.code(), "Could not update event {}: {}", id, other);
                    other
                }
            })?;

        tracing::info!("Updated sports event {}", id);
        Ok(build_event(id.to_string(), input, validated))
    }
}

fn event_fields(input: &EventInput, validated: &ValidatedEvent) -> Fields {
    let mut fields = Fields::new();
    fields.insert("matchTitle".into(), Value::string(validated.match_title.clone()));
    fields.insert("sport".into(), Value::string(input.sport.label()));
    fields.insert("gender".into(), Value::string(input.gender.label()));
    fields.insert("matchType".into(), Value::string(input.match_type.label()));
    fields.insert("teams".into(), Value::strings(validated.teams.iter().cloned()));
    fields.insert("dateTime".into(), Value::TimestampValue(validated.date_time));
    fields
}

fn build_event(id: String, input: &EventInput, validated: ValidatedEvent) -> SportsEvent {
    SportsEvent {
        id,
        match_title: validated.match_title,
        sport: input.sport,
        gender: input.gender,
        match_type: input.match_type,
        date_time: validated.date_time,
        teams: validated.teams,
    }
}

/// Decode a stored event, substituting defaults for missing or unknown values.
pub fn event_from_document(document: Document) -> SportsEvent {
    let sport = document
        .str_field("sport")
        .and_then(Sport::from_label)
        .unwrap_or(Sport::Other);
    let gender = document
        .str_field("gender")
        .and_then(Gender::from_label)
        .unwrap_or(Gender::Mixed);
    let match_type = document
        .str_field("matchType")
        .and_then(MatchType::from_label)
        .unwrap_or(MatchType::Normal);
    let date_time: DateTime<Utc> = document.timestamp_field("dateTime").unwrap_or_else(|| {
        tracing::warn!("Event {} has no valid dateTime, using the current time", document.id);
        Utc::now()
    });

    let teams = match document.get("teams").and_then(Value::as_array) {
        Some([first, second, ..]) => [
            first.as_str().unwrap_or(DEFAULT_TEAMS[0]).to_string(),
            second.as_str().unwrap_or(DEFAULT_TEAMS[1]).to_string(),
        ],
        _ => {
            tracing::warn!("Event {} has no team pair, using placeholders", document.id);
            DEFAULT_TEAMS.map(String::from)
        }
    };

    SportsEvent {
        match_title: document
            .str_field("matchTitle")
            .unwrap_or(DEFAULT_TITLE)
            .to_string(),
        sport,
        gender,
        match_type,
        date_time,
        teams,
        id: document.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::DocumentStore;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn input(title: &str, date: &str, time: &str) -> EventInput {
        EventInput {
            match_title: title.into(),
            sport: Sport::Football,
            gender: Gender::Girls,
            match_type: MatchType::Final,
            date: date.into(),
            time: time.into(),
            teams: vec!["Aetos".into(), "Xanthus".into()],
        }
    }

    fn repository() -> EventRepository {
        EventRepository::new(Arc::new(MemoryStore::new()), DisplayZone::utc())
    }

    #[tokio::test]
    async fn created_events_list_in_date_order() {
        let repo = repository();
        repo.create_event(&input("Third", "2025-03-01", "09:00"), None).await.unwrap();
        repo.create_event(&input("First", "2025-01-01", "09:00"), None).await.unwrap();
        repo.create_event(&input("Second", "2025-02-01", "09:00"), None).await.unwrap();

        let titles: Vec<String> = repo
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.match_title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn date_time_survives_a_round_trip() {
        let repo = repository();
        let created = repo.create_event(&input("Final", "2025-01-10", "10:00"), None).await.unwrap();
        let listed = repo.list_events().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert!((listed[0].date_time - created.date_time).abs() < Duration::minutes(1));
        assert_eq!(listed[0].date_time, Utc.with_ymd_and_hms(2025, 1, 10, 10, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn invalid_date_is_rejected_before_writing() {
        let store = Arc::new(MemoryStore::new());
        let repo = EventRepository::new(store.clone(), DisplayZone::utc());
        let err = repo
            .create_event(&input("Final", "2025-02-30", "10:00"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DataAccessError::InvalidArgument(_)));
        assert!(store.list(EVENTS_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_recomputes_date_time_and_requires_existing_id() {
        let repo = repository();
        let created = repo.create_event(&input("Final", "2025-01-10", "10:00"), None).await.unwrap();

        let updated = repo
            .update_event(&created.id, &input("Grand Final", "2025-01-11", "18:30"), None)
            .await
            .unwrap();
        assert_eq!(updated.date_time, Utc.with_ymd_and_hms(2025, 1, 11, 18, 30, 0).unwrap());

        let stored = repo.get_event(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.match_title, "Grand Final");
        assert_eq!(stored.date_time, updated.date_time);

        let err = repo
            .update_event("missing", &input("Final", "2025-01-10", "10:00"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DataAccessError::NotFound(_)));
    }

    #[test]
    fn legacy_documents_get_defaults() {
        let mut fields = Fields::new();
        fields.insert("sport".into(), Value::string("table tennis"));
        fields.insert("matchType".into(), Value::string("Friendly"));
        let event = event_from_document(Document::new("legacy", fields));

        assert_eq!(event.match_title, "Unknown Match");
        assert_eq!(event.sport, Sport::TableTennis);
        assert_eq!(event.gender, Gender::Mixed);
        assert_eq!(event.match_type, MatchType::Normal);
        assert_eq!(event.teams, ["Team A".to_string(), "Team B".to_string()]);
    }
}
