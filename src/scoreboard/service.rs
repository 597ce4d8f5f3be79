use chrono::{DateTime, Utc};

use crate::db::{DataAccessError, SharedStore, StoreCredential};
use crate::models::event::{EventInput, SportsEvent};
use crate::models::result::{MatchResult, ResultInput};
use crate::models::standing::TeamStanding;
use crate::models::views::{
    DashboardEvent, DashboardView, DisplayMode, EventView, FilterOptions, HomeView, LeaderboardRow,
    ListingQuery, ResultCard, StandingForm,
};
use crate::scoreboard::events::EventRepository;
use crate::scoreboard::listing::{partition, EventFilter, Partition};
use crate::scoreboard::results::ResultRepository;
use crate::scoreboard::standings::StandingsRepository;
use crate::scoreboard::teams::known_teams;
use crate::scoreboard::DisplayZone;

/// Builds page views from the three repositories and forwards admin writes.
pub struct ScoreboardService {
    events: EventRepository,
    results: ResultRepository,
    standings: StandingsRepository,
    zone: DisplayZone,
}

impl ScoreboardService {
    pub fn new(store: SharedStore, zone: DisplayZone) -> Self {
        Self {
            events: EventRepository::new(store.clone(), zone),
            results: ResultRepository::new(store.clone()),
            standings: StandingsRepository::new(store),
            zone,
        }
    }

    /// Events plus the results that exist for them, split into upcoming and
    /// completed. A failed event list fails the page.
    async fn load_partition(&self) -> Result<Partition, DataAccessError> {
        let events = self.events.list_events().await?;
        let results = self.results.fetch_results_for(&events).await;
        Ok(partition(events, results))
    }

    fn upcoming_views(&self, upcoming: Vec<SportsEvent>, filter: &EventFilter, now: DateTime<Utc>) -> Vec<EventView> {
        filter
            .apply(upcoming)
            .into_iter()
            .map(|event| EventView::with_countdown(event, self.zone, now))
            .collect()
    }

    fn result_cards(&self, completed: Vec<(SportsEvent, MatchResult)>, filter: &EventFilter) -> Vec<ResultCard> {
        completed
            .into_iter()
            .filter(|(event, _)| filter.matches(event))
            .map(|(event, result)| ResultCard::new(event, result, self.zone))
            .collect()
    }

    pub async fn schedule(&self, filter: &EventFilter, now: DateTime<Utc>) -> Result<Vec<EventView>, DataAccessError> {
        let split = self.load_partition().await?;
        Ok(self.upcoming_views(split.upcoming, filter, now))
    }

    pub async fn results(&self, filter: &EventFilter) -> Result<Vec<ResultCard>, DataAccessError> {
        let split = self.load_partition().await?;
        Ok(self.result_cards(split.completed, filter))
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardRow>, DataAccessError> {
        Ok(LeaderboardRow::ranked(self.standings.list_standings().await?))
    }

    /// Leaderboard for pages where it is a secondary section: any failure
    /// leaves it empty.
    async fn leaderboard_section(&self) -> Vec<LeaderboardRow> {
        match self.leaderboard().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Showing an empty leaderboard: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn home(&self, query: &ListingQuery, now: DateTime<Utc>) -> Result<HomeView, DataAccessError> {
        let filter = EventFilter::new(query.sport.as_deref(), query.gender.as_deref());
        let (split, leaderboard) = futures::join!(self.load_partition(), self.leaderboard_section());
        let split = split?;

        let (upcoming, results) = match query.mode {
            DisplayMode::Upcoming => (Some(self.upcoming_views(split.upcoming, &filter, now)), None),
            DisplayMode::Results => (None, Some(self.result_cards(split.completed, &filter))),
        };

        Ok(HomeView {
            mode: query.mode,
            upcoming,
            results,
            leaderboard,
            filters: FilterOptions::default(),
        })
    }

    /// Everything the admin dashboard shows: every event (earliest first)
    /// with its result, the known teams and a standings form for each team.
    pub async fn dashboard(&self) -> Result<DashboardView, DataAccessError> {
        let events = self.events.list_events().await?;
        let results = self.results.fetch_results_for(&events).await;
        let standings = match self.standings.list_standings().await {
            Ok(standings) => standings,
            Err(e) => {
                tracing::warn!("Dashboard without standings: {}", e);
                Vec::new()
            }
        };

        let teams = known_teams(&events, &standings);
        let forms = teams
            .iter()
            .map(|team| {
                let standing = standings
                    .iter()
                    .find(|standing| standing.team_name.trim() == team.as_str());
                StandingForm::for_team(team, standing)
            })
            .collect();
        let events = events
            .into_iter()
            .map(|event| DashboardEvent {
                result: results.iter().find(|r| r.match_id == event.id).cloned(),
                event: EventView::new(event, self.zone),
            })
            .collect();

        Ok(DashboardView {
            events,
            teams,
            standings: forms,
            options: FilterOptions::default(),
        })
    }

    /// The event a countdown stream ticks towards.
    pub async fn countdown_target(&self, event_id: &str) -> Result<SportsEvent, DataAccessError> {
        self.events
            .get_event(event_id)
            .await?
            .ok_or_else(|| DataAccessError::NotFound(format!("No sports event with id {}", event_id)))
    }

    pub async fn create_event(
        &self,
        input: &EventInput,
        credential: Option<&StoreCredential>,
    ) -> Result<EventView, DataAccessError> {
        let event = self.events.create_event(input, credential).await?;
        Ok(EventView::new(event, self.zone))
    }

    pub async fn update_event(
        &self,
        id: &str,
        input: &EventInput,
        credential: Option<&StoreCredential>,
    ) -> Result<EventView, DataAccessError> {
        let event = self.events.update_event(id, input, credential).await?;
        Ok(EventView::new(event, self.zone))
    }

    pub async fn upsert_result(
        &self,
        input: &ResultInput,
        credential: Option<&StoreCredential>,
    ) -> Result<MatchResult, DataAccessError> {
        self.results.upsert_result(input, credential).await
    }

    pub async fn upsert_standing(
        &self,
        team_name: &str,
        points: u32,
        mascot: Option<&str>,
        credential: Option<&StoreCredential>,
    ) -> Result<TeamStanding, DataAccessError> {
        self.standings.upsert_standing(team_name, points, mascot, credential).await
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }
}
