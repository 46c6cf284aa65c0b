// Shared models for the pick pool core
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::PoolCalendar;
use crate::error::PoolError;

pub type EventId = String;
pub type ParticipantId = String;

// ============================================================================
// Events
// ============================================================================

/// Lifecycle state of a scheduled event, as reported by the game-data feed.
///
/// Deserializes from raw provider strings via [`EventStatus::from_provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum EventStatus {
    Scheduled,
    Live,
    Final,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Live => "live",
            EventStatus::Final => "final",
        }
    }

    /// Map a raw provider status string onto the pool's three states.
    ///
    /// Unknown strings (pre-game, delayed, postponed) are treated as scheduled.
    pub fn from_provider(status: &str) -> Self {
        let status_lower = status.to_lowercase();

        if status_lower.contains("in_progress")
            || status_lower.contains("halftime")
            || status_lower.contains("end_period")
            || status_lower == "live"
        {
            EventStatus::Live
        } else if status_lower.contains("final") || status_lower.contains("completed") {
            EventStatus::Final
        } else {
            EventStatus::Scheduled
        }
    }

    /// Live or final: picks for the event are no longer secret.
    pub fn has_started(&self) -> bool {
        matches!(self, EventStatus::Live | EventStatus::Final)
    }
}

impl From<String> for EventStatus {
    fn from(status: String) -> Self {
        EventStatus::from_provider(&status)
    }
}

/// A scheduled game. Owned by the game-data collaborator; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    /// Scheduled kickoff instant (stored in UTC)
    pub kickoff: DateTime<Utc>,
    pub season: i32,
    /// Week assigned by the scheduler; `None` falls back to calendar estimation
    #[serde(default)]
    pub week: Option<u32>,
    pub status: EventStatus,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
}

impl Event {
    pub fn new(
        event_id: impl Into<EventId>,
        kickoff: DateTime<Utc>,
        season: i32,
        week: Option<u32>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            kickoff,
            season,
            week,
            status: EventStatus::Scheduled,
            home_team: String::new(),
            away_team: String::new(),
        }
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_teams(mut self, home: impl Into<String>, away: impl Into<String>) -> Self {
        self.home_team = home.into();
        self.away_team = away.into();
        self
    }

    /// The scheduler-assigned week, or the calendar estimate when it is missing.
    pub fn effective_week(&self, calendar: &PoolCalendar) -> u32 {
        self.week
            .unwrap_or_else(|| calendar.week_number(self.kickoff, self.season))
    }
}

/// Id-keyed view over a slice of events.
#[derive(Debug, Default)]
pub struct EventIndex<'a> {
    by_id: FxHashMap<&'a str, &'a Event>,
}

impl<'a> EventIndex<'a> {
    pub fn new(events: &'a [Event]) -> Self {
        let mut by_id = FxHashMap::default();
        by_id.reserve(events.len());
        for event in events {
            by_id.insert(event.event_id.as_str(), event);
        }
        Self { by_id }
    }

    pub fn get(&self, event_id: &str) -> Option<&'a Event> {
        self.by_id.get(event_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ============================================================================
// Picks
// ============================================================================

/// Settled outcome of a pick. Deserializes through [`FromStr`], so feed
/// spellings like `"WON"` or `"tie"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PickResult {
    #[default]
    Pending,
    Win,
    Loss,
    Push,
}

impl PickResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickResult::Pending => "pending",
            PickResult::Win => "win",
            PickResult::Loss => "loss",
            PickResult::Push => "push",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, PickResult::Pending)
    }
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PickResult {
    type Error = PoolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for PickResult {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "" => Ok(PickResult::Pending),
            "win" | "won" => Ok(PickResult::Win),
            "loss" | "lost" => Ok(PickResult::Loss),
            "push" | "tie" => Ok(PickResult::Push),
            other => Err(PoolError::UnknownPickResult(other.to_string())),
        }
    }
}

/// One participant's prediction against one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub pick_id: String,
    pub event_id: EventId,
    pub participant_id: ParticipantId,
    /// Team or outcome the participant chose
    #[serde(default)]
    pub selection: String,
    #[serde(default)]
    pub result: PickResult,
}

impl Pick {
    pub fn new(
        pick_id: impl Into<String>,
        event_id: impl Into<EventId>,
        participant_id: impl Into<ParticipantId>,
        result: PickResult,
    ) -> Self {
        Self {
            pick_id: pick_id.into(),
            event_id: event_id.into(),
            participant_id: participant_id.into(),
            selection: String::new(),
            result,
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Day-of-week bucket shared by visibility and legacy scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ordinary,
    /// Opening / holiday Thursday
    BonusA,
    /// Opening / holiday Friday
    BonusB,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ordinary => "ordinary",
            Category::BonusA => "bonus_a",
            Category::BonusB => "bonus_b",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_from_provider() {
        assert_eq!(EventStatus::from_provider("STATUS_IN_PROGRESS"), EventStatus::Live);
        assert_eq!(EventStatus::from_provider("STATUS_HALFTIME"), EventStatus::Live);
        assert_eq!(EventStatus::from_provider("live"), EventStatus::Live);
        assert_eq!(EventStatus::from_provider("STATUS_FINAL"), EventStatus::Final);
        assert_eq!(EventStatus::from_provider("completed"), EventStatus::Final);
        assert_eq!(EventStatus::from_provider("STATUS_SCHEDULED"), EventStatus::Scheduled);
        assert_eq!(EventStatus::from_provider("postponed"), EventStatus::Scheduled);
    }

    #[test]
    fn test_pick_result_parse() {
        assert_eq!("WIN".parse::<PickResult>().unwrap(), PickResult::Win);
        assert_eq!(" push ".parse::<PickResult>().unwrap(), PickResult::Push);
        assert_eq!("".parse::<PickResult>().unwrap(), PickResult::Pending);
        assert!("maybe".parse::<PickResult>().is_err());
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Category::BonusB).unwrap();
        assert_eq!(json, "\"bonus_b\"");

        let pick: Pick = serde_json::from_str(
            r#"{"pick_id":"p1","event_id":"e1","participant_id":"alice"}"#,
        )
        .unwrap();
        assert_eq!(pick.result, PickResult::Pending);
        assert!(pick.selection.is_empty());
    }

    #[test]
    fn test_feed_strings_deserialize() {
        let event: Event = serde_json::from_str(
            r#"{"event_id":"e1","kickoff":"2025-09-07T17:00:00Z","season":2025,"status":"STATUS_IN_PROGRESS"}"#,
        )
        .unwrap();
        assert_eq!(event.status, EventStatus::Live);
        assert_eq!(event.week, None);

        let statuses: Vec<EventStatus> =
            serde_json::from_str(r#"["final","STATUS_FINAL","scheduled","postponed"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![
                EventStatus::Final,
                EventStatus::Final,
                EventStatus::Scheduled,
                EventStatus::Scheduled
            ]
        );
        assert_eq!(serde_json::to_string(&EventStatus::Live).unwrap(), "\"live\"");

        let results: Vec<PickResult> =
            serde_json::from_str(r#"["WON","lost","tie","pending"]"#).unwrap();
        assert_eq!(
            results,
            vec![PickResult::Win, PickResult::Loss, PickResult::Push, PickResult::Pending]
        );
        assert!(serde_json::from_str::<PickResult>(r#""maybe""#).is_err());
        assert_eq!(serde_json::to_string(&PickResult::Push).unwrap(), "\"push\"");
    }

    #[test]
    fn test_event_index_lookup() {
        let kickoff = Utc.with_ymd_and_hms(2025, 9, 7, 17, 0, 0).unwrap();
        let events = vec![
            Event::new("e1", kickoff, 2025, Some(1)),
            Event::new("e2", kickoff, 2025, Some(1)),
        ];
        let index = EventIndex::new(&events);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("e2").map(|e| e.event_id.as_str()), Some("e2"));
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_effective_week_fallback() {
        let calendar = PoolCalendar::eastern();
        // Sunday of the 2025 opening weekend
        let kickoff = Utc.with_ymd_and_hms(2025, 9, 7, 17, 0, 0).unwrap();

        let assigned = Event::new("e1", kickoff, 2025, Some(4));
        assert_eq!(assigned.effective_week(&calendar), 4);

        let missing = Event::new("e2", kickoff, 2025, None);
        assert_eq!(missing.effective_week(&calendar), 1);
    }
}
