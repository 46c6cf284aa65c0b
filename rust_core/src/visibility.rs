//! Reveal-time rules for other participants' picks.
//!
//! This module provides:
//! - The per-weekday reveal instant for a scheduled event
//! - The live/final override (picks are public once a game starts)
//! - Schedule helpers for the push layer: full schedule, next reveal, and the
//!   events that became visible since the last tick
//!
//! Reveal instants are wall-clock hours in the canonical zone on the event's
//! local calendar date (or a neighbouring date, per rule).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calendar::PoolCalendar;
use crate::categorize::is_modern_era;
use crate::clock::Clock;
use crate::models::{Event, EventId};

/// Local hour for the morning reveals.
pub const MORNING_REVEAL_HOUR: u32 = 10;

/// Local hour for ordinary Thursday reveals.
pub const EVENING_REVEAL_HOUR: u32 = 17;

/// Which rule produced a reveal instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealRule {
    /// Event is live or final
    GameStarted,
    HolidayThursdayMorning,
    ThursdayEvening,
    /// Friday events reveal Saturday morning
    FridayNextMorning,
    SaturdayMorning,
    SundayMorning,
    /// Modern era: Monday picks reveal at kickoff
    MondayKickoff,
    /// Legacy era: Monday picks reveal with Sunday's
    MondayPrecedingSunday,
    /// Midweek fallback: the preceding Saturday morning
    PrecedingSaturday,
}

impl RevealRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameStarted => "game_started",
            Self::HolidayThursdayMorning => "holiday_thursday_morning",
            Self::ThursdayEvening => "thursday_evening",
            Self::FridayNextMorning => "friday_next_morning",
            Self::SaturdayMorning => "saturday_morning",
            Self::SundayMorning => "sunday_morning",
            Self::MondayKickoff => "monday_kickoff",
            Self::MondayPrecedingSunday => "monday_preceding_sunday",
            Self::PrecedingSaturday => "preceding_saturday",
        }
    }
}

/// Whether picks for one event may be shown to other participants.
///
/// Computed per query and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickVisibility {
    pub event_id: EventId,
    pub reveal_at: DateTime<Utc>,
    pub visible_now: bool,
    pub rule: RevealRule,
}

/// Computes [`PickVisibility`] against an injected clock.
#[derive(Clone)]
pub struct VisibilityEngine {
    calendar: PoolCalendar,
    clock: Arc<dyn Clock>,
}

impl VisibilityEngine {
    pub fn new(calendar: PoolCalendar, clock: Arc<dyn Clock>) -> Self {
        Self { calendar, clock }
    }

    pub fn calendar(&self) -> &PoolCalendar {
        &self.calendar
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn compute(&self, event: &Event) -> PickVisibility {
        self.compute_at(event, self.clock.now())
    }

    /// Visibility of `event` as seen at `now`.
    ///
    /// A started event keeps the earliest of its scheduled reveal, kickoff and
    /// `now`, so a game going live never moves an earlier reveal forward.
    pub fn compute_at(&self, event: &Event, now: DateTime<Utc>) -> PickVisibility {
        let (scheduled_at, scheduled_rule) = self.scheduled_reveal(event);
        let (reveal_at, rule) = if event.status.has_started() {
            (
                scheduled_at.min(event.kickoff).min(now),
                RevealRule::GameStarted,
            )
        } else {
            (scheduled_at, scheduled_rule)
        };

        PickVisibility {
            event_id: event.event_id.clone(),
            reveal_at,
            visible_now: now >= reveal_at,
            rule,
        }
    }

    /// Reveal instant from the weekday rules alone, ignoring live/final state.
    pub fn scheduled_reveal(&self, event: &Event) -> (DateTime<Utc>, RevealRule) {
        let date = self.calendar.local_date(event.kickoff);
        let at = |day: NaiveDate, hour: u32| self.calendar.local_instant(day, hour);

        match self.calendar.local_weekday(event.kickoff) {
            Weekday::Thu => {
                let week = event.effective_week(&self.calendar);
                if week == self.calendar.holiday_week(event.season) {
                    (at(date, MORNING_REVEAL_HOUR), RevealRule::HolidayThursdayMorning)
                } else {
                    (at(date, EVENING_REVEAL_HOUR), RevealRule::ThursdayEvening)
                }
            }
            Weekday::Fri => (
                at(date + Duration::days(1), MORNING_REVEAL_HOUR),
                RevealRule::FridayNextMorning,
            ),
            Weekday::Sat => (at(date, MORNING_REVEAL_HOUR), RevealRule::SaturdayMorning),
            Weekday::Sun => (at(date, MORNING_REVEAL_HOUR), RevealRule::SundayMorning),
            Weekday::Mon if is_modern_era(event.season) => {
                (event.kickoff, RevealRule::MondayKickoff)
            }
            Weekday::Mon => (
                at(date - Duration::days(1), MORNING_REVEAL_HOUR),
                RevealRule::MondayPrecedingSunday,
            ),
            Weekday::Tue | Weekday::Wed => (
                at(preceding_saturday(date), MORNING_REVEAL_HOUR),
                RevealRule::PrecedingSaturday,
            ),
        }
    }

    /// Visibility for every event, ordered by reveal instant.
    pub fn reveal_schedule(&self, events: &[Event]) -> Vec<PickVisibility> {
        let now = self.clock.now();
        let mut schedule: Vec<PickVisibility> =
            events.iter().map(|e| self.compute_at(e, now)).collect();
        schedule.sort_by(|a, b| {
            a.reveal_at
                .cmp(&b.reveal_at)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
        schedule
    }

    /// The earliest reveal that has not happened yet.
    pub fn next_reveal(&self, events: &[Event]) -> Option<PickVisibility> {
        self.reveal_schedule(events)
            .into_iter()
            .find(|v| !v.visible_now)
    }

    /// Events whose picks became visible in `(since, now]`.
    pub fn newly_visible(&self, events: &[Event], since: DateTime<Utc>) -> Vec<PickVisibility> {
        self.reveal_schedule(events)
            .into_iter()
            .filter(|v| v.visible_now && v.reveal_at > since)
            .collect()
    }
}

impl std::fmt::Debug for VisibilityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityEngine")
            .field("calendar", &self.calendar)
            .finish_non_exhaustive()
    }
}

fn preceding_saturday(date: NaiveDate) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 7 - Weekday::Sat.num_days_from_monday()) % 7;
    let back = if back == 0 { 7 } else { back };
    date - Duration::days(back.into())
}
