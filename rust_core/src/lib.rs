//! Pickpool Core - reveal-time visibility and parlay scoring for a weekly pick pool.
//!
//! This crate provides:
//! - A canonical-zone pool calendar (holiday week, week numbers, local dates)
//! - Event categorization into ordinary and bonus slots
//! - An overridable clock for time-travel sessions
//! - The visibility engine deciding when others' picks are revealed
//! - Viewer-scoped pick filtering
//! - All-or-nothing parlay scoring with era-dependent grouping, season
//!   standings and a ranked leaderboard (parallelized via rayon)
//! - A seeded game-state generator for demos

pub mod calendar;
pub mod categorize;
pub mod clock;
pub mod demo;
pub mod error;
pub mod filter;
pub mod models;
pub mod scoring;
pub mod visibility;

pub use calendar::{
    holiday_date, week_number_for_date, week_one_start, zone_or_fallback, FixedOffsetZone,
    LocalZoneProvider, NamedZone, PoolCalendar,
};
pub use categorize::{is_modern_era, MODERN_ERA_START};
pub use clock::{parse_instant, Clock, OverridableClock, SystemClock};
pub use demo::{DemoGameState, DemoStateGenerator};
pub use error::PoolError;
pub use filter::PickFilter;
pub use models::{Category, Event, EventIndex, EventStatus, Pick, PickResult};
pub use scoring::{
    score_group, GroupScore, GroupStatus, GroupingStrategy, LeaderboardEntry, ScoringEngine,
    SeasonStanding, WeeklyScore,
};
pub use visibility::{PickVisibility, RevealRule, VisibilityEngine};
