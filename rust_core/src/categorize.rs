//! Day categorization shared by visibility and scoring.
//!
//! [`PoolCalendar::categorize`] is the only implementation of the bonus-day
//! rules. The visibility engine and the legacy category grouping both call it.

use chrono::{DateTime, Utc, Weekday};
use tracing::debug;

use crate::calendar::PoolCalendar;
use crate::models::{Category, Event};

/// First season of the modern era: Friday bonus in the opening week, Monday
/// picks revealed at kickoff, and per-date scoring groups.
pub const MODERN_ERA_START: i32 = 2025;

pub fn is_modern_era(season: i32) -> bool {
    season >= MODERN_ERA_START
}

impl PoolCalendar {
    /// Category for an event kicking off at `kickoff` in `season`, `week`.
    pub fn categorize(&self, kickoff: DateTime<Utc>, season: i32, week: u32) -> Category {
        let holiday_week = self.holiday_week(season);
        let bonus_week = week == 1 || week == holiday_week;

        match self.local_weekday(kickoff) {
            Weekday::Thu => {
                if bonus_week {
                    Category::BonusA
                } else {
                    Category::Ordinary
                }
            }
            Weekday::Fri => {
                let eligible = if is_modern_era(season) {
                    bonus_week
                } else {
                    week == holiday_week
                };
                if eligible {
                    Category::BonusB
                } else {
                    Category::Ordinary
                }
            }
            Weekday::Sat | Weekday::Sun | Weekday::Mon | Weekday::Tue => Category::Ordinary,
            Weekday::Wed => {
                // No games are expected midweek; keep the historical Ordinary result
                debug!(
                    %kickoff,
                    season,
                    week,
                    "Wednesday event categorized as ordinary"
                );
                Category::Ordinary
            }
        }
    }

    /// [`categorize`](Self::categorize) using the event's effective week.
    pub fn categorize_event(&self, event: &Event) -> Category {
        self.categorize(event.kickoff, event.season, event.effective_week(self))
    }
}
