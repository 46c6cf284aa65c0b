//! Per-date pick groups for modern-era scoring and display.

use std::collections::BTreeMap;
use tracing::warn;

use crate::calendar::PoolCalendar;
use crate::models::{EventIndex, Pick};

/// Local `YYYY-MM-DD` date -> picks whose event falls on that date.
pub type DailyPickGroups<'p> = BTreeMap<String, Vec<&'p Pick>>;

#[derive(Debug, Clone, Copy)]
pub struct DailyGroupBuilder<'c> {
    calendar: &'c PoolCalendar,
}

impl<'c> DailyGroupBuilder<'c> {
    pub fn new(calendar: &'c PoolCalendar) -> Self {
        Self { calendar }
    }

    /// Group picks by the local calendar date of their event.
    ///
    /// Picks keep their input order within a date. Picks whose event is not
    /// in `events` are dropped.
    pub fn group_by_day<'p, I>(&self, picks: I, events: &EventIndex<'_>) -> DailyPickGroups<'p>
    where
        I: IntoIterator<Item = &'p Pick>,
    {
        let mut groups = DailyPickGroups::new();
        for pick in picks {
            match events.get(&pick.event_id) {
                Some(event) => groups
                    .entry(self.calendar.local_date_key(event.kickoff))
                    .or_default()
                    .push(pick),
                None => warn!(
                    pick_id = %pick.pick_id,
                    event_id = %pick.event_id,
                    "Dropping pick with unknown event from daily grouping"
                ),
            }
        }
        groups
    }
}
