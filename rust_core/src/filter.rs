//! Filtering picks down to what one participant may see.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::models::{Event, EventIndex, Pick};
use crate::visibility::VisibilityEngine;

/// Applies reveal rules to a pick list on behalf of a viewer.
#[derive(Debug, Clone, Copy)]
pub struct PickFilter<'a> {
    engine: &'a VisibilityEngine,
}

impl<'a> PickFilter<'a> {
    pub fn new(engine: &'a VisibilityEngine) -> Self {
        Self { engine }
    }

    /// Picks `viewer_id` may see: all of their own, plus others' picks whose
    /// event has been revealed.
    ///
    /// The clock is read once, so every pick is judged against the same
    /// instant. Other participants' picks for unknown events are dropped.
    pub fn filter_visible<'p>(
        &self,
        picks: &'p [Pick],
        events: &[Event],
        viewer_id: &str,
    ) -> Vec<&'p Pick> {
        let index = EventIndex::new(events);
        let now = self.engine.now();
        let mut revealed: FxHashMap<&str, bool> = FxHashMap::default();

        picks
            .iter()
            .filter(|pick| {
                if pick.participant_id == viewer_id {
                    return true;
                }

                let Some(event) = index.get(&pick.event_id) else {
                    warn!(
                        pick_id = %pick.pick_id,
                        event_id = %pick.event_id,
                        "Dropping pick with unknown event from filtered view"
                    );
                    return false;
                };

                *revealed
                    .entry(event.event_id.as_str())
                    .or_insert_with(|| self.engine.compute_at(event, now).visible_now)
            })
            .collect()
    }
}
