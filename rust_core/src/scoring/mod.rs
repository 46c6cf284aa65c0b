//! Parlay scoring for weekly totals, season standings and the leaderboard.
//!
//! One rule ([`parlay`]) and two grouping strategies selected by season era:
//! - Legacy seasons group a week's picks by [`Category`]
//! - Modern seasons group a week's picks by local calendar date ([`daily`])
//!
//! A week's total is the sum of its group scores; a season total is the
//! running sum of weekly totals.

pub mod daily;
pub mod parlay;

pub use daily::{DailyGroupBuilder, DailyPickGroups};
pub use parlay::{score_group, GroupScore, GroupStatus, MIN_PARLAY_LEGS};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::calendar::PoolCalendar;
use crate::categorize::is_modern_era;
use crate::models::{Category, Event, EventIndex, ParticipantId, Pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    ByCategory,
    ByDate,
}

impl GroupingStrategy {
    pub fn for_season(season: i32) -> Self {
        if is_modern_era(season) {
            GroupingStrategy::ByDate
        } else {
            GroupingStrategy::ByCategory
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingStrategy::ByCategory => "by_category",
            GroupingStrategy::ByDate => "by_date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum GroupKey {
    Category(Category),
    /// Local `YYYY-MM-DD`
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTally {
    pub key: GroupKey,
    pub score: GroupScore,
}

/// One participant's scored week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub week: u32,
    pub strategy: GroupingStrategy,
    pub groups: Vec<GroupTally>,
    pub total: u32,
    /// Running season total through this week
    pub season_to_date: u32,
}

impl WeeklyScore {
    /// Any group still waiting on a result.
    pub fn is_pending(&self) -> bool {
        self.groups.iter().any(|g| g.score.is_pending())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStanding {
    pub participant_id: ParticipantId,
    pub season: i32,
    pub weeks: Vec<WeeklyScore>,
    pub season_total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Shared by participants with equal totals (1, 1, 3, ...)
    pub rank: u32,
    pub participant_id: ParticipantId,
    pub season_total: u32,
    pub weeks_played: usize,
}

/// Scores picks with the season's grouping strategy.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    calendar: PoolCalendar,
}

impl ScoringEngine {
    pub fn new(calendar: PoolCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &PoolCalendar {
        &self.calendar
    }

    /// Score one participant's picks for one week.
    pub fn score_week(
        &self,
        week: u32,
        picks: &[&Pick],
        events: &EventIndex<'_>,
        season: i32,
    ) -> WeeklyScore {
        let strategy = GroupingStrategy::for_season(season);
        let groups: Vec<GroupTally> = match strategy {
            GroupingStrategy::ByCategory => self
                .group_by_category(picks, events)
                .into_iter()
                .map(|(category, group)| {
                    let score = GroupScore::tally(group.iter().map(|p| p.result));
                    debug!(
                        week,
                        category = category.as_str(),
                        legs = score.legs(),
                        points = score.points,
                        "Scored category group"
                    );
                    GroupTally {
                        key: GroupKey::Category(category),
                        score,
                    }
                })
                .collect(),
            GroupingStrategy::ByDate => DailyGroupBuilder::new(&self.calendar)
                .group_by_day(picks.iter().copied(), events)
                .into_iter()
                .map(|(date, group)| GroupTally {
                    key: GroupKey::Date(date),
                    score: GroupScore::tally(group.iter().map(|p| p.result)),
                })
                .collect(),
        };

        let total: u32 = groups.iter().map(|g| g.score.points).sum();
        debug!(
            week,
            season,
            strategy = strategy.as_str(),
            groups = groups.len(),
            total,
            "Scored week"
        );
        WeeklyScore {
            week,
            strategy,
            groups,
            total,
            season_to_date: total,
        }
    }

    /// Legacy grouping: bucket picks by their event's [`Category`].
    fn group_by_category<'p>(
        &self,
        picks: &[&'p Pick],
        events: &EventIndex<'_>,
    ) -> BTreeMap<Category, Vec<&'p Pick>> {
        let mut groups: BTreeMap<Category, Vec<&'p Pick>> = BTreeMap::new();
        for &pick in picks {
            match events.get(&pick.event_id) {
                Some(event) => groups
                    .entry(self.calendar.categorize_event(event))
                    .or_default()
                    .push(pick),
                None => warn!(
                    pick_id = %pick.pick_id,
                    event_id = %pick.event_id,
                    "Dropping pick with unknown event from category grouping"
                ),
            }
        }
        groups
    }

    /// Week-by-week standing for one participant in `season`.
    pub fn score_season(
        &self,
        participant_id: &str,
        picks: &[Pick],
        events: &[Event],
        season: i32,
    ) -> SeasonStanding {
        let index = EventIndex::new(events);
        let own: Vec<&Pick> = picks
            .iter()
            .filter(|p| p.participant_id == participant_id)
            .collect();
        self.score_participant(participant_id, &own, &index, season)
    }

    fn score_participant(
        &self,
        participant_id: &str,
        picks: &[&Pick],
        events: &EventIndex<'_>,
        season: i32,
    ) -> SeasonStanding {
        let mut by_week: BTreeMap<u32, Vec<&Pick>> = BTreeMap::new();
        for &pick in picks {
            let Some(event) = events.get(&pick.event_id) else {
                warn!(
                    participant_id,
                    pick_id = %pick.pick_id,
                    event_id = %pick.event_id,
                    "Dropping pick with unknown event from season scoring"
                );
                continue;
            };
            if event.season != season {
                debug!(
                    pick_id = %pick.pick_id,
                    event_season = event.season,
                    season,
                    "Skipping pick from another season"
                );
                continue;
            }
            by_week
                .entry(event.effective_week(&self.calendar))
                .or_default()
                .push(pick);
        }

        let mut season_total = 0;
        let weeks: Vec<WeeklyScore> = by_week
            .into_iter()
            .map(|(week, group)| {
                let mut scored = self.score_week(week, &group, events, season);
                season_total += scored.total;
                scored.season_to_date = season_total;
                scored
            })
            .collect();

        SeasonStanding {
            participant_id: participant_id.to_string(),
            season,
            weeks,
            season_total,
        }
    }

    /// Every participant's standing, best first.
    pub fn standings(&self, picks: &[Pick], events: &[Event], season: i32) -> Vec<SeasonStanding> {
        let index = EventIndex::new(events);

        let mut by_participant: FxHashMap<&str, Vec<&Pick>> = FxHashMap::default();
        for pick in picks {
            by_participant
                .entry(pick.participant_id.as_str())
                .or_default()
                .push(pick);
        }
        let participants: Vec<(&str, Vec<&Pick>)> = by_participant.into_iter().collect();

        let mut standings: Vec<SeasonStanding> = participants
            .par_iter()
            .map(|(participant_id, own)| self.score_participant(participant_id, own, &index, season))
            .collect();

        standings.sort_by(|a, b| {
            b.season_total
                .cmp(&a.season_total)
                .then_with(|| a.participant_id.cmp(&b.participant_id))
        });
        standings
    }

    /// Ranked season totals for the leaderboard.
    pub fn leaderboard(&self, picks: &[Pick], events: &[Event], season: i32) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = Vec::new();
        for (i, standing) in self.standings(picks, events, season).into_iter().enumerate() {
            let rank = match entries.last() {
                Some(prev) if prev.season_total == standing.season_total => prev.rank,
                _ => i as u32 + 1,
            };
            entries.push(LeaderboardEntry {
                rank,
                participant_id: standing.participant_id,
                season_total: standing.season_total,
                weeks_played: standing.weeks.len(),
            });
        }
        entries
    }
}
