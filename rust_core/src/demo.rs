//! Fabricated game state for demo and time-travel sessions.
//!
//! Nothing in visibility or scoring depends on this module. Callers that
//! rehearse reveal transitions can overlay the simulated status onto their
//! events; a fixed seed makes the fabricated scores reproducible.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Event, EventId, EventStatus};

/// Regulation game clock (4 x 15 minutes).
pub const REGULATION_SECONDS: u32 = 3600;
pub const QUARTER_SECONDS: u32 = 900;

/// Wall-clock length of a broadcast game, kickoff to final whistle.
pub const BROADCAST_MINUTES: i64 = 195;

/// Possessions per team over a full game.
const DRIVES_PER_GAME: f64 = 11.0;

/// Points a drive can end with, weighted by repetition.
const DRIVE_OUTCOMES: [u16; 10] = [0, 0, 0, 0, 0, 3, 3, 6, 7, 7];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoGameState {
    pub event_id: EventId,
    pub status: EventStatus,
    pub home_score: u16,
    pub away_score: u16,
    /// 0 before kickoff, 1-4 during and after
    pub period: u8,
    pub time_remaining_seconds: u32,
}

pub struct DemoStateGenerator {
    rng: StdRng,
}

impl DemoStateGenerator {
    /// Reproducible generator for tests and scripted demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Plausible state of `event` at `at`, derived from time since kickoff.
    pub fn simulate(&mut self, event: &Event, at: DateTime<Utc>) -> DemoGameState {
        let elapsed = at - event.kickoff;
        let broadcast = Duration::minutes(BROADCAST_MINUTES);

        if elapsed < Duration::zero() {
            return DemoGameState {
                event_id: event.event_id.clone(),
                status: EventStatus::Scheduled,
                home_score: 0,
                away_score: 0,
                period: 0,
                time_remaining_seconds: REGULATION_SECONDS,
            };
        }

        if elapsed >= broadcast {
            let mut home_score = self.score_for(1.0);
            let away_score = self.score_for(1.0);
            if home_score == away_score && self.rng.gen_bool(0.9) {
                // Overtime field goal
                home_score += 3;
            }
            return DemoGameState {
                event_id: event.event_id.clone(),
                status: EventStatus::Final,
                home_score,
                away_score,
                period: 4,
                time_remaining_seconds: 0,
            };
        }

        let progress = elapsed.num_seconds() as f64 / broadcast.num_seconds() as f64;
        let game_seconds = (progress * REGULATION_SECONDS as f64) as u32;
        let period = (game_seconds / QUARTER_SECONDS + 1).min(4);
        let time_remaining_seconds = QUARTER_SECONDS * period - game_seconds;

        DemoGameState {
            event_id: event.event_id.clone(),
            status: EventStatus::Live,
            home_score: self.score_for(progress),
            away_score: self.score_for(progress),
            period: period as u8,
            time_remaining_seconds,
        }
    }

    /// Simulate every event and return copies carrying the simulated status.
    pub fn overlay(&mut self, events: &[Event], at: DateTime<Utc>) -> (Vec<Event>, Vec<DemoGameState>) {
        let states: Vec<DemoGameState> = events.iter().map(|e| self.simulate(e, at)).collect();
        let overlaid = events
            .iter()
            .zip(&states)
            .map(|(event, state)| event.clone().with_status(state.status))
            .collect();
        (overlaid, states)
    }

    fn score_for(&mut self, progress: f64) -> u16 {
        let drives = (progress * DRIVES_PER_GAME).round() as usize;
        (0..drives)
            .map(|_| DRIVE_OUTCOMES.choose(&mut self.rng).copied().unwrap_or(0))
            .sum()
    }
}

impl std::fmt::Debug for DemoStateGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoStateGenerator").finish_non_exhaustive()
    }
}
