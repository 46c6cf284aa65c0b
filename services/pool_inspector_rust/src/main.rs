//! Pool inspector: prints what the pool looks like at a given instant.
//!
//! Loads events and picks from JSON, optionally freezes the clock and overlays
//! simulated game states, then reports the reveal schedule, a viewer's
//! filtered picks and the season leaderboard as JSON on stdout.

mod config;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use dotenv::dotenv;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use pickpool_core::{
    Clock, DemoGameState, DemoStateGenerator, Event, LeaderboardEntry, OverridableClock, Pick,
    PickFilter, PickVisibility, PoolCalendar, ScoringEngine, VisibilityEngine,
};

use crate::config::Config;

#[derive(Debug, Serialize)]
struct PoolReport<'a> {
    now: DateTime<Utc>,
    clock_overridden: bool,
    zone: &'a str,
    zone_degraded: bool,
    season: i32,
    current_week: u32,
    reveal_schedule: Vec<PickVisibility>,
    next_reveal: Option<PickVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    viewer_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visible_picks: Option<Vec<&'a Pick>>,
    leaderboard: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    demo_states: Vec<DemoGameState>,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting pool inspector...");

    let config = Config::from_env()?;

    let calendar = PoolCalendar::from_zone_name(&config.timezone);
    let clock = Arc::new(OverridableClock::new());
    if let Some(at) = config.clock_override {
        clock.set_override(at);
    }
    let now = clock.now();

    let mut events: Vec<Event> = load_json(&config.events_path)?;
    let picks: Vec<Pick> = load_json(&config.picks_path)?;
    info!(events = events.len(), picks = picks.len(), "Loaded pool data");

    let demo_states = match config.demo_seed {
        Some(seed) => {
            let (overlaid, states) = DemoStateGenerator::seeded(seed).overlay(&events, now);
            events = overlaid;
            for state in &states {
                debug!(
                    event_id = %state.event_id,
                    status = state.status.as_str(),
                    period = state.period,
                    "Simulated game state"
                );
            }
            info!(seed, "Overlaid simulated game states");
            states
        }
        None => Vec::new(),
    };

    let season = config.season.unwrap_or_else(|| {
        events
            .iter()
            .map(|e| e.season)
            .max()
            .unwrap_or_else(|| now.year())
    });

    let engine = VisibilityEngine::new(calendar.clone(), clock.clone());
    let scoring = ScoringEngine::new(calendar.clone());

    let visible_picks = config.viewer_id.as_deref().map(|viewer| {
        let visible = PickFilter::new(&engine).filter_visible(&picks, &events, viewer);
        info!(viewer, visible = visible.len(), total = picks.len(), "Filtered picks");
        visible
    });

    let leaderboard = scoring.leaderboard(&picks, &events, season);
    if leaderboard.is_empty() {
        warn!(season, "No picks scored for season");
    }

    let next_reveal = engine.next_reveal(&events);
    if let Some(next) = &next_reveal {
        info!(
            event_id = %next.event_id,
            reveal_at = %next.reveal_at,
            rule = next.rule.as_str(),
            "Next reveal"
        );
    }

    let report = PoolReport {
        now,
        clock_overridden: clock.is_overridden(),
        zone: calendar.zone().name(),
        zone_degraded: calendar.is_degraded(),
        season,
        current_week: calendar.current_week(&events, now),
        reveal_schedule: engine.reveal_schedule(&events),
        next_reveal,
        viewer_id: config.viewer_id.as_deref(),
        visible_picks,
        leaderboard,
        demo_states,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
