use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::env;
use std::path::PathBuf;

use pickpool_core::calendar::CANONICAL_ZONE_NAME;
use pickpool_core::parse_instant;

#[derive(Debug, Clone)]
pub struct Config {
    /// IANA zone for reveal and scoring decisions; unknown names degrade to UTC-5
    pub timezone: String,
    /// Freeze "now" for time-travel sessions
    pub clock_override: Option<DateTime<Utc>>,

    pub events_path: PathBuf,
    pub picks_path: PathBuf,

    /// Participant whose filtered view is printed
    pub viewer_id: Option<String>,
    /// Defaults to the latest season among the loaded events
    pub season: Option<i32>,
    /// Overlay simulated game states when set
    pub demo_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timezone = non_empty(&lookup, "POOL_TIMEZONE")
            .unwrap_or_else(|| CANONICAL_ZONE_NAME.to_string());

        let clock_override = non_empty(&lookup, "POOL_CLOCK_OVERRIDE")
            .map(|raw| parse_instant(&raw))
            .transpose()
            .context("POOL_CLOCK_OVERRIDE")?;

        let events_path = non_empty(&lookup, "POOL_EVENTS_PATH")
            .unwrap_or_else(|| "data/events.json".to_string())
            .into();
        let picks_path = non_empty(&lookup, "POOL_PICKS_PATH")
            .unwrap_or_else(|| "data/picks.json".to_string())
            .into();

        let viewer_id = non_empty(&lookup, "POOL_VIEWER_ID");
        let season = parse_opt_env::<i32, _>(&lookup, "POOL_SEASON")?;
        let demo_seed = parse_opt_env::<u64, _>(&lookup, "POOL_DEMO_SEED")?;

        Ok(Self {
            timezone,
            clock_override,
            events_path,
            picks_path,
            viewer_id,
            season,
            demo_seed,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_opt_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.clock_override, None);
        assert_eq!(config.events_path, PathBuf::from("data/events.json"));
        assert_eq!(config.picks_path, PathBuf::from("data/picks.json"));
        assert!(config.viewer_id.is_none());
        assert!(config.season.is_none());
        assert!(config.demo_seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("POOL_TIMEZONE", "America/Chicago"),
            ("POOL_CLOCK_OVERRIDE", "2025-09-07T09:59:59-04:00"),
            ("POOL_VIEWER_ID", " alice "),
            ("POOL_SEASON", "2024"),
            ("POOL_DEMO_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(config.timezone, "America/Chicago");
        assert_eq!(
            config.clock_override,
            Some(Utc.with_ymd_and_hms(2025, 9, 7, 13, 59, 59).unwrap())
        );
        assert_eq!(config.viewer_id.as_deref(), Some("alice"));
        assert_eq!(config.season, Some(2024));
        assert_eq!(config.demo_seed, Some(42));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("POOL_TIMEZONE", "  "), ("POOL_SEASON", "")]).unwrap();
        assert_eq!(config.timezone, "America/New_York");
        assert!(config.season.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("POOL_CLOCK_OVERRIDE", "next sunday")]).is_err());
        assert!(config_from(&[("POOL_SEASON", "twenty")]).is_err());
        assert!(config_from(&[("POOL_DEMO_SEED", "-1")]).is_err());
    }
}
