//! Pool calendar: holiday and week arithmetic plus the canonical local zone.
//!
//! This module provides:
//! - The floating holiday (4th Thursday of November) for a season
//! - Week-number estimation from the Labor Day convention
//! - A [`LocalZoneProvider`] abstraction over the canonical zone, with an
//!   explicit degraded fixed-offset mode
//! - [`PoolCalendar`], the one place weekday and local-date decisions are made
//!
//! Visibility and scoring both read time through the same [`PoolCalendar`].

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::error::PoolError;
use crate::models::{Event, EventStatus};

/// IANA name of the zone every weekday and reveal-hour rule is evaluated in.
pub const CANONICAL_ZONE_NAME: &str = "America/New_York";

/// US Eastern standard time, used when the named zone cannot be resolved.
pub const FALLBACK_OFFSET_SECS: i32 = -5 * 3600;

/// Non-final events this far behind `now` no longer pin the current week.
const STALE_EVENT_HOURS: i64 = 24;

// ============================================================================
// Local zone providers
// ============================================================================

/// Converts instants to and from the pool's canonical local time.
pub trait LocalZoneProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset>;

    /// Resolve a local wall-clock time to an instant.
    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc>;

    /// True when the provider approximates the zone and ignores DST.
    fn is_degraded(&self) -> bool {
        false
    }
}

/// A real IANA zone backed by the compiled-in tz database.
#[derive(Debug, Clone, Copy)]
pub struct NamedZone {
    tz: Tz,
}

impl NamedZone {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn eastern() -> Self {
        Self::new(chrono_tz::America::New_York)
    }

    pub fn parse(name: &str) -> Result<Self, PoolError> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| PoolError::UnknownTimeZone(name.to_string()))
    }
}

impl LocalZoneProvider for NamedZone {
    fn name(&self) -> &str {
        self.tz.name()
    }

    fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = self.tz.offset_from_utc_datetime(&instant.naive_utc()).fix();
        instant.with_timezone(&offset)
    }

    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            // Fall-back overlap: take the first occurrence
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // Spring-forward gap: the wall time does not exist, move past it
            LocalResult::None => {
                let shifted = local + Duration::hours(1);
                self.tz
                    .from_local_datetime(&shifted)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| Utc.from_utc_datetime(&local))
            }
        }
    }
}

/// Fixed-offset approximation of the canonical zone.
///
/// Off by one hour for the whole daylight-saving period, which moves reveal
/// instants and can move late-evening events onto the wrong local date.
#[derive(Debug, Clone)]
pub struct FixedOffsetZone {
    offset: FixedOffset,
    label: String,
}

impl FixedOffsetZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            label: format!("fixed {}", offset),
            offset,
        }
    }

    pub fn eastern_standard() -> Self {
        Self::new(FixedOffset::east_opt(FALLBACK_OFFSET_SECS).unwrap_or_else(|| Utc.fix()))
    }
}

impl LocalZoneProvider for FixedOffsetZone {
    fn name(&self) -> &str {
        &self.label
    }

    fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let utc = local - Duration::seconds(self.offset.local_minus_utc().into());
        Utc.from_utc_datetime(&utc)
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

/// Resolve `name` to a zone, degrading to [`FixedOffsetZone`] if it is unknown.
pub fn zone_or_fallback(name: &str) -> Arc<dyn LocalZoneProvider> {
    match NamedZone::parse(name) {
        Ok(zone) => Arc::new(zone),
        Err(e) => {
            let fallback = FixedOffsetZone::eastern_standard();
            warn!(
                zone = name,
                fallback = fallback.name(),
                error = %e,
                "Time zone unavailable; using fixed-offset fallback (DST transitions will be wrong)"
            );
            Arc::new(fallback)
        }
    }
}

// ============================================================================
// Holiday and week arithmetic (zone independent)
// ============================================================================

fn first_weekday_on_or_after(year: i32, month: u32, day: u32, weekday: Weekday) -> NaiveDate {
    // Out-of-range seasons collapse to the epoch rather than panic
    let start = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    let ahead = (weekday.num_days_from_monday() + 7 - start.weekday().num_days_from_monday()) % 7;
    start + Duration::days(ahead.into())
}

/// The floating holiday: 4th Thursday of November of `season`.
pub fn holiday_date(season: i32) -> NaiveDate {
    first_weekday_on_or_after(season, 11, 1, Weekday::Thu) + Duration::weeks(3)
}

/// Start of week 1: the Thursday after the first Monday of September.
pub fn week_one_start(season: i32) -> NaiveDate {
    first_weekday_on_or_after(season, 9, 1, Weekday::Mon) + Duration::days(3)
}

/// Estimated pool week containing `date`, never below 1.
pub fn week_number_for_date(date: NaiveDate, season: i32) -> u32 {
    let days = (date - week_one_start(season)).num_days();
    let week = days.div_euclid(7) + 1;
    week.max(1) as u32
}

// ============================================================================
// PoolCalendar
// ============================================================================

/// Calendar bound to the canonical local zone.
#[derive(Debug, Clone)]
pub struct PoolCalendar {
    zone: Arc<dyn LocalZoneProvider>,
}

impl Default for PoolCalendar {
    fn default() -> Self {
        Self::eastern()
    }
}

impl PoolCalendar {
    pub fn new(zone: Arc<dyn LocalZoneProvider>) -> Self {
        Self { zone }
    }

    pub fn eastern() -> Self {
        Self::new(Arc::new(NamedZone::eastern()))
    }

    /// Build from a zone name, degrading (with a warning) if it is unknown.
    pub fn from_zone_name(name: &str) -> Self {
        Self::new(zone_or_fallback(name))
    }

    pub fn zone(&self) -> &dyn LocalZoneProvider {
        self.zone.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.zone.is_degraded()
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.zone.to_local(instant)
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date_naive()
    }

    pub fn local_weekday(&self, instant: DateTime<Utc>) -> Weekday {
        self.local_date(instant).weekday()
    }

    /// `YYYY-MM-DD` key of the local calendar date.
    pub fn local_date_key(&self, instant: DateTime<Utc>) -> String {
        self.local_date(instant).format("%Y-%m-%d").to_string()
    }

    /// The instant of `hour:00` local time on `date`.
    pub fn local_instant(&self, date: NaiveDate, hour: u32) -> DateTime<Utc> {
        let local = date
            .and_hms_opt(hour, 0, 0)
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
        self.zone.from_local(local)
    }

    pub fn week_number(&self, instant: DateTime<Utc>, season: i32) -> u32 {
        week_number_for_date(self.local_date(instant), season)
    }

    pub fn holiday_week(&self, season: i32) -> u32 {
        week_number_for_date(holiday_date(season), season)
    }

    /// Week the pool is currently playing.
    ///
    /// The earliest week that still has an unfinished, non-stale event; if
    /// everything is final, the latest week seen; with no events, week 1.
    pub fn current_week(&self, events: &[Event], now: DateTime<Utc>) -> u32 {
        if events.is_empty() {
            return 1;
        }

        let stale_before = now - Duration::hours(STALE_EVENT_HOURS);
        let open_week = events
            .iter()
            .filter(|e| e.status != EventStatus::Final && e.kickoff >= stale_before)
            .map(|e| e.effective_week(self))
            .min();

        open_week
            .or_else(|| events.iter().map(|e| e.effective_week(self)).max())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_holiday_is_fourth_thursday() {
        assert_eq!(holiday_date(2023), NaiveDate::from_ymd_opt(2023, 11, 23).unwrap());
        assert_eq!(holiday_date(2024), NaiveDate::from_ymd_opt(2024, 11, 28).unwrap());
        assert_eq!(holiday_date(2025), NaiveDate::from_ymd_opt(2025, 11, 27).unwrap());

        for season in 1990..=2100 {
            let date = holiday_date(season);
            assert_eq!(date.weekday(), Weekday::Thu, "season {}", season);
            assert_eq!(date.month(), 11);
            assert!((22..=28).contains(&date.day()));
            assert_eq!(
                week_number_for_date(date, season),
                week_number_for_date(date, season)
            );
        }
    }

    #[test]
    fn test_week_one_start() {
        // Labor Day 2025 is Sep 1, 2024 is Sep 2, 2023 is Sep 4
        assert_eq!(week_one_start(2025), NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        assert_eq!(week_one_start(2024), NaiveDate::from_ymd_opt(2024, 9, 5).unwrap());
        assert_eq!(week_one_start(2023), NaiveDate::from_ymd_opt(2023, 9, 7).unwrap());
    }

    #[test]
    fn test_week_number_for_date() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert_eq!(week_number_for_date(d(9, 4), 2025), 1);
        assert_eq!(week_number_for_date(d(9, 10), 2025), 1);
        assert_eq!(week_number_for_date(d(9, 11), 2025), 2);
        // Preseason dates floor at week 1
        assert_eq!(week_number_for_date(d(8, 1), 2025), 1);
    }

    #[test]
    fn test_holiday_weeks() {
        let calendar = PoolCalendar::eastern();
        assert_eq!(calendar.holiday_week(2023), 12);
        assert_eq!(calendar.holiday_week(2024), 13);
        assert_eq!(calendar.holiday_week(2025), 13);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let calendar = PoolCalendar::eastern();
        // 02:30 UTC Monday is 22:30 EDT Sunday
        let late_sunday = utc(2025, 9, 8, 2, 30);
        assert_eq!(calendar.local_weekday(late_sunday), Weekday::Sun);
        assert_eq!(calendar.local_date_key(late_sunday), "2025-09-07");
    }

    #[test]
    fn test_local_instant_tracks_dst() {
        let calendar = PoolCalendar::eastern();
        let summer = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        let winter = NaiveDate::from_ymd_opt(2025, 12, 7).unwrap();
        assert_eq!(calendar.local_instant(summer, 10), utc(2025, 9, 7, 14, 0));
        assert_eq!(calendar.local_instant(winter, 10), utc(2025, 12, 7, 15, 0));
    }

    #[test]
    fn test_fixed_offset_fallback_is_degraded() {
        let calendar = PoolCalendar::from_zone_name("Not/AZone");
        assert!(calendar.is_degraded());

        // Correct in winter, an hour off in summer
        let winter = NaiveDate::from_ymd_opt(2025, 12, 7).unwrap();
        let summer = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        assert_eq!(calendar.local_instant(winter, 10), utc(2025, 12, 7, 15, 0));
        assert_eq!(calendar.local_instant(summer, 10), utc(2025, 9, 7, 15, 0));
    }

    #[test]
    fn test_named_zone_parse() {
        assert!(NamedZone::parse("America/Chicago").is_ok());
        assert!(NamedZone::parse("Mars/Olympus").is_err());
        assert!(!PoolCalendar::from_zone_name(CANONICAL_ZONE_NAME).is_degraded());
    }

    #[test]
    fn test_current_week() {
        let calendar = PoolCalendar::eastern();
        let now = utc(2025, 9, 14, 12, 0);
        assert_eq!(calendar.current_week(&[], now), 1);

        let events = vec![
            Event::new("w1", utc(2025, 9, 7, 17, 0), 2025, Some(1)).with_status(EventStatus::Final),
            Event::new("w2a", utc(2025, 9, 14, 17, 0), 2025, Some(2)),
            Event::new("w3", utc(2025, 9, 21, 17, 0), 2025, Some(3)),
        ];
        assert_eq!(calendar.current_week(&events, now), 2);

        let all_final: Vec<Event> = events
            .iter()
            .cloned()
            .map(|e| e.with_status(EventStatus::Final))
            .collect();
        assert_eq!(calendar.current_week(&all_final, now), 3);
    }
}
