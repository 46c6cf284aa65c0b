//! Clock sources for reveal-time decisions.
//!
//! Everything that needs "now" takes an injected [`Clock`]. Production uses
//! [`SystemClock`]; tests and the demo tooling use [`OverridableClock`], whose
//! override instant sits behind a lock so concurrent readers never observe a
//! torn value.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::error::PoolError;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall-clock time unless an override instant is set.
#[derive(Debug, Default)]
pub struct OverridableClock {
    override_at: RwLock<Option<DateTime<Utc>>>,
}

impl OverridableClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock frozen at `instant` until the override is cleared.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            override_at: RwLock::new(Some(instant)),
        }
    }

    pub fn set_override(&self, instant: DateTime<Utc>) {
        *self.override_at.write() = Some(instant);
        debug!(%instant, "Clock override set");
    }

    pub fn clear_override(&self) {
        let previous = self.override_at.write().take();
        if previous.is_some() {
            debug!("Clock override cleared");
        }
    }

    pub fn override_instant(&self) -> Option<DateTime<Utc>> {
        *self.override_at.read()
    }

    pub fn is_overridden(&self) -> bool {
        self.override_at.read().is_some()
    }
}

impl Clock for OverridableClock {
    fn now(&self) -> DateTime<Utc> {
        self.override_instant().unwrap_or_else(Utc::now)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Parse an RFC 3339 instant (e.g. `2025-09-07T13:59:59-04:00`).
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, PoolError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| PoolError::InvalidInstant {
            value: raw.to_string(),
            source,
        })
}
