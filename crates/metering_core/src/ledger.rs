use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::period::{compute_expiration, Period};

/// Stable identifier of a post or page. Hosts send either numbers or strings;
/// `1` and `"1"` are different identifiers. Any JSON number is accepted,
/// negative and fractional ones included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentId {
    Number(Number),
    Text(String),
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Number(id) => write!(f, "{id}"),
            ContentId::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<u64> for ContentId {
    fn from(id: u64) -> Self {
        ContentId::Number(id.into())
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        ContentId::Text(id.to_owned())
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        ContentId::Text(id)
    }
}

/// Persisted record of what the reader has viewed in the current period.
///
/// `content` is kept in view order and never holds the same id twice, so its
/// length is the number of views consumed. `expiration` is the Unix time (UTC
/// seconds) at which the period ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLedger {
    pub content: Vec<ContentId>,
    pub expiration: i64,
}

impl ViewLedger {
    /// Empty ledger for the period containing `now`.
    pub fn fresh<Tz: TimeZone>(period: Period, now: &DateTime<Tz>) -> Self {
        Self {
            content: Vec::new(),
            expiration: compute_expiration(period, now),
        }
    }

    /// Use the persisted ledger if there is one, otherwise start fresh.
    pub fn load_or_fresh<Tz: TimeZone>(
        persisted: Option<ViewLedger>,
        period: Period,
        now: &DateTime<Tz>,
    ) -> Self {
        persisted.unwrap_or_else(|| Self::fresh(period, now))
    }

    pub fn is_expired<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.timestamp() >= self.expiration
    }

    /// Returns `self` untouched while the period is running, or a fresh
    /// ledger once `now` has reached `expiration`.
    pub fn rollover_if_expired<Tz: TimeZone>(self, period: Period, now: &DateTime<Tz>) -> Self {
        if self.is_expired(now) {
            Self::fresh(period, now)
        } else {
            self
        }
    }

    /// Appends `id` unless it was already viewed this period.
    /// Returns whether the ledger changed.
    pub fn record_view(&mut self, id: &ContentId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.content.push(id.clone());
        true
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.content.contains(id)
    }

    pub fn views_used(&self) -> usize {
        self.content.len()
    }
}
