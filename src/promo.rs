//! Welcome promotion: a time-boxed discount opened when a shopper registers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_WINDOW_HOURS: i64 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalWindow {
    expires_at: DateTime<Utc>,
}

impl PromotionalWindow {
    pub fn new(expires_at: DateTime<Utc>) -> Self { Self { expires_at } }

    pub fn starting_at(now: DateTime<Utc>, length: chrono::Duration) -> Self { Self { expires_at: now + length } }

    pub fn expires_at(&self) -> DateTime<Utc> { self.expires_at }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool { now < self.expires_at }

    /// The discount only applies to a signed-in shopper.
    pub fn applies(&self, now: DateTime<Utc>, authenticated: bool) -> bool { authenticated && self.is_open(now) }

    /// Time left, never negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Reports the time left on every tick and returns once it reaches zero.
/// The last value passed to `on_tick` is always zero.
pub async fn run_countdown<F>(window: PromotionalWindow, tick: Duration, mut on_tick: F)
where
    F: FnMut(Duration),
{
    let mut interval = tokio::time::interval(tick);
    loop {
        interval.tick().await;
        let remaining = window.remaining(Utc::now());
        on_tick(remaining);
        if remaining.is_zero() {
            debug!(expires_at = %window.expires_at(), "promotion countdown finished");
            break;
        }
    }
}
