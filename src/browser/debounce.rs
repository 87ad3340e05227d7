use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debounce of a rapidly changing value.
///
/// `settled` only takes `raw`'s value once `raw` has been left alone for the
/// quiet period. `pending_since` is set exactly while `raw != settled`.
#[derive(Clone, Debug)]
pub struct Debounce<T> {
    raw: T,
    settled: T,
    pending_since: Option<Instant>,
    quiet: Duration,
}

impl<T: Clone + PartialEq> Debounce<T> {
    pub fn new(initial: T, quiet: Duration) -> Self {
        Self {
            raw: initial.clone(),
            settled: initial,
            pending_since: None,
            quiet,
        }
    }

    /// Store a new raw value and restart the quiet timer.
    pub fn update(&mut self, raw: T, now: Instant) {
        self.raw = raw;
        self.pending_since = if self.raw == self.settled {
            None
        } else {
            Some(now)
        };
    }

    /// Settle if the quiet period has elapsed. Returns the newly settled
    /// value once per settle.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let since = self.pending_since?;
        if now.saturating_duration_since(since) < self.quiet {
            return None;
        }
        self.pending_since = None;
        self.settled = self.raw.clone();
        Some(&self.settled)
    }

    /// Settle immediately, skipping the quiet period.
    pub fn flush(&mut self) -> Option<&T> {
        self.pending_since?;
        self.pending_since = None;
        self.settled = self.raw.clone();
        Some(&self.settled)
    }

    pub fn raw(&self) -> &T {
        &self.raw
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn pending(&self) -> bool {
        self.raw != self.settled
    }

    /// When the pending value will settle, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending_since.map(|since| since + self.quiet)
    }
}

#[cfg(test)]
#[path = "../tests/browser/debounce_tests.rs"]
mod tests;
