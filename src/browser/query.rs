use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Notify, mpsc};

use crate::error::FetchError;
use crate::model::{Profile, ScreenId, ScreenParams};

/// Everything a screen fetch depends on. Two fetches with equal keys are
/// interchangeable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub profile: Profile,
    pub screen: ScreenId,
    pub params: ScreenParams,
    /// Settled filter text, when the filter is applied remotely.
    pub filter: String,
    /// Bumped on every manual refresh so an unchanged query still re-runs.
    pub refresh: u64,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} params={} filter={:?} refresh={}",
            self.screen.label(),
            self.profile.name,
            self.params.len(),
            self.filter,
            self.refresh
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueryStatus<T> {
    /// Nothing has been requested (or the screen lacks what it needs to ask).
    Idle,
    Loading,
    Failed(FetchError),
    Ready(T),
}

impl<T> QueryStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryStatus::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryStatus::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            QueryStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

type Settled<K, T> = (K, Result<T, FetchError>);

/// Runs one async fetch per query key and commits only the result whose key
/// is still current when it settles.
///
/// Superseded fetches keep running to completion; their results are dropped
/// in [`QueryRunner::settle`].
pub struct QueryRunner<K, T> {
    key: Option<K>,
    status: QueryStatus<T>,
    tx: mpsc::UnboundedSender<Settled<K, T>>,
    rx: mpsc::UnboundedReceiver<Settled<K, T>>,
    wake: Option<Arc<Notify>>,
    started: u64,
}

impl<K, T> QueryRunner<K, T>
where
    K: Clone + PartialEq + fmt::Display + Send + 'static,
    T: Send + 'static,
{
    pub fn new(wake: Option<Arc<Notify>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            key: None,
            status: QueryStatus::Idle,
            tx,
            rx,
            wake,
            started: 0,
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn status(&self) -> &QueryStatus<T> {
        &self.status
    }

    /// How many producers have been started.
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Start `producer` unless `key` is already the current key.
    ///
    /// Returns whether a new fetch was started.
    pub fn run<F, Fut>(&mut self, key: K, producer: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        tracing::debug!(key = %key, "query started");
        self.key = Some(key.clone());
        self.status = QueryStatus::Loading;
        self.started += 1;

        let fut = producer();
        let tx = self.tx.clone();
        let wake = self.wake.clone();
        tokio::spawn(async move {
            let result = fut.await;
            // The receiver is gone once the owning screen is dropped.
            let _ = tx.send((key, result));
            if let Some(wake) = wake {
                wake.notify_one();
            }
        });
        true
    }

    /// Forget the current key without fetching. Late results from earlier
    /// keys are discarded.
    pub fn clear(&mut self) {
        self.key = None;
        self.status = QueryStatus::Idle;
    }

    /// Apply a settled result if `key` is still current.
    pub fn settle(&mut self, key: K, result: Result<T, FetchError>) -> bool {
        if self.key.as_ref() != Some(&key) {
            tracing::debug!(key = %key, "discarding stale query result");
            return false;
        }
        self.status = match result {
            Ok(v) => QueryStatus::Ready(v),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "query failed");
                QueryStatus::Failed(err)
            }
        };
        true
    }

    /// Apply every result that has arrived since the last poll. Returns
    /// whether visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((key, result)) = self.rx.try_recv() {
            changed |= self.settle(key, result);
        }
        changed
    }
}

#[cfg(test)]
#[path = "../tests/browser/query_tests.rs"]
mod tests;
