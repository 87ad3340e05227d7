/// Errors surfaced by remote fetches.
///
/// Every remote call converts its failure into one of these at the query
/// boundary; the owning screen renders it in place of its body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The remote call failed (transport, throttling, auth, bad response).
    #[error("{op}: {message}")]
    Transport { op: String, message: String },

    /// The addressed resource no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote call did not finish in time.
    #[error("{op}: timed out after {secs}s")]
    Timeout { op: String, secs: u64 },
}

impl FetchError {
    pub fn transport(op: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Transport {
            op: op.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}
