use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq)]
pub struct LogGroup {
    pub name: String,
    pub stored_bytes: u64,
    /// `None` means events never expire.
    pub retention_days: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogStream {
    pub name: String,
    pub last_event: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    pub timestamp: OffsetDateTime,
    pub message: String,
}
