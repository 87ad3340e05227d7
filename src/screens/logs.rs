use futures::FutureExt;
use time::OffsetDateTime;

use super::ScreenContext;
use super::list::Listing;
use super::time_utils::{age_tone, fmt_bytes, fmt_clock, fmt_since_opt};
use crate::browser::{
    BrowsableResource, FilterMode, LoadRequest, Loader, NavAction, ResourceBrowser,
};
use crate::catalog;
use crate::model::{LogEvent, LogGroup, LogStream, ScreenId, ScreenParams, param};
use crate::view::{Row, Tone};

impl BrowsableResource for LogGroup {
    const NOUN: &'static str = "log groups";
    const FILTER: FilterMode = FilterMode::Remote;

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn row(&self, _now: OffsetDateTime) -> Row {
        let retention = match self.retention_days {
            Some(days) => format!("{days}d retention"),
            None => "never expire".to_string(),
        };
        Row::text(self.name.clone()).cell(
            format!("{} · {}", fmt_bytes(self.stored_bytes), retention),
            Tone::Dim,
        )
    }
}

impl Listing for LogGroup {
    const PLACEHOLDER: &'static str = "type to filter by prefix...";

    fn crumbs(_params: &ScreenParams) -> Vec<String> {
        vec!["CloudWatch".to_string(), "Log Groups".to_string()]
    }

    fn loader(ctx: &ScreenContext) -> Loader<Self> {
        let provider = ctx.provider.clone();
        let cap = ctx.settings.log_group_cap;
        Box::new(move |req: &LoadRequest| {
            Some(
                catalog::log_groups(provider.clone(), req.profile.clone(), req.filter.clone(), cap)
                    .boxed(),
            )
        })
    }

    fn count(browser: &ResourceBrowser<Self>) -> String {
        let more = if browser.has_more() { "+" } else { "" };
        format!("{}{more}", browser.total())
    }

    fn open(&self, _params: &ScreenParams) -> Option<NavAction> {
        Some(NavAction::Navigate(
            ScreenId::LogStreams,
            ScreenParams::new().with(param::LOG_GROUP, self.name.clone()),
        ))
    }
}

impl BrowsableResource for LogStream {
    const NOUN: &'static str = "log streams";
    const FILTER: FilterMode = FilterMode::Off;

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn row(&self, now: OffsetDateTime) -> Row {
        Row::text(self.name.clone()).cell(
            fmt_since_opt(self.last_event, now, "no events"),
            age_tone(self.last_event, now),
        )
    }
}

impl Listing for LogStream {
    fn crumbs(params: &ScreenParams) -> Vec<String> {
        vec![
            "CloudWatch".to_string(),
            params.get(param::LOG_GROUP).unwrap_or_default().to_string(),
        ]
    }

    fn loader(ctx: &ScreenContext) -> Loader<Self> {
        let provider = ctx.provider.clone();
        let limit = ctx.settings.log_stream_limit;
        Box::new(move |req: &LoadRequest| {
            let group = req.params.require(param::LOG_GROUP)?.to_string();
            Some(catalog::log_streams(provider.clone(), req.profile.clone(), group, limit).boxed())
        })
    }

    fn count(browser: &ResourceBrowser<Self>) -> String {
        format!("{} streams", browser.total())
    }

    fn open(&self, params: &ScreenParams) -> Option<NavAction> {
        let group = params.require(param::LOG_GROUP)?;
        Some(NavAction::Navigate(
            ScreenId::LogEvents,
            ScreenParams::new()
                .with(param::LOG_GROUP, group)
                .with(param::LOG_STREAM, self.name.clone()),
        ))
    }
}

/// Tone of a log line by the level word it carries.
pub(crate) fn level_tone(message: &str) -> Tone {
    let mut tone = Tone::Normal;
    for word in message.split(|c: char| !c.is_ascii_alphanumeric()) {
        match word {
            "ERROR" => return Tone::Bad,
            "WARN" => tone = Tone::Warn,
            _ => {}
        }
    }
    tone
}

impl BrowsableResource for LogEvent {
    const NOUN: &'static str = "log events";
    const FILTER: FilterMode = FilterMode::Off;

    fn matches(&self, needle: &str) -> bool {
        self.message.to_lowercase().contains(needle)
    }

    fn row(&self, _now: OffsetDateTime) -> Row {
        let message = self.message.trim_end();
        Row::new()
            .cell(fmt_clock(self.timestamp), Tone::Dim)
            .cell(message, level_tone(message))
    }
}

impl Listing for LogEvent {
    fn crumbs(params: &ScreenParams) -> Vec<String> {
        vec![
            "CloudWatch".to_string(),
            params.get(param::LOG_GROUP).unwrap_or_default().to_string(),
            params.get(param::LOG_STREAM).unwrap_or_default().to_string(),
        ]
    }

    fn loader(ctx: &ScreenContext) -> Loader<Self> {
        let provider = ctx.provider.clone();
        let limit = ctx.settings.log_event_limit;
        Box::new(move |req: &LoadRequest| {
            let group = req.params.require(param::LOG_GROUP)?.to_string();
            let stream = req.params.require(param::LOG_STREAM)?.to_string();
            Some(
                catalog::log_events(provider.clone(), req.profile.clone(), group, stream, limit)
                    .boxed(),
            )
        })
    }

    fn count(browser: &ResourceBrowser<Self>) -> String {
        format!("{} events", browser.total())
    }
}
