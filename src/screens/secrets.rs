use futures::FutureExt;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::time::Instant;

use super::list::Listing;
use super::time_utils::fmt_since_opt;
use super::{Outcome, Screen, ScreenContext, fallback, header};
use crate::browser::{
    BrowsableResource, FilterMode, Intent, LoadRequest, Loader, NavAction, QueryKey, QueryRunner,
    QueryStatus, ResourceBrowser,
};
use crate::catalog::{self, SharedProvider};
use crate::model::{Profile, ScreenId, ScreenParams, ScreenState, Secret, param};
use crate::view::{Body, Row, ScreenView, Tone};

impl BrowsableResource for Secret {
    const NOUN: &'static str = "secrets";
    const FILTER: FilterMode = FilterMode::Local;

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn row(&self, now: OffsetDateTime) -> Row {
        let mut row = Row::text(self.name.clone())
            .cell(fmt_since_opt(self.last_changed, now, "unknown"), Tone::Dim);
        if let Some(description) = &self.description {
            row = row.cell(description.clone(), Tone::Dim);
        }
        row
    }
}

impl Listing for Secret {
    fn crumbs(_params: &ScreenParams) -> Vec<String> {
        vec!["Secrets Manager".to_string()]
    }

    fn loader(ctx: &ScreenContext) -> Loader<Self> {
        let provider = ctx.provider.clone();
        Box::new(move |req: &LoadRequest| {
            Some(catalog::secrets(provider.clone(), req.profile.clone()).boxed())
        })
    }

    fn count(browser: &ResourceBrowser<Self>) -> String {
        format!("{}/{} secrets", browser.shown(), browser.total())
    }

    fn open(&self, _params: &ScreenParams) -> Option<NavAction> {
        Some(NavAction::Navigate(
            ScreenId::SecretDetail,
            ScreenParams::new()
                .with(param::SECRET_ARN, self.arn.clone())
                .with(param::SECRET_NAME, self.name.clone()),
        ))
    }
}

/// How a revealed secret value is displayed.
#[derive(Clone, Debug, PartialEq)]
pub enum SecretValueView {
    /// A JSON object of scalars, one `key value` row each.
    Pairs(Vec<(String, String, Tone)>),
    /// Any other JSON, pretty-printed.
    Pretty(String),
    /// Not JSON at all.
    Raw(String),
}

pub fn classify_secret_value(raw: &str) -> SecretValueView {
    let Ok(parsed) = serde_json::from_str::<Value>(raw) else {
        return SecretValueView::Raw(raw.to_string());
    };
    if let Value::Object(map) = &parsed {
        let flat = map
            .values()
            .all(|v| !matches!(v, Value::Object(_) | Value::Array(_)));
        if flat {
            let pairs = map
                .iter()
                .map(|(k, v)| {
                    let (text, tone) = match v {
                        Value::Null => ("null".to_string(), Tone::Dim),
                        Value::Number(n) => (n.to_string(), Tone::Accent),
                        Value::Bool(b) => (b.to_string(), Tone::Warn),
                        Value::String(s) => (s.clone(), Tone::Normal),
                        Value::Array(_) | Value::Object(_) => (v.to_string(), Tone::Normal),
                    };
                    (k.clone(), text, tone)
                })
                .collect();
            return SecretValueView::Pairs(pairs);
        }
    }
    match serde_json::to_string_pretty(&parsed) {
        Ok(pretty) => SecretValueView::Pretty(pretty),
        Err(_) => SecretValueView::Raw(raw.to_string()),
    }
}

impl SecretValueView {
    fn rows(&self) -> Vec<Row> {
        match self {
            SecretValueView::Pairs(pairs) => {
                let width = pairs.iter().map(|(k, _, _)| k.chars().count()).max().unwrap_or(0);
                pairs
                    .iter()
                    .map(|(k, v, tone)| {
                        Row::new()
                            .cell(format!("{k:<width$}"), Tone::Warn)
                            .cell(v.clone(), *tone)
                    })
                    .collect()
            }
            SecretValueView::Pretty(text) | SecretValueView::Raw(text) => {
                text.lines().map(Row::text).collect()
            }
        }
    }
}

/// Name and ARN of one secret, with its value fetched on demand.
pub struct SecretDetailScreen {
    profile: Profile,
    state: ScreenState,
    provider: SharedProvider,
    value: QueryRunner<QueryKey, String>,
    attempts: u64,
    revealed: bool,
}

impl SecretDetailScreen {
    pub fn new(profile: Profile, state: &ScreenState, ctx: &ScreenContext) -> Self {
        Self {
            profile,
            state: state.clone(),
            provider: ctx.provider.clone(),
            value: QueryRunner::new(ctx.wake.clone()),
            attempts: 0,
            revealed: false,
        }
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Number of value fetches started so far.
    pub fn fetches(&self) -> u64 {
        self.value.started()
    }

    fn arn(&self) -> Option<&str> {
        self.state.params.require(param::SECRET_ARN)
    }

    fn toggle(&mut self) {
        if self.revealed {
            self.revealed = false;
            return;
        }
        let status = self.value.status();
        let cached = matches!(status, QueryStatus::Ready(_));
        let loading = status.is_loading();
        if cached {
            self.revealed = true;
        } else if !loading {
            self.fetch();
        }
    }

    fn fetch(&mut self) {
        let Some(arn) = self.arn().map(str::to_string) else {
            return;
        };
        self.attempts += 1;
        let key = QueryKey {
            profile: self.profile.clone(),
            screen: self.state.screen,
            params: self.state.params.clone(),
            filter: String::new(),
            refresh: self.attempts,
        };
        let fut = catalog::secret_value(self.provider.clone(), self.profile.clone(), arn);
        self.value.run(key, move || fut);
    }

    fn value_rows(&self) -> Vec<Row> {
        match self.value.status() {
            QueryStatus::Loading => vec![Row::new().cell("Fetching secret...", Tone::Accent)],
            QueryStatus::Failed(err) => vec![Row::new().cell(format!("Error: {err}"), Tone::Bad)],
            QueryStatus::Ready(value) if self.revealed => classify_secret_value(value).rows(),
            _ => vec![
                Row::new()
                    .cell("••••••••••••••••••", Tone::Dim)
                    .cell("[hidden]", Tone::Dim),
            ],
        }
    }
}

impl Screen for SecretDetailScreen {
    fn sync(&mut self, _now: Instant) -> bool {
        if !self.value.poll() {
            return false;
        }
        // A value that arrives was asked for by the user.
        if matches!(self.value.status(), QueryStatus::Ready(_)) {
            self.revealed = true;
        }
        true
    }

    fn handle(&mut self, intent: Intent, _now: Instant) -> Outcome {
        match intent {
            Intent::Char(' ') => {
                self.toggle();
                Outcome::Stay
            }
            other => fallback(other),
        }
    }

    fn set_viewport_height(&mut self, _height: usize) {}

    fn view(&self, _now: OffsetDateTime) -> ScreenView {
        let name = self.state.params.get(param::SECRET_NAME).unwrap_or_default();
        let arn = self.state.params.get(param::SECRET_ARN).unwrap_or_default();

        let gone = self.value.status().error().filter(|err| err.is_not_found());
        let body = if self.arn().is_none() {
            Body::Empty("No secret selected".to_string())
        } else if let Some(err) = gone {
            Body::NotFound(err.to_string())
        } else {
            let mut rows = vec![
                Row::new().cell("Name ", Tone::Dim).cell(name, Tone::Accent),
                Row::new().cell("ARN  ", Tone::Dim).cell(arn, Tone::Dim),
                Row::new(),
                Row::new().cell("Value", Tone::Dim),
            ];
            rows.extend(self.value_rows());
            Body::Text(rows)
        };

        let mut view = ScreenView::new(
            header(Some(&self.profile), &["Secrets Manager", name], None),
            body,
            "space reveal/hide · m menu · esc back · q quit",
        );
        view.status = self.value.status().is_loading().then(|| "loading…".to_string());
        view
    }
}
