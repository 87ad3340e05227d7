use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use time::OffsetDateTime;
use tokio::sync::Notify;
use tokio::time::Instant;

use super::{Debounce, Fetched, Intent, LineInput, ListWindow, QueryKey, QueryRunner, QueryStatus};
use crate::error::FetchError;
use crate::model::{Profile, ScreenId, ScreenParams, ScreenState};
use crate::view::{Body, Cell, FilterLine, Row, RowWindow, Tone};

/// Where the filter text is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    /// Sent to the remote listing; part of the query key.
    Remote,
    /// Case-insensitive substring match over fetched items.
    Local,
    /// No filter line at all.
    Off,
}

/// A record type that can be listed by [`ResourceBrowser`].
pub trait BrowsableResource: Clone + Send + 'static {
    /// Plural noun for empty states, e.g. "log groups".
    const NOUN: &'static str;
    const FILTER: FilterMode;

    /// Local filter predicate. `needle` is already lowercase.
    fn matches(&self, needle: &str) -> bool;

    fn row(&self, now: OffsetDateTime) -> Row;
}

/// What a loader needs to build one fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub profile: Profile,
    pub params: ScreenParams,
    /// Settled filter text; always empty for local filtering.
    pub filter: String,
}

pub type LoadFuture<R> = BoxFuture<'static, Result<Fetched<R>, FetchError>>;

/// Builds the fetch for a request, or `None` when the screen parameters
/// are insufficient and nothing should be fetched.
pub type Loader<R> = Box<dyn Fn(&LoadRequest) -> Option<LoadFuture<R>> + Send>;

/// Result of offering an intent to the browser.
#[derive(Clone, Debug, PartialEq)]
pub enum Handled<R> {
    Consumed,
    /// The user opened the selected item.
    Open(R),
    /// Not a list or filter intent; the screen decides.
    Ignored(Intent),
}

/// A filterable, scrollable, remotely fetched list.
///
/// Every list screen wraps one of these; the screen only decides what a
/// row opens and how the header reads.
pub struct ResourceBrowser<R: BrowsableResource> {
    profile: Profile,
    screen: ScreenId,
    params: ScreenParams,
    loader: Loader<R>,
    query: QueryRunner<QueryKey, Fetched<R>>,
    requested: Option<QueryKey>,
    degraded: bool,
    refresh: u64,

    input: LineInput,
    filter: Debounce<String>,
    filter_focused: bool,

    data: Fetched<R>,
    /// Indices into `data.items` that pass the local filter.
    visible: Vec<usize>,
    window: ListWindow,
}

impl<R: BrowsableResource> ResourceBrowser<R> {
    pub fn new(
        profile: Profile,
        state: &ScreenState,
        loader: Loader<R>,
        quiet: Duration,
        wake: Option<Arc<Notify>>,
        height: usize,
    ) -> Self {
        Self {
            profile,
            screen: state.screen,
            params: state.params.clone(),
            loader,
            query: QueryRunner::new(wake),
            requested: None,
            degraded: false,
            refresh: 0,
            input: LineInput::default(),
            filter: Debounce::new(String::new(), quiet),
            filter_focused: false,
            data: Fetched::default(),
            visible: Vec::new(),
            window: ListWindow::new(height),
        }
    }

    /// Apply settled results and filters, then start a fetch if the query
    /// key changed. Returns whether anything visible changed.
    pub fn sync(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.query.poll() {
            self.absorb();
            changed = true;
        }
        if self.filter.poll(now).is_some() {
            changed = true;
            if R::FILTER == FilterMode::Local {
                self.refilter();
            }
        }
        changed |= self.ensure_query();
        changed
    }

    /// When the next debounce settles, so the event loop can wake for it.
    pub fn deadline(&self) -> Option<Instant> {
        self.filter.deadline()
    }

    pub fn handle(&mut self, intent: Intent, now: Instant) -> Handled<R> {
        if self.filter_focused {
            return self.handle_filter(intent, now);
        }
        match intent {
            Intent::Up => self.window.move_up(),
            Intent::Down => self.window.move_down(),
            Intent::PageUp => self.window.page_up(),
            Intent::PageDown => self.window.page_down(),
            Intent::Home => self.window.home(),
            Intent::End => self.window.end(),
            Intent::Char('/') if R::FILTER != FilterMode::Off => self.filter_focused = true,
            Intent::Char('r') => {
                if !self.refresh() {
                    return Handled::Ignored(intent);
                }
            }
            Intent::Confirm => match self.selected() {
                Some(item) => return Handled::Open(item.clone()),
                None => return Handled::Consumed,
            },
            other => return Handled::Ignored(other),
        }
        Handled::Consumed
    }

    fn handle_filter(&mut self, intent: Intent, now: Instant) -> Handled<R> {
        match intent {
            Intent::Char(c) => {
                self.input.insert_char(c);
                self.filter.update(self.input.as_str().to_string(), now);
            }
            Intent::Backspace => {
                self.input.backspace();
                self.filter.update(self.input.as_str().to_string(), now);
            }
            Intent::Left => self.input.move_left(),
            Intent::Right => self.input.move_right(),
            Intent::Confirm | Intent::Down => {
                self.filter_focused = false;
                if self.filter.flush().is_some() && R::FILTER == FilterMode::Local {
                    self.refilter();
                }
            }
            Intent::Cancel => {
                self.filter_focused = false;
                self.input.clear();
                self.filter.update(String::new(), now);
            }
            Intent::Quit => return Handled::Ignored(Intent::Quit),
            _ => {}
        }
        Handled::Consumed
    }

    /// Re-run the current query. Ignored while a fetch is in flight.
    pub fn refresh(&mut self) -> bool {
        if self.query.status().is_loading() {
            return false;
        }
        self.refresh += 1;
        tracing::debug!(screen = self.screen.label(), refresh = self.refresh, "refresh");
        self.ensure_query();
        true
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.window.set_height(height);
    }

    pub fn selected(&self) -> Option<&R> {
        let pos = self.window.cursor()?;
        self.visible.get(pos).and_then(|&i| self.data.items.get(i))
    }

    pub fn window(&self) -> &ListWindow {
        &self.window
    }

    pub fn status(&self) -> &QueryStatus<Fetched<R>> {
        self.query.status()
    }

    pub fn is_loading(&self) -> bool {
        self.query.status().is_loading()
    }

    /// Number of fetches started so far.
    pub fn fetches(&self) -> u64 {
        self.query.started()
    }

    pub fn filter_focused(&self) -> bool {
        self.filter_focused
    }

    pub fn filter_text(&self) -> &str {
        self.input.as_str()
    }

    pub fn settled_filter(&self) -> &str {
        self.filter.settled()
    }

    /// Items that pass the filter, in fetch order.
    pub fn visible_items(&self) -> impl Iterator<Item = &R> {
        self.visible.iter().filter_map(|&i| self.data.items.get(i))
    }

    pub fn shown(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.data.items.len()
    }

    pub fn has_more(&self) -> bool {
        self.data.has_more
    }

    pub fn filter_line(&self, placeholder: &'static str) -> FilterLine {
        FilterLine {
            text: self.input.as_str().to_string(),
            cursor: self.input.cursor(),
            focused: self.filter_focused,
            pending: self.filter.pending(),
            placeholder,
        }
    }

    pub fn body(&self, now: OffsetDateTime) -> Body {
        if let Some(err) = self.query.status().error() {
            return if err.is_not_found() {
                Body::NotFound(err.to_string())
            } else {
                Body::Error(err.to_string())
            };
        }
        if self.is_loading() && self.data.is_empty() {
            return Body::Loading(format!("Loading {}...", R::NOUN));
        }
        if self.visible.is_empty() {
            let msg = if self.data.is_empty() || self.degraded {
                format!("No {} found", R::NOUN)
            } else {
                format!("No {} match filter", R::NOUN)
            };
            return Body::Empty(msg);
        }

        let range = self.window.visible_range();
        let offset = range.start;
        let rows = self.visible[range]
            .iter()
            .filter_map(|&i| self.data.items.get(i))
            .map(|item| item.row(now))
            .collect();
        Body::Rows(RowWindow {
            rows,
            selected: (!self.filter_focused).then(|| self.window.selected() - offset),
            offset,
            total: self.visible.len(),
        })
    }

    /// "Showing the first N" notice when a capped listing was cut short.
    pub fn capped_notice(&self) -> Option<Cell> {
        self.data.has_more.then(|| {
            Cell::new(
                format!(
                    "showing {} of many, narrow your filter to see more",
                    self.data.len()
                ),
                Tone::Dim,
            )
        })
    }

    fn key(&self) -> QueryKey {
        let filter = match R::FILTER {
            FilterMode::Remote => self.filter.settled().clone(),
            FilterMode::Local | FilterMode::Off => String::new(),
        };
        QueryKey {
            profile: self.profile.clone(),
            screen: self.screen,
            params: self.params.clone(),
            filter,
            refresh: self.refresh,
        }
    }

    fn ensure_query(&mut self) -> bool {
        let key = self.key();
        if self.requested.as_ref() == Some(&key) {
            return false;
        }
        self.requested = Some(key.clone());

        let request = LoadRequest {
            profile: key.profile.clone(),
            params: key.params.clone(),
            filter: key.filter.clone(),
        };
        match (self.loader)(&request) {
            Some(fut) => {
                self.degraded = false;
                self.query.run(key, move || fut)
            }
            None => {
                tracing::debug!(screen = self.screen.label(), "missing parameters, nothing to fetch");
                self.degraded = true;
                self.query.clear();
                self.data = Fetched::default();
                self.visible.clear();
                self.window.reset(0);
                true
            }
        }
    }

    fn absorb(&mut self) {
        if let QueryStatus::Ready(fetched) = self.query.status() {
            self.data = fetched.clone();
            self.visible = self.matching_indices();
            self.window.reset(self.visible.len());
        }
    }

    fn refilter(&mut self) {
        self.visible = self.matching_indices();
        self.window.set_len(self.visible.len());
    }

    fn matching_indices(&self) -> Vec<usize> {
        let needle = match R::FILTER {
            FilterMode::Local => self.filter.settled().to_lowercase(),
            FilterMode::Remote | FilterMode::Off => String::new(),
        };
        self.data
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.matches(&needle))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/browser/engine_tests.rs"]
mod tests;
