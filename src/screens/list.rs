use time::OffsetDateTime;
use tokio::time::Instant;

use super::{Outcome, Screen, ScreenContext, fallback, header};
use crate::browser::{
    BrowsableResource, FilterMode, Handled, Intent, Loader, NavAction, ResourceBrowser,
};
use crate::model::{Profile, ScreenParams, ScreenState};
use crate::view::{Body, ScreenView};

/// A resource that has its own list screen.
pub trait Listing: BrowsableResource {
    const PLACEHOLDER: &'static str = "type to filter...";

    /// Breadcrumbs after the profile, derived from the screen parameters.
    fn crumbs(params: &ScreenParams) -> Vec<String>;

    fn loader(ctx: &ScreenContext) -> Loader<Self>;

    /// Header count once loaded.
    fn count(browser: &ResourceBrowser<Self>) -> String {
        format!("{} {}", browser.total(), Self::NOUN)
    }

    /// Where Enter on this item leads, if anywhere.
    fn open(&self, _params: &ScreenParams) -> Option<NavAction> {
        None
    }
}

/// The list screen shared by every [`Listing`].
pub struct ListScreen<R: Listing> {
    profile: Profile,
    params: ScreenParams,
    browser: ResourceBrowser<R>,
}

impl<R: Listing> ListScreen<R> {
    pub fn new(profile: Profile, state: &ScreenState, ctx: &ScreenContext) -> Self {
        let browser = ResourceBrowser::new(
            profile.clone(),
            state,
            R::loader(ctx),
            ctx.settings.debounce(),
            ctx.wake.clone(),
            ctx.viewport_height,
        );
        Self {
            profile,
            params: state.params.clone(),
            browser,
        }
    }

    pub fn browser(&self) -> &ResourceBrowser<R> {
        &self.browser
    }

    fn footer(&self) -> String {
        if self.browser.filter_focused() {
            return "type to filter · enter/↓ list · esc clear".to_string();
        }
        let mut keys = vec!["↑↓ navigate"];
        if let Some(item) = self.browser.selected()
            && item.open(&self.params).is_some()
        {
            keys.push("enter select");
        }
        if R::FILTER != FilterMode::Off {
            keys.push("/ filter");
        }
        keys.extend(["r refresh", "m menu", "esc back", "q quit"]);
        keys.join(" · ")
    }
}

impl<R: Listing> Screen for ListScreen<R> {
    fn sync(&mut self, now: Instant) -> bool {
        self.browser.sync(now)
    }

    fn deadline(&self) -> Option<Instant> {
        self.browser.deadline()
    }

    fn handle(&mut self, intent: Intent, now: Instant) -> Outcome {
        match self.browser.handle(intent, now) {
            Handled::Consumed => Outcome::Stay,
            Handled::Open(item) => item
                .open(&self.params)
                .map(Outcome::Nav)
                .unwrap_or(Outcome::Stay),
            Handled::Ignored(intent) => fallback(intent),
        }
    }

    fn set_viewport_height(&mut self, height: usize) {
        self.browser.set_viewport_height(height);
    }

    fn view(&self, now: OffsetDateTime) -> ScreenView {
        let crumbs = R::crumbs(&self.params);
        let crumbs: Vec<&str> = crumbs.iter().map(String::as_str).collect();
        let count = (!self.browser.is_loading()).then(|| R::count(&self.browser));
        let body = self.browser.body(now);

        let status = if self.browser.is_loading() {
            Some("loading…".to_string())
        } else if let Body::Rows(rows) = &body {
            rows.position()
        } else {
            None
        };

        let mut view = ScreenView::new(
            header(Some(&self.profile), &crumbs, count),
            body,
            self.footer(),
        );
        if R::FILTER != FilterMode::Off {
            view.filter = Some(self.browser.filter_line(R::PLACEHOLDER));
        }
        view.notice = self.browser.capped_notice();
        view.status = status;
        view
    }
}
