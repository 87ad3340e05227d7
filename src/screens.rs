//! One screen per [`ScreenId`], built fresh on every navigation.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::browser::{Intent, NavAction};
use crate::catalog::SharedProvider;
use crate::config::Settings;
use crate::model::{Profile, ScreenId, ScreenState};
use crate::view::ScreenView;

mod ecs;
mod list;
mod logs;
mod menu;
mod secrets;
mod service_detail;
mod time_utils;

pub use list::{ListScreen, Listing};
pub use menu::{MainMenuScreen, ProfileSelectScreen};
pub use secrets::{SecretDetailScreen, SecretValueView, classify_secret_value};
pub use service_detail::{DeployState, ServiceDetailScreen};

/// What the app should do after a screen handled an intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Nav(NavAction),
    Quit,
}

pub trait Screen {
    /// Apply finished fetches and due debounces. Returns whether a redraw is
    /// needed.
    fn sync(&mut self, _now: Instant) -> bool {
        false
    }

    /// The next moment `sync` has work to do without any input.
    fn deadline(&self) -> Option<Instant> {
        None
    }

    fn handle(&mut self, intent: Intent, now: Instant) -> Outcome;

    fn set_viewport_height(&mut self, height: usize);

    fn view(&self, now: OffsetDateTime) -> ScreenView;
}

/// Everything screens share for the lifetime of the app.
#[derive(Clone)]
pub struct ScreenContext {
    pub provider: SharedProvider,
    pub settings: Settings,
    pub profiles: Vec<Profile>,
    /// Notified whenever a background fetch settles.
    pub wake: Option<Arc<Notify>>,
    pub viewport_height: usize,
}

/// Build the screen for `state`.
///
/// Screens other than profile selection need a profile; without one the
/// user is sent back to pick one.
pub fn build(state: &ScreenState, profile: Option<&Profile>, ctx: &ScreenContext) -> Box<dyn Screen> {
    let Some(profile) = profile.cloned() else {
        return Box::new(ProfileSelectScreen::new(ctx));
    };
    match state.screen {
        ScreenId::ProfileSelect => Box::new(ProfileSelectScreen::new(ctx)),
        ScreenId::MainMenu => Box::new(MainMenuScreen::new(profile, ctx)),
        ScreenId::LogGroups => Box::new(ListScreen::<crate::model::LogGroup>::new(profile, state, ctx)),
        ScreenId::LogStreams => Box::new(ListScreen::<crate::model::LogStream>::new(profile, state, ctx)),
        ScreenId::LogEvents => Box::new(ListScreen::<crate::model::LogEvent>::new(profile, state, ctx)),
        ScreenId::Clusters => Box::new(ListScreen::<crate::model::Cluster>::new(profile, state, ctx)),
        ScreenId::Services => Box::new(ListScreen::<crate::model::Service>::new(profile, state, ctx)),
        ScreenId::ServiceDetail => Box::new(ServiceDetailScreen::new(profile, state, ctx)),
        ScreenId::Secrets => Box::new(ListScreen::<crate::model::Secret>::new(profile, state, ctx)),
        ScreenId::SecretDetail => Box::new(SecretDetailScreen::new(profile, state, ctx)),
    }
}

/// `awstui [dev · eu-west-1] › ECS › main (3 services)`
pub(crate) fn header(profile: Option<&Profile>, crumbs: &[&str], count: Option<String>) -> String {
    let mut out = String::from("awstui");
    if let Some(profile) = profile {
        out.push_str(&format!(" [{}]", profile.label()));
    }
    for crumb in crumbs {
        out.push_str(" › ");
        out.push_str(crumb);
    }
    if let Some(count) = count {
        out.push_str(&format!(" ({count})"));
    }
    out
}

/// Keys every non-root screen understands once the screen itself passed.
pub(crate) fn fallback(intent: Intent) -> Outcome {
    match intent {
        Intent::Cancel => Outcome::Nav(NavAction::Back),
        Intent::Char('m') => Outcome::Nav(NavAction::Home),
        Intent::Char('q') | Intent::Quit => Outcome::Quit,
        _ => Outcome::Stay,
    }
}

#[cfg(test)]
#[path = "tests/screens_tests.rs"]
mod tests;
