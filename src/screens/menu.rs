use time::OffsetDateTime;
use tokio::time::Instant;

use super::{Outcome, Screen, ScreenContext, header};
use crate::browser::{Intent, ListWindow, NavAction};
use crate::model::{Profile, ScreenId, ScreenParams};
use crate::view::{Body, Row, RowWindow, ScreenView, Tone};

fn move_cursor(window: &mut ListWindow, intent: Intent) -> bool {
    match intent {
        Intent::Up => window.move_up(),
        Intent::Down => window.move_down(),
        Intent::PageUp => window.page_up(),
        Intent::PageDown => window.page_down(),
        Intent::Home => window.home(),
        Intent::End => window.end(),
        _ => return false,
    }
    true
}

fn visible_rows<T>(items: &[T], window: &ListWindow, row: impl Fn(&T) -> Row) -> RowWindow {
    let range = window.visible_range();
    let offset = range.start;
    RowWindow {
        rows: items[range].iter().map(row).collect(),
        selected: window.cursor().map(|c| c - offset),
        offset,
        total: items.len(),
    }
}

/// Pick one of the configured profiles.
pub struct ProfileSelectScreen {
    profiles: Vec<Profile>,
    window: ListWindow,
}

impl ProfileSelectScreen {
    pub fn new(ctx: &ScreenContext) -> Self {
        let mut window = ListWindow::new(ctx.viewport_height);
        window.set_len(ctx.profiles.len());
        Self {
            profiles: ctx.profiles.clone(),
            window,
        }
    }
}

impl Screen for ProfileSelectScreen {
    fn handle(&mut self, intent: Intent, _now: Instant) -> Outcome {
        if move_cursor(&mut self.window, intent) {
            return Outcome::Stay;
        }
        match intent {
            Intent::Confirm => self
                .window
                .cursor()
                .and_then(|i| self.profiles.get(i))
                .map(|p| Outcome::Nav(NavAction::SelectProfile(p.clone())))
                .unwrap_or(Outcome::Stay),
            Intent::Char('q') | Intent::Quit => Outcome::Quit,
            _ => Outcome::Stay,
        }
    }

    fn set_viewport_height(&mut self, height: usize) {
        self.window.set_height(height);
    }

    fn view(&self, _now: OffsetDateTime) -> ScreenView {
        let body = if self.profiles.is_empty() {
            Body::Text(vec![
                Row::new().cell("No AWS profiles found.", Tone::Warn),
                Row::new(),
                Row::new().cell(
                    "Add profiles to ~/.aws/credentials or ~/.aws/config to get started.",
                    Tone::Dim,
                ),
            ])
        } else {
            Body::Rows(visible_rows(&self.profiles, &self.window, |p| {
                let row = Row::text(p.name.clone());
                match &p.region {
                    Some(region) => row.cell(format!("({region})"), Tone::Dim),
                    None => row,
                }
            }))
        };
        ScreenView::new(
            header(None, &["Profile Select"], None),
            body,
            "↑↓ navigate · enter select · q quit",
        )
    }
}

const MENU: [(&str, ScreenId); 3] = [
    ("CloudWatch Logs", ScreenId::LogGroups),
    ("ECS", ScreenId::Clusters),
    ("Secrets Manager", ScreenId::Secrets),
];

/// Entry point into each service once a profile is chosen.
pub struct MainMenuScreen {
    profile: Profile,
    window: ListWindow,
}

impl MainMenuScreen {
    pub fn new(profile: Profile, ctx: &ScreenContext) -> Self {
        let mut window = ListWindow::new(ctx.viewport_height);
        window.set_len(MENU.len());
        Self { profile, window }
    }
}

impl Screen for MainMenuScreen {
    fn handle(&mut self, intent: Intent, _now: Instant) -> Outcome {
        if move_cursor(&mut self.window, intent) {
            return Outcome::Stay;
        }
        match intent {
            Intent::Confirm => match self.window.cursor().and_then(|i| MENU.get(i)) {
                Some(&(_, screen)) => Outcome::Nav(NavAction::Navigate(screen, ScreenParams::new())),
                None => Outcome::Stay,
            },
            Intent::Char('p') => Outcome::Nav(NavAction::ChangeProfile),
            Intent::Char('q') | Intent::Quit => Outcome::Quit,
            // Root screen: Esc goes nowhere.
            _ => Outcome::Stay,
        }
    }

    fn set_viewport_height(&mut self, height: usize) {
        self.window.set_height(height);
    }

    fn view(&self, _now: OffsetDateTime) -> ScreenView {
        let body = Body::Rows(visible_rows(&MENU, &self.window, |(label, _)| {
            Row::text(*label)
        }));
        ScreenView::new(
            header(Some(&self.profile), &["Main Menu"], None),
            body,
            "↑↓ navigate · enter select · p change profile · q quit",
        )
    }
}
