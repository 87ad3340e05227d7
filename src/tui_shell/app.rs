use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::browser::{Intent, Navigator};
use crate::screens::{self, Outcome, Screen, ScreenContext};

pub(in crate::tui_shell) mod event_loop;
mod lifecycle;
pub(in crate::tui_shell) mod render;
mod runtime;
mod state;

pub(super) use runtime::run;
pub(in crate::tui_shell) use state::App;

/// Rows taken by the header, filter line, body borders, notice and footer.
const CHROME_ROWS: u16 = 6;

pub(in crate::tui_shell) fn viewport_height(terminal_rows: u16) -> usize {
    usize::from(terminal_rows.saturating_sub(CHROME_ROWS)).max(1)
}
