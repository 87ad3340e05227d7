use super::*;
use crate::tui_shell::input::intent_for;

pub(super) async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    wake: &Notify,
) -> Result<()> {
    let tick = app.ctx.settings.tick();
    let mut dirty = true;
    loop {
        if dirty {
            let view = app.screen.view(time::OffsetDateTime::now_utc());
            terminal
                .draw(|f| super::render::draw(f, &view))
                .context("draw")?;
            dirty = false;
        }
        if app.quit {
            return Ok(());
        }

        // Settled fetches and due debounces wake us early; otherwise the
        // tick bounds input latency.
        let deadline = app.screen.deadline();
        tokio::select! {
            _ = wake.notified() => {}
            _ = tokio::time::sleep(tick) => {}
            _ = until(deadline) => {}
        }

        while event::poll(Duration::ZERO).context("poll")? {
            dirty |= handle_event(app, event::read().context("read event")?);
            if app.quit {
                break;
            }
        }
        dirty |= app.sync(Instant::now());
    }
}

/// Sleeps until `deadline`, or forever when there is none.
pub(in crate::tui_shell) async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn handle_event(app: &mut App, ev: Event) -> bool {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => {
            if let Some(intent) = intent_for(k) {
                app.handle(intent, Instant::now());
            }
            true
        }
        Event::Resize(_, rows) => {
            app.resize(rows);
            true
        }
        _ => false,
    }
}
