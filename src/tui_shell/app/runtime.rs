use std::io::IsTerminal;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use super::*;

pub(in crate::tui_shell) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let res = rt.block_on(async {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.clear().ok();

        let (_, rows) = crossterm::terminal::size().context("read terminal size")?;
        let wake = Arc::new(Notify::new());
        let mut app = App::load(opts, Some(wake.clone()), rows);
        event_loop::run_loop(&mut terminal, &mut app, &wake).await
    });

    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
    execute!(io::stdout(), crossterm::cursor::Show).ok();

    res
}
