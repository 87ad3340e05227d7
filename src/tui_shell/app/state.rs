use super::*;

pub(in crate::tui_shell) struct App {
    pub(in crate::tui_shell) nav: Navigator,
    pub(in crate::tui_shell) screen: Box<dyn Screen>,
    pub(in crate::tui_shell) ctx: ScreenContext,
    pub(in crate::tui_shell) quit: bool,
}

impl App {
    /// Feed one intent to the current screen and act on its outcome.
    pub(in crate::tui_shell) fn handle(&mut self, intent: Intent, now: Instant) {
        match self.screen.handle(intent, now) {
            Outcome::Stay => {}
            Outcome::Quit => self.quit = true,
            Outcome::Nav(action) => {
                if self.nav.apply(action) {
                    self.rebuild();
                }
            }
        }
    }

    /// Fold settled fetches and due debounces into the current screen.
    pub(in crate::tui_shell) fn sync(&mut self, now: Instant) -> bool {
        self.screen.sync(now)
    }

    pub(in crate::tui_shell) fn resize(&mut self, terminal_rows: u16) {
        let height = viewport_height(terminal_rows);
        self.ctx.viewport_height = height;
        self.screen.set_viewport_height(height);
    }

    /// Replace the current screen after navigation. The old screen and its
    /// in-flight queries are dropped with it.
    fn rebuild(&mut self) {
        self.screen = screens::build(self.nav.current(), self.nav.profile(), &self.ctx);
        self.screen.sync(Instant::now());
    }
}
