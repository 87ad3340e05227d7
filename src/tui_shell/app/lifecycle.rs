use super::*;

impl App {
    pub(in crate::tui_shell) fn load(
        opts: crate::tui::TuiRunOptions,
        wake: Option<Arc<Notify>>,
        terminal_rows: u16,
    ) -> Self {
        let nav = match opts.initial_profile {
            Some(profile) => Navigator::with_profile(profile),
            None => Navigator::new(),
        };
        let ctx = ScreenContext {
            provider: opts.provider,
            settings: opts.settings,
            profiles: opts.profiles,
            wake,
            viewport_height: viewport_height(terminal_rows),
        };
        let mut screen = screens::build(nav.current(), nav.profile(), &ctx);
        screen.sync(Instant::now());
        tracing::info!(
            profiles = ctx.profiles.len(),
            profile = nav.profile().map(|p| p.name.as_str()),
            "shell started"
        );
        App {
            nav,
            screen,
            ctx,
            quit: false,
        }
    }
}
