use anyhow::Result;

use crate::catalog::SharedProvider;
use crate::config::Settings;
use crate::model::Profile;

/// Everything the interactive shell needs, resolved before the terminal is
/// taken over.
#[derive(Clone)]
pub struct TuiRunOptions {
    pub settings: Settings,
    pub provider: SharedProvider,
    /// Profiles offered on the selection screen.
    pub profiles: Vec<Profile>,
    /// Skip profile selection and start on the main menu.
    pub initial_profile: Option<Profile>,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
