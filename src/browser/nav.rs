use crate::model::{Profile, ScreenId, ScreenParams, ScreenState};

/// A request to move between screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Open `screen` with exactly `params`, remembering where we came from.
    Navigate(ScreenId, ScreenParams),
    /// Switch the active profile in place.
    SetProfile(Profile),
    /// Return to the previous screen, if any.
    Back,
    /// Main menu with no history.
    Home,
    /// Forget the profile and go back to profile selection.
    ChangeProfile,
    /// Use `profile` and land on the main menu.
    SelectProfile(Profile),
}

/// The active profile, the active screen and how we got there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigator {
    profile: Option<Profile>,
    current: ScreenState,
    history: Vec<ScreenState>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            profile: None,
            current: ScreenState::bare(ScreenId::ProfileSelect),
            history: Vec::new(),
        }
    }

    /// Start on the main menu with `profile` already chosen.
    pub fn with_profile(profile: Profile) -> Self {
        let mut nav = Self::new();
        nav.apply(NavAction::SelectProfile(profile));
        nav
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn current(&self) -> &ScreenState {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Apply `action`. Returns whether the active screen or profile changed,
    /// meaning the screen has to be rebuilt.
    pub fn apply(&mut self, action: NavAction) -> bool {
        let before = (self.current.clone(), self.profile.clone());
        match action {
            NavAction::Navigate(screen, params) => {
                let next = ScreenState::new(screen, params);
                let prev = std::mem::replace(&mut self.current, next);
                self.history.push(prev);
            }
            NavAction::SetProfile(profile) => {
                self.profile = Some(profile);
            }
            NavAction::Back => {
                if let Some(prev) = self.history.pop() {
                    self.current = prev;
                }
            }
            NavAction::Home => {
                self.history.clear();
                self.current = ScreenState::bare(ScreenId::MainMenu);
            }
            NavAction::ChangeProfile => {
                self.profile = None;
                self.history.clear();
                self.current = ScreenState::bare(ScreenId::ProfileSelect);
            }
            NavAction::SelectProfile(profile) => {
                self.profile = Some(profile);
                self.history.clear();
                self.current = ScreenState::bare(ScreenId::MainMenu);
            }
        }

        let changed = before != (self.current.clone(), self.profile.clone());
        if changed {
            tracing::debug!(
                screen = self.current.screen.label(),
                depth = self.history.len(),
                profile = self.profile.as_ref().map(|p| p.name.as_str()),
                "navigated"
            );
        }
        changed
    }
}

#[cfg(test)]
#[path = "../tests/browser/nav_tests.rs"]
mod tests;
