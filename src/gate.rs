//! Onboarding gate: blocks normal navigation until first-run prompts are
//! resolved.
//!
//! The gate starts in `Gated` while the session is loading and settles
//! into exactly one of `Blocked` or `Normal` once the current user is
//! known. `Blocked` means the router is never consulted — the onboarding
//! view owns the whole content area until the pending prompt is cleared
//! server-side and observed on the next session load. `Normal` is
//! terminal for the session.

use crate::session::CurrentUser;

/// The pending prompt that gates full navigation.
pub const CONFIRM_USERNAME_PROMPT: &str = "confirm_username";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Session not yet resolved; the shell renders a loading placeholder.
    Gated,
    /// Username confirmation pending; only the onboarding view renders.
    Blocked,
    /// Full navigation; routed content renders below the info banner.
    Normal,
}

#[derive(Debug)]
pub struct OnboardingGate {
    state: GateState,
}

impl Default for OnboardingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Gated,
        }
    }

    /// Decide the terminal state from the loaded user. Only the first
    /// resolution counts: once out of `Gated`, the state is pinned for
    /// the session (closing the onboarding modal does not unblock —
    /// only fresh session data does).
    pub fn resolve(&mut self, user: &CurrentUser) -> GateState {
        if self.state == GateState::Gated {
            self.state = if user.prompts.iter().any(|p| p == CONFIRM_USERNAME_PROMPT) {
                GateState::Blocked
            } else {
                GateState::Normal
            };
        }
        self.state
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_blocked(&self) -> bool {
        self.state == GateState::Blocked
    }
}
