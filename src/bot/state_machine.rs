//! Two-state fishing controller

use std::time::{Duration, Instant};

/// Default time without a round before the bot re-casts.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Bot state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// Line is out, waiting for the minigame bar.
    Idle,
    /// Minigame bar is visible, watching for bites.
    Fishing,
}

/// Input action requested by a transition. Both map to the same button
/// press but are logged and counted separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Cast,
    Click,
}

/// Signals a transition is decided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    pub ui_active: bool,
    pub bite_detected: bool,
    pub since_last_action: Duration,
}

/// Pure transition function: every input maps to one next state and at
/// most one action.
pub fn transition(state: BotState, input: TickInput, idle_timeout: Duration) -> (BotState, Option<Action>) {
    match (state, input.ui_active) {
        (BotState::Idle, true) => (BotState::Fishing, None),
        (BotState::Idle, false) if input.since_last_action > idle_timeout => {
            (BotState::Idle, Some(Action::Cast))
        }
        (BotState::Idle, false) => (BotState::Idle, None),
        (BotState::Fishing, true) if input.bite_detected => (BotState::Fishing, Some(Action::Click)),
        (BotState::Fishing, true) => (BotState::Fishing, None),
        (BotState::Fishing, false) => (BotState::Idle, Some(Action::Cast)),
    }
}

/// Owns the current state and the time of the last cast.
#[derive(Debug, Clone)]
pub struct FishingStateMachine {
    state: BotState,
    last_action: Instant,
    idle_timeout: Duration,
}

impl FishingStateMachine {
    pub fn new(idle_timeout: Duration, now: Instant) -> Self {
        Self {
            state: BotState::Idle,
            last_action: now,
            idle_timeout,
        }
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn last_action(&self) -> Instant {
        self.last_action
    }

    /// Restart the idle timer, e.g. after a cast made outside `step`.
    pub fn reset_timer(&mut self, now: Instant) {
        self.last_action = now;
    }

    /// Advance one tick. A cast resets the idle timer.
    pub fn step(&mut self, ui_active: bool, bite_detected: bool, now: Instant) -> Option<Action> {
        let input = TickInput {
            ui_active,
            bite_detected: ui_active && bite_detected,
            since_last_action: now.saturating_duration_since(self.last_action),
        };
        let (next, action) = transition(self.state, input, self.idle_timeout);

        if next != self.state {
            tracing::info!("[STATE] {:?} -> {:?}", self.state, next);
        }
        if action == Some(Action::Cast) {
            self.last_action = now;
        }
        self.state = next;
        action
    }
}
