//! Pause flag, shutdown signal and the controller that flips them

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::keybinds::HotkeyCommand;

/// Shared pause state. The hotkey side writes it, the control loop only
/// reads it. The lock is held just for the read or the flip.
#[derive(Debug, Clone, Default)]
pub struct PauseFlag {
    paused: Arc<Mutex<bool>>,
}

impl PauseFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock()
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        let mut paused = self.paused.lock();
        *paused = !*paused;
        *paused
    }
}

/// One-shot stop request observed by every blocking point of the bot.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let (stopped, cvar) = &*self.inner;
        *stopped.lock() = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Sleep for `duration` unless shutdown is requested first.
    /// Returns `false` when woken by shutdown.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (stopped, cvar) = &*self.inner;
        let mut stopped = stopped.lock();
        if !*stopped && !duration.is_zero() {
            cvar.wait_while_for(&mut stopped, |stopped| !*stopped, duration);
        }
        !*stopped
    }
}

/// Applies hotkey commands to the pause flag and shutdown signal.
#[derive(Debug, Clone)]
pub struct PauseController {
    flag: PauseFlag,
    shutdown: ShutdownSignal,
}

impl PauseController {
    pub fn new(flag: PauseFlag, shutdown: ShutdownSignal) -> Self {
        Self { flag, shutdown }
    }

    pub fn handle(&self, command: HotkeyCommand) {
        match command {
            HotkeyCommand::TogglePause => {
                if self.flag.toggle() {
                    tracing::info!("[HOTKEY] Paused");
                    println!("Bot paused. Press the pause key to resume.");
                } else {
                    tracing::info!("[HOTKEY] Resumed");
                    println!("Bot resumed.");
                }
            }
            HotkeyCommand::Stop => {
                tracing::info!("[HOTKEY] Stop requested");
                println!("Stopping...");
                self.shutdown.trigger();
            }
        }
    }

    /// Pull commands from `next` until shutdown. `next` waits at most the
    /// given timeout so shutdown is noticed even with no key presses.
    pub fn run<F>(&self, mut next: F)
    where
        F: FnMut(Duration) -> Option<HotkeyCommand>,
    {
        const POLL: Duration = Duration::from_millis(200);
        while !self.shutdown.is_triggered() {
            if let Some(command) = next(POLL) {
                self.handle(command);
            }
        }
        tracing::debug!("[HOTKEY] Listener finished");
    }
}
