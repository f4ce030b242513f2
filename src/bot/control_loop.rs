//! Fixed-cadence capture, classify, act loop

use std::time::{Duration, Instant};

use crate::input::{InputSink, MouseButton};
use crate::screen_reader::{DelayRange, FrameSource, Region, Settings, SignalClassifier};
use crate::utils::bot_state::SessionStats;
use crate::utils::pause::{PauseFlag, ShutdownSignal};

use super::state_machine::{Action, BotState, FishingStateMachine};

/// Sleep lengths used by the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub tick_interval: Duration,
    pub cast_settle: Duration,
    pub click_settle: Duration,
    pub capture_backoff: Duration,
    pub paused_poll: Duration,
    pub idle_timeout: Duration,
    /// Extra wait before the re-cast that ends a round.
    pub recast_delay: DelayRange,
}

impl LoopTiming {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            cast_settle: Duration::from_millis(settings.cast_settle_ms),
            click_settle: Duration::from_millis(settings.click_settle_ms),
            capture_backoff: Duration::from_millis(settings.capture_backoff_ms),
            paused_poll: Duration::from_millis(settings.paused_poll_ms),
            idle_timeout: settings.idle_timeout(),
            recast_delay: settings.recast_delay_ms,
        }
    }
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Stopped,
    Paused,
    CaptureFailed,
    Observed(BotState),
    Acted(Action),
}

/// Drives capture, classification, the state machine and input, one tick at
/// a time on the calling thread.
pub struct ControlLoop<S, I> {
    region: Region,
    source: S,
    input: I,
    button: MouseButton,
    cast_on_start: bool,
    classifier: SignalClassifier,
    machine: FishingStateMachine,
    timing: LoopTiming,
    pause: PauseFlag,
    shutdown: ShutdownSignal,
    stats: SessionStats,
}

impl<S: FrameSource, I: InputSink> ControlLoop<S, I> {
    pub fn new(region: Region, source: S, input: I, timing: LoopTiming) -> Self {
        Self {
            region,
            source,
            input,
            button: MouseButton::Right,
            cast_on_start: false,
            classifier: SignalClassifier::default(),
            machine: FishingStateMachine::new(timing.idle_timeout, Instant::now()),
            timing,
            pause: PauseFlag::new(),
            shutdown: ShutdownSignal::new(),
            stats: SessionStats::new(),
        }
    }

    /// Build a loop configured from settings.
    pub fn from_settings(settings: &Settings, region: Region, source: S, input: I) -> Self {
        Self::new(region, source, input, LoopTiming::from_settings(settings))
            .with_classifier(SignalClassifier::from_settings(settings))
            .with_button(settings.mouse_button)
            .with_cast_on_start(settings.cast_on_start)
    }

    pub fn with_classifier(mut self, classifier: SignalClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_cast_on_start(mut self, cast_on_start: bool) -> Self {
        self.cast_on_start = cast_on_start;
        self
    }

    pub fn with_pause(mut self, pause: PauseFlag) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_stats(mut self, stats: SessionStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn state(&self) -> BotState {
        self.machine.state()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Run until shutdown is signalled.
    pub fn run(&mut self) {
        tracing::info!(
            "[LOOP] Starting on region {:?}, tick every {:?}",
            self.region,
            self.timing.tick_interval
        );

        if self.cast_on_start {
            println!("Casting to start...");
            self.cast();
            self.shutdown.sleep(self.timing.cast_settle);
        }
        self.machine.reset_timer(Instant::now());
        println!("Waiting for the fishing round...");

        while self.tick() != TickOutcome::Stopped {}

        tracing::info!("[LOOP] Stopped. {}", self.stats.to_json());
    }

    /// One capture, classify, act cycle including its sleeps.
    pub fn tick(&mut self) -> TickOutcome {
        if self.shutdown.is_triggered() {
            return TickOutcome::Stopped;
        }
        if self.pause.is_paused() {
            self.shutdown
                .sleep(self.timing.paused_poll.min(self.timing.tick_interval));
            return TickOutcome::Paused;
        }

        let started = Instant::now();
        self.stats.record_tick();

        let frame = match self.source.capture(&self.region) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("[CAPTURE] {}. Retrying in {:?}", e, self.timing.capture_backoff);
                self.stats.record_capture_failure();
                self.shutdown.sleep(self.timing.capture_backoff);
                return TickOutcome::CaptureFailed;
            }
        };

        let signals = self.classifier.classify(&frame.image);
        tracing::trace!(
            "[LOOP] ui_active={} bite={} marker={:?} white={:?}",
            signals.ui_active,
            signals.bite_detected,
            signals
                .marker
                .map(|b| b.offset(frame.origin.0, frame.origin.1)),
            signals.white_ratio
        );

        let before = self.machine.state();
        let idle_for = Instant::now().saturating_duration_since(self.machine.last_action());
        let action = self
            .machine
            .step(signals.ui_active, signals.bite_detected, Instant::now());

        if before == BotState::Idle && self.machine.state() == BotState::Fishing {
            self.stats.record_round();
            println!("Fishing round detected, watching for bites...");
        }

        let outcome = match action {
            Some(Action::Click) => {
                println!("Bite! Clicking...");
                if self.press("click") {
                    self.stats.record_click();
                }
                self.shutdown.sleep(self.timing.click_settle);
                TickOutcome::Acted(Action::Click)
            }
            Some(Action::Cast) => {
                if before == BotState::Fishing {
                    println!("Round over. Casting again...");
                    if !self.timing.recast_delay.is_zero() {
                        let delay = self.timing.recast_delay.sample(&mut rand::rng());
                        tracing::debug!("[LOOP] Re-cast delay {:?}", delay);
                        if !self.shutdown.sleep(delay) {
                            return TickOutcome::Stopped;
                        }
                    }
                } else {
                    println!(
                        "Nothing for {}s, casting again to be safe...",
                        idle_for.as_secs()
                    );
                }
                self.cast();
                self.shutdown.sleep(self.timing.cast_settle);
                TickOutcome::Acted(Action::Cast)
            }
            None => TickOutcome::Observed(self.machine.state()),
        };

        self.shutdown
            .sleep(self.timing.tick_interval.saturating_sub(started.elapsed()));
        outcome
    }

    fn cast(&mut self) {
        if self.press("cast") {
            self.stats.record_cast();
        }
        self.machine.reset_timer(Instant::now());
    }

    /// Press the configured button once. Failures are logged and counted.
    fn press(&mut self, what: &str) -> bool {
        match self.input.trigger(self.button) {
            Ok(()) => {
                tracing::info!("[INPUT] {} ({:?})", what, self.button);
                true
            }
            Err(e) => {
                tracing::warn!("[INPUT] {} failed: {}", what, e);
                self.stats.record_injection_failure();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_from_settings() {
        let mut settings = Settings::default();
        settings.tick_interval_ms = 25;
        settings.recast_delay_ms = DelayRange { min_ms: 1000, max_ms: 2000 };
        let timing = LoopTiming::from_settings(&settings);
        assert_eq!(timing.tick_interval, Duration::from_millis(25));
        assert_eq!(timing.cast_settle, Duration::from_secs(2));
        assert_eq!(timing.click_settle, Duration::from_millis(500));
        assert_eq!(timing.capture_backoff, Duration::from_secs(1));
        assert_eq!(timing.idle_timeout, Duration::from_secs(180));
        assert_eq!(timing.recast_delay.max_ms, 2000);
    }

    #[test]
    fn test_paused_tick_waits_at_most_one_tick() {
        use crate::input::InputSink;
        use crate::screen_reader::{Frame, FrameSource};
        use crate::{CaptureError, InjectionError};

        struct NoScreen;
        impl FrameSource for NoScreen {
            fn capture(&mut self, _region: &Region) -> Result<Frame, CaptureError> {
                Err(CaptureError::Backend("unused".to_string()))
            }
        }
        struct NoInput;
        impl InputSink for NoInput {
            fn trigger(&mut self, _button: MouseButton) -> Result<(), InjectionError> {
                Ok(())
            }
        }

        let mut settings = Settings::default();
        settings.tick_interval_ms = 25;
        settings.paused_poll_ms = 500;
        assert!(settings.validate().is_ok());

        let pause = PauseFlag::new();
        pause.toggle();
        let region = Region::new(0, 0, 10, 10).unwrap();
        let mut bot = ControlLoop::from_settings(&settings, region, NoScreen, NoInput)
            .with_pause(pause);

        let start = Instant::now();
        assert_eq!(bot.tick(), TickOutcome::Paused);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(25));
        assert!(waited < Duration::from_millis(250), "paused tick took {:?}", waited);
    }
}
