//! Fishing state machine and the loop that drives it

pub mod control_loop;
pub mod state_machine;

pub use control_loop::{ControlLoop, LoopTiming, TickOutcome};
pub use state_machine::{transition, Action, BotState, FishingStateMachine, TickInput, IDLE_TIMEOUT};
