//! Driver callback interface

use arcade_rl_core::{ActionIndex, Result, StepResult};
use std::path::Path;
use tracing::warn;

/// Passed to `train_init` before any environment is stepped
#[derive(Debug, Clone, Copy, Default)]
pub struct InitData {
    /// Number of environment slots
    pub env_count: usize,
    /// Timestep training ends at
    pub total_timesteps: u64,
    /// Timestep training resumes from
    pub start_timestep: u64,
}

/// A step or reset result together with the driver's context
#[derive(Debug, Clone)]
pub struct StepData {
    /// Environment slot that produced the result
    pub env: usize,
    /// Steps the driver has taken in this slot
    pub step: u64,
    /// Evaluation rather than training episode
    pub eval_mode: bool,
    /// Actor due to act next; 0 for single actor games
    pub turn_index: usize,
    /// Result returned by the environment
    pub result: StepResult,
}

/// Passed to `train_update` after each optimisation step
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainUpdate {
    /// Optimisation update counter
    pub update: u64,
    /// Environment timesteps consumed so far
    pub timestep: u64,
}

/// Policy returned from `env_reset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetDecision {
    /// Halt this slot instead of starting another episode
    pub should_stop: bool,
    /// Enable raw frame capture for the upcoming episode
    pub want_capture: bool,
}

/// Callbacks invoked by an agent driver
///
/// Drivers call these from several worker threads at once, so
/// implementations synchronise internally.
pub trait AgentCallback: Send + Sync {
    /// Training is about to start
    fn train_init(&self, data: &InitData);

    /// An environment slot was reset
    fn env_reset(&self, data: &StepData) -> ResetDecision;

    /// An environment slot was stepped. Returns whether the episode closed.
    fn env_step(&self, data: &StepData) -> bool;

    /// A training update completed
    fn train_update(&self, data: &TrainUpdate);

    /// Action chosen by a human operator
    fn interactive_step(&self) -> Option<ActionIndex> {
        warn!("Interactive control is not supported by this callback");
        None
    }

    /// Persist state alongside a model checkpoint
    fn save(&self, steps: u64, path: &Path) -> Result<()>;
}
