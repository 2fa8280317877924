//! Environment trait

use arcade_rl_core::{ActionIndex, EnvironmentConfiguration, InitialState, RgbImage, StepResult};
use tracing::warn;

/// Trait for environments driven by an agent
///
/// `step` and `reset` are synchronous and return once the emulator has
/// advanced. Optional capabilities have default implementations that log the
/// request and return `None`, so a generic driver can probe them safely.
pub trait Environment: Send {
    /// Declared observation, action and reward layout
    fn get_configuration(&self) -> EnvironmentConfiguration;

    /// Execute an action and advance the simulation
    ///
    /// # Panics
    ///
    /// Implementations may panic when `action` is not one of the legal
    /// actions last reported.
    fn step(&mut self, action: ActionIndex) -> StepResult;

    /// Start the next episode
    fn reset(&mut self, initial_state: &InitialState) -> StepResult;

    /// Unprocessed screen for visualisation
    fn get_visualisations(&self) -> RgbImage;

    /// Attach the unprocessed screen to every subsequent step result
    fn set_capture(&mut self, enabled: bool);

    /// Hash of the current state for determinism verification
    fn state_hash(&self) -> String;

    /// Action suggested by a built-in expert policy
    fn expert_action(&mut self) -> Option<ActionIndex> {
        warn!("Expert policy is not supported by this environment");
        None
    }

    /// Independent copy of this environment
    fn try_clone(&self) -> Option<Box<dyn Environment>> {
        warn!("Cloning is not supported by this environment");
        None
    }
}
