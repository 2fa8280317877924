//! Emulator capability
//!
//! The adapter drives any emulator through this trait. Implementations wrap
//! a concrete emulator core and are expected to be deterministic.

use arcade_rl_core::Result;
use std::path::Path;

/// Raw action code understood by the emulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmulatorAction(pub u8);

impl EmulatorAction {
    /// Player A no-op
    pub const NOOP: EmulatorAction = EmulatorAction(0);
}

/// Trait for emulator cores wrapped by [`crate::ArcadeEnv`]
pub trait Emulator: Send {
    /// Load a ROM and reset the system. Failure is fatal for the adapter.
    fn load_rom(&mut self, path: &Path) -> Result<()>;

    /// Smallest set of actions that covers the loaded game
    fn minimal_action_set(&self) -> Vec<EmulatorAction>;

    /// Advance one tick with `action`, returning the reward earned
    fn act(&mut self, action: EmulatorAction) -> i32;

    /// Remaining lives
    fn lives(&self) -> i32;

    /// Whether the game has ended
    fn game_over(&self) -> bool;

    /// Restart the loaded game
    fn reset_game(&mut self);

    /// Native screen width in pixels
    fn screen_width(&self) -> usize;

    /// Native screen height in pixels
    fn screen_height(&self) -> usize;

    /// Fill `buffer` with the screen as interleaved RGB bytes
    fn screen_rgb(&self, buffer: &mut Vec<u8>);

    /// Fill `buffer` with the screen as one luminance byte per pixel
    fn screen_grayscale(&self, buffer: &mut Vec<u8>);
}
