//! Deterministic emulator used by the adapter tests

use crate::emulator::{Emulator, EmulatorAction};
use arcade_rl_core::{ArcadeError, Result};
use std::path::{Path, PathBuf};

/// Scripted emulator whose screen encodes the tick counter
///
/// Every pixel holds the number of ticks since the last reset. In flicker
/// mode a pixel only lights up (tick * 10) on alternating ticks, offset by
/// its position, the way sprites flicker on real hardware.
pub struct FakeEmulator {
    pub width: usize,
    pub height: usize,
    pub tick: u32,
    pub lives: i32,
    pub start_lives: i32,
    /// Ticks (since reset) at which a life is lost
    pub life_loss_ticks: Vec<u32>,
    /// Tick (since reset) from which the game reports game over
    pub game_over_at: Option<u32>,
    pub reward_per_tick: i32,
    pub flicker: bool,
    pub fail_load: bool,
    pub loaded: Option<PathBuf>,
    pub resets: u32,
    pub actions: Vec<EmulatorAction>,
}

impl FakeEmulator {
    pub fn new() -> Self {
        Self {
            width: 4,
            height: 2,
            tick: 0,
            lives: 0,
            start_lives: 0,
            life_loss_ticks: Vec::new(),
            game_over_at: None,
            reward_per_tick: 0,
            flicker: false,
            fail_load: false,
            loaded: None,
            resets: 0,
            actions: Vec::new(),
        }
    }

    pub fn with_lives(mut self, lives: i32, life_loss_ticks: Vec<u32>) -> Self {
        self.start_lives = lives;
        self.lives = lives;
        self.life_loss_ticks = life_loss_ticks;
        self
    }

    fn pixel(&self, index: usize) -> u8 {
        let value = if self.flicker {
            if (self.tick as usize + index) % 2 == 0 {
                self.tick * 10
            } else {
                0
            }
        } else {
            self.tick
        };
        (value % 256) as u8
    }
}

impl Emulator for FakeEmulator {
    fn load_rom(&mut self, path: &Path) -> Result<()> {
        if self.fail_load {
            return Err(ArcadeError::RomLoad {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn minimal_action_set(&self) -> Vec<EmulatorAction> {
        vec![
            EmulatorAction::NOOP,
            EmulatorAction(1),
            EmulatorAction(3),
            EmulatorAction(4),
        ]
    }

    fn act(&mut self, action: EmulatorAction) -> i32 {
        self.tick += 1;
        self.actions.push(action);
        if self.lives > 0 && self.life_loss_ticks.contains(&self.tick) {
            self.lives -= 1;
        }
        self.reward_per_tick
    }

    fn lives(&self) -> i32 {
        self.lives
    }

    fn game_over(&self) -> bool {
        self.game_over_at.is_some_and(|t| self.tick >= t)
            || (self.start_lives > 0 && self.lives == 0)
    }

    fn reset_game(&mut self) {
        self.tick = 0;
        self.lives = self.start_lives;
        self.resets += 1;
    }

    fn screen_width(&self) -> usize {
        self.width
    }

    fn screen_height(&self) -> usize {
        self.height
    }

    fn screen_rgb(&self, buffer: &mut Vec<u8>) {
        buffer.clear();
        for i in 0..self.width * self.height {
            let v = self.pixel(i);
            buffer.extend_from_slice(&[v, v.wrapping_add(1), v.wrapping_add(2)]);
        }
    }

    fn screen_grayscale(&self, buffer: &mut Vec<u8>) {
        buffer.clear();
        buffer.extend((0..self.width * self.height).map(|i| self.pixel(i)));
    }
}
