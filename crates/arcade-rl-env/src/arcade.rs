//! Arcade environment adapter
//!
//! Wraps an [`Emulator`] with frame skipping (max-pooled over the last two
//! ticks), frame stacking, reward clipping and life-loss episode boundaries.

use crate::codec::FrameCodec;
use crate::emulator::{Emulator, EmulatorAction};
use crate::environment::Environment;
use arcade_rl_core::{
    ActionIndex, ActionSpace, EnvState, EnvironmentConfig, EnvironmentConfiguration, ImageTensor,
    InitialState, Result, RgbImage, SCORE_CHANNEL, State, StepResult, clip_reward,
};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info};

/// Environment adapter around a single emulator instance
pub struct ArcadeEnv<E: Emulator> {
    /// Immutable configuration
    config: EnvironmentConfig,
    /// Exclusively owned emulator
    emulator: E,
    /// Screen decoder
    codec: FrameCodec,
    /// Minimal action set; step indices map into this
    action_set: Vec<EmulatorAction>,
    /// Game state at the last tick
    state: EnvState,
    /// Steps since the last reset
    step: u64,
    /// Set when the current episode has terminated
    episode_end: bool,
    /// Horizon requested by the last reset, 0 for unbounded
    max_episode_steps: u64,
    /// Last `frame_stack` decoded frames, oldest first
    buffer: VecDeque<ImageTensor>,
    /// Stacked contents of `buffer`
    observation: ImageTensor,
    /// Attach raw screens to step results
    capture: bool,
    /// Scratch screen buffer
    screen: Vec<u8>,
}

impl<E: Emulator> ArcadeEnv<E> {
    /// Load the configured ROM into `emulator` and build the adapter.
    ///
    /// The returned environment is ready to step but callers normally
    /// `reset` first to apply the no-op start.
    pub fn new(mut config: EnvironmentConfig, mut emulator: E) -> Result<Self> {
        config.normalize();
        emulator.load_rom(Path::new(&config.rom_file))?;

        let action_set = emulator.minimal_action_set();
        info!(
            "Loaded {} ({} actions, frame skip {}, frame stack {})",
            config.rom_file,
            action_set.len(),
            config.frame_skip,
            config.frame_stack
        );

        let codec = FrameCodec::new(&config);
        let mut screen = Vec::new();
        let first = decode_screen(&emulator, &codec, &mut screen);
        let buffer: VecDeque<ImageTensor> =
            std::iter::repeat_n(first, config.frame_stack).collect();
        let observation = ImageTensor::stack(&buffer);

        Ok(Self {
            config,
            emulator,
            codec,
            action_set,
            state: EnvState::default(),
            step: 0,
            episode_end: false,
            max_episode_steps: 0,
            buffer,
            observation,
            capture: false,
            screen,
        })
    }

    /// The wrapped emulator
    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    /// The adapter configuration
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Current episode state
    pub fn state(&self) -> State {
        State {
            env_state: self.state,
            step: self.step,
            episode_end: self.episode_end,
            max_episode_steps: self.max_episode_steps,
        }
    }

    fn legal_actions(&self) -> Vec<ActionIndex> {
        (0..self.action_set.len()).collect()
    }

    fn observe(&mut self) -> ImageTensor {
        decode_screen(&self.emulator, &self.codec, &mut self.screen)
    }

    /// Advance one emulator tick and update life/game-over tracking
    fn single_step(&mut self, action: EmulatorAction) -> i32 {
        let reward = self.emulator.act(action);

        let lives = self.emulator.lives();
        if self.config.end_episode_on_life_loss {
            self.episode_end |= lives < self.state.lives;
        }
        self.state.lives = lives;
        self.episode_end |= self.emulator.game_over();

        reward
    }

    fn push_frame(&mut self, frame: ImageTensor) {
        self.buffer.push_back(frame);
        while self.buffer.len() > self.config.frame_stack {
            self.buffer.pop_front();
        }
        self.observation = ImageTensor::stack(&self.buffer);
    }

    fn result(&self, reward: f32, score: f32) -> StepResult {
        StepResult {
            observation: self.observation.clone(),
            reward,
            score,
            state: self.state(),
            raw_frame: self.capture.then(|| self.get_visualisations()),
            legal_actions: Some(self.legal_actions()),
        }
    }
}

fn decode_screen<E: Emulator>(
    emulator: &E,
    codec: &FrameCodec,
    screen: &mut Vec<u8>,
) -> ImageTensor {
    let channels = codec.channels();
    if channels == 1 {
        emulator.screen_grayscale(screen);
    } else {
        emulator.screen_rgb(screen);
    }
    codec.decode(
        screen,
        emulator.screen_width(),
        emulator.screen_height(),
        channels,
    )
}

impl<E: Emulator> Environment for ArcadeEnv<E> {
    fn get_configuration(&self) -> EnvironmentConfiguration {
        let (width, height) = self
            .config
            .output_size(self.emulator.screen_width(), self.emulator.screen_height());
        EnvironmentConfiguration {
            name: self.config.rom_file.clone(),
            observation_shapes: vec![vec![
                self.config.channels() * self.config.frame_stack,
                height,
                width,
            ]],
            observation_dtypes: vec![self.observation.dtype()],
            action_space: ActionSpace::Discrete {
                n: self.action_set.len(),
            },
            legal_actions: self.legal_actions(),
            reward_types: vec![SCORE_CHANNEL.to_string()],
        }
    }

    fn step(&mut self, action: ActionIndex) -> StepResult {
        let action = self.action_set[action];
        let frame_skip = self.config.frame_skip;

        let mut score = 0i32;
        let frame = if frame_skip > 1 {
            for _ in 0..frame_skip - 2 {
                score += self.single_step(action);
            }
            score += self.single_step(action);
            let penultimate = self.observe();
            score += self.single_step(action);
            let last = self.observe();
            penultimate.maximum(&last)
        } else {
            score += self.single_step(action);
            self.observe()
        };
        self.push_frame(frame);

        let score = score as f32;
        let reward = if self.config.clip_reward {
            clip_reward(score)
        } else {
            score
        };

        self.step += 1;
        if self.max_episode_steps > 0 && self.step > self.max_episode_steps {
            self.episode_end = true;
        }
        if self.episode_end {
            debug!(
                "Episode end at step {} with {} lives",
                self.step, self.state.lives
            );
        }

        self.result(reward, score)
    }

    // Called after a terminal step and before the next one
    fn reset(&mut self, initial_state: &InitialState) -> StepResult {
        self.step = 0;
        self.episode_end = false;
        self.max_episode_steps = initial_state.max_episode_steps;

        if self.config.end_episode_on_life_loss && self.state.lives > 0 {
            debug!("Soft reset, {} lives remaining", self.state.lives);
            return self.result(0.0, 0.0);
        }

        self.emulator.reset_game();
        self.state.lives = self.emulator.lives();

        let frame_stack = self.config.frame_stack;
        self.buffer.clear();
        for remaining in (1..=self.config.noop_reset_max_frames as usize).rev() {
            if remaining < frame_stack {
                let frame = self.observe();
                self.buffer.push_back(frame);
            }
            self.emulator.act(EmulatorAction::NOOP);
        }
        while self.buffer.len() < frame_stack {
            let frame = self.observe();
            self.buffer.push_back(frame);
        }
        self.observation = ImageTensor::stack(&self.buffer);

        debug!(
            "Reset {} after {} no-ops, {} lives",
            self.config.rom_file, self.config.noop_reset_max_frames, self.state.lives
        );
        self.result(0.0, 0.0)
    }

    fn get_visualisations(&self) -> RgbImage {
        let mut buffer = Vec::new();
        self.emulator.screen_rgb(&mut buffer);
        RgbImage::new(
            self.emulator.screen_width(),
            self.emulator.screen_height(),
            buffer,
        )
    }

    fn set_capture(&mut self, enabled: bool) {
        self.capture = enabled;
    }

    fn state_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.state.lives.to_le_bytes());
        hasher.update(self.step.to_le_bytes());
        hasher.update(self.observation.to_bytes());
        hex::encode(hasher.finalize())
    }
}
