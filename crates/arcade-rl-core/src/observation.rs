//! Step results and environment state snapshots

use serde::{Deserialize, Serialize};

use crate::action::ActionIndex;
use crate::frame::{ImageTensor, RgbImage};

/// Game specific state carried alongside each step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvState {
    /// Life count last reported by the emulator
    pub lives: i32,
}

/// Snapshot of the environment's episode state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Game specific state
    #[serde(default)]
    pub env_state: EnvState,
    /// Steps taken since the last reset
    #[serde(default)]
    pub step: u64,
    /// Episode terminated (game over, life lost or horizon reached)
    #[serde(default)]
    pub episode_end: bool,
    /// Horizon in steps, 0 for unbounded
    #[serde(default)]
    pub max_episode_steps: u64,
}

impl State {
    /// Whether the step counter has passed a non-zero horizon
    pub fn horizon_reached(&self) -> bool {
        self.max_episode_steps > 0 && self.step > self.max_episode_steps
    }
}

/// Request passed to `reset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialState {
    /// Horizon in steps for the next episode, 0 for unbounded
    #[serde(default)]
    pub max_episode_steps: u64,
}

/// Result of an environment step or reset
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Stacked observation, oldest frame first
    pub observation: ImageTensor,
    /// Agent facing reward (sign-clipped when configured)
    pub reward: f32,
    /// Unclipped game score gained this step
    pub score: f32,
    /// Episode state after the step
    pub state: State,
    /// Unprocessed screen, present while capture is enabled
    pub raw_frame: Option<RgbImage>,
    /// Indices valid for the next `step`
    pub legal_actions: Option<Vec<ActionIndex>>,
}

impl StepResult {
    /// Image used for a final-frame snapshot.
    ///
    /// Prefers the raw screen and falls back to the newest stacked frame.
    pub fn final_frame(&self) -> RgbImage {
        match &self.raw_frame {
            Some(frame) => frame.clone(),
            None => self.observation.to_rgb8(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_horizon_reached_only_after_exceeding() {
        let mut state = State {
            max_episode_steps: 3,
            step: 3,
            ..Default::default()
        };
        assert!(!state.horizon_reached());
        state.step = 4;
        assert!(state.horizon_reached());

        state.max_episode_steps = 0;
        assert!(!state.horizon_reached());
    }

    #[test]
    fn test_state_round_trip() {
        let state = State {
            env_state: EnvState { lives: 3 },
            step: 12,
            episode_end: true,
            max_episode_steps: 100,
        };
        let json = serde_json::to_string(&state).unwrap();
        let parsed: State = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);

        let partial: State = serde_json::from_str(r#"{"max_episode_steps": 5}"#).unwrap();
        assert_eq!(partial.env_state.lives, 0);
        assert_eq!(partial.max_episode_steps, 5);
    }

    #[test]
    fn test_final_frame_prefers_raw() {
        let mut result = StepResult {
            observation: ImageTensor::Byte(Array3::from_elem((1, 1, 1), 7)),
            reward: 0.0,
            score: 0.0,
            state: State::default(),
            raw_frame: None,
            legal_actions: None,
        };
        assert_eq!(result.final_frame().pixel(0, 0), [7, 7, 7]);

        result.raw_frame = Some(RgbImage::new(1, 1, vec![1, 2, 3]));
        assert_eq!(result.final_frame().pixel(0, 0), [1, 2, 3]);
    }
}
