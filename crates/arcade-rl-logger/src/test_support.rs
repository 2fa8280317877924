//! Step fixtures for logger tests

use crate::callback::StepData;
use arcade_rl_core::{EnvState, ImageTensor, RgbImage, State, StepResult};
use ndarray::Array3;

/// A step in `env` with the given reward, a score of ten times the reward
/// and a 2x2 raw frame filled with the reward's integer part.
pub fn step_data(env: usize, reward: f32, episode_end: bool, lives: i32) -> StepData {
    let shade = reward.clamp(0.0, 255.0) as u8;
    StepData {
        env,
        step: 0,
        eval_mode: false,
        turn_index: 0,
        result: StepResult {
            observation: ImageTensor::Byte(Array3::from_elem((1, 2, 2), shade)),
            reward,
            score: reward * 10.0,
            state: State {
                env_state: EnvState { lives },
                episode_end,
                ..Default::default()
            },
            raw_frame: Some(RgbImage::new(2, 2, vec![shade; 12])),
            legal_actions: None,
        },
    }
}
