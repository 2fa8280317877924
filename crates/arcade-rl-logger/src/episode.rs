//! Episode records

use crate::callback::StepData;
use crate::capture::CaptureFlags;
use arcade_rl_core::RgbImage;
use std::collections::VecDeque;

/// Accumulated results of one episode
#[derive(Debug, Clone, Default)]
pub struct EpisodeRecord {
    /// Episode id, assigned in creation order
    pub id: u64,
    /// Slot the episode ran in
    pub env: usize,
    /// Steps taken
    pub length: u64,
    /// Length of each completed life (life-loss mode)
    pub life_length: Vec<u64>,
    /// Reward earned in each completed life (life-loss mode)
    pub life_reward: Vec<f32>,
    /// Agent facing reward per actor
    pub reward: Vec<f32>,
    /// Game score per actor
    pub score: Vec<f32>,
    /// Retained steps; only the latest unless the whole episode is kept
    pub steps: VecDeque<StepData>,
    /// Capture decided when the record was created
    pub capture: CaptureFlags,
    /// Evaluation episode
    pub eval_episode: bool,
    life_start_length: u64,
    life_start_reward: f32,
    last_turn: usize,
}

impl EpisodeRecord {
    pub fn new(id: u64, capture: CaptureFlags) -> Self {
        Self {
            id,
            capture,
            ..Default::default()
        }
    }

    /// No step has been recorded yet
    pub fn is_fresh(&self) -> bool {
        self.length == 0
    }

    /// Actor whose action the next step's reward belongs to
    pub fn set_turn(&mut self, turn_index: usize) {
        self.last_turn = turn_index;
    }

    /// Whether every step must be retained
    pub fn keeps_history(&self) -> bool {
        self.capture.render_gif || self.eval_episode
    }

    /// Add a step's reward and score and retain it.
    ///
    /// The reward is credited to the actor recorded on the previous step,
    /// since it is the consequence of that actor's action.
    pub fn accumulate(&mut self, data: &StepData, actor_count: usize) {
        let actor_count = actor_count.max(1);
        if self.is_fresh() {
            self.reward = vec![0.0; actor_count];
            self.score = vec![0.0; actor_count];
        }

        let actor = self.last_turn.min(actor_count - 1);
        self.reward[actor] += data.result.reward;
        self.score[actor] += data.result.score;
        self.last_turn = data.turn_index;
        self.length += 1;

        self.steps.push_back(data.clone());
        if !self.keeps_history() {
            while self.steps.len() > 1 {
                self.steps.pop_front();
            }
        }
    }

    /// Close the current life segment
    pub fn close_life(&mut self) {
        let reward = self.total_reward();
        self.life_length.push(self.length - self.life_start_length);
        self.life_reward.push(reward - self.life_start_reward);
        self.life_start_length = self.length;
        self.life_start_reward = reward;
    }

    /// Reward of the first actor
    pub fn total_reward(&self) -> f32 {
        self.reward.first().copied().unwrap_or(0.0)
    }

    /// Score of the first actor
    pub fn total_score(&self) -> f32 {
        self.score.first().copied().unwrap_or(0.0)
    }

    /// Last frame of the episode
    pub fn final_frame(&self) -> Option<RgbImage> {
        self.steps.back().map(|s| s.result.final_frame())
    }

    /// Raw frames of every retained step
    pub fn animation(&self) -> Vec<RgbImage> {
        self.steps
            .iter()
            .filter_map(|s| s.result.raw_frame.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::step_data;

    #[test]
    fn test_close_life_measures_from_previous_boundary() {
        let mut record = EpisodeRecord::new(0, CaptureFlags::default());
        record.accumulate(&step_data(0, 3.0, false, 2), 1);
        record.accumulate(&step_data(0, 1.0, true, 1), 1);
        record.close_life();
        record.accumulate(&step_data(0, 2.0, true, 0), 1);
        record.close_life();

        assert_eq!(record.life_length, vec![2, 1]);
        assert_eq!(record.life_reward, vec![4.0, 2.0]);
        assert_eq!(record.life_length.iter().sum::<u64>(), record.length);
    }

    #[test]
    fn test_frames_from_retained_steps() {
        let flags = CaptureFlags {
            render_final: true,
            render_gif: true,
        };
        let mut record = EpisodeRecord::new(4, flags);
        assert!(record.final_frame().is_none());

        for reward in [1.0, 2.0, 3.0] {
            record.accumulate(&step_data(0, reward, false, 0), 1);
        }
        let frames = record.animation();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].pixel(0, 0), [2, 2, 2]);
        assert_eq!(record.final_frame().map(|f| f.pixel(1, 1)), Some([3, 3, 3]));
    }
}
