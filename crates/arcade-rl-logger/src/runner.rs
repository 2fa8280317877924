//! Interactive run recorder

use crate::aggregator::{AggregatorOptions, EpisodeAggregator};
use crate::callback::{AgentCallback, InitData, ResetDecision, StepData, TrainUpdate};
use crate::capture::CapturePolicy;
use crate::episode::EpisodeRecord;
use arcade_rl_core::{EnvironmentConfig, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Callback for running a trained agent outside of training.
///
/// Every episode is recorded, with all frames retained when `save_gif` is
/// set so they can be encoded once the run finishes.
pub struct RunRecorder {
    aggregator: EpisodeAggregator,
    save_gif: bool,
}

impl RunRecorder {
    pub fn new(config: &EnvironmentConfig, save_gif: bool) -> Self {
        Self {
            aggregator: EpisodeAggregator::new(AggregatorOptions {
                end_episode_on_life_loss: config.end_episode_on_life_loss,
                capture: CapturePolicy::Always {
                    final_frame: false,
                    animation: save_gif,
                },
                actor_count: 1,
            }),
            save_gif,
        }
    }

    pub fn save_gif(&self) -> bool {
        self.save_gif
    }

    /// Log and return every finished episode
    pub fn finish(&self) -> Vec<EpisodeRecord> {
        let records = self.aggregator.drain();
        let life_loss = self.aggregator.options().end_episode_on_life_loss;
        for record in &records {
            if life_loss {
                for (length, reward) in record.life_length.iter().zip(&record.life_reward) {
                    info!("Life length: {}", length);
                    info!("Life reward: {}", reward);
                }
            } else {
                info!("Episode length: {}", record.length);
                info!("Episode reward: {}", record.total_reward());
            }
            info!("Score: {}", record.total_score());
        }
        info!("Complete! {} episodes", records.len());
        records
    }
}

impl AgentCallback for RunRecorder {
    fn train_init(&self, data: &InitData) {
        info!("Running {} environments", data.env_count);
        self.aggregator.init(data.env_count);
    }

    fn env_reset(&self, data: &StepData) -> ResetDecision {
        self.aggregator.on_reset(data)
    }

    fn env_step(&self, data: &StepData) -> bool {
        let closed = self.aggregator.on_step(data);
        if closed {
            debug!(
                "Episode closed in env {}, lengths now {:?}",
                data.env,
                self.aggregator.lengths()
            );
        }
        closed
    }

    fn train_update(&self, _data: &TrainUpdate) {
        warn!("Training updates are ignored while running");
    }

    fn save(&self, _steps: u64, _path: &Path) -> Result<()> {
        Ok(())
    }
}
