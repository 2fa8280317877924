//! Training-time episode logger

use crate::aggregator::{AggregatorOptions, EpisodeAggregator};
use crate::callback::{AgentCallback, InitData, ResetDecision, StepData, TrainUpdate};
use crate::capture::CapturePolicy;
use crate::episode::EpisodeRecord;
use crate::sink::TelemetrySink;
use arcade_rl_core::{ConfigData, Result, save_config};
use parking_lot::{Mutex, MutexGuard};
use std::path::Path;
use tracing::{debug, info};

/// Callback that turns finished episodes into telemetry on every training update
pub struct TrainingLogger<S: TelemetrySink> {
    config: ConfigData,
    aggregator: EpisodeAggregator,
    sink: Mutex<S>,
}

impl<S: TelemetrySink> TrainingLogger<S> {
    /// Logger capturing on the configured save periods
    pub fn new(config: ConfigData, sink: S) -> Self {
        let options = AggregatorOptions {
            end_episode_on_life_loss: config.environment.end_episode_on_life_loss,
            capture: CapturePolicy::from_config(&config),
            actor_count: 1,
        };
        Self::with_options(config, sink, options)
    }

    pub fn with_options(config: ConfigData, sink: S, options: AggregatorOptions) -> Self {
        Self {
            config,
            aggregator: EpisodeAggregator::new(options),
            sink: Mutex::new(sink),
        }
    }

    pub fn config(&self) -> &ConfigData {
        &self.config
    }

    pub fn aggregator(&self) -> &EpisodeAggregator {
        &self.aggregator
    }

    pub fn sink(&self) -> MutexGuard<'_, S> {
        self.sink.lock()
    }

    fn report(&self, sink: &mut S, record: &EpisodeRecord) {
        if record.eval_episode {
            sink.add_scalar("environment", "reward_eval", record.total_reward() as f64);
            return;
        }

        sink.add_scalar("environment", "episode_length", record.length as f64);
        if self.aggregator.options().end_episode_on_life_loss {
            for (length, reward) in record.life_length.iter().zip(&record.life_reward) {
                sink.add_scalar("environment", "life_length", *length as f64);
                sink.add_scalar("environment", "reward", *reward as f64);
            }
        } else {
            sink.add_scalar("environment", "reward", record.total_reward() as f64);
        }
        sink.add_scalar("environment", "score", record.total_score() as f64);

        if record.capture.render_final {
            if let Some(frame) = record.final_frame() {
                sink.add_image("observations", "final_frame", frame);
            }
        }
        if record.capture.render_gif {
            let frames = record.animation();
            if !frames.is_empty() {
                sink.add_animation("", "episode", frames);
            }
        }
    }
}

impl<S: TelemetrySink> AgentCallback for TrainingLogger<S> {
    fn train_init(&self, data: &InitData) {
        info!(
            "Training {} environments from timestep {} to {}",
            data.env_count, data.start_timestep, data.total_timesteps
        );
        info!("ROM: {}", self.config.environment.rom_file);
        self.aggregator.init(data.env_count);
    }

    fn env_reset(&self, data: &StepData) -> ResetDecision {
        self.aggregator.on_reset(data)
    }

    fn env_step(&self, data: &StepData) -> bool {
        self.aggregator.on_step(data)
    }

    fn train_update(&self, data: &TrainUpdate) {
        let records = self.aggregator.drain();
        let mut sink = self.sink.lock();
        sink.update(data);
        for record in &records {
            self.report(&mut sink, record);
        }
        sink.print(data, self.aggregator.total_episode_count());
    }

    fn save(&self, steps: u64, path: &Path) -> Result<()> {
        let mut config = self.config.clone();
        if !config.set_start_timestep(steps) {
            debug!("No train_algorithm.start_timestep in agent config");
        }
        let file = save_config(&config, path)?;
        info!("Saved config to {}", file.display());
        Ok(())
    }
}
