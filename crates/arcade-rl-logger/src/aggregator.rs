//! Episode and life aggregation across environment slots
//!
//! Workers report every reset and step of their slot. One lock guards all
//! slots; each call holds it only while updating in-memory records, and a
//! finished record is swapped for a fresh one inside the same critical
//! section.

use crate::callback::{ResetDecision, StepData};
use crate::capture::CapturePolicy;
use crate::episode::EpisodeRecord;
use parking_lot::Mutex;
use std::mem;
use tracing::debug;

/// Aggregation settings
#[derive(Debug, Clone, Copy)]
pub struct AggregatorOptions {
    /// Split episodes into lives and only close them at zero lives
    pub end_episode_on_life_loss: bool,
    /// Capture flag assignment for new records
    pub capture: CapturePolicy,
    /// Reward attributed actors sharing one environment
    pub actor_count: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            end_episode_on_life_loss: false,
            capture: CapturePolicy::Never,
            actor_count: 1,
        }
    }
}

#[derive(Debug, Default)]
struct AggregatorState {
    /// In-progress record per slot
    current: Vec<EpisodeRecord>,
    /// Closed records awaiting `drain`
    finished: Vec<EpisodeRecord>,
    /// Episode boundaries seen outside evaluation, lives included
    total_episode_count: u64,
    /// Records created so far; the next record's id
    total_game_count: u64,
}

impl AggregatorState {
    fn new_record(&mut self, capture: &CapturePolicy) -> EpisodeRecord {
        let id = self.total_game_count;
        self.total_game_count += 1;
        EpisodeRecord::new(id, capture.decide(id))
    }

    fn ensure_slot(&mut self, slot: usize, capture: &CapturePolicy) {
        while self.current.len() <= slot {
            let record = self.new_record(capture);
            self.current.push(record);
        }
    }
}

/// Segments per-step results into episode records
#[derive(Debug)]
pub struct EpisodeAggregator {
    options: AggregatorOptions,
    state: Mutex<AggregatorState>,
}

impl EpisodeAggregator {
    pub fn new(options: AggregatorOptions) -> Self {
        Self {
            options,
            state: Mutex::new(AggregatorState::default()),
        }
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Start a fresh in-progress record for each of `env_count` slots
    pub fn init(&self, env_count: usize) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.current.clear();
        if env_count > 0 {
            state.ensure_slot(env_count - 1, &self.options.capture);
        }
    }

    /// Handle a reset of `data.env`
    ///
    /// Evaluation runs exactly one episode: once the slot has stepped, the
    /// next reset asks the driver to stop it.
    pub fn on_reset(&self, data: &StepData) -> ResetDecision {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.ensure_slot(data.env, &self.options.capture);

        let record = &mut state.current[data.env];
        record.eval_episode = data.eval_mode;
        if record.is_fresh() {
            record.set_turn(data.turn_index);
        }

        ResetDecision {
            should_stop: data.eval_mode && data.step > 0,
            want_capture: record.capture.render_gif,
        }
    }

    /// Handle a step of `data.env`. Returns true when the episode closed.
    pub fn on_step(&self, data: &StepData) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.ensure_slot(data.env, &self.options.capture);

        let record = &mut state.current[data.env];
        record.accumulate(data, self.options.actor_count);

        let env_state = data.result.state;
        if !env_state.episode_end {
            return false;
        }

        let mut game_over = true;
        if self.options.end_episode_on_life_loss {
            game_over = env_state.env_state.lives == 0 || data.eval_mode;
            record.close_life();
        }
        if env_state.horizon_reached() {
            game_over = true;
        }
        if !data.eval_mode {
            state.total_episode_count += 1;
        }
        if !game_over {
            return false;
        }

        let next = state.new_record(&self.options.capture);
        let mut finished = mem::replace(&mut state.current[data.env], next);
        finished.env = data.env;
        debug!(
            "Episode {} finished in env {}: length {}, reward {}, score {}",
            finished.id,
            finished.env,
            finished.length,
            finished.total_reward(),
            finished.total_score()
        );
        state.finished.push(finished);
        true
    }

    /// Take every closed record
    pub fn drain(&self) -> Vec<EpisodeRecord> {
        mem::take(&mut self.state.lock().finished)
    }

    /// Episode boundaries seen outside evaluation (each life counts in life-loss mode)
    pub fn total_episode_count(&self) -> u64 {
        self.state.lock().total_episode_count
    }

    /// Copy of the in-progress record for `slot`
    pub fn in_progress(&self, slot: usize) -> Option<EpisodeRecord> {
        self.state.lock().current.get(slot).cloned()
    }

    /// Current length of every in-progress record
    pub fn lengths(&self) -> Vec<u64> {
        self.state.lock().current.iter().map(|r| r.length).collect()
    }
}
