//! # arcade-rl-logger
//!
//! Turns the per-step results of many concurrently stepped arcade
//! environments into episode records and training telemetry.
//!
//! This crate provides:
//! - `AgentCallback`, the interface an agent driver reports resets and steps to
//! - `EpisodeAggregator` for segmenting steps into episodes and lives
//! - `CapturePolicy` for scheduling final-frame and animation captures
//! - `TelemetrySink` and the statistics-backed `MetricsLogger`
//! - `TrainingLogger` and `RunRecorder`, the training and run mode callbacks

pub mod aggregator;
pub mod callback;
pub mod capture;
pub mod episode;
pub mod logging;
pub mod runner;
pub mod sink;
pub mod training;

#[cfg(test)]
mod test_support;

pub use aggregator::{AggregatorOptions, EpisodeAggregator};
pub use callback::{AgentCallback, InitData, ResetDecision, StepData, TrainUpdate};
pub use capture::{CaptureFlags, CapturePolicy};
pub use episode::EpisodeRecord;
pub use runner::RunRecorder;
pub use sink::{Capture, CaptureKind, MetricsLogger, TelemetrySink};
pub use training::TrainingLogger;
