//! # arcade-rl-core
//!
//! Core types shared by arcade emulator environments and their episode loggers.
//!
//! This crate provides:
//! - Configuration documents and their JSON persistence
//! - Action spaces and the environment configuration report
//! - Image tensors and step results
//! - Reward clipping
//! - Incremental statistics

pub mod action;
pub mod config;
pub mod error;
pub mod frame;
pub mod manifest;
pub mod observation;
pub mod reward;
pub mod stats;

pub use action::{ActionIndex, ActionSpace};
pub use config::{ConfigData, EnvironmentConfig, load_config, run_timestamp, save_config};
pub use error::{ArcadeError, Result};
pub use frame::{DType, ImageTensor, RgbImage};
pub use manifest::EnvironmentConfiguration;
pub use observation::{EnvState, InitialState, State, StepResult};
pub use reward::{SCORE_CHANNEL, clip_reward};
pub use stats::Stats;
