//! # arcade-rl-env
//!
//! Adapts an arcade emulator into a fixed-contract reinforcement-learning
//! environment.
//!
//! This crate provides:
//! - `Emulator` trait for wrapping an emulator core
//! - `Environment` trait implemented by environments driven by an agent
//! - `FrameCodec` for turning screens into observation tensors
//! - `ArcadeEnv`, the frame skip / stack / life-loss adapter

pub mod arcade;
pub mod codec;
pub mod emulator;
pub mod environment;

#[cfg(test)]
mod testing;

pub use arcade::ArcadeEnv;
pub use codec::FrameCodec;
pub use emulator::{Emulator, EmulatorAction};
pub use environment::Environment;
