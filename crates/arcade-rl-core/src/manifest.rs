//! Environment configuration report

use serde::{Deserialize, Serialize};

use crate::action::{ActionIndex, ActionSpace};
use crate::frame::DType;

/// Declared shape of an environment, returned by `get_configuration`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfiguration {
    /// Environment name (the ROM identifier)
    pub name: String,
    /// Observation shapes as (channels, height, width)
    pub observation_shapes: Vec<Vec<usize>>,
    /// Observation element types, parallel to `observation_shapes`
    pub observation_dtypes: Vec<DType>,
    /// Action space
    pub action_space: ActionSpace,
    /// Indices currently accepted by `step`
    #[serde(default)]
    pub legal_actions: Vec<ActionIndex>,
    /// Names of the reward channels
    #[serde(default)]
    pub reward_types: Vec<String>,
}

impl EnvironmentConfiguration {
    /// Number of discrete actions
    pub fn action_space_size(&self) -> usize {
        self.action_space.size()
    }
}
