//! Action spaces

use serde::{Deserialize, Serialize};

/// Index into an environment's legal action list
pub type ActionIndex = usize;

/// Description of an action space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", rename_all = "PascalCase")]
pub enum ActionSpace {
    /// Discrete action space
    Discrete {
        /// Number of discrete actions
        n: usize,
    },
}

impl ActionSpace {
    /// Number of selectable actions
    pub fn size(&self) -> usize {
        match self {
            ActionSpace::Discrete { n } => *n,
        }
    }
}
