//! Reward channels and clipping

/// Name of the single reward channel reported by arcade environments
pub const SCORE_CHANNEL: &str = "score";

/// Bin a reward to {-1, 0, +1} by its sign
pub fn clip_reward(reward: f32) -> f32 {
    if reward > 0.0 {
        1.0
    } else if reward < 0.0 {
        -1.0
    } else {
        0.0
    }
}
