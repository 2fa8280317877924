//! Render capture scheduling
//!
//! Flags are decided once, when an episode record is created, from the
//! record's episode id. They are never revised while the episode runs.

use arcade_rl_core::ConfigData;

/// Capture requested for one episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureFlags {
    /// Emit the last frame as an image
    pub render_final: bool,
    /// Emit every frame as an animation
    pub render_gif: bool,
}

/// How capture flags are assigned to new episodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePolicy {
    /// Never capture
    Never,
    /// Same flags for every episode
    Always { final_frame: bool, animation: bool },
    /// Capture when the episode id is a multiple of the period; 0 disables
    Periodic {
        final_period: u64,
        animation_period: u64,
    },
}

impl CapturePolicy {
    /// Periodic policy using the configured save periods
    pub fn from_config(config: &ConfigData) -> Self {
        CapturePolicy::Periodic {
            final_period: config.observation_save_period,
            animation_period: config.observation_gif_save_period,
        }
    }

    /// Flags for the episode with id `episode_id`
    pub fn decide(&self, episode_id: u64) -> CaptureFlags {
        match *self {
            CapturePolicy::Never => CaptureFlags::default(),
            CapturePolicy::Always {
                final_frame,
                animation,
            } => CaptureFlags {
                render_final: final_frame,
                render_gif: animation,
            },
            CapturePolicy::Periodic {
                final_period,
                animation_period,
            } => CaptureFlags {
                render_final: on_period(episode_id, final_period),
                render_gif: on_period(episode_id, animation_period),
            },
        }
    }
}

fn on_period(id: u64, period: u64) -> bool {
    period > 0 && id % period == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_rl_core::EnvironmentConfig;

    #[test]
    fn test_periodic_counters_are_independent() {
        let policy = CapturePolicy::Periodic {
            final_period: 2,
            animation_period: 3,
        };
        let flags: Vec<(bool, bool)> = (0..7)
            .map(|id| {
                let f = policy.decide(id);
                (f.render_final, f.render_gif)
            })
            .collect();
        assert_eq!(
            flags,
            vec![
                (true, true),
                (false, false),
                (true, false),
                (false, true),
                (true, false),
                (false, false),
                (true, true),
            ]
        );
    }

    #[test]
    fn test_zero_period_disables() {
        let policy = CapturePolicy::Periodic {
            final_period: 0,
            animation_period: 0,
        };
        assert_eq!(policy.decide(0), CaptureFlags::default());
    }

    #[test]
    fn test_from_config() {
        let config = ConfigData::new(EnvironmentConfig::new("pong.bin"));
        assert_eq!(
            CapturePolicy::from_config(&config),
            CapturePolicy::Periodic {
                final_period: 1000,
                animation_period: 10000,
            }
        );
    }

    #[test]
    fn test_always_and_never() {
        let always = CapturePolicy::Always {
            final_frame: false,
            animation: true,
        };
        assert!(always.decide(17).render_gif);
        assert!(!always.decide(17).render_final);
        assert_eq!(CapturePolicy::Never.decide(0), CaptureFlags::default());
    }
}
