//! Telemetry sinks

use crate::callback::TrainUpdate;
use arcade_rl_core::{ConfigData, RgbImage, Stats};
use std::collections::BTreeMap;
use tracing::info;

/// Destination for training telemetry
pub trait TelemetrySink: Send {
    fn add_scalar(&mut self, category: &str, name: &str, value: f64);

    fn add_image(&mut self, category: &str, name: &str, image: RgbImage);

    fn add_animation(&mut self, category: &str, name: &str, frames: Vec<RgbImage>);

    /// Called before the metrics of a training update are emitted
    fn update(&mut self, _update: &TrainUpdate) {}

    /// Called after the metrics of a training update are emitted
    fn print(&mut self, _update: &TrainUpdate, _total_episodes: u64) {}
}

/// Kind of captured visual output
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureKind {
    Image(RgbImage),
    Animation(Vec<RgbImage>),
}

/// An image or animation awaiting an encoder
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub tag: String,
    /// Training timestep the capture was emitted at
    pub timestep: u64,
    pub kind: CaptureKind,
}

/// Sink keeping running statistics per metric and retaining captures
///
/// Images and animations are kept at most once per `image_period` training
/// timesteps; anything emitted in between is dropped. A period of 0 drops
/// every capture.
#[derive(Debug)]
pub struct MetricsLogger {
    stats: BTreeMap<String, Stats>,
    captures: Vec<Capture>,
    timestep: u64,
    image_period: u64,
    next_image_timestep: u64,
    images_due: bool,
}

impl Default for MetricsLogger {
    fn default() -> Self {
        Self::with_image_period(1)
    }
}

fn tag(category: &str, name: &str) -> String {
    if category.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", category, name)
    }
}

impl MetricsLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_period(image_period: u64) -> Self {
        Self {
            stats: BTreeMap::new(),
            captures: Vec::new(),
            timestep: 0,
            image_period,
            next_image_timestep: 0,
            images_due: false,
        }
    }

    /// Logger using the configured metric image period
    pub fn from_config(config: &ConfigData) -> Self {
        Self::with_image_period(config.metric_image_log_period)
    }

    /// Statistics for `category/name` (or `name` with an empty category)
    pub fn stats(&self, tag: &str) -> Option<&Stats> {
        self.stats.get(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.stats.keys().map(String::as_str)
    }

    /// Remove and return every retained capture
    pub fn take_captures(&mut self) -> Vec<Capture> {
        std::mem::take(&mut self.captures)
    }
}

impl TelemetrySink for MetricsLogger {
    fn add_scalar(&mut self, category: &str, name: &str, value: f64) {
        self.stats.entry(tag(category, name)).or_default().update(value);
    }

    fn add_image(&mut self, category: &str, name: &str, image: RgbImage) {
        if !self.images_due {
            return;
        }
        self.captures.push(Capture {
            tag: tag(category, name),
            timestep: self.timestep,
            kind: CaptureKind::Image(image),
        });
    }

    fn add_animation(&mut self, category: &str, name: &str, frames: Vec<RgbImage>) {
        if !self.images_due {
            return;
        }
        self.captures.push(Capture {
            tag: tag(category, name),
            timestep: self.timestep,
            kind: CaptureKind::Animation(frames),
        });
    }

    fn update(&mut self, update: &TrainUpdate) {
        self.timestep = update.timestep;
        self.images_due = self.image_period > 0 && update.timestep >= self.next_image_timestep;
        if self.images_due {
            self.next_image_timestep = update.timestep + self.image_period;
        }
    }

    fn print(&mut self, update: &TrainUpdate, total_episodes: u64) {
        info!(
            "Update {} | timestep {} | episodes {}",
            update.update, update.timestep, total_episodes
        );
        for (tag, stats) in &self.stats {
            info!(
                "  {}: mean {:.3} stdev {:.3} min {:.3} max {:.3}",
                tag,
                stats.mean(),
                stats.stdev(),
                stats.min(),
                stats.max()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_keyed_by_category_and_name() {
        let mut logger = MetricsLogger::new();
        logger.add_scalar("environment", "reward", 1.0);
        logger.add_scalar("environment", "reward", 3.0);
        logger.add_scalar("", "loss", 0.5);

        let reward = logger.stats("environment/reward").unwrap();
        assert_eq!(reward.count(), 2);
        assert!((reward.mean() - 2.0).abs() < 1e-9);
        assert_eq!(reward.max(), 3.0);
        assert_eq!(logger.stats("loss").unwrap().mean(), 0.5);

        let tags: Vec<&str> = logger.tags().collect();
        assert_eq!(tags, vec!["environment/reward", "loss"]);
    }

    #[test]
    fn test_captures_stamped_with_timestep() {
        let mut logger = MetricsLogger::new();
        logger.update(&TrainUpdate {
            update: 3,
            timestep: 1200,
        });
        let frame = RgbImage::new(1, 1, vec![9, 9, 9]);
        logger.add_image("observations", "final_frame", frame.clone());
        logger.add_animation("", "episode", vec![frame.clone(), frame]);

        let captures = logger.take_captures();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0].tag, "observations/final_frame");
        assert_eq!(captures[0].timestep, 1200);
        assert_eq!(captures[1].tag, "episode");
        assert!(matches!(&captures[1].kind, CaptureKind::Animation(frames) if frames.len() == 2));
        assert!(logger.take_captures().is_empty());
    }

    #[test]
    fn test_images_limited_to_period() {
        let mut config = ConfigData::new(arcade_rl_core::EnvironmentConfig::new("pong.bin"));
        config.metric_image_log_period = 1000;
        let mut logger = MetricsLogger::from_config(&config);

        let frame = RgbImage::new(1, 1, vec![1, 2, 3]);
        for timestep in [500, 1000, 1600, 2000] {
            logger.update(&TrainUpdate {
                update: 0,
                timestep,
            });
            logger.add_image("observations", "final_frame", frame.clone());
            logger.add_scalar("environment", "reward", 1.0);
        }

        let stamps: Vec<u64> = logger.take_captures().iter().map(|c| c.timestep).collect();
        assert_eq!(stamps, vec![500, 1600]);
        assert_eq!(logger.stats("environment/reward").unwrap().count(), 4);
    }

    #[test]
    fn test_zero_image_period_drops_captures() {
        let mut logger = MetricsLogger::with_image_period(0);
        logger.update(&TrainUpdate::default());
        logger.add_animation("", "episode", vec![RgbImage::new(1, 1, vec![0; 3])]);
        assert!(logger.take_captures().is_empty());
    }
}
