//! Frame codec: raw emulator screens to observation tensors

use arcade_rl_core::{EnvironmentConfig, ImageTensor};
use ndarray::{Array3, s};

/// Converts interleaved screen buffers into CHW image tensors
#[derive(Debug, Clone)]
pub struct FrameCodec {
    config: EnvironmentConfig,
}

impl FrameCodec {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Channels the emulator should be asked for
    pub fn channels(&self) -> usize {
        self.config.channels()
    }

    /// Decode an interleaved (HWC) byte buffer.
    ///
    /// # Panics
    ///
    /// Panics if `raw` does not hold `width * height * channels` bytes.
    pub fn decode(&self, raw: &[u8], width: usize, height: usize, channels: usize) -> ImageTensor {
        assert_eq!(
            raw.len(),
            width * height * channels,
            "screen buffer does not match {}x{}x{}",
            width,
            height,
            channels
        );

        let chw = Array3::from_shape_fn((channels, height, width), |(c, y, x)| {
            raw[(y * width + x) * channels + c]
        });

        if self.config.resize_requested() {
            let (out_w, out_h) = self.config.output_size(width, height);
            let resized = area_resize(&chw.mapv(f32::from), out_h, out_w);
            if self.config.use_float_observations {
                ImageTensor::Float(resized / 255.0)
            } else {
                ImageTensor::Byte(resized.mapv(|v| v.round().clamp(0.0, 255.0) as u8))
            }
        } else if self.config.use_float_observations {
            ImageTensor::Float(chw.mapv(|v| f32::from(v) / 255.0))
        } else {
            ImageTensor::Byte(chw)
        }
    }
}

/// Area interpolation: each output pixel averages the input cells it covers
fn area_resize(src: &Array3<f32>, out_h: usize, out_w: usize) -> Array3<f32> {
    let (channels, in_h, in_w) = src.dim();
    let rows = area_bins(in_h, out_h);
    let cols = area_bins(in_w, out_w);

    Array3::from_shape_fn((channels, out_h, out_w), |(c, oy, ox)| {
        let (y0, y1) = rows[oy];
        let (x0, x1) = cols[ox];
        let window = src.slice(s![c, y0..y1, x0..x1]);
        window.sum() / window.len() as f32
    })
}

/// Half-open input ranges covered by each output index
fn area_bins(input: usize, output: usize) -> Vec<(usize, usize)> {
    (0..output)
        .map(|i| (i * input / output, ((i + 1) * input).div_ceil(output)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(grayscale: bool, resolution: [i32; 2], float: bool) -> FrameCodec {
        let mut config = EnvironmentConfig::new("test.bin");
        config.grayscale = grayscale;
        config.output_resolution = resolution;
        config.use_float_observations = float;
        FrameCodec::new(&config)
    }

    fn bytes(t: ImageTensor) -> Array3<u8> {
        match t {
            ImageTensor::Byte(a) => a,
            ImageTensor::Float(_) => panic!("expected byte tensor"),
        }
    }

    fn floats(t: ImageTensor) -> Array3<f32> {
        match t {
            ImageTensor::Float(a) => a,
            ImageTensor::Byte(_) => panic!("expected float tensor"),
        }
    }

    #[test]
    fn test_rgb_is_channel_first() {
        // 2x1 image: red pixel then blue pixel
        let raw = [255, 0, 0, 0, 0, 255];
        let t = bytes(codec(false, [0, 0], false).decode(&raw, 2, 1, 3));
        assert_eq!(t.dim(), (3, 1, 2));
        assert_eq!(t[[0, 0, 0]], 255);
        assert_eq!(t[[2, 0, 0]], 0);
        assert_eq!(t[[2, 0, 1]], 255);
    }

    #[test]
    fn test_grayscale_single_channel() {
        let c = codec(true, [0, 0], false);
        assert_eq!(c.channels(), 1);
        let t = bytes(c.decode(&[1, 2, 3, 4], 2, 2, 1));
        assert_eq!(t.dim(), (1, 2, 2));
        assert_eq!(t[[0, 1, 0]], 3);
    }

    #[test]
    fn test_float_normalization() {
        let t = floats(codec(true, [0, 0], true).decode(&[0, 51, 255], 3, 1, 1));
        assert_eq!(t[[0, 0, 0]], 0.0);
        assert!((t[[0, 0, 1]] - 0.2).abs() < 1e-6);
        assert_eq!(t[[0, 0, 2]], 1.0);
    }

    #[test]
    fn test_area_downsample_averages() {
        #[rustfmt::skip]
        let raw = [
            0, 4, 10, 10,
            8, 4, 10, 10,
            1, 1, 200, 0,
            1, 1, 0, 0,
        ];
        let t = floats(codec(true, [2, 2], true).decode(&raw, 4, 4, 1));
        assert_eq!(t.dim(), (1, 2, 2));
        assert!((t[[0, 0, 0]] * 255.0 - 4.0).abs() < 1e-3);
        assert!((t[[0, 0, 1]] * 255.0 - 10.0).abs() < 1e-3);
        assert!((t[[0, 1, 0]] * 255.0 - 1.0).abs() < 1e-3);
        assert!((t[[0, 1, 1]] * 255.0 - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_keeps_native_component() {
        let raw = [10, 13, 20, 20];
        let c = codec(true, [1, -1], false);
        let t = bytes(c.decode(&raw, 2, 2, 1));
        assert_eq!(t.dim(), (1, 2, 1));
        // 11.5 is re-quantized to the nearest byte
        assert_eq!(t[[0, 0, 0]], 12);
        assert_eq!(t[[0, 1, 0]], 20);
    }

    #[test]
    fn test_area_upsample_repeats() {
        let t = bytes(codec(true, [4, 1], false).decode(&[10, 30], 2, 1, 1));
        assert_eq!(t.as_slice().unwrap(), &[10, 10, 30, 30]);
    }

    #[test]
    fn test_area_bins_cover_input() {
        assert_eq!(area_bins(4, 2), vec![(0, 2), (2, 4)]);
        assert_eq!(area_bins(5, 2), vec![(0, 3), (2, 5)]);
        assert_eq!(area_bins(3, 3), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    #[should_panic(expected = "screen buffer does not match")]
    fn test_malformed_buffer_panics() {
        codec(false, [0, 0], false).decode(&[0; 5], 2, 1, 3);
    }
}
