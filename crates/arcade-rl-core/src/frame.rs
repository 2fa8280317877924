//! Image tensors produced by the frame codec

use ndarray::{Array3, Zip, s};
use serde::{Deserialize, Serialize};

/// Element type of an observation tensor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Uint8,
    Float32,
}

/// Channel-first (CHW) image tensor
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTensor {
    /// Byte valued pixels in [0, 255]
    Byte(Array3<u8>),
    /// Normalized pixels in [0, 1]
    Float(Array3<f32>),
}

impl ImageTensor {
    /// Element type
    pub fn dtype(&self) -> DType {
        match self {
            ImageTensor::Byte(_) => DType::Uint8,
            ImageTensor::Float(_) => DType::Float32,
        }
    }

    /// Shape as (channels, height, width)
    pub fn shape(&self) -> (usize, usize, usize) {
        match self {
            ImageTensor::Byte(a) => a.dim(),
            ImageTensor::Float(a) => a.dim(),
        }
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.shape().0
    }

    /// Element-wise maximum of two frames of identical shape and dtype.
    ///
    /// # Panics
    ///
    /// Panics if the frames differ in dtype or shape.
    pub fn maximum(&self, other: &ImageTensor) -> ImageTensor {
        match (self, other) {
            (ImageTensor::Byte(a), ImageTensor::Byte(b)) => {
                ImageTensor::Byte(Zip::from(a).and(b).map_collect(|&x, &y| x.max(y)))
            }
            (ImageTensor::Float(a), ImageTensor::Float(b)) => {
                ImageTensor::Float(Zip::from(a).and(b).map_collect(|&x, &y| x.max(y)))
            }
            _ => panic!("frame dtype mismatch in maximum"),
        }
    }

    /// Concatenate frames along the channel axis, first frame first.
    ///
    /// # Panics
    ///
    /// Panics if `frames` is empty or the frames are not uniform.
    pub fn stack<'a, I>(frames: I) -> ImageTensor
    where
        I: IntoIterator<Item = &'a ImageTensor>,
    {
        let frames: Vec<&ImageTensor> = frames.into_iter().collect();
        assert!(!frames.is_empty(), "cannot stack an empty frame buffer");

        match frames[0] {
            ImageTensor::Byte(_) => {
                let arrays: Vec<&Array3<u8>> = frames
                    .iter()
                    .map(|f| match f {
                        ImageTensor::Byte(a) => a,
                        ImageTensor::Float(_) => panic!("frame dtype mismatch in stack"),
                    })
                    .collect();
                ImageTensor::Byte(stack_channels(&arrays))
            }
            ImageTensor::Float(_) => {
                let arrays: Vec<&Array3<f32>> = frames
                    .iter()
                    .map(|f| match f {
                        ImageTensor::Float(a) => a,
                        ImageTensor::Byte(_) => panic!("frame dtype mismatch in stack"),
                    })
                    .collect();
                ImageTensor::Float(stack_channels(&arrays))
            }
        }
    }

    /// Raw little-endian element bytes in logical (CHW) order
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ImageTensor::Byte(a) => a.iter().copied().collect(),
            ImageTensor::Float(a) => a.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    /// Pixel value at (channel, y, x) rescaled to a byte
    fn byte_at(&self, channel: usize, y: usize, x: usize) -> u8 {
        match self {
            ImageTensor::Byte(a) => a[[channel, y, x]],
            ImageTensor::Float(a) => (a[[channel, y, x]].clamp(0.0, 1.0) * 255.0) as u8,
        }
    }

    /// Convert to an interleaved RGB image for capture.
    ///
    /// One channel is replicated, two channels fill red and green, three are
    /// taken as RGB. Deeper (stacked) tensors render their newest frame: the
    /// last three channels when the depth is a multiple of three, otherwise
    /// the last channel as grayscale.
    pub fn to_rgb8(&self, invert: bool) -> RgbImage {
        let (c, h, w) = self.shape();
        let picks: [Option<usize>; 3] = match c {
            0 => [None; 3],
            1 => [Some(0); 3],
            2 => [Some(0), Some(1), None],
            c if c % 3 == 0 => [Some(c - 3), Some(c - 2), Some(c - 1)],
            c => [Some(c - 1); 3],
        };

        let mut data = Vec::with_capacity(h * w * 3);
        for y in 0..h {
            for x in 0..w {
                for pick in picks {
                    let v = pick.map(|ch| self.byte_at(ch, y, x)).unwrap_or(0);
                    data.push(if invert { u8::MAX - v } else { v });
                }
            }
        }
        RgbImage::new(w, h, data)
    }
}

fn stack_channels<T: Copy + Default>(frames: &[&Array3<T>]) -> Array3<T> {
    let (c, h, w) = frames[0].dim();
    let mut out = Array3::from_elem((c * frames.len(), h, w), T::default());
    for (i, frame) in frames.iter().enumerate() {
        out.slice_mut(s![i * c..(i + 1) * c, .., ..]).assign(*frame);
    }
    out
}

/// Interleaved (HWC) 8-bit RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Wrap an interleaved RGB buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data` does not hold exactly `width * height * 3` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width * height * 3,
            "RGB buffer does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// RGB triple at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
