//! Quarter-turn rotation of a square byte image.
//!
//! `output[y * w + x] = input[(h - x - 1) * w + y]`. The mapping is only a true
//! 90 degree rotation when `w == h`, so rectangular images are rejected.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::geometry::{GroupSize, Shape};
use crate::workload::{KernelParams, KernelSource, Workload};

const SHADER: &str = include_str!("../shaders/quarter_turn.wgsl");

#[derive(Debug, Clone)]
pub struct QuarterTurn {
    width: u32,
    height: u32,
    group_size: GroupSize,
}

impl QuarterTurn {
    pub fn new(width: u32, height: u32, group_size: GroupSize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BenchError::configuration("rotation image must be non-empty"));
        }
        if width != height {
            return Err(BenchError::configuration(format!(
                "quarter-turn requires a square image, got {}x{}",
                width, height
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(BenchError::configuration(format!(
                "{}x{} image exceeds the 32-bit index space",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            group_size,
        })
    }

    pub fn square(side: u32, group_size: GroupSize) -> Result<Self> {
        Self::new(side, side, group_size)
    }

    pub fn from_config(config: &BenchConfig) -> Result<Self> {
        Self::square(config.rotation.side, GroupSize::square(config.grid_group_size))
    }

    /// Source index read for destination pixel (x, y)
    pub fn source_index(&self, x: u32, y: u32) -> usize {
        (self.height - x - 1) as usize * self.width as usize + y as usize
    }
}

impl Workload for QuarterTurn {
    type Elem = u8;

    fn label(&self) -> String {
        format!("Image Rotation ({}x{})", self.width, self.height)
    }

    fn shape(&self) -> Shape {
        Shape::Grid {
            width: self.width,
            height: self.height,
        }
    }

    fn generate(&self, rng: &mut StdRng) -> Vec<u8> {
        (0..self.shape().len()).map(|_| rng.gen()).collect()
    }

    fn host_kernel(&self, input: &[u8], index: usize) -> u8 {
        let x = (index % self.width as usize) as u32;
        let y = (index / self.width as usize) as u32;
        input[self.source_index(x, y)]
    }

    fn accel_kernel(&self) -> KernelSource {
        KernelSource {
            label: "Quarter Turn Kernel",
            wgsl: SHADER,
            entry_point: "quarter_turn_main",
            params: KernelParams {
                len: self.width * self.height,
                width: self.width,
                height: self.height,
                scalar: 0.0,
            },
            group_size: self.group_size,
        }
    }

    fn matches(&self, host: u8, accel: u8) -> bool {
        host == accel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rotate(w: &QuarterTurn, input: &[u8]) -> Vec<u8> {
        (0..input.len()).map(|i| w.host_kernel(input, i)).collect()
    }

    #[test]
    fn test_two_by_two_rotation() {
        // a b      c a
        // c d  ->  d b
        let w = QuarterTurn::square(2, GroupSize::square(16)).unwrap();
        assert_eq!(rotate(&w, &[1, 2, 3, 4]), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_four_turns_restore_image() {
        let w = QuarterTurn::square(8, GroupSize::square(16)).unwrap();
        let original = w.generate(&mut StdRng::seed_from_u64(42));
        let mut image = original.clone();
        for _ in 0..4 {
            image = rotate(&w, &image);
        }
        assert_eq!(image, original);
    }

    #[test]
    fn test_rotation_is_a_permutation() {
        let w = QuarterTurn::square(16, GroupSize::square(16)).unwrap();
        let input: Vec<u8> = (0..=255).collect();
        let mut output = rotate(&w, &input);
        output.sort_unstable();
        assert_eq!(output, input);
    }

    #[test]
    fn test_rectangular_rejected() {
        assert!(matches!(
            QuarterTurn::new(4, 2, GroupSize::square(16)),
            Err(BenchError::Configuration(_))
        ));
        assert!(QuarterTurn::square(0, GroupSize::square(16)).is_err());
    }

    #[test]
    fn test_oversized_image_rejected() {
        assert!(matches!(
            QuarterTurn::square(70_000, GroupSize::square(16)),
            Err(BenchError::Configuration(_))
        ));
        // 65535^2 still fits in u32
        let w = QuarterTurn::square(65_535, GroupSize::square(16)).unwrap();
        assert_eq!(w.accel_kernel().params.len, 65_535 * 65_535);
    }

    #[test]
    fn test_exact_equality() {
        let w = QuarterTurn::square(2, GroupSize::square(16)).unwrap();
        assert!(w.matches(7, 7));
        assert!(!w.matches(7, 8));
    }

    #[test]
    fn test_generated_len() {
        let w = QuarterTurn::square(512, GroupSize::square(16)).unwrap();
        assert_eq!(w.generate(&mut StdRng::seed_from_u64(42)).len(), 512 * 512);
    }
}
