//! Elementwise power transform: `output[i] = input[i] ^ exponent`.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::geometry::{GroupSize, Shape};
use crate::workload::{KernelParams, KernelSource, Workload};

const SHADER: &str = include_str!("../shaders/power.wgsl");

#[derive(Debug, Clone)]
pub struct PowerTransform {
    len: usize,
    exponent: f32,
    tolerance: f32,
    input_range: f32,
    group_size: GroupSize,
}

impl PowerTransform {
    pub fn new(
        len: usize,
        exponent: f32,
        tolerance: f32,
        input_range: f32,
        group_size: GroupSize,
    ) -> Result<Self> {
        if len == 0 {
            return Err(BenchError::configuration("power transform size must be positive"));
        }
        if u32::try_from(len).is_err() {
            return Err(BenchError::configuration(format!(
                "power transform size {} exceeds the 32-bit index space",
                len
            )));
        }
        if !exponent.is_finite() {
            return Err(BenchError::configuration("power exponent must be finite"));
        }
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(BenchError::configuration(
                "power tolerance must be a finite non-negative value",
            ));
        }
        if !(input_range.is_finite() && input_range > 0.0) {
            return Err(BenchError::configuration("power input range must be positive"));
        }
        Ok(Self {
            len,
            exponent,
            tolerance,
            input_range,
            group_size,
        })
    }

    pub fn from_config(config: &BenchConfig) -> Result<Self> {
        Self::new(
            config.power.len,
            config.power.exponent,
            config.power.tolerance,
            config.power.input_range,
            GroupSize::linear(config.linear_group_size),
        )
    }
}

impl Workload for PowerTransform {
    type Elem = f32;

    fn label(&self) -> String {
        format!("Power Transform (n={}, exponent={})", self.len, self.exponent)
    }

    fn shape(&self) -> Shape {
        Shape::Linear(self.len)
    }

    fn generate(&self, rng: &mut StdRng) -> Vec<f32> {
        (0..self.len)
            .map(|_| rng.gen_range(0.0..self.input_range))
            .collect()
    }

    fn host_kernel(&self, input: &[f32], index: usize) -> f32 {
        input[index].powf(self.exponent)
    }

    fn accel_kernel(&self) -> KernelSource {
        KernelSource {
            label: "Power Transform Kernel",
            wgsl: SHADER,
            entry_point: "power_main",
            params: KernelParams {
                len: self.len as u32,
                width: self.len as u32,
                height: 1,
                scalar: self.exponent,
            },
            group_size: self.group_size,
        }
    }

    fn matches(&self, host: f32, accel: f32) -> bool {
        (host - accel).abs() <= self.tolerance
    }
}
