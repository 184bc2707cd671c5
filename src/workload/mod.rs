//! Workload descriptions.
//!
//! A workload bundles an input shape, a seeded generator, a host reference kernel,
//! the WGSL kernel with the same per-element semantics, and the equality
//! predicate used to compare the two outputs.

pub mod power;
pub mod rotation;

pub use power::PowerTransform;
pub use rotation::QuarterTurn;

use std::fmt;

use rand::rngs::StdRng;

use crate::geometry::{GroupSize, Shape};

/// Host element type with its device-side storage word.
///
/// WGSL storage buffers have no 8-bit type, so bytes travel as one `u32` lane
/// each. Conversion happens outside the timed kernel window.
pub trait Element: Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    type Device: bytemuck::Pod;

    fn to_device(self) -> Self::Device;
    fn from_device(word: Self::Device) -> Self;
}

impl Element for f32 {
    type Device = f32;

    fn to_device(self) -> f32 {
        self
    }

    fn from_device(word: f32) -> Self {
        word
    }
}

impl Element for u8 {
    type Device = u32;

    fn to_device(self) -> u32 {
        self as u32
    }

    fn from_device(word: u32) -> Self {
        (word & 0xFF) as u8
    }
}

/// Uniform block shared by every kernel (binding 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelParams {
    pub len: u32,
    pub width: u32,
    pub height: u32,
    pub scalar: f32,
}

/// Accelerator half of a workload.
///
/// Every kernel binds `params` at 0, the read-only input at 1 and the output at
/// 2. `${GROUP_X}` and `${GROUP_Y}` placeholders in the source are filled from
/// `group_size` before compilation.
#[derive(Debug, Clone)]
pub struct KernelSource {
    pub label: &'static str,
    pub wgsl: &'static str,
    pub entry_point: &'static str,
    pub params: KernelParams,
    pub group_size: GroupSize,
}

pub trait Workload {
    type Elem: Element;

    fn label(&self) -> String;

    fn shape(&self) -> Shape;

    /// Produce `shape().len()` input values. Must be deterministic for a given
    /// RNG state.
    fn generate(&self, rng: &mut StdRng) -> Vec<Self::Elem>;

    /// Reference value of output element `index`
    fn host_kernel(&self, input: &[Self::Elem], index: usize) -> Self::Elem;

    fn accel_kernel(&self) -> KernelSource;

    fn matches(&self, host: Self::Elem, accel: Self::Elem) -> bool;
}
