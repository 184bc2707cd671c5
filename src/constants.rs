// Backend Bench Constants - SINGLE SOURCE OF TRUTH
//
// Compiled-in workload parameters. The harness takes no arguments and reads no
// configuration file, so `BenchConfig::default()` is built entirely from here.

/// Seeding for synthetic input generation
pub mod seed {
    pub const DEFAULT_SEED: u64 = 42;
}

/// Elementwise power transform
pub mod power {
    pub const LEN: usize = 500_000;
    pub const EXPONENT: f32 = 0.5;
    /// Absolute tolerance between host and accelerator outputs
    pub const TOLERANCE: f32 = 1e-5;
    /// Inputs are drawn uniformly from [0, INPUT_RANGE)
    pub const INPUT_RANGE: f32 = 10.0;
}

/// Quarter-turn image rotation
pub mod rotation {
    /// Side length of the square byte image
    pub const SIDE: u32 = 512;
}

/// Launch geometry policy
pub mod launch {
    /// Invocations per workgroup for 1-D kernels
    pub const LINEAR_GROUP_SIZE: u32 = 256;
    /// Workgroup edge for 2-D kernels (GRID_GROUP_SIZE x GRID_GROUP_SIZE)
    pub const GRID_GROUP_SIZE: u32 = 16;
    /// WebGPU default `max_compute_invocations_per_workgroup`
    pub const MAX_INVOCATIONS_PER_GROUP: u32 = 256;
}
