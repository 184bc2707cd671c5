pub mod benchmarks;
pub mod config;
pub mod constants;
pub mod error;
pub mod executor;
pub mod geometry;
pub mod gpu;
pub mod workload;

pub use benchmarks::{
    analyze_results, BenchmarkResult, GpuVsCpuBenchmark, JsonSink, ReportSink, TextSink, Verdict,
};
pub use config::{BenchConfig, ReportFormat};
pub use error::{BenchError, FailFast, Result};
pub use executor::{AcceleratorExecutor, Execution, Executor, HostExecutor, TimingSample};
pub use geometry::{compute_geometry, GroupSize, LaunchGeometry, Shape};
pub use gpu::GpuContext;
pub use workload::{Element, KernelSource, PowerTransform, QuarterTurn, Workload};
