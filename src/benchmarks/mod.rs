//! GPU vs CPU benchmark module

pub mod compare;
pub mod gpu_vs_cpu_compute;
pub mod report;

pub use compare::{compare, Verdict, VerdictSummary};
pub use gpu_vs_cpu_compute::{
    analyze_results,
    run_workload,
    Benchmark,
    BenchmarkResult,
    GpuVsCpuBenchmark,
    SampleTriple,
    Summary,
};
pub use report::{JsonSink, ReportSink, TextSink};
