//! Backend Bench executable
//!
//! Runs each built-in workload once on the CPU and once on the GPU, checks the
//! outputs agree and prints one report block per workload. Exits non-zero on any
//! configuration error or accelerator fault.

use std::io::{self, Write};

use anyhow::Context;
use backend_bench::{
    BenchConfig, FailFast, GpuVsCpuBenchmark, JsonSink, ReportFormat, ReportSink, TextSink,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let format = ReportFormat::from_env().or_exit();
    let config = BenchConfig::default();
    let benchmark = GpuVsCpuBenchmark::new(config).or_exit();

    let stdout = io::stdout();
    let mut sink: Box<dyn ReportSink> = match format {
        ReportFormat::Text => Box::new(TextSink::new(stdout.lock())),
        ReportFormat::Json => Box::new(JsonSink::new(stdout.lock())),
    };

    let results = benchmark.run_all(sink.as_mut()).or_exit();
    drop(sink);
    log::info!("Completed {} workloads", results.len());

    io::stdout().flush().context("failed to flush report to stdout")?;
    Ok(())
}
