//! GPU vs CPU Compute Benchmark Module
//!
//! Runs every registered workload once on the host and once on the accelerator,
//! over the same seeded input, and checks that the two outputs agree under the
//! workload's equality rule.
//!
//! Workloads run strictly one after another. Within a workload the host run
//! completes before the accelerator run starts, so the two timing windows never
//! share a compute resource.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::benchmarks::compare::{compare, VerdictSummary};
use crate::benchmarks::report::ReportSink;
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::executor::{AcceleratorExecutor, Executor, HostExecutor, TimingSample};
use crate::gpu::GpuContext;
use crate::workload::{PowerTransform, QuarterTurn, Workload};

/// Speedups beyond these bounds count as a win for one backend
const WIN_THRESHOLD: f64 = 1.2;
const LOSS_THRESHOLD: f64 = 0.8;

/// First element of the input and of each output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleTriple {
    pub input: String,
    pub host: String,
    pub accel: String,
}

/// Benchmark results for a single workload
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub operation: String,
    pub elements: usize,
    pub cpu_time: TimingSample,
    pub gpu_time: TimingSample,
    pub gpu_time_with_transfer: TimingSample,
    pub verdict: VerdictSummary,
    pub sample: Option<SampleTriple>,
}

impl BenchmarkResult {
    pub fn speedup(&self) -> Option<f64> {
        ratio(self.cpu_time.millis, self.gpu_time.millis)
    }

    pub fn speedup_with_transfer(&self) -> Option<f64> {
        ratio(self.cpu_time.millis, self.gpu_time_with_transfer.millis)
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

/// A workload with its element type erased, runnable on a fixed executor pair
pub trait Benchmark<H, A> {
    fn name(&self) -> String;

    fn run(&self, seed: u64, host: &H, accel: &A) -> Result<BenchmarkResult>;
}

impl<W, H, A> Benchmark<H, A> for W
where
    W: Workload,
    H: Executor,
    A: Executor,
{
    fn name(&self) -> String {
        self.label()
    }

    fn run(&self, seed: u64, host: &H, accel: &A) -> Result<BenchmarkResult> {
        run_workload(self, seed, host, accel)
    }
}

/// Generate, execute on both backends, compare. Every buffer is dropped on return.
pub fn run_workload<W, H, A>(
    workload: &W,
    seed: u64,
    host: &H,
    accel: &A,
) -> Result<BenchmarkResult>
where
    W: Workload,
    H: Executor,
    A: Executor,
{
    let operation = workload.label();
    let expected = workload.shape().len();

    let mut rng = StdRng::seed_from_u64(seed);
    let input = workload.generate(&mut rng);
    if input.is_empty() || input.len() != expected {
        return Err(BenchError::configuration(format!(
            "{}: generator produced {} elements, shape requires {}",
            operation,
            input.len(),
            expected
        )));
    }

    log::info!("Running {} on {}", operation, host.backend());
    let host_run = host.execute(workload, &input)?;

    log::info!("Running {} on {}", operation, accel.backend());
    let accel_run = accel.execute(workload, &input)?;

    let verdict = compare(&host_run.output, &accel_run.output, |h, a| workload.matches(h, a));
    if !verdict.is_match() {
        log::warn!("{}: outputs disagree: {:?}", operation, verdict);
    }

    let sample = match (input.first(), host_run.output.first(), accel_run.output.first()) {
        (Some(input), Some(host), Some(accel)) => Some(SampleTriple {
            input: input.to_string(),
            host: host.to_string(),
            accel: accel.to_string(),
        }),
        _ => None,
    };

    Ok(BenchmarkResult {
        operation,
        elements: input.len(),
        cpu_time: host_run.kernel,
        gpu_time: accel_run.kernel,
        gpu_time_with_transfer: accel_run.total,
        verdict: VerdictSummary::from(&verdict),
        sample,
    })
}

/// Main benchmark runner
pub struct GpuVsCpuBenchmark<H = HostExecutor, A = AcceleratorExecutor> {
    config: BenchConfig,
    host: H,
    accel: A,
    workloads: Vec<Box<dyn Benchmark<H, A>>>,
}

impl GpuVsCpuBenchmark {
    /// Validate `config`, acquire the GPU and register the built-in workloads
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let context = GpuContext::new()?;
        log::info!("Running on: {}", context.describe());

        let accel = AcceleratorExecutor::new(context);
        let mut benchmark = Self::with_executors(config, HostExecutor, accel);
        benchmark.register_defaults()?;
        Ok(benchmark)
    }
}

impl<H: Executor, A: Executor> GpuVsCpuBenchmark<H, A> {
    pub fn with_executors(config: BenchConfig, host: H, accel: A) -> Self {
        Self {
            config,
            host,
            accel,
            workloads: Vec::new(),
        }
    }

    pub fn register<W: Workload + 'static>(&mut self, workload: W) {
        self.workloads.push(Box::new(workload));
    }

    /// Power transform followed by image rotation
    pub fn register_defaults(&mut self) -> Result<()> {
        self.config.validate()?;
        let power = PowerTransform::from_config(&self.config)?;
        let rotation = QuarterTurn::from_config(&self.config)?;
        self.register(power);
        self.register(rotation);
        Ok(())
    }

    pub fn workload_labels(&self) -> Vec<String> {
        self.workloads.iter().map(|w| w.name()).collect()
    }

    /// Run all workloads in registration order.
    ///
    /// Stops at the first error; a mismatch is reported and the run continues.
    pub fn run_all(&self, sink: &mut dyn ReportSink) -> Result<Vec<BenchmarkResult>> {
        let mut results = Vec::with_capacity(self.workloads.len());

        for workload in &self.workloads {
            let result = workload.run(self.config.seed, &self.host, &self.accel)?;
            sink.emit(&result)?;
            results.push(result);
        }

        sink.finish(&analyze_results(&results))?;
        Ok(results)
    }
}

/// Aggregate counts over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub gpu_faster: usize,
    pub cpu_faster: usize,
    pub too_close: usize,
}

/// Count verdicts and backend wins, judged on the GPU time including transfers
pub fn analyze_results(results: &[BenchmarkResult]) -> Summary {
    let mut summary = Summary {
        total: results.len(),
        ..Default::default()
    };

    for result in results {
        if result.verdict.is_match() {
            summary.matched += 1;
        } else {
            summary.mismatched += 1;
        }

        match result.speedup_with_transfer() {
            Some(s) if s > WIN_THRESHOLD => summary.gpu_faster += 1,
            Some(s) if s < LOSS_THRESHOLD => summary.cpu_faster += 1,
            _ => summary.too_close += 1,
        }
    }

    summary
}
