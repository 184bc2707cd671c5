/// GPU Compute Validation Tests
///
/// Runs the built-in kernels on a real adapter and checks them against the host
/// reference. Every test skips when no GPU adapter is available.
use backend_bench::benchmarks::run_workload;
use backend_bench::executor::Clock;
use backend_bench::{
    AcceleratorExecutor, BenchConfig, Executor, GpuContext, GpuVsCpuBenchmark, GroupSize,
    HostExecutor, PowerTransform, QuarterTurn, TextSink, Workload,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tolerance for floating point comparisons
const FLOAT_TOLERANCE: f32 = 1e-5;

fn init_gpu() -> Option<AcceleratorExecutor> {
    match GpuContext::new() {
        Ok(context) => Some(AcceleratorExecutor::new(context)),
        Err(e) => {
            println!("GPU unavailable: {}", e);
            None
        }
    }
}

#[test]
fn test_gpu_power_transform_within_tolerance() {
    let Some(gpu) = init_gpu() else {
        println!("Skipping GPU test - no GPU available");
        return;
    };

    let workload = PowerTransform::from_config(&BenchConfig::default()).unwrap();
    let input = workload.generate(&mut StdRng::seed_from_u64(42));
    let host = HostExecutor.execute(&workload, &input).unwrap();
    let accel = gpu.execute(&workload, &input).unwrap();

    assert_eq!(host.output.len(), input.len());
    assert_eq!(accel.output.len(), input.len());

    let mut differences = 0;
    for (i, (h, a)) in host.output.iter().zip(&accel.output).enumerate() {
        assert_eq!(*h, input[i].powf(0.5));
        if (h - a).abs() > FLOAT_TOLERANCE {
            differences += 1;
            if differences < 10 {
                println!("Mismatch at {}: CPU={}, GPU={}", i, h, a);
            }
        }
    }
    assert_eq!(
        differences, 0,
        "GPU power transform produced {} out-of-tolerance elements",
        differences
    );
}

#[test]
fn test_gpu_rotation_is_byte_exact() {
    let Some(gpu) = init_gpu() else {
        println!("Skipping GPU test - no GPU available");
        return;
    };

    let side = 512usize;
    let workload = QuarterTurn::from_config(&BenchConfig::default()).unwrap();
    let input = workload.generate(&mut StdRng::seed_from_u64(42));
    let accel = gpu.execute(&workload, &input).unwrap();

    assert_eq!(accel.output.len(), side * side);
    for y in 0..side {
        for x in 0..side {
            assert_eq!(
                accel.output[y * side + x],
                input[(side - x - 1) * side + y],
                "pixel ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn test_gpu_partial_groups_are_guarded() {
    let Some(gpu) = init_gpu() else {
        println!("Skipping GPU test - no GPU available");
        return;
    };

    // Neither size is a multiple of its workgroup size
    let power =
        PowerTransform::new(1_000, 0.5, FLOAT_TOLERANCE, 10.0, GroupSize::linear(256)).unwrap();
    let result = run_workload(&power, 7, &HostExecutor, &gpu).unwrap();
    assert!(result.verdict.is_match(), "{:?}", result.verdict);

    let rotation = QuarterTurn::square(37, GroupSize::square(16)).unwrap();
    let result = run_workload(&rotation, 7, &HostExecutor, &gpu).unwrap();
    assert!(result.verdict.is_match(), "{:?}", result.verdict);
}

#[test]
fn test_gpu_timing_sample_clock() {
    let Some(gpu) = init_gpu() else {
        println!("Skipping GPU test - no GPU available");
        return;
    };

    let workload =
        PowerTransform::new(4_096, 0.5, FLOAT_TOLERANCE, 10.0, GroupSize::linear(256)).unwrap();
    let input = workload.generate(&mut StdRng::seed_from_u64(42));
    let run = gpu.execute(&workload, &input).unwrap();

    let expected = if gpu.context().supports_timestamps() {
        Clock::DeviceTimestamp
    } else {
        Clock::HostClock
    };
    assert_eq!(run.kernel.clock, expected);
    assert!(run.kernel.millis >= 0.0);
    assert!(run.total.millis >= 0.0);
}

#[test]
fn test_full_harness_reports_match() {
    let bench = match GpuVsCpuBenchmark::new(BenchConfig::default()) {
        Ok(bench) => bench,
        Err(e) => {
            println!("Skipping GPU test - {}", e);
            return;
        }
    };

    let mut sink = TextSink::new(Vec::new());
    let results = bench.run_all(&mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(text.matches("Results match: Yes").count(), 2, "{}", text);
}
