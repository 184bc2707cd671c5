//! Report sinks.
//!
//! Sinks only format what the runner hands them. Field order is fixed so two
//! runs of the same workload produce blocks that differ only in their timings.

use std::io::Write;

use crate::benchmarks::compare::VerdictSummary;
use crate::benchmarks::gpu_vs_cpu_compute::{BenchmarkResult, Summary};
use crate::error::Result;
use crate::executor::{Backend, Clock, TimingSample};

pub trait ReportSink {
    /// Write the block for one finished workload
    fn emit(&mut self, result: &BenchmarkResult) -> Result<()>;

    /// Write the end-of-run summary
    fn finish(&mut self, summary: &Summary) -> Result<()>;
}

/// Fixed-format text blocks, one per workload
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn format_time(sample: &TimingSample) -> String {
    format!("{:.2} ms", sample.millis)
}

fn format_speedup(speedup: Option<f64>) -> String {
    match speedup {
        Some(x) => format!("{:.1}x", x),
        None => "n/a".to_string(),
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn emit(&mut self, result: &BenchmarkResult) -> Result<()> {
        let cpu = Backend::Host.short_name();
        let gpu = Backend::Accelerator.short_name();

        writeln!(self.out, "=== {} ===", result.operation)?;
        writeln!(self.out, "{} time: {}", cpu, format_time(&result.cpu_time))?;
        write!(self.out, "{} time: {}", gpu, format_time(&result.gpu_time))?;
        if result.gpu_time.clock == Clock::HostClock {
            write!(self.out, " (host clock)")?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} time (with transfer): {}",
            gpu,
            format_time(&result.gpu_time_with_transfer)
        )?;
        writeln!(
            self.out,
            "Speedup: {} ({} with transfer)",
            format_speedup(result.speedup()),
            format_speedup(result.speedup_with_transfer())
        )?;
        writeln!(
            self.out,
            "Results match: {}",
            if result.verdict.is_match() { "Yes" } else { "No" }
        )?;
        match &result.verdict {
            VerdictSummary::Match { .. } => {}
            VerdictSummary::Mismatch { index, host, accel } => {
                writeln!(
                    self.out,
                    "First mismatch: index {}, {} = {}, {} = {}",
                    index, cpu, host, gpu, accel
                )?;
            }
            VerdictSummary::LengthMismatch { host_len, accel_len } => {
                writeln!(
                    self.out,
                    "Length mismatch: {} = {}, {} = {}",
                    cpu, host_len, gpu, accel_len
                )?;
            }
        }
        if let Some(sample) = &result.sample {
            writeln!(
                self.out,
                "Sample: A[0] = {}, {}[0] = {}, {}[0] = {}",
                sample.input, cpu, sample.host, gpu, sample.accel
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self, summary: &Summary) -> Result<()> {
        writeln!(self.out, "=== Summary ===")?;
        writeln!(
            self.out,
            "Workloads: {}, matched: {}, mismatched: {}",
            summary.total, summary.matched, summary.mismatched
        )?;
        writeln!(
            self.out,
            "GPU faster: {}, CPU faster: {}, too close to call: {}",
            summary.gpu_faster, summary.cpu_faster, summary.too_close
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per line
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, result: &BenchmarkResult) -> Result<()> {
        serde_json::to_writer(&mut self.out, result)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self, summary: &Summary) -> Result<()> {
        serde_json::to_writer(&mut self.out, &serde_json::json!({ "summary": summary }))?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::gpu_vs_cpu_compute::{analyze_results, SampleTriple};

    fn result(verdict: VerdictSummary) -> BenchmarkResult {
        BenchmarkResult {
            operation: "Power Transform (n=4, exponent=0.5)".to_string(),
            elements: 4,
            cpu_time: TimingSample { millis: 12.346, clock: Clock::HostClock },
            gpu_time: TimingSample { millis: 0.5, clock: Clock::DeviceTimestamp },
            gpu_time_with_transfer: TimingSample { millis: 3.0, clock: Clock::HostClock },
            verdict,
            sample: Some(SampleTriple {
                input: "4".to_string(),
                host: "2".to_string(),
                accel: "2".to_string(),
            }),
        }
    }

    fn render(result: &BenchmarkResult) -> String {
        let mut sink = TextSink::new(Vec::new());
        sink.emit(result).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_text_block_layout() {
        let text = render(&result(VerdictSummary::Match { checked: 4 }));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== Power Transform (n=4, exponent=0.5) ===");
        assert_eq!(lines[1], "CPU time: 12.35 ms");
        assert_eq!(lines[2], "GPU time: 0.50 ms");
        assert_eq!(lines[3], "GPU time (with transfer): 3.00 ms");
        assert_eq!(lines[4], "Speedup: 24.7x (4.1x with transfer)");
        assert_eq!(lines[5], "Results match: Yes");
        assert_eq!(lines[6], "Sample: A[0] = 4, CPU[0] = 2, GPU[0] = 2");
    }

    #[test]
    fn test_text_mismatch_details() {
        let text = render(&result(VerdictSummary::Mismatch {
            index: 3,
            host: "1.5".to_string(),
            accel: "1.6".to_string(),
        }));
        assert!(text.contains("Results match: No\n"));
        assert!(text.contains("First mismatch: index 3, CPU = 1.5, GPU = 1.6\n"));
    }

    #[test]
    fn test_host_clock_fallback_is_labelled() {
        let mut r = result(VerdictSummary::Match { checked: 4 });
        r.gpu_time.clock = Clock::HostClock;
        assert!(render(&r).contains("GPU time: 0.50 ms (host clock)\n"));
    }

    #[test]
    fn test_text_summary() {
        let results = vec![
            result(VerdictSummary::Match { checked: 4 }),
            result(VerdictSummary::LengthMismatch { host_len: 4, accel_len: 3 }),
        ];
        let mut sink = TextSink::new(Vec::new());
        sink.finish(&analyze_results(&results)).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains("Workloads: 2, matched: 1, mismatched: 1"));
    }

    #[test]
    fn test_json_lines() {
        let mut sink = JsonSink::new(Vec::new());
        sink.emit(&result(VerdictSummary::Match { checked: 4 })).unwrap();
        sink.finish(&analyze_results(&[result(VerdictSummary::Match { checked: 4 })]))
            .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let block: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(block["operation"], "Power Transform (n=4, exponent=0.5)");
        assert_eq!(block["verdict"]["status"], "match");
        assert_eq!(block["gpu_time"]["clock"], "device_timestamp");

        let summary: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(summary["summary"]["matched"], 1);
    }
}
