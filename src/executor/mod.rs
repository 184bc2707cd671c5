//! The two backends a workload runs on.
//!
//! Both implement [`Executor`]; the runner drives them through the trait and
//! never needs to know which one it holds.

pub mod accelerator;
pub mod host;

pub use accelerator::AcceleratorExecutor;
pub use host::HostExecutor;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::workload::Workload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Host,
    Accelerator,
}

impl Backend {
    /// Column label used in reports
    pub fn short_name(&self) -> &'static str {
        match self {
            Backend::Host => "CPU",
            Backend::Accelerator => "GPU",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Where a timing sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    /// Monotonic host clock around the call
    HostClock,
    /// Device timestamp queries bracketing the compute pass
    DeviceTimestamp,
}

/// Elapsed time of one executor run, in fractional milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingSample {
    pub millis: f64,
    pub clock: Clock,
}

impl TimingSample {
    pub fn host(elapsed: Duration) -> Self {
        Self {
            millis: elapsed.as_secs_f64() * 1000.0,
            clock: Clock::HostClock,
        }
    }

    pub fn device(millis: f64) -> Self {
        Self {
            millis,
            clock: Clock::DeviceTimestamp,
        }
    }
}

/// Output of one executor run
#[derive(Debug, Clone)]
pub struct Execution<T> {
    pub output: Vec<T>,
    /// Kernel-only time
    pub kernel: TimingSample,
    /// Time including allocation and transfers
    pub total: TimingSample,
}

pub trait Executor {
    fn backend(&self) -> Backend;

    /// Run `workload` over `input` and return a same-length output
    fn execute<W: Workload>(&self, workload: &W, input: &[W::Elem]) -> Result<Execution<W::Elem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_sample_in_millis() {
        let sample = TimingSample::host(Duration::from_micros(2_500));
        assert!((sample.millis - 2.5).abs() < 1e-9);
        assert_eq!(sample.clock, Clock::HostClock);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(Backend::Host.to_string(), "CPU");
        assert_eq!(Backend::Accelerator.to_string(), "GPU");
    }
}
