//! Error taxonomy for the harness.
//!
//! Configuration problems and accelerator faults both terminate the run. A
//! mismatch between backends is a [`Verdict`](crate::benchmarks::Verdict), not an
//! error.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Accelerator fault during {operation}: {message}")]
    AcceleratorFault {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BenchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap a device runtime error with the name of the operation that raised it
    pub fn accelerator(operation: &'static str, error: impl fmt::Display) -> Self {
        Self::AcceleratorFault {
            operation,
            message: error.to_string(),
        }
    }

    pub fn is_accelerator_fault(&self) -> bool {
        matches!(self, Self::AcceleratorFault { .. })
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

/// Terminate the process on error instead of propagating.
///
/// A benchmark whose backend silently failed produces worthless numbers, so the
/// binary never degrades or retries.
pub trait FailFast<T> {
    fn or_exit(self) -> T;
}

impl<T> FailFast<T> for Result<T> {
    fn or_exit(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                log::error!("Aborting: {}", e);
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    }
}
