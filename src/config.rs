//! Harness configuration.
//!
//! Every workload parameter is a compiled-in constant; `BenchConfig::default()`
//! is the only configuration the binary uses. Validation runs before any backend
//! is touched so a bad parameter never produces a partial report.

use serde::Serialize;

use crate::constants;
use crate::error::{BenchError, Result};

/// Main harness configuration
#[derive(Debug, Clone, Serialize)]
pub struct BenchConfig {
    /// Seed for every workload's input generator
    pub seed: u64,
    pub power: PowerConfig,
    pub rotation: RotationConfig,
    /// Workgroup size for 1-D kernels
    pub linear_group_size: u32,
    /// Workgroup edge for 2-D kernels
    pub grid_group_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerConfig {
    pub len: usize,
    pub exponent: f32,
    pub tolerance: f32,
    pub input_range: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RotationConfig {
    pub side: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            seed: constants::seed::DEFAULT_SEED,
            power: PowerConfig {
                len: constants::power::LEN,
                exponent: constants::power::EXPONENT,
                tolerance: constants::power::TOLERANCE,
                input_range: constants::power::INPUT_RANGE,
            },
            rotation: RotationConfig {
                side: constants::rotation::SIDE,
            },
            linear_group_size: constants::launch::LINEAR_GROUP_SIZE,
            grid_group_size: constants::launch::GRID_GROUP_SIZE,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.power.len == 0 {
            return Err(BenchError::configuration("power transform size must be positive"));
        }
        if u32::try_from(self.power.len).is_err() {
            return Err(BenchError::configuration(format!(
                "power transform size {} exceeds the 32-bit index space",
                self.power.len
            )));
        }
        if !self.power.exponent.is_finite() {
            return Err(BenchError::configuration("power exponent must be finite"));
        }
        if !(self.power.tolerance.is_finite() && self.power.tolerance >= 0.0) {
            return Err(BenchError::configuration(
                "power tolerance must be a finite non-negative value",
            ));
        }
        if !(self.power.input_range.is_finite() && self.power.input_range > 0.0) {
            return Err(BenchError::configuration("power input range must be positive"));
        }
        if self.rotation.side == 0 {
            return Err(BenchError::configuration("rotation side must be positive"));
        }
        if self.rotation.side.checked_mul(self.rotation.side).is_none() {
            return Err(BenchError::configuration(format!(
                "rotation side {} exceeds the 32-bit index space",
                self.rotation.side
            )));
        }

        let max = constants::launch::MAX_INVOCATIONS_PER_GROUP;
        if self.linear_group_size == 0 || self.linear_group_size > max {
            return Err(BenchError::configuration(format!(
                "linear group size must be in 1..={}, got {}",
                max, self.linear_group_size
            )));
        }
        let grid_invocations = self.grid_group_size.saturating_mul(self.grid_group_size);
        if self.grid_group_size == 0 || grid_invocations > max {
            return Err(BenchError::configuration(format!(
                "grid group size {0}x{0} must hold between 1 and {1} invocations",
                self.grid_group_size, max
            )));
        }
        Ok(())
    }
}

/// Output format for the report sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub const ENV_VAR: &'static str = "BENCH_FORMAT";

    /// Read the format from `BENCH_FORMAT`, defaulting to text when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var(Self::ENV_VAR) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(BenchError::configuration(format!(
                "unknown {} value '{}', expected 'text' or 'json'",
                Self::ENV_VAR,
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.power.len, 500_000);
        assert_eq!(config.power.exponent, 0.5);
        assert_eq!(config.power.tolerance, 1e-5);
        assert_eq!(config.rotation.side, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let mut config = BenchConfig::default();
        config.power.len = 0;
        assert!(matches!(config.validate(), Err(BenchError::Configuration(_))));

        let mut config = BenchConfig::default();
        config.rotation.side = 0;
        assert!(matches!(config.validate(), Err(BenchError::Configuration(_))));
    }

    #[test]
    fn test_oversized_rotation_rejected() {
        let mut config = BenchConfig::default();
        config.rotation.side = 70_000;
        assert!(matches!(config.validate(), Err(BenchError::Configuration(_))));
    }

    #[test]
    fn test_group_sizes_bounded() {
        let mut config = BenchConfig::default();
        config.linear_group_size = 512;
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.grid_group_size = 32;
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.grid_group_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut config = BenchConfig::default();
        config.power.tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!(ReportFormat::parse("text").ok(), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::parse(" JSON ").ok(), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("").ok(), Some(ReportFormat::Text));
        assert!(ReportFormat::parse("xml").is_err());
    }
}
