//! Element-by-element comparison of host and accelerator outputs.

use std::fmt;

/// Outcome of comparing two outputs
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<T> {
    Match { checked: usize },
    Mismatch { index: usize, host: T, accel: T },
    LengthMismatch { host_len: usize, accel_len: usize },
}

impl<T> Verdict<T> {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match { .. })
    }
}

/// Scan in index order and stop at the first element `matches` rejects
pub fn compare<T, F>(host: &[T], accel: &[T], matches: F) -> Verdict<T>
where
    T: Copy,
    F: Fn(T, T) -> bool,
{
    if host.len() != accel.len() {
        return Verdict::LengthMismatch {
            host_len: host.len(),
            accel_len: accel.len(),
        };
    }

    match host
        .iter()
        .zip(accel)
        .position(|(&h, &a)| !matches(h, a))
    {
        Some(index) => Verdict::Mismatch {
            index,
            host: host[index],
            accel: accel[index],
        },
        None => Verdict::Match { checked: host.len() },
    }
}

/// Type-erased verdict carried in reports
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerdictSummary {
    Match { checked: usize },
    Mismatch { index: usize, host: String, accel: String },
    LengthMismatch { host_len: usize, accel_len: usize },
}

impl VerdictSummary {
    pub fn is_match(&self) -> bool {
        matches!(self, VerdictSummary::Match { .. })
    }
}

impl<T: fmt::Display> From<&Verdict<T>> for VerdictSummary {
    fn from(verdict: &Verdict<T>) -> Self {
        match verdict {
            Verdict::Match { checked } => VerdictSummary::Match { checked: *checked },
            Verdict::Mismatch { index, host, accel } => VerdictSummary::Mismatch {
                index: *index,
                host: host.to_string(),
                accel: accel.to_string(),
            },
            Verdict::LengthMismatch { host_len, accel_len } => VerdictSummary::LengthMismatch {
                host_len: *host_len,
                accel_len: *accel_len,
            },
        }
    }
}
