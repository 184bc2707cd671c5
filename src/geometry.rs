//! Input shapes and launch geometry.
//!
//! `compute_geometry` is pure: it partitions an input shape into workgroups by
//! ceiling division. Every WGSL kernel applies the same bounds check as
//! [`LaunchGeometry::global_index`], so units past the edge of the input write
//! nothing.

use serde::Serialize;

use crate::error::{BenchError, Result};

/// Logical shape of a workload's input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    Linear(usize),
    Grid { width: u32, height: u32 },
}

impl Shape {
    pub fn len(&self) -> usize {
        match *self {
            Shape::Linear(len) => len,
            Shape::Grid { width, height } => width as usize * height as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Invocations per workgroup along x and y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSize {
    pub x: u32,
    pub y: u32,
}

impl GroupSize {
    pub const fn linear(x: u32) -> Self {
        Self { x, y: 1 }
    }

    pub const fn square(edge: u32) -> Self {
        Self { x: edge, y: edge }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchGeometry {
    pub shape: Shape,
    pub group_size: [u32; 2],
    pub group_count: [u32; 2],
}

/// Partition `shape` into workgroups of `group_size`.
///
/// 1-D shapes ignore `group_size.y` and launch a single row of groups.
pub fn compute_geometry(shape: Shape, group_size: GroupSize) -> Result<LaunchGeometry> {
    if shape.is_empty() {
        return Err(BenchError::configuration("cannot launch over an empty input"));
    }

    match shape {
        Shape::Linear(len) => {
            if group_size.x == 0 {
                return Err(BenchError::configuration("group size must be positive"));
            }
            let len = u32::try_from(len).map_err(|_| {
                BenchError::configuration(format!(
                    "input of {} elements exceeds the 32-bit index space",
                    len
                ))
            })?;
            Ok(LaunchGeometry {
                shape,
                group_size: [group_size.x, 1],
                group_count: [len.div_ceil(group_size.x), 1],
            })
        }
        Shape::Grid { width, height } => {
            if group_size.x == 0 || group_size.y == 0 {
                return Err(BenchError::configuration("group size must be positive"));
            }
            if width.checked_mul(height).is_none() {
                return Err(BenchError::configuration(format!(
                    "{}x{} grid exceeds the 32-bit index space",
                    width, height
                )));
            }
            Ok(LaunchGeometry {
                shape,
                group_size: [group_size.x, group_size.y],
                group_count: [width.div_ceil(group_size.x), height.div_ceil(group_size.y)],
            })
        }
    }
}

impl LaunchGeometry {
    /// Total launch units, including guarded ones past the input edge
    pub fn unit_count(&self) -> u64 {
        (0..2)
            .map(|d| self.group_size[d] as u64 * self.group_count[d] as u64)
            .product()
    }

    /// Output index written by the unit at `group`/`local`, or `None` when the
    /// unit falls outside the input and must do nothing.
    pub fn global_index(&self, group: [u32; 2], local: [u32; 2]) -> Option<usize> {
        let gx = group[0] as u64 * self.group_size[0] as u64 + local[0] as u64;
        let gy = group[1] as u64 * self.group_size[1] as u64 + local[1] as u64;
        match self.shape {
            Shape::Linear(len) => (gy == 0 && gx < len as u64).then_some(gx as usize),
            Shape::Grid { width, height } => (gx < width as u64 && gy < height as u64)
                .then(|| (gy * width as u64 + gx) as usize),
        }
    }

    /// Reject dispatches the device cannot express
    pub fn check_limits(&self, max_groups_per_dimension: u32) -> Result<()> {
        for (axis, &count) in ["x", "y"].iter().zip(self.group_count.iter()) {
            if count > max_groups_per_dimension {
                return Err(BenchError::configuration(format!(
                    "{} workgroups along {} exceeds the device limit of {}",
                    count, axis, max_groups_per_dimension
                )));
            }
        }
        Ok(())
    }
}
