use std::time::Instant;

use crate::error::Result;
use crate::executor::{Backend, Execution, Executor, TimingSample};
use crate::workload::Workload;

/// Runs the reference kernel inline on the calling thread, in index order
#[derive(Debug, Clone, Copy, Default)]
pub struct HostExecutor;

impl Executor for HostExecutor {
    fn backend(&self) -> Backend {
        Backend::Host
    }

    fn execute<W: Workload>(&self, workload: &W, input: &[W::Elem]) -> Result<Execution<W::Elem>> {
        let start = Instant::now();
        let mut output = Vec::with_capacity(input.len());
        for index in 0..input.len() {
            output.push(workload.host_kernel(input, index));
        }
        let elapsed = TimingSample::host(start.elapsed());

        log::debug!(
            "[HostExecutor] {} finished in {:.3} ms",
            workload.label(),
            elapsed.millis
        );

        Ok(Execution {
            output,
            kernel: elapsed,
            total: elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GroupSize;
    use crate::workload::{PowerTransform, QuarterTurn};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_power_matches_oracle() {
        let workload = PowerTransform::new(1000, 0.5, 1e-5, 10.0, GroupSize::linear(256)).unwrap();
        let input = workload.generate(&mut StdRng::seed_from_u64(42));
        let run = HostExecutor.execute(&workload, &input).unwrap();

        assert_eq!(run.output.len(), input.len());
        for (x, y) in input.iter().zip(&run.output) {
            assert_eq!(*y, x.powf(0.5));
        }
        assert!(run.kernel.millis >= 0.0);
    }

    #[test]
    fn test_rotation_mapping() {
        let side = 32u32;
        let workload = QuarterTurn::square(side, GroupSize::square(16)).unwrap();
        let input = workload.generate(&mut StdRng::seed_from_u64(42));
        let run = HostExecutor.execute(&workload, &input).unwrap();

        let s = side as usize;
        for y in 0..s {
            for x in 0..s {
                assert_eq!(run.output[y * s + x], input[(s - x - 1) * s + y]);
            }
        }
    }
}
