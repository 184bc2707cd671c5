use crate::error::Result;
use crate::gpu::buffer_manager::{DeviceBuffer, GpuBufferManager};
use crate::gpu::checked::checked;

const QUERY_COUNT: u32 = 2;
const QUERY_BYTES: wgpu::BufferAddress =
    QUERY_COUNT as wgpu::BufferAddress * wgpu::QUERY_SIZE as wgpu::BufferAddress;

/// Begin/end timestamp pair bracketing one compute pass
pub struct KernelTimer {
    query_set: wgpu::QuerySet,
    resolve: DeviceBuffer,
    staging: DeviceBuffer,
    period_ns: f32,
}

impl KernelTimer {
    pub fn new(buffers: &GpuBufferManager) -> Result<Self> {
        let device = buffers.device();
        let query_set = checked(device, "create timestamp query set", || {
            device.create_query_set(&wgpu::QuerySetDescriptor {
                label: Some("Kernel Timestamp Query Set"),
                ty: wgpu::QueryType::Timestamp,
                count: QUERY_COUNT,
            })
        })?;

        let resolve = buffers.allocate(
            "allocate timestamp buffer",
            "Timestamp Resolve Buffer",
            QUERY_BYTES,
            wgpu::BufferUsages::QUERY_RESOLVE | wgpu::BufferUsages::COPY_SRC,
        )?;
        let staging = buffers.create_staging("Timestamp Staging Buffer", QUERY_BYTES)?;

        Ok(Self {
            query_set,
            resolve,
            staging,
            period_ns: buffers.queue().get_timestamp_period(),
        })
    }

    /// Timestamp writes for the compute pass being timed
    pub fn pass_writes(&self) -> wgpu::ComputePassTimestampWrites<'_> {
        wgpu::ComputePassTimestampWrites {
            query_set: &self.query_set,
            beginning_of_pass_write_index: Some(0),
            end_of_pass_write_index: Some(1),
        }
    }

    /// Record the resolve and the copy into the staging buffer
    pub fn resolve(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.resolve_query_set(&self.query_set, 0..QUERY_COUNT, self.resolve.buffer(), 0);
        encoder.copy_buffer_to_buffer(
            self.resolve.buffer(),
            0,
            self.staging.buffer(),
            0,
            QUERY_BYTES,
        );
    }

    /// Elapsed kernel time in milliseconds. Call after the submission completes.
    pub fn read_millis(&self, buffers: &GpuBufferManager) -> Result<f64> {
        let ticks: Vec<u64> = buffers.map_read(&self.staging)?;
        Ok(ticks_to_millis(ticks[0], ticks[1], self.period_ns))
    }
}

pub fn ticks_to_millis(begin: u64, end: u64, period_ns: f32) -> f64 {
    end.saturating_sub(begin) as f64 * period_ns as f64 / 1_000_000.0
}
