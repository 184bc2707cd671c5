//! Device buffer allocation, upload and readback

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::error::{BenchError, Result};
use crate::gpu::checked::checked;

/// Device allocation released when dropped.
///
/// Device buffers live for exactly one accelerator run.
pub struct DeviceBuffer {
    buffer: wgpu::Buffer,
    size: wgpu::BufferAddress,
    label: String,
}

impl DeviceBuffer {
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        log::debug!("[GpuBufferManager] Releasing {} ({} bytes)", self.label, self.size);
        self.buffer.destroy();
    }
}

/// Creates and transfers the buffers an accelerator run needs
pub struct GpuBufferManager {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl GpuBufferManager {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }

    /// Allocate a read-only storage buffer and copy `data` host -> device
    pub fn upload_storage<T: bytemuck::Pod>(
        &self,
        label: &str,
        data: &[T],
    ) -> Result<DeviceBuffer> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let buffer = self.allocate(
            "allocate input buffer",
            label,
            bytes.len() as wgpu::BufferAddress,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )?;

        checked(&self.device, "copy input host->device", || {
            self.queue.write_buffer(&buffer.buffer, 0, bytes);
        })?;

        Ok(buffer)
    }

    /// Allocate a writable storage buffer the kernel fills
    pub fn create_storage_output(
        &self,
        label: &str,
        size: wgpu::BufferAddress,
    ) -> Result<DeviceBuffer> {
        self.allocate(
            "allocate output buffer",
            label,
            size,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        )
    }

    pub fn create_uniform<T: bytemuck::Pod>(&self, label: &str, data: &T) -> Result<DeviceBuffer> {
        let bytes = bytemuck::bytes_of(data);
        log::debug!("[GpuBufferManager] Creating uniform {} ({} bytes)", label, bytes.len());

        let buffer = checked(&self.device, "allocate uniform buffer", || {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        })?;

        Ok(DeviceBuffer {
            buffer,
            size: bytes.len() as wgpu::BufferAddress,
            label: label.to_string(),
        })
    }

    /// Host-mappable buffer for readback
    pub fn create_staging(&self, label: &str, size: wgpu::BufferAddress) -> Result<DeviceBuffer> {
        self.allocate(
            "allocate staging buffer",
            label,
            size,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        )
    }

    pub fn allocate(
        &self,
        operation: &'static str,
        label: &str,
        size: wgpu::BufferAddress,
        usage: wgpu::BufferUsages,
    ) -> Result<DeviceBuffer> {
        log::debug!("[GpuBufferManager] Allocating {} ({} bytes)", label, size);

        let buffer = checked(&self.device, operation, || {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            })
        })?;

        Ok(DeviceBuffer {
            buffer,
            size,
            label: label.to_string(),
        })
    }

    /// Copy `source` device -> host through a staging buffer
    pub fn read_back<T: bytemuck::Pod>(&self, source: &DeviceBuffer) -> Result<Vec<T>> {
        let staging = self.create_staging("Readback Staging", source.size)?;

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback"),
        });
        encoder.copy_buffer_to_buffer(&source.buffer, 0, &staging.buffer, 0, source.size);
        checked(&self.device, "copy output device->host", || {
            self.queue.submit(std::iter::once(encoder.finish()))
        })?;

        self.map_read(&staging)
    }

    /// Map an already-filled staging buffer and copy its contents out
    pub fn map_read<T: bytemuck::Pod>(&self, staging: &DeviceBuffer) -> Result<Vec<T>> {
        let slice = staging.buffer.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result); // Ignore send error if receiver dropped
        });
        self.device.poll(wgpu::Maintain::Wait);

        pollster::block_on(rx)
            .map_err(|e| BenchError::accelerator("map staging buffer", e))?
            .map_err(|e| BenchError::accelerator("map staging buffer", e))?;

        let values = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, T>(&view).to_vec()
        };
        staging.buffer.unmap();

        Ok(values)
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }
}
