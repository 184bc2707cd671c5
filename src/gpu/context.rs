use std::sync::Arc;

use crate::error::{BenchError, Result};

/// Device and queue shared by every accelerator run.
///
/// Created once at start-up. Nothing else persists on the device between
/// workloads.
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter_info: wgpu::AdapterInfo,
    pub limits: wgpu::Limits,
    timestamps: bool,
}

impl GpuContext {
    pub fn new() -> Result<Self> {
        pollster::block_on(Self::new_async())
    }

    pub async fn new_async() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                BenchError::accelerator("request adapter", "no compatible GPU adapter found")
            })?;

        let adapter_info = adapter.get_info();
        log::info!(
            "[GpuContext] Selected adapter: {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let timestamps = adapter.features().contains(wgpu::Features::TIMESTAMP_QUERY);
        if !timestamps {
            log::warn!(
                "[GpuContext] Adapter lacks TIMESTAMP_QUERY; kernel time will use the host clock"
            );
        }
        let required_features = if timestamps {
            wgpu::Features::TIMESTAMP_QUERY
        } else {
            wgpu::Features::empty()
        };

        let limits = adapter.limits();
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Backend Bench Device"),
                    required_features,
                    required_limits: limits.clone(),
                },
                None,
            )
            .await
            .map_err(|e| BenchError::accelerator("request device", e))?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("[GpuContext] Uncaptured device error: {}", error);
        }));

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
            limits,
            timestamps,
        })
    }

    /// Whether kernel time comes from device timestamps
    pub fn supports_timestamps(&self) -> bool {
        self.timestamps
    }

    pub fn describe(&self) -> String {
        format!("{} ({:?})", self.adapter_info.name, self.adapter_info.backend)
    }
}
