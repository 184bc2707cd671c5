//! Data-parallel backend built on wgpu compute pipelines.
//!
//! One run allocates its device buffers, uploads the input, dispatches the
//! workload's kernel once, waits, reads the output back and releases every
//! allocation. Kernel time comes from timestamp queries written at the start and
//! end of the compute pass, so upload, pipeline creation and readback are not
//! part of it.

use std::time::Instant;

use crate::error::Result;
use crate::executor::{Backend, Execution, Executor, TimingSample};
use crate::geometry::{compute_geometry, LaunchGeometry};
use crate::gpu::{checked, preprocess_kernel, GpuBufferManager, GpuContext, KernelTimer};
use crate::workload::{Element, KernelSource, Workload};

pub struct AcceleratorExecutor {
    context: GpuContext,
    buffers: GpuBufferManager,
}

impl AcceleratorExecutor {
    pub fn new(context: GpuContext) -> Self {
        let buffers = GpuBufferManager::new(context.device.clone(), context.queue.clone());
        Self { context, buffers }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    fn build_pipeline(
        &self,
        kernel: &KernelSource,
    ) -> Result<(wgpu::ComputePipeline, wgpu::BindGroupLayout)> {
        let device = &self.context.device;
        let source = preprocess_kernel(kernel)?;

        let shader = checked(device, "compile kernel", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(kernel.label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })?;

        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = checked(device, "create bind group layout", || {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Kernel Bind Group Layout"),
                entries: &[
                    // Params
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    // Input
                    storage(1, true),
                    // Output
                    storage(2, false),
                ],
            })
        })?;

        let pipeline = checked(device, "create compute pipeline", || {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Kernel Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(kernel.label),
                layout: Some(&layout),
                module: &shader,
                entry_point: kernel.entry_point,
            })
        })?;

        Ok((pipeline, bind_group_layout))
    }

    fn geometry_for<W: Workload>(
        &self,
        workload: &W,
        kernel: &KernelSource,
    ) -> Result<LaunchGeometry> {
        let geometry = compute_geometry(workload.shape(), kernel.group_size)?;
        geometry.check_limits(self.context.limits.max_compute_workgroups_per_dimension)?;
        log::debug!(
            "[AcceleratorExecutor] {} dispatch: {:?} groups of {:?}",
            workload.label(),
            geometry.group_count,
            geometry.group_size
        );
        Ok(geometry)
    }
}

impl Executor for AcceleratorExecutor {
    fn backend(&self) -> Backend {
        Backend::Accelerator
    }

    fn execute<W: Workload>(&self, workload: &W, input: &[W::Elem]) -> Result<Execution<W::Elem>> {
        let device = &self.context.device;
        let queue = &self.context.queue;
        let total_start = Instant::now();

        let kernel = workload.accel_kernel();
        let geometry = self.geometry_for(workload, &kernel)?;

        // Allocate and upload
        let device_input: Vec<<W::Elem as Element>::Device> =
            input.iter().map(|&value| value.to_device()).collect();
        let src = self.buffers.upload_storage("Kernel Input", &device_input)?;
        let output_size = std::mem::size_of_val(device_input.as_slice()) as wgpu::BufferAddress;
        let dst = self.buffers.create_storage_output("Kernel Output", output_size)?;
        let params = self.buffers.create_uniform("Kernel Params", &kernel.params)?;

        let (pipeline, bind_group_layout) = self.build_pipeline(&kernel)?;
        let bind_group = checked(device, "create bind group", || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Kernel Bind Group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: src.buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: dst.buffer().as_entire_binding(),
                    },
                ],
            })
        })?;

        let timer = if self.context.supports_timestamps() {
            Some(KernelTimer::new(&self.buffers)?)
        } else {
            None
        };

        // Launch
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(kernel.label),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(kernel.label),
                timestamp_writes: timer.as_ref().map(|t| t.pass_writes()),
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(geometry.group_count[0], geometry.group_count[1], 1);
        }
        if let Some(timer) = &timer {
            timer.resolve(&mut encoder);
        }

        let launch_start = Instant::now();
        let submission = checked(device, "launch kernel", || {
            queue.submit(std::iter::once(encoder.finish()))
        })?;
        checked(device, "synchronize", || {
            device.poll(wgpu::Maintain::WaitForSubmissionIndex(submission));
        })?;
        let host_elapsed = launch_start.elapsed();

        let kernel_time = match &timer {
            Some(timer) => TimingSample::device(timer.read_millis(&self.buffers)?),
            None => TimingSample::host(host_elapsed),
        };

        // Read back
        let words: Vec<<W::Elem as Element>::Device> = self.buffers.read_back(&dst)?;
        let output: Vec<W::Elem> = words
            .into_iter()
            .map(<W::Elem as Element>::from_device)
            .collect();

        drop(timer);
        drop(bind_group);
        drop(params);
        drop(dst);
        drop(src);

        let total = TimingSample::host(total_start.elapsed());
        log::debug!(
            "[AcceleratorExecutor] {} kernel {:.3} ms, total {:.3} ms",
            workload.label(),
            kernel_time.millis,
            total.millis
        );

        Ok(Execution {
            output,
            kernel: kernel_time,
            total,
        })
    }
}
