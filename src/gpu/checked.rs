//! Checked device calls.
//!
//! wgpu reports most failures asynchronously through error scopes rather than
//! return values. `checked` brackets one operation with validation and
//! out-of-memory scopes and turns anything they catch into an
//! [`BenchError::AcceleratorFault`] carrying the operation name.

use crate::error::{BenchError, Result};

pub fn checked<T>(
    device: &wgpu::Device,
    operation: &'static str,
    f: impl FnOnce() -> T,
) -> Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());

    match validation.or(out_of_memory) {
        Some(error) => {
            log::error!("[checked] {} failed: {}", operation, error);
            Err(BenchError::accelerator(operation, error))
        }
        None => Ok(value),
    }
}
