//! GPU device access for the accelerator backend.
//!
//! Every device call goes through [`checked`] so a failure surfaces as an
//! accelerator fault naming the operation.

pub mod buffer_manager;
pub mod checked;
pub mod context;
pub mod preprocessor;
pub mod timestamps;

pub use buffer_manager::{DeviceBuffer, GpuBufferManager};
pub use checked::checked;
pub use context::GpuContext;
pub use preprocessor::{preprocess_kernel, WgslPreprocessor};
pub use timestamps::KernelTimer;
