// Core modules of the crate
pub mod autograd;
pub mod buffer;
pub mod device;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod types;

// Higher-level surfaces built on the engine
pub mod nn;
pub mod optim;

// Re-export the main types so they are reachable as `retrograd_core::Tensor` etc.
pub use error::RetrogradError;
pub use tensor::Tensor;
pub use types::DType;
pub use device::StorageDevice;

// Re-exported so downstream code can name the trait bounds used by the kernels.
pub use num_traits;
