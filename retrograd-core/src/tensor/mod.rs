// src/tensor/mod.rs
use crate::device::StorageDevice;
use crate::error::RetrogradError;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

mod autograd;
mod math_methods;
mod reduction_methods;
mod traits;
mod view_methods;

pub mod broadcast_utils;
pub mod create;
pub mod utils;

pub use create::{full, full_f64, ones, ones_f64, ones_like, rand, randn, scalar, scalar_f64, zeros, zeros_f64, zeros_like};

/// Represents a multi-dimensional array (tensor).
///
/// `Tensor` wraps `Arc<RwLock<TensorData>>`:
/// 1. **Shared ownership:** clones are cheap and point at the same data, which
///    is what lets backward contexts hold their operands alive.
/// 2. **Interior mutability:** autograd metadata (`requires_grad`, `grad`,
///    `grad_fn`) is written through `&self` behind the lock.
///
/// The struct itself is non-generic; the element type is carried by the
/// `DType` tag inside `TensorData` and dispatched per operation.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new CPU F32 tensor from raw data and shape.
    ///
    /// Contiguous strides are calculated automatically; gradient tracking is
    /// disabled by default.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, RetrogradError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Creates a new CPU F64 tensor from raw data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, RetrogradError> {
        let tensor_data = TensorData::new_f64(data_vec, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    pub(crate) fn from_data(tensor_data: TensorData) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        }
    }

    /// Returns the data type (`DType`) of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.read_data().dtype
    }

    /// Returns the device (`StorageDevice`) where the tensor's data resides.
    pub fn device(&self) -> StorageDevice {
        self.read_data().device
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Checks if the tensor is contiguous in memory.
    pub fn is_contiguous(&self) -> bool {
        self.read_data().is_contiguous()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// Panics if the lock is poisoned; the engine is synchronous, so a
    /// poisoned lock means a panic already unwound through tensor code.
    pub fn read_data(&self) -> std::sync::RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    pub fn write_data(&self) -> std::sync::RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }

    /// Stable identity of the underlying allocation, used as a graph node key.
    pub(crate) fn id_ptr(&self) -> *const RwLock<TensorData> {
        Arc::as_ptr(&self.data)
    }

    /// Copies the tensor data out as a `Vec<f32>` in logical (row-major) order.
    ///
    /// Works for views; elements are gathered through the strides.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, RetrogradError> {
        let guard = self.read_data();
        if guard.dtype != DType::F32 {
            return Err(RetrogradError::DTypeMismatch {
                expected: DType::F32,
                actual: guard.dtype,
                operation: "get_f32_data".to_string(),
            });
        }
        let buffer = guard.buffer().try_get_cpu_f32()?;
        Ok(gather_logical(buffer, &guard))
    }

    /// Copies the tensor data out as a `Vec<f64>` in logical (row-major) order.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, RetrogradError> {
        let guard = self.read_data();
        if guard.dtype != DType::F64 {
            return Err(RetrogradError::DTypeMismatch {
                expected: DType::F64,
                actual: guard.dtype,
                operation: "get_f64_data".to_string(),
            });
        }
        let buffer = guard.buffer().try_get_cpu_f64()?;
        Ok(gather_logical(buffer, &guard))
    }

    /// Extracts the single element of a scalar-like tensor as f64,
    /// whatever its dtype. Convenient for loss readouts.
    pub fn item(&self) -> Result<f64, RetrogradError> {
        if self.numel() != 1 {
            return Err(RetrogradError::ShapeMismatch {
                expected: vec![],
                actual: self.shape(),
                operation: "item".to_string(),
            });
        }
        match self.dtype() {
            DType::F32 => Ok(self.get_f32_data()?[0] as f64),
            DType::F64 => Ok(self.get_f64_data()?[0]),
        }
    }

    /// Clears the gradient tensor associated with this tensor.
    pub fn clear_grad(&self) {
        if self.requires_grad() {
            let mut guard = self.write_data();
            guard.grad = None;
        }
    }
}

/// Gathers the elements of a (possibly strided) tensor into a fresh `Vec`
/// in row-major logical order.
fn gather_logical<T: Copy>(buffer: &[T], td: &TensorData) -> Vec<T> {
    let numel = td.numel();
    if td.is_contiguous() {
        return buffer[td.offset..td.offset + numel].to_vec();
    }
    let logical_strides = utils::calculate_strides(&td.shape);
    let mut out = Vec::with_capacity(numel);
    for i in 0..numel {
        let coords = utils::index_to_coord(i, &logical_strides, &td.shape);
        out.push(buffer[td.get_offset(&coords)]);
    }
    out
}
