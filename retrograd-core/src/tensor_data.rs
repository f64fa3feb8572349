// src/tensor_data.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::buffer::{Buffer, CpuBuffer};
use crate::device::StorageDevice;
use crate::error::RetrogradError;
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;
use crate::types::DType;

/// Internal storage and metadata for a Tensor.
///
/// Holds the data buffer, shape, strides, device, data type, and
/// autograd-related information. Wrapped in `Arc<RwLock<TensorData>>` by the
/// `Tensor` struct for shared ownership and interior mutability.
#[derive(Debug)]
pub struct TensorData {
    /// The underlying data buffer. Wrapped in `Arc` so views can share it.
    pub(crate) buffer: Arc<Buffer>,
    /// The device where the buffer resides.
    pub(crate) device: StorageDevice,
    /// The data type of the elements in the buffer.
    pub(crate) dtype: DType,

    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
    /// The strides for each dimension (jump in buffer elements per step).
    pub(crate) strides: Vec<usize>,
    /// Offset into the buffer of the first element (non-zero for views).
    pub(crate) offset: usize,

    /// Whether operations on this tensor are recorded in the computation graph.
    pub(crate) requires_grad: bool,
    /// The accumulated gradient, populated by the backward pass.
    pub(crate) grad: Option<Tensor>,
    /// The operation that produced this tensor. Leaf tensors have `None`.
    pub(crate) grad_fn: Option<Arc<dyn BackwardOp>>,
}

impl TensorData {
    /// Creates a new `TensorData` with the given f32 data and shape on the CPU.
    ///
    /// Takes ownership of the data vector and calculates contiguous strides.
    ///
    /// # Errors
    /// Returns `RetrogradError::TensorCreationError` if the data length does not
    /// match the number of elements implied by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, RetrogradError> {
        let numel: usize = shape.iter().product();
        let data_len = data_vec.len();
        if data_len != numel {
            return Err(RetrogradError::TensorCreationError { data_len, shape });
        }

        let strides = calculate_strides(&shape);
        let buffer = Buffer::Cpu(CpuBuffer::F32(Arc::new(data_vec)));

        Ok(TensorData {
            buffer: Arc::new(buffer),
            device: StorageDevice::CPU,
            dtype: DType::F32,
            offset: 0,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    /// Creates a new `TensorData` with the given f64 data and shape on the CPU.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, RetrogradError> {
        let numel: usize = shape.iter().product();
        let data_len = data_vec.len();
        if data_len != numel {
            return Err(RetrogradError::TensorCreationError { data_len, shape });
        }

        let strides = calculate_strides(&shape);
        let buffer = Buffer::Cpu(CpuBuffer::F64(Arc::new(data_vec)));

        Ok(TensorData {
            buffer: Arc::new(buffer),
            device: StorageDevice::CPU,
            dtype: DType::F64,
            offset: 0,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    /// Creates a `TensorData` representing a view of an existing buffer.
    ///
    /// Shares `buffer_arc` without copying; the caller supplies the view's
    /// offset, shape, and strides. Views start detached from the graph.
    pub(crate) fn new_view(
        buffer_arc: Arc<Buffer>,
        offset: usize,
        shape: Vec<usize>,
        strides: Vec<usize>,
    ) -> Self {
        let dtype = match &*buffer_arc {
            Buffer::Cpu(CpuBuffer::F32(_)) => DType::F32,
            Buffer::Cpu(CpuBuffer::F64(_)) => DType::F64,
        };
        let device = buffer_arc.device();
        TensorData {
            buffer: buffer_arc,
            device,
            dtype,
            offset,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        }
    }

    /// Provides immutable access to the underlying shared data buffer.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Calculates the linear offset into the shared buffer for the given
    /// multi-dimensional indices, honouring strides and the view offset.
    ///
    /// Panics if the index rank does not match the tensor rank or an index is
    /// out of bounds; callers iterate within the tensor's own shape.
    pub fn get_offset(&self, indices: &[usize]) -> usize {
        assert_eq!(
            indices.len(),
            self.shape.len(),
            "Number of indices ({}) does not match tensor rank ({}) for shape {:?}",
            indices.len(),
            self.shape.len(),
            self.shape
        );

        let mut relative_offset = 0;
        for i in 0..self.shape.len() {
            assert!(
                indices[i] < self.shape[i],
                "Index {} is out of bounds for dimension {} with size {} (shape: {:?})",
                indices[i],
                i,
                self.shape[i],
                self.shape
            );
            relative_offset += indices[i] * self.strides[i];
        }
        self.offset + relative_offset
    }

    /// Checks if the tensor is contiguous in memory (row-major, no gaps).
    pub fn is_contiguous(&self) -> bool {
        if self.shape.is_empty() {
            return true;
        }
        let mut current_stride = 1;
        for i in (0..self.shape.len()).rev() {
            let shape_i = self.shape[i];
            if shape_i == 0 {
                return true;
            }
            if shape_i != 1 {
                if self.strides[i] != current_stride {
                    return false;
                }
                current_stride *= shape_i;
            }
        }
        true
    }
}
