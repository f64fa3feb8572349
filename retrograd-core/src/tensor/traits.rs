use crate::tensor::Tensor;
use crate::types::DType;
use std::fmt::{self, Debug};
use std::sync::Arc;

impl Clone for Tensor {
    /// Shallow clone: bumps the reference count of the shared `TensorData`.
    /// Autograd metadata written through one clone is visible through all.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let td = self.read_data();
        f.debug_struct("Tensor")
            .field("shape", &td.shape)
            .field("dtype", &td.dtype)
            .field("device", &td.device)
            .field("strides", &td.strides)
            .field("offset", &td.offset)
            .field("requires_grad", &td.requires_grad)
            .field("grad_defined", &td.grad.is_some())
            .field("grad_fn_defined", &td.grad_fn.is_some())
            .finish()
    }
}

/// Content equality: same shape, dtype, and element values (view-aware).
/// Autograd metadata is ignored.
impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        if self.shape() != other.shape() || self.dtype() != other.dtype() {
            return false;
        }
        match self.dtype() {
            DType::F32 => match (self.get_f32_data(), other.get_f32_data()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
            DType::F64 => match (self.get_f64_data(), other.get_f64_data()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
        }
    }
}
