use crate::autograd::BackwardOp;
use crate::device::StorageDevice;
use crate::error::RetrogradError;
use crate::ops::view::transpose_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use num_traits::Float;
use std::sync::{Arc, RwLock};

/// Backward context for `Y = A·B`:
/// dA = dY · Bᵗ, dB = Aᵗ · dY.
#[derive(Debug)]
struct MatmulBackward {
    a_node: Arc<RwLock<TensorData>>,
    b_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
    b_val: Tensor,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let b_t = transpose_op(&self.b_val)?;
        let grad_a = matmul_op(grad_output, &b_t)?;

        let a_t = transpose_op(&self.a_val)?;
        let grad_b = matmul_op(&a_t, grad_output)?;

        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node), Arc::clone(&self.b_node)]
    }
}

/// Naive strided matmul kernel; handles transposed (non-contiguous) operands
/// through `get_offset`.
fn matmul_kernel<T: Float>(
    a_buf: &[T],
    a_td: &TensorData,
    b_buf: &[T],
    b_td: &TensorData,
    m: usize,
    k: usize,
    n: usize,
) -> Vec<T> {
    let mut out = vec![T::zero(); m * n];
    for i in 0..m {
        for j in 0..n {
            let mut acc = T::zero();
            for l in 0..k {
                let a_val = a_buf[a_td.get_offset(&[i, l])];
                let b_val = b_buf[b_td.get_offset(&[l, j])];
                acc = acc + a_val * b_val;
            }
            out[i * n + j] = acc;
        }
    }
    out
}

/// Performs matrix multiplication `C = A·B` for 2-D tensors.
/// A: [M, K], B: [K, N] -> C: [M, N].
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_guard = a.read_data();
    let b_guard = b.read_data();

    if a_guard.shape.len() != 2 || b_guard.shape.len() != 2 {
        return Err(RetrogradError::IncompatibleShapes {
            shape1: a_guard.shape.clone(),
            shape2: b_guard.shape.clone(),
            operation: "matmul_op (inputs must be 2-D)".to_string(),
        });
    }
    if a_guard.shape[1] != b_guard.shape[0] {
        return Err(RetrogradError::IncompatibleShapes {
            shape1: a_guard.shape.clone(),
            shape2: b_guard.shape.clone(),
            operation: "matmul_op (inner dimensions)".to_string(),
        });
    }
    if a_guard.device != b_guard.device || a_guard.device != StorageDevice::CPU {
        return Err(RetrogradError::DeviceMismatch {
            expected: StorageDevice::CPU,
            actual: b_guard.device,
            operation: "matmul_op".to_string(),
        });
    }
    if a_guard.dtype != b_guard.dtype {
        return Err(RetrogradError::DTypeMismatch {
            expected: a_guard.dtype,
            actual: b_guard.dtype,
            operation: "matmul_op".to_string(),
        });
    }

    let m = a_guard.shape[0];
    let k = a_guard.shape[1];
    let n = b_guard.shape[1];
    let requires_grad = a_guard.requires_grad || b_guard.requires_grad;

    let output = match a_guard.dtype {
        DType::F32 => {
            let a_buf = a_guard.buffer().try_get_cpu_f32()?;
            let b_buf = b_guard.buffer().try_get_cpu_f32()?;
            let out = matmul_kernel(a_buf, &a_guard, b_buf, &b_guard, m, k, n);
            drop(a_guard);
            drop(b_guard);
            Tensor::new(out, vec![m, n])?
        }
        DType::F64 => {
            let a_buf = a_guard.buffer().try_get_cpu_f64()?;
            let b_buf = b_guard.buffer().try_get_cpu_f64()?;
            let out = matmul_kernel(a_buf, &a_guard, b_buf, &b_guard, m, k, n);
            drop(a_guard);
            drop(b_guard);
            Tensor::new_f64(out, vec![m, n])?
        }
    };

    if requires_grad {
        let grad_fn = MatmulBackward {
            a_node: Arc::clone(&a.data),
            b_node: Arc::clone(&b.data),
            a_val: a.detach(),
            b_val: b.detach(),
        };
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(Arc::new(grad_fn));
        output_guard.requires_grad = true;
    }

    Ok(output)
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
