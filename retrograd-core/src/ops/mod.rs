//! # Tensor Operations Module (`ops`)
//!
//! Operations are grouped into submodules by functionality:
//!
//! - [`arithmetic`]: element-wise arithmetic (add, sub, mul, div, neg, pow).
//! - [`linalg`]: linear algebra (matmul).
//! - [`math_elem`]: element-wise math functions (exp, ln, sin, cos, sqrt).
//! - [`reduction`]: dimension-reducing operations (sum, mean).
//! - [`view`]: operations over the layout (transpose, reshape, expand).
//!
//! Each operation has a core `xxx_op` function that performs the forward
//! computation and sets up the backward pass, plus a `Backward` struct
//! implementing [`BackwardOp`](crate::autograd::BackwardOp) that stores the
//! context needed to compute gradients during backpropagation.

pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod reduction;
pub mod view;

use crate::autograd::BackwardOp;
use crate::device::StorageDevice;
use crate::error::RetrogradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_source_coords, calculate_strides, index_to_coord};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

/// Applies a unary element-wise operation to a tensor.
///
/// Handles the device check, DType dispatch (F32/F64), strided data
/// traversal, output tensor creation, and autograd linkage.
///
/// `backward_builder` is only invoked when the input requires grad; it
/// receives the input's graph node and must produce the `BackwardOp`. It is
/// called after all read locks are released.
pub(crate) fn apply_unary_op<F32Op, F64Op, B>(
    a: &Tensor,
    op_f32: F32Op,
    op_f64: F64Op,
    backward_builder: B,
    op_name: &str,
) -> Result<Tensor, RetrogradError>
where
    F32Op: Fn(f32) -> f32,
    F64Op: Fn(f64) -> f64,
    B: FnOnce(Arc<RwLock<TensorData>>) -> Arc<dyn BackwardOp>,
{
    let a_guard = a.read_data();

    if a_guard.device != StorageDevice::CPU {
        return Err(RetrogradError::DeviceMismatch {
            operation: op_name.to_string(),
            expected: StorageDevice::CPU,
            actual: a_guard.device,
        });
    }

    let requires_grad = a_guard.requires_grad;
    let output_shape = a_guard.shape.clone();

    let output = match a_guard.dtype {
        DType::F32 => {
            let buffer = a_guard.buffer().try_get_cpu_f32()?;
            let output_data = unary_kernel(buffer, &a_guard, &op_f32);
            drop(a_guard);
            Tensor::new(output_data, output_shape)?
        }
        DType::F64 => {
            let buffer = a_guard.buffer().try_get_cpu_f64()?;
            let output_data = unary_kernel(buffer, &a_guard, &op_f64);
            drop(a_guard);
            Tensor::new_f64(output_data, output_shape)?
        }
    };

    if requires_grad {
        let grad_fn = backward_builder(Arc::clone(&a.data));
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(grad_fn);
        output_guard.requires_grad = true;
    }

    Ok(output)
}

/// Applies a broadcasting binary element-wise operation to two tensors.
///
/// Handles device/dtype checks, the broadcast shape computation, strided
/// traversal of both operands, output creation, and autograd linkage.
/// `backward_builder` is invoked after all read locks are released.
pub(crate) fn apply_binary_op<F32Op, F64Op, B>(
    a: &Tensor,
    b: &Tensor,
    op_f32: F32Op,
    op_f64: F64Op,
    backward_builder: B,
    op_name: &str,
) -> Result<Tensor, RetrogradError>
where
    F32Op: Fn(f32, f32) -> f32,
    F64Op: Fn(f64, f64) -> f64,
    B: FnOnce() -> Arc<dyn BackwardOp>,
{
    let a_guard = a.read_data();
    let b_guard = b.read_data();

    if a_guard.device != b_guard.device {
        return Err(RetrogradError::DeviceMismatch {
            operation: op_name.to_string(),
            expected: a_guard.device,
            actual: b_guard.device,
        });
    }
    if a_guard.device != StorageDevice::CPU {
        return Err(RetrogradError::DeviceMismatch {
            operation: op_name.to_string(),
            expected: StorageDevice::CPU,
            actual: a_guard.device,
        });
    }
    if a_guard.dtype != b_guard.dtype {
        return Err(RetrogradError::DTypeMismatch {
            expected: a_guard.dtype,
            actual: b_guard.dtype,
            operation: op_name.to_string(),
        });
    }

    let output_shape = broadcast_shapes(&a_guard.shape, &b_guard.shape).map_err(|_| {
        RetrogradError::BroadcastError {
            shape1: a_guard.shape.clone(),
            shape2: b_guard.shape.clone(),
        }
    })?;

    let requires_grad = a_guard.requires_grad || b_guard.requires_grad;

    let output = match a_guard.dtype {
        DType::F32 => {
            let a_buf = a_guard.buffer().try_get_cpu_f32()?;
            let b_buf = b_guard.buffer().try_get_cpu_f32()?;
            let output_data =
                broadcast_zip_kernel(a_buf, &a_guard, b_buf, &b_guard, &output_shape, &op_f32);
            drop(a_guard);
            drop(b_guard);
            Tensor::new(output_data, output_shape)?
        }
        DType::F64 => {
            let a_buf = a_guard.buffer().try_get_cpu_f64()?;
            let b_buf = b_guard.buffer().try_get_cpu_f64()?;
            let output_data =
                broadcast_zip_kernel(a_buf, &a_guard, b_buf, &b_guard, &output_shape, &op_f64);
            drop(a_guard);
            drop(b_guard);
            Tensor::new_f64(output_data, output_shape)?
        }
    };

    if requires_grad {
        let grad_fn = backward_builder();
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(grad_fn);
        output_guard.requires_grad = true;
    }

    Ok(output)
}

/// Strided element-wise traversal for a single operand, in logical order.
fn unary_kernel<T, F>(buffer: &[T], td: &TensorData, op: &F) -> Vec<T>
where
    T: Copy,
    F: Fn(T) -> T,
{
    let numel = td.numel();
    if td.is_contiguous() {
        return buffer[td.offset..td.offset + numel]
            .iter()
            .map(|&v| op(v))
            .collect();
    }
    let logical_strides = calculate_strides(&td.shape);
    let mut out = Vec::with_capacity(numel);
    for i in 0..numel {
        let coords = index_to_coord(i, &logical_strides, &td.shape);
        out.push(op(buffer[td.get_offset(&coords)]));
    }
    out
}

/// Noyau de calcul partagé par les opérations binaires.
/// Strided broadcasting traversal for two operands producing `output_shape`.
fn broadcast_zip_kernel<T, F>(
    a_buf: &[T],
    a_td: &TensorData,
    b_buf: &[T],
    b_td: &TensorData,
    output_shape: &[usize],
    op: &F,
) -> Vec<T>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let numel: usize = output_shape.iter().product();
    let output_strides = calculate_strides(output_shape);
    let mut a_coords = vec![0; a_td.shape.len()];
    let mut b_coords = vec![0; b_td.shape.len()];
    let mut out = Vec::with_capacity(numel);

    for i in 0..numel {
        let output_coords = index_to_coord(i, &output_strides, output_shape);
        broadcast_source_coords(&output_coords, &a_td.shape, &mut a_coords);
        broadcast_source_coords(&output_coords, &b_td.shape, &mut b_coords);
        let a_val = a_buf[a_td.get_offset(&a_coords)];
        let b_val = b_buf[b_td.get_offset(&b_coords)];
        out.push(op(a_val, b_val));
    }
    out
}
