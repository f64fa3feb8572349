use crate::autograd::BackwardOp;
use crate::device::StorageDevice;
use crate::error::RetrogradError;
use crate::ops::view::{expand_op, reshape_op};
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use num_traits::Float;
use std::sync::{Arc, RwLock};

/// Backward context for sum-reduction: the output gradient is broadcast back
/// to the input shape (every input element contributed with weight 1).
#[derive(Debug)]
struct SumBackward {
    a_node: Arc<RwLock<TensorData>>,
    input_shape: Vec<usize>,
    reduced_axes: Vec<usize>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        // Re-insert the reduced dimensions as size 1, then expand.
        let keep_shape: Vec<usize> = self
            .input_shape
            .iter()
            .enumerate()
            .map(|(i, &d)| if self.reduced_axes.contains(&i) { 1 } else { d })
            .collect();
        let g = if grad_output.shape() == keep_shape {
            grad_output.clone()
        } else {
            reshape_op(grad_output, keep_shape)?
        };
        Ok(vec![expand_op(&g, &self.input_shape)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Strided summation kernel. `reduced[d]` marks dimensions being summed away.
fn sum_kernel<T: Float>(
    buf: &[T],
    td: &TensorData,
    reduced: &[bool],
    output_shape: &[usize],
    keep_dims: bool,
) -> Vec<T> {
    let rank = td.shape.len();
    let out_numel: usize = output_shape.iter().product();
    let out_strides = calculate_strides(output_shape);
    let mut out = vec![T::zero(); out_numel];

    let mut coords = vec![0; rank];
    for _ in 0..td.numel() {
        let v = buf[td.get_offset(&coords)];

        let mut flat = 0;
        let mut out_dim = 0;
        for d in 0..rank {
            if !reduced[d] {
                flat += coords[d] * out_strides[out_dim];
                out_dim += 1;
            } else if keep_dims {
                // kept dimension has size 1; its coordinate is 0
                out_dim += 1;
            }
        }
        out[flat] = out[flat] + v;

        // Increment input coordinates (row-major counter).
        let mut dim = rank;
        while dim > 0 {
            dim -= 1;
            coords[dim] += 1;
            if coords[dim] < td.shape[dim] {
                break;
            }
            coords[dim] = 0;
        }
    }
    out
}

/// Sums tensor elements along the given axes (`None` sums everything).
///
/// With `keep_dims`, reduced dimensions remain as size 1; otherwise they are
/// removed (a full reduction yields a scalar of shape `[]`).
pub fn sum_op(
    input: &Tensor,
    axes: Option<&[usize]>,
    keep_dims: bool,
) -> Result<Tensor, RetrogradError> {
    let input_guard = input.read_data();

    if input_guard.device != StorageDevice::CPU {
        return Err(RetrogradError::DeviceMismatch {
            expected: StorageDevice::CPU,
            actual: input_guard.device,
            operation: "sum_op".to_string(),
        });
    }

    let input_shape = input_guard.shape.clone();
    let rank = input_shape.len();

    let mut reduced_axes: Vec<usize> = match axes {
        None => (0..rank).collect(),
        Some(axes) => {
            for &axis in axes {
                if axis >= rank {
                    return Err(RetrogradError::IndexOutOfBounds {
                        index: vec![axis],
                        shape: input_shape,
                    });
                }
            }
            axes.to_vec()
        }
    };
    reduced_axes.sort_unstable();
    reduced_axes.dedup();

    let mut reduced = vec![false; rank];
    for &axis in &reduced_axes {
        reduced[axis] = true;
    }

    let mut output_shape = Vec::new();
    for (dim, &size) in input_shape.iter().enumerate() {
        if !reduced[dim] {
            output_shape.push(size);
        } else if keep_dims {
            output_shape.push(1);
        }
    }

    let requires_grad = input_guard.requires_grad;

    let output = match input_guard.dtype {
        DType::F32 => {
            let buffer = input_guard.buffer().try_get_cpu_f32()?;
            let data = sum_kernel(buffer, &input_guard, &reduced, &output_shape, keep_dims);
            drop(input_guard);
            Tensor::new(data, output_shape)?
        }
        DType::F64 => {
            let buffer = input_guard.buffer().try_get_cpu_f64()?;
            let data = sum_kernel(buffer, &input_guard, &reduced, &output_shape, keep_dims);
            drop(input_guard);
            Tensor::new_f64(data, output_shape)?
        }
    };

    if requires_grad {
        let grad_fn = SumBackward {
            a_node: Arc::clone(&input.data),
            input_shape,
            reduced_axes,
        };
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(Arc::new(grad_fn));
        output_guard.requires_grad = true;
    }
    Ok(output)
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
