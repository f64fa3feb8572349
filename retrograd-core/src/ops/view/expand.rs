use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::tensor::utils::broadcast_shapes;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

/// Backward context for expand: gradients are summed back over the
/// broadcasted dimensions.
#[derive(Debug)]
struct ExpandBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_shape: Vec<usize>,
}

impl BackwardOp for ExpandBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        Ok(vec![grad_output.reduce_to_shape(&self.a_shape)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Materializes a tensor broadcast to `target_shape`.
///
/// `target_shape` must be what broadcasting the input against it would
/// produce: size-1 and missing leading dimensions are repeated.
pub fn expand_op(a: &Tensor, target_shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let a_guard = a.read_data();

    let broadcast = broadcast_shapes(&a_guard.shape, target_shape).map_err(|_| {
        RetrogradError::BroadcastError {
            shape1: a_guard.shape.clone(),
            shape2: target_shape.to_vec(),
        }
    })?;
    if broadcast != target_shape {
        return Err(RetrogradError::BroadcastError {
            shape1: a_guard.shape.clone(),
            shape2: target_shape.to_vec(),
        });
    }

    let requires_grad = a_guard.requires_grad;
    let a_shape = a_guard.shape.clone();

    let output = match a_guard.dtype {
        DType::F32 => {
            let buffer = a_guard.buffer().try_get_cpu_f32()?;
            let data = expand_kernel(target_shape, buffer, &a_guard);
            drop(a_guard);
            Tensor::new(data, target_shape.to_vec())?
        }
        DType::F64 => {
            let buffer = a_guard.buffer().try_get_cpu_f64()?;
            let data = expand_kernel(target_shape, buffer, &a_guard);
            drop(a_guard);
            Tensor::new_f64(data, target_shape.to_vec())?
        }
    };

    if requires_grad {
        let grad_fn = ExpandBackward {
            a_node: Arc::clone(&a.data),
            a_shape,
        };
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(Arc::new(grad_fn));
        output_guard.requires_grad = true;
    }
    Ok(output)
}

/// Fills a buffer of `target_shape` by repeating the source along broadcast
/// dimensions (size-1 dims and missing leading dims).
pub(crate) fn expand_kernel<T>(target_shape: &[usize], source: &[T], td: &TensorData) -> Vec<T>
where
    T: Copy,
{
    let target_numel: usize = target_shape.iter().product();
    let mut expanded = Vec::with_capacity(target_numel);

    let source_rank = td.shape.len();
    let target_rank = target_shape.len();
    let rank_diff = target_rank.saturating_sub(source_rank);

    let mut target_coords = vec![0; target_rank];
    let mut source_coords = vec![0; source_rank];

    for _ in 0..target_numel {
        for j in 0..source_rank {
            let dim_size = td.shape[j];
            source_coords[j] = if dim_size == 1 {
                0
            } else {
                target_coords[rank_diff + j]
            };
        }
        expanded.push(source[td.get_offset(&source_coords)]);

        // Increment target coordinates (row-major counter).
        let mut dim = target_rank;
        while dim > 0 {
            dim -= 1;
            target_coords[dim] += 1;
            if target_coords[dim] < target_shape[dim] {
                break;
            }
            target_coords[dim] = 0;
        }
    }
    expanded
}

#[cfg(test)]
#[path = "expand_test.rs"]
mod tests;
