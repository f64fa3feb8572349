use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for transpose: the gradient is transposed back.
#[derive(Debug)]
struct TransposeBackward {
    a_node: Arc<RwLock<TensorData>>,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        Ok(vec![transpose_op(grad_output)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Swaps the last two dimensions of a tensor as a zero-copy view.
///
/// The output shares the input's buffer; only shape and strides change.
pub fn transpose_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_guard = a.read_data();
    let rank = a_guard.shape.len();
    if rank < 2 {
        return Err(RetrogradError::UnsupportedOperation(format!(
            "transpose_op requires at least 2 dimensions, got shape {:?}",
            a_guard.shape
        )));
    }

    let mut shape = a_guard.shape.clone();
    shape.swap(rank - 2, rank - 1);
    let mut strides = a_guard.strides.clone();
    strides.swap(rank - 2, rank - 1);

    let requires_grad = a_guard.requires_grad;
    let view = TensorData::new_view(Arc::clone(&a_guard.buffer), a_guard.offset, shape, strides);
    drop(a_guard);

    let output = Tensor::from_data(view);
    if requires_grad {
        let grad_fn = TransposeBackward {
            a_node: Arc::clone(&a.data),
        };
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(Arc::new(grad_fn));
        output_guard.requires_grad = true;
    }
    Ok(output)
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
