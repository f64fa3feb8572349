use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

/// Backward context for reshape: the gradient is reshaped back to the
/// original shape.
#[derive(Debug)]
struct ReshapeBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_shape: Vec<usize>,
}

impl BackwardOp for ReshapeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        Ok(vec![reshape_op(grad_output, self.a_shape.clone())?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Reinterprets a tensor with a new shape holding the same number of elements.
///
/// Contiguous inputs become zero-copy views; non-contiguous inputs (e.g.
/// transposed views) are materialized in logical order first.
pub fn reshape_op(a: &Tensor, new_shape: Vec<usize>) -> Result<Tensor, RetrogradError> {
    let a_guard = a.read_data();
    let new_numel: usize = new_shape.iter().product();
    if new_numel != a_guard.numel() {
        return Err(RetrogradError::IncompatibleShapes {
            shape1: a_guard.shape.clone(),
            shape2: new_shape,
            operation: "reshape_op (element count)".to_string(),
        });
    }

    let requires_grad = a_guard.requires_grad;
    let a_shape = a_guard.shape.clone();

    let output = if a_guard.is_contiguous() {
        let strides = calculate_strides(&new_shape);
        let view = TensorData::new_view(
            Arc::clone(&a_guard.buffer),
            a_guard.offset,
            new_shape,
            strides,
        );
        drop(a_guard);
        Tensor::from_data(view)
    } else {
        let dtype = a_guard.dtype;
        drop(a_guard);
        match dtype {
            DType::F32 => Tensor::new(a.get_f32_data()?, new_shape)?,
            DType::F64 => Tensor::new_f64(a.get_f64_data()?, new_shape)?,
        }
    };

    if requires_grad {
        let grad_fn = ReshapeBackward {
            a_node: Arc::clone(&a.data),
            a_shape,
        };
        let mut output_guard = output.write_data();
        output_guard.grad_fn = Some(Arc::new(grad_fn));
        output_guard.requires_grad = true;
    }
    Ok(output)
}
