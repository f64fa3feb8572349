use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_binary_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for element-wise multiplication.
///
/// Detached value clones of both operands are kept so the backward pass can
/// evaluate dA = dZ * B and dB = dZ * A without re-tracking the computation.
#[derive(Debug)]
struct MulBackward {
    a_node: Arc<RwLock<TensorData>>,
    b_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
    b_val: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let grad_a = mul_op(grad_output, &self.b_val)?.reduce_to_shape(&self.a_shape)?;
        let grad_b = mul_op(grad_output, &self.a_val)?.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node), Arc::clone(&self.b_node)]
    }
}

/// Performs element-wise multiplication with broadcasting.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, RetrogradError> {
    apply_binary_op(
        a,
        b,
        |x, y| x * y,
        |x, y| x * y,
        || {
            Arc::new(MulBackward {
                a_node: Arc::clone(&a.data),
                b_node: Arc::clone(&b.data),
                a_val: a.detach(),
                b_val: b.detach(),
                a_shape: a.shape(),
                b_shape: b.shape(),
            })
        },
        "mul_op",
    )
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
