use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::ops::arithmetic::mul_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for the exponential: d/dx eˣ = eˣ, so dA = dZ * exp(a).
#[derive(Debug)]
struct ExpBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
}

impl BackwardOp for ExpBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let forward = exp_op(&self.a_val)?;
        Ok(vec![mul_op(grad_output, &forward)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Computes the element-wise exponential `e^x`.
pub fn exp_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_val = a.detach();
    apply_unary_op(
        a,
        |x| x.exp(),
        |x| x.exp(),
        move |a_node| Arc::new(ExpBackward { a_node, a_val }),
        "exp_op",
    )
}
