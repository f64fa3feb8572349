use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::ops::arithmetic::mul_op;
use crate::ops::math_elem::cos_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for sine: d/dx sin(x) = cos(x), evaluated at the
/// original forward input.
#[derive(Debug)]
struct SinBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
}

impl BackwardOp for SinBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let cos_a = cos_op(&self.a_val)?;
        Ok(vec![mul_op(grad_output, &cos_a)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Computes the element-wise sine.
pub fn sin_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_val = a.detach();
    apply_unary_op(
        a,
        |x| x.sin(),
        |x| x.sin(),
        move |a_node| Arc::new(SinBackward { a_node, a_val }),
        "sin_op",
    )
}
