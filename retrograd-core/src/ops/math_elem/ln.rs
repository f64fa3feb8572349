use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::ops::arithmetic::div_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for the natural logarithm: d/dx ln(x) = 1/x, dA = dZ / a.
///
/// `div_op` rejects a zero input at backward time; a negative input shows up
/// as a NaN forward value and is caught by the traversal's finiteness check.
#[derive(Debug)]
struct LnBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
}

impl BackwardOp for LnBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        Ok(vec![div_op(grad_output, &self.a_val)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Computes the element-wise natural logarithm.
///
/// Only defined for strictly positive inputs; non-positive elements produce
/// NaN forward values, surfaced by the backward pass rather than suppressed.
pub fn ln_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_val = a.detach();
    apply_unary_op(
        a,
        |x| x.ln(),
        |x| x.ln(),
        move |a_node| Arc::new(LnBackward { a_node, a_val }),
        "ln_op",
    )
}
