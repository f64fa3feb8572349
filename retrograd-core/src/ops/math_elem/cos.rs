use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::ops::arithmetic::{mul_op, neg_op};
use crate::ops::math_elem::sin_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for cosine: d/dx cos(x) = -sin(x).
#[derive(Debug)]
struct CosBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
}

impl BackwardOp for CosBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let sin_a = sin_op(&self.a_val)?;
        let neg_sin_a = neg_op(&sin_a)?;
        Ok(vec![mul_op(grad_output, &neg_sin_a)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Computes the element-wise cosine.
pub fn cos_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_val = a.detach();
    apply_unary_op(
        a,
        |x| x.cos(),
        |x| x.cos(),
        move |a_node| Arc::new(CosBackward { a_node, a_val }),
        "cos_op",
    )
}
