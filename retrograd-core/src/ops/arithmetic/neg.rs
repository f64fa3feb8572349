use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for negation: dA = -dZ.
#[derive(Debug)]
struct NegBackward {
    a_node: Arc<RwLock<TensorData>>,
}

impl BackwardOp for NegBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        Ok(vec![neg_op(grad_output)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Negates a tensor element-wise.
pub fn neg_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    apply_unary_op(
        a,
        |x| -x,
        |x| -x,
        |a_node| Arc::new(NegBackward { a_node }),
        "neg_op",
    )
}
