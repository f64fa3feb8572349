// retrograd-core/src/ops/arithmetic/add.rs

use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_binary_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for element-wise addition.
///
/// Addition passes the output gradient through unchanged; broadcasting is
/// undone by summing over the expanded dimensions.
#[derive(Debug)]
struct AddBackward {
    a_node: Arc<RwLock<TensorData>>,
    b_node: Arc<RwLock<TensorData>>,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = grad_output.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node), Arc::clone(&self.b_node)]
    }
}

/// Performs element-wise addition with broadcasting.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, RetrogradError> {
    apply_binary_op(
        a,
        b,
        |x, y| x + y,
        |x, y| x + y,
        || {
            Arc::new(AddBackward {
                a_node: Arc::clone(&a.data),
                b_node: Arc::clone(&b.data),
                a_shape: a.shape(),
                b_shape: b.shape(),
            })
        },
        "add_op",
    )
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
