use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_binary_op;
use crate::ops::arithmetic::neg_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

/// Backward context for element-wise subtraction: dA = dZ, dB = -dZ.
#[derive(Debug)]
struct SubBackward {
    a_node: Arc<RwLock<TensorData>>,
    b_node: Arc<RwLock<TensorData>>,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = neg_op(grad_output)?.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node), Arc::clone(&self.b_node)]
    }
}

/// Performs element-wise subtraction with broadcasting.
pub fn sub_op(a: &Tensor, b: &Tensor) -> Result<Tensor, RetrogradError> {
    apply_binary_op(
        a,
        b,
        |x, y| x - y,
        |x, y| x - y,
        || {
            Arc::new(SubBackward {
                a_node: Arc::clone(&a.data),
                b_node: Arc::clone(&b.data),
                a_shape: a.shape(),
                b_shape: b.shape(),
            })
        },
        "sub_op",
    )
}
