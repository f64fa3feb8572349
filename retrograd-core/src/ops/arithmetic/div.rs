use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_binary_op;
use crate::ops::arithmetic::{mul_op, neg_op};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

/// Backward context for element-wise division `z = a / b`:
/// dA = dZ / b, dB = dZ * (-a / b²).
#[derive(Debug)]
struct DivBackward {
    a_node: Arc<RwLock<TensorData>>,
    b_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
    b_val: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for DivBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let grad_a = div_op(grad_output, &self.b_val)?.reduce_to_shape(&self.a_shape)?;

        let b_squared = mul_op(&self.b_val, &self.b_val)?;
        let neg_a = neg_op(&self.a_val)?;
        let inner = div_op(&neg_a, &b_squared)?;
        let grad_b = mul_op(grad_output, &inner)?.reduce_to_shape(&self.b_shape)?;

        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node), Arc::clone(&self.b_node)]
    }
}

/// Performs element-wise division with broadcasting.
///
/// A zero anywhere in the divisor is rejected up front with
/// `NumericalError`; division never silently produces inf/NaN.
pub fn div_op(a: &Tensor, b: &Tensor) -> Result<Tensor, RetrogradError> {
    let has_zero = match b.dtype() {
        DType::F32 => b.get_f32_data()?.iter().any(|&v| v == 0.0),
        DType::F64 => b.get_f64_data()?.iter().any(|&v| v == 0.0),
    };
    if has_zero {
        return Err(RetrogradError::NumericalError {
            operation: "div_op".to_string(),
            reason: "division by zero".to_string(),
        });
    }

    apply_binary_op(
        a,
        b,
        |x, y| x / y,
        |x, y| x / y,
        || {
            Arc::new(DivBackward {
                a_node: Arc::clone(&a.data),
                b_node: Arc::clone(&b.data),
                a_val: a.detach(),
                b_val: b.detach(),
                a_shape: a.shape(),
                b_shape: b.shape(),
            })
        },
        "div_op",
    )
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
