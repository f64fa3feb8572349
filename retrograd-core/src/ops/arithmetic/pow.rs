use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::ops::arithmetic::mul_op;
use crate::tensor::create::{scalar, scalar_f64};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

/// Backward context for elementwise power `z = aⁿ`: dA = dZ * n * aⁿ⁻¹.
#[derive(Debug)]
struct PowBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
    exponent: f64,
}

impl BackwardOp for PowBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let n_minus_one = pow_op(&self.a_val, self.exponent - 1.0)?;
        let n = match self.a_val.dtype() {
            DType::F32 => scalar(self.exponent as f32)?,
            DType::F64 => scalar_f64(self.exponent)?,
        };
        let factor = mul_op(&n_minus_one, &n)?;
        let grad_a = mul_op(grad_output, &factor)?;
        Ok(vec![grad_a])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Raises each element of the tensor to the power of the given exponent.
pub fn pow_op(a: &Tensor, exponent: f64) -> Result<Tensor, RetrogradError> {
    let a_val = a.detach();
    apply_unary_op(
        a,
        |x| x.powf(exponent as f32),
        |x| x.powf(exponent),
        move |a_node| {
            Arc::new(PowBackward {
                a_node,
                a_val,
                exponent,
            })
        },
        "pow_op",
    )
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
