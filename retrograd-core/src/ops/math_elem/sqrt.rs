use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::apply_unary_op;
use crate::ops::arithmetic::{div_op, mul_op};
use crate::tensor::create::{scalar, scalar_f64};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, RwLock};

/// Backward context for the square root: d/dx √x = 1 / (2√x).
#[derive(Debug)]
struct SqrtBackward {
    a_node: Arc<RwLock<TensorData>>,
    a_val: Tensor,
}

impl BackwardOp for SqrtBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError> {
        let sqrt_a = sqrt_op(&self.a_val)?;
        let two = match self.a_val.dtype() {
            DType::F32 => scalar(2.0)?,
            DType::F64 => scalar_f64(2.0)?,
        };
        let denom = mul_op(&sqrt_a, &two)?;
        Ok(vec![div_op(grad_output, &denom)?])
    }

    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>> {
        vec![Arc::clone(&self.a_node)]
    }
}

/// Computes the element-wise square root.
///
/// Negative inputs produce NaN forward values; the gradient at zero is
/// unbounded and rejected by `div_op` during backward.
pub fn sqrt_op(a: &Tensor) -> Result<Tensor, RetrogradError> {
    let a_val = a.detach();
    apply_unary_op(
        a,
        |x| x.sqrt(),
        |x| x.sqrt(),
        move |a_node| Arc::new(SqrtBackward { a_node, a_val }),
        "sqrt_op",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_forward_and_backward() {
        let a = Tensor::new(vec![4.0, 9.0], vec![2]).unwrap();
        a.requires_grad_(true).unwrap();

        let out = sqrt_op(&a).unwrap();
        assert_eq!(out.get_f32_data().unwrap(), vec![2.0, 3.0]);

        let loss = out.sum().unwrap();
        loss.backward(None).unwrap();
        let grad = a.grad().unwrap().get_f32_data().unwrap();
        assert_relative_eq!(grad[0], 0.25);
        assert_relative_eq!(grad[1], 1.0 / 6.0, epsilon = 1e-6);
    }
}
