use crate::error::RetrogradError;
use crate::ops::arithmetic::mul_op;
use crate::ops::reduction::sum_op;
use crate::tensor::create::{scalar, scalar_f64};
use crate::tensor::Tensor;
use crate::types::DType;

/// Mean over all elements, built compositionally as `sum(x) * (1/n)`.
///
/// Both stages record their own backward contexts, so the gradient
/// (dX = dZ/n broadcast everywhere) falls out of the existing rules.
pub fn mean_op(input: &Tensor) -> Result<Tensor, RetrogradError> {
    let numel = input.numel();
    if numel == 0 {
        return Err(RetrogradError::NumericalError {
            operation: "mean_op".to_string(),
            reason: "mean of an empty tensor".to_string(),
        });
    }

    let total = sum_op(input, None, false)?;
    let inv_n = match input.dtype() {
        DType::F32 => scalar(1.0 / numel as f32)?,
        DType::F64 => scalar_f64(1.0 / numel as f64)?,
    };
    mul_op(&total, &inv_n)
}
