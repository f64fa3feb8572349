use crate::error::RetrogradError;
use crate::ops::arithmetic::pow_op;
use crate::ops::linalg::matmul_op;
use crate::ops::math_elem::{cos_op, exp_op, ln_op, sin_op, sqrt_op};
use crate::tensor::Tensor;

impl Tensor {
    /// Matrix product with another 2-D tensor.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, RetrogradError> {
        matmul_op(self, other)
    }

    /// Elementwise power with a scalar exponent.
    pub fn pow(&self, exponent: f64) -> Result<Tensor, RetrogradError> {
        pow_op(self, exponent)
    }

    /// Elementwise exponential.
    pub fn exp(&self) -> Result<Tensor, RetrogradError> {
        exp_op(self)
    }

    /// Elementwise natural logarithm.
    pub fn ln(&self) -> Result<Tensor, RetrogradError> {
        ln_op(self)
    }

    /// Elementwise sine.
    pub fn sin(&self) -> Result<Tensor, RetrogradError> {
        sin_op(self)
    }

    /// Elementwise cosine.
    pub fn cos(&self) -> Result<Tensor, RetrogradError> {
        cos_op(self)
    }

    /// Elementwise square root.
    pub fn sqrt(&self) -> Result<Tensor, RetrogradError> {
        sqrt_op(self)
    }
}
