use crate::error::RetrogradError;
use crate::ops::reduction::{mean_op, sum_op};
use crate::tensor::Tensor;

impl Tensor {
    /// Sums all elements into a scalar tensor.
    pub fn sum(&self) -> Result<Tensor, RetrogradError> {
        sum_op(self, None, false)
    }

    /// Sums elements along the given axes.
    pub fn sum_axes(&self, axes: &[usize], keep_dims: bool) -> Result<Tensor, RetrogradError> {
        sum_op(self, Some(axes), keep_dims)
    }

    /// Mean over all elements.
    pub fn mean(&self) -> Result<Tensor, RetrogradError> {
        mean_op(self)
    }
}
