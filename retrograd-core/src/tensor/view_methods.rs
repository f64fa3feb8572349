use crate::error::RetrogradError;
use crate::ops::view::{expand_op, reshape_op, transpose_op};
use crate::tensor::Tensor;

impl Tensor {
    /// Swaps the last two dimensions as a zero-copy view.
    pub fn transpose(&self) -> Result<Tensor, RetrogradError> {
        transpose_op(self)
    }

    /// Reinterprets the tensor with a new shape of equal element count.
    pub fn reshape(&self, new_shape: Vec<usize>) -> Result<Tensor, RetrogradError> {
        reshape_op(self, new_shape)
    }

    /// Materializes the tensor broadcast to `target_shape`.
    pub fn expand(&self, target_shape: &[usize]) -> Result<Tensor, RetrogradError> {
        expand_op(self, target_shape)
    }
}
