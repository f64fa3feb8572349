use crate::error::RetrogradError;
use crate::tensor::Tensor;
use std::fmt;
use std::ops::Deref;

/// A wrapper around a `Tensor` marking it as a learnable parameter.
/// Parameters always have `requires_grad` set to `true`.
pub struct Parameter(Tensor);

impl Parameter {
    /// Creates a new Parameter from a leaf tensor, enabling gradient tracking.
    ///
    /// Fails with `RequiresGradOnNonLeaf` if the tensor was produced by an
    /// operation.
    pub fn new(tensor: Tensor) -> Result<Self, RetrogradError> {
        tensor.requires_grad_(true)?;
        Ok(Parameter(tensor))
    }

    /// Consumes the Parameter and returns the underlying Tensor.
    pub fn into_inner(self) -> Tensor {
        self.0
    }
}

/// Immutable access to the underlying Tensor.
impl Deref for Parameter {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({:?})", self.0)
    }
}

impl Clone for Parameter {
    /// Cloning a Parameter shallow-clones the underlying Tensor.
    fn clone(&self) -> Self {
        Parameter(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::create::zeros;

    #[test]
    fn test_parameter_requires_grad() {
        let p = Parameter::new(zeros(&[2, 2]).unwrap()).unwrap();
        assert!(p.requires_grad());
    }

    #[test]
    fn test_parameter_rejects_non_leaf() {
        let a = zeros(&[2]).unwrap();
        a.requires_grad_(true).unwrap();
        let b = a.sum().unwrap();
        assert!(Parameter::new(b).is_err());
    }
}
