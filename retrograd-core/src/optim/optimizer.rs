use crate::error::RetrogradError;

/// Trait defining the common interface for optimizers.
///
/// Optimizers update parameters from their accumulated gradients.
pub trait Optimizer {
    /// Performs a single optimization step over all managed parameters,
    /// consuming their gradients.
    fn step(&mut self) -> Result<(), RetrogradError>;

    /// Clears the gradients of all managed parameters.
    ///
    /// Typically called before the backward pass of a new iteration so
    /// gradients do not accumulate across iterations.
    fn zero_grad(&mut self);
}
