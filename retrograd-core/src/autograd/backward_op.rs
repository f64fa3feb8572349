use crate::error::RetrogradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

/// Defines the interface for the backward pass of a differentiable tensor operation.
///
/// Any operation that creates a non-leaf `Tensor` must have an associated
/// `BackwardOp` implementation. It is stored in the output tensor's `grad_fn`
/// field and invoked during `backward()` to propagate gradients according to
/// the chain rule.
///
/// `Debug + Send + Sync` bounds because the `Arc<dyn BackwardOp>` is shared
/// and its name appears in error messages.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes the gradients of the operation's inputs, given the gradient of
    /// the operation's output.
    ///
    /// Receives dL/dOutput (`grad_output`) and must compute dL/dInput_i for
    /// each input `i`.
    ///
    /// # Returns
    /// * `Ok(Vec<Tensor>)`: one gradient per input. The order **must** match
    ///   the order returned by `inputs()`, and each gradient must have the
    ///   same shape as the corresponding input — the graph traversal rejects
    ///   violations with `ShapeMismatch`.
    /// * `Err(RetrogradError)`: if gradient computation fails.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, RetrogradError>;

    /// Returns the input `TensorData` nodes that participated in the forward
    /// operation, linking this node back to its predecessors in the graph.
    ///
    /// The returned `Arc`s keep the inputs alive for the duration of the
    /// backward pass; `Arc::as_ptr` of each serves as the node's stable
    /// identity. The order **must** match the gradients from `backward()`.
    fn inputs(&self) -> Vec<Arc<RwLock<TensorData>>>;
}
