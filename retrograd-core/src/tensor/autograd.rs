use crate::autograd::graph::ComputationGraph;
use crate::autograd::BackwardOp;
use crate::error::RetrogradError;
use crate::ops::arithmetic::add_op;
use crate::tensor::create::ones_like;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

impl Tensor {
    /// Checks if the tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` status of this tensor **in place**.
    ///
    /// Only allowed on leaf tensors; a non-leaf's tracking status is implied
    /// by its inputs.
    pub fn requires_grad_(&self, requires_grad: bool) -> Result<(), RetrogradError> {
        let mut guard = self.write_data();
        if guard.grad_fn.is_some() {
            return Err(RetrogradError::RequiresGradOnNonLeaf);
        }
        guard.requires_grad = requires_grad;
        if !requires_grad {
            guard.grad = None;
        }
        Ok(())
    }

    /// Returns the backward operation node that produced this tensor, if any.
    pub fn grad_fn(&self) -> Option<Arc<dyn BackwardOp>> {
        self.read_data().grad_fn.clone()
    }

    /// Returns a clone of the accumulated gradient, if backward has produced one.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Adds `grad_to_add` into this tensor's gradient slot, summing with any
    /// existing gradient.
    pub(crate) fn acc_grad(&self, grad_to_add: Tensor) -> Result<(), RetrogradError> {
        let existing = self.write_data().grad.take();
        let new_grad = match existing {
            Some(existing) => add_op(&existing, &grad_to_add)?,
            None => grad_to_add,
        };
        self.write_data().grad = Some(new_grad);
        Ok(())
    }

    /// Creates a new tensor sharing the same data but detached from the
    /// computation graph (no `grad_fn`, `requires_grad = false`).
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        let detached = TensorData {
            buffer: Arc::clone(&guard.buffer),
            device: guard.device,
            dtype: guard.dtype,
            shape: guard.shape.clone(),
            strides: guard.strides.clone(),
            offset: guard.offset,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        };
        Tensor {
            data: Arc::new(RwLock::new(detached)),
        }
    }

    /// Computes the gradients of this tensor w.r.t. every tracked value in
    /// its graph.
    ///
    /// # Arguments
    /// * `gradient`: seed gradient dL/dself. `None` defaults to ones and is
    ///   only valid for scalar (single-element) tensors; a non-scalar root
    ///   without an explicit seed is `BackwardNonScalar`. An explicit seed
    ///   must match this tensor's shape and dtype.
    ///
    /// Calling backward on an untracked value (no graph, no `requires_grad`)
    /// is `UntrackedRoot`. A tracked leaf simply receives the seed as its
    /// gradient.
    ///
    /// Repeated calls on a live root accumulate into existing gradients; use
    /// `zero_grad` between steps.
    pub fn backward(&self, gradient: Option<Tensor>) -> Result<(), RetrogradError> {
        let (requires_grad, is_leaf) = {
            let guard = self.read_data();
            (guard.requires_grad, guard.grad_fn.is_none())
        };
        if !requires_grad {
            return Err(RetrogradError::UntrackedRoot);
        }

        let seed = match gradient {
            Some(g) => {
                if g.shape() != self.shape() {
                    return Err(RetrogradError::ShapeMismatch {
                        expected: self.shape(),
                        actual: g.shape(),
                        operation: "backward seed".to_string(),
                    });
                }
                if g.dtype() != self.dtype() {
                    return Err(RetrogradError::DTypeMismatch {
                        expected: self.dtype(),
                        actual: g.dtype(),
                        operation: "backward seed".to_string(),
                    });
                }
                g.detach()
            }
            None => {
                if self.numel() != 1 {
                    return Err(RetrogradError::BackwardNonScalar);
                }
                ones_like(self)?
            }
        };

        if is_leaf {
            log::debug!("backward() called on a leaf root; gradient is the seed");
            return self.acc_grad(seed);
        }

        ComputationGraph::new().backward(self, seed)
    }

    /// Resets the gradient of this tensor to `None`.
    pub fn zero_grad(&self) {
        let mut guard = self.write_data();
        guard.grad = None;
    }
}
