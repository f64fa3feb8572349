use crate::error::RetrogradError;
use crate::ops::arithmetic::add_op;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Stable identity of a graph node: the address of its `RwLock<TensorData>`.
///
/// Used only as a map/set key; the corresponding `Arc`s are held by the
/// traversal itself, so the pointer can never dangle while in use.
pub type NodeId = *const RwLock<TensorData>;

/// Builds a topological ordering of the computation graph reachable from
/// `root`: every node appears after all of its inputs.
///
/// Iterative post-order DFS. The graph is a DAG by construction (each node is
/// created fresh per forward evaluation), so no cycle handling is needed.
pub(crate) fn topological_sort(root: &Tensor) -> Vec<Tensor> {
    enum Visit {
        Enter(Tensor),
        Exit(Tensor),
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut order: Vec<Tensor> = Vec::new();
    let mut stack = vec![Visit::Enter(root.clone())];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node) => {
                if !visited.insert(node.id_ptr()) {
                    continue;
                }
                let grad_fn = node.grad_fn();
                stack.push(Visit::Exit(node));
                if let Some(op) = grad_fn {
                    for input in op.inputs() {
                        if !visited.contains(&std::sync::Arc::as_ptr(&input)) {
                            stack.push(Visit::Enter(Tensor { data: input }));
                        }
                    }
                }
            }
            Visit::Exit(node) => order.push(node),
        }
    }
    order
}

/// Drives one backward pass over the graph owned by a root tensor.
///
/// Output gradients are accumulated in a map keyed by node identity, so each
/// node's gradient is fully summed from all of its consumers before the
/// node's own backward function runs. Gradient slots on the tensors are only
/// written once the whole traversal has succeeded.
pub(crate) struct ComputationGraph {
    grads: HashMap<NodeId, Tensor>,
}

impl ComputationGraph {
    pub(crate) fn new() -> Self {
        ComputationGraph {
            grads: HashMap::new(),
        }
    }

    pub(crate) fn backward(mut self, root: &Tensor, seed: Tensor) -> Result<(), RetrogradError> {
        let order = topological_sort(root);
        log::debug!(
            "backward: traversing {} nodes from root {:?}",
            order.len(),
            root.id_ptr()
        );

        self.grads.insert(root.id_ptr(), seed);

        // Reverse topological order: consumers before producers.
        for node in order.iter().rev() {
            let Some(op) = node.grad_fn() else {
                continue;
            };
            // No accumulated gradient means no differentiated path reached
            // this node; nothing to propagate through it.
            let Some(grad_output) = self.grads.get(&node.id_ptr()).cloned() else {
                continue;
            };

            let input_grads = op.backward(&grad_output)?;
            let inputs = op.inputs();
            if input_grads.len() != inputs.len() {
                return Err(RetrogradError::InternalError(format!(
                    "BackwardOp {:?} returned {} gradients for {} inputs",
                    op,
                    input_grads.len(),
                    inputs.len()
                )));
            }

            for (input_node, grad) in inputs.into_iter().zip(input_grads) {
                let input = Tensor { data: input_node };
                let expected = input.shape();
                if grad.shape() != expected {
                    return Err(RetrogradError::ShapeMismatch {
                        expected,
                        actual: grad.shape(),
                        operation: format!("gradient accumulation ({:?})", op),
                    });
                }
                ensure_finite(&grad, &op)?;

                // Gradients are plain values; drop any graph they may carry.
                let grad = grad.detach();
                let id = input.id_ptr();
                match self.grads.remove(&id) {
                    Some(existing) => {
                        let summed = add_op(&existing, &grad)?;
                        self.grads.insert(id, summed);
                    }
                    None => {
                        self.grads.insert(id, grad);
                    }
                }
            }
        }

        // Install phase: only reached when every backward function succeeded,
        // so callers never observe partially-written gradient state.
        for node in order.iter() {
            if let Some(grad) = self.grads.remove(&node.id_ptr()) {
                if node.requires_grad() {
                    node.acc_grad(grad)?;
                }
            }
        }
        Ok(())
    }
}

/// Rejects NaN/infinite gradient values instead of letting them silently
/// poison downstream accumulation.
fn ensure_finite(
    grad: &Tensor,
    op: &std::sync::Arc<dyn crate::autograd::BackwardOp>,
) -> Result<(), RetrogradError> {
    let finite = match grad.dtype() {
        DType::F32 => grad.get_f32_data()?.iter().all(|v| v.is_finite()),
        DType::F64 => grad.get_f64_data()?.iter().all(|v| v.is_finite()),
    };
    if finite {
        Ok(())
    } else {
        Err(RetrogradError::NumericalError {
            operation: format!("{:?}", op),
            reason: "non-finite gradient value".to_string(),
        })
    }
}
