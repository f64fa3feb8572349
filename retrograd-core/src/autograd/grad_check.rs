use crate::error::RetrogradError;
use crate::ops::arithmetic::mul_op;
use crate::ops::reduction::sum_op;
use crate::tensor::Tensor;
use crate::types::DType;
use approx::relative_eq;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad} != numerical {numerical_grad} (difference {difference})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(RetrogradError),

    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(RetrogradError),

    #[error("Input tensor {input_index} requires grad but has no gradient after backward")]
    MissingAnalyticalGrad { input_index: usize },

    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index} (loss+: {loss_plus}, loss-: {loss_minus})")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Unsupported data type for gradient check: expected F32, got {0:?}")]
    UnsupportedDType(DType),

    #[error("Gradient check input tensors must be leaf nodes (input {input_index} has a grad_fn)")]
    InputNotLeaf { input_index: usize },

    #[error("Function did not propagate requires_grad correctly")]
    RequiresGradPropagationError,

    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(RetrogradError),
}

impl From<RetrogradError> for GradCheckError {
    fn from(err: RetrogradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against central finite differences.
///
/// `func` is evaluated once for the analytical gradients, then twice per
/// input element with that element perturbed by ±`epsilon`. The scalar loss
/// being differentiated is `sum(output ⊙ output_grad)`, so `output_grad`
/// plays the role of the backward seed on both sides of the comparison.
///
/// Only F32 CPU leaf inputs are supported.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, RetrogradError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if input.dtype() != DType::F32 {
            return Err(GradCheckError::UnsupportedDType(input.dtype()));
        }
        if input.requires_grad() && input.grad_fn().is_some() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
    }
    if output_grad.dtype() != DType::F32 {
        return Err(GradCheckError::UnsupportedDType(output_grad.dtype()));
    }

    // Analytical pass.
    for input in inputs {
        input.clear_grad();
    }
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;

    let any_requires_grad = inputs.iter().any(|t| t.requires_grad());
    if any_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if output.requires_grad() {
        output
            .backward(Some(output_grad.clone()))
            .map_err(GradCheckError::BackwardPassError)?;
    }

    let analytical_grads: Vec<Option<Tensor>> = inputs.iter().map(|t| t.grad()).collect();

    // Numerical pass, element by element.
    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }

        let analytical_grad_tensor = analytical_grads[i]
            .as_ref()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?;
        let analytical_data: Vec<f64> = analytical_grad_tensor
            .get_f32_data()?
            .iter()
            .map(|&x| x as f64)
            .collect();

        let original_data: Vec<f64> = original_input
            .get_f32_data()?
            .iter()
            .map(|&x| x as f64)
            .collect();
        let shape = original_input.shape();

        for elem_idx in 0..original_input.numel() {
            let loss_at = |delta: f64| -> Result<f64, GradCheckError> {
                let mut perturbed_data = original_data.clone();
                perturbed_data[elem_idx] += delta;
                let perturbed = Tensor::new(
                    perturbed_data.iter().map(|&x| x as f32).collect(),
                    shape.clone(),
                )?;
                let mut probe_inputs: Vec<Tensor> = inputs.to_vec();
                probe_inputs[i] = perturbed;
                let probe_output =
                    func(&probe_inputs).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&probe_output, output_grad)
            };

            let loss_plus = loss_at(epsilon)?;
            let loss_minus = loss_at(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytical_grad = analytical_data[elem_idx];
            if !relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }

    Ok(())
}

/// Scalar loss used on the numerical side: sum of the output weighted by the
/// seed gradient. Its derivative matches what backward propagates from the
/// same seed.
fn calculate_loss(output: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::TensorError(RetrogradError::ShapeMismatch {
            expected: output.shape(),
            actual: output_grad.shape(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    let weighted = mul_op(output, output_grad)?;
    let loss = sum_op(&weighted, None, false)?;
    Ok(loss.get_f32_data()?[0] as f64)
}
