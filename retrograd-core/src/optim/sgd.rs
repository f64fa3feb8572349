use crate::buffer::{Buffer, CpuBuffer};
use crate::error::RetrogradError;
use crate::nn::parameter::Parameter;
use crate::optim::optimizer::Optimizer;
use crate::tensor::utils::calculate_strides;
use crate::types::DType;
use std::sync::Arc;

/// Plain stochastic gradient descent: `w ← w − lr · dw`.
///
/// The update is applied in place — each parameter tensor keeps its identity
/// and its CPU buffer is replaced under the write lock. The gradient slot is
/// cleared at the end of every step so accumulation never leaks into the
/// next iteration. Parameters without a gradient are skipped.
#[derive(Debug)]
pub struct Sgd {
    params: Vec<Parameter>,
    // Le pas d'apprentissage est partagé par tous les paramètres.
    lr: f64,
}

impl Sgd {
    pub fn new(params: impl IntoIterator<Item = Parameter>, lr: f64) -> Self {
        Sgd {
            params: params.into_iter().collect(),
            lr,
        }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self) -> Result<(), RetrogradError> {
        for param in &self.params {
            let Some(grad) = param.grad() else {
                continue;
            };

            if grad.dtype() != param.dtype() {
                return Err(RetrogradError::DTypeMismatch {
                    expected: param.dtype(),
                    actual: grad.dtype(),
                    operation: "Sgd::step".to_string(),
                });
            }
            if grad.shape() != param.shape() {
                return Err(RetrogradError::ShapeMismatch {
                    expected: param.shape(),
                    actual: grad.shape(),
                    operation: "Sgd::step".to_string(),
                });
            }

            match param.dtype() {
                DType::F32 => {
                    let lr = self.lr as f32;
                    let weights = param.get_f32_data()?;
                    let grads = grad.get_f32_data()?;
                    let updated: Vec<f32> = weights
                        .iter()
                        .zip(grads.iter())
                        .map(|(w, g)| w - lr * g)
                        .collect();
                    let mut guard = param.write_data();
                    guard.buffer = Arc::new(Buffer::Cpu(CpuBuffer::F32(Arc::new(updated))));
                    guard.strides = calculate_strides(&guard.shape);
                    guard.offset = 0;
                }
                DType::F64 => {
                    let weights = param.get_f64_data()?;
                    let grads = grad.get_f64_data()?;
                    let updated: Vec<f64> = weights
                        .iter()
                        .zip(grads.iter())
                        .map(|(w, g)| w - self.lr * g)
                        .collect();
                    let mut guard = param.write_data();
                    guard.buffer = Arc::new(Buffer::Cpu(CpuBuffer::F64(Arc::new(updated))));
                    guard.strides = calculate_strides(&guard.shape);
                    guard.offset = 0;
                }
            }

            param.zero_grad();
            log::trace!("sgd step applied to parameter {:?}", param.shape());
        }
        Ok(())
    }

    fn zero_grad(&mut self) {
        for param in &self.params {
            param.zero_grad();
        }
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
