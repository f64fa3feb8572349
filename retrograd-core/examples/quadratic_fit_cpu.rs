//! Fits the coefficients of y = 3x² + 2x + 1 by gradient descent.
//!
//! Builds a feature matrix [x², x, 1], tracks a weight column vector, and
//! minimizes the mean squared error with plain SGD. Run with:
//!
//! ```sh
//! cargo run --example quadratic_fit_cpu
//! ```

use retrograd_core::nn::Parameter;
use retrograd_core::optim::{Optimizer, Sgd};
use retrograd_core::tensor::create::randn;
use retrograd_core::{RetrogradError, Tensor};

fn main() -> Result<(), RetrogradError> {
    let n = 32;
    let xs: Vec<f32> = (0..n)
        .map(|i| -1.0 + 2.0 * i as f32 / (n - 1) as f32)
        .collect();

    // Features: one row [x², x, 1] per sample.
    let mut feature_data = Vec::with_capacity(n * 3);
    for &x in &xs {
        feature_data.extend_from_slice(&[x * x, x, 1.0]);
    }
    let features = Tensor::new(feature_data, vec![n, 3])?;

    let target_data: Vec<f32> = xs.iter().map(|&x| 3.0 * x * x + 2.0 * x + 1.0).collect();
    let targets = Tensor::new(target_data, vec![n, 1])?;

    // Small random init for the three coefficients.
    let init = randn(&[3, 1])?;
    let init_scaled: Vec<f32> = init.get_f32_data()?.iter().map(|v| v * 0.1).collect();
    let weights = Parameter::new(Tensor::new(init_scaled, vec![3, 1])?)?;

    let mut optimizer = Sgd::new([weights.clone()], 0.5);

    for epoch in 0..2000 {
        let predictions = features.matmul(&weights)?;
        let residual = &predictions - &targets;
        let loss = (&residual * &residual).mean()?;

        loss.backward(None)?;
        optimizer.step()?;

        if epoch % 200 == 0 {
            println!("epoch {:4}: mse = {:.6}", epoch, loss.item()?);
        }
    }

    let fitted = weights.get_f32_data()?;
    println!(
        "fitted coefficients: a = {:.4}, b = {:.4}, c = {:.4} (target 3, 2, 1)",
        fitted[0], fitted[1], fitted[2]
    );
    Ok(())
}
