use approx::assert_relative_eq;
use retrograd_core::nn::Parameter;
use retrograd_core::optim::{Optimizer, Sgd};
use retrograd_core::tensor::create::{ones, scalar_f64};
use retrograd_core::{RetrogradError, Tensor};

mod common;
use common::create_tracked_tensor;

/// f(x) = 3x² + 2x + 1, built from tracked ops.
fn polynomial(x: &Tensor) -> Result<Tensor, RetrogradError> {
    let three = scalar_f64(3.0)?;
    let two = scalar_f64(2.0)?;
    let one = scalar_f64(1.0)?;

    let x_sq = x.pow(2.0)?;
    let term1 = &three * &x_sq;
    let term2 = &two * x;
    let partial = &term1 + &term2;
    Ok(&partial + &one)
}

/// Derivative of `polynomial` at `x0`, computed by the engine on a fresh
/// graph per call.
fn polynomial_derivative(x0: f64) -> f64 {
    let x = Tensor::new_f64(vec![x0], vec![]).unwrap();
    x.requires_grad_(true).unwrap();
    let y = polynomial(&x).unwrap();
    y.backward(None).unwrap();
    x.grad().unwrap().get_f64_data().unwrap()[0]
}

#[test]
fn test_polynomial_derivative_matches_analytic() {
    // f'(x) = 6x + 2, so f'(5) = 32.
    assert_relative_eq!(polynomial_derivative(5.0), 32.0, epsilon = 1e-9);
}

#[test]
fn test_polynomial_derivative_matches_finite_difference() {
    let h = 1e-6;
    let x0 = 5.0;
    let f = |x: f64| {
        let t = Tensor::new_f64(vec![x], vec![]).unwrap();
        polynomial(&t).unwrap().get_f64_data().unwrap()[0]
    };
    let numerical = (f(x0 + h) - f(x0 - h)) / (2.0 * h);
    assert_relative_eq!(polynomial_derivative(x0), numerical, epsilon = 1e-4);
}

#[test]
fn test_second_derivative_of_polynomial() {
    // The engine is first-order; the second derivative is pinned by running
    // the central-difference quotient over the engine's first derivative.
    // f''(x) = 6 everywhere.
    let h = 1e-5;
    let second = (polynomial_derivative(5.0 + h) - polynomial_derivative(5.0 - h)) / (2.0 * h);
    assert_relative_eq!(second, 6.0, epsilon = 1e-4);
}

#[test]
fn test_taylor_sine_derivative_approximates_cosine() {
    // sin(x) ≈ x - x³/3! + x⁵/5! - x⁷/7!; its derivative at 0.5 should be
    // within tolerance of cos(0.5) ≈ 0.8776.
    let x = Tensor::new_f64(vec![0.5], vec![]).unwrap();
    x.requires_grad_(true).unwrap();

    let t1 = x.clone();
    let t3 = &x.pow(3.0).unwrap() / &scalar_f64(6.0).unwrap();
    let t5 = &x.pow(5.0).unwrap() / &scalar_f64(120.0).unwrap();
    let t7 = &x.pow(7.0).unwrap() / &scalar_f64(5040.0).unwrap();

    let taylor_sine = &(&(&t1 - &t3) + &t5) - &t7;
    taylor_sine.backward(None).unwrap();

    let grad = x.grad().unwrap().get_f64_data().unwrap()[0];
    assert_relative_eq!(grad, 0.5f64.cos(), epsilon = 1e-5);
}

#[test]
fn test_multi_input_gradients_of_affine_sum() {
    // loss(W, b, x) = sum(W·x + b)
    let w = create_tracked_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let x = create_tracked_tensor(vec![7.0, 8.0, 9.0], vec![3, 1]);
    let b = create_tracked_tensor(vec![0.5, -0.5], vec![2, 1]);

    let wx = w.matmul(&x).unwrap();
    let affine = &wx + &b;
    let loss = affine.sum().unwrap();
    loss.backward(None).unwrap();

    // dW = ones·xᵗ: every row of dW is x.
    let grad_w = w.grad().unwrap();
    assert_eq!(grad_w.shape(), vec![2, 3]);
    assert_eq!(
        grad_w.get_f32_data().unwrap(),
        vec![7.0, 8.0, 9.0, 7.0, 8.0, 9.0]
    );

    // db = ones of b's shape.
    let grad_b = b.grad().unwrap();
    assert_eq!(grad_b.shape(), vec![2, 1]);
    assert_eq!(grad_b.get_f32_data().unwrap(), vec![1.0, 1.0]);

    // dx = Wᵗ·ones: the column sums of W.
    let grad_x = x.grad().unwrap();
    assert_eq!(grad_x.shape(), vec![3, 1]);
    assert_eq!(grad_x.get_f32_data().unwrap(), vec![5.0, 7.0, 9.0]);
}

#[test]
fn test_gradient_accumulates_across_consumers() {
    // x feeds two separate operations; its gradient is the sum of both paths.
    let x = create_tracked_tensor(vec![2.0], vec![1]);
    let a = Tensor::new(vec![3.0], vec![1]).unwrap();
    let b = Tensor::new(vec![10.0], vec![1]).unwrap();

    let path1 = &x * &a;
    let path2 = &x * &b;
    let loss = (&path1 + &path2).sum().unwrap();
    loss.backward(None).unwrap();

    // d(x·a + x·b)/dx = a + b = 13
    assert_eq!(x.grad().unwrap().get_f32_data().unwrap(), vec![13.0]);
}

#[test]
fn test_diamond_graph_accumulates_through_shared_value() {
    // y = x²; both consumers of y feed the root: z = y·c1 + y·c2.
    let x = create_tracked_tensor(vec![3.0], vec![1]);
    let c1 = Tensor::new(vec![2.0], vec![1]).unwrap();
    let c2 = Tensor::new(vec![5.0], vec![1]).unwrap();

    let y = &x * &x;
    let z = &(&y * &c1) + &(&y * &c2);
    z.sum().unwrap().backward(None).unwrap();

    // dz/dy = c1 + c2 = 7, dy/dx = 2x = 6 -> dz/dx = 42
    assert_eq!(x.grad().unwrap().get_f32_data().unwrap(), vec![42.0]);
}

#[test]
fn test_grad_reset_is_idempotent_across_steps() {
    let w = Parameter::new(Tensor::new(vec![1.0, 1.0], vec![2]).unwrap()).unwrap();
    let scale = Tensor::new(vec![2.0, 4.0], vec![2]).unwrap();

    let loss = (&*w * &scale).sum().unwrap();
    loss.backward(None).unwrap();
    assert_eq!(w.grad().unwrap().get_f32_data().unwrap(), vec![2.0, 4.0]);

    let mut opt = Sgd::new([w.clone()], 0.1);
    opt.step().unwrap();
    assert!(w.grad().is_none(), "grad slot must be empty after a step");

    // A fresh, unrelated backward must not see residue from the prior step.
    let loss2 = (&*w * &scale).sum().unwrap();
    loss2.backward(None).unwrap();
    assert_eq!(
        w.grad().unwrap().get_f32_data().unwrap(),
        vec![2.0, 4.0],
        "second backward must start from a clean slate"
    );
}

#[test]
fn test_backward_on_untracked_value_is_error() {
    let t = Tensor::new(vec![1.0], vec![1]).unwrap();
    assert!(matches!(
        t.backward(None).err().unwrap(),
        RetrogradError::UntrackedRoot
    ));
}

#[test]
fn test_backward_non_scalar_without_seed_is_error() {
    let t = create_tracked_tensor(vec![1.0, 2.0], vec![2]);
    let y = &t * &t;
    assert!(matches!(
        y.backward(None).err().unwrap(),
        RetrogradError::BackwardNonScalar
    ));
    // With an explicit seed it works.
    y.backward(Some(ones(&[2]).unwrap())).unwrap();
    assert_eq!(t.grad().unwrap().get_f32_data().unwrap(), vec![2.0, 4.0]);
}

#[test]
fn test_backward_seed_shape_mismatch_is_error() {
    let t = create_tracked_tensor(vec![1.0, 2.0], vec![2]);
    let y = &t * &t;
    let bad_seed = ones(&[3]).unwrap();
    assert!(matches!(
        y.backward(Some(bad_seed)).err().unwrap(),
        RetrogradError::ShapeMismatch { .. }
    ));
}

#[test]
fn test_grad_is_none_for_unreachable_values() {
    let x = create_tracked_tensor(vec![1.0], vec![1]);
    let unrelated = create_tracked_tensor(vec![5.0], vec![1]);

    let loss = (&x * &x).sum().unwrap();
    loss.backward(None).unwrap();

    assert!(x.grad().is_some());
    assert!(unrelated.grad().is_none());
}

#[test]
fn test_backward_on_tracked_leaf_receives_seed() {
    let x = create_tracked_tensor(vec![2.5], vec![1]);
    x.backward(None).unwrap();
    assert_eq!(x.grad().unwrap().get_f32_data().unwrap(), vec![1.0]);
}
