use super::*;
use approx::assert_relative_eq;
use crate::tensor::Tensor;

#[test]
fn test_pow_forward() {
    let a = Tensor::new(vec![2.0, 3.0, 4.0], vec![3]).unwrap();
    let out = pow_op(&a, 2.0).unwrap();
    assert_eq!(out.get_f32_data().unwrap(), vec![4.0, 9.0, 16.0]);
}

#[test]
fn test_pow_backward_power_rule() {
    let a = Tensor::new(vec![5.0], vec![1]).unwrap();
    a.requires_grad_(true).unwrap();

    let out = pow_op(&a, 3.0).unwrap();
    let loss = out.sum().unwrap();
    loss.backward(None).unwrap();

    // d(x^3)/dx at 5 = 3 * 25 = 75
    assert_relative_eq!(a.grad().unwrap().get_f32_data().unwrap()[0], 75.0);
}

#[test]
fn test_pow_fractional_exponent_f64() {
    let a = Tensor::new_f64(vec![4.0], vec![1]).unwrap();
    a.requires_grad_(true).unwrap();

    let out = pow_op(&a, 0.5).unwrap();
    assert_relative_eq!(out.get_f64_data().unwrap()[0], 2.0);

    let loss = out.sum().unwrap();
    loss.backward(None).unwrap();

    // d(sqrt(x))/dx at 4 = 0.5 * 4^-0.5 = 0.25
    assert_relative_eq!(a.grad().unwrap().get_f64_data().unwrap()[0], 0.25, epsilon = 1e-12);
}

#[test]
fn test_pow_negative_base_fractional_exponent_surfaces_nan() {
    let a = Tensor::new(vec![-1.0], vec![1]).unwrap();
    a.requires_grad_(true).unwrap();

    // (-1)^0.5 is NaN in the forward values; the backward traversal must
    // refuse to accumulate the resulting non-finite gradient.
    let out = pow_op(&a, 0.5).unwrap();
    let loss = out.sum().unwrap();
    assert!(loss.backward(None).is_err());
}
