use super::*;
use approx::assert_relative_eq;
use crate::tensor::Tensor;

fn tracked(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    let t = Tensor::new(data, shape).unwrap();
    t.requires_grad_(true).unwrap();
    t
}

#[test]
fn test_div_forward() {
    let a = Tensor::new(vec![10.0, 9.0], vec![2]).unwrap();
    let b = Tensor::new(vec![2.0, 3.0], vec![2]).unwrap();
    let out = div_op(&a, &b).unwrap();
    assert_eq!(out.get_f32_data().unwrap(), vec![5.0, 3.0]);
}

#[test]
fn test_div_by_zero_is_numerical_error() {
    let a = Tensor::new(vec![1.0], vec![1]).unwrap();
    let b = Tensor::new(vec![0.0], vec![1]).unwrap();
    match div_op(&a, &b).err().unwrap() {
        RetrogradError::NumericalError { operation, .. } => {
            assert_eq!(operation, "div_op");
        }
        e => panic!("expected NumericalError, got {:?}", e),
    }
}

#[test]
fn test_div_backward() {
    let a = tracked(vec![6.0], vec![1]);
    let b = tracked(vec![2.0], vec![1]);

    let out = div_op(&a, &b).unwrap();
    let loss = out.sum().unwrap();
    loss.backward(None).unwrap();

    // d(a/b)/da = 1/b, d(a/b)/db = -a/b^2
    assert_relative_eq!(a.grad().unwrap().get_f32_data().unwrap()[0], 0.5);
    assert_relative_eq!(b.grad().unwrap().get_f32_data().unwrap()[0], -1.5);
}

#[test]
fn test_div_backward_broadcast_divisor() {
    // a: [2, 2], b scalar divisor
    let a = tracked(vec![2.0, 4.0, 6.0, 8.0], vec![2, 2]);
    let b = tracked(vec![2.0], vec![]);

    let out = div_op(&a, &b).unwrap();
    let loss = out.sum().unwrap();
    loss.backward(None).unwrap();

    assert_eq!(a.grad().unwrap().get_f32_data().unwrap(), vec![0.5; 4]);
    // d(sum(a/b))/db = sum(-a/b^2) = -(2+4+6+8)/4 = -5
    let grad_b = b.grad().unwrap();
    assert_eq!(grad_b.shape(), Vec::<usize>::new());
    assert_relative_eq!(grad_b.get_f32_data().unwrap()[0], -5.0);
}
