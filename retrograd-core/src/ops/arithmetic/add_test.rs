use super::*;
use crate::error::RetrogradError;
use crate::tensor::create::ones;
use crate::tensor::Tensor;

fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

fn create_test_tensor_with_grad(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    let tensor = create_test_tensor(data, shape);
    tensor.requires_grad_(true).unwrap();
    tensor
}

#[test]
fn test_add_tensors_ok() {
    let t1 = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let t2 = create_test_tensor(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]);

    let result = add_op(&t1, &t2).unwrap();
    assert_eq!(result.get_f32_data().unwrap(), vec![6.0, 8.0, 10.0, 12.0]);
    assert_eq!(result.shape(), vec![2, 2]);
    assert!(!result.requires_grad());
}

#[test]
fn test_add_broadcast_row() {
    let t1 = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let t2 = create_test_tensor(vec![10.0, 20.0, 30.0], vec![3]);

    let result = add_op(&t1, &t2).unwrap();
    assert_eq!(result.shape(), vec![2, 3]);
    assert_eq!(
        result.get_f32_data().unwrap(),
        vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]
    );
}

#[test]
fn test_add_scalar_broadcast() {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let s = crate::tensor::create::scalar(10.0).unwrap();
    let result = add_op(&t, &s).unwrap();
    assert_eq!(result.get_f32_data().unwrap(), vec![11.0, 12.0]);
}

#[test]
fn test_add_tensors_shape_mismatch() {
    let t1 = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let t2 = create_test_tensor(vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0], vec![2, 3]);

    let result = add_op(&t1, &t2);
    match result.err().unwrap() {
        RetrogradError::BroadcastError { shape1, shape2 } => {
            assert_eq!(shape1, vec![2, 2]);
            assert_eq!(shape2, vec![2, 3]);
        }
        e => panic!("Incorrect error type returned: {:?}", e),
    }
}

#[test]
fn test_add_propagate_requires_grad() {
    let plain = create_test_tensor(vec![1.0], vec![1]);
    let tracked = create_test_tensor_with_grad(vec![2.0], vec![1]);

    let res1 = add_op(&plain, &tracked).unwrap();
    assert!(res1.requires_grad());
    assert!(res1.grad_fn().is_some());

    let res2 = add_op(&plain, &plain).unwrap();
    assert!(!res2.requires_grad());
    assert!(res2.grad_fn().is_none());
}

#[test]
fn test_add_backward() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_tensor_with_grad(vec![4.0, 5.0, 6.0], vec![3]);

    let result = add_op(&a, &b).unwrap();
    result.backward(Some(ones(&[3]).unwrap())).unwrap();

    assert_eq!(a.grad().unwrap().get_f32_data().unwrap(), vec![1.0; 3]);
    assert_eq!(b.grad().unwrap().get_f32_data().unwrap(), vec![1.0; 3]);
}

#[test]
fn test_add_backward_broadcast_reduces() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let b = create_test_tensor_with_grad(vec![10.0, 20.0, 30.0], vec![3]);

    let result = add_op(&a, &b).unwrap();
    let loss = result.sum().unwrap();
    loss.backward(None).unwrap();

    assert_eq!(a.grad().unwrap().shape(), vec![2, 3]);
    assert_eq!(a.grad().unwrap().get_f32_data().unwrap(), vec![1.0; 6]);

    // b was broadcast over two rows, so each of its elements got two
    // gradient contributions.
    assert_eq!(b.grad().unwrap().shape(), vec![3]);
    assert_eq!(b.grad().unwrap().get_f32_data().unwrap(), vec![2.0; 3]);
}

#[test]
fn test_add_operator_sugar() {
    let t1 = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let t2 = create_test_tensor(vec![3.0, 4.0], vec![2]);
    let result = &t1 + &t2;
    assert_eq!(result.get_f32_data().unwrap(), vec![4.0, 6.0]);
}
