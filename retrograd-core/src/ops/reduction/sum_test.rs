use super::*;
use approx::assert_relative_eq;
use crate::error::RetrogradError;
use crate::tensor::Tensor;

fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

#[test]
fn test_sum_all() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, None, false).unwrap();
    assert_eq!(result.shape(), Vec::<usize>::new());
    assert_relative_eq!(result.get_f32_data().unwrap()[0], 21.0);
}

#[test]
fn test_sum_axis_0() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, Some(&[0]), false).unwrap();
    assert_eq!(result.shape(), vec![3]);
    assert_eq!(result.get_f32_data().unwrap(), vec![5.0, 7.0, 9.0]);
}

#[test]
fn test_sum_axis_1() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let result = sum_op(&t, Some(&[1]), false).unwrap();
    assert_eq!(result.shape(), vec![2]);
    assert_eq!(result.get_f32_data().unwrap(), vec![6.0, 15.0]);
}

#[test]
fn test_sum_axes_multiple() {
    let t = create_test_tensor(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        vec![2, 2, 2],
    );
    let result = sum_op(&t, Some(&[0, 2]), false).unwrap();
    assert_eq!(result.shape(), vec![2]);
    assert_eq!(result.get_f32_data().unwrap(), vec![14.0, 22.0]);
}

#[test]
fn test_sum_keep_dims() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let result = sum_op(&t, Some(&[0]), true).unwrap();
    assert_eq!(result.shape(), vec![1, 2]);
    assert_eq!(result.get_f32_data().unwrap(), vec![4.0, 6.0]);

    let result_all = sum_op(&t, None, true).unwrap();
    assert_eq!(result_all.shape(), vec![1, 1]);
    assert_relative_eq!(result_all.get_f32_data().unwrap()[0], 10.0);
}

#[test]
fn test_sum_invalid_axis() {
    let t = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let result = sum_op(&t, Some(&[1]), false);
    match result.err().unwrap() {
        RetrogradError::IndexOutOfBounds { index, shape } => {
            assert_eq!(index, vec![1]);
            assert_eq!(shape, vec![2]);
        }
        e => panic!("Expected IndexOutOfBounds error, got {:?}", e),
    }
}

#[test]
fn test_sum_backward_broadcasts_seed() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    t.requires_grad_(true).unwrap();

    let loss = sum_op(&t, None, false).unwrap();
    loss.backward(None).unwrap();

    let grad = t.grad().unwrap();
    assert_eq!(grad.shape(), vec![2, 2]);
    assert_eq!(grad.get_f32_data().unwrap(), vec![1.0; 4]);
}

#[test]
fn test_sum_axis_backward() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    t.requires_grad_(true).unwrap();

    let per_row = sum_op(&t, Some(&[1]), false).unwrap();
    let seed = Tensor::new(vec![1.0, 10.0], vec![2]).unwrap();
    per_row.backward(Some(seed)).unwrap();

    // Each row's gradient is that row's seed, repeated across columns.
    let grad = t.grad().unwrap();
    assert_eq!(
        grad.get_f32_data().unwrap(),
        vec![1.0, 1.0, 1.0, 10.0, 10.0, 10.0]
    );
}

#[test]
fn test_sum_of_transposed_view() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let t_t = t.transpose().unwrap();
    let result = sum_op(&t_t, Some(&[1]), false).unwrap();
    // Rows of the transpose are columns of the original.
    assert_eq!(result.get_f32_data().unwrap(), vec![4.0, 6.0]);
}
