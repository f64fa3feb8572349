#![allow(dead_code)]

use retrograd_core::Tensor;

/// Creates an F32 test tensor, panicking on invalid shapes.
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

/// Creates an F32 leaf tensor with gradient tracking enabled.
pub fn create_tracked_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    let tensor = create_test_tensor(data, shape);
    tensor
        .requires_grad_(true)
        .expect("enabling requires_grad on a fresh leaf cannot fail");
    tensor
}
