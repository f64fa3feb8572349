// src/tensor/create.rs

use crate::error::RetrogradError;
use crate::tensor::Tensor;
use crate::types::DType;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Creates a new F32 tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![0.0f32; numel], shape.to_vec())
}

/// Creates a new F64 tensor filled with zeros with the specified shape.
pub fn zeros_f64(shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    Tensor::new_f64(vec![0.0f64; numel], shape.to_vec())
}

/// Creates a new F32 tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![1.0f32; numel], shape.to_vec())
}

/// Creates a new F64 tensor filled with ones with the specified shape.
pub fn ones_f64(shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    Tensor::new_f64(vec![1.0f64; numel], shape.to_vec())
}

/// Creates a new F32 tensor filled with a specific value.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a new F64 tensor filled with a specific value.
pub fn full_f64(shape: &[usize], value: f64) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    Tensor::new_f64(vec![value; numel], shape.to_vec())
}

/// Creates a scalar (shape `[]`) F32 tensor.
pub fn scalar(value: f32) -> Result<Tensor, RetrogradError> {
    Tensor::new(vec![value], vec![])
}

/// Creates a scalar (shape `[]`) F64 tensor.
pub fn scalar_f64(value: f64) -> Result<Tensor, RetrogradError> {
    Tensor::new_f64(vec![value], vec![])
}

/// Creates a new tensor filled with zeros, matching the input's shape and dtype.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, RetrogradError> {
    let shape = tensor.shape();
    match tensor.dtype() {
        DType::F32 => zeros(&shape),
        DType::F64 => zeros_f64(&shape),
    }
}

/// Creates a new tensor filled with ones, matching the input's shape and dtype.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, RetrogradError> {
    let shape = tensor.shape();
    match tensor.dtype() {
        DType::F32 => ones(&shape),
        DType::F64 => ones_f64(&shape),
    }
}

/// Creates an F32 tensor with elements sampled uniformly from `[0, 1)`.
pub fn rand(shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f32> = (0..numel).map(|_| rng.gen::<f32>()).collect();
    Tensor::new(data, shape.to_vec())
}

/// Creates an F32 tensor with elements sampled from the standard normal
/// distribution.
pub fn randn(shape: &[usize]) -> Result<Tensor, RetrogradError> {
    let numel = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f32> = (0..numel)
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    Tensor::new(data, shape.to_vec())
}
