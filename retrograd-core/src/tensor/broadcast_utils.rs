use crate::error::RetrogradError;
use crate::ops::reduction::sum_op;
use crate::ops::view::reshape_op;
use crate::tensor::Tensor;

impl Tensor {
    /// Reduces a tensor (typically a gradient) to match a target shape by
    /// summing along broadcasted dimensions.
    ///
    /// When a forward pass broadcast an operand (e.g. `A[2,3] + B[3]`), the
    /// gradient flowing back to the smaller operand must be summed over the
    /// dimensions that were virtually repeated. Prepended dimensions are
    /// summed away entirely; dimensions that were size 1 are summed down to
    /// size 1 again.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, RetrogradError> {
        let current_shape = self.shape();
        if current_shape == target_shape {
            return Ok(self.clone());
        }

        // Reduction to scalar: sum everything.
        if target_shape.is_empty() {
            return sum_op(self, None, false);
        }

        let current_rank = current_shape.len();
        let target_rank = target_shape.len();
        if current_rank < target_rank {
            return Err(RetrogradError::InternalError(format!(
                "cannot reduce shape {:?} to {:?}: rank shrank",
                current_shape, target_shape
            )));
        }

        let rank_diff = current_rank - target_rank;
        let mut axes_to_reduce: Vec<usize> = (0..rank_diff).collect();

        for i in 0..target_rank {
            let current_dim = current_shape[rank_diff + i];
            let target_dim = target_shape[i];
            if current_dim != target_dim {
                if target_dim == 1 {
                    axes_to_reduce.push(rank_diff + i);
                } else {
                    return Err(RetrogradError::InternalError(format!(
                        "cannot reduce shape {:?} to {:?}: dim {} is {} vs {}",
                        current_shape, target_shape, i, current_dim, target_dim
                    )));
                }
            }
        }

        if axes_to_reduce.is_empty() {
            return Err(RetrogradError::InternalError(format!(
                "cannot reduce shape {:?} to {:?}: shapes differ but no axes to sum",
                current_shape, target_shape
            )));
        }

        let reduced = sum_op(self, Some(&axes_to_reduce), true)?;
        if reduced.shape() == target_shape {
            Ok(reduced)
        } else {
            // keep_dims left size-1 slots where dimensions must disappear.
            reshape_op(&reduced, target_shape.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_same_shape_is_identity() {
        let t = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
        let r = t.reduce_to_shape(&[2]).unwrap();
        assert_eq!(r.get_f32_data().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_reduce_prepended_dim() {
        // grad [2, 3] -> operand [3]
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let r = t.reduce_to_shape(&[3]).unwrap();
        assert_eq!(r.shape(), vec![3]);
        assert_eq!(r.get_f32_data().unwrap(), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_reduce_size_one_dim() {
        // grad [2, 3] -> operand [2, 1]
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let r = t.reduce_to_shape(&[2, 1]).unwrap();
        assert_eq!(r.shape(), vec![2, 1]);
        assert_eq!(r.get_f32_data().unwrap(), vec![6.0, 15.0]);
    }

    #[test]
    fn test_reduce_to_scalar() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let r = t.reduce_to_shape(&[]).unwrap();
        assert_eq!(r.shape(), Vec::<usize>::new());
        assert_eq!(r.get_f32_data().unwrap(), vec![6.0]);
    }

    #[test]
    fn test_reduce_incompatible_is_error() {
        let t = Tensor::new(vec![1.0; 6], vec![2, 3]).unwrap();
        assert!(t.reduce_to_shape(&[2, 2]).is_err());
    }
}
