use std::cmp::max;

/// Calculates the strides for a given shape.
///
/// Strides are the number of elements to skip in the flattened data array to
/// move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy/PyTorch broadcasting rules:
/// 1. If the shapes have different ranks, the shorter one is treated as if 1s
///    were prepended.
/// 2. Dimensions are compared right to left; they are compatible if equal or
///    if one of them is 1.
/// 3. The resulting dimension is the larger of the two.
///
/// Returns `Err(String)` describing the first incompatible dimension.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, String> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = shape_a.get(rank_a.wrapping_sub(1 + i)).copied().unwrap_or(1);
        let dim_b = shape_b.get(rank_b.wrapping_sub(1 + i)).copied().unwrap_or(1);

        if dim_a == dim_b {
            result_shape[max_rank - 1 - i] = dim_a;
        } else if dim_a == 1 {
            result_shape[max_rank - 1 - i] = dim_b;
        } else if dim_b == 1 {
            result_shape[max_rank - 1 - i] = dim_a;
        } else if dim_a == 0 || dim_b == 0 {
            result_shape[max_rank - 1 - i] = 0;
        } else {
            return Err(format!(
                "Shapes {:?} and {:?} are not broadcastable: dimension size mismatch at index {} ({} vs {})",
                shape_a, shape_b, max_rank - 1 - i, dim_a, dim_b
            ));
        }
    }
    Ok(result_shape)
}

/// Converts a linear index into multi-dimensional coordinates for the given
/// (contiguous) strides and shape.
pub fn index_to_coord(index: usize, strides: &[usize], shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut coord = vec![0; rank];
    let mut current_index = index;
    for i in 0..rank {
        if strides[i] == 0 {
            // Zero stride only appears when some dimension has size 0;
            // the coordinate is forced to 0 in that case.
            coord[i] = 0;
        } else {
            coord[i] = current_index / strides[i];
            current_index %= strides[i];
        }
    }
    coord
}

/// Maps output coordinates of a broadcasted operation back onto an operand's
/// own coordinates: dimensions of size 1 pin to index 0, missing leading
/// dimensions are dropped.
pub fn broadcast_source_coords(
    output_coords: &[usize],
    operand_shape: &[usize],
    operand_coords: &mut [usize],
) {
    let rank_diff = output_coords.len().saturating_sub(operand_shape.len());
    for dim_idx in 0..operand_shape.len() {
        operand_coords[dim_idx] = if operand_shape[dim_idx] == 1 {
            0
        } else {
            output_coords[rank_diff + dim_idx]
        };
    }
}
