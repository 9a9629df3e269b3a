//! Neighbour lookup on flattened row-major indices.

/// Result of shifting a set of flattened indices by one 2D offset.
///
/// `indices[k]` is computed for every input, including those that left the
/// image; such entries can be negative or alias an unrelated pixel and must be
/// skipped using `valid[k]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftedIndices {
    pub valid: Vec<bool>,
    pub indices: Vec<isize>,
}

impl ShiftedIndices {
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `(k, index)` pairs for entries that stayed inside the image.
    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.valid
            .iter()
            .zip(&self.indices)
            .enumerate()
            .filter_map(|(k, (&valid, &index))| valid.then_some((k, index as usize)))
    }

    /// Positions `k` whose shifted coordinate fell outside the image.
    pub fn iter_invalid(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid
            .iter()
            .enumerate()
            .filter_map(|(k, &valid)| (!valid).then_some(k))
    }
}

/// Shifts flattened indices of an `height x width` grid by `(dy, dx)`.
///
/// An entry is valid when the shifted row stays in `[0, height)` and the
/// shifted column in `[0, width)`. Offsets whose arithmetic overflows are
/// invalid and saturate in `indices`.
pub fn shift_indices(
    indices: &[usize],
    (dy, dx): (isize, isize),
    (height, width): (usize, usize),
) -> ShiftedIndices {
    let h = height as isize;
    let w = width as isize;

    let mut valid = Vec::with_capacity(indices.len());
    let mut shifted = Vec::with_capacity(indices.len());

    for &idx in indices {
        debug_assert!(idx < height * width, "index {idx} outside {height}x{width}");
        let row = ((idx / width) as isize).checked_add(dy);
        let col = ((idx % width) as isize).checked_add(dx);
        let inside = matches!((row, col), (Some(r), Some(c)) if r >= 0 && c >= 0 && r < h && c < w);
        valid.push(inside);
        shifted.push(
            dy.saturating_mul(w)
                .saturating_add(dx)
                .saturating_add(idx as isize),
        );
    }

    ShiftedIndices {
        valid,
        indices: shifted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_shift() {
        // 4x4 grid, (1,1) -> (2,2)
        let shifted = shift_indices(&[5], (1, 1), (4, 4));
        assert_eq!(shifted.valid, vec![true]);
        assert_eq!(shifted.indices, vec![10]);
    }

    #[test]
    fn test_column_wrap_is_invalid_but_aliases() {
        // (0,3) shifted right leaves the image but lands on (1,0) arithmetically.
        let shifted = shift_indices(&[3], (0, 1), (4, 4));
        assert_eq!(shifted.valid, vec![false]);
        assert_eq!(shifted.indices, vec![4]);
        assert_eq!(shifted.iter_valid().count(), 0);
        assert_eq!(shifted.iter_invalid().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_negative_index_is_invalid() {
        let shifted = shift_indices(&[0], (-1, -1), (3, 3));
        assert_eq!(shifted.valid, vec![false]);
        assert_eq!(shifted.indices, vec![-4]);
    }

    #[test]
    fn test_bottom_edge() {
        let shifted = shift_indices(&[6, 7, 8], (1, 0), (3, 3));
        assert_eq!(shifted.valid, vec![false, false, false]);
    }

    #[test]
    fn test_iter_valid_positions() {
        // 2x2 grid, shift left: only column 1 stays inside.
        let shifted = shift_indices(&[0, 1, 2, 3], (0, -1), (2, 2));
        assert_eq!(shifted.iter_valid().collect::<Vec<_>>(), vec![(1, 0), (3, 2)]);
    }

    #[test]
    fn test_extreme_offsets_are_invalid() {
        let shifted = shift_indices(&[0, 4, 8], (isize::MAX, 0), (3, 3));
        assert_eq!(shifted.valid, vec![false, false, false]);
        assert_eq!(shifted.indices[2], isize::MAX);

        let shifted = shift_indices(&[4], (0, isize::MIN), (3, 3));
        assert_eq!(shifted.valid, vec![false]);
    }

    #[test]
    fn test_empty_input() {
        let shifted = shift_indices(&[], (1, 0), (2, 2));
        assert!(shifted.is_empty());
    }
}
