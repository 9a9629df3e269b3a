//! Assembly of the sparse smoothness system over unknown pixels.
//!
//! Every unknown pixel `i` contributes one equation:
//!
//! ```text
//! -s_i * x_i + sum_{unknown j} w_ij * x_j = -sum_{known k} w_ik * v_k
//! ```
//!
//! where `s_i` starts at 1 and loses the weight of each neighbour that falls
//! outside the image. Known neighbours move to the right-hand side, unknown
//! ones couple variables, out-of-bounds ones are dropped.

use faer::sparse::{SparseColMat, Triplet};

use super::offset::shift_indices;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::mask::Mask;
use crate::stencil::Stencil;

/// Bijection between unknown pixel positions and dense variable ids.
#[derive(Debug, Clone)]
pub struct VariableMap {
    positions: Vec<usize>,
    lookup: Vec<Option<usize>>,
}

impl VariableMap {
    pub fn from_mask(mask: &Mask) -> Self {
        let positions = mask.unknown_indices();
        let mut lookup = vec![None; mask.len()];
        for (id, &pos) in positions.iter().enumerate() {
            lookup[pos] = Some(id);
        }
        Self { positions, lookup }
    }

    /// Number of unknowns.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flattened pixel position of variable `id`.
    #[inline]
    pub fn position(&self, id: usize) -> usize {
        self.positions[id]
    }

    /// Variable id of a flattened position, `None` for known pixels.
    #[inline]
    pub fn variable(&self, position: usize) -> Option<usize> {
        self.lookup[position]
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

/// `A x = b` for all channels at once.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// N x N coefficients, compressed by column with duplicates summed.
    pub matrix: SparseColMat<usize, f64>,
    /// N x C right-hand side, row-major.
    pub rhs: Vec<f64>,
    pub channels: usize,
}

impl LinearSystem {
    #[inline]
    pub fn unknowns(&self) -> usize {
        self.matrix.nrows()
    }

    #[inline]
    pub fn rhs_at(&self, row: usize, channel: usize) -> f64 {
        self.rhs[row * self.channels + channel]
    }

    /// Stored `(row, col, value)` entries in column order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let matrix = self.matrix.as_ref();
        let col_ptr = matrix.col_ptr();
        let row_idx = matrix.row_idx();
        let values = matrix.val();
        (0..matrix.ncols()).flat_map(move |col| {
            (col_ptr[col]..col_ptr[col + 1]).map(move |k| (row_idx[k], col, values[k]))
        })
    }

    /// Coefficient `A[row, col]`, zero when not stored.
    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        self.entries()
            .filter(|&(r, c, _)| r == row && c == col)
            .map(|(_, _, v)| v)
            .sum()
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.matrix.as_ref().col_ptr()[self.matrix.ncols()]
    }
}

/// Builds the system for `image` restricted to the unknowns of `variables`.
///
/// The mask must match the image; callers check this first.
pub fn assemble(
    image: &Image,
    mask: &Mask,
    variables: &VariableMap,
    stencil: &Stencil,
) -> Result<LinearSystem> {
    debug_assert_eq!(mask.height(), image.height());
    debug_assert_eq!(mask.width(), image.width());

    let n = variables.len();
    let channels = image.channels();
    let shape = (image.height(), image.width());

    let mut triplets: Vec<Triplet<usize, usize, f64>> = Vec::with_capacity(n * (stencil.len() + 1));
    let mut rhs = vec![0.0f64; n * channels];
    let mut sum_neighbors = vec![1.0f64; n];

    for tap in stencil.taps() {
        let shifted = shift_indices(variables.positions(), (tap.dy, tap.dx), shape);

        for (row, neighbour) in shifted.iter_valid() {
            match variables.variable(neighbour) {
                Some(col) => triplets.push(Triplet::new(row, col, tap.weight)),
                None => {
                    for c in 0..channels {
                        rhs[row * channels + c] -= tap.weight * image.plane(c)[neighbour] as f64;
                    }
                }
            }
        }

        for row in shifted.iter_invalid() {
            sum_neighbors[row] -= tap.weight;
        }
    }

    for (i, &sum) in sum_neighbors.iter().enumerate() {
        triplets.push(Triplet::new(i, i, -sum));
    }

    let matrix = SparseColMat::<usize, f64>::try_new_from_triplets(n, n, &triplets).map_err(|e| {
        Error::SingularMatrix {
            unknowns: n,
            reason: format!("failed to build sparse matrix: {e:?}"),
        }
    })?;

    let system = LinearSystem {
        matrix,
        rhs,
        channels,
    };

    tracing::debug!(
        "Assembled system: {} unknowns, {} channels, {} non-zeros",
        n,
        channels,
        system.nnz()
    );

    Ok(system)
}
