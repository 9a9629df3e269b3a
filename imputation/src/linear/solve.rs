//! Direct sparse solve of the assembled system.

use faer::Mat;
use faer::linalg::solvers::Solve;

use super::system::LinearSystem;
use crate::error::{Error, Result};

/// Relative tolerance for treating an equation's row sum as zero.
const ROW_SUM_EPSILON: f64 = 1e-12;

/// Solves `A X = B` for every channel and returns `X` as N x C row-major values.
///
/// Regions of unknowns that no known pixel reaches are rejected up front: all
/// their equations sum to zero, so any constant offset also solves them.
pub fn solve(system: &LinearSystem) -> Result<Vec<f64>> {
    let n = system.unknowns();
    let channels = system.channels;
    if n == 0 {
        return Ok(Vec::new());
    }

    if let Some(size) = largest_floating_region(system) {
        return Err(Error::SingularMatrix {
            unknowns: n,
            reason: format!("{size} unknown pixels have no known neighbour to anchor them"),
        });
    }

    let lu = system
        .matrix
        .as_ref()
        .sp_lu()
        .map_err(|e| Error::SingularMatrix {
            unknowns: n,
            reason: format!("LU factorization failed: {e:?}"),
        })?;

    let rhs = Mat::<f64>::from_fn(n, channels, |i, c| system.rhs_at(i, c));
    let x = lu.solve(&rhs);

    let mut values = Vec::with_capacity(n * channels);
    for i in 0..n {
        for c in 0..channels {
            let v = x[(i, c)];
            if !v.is_finite() {
                return Err(Error::SingularMatrix {
                    unknowns: n,
                    reason: format!("non-finite solution {v} for unknown {i}, channel {c}"),
                });
            }
            values.push(v);
        }
    }

    Ok(values)
}

/// Size of the largest group of coupled unknowns whose equations all sum to
/// zero, if any.
pub(crate) fn largest_floating_region(system: &LinearSystem) -> Option<usize> {
    let n = system.unknowns();
    let mut sets = DisjointSets::new(n);
    let mut row_sum = vec![0.0f64; n];
    let mut scale = vec![0.0f64; n];

    for (row, col, value) in system.entries() {
        row_sum[row] += value;
        scale[row] = f64::max(scale[row], value.abs());
        if row != col && value != 0.0 {
            sets.union(row, col);
        }
    }

    // Per root: (region size, all rows balanced).
    let mut regions: Vec<(usize, bool)> = vec![(0, true); n];
    for i in 0..n {
        let root = sets.find(i);
        let balanced = row_sum[i].abs() <= ROW_SUM_EPSILON * scale[i].max(1.0);
        regions[root].0 += 1;
        regions[root].1 &= balanced;
    }

    regions
        .into_iter()
        .filter(|&(size, balanced)| size > 0 && balanced)
        .map(|(size, _)| size)
        .max()
}

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
