//! Neighbour weighting stencils.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One neighbour of the stencil: a (row, column) offset and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StencilTap {
    /// Row offset.
    pub dy: isize,
    /// Column offset.
    pub dx: isize,
    pub weight: f64,
}

impl StencilTap {
    pub const fn new(dy: isize, dx: isize, weight: f64) -> Self {
        Self { dy, dx, weight }
    }
}

const AXIS_WEIGHT: f64 = 1.0 / 6.0;
const DIAGONAL_WEIGHT: f64 = 1.0 / 12.0;

/// 8-connected neighbourhood; axis neighbours weigh twice as much as diagonals.
const EIGHT_NEIGHBOURS: [StencilTap; 8] = [
    StencilTap::new(1, 1, DIAGONAL_WEIGHT),
    StencilTap::new(0, 1, AXIS_WEIGHT),
    StencilTap::new(-1, 1, DIAGONAL_WEIGHT),
    StencilTap::new(1, -1, DIAGONAL_WEIGHT),
    StencilTap::new(0, -1, AXIS_WEIGHT),
    StencilTap::new(-1, -1, DIAGONAL_WEIGHT),
    StencilTap::new(1, 0, AXIS_WEIGHT),
    StencilTap::new(-1, 0, AXIS_WEIGHT),
];

/// Ordered list of neighbour taps used to build the smoothness equations.
///
/// Weights are used as given; they are not normalized. Taps may repeat an
/// offset, in which case their contributions add up.
/// Largest row or column offset a tap may have.
pub const MAX_TAP_OFFSET: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StencilTap>", into = "Vec<StencilTap>")]
pub struct Stencil {
    taps: Vec<StencilTap>,
}

impl Stencil {
    pub fn new(taps: Vec<StencilTap>) -> Result<Self> {
        if taps.is_empty() {
            return Err(Error::InvalidStencil("stencil has no taps".to_string()));
        }
        for tap in &taps {
            if tap.dy == 0 && tap.dx == 0 {
                return Err(Error::InvalidStencil(
                    "tap (0, 0) refers to the pixel itself".to_string(),
                ));
            }
            if tap.dy.unsigned_abs() > MAX_TAP_OFFSET || tap.dx.unsigned_abs() > MAX_TAP_OFFSET {
                return Err(Error::InvalidStencil(format!(
                    "tap ({}, {}) reaches further than {MAX_TAP_OFFSET} pixels",
                    tap.dy, tap.dx
                )));
            }
            if !tap.weight.is_finite() {
                return Err(Error::InvalidStencil(format!(
                    "tap ({}, {}) has non-finite weight {}",
                    tap.dy, tap.dx, tap.weight
                )));
            }
        }
        Ok(Self { taps })
    }

    /// The 8-connected stencil: 1/6 for axis-aligned and 1/12 for diagonal neighbours.
    pub fn eight_neighbours() -> Self {
        Self {
            taps: EIGHT_NEIGHBOURS.to_vec(),
        }
    }

    #[inline]
    pub fn taps(&self) -> &[StencilTap] {
        &self.taps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.taps.iter().map(|t| t.weight).sum()
    }
}

impl Default for Stencil {
    fn default() -> Self {
        Self::eight_neighbours()
    }
}

impl TryFrom<Vec<StencilTap>> for Stencil {
    type Error = Error;

    fn try_from(taps: Vec<StencilTap>) -> Result<Self> {
        Self::new(taps)
    }
}

impl From<Stencil> for Vec<StencilTap> {
    fn from(stencil: Stencil) -> Self {
        stencil.taps
    }
}
