//! `Index3`: position of an element in a formation's `(i, j, k)` index space.
//!
//! Neighbour links between elements are stored as `Index3` handles into the
//! owning grid rather than as references, so the lattice of links (which is
//! cyclic by construction) never owns anything.

use crate::topology::boundary::BoundaryId;
use std::fmt;

/// A global `(i, j, k)` position. `i`/`j` are lateral map indices, `k` is the
/// depth index within a formation, counted from the deepest element up.
#[derive(
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Index3 {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl Index3 {
    #[inline]
    pub const fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    /// The position one step across `face`, or `None` if that step would
    /// leave the non-negative index space.
    ///
    /// `ShallowFace` increases `k`, `DeepFace` decreases it.
    pub fn step(self, face: BoundaryId) -> Option<Self> {
        match face {
            BoundaryId::Gamma1 => Some(Self::new(self.i, self.j, self.k + 1)),
            BoundaryId::Gamma6 => self.k.checked_sub(1).map(|k| Self::new(self.i, self.j, k)),
            lateral => {
                let (di, dj) = lateral.lateral_offset()?;
                let i = self.i.checked_add_signed(di)?;
                let j = self.j.checked_add_signed(dj)?;
                Some(Self::new(i, j, self.k))
            }
        }
    }
}

impl From<(usize, usize, usize)> for Index3 {
    #[inline]
    fn from((i, j, k): (usize, usize, usize)) -> Self {
        Self::new(i, j, k)
    }
}

impl From<Index3> for (usize, usize, usize) {
    #[inline]
    fn from(index: Index3) -> Self {
        (index.i, index.j, index.k)
    }
}

impl fmt::Debug for Index3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}
