//! `GridLayout`: lateral partition of the map owned by one process.
//!
//! A layout records the global number of cells in `I` and `J`, the closed
//! range of cells this process owns, and the ghost-extended range it can
//! address locally. Depth is never partitioned, so a layout is purely 2-D.

use crate::mesh_error::MeshError;
use std::ops::RangeInclusive;

/// Ghost-aware lateral layout of a distributed structured grid.
///
/// # Invariants
/// - `ghost_first_* <= first_* <= last_* <= ghost_last_* < global_*`
/// - a layout that owns only part of the map has a non-empty ghost band on
///   every interior partition edge.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridLayout {
    global_i: usize,
    global_j: usize,
    first_i: usize,
    last_i: usize,
    first_j: usize,
    last_j: usize,
    ghost_first_i: usize,
    ghost_last_i: usize,
    ghost_first_j: usize,
    ghost_last_j: usize,
}

impl GridLayout {
    /// Layout of a single process owning the complete `ni x nj` map.
    pub fn serial(ni: usize, nj: usize) -> Result<Self, MeshError> {
        if ni == 0 || nj == 0 {
            return Err(MeshError::InvalidLayout(format!(
                "map must have at least one cell in each direction, got {ni} x {nj}"
            )));
        }
        Ok(Self {
            global_i: ni,
            global_j: nj,
            first_i: 0,
            last_i: ni - 1,
            first_j: 0,
            last_j: nj - 1,
            ghost_first_i: 0,
            ghost_last_i: ni - 1,
            ghost_first_j: 0,
            ghost_last_j: nj - 1,
        })
    }

    /// Layout of one partition of an `ni x nj` map.
    ///
    /// `owned_i`/`owned_j` are the closed ranges of cells owned here;
    /// `ghost_width` cells on each side are replicated from neighbouring
    /// partitions (clipped at the map edge).
    ///
    /// # Errors
    /// `InvalidLayout` if the owned ranges are empty or leave the map, or if
    /// the partition has an interior edge but `ghost_width == 0`.
    pub fn partitioned(
        ni: usize,
        nj: usize,
        owned_i: RangeInclusive<usize>,
        owned_j: RangeInclusive<usize>,
        ghost_width: usize,
    ) -> Result<Self, MeshError> {
        let (first_i, last_i) = (*owned_i.start(), *owned_i.end());
        let (first_j, last_j) = (*owned_j.start(), *owned_j.end());
        if first_i > last_i || first_j > last_j {
            return Err(MeshError::InvalidLayout(format!(
                "owned ranges must be non-empty, got {owned_i:?} x {owned_j:?}"
            )));
        }
        if last_i >= ni || last_j >= nj {
            return Err(MeshError::InvalidLayout(format!(
                "owned ranges {owned_i:?} x {owned_j:?} exceed the {ni} x {nj} map"
            )));
        }
        let covers_map = first_i == 0 && first_j == 0 && last_i == ni - 1 && last_j == nj - 1;
        if !covers_map && ghost_width == 0 {
            return Err(MeshError::InvalidLayout(
                "a partition with interior edges needs ghost_width >= 1".to_string(),
            ));
        }
        Ok(Self {
            global_i: ni,
            global_j: nj,
            first_i,
            last_i,
            first_j,
            last_j,
            ghost_first_i: first_i.saturating_sub(ghost_width),
            ghost_last_i: (last_i + ghost_width).min(ni - 1),
            ghost_first_j: first_j.saturating_sub(ghost_width),
            ghost_last_j: (last_j + ghost_width).min(nj - 1),
        })
    }

    /// Layout of the lateral node grid that carries the corners of the cells.
    ///
    /// There is one more node than cells in each direction. A node on an
    /// interface between partitions is owned by the lower partition, so only
    /// the partition touching the far edge owns the last node. The ghost
    /// range covers every corner of every ghost-extended cell.
    pub fn node_layout(&self) -> Self {
        let last_i = if self.last_i + 1 == self.global_i {
            self.last_i + 1
        } else {
            self.last_i
        };
        let last_j = if self.last_j + 1 == self.global_j {
            self.last_j + 1
        } else {
            self.last_j
        };
        Self {
            global_i: self.global_i + 1,
            global_j: self.global_j + 1,
            first_i: self.first_i,
            last_i,
            first_j: self.first_j,
            last_j,
            ghost_first_i: self.ghost_first_i,
            ghost_last_i: self.ghost_last_i + 1,
            ghost_first_j: self.ghost_first_j,
            ghost_last_j: self.ghost_last_j + 1,
        }
    }

    /// Global number of cells in `(I, J)`.
    #[inline]
    pub fn global_extents(&self) -> (usize, usize) {
        (self.global_i, self.global_j)
    }

    /// First index in the I-direction, closed interval `[first_i .. last_i]`.
    #[inline]
    pub fn first_i(&self, include_ghosts: bool) -> usize {
        if include_ghosts { self.ghost_first_i } else { self.first_i }
    }

    #[inline]
    pub fn last_i(&self, include_ghosts: bool) -> usize {
        if include_ghosts { self.ghost_last_i } else { self.last_i }
    }

    /// First index in the J-direction, closed interval `[first_j .. last_j]`.
    #[inline]
    pub fn first_j(&self, include_ghosts: bool) -> usize {
        if include_ghosts { self.ghost_first_j } else { self.first_j }
    }

    #[inline]
    pub fn last_j(&self, include_ghosts: bool) -> usize {
        if include_ghosts { self.ghost_last_j } else { self.last_j }
    }

    #[inline]
    pub fn length_i(&self, include_ghosts: bool) -> usize {
        self.last_i(include_ghosts) - self.first_i(include_ghosts) + 1
    }

    #[inline]
    pub fn length_j(&self, include_ghosts: bool) -> usize {
        self.last_j(include_ghosts) - self.first_j(include_ghosts) + 1
    }

    #[inline]
    pub fn range_i(&self, include_ghosts: bool) -> RangeInclusive<usize> {
        self.first_i(include_ghosts)..=self.last_i(include_ghosts)
    }

    #[inline]
    pub fn range_j(&self, include_ghosts: bool) -> RangeInclusive<usize> {
        self.first_j(include_ghosts)..=self.last_j(include_ghosts)
    }

    /// True if `(i, j)` is owned by this process (not a ghost).
    #[inline]
    pub fn is_owned(&self, i: usize, j: usize) -> bool {
        (self.first_i..=self.last_i).contains(&i) && (self.first_j..=self.last_j).contains(&j)
    }

    /// True if `(i, j)` is addressable locally, ghosts included.
    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        (self.ghost_first_i..=self.ghost_last_i).contains(&i)
            && (self.ghost_first_j..=self.ghost_last_j).contains(&j)
    }

    /// True if this process owns the complete map.
    pub fn is_serial(&self) -> bool {
        self.first_i == 0
            && self.first_j == 0
            && self.last_i + 1 == self.global_i
            && self.last_j + 1 == self.global_j
    }
}
