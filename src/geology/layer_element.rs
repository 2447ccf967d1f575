//! `LayerElement`: the geology layer's raw mesh cell.
//!
//! A layer element carries the ground truth about one cell of a formation at
//! one snapshot: where it sits, whether this process owns it, whether it
//! currently represents deposited rock, and which of its faces touch the
//! domain boundary or an active neighbour. Element grids copy it when they
//! bind and never write it back.

use crate::topology::boundary::BoundaryId;
use crate::topology::index::Index3;

/// Per-formation, globally indexed mesh cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerElement {
    position: Index3,
    on_processor: bool,
    active: bool,
    domain_boundary: [bool; BoundaryId::COUNT],
    active_boundary: [bool; BoundaryId::COUNT],
}

impl LayerElement {
    /// An inactive, off-processor element at `position` with no boundary
    /// flags set.
    pub fn new(position: Index3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[inline]
    pub fn position(&self) -> Index3 {
        self.position
    }

    #[inline]
    pub fn i(&self) -> usize {
        self.position.i
    }

    #[inline]
    pub fn j(&self) -> usize {
        self.position.j
    }

    /// Depth index within the formation, 0 being the deepest element.
    #[inline]
    pub fn k(&self) -> usize {
        self.position.k
    }

    #[inline]
    pub fn is_on_processor(&self) -> bool {
        self.on_processor
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether `face` lies on the boundary of the computational domain.
    #[inline]
    pub fn is_on_domain_boundary(&self, face: BoundaryId) -> bool {
        self.domain_boundary[face.index()]
    }

    /// Whether the element and its neighbour across `face` are both active.
    #[inline]
    pub fn is_active_boundary(&self, face: BoundaryId) -> bool {
        self.active_boundary[face.index()]
    }

    /// Formation-local depth-node index of corner `node`.
    ///
    /// Corners `0..4` form the bottom quad (node layer `k`), `4..8` the top
    /// quad (node layer `k + 1`).
    ///
    /// # Panics
    /// If `node > 7`.
    #[inline]
    pub fn node_k(&self, node: usize) -> usize {
        assert!(node < 8, "hexahedron node index {node} out of range");
        if node < 4 { self.k() } else { self.k() + 1 }
    }

    pub fn set_on_processor(&mut self, on_processor: bool) {
        self.on_processor = on_processor;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_domain_boundary(&mut self, face: BoundaryId, on_boundary: bool) {
        self.domain_boundary[face.index()] = on_boundary;
    }

    pub fn set_active_boundary(&mut self, face: BoundaryId, active: bool) {
        self.active_boundary[face.index()] = active;
    }
}
