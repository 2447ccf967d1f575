//! The 2-D map-element array: lateral ownership and domain-boundary truth.
//!
//! Each `(i, j)` column of the map knows whether this process owns it,
//! whether it is part of the modelled area at all, and which of its four
//! lateral faces lie on the boundary of the computational domain (the map
//! edge or the rim of a hole).

use crate::data::layout::GridLayout;
use crate::data::local_array::LocalArray2;
use crate::topology::boundary::BoundaryId;

/// One lateral column of the map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MapElement {
    i: usize,
    j: usize,
    on_processor: bool,
    defined: bool,
    domain_boundary: [bool; BoundaryId::COUNT],
}

impl MapElement {
    #[inline]
    pub fn position(&self) -> (usize, usize) {
        (self.i, self.j)
    }

    /// True if this process owns the column (it is not a ghost).
    #[inline]
    pub fn is_on_processor(&self) -> bool {
        self.on_processor
    }

    /// False for columns outside the modelled area.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Whether the lateral `face` lies on the domain boundary. Always false
    /// for the vertical faces, which the map knows nothing about.
    #[inline]
    pub fn is_on_domain_boundary(&self, face: BoundaryId) -> bool {
        self.domain_boundary[face.index()]
    }
}

/// Process-partitioned array of [`MapElement`]s over the ghost-extended
/// lateral window of a [`GridLayout`].
#[derive(Clone, Debug)]
pub struct MapElementArray {
    layout: GridLayout,
    elements: LocalArray2<MapElement>,
}

impl MapElementArray {
    /// Build the map for `layout`: every column is defined, ownership
    /// follows the layout and faces on the global map edge are domain
    /// boundaries.
    pub fn new(layout: GridLayout) -> Self {
        let (ni, nj) = layout.global_extents();
        let elements = LocalArray2::over_layout(&layout, |i, j| {
            let mut domain_boundary = [false; BoundaryId::COUNT];
            domain_boundary[BoundaryId::FRONT.index()] = j == 0;
            domain_boundary[BoundaryId::RIGHT.index()] = i + 1 == ni;
            domain_boundary[BoundaryId::BACK.index()] = j + 1 == nj;
            domain_boundary[BoundaryId::LEFT.index()] = i == 0;
            MapElement {
                i,
                j,
                on_processor: layout.is_owned(i, j),
                defined: true,
                domain_boundary,
            }
        });
        Self { layout, elements }
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The map element at `(i, j)`.
    ///
    /// # Panics
    /// If `(i, j)` is outside the ghost-extended window.
    #[inline]
    #[track_caller]
    pub fn element(&self, i: usize, j: usize) -> &MapElement {
        &self.elements[(i, j)]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<&MapElement> {
        self.elements.get(i, j)
    }

    #[inline]
    pub fn is_on_processor(&self, i: usize, j: usize) -> bool {
        self.element(i, j).is_on_processor()
    }

    #[inline]
    pub fn is_on_domain_boundary(&self, i: usize, j: usize, face: BoundaryId) -> bool {
        self.element(i, j).is_on_domain_boundary(face)
    }

    /// Override one lateral domain-boundary flag.
    ///
    /// # Panics
    /// If `face` is vertical or `(i, j)` is outside the window.
    pub fn set_domain_boundary(&mut self, i: usize, j: usize, face: BoundaryId, on_boundary: bool) {
        assert!(face.is_lateral(), "map elements only carry lateral faces, got {face}");
        self.elements[(i, j)].domain_boundary[face.index()] = on_boundary;
    }

    /// Remove column `(i, j)` from the modelled area.
    ///
    /// The faces of the surrounding columns that look into the hole become
    /// domain boundaries, as do all faces of the hole itself.
    pub fn set_undefined(&mut self, i: usize, j: usize) {
        let hole = &mut self.elements[(i, j)];
        hole.defined = false;
        for face in BoundaryId::LATERAL {
            hole.domain_boundary[face.index()] = true;
        }
        for face in BoundaryId::LATERAL {
            let Some((di, dj)) = face.lateral_offset() else {
                continue;
            };
            let (Some(ni), Some(nj)) = (i.checked_add_signed(di), j.checked_add_signed(dj)) else {
                continue;
            };
            if let Some(neighbour) = self.elements.get_mut(ni, nj) {
                neighbour.domain_boundary[face.opposite().index()] = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_edges_are_domain_boundaries() {
        let map = MapElementArray::new(GridLayout::serial(3, 2).unwrap());
        assert!(map.is_on_domain_boundary(0, 0, BoundaryId::LEFT));
        assert!(map.is_on_domain_boundary(0, 0, BoundaryId::FRONT));
        assert!(!map.is_on_domain_boundary(0, 0, BoundaryId::RIGHT));
        assert!(map.is_on_domain_boundary(2, 1, BoundaryId::RIGHT));
        assert!(map.is_on_domain_boundary(2, 1, BoundaryId::BACK));
        assert!(!map.is_on_domain_boundary(1, 0, BoundaryId::LEFT));
        assert!(!map.is_on_domain_boundary(1, 0, BoundaryId::SHALLOW_FACE));
    }

    #[test]
    fn ownership_follows_layout() {
        let layout = GridLayout::partitioned(4, 1, 0..=1, 0..=0, 1).unwrap();
        let map = MapElementArray::new(layout);
        assert!(map.is_on_processor(1, 0));
        assert!(!map.is_on_processor(2, 0));
        assert!(map.get(3, 0).is_none());
    }

    #[test]
    fn hole_closes_facing_sides() {
        let mut map = MapElementArray::new(GridLayout::serial(3, 3).unwrap());
        map.set_undefined(1, 1);
        assert!(!map.element(1, 1).is_defined());
        assert!(map.is_on_domain_boundary(0, 1, BoundaryId::RIGHT));
        assert!(map.is_on_domain_boundary(2, 1, BoundaryId::LEFT));
        assert!(map.is_on_domain_boundary(1, 0, BoundaryId::BACK));
        assert!(map.is_on_domain_boundary(1, 2, BoundaryId::FRONT));
        assert!(!map.is_on_domain_boundary(0, 0, BoundaryId::RIGHT));
    }

    #[test]
    #[should_panic(expected = "lateral faces")]
    fn vertical_override_is_rejected() {
        let mut map = MapElementArray::new(GridLayout::serial(1, 1).unwrap());
        map.set_domain_boundary(0, 0, BoundaryId::DEEP_FACE, true);
    }
}
