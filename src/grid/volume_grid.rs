//! `ElementVolumeGrid`: the local vector layout of an element-based field
//! with a fixed number of unknowns per element.

use crate::data::layout::GridLayout;
use crate::mesh_error::MeshError;
use crate::topology::index::Index3;

/// Layout of a per-element field over a formation's ghost-extended window.
///
/// Values are stored with the dof index fastest, then `K`, `J` and `I`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementVolumeGrid {
    layout: GridLayout,
    depth: usize,
    dofs: usize,
}

impl ElementVolumeGrid {
    /// # Errors
    /// `InvalidDofCount` if `dofs == 0`; `InvalidLayout` if `depth == 0`.
    pub fn new(layout: GridLayout, depth: usize, dofs: usize) -> Result<Self, MeshError> {
        if dofs == 0 {
            return Err(MeshError::InvalidDofCount(dofs));
        }
        if depth == 0 {
            return Err(MeshError::InvalidLayout(
                "a volume grid needs at least one element in depth".to_string(),
            ));
        }
        Ok(Self {
            layout,
            depth,
            dofs,
        })
    }

    #[inline]
    pub fn number_of_dofs(&self) -> usize {
        self.dofs
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of values in a local (ghost-extended) vector.
    pub fn local_size(&self) -> usize {
        self.layout.length_i(true) * self.layout.length_j(true) * self.depth * self.dofs
    }

    /// Offset of `dof` of element `(i, j, k)` in a local vector, or `None`
    /// if the element is outside the window or `dof` is out of range.
    pub fn local_index(&self, i: usize, j: usize, k: usize, dof: usize) -> Option<usize> {
        if !self.layout.contains(i, j) || k >= self.depth || dof >= self.dofs {
            return None;
        }
        let di = i - self.layout.first_i(true);
        let dj = j - self.layout.first_j(true);
        let cell = (di * self.layout.length_j(true) + dj) * self.depth + k;
        Some(cell * self.dofs + dof)
    }

    /// Fallible lookup reporting the element position on failure.
    pub fn try_local_index(&self, position: Index3, dof: usize) -> Result<usize, MeshError> {
        if dof >= self.dofs {
            return Err(MeshError::InvalidDofCount(dof));
        }
        self.local_index(position.i, position.j, position.k, dof)
            .ok_or(MeshError::IndexOutOfBounds(position))
    }

    /// A local vector with every value set to `value`.
    pub fn create_local_vector(&self, value: f64) -> Vec<f64> {
        vec![value; self.local_size()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dofs_rejected() {
        let layout = GridLayout::serial(2, 2).unwrap();
        assert_eq!(
            ElementVolumeGrid::new(layout, 3, 0).unwrap_err(),
            MeshError::InvalidDofCount(0)
        );
    }

    #[test]
    fn dof_fastest_then_k() {
        let grid = ElementVolumeGrid::new(GridLayout::serial(2, 3).unwrap(), 4, 2).unwrap();
        assert_eq!(grid.local_size(), 2 * 3 * 4 * 2);
        assert_eq!(grid.local_index(0, 0, 0, 0), Some(0));
        assert_eq!(grid.local_index(0, 0, 0, 1), Some(1));
        assert_eq!(grid.local_index(0, 0, 1, 0), Some(2));
        assert_eq!(grid.local_index(0, 1, 0, 0), Some(8));
        assert_eq!(grid.local_index(1, 0, 0, 0), Some(24));
        assert_eq!(grid.local_index(1, 2, 3, 1), Some(grid.local_size() - 1));
        assert_eq!(grid.local_index(2, 0, 0, 0), None);
        assert_eq!(grid.local_index(0, 0, 0, 2), None);
    }

    #[test]
    fn offset_window_is_relative_to_ghost_start() {
        let layout = GridLayout::partitioned(8, 1, 4..=7, 0..=0, 1).unwrap();
        let grid = ElementVolumeGrid::new(layout, 1, 1).unwrap();
        assert_eq!(grid.local_size(), 5);
        assert_eq!(grid.local_index(3, 0, 0, 0), Some(0));
        assert_eq!(grid.local_index(7, 0, 0, 0), Some(4));
        assert_eq!(
            grid.try_local_index(Index3::new(2, 0, 0), 0),
            Err(MeshError::IndexOutOfBounds(Index3::new(2, 0, 0)))
        );
    }

    #[test]
    fn local_vector_is_filled() {
        let grid = ElementVolumeGrid::new(GridLayout::serial(1, 1).unwrap(), 2, 3).unwrap();
        let v = grid.create_local_vector(-1.0);
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|&x| x == -1.0));
    }
}
