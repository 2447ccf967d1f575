//! Active-node detection and global dof numbering for dof-bearing grids.
//!
//! A node is active iff it is a corner of an owned active element, where
//! the corner's depth position is its depth index (see
//! [`crate::algs::depth_numbering`]). Only active nodes owned by this
//! process are numbered; numbers of ghost nodes come from the owning
//! process and can be filled in with [`DofNumbering::set`].

use crate::data::layout::GridLayout;
use crate::data::local_array::LocalArray3;
use crate::element::capability::{ElementCapability, ElementDofs, NODES_PER_ELEMENT};
use crate::geology::formation::Formation;
use crate::grid::formation_grid::FormationElementGrid;
use crate::mesh_error::MeshError;
use crate::topology::index::Index3;
use itertools::iproduct;

/// Loop nesting used to number the active nodes, outermost first.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum DofOrdering {
    /// `I`, then `J`, then `K` fastest.
    Ijk,
    /// `K`, then `I`, then `J` fastest.
    Kij,
    /// `K`, then `J`, then `I` fastest.
    #[default]
    Kji,
}

/// Global dof number of every node of the local window.
#[derive(Clone, Debug, PartialEq)]
pub struct DofNumbering {
    numbers: LocalArray3<Option<usize>>,
    local_start: usize,
    local_count: usize,
}

impl DofNumbering {
    /// Global number of node `(i, j, k)`, `None` for inactive or
    /// not-yet-exchanged ghost nodes.
    pub fn dof(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        self.numbers.get(i, j, k).copied().flatten()
    }

    /// Record the global number of a node, typically a ghost node numbered
    /// by its owner.
    ///
    /// # Panics
    /// If `(i, j, k)` is outside the local window.
    #[track_caller]
    pub fn set(&mut self, i: usize, j: usize, k: usize, dof: Option<usize>) {
        self.numbers[(i, j, k)] = dof;
    }

    /// First global number handed out by this process.
    #[inline]
    pub fn local_start(&self) -> usize {
        self.local_start
    }

    /// Number of owned active nodes.
    #[inline]
    pub fn local_count(&self) -> usize {
        self.local_count
    }

    /// One past the last global number handed out by this process.
    #[inline]
    pub fn local_end(&self) -> usize {
        self.local_start + self.local_count
    }
}

/// Mark every corner of every owned active element of `grids` active.
///
/// The result covers the ghost-extended window of `node_layout` and depth
/// nodes `0 ..= top`.
pub fn determine_active_nodes<'g, C, F, I>(
    grids: I,
    node_layout: &GridLayout,
    top: usize,
) -> LocalArray3<bool>
where
    C: ElementCapability,
    F: Formation + 'g,
    I: IntoIterator<Item = &'g FormationElementGrid<C, F>>,
{
    let mut active = LocalArray3::filled(
        [node_layout.range_i(true), node_layout.range_j(true), 0..=top],
        false,
    );
    for grid in grids {
        for element in grid.elements().filter(|e| e.is_on_processor() && e.is_active()) {
            for n in 0..NODES_PER_ELEMENT {
                active[(element.node_i(n), element.node_j(n), element.node_k(n))] = true;
            }
        }
    }
    let owned = iproduct!(node_layout.range_i(false), node_layout.range_j(false), 0..=top)
        .filter(|&(i, j, k)| active[(i, j, k)])
        .count();
    log::debug!("{owned} owned active nodes");
    active
}

/// Number the owned active nodes consecutively from `local_start` in the
/// given `ordering`.
pub fn number_global_dofs(
    active: &LocalArray3<bool>,
    node_layout: &GridLayout,
    ordering: DofOrdering,
    local_start: usize,
) -> DofNumbering {
    let mut numbers = LocalArray3::filled(
        [active.range(0), active.range(1), active.range(2)],
        None,
    );
    let (ri, rj, rk) = (
        node_layout.range_i(false),
        node_layout.range_j(false),
        active.range(2),
    );
    let order: Box<dyn Iterator<Item = (usize, usize, usize)>> = match ordering {
        DofOrdering::Ijk => Box::new(iproduct!(ri, rj, rk)),
        DofOrdering::Kij => Box::new(iproduct!(rk, ri, rj).map(|(k, i, j)| (i, j, k))),
        DofOrdering::Kji => Box::new(iproduct!(rk, rj, ri).map(|(k, j, i)| (i, j, k))),
    };
    let mut next = local_start;
    for (i, j, k) in order {
        if active[(i, j, k)] {
            numbers[(i, j, k)] = Some(next);
            next += 1;
        }
    }
    log::debug!(
        "numbered {} dofs in {ordering:?} order starting at {local_start}",
        next - local_start
    );
    DofNumbering {
        numbers,
        local_start,
        local_count: next - local_start,
    }
}

/// Write the global dof number of each corner into every owned active
/// element of `grids`.
///
/// # Errors
/// `UnnumberedNode` if a corner has no number.
pub fn assign_element_dofs<'g, F, I>(grids: I, numbering: &DofNumbering) -> Result<(), MeshError>
where
    F: Formation + 'g,
    I: IntoIterator<Item = &'g mut FormationElementGrid<ElementDofs, F>>,
{
    for grid in grids {
        for element in grid
            .elements_mut()
            .filter(|e| e.is_on_processor() && e.is_active())
        {
            for n in 0..NODES_PER_ELEMENT {
                let node = Index3::new(element.node_i(n), element.node_j(n), element.node_k(n));
                let dof = numbering
                    .dof(node.i, node.j, node.k)
                    .ok_or(MeshError::UnnumberedNode(node))?;
                element.set_dof(n, dof);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_active(ni: usize, nj: usize, nk: usize) -> (LocalArray3<bool>, GridLayout) {
        let nodes = GridLayout::serial(ni, nj).unwrap().node_layout();
        let active = LocalArray3::filled([nodes.range_i(true), nodes.range_j(true), 0..=nk], true);
        (active, nodes)
    }

    #[test]
    fn default_ordering_is_kji() {
        assert_eq!(DofOrdering::default(), DofOrdering::Kji);
    }

    #[test]
    fn kji_numbers_i_fastest() {
        let (active, nodes) = all_active(1, 1, 1);
        let numbering = number_global_dofs(&active, &nodes, DofOrdering::Kji, 0);
        assert_eq!(numbering.dof(0, 0, 0), Some(0));
        assert_eq!(numbering.dof(1, 0, 0), Some(1));
        assert_eq!(numbering.dof(0, 1, 0), Some(2));
        assert_eq!(numbering.dof(0, 0, 1), Some(4));
        assert_eq!(numbering.local_count(), 8);
    }

    #[test]
    fn ijk_numbers_k_fastest() {
        let (active, nodes) = all_active(1, 1, 1);
        let numbering = number_global_dofs(&active, &nodes, DofOrdering::Ijk, 10);
        assert_eq!(numbering.dof(0, 0, 0), Some(10));
        assert_eq!(numbering.dof(0, 0, 1), Some(11));
        assert_eq!(numbering.dof(0, 1, 0), Some(12));
        assert_eq!(numbering.dof(1, 0, 0), Some(14));
        assert_eq!(numbering.local_end(), 18);
    }

    #[test]
    fn kij_numbers_j_fastest() {
        let (active, nodes) = all_active(1, 1, 1);
        let numbering = number_global_dofs(&active, &nodes, DofOrdering::Kij, 0);
        assert_eq!(numbering.dof(0, 1, 0), Some(1));
        assert_eq!(numbering.dof(1, 0, 0), Some(2));
    }

    #[test]
    fn inactive_nodes_are_skipped() {
        let (mut active, nodes) = all_active(1, 1, 1);
        active[(0, 0, 0)] = false;
        let mut numbering = number_global_dofs(&active, &nodes, DofOrdering::Kji, 0);
        assert_eq!(numbering.dof(0, 0, 0), None);
        assert_eq!(numbering.dof(1, 0, 0), Some(0));
        assert_eq!(numbering.local_count(), 7);
        numbering.set(0, 0, 0, Some(99));
        assert_eq!(numbering.dof(0, 0, 0), Some(99));
    }

    #[test]
    fn only_owned_nodes_are_numbered() {
        let cells = GridLayout::partitioned(2, 1, 0..=0, 0..=0, 1).unwrap();
        let nodes = cells.node_layout();
        let active = LocalArray3::filled([nodes.range_i(true), nodes.range_j(true), 0..=0], true);
        let numbering = number_global_dofs(&active, &nodes, DofOrdering::Kji, 0);
        // Node column i == 1 sits on the interface and belongs to the upper partition.
        assert_eq!(numbering.dof(0, 0, 0), Some(0));
        assert_eq!(numbering.dof(0, 1, 0), Some(1));
        assert_eq!(numbering.dof(1, 0, 0), None);
        assert_eq!(numbering.local_count(), 2);
    }
}
