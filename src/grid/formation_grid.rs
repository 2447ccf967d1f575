//! `FormationElementGrid<C, F>`: the element array of one formation.
//!
//! The grid owns one [`BaseElement`] per `(i, j, k)` cell of the formation's
//! ghost-extended window, binds each to the formation's layer element at
//! the same position and links neighbours:
//!
//! - laterally, only from cells owned by this process and never across a
//!   face the map reports as a domain boundary;
//! - vertically, within each column of the formation. The top and bottom
//!   layers get no shallow or deep neighbour here.

use std::sync::Arc;

use crate::data::layout::GridLayout;
use crate::data::local_array::LocalArray3;
use crate::debug_invariants::DebugInvariants;
use crate::element::base::BaseElement;
use crate::element::capability::ElementCapability;
use crate::geology::formation::Formation;
use crate::geology::map_element::MapElementArray;
use crate::mesh_error::MeshError;
use crate::topology::boundary::BoundaryId;
use crate::topology::index::Index3;

/// Lateral offsets `(di, dj)` of the four corners of a cell's quad, in node
/// order `0..4` (and again `4..8`).
const CORNER_OFFSETS: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// An element position and its neighbour handle across every face.
type NeighbourRow = (Index3, [Option<Index3>; BoundaryId::COUNT]);

/// Dense, ghost-extended array of elements for exactly one formation.
#[derive(Debug)]
pub struct FormationElementGrid<C: ElementCapability, F: Formation> {
    formation: Arc<F>,
    layout: GridLayout,
    elements: LocalArray3<BaseElement<C>>,
    subdomain_node_k: Vec<usize>,
    generation: u64,
}

impl<C: ElementCapability, F: Formation> FormationElementGrid<C, F> {
    /// Allocate the grid over the formation's extents, bind every element to
    /// its layer element and link neighbours.
    ///
    /// # Errors
    /// - `LayoutMismatch` if the formation and the map disagree on the
    ///   lateral layout.
    /// - `EmptyFormation` if the formation has no element in depth.
    /// - `DomainBoundaryMismatch` if the formation and the map disagree on a
    ///   lateral domain boundary of an owned cell.
    /// - `MissingGhostCell` if an owned cell needs a lateral neighbour that
    ///   is not allocated.
    pub fn new(formation: Arc<F>, map: &MapElementArray) -> Result<Self, MeshError> {
        check_layout(formation.as_ref(), map)?;
        let depth = formation.maximum_number_of_elements();
        if depth == 0 {
            return Err(MeshError::EmptyFormation(formation.name().to_string()));
        }
        let layout = formation.layout().clone();
        let elements = LocalArray3::over_layout(&layout, depth, |i, j, k| {
            let mut element = BaseElement::<C>::new();
            element.set_layer_element(*formation.layer_element(i, j, k));
            element.set_k(k);
            element
        });
        let mut grid = Self {
            formation,
            layout,
            elements,
            subdomain_node_k: Vec::new(),
            generation: 0,
        };
        let links = grid.neighbour_table(grid.formation.as_ref(), map)?;
        for (p, row) in links {
            grid.elements[p].set_neighbours(row);
        }
        log::debug!(
            "created element grid for `{}`: [{}..={}] x [{}..={}] x [0..={}]",
            grid.formation.name(),
            grid.first_i(true),
            grid.last_i(true),
            grid.first_j(true),
            grid.last_j(true),
            grid.last_k()
        );
        grid.debug_assert_invariants();
        Ok(grid)
    }

    /// Bind every element to a new snapshot of the same formation and link
    /// the neighbours again.
    ///
    /// Depth indices, node indices and capability payloads are kept; they
    /// are renumbered by the owning subdomain. On error the grid is left
    /// exactly as it was.
    ///
    /// # Errors
    /// Any error of [`check_rebind`](Self::check_rebind).
    pub fn rebind(&mut self, formation: Arc<F>, map: &MapElementArray) -> Result<(), MeshError> {
        let links = self.rebind_links(formation.as_ref(), map)?;
        for (p, row) in links {
            let element = &mut self.elements[p];
            element.set_layer_element(*formation.layer_element(p.i, p.j, p.k));
            element.set_neighbours(row);
        }
        self.formation = formation;
        self.generation += 1;

        let active = self.owned_active_count();
        if active == 0 {
            log::warn!(
                "formation `{}` has no active element after rebind (generation {})",
                self.formation.name(),
                self.generation
            );
        } else {
            log::debug!(
                "rebound `{}` (generation {}): {} owned active elements",
                self.formation.name(),
                self.generation,
                active
            );
        }
        self.debug_assert_invariants();
        Ok(())
    }

    /// Check that [`rebind`](Self::rebind) would succeed, without changing
    /// the grid.
    ///
    /// # Errors
    /// - `FormationMismatch` if `formation` has a different name.
    /// - `LayoutMismatch` / `InvalidLayout` if its extents changed.
    /// - `DomainBoundaryMismatch` if the snapshot and the map disagree on a
    ///   lateral domain boundary of an owned cell.
    /// - `MissingGhostCell` if an owned cell needs a lateral neighbour that
    ///   is not allocated.
    pub fn check_rebind(&self, formation: &F, map: &MapElementArray) -> Result<(), MeshError> {
        self.rebind_links(formation, map).map(|_| ())
    }

    fn rebind_links(
        &self,
        formation: &F,
        map: &MapElementArray,
    ) -> Result<Vec<NeighbourRow>, MeshError> {
        if formation.name() != self.formation.name() {
            return Err(MeshError::FormationMismatch {
                expected: self.formation.name().to_string(),
                found: formation.name().to_string(),
            });
        }
        check_layout(formation, map)?;
        if formation.layout() != &self.layout {
            return Err(layout_mismatch(formation, &self.layout));
        }
        if formation.maximum_number_of_elements() != self.length_k() {
            return Err(MeshError::InvalidLayout(format!(
                "formation `{}` changed depth from {} to {} elements",
                formation.name(),
                self.length_k(),
                formation.maximum_number_of_elements()
            )));
        }
        self.neighbour_table(formation, map)
    }

    /// Neighbour handles of every element when bound to `formation` over
    /// `map`. The grid itself is not touched.
    fn neighbour_table(
        &self,
        formation: &F,
        map: &MapElementArray,
    ) -> Result<Vec<NeighbourRow>, MeshError> {
        let last_k = self.last_k();
        let (mut lateral, mut vertical) = (0usize, 0usize);
        let mut table = Vec::with_capacity(self.elements.len());
        for p in self.elements.positions() {
            let mut row = [None; BoundaryId::COUNT];
            let column = map.element(p.i, p.j);
            if column.is_on_processor() {
                let layer = formation.layer_element(p.i, p.j, p.k);
                for face in BoundaryId::LATERAL {
                    let on_boundary = column.is_on_domain_boundary(face);
                    if layer.is_on_domain_boundary(face) != on_boundary {
                        return Err(MeshError::DomainBoundaryMismatch { position: p, face });
                    }
                    if on_boundary {
                        continue;
                    }
                    let target = p
                        .step(face)
                        .filter(|q| self.elements.contains(q.i, q.j, q.k))
                        .ok_or(MeshError::MissingGhostCell { from: p, face })?;
                    row[face.index()] = Some(target);
                    lateral += 1;
                }
            }
            if p.k > 0 {
                row[BoundaryId::DEEP_FACE.index()] = p.step(BoundaryId::DEEP_FACE);
                vertical += 1;
            }
            if p.k < last_k {
                row[BoundaryId::SHALLOW_FACE.index()] = p.step(BoundaryId::SHALLOW_FACE);
                vertical += 1;
            }
            table.push((p, row));
        }
        log::trace!(
            "linked `{}`: {lateral} lateral and {vertical} vertical links",
            formation.name()
        );
        Ok(table)
    }

    /// Assign the global depth indices of every element's corner nodes and
    /// flag the elements lying on the top or bottom of the subdomain.
    ///
    /// `node_depth` holds a depth index per lateral node and global depth
    /// node. The top node layer of this formation is `global_k_start`, so
    /// element `k` spans global node layers
    /// `global_k_start - length_k + k ..= global_k_start - length_k + k + 1`.
    /// An element's shallow face is on the subdomain boundary iff all four
    /// top corners have depth index `top`; its deep face iff all four bottom
    /// corners have depth index `0`.
    ///
    /// # Errors
    /// `NodeArrayTooSmall` if `global_k_start < length_k` or `node_depth`
    /// does not cover every corner of the ghost-extended window.
    pub fn set_element_node_k_values(
        &mut self,
        node_depth: &LocalArray3<usize>,
        top: usize,
        global_k_start: usize,
    ) -> Result<(), MeshError> {
        let length_k = self.length_k();
        let Some(bottom_node) = global_k_start.checked_sub(length_k) else {
            return Err(MeshError::NodeArrayTooSmall(format!(
                "formation `{}` has {length_k} elements in depth but starts at node layer {global_k_start}",
                self.formation.name()
            )));
        };
        let low = (self.first_i(true), self.first_j(true), bottom_node);
        let high = (self.last_i(true) + 1, self.last_j(true) + 1, global_k_start);
        if !node_depth.contains(low.0, low.1, low.2) || !node_depth.contains(high.0, high.1, high.2) {
            return Err(MeshError::NodeArrayTooSmall(format!(
                "formation `{}` needs nodes {low:?} ..= {high:?}, array covers {:?} x {:?} x {:?}",
                self.formation.name(),
                node_depth.range(0),
                node_depth.range(1),
                node_depth.range(2)
            )));
        }

        let positions: Vec<Index3> = self.elements.positions().collect();
        for p in positions {
            let global_k = bottom_node + p.k + 1;
            let element = &mut self.elements[p];
            for (n, &(di, dj)) in CORNER_OFFSETS.iter().enumerate() {
                element.set_node_k(n, node_depth[(p.i + di, p.j + dj, global_k - 1)]);
                element.set_node_k(n + 4, node_depth[(p.i + di, p.j + dj, global_k)]);
            }
            let shallow = (4..8).all(|n| element.node_k(n) == top);
            let deep = (0..4).all(|n| element.node_k(n) == 0);
            element.set_subdomain_boundary(BoundaryId::SHALLOW_FACE, shallow);
            element.set_subdomain_boundary(BoundaryId::DEEP_FACE, deep);
        }
        self.subdomain_node_k = (0..=length_k).map(|n| bottom_node + n).collect();
        Ok(())
    }

    /// Global depth-node index of each local depth node `0..=length_k`.
    /// Empty until [`set_element_node_k_values`](Self::set_element_node_k_values)
    /// has run.
    #[inline]
    pub fn subdomain_node_k_indices(&self) -> &[usize] {
        &self.subdomain_node_k
    }

    #[inline]
    pub fn formation(&self) -> &F {
        &self.formation
    }

    /// Shared handle of the bound formation snapshot.
    #[inline]
    pub fn formation_handle(&self) -> &Arc<F> {
        &self.formation
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of rebinds since construction.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn first_i(&self, include_ghosts: bool) -> usize {
        self.layout.first_i(include_ghosts)
    }

    #[inline]
    pub fn last_i(&self, include_ghosts: bool) -> usize {
        self.layout.last_i(include_ghosts)
    }

    #[inline]
    pub fn length_i(&self, include_ghosts: bool) -> usize {
        self.layout.length_i(include_ghosts)
    }

    #[inline]
    pub fn first_j(&self, include_ghosts: bool) -> usize {
        self.layout.first_j(include_ghosts)
    }

    #[inline]
    pub fn last_j(&self, include_ghosts: bool) -> usize {
        self.layout.last_j(include_ghosts)
    }

    #[inline]
    pub fn length_j(&self, include_ghosts: bool) -> usize {
        self.layout.length_j(include_ghosts)
    }

    /// Depth is never partitioned, so `K` has no ghost notion.
    #[inline]
    pub fn first_k(&self) -> usize {
        self.elements.first(2)
    }

    #[inline]
    pub fn last_k(&self) -> usize {
        self.elements.last(2)
    }

    #[inline]
    pub fn length_k(&self) -> usize {
        self.elements.length(2)
    }

    /// The element at `(i, j, k)`.
    ///
    /// # Panics
    /// If `(i, j, k)` is outside the allocated extents.
    #[inline]
    #[track_caller]
    pub fn element(&self, i: usize, j: usize, k: usize) -> &BaseElement<C> {
        &self.elements[(i, j, k)]
    }

    /// # Panics
    /// If `(i, j, k)` is outside the allocated extents.
    #[inline]
    #[track_caller]
    pub fn element_mut(&mut self, i: usize, j: usize, k: usize) -> &mut BaseElement<C> {
        &mut self.elements[(i, j, k)]
    }

    /// Fallible counterpart of [`element`](Self::element).
    pub fn try_element(&self, i: usize, j: usize, k: usize) -> Result<&BaseElement<C>, MeshError> {
        self.elements
            .get(i, j, k)
            .ok_or(MeshError::IndexOutOfBounds(Index3::new(i, j, k)))
    }

    /// Resolve a neighbour handle.
    #[inline]
    pub fn get(&self, position: Index3) -> Option<&BaseElement<C>> {
        self.elements.get(position.i, position.j, position.k)
    }

    /// The element linked across `face` of `element`.
    pub fn neighbour(&self, element: &BaseElement<C>, face: BoundaryId) -> Option<&BaseElement<C>> {
        element.neighbour(face).and_then(|p| self.get(p))
    }

    /// The nearest active element across `face` of the element at
    /// `(i, j, k)`; see [`BaseElement::active_neighbour`].
    #[track_caller]
    pub fn active_neighbour(
        &self,
        i: usize,
        j: usize,
        k: usize,
        face: BoundaryId,
    ) -> Option<&BaseElement<C>> {
        self.element(i, j, k).active_neighbour(face, self)
    }

    /// Positions of every allocated element, `K` fastest.
    pub fn positions(&self) -> impl Iterator<Item = Index3> + '_ {
        self.elements.positions()
    }

    /// Every allocated element, ghosts included, in storage order.
    pub fn elements(&self) -> impl Iterator<Item = &BaseElement<C>> + '_ {
        self.elements.values()
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut BaseElement<C>> + '_ {
        self.elements.values_mut()
    }

    /// Number of active elements owned by this process.
    pub fn owned_active_count(&self) -> usize {
        self.elements
            .values()
            .filter(|e| e.is_on_processor() && e.is_active())
            .count()
    }
}

fn layout_mismatch<F: Formation>(formation: &F, expected: &GridLayout) -> MeshError {
    let found = formation.layout();
    MeshError::LayoutMismatch {
        formation: formation.name().to_string(),
        expected: (expected.length_i(true), expected.length_j(true)),
        found: (found.length_i(true), found.length_j(true)),
    }
}

fn check_layout<F: Formation>(formation: &F, map: &MapElementArray) -> Result<(), MeshError> {
    if formation.layout() == map.layout() {
        Ok(())
    } else {
        Err(layout_mismatch(formation, map.layout()))
    }
}
