//! `BaseElement<C>`: the subdomain-local wrapper around one layer element.
//!
//! One generic type produces both element kinds: the neighbour linking and
//! activity logic below is written once and the capability `C` only decides
//! what payload rides along (see [`crate::element::capability`]).

use crate::element::capability::{
    BoundaryCondition, ElementCapability, ElementDofs, NODES_PER_ELEMENT, NoDofs,
};
use crate::geology::formation::Formation;
use crate::geology::layer_element::LayerElement;
use crate::grid::formation_grid::FormationElementGrid;
use crate::topology::boundary::BoundaryId;
use crate::topology::index::Index3;

/// Element without dof bookkeeping, used for traversal and output.
pub type SubdomainElement = BaseElement<NoDofs>;

/// Element with per-node dofs and boundary conditions, used for assembly.
pub type GeneralElement = BaseElement<ElementDofs>;

/// A hexahedral element of a formation grid.
///
/// Neighbours are `(i, j, k)` handles into the owning grid; resolve them
/// with [`FormationElementGrid::neighbour`] or walk active neighbours with
/// [`BaseElement::active_neighbour`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseElement<C: ElementCapability> {
    layer_element: Option<LayerElement>,
    k: usize,
    node_k: [usize; NODES_PER_ELEMENT],
    shallow_on_subdomain_boundary: bool,
    deep_on_subdomain_boundary: bool,
    neighbours: [Option<Index3>; BoundaryId::COUNT],
    capability: C,
}

impl<C: ElementCapability> BaseElement<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the element to a snapshot of its layer element. Binding again
    /// replaces the snapshot.
    pub fn set_layer_element(&mut self, layer_element: LayerElement) {
        self.layer_element = Some(layer_element);
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.layer_element.is_some()
    }

    /// The bound layer element.
    ///
    /// # Panics
    /// If the element has never been bound.
    #[inline]
    #[track_caller]
    pub fn layer_element(&self) -> &LayerElement {
        match &self.layer_element {
            Some(layer_element) => layer_element,
            None => panic!("element queried before being bound to a layer element"),
        }
    }

    /// Position of the bound layer element in its formation.
    #[inline]
    pub fn position(&self) -> Index3 {
        self.layer_element().position()
    }

    #[inline]
    pub fn i(&self) -> usize {
        self.layer_element().i()
    }

    #[inline]
    pub fn j(&self) -> usize {
        self.layer_element().j()
    }

    /// Depth index of the element. Starts as the formation-local index and
    /// is renumbered by the owning subdomain.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn set_k(&mut self, k: usize) {
        self.k = k;
    }

    /// Global depth index of corner `node` (bottom quad `0..4`, top quad
    /// `4..8`).
    ///
    /// # Panics
    /// If `node > 7`.
    #[inline]
    pub fn node_k(&self, node: usize) -> usize {
        self.node_k[node]
    }

    #[inline]
    pub fn set_node_k(&mut self, node: usize, k: usize) {
        self.node_k[node] = k;
    }

    /// Lateral node index of corner `node`.
    #[inline]
    pub fn node_i(&self, node: usize) -> usize {
        const OFFSET: [usize; 4] = [0, 1, 1, 0];
        self.i() + OFFSET[node % 4]
    }

    /// Lateral node index of corner `node`.
    #[inline]
    pub fn node_j(&self, node: usize) -> usize {
        const OFFSET: [usize; 4] = [0, 0, 1, 1];
        self.j() + OFFSET[node % 4]
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.layer_element().is_active()
    }

    #[inline]
    pub fn is_on_processor(&self) -> bool {
        self.layer_element().is_on_processor()
    }

    /// For the shallow and deep faces, whether the face lies on the top or
    /// bottom of the whole subdomain; for lateral faces, whether it lies on
    /// the domain boundary of the map.
    pub fn is_on_domain_boundary(&self, face: BoundaryId) -> bool {
        match face {
            BoundaryId::Gamma1 => self.shallow_on_subdomain_boundary,
            BoundaryId::Gamma6 => self.deep_on_subdomain_boundary,
            lateral => self.layer_element().is_on_domain_boundary(lateral),
        }
    }

    /// Set the subdomain-boundary flag of the shallow or deep face.
    ///
    /// # Panics
    /// If `face` is lateral; lateral boundaries belong to the layer element.
    pub fn set_subdomain_boundary(&mut self, face: BoundaryId, on_boundary: bool) {
        match face {
            BoundaryId::Gamma1 => self.shallow_on_subdomain_boundary = on_boundary,
            BoundaryId::Gamma6 => self.deep_on_subdomain_boundary = on_boundary,
            lateral => panic!("subdomain boundary flags exist only for vertical faces, got {lateral}"),
        }
    }

    #[inline]
    pub fn set_neighbour(&mut self, face: BoundaryId, neighbour: Option<Index3>) {
        self.neighbours[face.index()] = neighbour;
    }

    /// Handle of the neighbour across `face`, if linked.
    #[inline]
    pub fn neighbour(&self, face: BoundaryId) -> Option<Index3> {
        self.neighbours[face.index()]
    }

    /// Replace the handles across all six faces at once.
    #[inline]
    pub fn set_neighbours(&mut self, neighbours: [Option<Index3>; BoundaryId::COUNT]) {
        self.neighbours = neighbours;
    }

    pub fn clear_neighbours(&mut self) {
        self.neighbours = [None; BoundaryId::COUNT];
    }

    /// The nearest active element across `face`.
    ///
    /// Lateral faces are a single hop: the linked neighbour is returned iff
    /// the layer element reports the face as an active boundary. Across the
    /// shallow and deep faces inactive elements are skipped along the linked
    /// column until an active one is found; reaching the end of the column
    /// yields `None`.
    pub fn active_neighbour<'g, F: Formation>(
        &self,
        face: BoundaryId,
        grid: &'g FormationElementGrid<C, F>,
    ) -> Option<&'g BaseElement<C>> {
        if face.is_lateral() {
            if !self.layer_element().is_active_boundary(face) {
                return None;
            }
            return self.neighbour(face).and_then(|p| grid.get(p));
        }
        let mut next = self.neighbour(face);
        while let Some(position) = next {
            let candidate = grid.get(position)?;
            if candidate.is_active() {
                return Some(candidate);
            }
            next = candidate.neighbour(face);
        }
        None
    }

    #[inline]
    pub fn capability(&self) -> &C {
        &self.capability
    }

    #[inline]
    pub fn capability_mut(&mut self) -> &mut C {
        &mut self.capability
    }
}

impl BaseElement<ElementDofs> {
    #[inline]
    pub fn dof(&self, node: usize) -> usize {
        self.capability.dof(node)
    }

    #[inline]
    pub fn set_dof(&mut self, node: usize, dof: usize) {
        self.capability.set_dof(node, dof);
    }

    #[inline]
    pub fn boundary_condition(&self, node: usize) -> BoundaryCondition {
        self.capability.boundary_condition(node)
    }

    #[inline]
    pub fn set_boundary_condition(&mut self, node: usize, bc: BoundaryCondition) {
        self.capability.set_boundary_condition(node, bc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(i: usize, j: usize, k: usize) -> SubdomainElement {
        let mut e = SubdomainElement::new();
        e.set_layer_element(LayerElement::new(Index3::new(i, j, k)));
        e
    }

    #[test]
    fn new_element_is_zeroed() {
        let e = GeneralElement::new();
        assert!(!e.is_bound());
        assert_eq!(e.k(), 0);
        assert!(BoundaryId::ALL.iter().all(|&face| e.neighbour(face).is_none()));
        assert_eq!(e.dof(3), 0);
    }

    #[test]
    #[should_panic(expected = "before being bound")]
    fn unbound_query_panics() {
        let e = SubdomainElement::new();
        let _ = e.is_active();
    }

    #[test]
    fn position_delegates_to_layer_element() {
        let e = bound(4, 5, 1);
        assert_eq!((e.i(), e.j()), (4, 5));
        assert_eq!(e.position(), Index3::new(4, 5, 1));
    }

    #[test]
    fn corner_lateral_indices() {
        let e = bound(2, 7, 0);
        let corners: Vec<_> = (0..8).map(|n| (e.node_i(n), e.node_j(n))).collect();
        assert_eq!(&corners[..4], &[(2, 7), (3, 7), (3, 8), (2, 8)]);
        assert_eq!(&corners[..4], &corners[4..]);
    }

    #[test]
    fn vertical_boundaries_are_local_lateral_delegate() {
        let mut layer = LayerElement::new(Index3::default());
        layer.set_domain_boundary(BoundaryId::LEFT, true);
        layer.set_domain_boundary(BoundaryId::SHALLOW_FACE, true);
        let mut e = SubdomainElement::new();
        e.set_layer_element(layer);
        assert!(e.is_on_domain_boundary(BoundaryId::LEFT));
        assert!(!e.is_on_domain_boundary(BoundaryId::SHALLOW_FACE));
        e.set_subdomain_boundary(BoundaryId::DEEP_FACE, true);
        assert!(e.is_on_domain_boundary(BoundaryId::DEEP_FACE));
    }

    #[test]
    #[should_panic(expected = "only for vertical faces")]
    fn lateral_subdomain_flag_panics() {
        let mut e = bound(0, 0, 0);
        e.set_subdomain_boundary(BoundaryId::FRONT, true);
    }

    #[test]
    fn clear_neighbours_twice_equals_once() {
        let mut e = bound(1, 1, 1);
        e.set_neighbour(BoundaryId::RIGHT, Some(Index3::new(2, 1, 1)));
        e.set_neighbour(BoundaryId::DEEP_FACE, Some(Index3::new(1, 1, 0)));
        e.clear_neighbours();
        let once = e.clone();
        e.clear_neighbours();
        assert_eq!(e, once);
        assert!(BoundaryId::ALL.iter().all(|&face| e.neighbour(face).is_none()));
    }

    #[test]
    fn dof_payload() {
        let mut e = GeneralElement::new();
        e.set_dof(6, 11);
        e.set_boundary_condition(6, BoundaryCondition::Surface);
        assert_eq!(e.capability().dof(6), 11);
        assert_eq!(e.boundary_condition(6), BoundaryCondition::Surface);
    }
}
