//! Per-formation element grids and their traversal.
//!
//! - [`formation_grid::FormationElementGrid`]: element array, binding and
//!   neighbour linking for one formation
//! - [`subdomain_grid::FormationSubdomainElementGrid`]: the no-dof grid with
//!   iterators and volume-grid cache
//! - [`iter`]: predicate-filtered cursors
//! - [`volume_grid::ElementVolumeGrid`]: per-dof-count vector layouts

pub mod formation_grid;
pub mod iter;
pub mod subdomain_grid;
pub mod validation;
pub mod volume_grid;

use std::sync::Arc;

use crate::element::capability::{ElementCapability, NoDofs};
use crate::geology::formation::Formation;
use crate::geology::map_element::MapElementArray;
use crate::mesh_error::MeshError;

pub use formation_grid::FormationElementGrid;
pub use iter::{
    ActiveElementIterator, ElementIterator, ElementPredicate, GenericElementIterator,
    PredicateIsActive, PredicateTrue,
};
pub use subdomain_grid::FormationSubdomainElementGrid;
pub use volume_grid::ElementVolumeGrid;

/// A grid kind a [`Subdomain`](crate::subdomain::Subdomain) can stack.
pub trait ElementGrid: Sized {
    type Capability: ElementCapability;
    type Formation: Formation;

    /// Build the grid of `formation` over `map`.
    fn build(formation: Arc<Self::Formation>, map: &MapElementArray) -> Result<Self, MeshError>;

    /// Bind to a new snapshot of the same formation.
    fn rebind(
        &mut self,
        formation: Arc<Self::Formation>,
        map: &MapElementArray,
    ) -> Result<(), MeshError>;

    /// Check that [`rebind`](Self::rebind) would succeed, without changing
    /// the grid.
    fn check_rebind(
        &self,
        formation: &Self::Formation,
        map: &MapElementArray,
    ) -> Result<(), MeshError> {
        self.formation_grid().check_rebind(formation, map)
    }

    fn formation_grid(&self) -> &FormationElementGrid<Self::Capability, Self::Formation>;

    fn formation_grid_mut(&mut self) -> &mut FormationElementGrid<Self::Capability, Self::Formation>;
}

impl<C: ElementCapability, F: Formation> ElementGrid for FormationElementGrid<C, F> {
    type Capability = C;
    type Formation = F;

    fn build(formation: Arc<F>, map: &MapElementArray) -> Result<Self, MeshError> {
        FormationElementGrid::new(formation, map)
    }

    fn rebind(&mut self, formation: Arc<F>, map: &MapElementArray) -> Result<(), MeshError> {
        FormationElementGrid::rebind(self, formation, map)
    }

    fn formation_grid(&self) -> &FormationElementGrid<C, F> {
        self
    }

    fn formation_grid_mut(&mut self) -> &mut FormationElementGrid<C, F> {
        self
    }
}

impl<F: Formation> ElementGrid for FormationSubdomainElementGrid<F> {
    type Capability = NoDofs;
    type Formation = F;

    fn build(formation: Arc<F>, map: &MapElementArray) -> Result<Self, MeshError> {
        FormationSubdomainElementGrid::new(formation, map)
    }

    fn rebind(&mut self, formation: Arc<F>, map: &MapElementArray) -> Result<(), MeshError> {
        FormationSubdomainElementGrid::rebind(self, formation, map)
    }

    fn formation_grid(&self) -> &FormationElementGrid<NoDofs, F> {
        self
    }

    fn formation_grid_mut(&mut self) -> &mut FormationElementGrid<NoDofs, F> {
        self.grid_mut()
    }
}
