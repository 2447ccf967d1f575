//! `Subdomain<G>`: the stack of formation grids of one process.
//!
//! Formations are held shallowest first. Global element depth `K` counts
//! from `0` at the deepest element of the deepest formation, and global
//! depth nodes run from `0` to [`Subdomain::number_of_elements`].
//!
//! The usual sequence after binding a snapshot is
//! [`number_depth_indices`](Subdomain::number_depth_indices), then
//! [`set_subdomain_boundary`](Subdomain::set_subdomain_boundary), then for
//! dof-bearing grids [`number_global_dofs`](Subdomain::number_global_dofs)
//! and [`assign_element_dofs`](Subdomain::assign_element_dofs).

use std::sync::Arc;

use itertools::Itertools;

use crate::algs::depth_numbering::{self, DepthNumberingOpts, DepthNumberingStats};
use crate::algs::dof_numbering::{self, DofNumbering, DofOrdering};
use crate::data::layout::GridLayout;
use crate::data::local_array::LocalArray3;
use crate::debug_invariants::DebugInvariants;
use crate::element::capability::ElementDofs;
use crate::geology::formation::Formation;
use crate::geology::map_element::MapElementArray;
use crate::grid::ElementGrid;
use crate::grid::formation_grid::FormationElementGrid;
use crate::grid::subdomain_grid::FormationSubdomainElementGrid;
use crate::mesh_error::MeshError;

/// Traversal-only grids of a subdomain.
pub type SubdomainGrids<F> = Subdomain<FormationSubdomainElementGrid<F>>;

/// Dof-bearing grids of a subdomain, used for assembly.
pub type ComputationalDomain<F> = Subdomain<FormationElementGrid<ElementDofs, F>>;

/// The formation grids of one process, shallowest first.
#[derive(Debug)]
pub struct Subdomain<G: ElementGrid> {
    grids: Vec<G>,
    layout: GridLayout,
    depth_indices: Option<LocalArray3<usize>>,
    node_k_assigned: bool,
}

impl<G: ElementGrid> Subdomain<G> {
    /// Build one grid per formation.
    ///
    /// # Errors
    /// `EmptySubdomain` if `formations` is empty, or any error from building
    /// a grid.
    pub fn new(
        formations: Vec<Arc<G::Formation>>,
        map: &MapElementArray,
    ) -> Result<Self, MeshError> {
        if formations.is_empty() {
            return Err(MeshError::EmptySubdomain);
        }
        let grids = formations
            .into_iter()
            .map(|formation| G::build(formation, map))
            .collect::<Result<Vec<_>, _>>()?;
        let subdomain = Self {
            grids,
            layout: map.layout().clone(),
            depth_indices: None,
            node_k_assigned: false,
        };
        log::debug!(
            "subdomain of {} formations, {} elements in depth",
            subdomain.grids.len(),
            subdomain.number_of_elements()
        );
        subdomain.debug_assert_invariants();
        Ok(subdomain)
    }

    /// Bind every grid to a new snapshot of its formation.
    ///
    /// Every snapshot is checked against its grid before any grid is
    /// rebound, so on error no grid has changed. Depth indices and node
    /// assignments are discarded whether or not the reset succeeds.
    ///
    /// # Errors
    /// - `FormationMismatch` if the formations are not the ones the
    ///   subdomain was built from, in the same order.
    /// - Any other error of
    ///   [`FormationElementGrid::check_rebind`](crate::grid::FormationElementGrid::check_rebind).
    pub fn reset(
        &mut self,
        formations: Vec<Arc<G::Formation>>,
        map: &MapElementArray,
    ) -> Result<(), MeshError> {
        self.depth_indices = None;
        self.node_k_assigned = false;
        if formations.len() != self.grids.len() {
            return Err(MeshError::FormationMismatch {
                expected: self.formation_names().join(", "),
                found: formations.iter().map(|f| f.name()).join(", "),
            });
        }
        for (grid, formation) in self.grids.iter().zip(&formations) {
            grid.check_rebind(formation, map)?;
        }
        for (grid, formation) in self.grids.iter_mut().zip(formations) {
            grid.rebind(formation, map)?;
        }
        log::debug!("subdomain reset to a new snapshot");
        Ok(())
    }

    #[inline]
    pub fn grids(&self) -> &[G] {
        &self.grids
    }

    #[inline]
    pub fn grid(&self, index: usize) -> Option<&G> {
        self.grids.get(index)
    }

    #[inline]
    pub fn grid_mut(&mut self, index: usize) -> Option<&mut G> {
        self.grids.get_mut(index)
    }

    pub fn grid_by_name(&self, name: &str) -> Option<&G> {
        self.grids
            .iter()
            .find(|g| g.formation_grid().formation().name() == name)
    }

    pub fn formation_names(&self) -> Vec<&str> {
        self.grids
            .iter()
            .map(|g| g.formation_grid().formation().name())
            .collect()
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Total number of elements in depth.
    pub fn number_of_elements(&self) -> usize {
        self.grids.iter().map(|g| g.formation_grid().length_k()).sum()
    }

    /// Total number of nodes in depth.
    pub fn number_of_nodes(&self) -> usize {
        self.number_of_elements() + 1
    }

    /// Grid index and local depth of global element depth `global_k`.
    pub fn global_k_position(&self, global_k: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (index, grid) in self.grids.iter().enumerate().rev() {
            let length = grid.formation_grid().length_k();
            if global_k < offset + length {
                return Some((index, global_k - offset));
            }
            offset += length;
        }
        None
    }

    /// Give every element, ghosts included, its global element depth.
    pub fn number_elements(&mut self) {
        let mut offset = 0;
        for grid in self.grids.iter_mut().rev() {
            let grid = grid.formation_grid_mut();
            let length = grid.length_k();
            for element in grid.elements_mut() {
                let local = element.position().k;
                element.set_k(offset + local);
            }
            offset += length;
        }
    }

    /// Number the depth indices of every node column from the current
    /// formation snapshots.
    pub fn number_depth_indices(
        &mut self,
        opts: &DepthNumberingOpts,
    ) -> Result<DepthNumberingStats, MeshError> {
        let formations: Vec<&G::Formation> = self
            .grids
            .iter()
            .map(|g| g.formation_grid().formation())
            .collect();
        let (indices, stats) =
            depth_numbering::number_depth_indices(&formations, &self.layout.node_layout(), opts)?;
        self.depth_indices = Some(indices);
        self.node_k_assigned = false;
        Ok(stats)
    }

    /// Depth indices from the last numbering pass.
    #[inline]
    pub fn depth_indices(&self) -> Option<&LocalArray3<usize>> {
        self.depth_indices.as_ref()
    }

    /// Assign corner depth indices to every element and flag the elements
    /// on the top and bottom of the subdomain.
    ///
    /// # Errors
    /// `DepthIndicesNotNumbered` before
    /// [`number_depth_indices`](Self::number_depth_indices).
    pub fn set_subdomain_boundary(&mut self) -> Result<(), MeshError> {
        let top = self.number_of_nodes() - 1;
        let Self {
            grids,
            depth_indices,
            node_k_assigned,
            ..
        } = self;
        let indices = depth_indices
            .as_ref()
            .ok_or(MeshError::DepthIndicesNotNumbered)?;
        let mut global_k_start = top;
        for grid in grids.iter_mut() {
            let grid = grid.formation_grid_mut();
            grid.set_element_node_k_values(indices, top, global_k_start)?;
            log::trace!(
                "`{}` spans depth nodes {:?}",
                grid.formation().name(),
                grid.subdomain_node_k_indices()
            );
            global_k_start -= grid.length_k();
        }
        *node_k_assigned = true;
        Ok(())
    }

    /// Number of active elements owned by this process.
    pub fn active_element_count(&self) -> usize {
        self.grids
            .iter()
            .map(|g| g.formation_grid().owned_active_count())
            .sum()
    }
}

impl<F: Formation> Subdomain<FormationElementGrid<ElementDofs, F>> {
    /// Nodes touched by an owned active element, over the ghost-extended
    /// node window.
    ///
    /// # Errors
    /// `DepthIndicesNotNumbered` before
    /// [`set_subdomain_boundary`](Subdomain::set_subdomain_boundary).
    pub fn determine_active_nodes(&self) -> Result<LocalArray3<bool>, MeshError> {
        if !self.node_k_assigned {
            return Err(MeshError::DepthIndicesNotNumbered);
        }
        Ok(dof_numbering::determine_active_nodes(
            self.grids.iter(),
            &self.layout.node_layout(),
            self.number_of_nodes() - 1,
        ))
    }

    /// Number the owned active nodes from `local_start`.
    pub fn number_global_dofs(
        &self,
        ordering: DofOrdering,
        local_start: usize,
    ) -> Result<DofNumbering, MeshError> {
        let active = self.determine_active_nodes()?;
        Ok(dof_numbering::number_global_dofs(
            &active,
            &self.layout.node_layout(),
            ordering,
            local_start,
        ))
    }

    /// Write global dof numbers into every owned active element.
    pub fn assign_element_dofs(&mut self, numbering: &DofNumbering) -> Result<(), MeshError> {
        dof_numbering::assign_element_dofs(self.grids.iter_mut(), numbering)
    }
}

impl<G: ElementGrid> DebugInvariants for Subdomain<G> {
    /// Every grid is valid, shares the subdomain's layout and has a unique
    /// formation name.
    fn validate_invariants(&self) -> Result<(), MeshError> {
        for grid in &self.grids {
            let grid = grid.formation_grid();
            grid.validate_invariants()?;
            if grid.layout() != &self.layout {
                return Err(MeshError::InvariantViolation(format!(
                    "formation `{}` does not share the subdomain layout",
                    grid.formation().name()
                )));
            }
        }
        if let Some(name) = self.formation_names().into_iter().duplicates().next() {
            return Err(MeshError::InvariantViolation(format!(
                "formation `{name}` appears twice in the subdomain"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geology::formation::LayerFormation;

    fn formations(map: &MapElementArray) -> Vec<Arc<LayerFormation>> {
        vec![
            Arc::new(LayerFormation::builder("Top", map, 2).build().unwrap()),
            Arc::new(LayerFormation::builder("Base", map, 3).build().unwrap()),
        ]
    }

    fn map() -> MapElementArray {
        MapElementArray::new(GridLayout::serial(2, 1).unwrap())
    }

    #[test]
    fn empty_subdomain_rejected() {
        let map = map();
        assert_eq!(
            SubdomainGrids::<LayerFormation>::new(Vec::new(), &map).unwrap_err(),
            MeshError::EmptySubdomain
        );
    }

    #[test]
    fn counts_and_lookup() {
        let map = map();
        let sub = SubdomainGrids::new(formations(&map), &map).unwrap();
        assert_eq!(sub.number_of_elements(), 5);
        assert_eq!(sub.number_of_nodes(), 6);
        assert_eq!(sub.formation_names(), vec!["Top", "Base"]);
        assert_eq!(sub.grid_by_name("Base").unwrap().length_k(), 3);
        assert!(sub.grid_by_name("Missing").is_none());
        assert_eq!(sub.active_element_count(), 10);
    }

    #[test]
    fn global_k_counts_from_the_deepest_element() {
        let map = map();
        let sub = SubdomainGrids::new(formations(&map), &map).unwrap();
        assert_eq!(sub.global_k_position(0), Some((1, 0)));
        assert_eq!(sub.global_k_position(2), Some((1, 2)));
        assert_eq!(sub.global_k_position(3), Some((0, 0)));
        assert_eq!(sub.global_k_position(4), Some((0, 1)));
        assert_eq!(sub.global_k_position(5), None);
    }

    #[test]
    fn number_elements_uses_global_depth() {
        let map = map();
        let mut sub = SubdomainGrids::new(formations(&map), &map).unwrap();
        sub.number_elements();
        assert_eq!(sub.grid(0).unwrap().element(1, 0, 1).k(), 4);
        assert_eq!(sub.grid(1).unwrap().element(1, 0, 1).k(), 1);
    }

    #[test]
    fn boundary_requires_numbered_depth() {
        let map = map();
        let mut sub = SubdomainGrids::new(formations(&map), &map).unwrap();
        assert_eq!(
            sub.set_subdomain_boundary().unwrap_err(),
            MeshError::DepthIndicesNotNumbered
        );
    }

    #[test]
    fn reset_checks_formations() {
        let map = map();
        let mut sub = SubdomainGrids::new(formations(&map), &map).unwrap();
        let short = vec![Arc::new(LayerFormation::builder("Top", &map, 2).build().unwrap())];
        assert_eq!(
            sub.reset(short, &map).unwrap_err(),
            MeshError::FormationMismatch {
                expected: "Top, Base".into(),
                found: "Top".into()
            }
        );
        sub.reset(formations(&map), &map).unwrap();
        assert_eq!(sub.grid(0).unwrap().generation(), 1);
    }

    #[test]
    fn failed_reset_rebinds_no_grid() {
        let map = map();
        let mut domain = ComputationalDomain::new(formations(&map), &map).unwrap();
        domain.number_depth_indices(&DepthNumberingOpts::default()).unwrap();
        domain.set_subdomain_boundary().unwrap();
        assert!(domain.number_global_dofs(DofOrdering::Kji, 0).is_ok());

        let eroded_top = LayerFormation::builder("Top", &map, 2)
            .activity(|_, _, k| k == 0)
            .build()
            .unwrap();
        let other = LayerFormation::builder("Other", &map, 3).build().unwrap();
        assert_eq!(
            domain
                .reset(vec![Arc::new(eroded_top), Arc::new(other)], &map)
                .unwrap_err(),
            MeshError::FormationMismatch {
                expected: "Base".into(),
                found: "Other".into()
            }
        );

        assert_eq!(domain.grid(0).unwrap().generation(), 0);
        assert_eq!(domain.grid(1).unwrap().generation(), 0);
        assert!(domain.grid(0).unwrap().element(0, 0, 1).is_active());
        assert!(domain.depth_indices().is_none());
        assert_eq!(
            domain.number_global_dofs(DofOrdering::Kji, 0).unwrap_err(),
            MeshError::DepthIndicesNotNumbered
        );
        assert_eq!(
            domain.set_subdomain_boundary().unwrap_err(),
            MeshError::DepthIndicesNotNumbered
        );
    }
}
