//! `FormationSubdomainElementGrid`: the traversal-oriented grid of one
//! formation.
//!
//! Wraps a [`FormationElementGrid`] of [`SubdomainElement`]s and adds the
//! predicate iterators, a memoised list of owned active elements and the
//! dof-keyed [`ElementVolumeGrid`] cache. Read access to the inner grid is
//! through `Deref`; mutable access goes through methods that drop the
//! memoised data.

use std::ops::Deref;
use std::sync::Arc;

use hashbrown::HashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::debug_invariants::DebugInvariants;
use crate::element::base::SubdomainElement;
use crate::element::capability::NoDofs;
use crate::geology::formation::Formation;
use crate::geology::map_element::MapElementArray;
use crate::grid::formation_grid::FormationElementGrid;
use crate::grid::iter::{
    ActiveElementIterator, ElementIterator, ElementPredicate, GenericElementIterator,
};
use crate::grid::volume_grid::ElementVolumeGrid;
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::index::Index3;

/// Element grid of one formation for traversal-only consumers.
#[derive(Debug)]
pub struct FormationSubdomainElementGrid<F: Formation> {
    grid: FormationElementGrid<NoDofs, F>,
    active_positions: OnceCell<Vec<Index3>>,
    volume_grids: RwLock<HashMap<usize, Arc<ElementVolumeGrid>>>,
}

impl<F: Formation> FormationSubdomainElementGrid<F> {
    /// See [`FormationElementGrid::new`].
    pub fn new(formation: Arc<F>, map: &MapElementArray) -> Result<Self, MeshError> {
        Ok(Self {
            grid: FormationElementGrid::new(formation, map)?,
            active_positions: OnceCell::new(),
            volume_grids: RwLock::new(HashMap::new()),
        })
    }

    /// Rebind to a new snapshot of the formation. Cached volume grids only
    /// depend on the extents, which a rebind cannot change, so they survive.
    pub fn rebind(&mut self, formation: Arc<F>, map: &MapElementArray) -> Result<(), MeshError> {
        self.grid.rebind(formation, map)?;
        self.invalidate_cache();
        Ok(())
    }

    /// The inner grid, mutably. Memoised activity data is dropped.
    pub fn grid_mut(&mut self) -> &mut FormationElementGrid<NoDofs, F> {
        self.invalidate_cache();
        &mut self.grid
    }

    /// # Panics
    /// If `(i, j, k)` is outside the allocated extents.
    #[track_caller]
    pub fn element_mut(&mut self, i: usize, j: usize, k: usize) -> &mut SubdomainElement {
        self.grid_mut().element_mut(i, j, k)
    }

    /// Iterator over every element of the owned (or ghost-extended) window.
    pub fn element_iter(&self, include_ghosts: bool) -> ElementIterator<'_, F> {
        ElementIterator::new(&self.grid, include_ghosts)
    }

    /// Iterator over the active elements of the owned (or ghost-extended)
    /// window.
    pub fn active_element_iter(&self, include_ghosts: bool) -> ActiveElementIterator<'_, F> {
        ActiveElementIterator::new(&self.grid, include_ghosts)
    }

    /// (Re)initialise an existing cursor of any predicate over this grid.
    pub fn initialise_iterator<'g, P: ElementPredicate>(
        &'g self,
        iter: &mut GenericElementIterator<'g, P, NoDofs, F>,
        include_ghosts: bool,
    ) {
        iter.initialise(&self.grid, include_ghosts);
    }

    /// Positions of the active elements owned by this process, in iteration
    /// order. Computed on first use.
    pub fn active_positions(&self) -> &[Index3] {
        self.active_positions.get_or_init(|| {
            self.active_element_iter(false)
                .map(SubdomainElement::position)
                .collect()
        })
    }

    /// The active elements owned by this process.
    pub fn active_elements(&self) -> impl Iterator<Item = &SubdomainElement> + '_ {
        self.active_positions()
            .iter()
            .map(|p| self.grid.element(p.i, p.j, p.k))
    }

    /// Parallel walk over the active elements owned by this process.
    #[cfg(feature = "rayon")]
    pub fn par_active_elements(
        &self,
    ) -> impl rayon::iter::ParallelIterator<Item = &SubdomainElement> + '_ {
        use rayon::prelude::*;
        self.active_positions()
            .par_iter()
            .map(|p| self.grid.element(p.i, p.j, p.k))
    }

    /// Create the volume grid with `number_of_dofs` unknowns per element
    /// unless one already exists.
    ///
    /// # Errors
    /// `InvalidDofCount` if `number_of_dofs == 0`.
    pub fn create_volume_grid(&self, number_of_dofs: usize) -> Result<(), MeshError> {
        self.volume_grid(number_of_dofs).map(|_| ())
    }

    /// The volume grid with `number_of_dofs` unknowns per element, created
    /// on first request. Repeated requests return the same grid.
    ///
    /// # Errors
    /// `InvalidDofCount` if `number_of_dofs == 0`.
    pub fn volume_grid(&self, number_of_dofs: usize) -> Result<Arc<ElementVolumeGrid>, MeshError> {
        if let Some(grid) = self.volume_grids.read().get(&number_of_dofs) {
            return Ok(Arc::clone(grid));
        }
        let mut grids = self.volume_grids.write();
        if let Some(grid) = grids.get(&number_of_dofs) {
            return Ok(Arc::clone(grid));
        }
        let grid = Arc::new(ElementVolumeGrid::new(
            self.grid.layout().clone(),
            self.grid.length_k(),
            number_of_dofs,
        )?);
        log::debug!(
            "created {number_of_dofs}-dof volume grid for `{}`",
            self.grid.formation().name()
        );
        grids.insert(number_of_dofs, Arc::clone(&grid));
        Ok(grid)
    }

    /// The scalar volume grid.
    pub fn scalar_volume_grid(&self) -> Result<Arc<ElementVolumeGrid>, MeshError> {
        self.volume_grid(1)
    }

    /// Number of distinct volume grids created so far.
    pub fn volume_grid_count(&self) -> usize {
        self.volume_grids.read().len()
    }
}

impl<F: Formation> Deref for FormationSubdomainElementGrid<F> {
    type Target = FormationElementGrid<NoDofs, F>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

impl<F: Formation> InvalidateCache for FormationSubdomainElementGrid<F> {
    fn invalidate_cache(&mut self) {
        self.active_positions.take();
    }
}

impl<F: Formation> DebugInvariants for FormationSubdomainElementGrid<F> {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.grid.validate_invariants()
    }
}
