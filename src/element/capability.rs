//! Element capabilities.
//!
//! A capability is the per-element payload a [`BaseElement`] carries on top
//! of the shared topology bookkeeping. [`NoDofs`] carries nothing and is used
//! by traversal-only consumers; [`ElementDofs`] carries a global degree of
//! freedom number and a boundary-condition tag per corner node and is used
//! where equations are assembled.
//!
//! [`BaseElement`]: crate::element::base::BaseElement

use std::fmt;

/// Number of corner nodes of a hexahedral element.
pub const NODES_PER_ELEMENT: usize = 8;

/// Payload carried by every element of a grid.
pub trait ElementCapability: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Whether the payload holds per-node degrees of freedom.
    const HAS_DOFS: bool;
}

/// Capability of elements that carry no payload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoDofs;

impl ElementCapability for NoDofs {
    const HAS_DOFS: bool = false;
}

/// Nodal boundary condition of a dof-bearing element.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum BoundaryCondition {
    #[default]
    Interior,
    InteriorConstrainedOverpressure,
    Surface,
    Bottom,
    BottomFlux,
    InteriorNeumann,
    SideNeumann,
    BottomNeumann,
    InteriorConstrainedTemperature,
}

impl BoundaryCondition {
    /// True for the conditions that fix the value of the unknown.
    pub fn is_dirichlet(self) -> bool {
        matches!(
            self,
            BoundaryCondition::InteriorConstrainedOverpressure
                | BoundaryCondition::Surface
                | BoundaryCondition::Bottom
                | BoundaryCondition::InteriorConstrainedTemperature
        )
    }
}

/// Per-node global dof numbers and boundary-condition tags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ElementDofs {
    dofs: [usize; NODES_PER_ELEMENT],
    boundary_conditions: [BoundaryCondition; NODES_PER_ELEMENT],
}

impl ElementCapability for ElementDofs {
    const HAS_DOFS: bool = true;
}

impl ElementDofs {
    /// # Panics
    /// If `node > 7`.
    #[inline]
    pub fn dof(&self, node: usize) -> usize {
        self.dofs[node]
    }

    #[inline]
    pub fn set_dof(&mut self, node: usize, dof: usize) {
        self.dofs[node] = dof;
    }

    #[inline]
    pub fn dofs(&self) -> &[usize; NODES_PER_ELEMENT] {
        &self.dofs
    }

    #[inline]
    pub fn boundary_condition(&self, node: usize) -> BoundaryCondition {
        self.boundary_conditions[node]
    }

    #[inline]
    pub fn set_boundary_condition(&mut self, node: usize, bc: BoundaryCondition) {
        self.boundary_conditions[node] = bc;
    }

    #[inline]
    pub fn boundary_conditions(&self) -> &[BoundaryCondition; NODES_PER_ELEMENT] {
        &self.boundary_conditions
    }
}
