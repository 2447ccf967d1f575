#![cfg_attr(docsrs, feature(doc_cfg))]
//! # basin-mesh
//!
//! basin-mesh is the element-topology layer of a multi-formation basin
//! simulator. For every stratigraphic formation it keeps a logical 3-D grid
//! of hexahedral elements, tracks which cells hold deposited rock at the
//! current snapshot, links each element to its neighbours across the six
//! hexahedron faces and exposes predicate-filtered traversal to assembly
//! and post-processing code.
//!
//! ## Features
//! - One generic element type ([`element::BaseElement`]) with a compile-time
//!   capability: no payload for traversal, per-node dofs and boundary
//!   conditions for assembly
//! - Neighbour links as `(i, j, k)` handles into the owning grid, with
//!   inactive elements skipped vertically without compacting the array
//! - Ghost-aware, processor-aware bounds for distributed layouts
//! - `K`-fastest cursors filtered by element predicates
//! - Lazily created, cached per-dof-count volume grids
//! - Depth-index and global dof numbering for a subdomain
//!
//! ## Cargo features
//! - `rayon`: parallel walk over active elements
//! - `check-invariants` / `strict-invariants`: run structural checks after
//!   construction and rebinding in release builds
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use basin_mesh::prelude::*;
//!
//! let map = MapElementArray::new(GridLayout::serial(2, 1)?);
//! let formation = LayerFormation::builder("Sand", &map, 3)
//!     .activity(|i, _, k| !(i == 0 && k == 1))
//!     .build()?;
//! let grid = FormationSubdomainElementGrid::new(Arc::new(formation), &map)?;
//!
//! assert_eq!(grid.active_element_iter(false).count(), 5);
//! let above = grid.active_neighbour(0, 0, 0, BoundaryId::SHALLOW_FACE).unwrap();
//! assert_eq!(above.position(), Index3::new(0, 0, 2));
//! # Ok::<(), basin_mesh::mesh_error::MeshError>(())
//! ```

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod element;
pub mod geology;
pub mod grid;
pub mod mesh_error;
pub mod subdomain;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{DepthNumberingOpts, DepthNumberingStats, DofNumbering, DofOrdering};
    pub use crate::data::{GridLayout, LocalArray2, LocalArray3};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::element::{
        BaseElement, BoundaryCondition, ElementCapability, ElementDofs, GeneralElement, NoDofs,
        SubdomainElement,
    };
    pub use crate::geology::{Formation, LayerElement, LayerFormation, MapElement, MapElementArray};
    pub use crate::grid::{
        ActiveElementIterator, ElementGrid, ElementIterator, ElementPredicate, ElementVolumeGrid,
        FormationElementGrid, FormationSubdomainElementGrid, GenericElementIterator,
        PredicateIsActive, PredicateTrue,
    };
    pub use crate::mesh_error::MeshError;
    pub use crate::subdomain::{ComputationalDomain, Subdomain, SubdomainGrids};
    pub use crate::topology::{BoundaryId, Index3, InvalidateCache};
}
