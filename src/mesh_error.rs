//! MeshError: Unified error type for basin-mesh public APIs
//!
//! Data-level inconsistencies between the grid and its collaborators
//! (formations, map-element arrays, node-depth arrays) are reported through
//! this type. Programmer errors such as out-of-range indexing stay panics.

use crate::topology::boundary::BoundaryId;
use crate::topology::index::Index3;
use thiserror::Error;

/// Unified error type for basin-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A lateral layout description is internally inconsistent.
    #[error("Invalid grid layout: {0}")]
    InvalidLayout(String),
    /// A formation's lateral layout does not match the map-element array.
    #[error(
        "Layout mismatch for formation `{formation}`: expected {expected:?} cells, found {found:?}"
    )]
    LayoutMismatch {
        formation: String,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A formation has no element in depth.
    #[error("Formation `{0}` has no elements in depth")]
    EmptyFormation(String),
    /// Rebinding was attempted with a different formation.
    #[error("Formation mismatch: grid belongs to `{expected}`, got `{found}`")]
    FormationMismatch { expected: String, found: String },
    /// A formation snapshot and the map disagree on a lateral domain
    /// boundary of an owned cell.
    #[error("Domain boundary mismatch: element {position:?} disagrees with the map across face {face}")]
    DomainBoundaryMismatch { position: Index3, face: BoundaryId },
    /// Lateral linking needs a cell one step over that is not allocated.
    #[error("Missing ghost cell: element {from:?} has no storage across face {face}")]
    MissingGhostCell { from: Index3, face: BoundaryId },
    /// An element position lies outside the allocated extents.
    #[error("Element index {0:?} is outside the grid extents")]
    IndexOutOfBounds(Index3),
    /// An auxiliary grid was requested with zero degrees of freedom.
    #[error("Number of degrees of freedom must be at least 1, got {0}")]
    InvalidDofCount(usize),
    /// A node-depth array does not cover what the operation needs.
    #[error("Node array too small: {0}")]
    NodeArrayTooSmall(String),
    /// A subdomain was built from an empty list of formations.
    #[error("Subdomain must contain at least one formation")]
    EmptySubdomain,
    /// Node K assignment was requested before depth indices were numbered.
    #[error("Depth indices have not been numbered for this subdomain")]
    DepthIndicesNotNumbered,
    /// A corner node of an active element has no global dof number.
    #[error("Node {0:?} of an active element has no global dof number")]
    UnnumberedNode(Index3),
    /// A structural invariant of a grid does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
