//! Element-topology vocabulary shared by the grids.
//!
//! - [`boundary::BoundaryId`]: the six faces of a hexahedral element
//! - [`index::Index3`]: `(i, j, k)` handles used for neighbour links
//! - [`cache::InvalidateCache`]: hook for grids that memoise derived data

pub mod boundary;
pub mod cache;
pub mod index;

pub use boundary::BoundaryId;
pub use cache::InvalidateCache;
pub use index::Index3;
