//! Hexahedral elements of a formation grid.
//!
//! - [`base::BaseElement`]: topology bookkeeping shared by every element kind
//! - [`capability`]: the payloads that distinguish the element kinds

pub mod base;
pub mod capability;

pub use base::{BaseElement, GeneralElement, SubdomainElement};
pub use capability::{BoundaryCondition, ElementCapability, ElementDofs, NoDofs};
