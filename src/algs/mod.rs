//! Numbering passes run by a subdomain after its grids are bound.
//!
//! - [`depth_numbering`]: depth indices of node columns, collapsing
//!   degenerate segments
//! - [`dof_numbering`]: active nodes and their global dof numbers

pub mod depth_numbering;
pub mod dof_numbering;

pub use depth_numbering::{DepthNumberingOpts, DepthNumberingStats, number_depth_indices};
pub use dof_numbering::{
    DofNumbering, DofOrdering, assign_element_dofs, determine_active_nodes, number_global_dofs,
};
