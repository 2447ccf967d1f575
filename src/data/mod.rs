//! Distributed-array primitives the element grids are built on.
//!
//! - [`layout::GridLayout`]: the ghost-aware lateral partition of the map
//! - [`local_array::LocalArray3`] / [`local_array::LocalArray2`]: dense
//!   storage addressed by global indices over the ghost-extended window

pub mod layout;
pub mod local_array;

pub use layout::GridLayout;
pub use local_array::{LocalArray2, LocalArray3};
