//! The geology layer the element grids are built on.
//!
//! These types own the truth about activity and domain boundaries; the
//! element grids copy it and never write it back.

pub mod formation;
pub mod layer_element;
pub mod map_element;

pub use formation::{DEPOSITING_THICKNESS_TOLERANCE, Formation, LayerFormation};
pub use layer_element::LayerElement;
pub use map_element::{MapElement, MapElementArray};
