//! Structural checks of a formation grid's binding and neighbour links.

use crate::debug_invariants::DebugInvariants;
use crate::element::capability::ElementCapability;
use crate::geology::formation::Formation;
use crate::grid::formation_grid::FormationElementGrid;
use crate::mesh_error::MeshError;
use crate::topology::boundary::BoundaryId;

impl<C: ElementCapability, F: Formation> DebugInvariants for FormationElementGrid<C, F> {
    /// Checks, in order, for every element:
    /// - it is bound to the layer element at its own position;
    /// - every neighbour handle is the adjacent position across its face
    ///   and lies inside the grid;
    /// - no lateral link leaves a ghost cell or crosses a domain boundary;
    /// - a link between two owned elements is reciprocated, unless the
    ///   target declares the facing side a domain boundary.
    fn validate_invariants(&self) -> Result<(), MeshError> {
        for p in self.positions() {
            let element = self.element(p.i, p.j, p.k);
            if !element.is_bound() {
                return Err(MeshError::InvariantViolation(format!("element {p:?} is unbound")));
            }
            let layer = element.layer_element();
            if layer.position() != p {
                return Err(MeshError::InvariantViolation(format!(
                    "element {p:?} is bound to layer element {:?}",
                    layer.position()
                )));
            }
            for face in BoundaryId::ALL {
                let Some(target) = element.neighbour(face) else {
                    continue;
                };
                if p.step(face) != Some(target) {
                    return Err(MeshError::InvariantViolation(format!(
                        "element {p:?} links {target:?} across {face}, which is not adjacent"
                    )));
                }
                let Some(other) = self.get(target) else {
                    return Err(MeshError::InvariantViolation(format!(
                        "element {p:?} links {target:?} across {face}, outside the grid"
                    )));
                };
                if face.is_lateral() {
                    if !layer.is_on_processor() {
                        return Err(MeshError::InvariantViolation(format!(
                            "ghost element {p:?} has a lateral link across {face}"
                        )));
                    }
                    if layer.is_on_domain_boundary(face) {
                        return Err(MeshError::InvariantViolation(format!(
                            "element {p:?} links across domain boundary {face}"
                        )));
                    }
                }
                let facing_boundary =
                    face.is_lateral() && other.layer_element().is_on_domain_boundary(face.opposite());
                if layer.is_on_processor()
                    && other.is_on_processor()
                    && !facing_boundary
                    && other.neighbour(face.opposite()) != Some(p)
                {
                    return Err(MeshError::InvariantViolation(format!(
                        "link {p:?} -> {target:?} across {face} is not reciprocated"
                    )));
                }
            }
        }
        Ok(())
    }
}
