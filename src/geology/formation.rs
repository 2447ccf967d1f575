//! Formations: the stratigraphic units that own one depth stack of cells.
//!
//! The [`Formation`] trait is the narrow interface the element grids consume
//! from the geology layer. [`LayerFormation`] is an in-memory implementation
//! holding one snapshot of a formation: its layer elements and the
//! depositing thickness of every depth segment of every node column.

use crate::data::layout::GridLayout;
use crate::data::local_array::LocalArray3;
use crate::geology::layer_element::LayerElement;
use crate::geology::map_element::MapElementArray;
use crate::mesh_error::MeshError;
use crate::topology::boundary::BoundaryId;
use crate::topology::index::Index3;

/// Segments thinner than this are considered eroded or not yet deposited.
pub const DEPOSITING_THICKNESS_TOLERANCE: f64 = 0.001;

/// A formation as seen by the element grids.
///
/// Implementations describe one snapshot; a new snapshot is a new value the
/// grids rebind to.
pub trait Formation: Send + Sync {
    /// Unique name of the formation.
    fn name(&self) -> &str;

    /// Lateral layout of the formation's cells.
    fn layout(&self) -> &GridLayout;

    /// Number of elements in the depth stack.
    fn maximum_number_of_elements(&self) -> usize;

    /// The layer element at `(i, j, k)`, ghosts included.
    ///
    /// Out-of-range indices are a precondition violation.
    fn layer_element(&self, i: usize, j: usize, k: usize) -> &LayerElement;

    /// Depositing thickness of depth segment `k` of the lateral *node*
    /// column `(i, j)`.
    fn depositing_thickness(&self, i: usize, j: usize, k: usize) -> f64;
}

/// In-memory formation snapshot.
#[derive(Clone, Debug)]
pub struct LayerFormation {
    name: String,
    layout: GridLayout,
    depth: usize,
    tolerance: f64,
    elements: LocalArray3<LayerElement>,
    thickness: LocalArray3<f64>,
}

type ThicknessFn<'m> = Box<dyn Fn(usize, usize, usize) -> f64 + 'm>;
type ActivityFn<'m> = Box<dyn Fn(usize, usize, usize) -> bool + 'm>;

/// Builder for [`LayerFormation`].
pub struct LayerFormationBuilder<'m> {
    name: String,
    map: &'m MapElementArray,
    depth: usize,
    tolerance: f64,
    thickness: Option<ThicknessFn<'m>>,
    activity: Option<ActivityFn<'m>>,
}

impl<'m> LayerFormationBuilder<'m> {
    /// Thickness of segment `k` of node column `(i, j)`. Defaults to `1.0`.
    pub fn thickness<G>(mut self, thickness: G) -> Self
    where
        G: Fn(usize, usize, usize) -> f64 + 'm,
    {
        self.thickness = Some(Box::new(thickness));
        self
    }

    /// Explicit activity of element `(i, j, k)`, overriding the activity
    /// derived from the thickness.
    pub fn activity<G>(mut self, activity: G) -> Self
    where
        G: Fn(usize, usize, usize) -> bool + 'm,
    {
        self.activity = Some(Box::new(activity));
        self
    }

    pub fn thickness_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Build the snapshot.
    ///
    /// # Errors
    /// `EmptyFormation` if the depth stack is empty.
    pub fn build(self) -> Result<LayerFormation, MeshError> {
        if self.depth == 0 {
            return Err(MeshError::EmptyFormation(self.name));
        }
        let layout = self.map.layout().clone();
        let node_layout = layout.node_layout();
        let thickness = match &self.thickness {
            Some(f) => LocalArray3::over_layout(&node_layout, self.depth, |i, j, k| f(i, j, k)),
            None => LocalArray3::over_layout(&node_layout, self.depth, |_, _, _| 1.0),
        };

        let map = self.map;
        let elements = LocalArray3::over_layout(&layout, self.depth, |i, j, k| {
            let column = map.element(i, j);
            let mut element = LayerElement::new(Index3::new(i, j, k));
            element.set_on_processor(column.is_on_processor());
            for face in BoundaryId::LATERAL {
                element.set_domain_boundary(face, column.is_on_domain_boundary(face));
            }
            element
        });

        let mut formation = LayerFormation {
            name: self.name,
            layout,
            depth: self.depth,
            tolerance: self.tolerance,
            elements,
            thickness,
        };
        match &self.activity {
            Some(f) => {
                for p in formation.elements.positions().collect::<Vec<_>>() {
                    let defined = map.element(p.i, p.j).is_defined();
                    formation.elements[p].set_active(defined && f(p.i, p.j, p.k));
                }
            }
            None => formation.derive_activity_from_thickness(map),
        }
        formation.update_active_boundaries();
        log::debug!(
            "built formation `{}`: {} x {} x {} cells, {} active",
            formation.name,
            formation.layout.length_i(true),
            formation.layout.length_j(true),
            formation.depth,
            formation.active_element_count()
        );
        Ok(formation)
    }
}

impl LayerFormation {
    /// Start building a formation of `depth` elements over the lateral
    /// layout of `map`.
    pub fn builder<'m>(
        name: impl Into<String>,
        map: &'m MapElementArray,
        depth: usize,
    ) -> LayerFormationBuilder<'m> {
        LayerFormationBuilder {
            name: name.into(),
            map,
            depth,
            tolerance: DEPOSITING_THICKNESS_TOLERANCE,
            thickness: None,
            activity: None,
        }
    }

    #[inline]
    pub fn thickness_tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Mark element `(i, j, k)` active or inactive.
    ///
    /// Active-boundary flags are stale until
    /// [`update_active_boundaries`](Self::update_active_boundaries) runs.
    pub fn set_active(&mut self, i: usize, j: usize, k: usize, active: bool) {
        self.elements[(i, j, k)].set_active(active);
    }

    /// Set the depositing thickness of segment `k` of node column `(i, j)`.
    pub fn set_thickness(&mut self, i: usize, j: usize, k: usize, thickness: f64) {
        self.thickness[(i, j, k)] = thickness;
    }

    /// An element is active iff its column is defined and any of its four
    /// corner segments is thicker than the tolerance.
    pub fn derive_activity_from_thickness(&mut self, map: &MapElementArray) {
        let positions: Vec<Index3> = self.elements.positions().collect();
        for p in positions {
            let defined = map.get(p.i, p.j).is_some_and(|column| column.is_defined());
            let thick = [(0, 0), (1, 0), (1, 1), (0, 1)]
                .iter()
                .any(|&(di, dj)| self.thickness[(p.i + di, p.j + dj, p.k)] > self.tolerance);
            self.elements[p].set_active(defined && thick);
        }
    }

    /// Recompute every active-boundary flag: a face is an active boundary
    /// iff the element and its neighbour across that face are both active.
    /// Faces on the domain boundary, at the top or bottom of the formation,
    /// or leading out of the local window are never active boundaries.
    pub fn update_active_boundaries(&mut self) {
        let flags: Vec<(Index3, [bool; BoundaryId::COUNT])> = self
            .elements
            .positions()
            .map(|p| {
                let element = &self.elements[p];
                let mut active = [false; BoundaryId::COUNT];
                for face in BoundaryId::ALL {
                    if !element.is_active() || element.is_on_domain_boundary(face) {
                        continue;
                    }
                    active[face.index()] = p
                        .step(face)
                        .and_then(|q| self.elements.get(q.i, q.j, q.k))
                        .is_some_and(LayerElement::is_active);
                }
                (p, active)
            })
            .collect();
        for (p, active) in flags {
            for face in BoundaryId::ALL {
                self.elements[p].set_active_boundary(face, active[face.index()]);
            }
        }
    }

    /// Number of active elements owned by this process.
    pub fn active_element_count(&self) -> usize {
        self.elements
            .values()
            .filter(|e| e.is_on_processor() && e.is_active())
            .count()
    }
}

impl Formation for LayerFormation {
    fn name(&self) -> &str {
        &self.name
    }

    fn layout(&self) -> &GridLayout {
        &self.layout
    }

    fn maximum_number_of_elements(&self) -> usize {
        self.depth
    }

    #[track_caller]
    fn layer_element(&self, i: usize, j: usize, k: usize) -> &LayerElement {
        &self.elements[(i, j, k)]
    }

    #[track_caller]
    fn depositing_thickness(&self, i: usize, j: usize, k: usize) -> f64 {
        self.thickness[(i, j, k)]
    }
}
