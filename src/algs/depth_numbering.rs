//! Depth-index numbering of the node columns of a subdomain.
//!
//! Every lateral node column gets one depth index per global depth node,
//! numbered from the bottom up. A segment thicker than the tolerance gives
//! its bottom node its own index; a degenerate (eroded or not yet
//! deposited) segment collapses onto the node above, so its bottom node
//! inherits that node's index.

use crate::data::layout::GridLayout;
use crate::data::local_array::LocalArray3;
use crate::geology::formation::{DEPOSITING_THICKNESS_TOLERANCE, Formation};
use crate::mesh_error::MeshError;

/// Options for [`number_depth_indices`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthNumberingOpts {
    /// Segments at most this thick are degenerate.
    pub thickness_tolerance: f64,
}

impl Default for DepthNumberingOpts {
    fn default() -> Self {
        Self {
            thickness_tolerance: DEPOSITING_THICKNESS_TOLERANCE,
        }
    }
}

/// Summary of a depth numbering pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepthNumberingStats {
    pub active_segments: usize,
    pub inactive_segments: usize,
    /// Largest number of consecutive degenerate segments in any column.
    pub max_degenerate_segments: usize,
}

/// Number the depth indices of every node column of `node_layout` (ghosts
/// included) for the formations of a subdomain, shallowest first.
///
/// The returned array covers global depth nodes `0 ..= total elements`;
/// the top node of every column has index `total elements`.
///
/// # Errors
/// `EmptySubdomain` if `formations` is empty.
pub fn number_depth_indices<F: Formation>(
    formations: &[&F],
    node_layout: &GridLayout,
    opts: &DepthNumberingOpts,
) -> Result<(LocalArray3<usize>, DepthNumberingStats), MeshError> {
    if formations.is_empty() {
        return Err(MeshError::EmptySubdomain);
    }
    let top: usize = formations
        .iter()
        .map(|f| f.maximum_number_of_elements())
        .sum();
    let mut indices = LocalArray3::filled(
        [node_layout.range_i(true), node_layout.range_j(true), 0..=top],
        0usize,
    );
    let mut stats = DepthNumberingStats::default();

    for i in node_layout.range_i(true) {
        for j in node_layout.range_j(true) {
            indices[(i, j, top)] = top;
            let mut global_k = top;
            for formation in formations {
                for k in (0..formation.maximum_number_of_elements()).rev() {
                    global_k -= 1;
                    let above = indices[(i, j, global_k + 1)];
                    if formation.depositing_thickness(i, j, k) > opts.thickness_tolerance {
                        indices[(i, j, global_k)] = global_k;
                        stats.active_segments += 1;
                    } else {
                        indices[(i, j, global_k)] = above;
                        stats.inactive_segments += 1;
                        stats.max_degenerate_segments =
                            stats.max_degenerate_segments.max(above - global_k);
                    }
                }
            }
        }
    }

    log::debug!(
        "numbered depth indices: {} active and {} inactive segments, at most {} degenerate in a row",
        stats.active_segments,
        stats.inactive_segments,
        stats.max_degenerate_segments
    );
    Ok((indices, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geology::formation::LayerFormation;
    use crate::geology::map_element::MapElementArray;

    fn map() -> MapElementArray {
        MapElementArray::new(GridLayout::serial(1, 1).unwrap())
    }

    #[test]
    fn thick_segments_number_straight_through() {
        let map = map();
        let upper = LayerFormation::builder("Upper", &map, 2).build().unwrap();
        let lower = LayerFormation::builder("Lower", &map, 1).build().unwrap();
        let nodes = map.layout().node_layout();
        let (indices, stats) =
            number_depth_indices(&[&upper, &lower], &nodes, &DepthNumberingOpts::default()).unwrap();
        for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let column: Vec<_> = (0..=3).map(|k| indices[(i, j, k)]).collect();
            assert_eq!(column, vec![0, 1, 2, 3]);
        }
        assert_eq!(stats.active_segments, 12);
        assert_eq!(stats.inactive_segments, 0);
        assert_eq!(stats.max_degenerate_segments, 0);
    }

    #[test]
    fn degenerate_segments_collapse_onto_node_above() {
        let map = map();
        // Upper two segments eroded at node column i == 0.
        let upper = LayerFormation::builder("Upper", &map, 2)
            .thickness(|i, _, _| if i == 0 { 0.0 } else { 5.0 })
            .build()
            .unwrap();
        let lower = LayerFormation::builder("Lower", &map, 1).build().unwrap();
        let nodes = map.layout().node_layout();
        let (indices, stats) =
            number_depth_indices(&[&upper, &lower], &nodes, &DepthNumberingOpts::default()).unwrap();
        let eroded: Vec<_> = (0..=3).map(|k| indices[(0, 0, k)]).collect();
        assert_eq!(eroded, vec![0, 3, 3, 3]);
        let intact: Vec<_> = (0..=3).map(|k| indices[(1, 1, k)]).collect();
        assert_eq!(intact, vec![0, 1, 2, 3]);
        assert_eq!(stats.inactive_segments, 4);
        assert_eq!(stats.max_degenerate_segments, 2);
    }

    #[test]
    fn tolerance_is_configurable() {
        let map = map();
        let thin = LayerFormation::builder("Thin", &map, 1)
            .thickness(|_, _, _| 0.5)
            .build()
            .unwrap();
        let nodes = map.layout().node_layout();
        let opts = DepthNumberingOpts {
            thickness_tolerance: 1.0,
        };
        let (indices, stats) = number_depth_indices(&[&thin], &nodes, &opts).unwrap();
        assert_eq!(indices[(0, 0, 0)], 1);
        assert_eq!(stats.inactive_segments, 4);
    }

    #[test]
    fn empty_formation_list_is_rejected() {
        let nodes = map().layout().node_layout();
        let none: [&LayerFormation; 0] = [];
        assert_eq!(
            number_depth_indices(&none, &nodes, &DepthNumberingOpts::default()).unwrap_err(),
            MeshError::EmptySubdomain
        );
    }

    #[test]
    fn opts_round_trip_through_json() {
        let opts = DepthNumberingOpts::default();
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"thickness_tolerance":0.001}"#);
    }
}
