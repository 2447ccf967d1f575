#![allow(dead_code)]
use std::sync::Arc;

use basin_mesh::prelude::*;

/// Map of `ni x nj` columns owned by a single process.
pub fn serial_map(ni: usize, nj: usize) -> MapElementArray {
    MapElementArray::new(GridLayout::serial(ni, nj).unwrap())
}

/// Formation of `depth` elements in which exactly the listed cells are
/// inactive.
pub fn formation(
    map: &MapElementArray,
    name: &str,
    depth: usize,
    inactive: &[(usize, usize, usize)],
) -> Arc<LayerFormation> {
    let inactive = inactive.to_vec();
    let formation = LayerFormation::builder(name, map, depth)
        .activity(move |i, j, k| !inactive.contains(&(i, j, k)))
        .build()
        .unwrap();
    Arc::new(formation)
}

/// Traversal grid over `map` with the listed cells inactive.
pub fn subdomain_grid(
    map: &MapElementArray,
    depth: usize,
    inactive: &[(usize, usize, usize)],
) -> FormationSubdomainElementGrid<LayerFormation> {
    FormationSubdomainElementGrid::new(formation(map, "Layer", depth, inactive), map).unwrap()
}

/// Positions visited by an element sequence, as tuples.
pub fn positions<'a, C, I>(elements: I) -> Vec<(usize, usize, usize)>
where
    C: ElementCapability,
    I: IntoIterator<Item = &'a BaseElement<C>>,
{
    elements.into_iter().map(|e| e.position().into()).collect()
}
