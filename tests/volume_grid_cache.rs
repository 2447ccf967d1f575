mod util;

use std::sync::Arc;

use basin_mesh::prelude::*;
use static_assertions::assert_impl_all;
use util::{formation, serial_map, subdomain_grid};

assert_impl_all!(FormationSubdomainElementGrid<LayerFormation>: Send, Sync);
assert_impl_all!(ElementVolumeGrid: Send, Sync);
assert_impl_all!(ComputationalDomain<LayerFormation>: Send, Sync);

#[test]
fn same_dof_count_returns_the_same_grid() {
    let map = serial_map(2, 2);
    let grid = subdomain_grid(&map, 3, &[]);
    let first = grid.volume_grid(3).unwrap();
    let second = grid.volume_grid(3).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let scalar = grid.scalar_volume_grid().unwrap();
    assert!(!Arc::ptr_eq(&first, &scalar));
    assert_eq!(scalar.number_of_dofs(), 1);
    assert_eq!(grid.volume_grid_count(), 2);
}

#[test]
fn zero_dofs_is_rejected_and_not_cached() {
    let map = serial_map(1, 1);
    let grid = subdomain_grid(&map, 1, &[]);
    assert_eq!(grid.volume_grid(0).unwrap_err(), MeshError::InvalidDofCount(0));
    assert_eq!(grid.volume_grid_count(), 0);
}

#[test]
fn volume_grid_spans_the_ghost_window() {
    let layout = GridLayout::partitioned(4, 1, 1..=2, 0..=0, 1).unwrap();
    let map = MapElementArray::new(layout);
    let grid = subdomain_grid(&map, 2, &[]);
    let volume = grid.volume_grid(2).unwrap();
    assert_eq!(volume.depth(), 2);
    assert_eq!(volume.local_size(), 4 * 2 * 2);
    assert_eq!(volume.local_index(0, 0, 0, 0), Some(0));
    assert_eq!(volume.local_index(0, 0, 0, 1), Some(1));
    assert_eq!(volume.local_index(0, 0, 1, 0), Some(2));
    assert_eq!(volume.local_index(1, 0, 0, 0), Some(4));
    assert_eq!(volume.local_index(0, 0, 2, 0), None);
    assert_eq!(volume.create_local_vector(0.5), vec![0.5; 16]);
}

#[test]
fn volume_grids_survive_a_rebind() {
    let map = serial_map(1, 1);
    let mut grid = subdomain_grid(&map, 2, &[]);
    let before = grid.volume_grid(1).unwrap();
    grid.rebind(formation(&map, "Layer", 2, &[(0, 0, 0)]), &map).unwrap();
    assert!(Arc::ptr_eq(&before, &grid.volume_grid(1).unwrap()));
    assert_eq!(grid.active_positions(), &[Index3::new(0, 0, 1)]);
}

#[test]
fn concurrent_readers_share_one_grid() {
    let map = serial_map(4, 3);
    let grid = subdomain_grid(&map, 5, &[(2, 1, 3), (0, 0, 0)]);
    let expected = grid.active_element_iter(false).count();

    let results: Vec<(usize, Arc<ElementVolumeGrid>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let grid = &grid;
                scope.spawn(move || {
                    let count = grid.active_element_iter(false).count();
                    (count, grid.volume_grid(4).unwrap())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|(count, _)| *count == expected));
    assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0].1, &w[1].1)));
    assert_eq!(grid.volume_grid_count(), 1);
    assert_eq!(grid.active_positions().len(), expected);
}
