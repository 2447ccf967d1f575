mod util;

use basin_mesh::prelude::*;
use util::{positions, serial_map, subdomain_grid};

#[test]
fn shallow_and_deep_faces_skip_the_inactive_middle_element() {
    let map = serial_map(2, 1);
    let grid = subdomain_grid(&map, 3, &[(0, 0, 1)]);

    let bottom = grid.element(0, 0, 0);
    let above = bottom.active_neighbour(BoundaryId::SHALLOW_FACE, &grid).unwrap();
    assert_eq!(above.position(), Index3::new(0, 0, 2));

    let top = grid.element(0, 0, 2);
    let below = top.active_neighbour(BoundaryId::DEEP_FACE, &grid).unwrap();
    assert_eq!(below.position(), Index3::new(0, 0, 0));

    assert_eq!(grid.active_element_iter(true).count(), 5);
    assert!(!positions(grid.active_element_iter(true)).contains(&(0, 0, 1)));
}

#[test]
fn skip_returns_none_at_formation_edge() {
    let map = serial_map(1, 1);
    let grid = subdomain_grid(&map, 4, &[(0, 0, 2), (0, 0, 3)]);
    assert!(grid.active_neighbour(0, 0, 1, BoundaryId::SHALLOW_FACE).is_none());
    assert!(grid.active_neighbour(0, 0, 0, BoundaryId::DEEP_FACE).is_none());
}

#[test]
fn skip_works_from_an_inactive_start() {
    let map = serial_map(1, 1);
    let grid = subdomain_grid(&map, 4, &[(0, 0, 1), (0, 0, 2)]);
    let up = grid.active_neighbour(0, 0, 1, BoundaryId::SHALLOW_FACE).unwrap();
    assert_eq!(up.position(), Index3::new(0, 0, 3));
    let down = grid.active_neighbour(0, 0, 2, BoundaryId::DEEP_FACE).unwrap();
    assert_eq!(down.position(), Index3::new(0, 0, 0));
}

#[test]
fn lateral_faces_never_skip() {
    let map = serial_map(3, 1);
    let grid = subdomain_grid(&map, 1, &[(1, 0, 0)]);
    // (2, 0, 0) is active but two hops away.
    assert!(grid.active_neighbour(0, 0, 0, BoundaryId::RIGHT).is_none());
    assert!(grid.active_neighbour(2, 0, 0, BoundaryId::LEFT).is_none());
    let linked = grid.neighbour(grid.element(0, 0, 0), BoundaryId::RIGHT).unwrap();
    assert!(!linked.is_active());
}
