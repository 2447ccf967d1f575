mod util;

use std::sync::Arc;

use basin_mesh::prelude::*;
use util::{formation, serial_map};

fn numbered_domain(
    map: &MapElementArray,
    formations: Vec<Arc<LayerFormation>>,
) -> ComputationalDomain<LayerFormation> {
    let mut domain = ComputationalDomain::new(formations, map).unwrap();
    domain.number_depth_indices(&DepthNumberingOpts::default()).unwrap();
    domain.set_subdomain_boundary().unwrap();
    domain
}

#[test]
fn thick_stack_numbers_every_node() {
    let map = serial_map(2, 1);
    let formations = vec![
        formation(&map, "Top", 2, &[]),
        formation(&map, "Base", 2, &[]),
    ];
    let mut domain = numbered_domain(&map, formations);
    assert_eq!(domain.number_of_nodes(), 5);
    assert_eq!(domain.grid(0).unwrap().subdomain_node_k_indices(), &[2, 3, 4]);
    assert_eq!(domain.grid(1).unwrap().subdomain_node_k_indices(), &[0, 1, 2]);

    let numbering = domain.number_global_dofs(DofOrdering::Kji, 0).unwrap();
    assert_eq!(numbering.local_count(), 30);
    for (i, j, k) in itertools::iproduct!(0..3, 0..2, 0..5) {
        assert_eq!(numbering.dof(i, j, k), Some(k * 6 + j * 3 + i));
    }

    domain.assign_element_dofs(&numbering).unwrap();
    let top = domain.grid(0).unwrap();
    // Back-right corner of the top quad of the shallowest element.
    assert_eq!(top.element(1, 0, 1).dof(6), 4 * 6 + 3 + 2);
    assert!(top.element(1, 0, 1).is_on_domain_boundary(BoundaryId::SHALLOW_FACE));
    assert!(!top.element(1, 0, 0).is_on_domain_boundary(BoundaryId::SHALLOW_FACE));
    let base = domain.grid_by_name("Base").unwrap();
    assert_eq!(base.element(0, 0, 0).dof(0), 0);
    assert!(base.element(0, 0, 0).is_on_domain_boundary(BoundaryId::DEEP_FACE));
}

#[test]
fn eroded_segment_collapses_its_nodes() {
    let map = serial_map(2, 1);
    let top = LayerFormation::builder("Top", &map, 2)
        .thickness(|_, _, k| if k == 1 { 0.0 } else { 10.0 })
        .build()
        .unwrap();
    let base = formation(&map, "Base", 2, &[]);
    let mut domain = numbered_domain(&map, vec![Arc::new(top), base]);

    let indices = domain.depth_indices().unwrap();
    let column: Vec<_> = (0..=4).map(|k| indices[(0, 0, k)]).collect();
    assert_eq!(column, vec![0, 1, 2, 4, 4]);

    let grid = domain.grid(0).unwrap();
    assert!(!grid.element(0, 0, 1).is_active());
    let below_erosion = grid.element(0, 0, 0);
    assert!(below_erosion.is_active());
    assert_eq!(below_erosion.node_k(4), 4);
    assert!(below_erosion.is_on_domain_boundary(BoundaryId::SHALLOW_FACE));

    let numbering = domain.number_global_dofs(DofOrdering::Kji, 0).unwrap();
    assert_eq!(numbering.local_count(), 24);
    assert_eq!(numbering.dof(0, 0, 3), None);
    domain.assign_element_dofs(&numbering).unwrap();
    assert_eq!(domain.grid(0).unwrap().element(0, 0, 0).dof(4), 18);
}

#[test]
fn dofs_require_depth_assignment() {
    let map = serial_map(1, 1);
    let mut domain =
        ComputationalDomain::new(vec![formation(&map, "Only", 1, &[])], &map).unwrap();
    assert_eq!(
        domain.number_global_dofs(DofOrdering::Kji, 0).unwrap_err(),
        MeshError::DepthIndicesNotNumbered
    );
    domain.number_depth_indices(&DepthNumberingOpts::default()).unwrap();
    assert_eq!(
        domain.determine_active_nodes().unwrap_err(),
        MeshError::DepthIndicesNotNumbered
    );
}

#[test]
fn ghost_corners_wait_for_their_owner() {
    let layout = GridLayout::partitioned(2, 1, 0..=0, 0..=0, 1).unwrap();
    let map = MapElementArray::new(layout);
    let mut domain = numbered_domain(&map, vec![formation(&map, "Only", 1, &[])]);

    let mut numbering = domain.number_global_dofs(DofOrdering::Kji, 40).unwrap();
    assert_eq!(numbering.local_count(), 4);
    assert_eq!(
        domain.assign_element_dofs(&numbering).unwrap_err(),
        MeshError::UnnumberedNode(Index3::new(1, 0, 0))
    );

    // Numbers owned by the neighbouring partition.
    for (offset, (j, k)) in itertools::iproduct!(0..2, 0..2).enumerate() {
        numbering.set(1, j, k, Some(100 + offset));
    }
    domain.assign_element_dofs(&numbering).unwrap();
    let element = domain.grid(0).unwrap().element(0, 0, 0);
    assert_eq!(element.dof(0), 40);
    assert_eq!(element.dof(1), 100);
}

#[test]
fn reset_discards_numbering() {
    let map = serial_map(1, 1);
    let mut domain = numbered_domain(&map, vec![formation(&map, "Only", 2, &[])]);
    assert!(domain.depth_indices().is_some());
    domain
        .reset(vec![formation(&map, "Only", 2, &[(0, 0, 1)])], &map)
        .unwrap();
    assert!(domain.depth_indices().is_none());
    assert_eq!(domain.active_element_count(), 1);

    let err = domain
        .reset(
            vec![formation(&map, "Only", 2, &[]), formation(&map, "Extra", 1, &[])],
            &map,
        )
        .unwrap_err();
    assert_eq!(
        err,
        MeshError::FormationMismatch {
            expected: "Only".to_string(),
            found: "Only, Extra".to_string(),
        }
    );
}
