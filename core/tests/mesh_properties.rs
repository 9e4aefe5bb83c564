//! Property tests for mesh compilation and mutation.
//!
//! Every compilation property runs through both entry points, grouped
//! per-layer data and parallel per-feature arrays, which must agree.

mod common;

use rstest::rstest;

use common::{
    compile, fan, init_logging, uniform_mesh, CompilePath, TileVertex, COLOR_OFFSET, STRIDE,
};
use tilemesh_core::mesh::{
    BufferUsage, DirtyRange, DirtyTracker, DrawGroup, GeometryBatch, TypedMesh, VertexAttributeSemantic,
    VertexRange, MAX_INDEX_VALUE,
};

/// Check the group bound and conservation properties of a compiled mesh.
fn assert_groups_consistent(mesh: &TypedMesh<TileVertex>) {
    let groups = mesh.draw_groups();
    assert!(!groups.is_empty());

    let mut first_index = 0;
    for group in groups {
        assert!(
            group.vertex_count <= MAX_INDEX_VALUE,
            "group {:?} exceeds the index space",
            group
        );
        let group_indices = &mesh.indices()[first_index..first_index + group.index_count];
        assert!(group_indices
            .iter()
            .all(|&index| usize::from(index) < group.vertex_count));
        first_index += group.index_count;
    }

    let index_total: usize = groups.iter().map(|g| g.index_count).sum();
    let vertex_total: usize = groups.iter().map(|g| g.vertex_count).sum();
    assert_eq!(index_total, mesh.index_count());
    assert_eq!(vertex_total, mesh.vertex_count());
}

// ============================================================================
// Compilation
// ============================================================================

#[rstest]
#[case::grouped(CompilePath::Grouped)]
#[case::parallel(CompilePath::Parallel)]
fn test_empty_input_yields_one_empty_group(#[case] path: CompilePath) {
    init_logging();
    let mesh = compile(path, Vec::new());

    assert!(mesh.is_compiled());
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.index_count(), 0);
    assert_eq!(mesh.draw_groups(), &[DrawGroup::new(0, 0)]);
    assert_eq!(mesh.draw_calls().count(), 0);
}

#[rstest]
#[case::grouped_small(CompilePath::Grouped, vec![3, 4, 5, 100])]
#[case::parallel_small(CompilePath::Parallel, vec![3, 4, 5, 100])]
#[case::grouped_many(CompilePath::Grouped, vec![3000; 40])]
#[case::parallel_many(CompilePath::Parallel, vec![3000; 40])]
#[case::grouped_mixed(CompilePath::Grouped, vec![60000, 10000, 3, 65536, 1, 40000])]
#[case::parallel_mixed(CompilePath::Parallel, vec![60000, 10000, 3, 65536, 1, 40000])]
fn test_groups_bounded_and_conserving(#[case] path: CompilePath, #[case] sizes: Vec<usize>) {
    init_logging();
    let layer = sizes.iter().map(|&n| fan(n)).collect();
    let mesh = compile(path, vec![layer]);

    assert_eq!(mesh.vertex_count(), sizes.iter().sum::<usize>());
    assert_groups_consistent(&mesh);
}

#[rstest]
#[case::grouped(CompilePath::Grouped)]
#[case::parallel(CompilePath::Parallel)]
fn test_overflow_splits_into_groups(#[case] path: CompilePath) {
    init_logging();
    // 70,000 vertices in 70 features of 1,000
    let layer = (0..70).map(|_| fan(1000)).collect();
    let mesh = compile(path, vec![layer]);

    let groups = mesh.draw_groups();
    assert_eq!(mesh.vertex_count(), 70_000);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].vertex_count, 65_000);
    assert_eq!(groups[1].vertex_count, 5_000);

    // The second group's indices restart at zero
    let second = &mesh.indices()[groups[0].index_count..];
    assert_eq!(&second[..3], &[0, 1, 2]);
    assert_eq!(second.iter().max(), Some(&4_999));
    assert_groups_consistent(&mesh);

    let calls: Vec<_> = mesh.draw_calls().collect();
    assert_eq!(calls[1].first_index, groups[0].index_count);
    assert_eq!(calls[1].base_vertex, 65_000);
}

#[rstest]
#[case::grouped(CompilePath::Grouped)]
#[case::parallel(CompilePath::Parallel)]
fn test_oversized_batch_gets_its_own_group(#[case] path: CompilePath) {
    init_logging();
    let vertices = (0..70_000).map(|i| TileVertex::new(i as f32, 0.0)).collect();
    let indices = (0..=u16::MAX).collect::<Vec<u16>>();
    let mesh = compile(path, vec![vec![GeometryBatch::new(vertices, indices.clone())]]);

    let groups = mesh.draw_groups();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].is_empty());
    assert_eq!(groups[1], DrawGroup::new(indices.len(), 70_000));
    assert_eq!(mesh.indices(), &indices[..]);
}

#[test]
fn test_groups_continue_across_layers() {
    init_logging();
    let layers = vec![vec![fan(40_000)], vec![fan(20_000)], vec![fan(10_000)]];
    let mesh = compile(CompilePath::Grouped, layers);

    assert_eq!(
        mesh.draw_groups()
            .iter()
            .map(|g| g.vertex_count)
            .collect::<Vec<_>>(),
        vec![60_000, 10_000]
    );
    assert_groups_consistent(&mesh);
}

#[test]
fn test_both_paths_agree() {
    init_logging();
    let layers = || {
        vec![
            vec![fan(30_000), fan(3), fan(20_000)],
            vec![fan(16_000), fan(7)],
            vec![fan(50_000)],
        ]
    };
    let grouped = compile(CompilePath::Grouped, layers());
    let parallel = compile(CompilePath::Parallel, layers());

    assert_eq!(grouped.draw_groups(), parallel.draw_groups());
    assert_eq!(grouped.indices(), parallel.indices());
    assert_eq!(grouped.vertex_bytes(), parallel.vertex_bytes());
}

#[test]
fn test_unindexed_geometry_still_bounded() {
    init_logging();
    let points = (0..3)
        .map(|_| GeometryBatch::unindexed(vec![TileVertex::new(0.0, 0.0); 30_000]))
        .collect();
    let mesh = compile(CompilePath::Parallel, vec![points]);

    assert!(!mesh.is_indexed());
    assert_eq!(
        mesh.draw_groups(),
        &[DrawGroup::new(0, 60_000), DrawGroup::new(0, 30_000)]
    );
    assert_groups_consistent(&mesh);
}

#[test]
fn test_compiled_mesh_moves_to_render_thread() {
    init_logging();
    let worker = std::thread::spawn(|| compile(CompilePath::Grouped, vec![vec![fan(10)]]));
    let mut mesh = worker.join().expect("worker panicked");

    mesh.update_attribute(VertexRange::new(0, 10), 1.0f32, 24);
    assert!(mesh.vertices().iter().all(|v| v.layer == 1.0));
}

// ============================================================================
// Mutation
// ============================================================================

#[rstest]
#[case::middle(2, 5)]
#[case::head(0, 1)]
#[case::tail(15, 5)]
#[case::all(0, 20)]
fn test_update_vertices_writes_exactly_the_range(#[case] start: usize, #[case] length: usize) {
    init_logging();
    let v0 = TileVertex::new(0.0, 0.0);
    let v1 = TileVertex::new(5.0, 7.0);
    let mut mesh = uniform_mesh(20, v0);

    mesh.update_vertices(VertexRange::new(start, length), v1);

    for (i, vertex) in mesh.vertices().iter().enumerate() {
        let expected = if (start..start + length).contains(&i) { v1 } else { v0 };
        assert_eq!(*vertex, expected, "vertex {}", i);
    }
    assert_eq!(
        mesh.dirty_range(),
        Some(DirtyRange::new(start * STRIDE, length * STRIDE))
    );
}

#[test]
fn test_update_vertices_past_end_is_rejected() {
    init_logging();
    let mut mesh = uniform_mesh(10, TileVertex::new(0.0, 0.0));
    mesh.update_vertices(VertexRange::new(0, 1), TileVertex::new(1.0, 1.0));
    let before = mesh.vertex_bytes().to_vec();
    let dirty = mesh.dirty_range();

    mesh.update_vertices(VertexRange::new(8, 3), TileVertex::new(9.0, 9.0));

    assert_eq!(mesh.vertex_bytes(), &before[..]);
    assert_eq!(mesh.dirty_range(), dirty);
}

#[test]
fn test_update_attribute_isolates_field() {
    init_logging();
    let mut mesh = uniform_mesh(12, TileVertex::new(3.0, 4.0));
    let before = mesh.vertex_bytes().to_vec();
    let range = VertexRange::new(4, 5);

    mesh.update_attribute(range, [9u8, 8, 7, 6], COLOR_OFFSET);

    let after = mesh.vertex_bytes();
    for (byte, (old, new)) in before.iter().zip(after).enumerate() {
        let vertex = byte / STRIDE;
        let within = byte % STRIDE;
        let written = (4..9).contains(&vertex) && (COLOR_OFFSET..COLOR_OFFSET + 4).contains(&within);
        if written {
            assert_eq!(*new, [9u8, 8, 7, 6][within - COLOR_OFFSET]);
        } else {
            assert_eq!(old, new, "byte {} changed", byte);
        }
    }

    let dirty = mesh.dirty_range().unwrap();
    assert_eq!(dirty.offset, 4 * STRIDE + COLOR_OFFSET);
    assert_eq!(dirty.end(), 8 * STRIDE + COLOR_OFFSET + 4);
}

#[test]
fn test_semantic_attribute_update_fades_labels() {
    init_logging();
    let mut mesh = uniform_mesh(8, TileVertex::new(0.0, 0.0));
    mesh.update_attribute_for(
        VertexRange::new(0, 4),
        [255u8, 255, 255, 128],
        VertexAttributeSemantic::Color,
    );

    assert!(mesh.vertices()[..4].iter().all(|v| v.color == [255, 255, 255, 128]));
    assert!(mesh.vertices()[4..].iter().all(|v| v.color == [0, 0, 0, 255]));
}

#[test]
fn test_dirty_union_is_bounding() {
    let mut tracker = DirtyTracker::new();
    tracker.mark(10, 10);
    tracker.mark(100, 10);

    let range = tracker.range().unwrap();
    assert_eq!(range.as_range(), 10..110);
    assert_eq!(range.size, 100);
}

#[test]
fn test_flush_resets_dirty_tracking() {
    init_logging();
    let mut mesh = uniform_mesh(32, TileVertex::new(0.0, 0.0));
    mesh.update_vertices(VertexRange::new(1, 1), TileVertex::new(1.0, 0.0));
    mesh.update_vertices(VertexRange::new(30, 1), TileVertex::new(2.0, 0.0));

    let mut uploaded = Vec::new();
    let flushed = mesh.flush_dirty(&mut |offset: usize, bytes: &[u8], _usage: BufferUsage| {
        uploaded.push((offset, bytes.len()));
    });

    assert_eq!(flushed, Some(DirtyRange::new(STRIDE, 30 * STRIDE)));
    assert_eq!(uploaded, vec![(STRIDE, 30 * STRIDE)]);
    assert!(!mesh.is_dirty());

    mesh.update_vertices(VertexRange::new(5, 1), TileVertex::new(3.0, 0.0));
    assert_eq!(mesh.dirty_range(), Some(DirtyRange::new(5 * STRIDE, STRIDE)));
}
