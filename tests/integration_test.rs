//! Integration tests: index arithmetic, dispatch policies, tuned dispatch.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use octotune::{
    BlockShape, CellExecutor, CellIndex, ExecPolicy, OctotuneError, OctreeMesh,
    CHUNK_CANDIDATES,
};

fn reference_sums(shape: BlockShape, octants: u32) -> Vec<i32> {
    let total = shape.cells_per_block() * octants;
    (0..total)
        .map(|flat| {
            let c = CellIndex::decompose(flat, shape);
            (c.i + c.j + c.k) as i32
        })
        .collect()
}

#[test]
fn index_roundtrip_over_full_mesh() {
    let shape = BlockShape::new(4, 3, 2);
    let octants = 5;
    let total = shape.cells_per_block() * octants;
    for flat in 0..total {
        let c = CellIndex::decompose(flat, shape);
        assert!(c.i < shape.bx && c.j < shape.by && c.k < shape.bz);
        assert!(c.octant.0 < octants);
        assert_eq!(c.flat_index(), flat, "roundtrip failed at {flat}");
    }
}

#[test]
fn policies_agree_on_cell_sums() {
    let shape = BlockShape::new(8, 4, 2);
    let octants = 6;
    let exec = CellExecutor::new(OctreeMesh::with_octants(octants));
    let expected = reference_sums(shape, octants);

    for policy in ExecPolicy::ALL {
        let mut out = vec![0i32; expected.len()];
        exec.fill_cells("agree", shape, policy, 16, &mut out, |c| {
            (c.i + c.j + c.k) as i32
        })
        .unwrap();
        assert_eq!(out, expected, "policy {} diverged", policy.name());
    }
}

#[test]
fn zero_dimension_shape_rejected() {
    let exec = CellExecutor::new(OctreeMesh::with_octants(2));
    let mut out = vec![0i32; 0];
    let err = exec
        .fill_cells(
            "bad",
            BlockShape::new(0, 4, 4),
            ExecPolicy::Flat,
            8,
            &mut out,
            |_| 0,
        )
        .unwrap_err();
    assert!(matches!(err, OctotuneError::InvalidShape { .. }));
}

#[test]
fn output_length_checked() {
    let exec = CellExecutor::new(OctreeMesh::with_octants(2));
    let mut out = vec![0i32; 7];
    let err = exec
        .fill_cells(
            "short",
            BlockShape::new(2, 2, 2),
            ExecPolicy::Flat,
            8,
            &mut out,
            |_| 0,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        OctotuneError::OutputLenMismatch {
            expected: 16,
            actual: 7
        }
    ));
}

#[test]
fn foreach_visits_every_cell_exactly_once() {
    let shape = BlockShape::new(4, 4, 4);
    let octants = 3;
    let exec = CellExecutor::new(OctreeMesh::with_octants(octants));
    let total = (shape.cells_per_block() * octants) as usize;

    let count = AtomicU32::new(0);
    let seen: Vec<AtomicBool> = (0..total).map(|_| AtomicBool::new(false)).collect();
    exec.foreach_cell("visit", shape, |c| {
        count.fetch_add(1, Ordering::Relaxed);
        let was = seen[c.flat_index() as usize].swap(true, Ordering::Relaxed);
        assert!(!was, "cell {} visited twice", c.flat_index());
    })
    .unwrap();
    assert_eq!(count.load(Ordering::Relaxed), total as u32);
}

#[test]
fn tuned_chunk_dispatch_stays_correct_while_searching() {
    let shape = BlockShape::new(8, 8, 4);
    let octants = 4;
    let exec = CellExecutor::new(OctreeMesh::with_octants(octants));
    let expected = reference_sums(shape, octants);
    let mut out = vec![0i32; expected.len()];

    for _ in 0..20 {
        let chunk = exec
            .fill_cells_tuned_chunk("test.chunk_correct", shape, &mut out, |c| {
                (c.i + c.j + c.k) as i32
            })
            .unwrap();
        assert!(CHUNK_CANDIDATES.contains(&(chunk as i64)));
        assert_eq!(out, expected);
    }
}

#[test]
fn tuned_policy_dispatch_stays_correct_while_searching() {
    let shape = BlockShape::new(8, 8, 4);
    let octants = 4;
    let exec = CellExecutor::new(OctreeMesh::with_octants(octants));
    let expected = reference_sums(shape, octants);
    let mut out = vec![0i32; expected.len()];

    for _ in 0..20 {
        let policy = exec
            .fill_cells_tuned_policy("test.policy_correct", shape, &mut out, |c| {
                (c.i + c.j + c.k) as i32
            })
            .unwrap();
        assert!(ExecPolicy::ALL.contains(&policy));
        assert_eq!(out, expected);
    }
}

#[test]
fn mesh_size_overflow_rejected() {
    let mesh = OctreeMesh::with_octants(u32::MAX);
    let err = mesh.total_cells(BlockShape::cube(1024)).unwrap_err();
    assert!(matches!(err, OctotuneError::MeshTooLarge { .. }));
}
