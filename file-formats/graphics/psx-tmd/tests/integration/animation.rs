//! Displacement animation tests: VDF keys driven by DAT timelines

use pretty_assertions::assert_eq;
use psx_tmd::{DatFile, MeshPose, TmdModel, TmdVertex, VdfFile};

use crate::fixtures::{build_dat, build_tmd, build_vdf, flat_triangle};

fn triangle_model() -> TmdModel {
    let data = build_tmd(
        &[[0, 0, 0], [100, 0, 0], [0, 100, 0]],
        &[0x1000, 0, 0],
        &[flat_triangle([255, 255, 255], 0, [0, 1, 2])],
    );
    TmdModel::parse(&data).unwrap()
}

#[test]
fn apply_frame_poses_at_the_interpolated_weight() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[(0, 1, vec![[40, -40, 0], [0, 0, 8]])])).unwrap();
    // Weight ramps 0.0 -> 1.0 over two frames.
    let dat = DatFile::parse(&build_dat(&[vec![0, 4096]])).unwrap();
    let mut pose = MeshPose::new(&model);

    pose.apply_frame(&vdf, &dat, 0.5).unwrap();
    assert_eq!(
        pose.vertices(0).unwrap(),
        &[
            TmdVertex { x: 0, y: 0, z: 0 },
            TmdVertex { x: 120, y: -20, z: 0 },
            TmdVertex { x: 0, y: 100, z: 4 },
        ]
    );
}

#[test]
fn apply_frame_resets_before_posing() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[(0, 0, vec![[10, 0, 0]])])).unwrap();
    let dat = DatFile::parse(&build_dat(&[vec![4096, 4096]])).unwrap();
    let mut pose = MeshPose::new(&model);

    // Posing the same frame twice must not accumulate.
    pose.apply_frame(&vdf, &dat, 0.0).unwrap();
    pose.apply_frame(&vdf, &dat, 0.0).unwrap();
    assert_eq!(pose.vertices(0).unwrap()[0], TmdVertex { x: 10, y: 0, z: 0 });
}

#[test]
fn apply_key_accumulates_until_reset() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[(0, 0, vec![[10, 0, 0]])])).unwrap();
    let mut pose = MeshPose::new(&model);

    pose.apply_key(&vdf, 0, 1.0).unwrap();
    pose.apply_key(&vdf, 0, 1.0).unwrap();
    assert_eq!(pose.vertices(0).unwrap()[0], TmdVertex { x: 20, y: 0, z: 0 });

    pose.reset();
    assert_eq!(pose.vertices(0).unwrap()[0], TmdVertex { x: 0, y: 0, z: 0 });
}

#[test]
fn expired_channel_leaves_the_rest_mesh() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[(0, 0, vec![[10, 10, 10]])])).unwrap();
    let dat = DatFile::parse(&build_dat(&[vec![4096, 4096]])).unwrap();
    let mut pose = MeshPose::new(&model);

    pose.apply_frame(&vdf, &dat, 0.0).unwrap();
    assert_ne!(pose.vertices(0).unwrap()[0], TmdVertex::default());

    // Frame 2 is past the two-sample timeline; the pose falls back to rest.
    pose.apply_frame(&vdf, &dat, 2.0).unwrap();
    assert_eq!(pose.vertices(0).unwrap()[0], TmdVertex::default());
}

#[test]
fn key_and_channel_counts_may_differ() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[
        (0, 0, vec![[10, 0, 0]]),
        (0, 1, vec![[0, 10, 0]]),
    ]))
    .unwrap();
    // Only the first key has a timeline.
    let dat = DatFile::parse(&build_dat(&[vec![4096]])).unwrap();
    let mut pose = MeshPose::new(&model);

    pose.apply_frame(&vdf, &dat, 0.0).unwrap();
    assert_eq!(pose.vertices(0).unwrap()[0], TmdVertex { x: 10, y: 0, z: 0 });
    assert_eq!(pose.vertices(0).unwrap()[1], TmdVertex { x: 100, y: 0, z: 0 });
}

#[test]
fn bad_key_is_skipped_without_losing_its_siblings() {
    let model = triangle_model();
    // Key 0 runs over vertices 2..4 of a 3-vertex object; key 1 is fine.
    let vdf = VdfFile::parse(&build_vdf(&[
        (0, 2, vec![[1, 1, 1], [2, 2, 2]]),
        (0, 0, vec![[10, 0, 0]]),
    ]))
    .unwrap();
    let dat = DatFile::parse(&build_dat(&[vec![4096], vec![4096]])).unwrap();
    let mut pose = MeshPose::new(&model);

    pose.apply_frame(&vdf, &dat, 0.0).unwrap();
    assert_eq!(pose.vertices(0).unwrap()[0], TmdVertex { x: 10, y: 0, z: 0 });
    // The out-of-range key left its target run untouched.
    assert_eq!(pose.vertices(0).unwrap()[2], TmdVertex { x: 0, y: 100, z: 0 });
}

#[test]
fn posed_vertices_flow_through_primitive_decoding() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[(0, 0, vec![[0, 0, 50]])])).unwrap();
    let mut pose = MeshPose::new(&model);
    pose.apply_key(&vdf, 0, 1.0).unwrap();

    let object = model.object(0).unwrap();
    let primitives = object
        .work_primitives_with(pose.vertices(0).unwrap())
        .unwrap();
    assert_eq!(primitives[0].vertices[0], [0, 0, 50]);

    // The model itself is untouched.
    assert_eq!(object.work_primitives().unwrap()[0].vertices[0], [0, 0, 0]);
}

#[test]
fn key_targeting_a_missing_object_is_an_error() {
    let model = triangle_model();
    let vdf = VdfFile::parse(&build_vdf(&[(7, 0, vec![[1, 1, 1]])])).unwrap();
    let mut pose = MeshPose::new(&model);

    assert!(matches!(
        pose.apply_key(&vdf, 0, 1.0),
        Err(psx_tmd::TmdError::ObjectOutOfRange { index: 7, count: 1 })
    ));
}
