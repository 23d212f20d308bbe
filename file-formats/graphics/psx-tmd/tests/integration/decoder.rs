//! Full-pipeline decoding tests over synthetic TMD images

use glam::Vec3;
use pretty_assertions::assert_eq;
use psx_tmd::{PrimitiveFlags, TmdModel};

use crate::fixtures::{
    build_tmd, flat_line, flat_triangle, gouraud_triangle, nonlit_triangle, textured_triangle,
};

const QUAD: [[i16; 3]; 4] = [[0, 0, 0], [100, 0, 0], [0, 100, 0], [100, 100, 0]];

// 1.0 on each axis in turn, packed sign-magnitude 4.12
const AXES: [u16; 9] = [
    0x1000, 0, 0, //
    0, 0x1000, 0, //
    0, 0, 0x1000,
];

#[test]
fn flat_triangle_resolves_positions_and_colour() {
    let data = build_tmd(&QUAD, &AXES, &[flat_triangle([200, 100, 50], 0, [0, 1, 2])]);
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    assert_eq!(primitives.len(), 1);
    let prim = &primitives[0];
    assert!(prim.is_ok());
    assert!(prim.flags.contains(PrimitiveFlags::FLAT));
    assert!(!prim.is_line());
    assert_eq!(prim.colors, [[200, 100, 50]; 3]);
    assert_eq!(prim.vertices, [[0, 0, 0], [100, 0, 0], [0, 100, 0]]);
    assert_eq!(prim.normals, [Vec3::ZERO; 3]);
}

#[test]
fn gouraud_triangle_resolves_per_vertex_normals() {
    let data = build_tmd(
        &QUAD,
        &AXES,
        &[gouraud_triangle([255, 255, 255], [(0, 0), (1, 1), (2, 2)])],
    );
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    let prim = &primitives[0];
    assert!(prim.is_ok());
    assert!(prim.flags.contains(PrimitiveFlags::GOURAUD));
    assert_eq!(prim.normals, [Vec3::X, Vec3::Y, Vec3::Z]);
}

#[test]
fn line_duplicates_its_second_vertex() {
    for flag in [0u8, 1] {
        let data = build_tmd(&QUAD, &AXES, &[flat_line(flag, [10, 20, 30], [1, 3])]);
        let model = TmdModel::parse(&data).unwrap();
        let primitives = model.object(0).unwrap().work_primitives().unwrap();

        let prim = &primitives[0];
        assert!(prim.is_ok());
        assert!(prim.is_line());
        assert_eq!(prim.vertices, [[100, 0, 0], [100, 100, 0], [100, 100, 0]]);
    }
}

#[test]
fn nonlit_triangle_has_no_normals() {
    let data = build_tmd(&QUAD, &AXES, &[nonlit_triangle([1, 2, 3], [3, 2, 1])]);
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    let prim = &primitives[0];
    assert!(prim.is_ok());
    assert!(prim.flags.contains(PrimitiveFlags::NONLIT));
    assert_eq!(prim.vertices, [[100, 100, 0], [0, 100, 0], [100, 0, 0]]);
    assert_eq!(prim.normals, [Vec3::ZERO; 3]);
}

#[test]
fn textured_triangle_remaps_uvs_into_the_atlas() {
    // Page 17: second row of the atlas, one page in.
    let tsb = 17u16 | (2 << 5) | (1 << 7);
    let data = build_tmd(
        &QUAD,
        &AXES,
        &[textured_triangle(
            [128, 128, 128],
            [[0, 0], [255, 0], [0, 255]],
            tsb,
            [0, 1, 2],
        )],
    );
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    let prim = &primitives[0];
    assert!(prim.is_ok());
    assert!(prim.is_textured());
    assert_eq!(prim.uvs, [[256, 256], [511, 256], [256, 511]]);
    assert_eq!(prim.texture_page(), 17);
    assert_eq!(prim.semitransparency_rate(), 2);
    assert_eq!(prim.color_mode(), 1);
}

#[test]
fn unknown_variant_is_skipped_but_keeps_its_slot() {
    let data = build_tmd(
        &QUAD,
        &AXES,
        &[
            flat_triangle([1, 1, 1], 0, [0, 1, 2]),
            (3, 0x7E, vec![0; 8]), // no such layout
            nonlit_triangle([2, 2, 2], [1, 2, 3]),
        ],
    );
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    assert_eq!(primitives.len(), 3);
    assert!(primitives[0].is_ok());
    assert!(!primitives[1].is_ok());
    assert!(primitives[2].is_ok());
}

#[test]
fn out_of_range_vertex_index_invalidates_only_that_primitive() {
    let data = build_tmd(
        &QUAD,
        &AXES,
        &[
            flat_triangle([1, 1, 1], 0, [0, 1, 99]),
            flat_triangle([2, 2, 2], 0, [0, 1, 2]),
        ],
    );
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    assert!(!primitives[0].is_ok());
    assert_eq!(primitives[0].vertices, [[0, 0, 0]; 3]);
    assert!(primitives[1].is_ok());
}

#[test]
fn undersized_record_body_invalidates_only_that_primitive() {
    // A flat triangle whose record declares one word of payload.
    let data = build_tmd(
        &QUAD,
        &AXES,
        &[(0, 0x20, vec![9, 9, 9, 9]), flat_triangle([5, 5, 5], 0, [0, 1, 2])],
    );
    let model = TmdModel::parse(&data).unwrap();
    let primitives = model.object(0).unwrap().work_primitives().unwrap();

    assert!(!primitives[0].is_ok());
    assert!(primitives[1].is_ok());
}

#[test]
fn decoding_is_deterministic() {
    let data = build_tmd(
        &QUAD,
        &AXES,
        &[
            gouraud_triangle([9, 8, 7], [(0, 0), (1, 1), (2, 2)]),
            flat_line(1, [1, 2, 3], [0, 3]),
        ],
    );
    let model = TmdModel::parse(&data).unwrap();
    let object = model.object(0).unwrap();

    let first = object.work_primitives().unwrap();
    let second = object.work_primitives().unwrap();
    assert_eq!(first, second);
}
