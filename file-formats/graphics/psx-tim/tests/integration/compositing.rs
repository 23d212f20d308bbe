use crate::fixtures::{build_tim, clut_entry};
use pretty_assertions::assert_eq;
use psx_tim::{TimTexture, VramAtlas};

#[test]
fn texture_lands_at_declared_placement() {
    let mut entries = [0u16; 16];
    entries[1] = clut_entry(31, 0, 0);
    // fb_x is in 16-bit units, so unit 8 is atlas pixel 32.
    let data = build_tim(&entries, &[1, 1, 1, 1], 1, 1, 8, 100);

    let tim = TimTexture::parse(&data).unwrap();
    let mut atlas = VramAtlas::new();
    atlas.composite(&tim).unwrap();

    assert_eq!(atlas.image().get_pixel(32, 100).0, [255, 0, 0, 255]);
    assert_eq!(atlas.image().get_pixel(35, 100).0, [255, 0, 0, 255]);
    // Surroundings stay transparent.
    assert_eq!(atlas.image().get_pixel(31, 100).0, [0, 0, 0, 0]);
    assert_eq!(atlas.image().get_pixel(36, 100).0, [0, 0, 0, 0]);
    assert_eq!(atlas.image().get_pixel(32, 101).0, [0, 0, 0, 0]);
}

#[test]
fn later_composites_blend_over_earlier_ones() {
    let mut first = [0u16; 16];
    first[1] = clut_entry(31, 0, 0);
    let mut second = [0u16; 16];
    second[1] = clut_entry(0, 31, 0);

    let red = TimTexture::parse(&build_tim(&first, &[1, 1, 1, 1], 1, 1, 0, 0)).unwrap();
    // The green texture's transparent pixels must not clear the red ones.
    let green = TimTexture::parse(&build_tim(&second, &[1, 1, 0, 0], 1, 1, 0, 0)).unwrap();

    let mut atlas = VramAtlas::new();
    atlas.composite(&red).unwrap();
    atlas.composite(&green).unwrap();

    assert_eq!(atlas.image().get_pixel(0, 0).0, [0, 255, 0, 255]);
    assert_eq!(atlas.image().get_pixel(1, 0).0, [0, 255, 0, 255]);
    assert_eq!(atlas.image().get_pixel(2, 0).0, [255, 0, 0, 255]);
    assert_eq!(atlas.image().get_pixel(3, 0).0, [255, 0, 0, 255]);
}

#[test]
fn placement_outside_the_atlas_is_rejected() {
    let entries = [0u16; 16];
    // fb_y 512 is one row past the bottom of the 512-row atlas.
    let data = build_tim(&entries, &[0, 0, 0, 0], 1, 1, 0, 512);

    let tim = TimTexture::parse(&data).unwrap();
    let mut atlas = VramAtlas::new();
    assert!(atlas.composite(&tim).is_err());
}

#[test]
fn compositing_does_not_mutate_the_texture() {
    let mut entries = [0u16; 16];
    entries[1] = clut_entry(10, 20, 30);
    let data = build_tim(&entries, &[1, 0, 1, 0], 1, 1, 0, 0);

    let tim = TimTexture::parse(&data).unwrap();
    let before = tim.decode_rgba(0).unwrap();

    let mut atlas = VramAtlas::new();
    atlas.composite(&tim).unwrap();
    atlas.composite(&tim).unwrap();

    assert_eq!(tim.decode_rgba(0).unwrap(), before);
}
