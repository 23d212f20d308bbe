//! Synthetic TIM files for the integration tests

/// Build a 4-bit CLUT TIM from a 16-entry palette and a grid of palette
/// indices. `width_units` is the stored width in 16-bit units, so the
/// image is `width_units * 4` logical pixels wide and `indices` must
/// hold `width_units * 4 * height` entries in row-major order.
pub fn build_tim(
    entries: &[u16; 16],
    indices: &[u8],
    width_units: u16,
    height: u16,
    fb_x: u16,
    fb_y: u16,
) -> Vec<u8> {
    assert_eq!(indices.len(), usize::from(width_units) * 4 * usize::from(height));

    let mut data = vec![0x10, 0x00, 0, 0];
    data.extend_from_slice(&0x0000_0010u32.to_le_bytes()); // CLUT present, 4-bit mode

    data.extend_from_slice(&(12u32 + 32).to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes()); // clut fb_x
    data.extend_from_slice(&480u16.to_le_bytes()); // clut fb_y
    data.extend_from_slice(&16u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    for entry in entries {
        data.extend_from_slice(&entry.to_le_bytes());
    }

    let pixel_bytes = u32::from(width_units) * 2 * u32::from(height);
    data.extend_from_slice(&(12 + pixel_bytes).to_le_bytes());
    data.extend_from_slice(&fb_x.to_le_bytes());
    data.extend_from_slice(&fb_y.to_le_bytes());
    data.extend_from_slice(&width_units.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    for pair in indices.chunks(2) {
        data.push(pair[0] | (pair[1] << 4));
    }
    data
}

/// A 15-bit CLUT entry from raw 5-bit channels
pub fn clut_entry(r: u16, g: u16, b: u16) -> u16 {
    r | (g << 5) | (b << 10)
}
