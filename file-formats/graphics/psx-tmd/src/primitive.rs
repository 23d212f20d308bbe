//! Primitive-table decoding into normalized work primitives.
//!
//! Each table entry starts with a four-byte header `(olen, ilen, flag,
//! mode)` followed by `ilen * 4` payload bytes. The `(flag, mode)` pair
//! selects one of a dozen packed layouts; this crate decodes the pairs
//! the rest of the pipeline consumes and marks everything else invalid
//! rather than failing, so one exotic primitive never sinks an object.
//!
//! Decoded primitives are *work primitives*: resolved vertex positions,
//! resolved or zeroed normals, per-vertex colours and atlas-space UVs,
//! independent of any renderer.

use bitflags::bitflags;
use glam::Vec3;
use log::warn;
use psx_data::{ByteRead, Cursor, DataError};
use psx_tim::atlas::{page_x, page_y};

use crate::error::Result;
use crate::model::{TmdNormal, TmdVertex};

bitflags! {
    /// Attribute flags of a decoded work primitive
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrimitiveFlags: u8 {
        /// Two-vertex line rather than a triangle
        const LINE = 0x01;
        /// Flat-shaded: one colour for the whole primitive
        const FLAT = 0x02;
        /// Not affected by lighting; normals are zeroed
        const NONLIT = 0x04;
        /// Per-vertex colour gradient
        const GRADATED = 0x08;
        /// Gouraud-shaded with per-vertex normals
        const GOURAUD = 0x10;
        /// Carries UV coordinates into the texture atlas
        const TEXTURED = 0x20;
        /// Decoded successfully; the sole gate for all consumers
        const OK = 0x40;
    }
}

/// A normalized, render-agnostic decoded primitive.
///
/// Lines occupy the first two vertex slots and duplicate the second
/// vertex into the third, so every work primitive has three populated
/// positions. When [`PrimitiveFlags::OK`] is unset all other fields are
/// zero-filled and the primitive must be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkPrimitive {
    /// Attribute flags, including the `OK` validity gate
    pub flags: PrimitiveFlags,
    /// Per-vertex RGB colours (flat variants duplicate one colour)
    pub colors: [[u8; 3]; 3],
    /// Per-vertex UVs, remapped into atlas space
    pub uvs: [[u16; 2]; 3],
    /// Raw texture-page word: page in bits 0-4, semitransparency rate
    /// in bits 5-6, colour mode in bits 7-8
    pub tsb: u16,
    /// Resolved vertex positions, unscaled
    pub vertices: [[i16; 3]; 3],
    /// Resolved normals, zero for unlit and non-lit variants
    pub normals: [Vec3; 3],
}

impl WorkPrimitive {
    /// Whether the primitive decoded successfully
    pub fn is_ok(&self) -> bool {
        self.flags.contains(PrimitiveFlags::OK)
    }

    /// Whether this is a two-vertex line
    pub fn is_line(&self) -> bool {
        self.flags.contains(PrimitiveFlags::LINE)
    }

    /// Whether the primitive carries atlas UVs
    pub fn is_textured(&self) -> bool {
        self.flags.contains(PrimitiveFlags::TEXTURED)
    }

    /// Texture page index, bits 0-4 of the page word
    pub fn texture_page(&self) -> u8 {
        (self.tsb & 0x1F) as u8
    }

    /// Semitransparency rate, bits 5-6 of the page word
    pub fn semitransparency_rate(&self) -> u8 {
        ((self.tsb >> 5) & 0x3) as u8
    }

    /// Colour mode, bits 7-8 of the page word
    pub fn color_mode(&self) -> u8 {
        ((self.tsb >> 7) & 0x3) as u8
    }
}

/// Iterate only the primitives that decoded successfully
pub fn valid(primitives: &[WorkPrimitive]) -> impl Iterator<Item = &WorkPrimitive> {
    primitives.iter().filter(|p| p.is_ok())
}

/// The packed layouts this decoder understands, keyed by `(flag, mode)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrimitiveKind {
    /// `(0, 0x20)`: lit triangle, one colour, normals unused
    FlatTriangle,
    /// `(0, 0x30)`: lit triangle, one colour, per-vertex normals
    GouraudTriangle,
    /// `(0|1, 0x40)`: two-vertex line, one colour
    FlatLine,
    /// `(1, 0x21)`: unlit triangle, one colour
    NonlitTriangle,
    /// `(1, 0x25)`: unlit textured triangle with atlas UVs
    NonlitTexturedTriangle,
}

impl PrimitiveKind {
    fn classify(flag: u8, mode: u8) -> Option<Self> {
        match (flag, mode) {
            (0, 0x20) => Some(Self::FlatTriangle),
            (0, 0x30) => Some(Self::GouraudTriangle),
            (0 | 1, 0x40) => Some(Self::FlatLine),
            (1, 0x21) => Some(Self::NonlitTriangle),
            (1, 0x25) => Some(Self::NonlitTexturedTriangle),
            _ => None,
        }
    }
}

/// Why a recognized primitive still failed to decode.
///
/// These are isolated to the one table entry: the primitive is marked
/// invalid and siblings keep decoding.
enum SkipReason {
    Truncated(DataError),
    VertexIndex(u16),
    NormalIndex(u16),
}

impl From<DataError> for SkipReason {
    fn from(e: DataError) -> Self {
        Self::Truncated(e)
    }
}

type SkipResult<T> = std::result::Result<T, SkipReason>;

/// Walk a primitive table and decode every entry, preserving table order.
///
/// The table span was validated at parse time; each record is advanced
/// by its self-declared input length. Unknown `(flag, mode)` pairs and
/// per-primitive problems yield entries with `OK` unset, never errors.
pub(crate) fn decode_table(
    data: &[u8],
    count: u32,
    vertices: &[TmdVertex],
    normals: &[TmdNormal],
) -> Result<Vec<WorkPrimitive>> {
    let mut cursor = Cursor::new(data);
    let mut primitives = Vec::with_capacity(count as usize);

    for index in 0..count {
        cursor.skip(1)?; // output length, unused
        let ilen = cursor.read_u8()?;
        let flag = cursor.read_u8()?;
        let mode = cursor.read_u8()?;
        let body = cursor.take(usize::from(ilen) * 4)?;

        primitives.push(decode_one(index, flag, mode, body, vertices, normals));
    }

    Ok(primitives)
}

fn decode_one(
    index: u32,
    flag: u8,
    mode: u8,
    body: &[u8],
    vertices: &[TmdVertex],
    normals: &[TmdNormal],
) -> WorkPrimitive {
    let mut work = WorkPrimitive::default();

    // Mode bit 5 distinguishes polygons from lines, known layout or not.
    if (mode >> 5) & 1 == 0 {
        work.flags |= PrimitiveFlags::LINE;
    }

    let Some(kind) = PrimitiveKind::classify(flag, mode) else {
        return work;
    };

    let decoded = match kind {
        PrimitiveKind::FlatTriangle => decode_flat_triangle(&mut work, body, vertices),
        PrimitiveKind::GouraudTriangle => decode_gouraud_triangle(&mut work, body, vertices, normals),
        PrimitiveKind::FlatLine => decode_flat_line(&mut work, body, vertices),
        PrimitiveKind::NonlitTriangle => decode_nonlit_triangle(&mut work, body, vertices),
        PrimitiveKind::NonlitTexturedTriangle => decode_nonlit_textured(&mut work, body, vertices),
    };

    match decoded {
        Ok(()) => {
            work.flags |= PrimitiveFlags::OK;
            work
        }
        Err(reason) => {
            match reason {
                SkipReason::Truncated(e) => {
                    warn!("primitive {index}: payload shorter than its layout ({e}), skipping");
                }
                SkipReason::VertexIndex(i) => {
                    warn!(
                        "primitive {index}: vertex index {i} out of range ({} vertices), skipping",
                        vertices.len()
                    );
                }
                SkipReason::NormalIndex(i) => {
                    warn!(
                        "primitive {index}: normal index {i} out of range ({} normals), skipping",
                        normals.len()
                    );
                }
            }
            // Invalid primitives carry nothing but the line bit.
            WorkPrimitive {
                flags: work.flags & PrimitiveFlags::LINE,
                ..WorkPrimitive::default()
            }
        }
    }
}

fn resolve_vertex(vertices: &[TmdVertex], index: u16) -> SkipResult<[i16; 3]> {
    vertices
        .get(usize::from(index))
        .map(|v| v.to_array())
        .ok_or(SkipReason::VertexIndex(index))
}

fn resolve_normal(normals: &[TmdNormal], index: u16) -> SkipResult<Vec3> {
    normals
        .get(usize::from(index))
        .map(|n| n.to_vec3())
        .ok_or(SkipReason::NormalIndex(index))
}

fn read_rgb(cursor: &mut Cursor<'_>) -> SkipResult<[u8; 3]> {
    Ok([cursor.read_u8()?, cursor.read_u8()?, cursor.read_u8()?])
}

fn read_uv(cursor: &mut Cursor<'_>) -> SkipResult<[u8; 2]> {
    Ok([cursor.read_u8()?, cursor.read_u8()?])
}

/// `rgb[3], mode, normal_index, vertex_index[3]`; the single normal
/// index is present in the layout but not carried into the output.
fn decode_flat_triangle(
    work: &mut WorkPrimitive,
    body: &[u8],
    vertices: &[TmdVertex],
) -> SkipResult<()> {
    let mut cursor = Cursor::new(body);
    let rgb = read_rgb(&mut cursor)?;
    cursor.skip(1)?; // duplicate of mode
    cursor.skip(2)?; // normal index
    for slot in 0..3 {
        work.vertices[slot] = resolve_vertex(vertices, cursor.read_u16_le()?)?;
    }

    work.flags |= PrimitiveFlags::FLAT;
    work.colors = [rgb; 3];
    Ok(())
}

/// `rgb[3], mode, (normal_index, vertex_index)[3]`
fn decode_gouraud_triangle(
    work: &mut WorkPrimitive,
    body: &[u8],
    vertices: &[TmdVertex],
    normals: &[TmdNormal],
) -> SkipResult<()> {
    let mut cursor = Cursor::new(body);
    let rgb = read_rgb(&mut cursor)?;
    cursor.skip(1)?;
    for slot in 0..3 {
        work.normals[slot] = resolve_normal(normals, cursor.read_u16_le()?)?;
        work.vertices[slot] = resolve_vertex(vertices, cursor.read_u16_le()?)?;
    }

    work.flags |= PrimitiveFlags::GOURAUD;
    work.colors = [rgb; 3];
    Ok(())
}

/// `rgb[3], mode, vertex_index[2]`; the second vertex fills the third
/// slot so consumers always see three positions.
fn decode_flat_line(
    work: &mut WorkPrimitive,
    body: &[u8],
    vertices: &[TmdVertex],
) -> SkipResult<()> {
    let mut cursor = Cursor::new(body);
    let rgb = read_rgb(&mut cursor)?;
    cursor.skip(1)?;
    work.vertices[0] = resolve_vertex(vertices, cursor.read_u16_le()?)?;
    work.vertices[1] = resolve_vertex(vertices, cursor.read_u16_le()?)?;
    work.vertices[2] = work.vertices[1];

    work.flags |= PrimitiveFlags::FLAT;
    work.colors = [rgb; 3];
    Ok(())
}

/// `rgb[3], mode, vertex_index[3], pad`
fn decode_nonlit_triangle(
    work: &mut WorkPrimitive,
    body: &[u8],
    vertices: &[TmdVertex],
) -> SkipResult<()> {
    let mut cursor = Cursor::new(body);
    let rgb = read_rgb(&mut cursor)?;
    cursor.skip(1)?;
    for slot in 0..3 {
        work.vertices[slot] = resolve_vertex(vertices, cursor.read_u16_le()?)?;
    }

    work.flags |= PrimitiveFlags::NONLIT;
    work.colors = [rgb; 3];
    Ok(())
}

/// `uv0, cba, uv1, tsb, uv2, pad, rgb[3], pad, vertex_index[3], pad`.
///
/// UVs are relocated into atlas space by the page offset derived from
/// the `tsb` page index; the CLUT reference is decoded but unused.
fn decode_nonlit_textured(
    work: &mut WorkPrimitive,
    body: &[u8],
    vertices: &[TmdVertex],
) -> SkipResult<()> {
    let mut cursor = Cursor::new(body);
    let uv0 = read_uv(&mut cursor)?;
    let _cba = cursor.read_u16_le()?;
    let uv1 = read_uv(&mut cursor)?;
    let tsb = cursor.read_u16_le()?;
    let uv2 = read_uv(&mut cursor)?;
    cursor.skip(2)?;
    let rgb = read_rgb(&mut cursor)?;
    cursor.skip(1)?;
    for slot in 0..3 {
        work.vertices[slot] = resolve_vertex(vertices, cursor.read_u16_le()?)?;
    }

    let page = u32::from(tsb & 0x1F);
    let offset_x = page_x(page) as u16;
    let offset_y = page_y(page) as u16;
    for (slot, uv) in [uv0, uv1, uv2].into_iter().enumerate() {
        work.uvs[slot] = [offset_x + u16::from(uv[0]), offset_y + u16::from(uv[1])];
    }

    work.flags |= PrimitiveFlags::NONLIT | PrimitiveFlags::TEXTURED;
    work.colors = [rgb; 3];
    work.tsb = tsb;
    Ok(())
}
