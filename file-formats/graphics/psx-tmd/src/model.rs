//! TMD file structure: header, object table and per-object arrays.
//!
//! A TMD file holds an ordered sequence of objects. Each object descriptor
//! points at three arrays relative to the end of the 12-byte file header:
//! packed 16-bit vertex positions, packed fixed-point normals and a
//! variable-stride primitive table. Object order is index order and is
//! significant: displacement keys address objects by position.

use glam::Vec3;
use log::debug;
use psx_data::fixed::normal_to_f32;
use psx_data::{ByteRead, Cursor};

use crate::error::{Result, TmdError};
use crate::primitive::{WorkPrimitive, decode_table};

/// Magic word every TMD file starts with
pub const TMD_MAGIC: u32 = 0x0000_0041;

const FILE_HEADER_SIZE: usize = 12;
const OBJECT_DESCRIPTOR_SIZE: usize = 28;
const VERTEX_SIZE: usize = 8;
const NORMAL_SIZE: usize = 8;
const PRIMITIVE_HEADER_SIZE: usize = 4;

/// A model vertex position: signed 16-bit XYZ, unscaled.
///
/// Positions stay integral through decoding; the per-object power-of-two
/// [`TmdObject::scale`] is applied by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TmdVertex {
    /// X component
    pub x: i16,
    /// Y component
    pub y: i16,
    /// Z component
    pub z: i16,
}

impl TmdVertex {
    /// The three components as an array
    pub fn to_array(self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

/// A packed fixed-point normal, three sign-magnitude 4.12 components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TmdNormal {
    /// Packed X component
    pub x: u16,
    /// Packed Y component
    pub y: u16,
    /// Packed Z component
    pub z: u16,
}

impl TmdNormal {
    /// Convert to floating point through the fixed-point formula
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(
            normal_to_f32(self.x),
            normal_to_f32(self.y),
            normal_to_f32(self.z),
        )
    }
}

/// One named region of the model: vertices, normals and a primitive table
#[derive(Debug, Clone)]
pub struct TmdObject {
    vertices: Vec<TmdVertex>,
    normals: Vec<TmdNormal>,
    primitive_data: Vec<u8>,
    primitive_count: u32,
    scale_exp: i32,
}

impl TmdObject {
    /// The object's pristine vertex positions
    pub fn vertices(&self) -> &[TmdVertex] {
        &self.vertices
    }

    /// The object's packed normals
    pub fn normals(&self) -> &[TmdNormal] {
        &self.normals
    }

    /// Number of entries in the primitive table
    pub fn primitive_count(&self) -> u32 {
        self.primitive_count
    }

    /// The object's scale factor, `2^exponent` from the signed header field
    pub fn scale(&self) -> f32 {
        2.0_f32.powi(self.scale_exp)
    }

    /// Decode the primitive table against the object's own vertices.
    ///
    /// Primitives are re-decoded on every call; nothing is cached, so the
    /// same unmutated object always yields the same sequence.
    pub fn work_primitives(&self) -> Result<Vec<WorkPrimitive>> {
        self.work_primitives_with(&self.vertices)
    }

    /// Decode the primitive table against a caller-supplied vertex buffer.
    ///
    /// This is how animated poses are rendered: the working copy of the
    /// vertex buffer is displaced elsewhere and then substituted here,
    /// while normals and primitive layout still come from the object.
    pub fn work_primitives_with(&self, vertices: &[TmdVertex]) -> Result<Vec<WorkPrimitive>> {
        decode_table(
            &self.primitive_data,
            self.primitive_count,
            vertices,
            &self.normals,
        )
    }
}

/// A parsed TMD model file
#[derive(Debug, Clone)]
pub struct TmdModel {
    /// The `processed` word from the file header, carried but unused
    pub processed: u32,
    objects: Vec<TmdObject>,
}

impl TmdModel {
    /// Parse a TMD file from a byte buffer.
    ///
    /// The magic word is validated, every object descriptor is read and
    /// each object's arrays are sliced out with bounds checks. The
    /// primitive table is walked once to measure its exact byte span
    /// (records declare their own stride), so a truncated table fails
    /// here rather than during decoding.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(input);

        let id = cursor.read_u32_le()?;
        if id != TMD_MAGIC {
            return Err(TmdError::WrongMagic {
                expected: TMD_MAGIC,
                actual: id,
            });
        }
        let processed = cursor.read_u32_le()?;
        let object_count = cursor.read_u32_le()? as usize;

        let mut descriptors = Vec::with_capacity(object_count);
        for _ in 0..object_count {
            descriptors.push(ObjectDescriptor {
                vertices_offset: cursor.read_u32_le()?,
                vertex_count: cursor.read_u32_le()?,
                normals_offset: cursor.read_u32_le()?,
                normal_count: cursor.read_u32_le()?,
                primitives_offset: cursor.read_u32_le()?,
                primitive_count: cursor.read_u32_le()?,
                scale_exp: cursor.read_i32_le()?,
            });
        }
        debug_assert_eq!(
            cursor.position(),
            FILE_HEADER_SIZE + object_count * OBJECT_DESCRIPTOR_SIZE
        );

        let mut objects = Vec::with_capacity(object_count);
        for (index, descriptor) in descriptors.iter().enumerate() {
            objects.push(parse_object(input, index, descriptor)?);
        }

        debug!("parsed TMD model with {object_count} objects");
        Ok(Self { processed, objects })
    }

    /// Load and parse a TMD file from the filesystem
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let input = std::fs::read(path)?;
        Self::parse(&input)
    }

    /// Number of objects in the model
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// All objects, in file (= index) order
    pub fn objects(&self) -> &[TmdObject] {
        &self.objects
    }

    /// One object by index
    pub fn object(&self, index: usize) -> Result<&TmdObject> {
        self.objects.get(index).ok_or(TmdError::ObjectOutOfRange {
            index,
            count: self.objects.len(),
        })
    }
}

struct ObjectDescriptor {
    vertices_offset: u32,
    vertex_count: u32,
    normals_offset: u32,
    normal_count: u32,
    primitives_offset: u32,
    primitive_count: u32,
    scale_exp: i32,
}

fn check_section(
    input: &[u8],
    object: usize,
    section: &'static str,
    offset: usize,
    bytes: usize,
) -> Result<()> {
    if offset + bytes > input.len() {
        return Err(TmdError::SectionOutOfBounds {
            object,
            section,
            offset,
            bytes,
            len: input.len(),
        });
    }
    Ok(())
}

fn parse_object(input: &[u8], index: usize, descriptor: &ObjectDescriptor) -> Result<TmdObject> {
    // All three offsets are relative to the end of the file header.
    let vertices_start = FILE_HEADER_SIZE + descriptor.vertices_offset as usize;
    let vertex_count = descriptor.vertex_count as usize;
    check_section(
        input,
        index,
        "vertex array",
        vertices_start,
        vertex_count * VERTEX_SIZE,
    )?;

    let mut cursor = Cursor::new(input);
    cursor.seek_to(vertices_start)?;
    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        vertices.push(TmdVertex {
            x: cursor.read_i16_le()?,
            y: cursor.read_i16_le()?,
            z: cursor.read_i16_le()?,
        });
        cursor.skip(2)?; // padding
    }

    let normals_start = FILE_HEADER_SIZE + descriptor.normals_offset as usize;
    let normal_count = descriptor.normal_count as usize;
    check_section(
        input,
        index,
        "normal array",
        normals_start,
        normal_count * NORMAL_SIZE,
    )?;

    cursor.seek_to(normals_start)?;
    let mut normals = Vec::with_capacity(normal_count);
    for _ in 0..normal_count {
        normals.push(TmdNormal {
            x: cursor.read_u16_le()?,
            y: cursor.read_u16_le()?,
            z: cursor.read_u16_le()?,
        });
        cursor.skip(2)?; // padding
    }

    let primitives_start = FILE_HEADER_SIZE + descriptor.primitives_offset as usize;
    check_section(input, index, "primitive table", primitives_start, 0)?;

    // Records are variable-stride (header + declared input length), so the
    // table's byte span has to be measured by walking it.
    cursor.seek_to(primitives_start)?;
    for _ in 0..descriptor.primitive_count {
        cursor.skip(1)?; // output length
        let ilen = cursor.read_u8()?;
        cursor.skip(2)?; // flag, mode
        cursor.skip(usize::from(ilen) * 4)?;
    }
    let primitive_data = input[primitives_start..cursor.position()].to_vec();
    debug_assert!(primitive_data.len() >= descriptor.primitive_count as usize * PRIMITIVE_HEADER_SIZE);

    Ok(TmdObject {
        vertices,
        normals,
        primitive_data,
        primitive_count: descriptor.primitive_count,
        scale_exp: descriptor.scale_exp,
    })
}
