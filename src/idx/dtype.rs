use std::fmt;

use serde::Serialize;

use super::error::DecodeError;

// ---------------------------------------------------------------------------
// ElementKind – the scalar type stored in an IDX payload
// ---------------------------------------------------------------------------

/// The six element types an IDX header can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Unsigned8,
    Signed8,
    Short16,
    Int32,
    Float32,
    Double64,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Unsigned8 => "unsigned8",
            ElementKind::Signed8 => "signed8",
            ElementKind::Short16 => "short16",
            ElementKind::Int32 => "int32",
            ElementKind::Float32 => "float32",
            ElementKind::Double64 => "double64",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// DataType – tag + kind + byte width
// ---------------------------------------------------------------------------

/// Element type of an IDX file as declared by the third magic byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DataType {
    /// Raw tag byte from the header.
    pub tag: u8,
    pub kind: ElementKind,
    /// Size of one element in bytes.
    pub width: u8,
}

impl DataType {
    pub const UNSIGNED8: DataType = DataType::new(0x08, ElementKind::Unsigned8, 1);
    pub const SIGNED8: DataType = DataType::new(0x09, ElementKind::Signed8, 1);
    pub const SHORT16: DataType = DataType::new(0x0B, ElementKind::Short16, 2);
    pub const INT32: DataType = DataType::new(0x0C, ElementKind::Int32, 4);
    pub const FLOAT32: DataType = DataType::new(0x0D, ElementKind::Float32, 4);
    pub const DOUBLE64: DataType = DataType::new(0x0E, ElementKind::Double64, 8);

    const fn new(tag: u8, kind: ElementKind, width: u8) -> Self {
        DataType { tag, kind, width }
    }

    /// Element width as a `u64`, for offset arithmetic.
    pub fn width_bytes(&self) -> u64 {
        u64::from(self.width)
    }

    /// Whether the element is an integer type.
    pub fn is_integer(&self) -> bool {
        !matches!(self.kind, ElementKind::Float32 | ElementKind::Double64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x}, {} bytes)", self.kind, self.tag, self.width)
    }
}

/// Map a header tag byte to its [`DataType`].
pub fn decode_type_tag(tag: u8) -> Result<DataType, DecodeError> {
    match tag {
        0x08 => Ok(DataType::UNSIGNED8),
        0x09 => Ok(DataType::SIGNED8),
        0x0B => Ok(DataType::SHORT16),
        0x0C => Ok(DataType::INT32),
        0x0D => Ok(DataType::FLOAT32),
        0x0E => Ok(DataType::DOUBLE64),
        other => Err(DecodeError::UnknownDataType { tag: other }),
    }
}
