//! Packed material attribute records.

use bytemuck::{Pod, Zeroable};
use std::fmt;

use super::{AttributeName, AttributeType};
use crate::util::{
    Deg, Error, IVec2, IVec3, IVec4, Mat2, Mat2x3, Mat2x4, Mat3, Mat3x2, Mat3x4, Mat4x2, Mat4x3,
    Rad, Result, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4,
};

/// Bytes available for name, terminator and value in one record.
const PAYLOAD: usize = 62;

/// Operation label used by all construction errors.
const OP_CONSTRUCT: &str = "MaterialAttribute";

/// A value that can live inline in a [`MaterialAttribute`].
///
/// Implementations exist for every fixed-size [`AttributeType`];
/// strings go through [`MaterialAttribute::string()`] and
/// [`MaterialAttribute::value_string()`] instead since their size is
/// per-value. Raw pointers map to
/// [`Pointer`](AttributeType::Pointer) /
/// [`MutablePointer`](AttributeType::MutablePointer) regardless of
/// the pointee type; only the address is stored.
pub trait AttributeValue: Copy {
    /// The attribute type tag values of this type are stored under.
    const TYPE: AttributeType;

    /// Write the value into `out`, which is exactly
    /// `TYPE.size()` bytes and has no alignment guarantee.
    fn write_to(self, out: &mut [u8]);

    /// Read a value back from `bytes` of exactly `TYPE.size()` bytes.
    fn read_from(bytes: &[u8]) -> Self;
}

macro_rules! impl_pod_value {
    ($($ty:ty => $tag:ident),+ $(,)?) => {$(
        impl AttributeValue for $ty {
            const TYPE: AttributeType = AttributeType::$tag;

            #[inline]
            fn write_to(self, out: &mut [u8]) {
                out.copy_from_slice(bytemuck::bytes_of(&self));
            }

            #[inline]
            fn read_from(bytes: &[u8]) -> Self {
                bytemuck::pod_read_unaligned(bytes)
            }
        }
    )+};
}

impl_pod_value! {
    f32 => Float,
    Deg => Deg,
    Rad => Rad,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
    Vec2 => Vector2,
    UVec2 => Vector2ui,
    IVec2 => Vector2i,
    Vec3 => Vector3,
    UVec3 => Vector3ui,
    IVec3 => Vector3i,
    Vec4 => Vector4,
    UVec4 => Vector4ui,
    IVec4 => Vector4i,
    Mat2 => Matrix2x2,
    Mat2x3 => Matrix2x3,
    Mat2x4 => Matrix2x4,
    Mat3x2 => Matrix3x2,
    Mat3 => Matrix3x3,
    Mat3x4 => Matrix3x4,
    Mat4x2 => Matrix4x2,
    Mat4x3 => Matrix4x3,
}

impl AttributeValue for bool {
    const TYPE: AttributeType = AttributeType::Bool;

    #[inline]
    fn write_to(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    #[inline]
    fn read_from(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl<T> AttributeValue for *const T {
    const TYPE: AttributeType = AttributeType::Pointer;

    #[inline]
    fn write_to(self, out: &mut [u8]) {
        out.copy_from_slice(&(self as usize).to_ne_bytes());
    }

    #[inline]
    fn read_from(bytes: &[u8]) -> Self {
        let mut raw = [0u8; std::mem::size_of::<usize>()];
        raw.copy_from_slice(bytes);
        usize::from_ne_bytes(raw) as *const T
    }
}

impl<T> AttributeValue for *mut T {
    const TYPE: AttributeType = AttributeType::MutablePointer;

    #[inline]
    fn write_to(self, out: &mut [u8]) {
        out.copy_from_slice(&(self as usize).to_ne_bytes());
    }

    #[inline]
    fn read_from(bytes: &[u8]) -> Self {
        let mut raw = [0u8; std::mem::size_of::<usize>()];
        raw.copy_from_slice(bytes);
        usize::from_ne_bytes(raw) as *mut T
    }
}

/// One material attribute: name, type and inline value in a single
/// 64-byte block.
///
/// Layout: one type tag byte, one name length byte, then the payload
/// holding the name, its NUL terminator and the value bytes. String
/// values additionally carry a one-byte length prefix and their own
/// NUL terminator, so interior NULs round-trip. Records are
/// copy-cheap and cache-friendly by construction; a
/// [`MaterialData`](super::MaterialData) stores them contiguously.
///
/// A default-constructed record is empty (zero name, zero type) and
/// only useful as a placeholder; storing it in a store is an error.
#[derive(Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct MaterialAttribute {
    kind: u8,
    name_len: u8,
    payload: [u8; PAYLOAD],
}

const _: () = assert!(std::mem::size_of::<MaterialAttribute>() == 64);

impl MaterialAttribute {
    /// Build from a well-known name and a typed value.
    ///
    /// The canonical string for `name` is stored; the value type must
    /// match the type the name requires.
    pub fn new<T: AttributeValue>(name: AttributeName, value: T) -> Result<Self> {
        let required = name.ty();
        if T::TYPE != required {
            return Err(Error::TypeMismatch {
                op: OP_CONSTRUCT,
                name: name.string().into(),
                expected: required,
                got: Some(T::TYPE),
            });
        }
        Self::pack_fixed(name.string(), value)
    }

    /// Build from a custom name and a typed value.
    ///
    /// The name is stored verbatim and must be non-empty, free of NUL
    /// bytes and must not use the reserved `$` prefix.
    pub fn with_name<T: AttributeValue>(name: &str, value: T) -> Result<Self> {
        validate_name(name)?;
        Self::pack_fixed(name, value)
    }

    /// Build a string-valued attribute with a custom name.
    ///
    /// The value may contain interior NUL bytes; the stored view is
    /// NUL-terminated one byte past its length.
    pub fn string(name: &str, value: &str) -> Result<Self> {
        validate_name(name)?;
        Self::pack_string(name, value)
    }

    /// Build a string-valued attribute from a well-known name
    /// (e.g. [`AttributeName::LayerName`]).
    pub fn named_string(name: AttributeName, value: &str) -> Result<Self> {
        let required = name.ty();
        if required != AttributeType::String {
            return Err(Error::TypeMismatch {
                op: OP_CONSTRUCT,
                name: name.string().into(),
                expected: required,
                got: Some(AttributeType::String),
            });
        }
        Self::pack_string(name.string(), value)
    }

    /// Type-erased construction from raw value bytes.
    ///
    /// For fixed-size types `value` must be exactly `ty.size()`
    /// bytes. For [`AttributeType::String`] it is the raw string
    /// bytes themselves and must be valid UTF-8.
    pub fn from_raw(name: &str, ty: AttributeType, value: &[u8]) -> Result<Self> {
        validate_name(name)?;
        Self::pack_raw(name, ty, value)
    }

    /// Type-erased construction from a well-known name and raw value
    /// bytes; `ty` must match the type the name requires.
    pub fn from_raw_named(name: AttributeName, ty: AttributeType, value: &[u8]) -> Result<Self> {
        let required = name.ty();
        if ty != required {
            return Err(Error::TypeMismatch {
                op: OP_CONSTRUCT,
                name: name.string().into(),
                expected: required,
                got: Some(ty),
            });
        }
        Self::pack_raw(name.string(), ty, value)
    }

    fn pack_fixed<T: AttributeValue>(name: &str, value: T) -> Result<Self> {
        let size = T::TYPE.size()?;
        let mut record = Self::reserve(name, T::TYPE, size)?;
        let offset = name.len() + 1;
        value.write_to(&mut record.payload[offset..offset + size]);
        Ok(record)
    }

    fn pack_raw(name: &str, ty: AttributeType, value: &[u8]) -> Result<Self> {
        if ty == AttributeType::String {
            let value = std::str::from_utf8(value)
                .map_err(|_| Error::InvalidString { op: OP_CONSTRUCT })?;
            return Self::pack_string(name, value);
        }
        let size = ty.size()?;
        if value.len() != size {
            return Err(Error::TypeMismatch {
                op: OP_CONSTRUCT,
                name: name.into(),
                expected: ty,
                got: None,
            });
        }
        let mut record = Self::reserve(name, ty, size)?;
        let offset = name.len() + 1;
        record.payload[offset..offset + size].copy_from_slice(value);
        Ok(record)
    }

    /// Lay out tag, name and terminator, leaving `size` zeroed value
    /// bytes for the caller to fill.
    fn reserve(name: &str, ty: AttributeType, size: usize) -> Result<Self> {
        // name + NUL + value
        let needed = name.len() + 1 + size;
        if needed > PAYLOAD {
            return Err(Error::RecordTooLarge {
                op: OP_CONSTRUCT,
                name: name.into(),
                ty,
                len: needed,
                max: PAYLOAD,
            });
        }
        let mut payload = [0u8; PAYLOAD];
        payload[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self {
            kind: ty as u8,
            name_len: name.len() as u8,
            payload,
        })
    }

    fn pack_string(name: &str, value: &str) -> Result<Self> {
        // name + NUL + length prefix + value + NUL
        let needed = name.len() + 1 + 1 + value.len() + 1;
        if needed > PAYLOAD {
            return Err(Error::RecordTooLarge {
                op: OP_CONSTRUCT,
                name: name.into(),
                ty: AttributeType::String,
                len: needed,
                max: PAYLOAD,
            });
        }
        let mut payload = [0u8; PAYLOAD];
        payload[..name.len()].copy_from_slice(name.as_bytes());
        let offset = name.len() + 1;
        payload[offset] = value.len() as u8;
        payload[offset + 1..offset + 1 + value.len()].copy_from_slice(value.as_bytes());
        Ok(Self {
            kind: AttributeType::String as u8,
            name_len: name.len() as u8,
            payload,
        })
    }

    /// True for the default-constructed record.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.kind == 0
    }

    /// Attribute name; NUL-terminated inside the record. Empty for
    /// the default-constructed record.
    #[inline]
    pub fn name(&self) -> &str {
        std::str::from_utf8(&self.payload[..self.name_len as usize]).unwrap_or("")
    }

    /// Attribute type, `None` for the default-constructed record.
    #[inline]
    pub const fn ty(&self) -> Option<AttributeType> {
        AttributeType::from_u8(self.kind)
    }

    /// Typed value access.
    ///
    /// The stored type must match `T` exactly, except that pointer
    /// records can be read as any pointer type of the same
    /// mutability. String values can't be read this way, use
    /// [`value_string()`](Self::value_string).
    pub fn value<T: AttributeValue>(&self) -> Result<T> {
        const OP: &str = "MaterialAttribute::value()";
        let ty = self.known_type(OP)?;
        if ty != T::TYPE || ty == AttributeType::String {
            return Err(Error::TypeMismatch {
                op: OP,
                name: self.name().into(),
                expected: ty,
                got: Some(T::TYPE),
            });
        }
        let offset = self.name_len as usize + 1;
        let size = ty.size()?;
        Ok(T::read_from(&self.payload[offset..offset + size]))
    }

    /// String value access, including interior NUL bytes.
    pub fn value_string(&self) -> Result<&str> {
        const OP: &str = "MaterialAttribute::value_string()";
        let ty = self.known_type(OP)?;
        if ty != AttributeType::String {
            return Err(Error::TypeMismatch {
                op: OP,
                name: self.name().into(),
                expected: ty,
                got: Some(AttributeType::String),
            });
        }
        let offset = self.name_len as usize + 1;
        let len = self.payload[offset] as usize;
        std::str::from_utf8(&self.payload[offset + 1..offset + 1 + len])
            .map_err(|_| Error::InvalidString { op: OP })
    }

    /// Type-erased view of the value bytes.
    ///
    /// For strings this is the string contents without the length
    /// prefix or terminator.
    pub fn value_bytes(&self) -> Result<&[u8]> {
        const OP: &str = "MaterialAttribute::value_bytes()";
        let ty = self.known_type(OP)?;
        let offset = self.name_len as usize + 1;
        if ty == AttributeType::String {
            let len = self.payload[offset] as usize;
            return Ok(&self.payload[offset + 1..offset + 1 + len]);
        }
        let size = ty.size()?;
        Ok(&self.payload[offset..offset + size])
    }

    /// The whole 64-byte block.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    fn known_type(&self, op: &'static str) -> Result<AttributeType> {
        self.ty().ok_or(Error::InvalidType { op, tag: self.kind })
    }
}

impl Default for MaterialAttribute {
    /// An empty record: zero name, zero type.
    fn default() -> Self {
        Self {
            kind: 0,
            name_len: 0,
            payload: [0; PAYLOAD],
        }
    }
}

impl fmt::Debug for MaterialAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty() {
            Some(ty) => write!(f, "MaterialAttribute({:?}, {:?})", self.name(), ty),
            None => write!(f, "MaterialAttribute{{}}"),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('$') || name.contains('\0') {
        return Err(Error::InvalidName {
            op: OP_CONSTRUCT,
            name: name.into(),
        });
    }
    Ok(())
}
