//! Attribute value types and material classification.

use std::fmt;

use crate::util::{Error, Result};

/// Type of a value stored in a [`MaterialAttribute`](super::MaterialAttribute).
///
/// Discriminants start at 1 so a zeroed record byte is recognizably
/// empty. Every type except [`String`](Self::String) has a fixed
/// in-record size reported by [`size()`](Self::size).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AttributeType {
    /// Boolean (stored as one byte: 0 = false, non-zero = true)
    Bool = 1,
    /// 32-bit floating point
    Float,
    /// Angle in degrees, 32-bit floating point
    Deg,
    /// Angle in radians, 32-bit floating point
    Rad,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 64-bit integer
    UInt64,
    /// Signed 64-bit integer
    Int64,
    /// Two-component float vector
    Vector2,
    /// Two-component unsigned integer vector
    Vector2ui,
    /// Two-component signed integer vector
    Vector2i,
    /// Three-component float vector
    Vector3,
    /// Three-component unsigned integer vector
    Vector3ui,
    /// Three-component signed integer vector
    Vector3i,
    /// Four-component float vector
    Vector4,
    /// Four-component unsigned integer vector
    Vector4ui,
    /// Four-component signed integer vector
    Vector4i,
    /// 2x2 float matrix, column-major
    Matrix2x2,
    /// 2 columns of 3 rows, column-major
    Matrix2x3,
    /// 2 columns of 4 rows, column-major
    Matrix2x4,
    /// 3 columns of 2 rows, column-major
    Matrix3x2,
    /// 3x3 float matrix, column-major
    Matrix3x3,
    /// 3 columns of 4 rows, column-major
    Matrix3x4,
    /// 4 columns of 2 rows, column-major
    Matrix4x2,
    /// 4 columns of 3 rows, column-major
    Matrix4x3,
    /// Pointer to immutable data, stored as the platform pointer width
    Pointer,
    /// Pointer to mutable data, stored as the platform pointer width
    MutablePointer,
    /// Length-prefixed, NUL-terminated byte string; no fixed size
    String,
}

impl AttributeType {
    /// In-record byte size of a value of this type.
    ///
    /// Fails with [`Error::UnknownStringSize`] for
    /// [`String`](Self::String); string sizes are only known per
    /// value.
    pub fn size(self) -> Result<usize> {
        Ok(match self {
            Self::Bool => 1,
            Self::Float | Self::Deg | Self::Rad | Self::UInt32 | Self::Int32 => 4,
            Self::UInt64 | Self::Int64 => 8,
            Self::Vector2 | Self::Vector2ui | Self::Vector2i => 8,
            Self::Vector3 | Self::Vector3ui | Self::Vector3i => 12,
            Self::Vector4 | Self::Vector4ui | Self::Vector4i => 16,
            Self::Matrix2x2 => 16,
            Self::Matrix2x3 | Self::Matrix3x2 => 24,
            Self::Matrix2x4 | Self::Matrix4x2 => 32,
            Self::Matrix3x3 => 36,
            Self::Matrix3x4 | Self::Matrix4x3 => 48,
            Self::Pointer | Self::MutablePointer => std::mem::size_of::<usize>(),
            Self::String => {
                return Err(Error::UnknownStringSize {
                    op: "AttributeType::size()",
                })
            }
        })
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Float => "Float",
            Self::Deg => "Deg",
            Self::Rad => "Rad",
            Self::UInt32 => "UInt32",
            Self::Int32 => "Int32",
            Self::UInt64 => "UInt64",
            Self::Int64 => "Int64",
            Self::Vector2 => "Vector2",
            Self::Vector2ui => "Vector2ui",
            Self::Vector2i => "Vector2i",
            Self::Vector3 => "Vector3",
            Self::Vector3ui => "Vector3ui",
            Self::Vector3i => "Vector3i",
            Self::Vector4 => "Vector4",
            Self::Vector4ui => "Vector4ui",
            Self::Vector4i => "Vector4i",
            Self::Matrix2x2 => "Matrix2x2",
            Self::Matrix2x3 => "Matrix2x3",
            Self::Matrix2x4 => "Matrix2x4",
            Self::Matrix3x2 => "Matrix3x2",
            Self::Matrix3x3 => "Matrix3x3",
            Self::Matrix3x4 => "Matrix3x4",
            Self::Matrix4x2 => "Matrix4x2",
            Self::Matrix4x3 => "Matrix4x3",
            Self::Pointer => "Pointer",
            Self::MutablePointer => "MutablePointer",
            Self::String => "String",
        }
    }

    /// Convert from a raw tag byte.
    pub const fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            1 => Self::Bool,
            2 => Self::Float,
            3 => Self::Deg,
            4 => Self::Rad,
            5 => Self::UInt32,
            6 => Self::Int32,
            7 => Self::UInt64,
            8 => Self::Int64,
            9 => Self::Vector2,
            10 => Self::Vector2ui,
            11 => Self::Vector2i,
            12 => Self::Vector3,
            13 => Self::Vector3ui,
            14 => Self::Vector3i,
            15 => Self::Vector4,
            16 => Self::Vector4ui,
            17 => Self::Vector4i,
            18 => Self::Matrix2x2,
            19 => Self::Matrix2x3,
            20 => Self::Matrix2x4,
            21 => Self::Matrix3x2,
            22 => Self::Matrix3x3,
            23 => Self::Matrix3x4,
            24 => Self::Matrix4x2,
            25 => Self::Matrix4x3,
            26 => Self::Pointer,
            27 => Self::MutablePointer,
            28 => Self::String,
            _ => return None,
        })
    }
}

impl fmt::Debug for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeType::{}", self.name())
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Classification of a material, one bit per known lighting model.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MaterialType {
    /// Flat (unlit) shading
    Flat = 1 << 0,
    /// Phong shading
    Phong = 1 << 1,
    /// PBR metallic/roughness workflow
    PbrMetallicRoughness = 1 << 2,
    /// PBR specular/glossiness workflow
    PbrSpecularGlossiness = 1 << 3,
}

impl MaterialType {
    const ALL: [Self; 4] = [
        Self::Flat,
        Self::Phong,
        Self::PbrMetallicRoughness,
        Self::PbrSpecularGlossiness,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::Phong => "Phong",
            Self::PbrMetallicRoughness => "PbrMetallicRoughness",
            Self::PbrSpecularGlossiness => "PbrSpecularGlossiness",
        }
    }
}

impl fmt::Debug for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterialType::{}", self.name())
    }
}

/// Set of [`MaterialType`] bits classifying a material.
///
/// May carry bits outside the known set (e.g. importer extensions);
/// those print in the numeric `MaterialType(0xNN)` form.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MaterialTypes(u32);

impl MaterialTypes {
    /// No classification at all.
    pub const NONE: Self = Self(0);

    /// Create from raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit representation.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, ty: MaterialType) -> bool {
        self.0 & ty as u32 != 0
    }

    #[inline]
    #[must_use]
    pub const fn with(self, ty: MaterialType) -> Self {
        Self(self.0 | ty as u32)
    }
}

impl From<MaterialType> for MaterialTypes {
    #[inline]
    fn from(ty: MaterialType) -> Self {
        Self(ty as u32)
    }
}

impl std::ops::BitOr for MaterialType {
    type Output = MaterialTypes;

    #[inline]
    fn bitor(self, rhs: Self) -> MaterialTypes {
        MaterialTypes(self as u32 | rhs as u32)
    }
}

impl std::ops::BitOr<MaterialType> for MaterialTypes {
    type Output = MaterialTypes;

    #[inline]
    fn bitor(self, rhs: MaterialType) -> MaterialTypes {
        MaterialTypes(self.0 | rhs as u32)
    }
}

impl std::ops::BitOrAssign<MaterialType> for MaterialTypes {
    #[inline]
    fn bitor_assign(&mut self, rhs: MaterialType) {
        self.0 |= rhs as u32;
    }
}

impl fmt::Debug for MaterialTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "MaterialTypes{{}}");
        }
        let mut remaining = self.0;
        let mut first = true;
        for ty in MaterialType::ALL {
            if remaining & ty as u32 != 0 {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{:?}", ty)?;
                remaining &= !(ty as u32);
                first = false;
            }
        }
        if remaining != 0 {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "MaterialType(0x{:x})", remaining)?;
        }
        Ok(())
    }
}

/// How a material handles the alpha channel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// Alpha ignored, everything is rendered opaque
    Opaque,
    /// Alpha-tested against a mask threshold
    Mask,
    /// Alpha-blended
    Blend,
}

impl AlphaMode {
    const fn name(self) -> &'static str {
        match self {
            Self::Opaque => "Opaque",
            Self::Mask => "Mask",
            Self::Blend => "Blend",
        }
    }
}

impl fmt::Debug for AlphaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlphaMode::{}", self.name())
    }
}
