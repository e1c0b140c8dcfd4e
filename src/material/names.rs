//! Well-known material attribute names.

use std::fmt;

use super::AttributeType;

/// Well-known attribute name.
///
/// Each name maps to a canonical string and a required
/// [`AttributeType`]; records built from a well-known name always
/// store the canonical string so binary search and comparisons stay
/// exact. [`LayerName`](Self::LayerName) is the only name whose
/// canonical string uses the reserved `$` prefix; user-supplied
/// names never start with `$`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeName {
    /// Name of a non-base layer, stored as the layer's first attribute
    LayerName,
    /// Whether the material is alpha-blended
    AlphaBlend,
    /// Alpha-test threshold
    AlphaMask,
    /// Whether the material renders both faces
    DoubleSided,
    /// Ambient color
    AmbientColor,
    /// Ambient texture id
    AmbientTexture,
    /// Ambient texture coordinate transformation
    AmbientTextureMatrix,
    /// Ambient texture coordinate set index
    AmbientCoordinateSet,
    /// Diffuse color
    DiffuseColor,
    /// Diffuse texture id
    DiffuseTexture,
    /// Diffuse texture coordinate transformation
    DiffuseTextureMatrix,
    /// Diffuse texture coordinate set index
    DiffuseCoordinateSet,
    /// Specular color
    SpecularColor,
    /// Specular texture id
    SpecularTexture,
    /// Specular texture coordinate transformation
    SpecularTextureMatrix,
    /// Specular texture coordinate set index
    SpecularCoordinateSet,
    /// Normal map texture id
    NormalTexture,
    /// Normal map texture coordinate transformation
    NormalTextureMatrix,
    /// Normal map texture coordinate set index
    NormalCoordinateSet,
    /// Texture coordinate transformation applied to all textures
    TextureMatrix,
    /// Texture coordinate set index used by all textures
    CoordinateSet,
    /// Phong shininess exponent
    Shininess,
}

impl AttributeName {
    /// All well-known names.
    pub const ALL: [Self; 22] = [
        Self::LayerName,
        Self::AlphaBlend,
        Self::AlphaMask,
        Self::DoubleSided,
        Self::AmbientColor,
        Self::AmbientTexture,
        Self::AmbientTextureMatrix,
        Self::AmbientCoordinateSet,
        Self::DiffuseColor,
        Self::DiffuseTexture,
        Self::DiffuseTextureMatrix,
        Self::DiffuseCoordinateSet,
        Self::SpecularColor,
        Self::SpecularTexture,
        Self::SpecularTextureMatrix,
        Self::SpecularCoordinateSet,
        Self::NormalTexture,
        Self::NormalTextureMatrix,
        Self::NormalCoordinateSet,
        Self::TextureMatrix,
        Self::CoordinateSet,
        Self::Shininess,
    ];

    /// Canonical attribute string for this name.
    pub const fn string(self) -> &'static str {
        match self {
            Self::LayerName => "$LayerName",
            Self::AlphaBlend => "AlphaBlend",
            Self::AlphaMask => "AlphaMask",
            Self::DoubleSided => "DoubleSided",
            Self::AmbientColor => "AmbientColor",
            Self::AmbientTexture => "AmbientTexture",
            Self::AmbientTextureMatrix => "AmbientTextureMatrix",
            Self::AmbientCoordinateSet => "AmbientCoordinateSet",
            Self::DiffuseColor => "DiffuseColor",
            Self::DiffuseTexture => "DiffuseTexture",
            Self::DiffuseTextureMatrix => "DiffuseTextureMatrix",
            Self::DiffuseCoordinateSet => "DiffuseCoordinateSet",
            Self::SpecularColor => "SpecularColor",
            Self::SpecularTexture => "SpecularTexture",
            Self::SpecularTextureMatrix => "SpecularTextureMatrix",
            Self::SpecularCoordinateSet => "SpecularCoordinateSet",
            Self::NormalTexture => "NormalTexture",
            Self::NormalTextureMatrix => "NormalTextureMatrix",
            Self::NormalCoordinateSet => "NormalCoordinateSet",
            Self::TextureMatrix => "TextureMatrix",
            Self::CoordinateSet => "CoordinateSet",
            Self::Shininess => "Shininess",
        }
    }

    /// The type a value stored under this name must have.
    pub const fn ty(self) -> AttributeType {
        match self {
            Self::LayerName => AttributeType::String,
            Self::AlphaBlend | Self::DoubleSided => AttributeType::Bool,
            Self::AlphaMask | Self::Shininess => AttributeType::Float,
            Self::AmbientColor | Self::DiffuseColor | Self::SpecularColor => AttributeType::Vector4,
            Self::AmbientTexture
            | Self::DiffuseTexture
            | Self::SpecularTexture
            | Self::NormalTexture => AttributeType::UInt32,
            Self::AmbientTextureMatrix
            | Self::DiffuseTextureMatrix
            | Self::SpecularTextureMatrix
            | Self::NormalTextureMatrix
            | Self::TextureMatrix => AttributeType::Matrix3x3,
            Self::AmbientCoordinateSet
            | Self::DiffuseCoordinateSet
            | Self::SpecularCoordinateSet
            | Self::NormalCoordinateSet
            | Self::CoordinateSet => AttributeType::UInt32,
        }
    }
}

impl AsRef<str> for AttributeName {
    #[inline]
    fn as_ref(&self) -> &str {
        self.string()
    }
}

impl fmt::Debug for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The canonical string matches the member name except for the
        // reserved $ prefix
        let s = self.string();
        write!(f, "AttributeName::{}", s.strip_prefix('$').unwrap_or(s))
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string())
    }
}
