//! Phong material view over a [`MaterialData`].

use super::{AlphaMode, AttributeName, MaterialData, MaterialType};
use crate::util::{Color4, Error, Mat3, Result, Vec4};

/// Base material layer all Phong conventions read from.
const BASE: usize = 0;

/// Interprets a [`MaterialData`] as a Phong material.
///
/// A stateless view: it stores nothing, every accessor reads the
/// underlying attributes and falls back to well-defined defaults when
/// an attribute is absent. Texture ids are the exception: asking for
/// a texture that isn't there is an error, as is asking for a
/// per-texture property (matrix, coordinate set) of a missing
/// texture.
pub struct PhongMaterial<'m, 'a> {
    data: &'m MaterialData<'a>,
}

impl<'m, 'a> PhongMaterial<'m, 'a> {
    /// Wrap a material classified as Phong.
    ///
    /// Returns `None` when [`types()`](MaterialData::types) doesn't
    /// contain [`MaterialType::Phong`].
    pub fn new(data: &'m MaterialData<'a>) -> Option<Self> {
        data.types()
            .contains(MaterialType::Phong)
            .then_some(Self { data })
    }

    /// Wrap without checking the classification. The conventions
    /// still apply, they just might not describe the material well.
    pub const fn new_unchecked(data: &'m MaterialData<'a>) -> Self {
        Self { data }
    }

    /// The underlying store.
    #[inline]
    pub const fn data(&self) -> &'m MaterialData<'a> {
        self.data
    }

    /// Whether the material renders both faces. Defaults to false.
    pub fn double_sided(&self) -> Result<bool> {
        self.data
            .attribute_or(BASE, AttributeName::DoubleSided, false)
    }

    /// How the alpha channel is interpreted: `AlphaBlend` wins,
    /// a present `AlphaMask` means masking, anything else is opaque.
    pub fn alpha_mode(&self) -> Result<AlphaMode> {
        if self.data.attribute_or(BASE, AttributeName::AlphaBlend, false)? {
            return Ok(AlphaMode::Blend);
        }
        if self.data.has_attribute(BASE, AttributeName::AlphaMask)? {
            return Ok(AlphaMode::Mask);
        }
        Ok(AlphaMode::Opaque)
    }

    /// Alpha mask threshold. Defaults to 0.0.
    pub fn alpha_mask(&self) -> Result<f32> {
        self.data.attribute_or(BASE, AttributeName::AlphaMask, 0.0)
    }

    /// Ambient color. Defaults to black.
    pub fn ambient_color(&self) -> Result<Color4> {
        self.data.attribute_or(
            BASE,
            AttributeName::AmbientColor,
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Diffuse color. Defaults to white.
    pub fn diffuse_color(&self) -> Result<Color4> {
        self.data
            .attribute_or(BASE, AttributeName::DiffuseColor, Vec4::ONE)
    }

    /// Specular color. Defaults to white.
    pub fn specular_color(&self) -> Result<Color4> {
        self.data
            .attribute_or(BASE, AttributeName::SpecularColor, Vec4::ONE)
    }

    /// Shininess exponent. Defaults to 80.
    pub fn shininess(&self) -> Result<f32> {
        self.data.attribute_or(BASE, AttributeName::Shininess, 80.0)
    }

    /// Ambient texture id; the attribute has to be present.
    pub fn ambient_texture(&self) -> Result<u32> {
        self.data.attribute(BASE, AttributeName::AmbientTexture)
    }

    /// Diffuse texture id; the attribute has to be present.
    pub fn diffuse_texture(&self) -> Result<u32> {
        self.data.attribute(BASE, AttributeName::DiffuseTexture)
    }

    /// Specular texture id; the attribute has to be present.
    pub fn specular_texture(&self) -> Result<u32> {
        self.data.attribute(BASE, AttributeName::SpecularTexture)
    }

    /// Normal map texture id; the attribute has to be present.
    pub fn normal_texture(&self) -> Result<u32> {
        self.data.attribute(BASE, AttributeName::NormalTexture)
    }

    /// Coordinate transformation applied to the ambient texture:
    /// the per-texture matrix if present, else the global
    /// [`TextureMatrix`](AttributeName::TextureMatrix), else identity.
    pub fn ambient_texture_matrix(&self) -> Result<Mat3> {
        self.texture_matrix_for(
            "PhongMaterial::ambient_texture_matrix()",
            AttributeName::AmbientTexture,
            AttributeName::AmbientTextureMatrix,
        )
    }

    /// Coordinate transformation applied to the diffuse texture.
    pub fn diffuse_texture_matrix(&self) -> Result<Mat3> {
        self.texture_matrix_for(
            "PhongMaterial::diffuse_texture_matrix()",
            AttributeName::DiffuseTexture,
            AttributeName::DiffuseTextureMatrix,
        )
    }

    /// Coordinate transformation applied to the specular texture.
    pub fn specular_texture_matrix(&self) -> Result<Mat3> {
        self.texture_matrix_for(
            "PhongMaterial::specular_texture_matrix()",
            AttributeName::SpecularTexture,
            AttributeName::SpecularTextureMatrix,
        )
    }

    /// Coordinate transformation applied to the normal map texture.
    pub fn normal_texture_matrix(&self) -> Result<Mat3> {
        self.texture_matrix_for(
            "PhongMaterial::normal_texture_matrix()",
            AttributeName::NormalTexture,
            AttributeName::NormalTextureMatrix,
        )
    }

    /// Coordinate set used by the ambient texture: the per-texture
    /// set if present, else the global
    /// [`CoordinateSet`](AttributeName::CoordinateSet), else 0.
    pub fn ambient_coordinate_set(&self) -> Result<u32> {
        self.coordinate_set_for(
            "PhongMaterial::ambient_coordinate_set()",
            AttributeName::AmbientTexture,
            AttributeName::AmbientCoordinateSet,
        )
    }

    /// Coordinate set used by the diffuse texture.
    pub fn diffuse_coordinate_set(&self) -> Result<u32> {
        self.coordinate_set_for(
            "PhongMaterial::diffuse_coordinate_set()",
            AttributeName::DiffuseTexture,
            AttributeName::DiffuseCoordinateSet,
        )
    }

    /// Coordinate set used by the specular texture.
    pub fn specular_coordinate_set(&self) -> Result<u32> {
        self.coordinate_set_for(
            "PhongMaterial::specular_coordinate_set()",
            AttributeName::SpecularTexture,
            AttributeName::SpecularCoordinateSet,
        )
    }

    /// Coordinate set used by the normal map texture.
    pub fn normal_coordinate_set(&self) -> Result<u32> {
        self.coordinate_set_for(
            "PhongMaterial::normal_coordinate_set()",
            AttributeName::NormalTexture,
            AttributeName::NormalCoordinateSet,
        )
    }

    /// Global texture coordinate transformation. Defaults to
    /// identity.
    pub fn texture_matrix(&self) -> Result<Mat3> {
        self.data
            .attribute_or(BASE, AttributeName::TextureMatrix, Mat3::IDENTITY)
    }

    /// Global texture coordinate set. Defaults to 0.
    pub fn coordinate_set(&self) -> Result<u32> {
        self.data.attribute_or(BASE, AttributeName::CoordinateSet, 0)
    }

    /// Whether any texture coordinate transformation is specified,
    /// per-texture or global.
    pub fn has_texture_transformation(&self) -> Result<bool> {
        for name in [
            AttributeName::AmbientTextureMatrix,
            AttributeName::DiffuseTextureMatrix,
            AttributeName::SpecularTextureMatrix,
            AttributeName::NormalTextureMatrix,
            AttributeName::TextureMatrix,
        ] {
            if self.data.has_attribute(BASE, name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether any texture uses a coordinate set other than 0,
    /// per-texture or global.
    pub fn has_texture_coordinate_sets(&self) -> Result<bool> {
        for name in [
            AttributeName::AmbientCoordinateSet,
            AttributeName::DiffuseCoordinateSet,
            AttributeName::SpecularCoordinateSet,
            AttributeName::NormalCoordinateSet,
            AttributeName::CoordinateSet,
        ] {
            if self.data.attribute_or(BASE, name, 0u32)? != 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn texture_matrix_for(
        &self,
        op: &'static str,
        texture: AttributeName,
        matrix: AttributeName,
    ) -> Result<Mat3> {
        if !self.data.has_attribute(BASE, texture)? {
            return Err(Error::MissingTexture {
                op,
                texture: texture.string(),
            });
        }
        match self.data.try_attribute(BASE, matrix)? {
            Some(matrix) => Ok(matrix),
            None => self.texture_matrix(),
        }
    }

    fn coordinate_set_for(
        &self,
        op: &'static str,
        texture: AttributeName,
        set: AttributeName,
    ) -> Result<u32> {
        if !self.data.has_attribute(BASE, texture)? {
            return Err(Error::MissingTexture {
                op,
                texture: texture.string(),
            });
        }
        match self.data.try_attribute(BASE, set)? {
            Some(set) => Ok(set),
            None => self.coordinate_set(),
        }
    }
}
