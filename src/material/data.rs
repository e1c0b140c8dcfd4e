//! Layered material attribute store.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use super::{AttributeType, AttributeValue, MaterialAttribute, MaterialTypes};
use crate::util::{Error, Result};

/// Selects one attribute inside a layer, either by index or by name.
///
/// Implemented for `usize` (index within the layer, ordered by name),
/// for `&str` (binary search over the sorted names) and for
/// [`AttributeName`](super::AttributeName) (binary search over the
/// canonical string). This is what lets every [`MaterialData`]
/// accessor take either form.
pub trait AttributeQuery {
    /// Resolve to an index into the full attribute array.
    fn resolve(
        &self,
        op: &'static str,
        attributes: &[MaterialAttribute],
        range: Range<usize>,
        layer: usize,
    ) -> Result<usize>;
}

impl AttributeQuery for usize {
    fn resolve(
        &self,
        op: &'static str,
        _attributes: &[MaterialAttribute],
        range: Range<usize>,
        layer: usize,
    ) -> Result<usize> {
        if *self >= range.len() {
            return Err(Error::IndexOutOfRange {
                op,
                index: *self,
                count: range.len(),
                layer: Some(layer),
            });
        }
        Ok(range.start + *self)
    }
}

impl AttributeQuery for &str {
    fn resolve(
        &self,
        op: &'static str,
        attributes: &[MaterialAttribute],
        range: Range<usize>,
        layer: usize,
    ) -> Result<usize> {
        find_in_layer(attributes, range, self).ok_or_else(|| Error::AttributeNotFound {
            op,
            name: (*self).into(),
            layer,
        })
    }
}

impl AttributeQuery for super::AttributeName {
    fn resolve(
        &self,
        op: &'static str,
        attributes: &[MaterialAttribute],
        range: Range<usize>,
        layer: usize,
    ) -> Result<usize> {
        self.string().resolve(op, attributes, range, layer)
    }
}

/// Iterate `(layer index, attribute range)` pairs; an empty offset
/// table yields the single implicit layer.
fn layer_ranges(offsets: &[u32], total: usize) -> Vec<(usize, Range<usize>)> {
    if offsets.is_empty() {
        return vec![(0, 0..total)];
    }
    let mut ranges = Vec::with_capacity(offsets.len());
    let mut start = 0usize;
    for (layer, &end) in offsets.iter().enumerate() {
        ranges.push((layer, start..end as usize));
        start = end as usize;
    }
    ranges
}

/// Binary search for a name inside one sorted layer range.
fn find_in_layer(
    attributes: &[MaterialAttribute],
    range: Range<usize>,
    name: &str,
) -> Option<usize> {
    let start = range.start;
    attributes[range]
        .binary_search_by(|a| a.name().cmp(name))
        .ok()
        .map(|i| start + i)
}

/// Layered, sorted material attribute storage.
///
/// Attributes live in one flat array sorted byte-wise by name within
/// each layer, names are unique per layer and lookups by name are
/// binary searches. Layers are described by an optional offset table
/// where entry `i` is the index one past the layer's last attribute;
/// without a table there is a single implicit layer holding
/// everything. Layer 0 is the base material; a layer at index 1 or
/// higher is named by a leading [`$LayerName`](super::AttributeName::LayerName)
/// attribute.
///
/// Both buffers are either owned or borrowed, independently. Owned
/// attributes are sorted by the constructor; borrowed attributes must
/// already be sorted and unique, since a borrowed buffer can't be
/// reordered. The store itself is move-only.
pub struct MaterialData<'a> {
    types: MaterialTypes,
    attributes: Cow<'a, [MaterialAttribute]>,
    layer_offsets: Cow<'a, [u32]>,
    importer_state: Option<&'a dyn Any>,
}

impl<'a> MaterialData<'a> {
    /// Create a single-layer material.
    ///
    /// `attributes` may be a `Vec` (taken over and sorted) or a
    /// borrowed, already-sorted slice.
    pub fn new(
        types: MaterialTypes,
        attributes: impl Into<Cow<'a, [MaterialAttribute]>>,
    ) -> Result<Self> {
        Self::build(types, attributes.into(), Cow::Borrowed(&[]))
    }

    /// Create a layered material from attributes plus a layer offset
    /// table, each owned or borrowed independently.
    pub fn with_layers(
        types: MaterialTypes,
        attributes: impl Into<Cow<'a, [MaterialAttribute]>>,
        layer_offsets: impl Into<Cow<'a, [u32]>>,
    ) -> Result<Self> {
        Self::build(types, attributes.into(), layer_offsets.into())
    }

    /// Attach an opaque importer state; ownership stays with the
    /// caller.
    #[must_use]
    pub fn with_importer_state(mut self, state: &'a dyn Any) -> Self {
        self.importer_state = Some(state);
        self
    }

    fn build(
        types: MaterialTypes,
        mut attributes: Cow<'a, [MaterialAttribute]>,
        layer_offsets: Cow<'a, [u32]>,
    ) -> Result<Self> {
        let total = attributes.len();

        let mut prev = 0u32;
        for (layer, &curr) in layer_offsets.iter().enumerate() {
            if curr < prev || curr as usize > total {
                return Err(Error::InvalidLayerRange {
                    layer,
                    prev,
                    curr,
                    total,
                });
            }
            prev = curr;
        }

        for (index, attribute) in attributes.iter().enumerate() {
            if attribute.is_empty() {
                return Err(Error::EmptyRecord { index });
            }
        }

        match &mut attributes {
            Cow::Owned(owned) => {
                for (layer, range) in layer_ranges(&layer_offsets, total) {
                    owned[range.clone()].sort_by(|a, b| a.name().cmp(b.name()));
                    for pair in owned[range].windows(2) {
                        if pair[0].name() == pair[1].name() {
                            return Err(Error::DuplicateAttribute {
                                name: pair[0].name().into(),
                                layer,
                            });
                        }
                    }
                }
            }
            Cow::Borrowed(borrowed) => {
                for (layer, range) in layer_ranges(&layer_offsets, total) {
                    for pair in borrowed[range].windows(2) {
                        match pair[0].name().cmp(pair[1].name()) {
                            std::cmp::Ordering::Greater => {
                                return Err(Error::NotSorted {
                                    first: pair[0].name().into(),
                                    second: pair[1].name().into(),
                                })
                            }
                            std::cmp::Ordering::Equal => {
                                return Err(Error::DuplicateAttribute {
                                    name: pair[0].name().into(),
                                    layer,
                                })
                            }
                            std::cmp::Ordering::Less => {}
                        }
                    }
                }
            }
        }

        log::trace!(
            "MaterialData: built {:?} with {} attributes in {} layers",
            types,
            total,
            layer_offsets.len().max(1)
        );

        Ok(Self {
            types,
            attributes,
            layer_offsets,
            importer_state: None,
        })
    }

    /// Material classification bits.
    #[inline]
    pub fn types(&self) -> MaterialTypes {
        self.types
    }

    /// Opaque importer state, if any was attached.
    #[inline]
    pub fn importer_state(&self) -> Option<&'a dyn Any> {
        self.importer_state
    }

    /// Raw view of all attribute records across all layers.
    #[inline]
    pub fn attribute_data(&self) -> &[MaterialAttribute] {
        &self.attributes
    }

    /// Raw view of the layer offset table; empty when the store has
    /// the single implicit layer.
    #[inline]
    pub fn layer_data(&self) -> &[u32] {
        &self.layer_offsets
    }

    /// Number of layers, always at least 1.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layer_offsets.len().max(1)
    }

    /// Total number of attributes across all layers.
    #[inline]
    pub fn total_attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Name of a layer.
    ///
    /// Layer 0 never has a name (a `$LayerName` seeded there is
    /// ignored so the base material can't masquerade as a layer). For
    /// higher layers the name is the string value of `$LayerName` iff
    /// that is the layer's first attribute; unnamed and empty layers
    /// report `""`.
    pub fn layer_name(&self, layer: usize) -> Result<&str> {
        let range = self.layer_range("MaterialData::layer_name()", layer)?;
        if layer == 0 {
            return Ok("");
        }
        match self.explicit_layer_name(range) {
            Some(record) => record.value_string(),
            None => Ok(""),
        }
    }

    /// Whether a layer with the given name exists. Only explicitly
    /// named layers participate, so `""` never matches.
    pub fn has_layer(&self, name: &str) -> bool {
        self.find_layer(name).is_some()
    }

    /// Index of the layer with the given name.
    pub fn layer_id(&self, name: &str) -> Result<usize> {
        self.find_layer(name).ok_or_else(|| Error::LayerNotFound {
            op: "MaterialData::layer_id()",
            name: name.into(),
        })
    }

    /// Number of attributes in one layer, including its `$LayerName`.
    pub fn attribute_count(&self, layer: usize) -> Result<usize> {
        Ok(self
            .layer_range("MaterialData::attribute_count()", layer)?
            .len())
    }

    /// Whether an attribute exists in a layer.
    pub fn has_attribute(&self, layer: usize, name: impl AsRef<str>) -> Result<bool> {
        let range = self.layer_range("MaterialData::has_attribute()", layer)?;
        Ok(find_in_layer(&self.attributes, range, name.as_ref()).is_some())
    }

    /// Index of a named attribute within its layer.
    pub fn attribute_id(&self, layer: usize, name: impl AsRef<str>) -> Result<usize> {
        const OP: &str = "MaterialData::attribute_id()";
        let range = self.layer_range(OP, layer)?;
        let start = range.start;
        let absolute = name.as_ref().resolve(OP, &self.attributes, range, layer)?;
        Ok(absolute - start)
    }

    /// Name of an attribute, selected by index or name.
    pub fn attribute_name(&self, layer: usize, query: impl AttributeQuery) -> Result<&str> {
        const OP: &str = "MaterialData::attribute_name()";
        let range = self.layer_range(OP, layer)?;
        let absolute = query.resolve(OP, &self.attributes, range, layer)?;
        Ok(self.attributes[absolute].name())
    }

    /// Type of an attribute, selected by index or name.
    pub fn attribute_type(&self, layer: usize, query: impl AttributeQuery) -> Result<AttributeType> {
        const OP: &str = "MaterialData::attribute_type()";
        let absolute = self.locate(OP, layer, query)?;
        self.known_type(OP, absolute)
    }

    /// Type-erased view of an attribute's value bytes.
    pub fn attribute_bytes(&self, layer: usize, query: impl AttributeQuery) -> Result<&[u8]> {
        const OP: &str = "MaterialData::attribute_bytes()";
        let absolute = self.locate(OP, layer, query)?;
        self.attributes[absolute]
            .value_bytes()
            .map_err(|e| e.with_op(OP))
    }

    /// Typed attribute value, selected by index or name.
    pub fn attribute<T: AttributeValue>(
        &self,
        layer: usize,
        query: impl AttributeQuery,
    ) -> Result<T> {
        const OP: &str = "MaterialData::attribute()";
        let absolute = self.locate(OP, layer, query)?;
        self.attributes[absolute]
            .value::<T>()
            .map_err(|e| e.with_op(OP))
    }

    /// String attribute value, selected by index or name.
    pub fn attribute_string(&self, layer: usize, query: impl AttributeQuery) -> Result<&str> {
        const OP: &str = "MaterialData::attribute_string()";
        let absolute = self.locate(OP, layer, query)?;
        self.attributes[absolute]
            .value_string()
            .map_err(|e| e.with_op(OP))
    }

    /// Typed value of an attribute that may legitimately be missing.
    ///
    /// `Ok(None)` on a plain miss; bad layer indices and type
    /// mismatches still fail, exactly like
    /// [`attribute()`](Self::attribute).
    pub fn try_attribute<T: AttributeValue>(
        &self,
        layer: usize,
        name: impl AsRef<str>,
    ) -> Result<Option<T>> {
        const OP: &str = "MaterialData::try_attribute()";
        let range = self.layer_range(OP, layer)?;
        match find_in_layer(&self.attributes, range, name.as_ref()) {
            None => Ok(None),
            Some(absolute) => self.attributes[absolute]
                .value::<T>()
                .map(Some)
                .map_err(|e| e.with_op(OP)),
        }
    }

    /// Typed value with a fallback for missing attributes.
    pub fn attribute_or<T: AttributeValue>(
        &self,
        layer: usize,
        name: impl AsRef<str>,
        default: T,
    ) -> Result<T> {
        const OP: &str = "MaterialData::attribute_or()";
        let range = self.layer_range(OP, layer)?;
        match find_in_layer(&self.attributes, range, name.as_ref()) {
            None => Ok(default),
            Some(absolute) => self.attributes[absolute]
                .value::<T>()
                .map_err(|e| e.with_op(OP)),
        }
    }

    /// Take ownership of the attribute array, leaving the layer
    /// offsets intact.
    ///
    /// Borrowed attributes are copied out. Afterwards the store
    /// reports attribute counts from the (unchanged) offset table
    /// while the array itself is empty.
    pub fn release_attributes(&mut self) -> Vec<MaterialAttribute> {
        std::mem::take(&mut self.attributes).into_owned()
    }

    /// Take ownership of the layer offset table, leaving the
    /// attributes intact. The store reverts to the single implicit
    /// layer, so [`layer_count()`](Self::layer_count) is 1 again.
    pub fn release_layers(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.layer_offsets).into_owned()
    }

    fn layer_range(&self, op: &'static str, layer: usize) -> Result<Range<usize>> {
        let count = self.layer_count();
        if layer >= count {
            return Err(Error::IndexOutOfRange {
                op,
                index: layer,
                count,
                layer: None,
            });
        }
        if self.layer_offsets.is_empty() {
            return Ok(0..self.attributes.len());
        }
        // Clamp against the array so a store whose attributes were
        // released out stays safe to query
        let end = (self.layer_offsets[layer] as usize).min(self.attributes.len());
        let start = if layer == 0 {
            0
        } else {
            (self.layer_offsets[layer - 1] as usize).min(end)
        };
        Ok(start..end)
    }

    fn locate(&self, op: &'static str, layer: usize, query: impl AttributeQuery) -> Result<usize> {
        let range = self.layer_range(op, layer)?;
        query.resolve(op, &self.attributes, range, layer)
    }

    fn known_type(&self, op: &'static str, absolute: usize) -> Result<AttributeType> {
        let record = &self.attributes[absolute];
        record.ty().ok_or(Error::InvalidType {
            op,
            tag: record.as_bytes()[0],
        })
    }

    /// The `$LayerName` record of a layer, when it is the layer's
    /// first attribute.
    fn explicit_layer_name(&self, range: Range<usize>) -> Option<&MaterialAttribute> {
        if range.is_empty() {
            return None;
        }
        let first = self.attributes.get(range.start)?;
        if first.name() != super::AttributeName::LayerName.string() {
            return None;
        }
        (first.ty() == Some(AttributeType::String)).then_some(first)
    }

    fn find_layer(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        (1..self.layer_count()).find(|&layer| {
            self.layer_range("MaterialData::has_layer()", layer)
                .ok()
                .and_then(|range| self.explicit_layer_name(range))
                .and_then(|record| record.value_string().ok())
                == Some(name)
        })
    }
}

impl fmt::Debug for MaterialData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialData")
            .field("types", &self.types)
            .field("layers", &self.layer_count())
            .field("attributes", &self.attributes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{AttributeName, MaterialType};
    use crate::util::{rgba, Mat3, Vec2, Vec3, Vec4};

    fn scaling(x: f32, y: f32) -> Mat3 {
        Mat3::from_scale(Vec2::new(x, y))
    }

    #[test]
    fn test_construct_sorts() {
        let state = 7i32;
        let data = MaterialData::new(
            MaterialType::Phong.into(),
            vec![
                MaterialAttribute::new(AttributeName::DoubleSided, true).unwrap(),
                MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 5u32).unwrap(),
                MaterialAttribute::with_name("highlightColor", rgba(0x335566ff)).unwrap(),
                MaterialAttribute::new(AttributeName::AmbientTextureMatrix, scaling(0.5, 1.0))
                    .unwrap(),
            ],
        )
        .unwrap()
        .with_importer_state(&state);

        assert_eq!(data.types(), MaterialType::Phong.into());
        assert_eq!(data.layer_count(), 1);
        assert!(data.layer_data().is_empty());
        assert_eq!(data.attribute_count(0).unwrap(), 4);
        assert_eq!(
            data.importer_state()
                .and_then(|s| s.downcast_ref::<i32>()),
            Some(&7)
        );

        assert_eq!(data.layer_name(0).unwrap(), "");
        assert!(!data.has_layer(""));

        // Names come out sorted regardless of insertion order
        assert_eq!(data.attribute_name(0, 0usize).unwrap(), "AmbientTextureMatrix");
        assert_eq!(data.attribute_name(0, 1usize).unwrap(), "DiffuseCoordinateSet");
        assert_eq!(data.attribute_name(0, 2usize).unwrap(), "DoubleSided");
        assert_eq!(data.attribute_name(0, 3usize).unwrap(), "highlightColor");

        // Access by index
        assert_eq!(
            data.attribute_type(0, 0usize).unwrap(),
            AttributeType::Matrix3x3
        );
        assert_eq!(data.attribute::<Mat3>(0, 0usize).unwrap(), scaling(0.5, 1.0));
        assert_eq!(data.attribute::<u32>(0, 1usize).unwrap(), 5);
        assert!(data.attribute::<bool>(0, 2usize).unwrap());
        assert_eq!(data.attribute::<Vec4>(0, 3usize).unwrap(), rgba(0x335566ff));

        // Access by well-known and custom name
        assert!(data.has_attribute(0, AttributeName::DoubleSided).unwrap());
        assert!(!data.has_attribute(0, AttributeName::TextureMatrix).unwrap());
        assert!(data.has_attribute(0, "highlightColor").unwrap());
        assert_eq!(data.attribute_id(0, AttributeName::DoubleSided).unwrap(), 2);
        assert_eq!(data.attribute_id(0, "highlightColor").unwrap(), 3);
        assert_eq!(
            data.attribute::<u32>(0, AttributeName::DiffuseCoordinateSet)
                .unwrap(),
            5
        );
        assert_eq!(
            data.attribute::<Vec4>(0, "highlightColor").unwrap(),
            rgba(0x335566ff)
        );
    }

    #[test]
    fn test_construct_borrowed_must_be_sorted() {
        let attributes = [
            MaterialAttribute::new(AttributeName::DiffuseTexture, 12u32).unwrap(),
            MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 5u32).unwrap(),
        ];
        let err = MaterialData::new(MaterialTypes::NONE, &attributes[..]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData: attribute DiffuseCoordinateSet has to be sorted before DiffuseTexture when passing borrowed data"
        );

        let sorted = [
            MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 5u32).unwrap(),
            MaterialAttribute::new(AttributeName::DiffuseTexture, 12u32).unwrap(),
        ];
        let data = MaterialData::new(MaterialTypes::NONE, &sorted[..]).unwrap();
        assert_eq!(data.attribute_count(0).unwrap(), 2);
        // The borrowed slice is used in place
        assert_eq!(data.attribute_data().as_ptr(), sorted.as_ptr());
    }

    #[test]
    fn test_construct_duplicate() {
        let err = MaterialData::new(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::new(AttributeName::DoubleSided, true).unwrap(),
                MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 5u32).unwrap(),
                MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 6u32).unwrap(),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData: duplicate attribute DiffuseCoordinateSet in layer 0"
        );
    }

    #[test]
    fn test_construct_empty_record() {
        let err = MaterialData::new(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::new(AttributeName::DiffuseTexture, 12u32).unwrap(),
                MaterialAttribute::default(),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData: attribute 1 doesn't specify anything"
        );
    }

    #[test]
    fn test_layers() {
        let data = MaterialData::with_layers(
            MaterialType::Phong.into(),
            vec![
                MaterialAttribute::new(AttributeName::DoubleSided, true).unwrap(),
                MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 5u32).unwrap(),
                // The layer name sorts first within its layer
                MaterialAttribute::with_name("highlightColor", rgba(0x335566ff)).unwrap(),
                MaterialAttribute::new(AttributeName::AlphaBlend, true).unwrap(),
                MaterialAttribute::named_string(AttributeName::LayerName, "transparent highlight")
                    .unwrap(),
                // An empty layer, then an unnamed but nonempty layer
                MaterialAttribute::with_name("thickness", 0.015f32).unwrap(),
                MaterialAttribute::new(AttributeName::NormalTexture, 3u32).unwrap(),
            ],
            vec![2u32, 5, 5, 7],
        )
        .unwrap();

        assert_eq!(data.layer_count(), 4);
        assert_eq!(data.total_attribute_count(), 7);
        assert_eq!(data.attribute_count(0).unwrap(), 2);
        assert_eq!(data.attribute_count(1).unwrap(), 3);
        assert_eq!(data.attribute_count(2).unwrap(), 0);
        assert_eq!(data.attribute_count(3).unwrap(), 2);

        assert_eq!(data.layer_name(0).unwrap(), "");
        assert_eq!(data.layer_name(1).unwrap(), "transparent highlight");
        assert_eq!(data.layer_name(2).unwrap(), "");
        assert_eq!(data.layer_name(3).unwrap(), "");

        assert!(data.has_layer("transparent highlight"));
        assert!(!data.has_layer(""));
        assert!(!data.has_layer("DoubleSided"));
        assert_eq!(data.layer_id("transparent highlight").unwrap(), 1);

        // Sorted within each layer, $LayerName first
        assert_eq!(data.attribute_name(0, 0usize).unwrap(), "DiffuseCoordinateSet");
        assert_eq!(data.attribute_name(0, 1usize).unwrap(), "DoubleSided");
        assert_eq!(data.attribute_name(1, 0usize).unwrap(), "$LayerName");
        assert_eq!(data.attribute_name(1, 1usize).unwrap(), "AlphaBlend");
        assert_eq!(data.attribute_name(1, 2usize).unwrap(), "highlightColor");
        assert_eq!(data.attribute_name(3, 0usize).unwrap(), "NormalTexture");
        assert_eq!(data.attribute_name(3, 1usize).unwrap(), "thickness");

        // The empty layer doesn't leak attributes from its neighbour
        assert!(!data.has_attribute(2, AttributeName::LayerName).unwrap());
        assert!(!data.has_attribute(2, AttributeName::NormalTexture).unwrap());
        assert!(data.has_attribute(3, AttributeName::NormalTexture).unwrap());

        assert_eq!(data.attribute_id(1, AttributeName::LayerName).unwrap(), 0);
        assert_eq!(data.attribute_id(1, AttributeName::AlphaBlend).unwrap(), 1);
        assert_eq!(
            data.attribute::<Vec4>(1, "highlightColor").unwrap(),
            rgba(0x335566ff)
        );
        assert_eq!(
            data.attribute_string(1, AttributeName::LayerName).unwrap(),
            "transparent highlight"
        );
        assert_eq!(data.attribute::<f32>(3, "thickness").unwrap(), 0.015);
    }

    #[test]
    fn test_layers_not_monotonic() {
        let attributes = || {
            vec![
                MaterialAttribute::new(AttributeName::DoubleSided, true).unwrap(),
                MaterialAttribute::new(AttributeName::DiffuseCoordinateSet, 5u32).unwrap(),
                MaterialAttribute::new(AttributeName::AlphaBlend, true).unwrap(),
                MaterialAttribute::named_string(AttributeName::LayerName, "transparent highlight")
                    .unwrap(),
                MaterialAttribute::new(AttributeName::NormalTexture, 3u32).unwrap(),
            ]
        };

        let err = MaterialData::with_layers(
            MaterialType::Phong.into(),
            attributes(),
            vec![2u32, 5, 4, 5],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData: invalid range (5, 4) for layer 2 with 5 attributes in total"
        );

        // An offset past the end is the same violation
        let err =
            MaterialData::with_layers(MaterialType::Phong.into(), attributes(), vec![2u32, 6])
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData: invalid range (2, 6) for layer 1 with 5 attributes in total"
        );
    }

    #[test]
    fn test_layer_name_in_base_material_is_ignored() {
        let data = MaterialData::new(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::new(AttributeName::Shininess, 50.0f32).unwrap(),
                MaterialAttribute::named_string(AttributeName::LayerName, "base material name")
                    .unwrap(),
            ],
        )
        .unwrap();

        assert_eq!(data.layer_name(0).unwrap(), "");
        assert!(!data.has_layer("base material name"));
        // The record itself is still there and queryable
        assert!(data.has_attribute(0, AttributeName::LayerName).unwrap());
    }

    #[test]
    fn test_empty_leading_layers() {
        let data = MaterialData::with_layers(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::new(AttributeName::NormalTexture, 3u32).unwrap(),
                MaterialAttribute::named_string(AttributeName::LayerName, "crumples").unwrap(),
            ],
            vec![0u32, 0, 2],
        )
        .unwrap();

        assert_eq!(data.layer_name(0).unwrap(), "");
        assert_eq!(data.layer_name(1).unwrap(), "");
        assert_eq!(data.layer_name(2).unwrap(), "crumples");
        assert_eq!(data.attribute_count(0).unwrap(), 0);
        assert_eq!(data.layer_id("crumples").unwrap(), 2);
        assert_eq!(
            data.attribute::<u32>(2, AttributeName::NormalTexture).unwrap(),
            3
        );
    }

    #[test]
    fn test_optional_access() {
        let data = MaterialData::new(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::new(AttributeName::AlphaMask, 0.5f32).unwrap(),
                MaterialAttribute::new(AttributeName::SpecularTexture, 3u32).unwrap(),
            ],
        )
        .unwrap();

        assert_eq!(
            data.try_attribute::<u32>(0, AttributeName::SpecularTexture)
                .unwrap(),
            Some(3)
        );
        assert_eq!(
            data.try_attribute::<u32>(0, AttributeName::DiffuseTexture)
                .unwrap(),
            None
        );
        assert_eq!(
            data.attribute_or(0, AttributeName::SpecularTexture, 5u32)
                .unwrap(),
            3
        );
        assert_eq!(
            data.attribute_or(0, AttributeName::DiffuseTexture, 5u32)
                .unwrap(),
            5
        );

        // Mismatched types still fail, even through the optional forms
        assert!(data
            .try_attribute::<bool>(0, AttributeName::SpecularTexture)
            .is_err());
        assert!(data
            .attribute_or(0, AttributeName::SpecularTexture, false)
            .is_err());
    }

    #[test]
    fn test_out_of_bounds() {
        let data = MaterialData::new(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::new(AttributeName::AlphaMask, 0.5f32).unwrap(),
                MaterialAttribute::new(AttributeName::SpecularTexture, 3u32).unwrap(),
            ],
        )
        .unwrap();

        let err = data.attribute_name(0, 2usize).unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData::attribute_name(): index 2 out of range for 2 attributes in layer 0"
        );

        let err = data.attribute::<f32>(1, 0usize).unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData::attribute(): index 1 out of range for 1 layers"
        );

        let err = data.layer_id("Layer").unwrap_err();
        assert_eq!(err.to_string(), "MaterialData::layer_id(): layer Layer not found");
    }

    #[test]
    fn test_not_found() {
        let data = MaterialData::new(
            MaterialTypes::NONE,
            vec![MaterialAttribute::with_name("DiffuseColor", rgba(0xff3366aa)).unwrap()],
        )
        .unwrap();

        assert!(!data.has_attribute(0, "DiffuseColour").unwrap());
        let err = data.attribute::<Vec4>(0, "DiffuseColour").unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData::attribute(): attribute DiffuseColour not found in layer 0"
        );
    }

    #[test]
    fn test_wrong_type() {
        let data = MaterialData::new(
            MaterialTypes::NONE,
            vec![MaterialAttribute::new(AttributeName::DiffuseColor, rgba(0xff3366aa)).unwrap()],
        )
        .unwrap();

        let err = data
            .attribute::<Vec3>(0, AttributeName::DiffuseColor)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "MaterialData::attribute(): expected AttributeType::Vector4 for DiffuseColor but got AttributeType::Vector3"
        );

        let err = data.attribute_string(0, 0usize).unwrap_err();
        assert_eq!(
            err.to_string(),
            "MaterialData::attribute_string(): expected AttributeType::Vector4 for DiffuseColor but got AttributeType::String"
        );
    }

    #[test]
    fn test_string_access() {
        let data = MaterialData::new(
            MaterialTypes::NONE,
            vec![MaterialAttribute::string("name?", "THIS IS\0WHO I AM!").unwrap()],
        )
        .unwrap();

        assert_eq!(data.attribute_type(0, "name?").unwrap(), AttributeType::String);
        assert_eq!(
            data.attribute_string(0, "name?").unwrap(),
            "THIS IS\0WHO I AM!"
        );
        assert_eq!(
            data.attribute_bytes(0, "name?").unwrap(),
            b"THIS IS\0WHO I AM!"
        );
    }

    #[test]
    fn test_release_attributes() {
        let mut data = MaterialData::with_layers(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::with_name("DiffuseColor", rgba(0xff3366aa)).unwrap(),
                MaterialAttribute::new(AttributeName::NormalTexture, 0u32).unwrap(),
            ],
            vec![1u32, 2],
        )
        .unwrap();

        let released = data.release_attributes();
        assert_eq!(released.len(), 2);
        assert_eq!(released[0].name(), "DiffuseColor");
        // Layers stay in place; counts now reflect the offsets only
        assert_eq!(data.layer_count(), 2);
        assert!(data.attribute_data().is_empty());
    }

    #[test]
    fn test_release_layers() {
        let mut data = MaterialData::with_layers(
            MaterialTypes::NONE,
            vec![
                MaterialAttribute::with_name("DiffuseColor", rgba(0xff3366aa)).unwrap(),
                MaterialAttribute::new(AttributeName::NormalTexture, 0u32).unwrap(),
            ],
            vec![1u32, 2],
        )
        .unwrap();

        let released = data.release_layers();
        assert_eq!(released, vec![1, 2]);
        assert!(data.layer_data().is_empty());
        // Back to the single implicit layer over everything
        assert_eq!(data.layer_count(), 1);
        assert_eq!(data.attribute_count(0).unwrap(), 2);
    }
}
