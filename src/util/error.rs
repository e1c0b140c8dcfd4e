//! Error types for the maquette library.
//!
//! Every variant reports a violated precondition, i.e. a caller bug:
//! downstream code is free to assume success and lookups that may
//! legitimately miss have `try_*` / `*_or` counterparts that never
//! produce these errors for a plain miss. The `Display` strings are
//! stable, carry the operation that raised them and are safe to match
//! in tests.

use thiserror::Error;

use crate::material::AttributeType;

/// Main error type for material and scene graph operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A raw type tag does not name a known attribute type
    #[error("{op}: invalid attribute type AttributeType(0x{tag:x})")]
    InvalidType { op: &'static str, tag: u8 },

    /// An attribute name is empty, contains NUL bytes or uses the
    /// reserved `$` prefix
    #[error("{op}: invalid attribute name {name:?}")]
    InvalidName { op: &'static str, name: String },

    /// A raw string value is not valid UTF-8
    #[error("{op}: string value is not valid UTF-8")]
    InvalidString { op: &'static str },

    /// String sizes are only known per value, not per type
    #[error("{op}: size of AttributeType::String is not fixed")]
    UnknownStringSize { op: &'static str },

    /// The wrong type was used for an attribute: a value whose type
    /// doesn't match what a well-known name requires, a typed read
    /// that doesn't match the stored type, or raw value bytes whose
    /// size doesn't fit the declared type (`got` is `None` there)
    #[error("{op}: {}", type_mismatch_text(.name, .expected, .got))]
    TypeMismatch {
        op: &'static str,
        name: String,
        expected: AttributeType,
        got: Option<AttributeType>,
    },

    /// Name and value together exceed the inline record budget
    #[error("{op}: name {name} and a {ty} value need {len} bytes, at most {max} available")]
    RecordTooLarge {
        op: &'static str,
        name: String,
        ty: AttributeType,
        len: usize,
        max: usize,
    },

    /// A default-constructed record was passed to a store
    #[error("MaterialData: attribute {index} doesn't specify anything")]
    EmptyRecord { index: usize },

    /// Borrowed attributes have to be pre-sorted within each layer
    #[error(
        "MaterialData: attribute {second} has to be sorted before {first} when passing borrowed data"
    )]
    NotSorted { first: String, second: String },

    /// Two attributes within one layer share a name
    #[error("MaterialData: duplicate attribute {name} in layer {layer}")]
    DuplicateAttribute { name: String, layer: usize },

    /// Layer offsets are not monotonic or exceed the attribute count
    #[error(
        "MaterialData: invalid range ({prev}, {curr}) for layer {layer} with {total} attributes in total"
    )]
    InvalidLayerRange {
        layer: usize,
        prev: u32,
        curr: u32,
        total: usize,
    },

    /// Layer or attribute index out of bounds: a bad attribute index
    /// names its layer, a bad layer index has `layer` set to `None`
    #[error("{op}: index {index} out of range for {count} {}", index_domain(.layer))]
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        count: usize,
        layer: Option<usize>,
    },

    /// Attribute not found by name
    #[error("{op}: attribute {name} not found in layer {layer}")]
    AttributeNotFound {
        op: &'static str,
        name: String,
        layer: usize,
    },

    /// Layer not found by name
    #[error("{op}: layer {name} not found")]
    LayerNotFound { op: &'static str, name: String },

    /// A per-texture property was requested without the texture itself
    #[error("{op}: the material doesn't have a {texture} attribute")]
    MissingTexture {
        op: &'static str,
        texture: &'static str,
    },

    /// Batch transformation computation is only implemented for scenes
    #[error("SceneGraph::transformations(): the caller is not a scene")]
    NotScene,

    /// An object does not belong to the caller's scene
    #[error("SceneGraph::transformations(): the objects are not part of the same scene")]
    ForeignObject,

    /// No object in a batch clean is attached to a scene
    #[error("SceneGraph::set_clean_many(): objects are not part of any scene")]
    Detached,

    /// The 16-bit per-node counter cannot address this many objects
    #[error("{op}: too many objects, at most 65534 supported but got {count}")]
    TooManyObjects { op: &'static str, count: usize },
}

impl Error {
    /// Relabel the reporting operation; used when a store accessor
    /// delegates to a record accessor but the caller-facing operation
    /// is the store's.
    pub(crate) fn with_op(self, op: &'static str) -> Self {
        match self {
            Self::InvalidType { tag, .. } => Self::InvalidType { op, tag },
            Self::InvalidName { name, .. } => Self::InvalidName { op, name },
            Self::InvalidString { .. } => Self::InvalidString { op },
            Self::UnknownStringSize { .. } => Self::UnknownStringSize { op },
            Self::TypeMismatch {
                name,
                expected,
                got,
                ..
            } => Self::TypeMismatch {
                op,
                name,
                expected,
                got,
            },
            other => other,
        }
    }
}

fn type_mismatch_text(name: &str, expected: &AttributeType, got: &Option<AttributeType>) -> String {
    match got {
        Some(got) => format!("expected {expected} for {name} but got {got}"),
        None => format!("value size doesn't match {expected} for {name}"),
    }
}

fn index_domain(layer: &Option<usize>) -> String {
    match layer {
        Some(layer) => format!("attributes in layer {layer}"),
        None => "layers".into(),
    }
}

/// Result type alias for maquette operations.
pub type Result<T> = std::result::Result<T, Error>;
