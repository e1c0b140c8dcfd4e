//! # Maquette
//!
//! Layered material attribute storage and a scene graph with batched
//! transformation cleaning, built for asset import pipelines and the
//! renderers that consume them.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (math, errors)
//! - [`material`] - Packed attribute records, the layered
//!   [`MaterialData`](material::MaterialData) store and the
//!   [`PhongMaterial`](material::PhongMaterial) view
//! - [`scene`] - Scene graph objects, dirty tracking and absolute
//!   transformation computation
//!
//! ## Example
//!
//! ```
//! use maquette::material::{AttributeName, MaterialAttribute, MaterialData, MaterialType};
//!
//! let data = MaterialData::new(MaterialType::Phong.into(), vec![
//!     MaterialAttribute::new(AttributeName::DoubleSided, true)?,
//!     MaterialAttribute::new(AttributeName::Shininess, 96.0f32)?,
//! ])?;
//! assert!(data.has_attribute(0, AttributeName::DoubleSided)?);
//! # Ok::<(), maquette::Error>(())
//! ```

pub mod material;
pub mod scene;
pub mod util;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::material::{
        AlphaMode, AttributeName, AttributeType, AttributeValue, MaterialAttribute, MaterialData,
        MaterialType, MaterialTypes, PhongMaterial,
    };
    pub use crate::scene::{CachedTransformations, Feature, NodeId, SceneGraph, Transformation};
    pub use crate::util::{Error, Result};
}
