//! Material attribute storage.
//!
//! Materials imported from asset files are described as flat, sorted
//! arrays of fixed-size attribute records, optionally partitioned into
//! named layers:
//!
//! - [`AttributeType`] / [`AttributeName`] - closed registries of
//!   value kinds and well-known attribute names
//! - [`MaterialAttribute`] - a 64-byte packed (name, type, value)
//!   record
//! - [`MaterialData`] - the layered, binary-searchable store
//! - [`PhongMaterial`] - a convention-level view interpreting a store
//!   as a Phong material
//!
//! ## Example
//!
//! ```
//! use maquette::material::{AttributeName, MaterialAttribute, MaterialData, MaterialType};
//!
//! let data = MaterialData::new(MaterialType::Phong.into(), vec![
//!     MaterialAttribute::new(AttributeName::Shininess, 96.0f32)?,
//!     MaterialAttribute::with_name("highlightColor", glam::Vec4::ONE)?,
//! ])?;
//! assert_eq!(data.attribute::<f32>(0, AttributeName::Shininess)?, 96.0);
//! # Ok::<(), maquette::Error>(())
//! ```

mod attribute;
mod data;
mod names;
mod phong;
mod types;

pub use attribute::*;
pub use data::*;
pub use names::*;
pub use phong::*;
pub use types::*;
