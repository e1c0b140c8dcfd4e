//! Scene graph with dirty tracking and batched cleaning.
//!
//! Objects form rooted trees inside a [`SceneGraph`] arena, each
//! carrying a local transformation of any type implementing
//! [`Transformation`]. Changing a transformation or reparenting marks
//! the whole subtree dirty; cleaning computes absolute
//! transformations and hands them to attached [`Feature`]s.
//!
//! - [`Transformation`] - compose/invert/matrix-conversion capability
//!   of the transformation type
//! - [`Feature`] - attachment notified of transformation changes
//! - [`SceneGraph`] / [`NodeId`] - the tree itself, including the
//!   batched [`transformations()`](SceneGraph::transformations)
//!   solver that shares ancestor paths between requested objects
//!
//! ## Example
//!
//! ```
//! use glam::Mat4;
//! use maquette::scene::SceneGraph;
//!
//! let mut graph = SceneGraph::<Mat4>::new();
//! let scene = graph.add_scene();
//! let body = graph.add_object_with(Some(scene), Mat4::from_translation(glam::vec3(0.0, 1.0, 0.0)));
//! let wheel = graph.add_object_with(Some(body), Mat4::from_rotation_z(0.5));
//!
//! let absolute = graph.transformations(scene, &[wheel], Mat4::IDENTITY)?;
//! assert_eq!(absolute[0], graph.absolute_transformation(wheel));
//! # Ok::<(), maquette::Error>(())
//! ```

mod feature;
mod graph;
mod transform;

pub use feature::*;
pub use graph::*;
pub use transform::*;
