//! Utility types and functions for maquette.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam plus the packed types attribute
//!   storage needs ([`Deg`], [`Rad`], the non-square matrices)

mod error;
mod math;

pub use error::*;
pub use math::*;
