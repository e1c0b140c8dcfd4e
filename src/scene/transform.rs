//! Transformation capability of scene objects.

use std::fmt;

use crate::util::{Affine3A, Mat3, Mat4};

/// What the scene graph needs from a transformation type.
///
/// Implementations exist for [`Mat4`] (general 3D), [`Mat3`]
/// (general 2D) and [`Affine3A`] (3D without projective terms).
/// Composition is parent-first and not commutative; the matrix form
/// is what [`Feature`](super::Feature)s receive when cleaned.
pub trait Transformation: Clone {
    /// Matrix form delivered to features.
    type Matrix: Copy + PartialEq + fmt::Debug;

    /// The neutral transformation.
    fn identity() -> Self;

    /// Apply `child` in the space of `parent`.
    fn compose(parent: &Self, child: &Self) -> Self;

    /// The inverse transformation.
    fn inverted(&self) -> Self;

    /// Convert to the matrix form.
    fn to_matrix(&self) -> Self::Matrix;

    /// Convert back from the matrix form.
    fn from_matrix(matrix: Self::Matrix) -> Self;
}

impl Transformation for Mat4 {
    type Matrix = Mat4;

    #[inline]
    fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    fn compose(parent: &Self, child: &Self) -> Self {
        *parent * *child
    }

    #[inline]
    fn inverted(&self) -> Self {
        self.inverse()
    }

    #[inline]
    fn to_matrix(&self) -> Mat4 {
        *self
    }

    #[inline]
    fn from_matrix(matrix: Mat4) -> Self {
        matrix
    }
}

impl Transformation for Mat3 {
    type Matrix = Mat3;

    #[inline]
    fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    fn compose(parent: &Self, child: &Self) -> Self {
        *parent * *child
    }

    #[inline]
    fn inverted(&self) -> Self {
        self.inverse()
    }

    #[inline]
    fn to_matrix(&self) -> Mat3 {
        *self
    }

    #[inline]
    fn from_matrix(matrix: Mat3) -> Self {
        matrix
    }
}

impl Transformation for Affine3A {
    type Matrix = Mat4;

    #[inline]
    fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    fn compose(parent: &Self, child: &Self) -> Self {
        *parent * *child
    }

    #[inline]
    fn inverted(&self) -> Self {
        self.inverse()
    }

    #[inline]
    fn to_matrix(&self) -> Mat4 {
        Mat4::from(*self)
    }

    #[inline]
    fn from_matrix(matrix: Mat4) -> Self {
        Affine3A::from_mat4(matrix)
    }
}
