//! Math type re-exports and packed math types.
//!
//! This module re-exports the `glam` types used by attribute storage
//! and provides the additional types materials need: tagged angle
//! wrappers ([`Deg`], [`Rad`]) and the non-square column-major
//! matrices glam doesn't ship.

// Re-export glam types
pub use glam::{
    // Vectors
    Vec2, Vec3, Vec3A, Vec4,
    // Integer vectors
    IVec2, IVec3, IVec4,
    UVec2, UVec3, UVec4,
    // Matrices
    Mat2, Mat3, Mat3A, Mat4,
    // Quaternions and affine transforms
    Affine2, Affine3A, Quat,
};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// RGB color, alias of [`Vec3`].
pub type Color3 = Vec3;

/// RGBA color, alias of [`Vec4`].
pub type Color4 = Vec4;

/// Unpack a `0xRRGGBBAA` literal into a [`Color4`].
#[inline]
pub fn rgba(hex: u32) -> Color4 {
    Vec4::new(
        ((hex >> 24) & 0xff) as f32 / 255.0,
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Angle in degrees with guaranteed 4-byte storage.
///
/// Distinct from [`Rad`] at the type level so attribute records keep
/// the unit a value was authored in.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd, Pod, Zeroable)]
#[repr(transparent)]
pub struct Deg(pub f32);

/// Angle in radians with guaranteed 4-byte storage.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rad(pub f32);

impl Deg {
    #[inline]
    pub const fn new(v: f32) -> Self {
        Self(v)
    }

    #[inline]
    pub fn to_rad(self) -> Rad {
        Rad(self.0.to_radians())
    }
}

impl Rad {
    #[inline]
    pub const fn new(v: f32) -> Self {
        Self(v)
    }

    #[inline]
    pub fn to_deg(self) -> Deg {
        Deg(self.0.to_degrees())
    }
}

impl From<f32> for Deg {
    #[inline]
    fn from(v: f32) -> Self {
        Self(v)
    }
}

impl From<f32> for Rad {
    #[inline]
    fn from(v: f32) -> Self {
        Self(v)
    }
}

impl From<Rad> for Deg {
    #[inline]
    fn from(v: Rad) -> Self {
        v.to_deg()
    }
}

impl From<Deg> for Rad {
    #[inline]
    fn from(v: Deg) -> Self {
        v.to_rad()
    }
}

impl fmt::Debug for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deg({})", self.0)
    }
}

impl fmt::Debug for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rad({})", self.0)
    }
}

/// Declares a column-major non-square matrix as a plain struct of
/// column vectors, mirroring how glam lays out its square matrices.
macro_rules! nonsquare_matrix {
    ($(#[$doc:meta])* $name:ident, $col:ident, $($axis:ident : $diag:expr),+) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
        #[repr(C)]
        pub struct $name {
            $(pub $axis: $col,)+
        }

        impl $name {
            pub const ZERO: Self = Self { $($axis: $col::ZERO,)+ };

            /// Ones on the diagonal, zeros elsewhere.
            pub const IDENTITY: Self = Self { $($axis: $diag,)+ };

            #[inline]
            pub const fn from_cols($($axis: $col),+) -> Self {
                Self { $($axis,)+ }
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($axis), &self.$axis))+
                    .finish()
            }
        }
    };
}

nonsquare_matrix!(
    /// 2 columns of 3 rows, column-major.
    Mat2x3, Vec3,
    x_axis: Vec3::new(1.0, 0.0, 0.0),
    y_axis: Vec3::new(0.0, 1.0, 0.0)
);

nonsquare_matrix!(
    /// 2 columns of 4 rows, column-major.
    Mat2x4, Vec4,
    x_axis: Vec4::new(1.0, 0.0, 0.0, 0.0),
    y_axis: Vec4::new(0.0, 1.0, 0.0, 0.0)
);

nonsquare_matrix!(
    /// 3 columns of 2 rows, column-major.
    Mat3x2, Vec2,
    x_axis: Vec2::new(1.0, 0.0),
    y_axis: Vec2::new(0.0, 1.0),
    z_axis: Vec2::new(0.0, 0.0)
);

nonsquare_matrix!(
    /// 3 columns of 4 rows, column-major.
    Mat3x4, Vec4,
    x_axis: Vec4::new(1.0, 0.0, 0.0, 0.0),
    y_axis: Vec4::new(0.0, 1.0, 0.0, 0.0),
    z_axis: Vec4::new(0.0, 0.0, 1.0, 0.0)
);

nonsquare_matrix!(
    /// 4 columns of 2 rows, column-major.
    Mat4x2, Vec2,
    x_axis: Vec2::new(1.0, 0.0),
    y_axis: Vec2::new(0.0, 1.0),
    z_axis: Vec2::new(0.0, 0.0),
    w_axis: Vec2::new(0.0, 0.0)
);

nonsquare_matrix!(
    /// 4 columns of 3 rows, column-major.
    Mat4x3, Vec3,
    x_axis: Vec3::new(1.0, 0.0, 0.0),
    y_axis: Vec3::new(0.0, 1.0, 0.0),
    z_axis: Vec3::new(0.0, 0.0, 1.0),
    w_axis: Vec3::new(0.0, 0.0, 0.0)
);
