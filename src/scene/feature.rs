//! Object features and their cached transformation requests.

use std::fmt;

use super::Transformation;

/// Which cached matrices a [`Feature`] wants delivered on clean.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CachedTransformations(u8);

impl CachedTransformations {
    /// The feature only wants [`mark_dirty()`](Feature::mark_dirty).
    pub const NONE: Self = Self(0);

    /// Deliver the absolute transformation matrix via
    /// [`clean()`](Feature::clean).
    pub const ABSOLUTE: Self = Self(1 << 0);

    /// Deliver the inverted absolute transformation matrix via
    /// [`clean_inverted()`](Feature::clean_inverted).
    pub const INVERTED_ABSOLUTE: Self = Self(1 << 1);

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether all bits of `other` are set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CachedTransformations {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for CachedTransformations {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CachedTransformations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "CachedTransformations{{}}");
        }
        let mut remaining = self.0;
        let mut first = true;
        for (bit, name) in [
            (Self::ABSOLUTE, "Absolute"),
            (Self::INVERTED_ABSOLUTE, "InvertedAbsolute"),
        ] {
            if remaining & bit.0 != 0 {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "CachedTransformation::{}", name)?;
                remaining &= !bit.0;
                first = false;
            }
        }
        if remaining != 0 {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "CachedTransformation(0x{:x})", remaining)?;
        }
        Ok(())
    }
}

/// An attachment on a scene object that reacts to transformation
/// changes.
///
/// When the object (or any ancestor) goes dirty, every feature gets
/// [`mark_dirty()`](Self::mark_dirty). When the object is cleaned,
/// features receive the cached matrices they asked for via
/// [`cached_transformations()`](Self::cached_transformations); each
/// matrix is computed at most once per object regardless of how many
/// features want it.
pub trait Feature<T: Transformation> {
    /// Which cached matrices this feature wants on clean.
    fn cached_transformations(&self) -> CachedTransformations;

    /// The object's absolute transformation is no longer valid.
    fn mark_dirty(&mut self) {}

    /// Deliver the absolute transformation matrix.
    fn clean(&mut self, _absolute: &T::Matrix) {}

    /// Deliver the inverted absolute transformation matrix.
    fn clean_inverted(&mut self, _inverted: &T::Matrix) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let both = CachedTransformations::ABSOLUTE | CachedTransformations::INVERTED_ABSOLUTE;
        assert!(both.contains(CachedTransformations::ABSOLUTE));
        assert!(both.contains(CachedTransformations::INVERTED_ABSOLUTE));
        assert!(!CachedTransformations::ABSOLUTE.contains(both));
        assert!(CachedTransformations::NONE.is_empty());
    }

    #[test]
    fn test_debug() {
        assert_eq!(
            format!("{:?}", CachedTransformations::NONE),
            "CachedTransformations{}"
        );
        assert_eq!(
            format!("{:?}", CachedTransformations::ABSOLUTE),
            "CachedTransformation::Absolute"
        );
        assert_eq!(
            format!(
                "{:?}",
                CachedTransformations::ABSOLUTE | CachedTransformations::INVERTED_ABSOLUTE
            ),
            "CachedTransformation::Absolute|CachedTransformation::InvertedAbsolute"
        );
    }
}
