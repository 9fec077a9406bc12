//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Unlike row indices, `PersonId` and
//! `ZoneId` carry the *external* identifiers found in the input tables; tables
//! keep their own id → row index maps.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `<inner>::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// `true` unless this is the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// External person identifier (one chooser per person).
    pub struct PersonId(u32);
}

typed_id! {
    /// External zone identifier (TAZ / MAZ number from the land-use table).
    pub struct ZoneId(u32);
}

typed_id! {
    /// Position of a segment in the sorted [`Segments`][crate::Segments] list.
    /// `u16` keeps choice records compact.
    pub struct SegmentId(u16);
}

impl ZoneId {
    /// "No destination" — written for persons who were filtered out of a
    /// location model.  Exported as `-1` by the output writers.
    pub const NONE: ZoneId = ZoneId::INVALID;

    /// Signed export value: the zone number, or `-1` for [`ZoneId::NONE`].
    #[inline]
    pub fn to_signed(self) -> i64 {
        if self.is_valid() { self.0 as i64 } else { -1 }
    }
}
