//! CAN bus addressing.

use core::fmt;

use snafu::ensure;

use crate::{CanError, InvalidIdSnafu};

/// A validated CAN device id.
///
/// Motor controllers and pneumatic hubs are addressed by a small integer id assigned when the
/// device is configured. Ids above [`CanId::MAX`] are reserved for broadcast frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanId(u8);

impl CanId {
    /// The largest id a device can be configured with.
    pub const MAX: u8 = 62;

    /// Creates a new id, checking that it is addressable.
    ///
    /// # Errors
    ///
    /// Returns [`CanError::InvalidId`] if `id` is greater than [`CanId::MAX`].
    pub fn new(id: u8) -> Result<Self, CanError> {
        ensure!(id <= Self::MAX, InvalidIdSnafu { id });
        Ok(Self(id))
    }

    /// Creates a new id without range checking.
    ///
    /// Intended for `const` tables of known-good ids. Out of range values are clamped to
    /// [`CanId::MAX`].
    #[must_use]
    pub const fn new_clamped(id: u8) -> Self {
        if id > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(id)
        }
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAN {}", self.0)
    }
}

impl TryFrom<u8> for CanId {
    type Error = CanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CanId> for u8 {
    fn from(value: CanId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_addressable_ids() {
        assert_eq!(CanId::new(0).unwrap().get(), 0);
        assert_eq!(CanId::new(62).unwrap().get(), 62);
    }

    #[test]
    fn rejects_broadcast_range() {
        assert_eq!(CanId::new(63), Err(CanError::InvalidId { id: 63 }));
        assert!(CanId::try_from(255).is_err());
    }

    #[test]
    fn clamped_constructor_saturates() {
        assert_eq!(CanId::new_clamped(200).get(), CanId::MAX);
        assert_eq!(CanId::new_clamped(7).get(), 7);
    }
}
