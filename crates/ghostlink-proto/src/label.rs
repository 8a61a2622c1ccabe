use strum::FromRepr;

use crate::error::ProtoError;

/// Tag carried by each wire record, selecting the apply routine on the
/// receiving side.
///
/// The set is closed: a label byte outside this enum is a protocol error at
/// dispatch time, never a decode failure.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
pub enum DataLabel {
    /// Per-cycle state snapshot of a remote player and its companion.
    PlayerSnapshot = 1,
    /// Level-change notification for a remote player.
    PlayerLevel = 2,
}

impl DataLabel {
    /// Interpret a raw label byte.
    pub fn from_byte(byte: u8) -> Result<Self, ProtoError> {
        Self::from_repr(byte).ok_or(ProtoError::UnknownLabel(byte))
    }
}
