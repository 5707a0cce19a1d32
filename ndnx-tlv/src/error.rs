//! Error types for the ndnx TLV codec.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the primitive TLV layer (VAR-NUMBER, blocks, names).
///
/// These propagate unchanged through the packet decoders, wrapped in
/// [`PacketError::Tlv`] together with the kind of object being decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// Buffer ended before the announced number of bytes.
    #[error("Truncated TLV: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// TLV-LENGTH does not fit in the address space.
    #[error("TLV-LENGTH {0} is too large")]
    LengthOverflow(u64),

    /// Bytes left over after a complete TLV element.
    #[error("Trailing bytes after TLV element: {0}")]
    TrailingBytes(usize),

    /// NonNegativeInteger value with a length other than 1, 2, 4 or 8.
    #[error("Invalid NonNegativeInteger length: {0}")]
    InvalidNonNegativeInteger(usize),

    /// A required child element is absent.
    #[error("Missing TLV element {0}")]
    MissingElement(u64),

    /// Name TLV is malformed.
    #[error("Invalid Name: {0}")]
    InvalidName(String),

    /// NDN URI could not be parsed.
    #[error("Invalid NDN URI: {0}")]
    InvalidUri(String),

    /// Exclude TLV is malformed.
    #[error("Invalid Exclude: {0}")]
    InvalidExclude(String),
}

/// The packet, selector or status type an error is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    Announcement,
    Hint,
    LegacyHint,
    Vicinity,
    VicinityData,
    ReplicationSelectors,
    LegacyReplicationSelectors,
    StrategySelectors,
    PdrmStrategySelectors,
    FaceStatus,
    ForwarderStatus,
}

impl PacketKind {
    /// Name used in error messages and tool output.
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Announcement => "Announcement",
            PacketKind::Hint => "Hint",
            PacketKind::LegacyHint => "LegacyHint",
            PacketKind::Vicinity => "Vicinity",
            PacketKind::VicinityData => "VicinityData",
            PacketKind::ReplicationSelectors => "ReplicationSelectors",
            PacketKind::LegacyReplicationSelectors => "LegacyReplicationSelectors",
            PacketKind::StrategySelectors => "StrategySelectors",
            PacketKind::PdrmStrategySelectors => "PDRMStrategySelectors",
            PacketKind::FaceStatus => "FaceStatus",
            PacketKind::ForwarderStatus => "ForwarderStatus",
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode failures of packet, selector and status types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// Outer TLV type does not match the type being decoded.
    #[error("Unexpected TLV number when decoding {kind}: expected {expected}, got {actual}")]
    UnexpectedType {
        kind: PacketKind,
        expected: u64,
        actual: u64,
    },

    /// A mandatory field is absent (or out of order in a status record).
    #[error("{kind}: missing required {field} field")]
    MissingField {
        kind: PacketKind,
        field: &'static str,
    },

    /// A field is present but carries a value outside its domain.
    #[error("{kind}: invalid {field} value {value}")]
    InvalidValue {
        kind: PacketKind,
        field: &'static str,
        value: u64,
    },

    /// Primitive-layer failure while decoding `kind`.
    #[error("{kind}: {source}")]
    Tlv {
        kind: PacketKind,
        #[source]
        source: TlvError,
    },

    /// Top-level dispatch found a TLV number it does not handle.
    #[error("Unknown top-level TLV number {0}")]
    UnknownType(u64),

    /// Input is not a well-formed TLV element of any known type.
    #[error("Malformed TLV element: {0}")]
    Malformed(#[source] TlvError),
}

impl PacketError {
    /// Returns the kind the error is scoped to, if any.
    pub fn kind(&self) -> Option<PacketKind> {
        match self {
            PacketError::UnexpectedType { kind, .. }
            | PacketError::MissingField { kind, .. }
            | PacketError::InvalidValue { kind, .. }
            | PacketError::Tlv { kind, .. } => Some(*kind),
            PacketError::UnknownType(_) | PacketError::Malformed(_) => None,
        }
    }

    /// Adapter for `map_err` on primitive-layer results.
    pub(crate) fn tlv(kind: PacketKind) -> impl Fn(TlvError) -> PacketError {
        move |source| PacketError::Tlv { kind, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = PacketError::MissingField {
            kind: PacketKind::FaceStatus,
            field: "NOutBytes",
        };
        assert_eq!(err.to_string(), "FaceStatus: missing required NOutBytes field");
        assert_eq!(err.kind(), Some(PacketKind::FaceStatus));
    }

    #[test]
    fn test_unexpected_type_message() {
        let err = PacketError::UnexpectedType {
            kind: PacketKind::Hint,
            expected: 201,
            actual: 5,
        };
        assert!(err.to_string().starts_with("Unexpected TLV number when decoding Hint"));
    }

    #[test]
    fn test_tlv_error_is_wrapped_with_kind() {
        let err = PacketError::tlv(PacketKind::Vicinity)(TlvError::MissingElement(7));
        assert_eq!(err.to_string(), "Vicinity: Missing TLV element 7");
        assert_eq!(PacketError::UnknownType(99).kind(), None);
    }
}
