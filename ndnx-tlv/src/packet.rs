//! Top-level dispatch by TLV type number.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::announcement::Announcement;
use crate::block::{read_var_number, Block};
use crate::codec::WireDecode;
use crate::error::{PacketError, PacketKind};
use crate::hint::Hint;
use crate::legacy::{LegacyHint, LegacyReplicationSelectors};
use crate::management::{FaceStatus, ForwarderStatus};
use crate::name::Name;
use crate::pdrm_strategy_selectors::PdrmStrategySelectors;
use crate::replication_selectors::ReplicationSelectors;
use crate::strategy_selectors::StrategySelectors;
use crate::tlv;
use crate::vicinity::Vicinity;
use crate::vicinity_data::VicinityData;

/// Which Hint/ReplicationSelectors schema a decoder accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    #[default]
    Current,
    /// Also accept the superseded name+size Hint and Exclude/MustBeFresh selectors.
    Legacy,
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "current" => Ok(SchemaVersion::Current),
            "legacy" => Ok(SchemaVersion::Legacy),
            other => Err(format!("unknown schema version '{}' (expected current or legacy)", other)),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaVersion::Current => "current",
            SchemaVersion::Legacy => "legacy",
        })
    }
}

/// Any element this crate can decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Packet {
    Announcement(Announcement),
    Hint(Hint),
    LegacyHint(LegacyHint),
    Vicinity(Vicinity),
    VicinityData(VicinityData),
    ReplicationSelectors(ReplicationSelectors),
    LegacyReplicationSelectors(LegacyReplicationSelectors),
    StrategySelectors(StrategySelectors),
    PdrmStrategySelectors(PdrmStrategySelectors),
    FaceStatus(FaceStatus),
    ForwarderStatus(ForwarderStatus),
}

impl Packet {
    /// Decode `block` according to its outer TLV type.
    ///
    /// Legacy type numbers are only recognised under [`SchemaVersion::Legacy`].
    pub fn decode(block: &Block, schema: SchemaVersion) -> Result<Self, PacketError> {
        let legacy = schema == SchemaVersion::Legacy;
        let packet = match block.typ() {
            tlv::ANNOUNCEMENT => Packet::Announcement(Announcement::from_block(block)?),
            tlv::HINT => Packet::Hint(Hint::from_block(block)?),
            tlv::VICINITY => Packet::Vicinity(Vicinity::from_block(block)?),
            tlv::VICINITY_DATA => Packet::VicinityData(VicinityData::from_block(block)?),
            tlv::REPLICATION_SELECTORS => {
                Packet::ReplicationSelectors(ReplicationSelectors::from_block(block)?)
            }
            tlv::STRATEGY_SELECTORS => {
                Packet::StrategySelectors(StrategySelectors::from_block(block)?)
            }
            tlv::PDRM_STRATEGY_SELECTORS => {
                Packet::PdrmStrategySelectors(PdrmStrategySelectors::from_block(block)?)
            }
            tlv::nfd::FACE_STATUS => Packet::FaceStatus(FaceStatus::from_block(block)?),
            tlv::CONTENT => Packet::ForwarderStatus(ForwarderStatus::from_block(block)?),
            tlv::LEGACY_HINT if legacy => Packet::LegacyHint(LegacyHint::from_block(block)?),
            tlv::LEGACY_REPLICATION_SELECTORS if legacy => {
                Packet::LegacyReplicationSelectors(LegacyReplicationSelectors::from_block(block)?)
            }
            other => {
                debug!("No {} schema decoder for TLV type {}", schema, other);
                return Err(PacketError::UnknownType(other));
            }
        };
        Ok(packet)
    }

    /// Decode raw bytes holding exactly one element.
    pub fn from_wire(bytes: &[u8], schema: SchemaVersion) -> Result<Self, PacketError> {
        let block = Block::from_slice(bytes).map_err(|source| {
            let typ = read_var_number(bytes, &mut 0).ok();
            match typ.and_then(kind_for_type) {
                Some(kind) => PacketError::Tlv { kind, source },
                None => PacketError::Malformed(source),
            }
        })?;
        Self::decode(&block, schema)
    }

    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Announcement(_) => PacketKind::Announcement,
            Packet::Hint(_) => PacketKind::Hint,
            Packet::LegacyHint(_) => PacketKind::LegacyHint,
            Packet::Vicinity(_) => PacketKind::Vicinity,
            Packet::VicinityData(_) => PacketKind::VicinityData,
            Packet::ReplicationSelectors(_) => PacketKind::ReplicationSelectors,
            Packet::LegacyReplicationSelectors(_) => PacketKind::LegacyReplicationSelectors,
            Packet::StrategySelectors(_) => PacketKind::StrategySelectors,
            Packet::PdrmStrategySelectors(_) => PacketKind::PdrmStrategySelectors,
            Packet::FaceStatus(_) => PacketKind::FaceStatus,
            Packet::ForwarderStatus(_) => PacketKind::ForwarderStatus,
        }
    }

    /// Name carried by the packet, if it has one.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Packet::Announcement(p) => Some(p.name()),
            Packet::Hint(p) => Some(p.name()),
            Packet::LegacyHint(p) => Some(p.name()),
            Packet::Vicinity(p) => Some(p.name()),
            Packet::VicinityData(p) => Some(p.name()),
            _ => None,
        }
    }

    pub fn wire_encode(&self) -> &Block {
        match self {
            Packet::Announcement(p) => p.wire_encode(),
            Packet::Hint(p) => p.wire_encode(),
            Packet::LegacyHint(p) => p.wire_encode(),
            Packet::Vicinity(p) => p.wire_encode(),
            Packet::VicinityData(p) => p.wire_encode(),
            Packet::ReplicationSelectors(p) => p.wire_encode(),
            Packet::LegacyReplicationSelectors(p) => p.wire_encode(),
            Packet::StrategySelectors(p) => p.wire_encode(),
            Packet::PdrmStrategySelectors(p) => p.wire_encode(),
            Packet::FaceStatus(p) => p.wire_encode(),
            Packet::ForwarderStatus(p) => p.wire_encode(),
        }
    }
}

/// Kind decoded for an outer TLV type under the legacy (widest) schema.
fn kind_for_type(typ: u64) -> Option<PacketKind> {
    Some(match typ {
        tlv::ANNOUNCEMENT => PacketKind::Announcement,
        tlv::HINT => PacketKind::Hint,
        tlv::VICINITY => PacketKind::Vicinity,
        tlv::VICINITY_DATA => PacketKind::VicinityData,
        tlv::REPLICATION_SELECTORS => PacketKind::ReplicationSelectors,
        tlv::STRATEGY_SELECTORS => PacketKind::StrategySelectors,
        tlv::PDRM_STRATEGY_SELECTORS => PacketKind::PdrmStrategySelectors,
        tlv::nfd::FACE_STATUS => PacketKind::FaceStatus,
        tlv::CONTENT => PacketKind::ForwarderStatus,
        tlv::LEGACY_HINT => PacketKind::LegacyHint,
        tlv::LEGACY_REPLICATION_SELECTORS => PacketKind::LegacyReplicationSelectors,
        _ => return None,
    })
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Announcement(p) => write!(f, "Announcement {}", p),
            Packet::Hint(p) => write!(f, "Hint {}", p),
            Packet::LegacyHint(p) => write!(f, "LegacyHint {}", p),
            Packet::Vicinity(p) => write!(f, "Vicinity {}", p),
            Packet::VicinityData(p) => write!(f, "VicinityData {}", p),
            Packet::FaceStatus(p) => write!(f, "{}", p),
            Packet::ForwarderStatus(p) => write!(f, "{}", p),
            other => write!(f, "{} ({} bytes)", other.kind(), other.wire_encode().size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TlvError;

    #[test]
    fn test_dispatch_by_type() {
        let hint = Hint::with_scope("/x".parse().unwrap(), 3);
        let packet = Packet::decode(hint.wire_encode(), SchemaVersion::Current).unwrap();
        assert_eq!(packet.kind(), PacketKind::Hint);
        assert_eq!(packet, Packet::Hint(hint));
        assert_eq!(packet.name().map(Name::to_string).as_deref(), Some("/x"));
        assert_eq!(packet.to_string(), "Hint /x?ndn.HintScope=3");
    }

    #[test]
    fn test_legacy_types_need_legacy_schema() {
        let legacy = LegacyHint::new("/x".parse().unwrap(), 10);
        let wire = legacy.wire_encode();

        assert_eq!(
            Packet::decode(wire, SchemaVersion::Current).unwrap_err(),
            PacketError::UnknownType(tlv::LEGACY_HINT)
        );
        let packet = Packet::decode(wire, SchemaVersion::Legacy).unwrap();
        assert_eq!(packet.kind(), PacketKind::LegacyHint);
    }

    #[test]
    fn test_current_types_decode_under_legacy_schema() {
        let vicinity = Vicinity::new("/v".parse().unwrap());
        let packet = Packet::from_wire(vicinity.wire_encode().wire(), SchemaVersion::Legacy).unwrap();
        assert_eq!(packet.kind(), PacketKind::Vicinity);
        assert_eq!(packet.wire_encode(), vicinity.wire_encode());
    }

    #[test]
    fn test_unknown_and_truncated() {
        assert_eq!(
            Packet::from_wire(&[5, 0], SchemaVersion::Current).unwrap_err(),
            PacketError::UnknownType(5)
        );
        let err = Packet::from_wire(&[201, 4, 7], SchemaVersion::Current).unwrap_err();
        assert_eq!(err.kind(), Some(PacketKind::Hint));

        let err = Packet::from_wire(&[0xFD, 0x01], SchemaVersion::Current).unwrap_err();
        assert!(matches!(err, PacketError::Malformed(TlvError::Truncated { .. })));
    }

    #[test]
    fn test_schema_version_parse() {
        assert_eq!("Legacy".parse::<SchemaVersion>(), Ok(SchemaVersion::Legacy));
        assert_eq!("current".parse::<SchemaVersion>(), Ok(SchemaVersion::Current));
        assert!("v3".parse::<SchemaVersion>().is_err());
        assert_eq!(SchemaVersion::default().to_string(), "current");
    }
}
