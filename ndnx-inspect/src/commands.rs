//! `decode` and `encode` subcommands.

use std::io::Write;
use std::time::Duration;

use bytes::Bytes;
use clap::Subcommand;
use log::{debug, info, warn};
use ndnx_tlv::{Announcement, Hint, Name, Packet, Vicinity, VicinityData};

use crate::config::DecodeSettings;
use crate::input::{parse_hex, split_blocks};

/// Outcome of a decode run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    pub decoded: usize,
    pub failed: usize,
}

/// Decode every top-level element in `data` and print one line (or one
/// multi-line report) per element.
///
/// Elements that fail to decode are logged and counted; the run continues
/// with the next element.
pub fn run_decode<W: Write>(
    data: &[u8],
    settings: DecodeSettings,
    json: bool,
    out: &mut W,
) -> Result<DecodeSummary, Box<dyn std::error::Error>> {
    let bytes = if settings.hex {
        Bytes::from(parse_hex(data)?)
    } else {
        Bytes::copy_from_slice(data)
    };
    debug!("Decoding {} bytes with {} schema", bytes.len(), settings.schema);

    let mut summary = DecodeSummary::default();
    for (offset, block) in split_blocks(bytes)? {
        match Packet::decode(&block, settings.schema) {
            Ok(packet) => {
                if json {
                    writeln!(out, "{}", serde_json::to_string(&packet)?)?;
                } else {
                    writeln!(out, "[{}] {}", offset, packet)?;
                }
                summary.decoded += 1;
            }
            Err(e) => {
                warn!("Element at offset {} (type {}): {}", offset, block.typ(), e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Decoded {} element(s), {} failed",
        summary.decoded, summary.failed
    );
    Ok(summary)
}

/// Packet to build with `encode`.
#[derive(Subcommand, Debug, Clone)]
pub enum EncodePacket {
    /// Announcement with optional timeout and nonce
    Announcement {
        name: Name,
        /// Announcement timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Fixed nonce instead of a random one
        #[arg(long)]
        nonce: Option<u32>,
    },
    /// Hint with optional scope and replication selectors
    Hint {
        name: Name,
        #[arg(long)]
        scope: Option<u64>,
        #[arg(long)]
        node_id: Option<u64>,
        #[arg(long)]
        interested: bool,
        #[arg(long)]
        availability: Option<u64>,
    },
    /// Vicinity with optional scope
    Vicinity {
        name: Name,
        #[arg(long)]
        scope: Option<u64>,
    },
    /// VicinityData with optional node id
    VicinityData {
        name: Name,
        #[arg(long)]
        node_id: Option<u64>,
    },
}

impl EncodePacket {
    pub fn build(&self) -> Packet {
        match self.clone() {
            EncodePacket::Announcement {
                name,
                timeout_ms,
                nonce,
            } => {
                let mut announcement = Announcement::new(name);
                if let Some(ms) = timeout_ms {
                    announcement.set_timeout(Duration::from_millis(ms));
                }
                if let Some(nonce) = nonce {
                    announcement.set_nonce(nonce);
                }
                Packet::Announcement(announcement)
            }
            EncodePacket::Hint {
                name,
                scope,
                node_id,
                interested,
                availability,
            } => {
                let mut hint = Hint::new(name);
                if let Some(scope) = scope {
                    hint.set_scope(scope);
                }
                hint.set_node_id(node_id)
                    .set_interested(interested)
                    .set_availability(availability);
                Packet::Hint(hint)
            }
            EncodePacket::Vicinity { name, scope } => {
                let mut vicinity = Vicinity::new(name);
                if let Some(scope) = scope {
                    vicinity.set_scope(scope);
                }
                Packet::Vicinity(vicinity)
            }
            EncodePacket::VicinityData { name, node_id } => {
                let mut data = VicinityData::new(name);
                data.set_node_id(node_id);
                Packet::VicinityData(data)
            }
        }
    }
}

/// Build the packet and write its wire form, raw or as one hex line.
pub fn run_encode<W: Write>(
    packet: &EncodePacket,
    hex: bool,
    out: &mut W,
) -> Result<Packet, Box<dyn std::error::Error>> {
    let packet = packet.build();
    let wire = packet.wire_encode().wire();
    debug!("Encoded {} ({} bytes)", packet.kind(), wire.len());

    if hex {
        writeln!(out, "{}", hex::encode(wire))?;
    } else {
        out.write_all(wire)?;
    }
    out.flush()?;
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndnx_tlv::{PacketKind, SchemaVersion, WireDecode};

    fn settings(hex: bool) -> DecodeSettings {
        DecodeSettings {
            schema: SchemaVersion::Current,
            hex,
        }
    }

    #[test]
    fn test_encode_hex_then_decode() {
        let request = EncodePacket::Vicinity {
            name: "/a".parse().unwrap(),
            scope: Some(5),
        };
        let mut encoded = Vec::new();
        run_encode(&request, true, &mut encoded).unwrap();

        let mut out = Vec::new();
        let summary = run_decode(&encoded, settings(true), false, &mut out).unwrap();
        assert_eq!(summary, DecodeSummary { decoded: 1, failed: 0 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[0] Vicinity /a?ndn.VicinityScope=5\n"
        );
    }

    #[test]
    fn test_encode_announcement_fields() {
        let request = EncodePacket::Announcement {
            name: "/x/y".parse().unwrap(),
            timeout_ms: Some(6000),
            nonce: Some(0x01020304),
        };
        let mut raw = Vec::new();
        let packet = run_encode(&request, false, &mut raw).unwrap();
        assert_eq!(packet.kind(), PacketKind::Announcement);

        let decoded = Announcement::from_wire(&raw).unwrap();
        assert_eq!(decoded.timeout(), Duration::from_millis(6000));
        assert_eq!(decoded.nonce(), Some(0x01020304));
    }

    #[test]
    fn test_encode_hint_selectors() {
        let request = EncodePacket::Hint {
            name: "/h".parse().unwrap(),
            scope: None,
            node_id: Some(7),
            interested: true,
            availability: None,
        };
        match request.build() {
            Packet::Hint(hint) => {
                assert_eq!(hint.scope(), ndnx_tlv::DEFAULT_HINT_SCOPE);
                assert!(hint.has_selectors());
                assert_eq!(hint.node_id(), Some(7));
                assert!(hint.interested());
            }
            other => panic!("unexpected packet: {:?}", other),
        }
    }

    #[test]
    fn test_decode_counts_failures() {
        let good = VicinityData::with_node_id("/d".parse().unwrap(), 3);
        let mut data = good.wire_encode().wire().to_vec();
        // Unknown type 5, empty
        data.extend_from_slice(&[5, 0]);
        data.extend_from_slice(good.wire_encode().wire());

        let mut out = Vec::new();
        let summary = run_decode(&data, settings(false), false, &mut out).unwrap();
        assert_eq!(summary, DecodeSummary { decoded: 2, failed: 1 });
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.ends_with("/d?ndn.VicinityDataNodeID=3")));
    }

    #[test]
    fn test_decode_json_lines() {
        let vicinity = Vicinity::new("/j".parse().unwrap());
        let mut out = Vec::new();
        run_decode(vicinity.wire_encode().wire(), settings(false), true, &mut out).unwrap();

        let line = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["kind"], "Vicinity");
    }

    #[test]
    fn test_decode_framing_error() {
        let mut out = Vec::new();
        assert!(run_decode(&[7, 9, 8], settings(false), false, &mut out).is_err());
        assert!(out.is_empty());
    }
}
