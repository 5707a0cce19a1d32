//! Vicinity discovery request.
//!
//! ```text
//! Vicinity ::= VICINITY-TYPE TLV-LENGTH
//!                Name
//!                Scope?
//! ```

use std::fmt;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::local_control::LocalControlHeader;
use crate::name::Name;
use crate::tlv;

/// Hop limit used when none is given.
pub const DEFAULT_VICINITY_SCOPE: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vicinity {
    name: Name,
    scope: u64,
    #[serde(skip)]
    local_control_header: LocalControlHeader,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl Default for Vicinity {
    fn default() -> Self {
        Vicinity {
            name: Name::new(),
            scope: DEFAULT_VICINITY_SCOPE,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::new(),
        }
    }
}

impl Vicinity {
    pub fn new(name: Name) -> Self {
        Vicinity {
            name,
            ..Default::default()
        }
    }

    pub fn with_scope(name: Name, scope: u64) -> Self {
        Vicinity {
            name,
            scope,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name = name;
        self.wire.take();
        self
    }

    pub fn scope(&self) -> u64 {
        self.scope
    }

    pub fn set_scope(&mut self, scope: u64) -> &mut Self {
        self.scope = scope;
        self.wire.take();
        self
    }

    pub fn matches_name(&self, name: &Name) -> bool {
        self.name.is_prefix_of(name)
    }

    pub fn local_control_header(&self) -> &LocalControlHeader {
        &self.local_control_header
    }

    pub fn local_control_header_mut(&mut self) -> &mut LocalControlHeader {
        &mut self.local_control_header
    }

    pub fn has_wire(&self) -> bool {
        self.wire.get().is_some()
    }

    pub fn wire_encode(&self) -> &Block {
        self.wire.get_or_init(|| encode_block(self))
    }

    pub fn wire_decode(&mut self, block: &Block) -> Result<(), PacketError> {
        let local_control_header = self.local_control_header;
        *self = Self::from_block(block)?;
        self.local_control_header = local_control_header;
        Ok(())
    }
}

impl WireEncode for Vicinity {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;
        if self.scope != DEFAULT_VICINITY_SCOPE {
            total += encoder.prepend_non_negative_integer_block(tlv::SCOPE, self.scope);
        }
        total += self.name.encode_into(encoder);

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::VICINITY);
        total
    }
}

impl WireDecode for Vicinity {
    const KIND: PacketKind = PacketKind::Vicinity;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::VICINITY, kind)?;

        let name_block = wire.get(tlv::NAME).map_err(PacketError::tlv(kind))?;
        let name = Name::from_block(name_block).map_err(PacketError::tlv(kind))?;
        let scope = find_u64(&wire, tlv::SCOPE, kind)?.unwrap_or(DEFAULT_VICINITY_SCOPE);

        Ok(Vicinity {
            name,
            scope,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for Vicinity {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for Vicinity {}

impl fmt::Display for Vicinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.scope != DEFAULT_VICINITY_SCOPE {
            write!(f, "?ndn.VicinityScope={}", self.scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let vicinity = Vicinity::with_scope("/campus/lab".parse().unwrap(), 4);
        let wire = vicinity.wire_encode();
        assert_eq!(wire.find(tlv::SCOPE).map(Block::value), Some(&[4u8][..]));

        let decoded = Vicinity::from_block(wire).unwrap();
        assert_eq!(decoded.scope(), 4);
        assert_eq!(decoded.name().to_string(), "/campus/lab");
        assert_eq!(decoded, vicinity);
        assert_eq!(decoded.to_string(), "/campus/lab?ndn.VicinityScope=4");
    }

    #[test]
    fn test_default_scope() {
        let vicinity = Vicinity::new("/a".parse().unwrap());
        assert_eq!(vicinity.scope(), DEFAULT_VICINITY_SCOPE);
        assert!(vicinity.wire_encode().find(tlv::SCOPE).is_none());
        assert_eq!(vicinity.to_string(), "/a");
    }

    #[test]
    fn test_decode_replaces_fields() {
        let mut vicinity = Vicinity::with_scope("/old".parse().unwrap(), 9);
        vicinity.local_control_header_mut().set_next_hop_face_id(5);

        let other = Vicinity::new("/new".parse().unwrap());
        vicinity.wire_decode(other.wire_encode()).unwrap();
        assert_eq!(vicinity.name().to_string(), "/new");
        assert_eq!(vicinity.scope(), DEFAULT_VICINITY_SCOPE);
        assert_eq!(vicinity.local_control_header().next_hop_face_id(), Some(5));
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut vicinity = Vicinity::new("/a".parse().unwrap());
        let before = vicinity.wire_encode().clone();
        vicinity.set_name("/b".parse().unwrap());
        assert!(!vicinity.has_wire());
        assert_ne!(vicinity.wire_encode(), &before);
    }

    #[test]
    fn test_unexpected_type() {
        let block = Block::from_slice(&[203, 2, 0x07, 0x00]).unwrap();
        let err = Vicinity::from_block(&block).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected TLV number when decoding Vicinity: expected 202, got 203"
        );
    }
}
