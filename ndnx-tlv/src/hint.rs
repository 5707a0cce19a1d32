//! Hint packet.
//!
//! ```text
//! Hint ::= HINT-TYPE TLV-LENGTH
//!            Name
//!            HintScope?
//!            ReplicationSelectors?
//! ```
//!
//! The name+size schema that preceded this one lives in
//! [`legacy::LegacyHint`](crate::legacy::LegacyHint).

use std::fmt;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::local_control::LocalControlHeader;
use crate::name::Name;
use crate::replication_selectors::ReplicationSelectors;
use crate::tlv;

pub const DEFAULT_HINT_SCOPE: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hint {
    name: Name,
    scope: u64,
    selectors: ReplicationSelectors,
    #[serde(skip)]
    local_control_header: LocalControlHeader,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl Default for Hint {
    fn default() -> Self {
        Hint {
            name: Name::new(),
            scope: DEFAULT_HINT_SCOPE,
            selectors: ReplicationSelectors::default(),
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::new(),
        }
    }
}

impl Hint {
    pub fn new(name: Name) -> Self {
        Hint {
            name,
            ..Default::default()
        }
    }

    pub fn with_scope(name: Name, scope: u64) -> Self {
        Hint {
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

    pub fn has_selectors(&self) -> bool {
        !self.selectors.is_empty()
    }

    pub fn selectors(&self) -> &ReplicationSelectors {
        &self.selectors
    }

    pub fn set_selectors(&mut self, selectors: ReplicationSelectors) -> &mut Self {
        self.selectors = selectors;
        self.wire.take();
        self
    }

    pub fn node_id(&self) -> Option<u64> {
        self.selectors.node_id()
    }

    pub fn set_node_id(&mut self, node_id: Option<u64>) -> &mut Self {
        self.selectors.set_node_id(node_id);
        self.wire.take();
        self
    }

    pub fn interested(&self) -> bool {
        self.selectors.interested()
    }

    pub fn set_interested(&mut self, interested: bool) -> &mut Self {
        self.selectors.set_interested(interested);
        self.wire.take();
        self
    }

    pub fn availability(&self) -> Option<u64> {
        self.selectors.availability()
    }

    pub fn set_availability(&mut self, availability: Option<u64>) -> &mut Self {
        self.selectors.set_availability(availability);
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

impl WireEncode for Hint {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;

        if self.has_selectors() {
            total += encoder.prepend_block(self.selectors.wire_encode());
        }
        if self.scope != DEFAULT_HINT_SCOPE {
            total += encoder.prepend_non_negative_integer_block(tlv::HINT_SCOPE, self.scope);
        }
        total += self.name.encode_into(encoder);

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::HINT);
        total
    }
}

impl WireDecode for Hint {
    const KIND: PacketKind = PacketKind::Hint;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::HINT, kind)?;

        let name_block = wire.get(tlv::NAME).map_err(PacketError::tlv(kind))?;
        let name = Name::from_block(name_block).map_err(PacketError::tlv(kind))?;
        let scope = find_u64(&wire, tlv::HINT_SCOPE, kind)?.unwrap_or(DEFAULT_HINT_SCOPE);
        let selectors = match wire.find(tlv::REPLICATION_SELECTORS) {
            Some(element) => ReplicationSelectors::from_block(element)?,
            None => ReplicationSelectors::default(),
        };

        Ok(Hint {
            name,
            scope,
            selectors,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for Hint {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for Hint {}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.scope != DEFAULT_HINT_SCOPE {
            write!(f, "?ndn.HintScope={}", self.scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    #[test]
    fn test_default_scope_is_omitted() {
        let hint = Hint::with_scope(name("/x"), 2);
        let wire = hint.wire_encode();
        assert_eq!(wire.wire().as_ref(), &[201, 5, 0x07, 0x03, 0x08, 0x01, b'x']);
        assert!(wire.find(tlv::HINT_SCOPE).is_none());

        let decoded = Hint::from_block(wire).unwrap();
        assert_eq!(decoded.scope(), 2);
        assert_eq!(decoded, hint);
    }

    #[test]
    fn test_encode_decode_with_selectors() {
        let mut hint = Hint::with_scope(name("/video/seg"), 5);
        hint.set_node_id(Some(42)).set_interested(true);
        assert!(hint.has_selectors());

        let decoded = Hint::from_wire(hint.wire_encode().wire()).unwrap();
        assert_eq!(decoded.name(), &name("/video/seg"));
        assert_eq!(decoded.scope(), 5);
        assert_eq!(decoded.node_id(), Some(42));
        assert!(decoded.interested());
        assert_eq!(decoded.availability(), None);
        assert_eq!(decoded.selectors(), hint.selectors());
        assert_eq!(decoded.wire_encode(), hint.wire_encode());
    }

    #[test]
    fn test_selector_setter_invalidates_hint_cache() {
        let mut hint = Hint::new(name("/x"));
        let before = hint.wire_encode().clone();
        assert!(before.find(tlv::REPLICATION_SELECTORS).is_none());

        hint.set_availability(Some(10));
        assert!(!hint.has_wire());
        let after = hint.wire_encode();
        assert_ne!(after, &before);
        assert!(after.find(tlv::REPLICATION_SELECTORS).is_some());
    }

    #[test]
    fn test_set_selectors() {
        let mut selectors = ReplicationSelectors::new();
        selectors.set_interested(true);

        let mut hint = Hint::new(name("/x"));
        hint.wire_encode();
        hint.set_selectors(selectors.clone());
        assert!(!hint.has_wire());
        assert_eq!(hint.selectors(), &selectors);
    }

    #[test]
    fn test_equality_through_encoding() {
        let a = Hint::with_scope(name("/a"), 3);
        let mut b = Hint::new(name("/a"));
        assert_ne!(a, b);
        b.set_scope(3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nested_selector_error_propagates() {
        // ReplicationSelectors carrying a 3-byte NodeID
        let bytes = [201, 9, 0x07, 0x00, 204, 5, 214, 3, 1, 2, 3];
        let err = Hint::from_wire(&bytes).unwrap_err();
        assert_eq!(err.kind(), Some(PacketKind::ReplicationSelectors));
    }

    #[test]
    fn test_matches_name_and_display() {
        let hint = Hint::with_scope(name("/a"), 4);
        assert!(hint.matches_name(&name("/a/b")));
        assert!(!hint.matches_name(&name("/b")));
        assert_eq!(hint.to_string(), "/a?ndn.HintScope=4");
        assert_eq!(Hint::new(name("/a")).to_string(), "/a");
    }
}
