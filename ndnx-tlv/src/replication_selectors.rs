//! Replication selectors carried by a [`Hint`](crate::Hint).
//!
//! ```text
//! ReplicationSelectors ::= REPLICATION-SELECTORS-TYPE TLV-LENGTH
//!                            NodeID?
//!                            Interested?
//!                            Availability?
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::tlv;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicationSelectors {
    node_id: Option<u64>,
    interested: bool,
    availability: Option<u64>,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl ReplicationSelectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field is set; an empty selector is not encoded by its parent.
    pub fn is_empty(&self) -> bool {
        self.node_id.is_none() && !self.interested && self.availability.is_none()
    }

    pub fn node_id(&self) -> Option<u64> {
        self.node_id
    }

    pub fn set_node_id(&mut self, node_id: Option<u64>) -> &mut Self {
        self.node_id = node_id;
        self.wire.take();
        self
    }

    pub fn interested(&self) -> bool {
        self.interested
    }

    pub fn set_interested(&mut self, interested: bool) -> &mut Self {
        self.interested = interested;
        self.wire.take();
        self
    }

    pub fn availability(&self) -> Option<u64> {
        self.availability
    }

    pub fn set_availability(&mut self, availability: Option<u64>) -> &mut Self {
        self.availability = availability;
        self.wire.take();
        self
    }

    pub fn has_wire(&self) -> bool {
        self.wire.get().is_some()
    }

    pub fn wire_encode(&self) -> &Block {
        self.wire.get_or_init(|| encode_block(self))
    }

    pub fn wire_decode(&mut self, block: &Block) -> Result<(), PacketError> {
        *self = Self::from_block(block)?;
        Ok(())
    }
}

impl WireEncode for ReplicationSelectors {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;

        if let Some(availability) = self.availability {
            total += encoder.prepend_non_negative_integer_block(tlv::AVAILABILITY, availability);
        }
        if self.interested {
            total += encoder.prepend_empty_block(tlv::INTERESTED);
        }
        if let Some(node_id) = self.node_id {
            total += encoder.prepend_non_negative_integer_block(tlv::NODE_ID, node_id);
        }

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::REPLICATION_SELECTORS);
        total
    }
}

impl WireDecode for ReplicationSelectors {
    const KIND: PacketKind = PacketKind::ReplicationSelectors;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let wire = expect_type(block, tlv::REPLICATION_SELECTORS, Self::KIND)?;
        Ok(ReplicationSelectors {
            node_id: find_u64(&wire, tlv::NODE_ID, Self::KIND)?,
            interested: wire.find(tlv::INTERESTED).is_some(),
            availability: find_u64(&wire, tlv::AVAILABILITY, Self::KIND)?,
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for ReplicationSelectors {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for ReplicationSelectors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selectors() {
        let selectors = ReplicationSelectors::new();
        assert!(selectors.is_empty());
        assert_eq!(selectors.wire_encode().wire().as_ref(), &[204, 0]);
    }

    #[test]
    fn test_encode_decode_all_fields() {
        let mut selectors = ReplicationSelectors::new();
        selectors
            .set_node_id(Some(7))
            .set_interested(true)
            .set_availability(Some(80));
        assert!(!selectors.is_empty());

        let wire = selectors.wire_encode();
        assert_eq!(
            wire.wire().as_ref(),
            &[204, 8, 214, 1, 7, 215, 0, 216, 1, 80]
        );

        let decoded = ReplicationSelectors::from_block(wire).unwrap();
        assert_eq!(decoded.node_id(), Some(7));
        assert!(decoded.interested());
        assert_eq!(decoded.availability(), Some(80));
        assert_eq!(decoded, selectors);
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut selectors = ReplicationSelectors::new();
        selectors.set_interested(true);
        let before = selectors.wire_encode().clone();

        selectors.set_interested(false);
        assert!(!selectors.has_wire());
        assert_ne!(selectors.wire_encode(), &before);
    }

    #[test]
    fn test_unexpected_type() {
        let block = Block::from_slice(&[205, 0]).unwrap();
        assert_eq!(
            ReplicationSelectors::from_block(&block).unwrap_err(),
            PacketError::UnexpectedType {
                kind: PacketKind::ReplicationSelectors,
                expected: 204,
                actual: 205
            }
        );
    }
}
