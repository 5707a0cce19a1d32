//! Forwarding strategy selectors.
//!
//! ```text
//! StrategySelectors ::= STRATEGY-SELECTORS-TYPE TLV-LENGTH
//!                         Scope?
//!                         NodeId?
//!                         Interested?
//!                         Availability?
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::tlv;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategySelectors {
    scope: Option<u64>,
    node_id: Option<u64>,
    interested: bool,
    availability: Option<u64>,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl StrategySelectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none()
            && self.node_id.is_none()
            && !self.interested
            && self.availability.is_none()
    }

    pub fn scope(&self) -> Option<u64> {
        self.scope
    }

    pub fn set_scope(&mut self, scope: Option<u64>) -> &mut Self {
        self.scope = scope;
        self.wire.take();
        self
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

impl WireEncode for StrategySelectors {
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
        if let Some(scope) = self.scope {
            total += encoder.prepend_non_negative_integer_block(tlv::SCOPE, scope);
        }

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::STRATEGY_SELECTORS);
        total
    }
}

impl WireDecode for StrategySelectors {
    const KIND: PacketKind = PacketKind::StrategySelectors;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let wire = expect_type(block, tlv::STRATEGY_SELECTORS, Self::KIND)?;
        Ok(StrategySelectors {
            scope: find_u64(&wire, tlv::SCOPE, Self::KIND)?,
            node_id: find_u64(&wire, tlv::NODE_ID, Self::KIND)?,
            interested: wire.find(tlv::INTERESTED).is_some(),
            availability: find_u64(&wire, tlv::AVAILABILITY, Self::KIND)?,
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for StrategySelectors {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for StrategySelectors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_on_wire() {
        let mut selectors = StrategySelectors::new();
        selectors.set_availability(Some(3)).set_scope(Some(1));

        let wire = selectors.wire_encode();
        let types: Vec<u64> = wire.elements().iter().map(Block::typ).collect();
        assert_eq!(types, vec![tlv::SCOPE, tlv::AVAILABILITY]);
    }

    #[test]
    fn test_encode_decode() {
        let mut selectors = StrategySelectors::new();
        selectors
            .set_scope(Some(4))
            .set_node_id(Some(1024))
            .set_interested(true);

        let decoded = StrategySelectors::from_wire(selectors.wire_encode().wire()).unwrap();
        assert_eq!(decoded.scope(), Some(4));
        assert_eq!(decoded.node_id(), Some(1024));
        assert!(decoded.interested());
        assert_eq!(decoded.availability(), None);
        assert_eq!(decoded, selectors);
    }

    #[test]
    fn test_empty_and_equality() {
        let mut a = StrategySelectors::new();
        let b = StrategySelectors::new();
        assert!(a.is_empty());
        assert_eq!(a, b);

        a.set_node_id(Some(0));
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut selectors = StrategySelectors::new();
        selectors.set_scope(Some(1));
        let before = selectors.wire_encode().clone();
        assert!(selectors.has_wire());

        selectors.set_interested(true);
        assert!(!selectors.has_wire());
        let after = selectors.wire_encode();
        assert_ne!(after, &before);
        assert!(after.find(tlv::INTERESTED).is_some());
    }

    #[test]
    fn test_type_mismatch_leaves_selectors_unchanged() {
        let mut selectors = StrategySelectors::new();
        selectors.set_node_id(Some(8));
        let before = selectors.clone();

        // PDRM selectors block
        let pdrm = Block::from_slice(&[206, 3, 221, 1, 8]).unwrap();
        assert_eq!(
            selectors.wire_decode(&pdrm).unwrap_err(),
            PacketError::UnexpectedType {
                kind: PacketKind::StrategySelectors,
                expected: tlv::STRATEGY_SELECTORS,
                actual: tlv::PDRM_STRATEGY_SELECTORS
            }
        );
        assert_eq!(selectors, before);
        assert_eq!(selectors.node_id(), Some(8));
    }

    #[test]
    fn test_malformed_scalar() {
        let block = Block::from_slice(&[205, 5, 212, 3, 0, 0, 1]).unwrap();
        assert!(matches!(
            StrategySelectors::from_block(&block),
            Err(PacketError::Tlv {
                kind: PacketKind::StrategySelectors,
                ..
            })
        ));
    }
}
