//! Selectors for the PDRM forwarding strategy.
//!
//! ```text
//! PDRMStrategySelectors ::= PDRM-STRATEGY-SELECTORS-TYPE TLV-LENGTH
//!                             Scope?
//!                             NodeId?
//!                             HomeNetwork?
//!                             PreferredLocation?
//!                             TimeSpentAtPreferredLocation?
//!                             CurrentPosition?
//!                             Availability?
//!                             Interest?
//! ```
//!
//! Availability and time-spent are carried as NonNegativeIntegers; callers
//! that work with fractions scale them before encoding.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::tlv;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdrmStrategySelectors {
    scope: Option<u64>,
    node_id: Option<u64>,
    home_network: Option<u64>,
    preferred_location: Option<u64>,
    time_spent_at_preferred_location: Option<u64>,
    current_position: Option<u64>,
    availability: Option<u64>,
    interest: bool,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl PdrmStrategySelectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none()
            && self.node_id.is_none()
            && self.home_network.is_none()
            && self.preferred_location.is_none()
            && self.time_spent_at_preferred_location.is_none()
            && self.current_position.is_none()
            && self.availability.is_none()
            && !self.interest
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

    pub fn home_network(&self) -> Option<u64> {
        self.home_network
    }

    pub fn set_home_network(&mut self, home_network: Option<u64>) -> &mut Self {
        self.home_network = home_network;
        self.wire.take();
        self
    }

    pub fn preferred_location(&self) -> Option<u64> {
        self.preferred_location
    }

    pub fn set_preferred_location(&mut self, location: Option<u64>) -> &mut Self {
        self.preferred_location = location;
        self.wire.take();
        self
    }

    pub fn time_spent_at_preferred_location(&self) -> Option<u64> {
        self.time_spent_at_preferred_location
    }

    pub fn set_time_spent_at_preferred_location(&mut self, time_spent: Option<u64>) -> &mut Self {
        self.time_spent_at_preferred_location = time_spent;
        self.wire.take();
        self
    }

    pub fn current_position(&self) -> Option<u64> {
        self.current_position
    }

    pub fn set_current_position(&mut self, position: Option<u64>) -> &mut Self {
        self.current_position = position;
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

    pub fn interest(&self) -> bool {
        self.interest
    }

    pub fn set_interest(&mut self, interest: bool) -> &mut Self {
        self.interest = interest;
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

impl WireEncode for PdrmStrategySelectors {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let scalars = [
            (tlv::PDRM_SCOPE, self.scope),
            (tlv::PDRM_NODE_ID, self.node_id),
            (tlv::PDRM_HOME_NETWORK, self.home_network),
            (tlv::PDRM_PREFERRED_LOCATION, self.preferred_location),
            (
                tlv::PDRM_TIME_SPENT_AT_PREFERRED_LOCATION,
                self.time_spent_at_preferred_location,
            ),
            (tlv::PDRM_CURRENT_POSITION, self.current_position),
            (tlv::PDRM_AVAILABILITY, self.availability),
        ];

        let mut total = 0;
        if self.interest {
            total += encoder.prepend_empty_block(tlv::PDRM_INTEREST);
        }
        for (typ, value) in scalars.iter().rev() {
            if let Some(value) = value {
                total += encoder.prepend_non_negative_integer_block(*typ, *value);
            }
        }

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::PDRM_STRATEGY_SELECTORS);
        total
    }
}

impl WireDecode for PdrmStrategySelectors {
    const KIND: PacketKind = PacketKind::PdrmStrategySelectors;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::PDRM_STRATEGY_SELECTORS, kind)?;
        Ok(PdrmStrategySelectors {
            scope: find_u64(&wire, tlv::PDRM_SCOPE, kind)?,
            node_id: find_u64(&wire, tlv::PDRM_NODE_ID, kind)?,
            home_network: find_u64(&wire, tlv::PDRM_HOME_NETWORK, kind)?,
            preferred_location: find_u64(&wire, tlv::PDRM_PREFERRED_LOCATION, kind)?,
            time_spent_at_preferred_location: find_u64(
                &wire,
                tlv::PDRM_TIME_SPENT_AT_PREFERRED_LOCATION,
                kind,
            )?,
            current_position: find_u64(&wire, tlv::PDRM_CURRENT_POSITION, kind)?,
            availability: find_u64(&wire, tlv::PDRM_AVAILABILITY, kind)?,
            interest: wire.find(tlv::PDRM_INTEREST).is_some(),
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for PdrmStrategySelectors {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for PdrmStrategySelectors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> PdrmStrategySelectors {
        let mut selectors = PdrmStrategySelectors::new();
        selectors
            .set_scope(Some(3))
            .set_node_id(Some(11))
            .set_home_network(Some(2))
            .set_preferred_location(Some(5))
            .set_time_spent_at_preferred_location(Some(3600))
            .set_current_position(Some(6))
            .set_availability(Some(75))
            .set_interest(true);
        selectors
    }

    #[test]
    fn test_wire_order() {
        let selectors = populated();
        let types: Vec<u64> = selectors
            .wire_encode()
            .elements()
            .iter()
            .map(Block::typ)
            .collect();
        assert_eq!(types, (220..=227).collect::<Vec<u64>>());
    }

    #[test]
    fn test_encode_decode() {
        let selectors = populated();
        let decoded = PdrmStrategySelectors::from_block(selectors.wire_encode()).unwrap();
        assert_eq!(decoded.scope(), Some(3));
        assert_eq!(decoded.node_id(), Some(11));
        assert_eq!(decoded.home_network(), Some(2));
        assert_eq!(decoded.preferred_location(), Some(5));
        assert_eq!(decoded.time_spent_at_preferred_location(), Some(3600));
        assert_eq!(decoded.current_position(), Some(6));
        assert_eq!(decoded.availability(), Some(75));
        assert!(decoded.interest());
        assert_eq!(decoded, selectors);
    }

    #[test]
    fn test_scope_alone_is_not_empty() {
        let mut selectors = PdrmStrategySelectors::new();
        assert!(selectors.is_empty());
        selectors.set_scope(Some(1));
        assert!(!selectors.is_empty());
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut selectors = populated();
        let before = selectors.wire_encode().clone();

        selectors.set_current_position(Some(7));
        assert!(!selectors.has_wire());
        let after = selectors.wire_encode();
        assert_ne!(after, &before);
        let decoded = PdrmStrategySelectors::from_block(after).unwrap();
        assert_eq!(decoded.current_position(), Some(7));

        selectors.set_interest(false);
        assert!(selectors.wire_encode().find(tlv::PDRM_INTEREST).is_none());
    }

    #[test]
    fn test_type_mismatch_leaves_selectors_unchanged() {
        let mut selectors = populated();
        let before = selectors.clone();

        // StrategySelectors block with Scope 1
        let strategy = Block::from_slice(&[205, 3, 212, 1, 1]).unwrap();
        assert_eq!(
            selectors.wire_decode(&strategy).unwrap_err(),
            PacketError::UnexpectedType {
                kind: PacketKind::PdrmStrategySelectors,
                expected: tlv::PDRM_STRATEGY_SELECTORS,
                actual: tlv::STRATEGY_SELECTORS
            }
        );
        assert_eq!(selectors, before);
        assert_eq!(selectors.scope(), Some(3));
    }

    #[test]
    fn test_decode_replaces_previous_state() {
        let mut selectors = populated();
        let sparse = Block::from_slice(&[206, 3, 221, 1, 9]).unwrap();
        selectors.wire_decode(&sparse).unwrap();
        assert_eq!(selectors.node_id(), Some(9));
        assert_eq!(selectors.scope(), None);
        assert!(!selectors.interest());
        assert!(selectors.has_wire());
    }
}
