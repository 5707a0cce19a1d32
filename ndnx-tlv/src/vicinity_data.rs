//! Reply to a [`Vicinity`](crate::Vicinity) discovery request.
//!
//! ```text
//! VicinityData ::= VICINITY-DATA-TYPE TLV-LENGTH
//!                    Name
//!                    NodeID?
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VicinityData {
    name: Name,
    node_id: Option<u64>,
    #[serde(skip)]
    local_control_header: LocalControlHeader,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl VicinityData {
    pub fn new(name: Name) -> Self {
        VicinityData {
            name,
            ..Default::default()
        }
    }

    pub fn with_node_id(name: Name, node_id: u64) -> Self {
        VicinityData {
            name,
            node_id: Some(node_id),
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

    pub fn node_id(&self) -> Option<u64> {
        self.node_id
    }

    pub fn set_node_id(&mut self, node_id: Option<u64>) -> &mut Self {
        self.node_id = node_id;
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

impl WireEncode for VicinityData {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;
        if let Some(node_id) = self.node_id {
            total += encoder.prepend_non_negative_integer_block(tlv::NODE_ID, node_id);
        }
        total += self.name.encode_into(encoder);

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::VICINITY_DATA);
        total
    }
}

impl WireDecode for VicinityData {
    const KIND: PacketKind = PacketKind::VicinityData;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::VICINITY_DATA, kind)?;

        let name_block = wire.get(tlv::NAME).map_err(PacketError::tlv(kind))?;
        let name = Name::from_block(name_block).map_err(PacketError::tlv(kind))?;

        Ok(VicinityData {
            name,
            node_id: find_u64(&wire, tlv::NODE_ID, kind)?,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for VicinityData {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for VicinityData {}

impl fmt::Display for VicinityData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(node_id) = self.node_id {
            write!(f, "?ndn.VicinityDataNodeID={}", node_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_node_id() {
        let data = VicinityData::with_node_id("/campus".parse().unwrap(), 300);
        let wire = data.wire_encode();
        assert_eq!(
            wire.find(tlv::NODE_ID).map(Block::value),
            Some(&[0x01u8, 0x2C][..])
        );

        let decoded = VicinityData::from_wire(wire.wire()).unwrap();
        assert_eq!(decoded.node_id(), Some(300));
        assert_eq!(decoded, data);
        assert_eq!(decoded.to_string(), "/campus?ndn.VicinityDataNodeID=300");
    }

    #[test]
    fn test_absent_node_id() {
        let data = VicinityData::new("/campus".parse().unwrap());
        assert!(data.wire_encode().find(tlv::NODE_ID).is_none());
        let decoded = VicinityData::from_block(data.wire_encode()).unwrap();
        assert_eq!(decoded.node_id(), None);
        assert_eq!(decoded.to_string(), "/campus");
    }

    #[test]
    fn test_node_id_zero_is_encoded() {
        let data = VicinityData::with_node_id(Name::new(), 0);
        assert_eq!(data.wire_encode().wire().as_ref(), &[203, 5, 0x07, 0x00, 214, 1, 0]);
    }

    #[test]
    fn test_setter_invalidates_cache() {
        let mut data = VicinityData::new(Name::new());
        data.wire_encode();
        data.set_node_id(Some(1));
        assert!(!data.has_wire());
        assert!(data.wire_encode().find(tlv::NODE_ID).is_some());
    }

    #[test]
    fn test_type_mismatch_leaves_object_unchanged() {
        let mut data = VicinityData::with_node_id("/keep".parse().unwrap(), 12);
        let before = data.clone();

        // Vicinity with Name "/"
        let vicinity = Block::from_slice(&[202, 2, 0x07, 0x00]).unwrap();
        assert_eq!(
            data.wire_decode(&vicinity).unwrap_err(),
            PacketError::UnexpectedType {
                kind: PacketKind::VicinityData,
                expected: tlv::VICINITY_DATA,
                actual: tlv::VICINITY
            }
        );
        assert_eq!(data, before);
        assert_eq!(data.node_id(), Some(12));
    }
}
