//! Exclude/MustBeFresh replication selectors of the legacy Hint schema.
//!
//! ```text
//! LegacyReplicationSelectors ::= LEGACY-REPLICATION-SELECTORS-TYPE TLV-LENGTH
//!                                  Exclude?
//!                                  MustBeFresh?
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::{encode_block, expect_type, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::exclude::Exclude;
use crate::tlv;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyReplicationSelectors {
    exclude: Exclude,
    must_be_fresh: bool,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl LegacyReplicationSelectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.exclude.is_empty() && !self.must_be_fresh
    }

    pub fn exclude(&self) -> &Exclude {
        &self.exclude
    }

    pub fn set_exclude(&mut self, exclude: Exclude) -> &mut Self {
        self.exclude = exclude;
        self.wire.take();
        self
    }

    pub fn must_be_fresh(&self) -> bool {
        self.must_be_fresh
    }

    pub fn set_must_be_fresh(&mut self, must_be_fresh: bool) -> &mut Self {
        self.must_be_fresh = must_be_fresh;
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

impl WireEncode for LegacyReplicationSelectors {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;
        if self.must_be_fresh {
            total += encoder.prepend_empty_block(tlv::MUST_BE_FRESH);
        }
        if !self.exclude.is_empty() {
            total += self.exclude.encode_into(encoder);
        }

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::LEGACY_REPLICATION_SELECTORS);
        total
    }
}

impl WireDecode for LegacyReplicationSelectors {
    const KIND: PacketKind = PacketKind::LegacyReplicationSelectors;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::LEGACY_REPLICATION_SELECTORS, kind)?;

        let exclude = match wire.find(tlv::EXCLUDE) {
            Some(element) => Exclude::from_block(element).map_err(PacketError::tlv(kind))?,
            None => Exclude::default(),
        };

        Ok(LegacyReplicationSelectors {
            exclude,
            must_be_fresh: wire.find(tlv::MUST_BE_FRESH).is_some(),
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for LegacyReplicationSelectors {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for LegacyReplicationSelectors {}
