//! Legacy name+size Hint.
//!
//! ```text
//! LegacyHint ::= LEGACY-HINT-TYPE TLV-LENGTH
//!                  Name
//!                  Size
//!                  HintScope?
//!                  LegacyReplicationSelectors?
//! ```

use std::fmt;

use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::replication_selectors::LegacyReplicationSelectors;
use crate::block::{read_non_negative_integer, Block};
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::exclude::Exclude;
use crate::hint::DEFAULT_HINT_SCOPE;
use crate::local_control::LocalControlHeader;
use crate::name::Name;
use crate::tlv;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyHint {
    name: Name,
    size: u64,
    scope: u64,
    selectors: LegacyReplicationSelectors,
    #[serde(skip)]
    local_control_header: LocalControlHeader,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl Default for LegacyHint {
    fn default() -> Self {
        LegacyHint {
            name: Name::new(),
            size: 0,
            scope: DEFAULT_HINT_SCOPE,
            selectors: LegacyReplicationSelectors::default(),
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::new(),
        }
    }
}

impl LegacyHint {
    pub fn new(name: Name, size: u64) -> Self {
        LegacyHint {
            name,
            size,
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

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn set_size(&mut self, size: u64) -> &mut Self {
        self.size = size;
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

    pub fn selectors(&self) -> &LegacyReplicationSelectors {
        &self.selectors
    }

    pub fn set_selectors(&mut self, selectors: LegacyReplicationSelectors) -> &mut Self {
        self.selectors = selectors;
        self.wire.take();
        self
    }

    pub fn exclude(&self) -> &Exclude {
        self.selectors.exclude()
    }

    pub fn set_exclude(&mut self, exclude: Exclude) -> &mut Self {
        self.selectors.set_exclude(exclude);
        self.wire.take();
        self
    }

    pub fn must_be_fresh(&self) -> bool {
        self.selectors.must_be_fresh()
    }

    pub fn set_must_be_fresh(&mut self, must_be_fresh: bool) -> &mut Self {
        self.selectors.set_must_be_fresh(must_be_fresh);
        self.wire.take();
        self
    }

    /// Prefix match that also rejects names whose first component past the
    /// prefix is excluded.
    pub fn matches_name(&self, name: &Name) -> bool {
        if !self.name.is_prefix_of(name) {
            return false;
        }
        match name.get(self.name.len()) {
            Some(next) => !self.exclude().is_excluded(next),
            None => true,
        }
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

impl WireEncode for LegacyHint {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;

        if self.has_selectors() {
            total += encoder.prepend_block(self.selectors.wire_encode());
        }
        if self.scope != DEFAULT_HINT_SCOPE {
            total += encoder.prepend_non_negative_integer_block(tlv::HINT_SCOPE, self.scope);
        }
        total += encoder.prepend_non_negative_integer_block(tlv::SIZE, self.size);
        total += self.name.encode_into(encoder);

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::LEGACY_HINT);
        total
    }
}

impl WireDecode for LegacyHint {
    const KIND: PacketKind = PacketKind::LegacyHint;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::LEGACY_HINT, kind)?;
        debug!("Decoding legacy Hint ({} bytes)", wire.size());

        let name_block = wire.get(tlv::NAME).map_err(PacketError::tlv(kind))?;
        let name = Name::from_block(name_block).map_err(PacketError::tlv(kind))?;

        let size_block = wire
            .find(tlv::SIZE)
            .ok_or(PacketError::MissingField { kind, field: "Size" })?;
        let size = read_non_negative_integer(size_block).map_err(PacketError::tlv(kind))?;

        let scope = find_u64(&wire, tlv::HINT_SCOPE, kind)?.unwrap_or(DEFAULT_HINT_SCOPE);
        let selectors = match wire.find(tlv::LEGACY_REPLICATION_SELECTORS) {
            Some(element) => LegacyReplicationSelectors::from_block(element)?,
            None => LegacyReplicationSelectors::default(),
        };

        Ok(LegacyHint {
            name,
            size,
            scope,
            selectors,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for LegacyHint {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for LegacyHint {}

impl fmt::Display for LegacyHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        let mut delim = '?';

        if self.scope != DEFAULT_HINT_SCOPE {
            write!(f, "{}ndn.HintScope={}", delim, self.scope)?;
            delim = '&';
        }
        if self.must_be_fresh() {
            write!(f, "{}ndn.MustBeFresh=1", delim)?;
            delim = '&';
        }
        if !self.exclude().is_empty() {
            write!(f, "{}ndn.Exclude={}", delim, self.exclude())?;
        }
        Ok(())
    }
}
