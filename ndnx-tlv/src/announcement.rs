//! Announcement packet.
//!
//! ```text
//! Announcement ::= ANNOUNCEMENT-TYPE TLV-LENGTH
//!                    Name
//!                    Nonce?
//!                    Timeout?
//! ```
//!
//! The nonce is four opaque bytes in host order on the wire. Once the packet
//! has been encoded, [`Announcement::set_nonce`] rewrites those bytes in the
//! cached encoding instead of re-encoding the whole packet.

use std::fmt;
use std::time::Duration;

use log::{debug, trace};
use once_cell::sync::OnceCell;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::block::{read_non_negative_integer, Block};
use crate::codec::{encode_block, expect_type, find_u64, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::local_control::LocalControlHeader;
use crate::name::Name;
use crate::tlv;

pub const DEFAULT_ANNOUNCEMENT_TIMEOUT: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    name: Name,
    nonce: Option<u32>,
    timeout: Duration,
    #[serde(skip)]
    local_control_header: LocalControlHeader,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl Default for Announcement {
    fn default() -> Self {
        Announcement {
            name: Name::new(),
            nonce: None,
            timeout: DEFAULT_ANNOUNCEMENT_TIMEOUT,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::new(),
        }
    }
}

impl Announcement {
    /// New announcement for `name` with a fresh random nonce.
    pub fn new(name: Name) -> Self {
        Announcement {
            name,
            nonce: Some(random_nonce()),
            ..Default::default()
        }
    }

    /// The timeout is truncated to whole milliseconds.
    pub fn with_timeout(name: Name, timeout: Duration) -> Self {
        Announcement {
            timeout: whole_millis(timeout),
            ..Self::new(name)
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

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The timeout is truncated to whole milliseconds.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = whole_millis(timeout);
        self.wire.take();
        self
    }

    pub fn has_nonce(&self) -> bool {
        self.nonce.is_some()
    }

    pub fn nonce(&self) -> Option<u32> {
        self.nonce
    }

    /// Current nonce, assigning a random one first if none is set.
    pub fn ensure_nonce(&mut self) -> u32 {
        match self.nonce {
            Some(nonce) => nonce,
            None => {
                let nonce = random_nonce();
                self.set_nonce(nonce);
                nonce
            }
        }
    }

    pub fn set_nonce(&mut self, nonce: u32) -> &mut Self {
        self.nonce = Some(nonce);
        let patched = self
            .wire
            .get_mut()
            .map_or(false, |wire| patch_nonce(wire, nonce));
        if !patched {
            self.wire.take();
        }
        self
    }

    /// Replace the nonce with a different random value. No-op without a nonce.
    pub fn refresh_nonce(&mut self) {
        let Some(old) = self.nonce else {
            return;
        };
        let mut nonce = random_nonce();
        while nonce == old {
            nonce = random_nonce();
        }
        self.set_nonce(nonce);
    }

    /// True if the announced name is a prefix of `name`.
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

    /// Replace all fields with those decoded from `block`.
    /// On error `self` is left as it was.
    pub fn wire_decode(&mut self, block: &Block) -> Result<(), PacketError> {
        let local_control_header = self.local_control_header;
        *self = Self::from_block(block)?;
        self.local_control_header = local_control_header;
        Ok(())
    }
}

/// Timeouts travel as integer milliseconds.
fn whole_millis(timeout: Duration) -> Duration {
    Duration::from_millis(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
}

fn random_nonce() -> u32 {
    rand::thread_rng().gen()
}

/// Overwrite a four-byte nonce inside an encoded announcement.
fn patch_nonce(wire: &mut Block, nonce: u32) -> bool {
    let Some((offset, element)) = wire.find_with_offset(tlv::NONCE) else {
        return false;
    };
    if element.value_size() != 4 {
        return false;
    }

    let at = offset + element.value_offset();
    match wire.patch(at, &nonce.to_ne_bytes()) {
        Ok(()) => {
            trace!("Patched cached Announcement nonce at offset {}", at);
            true
        }
        Err(e) => {
            debug!("Nonce patch failed, dropping cached encoding: {}", e);
            false
        }
    }
}

impl WireEncode for Announcement {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;

        if self.timeout != DEFAULT_ANNOUNCEMENT_TIMEOUT {
            let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            total += encoder.prepend_non_negative_integer_block(tlv::TIMEOUT, millis);
        }

        if let Some(nonce) = self.nonce {
            total += encoder.prepend_byte_array_block(tlv::NONCE, &nonce.to_ne_bytes());
        }

        total += self.name.encode_into(encoder);

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::ANNOUNCEMENT);
        total
    }
}

impl WireDecode for Announcement {
    const KIND: PacketKind = PacketKind::Announcement;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::ANNOUNCEMENT, kind)?;

        let name_block = wire.get(tlv::NAME).map_err(PacketError::tlv(kind))?;
        let name = Name::from_block(name_block).map_err(PacketError::tlv(kind))?;

        let nonce = match wire.find(tlv::NONCE) {
            Some(element) => Some(decode_nonce(element)?),
            None => None,
        };

        let timeout = find_u64(&wire, tlv::TIMEOUT, kind)?
            .map_or(DEFAULT_ANNOUNCEMENT_TIMEOUT, Duration::from_millis);

        Ok(Announcement {
            name,
            nonce,
            timeout,
            local_control_header: LocalControlHeader::default(),
            wire: OnceCell::from(wire),
        })
    }
}

fn decode_nonce(element: &Block) -> Result<u32, PacketError> {
    let kind = PacketKind::Announcement;
    if let Ok(bytes) = <[u8; 4]>::try_from(element.value()) {
        return Ok(u32::from_ne_bytes(bytes));
    }

    // Older senders encode the nonce as a NonNegativeInteger
    let value = read_non_negative_integer(element).map_err(PacketError::tlv(kind))?;
    u32::try_from(value).map_err(|_| PacketError::InvalidValue {
        kind,
        field: "Nonce",
        value,
    })
}

impl PartialEq for Announcement {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for Announcement {}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        let mut delim = '?';

        if self.timeout != DEFAULT_ANNOUNCEMENT_TIMEOUT {
            write!(f, "{}ndn.AnnouncementTimeout={}", delim, self.timeout.as_millis())?;
            delim = '&';
        }

        if let Some(nonce) = self.nonce {
            write!(f, "{}ndn.Nonce={}", delim, nonce)?;
        }
        Ok(())
    }
}
