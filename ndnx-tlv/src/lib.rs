//! TLV codec for the NDN replication extension.
//!
//! This crate encodes and decodes the Announcement, Hint, Vicinity and
//! VicinityData packets, their selector sub-blocks, and the NFD FaceStatus /
//! ForwarderStatus management records.
//!
//! # Encoding
//!
//! Every type keeps its fields plus a lazily built wire cache. `wire_encode`
//! runs a size-estimation pass and then a prepend-only materialization pass,
//! caches the resulting [`Block`] and returns it. Every setter drops the cache.
//!
//! # Decoding
//!
//! Packets and selectors look up each child by type and fall back to
//! documented defaults; status records walk their children in a fixed order
//! and fail on the first missing required field.
//!
//! ```
//! use std::time::Duration;
//! use ndnx_tlv::{Announcement, Hint, WireDecode};
//!
//! let announcement = Announcement::with_timeout("/a/b".parse()?, Duration::from_millis(6000));
//! let decoded = Announcement::from_block(announcement.wire_encode())?;
//! assert_eq!(decoded.timeout(), Duration::from_millis(6000));
//! assert!(decoded.has_nonce());
//!
//! // Default scope is not encoded
//! let hint = Hint::with_scope("/x".parse()?, 2);
//! assert!(hint.wire_encode().find(ndnx_tlv::tlv::HINT_SCOPE).is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod block;
pub mod codec;
pub mod encoding;
pub mod error;
pub mod exclude;
pub mod legacy;
pub mod management;
pub mod name;
pub mod tlv;

mod announcement;
mod hint;
mod local_control;
mod packet;
mod pdrm_strategy_selectors;
mod replication_selectors;
mod strategy_selectors;
mod vicinity;
mod vicinity_data;

pub use announcement::{Announcement, DEFAULT_ANNOUNCEMENT_TIMEOUT};
pub use block::Block;
pub use codec::{encode_block, to_bytes, try_encode_block, WireDecode, WireEncode};
pub use error::{PacketError, PacketKind, TlvError};
pub use exclude::{Exclude, ExcludeEntry};
pub use hint::{Hint, DEFAULT_HINT_SCOPE};
pub use local_control::LocalControlHeader;
pub use management::{
    FacePersistency, FaceScope, FaceStatus, ForwarderStatus, LinkType, TrafficCounters,
};
pub use name::{Component, Name};
pub use packet::{Packet, SchemaVersion};
pub use pdrm_strategy_selectors::PdrmStrategySelectors;
pub use replication_selectors::ReplicationSelectors;
pub use strategy_selectors::StrategySelectors;
pub use vicinity::{Vicinity, DEFAULT_VICINITY_SCOPE};
pub use vicinity_data::VicinityData;
