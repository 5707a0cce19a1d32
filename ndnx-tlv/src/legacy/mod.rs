//! Superseded wire schemas.
//!
//! These use their own TLV numbers and are only accepted by
//! [`Packet::decode`](crate::Packet::decode) under
//! [`SchemaVersion::Legacy`](crate::SchemaVersion::Legacy).

mod hint;
mod replication_selectors;

pub use hint::LegacyHint;
pub use replication_selectors::LegacyReplicationSelectors;
