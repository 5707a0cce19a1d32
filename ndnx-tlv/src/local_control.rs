//! Per-packet face bookkeeping kept next to the packet fields.
//!
//! The header is local state of the forwarder, never part of the packet
//! encoding, so changing it leaves a packet's wire cache intact.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalControlHeader {
    incoming_face_id: Option<u64>,
    next_hop_face_id: Option<u64>,
}

impl LocalControlHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incoming_face_id(&self) -> Option<u64> {
        self.incoming_face_id
    }

    pub fn set_incoming_face_id(&mut self, face_id: u64) -> &mut Self {
        self.incoming_face_id = Some(face_id);
        self
    }

    pub fn next_hop_face_id(&self) -> Option<u64> {
        self.next_hop_face_id
    }

    pub fn set_next_hop_face_id(&mut self, face_id: u64) -> &mut Self {
        self.next_hop_face_id = Some(face_id);
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.incoming_face_id.is_none() && self.next_hop_face_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut header = LocalControlHeader::new();
        assert!(header.is_empty());

        header.set_incoming_face_id(260).set_next_hop_face_id(261);
        assert_eq!(header.incoming_face_id(), Some(260));
        assert_eq!(header.next_hop_face_id(), Some(261));
        assert!(!header.is_empty());

        header.clear();
        assert_eq!(header, LocalControlHeader::default());
    }
}
