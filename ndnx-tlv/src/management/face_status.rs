use std::fmt;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::{FacePersistency, FaceScope, LinkType, TrafficCounters};
use crate::block::Block;
use crate::codec::{encode_block, expect_type, FieldReader, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::tlv::nfd;

/// Status of one forwarder face.
///
/// ```text
/// FaceStatus ::= FACE-STATUS-TYPE TLV-LENGTH
///                  FaceId Uri LocalUri ExpirationPeriod?
///                  FaceScope FacePersistency LinkType
///                  NInInterests NInDatas NInAnnouncements NInHints
///                  NInVicinities NInVicinityDatas
///                  NOutInterests NOutDatas NOutAnnouncements NOutHints
///                  NOutVicinities NOutVicinityDatas
///                  NInBytes NOutBytes
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceStatus {
    face_id: u64,
    remote_uri: String,
    local_uri: String,
    expiration_period: Option<Duration>,
    face_scope: FaceScope,
    face_persistency: FacePersistency,
    link_type: LinkType,
    counters: TrafficCounters,
    n_in_bytes: u64,
    n_out_bytes: u64,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl FaceStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face_id(&self) -> u64 {
        self.face_id
    }

    pub fn set_face_id(&mut self, face_id: u64) -> &mut Self {
        self.face_id = face_id;
        self.wire.take();
        self
    }

    pub fn remote_uri(&self) -> &str {
        &self.remote_uri
    }

    pub fn set_remote_uri(&mut self, uri: impl Into<String>) -> &mut Self {
        self.remote_uri = uri.into();
        self.wire.take();
        self
    }

    pub fn local_uri(&self) -> &str {
        &self.local_uri
    }

    pub fn set_local_uri(&mut self, uri: impl Into<String>) -> &mut Self {
        self.local_uri = uri.into();
        self.wire.take();
        self
    }

    /// Remaining lifetime of the face; `None` means it does not expire.
    pub fn expiration_period(&self) -> Option<Duration> {
        self.expiration_period
    }

    pub fn set_expiration_period(&mut self, period: Option<Duration>) -> &mut Self {
        self.expiration_period = period;
        self.wire.take();
        self
    }

    pub fn face_scope(&self) -> FaceScope {
        self.face_scope
    }

    pub fn set_face_scope(&mut self, scope: FaceScope) -> &mut Self {
        self.face_scope = scope;
        self.wire.take();
        self
    }

    pub fn face_persistency(&self) -> FacePersistency {
        self.face_persistency
    }

    pub fn set_face_persistency(&mut self, persistency: FacePersistency) -> &mut Self {
        self.face_persistency = persistency;
        self.wire.take();
        self
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn set_link_type(&mut self, link_type: LinkType) -> &mut Self {
        self.link_type = link_type;
        self.wire.take();
        self
    }

    pub fn counters(&self) -> &TrafficCounters {
        &self.counters
    }

    pub fn set_counters(&mut self, counters: TrafficCounters) -> &mut Self {
        self.counters = counters;
        self.wire.take();
        self
    }

    /// Modify counters in place.
    pub fn update_counters(&mut self, f: impl FnOnce(&mut TrafficCounters)) -> &mut Self {
        f(&mut self.counters);
        self.wire.take();
        self
    }

    pub fn n_in_bytes(&self) -> u64 {
        self.n_in_bytes
    }

    pub fn set_n_in_bytes(&mut self, n: u64) -> &mut Self {
        self.n_in_bytes = n;
        self.wire.take();
        self
    }

    pub fn n_out_bytes(&self) -> u64 {
        self.n_out_bytes
    }

    pub fn set_n_out_bytes(&mut self, n: u64) -> &mut Self {
        self.n_out_bytes = n;
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

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl WireEncode for FaceStatus {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;

        total += encoder.prepend_non_negative_integer_block(nfd::N_OUT_BYTES, self.n_out_bytes);
        total += encoder.prepend_non_negative_integer_block(nfd::N_IN_BYTES, self.n_in_bytes);
        total += self.counters.encode_into(encoder);
        total += encoder.prepend_non_negative_integer_block(nfd::LINK_TYPE, self.link_type.into());
        total += encoder
            .prepend_non_negative_integer_block(nfd::FACE_PERSISTENCY, self.face_persistency.into());
        total += encoder.prepend_non_negative_integer_block(nfd::FACE_SCOPE, self.face_scope.into());
        if let Some(period) = self.expiration_period {
            total += encoder
                .prepend_non_negative_integer_block(nfd::EXPIRATION_PERIOD, duration_millis(period));
        }
        total += encoder.prepend_byte_array_block(nfd::LOCAL_URI, self.local_uri.as_bytes());
        total += encoder.prepend_byte_array_block(nfd::URI, self.remote_uri.as_bytes());
        total += encoder.prepend_non_negative_integer_block(nfd::FACE_ID, self.face_id);

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(nfd::FACE_STATUS);
        total
    }
}

impl WireDecode for FaceStatus {
    const KIND: PacketKind = PacketKind::FaceStatus;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, nfd::FACE_STATUS, kind)?;
        let mut reader = FieldReader::new(&wire, kind);

        let face_id = reader.required_u64(nfd::FACE_ID, "FaceId")?;
        let remote_uri = reader.required_string(nfd::URI, "Uri")?;
        let local_uri = reader.required_string(nfd::LOCAL_URI, "LocalUri")?;
        let expiration_period = reader
            .optional_u64(nfd::EXPIRATION_PERIOD)?
            .map(Duration::from_millis);

        let value = reader.required_u64(nfd::FACE_SCOPE, "FaceScope")?;
        let face_scope = FaceScope::try_from(value).map_err(|value| PacketError::InvalidValue {
            kind,
            field: "FaceScope",
            value,
        })?;
        let value = reader.required_u64(nfd::FACE_PERSISTENCY, "FacePersistency")?;
        let face_persistency =
            FacePersistency::try_from(value).map_err(|value| PacketError::InvalidValue {
                kind,
                field: "FacePersistency",
                value,
            })?;
        let value = reader.required_u64(nfd::LINK_TYPE, "LinkType")?;
        let link_type = LinkType::try_from(value).map_err(|value| PacketError::InvalidValue {
            kind,
            field: "LinkType",
            value,
        })?;

        let counters = TrafficCounters::read(&mut reader)?;
        let n_in_bytes = reader.required_u64(nfd::N_IN_BYTES, "NInBytes")?;
        let n_out_bytes = reader.required_u64(nfd::N_OUT_BYTES, "NOutBytes")?;

        Ok(FaceStatus {
            face_id,
            remote_uri,
            local_uri,
            expiration_period,
            face_scope,
            face_persistency,
            link_type,
            counters,
            n_in_bytes,
            n_out_bytes,
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for FaceStatus {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for FaceStatus {}

impl fmt::Display for FaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FaceStatus(FaceID: {},", self.face_id)?;
        writeln!(f, "RemoteUri: {},", self.remote_uri)?;
        writeln!(f, "LocalUri: {},", self.local_uri)?;
        match self.expiration_period {
            Some(period) => writeln!(f, "ExpirationPeriod: {}ms,", period.as_millis())?,
            None => writeln!(f, "ExpirationPeriod: infinite,")?,
        }
        writeln!(f, "FaceScope: {},", self.face_scope)?;
        writeln!(f, "FacePersistency: {},", self.face_persistency)?;
        writeln!(f, "LinkType: {},", self.link_type)?;
        writeln!(f, "Counters: {{")?;
        writeln!(f, "{},", self.counters)?;
        writeln!(f, "  bytes: {{in: {}, out: {}}} }})", self.n_in_bytes, self.n_out_bytes)
    }
}
