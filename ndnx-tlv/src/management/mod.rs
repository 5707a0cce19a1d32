//! NFD management status records.
//!
//! Unlike the packet types these are decoded positionally: every field must
//! appear in its fixed place, and all but a few are required.

mod face_status;
mod forwarder_status;

pub use face_status::FaceStatus;
pub use forwarder_status::ForwarderStatus;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::FieldReader;
use crate::encoding::Encoder;
use crate::error::PacketError;
use crate::tlv::nfd;

/// Per-kind packet counters shared by FaceStatus and ForwarderStatus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrafficCounters {
    pub n_in_interests: u64,
    pub n_in_datas: u64,
    pub n_in_announcements: u64,
    pub n_in_hints: u64,
    pub n_in_vicinities: u64,
    pub n_in_vicinity_datas: u64,
    pub n_out_interests: u64,
    pub n_out_datas: u64,
    pub n_out_announcements: u64,
    pub n_out_hints: u64,
    pub n_out_vicinities: u64,
    pub n_out_vicinity_datas: u64,
}

impl TrafficCounters {
    /// (TLV type, value) pairs in wire order.
    fn fields(&self) -> [(u64, u64); 12] {
        [
            (nfd::N_IN_INTERESTS, self.n_in_interests),
            (nfd::N_IN_DATAS, self.n_in_datas),
            (nfd::N_IN_ANNOUNCEMENTS, self.n_in_announcements),
            (nfd::N_IN_HINTS, self.n_in_hints),
            (nfd::N_IN_VICINITIES, self.n_in_vicinities),
            (nfd::N_IN_VICINITY_DATAS, self.n_in_vicinity_datas),
            (nfd::N_OUT_INTERESTS, self.n_out_interests),
            (nfd::N_OUT_DATAS, self.n_out_datas),
            (nfd::N_OUT_ANNOUNCEMENTS, self.n_out_announcements),
            (nfd::N_OUT_HINTS, self.n_out_hints),
            (nfd::N_OUT_VICINITIES, self.n_out_vicinities),
            (nfd::N_OUT_VICINITY_DATAS, self.n_out_vicinity_datas),
        ]
    }

    pub(crate) fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        self.fields()
            .iter()
            .rev()
            .map(|(typ, value)| encoder.prepend_non_negative_integer_block(*typ, *value))
            .sum()
    }

    pub(crate) fn read(reader: &mut FieldReader<'_>) -> Result<Self, PacketError> {
        Ok(TrafficCounters {
            n_in_interests: reader.required_u64(nfd::N_IN_INTERESTS, "NInInterests")?,
            n_in_datas: reader.required_u64(nfd::N_IN_DATAS, "NInDatas")?,
            n_in_announcements: reader.required_u64(nfd::N_IN_ANNOUNCEMENTS, "NInAnnouncements")?,
            n_in_hints: reader.required_u64(nfd::N_IN_HINTS, "NInHints")?,
            n_in_vicinities: reader.required_u64(nfd::N_IN_VICINITIES, "NInVicinities")?,
            n_in_vicinity_datas: reader.required_u64(nfd::N_IN_VICINITY_DATAS, "NInVicinityDatas")?,
            n_out_interests: reader.required_u64(nfd::N_OUT_INTERESTS, "NOutInterests")?,
            n_out_datas: reader.required_u64(nfd::N_OUT_DATAS, "NOutDatas")?,
            n_out_announcements: reader.required_u64(nfd::N_OUT_ANNOUNCEMENTS, "NOutAnnouncements")?,
            n_out_hints: reader.required_u64(nfd::N_OUT_HINTS, "NOutHints")?,
            n_out_vicinities: reader.required_u64(nfd::N_OUT_VICINITIES, "NOutVicinities")?,
            n_out_vicinity_datas: reader
                .required_u64(nfd::N_OUT_VICINITY_DATAS, "NOutVicinityDatas")?,
        })
    }
}

impl fmt::Display for TrafficCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Interests", self.n_in_interests, self.n_out_interests),
            ("Data", self.n_in_datas, self.n_out_datas),
            ("Announcement", self.n_in_announcements, self.n_out_announcements),
            ("Hint", self.n_in_hints, self.n_out_hints),
            ("Vicinity", self.n_in_vicinities, self.n_out_vicinities),
            ("VicinityData", self.n_in_vicinity_datas, self.n_out_vicinity_datas),
        ];
        for (i, (label, n_in, n_out)) in rows.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "  {}: {{in: {}, out: {}}}", label, n_in, n_out)?;
        }
        Ok(())
    }
}

/// Whether a face is local to the forwarder host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceScope {
    #[default]
    NonLocal = 0,
    Local = 1,
}

impl TryFrom<u64> for FaceScope {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FaceScope::NonLocal),
            1 => Ok(FaceScope::Local),
            _ => Err(value),
        }
    }
}

impl From<FaceScope> for u64 {
    fn from(scope: FaceScope) -> Self {
        scope as u64
    }
}

impl fmt::Display for FaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FaceScope::NonLocal => "non-local",
            FaceScope::Local => "local",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacePersistency {
    #[default]
    Persistent = 0,
    OnDemand = 1,
    Permanent = 2,
}

impl TryFrom<u64> for FacePersistency {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FacePersistency::Persistent),
            1 => Ok(FacePersistency::OnDemand),
            2 => Ok(FacePersistency::Permanent),
            _ => Err(value),
        }
    }
}

impl From<FacePersistency> for u64 {
    fn from(persistency: FacePersistency) -> Self {
        persistency as u64
    }
}

impl fmt::Display for FacePersistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FacePersistency::Persistent => "persistent",
            FacePersistency::OnDemand => "on-demand",
            FacePersistency::Permanent => "permanent",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    PointToPoint = 0,
    MultiAccess = 1,
}

impl TryFrom<u64> for LinkType {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LinkType::PointToPoint),
            1 => Ok(LinkType::MultiAccess),
            _ => Err(value),
        }
    }
}

impl From<LinkType> for u64 {
    fn from(link_type: LinkType) -> Self {
        link_type as u64
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkType::PointToPoint => "point-to-point",
            LinkType::MultiAccess => "multi-access",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::encoding::{EncodingBuffer, EncodingEstimator};
    use crate::error::PacketKind;

    fn sample() -> TrafficCounters {
        TrafficCounters {
            n_in_interests: 1,
            n_in_datas: 2,
            n_in_announcements: 3,
            n_in_hints: 4,
            n_in_vicinities: 5,
            n_in_vicinity_datas: 6,
            n_out_interests: 7,
            n_out_datas: 8,
            n_out_announcements: 9,
            n_out_hints: 10,
            n_out_vicinities: 11,
            n_out_vicinity_datas: 12,
        }
    }

    #[test]
    fn test_counters_read_back_in_order() {
        let counters = sample();
        let size = counters.encode_into(&mut EncodingEstimator::new());
        let mut buffer = EncodingBuffer::with_capacity(size + 2);
        let mut length = counters.encode_into(&mut buffer);
        length += buffer.prepend_var_number(length as u64);
        buffer.prepend_var_number(128);

        let mut block = Block::from_slice(buffer.as_slice()).unwrap();
        block.parse().unwrap();
        let types: Vec<u64> = block.elements().iter().map(Block::typ).collect();
        assert_eq!(types, vec![144, 145, 176, 177, 178, 179, 146, 147, 180, 181, 182, 183]);

        let mut reader = FieldReader::new(&block, PacketKind::FaceStatus);
        assert_eq!(TrafficCounters::read(&mut reader).unwrap(), counters);
    }

    #[test]
    fn test_enum_conversions() {
        assert_eq!(FaceScope::try_from(1), Ok(FaceScope::Local));
        assert_eq!(FaceScope::try_from(2), Err(2));
        assert_eq!(FacePersistency::try_from(2), Ok(FacePersistency::Permanent));
        assert_eq!(u64::from(FacePersistency::OnDemand), 1);
        assert_eq!(LinkType::try_from(1), Ok(LinkType::MultiAccess));
        assert_eq!(LinkType::MultiAccess.to_string(), "multi-access");
    }

    #[test]
    fn test_counters_display() {
        let text = sample().to_string();
        assert!(text.starts_with("  Interests: {in: 1, out: 7},\n"));
        assert!(text.ends_with("  VicinityData: {in: 6, out: 12}"));
    }
}
