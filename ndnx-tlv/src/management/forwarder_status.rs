use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::TrafficCounters;
use crate::block::Block;
use crate::codec::{encode_block, expect_type, FieldReader, WireDecode, WireEncode};
use crate::encoding::Encoder;
use crate::error::{PacketError, PacketKind};
use crate::tlv::{self, nfd};

/// General status of the forwarder, carried as the Content of a status
/// dataset reply. Timestamps travel as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwarderStatus {
    nfd_version: String,
    start_timestamp: DateTime<Utc>,
    current_timestamp: DateTime<Utc>,
    n_name_tree_entries: u64,
    n_fib_entries: u64,
    n_pit_entries: u64,
    n_measurements_entries: u64,
    n_cs_entries: u64,
    counters: TrafficCounters,
    #[serde(skip)]
    wire: OnceCell<Block>,
}

impl ForwarderStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nfd_version(&self) -> &str {
        &self.nfd_version
    }

    pub fn set_nfd_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.nfd_version = version.into();
        self.wire.take();
        self
    }

    pub fn start_timestamp(&self) -> DateTime<Utc> {
        self.start_timestamp
    }

    pub fn set_start_timestamp(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
        self.start_timestamp = timestamp;
        self.wire.take();
        self
    }

    pub fn current_timestamp(&self) -> DateTime<Utc> {
        self.current_timestamp
    }

    pub fn set_current_timestamp(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
        self.current_timestamp = timestamp;
        self.wire.take();
        self
    }

    pub fn n_name_tree_entries(&self) -> u64 {
        self.n_name_tree_entries
    }

    pub fn set_n_name_tree_entries(&mut self, n: u64) -> &mut Self {
        self.n_name_tree_entries = n;
        self.wire.take();
        self
    }

    pub fn n_fib_entries(&self) -> u64 {
        self.n_fib_entries
    }

    pub fn set_n_fib_entries(&mut self, n: u64) -> &mut Self {
        self.n_fib_entries = n;
        self.wire.take();
        self
    }

    pub fn n_pit_entries(&self) -> u64 {
        self.n_pit_entries
    }

    pub fn set_n_pit_entries(&mut self, n: u64) -> &mut Self {
        self.n_pit_entries = n;
        self.wire.take();
        self
    }

    pub fn n_measurements_entries(&self) -> u64 {
        self.n_measurements_entries
    }

    pub fn set_n_measurements_entries(&mut self, n: u64) -> &mut Self {
        self.n_measurements_entries = n;
        self.wire.take();
        self
    }

    pub fn n_cs_entries(&self) -> u64 {
        self.n_cs_entries
    }

    pub fn set_n_cs_entries(&mut self, n: u64) -> &mut Self {
        self.n_cs_entries = n;
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

    pub fn update_counters(&mut self, f: impl FnOnce(&mut TrafficCounters)) -> &mut Self {
        f(&mut self.counters);
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

/// Timestamps before the epoch are clamped to it.
fn to_millis(timestamp: DateTime<Utc>) -> u64 {
    u64::try_from(timestamp.timestamp_millis()).unwrap_or(0)
}

fn read_timestamp(
    reader: &mut FieldReader<'_>,
    typ: u64,
    field: &'static str,
) -> Result<DateTime<Utc>, PacketError> {
    let value = reader.required_u64(typ, field)?;
    i64::try_from(value)
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        .ok_or(PacketError::InvalidValue {
            kind: PacketKind::ForwarderStatus,
            field,
            value,
        })
}

impl WireEncode for ForwarderStatus {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;

        total += self.counters.encode_into(encoder);
        total += encoder.prepend_non_negative_integer_block(nfd::N_CS_ENTRIES, self.n_cs_entries);
        total += encoder
            .prepend_non_negative_integer_block(nfd::N_MEASUREMENTS_ENTRIES, self.n_measurements_entries);
        total += encoder.prepend_non_negative_integer_block(nfd::N_PIT_ENTRIES, self.n_pit_entries);
        total += encoder.prepend_non_negative_integer_block(nfd::N_FIB_ENTRIES, self.n_fib_entries);
        total += encoder
            .prepend_non_negative_integer_block(nfd::N_NAME_TREE_ENTRIES, self.n_name_tree_entries);
        total += encoder
            .prepend_non_negative_integer_block(nfd::CURRENT_TIMESTAMP, to_millis(self.current_timestamp));
        total += encoder
            .prepend_non_negative_integer_block(nfd::START_TIMESTAMP, to_millis(self.start_timestamp));
        total += encoder.prepend_byte_array_block(nfd::NFD_VERSION, self.nfd_version.as_bytes());

        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::CONTENT);
        total
    }
}

impl WireDecode for ForwarderStatus {
    const KIND: PacketKind = PacketKind::ForwarderStatus;

    fn from_block(block: &Block) -> Result<Self, PacketError> {
        let kind = Self::KIND;
        let wire = expect_type(block, tlv::CONTENT, kind)?;
        let mut reader = FieldReader::new(&wire, kind);

        let nfd_version = reader.required_string(nfd::NFD_VERSION, "NfdVersion")?;
        let start_timestamp = read_timestamp(&mut reader, nfd::START_TIMESTAMP, "StartTimestamp")?;
        let current_timestamp =
            read_timestamp(&mut reader, nfd::CURRENT_TIMESTAMP, "CurrentTimestamp")?;
        let n_name_tree_entries =
            reader.required_u64(nfd::N_NAME_TREE_ENTRIES, "NNameTreeEntries")?;
        let n_fib_entries = reader.required_u64(nfd::N_FIB_ENTRIES, "NFibEntries")?;
        let n_pit_entries = reader.required_u64(nfd::N_PIT_ENTRIES, "NPitEntries")?;
        let n_measurements_entries =
            reader.required_u64(nfd::N_MEASUREMENTS_ENTRIES, "NMeasurementsEntries")?;
        let n_cs_entries = reader.required_u64(nfd::N_CS_ENTRIES, "NCsEntries")?;
        let counters = TrafficCounters::read(&mut reader)?;

        Ok(ForwarderStatus {
            nfd_version,
            start_timestamp,
            current_timestamp,
            n_name_tree_entries,
            n_fib_entries,
            n_pit_entries,
            n_measurements_entries,
            n_cs_entries,
            counters,
            wire: OnceCell::from(wire),
        })
    }
}

impl PartialEq for ForwarderStatus {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for ForwarderStatus {}

impl fmt::Display for ForwarderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uptime = self.current_timestamp - self.start_timestamp;
        writeln!(f, "ForwarderStatus(Version: {},", self.nfd_version)?;
        writeln!(f, "StartTimestamp: {},", self.start_timestamp.to_rfc3339())?;
        writeln!(f, "CurrentTimestamp: {},", self.current_timestamp.to_rfc3339())?;
        writeln!(f, "Uptime: {}s,", uptime.num_seconds())?;
        writeln!(
            f,
            "Entries: {{NameTree: {}, Fib: {}, Pit: {}, Measurements: {}, Cs: {}}},",
            self.n_name_tree_entries,
            self.n_fib_entries,
            self.n_pit_entries,
            self.n_measurements_entries,
            self.n_cs_entries
        )?;
        writeln!(f, "Counters: {{")?;
        writeln!(f, "{} }})", self.counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ForwarderStatus {
        let mut status = ForwarderStatus::new();
        status
            .set_nfd_version("0.3.0-ndnx")
            .set_start_timestamp(Utc.timestamp_millis_opt(1_420_070_400_000).unwrap())
            .set_current_timestamp(Utc.timestamp_millis_opt(1_420_074_000_500).unwrap())
            .set_n_name_tree_entries(1849)
            .set_n_fib_entries(621)
            .set_n_pit_entries(48)
            .set_n_measurements_entries(12)
            .set_n_cs_entries(3000)
            .update_counters(|c| {
                c.n_in_announcements = 20;
                c.n_out_hints = 5;
            });
        status
    }

    #[test]
    fn test_encode_decode() {
        let status = sample();
        let wire = status.wire_encode();
        assert_eq!(wire.typ(), tlv::CONTENT);

        let decoded = ForwarderStatus::from_block(wire).unwrap();
        assert_eq!(decoded.nfd_version(), "0.3.0-ndnx");
        assert_eq!(decoded.start_timestamp().timestamp_millis(), 1_420_070_400_000);
        assert_eq!(decoded.current_timestamp().timestamp_millis(), 1_420_074_000_500);
        assert_eq!(decoded.n_cs_entries(), 3000);
        assert_eq!(decoded.counters().n_in_announcements, 20);
        assert_eq!(decoded, status);
    }

    #[test]
    fn test_default_timestamps_are_epoch() {
        let status = ForwarderStatus::new();
        let wire = status.wire_encode();
        let start = wire.get(nfd::START_TIMESTAMP).unwrap();
        assert_eq!(start.value(), &[0]);
    }

    #[test]
    fn test_missing_required_field() {
        // Content { NfdVersion "x" } only
        let bytes = [21, 3, 128, 1, b'x'];
        assert_eq!(
            ForwarderStatus::from_wire(&bytes).unwrap_err(),
            PacketError::MissingField {
                kind: PacketKind::ForwarderStatus,
                field: "StartTimestamp"
            }
        );
    }

    #[test]
    fn test_wrong_outer_type() {
        let err = ForwarderStatus::from_wire(&[128, 0]).unwrap_err();
        assert!(matches!(
            err,
            PacketError::UnexpectedType {
                kind: PacketKind::ForwarderStatus,
                expected: 21,
                actual: 128
            }
        ));
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert!(text.starts_with("ForwarderStatus(Version: 0.3.0-ndnx,\n"));
        assert!(text.contains("Uptime: 3600s,\n"));
        assert!(text.contains("Cs: 3000}"));
        assert!(text.ends_with("VicinityData: {in: 0, out: 0} })\n"));
    }
}
