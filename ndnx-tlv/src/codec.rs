//! Shared encode/decode skeleton for packet, selector and status types.
//!
//! Encoding: each type writes its fields in reverse declaration order into a
//! generic [`Encoder`], then its own TLV-LENGTH and TLV-TYPE. [`encode_block`]
//! runs that twice (estimate, then materialize) and returns a parsed block
//! suitable for caching.
//!
//! Decoding comes in two disciplines:
//! - random access (packets and selectors): [`expect_type`] then `find`/`get`
//!   on the parsed block, with defaults for absent optional fields;
//! - positional (status records): [`FieldReader`] walks the children once
//!   and fails on the first required field that is not next in line.

use std::iter::Peekable;
use std::slice;

use bytes::Bytes;
use log::error;

use crate::block::{read_non_negative_integer, Block};
use crate::encoding::{Encoder, EncodingBuffer, EncodingEstimator};
use crate::error::{PacketError, PacketKind, TlvError};

/// Types that can write themselves into any [`Encoder`].
pub trait WireEncode {
    /// Prepend the full TLV element. Returns the number of bytes written.
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize;
}

/// Types that can be built from a received TLV element.
pub trait WireDecode: Sized {
    /// Kind used to scope decode errors.
    const KIND: PacketKind;

    fn from_block(block: &Block) -> Result<Self, PacketError>;

    /// Decode from raw bytes holding exactly one element.
    fn from_wire(bytes: &[u8]) -> Result<Self, PacketError> {
        let block = Block::from_slice(bytes).map_err(PacketError::tlv(Self::KIND))?;
        Self::from_block(&block)
    }
}

/// Two-pass encode of `value` into a parsed [`Block`].
///
/// Encoding does not fail for well-formed types. If the encoder output
/// does not re-parse, the error is logged and an empty type-0 element is
/// returned instead, so decoders reject it as an unexpected type.
pub fn encode_block<T: WireEncode + ?Sized>(value: &T) -> Block {
    match try_encode_block(value) {
        Ok(block) => block,
        Err(e) => {
            debug_assert!(false, "encoder produced malformed TLV: {}", e);
            error!("Encoder produced malformed TLV: {}", e);
            Block::empty()
        }
    }
}

/// Two-pass encode of `value`, checking that the output parses.
pub fn try_encode_block<T: WireEncode + ?Sized>(value: &T) -> Result<Block, TlvError> {
    let estimated = value.encode_into(&mut EncodingEstimator::new());

    let mut buffer = EncodingBuffer::with_capacity(estimated);
    let written = value.encode_into(&mut buffer);
    debug_assert_eq!(estimated, written, "size estimate differs from encoded size");

    let mut block = buffer.into_block()?;
    block.parse()?;
    Ok(block)
}

/// Check the outer type of `block` and return a parsed copy of it.
pub(crate) fn expect_type(
    block: &Block,
    expected: u64,
    kind: PacketKind,
) -> Result<Block, PacketError> {
    if block.typ() != expected {
        return Err(PacketError::UnexpectedType {
            kind,
            expected,
            actual: block.typ(),
        });
    }
    let mut wire = block.clone();
    wire.parse().map_err(PacketError::tlv(kind))?;
    Ok(wire)
}

/// Read an optional NonNegativeInteger child of a parsed block.
pub(crate) fn find_u64(
    wire: &Block,
    typ: u64,
    kind: PacketKind,
) -> Result<Option<u64>, PacketError> {
    wire.find(typ)
        .map(|b| read_non_negative_integer(b).map_err(PacketError::tlv(kind)))
        .transpose()
}

/// Cursor over the children of a status record, enforcing field order.
pub(crate) struct FieldReader<'a> {
    kind: PacketKind,
    elements: Peekable<slice::Iter<'a, Block>>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(wire: &'a Block, kind: PacketKind) -> Self {
        FieldReader {
            kind,
            elements: wire.elements().iter().peekable(),
        }
    }

    /// Next element, which must have type `typ`.
    pub(crate) fn required(&mut self, typ: u64, field: &'static str) -> Result<&'a Block, PacketError> {
        self.elements
            .next_if(|b| b.typ() == typ)
            .ok_or(PacketError::MissingField {
                kind: self.kind,
                field,
            })
    }

    /// Next element if it has type `typ`; otherwise nothing is consumed.
    pub(crate) fn optional(&mut self, typ: u64) -> Option<&'a Block> {
        self.elements.next_if(|b| b.typ() == typ)
    }

    pub(crate) fn required_u64(&mut self, typ: u64, field: &'static str) -> Result<u64, PacketError> {
        let block = self.required(typ, field)?;
        read_non_negative_integer(block).map_err(PacketError::tlv(self.kind))
    }

    pub(crate) fn optional_u64(&mut self, typ: u64) -> Result<Option<u64>, PacketError> {
        let kind = self.kind;
        self.optional(typ)
            .map(|b| read_non_negative_integer(b).map_err(PacketError::tlv(kind)))
            .transpose()
    }

    /// Value bytes of the next element, read as text.
    pub(crate) fn required_string(&mut self, typ: u64, field: &'static str) -> Result<String, PacketError> {
        let block = self.required(typ, field)?;
        Ok(String::from_utf8_lossy(block.value()).into_owned())
    }
}

/// Encode `value` and return its bytes.
pub fn to_bytes<T: WireEncode + ?Sized>(value: &T) -> Bytes {
    encode_block(value).wire().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoder;

    struct Pair(u64, u64);

    impl WireEncode for Pair {
        fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
            let mut total = 0;
            total += encoder.prepend_non_negative_integer_block(2, self.1);
            total += encoder.prepend_non_negative_integer_block(1, self.0);
            total += encoder.prepend_var_number(total as u64);
            total += encoder.prepend_var_number(100);
            total
        }
    }

    #[test]
    fn test_encode_block_is_parsed() {
        let block = encode_block(&Pair(7, 300));
        assert_eq!(block.typ(), 100);
        assert!(block.is_parsed());
        assert_eq!(block.elements().len(), 2);
        assert_eq!(to_bytes(&Pair(7, 300)).as_ref(), &[100, 7, 1, 1, 7, 2, 2, 0x01, 0x2C]);
    }

    /// Claims a child of 5 bytes but writes none.
    struct Broken;

    impl WireEncode for Broken {
        fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
            let mut total = 0;
            total += encoder.prepend_var_number(5);
            total += encoder.prepend_var_number(1);
            total += encoder.prepend_var_number(total as u64);
            total += encoder.prepend_var_number(100);
            total
        }
    }

    #[test]
    fn test_try_encode_block_reports_malformed_output() {
        assert!(matches!(
            try_encode_block(&Broken),
            Err(TlvError::Truncated { expected: 5, actual: 0 })
        ));
        assert_eq!(try_encode_block(&Pair(7, 300)).unwrap(), encode_block(&Pair(7, 300)));
    }

    #[test]
    fn test_expect_type() {
        let block = encode_block(&Pair(1, 2));
        let err = expect_type(&block, 101, PacketKind::Vicinity).unwrap_err();
        assert_eq!(
            err,
            PacketError::UnexpectedType {
                kind: PacketKind::Vicinity,
                expected: 101,
                actual: 100
            }
        );

        let unparsed = Block::from_slice(block.wire()).unwrap();
        let parsed = expect_type(&unparsed, 100, PacketKind::Vicinity).unwrap();
        assert_eq!(find_u64(&parsed, 2, PacketKind::Vicinity).unwrap(), Some(2));
        assert_eq!(find_u64(&parsed, 3, PacketKind::Vicinity).unwrap(), None);
    }

    #[test]
    fn test_field_reader_enforces_order() {
        let block = encode_block(&Pair(1, 2));

        let mut reader = FieldReader::new(&block, PacketKind::FaceStatus);
        assert_eq!(reader.optional_u64(9).unwrap(), None);
        assert_eq!(reader.required_u64(1, "First").unwrap(), 1);
        assert_eq!(reader.required_u64(2, "Second").unwrap(), 2);
        assert_eq!(
            reader.required_u64(3, "Third"),
            Err(PacketError::MissingField {
                kind: PacketKind::FaceStatus,
                field: "Third"
            })
        );

        let mut reader = FieldReader::new(&block, PacketKind::FaceStatus);
        assert!(matches!(
            reader.required(2, "Second"),
            Err(PacketError::MissingField { field: "Second", .. })
        ));
    }
}
