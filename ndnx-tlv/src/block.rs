//! Parsed TLV elements.
//!
//! ```text
//! +-----------+-------------+-------------------+
//! | TLV-TYPE  | TLV-LENGTH  |     TLV-VALUE     |
//! | VAR-NUMBER| VAR-NUMBER  |  Length bytes     |
//! +-----------+-------------+-------------------+
//! ```
//!
//! VAR-NUMBER is one byte below 253, otherwise a marker byte (253, 254, 255)
//! followed by a big-endian u16, u32 or u64.

use bytes::{Bytes, BytesMut};

use crate::error::TlvError;

/// Read a VAR-NUMBER at `*pos`, advancing `*pos` past it.
pub fn read_var_number(buf: &[u8], pos: &mut usize) -> Result<u64, TlvError> {
    let first = match buf.get(*pos) {
        Some(b) => *b,
        None => {
            return Err(TlvError::Truncated {
                expected: 1,
                actual: 0,
            })
        }
    };

    let width = match first {
        0..=252 => {
            *pos += 1;
            return Ok(first as u64);
        }
        253 => 2,
        254 => 4,
        255 => 8,
    };

    let start = *pos + 1;
    let available = buf.len() - start;
    if available < width {
        return Err(TlvError::Truncated {
            expected: width,
            actual: available,
        });
    }

    let value = buf[start..start + width]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | *b as u64);
    *pos = start + width;
    Ok(value)
}

/// Number of bytes the VAR-NUMBER encoding of `n` occupies.
pub fn var_number_size(n: u64) -> usize {
    if n < 253 {
        1
    } else if n <= 0xFFFF {
        3
    } else if n <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

/// Number of bytes the NonNegativeInteger encoding of `n` occupies.
pub fn non_negative_integer_size(n: u64) -> usize {
    if n <= 0xFF {
        1
    } else if n <= 0xFFFF {
        2
    } else if n <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

/// A single TLV element backed by a shared byte buffer.
///
/// Child elements are only available after [`Block::parse`]; they are
/// slices of the same buffer, so parsing does not copy.
#[derive(Debug, Clone)]
pub struct Block {
    typ: u64,
    wire: Bytes,
    value_offset: usize,
    elements: Vec<Block>,
    parsed: bool,
}

impl Block {
    /// Decode exactly one element spanning the whole buffer.
    pub fn decode(wire: Bytes) -> Result<Self, TlvError> {
        let total = wire.len();
        let (block, used) = Self::decode_prefix(wire)?;
        if used != total {
            return Err(TlvError::TrailingBytes(total - used));
        }
        Ok(block)
    }

    /// Decode one element from the front of `buf`.
    /// Returns the element and the number of bytes it occupies.
    pub fn decode_prefix(buf: Bytes) -> Result<(Self, usize), TlvError> {
        let mut pos = 0;
        let typ = read_var_number(&buf, &mut pos)?;
        let length = read_var_number(&buf, &mut pos)?;
        let length = usize::try_from(length).map_err(|_| TlvError::LengthOverflow(length))?;

        let available = buf.len() - pos;
        if available < length {
            return Err(TlvError::Truncated {
                expected: length,
                actual: available,
            });
        }

        let end = pos + length;
        Ok((
            Block {
                typ,
                wire: buf.slice(..end),
                value_offset: pos,
                elements: Vec::new(),
                parsed: false,
            },
            end,
        ))
    }

    /// Copy `bytes` and decode them as one element.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TlvError> {
        Self::decode(Bytes::copy_from_slice(bytes))
    }

    /// Parsed element of type 0 with an empty value.
    pub(crate) fn empty() -> Self {
        Block {
            typ: 0,
            wire: Bytes::from_static(&[0, 0]),
            value_offset: 2,
            elements: Vec::new(),
            parsed: true,
        }
    }

    pub fn typ(&self) -> u64 {
        self.typ
    }

    /// Full encoding, header included.
    pub fn wire(&self) -> &Bytes {
        &self.wire
    }

    /// Encoded size, header included.
    pub fn size(&self) -> usize {
        self.wire.len()
    }

    pub fn value(&self) -> &[u8] {
        &self.wire[self.value_offset..]
    }

    pub fn value_size(&self) -> usize {
        self.wire.len() - self.value_offset
    }

    /// Offset of the TLV-VALUE inside [`Block::wire`].
    pub fn value_offset(&self) -> usize {
        self.value_offset
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Split the value into child elements. Idempotent.
    pub fn parse(&mut self) -> Result<(), TlvError> {
        if self.parsed {
            return Ok(());
        }

        let mut rest = self.wire.slice(self.value_offset..);
        let mut elements = Vec::new();
        while !rest.is_empty() {
            let (element, used) = Block::decode_prefix(rest.clone())?;
            rest = rest.slice(used..);
            elements.push(element);
        }

        self.elements = elements;
        self.parsed = true;
        Ok(())
    }

    /// Child elements in wire order. Empty until parsed.
    pub fn elements(&self) -> &[Block] {
        &self.elements
    }

    /// First child of type `typ`.
    pub fn find(&self, typ: u64) -> Option<&Block> {
        self.elements.iter().find(|e| e.typ == typ)
    }

    /// First child of type `typ`, or [`TlvError::MissingElement`].
    pub fn get(&self, typ: u64) -> Result<&Block, TlvError> {
        self.find(typ).ok_or(TlvError::MissingElement(typ))
    }

    /// First child of type `typ` with its byte offset inside [`Block::wire`].
    pub fn find_with_offset(&self, typ: u64) -> Option<(usize, &Block)> {
        let mut offset = self.value_offset;
        for element in &self.elements {
            if element.typ == typ {
                return Some((offset, element));
            }
            offset += element.size();
        }
        None
    }

    /// Overwrite `bytes.len()` bytes at `offset` of the encoding.
    ///
    /// The region must not cover any TLV header, so the element structure
    /// is unchanged. Buffers shared with earlier clones are left intact.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) -> Result<(), TlvError> {
        let end = offset.saturating_add(bytes.len());
        if offset < self.value_offset || end > self.wire.len() {
            return Err(TlvError::Truncated {
                expected: end,
                actual: self.wire.len(),
            });
        }

        let mut buf = BytesMut::from(&self.wire[..]);
        buf[offset..end].copy_from_slice(bytes);

        let mut patched = Block::decode(buf.freeze())?;
        if self.parsed {
            patched.parse()?;
        }
        *self = patched;
        Ok(())
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.wire == other.wire
    }
}

impl Eq for Block {}

/// Read the value of `block` as a NonNegativeInteger.
pub fn read_non_negative_integer(block: &Block) -> Result<u64, TlvError> {
    let value = block.value();
    match value.len() {
        1 | 2 | 4 | 8 => Ok(value.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)),
        n => Err(TlvError::InvalidNonNegativeInteger(n)),
    }
}
