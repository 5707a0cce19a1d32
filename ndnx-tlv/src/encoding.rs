//! Prepend-only TLV encoders.
//!
//! Encoding always runs back to front: the last field is written first and
//! the TLV header last, once the value length is known. The same field
//! sequence is run twice, first against [`EncodingEstimator`] to learn the
//! exact size, then against an [`EncodingBuffer`] allocated to that size.

use bytes::Bytes;

use crate::block::{non_negative_integer_size, var_number_size, Block};
use crate::error::TlvError;

/// Sink for prepended TLV bytes.
///
/// Every method returns the number of bytes it added.
pub trait Encoder {
    fn prepend_bytes(&mut self, bytes: &[u8]) -> usize;

    fn prepend_var_number(&mut self, n: u64) -> usize {
        let (buf, len) = var_number_bytes(n);
        self.prepend_bytes(&buf[..len])
    }

    fn prepend_non_negative_integer(&mut self, n: u64) -> usize {
        let width = non_negative_integer_size(n);
        let be = n.to_be_bytes();
        self.prepend_bytes(&be[8 - width..])
    }

    fn prepend_non_negative_integer_block(&mut self, typ: u64, n: u64) -> usize {
        let mut length = self.prepend_non_negative_integer(n);
        length += self.prepend_var_number(length as u64);
        length += self.prepend_var_number(typ);
        length
    }

    fn prepend_byte_array_block(&mut self, typ: u64, value: &[u8]) -> usize {
        let mut length = self.prepend_bytes(value);
        length += self.prepend_var_number(length as u64);
        length += self.prepend_var_number(typ);
        length
    }

    fn prepend_empty_block(&mut self, typ: u64) -> usize {
        let mut length = self.prepend_var_number(0);
        length += self.prepend_var_number(typ);
        length
    }

    /// Prepend an already encoded element verbatim.
    fn prepend_block(&mut self, block: &Block) -> usize {
        self.prepend_bytes(block.wire())
    }
}

fn var_number_bytes(n: u64) -> ([u8; 9], usize) {
    let mut out = [0u8; 9];
    let len = if n < 253 {
        out[0] = n as u8;
        1
    } else if n <= 0xFFFF {
        out[0] = 253;
        out[1..3].copy_from_slice(&(n as u16).to_be_bytes());
        3
    } else if n <= 0xFFFF_FFFF {
        out[0] = 254;
        out[1..5].copy_from_slice(&(n as u32).to_be_bytes());
        5
    } else {
        out[0] = 255;
        out[1..9].copy_from_slice(&n.to_be_bytes());
        9
    };
    (out, len)
}

/// Size-only encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingEstimator;

impl EncodingEstimator {
    pub fn new() -> Self {
        EncodingEstimator
    }
}

impl Encoder for EncodingEstimator {
    fn prepend_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.len()
    }

    fn prepend_var_number(&mut self, n: u64) -> usize {
        var_number_size(n)
    }

    fn prepend_non_negative_integer(&mut self, n: u64) -> usize {
        non_negative_integer_size(n)
    }
}

/// Materializing encoder that fills a buffer from the back.
#[derive(Debug, Clone)]
pub struct EncodingBuffer {
    buf: Vec<u8>,
    start: usize,
}

impl EncodingBuffer {
    /// Buffer with room for exactly `capacity` bytes before it has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        EncodingBuffer {
            buf: vec![0; capacity],
            start: capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encoded bytes so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    pub fn into_bytes(self) -> Bytes {
        let mut buf = self.buf;
        buf.drain(..self.start);
        Bytes::from(buf)
    }

    /// Decode the buffer contents as one element.
    pub fn into_block(self) -> Result<Block, TlvError> {
        Block::decode(self.into_bytes())
    }

    fn grow(&mut self, needed: usize) {
        let extra = (needed - self.start).max(self.buf.len());
        let mut grown = vec![0; extra + self.buf.len()];
        grown[extra..].copy_from_slice(&self.buf);
        self.buf = grown;
        self.start += extra;
    }
}

impl Default for EncodingBuffer {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl Encoder for EncodingBuffer {
    fn prepend_bytes(&mut self, bytes: &[u8]) -> usize {
        if bytes.len() > self.start {
            self.grow(bytes.len());
        }
        self.start -= bytes.len();
        self.buf[self.start..self.start + bytes.len()].copy_from_slice(bytes);
        bytes.len()
    }
}
