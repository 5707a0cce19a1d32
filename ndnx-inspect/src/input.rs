//! Reading wire dumps: raw bytes or hex text, one or more TLV elements.

use std::io::{self, Read};
use std::path::Path;

use bytes::Bytes;
use ndnx_tlv::{Block, TlvError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Malformed TLV at offset {offset}: {source}")]
    Framing {
        offset: usize,
        #[source]
        source: TlvError,
    },
}

/// Read the whole input; `-` means stdin.
pub fn read_input(path: &Path) -> Result<Vec<u8>, InputError> {
    let mut data = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut data)?;
    } else {
        data = std::fs::read(path)?;
    }
    Ok(data)
}

/// Parse a hex dump.
///
/// Whitespace is ignored and `#` starts a comment running to the end of the
/// line, so annotated dumps can be fed back in.
pub fn parse_hex(text: &[u8]) -> Result<Vec<u8>, InputError> {
    let mut digits = Vec::with_capacity(text.len());
    for line in text.split(|&b| b == b'\n') {
        let line = match line.iter().position(|&b| b == b'#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        digits.extend(line.iter().filter(|b| !b.is_ascii_whitespace()));
    }
    Ok(hex::decode(digits)?)
}

/// Split a buffer into consecutive top-level elements with their offsets.
pub fn split_blocks(data: Bytes) -> Result<Vec<(usize, Block)>, InputError> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (block, used) = Block::decode_prefix(data.slice(offset..))
            .map_err(|source| InputError::Framing { offset, source })?;
        blocks.push((offset, block));
        offset += used;
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_with_comments() {
        let text = b"# Vicinity /a\nCA 05  # outer\n07 03 08 01 61\n";
        assert_eq!(
            parse_hex(text).unwrap(),
            vec![0xCA, 0x05, 0x07, 0x03, 0x08, 0x01, 0x61]
        );
    }

    #[test]
    fn test_parse_hex_errors() {
        assert!(matches!(parse_hex(b"0"), Err(InputError::Hex(_))));
        assert!(matches!(parse_hex(b"zz"), Err(InputError::Hex(_))));
        assert_eq!(parse_hex(b"  \n# nothing\n").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_split_blocks() {
        let data = Bytes::from_static(&[7, 0, 21, 2, 1, 2, 10, 1, 9]);
        let blocks = split_blocks(data).unwrap();
        let offsets: Vec<usize> = blocks.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, vec![0, 2, 6]);
        assert_eq!(blocks[1].1.typ(), 21);
        assert_eq!(blocks[1].1.value(), &[1, 2]);
        assert_eq!(blocks[2].1.size(), 3);
    }

    #[test]
    fn test_split_truncated_tail() {
        let data = Bytes::from_static(&[7, 0, 21, 5, 1]);
        match split_blocks(data) {
            Err(InputError::Framing { offset, source }) => {
                assert_eq!(offset, 2);
                assert!(matches!(source, TlvError::Truncated { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_split_empty() {
        assert!(split_blocks(Bytes::new()).unwrap().is_empty());
    }
}
