//! NDN names and name components.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::WireEncode;
use crate::encoding::Encoder;
use crate::error::TlvError;
use crate::tlv;

/// One opaque name component.
///
/// Ordered canonically: shorter components first, equal lengths compared
/// byte by byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component(Vec<u8>);

impl Component {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Component(value.into())
    }

    pub fn value(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse one URI-escaped component.
    pub fn from_escaped(s: &str) -> Result<Self, TlvError> {
        let decoded = percent_decode(s)?;
        if !decoded.is_empty() && decoded.iter().all(|b| *b == b'.') {
            if decoded.len() < 3 {
                return Err(TlvError::InvalidUri(format!("illegal component {s:?}")));
            }
            return Ok(Component(decoded[3..].to_vec()));
        }
        Ok(Component(decoded))
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Component {
    fn from(value: &str) -> Self {
        Component(value.as_bytes().to_vec())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Components made only of periods get three extra periods
        if self.0.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        for b in &self.0 {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

fn percent_decode(s: &str) -> Result<Vec<u8>, TlvError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| TlvError::InvalidUri(format!("bad percent escape in {s:?}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Hierarchical NDN name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The empty name `/`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn append(&mut self, component: impl Into<Component>) -> &mut Self {
        self.components.push(component.into());
        self
    }

    /// True if every component of `self` equals the same-position component of `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// Decode a Name element.
    pub fn from_block(block: &Block) -> Result<Self, TlvError> {
        if block.typ() != tlv::NAME {
            return Err(TlvError::InvalidName(format!(
                "expected TLV type {}, got {}",
                tlv::NAME,
                block.typ()
            )));
        }

        let mut wire = block.clone();
        wire.parse()?;
        let components = wire
            .elements()
            .iter()
            .map(|e| {
                if e.typ() == tlv::NAME_COMPONENT {
                    Ok(Component(e.value().to_vec()))
                } else {
                    Err(TlvError::InvalidName(format!(
                        "unsupported component type {}",
                        e.typ()
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Name { components })
    }
}

impl WireEncode for Name {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;
        for component in self.components.iter().rev() {
            total += encoder.prepend_byte_array_block(tlv::NAME_COMPONENT, component.value());
        }
        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::NAME);
        total
    }
}

impl FromStr for Name {
    type Err = TlvError;

    /// Parse an NDN URI such as `/a/b`, `ndn:/a/b` or `ndn://authority/a/b`.
    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let mut path = uri.trim();
        if let Some(rest) = path.strip_prefix("ndn:") {
            path = rest;
        }
        if let Some(rest) = path.strip_prefix("//") {
            path = rest.find('/').map_or("", |i| &rest[i..]);
        }
        if let Some(end) = path.find(['?', '#']) {
            path = &path[..end];
        }

        let components = path
            .split('/')
            .filter(|c| !c.is_empty())
            .map(Component::from_escaped)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Name { components })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for Name {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Name {
            components: iter.into_iter().map(Component::from).collect(),
        }
    }
}
