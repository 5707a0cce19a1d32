//! Exclude filter: listed components and open ranges between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::codec::WireEncode;
use crate::encoding::Encoder;
use crate::error::TlvError;
use crate::name::Component;
use crate::tlv;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcludeEntry {
    Component(Component),
    /// Excludes everything between the neighbouring components.
    Any,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclude {
    entries: Vec<ExcludeEntry>,
}

impl Exclude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ExcludeEntry] {
        &self.entries
    }

    pub fn exclude_one(&mut self, component: impl Into<Component>) -> &mut Self {
        self.entries.push(ExcludeEntry::Component(component.into()));
        self
    }

    /// Append an `Any` marker. A second consecutive marker is ignored.
    pub fn exclude_any(&mut self) -> &mut Self {
        if self.entries.last() != Some(&ExcludeEntry::Any) {
            self.entries.push(ExcludeEntry::Any);
        }
        self
    }

    pub fn is_excluded(&self, component: &Component) -> bool {
        for (i, entry) in self.entries.iter().enumerate() {
            match entry {
                ExcludeEntry::Component(c) if c == component => return true,
                ExcludeEntry::Component(_) => {}
                ExcludeEntry::Any => {
                    let lower = i
                        .checked_sub(1)
                        .and_then(|j| self.component_at(j));
                    let upper = self.component_at(i + 1);
                    let above = lower.map_or(true, |l| component > l);
                    let below = upper.map_or(true, |u| component < u);
                    if above && below {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn component_at(&self, index: usize) -> Option<&Component> {
        match self.entries.get(index) {
            Some(ExcludeEntry::Component(c)) => Some(c),
            _ => None,
        }
    }

    pub fn from_block(block: &Block) -> Result<Self, TlvError> {
        if block.typ() != tlv::EXCLUDE {
            return Err(TlvError::InvalidExclude(format!(
                "expected TLV type {}, got {}",
                tlv::EXCLUDE,
                block.typ()
            )));
        }

        let mut wire = block.clone();
        wire.parse()?;
        if wire.elements().is_empty() {
            return Err(TlvError::InvalidExclude("empty Exclude".to_string()));
        }

        let mut entries = Vec::with_capacity(wire.elements().len());
        for element in wire.elements() {
            match element.typ() {
                tlv::NAME_COMPONENT => {
                    entries.push(ExcludeEntry::Component(Component::new(element.value())))
                }
                tlv::ANY => {
                    if entries.last() == Some(&ExcludeEntry::Any) {
                        return Err(TlvError::InvalidExclude(
                            "two adjacent Any markers".to_string(),
                        ));
                    }
                    entries.push(ExcludeEntry::Any);
                }
                other => {
                    return Err(TlvError::InvalidExclude(format!(
                        "unexpected element type {}",
                        other
                    )))
                }
            }
        }
        Ok(Exclude { entries })
    }
}

impl WireEncode for Exclude {
    fn encode_into<E: Encoder>(&self, encoder: &mut E) -> usize {
        let mut total = 0;
        for entry in self.entries.iter().rev() {
            total += match entry {
                ExcludeEntry::Component(c) => {
                    encoder.prepend_byte_array_block(tlv::NAME_COMPONENT, c.value())
                }
                ExcludeEntry::Any => encoder.prepend_empty_block(tlv::ANY),
            };
        }
        total += encoder.prepend_var_number(total as u64);
        total += encoder.prepend_var_number(tlv::EXCLUDE);
        total
    }
}

impl fmt::Display for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match entry {
                ExcludeEntry::Component(c) => write!(f, "{}", c)?,
                ExcludeEntry::Any => f.write_str("*")?,
            }
        }
        Ok(())
    }
}
