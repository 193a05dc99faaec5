// SPDX-License-Identifier: MIT

//! Port type matching
//!
//! A port type is a non-empty set of asset kinds. Textually it is written as
//! a `|`-joined tag, e.g. `"datasetId|modelId"`. Matching decides whether a
//! producing port can feed a consuming port and, for union producers, which
//! single kind is carried along the edge.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::engine::error::PortTypeError;

/// Set of asset kinds a port produces or accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortType {
    kinds: BTreeSet<String>,
}

impl PortType {
    /// Parse a `|`-delimited tag. Surrounding whitespace around kinds is ignored.
    pub fn parse(tag: &str) -> Result<Self, PortTypeError> {
        if tag.trim().is_empty() {
            return Err(PortTypeError::Empty);
        }

        let mut kinds = BTreeSet::new();
        for kind in tag.split('|') {
            let kind = kind.trim();
            if kind.is_empty() {
                return Err(PortTypeError::EmptyKind(tag.to_string()));
            }
            kinds.insert(kind.to_string());
        }

        Ok(Self { kinds })
    }

    /// A port type holding exactly one kind
    pub fn single(kind: impl Into<String>) -> Result<Self, PortTypeError> {
        Self::parse(&kind.into())
    }

    /// True when more than one kind is declared
    pub fn is_union(&self) -> bool {
        self.kinds.len() > 1
    }

    /// The only kind, if this is not a union
    pub fn as_single(&self) -> Option<&str> {
        if self.is_union() {
            None
        } else {
            self.kinds.iter().next().map(|s| s.as_str())
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.kinds.iter().map(|s| s.as_str()).collect::<Vec<_>>();
        write!(f, "{}", tag.join("|"))
    }
}

impl FromStr for PortType {
    type Err = PortTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PortType {
    type Error = PortTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PortType> for String {
    fn from(value: PortType) -> Self {
        value.to_string()
    }
}

/// Outcome of matching a producer against a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMatch {
    /// Both sides declare the same single kind
    Exact,
    /// Union producer narrowed to the consumer's single kind
    Narrowed(String),
    /// Union consumer accepts the producer's single kind
    Accepted,
    /// No edge may be created
    Incompatible,
}

impl PortMatch {
    pub fn is_compatible(&self) -> bool {
        !matches!(self, PortMatch::Incompatible)
    }

    /// Value to place on the consumer side of the edge.
    ///
    /// For a narrowed match every element is expected to be shaped as
    /// `{ kind: data }`; the `data` part is kept and a missing key becomes
    /// `null`. Other matches transfer the value unchanged.
    pub fn transfer(&self, value: &[Value]) -> Vec<Value> {
        match self {
            PortMatch::Narrowed(kind) => value
                .iter()
                .map(|v| v.get(kind).cloned().unwrap_or(Value::Null))
                .collect(),
            _ => value.to_vec(),
        }
    }
}

/// Match a producing port type against a consuming one.
///
/// Union-to-union pairs are always rejected so that every edge carries one
/// unambiguous kind.
pub fn match_ports(producer: &PortType, consumer: &PortType) -> PortMatch {
    match (producer.as_single(), consumer.as_single()) {
        (Some(a), Some(b)) if a == b => PortMatch::Exact,
        (Some(_), Some(_)) => PortMatch::Incompatible,
        (None, Some(b)) if producer.contains(b) => PortMatch::Narrowed(b.to_string()),
        (Some(a), None) if consumer.contains(a) => PortMatch::Accepted,
        _ => PortMatch::Incompatible,
    }
}
