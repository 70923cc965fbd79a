//! Normalization of caller-supplied purchase selections.
//!
//! Form posts and JSON bodies carry ids as numbers, numeric strings, empty
//! strings or nothing at all. Everything is reduced to a [`SelectionId`]
//! before any rule compares two selections, so `7`, `"7"`, `" 7 "` and
//! `"007"` are the same purchase.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::DbId;

/// A purchase selection after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SelectionId {
    /// Nothing was selected (absent, null or blank).
    #[default]
    Missing,
    /// A canonical purchase id.
    Id(DbId),
    /// Non-numeric text. Present, but can never resolve to a purchase.
    Unresolvable(String),
}

impl SelectionId {
    /// Normalize raw text input.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SelectionId::Missing;
        }
        match trimmed.parse::<DbId>() {
            Ok(id) => SelectionId::Id(id),
            Err(_) => SelectionId::Unresolvable(trimmed.to_string()),
        }
    }

    /// Normalize an optional raw text input (`None` means the field was absent).
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, SelectionId::Missing)
    }

    /// The canonical id, if this selection can be looked up.
    pub fn as_id(&self) -> Option<DbId> {
        match self {
            SelectionId::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<DbId> for SelectionId {
    fn from(id: DbId) -> Self {
        SelectionId::Id(id)
    }
}

impl From<&str> for SelectionId {
    fn from(raw: &str) -> Self {
        SelectionId::parse(raw)
    }
}

impl From<Option<DbId>> for SelectionId {
    fn from(id: Option<DbId>) -> Self {
        id.map(SelectionId::Id).unwrap_or_default()
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionId::Missing => f.write_str("<none>"),
            SelectionId::Id(id) => write!(f, "{id}"),
            SelectionId::Unresolvable(text) => write!(f, "{text:?}"),
        }
    }
}

impl<'de> Deserialize<'de> for SelectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Numbers outside the id range are present but unresolvable, the
        // same as their string form.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(DbId),
            Unsigned(u64),
            Float(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => SelectionId::Missing,
            Some(Raw::Int(id)) => SelectionId::Id(id),
            Some(Raw::Unsigned(n)) => SelectionId::Unresolvable(n.to_string()),
            Some(Raw::Float(n)) => SelectionId::Unresolvable(n.to_string()),
            Some(Raw::Text(text)) => SelectionId::parse(&text),
        })
    }
}

impl Serialize for SelectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SelectionId::Missing => serializer.serialize_none(),
            SelectionId::Id(id) => serializer.serialize_i64(*id),
            SelectionId::Unresolvable(text) => serializer.serialize_str(text),
        }
    }
}
