// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

/// A client-generated string identifier.
///
/// Generated ids are short, so the value lives inline in a [`SmolStr`]. The only rule enforced
/// here is that the id is non-empty and contains no whitespace, because ids end up as display
/// keys in the viewer layer and inside JSON-encoded payload strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: SmolStr,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdError> {
        let value = value.as_ref();
        validate_id(value)?;
        Ok(Self {
            value: SmolStr::new(value),
            _marker: PhantomData,
        })
    }

    /// Builds an id from a value already known to be valid, such as generator output.
    pub(crate) fn from_generated(value: impl Into<SmolStr>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value.to_string()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsWhitespace,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsWhitespace => f.write_str("id must not contain whitespace"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdError::ContainsWhitespace);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayIdTag {}
pub type OverlayId = Id<OverlayIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TempNodeIdTag {}
pub type TempNodeId = Id<TempNodeIdTag>;

/// Identifier assigned by the persistence layer. Stable once assigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ServerNodeId(u64);

impl ServerNodeId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ServerNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str(buf.format(self.0))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TourId(u64);

impl TourId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str(buf.format(self.0))
    }
}

impl FromStr for TourId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Reference to a tour node in either id namespace.
///
/// A node is `Temp` from creation until the save response assigns it a server id; afterwards
/// every reference to it is `Server`. The two never compare equal, even when the temp string
/// happens to look like a number.
///
/// On the wire a temp id is a JSON string and a server id a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Server(ServerNodeId),
    Temp(TempNodeId),
}

impl NodeId {
    pub fn is_temp(&self) -> bool {
        matches!(self, Self::Temp(_))
    }

    pub fn as_temp(&self) -> Option<&TempNodeId> {
        match self {
            Self::Temp(id) => Some(id),
            Self::Server(_) => None,
        }
    }

    pub fn as_server(&self) -> Option<ServerNodeId> {
        match self {
            Self::Server(id) => Some(*id),
            Self::Temp(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "#{id}"),
            Self::Temp(id) => write!(f, "~{id}"),
        }
    }
}

impl From<TempNodeId> for NodeId {
    fn from(value: TempNodeId) -> Self {
        Self::Temp(value)
    }
}

impl From<ServerNodeId> for NodeId {
    fn from(value: ServerNodeId) -> Self {
        Self::Server(value)
    }
}
