// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// An opaque identifier for maps and nodes.
///
/// Ids minted by this crate are decimal epoch-millisecond strings, but imported documents may
/// carry any non-blank string, so the only enforced rule is that the id is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdError::Blank);
        }
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    fn from_millis(millis: u64) -> Self {
        Self {
            value: millis.to_string(),
            _marker: PhantomData,
        }
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
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Blank,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("id must not be blank"),
        }
    }
}

impl std::error::Error for IdError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapIdTag {}
pub type MapId = Id<MapIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

/// Reserved id of the distinguished root node of every map.
pub const ROOT_NODE_ID: &str = "root";

impl NodeId {
    pub fn root() -> Self {
        Self {
            value: ROOT_NODE_ID.to_owned(),
            _marker: PhantomData,
        }
    }

    pub fn is_root(&self) -> bool {
        self.value == ROOT_NODE_ID
    }
}

/// Mints time-based ids that strictly increase, even when the clock stalls or steps back.
///
/// Numeric ids seen on load or import are fed through [`IdAllocator::observe`] so a freshly
/// minted id can never collide with (or reuse) an id that already existed.
/// Numeric ids above this are not observed, so the counter always has room to step past what it
/// tracks. Time-based ids stay far below it.
const OBSERVE_CEILING: u64 = u64::MAX / 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    pub fn observe(&mut self, id: &str) {
        match id.parse::<u64>() {
            Ok(value) if value <= OBSERVE_CEILING => self.last = self.last.max(value),
            _ => {}
        }
    }

    pub fn next_millis(&mut self, now_millis: u64) -> u64 {
        let next = now_millis.max(self.last.saturating_add(1));
        self.last = next;
        next
    }

    pub fn next_node_id(&mut self, now_millis: u64) -> NodeId {
        NodeId::from_millis(self.next_millis(now_millis))
    }

    pub fn next_map_id(&mut self, now_millis: u64) -> MapId {
        MapId::from_millis(self.next_millis(now_millis))
    }
}
