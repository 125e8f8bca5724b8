// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::ops::{Add, Sub};

use super::ids::NodeId;

/// Node extent in map units; used for hit-testing and connector anchoring.
pub const NODE_WIDTH: f64 = 200.0;
pub const NODE_HEIGHT: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The fixed node palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeColor {
    #[default]
    Purple,
    Teal,
    Orange,
    Yellow,
    Blue,
    Pink,
}

impl NodeColor {
    pub const ALL: [NodeColor; 6] = [
        NodeColor::Purple,
        NodeColor::Teal,
        NodeColor::Orange,
        NodeColor::Yellow,
        NodeColor::Blue,
        NodeColor::Pink,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Self::Purple => "#D6BCFA",
            Self::Teal => "#9BE8D8",
            Self::Orange => "#FEC6A1",
            Self::Yellow => "#FEF7CD",
            Self::Blue => "#D3E4FD",
            Self::Pink => "#FFDEE2",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Purple => (0xD6, 0xBC, 0xFA),
            Self::Teal => (0x9B, 0xE8, 0xD8),
            Self::Orange => (0xFE, 0xC6, 0xA1),
            Self::Yellow => (0xFE, 0xF7, 0xCD),
            Self::Blue => (0xD3, 0xE4, 0xFD),
            Self::Pink => (0xFF, 0xDE, 0xE2),
        }
    }

    /// Case-insensitive lookup by hex string (with or without the leading `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let wanted = hex.trim().trim_start_matches('#');
        Self::ALL
            .into_iter()
            .find(|color| color.hex()[1..].eq_ignore_ascii_case(wanted))
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|color| *color == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for NodeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_id: NodeId,
    text: String,
    position: Point,
    color: NodeColor,
}

impl Node {
    pub fn new(
        node_id: NodeId,
        text: impl Into<String>,
        position: Point,
        color: NodeColor,
    ) -> Self {
        Self {
            node_id,
            text: text.into(),
            position,
            color,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn color(&self) -> NodeColor {
        self.color
    }

    pub fn set_color(&mut self, color: NodeColor) {
        self.color = color;
    }

    /// Returns true when `point` falls inside this node's box (top-left anchored).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + NODE_WIDTH
            && point.y >= self.position.y
            && point.y <= self.position.y + NODE_HEIGHT
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + NODE_WIDTH / 2.0,
            self.position.y + NODE_HEIGHT / 2.0,
        )
    }
}
