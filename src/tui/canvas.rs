// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell-grid rendering of a mind map.
//!
//! One terminal cell covers `CELL_WIDTH x CELL_HEIGHT` map units, so a default node box spans
//! 20 columns and three rows.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::model::{MindMap, Node, NodeId, Point, NODE_HEIGHT, NODE_WIDTH};

pub(crate) const CELL_WIDTH: f64 = 10.0;
pub(crate) const CELL_HEIGHT: f64 = 20.0;

/// Cell offsets are clamped to this magnitude so cell arithmetic stays far from `i64` limits.
const CELL_LIMIT: f64 = 1e9;

/// Maps between terminal cells and map coordinates. `origin` is the map point shown in the
/// top-left cell of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Viewport {
    origin: Point,
}

impl Viewport {
    pub(crate) fn new(origin: Point) -> Self {
        Self { origin }
    }

    pub(crate) fn origin(&self) -> Point {
        self.origin
    }

    pub(crate) fn pan(&mut self, columns: i32, rows: i32) {
        self.origin = self.origin
            + Point::new(
                f64::from(columns) * CELL_WIDTH,
                f64::from(rows) * CELL_HEIGHT,
            );
    }

    /// Moves the origin so `point` lands in the middle of `area`.
    pub(crate) fn center_on(&mut self, area: Rect, point: Point) {
        let half = Point::new(
            f64::from(area.width / 2) * CELL_WIDTH,
            f64::from(area.height / 2) * CELL_HEIGHT,
        );
        self.origin = point - half;
    }

    /// Map point under the top-left corner of the terminal cell, or `None` outside `area`.
    pub(crate) fn screen_to_map(&self, area: Rect, column: u16, row: u16) -> Option<Point> {
        if !contains_cell(area, column, row) {
            return None;
        }
        Some(Point::new(
            self.origin.x + f64::from(column - area.x) * CELL_WIDTH,
            self.origin.y + f64::from(row - area.y) * CELL_HEIGHT,
        ))
    }

    /// Cell offset of `point` relative to the canvas' top-left cell. May be negative or past the
    /// canvas edge; offsets beyond `CELL_LIMIT` are clamped.
    pub(crate) fn map_to_cell(&self, point: Point) -> (i64, i64) {
        let clamp = |cells: f64| cells.floor().clamp(-CELL_LIMIT, CELL_LIMIT) as i64;
        (
            clamp((point.x - self.origin.x) / CELL_WIDTH),
            clamp((point.y - self.origin.y) / CELL_HEIGHT),
        )
    }

    /// Terminal cell showing `point`, or `None` when it is scrolled out of `area`.
    pub(crate) fn map_to_screen(&self, area: Rect, point: Point) -> Option<(u16, u16)> {
        let (column, row) = self.map_to_cell(point);
        let column = u16::try_from(column).ok()?.checked_add(area.x)?;
        let row = u16::try_from(row).ok()?.checked_add(area.y)?;
        contains_cell(area, column, row).then_some((column, row))
    }

    /// Inclusive cell bounds of a node box: `(left, top, right, bottom)`.
    pub(crate) fn node_cells(&self, node: &Node) -> (i64, i64, i64, i64) {
        let (left, top) = self.map_to_cell(node.position());
        let (right, bottom) =
            self.map_to_cell(node.position() + Point::new(NODE_WIDTH, NODE_HEIGHT));
        (
            left,
            top,
            right.saturating_sub(1).max(left.saturating_add(2)),
            bottom.max(top.saturating_add(2)),
        )
    }
}

fn contains_cell(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && row >= area.y
        && u32::from(column) < u32::from(area.x) + u32::from(area.width)
        && u32::from(row) < u32::from(area.y) + u32::from(area.height)
}

/// Draws edges first, then node boxes in hit-test order so the top-most box wins.
pub(crate) struct MapCanvas<'a> {
    map: &'a MindMap,
    selected: Option<&'a NodeId>,
    viewport: Viewport,
}

impl<'a> MapCanvas<'a> {
    pub(crate) fn new(
        map: &'a MindMap,
        selected: Option<&'a NodeId>,
        viewport: Viewport,
    ) -> Self {
        Self {
            map,
            selected,
            viewport,
        }
    }
}

impl Widget for MapCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let edge_style = Style::default().fg(Color::DarkGray);
        for (source, target) in self.map.drawable_edges() {
            let from = self.viewport.map_to_cell(source.center());
            let to = self.viewport.map_to_cell(target.center());
            if let Some((from, to)) = clip_segment(area, from, to) {
                draw_line(buf, area, from, to, edge_style);
            }
        }

        for node in self.map.nodes().values() {
            let selected = self.selected == Some(node.node_id());
            draw_node(buf, area, &self.viewport, node, selected);
        }
    }
}

fn put(buf: &mut Buffer, area: Rect, column: i64, row: i64, symbol: &str, style: Style) {
    if column < 0 || row < 0 || column >= i64::from(area.width) || row >= i64::from(area.height) {
        return;
    }
    // Bounds checked above.
    let x = area.x + column as u16;
    let y = area.y + row as u16;
    buf.get_mut(x, y).set_symbol(symbol).set_style(style);
}

/// Liang-Barsky clip of the segment `from -> to` against the cells of `area`. Returns `None`
/// when no part of the segment is visible.
pub(crate) fn clip_segment(
    area: Rect,
    from: (i64, i64),
    to: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);
    let max_x = f64::from(area.width - 1);
    let max_y = f64::from(area.height - 1);

    let mut enter = 0.0_f64;
    let mut leave = 1.0_f64;
    for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > leave {
                return None;
            }
            enter = enter.max(t);
        } else {
            if t < enter {
                return None;
            }
            leave = leave.min(t);
        }
    }

    let at = |t: f64| {
        (
            (x0 + t * dx).round().clamp(0.0, max_x) as i64,
            (y0 + t * dy).round().clamp(0.0, max_y) as i64,
        )
    };
    Some((at(enter), at(leave)))
}

/// Steps a line from `from` to `to`, both inclusive. Callers clip first so the walk stays within
/// the canvas.
fn draw_line(buf: &mut Buffer, area: Rect, from: (i64, i64), to: (i64, i64), style: Style) {
    if from == to {
        return;
    }
    let (mut x, mut y) = from;
    let dx = to.0.saturating_sub(x).saturating_abs();
    let dy = to.1.saturating_sub(y).saturating_abs().saturating_neg();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx.saturating_add(dy);

    loop {
        let doubled = err.saturating_mul(2);
        let step_x = doubled >= dy;
        let step_y = doubled <= dx;
        let symbol = match (step_x, step_y) {
            (true, true) if sx == sy => "╲",
            (true, true) => "╱",
            (true, false) => "─",
            _ => "│",
        };
        put(buf, area, x, y, symbol, style);
        if (x, y) == to {
            break;
        }
        if step_x {
            err += dy;
            x += sx;
        }
        if step_y {
            err += dx;
            y += sy;
        }
    }
}

fn draw_node(buf: &mut Buffer, area: Rect, viewport: &Viewport, node: &Node, selected: bool) {
    let (left, top, right, bottom) = viewport.node_cells(node);
    let (width, height) = (i64::from(area.width), i64::from(area.height));
    if right < 0 || bottom < 0 || left >= width || top >= height {
        return;
    }
    let (r, g, b) = node.color().rgb();
    let mut style = Style::default().fg(Color::Black).bg(Color::Rgb(r, g, b));
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    let [h, v, tl, tr, bl, br] = if selected {
        ["═", "║", "╔", "╗", "╚", "╝"]
    } else {
        ["─", "│", "┌", "┐", "└", "┘"]
    };

    for row in top.max(0)..=bottom.min(height - 1) {
        for column in left.max(0)..=right.min(width - 1) {
            let symbol = match (row == top, row == bottom, column == left, column == right) {
                (true, _, true, _) => tl,
                (true, _, _, true) => tr,
                (_, true, true, _) => bl,
                (_, true, _, true) => br,
                (true, _, _, _) | (_, true, _, _) => h,
                (_, _, true, _) | (_, _, _, true) => v,
                _ => " ",
            };
            put(buf, area, column, row, symbol, style);
        }
    }

    let inner = usize::try_from(right.saturating_sub(left).saturating_sub(1)).unwrap_or_default();
    let label: Vec<char> = node.text().chars().collect();
    let shown: String = if label.len() > inner {
        label
            .iter()
            .take(inner.saturating_sub(1))
            .chain(std::iter::once(&'…'))
            .collect()
    } else {
        label.iter().collect()
    };
    let pad = inner.saturating_sub(shown.chars().count()) / 2;
    let row = top.saturating_add(bottom.saturating_sub(top) / 2);
    let mut symbol = [0u8; 4];
    for (offset, ch) in shown.chars().enumerate() {
        let column = left.saturating_add(1 + (pad + offset) as i64);
        put(buf, area, column, row, ch.encode_utf8(&mut symbol), style);
    }
}
