// Tile-aware scheduling on top of the blocking queue.
//
// Tile-update messages carry a textual prefix (first line of the payload):
//
//     tile view=<id> part=<p> x=<x> y=<y> width=<w> height=<h>
//
// followed by an optional binary tail after the newline. Anything that does
// not parse as such a prefix is opaque and handled strictly FIFO.

use crate::queue::BlockingQueue;
use crate::{Payload, QueuePolicy};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use tracing::trace;

/// Parsed prefix of a tile-update message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDesc {
    pub view: i32,
    pub part: i32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Last-known editing rectangle of a view. Zero width/height (a caret) is
/// legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub part: i32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TileDesc {
    pub fn new(view: i32, part: i32, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            view,
            part,
            x,
            y,
            width,
            height,
        }
    }

    /// Classify a payload by its first line.
    ///
    /// Returns `None` for anything that is not a well-formed tile prefix:
    /// non-UTF-8 first line, wrong command token, a missing field or one
    /// that fails to parse. Unknown `key=value` tokens are skipped so the
    /// prefix can grow without breaking classification.
    pub fn parse(payload: &[u8]) -> Option<TileDesc> {
        let line = payload.split(|&b| b == b'\n').next()?;
        let text = std::str::from_utf8(line).ok()?;

        let mut words = text.split_whitespace();
        if words.next()? != "tile" {
            return None;
        }

        let mut view = None;
        let mut part = None;
        let mut x = None;
        let mut y = None;
        let mut width = None;
        let mut height = None;
        for word in words {
            let Some((key, value)) = word.split_once('=') else {
                continue;
            };
            let field = match key {
                "view" => &mut view,
                "part" => &mut part,
                "x" => &mut x,
                "y" => &mut y,
                "width" => &mut width,
                "height" => &mut height,
                _ => continue,
            };
            *field = Some(value.parse::<i32>().ok()?);
        }

        Some(TileDesc {
            view: view?,
            part: part?,
            x: x?,
            y: y?,
            width: width?,
            height: height?,
        })
    }

    /// True when this tile lies under `cursor`: same part and the two
    /// rectangles touch. Bounds are inclusive so a zero-size caret sitting
    /// on a tile edge still counts. Sums are widened to `i64` since any
    /// wire-valid prefix may carry extents up to `i32::MAX`.
    pub fn underlies(&self, cursor: &CursorPosition) -> bool {
        self.part == cursor.part
            && i64::from(self.x) <= i64::from(cursor.x) + i64::from(cursor.width)
            && i64::from(cursor.x) <= i64::from(self.x) + i64::from(self.width)
            && i64::from(self.y) <= i64::from(cursor.y) + i64::from(cursor.height)
            && i64::from(cursor.y) <= i64::from(self.y) + i64::from(self.height)
    }
}

impl fmt::Display for TileDesc {
    /// The stable wire form producers put on the queue.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile view={} part={} x={} y={} width={} height={}",
            self.view, self.part, self.x, self.y, self.width, self.height
        )
    }
}

/// Queue policy that collapses superseded tile updates on insert and, on
/// removal, prefers the tile under the most recently active view's cursor.
#[derive(Debug, Default)]
pub struct TilePolicy {
    cursor_positions: BTreeMap<i32, CursorPosition>,
    // Views in the order the editing (cursor movement) has been happening,
    // most recent first. Each id appears at most once.
    view_order: VecDeque<i32>,
}

/// Blocking queue with tile prioritization and dedup.
pub type TileQueue = BlockingQueue<TilePolicy>;

impl TilePolicy {
    fn update_cursor_position(&mut self, view_id: i32, cursor: CursorPosition) {
        self.cursor_positions.insert(view_id, cursor);

        // Most recently active view goes to the front of the order.
        self.view_order.retain(|&v| v != view_id);
        self.view_order.push_front(view_id);
    }

    fn remove_cursor_position(&mut self, view_id: i32) {
        self.view_order.retain(|&v| v != view_id);
        self.cursor_positions.remove(&view_id);
    }

    /// Index of the first queued tile under a tracked cursor, checking
    /// views from most to least recently active.
    fn priority_index(&self, queue: &VecDeque<Payload>) -> Option<usize> {
        for &view in &self.view_order {
            let Some(cursor) = self.cursor_positions.get(&view) else {
                continue;
            };
            for (index, payload) in queue.iter().enumerate() {
                if let Some(desc) = TileDesc::parse(payload) {
                    if desc.underlies(cursor) {
                        trace!(view, %desc, "tile under cursor takes priority");
                        return Some(index);
                    }
                }
            }
        }
        None
    }
}

impl QueuePolicy for TilePolicy {
    /// Drop every queued tile fully superseded by the new one (same view
    /// and identical region key), then append at the tail.
    fn on_insert(&mut self, queue: &mut VecDeque<Payload>, payload: Payload) {
        if let Some(desc) = TileDesc::parse(&payload) {
            let before = queue.len();
            queue.retain(|queued| TileDesc::parse(queued) != Some(desc));
            let dropped = before - queue.len();
            if dropped > 0 {
                trace!(%desc, dropped, "dropped superseded tile update");
            }
        }
        queue.push_back(payload);
    }

    /// Priority tile first, otherwise plain FIFO head.
    fn on_remove(&mut self, queue: &mut VecDeque<Payload>) -> Option<Payload> {
        if let Some(index) = self.priority_index(queue) {
            return queue.remove(index);
        }
        queue.pop_front()
    }
}

impl BlockingQueue<TilePolicy> {
    /// Record `cursor` as the last-known rectangle of `view_id` and mark
    /// that view as most recently active.
    pub fn update_cursor_position(&self, view_id: i32, cursor: CursorPosition) {
        self.policy_mut(|policy| policy.update_cursor_position(view_id, cursor));
    }

    /// Forget `view_id` entirely; a no-op when it was never tracked.
    /// Pending tiles from that view stay queued but lose any priority.
    pub fn remove_cursor_position(&self, view_id: i32) {
        self.policy_mut(|policy| policy.remove_cursor_position(view_id));
    }
}
