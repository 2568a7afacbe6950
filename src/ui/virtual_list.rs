//! Windowed rendering for long lists of fixed-height rows
//!
//! Only the rows inside a window of `window_size` viewports (the visible one
//! in the middle) are drawn. Cards entering the window are materialized in
//! batches so a fast fling never builds hundreds of cards in one frame.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListTuning {
    /// Max items materialized per frame
    pub max_to_render_per_batch: usize,
    /// Rendered window measured in viewport heights
    pub window_size: usize,
    /// Drop cards (and their textures) once they leave the window
    pub remove_clipped_subviews: bool,
    /// Use the explicit window above instead of drawing only what is visible
    pub disable_virtualization: bool,
}

impl Default for ListTuning {
    fn default() -> Self {
        Self {
            max_to_render_per_batch: 10,
            window_size: 21,
            remove_clipped_subviews: true,
            disable_virtualization: true,
        }
    }
}

impl ListTuning {
    /// Knobs actually applied. Without explicit windowing the list falls back
    /// to drawing the visible rows only, all at once.
    pub fn effective(&self) -> Self {
        if self.disable_virtualization {
            Self {
                max_to_render_per_batch: self.max_to_render_per_batch.max(1),
                window_size: self.window_size.max(1),
                ..*self
            }
        } else {
            Self {
                max_to_render_per_batch: usize::MAX,
                window_size: 1,
                ..*self
            }
        }
    }

    /// Rows inside the render window for the given viewport
    pub fn window(&self, geom: &RowGeometry, viewport_top: f32, viewport_height: f32) -> Range<usize> {
        let extra = self.window_size.saturating_sub(1) as f32 / 2.0 * viewport_height;
        geom.rows_in(viewport_top - extra, viewport_top + viewport_height + extra)
    }
}

/// Vertical geometry: a fixed header followed by uniform rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub header_height: f32,
    pub row_height: f32,
    pub rows: usize,
}

impl RowGeometry {
    pub fn content_height(&self) -> f32 {
        self.header_height + self.row_height * self.rows as f32
    }

    pub fn row_top(&self, row: usize) -> f32 {
        self.header_height + self.row_height * row as f32
    }

    /// Rows intersecting `[top, bottom)`
    pub fn rows_in(&self, top: f32, bottom: f32) -> Range<usize> {
        if self.rows == 0 || self.row_height <= 0.0 || bottom <= top {
            return 0..0;
        }
        let first = ((top - self.header_height) / self.row_height).floor();
        let last = ((bottom - self.header_height) / self.row_height).ceil();
        let first = first.clamp(0.0, self.rows as f32) as usize;
        let last = last.clamp(0.0, self.rows as f32) as usize;
        if last <= first {
            0..0
        } else {
            first..last
        }
    }
}

/// Items in a row range of a grid with `columns` columns
pub fn items_in_rows(rows: Range<usize>, columns: usize, len: usize) -> Range<usize> {
    let start = (rows.start * columns).min(len);
    let end = (rows.end * columns).min(len);
    start..end
}

/// Result of one frame's batching pass
#[derive(Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub added: Vec<usize>,
    pub evicted: Vec<usize>,
    /// Items in the window still waiting for a later frame
    pub pending: bool,
}

/// Tracks which items have been materialized as cards
#[derive(Debug, Default)]
pub struct Materializer {
    materialized: BTreeSet<usize>,
}

impl Materializer {
    pub fn is_materialized(&self, idx: usize) -> bool {
        self.materialized.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.materialized.len()
    }

    pub fn reset(&mut self) {
        self.materialized.clear();
    }

    /// Materialize up to one batch of window items, visible ones first.
    pub fn step(&mut self, visible: Range<usize>, window: Range<usize>, tuning: &ListTuning) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        if tuning.remove_clipped_subviews {
            outcome.evicted = self
                .materialized
                .iter()
                .copied()
                .filter(|idx| !window.contains(idx))
                .collect();
            for idx in &outcome.evicted {
                self.materialized.remove(idx);
            }
        }

        let mut budget = tuning.max_to_render_per_batch;
        let order = visible
            .clone()
            .chain(window.clone().filter(|idx| !visible.contains(idx)));
        for idx in order {
            if self.materialized.contains(&idx) {
                continue;
            }
            if budget == 0 {
                outcome.pending = true;
                break;
            }
            self.materialized.insert(idx);
            outcome.added.push(idx);
            budget -= 1;
        }

        outcome
    }
}
