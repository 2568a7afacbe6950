//! Grid geometry derived from the screen size captured at startup

use crate::theme;
use crate::ui::virtual_list::RowGeometry;
use egui::{pos2, vec2, Pos2, Rect};

pub const COLUMNS: usize = 2;

/// Screen size, read once. Layout does not follow later window resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMetrics {
    pub width: f32,
    pub height: f32,
}

/// Sizes for header, cards and rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub screen: ScreenMetrics,
    pub banner: egui::Vec2,
    pub card_width: f32,
    pub thumb_height: f32,
    pub card_height: f32,
    pub row_height: f32,
    pub header_height: f32,
    pub empty_height: f32,
}

impl GridLayout {
    pub fn new(screen: ScreenMetrics) -> Self {
        let card_width = screen.width * 0.5 - theme::CARD_INSET;
        let thumb_height = screen.width * 0.6;
        let card_height = thumb_height + theme::CARD_TEXT_BLOCK;
        let row_height = card_height + 2.0 * theme::CARD_MARGIN + 2.0 * theme::ROW_MARGIN;
        let banner = vec2(screen.width, screen.width * 0.5);
        let header_height = banner.y
            + theme::SECTION_TITLE_TOP
            + theme::SECTION_TITLE_LINE
            + theme::SECTION_TITLE_BOTTOM;

        Self {
            screen,
            banner,
            card_width,
            thumb_height,
            card_height,
            row_height,
            header_height,
            empty_height: screen.height * 0.5,
        }
    }

    pub fn rows(&self, items: usize) -> usize {
        items.div_ceil(COLUMNS)
    }

    pub fn geometry(&self, items: usize) -> RowGeometry {
        RowGeometry {
            header_height: self.header_height,
            row_height: self.row_height,
            rows: self.rows(items),
        }
    }

    /// Card rect for item `idx`, relative to `origin` (top-left of the list content)
    pub fn card_rect(&self, origin: Pos2, idx: usize) -> Rect {
        let row = idx / COLUMNS;
        let col = idx % COLUMNS;
        let x = theme::ROW_MARGIN
            + theme::CARD_MARGIN
            + col as f32 * (self.card_width + 2.0 * theme::CARD_MARGIN);
        let y = self.geometry(idx + 1).row_top(row) + theme::ROW_MARGIN + theme::CARD_MARGIN;
        Rect::from_min_size(
            pos2(origin.x + x, origin.y + y),
            vec2(self.card_width, self.card_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(ScreenMetrics { width: 400.0, height: 800.0 })
    }

    #[test]
    fn sizes_follow_screen_width() {
        let l = layout();
        assert_eq!(l.card_width, 176.0);
        assert!((l.thumb_height - 240.0).abs() < 0.01);
        assert_eq!(l.banner, vec2(400.0, 200.0));
        assert_eq!(l.empty_height, 400.0);
    }

    #[test]
    fn two_columns_fill_screen_width() {
        let l = layout();
        let left = l.card_rect(Pos2::ZERO, 0);
        let right = l.card_rect(Pos2::ZERO, 1);
        assert_eq!(left.top(), right.top());
        assert_eq!(left.left(), theme::ROW_MARGIN + theme::CARD_MARGIN);
        let trailing = right.right() + theme::CARD_MARGIN + theme::ROW_MARGIN;
        assert!((trailing - 400.0).abs() < 0.01);
    }

    #[test]
    fn rows_round_up() {
        let l = layout();
        assert_eq!(l.rows(0), 0);
        assert_eq!(l.rows(1), 1);
        assert_eq!(l.rows(5), 3);
        let third = l.card_rect(Pos2::ZERO, 4);
        assert_eq!(third.top(), l.header_height + 2.0 * l.row_height + theme::ROW_MARGIN + theme::CARD_MARGIN);
    }
}
