//! FrameBuffer - a grid of terminal cells.
//!
//! One layout unit maps to one cell. Rects snap to cells by rounding both
//! edges, so adjacent rects tile without gaps or overlap. Text is clipped to
//! the buffer only: the glyph that triggers a wrap stays on its line and may
//! overhang the text area by one glyph, as it does when measured.

use std::ops::Range;

use crate::layout::text_measure::{place_glyphs, FontMetrics, Glyph};
use crate::types::{Point, Rect, Rgba};

use super::Painter;

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
}

impl Cell {
    /// Marks the cells covered by the right half of a wide character.
    pub const CONTINUATION: char = '\0';

    pub const fn new(ch: char, fg: Rgba, bg: Rgba) -> Self {
        Self { ch, fg, bg }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', Rgba::WHITE, Rgba::TRANSPARENT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    blank: Cell,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_blank(width, height, Cell::default())
    }

    /// A buffer whose cleared state is `blank`.
    pub fn with_blank(width: u16, height: u16, blank: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![blank; width as usize * height as usize],
            blank,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Reset every cell to the blank cell.
    pub fn clear(&mut self) {
        self.cells.fill(self.blank);
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![self.blank; width as usize * height as usize];
    }

    /// Characters of row `y`, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch)
            .filter(|&ch| ch != Cell::CONTINUATION)
            .collect()
    }

    /// Cell ranges covered by `rect`, clipped to the buffer.
    fn span(&self, rect: Rect) -> Option<(Range<u16>, Range<u16>)> {
        let snap = |v: f32, max: u16| v.round().clamp(0.0, max as f32) as u16;
        let xs = snap(rect.x, self.width)..snap(rect.right(), self.width);
        let ys = snap(rect.y, self.height)..snap(rect.bottom(), self.height);
        (!xs.is_empty() && !ys.is_empty()).then_some((xs, ys))
    }

    fn cell_at(&mut self, point: Point) -> Option<&mut Cell> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        self.get_mut(point.x.round() as u16, point.y.round() as u16)
    }
}

impl Painter for FrameBuffer {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((xs, ys)) = self.span(rect) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.bg = Rgba::blend(color, cell.bg);
                }
            }
        }
    }

    fn frame_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((xs, ys)) = self.span(rect) else {
            return;
        };
        let (left, right) = (xs.start, xs.end - 1);
        let (top, bottom) = (ys.start, ys.end - 1);

        let mut put = |x: u16, y: u16, ch: char| {
            if let Some(cell) = self.get_mut(x, y) {
                cell.ch = ch;
                cell.fg = color;
            }
        };

        for x in left..=right {
            put(x, top, '─');
            put(x, bottom, '─');
        }
        for y in top..=bottom {
            put(left, y, '│');
            put(right, y, '│');
        }
        if left < right && top < bottom {
            put(left, top, '┌');
            put(right, top, '┐');
            put(left, bottom, '└');
            put(right, bottom, '┘');
        }
    }

    fn draw_text(&mut self, glyphs: &[Glyph], metrics: FontMetrics, area: Rect, color: Rgba) {
        for placed in place_glyphs(glyphs, metrics, area.width) {
            let origin = area.origin() + placed.position;
            let Some(cell) = self.cell_at(origin) else {
                continue;
            };
            cell.ch = placed.glyph.code_point;
            cell.fg = color;

            // Wide characters cover the following cells.
            let mut covered = 1.0;
            while covered < placed.glyph.advance {
                let next = Point::new(origin.x + covered, origin.y);
                if let Some(cell) = self.cell_at(next) {
                    cell.ch = Cell::CONTINUATION;
                    cell.fg = color;
                }
                covered += 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text_measure::{CellFont, GlyphSource};

    #[test]
    fn test_fill_rect_blends_and_clips() {
        let mut buffer = FrameBuffer::new(4, 3);
        buffer.fill_rect(Rect::new(2.0, 1.0, 10.0, 10.0), Rgba::GRAY);

        assert_eq!(buffer.get(1, 1).unwrap().bg, Rgba::TRANSPARENT);
        assert_eq!(buffer.get(2, 1).unwrap().bg, Rgba::GRAY);
        assert_eq!(buffer.get(3, 2).unwrap().bg, Rgba::GRAY);
        assert!(buffer.get(4, 2).is_none());
    }

    #[test]
    fn test_frame_rect() {
        let mut buffer = FrameBuffer::new(5, 3);
        buffer.frame_rect(Rect::new(0.0, 0.0, 5.0, 3.0), Rgba::WHITE);

        assert_eq!(buffer.row_text(0), "┌───┐");
        assert_eq!(buffer.row_text(1), "│   │");
        assert_eq!(buffer.row_text(2), "└───┘");
    }

    #[test]
    fn test_draw_text_wraps_like_measurement() {
        let font = CellFont::default();
        let mut buffer = FrameBuffer::new(6, 3);
        buffer.draw_text(&font.glyphs("abcdefg"), font.metrics(), Rect::new(0.0, 0.0, 3.0, 3.0), Rgba::WHITE);

        // 'd' overflows the line and stays on it; the pen wraps after it.
        assert_eq!(buffer.row_text(0), "abcd  ");
        assert_eq!(buffer.row_text(1), "efg   ");
        assert_eq!(buffer.row_text(2), "      ");
    }

    #[test]
    fn test_draw_text_newline() {
        let font = CellFont::default();
        let mut buffer = FrameBuffer::new(4, 2);
        buffer.draw_text(&font.glyphs("a\nb"), font.metrics(), Rect::new(1.0, 0.0, 3.0, 2.0), Rgba::WHITE);

        assert_eq!(buffer.row_text(0), " a  ");
        assert_eq!(buffer.row_text(1), " b  ");
    }

    #[test]
    fn test_wide_character_covers_two_cells() {
        let font = CellFont::default();
        let mut buffer = FrameBuffer::new(4, 1);
        buffer.draw_text(&font.glyphs("漢a"), font.metrics(), Rect::new(0.0, 0.0, 4.0, 1.0), Rgba::WHITE);

        assert_eq!(buffer.get(1, 0).unwrap().ch, Cell::CONTINUATION);
        assert_eq!(buffer.row_text(0), "漢a ");
    }

    #[test]
    fn test_clear_and_resize() {
        let mut buffer = FrameBuffer::new(2, 2);
        buffer.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Rgba::BLACK);
        buffer.clear();
        assert_eq!(buffer.get(0, 0), Some(&Cell::default()));

        buffer.resize(3, 1);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.row_text(0), "   ");
    }
}
