//! Differential renderer.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each cell in the new frame:
//!    - If a previous frame of the same size exists and the cell is unchanged: skip
//!    - Otherwise: move the cursor there and print the cell with its colors
//! 3. Flush the writer
//! 4. Store the current frame as previous for the next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use crate::types::Rgba;

use super::buffer::{Cell, FrameBuffer};

/// Keeps the previous frame so only changed cells are written.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the cells of `buffer` that differ from the previous frame.
    ///
    /// Returns the number of cells written.
    pub fn render<W: Write>(&mut self, out: &mut W, buffer: &FrameBuffer) -> io::Result<usize> {
        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        queue!(out, BeginSynchronizedUpdate)?;

        let mut written = 0;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if previous.and_then(|prev| prev.get(x, y)) == Some(cell) {
                    continue;
                }
                if cell.ch == Cell::CONTINUATION {
                    continue;
                }

                queue!(
                    out,
                    MoveTo(x, y),
                    SetForegroundColor(to_color(cell.fg)),
                    SetBackgroundColor(to_color(cell.bg)),
                    Print(cell.ch)
                )?;
                written += 1;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(written)
    }

    /// Forget the previous frame; the next render redraws every cell.
    ///
    /// Use this after terminal resize or when the screen is corrupted.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }
}

fn to_color(color: Rgba) -> Color {
    if color.is_transparent() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}
