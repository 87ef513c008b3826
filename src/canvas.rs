//! Rectangular glyph grid that trees are drawn on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph used for empty cells
pub const BLANK: char = ' ';

/// A rectangular grid of single-character cells.
///
/// Serialized as a list of rows, each a list of one-character strings. Rows
/// of unequal length are rejected on deserialization, so a `Canvas` is
/// rectangular by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<char>>", into = "Vec<Vec<char>>")]
pub struct Canvas {
    rows: Vec<Vec<char>>,
}

impl Canvas {
    /// A blank canvas of the given size
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![BLANK; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Writes a glyph; out-of-range coordinates are ignored.
    pub(crate) fn set(&mut self, x: usize, y: usize, glyph: char) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = glyph;
        }
    }

    /// Every glyph on the canvas, row by row
    pub fn glyphs(&self) -> impl Iterator<Item = char> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Rows joined with `\n`, no trailing newline
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<Vec<Vec<char>>> for Canvas {
    type Error = String;

    fn try_from(rows: Vec<Vec<char>>) -> Result<Self, Self::Error> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(format!(
                "canvas row {} has {} cells, expected {}",
                i,
                row.len(),
                width
            ));
        }
        Ok(Self { rows })
    }
}

impl From<Canvas> for Vec<Vec<char>> {
    fn from(canvas: Canvas) -> Self {
        canvas.rows
    }
}
