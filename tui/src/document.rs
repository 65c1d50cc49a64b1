//! The page being read: plain text with a cursor and a keyboard selection.
//!
//! Positions are (row, column) in characters. The selection runs from the
//! anchor to the cursor, end exclusive, and may span lines.

use claimcheck_core::traits::SelectionSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    cursor: Pos,
    anchor: Option<Pos>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor: Pos::default(),
            anchor: None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    /// Move the cursor. With `extend` the selection grows from where the
    /// cursor was; without it any selection is dropped.
    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }

        let Pos { row, col } = self.cursor;
        self.cursor = match motion {
            Motion::Left if col > 0 => Pos::new(row, col - 1),
            Motion::Left if row > 0 => Pos::new(row - 1, self.line_len(row - 1)),
            Motion::Right if col < self.line_len(row) => Pos::new(row, col + 1),
            Motion::Right if row + 1 < self.lines.len() => Pos::new(row + 1, 0),
            Motion::Up if row > 0 => Pos::new(row - 1, col.min(self.line_len(row - 1))),
            Motion::Down if row + 1 < self.lines.len() => {
                Pos::new(row + 1, col.min(self.line_len(row + 1)))
            }
            Motion::LineStart => Pos::new(row, 0),
            Motion::LineEnd => Pos::new(row, self.line_len(row)),
            _ => self.cursor,
        };
    }

    /// Select the whole line under the cursor.
    pub fn select_line(&mut self) {
        let row = self.cursor.row;
        self.anchor = Some(Pos::new(row, 0));
        self.cursor = Pos::new(row, self.line_len(row));
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    /// `(start, end)` of the selection, ordered, or `None` if it is empty.
    pub fn selection_range(&self) -> Option<(Pos, Pos)> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some((anchor, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_selected(&self, pos: Pos) -> bool {
        self.selection_range()
            .is_some_and(|(start, end)| start <= pos && pos < end)
    }
}

impl SelectionSource for Document {
    fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection_range()?;
        let mut parts = Vec::with_capacity(end.row - start.row + 1);
        for row in start.row..=end.row {
            let from = if row == start.row { start.col } else { 0 };
            let to = if row == end.row {
                end.col
            } else {
                self.line_len(row)
            };
            parts.push(
                self.lines[row]
                    .chars()
                    .skip(from)
                    .take(to.saturating_sub(from))
                    .collect::<String>(),
            );
        }
        Some(parts.join("\n"))
    }
}
