use crate::models::{CursorPosition, EditDelta};

/// The seam to the text-rendering widget.
///
/// The widget is an external component; all the replica needs from it is
/// "apply edit ops" and "replace full content". Positions use the widget's
/// own row/column coordinates.
pub trait EditorSurface {
    fn content(&self) -> String;

    /// Replace the entire buffer.
    fn replace_all(&mut self, content: &str);

    /// Apply a localized mutation. Returns `false` when the delta's range
    /// does not fit the current buffer, in which case the caller falls back
    /// to a full replace.
    fn apply_delta(&mut self, delta: &EditDelta) -> bool;
}

/// Headless buffer implementing `EditorSurface`, used in tests and anywhere
/// no real widget is attached.
#[derive(Debug, Default, Clone)]
pub struct PlainTextBuffer {
    text: String,
}

impl PlainTextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EditorSurface for PlainTextBuffer {
    fn content(&self) -> String {
        self.text.clone()
    }

    fn replace_all(&mut self, content: &str) {
        self.text = content.to_string();
    }

    fn apply_delta(&mut self, delta: &EditDelta) -> bool {
        let start = match offset_at(&self.text, delta.start) {
            Some(offset) => offset,
            None => return false,
        };
        let end = match offset_at(&self.text, delta.end) {
            Some(offset) => offset,
            None => return false,
        };
        if start > end {
            return false;
        }
        self.text.replace_range(start..end, &delta.text);
        true
    }
}

/// Byte offset of a row/column position, or `None` when the position falls
/// outside the text. Columns count characters, not bytes.
fn offset_at(text: &str, pos: CursorPosition) -> Option<usize> {
    let mut row = 0usize;
    let mut column = 0usize;
    for (index, ch) in text.char_indices() {
        if row == pos.row && column == pos.column {
            return Some(index);
        }
        if ch == '\n' {
            if row == pos.row {
                // Column past the end of the target line.
                return None;
            }
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    if row == pos.row && column == pos.column {
        Some(text.len())
    } else {
        None
    }
}
