//! Navigation helpers: byte search, line geometry, word extraction, and
//! scrolling.
//!
//! These are plain linear scans expressed through [`EditBuffer::seek`] and
//! the streaming reader; they carry no structural knowledge of the block
//! chain. Because they read through the cursor, every helper here moves it.
//! Callers that care about the cursor position should `seek` afterwards.

use crate::edit_buffer::EditBuffer;

impl EditBuffer {
    /// Scans forward from `from` for `byte`. Returns the offset of the first
    /// match, or `None` when the end of the document is reached first.
    pub fn find_forward(&mut self, byte: u8, from: usize) -> Option<usize> {
        let mut at = from.min(self.len());
        self.seek(at);
        while let Some(current) = self.read_one() {
            if current == byte {
                return Some(at);
            }
            at += 1;
        }
        None
    }

    /// Scans backward from `from` (inclusive) for `byte`. Returns the offset
    /// of the first match, or `None` when the start of the document is
    /// reached first.
    pub fn find_backward(&mut self, byte: u8, from: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let mut at = from.min(self.len() - 1);
        loop {
            self.seek(at);
            if self.read_one() == Some(byte) {
                return Some(at);
            }
            if at == 0 {
                return None;
            }
            at -= 1;
        }
    }

    /// Offset of the first byte of the line containing `at`.
    ///
    /// When `at` sits on a newline, that newline's own line is measured.
    pub fn line_start(&mut self, at: usize) -> usize {
        if at == 0 {
            return 0;
        }
        match self.find_backward(b'\n', at - 1) {
            Some(newline) => newline + 1,
            None => 0,
        }
    }

    /// Offset of the newline ending the line containing `at`, or the
    /// document length for the final line.
    pub fn line_end(&mut self, at: usize) -> usize {
        self.find_forward(b'\n', at).unwrap_or(self.len())
    }

    /// Length of the line containing `at`, excluding the newline.
    pub fn line_len(&mut self, at: usize) -> usize {
        let start = self.line_start(at);
        self.line_end(start) - start
    }

    /// Column of `at` within its line.
    pub fn column(&mut self, at: usize) -> usize {
        let at = at.min(self.len());
        at - self.line_start(at)
    }

    /// Offset of the first byte of the line before the one containing `at`.
    /// The first line is its own predecessor.
    pub fn prev_line_start(&mut self, at: usize) -> usize {
        let start = self.line_start(at);
        if start == 0 {
            return 0;
        }
        // start - 1 is the previous line's terminating newline.
        self.line_start(start - 1)
    }

    /// Offset of the first byte of the line after the one containing `at`,
    /// or the document length when `at` is on the last line.
    pub fn next_line_start(&mut self, at: usize) -> usize {
        let end = self.line_end(at);
        if end == self.len() {
            end
        } else {
            end + 1
        }
    }

    /// Offset for column `x` of the line `y` lines below `from`, clamped to
    /// the document length.
    pub fn offset_at(&mut self, x: usize, y: usize, from: usize) -> usize {
        let mut pos = from;
        for _ in 0..y {
            pos = self.next_line_start(pos);
        }
        (pos + x).min(self.len())
    }

    /// Column of `to` and the number of line advances from `from` down to
    /// `to`, as `(column, lines)`.
    pub fn xy_delta(&mut self, from: usize, to: usize) -> (usize, usize) {
        let mut pos = from;
        let mut lines = 0;
        while pos < to && pos < self.len() {
            let next = self.next_line_start(pos);
            if next > to {
                break;
            }
            pos = next;
            lines += 1;
        }
        (self.column(to), lines)
    }

    /// Returns the space-delimited word around `at`. Returns an empty string
    /// when `at` sits on a space.
    pub fn word_at(&mut self, at: usize) -> String {
        let begin = match self.find_backward(b' ', at) {
            Some(space) => space + 1,
            None => 0,
        };
        let end = self.find_forward(b' ', at).unwrap_or(self.len());

        let mut word = vec![0u8; end.saturating_sub(begin)];
        self.seek(begin);
        let copied = self.read_slice(&[], word.len(), &mut word);
        word.truncate(copied);
        String::from_utf8_lossy(&word).into_owned()
    }

    /// Returns the offset after scrolling `lines` lines from `pos`:
    /// downward for positive values, upward for negative.
    pub fn scroll(&mut self, pos: usize, lines: isize) -> usize {
        let mut pos = pos;
        if lines >= 0 {
            for _ in 0..lines {
                pos = self.next_line_start(pos);
            }
        } else {
            for _ in 0..lines.unsigned_abs() {
                pos = self.prev_line_start(pos);
            }
        }
        pos
    }
}
