//! UTF-8 decoding layered on the streaming reader.
//!
//! This module never touches blocks: it is written entirely in terms of
//! [`EditBuffer::read_one`], [`EditBuffer::seek`], and
//! [`EditBuffer::tell`], so it works across block boundaries for free.
//!
//! Malformed input never stalls the decoder: an invalid leading byte, a
//! missing continuation, or an invalid scalar value yields U+FFFD and leaves
//! the cursor exactly one byte past where decoding started, guaranteeing
//! forward progress of one byte per malformed sequence.

use crate::edit_buffer::EditBuffer;

/// Returns true for UTF-8 continuation bytes (0x80..=0xBF).
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

impl EditBuffer {
    /// Decodes one code point at the cursor, consuming 1-4 bytes.
    ///
    /// Returns `None` at the end of the document. Malformed sequences decode
    /// to U+FFFD and consume exactly one byte (see the module docs).
    pub fn decode_codepoint(&mut self) -> Option<char> {
        let start = self.tell();
        let lead = self.read_one()?;

        if lead < 0x80 {
            return Some(lead as char);
        }

        let (continuations, mut scalar) = match lead {
            0xC2..=0xDF => (1, u32::from(lead & 0x1F)),
            0xE0..=0xEF => (2, u32::from(lead & 0x0F)),
            0xF0..=0xF4 => (3, u32::from(lead & 0x07)),
            // 0x80..=0xC1 and 0xF5..=0xFF can never lead a sequence.
            _ => return Some(self.resync(start)),
        };

        for _ in 0..continuations {
            match self.read_one() {
                Some(byte) if is_continuation(byte) => {
                    scalar = (scalar << 6) | u32::from(byte & 0x3F);
                }
                _ => return Some(self.resync(start)),
            }
        }

        // Surrogates and out-of-range values fail here and resynchronize
        // like any other malformed sequence.
        match char::from_u32(scalar) {
            Some(ch) => Some(ch),
            None => Some(self.resync(start)),
        }
    }

    /// Repositions the cursor one byte past a failed decode and returns the
    /// replacement character.
    fn resync(&mut self, start: usize) -> char {
        self.seek(start + 1);
        char::REPLACEMENT_CHARACTER
    }

    /// Moves the cursor by `delta` code points: forward for positive values,
    /// backward for negative. Stops early at either end of the document.
    /// Returns the new byte offset.
    pub fn seek_codepoints(&mut self, delta: isize) -> usize {
        if delta < 0 {
            self.seek_codepoints_backward(delta.unsigned_abs())
        } else {
            self.seek_codepoints_forward(delta as usize)
        }
    }

    fn seek_codepoints_forward(&mut self, mut count: usize) -> usize {
        while count > 0 && self.decode_codepoint().is_some() {
            count -= 1;
        }
        self.tell()
    }

    /// Walks backward one code point at a time by scanning raw bytes.
    ///
    /// A byte >= 0xC0 always counts as a sequence start on its own. Anything
    /// else scans backward over at most three continuation bytes (UTF-8's
    /// maximum), then cross-checks by decoding forward from the computed
    /// start: if the forward decode lands somewhere other than where the
    /// backward scan began, the bytes were not valid UTF-8 and the forward
    /// decode wins.
    fn seek_codepoints_backward(&mut self, mut count: usize) -> usize {
        let mut cursor = self.tell();
        while count > 0 && cursor > 0 {
            count -= 1;
            let begin = cursor;
            cursor -= 1;
            self.seek(cursor);
            let mut byte = self.read_one();

            if matches!(byte, Some(b) if b >= 0xC0) {
                continue;
            }

            let mut hops = 3;
            while hops > 0 && matches!(byte, Some(b) if is_continuation(b)) && cursor > 0 {
                hops -= 1;
                cursor -= 1;
                self.seek(cursor);
                byte = self.read_one();
            }

            self.seek(cursor);
            self.decode_codepoint();
            if self.tell() != begin {
                cursor = self.tell();
            }
        }
        self.seek(cursor)
    }
}
