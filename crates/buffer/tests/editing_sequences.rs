//! Integration tests for realistic editing sequences.
//!
//! These exercise the block chain through the public API only: seeks,
//! streaming reads, inserts that split blocks, and backspace deletes that
//! drain and free them.

use block_edit_buffer::EditBuffer;
use pretty_assertions::assert_eq;

fn read_from_start(buf: &mut EditBuffer) -> Vec<u8> {
    buf.seek(0);
    let mut out = Vec::new();
    while let Some(byte) = buf.read_one() {
        out.push(byte);
    }
    out
}

#[test]
fn round_trip_through_empty_buffer() {
    let mut buf = EditBuffer::new();
    buf.seek(0);
    buf.insert(b"HelLo world!");
    assert_eq!(buf.len(), 12);
    assert_eq!(read_from_start(&mut buf), b"HelLo world!");
}

#[test]
fn backspace_deletes_bytes_before_cursor() {
    let mut buf = EditBuffer::new();
    buf.insert(b"HelLo world!");
    buf.seek(5);

    // Removes "lLo", the three bytes immediately before offset 5.
    assert_eq!(buf.delete(3), 3);
    assert_eq!(buf.tell(), 2);
    assert_eq!(read_from_start(&mut buf), b"He world!");

    // One more backspace from the same spot removes the 'e'.
    buf.seek(2);
    assert_eq!(buf.delete(1), 1);
    assert_eq!(read_from_start(&mut buf), b"H world!");
}

#[test]
fn splits_preserve_byte_order() {
    // Deliberately tiny blocks so a 9-byte insert is guaranteed to split
    // and chain several times.
    let mut buf = EditBuffer::with_block_capacity(4);
    buf.insert(b"123456789");
    assert_eq!(read_from_start(&mut buf), b"123456789");

    // Mid-block insertion into full blocks splits again; order must hold.
    buf.seek(4);
    buf.insert(b"abc");
    assert_eq!(read_from_start(&mut buf), b"1234abc56789");
}

#[test]
fn seek_clamp_is_idempotent() {
    let mut buf = EditBuffer::new();
    buf.insert(b"hello");
    for k in [0usize, 1, 100, 10_000] {
        assert_eq!(buf.seek(buf.len() + k), buf.len());
    }
    assert_eq!(buf.seek(0), 0);
    assert_eq!(buf.seek(0), 0);
}

#[test]
fn insert_cursor_lands_past_inserted_bytes() {
    // Spans several write steps: splits and fresh blocks included.
    let mut buf = EditBuffer::with_block_capacity(4);
    buf.insert(b"abcdefgh");
    buf.seek(3);
    buf.insert(b"0123456789");
    assert_eq!(buf.tell(), 13);
    assert_eq!(read_from_start(&mut buf), b"abc0123456789defgh");
}

#[test]
fn whole_document_delete_empties_the_chain() {
    let mut buf = EditBuffer::with_block_capacity(4);
    buf.insert(b"0123456789abcdef");
    assert!(buf.block_count() >= 4);

    // Delete more than the document holds; the clamp stops at offset 0.
    buf.seek(buf.len());
    assert_eq!(buf.delete(buf.len() + 7), 16);
    assert!(buf.is_empty());
    assert_eq!(buf.tell(), 0);
    assert_eq!(buf.block_count(), 0);
    assert_eq!(buf.allocated_bytes(), 0);

    // The buffer stays usable afterwards.
    buf.insert(b"again");
    assert_eq!(read_from_start(&mut buf), b"again");
}

#[test]
fn diagnostic_counters_track_the_chain() {
    let mut buf = EditBuffer::with_block_capacity(4);
    buf.insert(b"abcdefghij");
    assert_eq!(buf.allocated_bytes(), buf.block_count() * 4);

    buf.seek(buf.len());
    buf.delete(6);
    assert_eq!(buf.allocated_bytes(), buf.block_count() * 4);
    assert!(buf.block_count() >= 1);
}

#[test]
fn typing_with_corrections() {
    let mut buf = EditBuffer::with_block_capacity(8);

    buf.insert(b"teh"); // typo
    buf.delete(2);
    buf.insert(b"he");

    buf.insert(b" quikc"); // typo
    buf.delete(2);
    buf.insert(b"ck");

    buf.insert(b" brown fox");
    assert_eq!(read_from_start(&mut buf), b"the quick brown fox");
}

#[test]
fn interleaved_edits_at_scattered_offsets() {
    let mut buf = EditBuffer::with_block_capacity(4);
    buf.insert(b"HelLo world!");

    buf.seek(5);
    buf.delete(3);
    buf.seek(2);
    buf.insert(b"[ WHAT ]");
    assert_eq!(read_from_start(&mut buf), b"He[ WHAT ] world!");

    buf.seek(buf.len());
    buf.insert(b"!!");
    assert_eq!(read_from_start(&mut buf), b"He[ WHAT ] world!!!");

    buf.seek(10);
    buf.delete(8);
    assert_eq!(read_from_start(&mut buf), b"He world!!!");
}

/// Deterministic pseudo-random generator so the sequence below is stable.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

/// Drives the buffer and a plain `Vec<u8>` model through the same random
/// edit sequence and checks they never diverge. Small blocks keep the
/// split, borrow, and free paths hot.
#[test]
fn random_edits_match_reference_model() {
    let mut buf = EditBuffer::with_block_capacity(8);
    let mut model: Vec<u8> = Vec::new();
    let mut rng = Lcg(0x5eed);

    for step in 0..600 {
        match rng.next() % 3 {
            0 => {
                let target = rng.next() % (model.len() + 2);
                let clamped = buf.seek(target);
                assert_eq!(clamped, target.min(model.len()));
            }
            1 => {
                let count = rng.next() % 13;
                let byte = b'a' + (step % 26) as u8;
                let bytes = vec![byte; count];
                let at = buf.tell();
                buf.insert(&bytes);
                model.splice(at..at, bytes.iter().copied());
                assert_eq!(buf.tell(), at + count);
            }
            _ => {
                let count = rng.next() % 9;
                let at = buf.tell();
                let removed = buf.delete(count);
                assert_eq!(removed, count.min(at));
                model.drain(at - removed..at);
                assert_eq!(buf.tell(), at - removed);
            }
        }

        assert_eq!(buf.len(), model.len());
        assert_eq!(buf.contents(), model);
    }

    // Invariant check at the end: a full forward read reproduces the model
    // byte for byte, so block lengths and `len` agree.
    assert_eq!(read_from_start(&mut buf), model);
}
