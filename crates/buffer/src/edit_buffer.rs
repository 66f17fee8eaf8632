//! EditBuffer is the main public API for byte-level editing operations.
//!
//! The document is stored in a doubly linked chain of fixed-capacity blocks.
//! A cursor resolver caches which block contains the current offset, so
//! seeking costs time proportional to the distance moved rather than to the
//! document size, and every edit touches at most one block per step.

use log::trace;

use crate::block::{BlockArena, BlockId};

/// Default block capacity in bytes. Must be even: splitting a full block
/// produces two half-capacity blocks.
pub const DEFAULT_BLOCK_CAPACITY: usize = 2048;

/// Resolver cache: the block currently containing the cursor, or the
/// past-the-end state when the cursor sits at the document length.
///
/// `base` is the absolute offset of the block's first byte. In the `AtEnd`
/// state no base is stored; recovery derives it from the tail block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Positioned { block: BlockId, base: usize },
    AtEnd,
}

/// An editable byte buffer with stream-style cursor semantics.
///
/// All reads, inserts, and deletes happen at the cursor:
/// - [`seek`](Self::seek) repositions it (out-of-range targets are clamped),
/// - [`read_one`](Self::read_one) / [`read_slice`](Self::read_slice) consume
///   bytes forward,
/// - [`insert`](Self::insert) writes at the cursor and advances it,
/// - [`delete`](Self::delete) removes bytes backward from it, like the
///   backspace key.
///
/// The buffer maintains these invariants between public calls:
/// - the block lengths sum to [`len`](Self::len),
/// - no block in the chain is empty (an emptied block is freed immediately),
/// - no block exceeds its capacity (a full block splits before a mid-block
///   insertion).
#[derive(Debug)]
pub struct EditBuffer {
    arena: BlockArena,
    head: Option<BlockId>,
    tail: Option<BlockId>,
    len: usize,
    cursor: usize,
    cache: Cursor,
}

impl EditBuffer {
    /// Creates an empty buffer with the default block capacity.
    pub fn new() -> Self {
        Self::with_block_capacity(DEFAULT_BLOCK_CAPACITY)
    }

    /// Creates an empty buffer whose blocks hold `capacity` bytes each.
    ///
    /// Small capacities are useful for exercising the split and merge paths
    /// in tests.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or odd.
    pub fn with_block_capacity(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity % 2 == 0,
            "block capacity must be even and nonzero"
        );
        Self {
            arena: BlockArena::new(capacity),
            head: None,
            tail: None,
            len: 0,
            cursor: 0,
            cache: Cursor::AtEnd,
        }
    }

    // ==================== Accessors ====================

    /// Total byte count of the document.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the document holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current absolute cursor offset.
    pub fn tell(&self) -> usize {
        self.cursor
    }

    /// Block capacity this buffer was created with.
    pub fn block_capacity(&self) -> usize {
        self.arena.block_capacity()
    }

    /// Number of live blocks in the chain. Diagnostic only.
    pub fn block_count(&self) -> usize {
        self.arena.live()
    }

    /// Bytes of block storage currently allocated. Diagnostic only.
    pub fn allocated_bytes(&self) -> usize {
        self.arena.allocated_bytes()
    }

    /// Copies the whole document out, in order. Does not move the cursor.
    pub fn contents(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.head;
        while let Some(id) = current {
            let block = &self.arena[id];
            out.extend_from_slice(block.contents());
            current = block.next;
        }
        out
    }

    /// Starting offset and used length of each block, in chain order.
    pub(crate) fn block_spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::with_capacity(self.arena.live());
        let mut offset = 0;
        let mut current = self.head;
        while let Some(id) = current {
            let block = &self.arena[id];
            spans.push((offset, block.used()));
            offset += block.used();
            current = block.next;
        }
        spans
    }

    /// Absolute offset of the cursor block's first byte, or `None` in the
    /// past-the-end state.
    pub(crate) fn cursor_base(&self) -> Option<usize> {
        match self.cache {
            Cursor::Positioned { base, .. } => Some(base),
            Cursor::AtEnd => None,
        }
    }

    // ==================== Resolver ====================

    /// Moves the cursor to `target`, clamped to `[0, len]`, and repositions
    /// the resolver cache on the block containing it. Returns the clamped
    /// offset.
    ///
    /// The walk starts from the previously cached block, so the cost is
    /// proportional to the distance moved.
    pub fn seek(&mut self, target: usize) -> usize {
        let target = target.min(self.len);

        // Backtrack from the past-the-end state when the target moves
        // backward into the document.
        if self.cache == Cursor::AtEnd && target < self.len {
            self.backtrack();
        }

        while let Cursor::Positioned { block, base } = self.cache {
            let (used, prev, next) = {
                let node = &self.arena[block];
                (node.used(), node.prev, node.next)
            };
            if target < base {
                match prev {
                    Some(prev) => {
                        let base = base - self.arena[prev].used();
                        self.cache = Cursor::Positioned { block: prev, base };
                    }
                    // First block already; clamp here.
                    None => break,
                }
            } else if target >= base + used && used > 0 {
                self.cache = match next {
                    Some(next) => Cursor::Positioned {
                        block: next,
                        base: base + used,
                    },
                    None => Cursor::AtEnd,
                };
            } else {
                break;
            }
        }

        self.cursor = target;
        target
    }

    /// Reattaches the cache to the tail block when it is past the end and
    /// the chain is non-empty.
    fn backtrack(&mut self) {
        if self.cache == Cursor::AtEnd {
            if let Some(tail) = self.tail {
                self.cache = Cursor::Positioned {
                    block: tail,
                    base: self.len - self.arena[tail].used(),
                };
            }
        }
    }

    /// Like [`backtrack`](Self::backtrack), but allocates the first block of
    /// an empty chain so a concrete write target always exists. Returns the
    /// positioned cache.
    fn attach_block(&mut self) -> (BlockId, usize) {
        self.backtrack();
        match self.cache {
            Cursor::Positioned { block, base } => (block, base),
            Cursor::AtEnd => {
                let block = self.arena.alloc();
                self.head = Some(block);
                self.tail = Some(block);
                self.cache = Cursor::Positioned { block, base: 0 };
                (block, 0)
            }
        }
    }

    // ==================== Reader ====================

    /// Reads the byte at the cursor and advances past it. Returns `None` at
    /// the end of the document.
    pub fn read_one(&mut self) -> Option<u8> {
        let byte = match self.cache {
            Cursor::Positioned { block, base } => Some(self.arena[block].byte(self.cursor - base)),
            Cursor::AtEnd => None,
        };
        self.seek(self.cursor + 1);
        byte
    }

    /// Reads up to `max` bytes into `dest`, stopping early at the end of the
    /// document, at `dest`'s capacity, or after consuming any byte in
    /// `delims`. Returns the number of bytes copied; a consumed delimiter is
    /// neither copied nor counted.
    pub fn read_slice(&mut self, delims: &[u8], max: usize, dest: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < max && copied < dest.len() {
            let byte = match self.read_one() {
                Some(byte) => byte,
                None => break,
            };
            if delims.contains(&byte) {
                break;
            }
            dest[copied] = byte;
            copied += 1;
        }
        copied
    }

    // ==================== Mutator: insert ====================

    /// Inserts `bytes` at the cursor. On return the cursor has advanced past
    /// the inserted bytes.
    ///
    /// Works in bounded steps: each step re-resolves the cursor, splits or
    /// extends the chain if the target block is full, and writes as much as
    /// fits in that one block.
    pub fn insert(&mut self, bytes: &[u8]) {
        let origin = self.cursor;
        let mut written = 0;
        while written < bytes.len() {
            self.seek(origin + written);
            written += self.write_step(&bytes[written..]);
        }
        self.seek(origin + bytes.len());
    }

    /// One bounded write at the cursor. Returns the number of bytes written
    /// (always at least 1).
    fn write_step(&mut self, src: &[u8]) -> usize {
        let (mut block, mut base) = self.attach_block();
        let mut local = self.cursor - base;

        if self.arena[block].is_full() {
            if local < self.arena[block].used() {
                // Insertion point strictly inside a full block: split it
                // into two half-capacity blocks.
                self.split(block);
            } else {
                // Insertion at the end of a full block: a fresh successor
                // is enough, nothing to carry over.
                self.alloc_after(block);
            }
            // Re-resolve into the half (or the fresh block) that now holds
            // the insertion point.
            self.seek(self.cursor);
            (block, base) = self.attach_block();
            local = self.cursor - base;
        }

        let written = self.arena[block].insert_at(local, src);
        self.len += written;
        written
    }

    /// Splits a full block in two: the lower half stays, the upper half
    /// moves into a fresh successor.
    fn split(&mut self, block: BlockId) {
        let successor = self.alloc_after(block);
        let upper = self.arena[block].take_upper_half();
        let moved = self.arena[successor].insert_at(0, &upper);
        debug_assert_eq!(moved, upper.len());
        trace!("split block {:?}, upper half moved to {:?}", block, successor);
    }

    /// Allocates an empty block and links it directly after `parent`.
    fn alloc_after(&mut self, parent: BlockId) -> BlockId {
        let id = self.arena.alloc();
        let next = self.arena[parent].next;
        self.arena[id].prev = Some(parent);
        self.arena[id].next = next;
        self.arena[parent].next = Some(id);
        match next {
            Some(next) => self.arena[next].prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }

    // ==================== Mutator: delete ====================

    /// Deletes up to `count` bytes immediately before the cursor (backspace
    /// semantics). Stops at the start of the document. Returns the number of
    /// bytes actually removed; the cursor regresses by the same amount.
    pub fn delete(&mut self, count: usize) -> usize {
        let target = self.cursor.saturating_sub(count);
        self.backtrack();
        let mut removed = 0;

        while self.cursor > target {
            let (block, base) = match self.cache {
                Cursor::Positioned { block, base } => (block, base),
                // Empty chain; nothing left to delete.
                Cursor::AtEnd => break,
            };
            let local = self.cursor - base;

            if local == 0 {
                // The byte before the cursor is the predecessor's last byte:
                // deleting it is a length decrement there.
                let prev = match self.arena[block].prev {
                    Some(prev) => prev,
                    None => break,
                };
                self.arena[prev].shrink_tail();
                self.len -= 1;
                self.cursor -= 1;
                self.cache = Cursor::Positioned {
                    block,
                    base: base - 1,
                };
                if self.arena[prev].used() == 0 {
                    self.unlink_free(prev);
                }
            } else {
                self.arena[block].remove(local - 1);
                self.len -= 1;
                self.cursor -= 1;
                if self.arena[block].used() == 0 {
                    let prev = self.arena[block].prev;
                    let next = self.arena[block].next;
                    self.unlink_free(block);
                    // Re-anchor the cache so it still names a live block:
                    // prefer the predecessor, fall back to the successor,
                    // and report past-the-end when the chain emptied.
                    self.cache = match (prev, next) {
                        (Some(prev), _) => Cursor::Positioned {
                            block: prev,
                            base: base - self.arena[prev].used(),
                        },
                        (None, Some(next)) => Cursor::Positioned { block: next, base },
                        (None, None) => Cursor::AtEnd,
                    };
                }
            }
            removed += 1;
        }

        // The loop can end with the cursor on a block boundary; renormalize
        // so the cache block strictly contains the cursor again.
        self.seek(self.cursor);
        removed
    }

    /// Unlinks a block from the chain and releases its storage.
    fn unlink_free(&mut self, block: BlockId) {
        let prev = self.arena[block].prev;
        let next = self.arena[block].next;
        match prev {
            Some(prev) => self.arena[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.arena[next].prev = prev,
            None => self.tail = prev,
        }
        self.arena.release(block);
    }
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new()
    }
}
