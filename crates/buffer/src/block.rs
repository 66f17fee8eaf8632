//! Fixed-capacity storage blocks and the arena that owns them.
//!
//! The document is a doubly linked chain of blocks. Links are `BlockId`
//! handles into a per-buffer arena rather than owning pointers, so the chain
//! can be walked in both directions without any shared ownership.

use std::ops::{Index, IndexMut};

use log::trace;

/// Stable handle to a block in a [`BlockArena`].
///
/// Handles stay valid until the block is released; releasing recycles the
/// slot for future allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockId(usize);

/// One fixed-capacity storage unit holding a contiguous slice of the document.
///
/// Only the first `used` bytes of `data` are document content. A block never
/// grows past its capacity; insertion into a full block splits it first.
#[derive(Debug)]
pub(crate) struct Block {
    data: Box<[u8]>,
    used: usize,
    pub(crate) prev: Option<BlockId>,
    pub(crate) next: Option<BlockId>,
}

impl Block {
    fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            used: 0,
            prev: None,
            next: None,
        }
    }

    /// Number of valid document bytes in this block.
    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.used == self.data.len()
    }

    /// The byte at a block-local offset. `local` must be within the used
    /// prefix.
    pub(crate) fn byte(&self, local: usize) -> u8 {
        debug_assert!(local < self.used);
        self.data[local]
    }

    /// The valid prefix of the block's storage.
    pub(crate) fn contents(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Inserts as much of `src` as fits at `local`, shifting the suffix of
    /// the block right to open a gap. Returns the number of bytes written.
    pub(crate) fn insert_at(&mut self, local: usize, src: &[u8]) -> usize {
        debug_assert!(local <= self.used);
        let space = self.data.len() - self.used;
        let count = src.len().min(space);
        if local < self.used {
            self.data.copy_within(local..self.used, local + count);
        }
        self.data[local..local + count].copy_from_slice(&src[..count]);
        self.used += count;
        count
    }

    /// Removes the byte at `local`, closing the gap.
    pub(crate) fn remove(&mut self, local: usize) {
        debug_assert!(local < self.used);
        self.data.copy_within(local + 1..self.used, local);
        self.used -= 1;
    }

    /// Drops the last valid byte. Used when a backspace lands on the first
    /// byte of the next block: the deleted byte is this block's tail.
    pub(crate) fn shrink_tail(&mut self) {
        debug_assert!(self.used > 0);
        self.used -= 1;
    }

    /// Moves the upper half of a full block out, leaving the lower half in
    /// place. Capacity is even, so both halves are exactly `capacity / 2`.
    pub(crate) fn take_upper_half(&mut self) -> Vec<u8> {
        debug_assert!(self.is_full());
        let half = self.used / 2;
        let upper = self.data[half..self.used].to_vec();
        self.used = half;
        upper
    }
}

/// Per-buffer arena of blocks: a slot vector with a free list.
///
/// Released slots are recycled, so `BlockId`s are stable for a block's whole
/// lifetime and allocation does not shift existing blocks.
#[derive(Debug)]
pub(crate) struct BlockArena {
    slots: Vec<Option<Block>>,
    free: Vec<usize>,
    capacity: usize,
    live: usize,
}

impl BlockArena {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            capacity,
            live: 0,
        }
    }

    /// Block capacity for every block in this arena, in bytes.
    pub(crate) fn block_capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live blocks.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Total bytes of block storage currently allocated.
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.live * self.capacity
    }

    /// Allocates a fresh, unlinked, empty block.
    pub(crate) fn alloc(&mut self) -> BlockId {
        let block = Block::new(self.capacity);
        self.live += 1;
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(block);
                BlockId(slot)
            }
            None => {
                self.slots.push(Some(block));
                BlockId(self.slots.len() - 1)
            }
        };
        trace!("allocated block {:?} ({} bytes)", id, self.capacity);
        id
    }

    /// Releases a block. The caller must have unlinked it from the chain.
    pub(crate) fn release(&mut self, id: BlockId) {
        trace!("released block {:?}", id);
        self.slots[id.0] = None;
        self.free.push(id.0);
        self.live -= 1;
    }
}

impl Index<BlockId> for BlockArena {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        self.slots[id.0].as_ref().expect("stale block id")
    }
}

impl IndexMut<BlockId> for BlockArena {
    fn index_mut(&mut self, id: BlockId) -> &mut Block {
        self.slots[id.0].as_mut().expect("stale block id")
    }
}
