//! block-edit-buffer: an editable byte buffer with stream-style semantics.
//!
//! The document lives in a doubly linked chain of fixed-capacity blocks
//! instead of one contiguous array, so edits near the cursor move at most
//! one block's worth of bytes and never reallocate the whole document.
//!
//! # Overview
//!
//! The main type is [`EditBuffer`], which provides:
//! - Cursor-relative insertion and backspace-style deletion
//! - Random-access seeking with offset clamping
//! - Streaming single-byte and delimited reads
//! - UTF-8 decoding and code-point-granular cursor movement that recovers
//!   from malformed bytes
//! - Line/column navigation helpers and a diagnostic state dump
//!
//! # Example
//!
//! ```
//! use block_edit_buffer::EditBuffer;
//!
//! let mut buf = EditBuffer::new();
//! buf.insert(b"bar");
//! buf.seek(1);
//! buf.delete(1); // backspace the 'b'
//!
//! buf.seek(0);
//! let mut out = Vec::new();
//! while let Some(byte) = buf.read_one() {
//!     out.push(byte);
//! }
//! assert_eq!(out, b"ar");
//! ```
//!
//! # Cursor model
//!
//! Every operation happens at the cursor, an absolute byte offset. Reads
//! consume bytes (they are not peeks), inserts advance the cursor past the
//! new bytes, and deletes pull it backward. Out-of-range seeks clamp to the
//! document bounds instead of failing; the end of the document is signalled
//! as `None` from the readers.

mod block;
mod dump;
mod edit_buffer;
mod navigate;
mod utf8;

pub use edit_buffer::{EditBuffer, DEFAULT_BLOCK_CAPACITY};
