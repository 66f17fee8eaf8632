//! Diagnostic dump of the buffer's internal state.

use std::io::{self, Write};

use crate::edit_buffer::EditBuffer;

impl EditBuffer {
    /// Writes the buffer's bookkeeping, a per-block utilization table, and
    /// the document content with the cursor position marked by `#`.
    ///
    /// Purely observational: reads the chain directly and leaves the cursor
    /// where it is. The output format is for human inspection and not a
    /// stable interface.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "len: {}", self.len())?;
        writeln!(out, "cursor: {}", self.tell())?;
        match self.cursor_base() {
            Some(base) => writeln!(out, "cursor block base: {}", base)?,
            None => writeln!(out, "cursor block: past-the-end")?,
        }
        writeln!(out, "blocks: {}", self.block_count())?;
        writeln!(out, "allocated: {} bytes", self.allocated_bytes())?;

        let capacity = self.block_capacity();
        for (index, (offset, used)) in self.block_spans().into_iter().enumerate() {
            writeln!(
                out,
                "block {}: offset={} len={} util={:.1}%",
                index,
                offset,
                used,
                used as f64 / capacity as f64 * 100.0
            )?;
        }

        let contents = self.contents();
        let cursor = self.tell();
        out.write_all(b"content: ")?;
        out.write_all(&contents[..cursor])?;
        out.write_all(b"#")?;
        out.write_all(&contents[cursor..])?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
