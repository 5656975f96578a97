#![forbid(unsafe_code)]

//! Presenter: state-tracked ANSI emission.
//!
//! Writes a whole [`Buffer`] per frame, tracking the current style so SGR
//! sequences are only emitted when a cell's style differs from its
//! predecessor. Output is wrapped in synchronized-update markers and flushed
//! once.

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::buffer::Buffer;
use crate::cell::{Cell, PackedRgba, StyleFlags};

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    flags: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            flags: cell.flags,
        }
    }
}

/// State-tracked ANSI presenter.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    current_style: Option<CellStyle>,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
        }
    }

    /// Write every row of `buffer` and flush.
    pub fn present(&mut self, buffer: &Buffer) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "present",
            width = buffer.width(),
            height = buffer.height()
        )
        .entered();

        self.writer.write_all(ansi::SYNC_BEGIN)?;
        for y in 0..buffer.height() {
            ansi::cup(&mut self.writer, y, 0)?;
            for cell in buffer.row_cells(y) {
                if cell.is_continuation() {
                    continue;
                }
                self.apply_style(cell)?;
                if let Some(cluster) = buffer.grapheme(cell.content) {
                    self.writer.write_all(cluster.as_bytes())?;
                    continue;
                }
                let ch = cell.content.as_char().unwrap_or(' ');
                let mut utf8 = [0u8; 4];
                self.writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
            }
        }
        ansi::sgr_reset(&mut self.writer)?;
        self.current_style = None;
        self.writer.write_all(ansi::SYNC_END)?;
        self.writer.flush()
    }

    fn apply_style(&mut self, cell: &Cell) -> io::Result<()> {
        let style = CellStyle::from_cell(cell);
        if self.current_style == Some(style) {
            return Ok(());
        }
        ansi::sgr_reset(&mut self.writer)?;
        ansi::sgr_flags(&mut self.writer, style.flags)?;
        ansi::sgr_fg_packed(&mut self.writer, style.fg)?;
        ansi::sgr_bg_packed(&mut self.writer, style.bg)?;
        self.current_style = Some(style);
        Ok(())
    }

    /// Consume the presenter and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present_to_string(buffer: &Buffer) -> String {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(buffer).expect("present");
        let bytes = presenter.into_inner().expect("flush");
        String::from_utf8(bytes).expect("utf8")
    }

    #[test]
    fn output_is_synchronized_and_reset() {
        let out = present_to_string(&Buffer::new(2, 1));
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn each_row_is_positioned() {
        let out = present_to_string(&Buffer::new(1, 3));
        assert!(out.contains("\x1b[1;1H"));
        assert!(out.contains("\x1b[2;1H"));
        assert!(out.contains("\x1b[3;1H"));
    }

    #[test]
    fn text_appears_in_order() {
        let mut buf = Buffer::new(3, 1);
        buf.set(0, 0, Cell::from_char('h'));
        buf.set(1, 0, Cell::from_char('i'));
        let out = present_to_string(&buf);
        assert!(out.contains("hi "));
    }

    #[test]
    fn style_emitted_once_per_run() {
        let mut buf = Buffer::new(3, 1);
        let red = PackedRgba::rgb(255, 0, 0);
        for x in 0..3 {
            buf.set(x, 0, Cell::from_char('r').with_fg(red));
        }
        let out = present_to_string(&buf);
        assert_eq!(out.matches("\x1b[38;2;255;0;0m").count(), 1);
    }

    #[test]
    fn grapheme_clusters_are_written_whole() {
        let mut buf = Buffer::new(2, 1);
        let content = buf.intern("a\u{308}", 1);
        buf.set(0, 0, Cell::new(content));
        let out = present_to_string(&buf);
        assert!(out.contains("a\u{308} "));
    }

    #[test]
    fn wide_chars_skip_continuation() {
        let mut buf = Buffer::new(3, 1);
        buf.set(0, 0, Cell::from_char('你'));
        let out = present_to_string(&buf);
        assert!(out.contains("你 "));
        assert!(!out.contains("你  "));
    }
}
