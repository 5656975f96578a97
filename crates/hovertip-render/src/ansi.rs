#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte-generation functions; state tracking lives in the presenter.
//!
//! | Sequence | Description |
//! |----------|-------------|
//! | `ESC [ n m` | SGR (Select Graphic Rendition) |
//! | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | `ESC [ ? 2026 h/l` | Synchronized Output (DEC) |

use std::io::{self, Write};

use crate::cell::{PackedRgba, StyleFlags};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Begin synchronized output: `CSI ? 2026 h`
pub const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";

/// End synchronized output: `CSI ? 2026 l`
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

/// Write SGR reset sequence.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Write SGR codes for every set style flag.
///
/// Does not emit reset first; the caller owns state management.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    const CODES: [(StyleFlags, u8); 5] = [
        (StyleFlags::BOLD, 1),
        (StyleFlags::DIM, 2),
        (StyleFlags::ITALIC, 3),
        (StyleFlags::UNDERLINE, 4),
        (StyleFlags::REVERSE, 7),
    ];
    for (flag, code) in CODES {
        if flags.contains(flag) {
            write!(w, "\x1b[{code}m")?;
        }
    }
    Ok(())
}

/// Write SGR for a packed color as foreground; transparent means default.
pub fn sgr_fg_packed<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.a() == 0 {
        return w.write_all(b"\x1b[39m");
    }
    write!(w, "\x1b[38;2;{};{};{}m", color.r(), color.g(), color.b())
}

/// Write SGR for a packed color as background; transparent means default.
pub fn sgr_bg_packed<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.a() == 0 {
        return w.write_all(b"\x1b[49m");
    }
    write!(w, "\x1b[48;2;{};{};{}m", color.r(), color.g(), color.b())
}

/// CUP (Cursor Position): 0-indexed input, 1-indexed on the wire.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row.saturating_add(1),
        col.saturating_add(1)
    )
}
