#![forbid(unsafe_code)]

//! Cell styling for widgets.

use hovertip_render::cell::{Cell, PackedRgba, StyleFlags};

/// Optional colors and attributes layered onto a cell.
///
/// Unset colors leave the cell's existing color in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub flags: StyleFlags,
}

impl Style {
    /// An empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            flags: StyleFlags::empty(),
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add style flags.
    #[must_use]
    pub fn flags(mut self, flags: StyleFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Whether nothing is set.
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }

    /// Apply this style to `cell`.
    #[must_use]
    pub fn apply(&self, mut cell: Cell) -> Cell {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        cell.flags |= self.flags;
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(Style::default().is_empty());
        assert_eq!(Style::new(), Style::default());
    }

    #[test]
    fn builder_sets_fields() {
        let style = Style::new()
            .fg(PackedRgba::BLACK)
            .bg(PackedRgba::WHITE)
            .flags(StyleFlags::BOLD);
        assert_eq!(style.fg, Some(PackedRgba::BLACK));
        assert_eq!(style.bg, Some(PackedRgba::WHITE));
        assert!(style.flags.contains(StyleFlags::BOLD));
        assert!(!style.is_empty());
    }

    #[test]
    fn apply_keeps_unset_colors() {
        let cell = Cell::from_char('x').with_bg(PackedRgba::rgb(1, 2, 3));
        let styled = Style::new().fg(PackedRgba::BLACK).apply(cell);
        assert_eq!(styled.fg, PackedRgba::BLACK);
        assert_eq!(styled.bg, PackedRgba::rgb(1, 2, 3));
        assert_eq!(styled.content.as_char(), Some('x'));
    }
}
