#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s with scissor (clipping) and opacity
//! stacks. Overlays such as tooltips push an opacity, draw, and pop it again;
//! every write under that opacity is composited over what is already there.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Opacity stack product stays in `[0.0, 1.0]`
//! 4. Scissor/opacity stacks always have at least one element

use crate::cell::{Cell, CellContent};
use crate::grapheme_pool::GraphemePool;
use hovertip_core::geometry::Rect;

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use hovertip_render::buffer::Buffer;
/// use hovertip_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// ```
#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scissor_stack: Vec<Rect>,
    opacity_stack: Vec<f32>,
    graphemes: GraphemePool,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
            scissor_stack: vec![Rect::from_size(width, height)],
            opacity_stack: vec![1.0],
            graphemes: GraphemePool::new(),
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// - Skips writes outside bounds or the current scissor
    /// - Composites the new background over the existing one
    /// - Applies the current opacity to both colors
    /// - Writes CONTINUATION cells after wide characters; a wide character
    ///   that does not fit entirely is not written at all
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        self.write(x, y, cell, false);
    }

    /// Draw a glyph at (x, y) onto the background already there.
    ///
    /// Like [`Buffer::set`], except `cell.bg` is ignored: the existing
    /// background is kept and only the foreground is faded by the current
    /// opacity. Text drawn over a fill under the same opacity therefore sits
    /// on the same background as the fill.
    pub fn set_glyph(&mut self, x: u16, y: u16, cell: Cell) {
        self.write(x, y, cell, true);
    }

    fn write(&mut self, x: u16, y: u16, cell: Cell, keep_bg: bool) {
        let width = cell.content.width().max(1);
        let scissor = self.current_scissor();
        for i in 0..width {
            let cx = x as usize + i;
            if cx >= self.width as usize || !scissor.contains(cx as u16, y) {
                return;
            }
        }
        let Some(idx) = self.index(x, y) else {
            return;
        };

        let opacity = self.current_opacity();
        let old = self.cells[idx];
        let bg = if keep_bg {
            old.bg
        } else if opacity < 1.0 {
            cell.bg.with_opacity(opacity).over(old.bg)
        } else {
            cell.bg.over(old.bg)
        };
        let fg = if opacity < 1.0 {
            cell.fg.with_opacity(opacity).over(old.bg)
        } else {
            cell.fg
        };
        self.cells[idx] = Cell { fg, bg, ..cell };

        for i in 1..width {
            let trailing = &mut self.cells[idx + i];
            *trailing = if keep_bg {
                Cell {
                    bg: trailing.bg,
                    ..Cell::CONTINUATION
                }
            } else {
                Cell::CONTINUATION
            };
        }
    }

    /// Content for one grapheme cluster `width` columns wide.
    ///
    /// A single scalar is stored inline; longer clusters are interned in
    /// this buffer's grapheme pool. If the pool is full only the first
    /// scalar is kept.
    pub fn intern(&mut self, grapheme: &str, width: usize) -> CellContent {
        let mut chars = grapheme.chars();
        let Some(first) = chars.next() else {
            return CellContent::EMPTY;
        };
        if chars.next().is_none() {
            return CellContent::from_char(first);
        }
        let width = u8::try_from(width).unwrap_or(u8::MAX);
        match self.graphemes.intern(grapheme, width) {
            Some(id) => CellContent::from_grapheme(id),
            None => CellContent::from_char(first),
        }
    }

    /// Text of a pooled grapheme cell, `None` for any other content.
    pub fn grapheme(&self, content: CellContent) -> Option<&str> {
        content.grapheme_id().and_then(|id| self.graphemes.get(id))
    }

    /// Fill a rectangular region with the given cell.
    ///
    /// Respects scissor region and applies opacity.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = self.current_scissor().intersection(&rect);
        if clipped.is_empty() {
            return;
        }

        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Clear all cells to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.graphemes.clear();
    }

    /// Get the cells for a single row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    // ========== Scissor Stack ==========

    /// Push a scissor (clipping) region onto the stack.
    ///
    /// The effective scissor is the intersection of all pushed rects.
    pub fn push_scissor(&mut self, rect: Rect) {
        let intersected = self.current_scissor().intersection(&rect);
        self.scissor_stack.push(intersected);
    }

    /// Pop a scissor region from the stack.
    ///
    /// Does nothing if only the base scissor remains.
    pub fn pop_scissor(&mut self) {
        if self.scissor_stack.len() > 1 {
            self.scissor_stack.pop();
        }
    }

    /// Get the current effective scissor region.
    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.scissor_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.bounds())
    }

    // ========== Opacity Stack ==========

    /// Push an opacity multiplier onto the stack.
    ///
    /// The effective opacity is the product of all pushed values.
    /// Values are clamped to `[0.0, 1.0]`.
    pub fn push_opacity(&mut self, opacity: f32) {
        let clamped = opacity.clamp(0.0, 1.0);
        let current = self.current_opacity();
        self.opacity_stack.push(current * clamped);
    }

    /// Pop an opacity value from the stack.
    ///
    /// Does nothing if only the base opacity remains.
    pub fn pop_opacity(&mut self) {
        if self.opacity_stack.len() > 1 {
            self.opacity_stack.pop();
        }
    }

    /// Get the current effective opacity.
    #[inline]
    pub fn current_opacity(&self) -> f32 {
        self.opacity_stack.last().copied().unwrap_or(1.0)
    }

    /// Get the opacity stack depth.
    #[inline]
    pub fn opacity_depth(&self) -> usize {
        self.opacity_stack.len()
    }

    /// Row `y` as plain text; empty cells render as spaces.
    pub fn row_text(&self, y: u16) -> String {
        let mut text = String::new();
        if y >= self.height {
            return text;
        }
        for cell in self.row_cells(y) {
            if cell.is_continuation() {
                continue;
            }
            match self.grapheme(cell.content) {
                Some(cluster) => text.push_str(cluster),
                None => text.push(cell.content.as_char().unwrap_or(' ')),
            }
        }
        text
    }
}

impl Default for Buffer {
    /// Create a 1x1 buffer (minimum size).
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::PackedRgba;

    #[test]
    fn new_buffer_is_blank() {
        let buf = Buffer::new(4, 2);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert!(buf.get(3, 1).is_some_and(Cell::is_empty));
        assert!(buf.get(4, 0).is_none());
        assert_eq!(buf.row_text(0), "    ");
    }

    #[test]
    #[should_panic(expected = "buffer width must be > 0")]
    fn zero_width_panics() {
        let _ = Buffer::new(0, 5);
    }

    #[test]
    fn set_out_of_bounds_is_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.set(5, 5, Cell::from_char('x'));
        assert_eq!(buf.row_text(0), "  ");
    }

    #[test]
    fn wide_char_writes_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('你'));
        assert_eq!(buf.get(0, 0).and_then(|c| c.content.as_char()), Some('你'));
        assert!(buf.get(1, 0).is_some_and(Cell::is_continuation));
    }

    #[test]
    fn wide_char_at_edge_is_not_written() {
        let mut buf = Buffer::new(3, 1);
        buf.set(2, 0, Cell::from_char('你'));
        assert!(buf.get(2, 0).is_some_and(Cell::is_empty));
    }

    #[test]
    fn scissor_clips_writes() {
        let mut buf = Buffer::new(5, 1);
        buf.push_scissor(Rect::new(1, 0, 2, 1));
        buf.fill(Rect::new(0, 0, 5, 1), Cell::from_char('#'));
        buf.pop_scissor();
        assert_eq!(buf.row_text(0), " ##  ");
    }

    #[test]
    fn pop_never_removes_base_entries() {
        let mut buf = Buffer::new(3, 3);
        buf.pop_scissor();
        buf.pop_opacity();
        assert_eq!(buf.current_scissor(), buf.bounds());
        assert_eq!(buf.current_opacity(), 1.0);
        assert_eq!(buf.opacity_depth(), 1);
    }

    #[test]
    fn opacity_stack_multiplies() {
        let mut buf = Buffer::new(1, 1);
        buf.push_opacity(0.5);
        buf.push_opacity(0.5);
        assert!((buf.current_opacity() - 0.25).abs() < 1e-6);
        buf.pop_opacity();
        assert!((buf.current_opacity() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_opacity_leaves_background_untouched() {
        let mut buf = Buffer::new(1, 1);
        buf.set(0, 0, Cell::from_char(' ').with_bg(PackedRgba::rgb(0, 0, 80)));
        let before = buf.get(0, 0).map(|c| c.bg);

        buf.push_opacity(0.0);
        buf.set(0, 0, Cell::from_char('x').with_bg(PackedRgba::rgb(255, 255, 0)));
        buf.pop_opacity();

        assert_eq!(buf.get(0, 0).map(|c| c.bg), before);
    }

    #[test]
    fn partial_opacity_blends_background() {
        let mut buf = Buffer::new(1, 1);
        buf.set(0, 0, Cell::from_char(' ').with_bg(PackedRgba::BLACK));
        buf.push_opacity(0.5);
        buf.set(0, 0, Cell::from_char('x').with_bg(PackedRgba::rgb(200, 0, 0)));
        buf.pop_opacity();

        let bg = buf.get(0, 0).map(|c| c.bg).unwrap_or_default();
        assert!(bg.r() > 90 && bg.r() < 110, "blended red = {}", bg.r());
    }

    #[test]
    fn glyph_keeps_faded_background() {
        let mut buf = Buffer::new(2, 1);
        buf.fill(buf.bounds(), Cell::from_char(' ').with_bg(PackedRgba::BLACK));
        buf.push_opacity(0.5);
        let bg = PackedRgba::rgb(200, 0, 0);
        buf.fill(buf.bounds(), Cell::from_char(' ').with_bg(bg));
        buf.set_glyph(1, 0, Cell::from_char('x').with_bg(bg));
        buf.pop_opacity();

        let pad = buf.get(0, 0).map(|c| c.bg);
        let glyph = buf.get(1, 0).copied().unwrap_or_default();
        assert_eq!(glyph.content.as_char(), Some('x'));
        assert_eq!(Some(glyph.bg), pad);
        assert!(glyph.fg.r() < 255, "fg faded: {:?}", glyph.fg);
    }

    #[test]
    fn glyph_at_full_opacity_keeps_background() {
        let mut buf = Buffer::new(1, 1);
        let bg = PackedRgba::rgb(0, 0, 80);
        buf.set(0, 0, Cell::from_char(' ').with_bg(bg));
        buf.set_glyph(0, 0, Cell::from_char('y').with_fg(PackedRgba::WHITE));
        let cell = buf.get(0, 0).copied().unwrap_or_default();
        assert_eq!(cell.bg, bg);
        assert_eq!(cell.fg, PackedRgba::WHITE);
    }

    #[test]
    fn combining_cluster_survives_in_row_text() {
        let mut buf = Buffer::new(3, 1);
        let content = buf.intern("e\u{301}", 1);
        assert!(content.is_grapheme());
        buf.set(1, 0, Cell::new(content));
        assert_eq!(buf.row_text(0), " e\u{301} ");
        assert_eq!(buf.grapheme(content), Some("e\u{301}"));
    }

    #[test]
    fn single_scalar_is_stored_inline() {
        let mut buf = Buffer::new(1, 1);
        assert_eq!(buf.intern("a", 1), CellContent::from_char('a'));
        assert_eq!(buf.intern("", 0), CellContent::EMPTY);
    }

    #[test]
    fn wide_cluster_writes_continuation() {
        let mut buf = Buffer::new(3, 1);
        let content = buf.intern("👍🏽", 2);
        buf.set(0, 0, Cell::new(content));
        assert!(buf.get(1, 0).is_some_and(Cell::is_continuation));
        assert_eq!(buf.row_text(0), "👍🏽 ");
    }

    #[test]
    fn clear_resets_cells() {
        let mut buf = Buffer::new(2, 1);
        buf.set(0, 0, Cell::from_char('a'));
        buf.clear();
        assert_eq!(buf.row_text(0), "  ");
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fill_never_escapes_scissor(
                sx in 0u16..10, sy in 0u16..10, sw in 0u16..10, sh in 0u16..10,
            ) {
                let mut buf = Buffer::new(10, 10);
                let scissor = Rect::new(sx, sy, sw, sh);
                buf.push_scissor(scissor);
                buf.fill(buf.bounds(), Cell::from_char('#'));
                buf.pop_scissor();
                for y in 0..10u16 {
                    for x in 0..10u16 {
                        let written = buf.get(x, y).is_some_and(|c| !c.is_empty());
                        prop_assert_eq!(written, scissor.contains(x, y) && x < 10 && y < 10);
                    }
                }
            }
        }
    }
}
