#![forbid(unsafe_code)]

//! Storage for grapheme clusters that do not fit in one `CellContent`.
//!
//! Combining sequences (`e` + U+0301) and ZWJ emoji are several scalars but
//! one cell. The pool interns each distinct cluster once and hands out a
//! [`GraphemeId`] that carries the slot and the display width.
//!
//! ```
//! use hovertip_render::grapheme_pool::GraphemePool;
//!
//! let mut pool = GraphemePool::new();
//! let id = pool.intern("e\u{301}", 1).expect("slot");
//! assert_eq!(pool.get(id), Some("e\u{301}"));
//! assert_eq!(id.width(), 1);
//! ```

use std::collections::HashMap;

use crate::cell::GraphemeId;

/// Interning pool for grapheme clusters.
///
/// A buffer is rebuilt every frame, so slots are never released one by one;
/// [`GraphemePool::clear`] drops them all.
#[derive(Debug, Clone, Default)]
pub struct GraphemePool {
    slots: Vec<String>,
    lookup: HashMap<String, GraphemeId>,
}

impl GraphemePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text` with the given display width.
    ///
    /// Interning the same text again returns the existing id. Returns `None`
    /// once every slot is taken.
    pub fn intern(&mut self, text: &str, width: u8) -> Option<GraphemeId> {
        if let Some(&id) = self.lookup.get(text) {
            return Some(id);
        }
        let slot = u32::try_from(self.slots.len())
            .ok()
            .filter(|&slot| slot <= GraphemeId::MAX_SLOT)?;
        let id = GraphemeId::new(slot, width.min(GraphemeId::MAX_WIDTH));
        self.slots.push(text.to_owned());
        self.lookup.insert(text.to_owned(), id);
        Some(id)
    }

    /// Text of an interned cluster.
    pub fn get(&self, id: GraphemeId) -> Option<&str> {
        self.slots.get(id.slot()).map(String::as_str)
    }

    /// Number of interned clusters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is interned.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every interned cluster.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.lookup.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_deduplicates() {
        let mut pool = GraphemePool::new();
        let a = pool.intern("👍🏽", 2);
        let b = pool.intern("👍🏽", 2);
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn distinct_clusters_get_distinct_slots() {
        let mut pool = GraphemePool::new();
        let a = pool.intern("e\u{301}", 1).expect("slot");
        let b = pool.intern("a\u{308}", 1).expect("slot");
        assert_ne!(a.slot(), b.slot());
        assert_eq!(pool.get(a), Some("e\u{301}"));
        assert_eq!(pool.get(b), Some("a\u{308}"));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut pool = GraphemePool::new();
        let id = pool.intern("e\u{301}", 1).expect("slot");
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.get(id), None);
    }
}
