#![forbid(unsafe_code)]

//! Viewport-aware tooltip placement.
//!
//! # Algorithm
//!
//! 1. Measure the free space between the host and each viewport edge.
//! 2. Keep the preferred side unless its free space is no larger than the
//!    tooltip's extent on that axis plus the margin; otherwise take the side
//!    with the most free space.
//! 3. Anchor the tooltip `margin` cells away from the host on that side,
//!    centered on the host along the other axis.
//! 4. Nudge the translation so the tooltip keeps `margin` cells from every
//!    viewport edge.
//!
//! # Invariants
//!
//! 1. On any axis where `tooltip + 2 * margin <= viewport`, the placed
//!    tooltip lies within `[margin, viewport - margin]`.
//! 2. The preferred side is honored whenever it has room.
//! 3. Placement never fails; a tooltip larger than the viewport is clipped.

use std::fmt;
use std::str::FromStr;

use hovertip_core::geometry::{Point, Rect, Size};

/// Position of a tooltip's top-left corner in viewport cells.
///
/// Signed: a tooltip larger than the viewport is pinned past the origin and
/// clipped there.
pub type Translation = Point;

/// Side of the host a tooltip is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Top,
    Right,
    /// Used when no side is requested.
    #[default]
    Bottom,
    Left,
}

impl Side {
    /// All sides in scan order. Ties in free space go to the later side.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Lowercase name, as used in bindings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }

    /// Whether the tooltip sits above or below the host.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A side name that is not one of top/right/bottom/left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSideError {
    pub name: String,
}

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tooltip side: {:?}", self.name)
    }
}

impl std::error::Error for ParseSideError {}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Side::ALL
            .into_iter()
            .find(|side| side.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSideError {
                name: s.to_string(),
            })
    }
}

/// Free space between the host and each viewport edge, in cells.
///
/// Values go negative when the host extends past the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeOffsets {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl EdgeOffsets {
    /// Measure offsets of `host` inside a viewport of `viewport` cells.
    pub fn measure(host: Rect, viewport: Size) -> Self {
        Self {
            top: host.y as i32,
            right: viewport.width as i32 - (host.x as i32 + host.width as i32),
            bottom: viewport.height as i32 - (host.y as i32 + host.height as i32),
            left: host.x as i32,
        }
    }

    /// Free space on `side`.
    pub const fn get(&self, side: Side) -> i32 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// The side with the most free space; later sides win ties.
    pub fn largest(&self) -> Side {
        Side::ALL
            .into_iter()
            .max_by_key(|side| self.get(*side))
            .unwrap_or_default()
    }
}

/// Pick the side to place a tooltip on.
pub fn choose_side(preferred: Side, offsets: &EdgeOffsets, tooltip: Size, margin: u16) -> Side {
    let extent = if preferred.is_vertical() {
        tooltip.height
    } else {
        tooltip.width
    };
    if offsets.get(preferred) > extent as i32 + margin as i32 {
        return preferred;
    }

    let fallback = offsets.largest();
    tracing::debug!(
        preferred = %preferred,
        chosen = %fallback,
        free = offsets.get(preferred),
        needed = extent as i32 + margin as i32,
        "preferred tooltip side lacks room"
    );
    fallback
}

/// Tooltip translation on `side` of `host`, centered on the host's other axis.
pub fn anchor(side: Side, host: Rect, tooltip: Size, margin: u16) -> Translation {
    let (hx, hy) = (host.x as i32, host.y as i32);
    let (hw, hh) = (host.width as i32, host.height as i32);
    let (tw, th) = (tooltip.width as i32, tooltip.height as i32);
    let m = margin as i32;

    let centered_x = hx + (hw - tw) / 2;
    let centered_y = hy + (hh - th) / 2;

    match side {
        Side::Top => Translation::new(centered_x, hy - th - m),
        Side::Right => Translation::new(hx + hw + m, centered_y),
        Side::Bottom => Translation::new(centered_x, hy + hh + m),
        Side::Left => Translation::new(hx - tw - m, centered_y),
    }
}

fn nudge(pos: i32, extent: u16, limit: u16, margin: u16) -> i32 {
    let (extent, limit, margin) = (extent as i32, limit as i32, margin as i32);
    if pos + extent + margin > limit {
        limit - extent - margin
    } else if pos - margin < 0 {
        margin
    } else {
        pos
    }
}

/// Shift `translation` so the tooltip keeps `margin` cells from the viewport edges.
///
/// The far (right/bottom) edge is checked first; when the tooltip cannot fit
/// at all it is pinned to that edge and overflows the near one.
pub fn keep_in_viewport(
    translation: Translation,
    tooltip: Size,
    viewport: Size,
    margin: u16,
) -> Translation {
    Translation::new(
        nudge(translation.x, tooltip.width, viewport.width, margin),
        nudge(translation.y, tooltip.height, viewport.height, margin),
    )
}

/// Where a tooltip ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The side actually used (may differ from the preferred one).
    pub side: Side,
    /// Top-left corner in viewport coordinates; may be negative.
    pub translation: Translation,
    /// Tooltip dimensions.
    pub size: Size,
}

impl Placement {
    /// The on-screen rectangle, clipped at the viewport origin.
    pub fn rect(&self) -> Rect {
        Rect::from_signed(self.translation, self.size)
    }
}

/// Place a tooltip of size `tooltip` next to `host`.
pub fn place(preferred: Side, host: Rect, tooltip: Size, viewport: Size, margin: u16) -> Placement {
    let offsets = EdgeOffsets::measure(host, viewport);
    let side = choose_side(preferred, &offsets, tooltip, margin);
    let translation = anchor(side, host, tooltip, margin);
    Placement {
        side,
        translation: keep_in_viewport(translation, tooltip, viewport, margin),
        size: tooltip,
    }
}
