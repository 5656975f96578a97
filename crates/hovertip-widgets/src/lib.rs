#![forbid(unsafe_code)]

//! Hover tooltips for cell-grid UIs.
//!
//! A tooltip is attached to a host rectangle through a [`binding::Binding`]
//! (a value plus side modifiers). Mounting produces a
//! [`tooltip::TooltipDirective`] that places itself next to the host with
//! [`placement::place`], fades in while the pointer is over the host, and
//! repositions on resize. [`layer::TooltipLayer`] hosts many directives and
//! fans events out to them.

pub mod binding;
pub mod layer;
pub mod placement;
pub mod style;
pub mod text;
pub mod tooltip;

pub use binding::{Binding, BindingError, Modifiers, Transition, TooltipOptions, TooltipValue};
pub use layer::TooltipLayer;
pub use placement::{Placement, Side, Translation, place};
pub use style::Style;
pub use tooltip::{TooltipConfig, TooltipDirective};

use hovertip_core::geometry::Rect;
use hovertip_render::buffer::Buffer;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Buffer` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the buffer at the given area.
    fn render(&self, area: Rect, buf: &mut Buffer);
}
