#![forbid(unsafe_code)]

//! The mounted tooltip.
//!
//! A [`TooltipDirective`] owns one tooltip attached to one host rectangle.
//! It lays out the text once at mount, places itself with
//! [`place`](crate::placement::place), and fades between hidden and shown as
//! the pointer enters and leaves the host.
//!
//! # Lifecycle
//!
//! ```text
//! mount ──▶ hidden ──(pointer enters host)──▶ active, fading in
//!             ▲                                   │
//!             └────(pointer leaves host)──────────┘
//! ```
//!
//! Resizes recompute the placement in either state. The tooltip never takes
//! the pointer: hovering the tooltip itself counts as leaving the host.

use std::time::Duration;

use hovertip_core::animation::{Animation, Ramp, ease_in_out};
use hovertip_core::event::Event;
use hovertip_core::geometry::{Rect, Size};
use hovertip_render::buffer::Buffer;
use hovertip_render::cell::{Cell, PackedRgba};
use unicode_segmentation::UnicodeSegmentation;

use crate::Widget;
use crate::binding::{Binding, BindingError, TooltipOptions, Transition};
use crate::placement::{Placement, Side, place};
use crate::style::Style;
use crate::text::{block_size, grapheme_width, wrap_words};

/// Duration of the fade transition.
pub const DEFAULT_FADE: Duration = Duration::from_millis(200);

/// Layout and appearance of a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipConfig {
    /// Width at which text wraps, padding included (default: 40).
    pub max_width: u16,
    /// Blank columns left and right of the text (default: 1).
    pub padding_x: u16,
    /// Blank rows above and below the text (default: 0).
    pub padding_y: u16,
    /// Box and text style.
    pub style: Style,
    /// Length of the fade transition (default: 200ms).
    pub fade: Duration,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            max_width: 40,
            padding_x: 1,
            padding_y: 0,
            style: Style::new()
                .fg(PackedRgba::WHITE)
                .bg(PackedRgba::rgb(51, 51, 51)),
            fade: DEFAULT_FADE,
        }
    }
}

impl TooltipConfig {
    /// Set the wrap width.
    #[must_use]
    pub fn max_width(mut self, width: u16) -> Self {
        self.max_width = width;
        self
    }

    /// Set horizontal and vertical padding.
    #[must_use]
    pub fn padding(mut self, x: u16, y: u16) -> Self {
        self.padding_x = x;
        self.padding_y = y;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the fade duration.
    #[must_use]
    pub fn fade(mut self, duration: Duration) -> Self {
        self.fade = duration;
        self
    }

    fn wrap_width(&self) -> usize {
        let inner = self.max_width.saturating_sub(self.padding_x.saturating_mul(2));
        usize::from(inner.max(1))
    }
}

/// A tooltip attached to a host rectangle.
#[derive(Debug, Clone)]
pub struct TooltipDirective {
    options: TooltipOptions,
    config: TooltipConfig,
    lines: Vec<String>,
    size: Size,
    host: Rect,
    viewport: Size,
    placement: Placement,
    active: bool,
    opacity: Ramp,
}

impl TooltipDirective {
    /// Mount a tooltip with the default config.
    ///
    /// Returns `None` when the binding has no text or is rejected.
    pub fn mount(host: Rect, binding: &Binding, viewport: Size) -> Option<Self> {
        Self::mount_with(host, binding, viewport, TooltipConfig::default())
    }

    /// Mount a tooltip with `config`, logging a rejected binding.
    pub fn mount_with(
        host: Rect,
        binding: &Binding,
        viewport: Size,
        config: TooltipConfig,
    ) -> Option<Self> {
        match Self::try_mount(host, binding, viewport, config) {
            Ok(directive) => directive,
            Err(err) => {
                tracing::warn!(error = %err, "tooltip binding rejected");
                None
            }
        }
    }

    /// Mount a tooltip, surfacing binding errors.
    ///
    /// `Ok(None)` means the binding has no text and nothing was mounted.
    pub fn try_mount(
        host: Rect,
        binding: &Binding,
        viewport: Size,
        config: TooltipConfig,
    ) -> Result<Option<Self>, BindingError> {
        let Some(options) = binding.resolve()? else {
            return Ok(None);
        };

        let lines = wrap_words(&options.text, config.wrap_width());
        let content = block_size(&lines);
        let size = Size::new(
            content
                .width
                .saturating_add(config.padding_x.saturating_mul(2)),
            content
                .height
                .saturating_add(config.padding_y.saturating_mul(2)),
        );
        let placement = place(options.side, host, size, viewport, options.margin);
        let opacity = Ramp::new(0.0, config.fade).easing(ease_in_out);

        tracing::debug!(
            side = %placement.side,
            x = placement.translation.x,
            y = placement.translation.y,
            width = size.width,
            height = size.height,
            "tooltip mounted"
        );

        Ok(Some(Self {
            options,
            config,
            lines,
            size,
            host,
            viewport,
            placement,
            active: false,
            opacity,
        }))
    }

    /// Recompute placement for a new viewport size.
    ///
    /// Returns whether the placement changed.
    pub fn reposition(&mut self, viewport: Size) -> bool {
        self.viewport = viewport;
        self.update_placement()
    }

    /// Move the host. Returns whether the placement changed.
    pub fn set_host(&mut self, host: Rect) -> bool {
        self.host = host;
        self.update_placement()
    }

    fn update_placement(&mut self) -> bool {
        let placement = place(
            self.options.side,
            self.host,
            self.size,
            self.viewport,
            self.options.margin,
        );
        if placement == self.placement {
            return false;
        }
        tracing::debug!(
            side = %placement.side,
            x = placement.translation.x,
            y = placement.translation.y,
            width = placement.size.width,
            height = placement.size.height,
            "tooltip repositioned"
        );
        self.placement = placement;
        true
    }

    /// React to an input event.
    ///
    /// Pointer motion inside the host shows the tooltip and motion anywhere
    /// else hides it. Resizes reposition. Returns whether anything changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) if mouse.is_motion() => {
                let (x, y) = mouse.position();
                if self.host.contains(x, y) {
                    self.show()
                } else {
                    self.hide()
                }
            }
            Event::Resize { width, height } => self.reposition(Size::new(*width, *height)),
            _ => false,
        }
    }

    /// Activate and start fading in. Returns `false` if already active.
    pub fn show(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.transition_to(1.0);
        tracing::trace!(side = %self.placement.side, "tooltip shown");
        true
    }

    /// Deactivate and start fading out. Returns `false` if already inactive.
    pub fn hide(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.transition_to(0.0);
        tracing::trace!("tooltip hidden");
        true
    }

    fn transition_to(&mut self, target: f32) {
        match self.options.transition {
            Transition::Fade => self.opacity.set_target(target),
            Transition::None => self.opacity.jump_to(target),
        }
    }

    /// Advance the fade.
    pub fn tick(&mut self, dt: Duration) {
        self.opacity.tick(dt);
    }

    /// Whether a fade is still in flight.
    pub fn is_animating(&self) -> bool {
        !self.opacity.is_complete()
    }

    /// Current opacity in `[0.0, 1.0]`.
    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    /// Whether the pointer is over the host.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether any part of the tooltip is drawn.
    pub fn is_visible(&self) -> bool {
        self.opacity() > 0.0
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The side the tooltip was placed on.
    pub fn side(&self) -> Side {
        self.placement.side
    }

    /// The side requested by the binding's modifiers.
    pub fn preferred_side(&self) -> Side {
        self.options.side
    }

    pub fn text(&self) -> &str {
        &self.options.text
    }

    /// Wrapped text lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn margin(&self) -> u16 {
        self.options.margin
    }

    pub fn transition(&self) -> Transition {
        self.options.transition
    }

    pub fn host(&self) -> Rect {
        self.host
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Outer size, padding included.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }
}

impl Widget for TooltipDirective {
    /// Draw the tooltip at its placement, clipped to `area`.
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let opacity = self.opacity();
        if opacity <= 0.0 {
            return;
        }
        let bounds = self.placement.rect();
        if bounds.is_empty() {
            return;
        }

        buf.push_scissor(area);
        buf.push_opacity(opacity);

        let style = self.config.style;
        buf.fill(bounds, style.apply(Cell::from_char(' ')));

        // Text positions are signed: a tooltip pinned past the top-left
        // corner still lays out from its true translation.
        let at = self.placement.translation;
        let left = at.x + i32::from(self.config.padding_x);
        let right = at.x + i32::from(self.size.width) - i32::from(self.config.padding_x);
        for (row, line) in self.lines.iter().enumerate() {
            let y = at.y + i32::from(self.config.padding_y) + row as i32;
            let Ok(y) = u16::try_from(y) else {
                continue;
            };
            let mut x = left;
            for grapheme in line.graphemes(true) {
                let width = grapheme_width(grapheme);
                if width == 0 {
                    continue;
                }
                if x + width as i32 > right {
                    break;
                }
                if let Ok(cx) = u16::try_from(x) {
                    // Glyphs sit on the fill; only their foreground fades.
                    let content = buf.intern(grapheme, width);
                    buf.set_glyph(cx, y, style.apply(Cell::new(content)));
                }
                x += width as i32;
            }
        }

        buf.pop_opacity();
        buf.pop_scissor();
    }
}
