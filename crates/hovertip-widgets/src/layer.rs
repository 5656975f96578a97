#![forbid(unsafe_code)]

//! A layer of mounted tooltips.
//!
//! [`TooltipLayer`] is the overlay that every tooltip draws into. It tracks
//! the viewport, fans input events out to each directive, and renders them
//! last so they sit above the rest of the frame.

use std::collections::BTreeMap;
use std::time::Duration;

use hovertip_core::event::Event;
use hovertip_core::geometry::{Rect, Size};
use hovertip_render::buffer::Buffer;

use crate::Widget;
use crate::binding::Binding;
use crate::tooltip::{TooltipConfig, TooltipDirective};

/// Tooltips keyed by id, drawn in id order.
#[derive(Debug, Clone)]
pub struct TooltipLayer {
    viewport: Size,
    config: TooltipConfig,
    tooltips: BTreeMap<String, TooltipDirective>,
}

impl TooltipLayer {
    /// Create an empty layer for a viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            config: TooltipConfig::default(),
            tooltips: BTreeMap::new(),
        }
    }

    /// Config used for tooltips mounted from now on.
    #[must_use]
    pub fn with_config(mut self, config: TooltipConfig) -> Self {
        self.config = config;
        self
    }

    /// Mount a tooltip on `host`, replacing any tooltip with the same id.
    ///
    /// Returns `false` (and leaves the layer untouched) when the binding
    /// mounts nothing.
    pub fn mount(&mut self, id: impl Into<String>, host: Rect, binding: &Binding) -> bool {
        let id = id.into();
        let Some(directive) =
            TooltipDirective::mount_with(host, binding, self.viewport, self.config.clone())
        else {
            tracing::debug!(%id, "tooltip binding has no text; nothing mounted");
            return false;
        };
        if self.tooltips.insert(id.clone(), directive).is_some() {
            tracing::debug!(%id, "tooltip replaced");
        }
        true
    }

    /// Remove a tooltip. Returns whether it existed.
    pub fn unmount(&mut self, id: &str) -> bool {
        let removed = self.tooltips.remove(id).is_some();
        if removed {
            tracing::debug!(%id, "tooltip unmounted");
        }
        removed
    }

    /// Dispatch an event to every tooltip.
    ///
    /// A resize updates the layer's viewport before the tooltips see it.
    /// Returns whether any tooltip changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Resize { width, height } = *event {
            self.viewport = Size::new(width, height);
        }
        self.tooltips
            .values_mut()
            .fold(false, |changed, tip| tip.handle_event(event) | changed)
    }

    /// Move the host of tooltip `id`. Returns whether its placement changed.
    pub fn set_host(&mut self, id: &str, host: Rect) -> bool {
        self.tooltips
            .get_mut(id)
            .is_some_and(|tip| tip.set_host(host))
    }

    /// Advance every fade.
    pub fn tick(&mut self, dt: Duration) {
        for tip in self.tooltips.values_mut() {
            tip.tick(dt);
        }
    }

    /// Whether any fade is in flight.
    pub fn is_animating(&self) -> bool {
        self.tooltips.values().any(TooltipDirective::is_animating)
    }

    /// Draw every visible tooltip into `buf`.
    pub fn render(&self, buf: &mut Buffer) {
        let area = buf.bounds();
        for tip in self.tooltips.values().filter(|tip| tip.is_visible()) {
            tip.render(area, buf);
        }
    }

    pub fn get(&self, id: &str) -> Option<&TooltipDirective> {
        self.tooltips.get(id)
    }

    /// Mounted ids in render order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tooltips.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tooltips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tooltips.is_empty()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }
}
