#![forbid(unsafe_code)]

//! Demo model: a set of labeled buttons, each carrying a tooltip.

use std::path::Path;
use std::time::Duration;

use hovertip_core::event::{Event, KeyCode};
use hovertip_core::geometry::{Rect, Size};
use hovertip_render::buffer::Buffer;
use hovertip_render::cell::{Cell, PackedRgba, StyleFlags};
use hovertip_widgets::binding::MarginValue;
use hovertip_widgets::text::display_width;
use hovertip_widgets::{Binding, Side, Style, TooltipLayer, TooltipValue};
use serde::Deserialize;

const COLUMNS: usize = 3;

/// One button and the binding its tooltip is mounted with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoEntry {
    pub label: String,
    pub binding: Binding,
}

impl DemoEntry {
    fn new(label: &str, binding: Binding) -> Self {
        Self {
            label: label.to_string(),
            binding,
        }
    }
}

/// The built-in buttons: one per side, a string binding, and an object
/// binding with its own margin and no fade.
pub fn builtin_entries() -> Vec<DemoEntry> {
    let mut entries: Vec<DemoEntry> = Side::ALL
        .iter()
        .map(|&side| {
            let label = format!("{side}");
            let text = format!("Prefers the {side} side; flips when there is no room");
            DemoEntry {
                label,
                binding: Binding::new(text).modifier(side),
            }
        })
        .collect();
    entries.push(DemoEntry::new(
        "plain",
        Binding::new("A plain string binding: bottom, default margin, fade"),
    ));
    entries.push(DemoEntry::new(
        "options",
        Binding::new(TooltipValue::Options {
            text: "Object binding with a 3 cell margin and no transition".into(),
            margin: Some(MarginValue::Raw("3px".into())),
            transition: Some("none".into()),
        }),
    ));
    entries
}

/// Parse a JSON array of entries, skipping (and logging) invalid ones.
pub fn parse_entries(json: &str) -> Result<Vec<DemoEntry>, serde_json::Error> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping invalid demo binding");
                None
            }
        })
        .collect())
}

/// Load extra entries from a file. Failures are logged and yield nothing.
pub fn load_entries(path: &Path) -> Vec<DemoEntry> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read demo bindings");
            return Vec::new();
        }
    };
    parse_entries(&json).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "malformed demo bindings");
        Vec::new()
    })
}

/// Give a binding `margin` unless it already names one.
pub fn with_default_margin(mut binding: Binding, margin: u16) -> Binding {
    binding.value = binding.value.map(|value| match value {
        TooltipValue::Text(text) => TooltipValue::Options {
            text,
            margin: Some(MarginValue::Cells(margin)),
            transition: None,
        },
        TooltipValue::Options {
            text,
            margin: None,
            transition,
        } => TooltipValue::Options {
            text,
            margin: Some(MarginValue::Cells(margin)),
            transition,
        },
        other => other,
    });
    binding
}

/// Button rectangles laid out on a grid spread across the viewport.
///
/// Columns hug the left edge, the center, and the right edge; rows run from
/// just under the title to just over the status line, so the outer buttons
/// force tooltips to flip.
pub fn layout_buttons(labels: &[String], viewport: Size) -> Vec<Rect> {
    let rows = labels.len().div_ceil(COLUMNS).max(1);
    let top = 2u32;
    let bottom = u32::from(viewport.height).saturating_sub(3).max(top);
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let width = button_width(label).min(viewport.width);
            let col = index % COLUMNS;
            let row = index / COLUMNS;
            let free = u32::from(viewport.width.saturating_sub(width));
            let x = match col {
                0 => free.min(1),
                1 => free / 2,
                _ => free.saturating_sub(1),
            };
            let y = if rows == 1 {
                top
            } else {
                top + (bottom - top) * row as u32 / (rows as u32 - 1)
            };
            Rect::new(x as u16, y as u16, width, 1)
        })
        .collect()
}

fn button_width(label: &str) -> u16 {
    (display_width(label) + 4).min(u16::MAX as usize) as u16
}

#[derive(Debug, Clone)]
struct Button {
    id: String,
    label: String,
    rect: Rect,
}

/// Demo state.
#[derive(Debug)]
pub struct App {
    viewport: Size,
    buttons: Vec<Button>,
    layer: TooltipLayer,
    pointer: Option<(u16, u16)>,
    quit: bool,
}

impl App {
    /// Build the demo and mount one tooltip per entry.
    ///
    /// Entries whose binding mounts nothing still get a button.
    pub fn new(viewport: Size, entries: Vec<DemoEntry>, margin: Option<u16>) -> Self {
        let labels: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();
        let rects = layout_buttons(&labels, viewport);
        let mut layer = TooltipLayer::new(viewport);
        let mut buttons = Vec::with_capacity(entries.len());

        for (index, (entry, rect)) in entries.into_iter().zip(rects).enumerate() {
            let id = format!("{index:02}-{}", entry.label);
            let binding = match margin {
                Some(margin) => with_default_margin(entry.binding, margin),
                None => entry.binding,
            };
            if !layer.mount(id.clone(), rect, &binding) {
                tracing::info!(label = %entry.label, "button has no tooltip");
            }
            buttons.push(Button {
                id,
                label: entry.label,
                rect,
            });
        }

        Self {
            viewport,
            buttons,
            layer,
            pointer: None,
            quit: false,
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Some(pointer) = event.pointer() {
            self.pointer = Some(pointer);
        }
        match event {
            Event::Key(key) => {
                if key.is_char('q') || key.code == KeyCode::Escape || (key.ctrl() && key.is_char('c'))
                {
                    self.quit = true;
                }
            }
            Event::Resize { width, height } => {
                // Tooltips must see the new viewport before their hosts move.
                self.layer.handle_event(event);
                self.relayout(Size::new(*width, *height));
                return;
            }
            _ => {}
        }
        self.layer.handle_event(event);
    }

    fn relayout(&mut self, viewport: Size) {
        self.viewport = viewport;
        let labels: Vec<String> = self.buttons.iter().map(|b| b.label.clone()).collect();
        for (button, rect) in self
            .buttons
            .iter_mut()
            .zip(layout_buttons(&labels, viewport))
        {
            button.rect = rect;
            self.layer.set_host(&button.id, rect);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.layer.tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.layer.is_animating()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn layer(&self) -> &TooltipLayer {
        &self.layer
    }

    fn hovered(&self) -> Option<&Button> {
        let (x, y) = self.pointer?;
        self.buttons.iter().find(|b| b.rect.contains(x, y))
    }

    /// Draw the whole frame: title, buttons, status line, then tooltips.
    pub fn render(&self, buf: &mut Buffer) {
        buf.clear();
        let dim = Style::new().flags(StyleFlags::DIM);
        draw_text(buf, 1, 0, "hovertip demo: hover a button, q to quit", Style::new());

        let hovered = self.hovered().map(|b| b.id.as_str());
        for button in &self.buttons {
            let style = if Some(button.id.as_str()) == hovered {
                Style::new().flags(StyleFlags::REVERSE | StyleFlags::BOLD)
            } else {
                Style::new().fg(PackedRgba::rgb(120, 200, 255))
            };
            let text = format!("[ {} ]", button.label);
            draw_text(buf, button.rect.x, button.rect.y, &text, style);
        }

        let status = match self.hovered() {
            Some(button) => match self.layer.get(&button.id) {
                Some(tip) => format!(
                    "{}: placed {} (asked {}), margin {}",
                    button.label,
                    tip.side(),
                    tip.preferred_side(),
                    tip.margin()
                ),
                None => format!("{}: no tooltip", button.label),
            },
            None => format!("{} tooltips mounted", self.layer.len()),
        };
        draw_text(buf, 1, buf.height().saturating_sub(1), &status, dim);

        self.layer.render(buf);
    }
}

fn draw_text(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
    let mut cx = x;
    for ch in text.chars() {
        if cx >= buf.width() {
            break;
        }
        let cell = style.apply(Cell::from_char(ch));
        let width = cell.content.width().max(1) as u16;
        buf.set(cx, y, cell);
        cx = cx.saturating_add(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovertip_core::event::{KeyEvent, MouseEvent, MouseEventKind};

    const SCREEN: Size = Size::new(80, 24);

    fn app() -> App {
        App::new(SCREEN, builtin_entries(), None)
    }

    #[test]
    fn builtin_entries_cover_every_side() {
        let entries = builtin_entries();
        assert_eq!(entries.len(), 6);
        for side in Side::ALL {
            assert!(
                entries
                    .iter()
                    .any(|e| e.binding.modifiers.preferred() == side && e.label == side.as_str())
            );
        }
    }

    #[test]
    fn every_builtin_is_mounted() {
        let app = app();
        assert_eq!(app.layer().len(), 6);
    }

    #[test]
    fn layout_spreads_columns_and_rows() {
        let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let rects = layout_buttons(&labels, SCREEN);
        // "[ a ]" is 5 wide; 75 columns are free.
        assert_eq!(rects[0], Rect::new(1, 2, 5, 1));
        assert_eq!(rects[1], Rect::new(37, 2, 5, 1));
        assert_eq!(rects[2], Rect::new(74, 2, 5, 1));
        assert_eq!(rects[3], Rect::new(1, 21, 5, 1));
    }

    #[test]
    fn layout_survives_tiny_viewport() {
        let labels = vec!["a very long label".to_string()];
        let rects = layout_buttons(&labels, Size::new(4, 2));
        assert_eq!(rects[0].width, 4);
        assert_eq!(rects[0].x, 0);
    }

    #[test]
    fn default_margin_only_fills_gaps() {
        let plain = with_default_margin(Binding::new("x"), 4);
        assert_eq!(plain.resolve().ok().flatten().map(|o| o.margin), Some(4));

        let explicit = with_default_margin(
            Binding::new(TooltipValue::Options {
                text: "x".into(),
                margin: Some(MarginValue::Cells(2)),
                transition: None,
            }),
            4,
        );
        assert_eq!(explicit.resolve().ok().flatten().map(|o| o.margin), Some(2));
        assert_eq!(with_default_margin(Binding::empty(), 4), Binding::empty());
    }

    #[test]
    fn parse_entries_skips_invalid() {
        let entries = parse_entries(
            r#"[
                {"label": "ok", "binding": {"value": "fine", "modifiers": ["left"]}},
                {"label": "bad", "binding": {"value": "x", "modifiers": ["middle"]}},
                {"label": "empty", "binding": {}}
            ]"#,
        )
        .expect("valid array");
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["ok", "empty"]);
        assert!(parse_entries("{}").is_err());
    }

    #[test]
    fn missing_file_yields_nothing() {
        assert!(load_entries(Path::new("/nonexistent/hovertip-demo.json")).is_empty());
    }

    #[test]
    fn quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q')),
            KeyEvent::new(KeyCode::Escape),
        ] {
            let mut app = app();
            app.handle_event(&Event::Key(key));
            assert!(app.should_quit());
        }
        let mut app = app();
        app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('x'))));
        assert!(!app.should_quit());
    }

    #[test]
    fn hovering_a_button_shows_its_tooltip() {
        let mut app = app();
        let host = app.buttons[4].rect;
        app.handle_event(&Event::Mouse(MouseEvent::new(
            MouseEventKind::Moved,
            host.x,
            host.y,
        )));
        app.tick(Duration::from_millis(250));

        let tip = app.layer().get(&app.buttons[4].id).expect("mounted");
        assert_eq!(tip.opacity(), 1.0);

        let mut buf = Buffer::new(SCREEN.width, SCREEN.height);
        app.render(&mut buf);
        let status = buf.row_text(SCREEN.height - 1);
        // Two rows under the button is too tight, and there is one more
        // column of room to the right than to the left.
        assert!(status.contains("plain: placed right (asked bottom)"), "{status}");
    }

    #[test]
    fn resize_relayouts_buttons() {
        let mut app = app();
        app.handle_event(&Event::Resize {
            width: 120,
            height: 40,
        });
        assert_eq!(app.viewport(), Size::new(120, 40));
        let labels: Vec<String> = app.buttons.iter().map(|b| b.label.clone()).collect();
        let expected = layout_buttons(&labels, Size::new(120, 40));
        for (button, rect) in app.buttons.iter().zip(expected) {
            assert_eq!(button.rect, rect);
            assert_eq!(app.layer().get(&button.id).map(|t| t.host()), Some(rect));
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn shrinking_places_tooltips_against_the_new_viewport() {
        let mut app = app();
        app.handle_event(&Event::Resize {
            width: 40,
            height: 12,
        });
        for tip in app.layer().ids().filter_map(|id| app.layer().get(id)) {
            assert_eq!(tip.viewport(), Size::new(40, 12));
        }

        logs_assert(|lines: &[&str]| {
            let moves: Vec<&str> = lines
                .iter()
                .copied()
                .filter(|line| line.contains("tooltip repositioned"))
                .collect();
            if moves.is_empty() {
                return Err("no tooltip moved".to_string());
            }
            for line in moves {
                let field = |name: &str| {
                    line.split_whitespace()
                        .find_map(|token| token.strip_prefix(name))
                        .and_then(|value| value.parse::<i32>().ok())
                };
                match (field("x="), field("y="), field("width="), field("height=")) {
                    (Some(x), Some(y), Some(w), Some(h)) if x + w <= 40 && y + h <= 12 => {}
                    _ => return Err(format!("placed outside 40x12: {line}")),
                }
            }
            Ok(())
        });
    }
}
