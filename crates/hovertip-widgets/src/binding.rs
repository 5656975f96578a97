#![forbid(unsafe_code)]

//! Tooltip bindings: the value and modifiers supplied where a tooltip is
//! attached to a host.
//!
//! A binding value is either plain text or an object with `text`, `margin`
//! and `transition` fields. Modifiers name the preferred side; only the
//! first one counts and none means [`Side::Bottom`].
//!
//! Bindings deserialize from JSON:
//!
//! ```
//! use hovertip_widgets::binding::Binding;
//! use hovertip_widgets::placement::Side;
//!
//! let binding = Binding::from_json(
//!     r#"{"value": {"text": "Save", "margin": "2px"}, "modifiers": ["top"]}"#,
//! )?;
//! let options = binding.resolve()?.expect("non-empty text");
//! assert_eq!(options.margin, 2);
//! assert_eq!(options.side, Side::Top);
//! # Ok::<(), hovertip_widgets::binding::BindingError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::placement::{ParseSideError, Side};

/// Distance in cells between tooltip and host when the binding names none.
pub const DEFAULT_MARGIN: u16 = 1;

/// Errors from reading a binding.
#[derive(Debug)]
pub enum BindingError {
    /// A margin string whose digits do not fit in a cell count.
    InvalidMargin { raw: String },
    /// A transition other than `fade` or `none`.
    UnknownTransition { name: String },
    /// A modifier other than top/right/bottom/left.
    UnknownModifier { name: String },
    /// Malformed binding JSON.
    Json(serde_json::Error),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMargin { raw } => write!(f, "invalid tooltip margin: {raw:?}"),
            Self::UnknownTransition { name } => {
                write!(f, "unknown tooltip transition: {name:?}")
            }
            Self::UnknownModifier { name } => write!(f, "unknown tooltip modifier: {name:?}"),
            Self::Json(err) => write!(f, "malformed tooltip binding: {err}"),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BindingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ParseSideError> for BindingError {
    fn from(err: ParseSideError) -> Self {
        Self::UnknownModifier { name: err.name }
    }
}

/// How the tooltip appears and disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transition {
    /// Opacity eases between 0 and 1.
    #[default]
    Fade,
    /// Opacity switches instantly.
    None,
}

impl FromStr for Transition {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fade" => Ok(Self::Fade),
            "none" => Ok(Self::None),
            _ => Err(BindingError::UnknownTransition {
                name: s.to_string(),
            }),
        }
    }
}

/// A margin given either as a cell count or as a string such as `"12px"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginValue {
    Cells(u16),
    Raw(String),
}

impl MarginValue {
    /// Cell count for this margin.
    ///
    /// Strings keep only their ASCII digits; a string with no digits is 0.
    pub fn resolve(&self) -> Result<u16, BindingError> {
        match self {
            Self::Cells(cells) => Ok(*cells),
            Self::Raw(raw) => {
                let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    return Ok(0);
                }
                digits
                    .parse()
                    .map_err(|_| BindingError::InvalidMargin { raw: raw.clone() })
            }
        }
    }
}

/// The value half of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TooltipValue {
    /// Plain tooltip text with default options.
    Text(String),
    /// Text plus options.
    Options {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        margin: Option<MarginValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transition: Option<String>,
    },
}

impl TooltipValue {
    /// The tooltip text.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Options { text, .. } => text,
        }
    }
}

impl From<&str> for TooltipValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TooltipValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Side modifiers in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Modifiers(Vec<Side>);

impl Modifiers {
    /// No modifiers.
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    /// Parse modifier names; any unknown name is an error.
    pub fn parse<I, S>(names: I) -> Result<Self, BindingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<Side>().map_err(BindingError::from))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Append a side.
    #[must_use]
    pub fn with(mut self, side: Side) -> Self {
        self.0.push(side);
        self
    }

    /// The side to try first: the first modifier, or bottom.
    pub fn preferred(&self) -> Side {
        self.0.first().copied().unwrap_or_default()
    }

    /// All sides as given.
    pub fn sides(&self) -> &[Side] {
        &self.0
    }
}

impl From<Side> for Modifiers {
    fn from(side: Side) -> Self {
        Self(vec![side])
    }
}

impl TryFrom<Vec<String>> for Modifiers {
    type Error = BindingError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(names)
    }
}

impl From<Modifiers> for Vec<String> {
    fn from(modifiers: Modifiers) -> Self {
        modifiers
            .0
            .into_iter()
            .map(|side| side.as_str().to_string())
            .collect()
    }
}

/// Fully resolved options for one tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipOptions {
    pub text: String,
    pub margin: u16,
    pub transition: Transition,
    pub side: Side,
}

/// A value and its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Binding {
    #[serde(default)]
    pub value: Option<TooltipValue>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl Binding {
    /// A binding with `value` and no modifiers.
    pub fn new(value: impl Into<TooltipValue>) -> Self {
        Self {
            value: Some(value.into()),
            modifiers: Modifiers::none(),
        }
    }

    /// A binding with no value; mounting it does nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a side modifier.
    #[must_use]
    pub fn modifier(mut self, side: Side) -> Self {
        self.modifiers = self.modifiers.with(side);
        self
    }

    /// Parse a binding from JSON.
    pub fn from_json(json: &str) -> Result<Self, BindingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve into tooltip options.
    ///
    /// Returns `Ok(None)` when there is no value or its text is blank.
    pub fn resolve(&self) -> Result<Option<TooltipOptions>, BindingError> {
        let Some(value) = &self.value else {
            return Ok(None);
        };
        if value.text().trim().is_empty() {
            return Ok(None);
        }

        let (margin, transition) = match value {
            TooltipValue::Text(_) => (DEFAULT_MARGIN, Transition::default()),
            TooltipValue::Options {
                margin, transition, ..
            } => (
                match margin {
                    Some(margin) => margin.resolve()?,
                    None => DEFAULT_MARGIN,
                },
                match transition {
                    Some(name) => name.parse()?,
                    None => Transition::default(),
                },
            ),
        };

        Ok(Some(TooltipOptions {
            text: value.text().to_string(),
            margin,
            transition,
            side: self.modifiers.preferred(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(binding: &Binding) -> TooltipOptions {
        binding
            .resolve()
            .expect("binding resolves")
            .expect("binding has text")
    }

    // ── Defaults ─────────────────────────────────────────────────────

    #[test]
    fn string_value_uses_defaults() {
        let opts = options(&Binding::new("Save"));
        assert_eq!(opts.text, "Save");
        assert_eq!(opts.margin, DEFAULT_MARGIN);
        assert_eq!(opts.transition, Transition::Fade);
        assert_eq!(opts.side, Side::Bottom);
    }

    #[test]
    fn missing_value_is_noop() {
        assert_eq!(Binding::empty().resolve().ok().flatten(), None);
    }

    #[test]
    fn blank_text_is_noop() {
        assert!(Binding::new("   ").resolve().ok().flatten().is_none());
        let blank_object = Binding::new(TooltipValue::Options {
            text: String::new(),
            margin: Some(MarginValue::Cells(3)),
            transition: None,
        });
        assert!(blank_object.resolve().ok().flatten().is_none());
    }

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn first_modifier_wins() {
        let binding = Binding::new("x").modifier(Side::Left).modifier(Side::Top);
        assert_eq!(options(&binding).side, Side::Left);
    }

    #[test]
    fn modifiers_parse_names() {
        let mods = Modifiers::parse(["right", "top"]).expect("valid names");
        assert_eq!(mods.sides(), &[Side::Right, Side::Top]);
        assert_eq!(mods.preferred(), Side::Right);
        assert_eq!(Modifiers::none().preferred(), Side::Bottom);
    }

    #[test]
    fn unknown_modifier_is_error() {
        let err = Modifiers::parse(["top", "center"]).unwrap_err();
        assert!(matches!(err, BindingError::UnknownModifier { ref name } if name == "center"));
    }

    // ── Margins ──────────────────────────────────────────────────────

    #[test]
    fn margin_string_keeps_digits() {
        assert_eq!(MarginValue::Raw("12px".into()).resolve().ok(), Some(12));
        assert_eq!(MarginValue::Raw(" 3 cells".into()).resolve().ok(), Some(3));
        assert_eq!(MarginValue::Raw("px".into()).resolve().ok(), Some(0));
        assert_eq!(MarginValue::Cells(4).resolve().ok(), Some(4));
    }

    #[test]
    fn margin_overflow_is_error() {
        let err = MarginValue::Raw("99999999px".into()).resolve().unwrap_err();
        assert!(matches!(err, BindingError::InvalidMargin { .. }));
        assert!(err.to_string().contains("99999999px"));
    }

    #[test]
    fn object_margin_overrides_default() {
        let binding = Binding::new(TooltipValue::Options {
            text: "Hi".into(),
            margin: Some(MarginValue::Raw("5px".into())),
            transition: None,
        });
        assert_eq!(options(&binding).margin, 5);
    }

    // ── Transitions ──────────────────────────────────────────────────

    #[test]
    fn transition_names() {
        assert_eq!("fade".parse::<Transition>().ok(), Some(Transition::Fade));
        assert_eq!("NONE".parse::<Transition>().ok(), Some(Transition::None));
        assert!(matches!(
            "slide".parse::<Transition>(),
            Err(BindingError::UnknownTransition { .. })
        ));
    }

    #[test]
    fn unknown_transition_fails_resolve() {
        let binding = Binding::new(TooltipValue::Options {
            text: "Hi".into(),
            margin: None,
            transition: Some("wobble".into()),
        });
        assert!(binding.resolve().is_err());
    }

    // ── JSON ─────────────────────────────────────────────────────────

    #[test]
    fn json_string_value() {
        let binding = Binding::from_json(r#"{"value": "Copy"}"#).expect("valid json");
        assert_eq!(binding.value, Some(TooltipValue::from("Copy")));
        assert_eq!(binding.modifiers, Modifiers::none());
    }

    #[test]
    fn json_object_value_with_modifiers() {
        let binding = Binding::from_json(
            r#"{"value": {"text": "Paste", "margin": 3, "transition": "none"}, "modifiers": ["left", "top"]}"#,
        )
        .expect("valid json");
        let opts = options(&binding);
        assert_eq!(opts.text, "Paste");
        assert_eq!(opts.margin, 3);
        assert_eq!(opts.transition, Transition::None);
        assert_eq!(opts.side, Side::Left);
    }

    #[test]
    fn json_without_value_is_noop() {
        let binding = Binding::from_json(r#"{"modifiers": ["top"]}"#).expect("valid json");
        assert!(binding.resolve().ok().flatten().is_none());
    }

    #[test]
    fn json_unknown_modifier_is_rejected() {
        let err = Binding::from_json(r#"{"value": "x", "modifiers": ["up"]}"#).unwrap_err();
        assert!(matches!(err, BindingError::Json(_)));
        assert!(err.to_string().contains("up"));
    }

    #[test]
    fn json_roundtrip_preserves_binding() {
        let binding = Binding::new("Undo").modifier(Side::Right);
        let json = serde_json::to_string(&binding).expect("serialize");
        assert_eq!(Binding::from_json(&json).ok(), Some(binding));
    }

    #[test]
    fn json_error_exposes_source() {
        use std::error::Error;
        let err = Binding::from_json("{").unwrap_err();
        assert!(err.source().is_some());
    }
}
