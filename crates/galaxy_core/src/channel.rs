//! Property/command channel
//!
//! Hosts talk to the cursor with two message shapes:
//!
//! ```json
//! { "set": { "width": 800, "height": 600 } }
//! { "call": "start" }
//! ```
//!
//! Properties in a batch apply in the order they were written. Unknown
//! properties and commands are dropped. The canvas is never sent as JSON;
//! it moves into the cursor through [`Property::Canvas`].

use crate::error::{GalaxyError, Result};
use galaxy_paint::Canvas;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;

/// Configuration keys a host exposes as attributes
pub const ATTRIBUTES: [&str; 10] = [
    "height", "width", "density", "links", "speed", "distance", "accuracy", "radius", "sradius",
    "gradient",
];

/// A single property assignment
pub enum Property {
    X(f32),
    Y(f32),
    /// Drawing surface, moved into the cursor
    Canvas(Box<dyn Canvas>),
    Width(f32),
    Height(f32),
    Density(u32),
    Links(u32),
    Speed(f32),
    Distance(f32),
    Accuracy(f32),
    Radius(f32),
    Sradius(f32),
    Gradient(bool),
}

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Property::X(_) => "x",
            Property::Y(_) => "y",
            Property::Canvas(_) => "canvas",
            Property::Width(_) => "width",
            Property::Height(_) => "height",
            Property::Density(_) => "density",
            Property::Links(_) => "links",
            Property::Speed(_) => "speed",
            Property::Distance(_) => "distance",
            Property::Accuracy(_) => "accuracy",
            Property::Radius(_) => "radius",
            Property::Sradius(_) => "sradius",
            Property::Gradient(_) => "gradient",
        }
    }

    /// Build a property from a numeric value.
    ///
    /// Returns `Ok(None)` for names that are not properties.
    pub fn from_number(name: &str, value: f64) -> Result<Option<Property>> {
        let invalid = |reason: &str| GalaxyError::InvalidProperty {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        if !value.is_finite() {
            return Err(invalid("not a finite number"));
        }
        // Checked again after narrowing: values past f32::MAX become infinite
        let float = || {
            let narrowed = value as f32;
            if narrowed.is_finite() {
                Ok(narrowed)
            } else {
                Err(invalid("out of range"))
            }
        };
        let count = || {
            if value < 0.0 {
                Err(invalid("must not be negative"))
            } else {
                Ok(value.min(u32::MAX as f64) as u32)
            }
        };

        let property = match name {
            "x" => Property::X(float()?),
            "y" => Property::Y(float()?),
            "width" => Property::Width(float()?),
            "height" => Property::Height(float()?),
            "density" => Property::Density(count()?),
            "links" => Property::Links(count()?),
            "speed" => Property::Speed(float()?),
            "distance" => Property::Distance(float()?),
            "accuracy" => Property::Accuracy(float()?),
            "radius" => Property::Radius(float()?),
            "sradius" => Property::Sradius(float()?),
            "gradient" => Property::Gradient(value != 0.0),
            "canvas" => return Err(invalid("a canvas must be moved in, not sent as a number")),
            _ => return Ok(None),
        };
        Ok(Some(property))
    }

    /// Build a property from a JSON value.
    ///
    /// Numbers and integer strings are accepted everywhere; `gradient` also
    /// takes booleans.
    pub fn from_json(name: &str, value: &Value) -> Result<Option<Property>> {
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => parse_int(text).map(|int| int as f64),
            Value::Bool(flag) if name == "gradient" => return Ok(Some(Property::Gradient(*flag))),
            _ => None,
        };
        match number {
            Some(number) => Self::from_number(name, number),
            None if is_known(name) => Err(GalaxyError::InvalidProperty {
                name: name.to_string(),
                reason: format!("unsupported value {value}"),
            }),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Canvas(canvas) => {
                let (width, height) = canvas.size();
                write!(f, "Canvas({width}x{height})")
            }
            Property::X(v)
            | Property::Y(v)
            | Property::Width(v)
            | Property::Height(v)
            | Property::Speed(v)
            | Property::Distance(v)
            | Property::Accuracy(v)
            | Property::Radius(v)
            | Property::Sradius(v) => write!(f, "{}({v})", self.name()),
            Property::Density(v) | Property::Links(v) => write!(f, "{}({v})", self.name()),
            Property::Gradient(v) => write!(f, "gradient({v})"),
        }
    }
}

fn is_known(name: &str) -> bool {
    matches!(name, "x" | "y" | "canvas") || ATTRIBUTES.contains(&name)
}

/// Integer prefix of `text`, the way attribute values are coerced.
///
/// Leading whitespace and a sign are allowed, parsing stops at the first
/// non-digit, and text without leading digits yields `None`.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Lifecycle commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Stop,
}

impl Command {
    pub fn from_name(name: &str) -> Option<Command> {
        match name {
            "start" => Some(Command::Start),
            "stop" => Some(Command::Stop),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
        }
    }
}

/// A message from the host
#[derive(Debug)]
pub enum Message {
    /// Property batch, applied in order
    Set(Vec<Property>),
    Call(Command),
}

impl Message {
    /// Parse a JSON channel message.
    ///
    /// A payload may carry both `set` and `call`; the batch comes first.
    pub fn from_json(json: &str) -> Result<SmallVec<[Message; 2]>> {
        let envelope: Envelope = serde_json::from_str(json)
            .map_err(|err| GalaxyError::MalformedMessage(err.to_string()))?;

        let mut messages = SmallVec::new();
        if let Some(PropertyBatch(batch)) = envelope.set {
            if !batch.is_empty() {
                messages.push(Message::Set(batch));
            }
        }
        match envelope.call {
            Some(Value::String(name)) => match Command::from_name(&name) {
                Some(command) => messages.push(Message::Call(command)),
                None => tracing::debug!(command = %name, "ignoring unknown command"),
            },
            Some(other) => tracing::debug!(%other, "ignoring non-string command"),
            None => {}
        }
        Ok(messages)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    set: Option<PropertyBatch>,
    #[serde(default)]
    call: Option<Value>,
}

/// Properties in the order a JSON object lists them.
///
/// Entries that are unknown or carry unusable values are skipped; a `set`
/// that is not an object is an empty batch.
#[derive(Debug, Default)]
pub struct PropertyBatch(pub Vec<Property>);

impl PropertyBatch {
    pub fn into_inner(self) -> Vec<Property> {
        self.0
    }
}

impl<'de> Deserialize<'de> for PropertyBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(BatchVisitor)
    }
}

struct BatchVisitor;

impl<'de> Visitor<'de> for BatchVisitor {
    type Value = PropertyBatch;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of property names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut batch = Vec::new();
        while let Some(name) = map.next_key::<String>()? {
            let value: Value = map.next_value()?;
            match Property::from_json(&name, &value) {
                Ok(Some(property)) => batch.push(property),
                Ok(None) => tracing::trace!(property = %name, "ignoring unknown property"),
                Err(err) => tracing::warn!(%err, "dropping property"),
            }
        }
        Ok(PropertyBatch(batch))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(PropertyBatch::default())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(PropertyBatch::default())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Self::Value, E> {
        Ok(PropertyBatch::default())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<Self::Value, E> {
        Ok(PropertyBatch::default())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<Self::Value, E> {
        Ok(PropertyBatch::default())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<Self::Value, E> {
        Ok(PropertyBatch::default())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<Self::Value, E> {
        Ok(PropertyBatch::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(message: &Message) -> Vec<&'static str> {
        match message {
            Message::Set(batch) => batch.iter().map(Property::name).collect(),
            Message::Call(_) => Vec::new(),
        }
    }

    #[test]
    fn test_batch_keeps_key_order() {
        let messages =
            Message::from_json(r#"{"set": {"width": 800, "height": 600, "density": 5}}"#).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(names(&messages[0]), vec!["width", "height", "density"]);

        let messages = Message::from_json(r#"{"set": {"y": 1, "x": 2}}"#).unwrap();
        assert_eq!(names(&messages[0]), vec!["y", "x"]);
    }

    #[test]
    fn test_unknown_entries_dropped() {
        let messages = Message::from_json(
            r#"{"set": {"color": "red", "links": "7px", "radius": null, "canvas": 1}}"#,
        )
        .unwrap();
        assert_eq!(names(&messages[0]), vec!["links"]);
        assert!(matches!(
            &messages[0],
            Message::Set(batch) if matches!(batch[0], Property::Links(7))
        ));

        let messages = Message::from_json(r#"{"call": "explode"}"#).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_set_then_call() {
        let messages =
            Message::from_json(r#"{"call": "start", "set": {"gradient": true}}"#).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            &messages[0],
            Message::Set(batch) if matches!(batch[0], Property::Gradient(true))
        ));
        assert!(matches!(messages[1], Message::Call(Command::Start)));
    }

    #[test]
    fn test_non_object_set_is_ignored() {
        let messages = Message::from_json(r#"{"set": [1, 2], "call": "stop"}"#).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], Message::Call(Command::Stop)));
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            Message::from_json("not json"),
            Err(GalaxyError::MalformedMessage(_))
        ));
        assert!(matches!(
            Message::from_json("42"),
            Err(GalaxyError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_from_number_validation() {
        assert!(matches!(
            Property::from_number("density", -1.0),
            Err(GalaxyError::InvalidProperty { .. })
        ));
        assert!(matches!(
            Property::from_number("width", f64::NAN),
            Err(GalaxyError::InvalidProperty { .. })
        ));
        assert!(matches!(
            Property::from_number("gradient", 1.0),
            Ok(Some(Property::Gradient(true)))
        ));
        assert!(matches!(Property::from_number("opacity", 1.0), Ok(None)));
    }

    #[test]
    fn test_values_beyond_f32_rejected() {
        for name in ["x", "width", "height", "speed", "radius"] {
            assert!(matches!(
                Property::from_number(name, 1e39),
                Err(GalaxyError::InvalidProperty { .. })
            ));
            assert!(matches!(
                Property::from_number(name, -1e39),
                Err(GalaxyError::InvalidProperty { .. })
            ));
        }
        assert!(matches!(
            Property::from_number("density", f64::INFINITY),
            Err(GalaxyError::InvalidProperty { .. })
        ));
        assert!(matches!(
            Property::from_number("width", f32::MAX as f64),
            Ok(Some(Property::Width(w))) if w == f32::MAX
        ));

        let messages =
            Message::from_json(r#"{"set": {"width": 1e39, "height": 600}}"#).unwrap();
        assert_eq!(names(&messages[0]), vec!["height"]);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -12abc"), Some(-12));
        assert_eq!(parse_int("+3.9"), Some(3));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
    }

    #[test]
    fn test_debug_hides_canvas() {
        let property = Property::Canvas(Box::new(galaxy_paint::RecordingCanvas::new(3, 4)));
        assert_eq!(format!("{property:?}"), "Canvas(3x4)");
        assert_eq!(format!("{:?}", Property::Density(5)), "density(5)");
    }
}
