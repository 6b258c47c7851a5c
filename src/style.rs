use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// An open, insertion-ordered style map, e.g. `{ "color": "red", "paddingTop": 20 }`.
///
/// Keys follow the camelCase style vocabulary. Values are raw JSON so that
/// unknown keys survive untouched; the converter in [`crate::css::convert`]
/// interprets the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleRecord(Map<String, Value>);

impl StyleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns a copy with `key` placed first. A value already present in
    /// the record wins over `default`, but the key still moves to the front.
    pub fn with_leading_default(&self, key: &str, default: Value) -> Self {
        let mut out = Map::with_capacity(self.0.len() + 1);
        out.insert(
            key.to_string(),
            self.0.get(key).cloned().unwrap_or(default),
        );
        for (k, v) in &self.0 {
            if k != key {
                out.insert(k.clone(), v.clone());
            }
        }
        Self(out)
    }

    /// Stable serialization with object keys sorted at every depth.
    ///
    /// Two records holding the same keys and values produce the same key
    /// regardless of insertion order.
    pub fn canonical_key(&self) -> String {
        canonicalize(&Value::Object(self.0.clone())).to_string()
    }
}

impl FromIterator<(String, Value)> for StyleRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Number(n) => Value::Number(canonical_number(n)),
        other => other.clone(),
    }
}

/// Whole-valued floats collapse to integers so `12` and `12.0` key alike.
fn canonical_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Number::from(f as i64)
        }
        Some(f) if n.is_f64() && f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
            Number::from(f as u64)
        }
        _ => n.clone(),
    }
}

/// A length that is either a pixel count or a string already carrying its unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Pixels(f64),
    Raw(String),
}

impl Distance {
    pub fn to_css(&self) -> String {
        match self {
            Distance::Pixels(n) => format!("{}px", n),
            Distance::Raw(s) => s.clone(),
        }
    }
}

/// Shadow offset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowOffset {
    pub x: f64,
    pub y: f64,
}

/// One entry of `boxShadow` / `textShadow`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset: ShadowOffset,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

/// Either a single shadow or an ordered list of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShadowList {
    Many(Vec<Shadow>),
    One(Shadow),
}

impl ShadowList {
    pub fn into_vec(self) -> Vec<Shadow> {
        match self {
            ShadowList::Many(v) => v,
            ShadowList::One(s) => vec![s],
        }
    }
}

/// `backgroundLinearGradient`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub direction: String,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
}

/// `border`, `borderTop`, …
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: f64,
    pub style: String,
    pub color: String,
}

/// Formats a JSON number without a trailing `.0` on whole floats.
pub(crate) fn number_to_css(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}

/// Renders a raw style value as CSS text, without any unit conversion.
pub(crate) fn value_to_css(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_css(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> StyleRecord {
        StyleRecord::from_value(value).unwrap()
    }

    #[test]
    fn canonical_key_ignores_insertion_order() {
        let a = record(json!({ "color": "red", "padding": 4 }));
        let b = record(json!({ "padding": 4, "color": "red" }));
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn canonical_key_sorts_nested_objects() {
        let a = record(json!({ "boxShadow": { "offset": { "x": 1, "y": 2 }, "color": "#000" } }));
        let b = record(json!({ "boxShadow": { "color": "#000", "offset": { "y": 2, "x": 1 } } }));
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn canonical_key_treats_whole_floats_as_integers() {
        let a = record(json!({ "fontSize": 12, "transform": [{ "scale": 2 }] }));
        let b = record(json!({ "fontSize": 12.0, "transform": [{ "scale": 2.0 }] }));
        assert_eq!(a.canonical_key(), b.canonical_key());
        let c = record(json!({ "fontSize": 12.5 }));
        assert_ne!(a.canonical_key(), c.canonical_key());
    }

    #[test]
    fn canonical_key_keeps_array_order() {
        let a = record(json!({ "transform": [{ "rotate": "9deg" }, { "scale": 2 }] }));
        let b = record(json!({ "transform": [{ "scale": 2 }, { "rotate": "9deg" }] }));
        assert_ne!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn leading_default_moves_key_first() {
        let r = record(json!({ "color": "red", "display": "block" }));
        let out = r.with_leading_default("display", json!("flex"));
        let keys: Vec<&String> = out.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["display", "color"]);
        assert_eq!(out.get("display"), Some(&json!("block")));
    }

    #[test]
    fn leading_default_inserts_when_absent() {
        let out = StyleRecord::new().with_leading_default("display", json!("flex"));
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("display"), Some(&json!("flex")));
    }

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(value_to_css(&json!(30)), "30");
        assert_eq!(value_to_css(&json!(30.0)), "30");
        assert_eq!(value_to_css(&json!(0.5)), "0.5");
        assert_eq!(value_to_css(&json!("50%")), "50%");
    }

    #[test]
    fn distance_untagged() {
        let px: Distance = serde_json::from_value(json!(12)).unwrap();
        let pct: Distance = serde_json::from_value(json!("40%")).unwrap();
        assert_eq!(px.to_css(), "12px");
        assert_eq!(pct.to_css(), "40%");
    }
}
