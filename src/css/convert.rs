use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{dasherize, Declarations};
use crate::error::{StoryError, StoryResult};
use crate::style::{
    number_to_css, value_to_css, Border, LinearGradient, Shadow, ShadowList, StyleRecord,
};

const GRADIENT_KEY: &str = "backgroundLinearGradient";

/// Keys whose numeric values are pixel distances.
const DISTANCE_KEYS: &[&str] = &[
    "top",
    "left",
    "bottom",
    "right",
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    "margin",
    "marginTop",
    "marginBottom",
    "marginRight",
    "marginLeft",
    "padding",
    "paddingTop",
    "paddingBottom",
    "paddingRight",
    "paddingLeft",
    "fontSize",
    "letterSpacing",
    "borderRadius",
    "borderTopLeftRadius",
    "borderTopRightRadius",
    "borderBottomLeftRadius",
    "borderBottomRightRadius",
];

const BORDER_KEYS: &[&str] = &["border", "borderTop", "borderBottom", "borderRight", "borderLeft"];

/// Filters whose numeric argument is a ratio or percentage, not a length.
const UNITLESS_FILTERS: &[&str] = &[
    "grayscale",
    "brightness",
    "contrast",
    "invert",
    "opacity",
    "saturate",
    "sepia",
];

/// Converts one style record into ordered CSS declarations.
///
/// Keys are processed in record order. The gradient becomes a trailing
/// `background`, flex aliases follow, and `grid-gap: 0` closes the list
/// unless the record already placed `gridGap` earlier.
/// `path` only labels errors.
pub fn convert_style(style: &StyleRecord, path: &str) -> StoryResult<Declarations> {
    let mut out = Declarations::new();

    for (key, value) in style.iter() {
        if value.is_null() || key == GRADIENT_KEY {
            continue;
        }
        let key = key.as_str();
        let property = dasherize(key);

        if DISTANCE_KEYS.contains(&key) {
            out.set(&property, convert_distance(value));
        } else if BORDER_KEYS.contains(&key) {
            out.set(&property, convert_border(key, value, path)?);
        } else {
            match key {
                "boxShadow" => out.set(&property, convert_shadows(key, value, true, path)?),
                "textShadow" => out.set(&property, convert_shadows(key, value, false, path)?),
                "transform" => out.set(&property, convert_transforms(key, value, path)?),
                "filter" | "backdropFilter" => {
                    out.set(&property, convert_filters(key, value, path)?)
                }
                _ => out.set(&property, value_to_css(value)),
            }
        }
    }

    if let Some(gradient) = style.get(GRADIENT_KEY).filter(|v| !v.is_null()) {
        out.set("background", convert_gradient(gradient, path)?);
    }

    if let Some(justify) = style.get("justifyContent").filter(|v| !v.is_null()) {
        out.set("align-content", value_to_css(justify));
    }
    if let Some(align) = style.get("alignItems").filter(|v| !v.is_null()) {
        out.set("justify-items", value_to_css(align));
    }

    out.set("grid-gap", "0");

    Ok(out)
}

fn convert_distance(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("{}px", number_to_css(n)),
        other => value_to_css(other),
    }
}

/// Deserializes a structured style value, reporting failures as malformed styles.
fn parse_sub_object<T: DeserializeOwned>(key: &str, value: &Value, path: &str) -> StoryResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| StoryError::malformed_style(key, path, e.to_string()))
}

fn convert_border(key: &str, value: &Value, path: &str) -> StoryResult<String> {
    if let Value::String(s) = value {
        return Ok(s.clone());
    }
    let border: Border = parse_sub_object(key, value, path)?;
    Ok(format!("{}px {} {}", border.width, border.style, border.color))
}

fn convert_shadows(key: &str, value: &Value, allow_spread: bool, path: &str) -> StoryResult<String> {
    if let Value::String(s) = value {
        return Ok(s.clone());
    }
    let shadows = parse_sub_object::<ShadowList>(key, value, path)?.into_vec();
    if shadows.is_empty() {
        return Err(StoryError::malformed_style(
            key,
            path,
            "expected at least one shadow",
        ));
    }
    Ok(shadows
        .iter()
        .map(|s| shadow_to_css(s, allow_spread))
        .collect::<Vec<_>>()
        .join(", "))
}

fn shadow_to_css(shadow: &Shadow, allow_spread: bool) -> String {
    let spread = if allow_spread {
        shadow.spread.filter(|s| *s != 0.0)
    } else {
        None
    };
    // A spread is positional, so it forces an explicit blur.
    let blur = shadow
        .blur_radius
        .filter(|b| *b != 0.0)
        .or(spread.map(|_| 0.0));

    let mut parts = vec![
        format!("{}px", shadow.offset.x),
        format!("{}px", shadow.offset.y),
    ];
    if let Some(b) = blur {
        parts.push(format!("{}px", b));
    }
    if let Some(s) = spread {
        parts.push(format!("{}px", s));
    }
    parts.push(shadow.color.clone());
    parts.join(" ")
}

fn convert_gradient(value: &Value, path: &str) -> StoryResult<String> {
    let gradient: LinearGradient = parse_sub_object(GRADIENT_KEY, value, path)?;
    if gradient.stops.is_empty() {
        return Err(StoryError::malformed_style(
            GRADIENT_KEY,
            path,
            "expected at least one color stop",
        ));
    }

    let mut parts = vec![gradient.direction.clone()];
    for stop in &gradient.stops {
        match &stop.distance {
            Some(d) => parts.push(format!("{} {}", stop.color, d.to_css())),
            None => parts.push(stop.color.clone()),
        }
    }
    Ok(format!("linear-gradient({})", parts.join(", ")))
}

fn transform_unit(function: &str) -> &'static str {
    if function.starts_with("scale") {
        ""
    } else if function.starts_with("rotate") || function.starts_with("skew") {
        "deg"
    } else {
        "px"
    }
}

fn filter_unit(function: &str) -> &'static str {
    if UNITLESS_FILTERS.contains(&function) {
        ""
    } else if function == "hueRotate" {
        "deg"
    } else {
        "px"
    }
}

fn convert_transforms(key: &str, value: &Value, path: &str) -> StoryResult<String> {
    convert_function_list(key, value, path, transform_unit, |f| f.to_string())
}

fn convert_filters(key: &str, value: &Value, path: &str) -> StoryResult<String> {
    convert_function_list(key, value, path, filter_unit, dasherize)
}

/// Serializes `[{ fn: value }, …]` into space-joined `fn(value)` tokens, in order.
fn convert_function_list(
    key: &str,
    value: &Value,
    path: &str,
    unit_for: fn(&str) -> &'static str,
    css_name: fn(&str) -> String,
) -> StoryResult<String> {
    let entries = match value {
        Value::String(s) => return Ok(s.clone()),
        Value::Array(entries) => entries,
        _ => {
            return Err(StoryError::malformed_style(
                key,
                path,
                "expected a list of single-key objects",
            ))
        }
    };

    let mut tokens = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let single = match entry {
            Value::Object(map) if map.len() == 1 => map.iter().next(),
            _ => None,
        };
        let (function, argument) = match single {
            Some(pair) => pair,
            None => {
                return Err(StoryError::malformed_style(
                    key,
                    path,
                    format!("entry {} must be an object with exactly one key", i),
                ))
            }
        };

        let argument = match argument {
            Value::Number(n) => format!("{}{}", number_to_css(n), unit_for(function)),
            Value::String(s) => s.clone(),
            _ => {
                return Err(StoryError::malformed_style(
                    key,
                    path,
                    format!("'{}' needs a number or string argument", function),
                ))
            }
        };
        tokens.push(format!("{}({})", css_name(function), argument));
    }
    Ok(tokens.join(" "))
}
