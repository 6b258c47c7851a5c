use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{StoryError, StoryResult};
use crate::story::*;
use crate::style::{number_to_css, StyleRecord};

type Object = Map<String, Value>;

// ─── Public parse functions ──────────────────────────────────────────────────

/// Parse a story from JSON text.
pub fn parse_story_json(json: &str) -> StoryResult<Story> {
    let value: Value = serde_json::from_str(json)?;
    parse_story_value(&value)
}

/// Parse a story from YAML text using the same schema as JSON.
pub fn parse_story_yaml(yaml: &str) -> StoryResult<Story> {
    let value: Value = serde_yaml::from_str(yaml)?;
    parse_story_value(&value)
}

/// Build the typed story tree from an already-decoded JSON value.
pub fn parse_story_value(value: &Value) -> StoryResult<Story> {
    let root = as_object(value, "story", "story")?;

    let pages = match root.get("pages") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(pages)) => pages
            .iter()
            .enumerate()
            .map(|(i, page)| parse_page(page, i))
            .collect::<StoryResult<Vec<_>>>()?,
        Some(_) => return Err(StoryError::invalid("pages", "story", "expected an array")),
    };

    let default_styles = match root.get("defaultStyles") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(element_type, style)| -> StoryResult<(String, StyleRecord)> {
                let path = format!("defaultStyles.{}", element_type);
                Ok((element_type.clone(), parse_style(style, &path)?))
            })
            .collect::<StoryResult<Vec<_>>>()?,
        Some(_) => {
            return Err(StoryError::invalid(
                "defaultStyles",
                "story",
                "expected an object keyed by element type",
            ))
        }
    };

    let story = Story {
        title: opt_string(root, "title", "story")?,
        canonical_url: opt_string(root, "canonicalUrl", "story")?,
        preview: opt_typed(root, "preview", "story")?,
        meta: opt_typed(root, "meta", "story")?,
        custom_css: opt_string(root, "customCss", "story")?,
        default_styles,
        pages,
        analytics: opt_typed(root, "analytics", "story")?.unwrap_or_default(),
        ads: root.get("ads").filter(|v| !v.is_null()).cloned(),
        bookend_config_src: opt_string(root, "bookendConfigSrc", "story")?,
    };

    debug!(
        pages = story.pages.len(),
        analytics = story.analytics.len(),
        "parsed story"
    );
    Ok(story)
}

// ─── Pages & layers ──────────────────────────────────────────────────────────

fn parse_page(value: &Value, index: usize) -> StoryResult<Page> {
    let path = format!("pages[{}]", index);
    let page = as_object(value, "page", &path)?;

    let layers = match page.get("layers") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(layers)) => layers
            .iter()
            .enumerate()
            .map(|(i, layer)| parse_layer(layer, &format!("{}.layers[{}]", path, i)))
            .collect::<StoryResult<Vec<_>>>()?,
        Some(_) => return Err(StoryError::invalid("layers", &path, "expected an array")),
    };

    Ok(Page {
        id: opt_string(page, "id", &path)?.unwrap_or_else(|| format!("page-{}", index)),
        auto_advance_after: opt_typed(page, "autoAdvanceAfter", &path)?,
        layers,
    })
}

fn parse_layer(value: &Value, path: &str) -> StoryResult<Layer> {
    let layer = as_object(value, "layer", path)?;

    // A bare element in place of a layer is shorthand for a fill layer around it.
    if !layer.contains_key("template") && layer.contains_key("type") {
        return Ok(Layer {
            template: LayerTemplate::Fill,
            styles: None,
            elements: vec![parse_element(value, path)?],
        });
    }

    let template_name = required_string(layer, "template", path)?;
    let template =
        LayerTemplate::parse(&template_name).ok_or_else(|| StoryError::UnknownLayerTemplate {
            template: template_name.clone(),
            path: path.to_string(),
        })?;

    let elements = match template {
        LayerTemplate::Fill => {
            let element = layer
                .get("element")
                .filter(|v| !v.is_null())
                .ok_or_else(|| StoryError::missing("element", path))?;
            vec![parse_element(element, &format!("{}.element", path))?]
        }
        _ => parse_elements(layer, path)?,
    };

    Ok(Layer {
        template,
        styles: opt_style(layer, path)?,
        elements,
    })
}

// ─── Element dispatch ────────────────────────────────────────────────────────

/// Parse one element object, dispatching on its `type`.
pub fn parse_element(value: &Value, path: &str) -> StoryResult<Element> {
    let element = as_object(value, "element", path)?;
    let element_type = required_string(element, "type", path)?;

    match element_type.as_str() {
        "container" => parse_container(element, path).map(Element::Container),
        "image" => parse_image(element, path).map(Element::Image),
        "video" => parse_video(element, path).map(Element::Video),
        other => match TextKind::parse(other) {
            Some(kind) => parse_text(kind, element, path).map(Element::Text),
            None => Err(StoryError::UnknownElementType {
                element_type: other.to_string(),
                path: path.to_string(),
            }),
        },
    }
}

fn parse_elements(obj: &Object, path: &str) -> StoryResult<Vec<Element>> {
    match obj.get("elements") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_element(item, &format!("{}.elements[{}]", path, i)))
            .collect(),
        Some(_) => Err(StoryError::invalid("elements", path, "expected an array")),
    }
}

fn parse_container(obj: &Object, path: &str) -> StoryResult<Container> {
    Ok(Container {
        id: opt_string(obj, "id", path)?,
        styles: opt_style(obj, path)?,
        elements: parse_elements(obj, path)?,
    })
}

fn parse_text(kind: TextKind, obj: &Object, path: &str) -> StoryResult<TextElement> {
    let inline_styles: Vec<InlineTextStyle> =
        opt_typed(obj, "inlineStyles", path)?.unwrap_or_default();
    if let Some(i) = inline_styles.iter().position(|s| s.length == 0) {
        return Err(StoryError::invalid(
            format!("inlineStyles[{}].length", i),
            path,
            "must be positive",
        ));
    }

    Ok(TextElement {
        kind,
        id: opt_string(obj, "id", path)?,
        text: required_string(obj, "text", path)?,
        inline_styles,
        styles: opt_style(obj, path)?,
    })
}

fn parse_image(obj: &Object, path: &str) -> StoryResult<ImageElement> {
    Ok(ImageElement {
        id: opt_string(obj, "id", path)?,
        source: required_string(obj, "source", path)?,
        alt: opt_string(obj, "alt", path)?,
        width: opt_dimension(obj, "width", path)?,
        height: opt_dimension(obj, "height", path)?,
        layout: opt_typed(obj, "layout", path)?,
        styles: opt_style(obj, path)?,
    })
}

fn parse_video(obj: &Object, path: &str) -> StoryResult<VideoElement> {
    let sources: Vec<VideoSource> =
        opt_typed(obj, "sources", path)?.ok_or_else(|| StoryError::missing("sources", path))?;
    if sources.is_empty() {
        return Err(StoryError::invalid(
            "sources",
            path,
            "a video needs at least one source",
        ));
    }

    Ok(VideoElement {
        id: opt_string(obj, "id", path)?,
        sources,
        width: opt_dimension(obj, "width", path)?,
        height: opt_dimension(obj, "height", path)?,
        layout: opt_typed(obj, "layout", path)?,
        poster: opt_string(obj, "poster", path)?,
        looping: opt_typed(obj, "loop", path)?.unwrap_or(false),
        autoplay: opt_typed(obj, "autoplay", path)?.unwrap_or(false),
        styles: opt_style(obj, path)?,
    })
}

// ─── Value helpers ───────────────────────────────────────────────────────────

fn as_object<'v>(value: &'v Value, what: &str, path: &str) -> StoryResult<&'v Object> {
    value
        .as_object()
        .ok_or_else(|| StoryError::invalid(what, path, "expected an object"))
}

fn required_string(obj: &Object, key: &str, path: &str) -> StoryResult<String> {
    opt_string(obj, key, path)?.ok_or_else(|| StoryError::missing(key, path))
}

fn opt_string(obj: &Object, key: &str, path: &str) -> StoryResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StoryError::invalid(key, path, "expected a string")),
    }
}

/// Width/height accept either a number or a string.
fn opt_dimension(obj: &Object, key: &str, path: &str) -> StoryResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(number_to_css(n))),
        Some(_) => Err(StoryError::invalid(key, path, "expected a number or string")),
    }
}

fn opt_typed<T: DeserializeOwned>(obj: &Object, key: &str, path: &str) -> StoryResult<Option<T>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| StoryError::invalid(key, path, e.to_string())),
    }
}

fn opt_style(obj: &Object, path: &str) -> StoryResult<Option<StyleRecord>> {
    match obj.get("styles") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_style(value, path).map(Some),
    }
}

fn parse_style(value: &Value, path: &str) -> StoryResult<StyleRecord> {
    StyleRecord::from_value(value.clone())
        .ok_or_else(|| StoryError::invalid("styles", path, "expected an object"))
}
