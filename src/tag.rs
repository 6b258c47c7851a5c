use serde_json::json;

use crate::css::StyleExtractor;
use crate::error::StoryResult;
use crate::style::StyleRecord;

/// Tags that never receive the implicit `display: flex` default.
const FLEX_EXEMPT_TAGS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "span",
    "amp-img",
    "amp-video",
    "source",
    "amp-story",
    "amp-story-page",
    "amp-story-grid-layer",
    "amp-analytics",
    "amp-story-auto-ads",
    "script",
];

const VOID_TAGS: &[&str] = &["source", "meta", "link", "br", "img"];

const GRID_AREAS: [&str; 3] = ["upper-third", "middle-third", "lower-third"];

#[derive(Debug, Clone, PartialEq)]
enum AttrValue {
    Text(String),
    Flag,
}

/// Builder for one HTML element.
///
/// Explicit attributes render first in insertion order, followed by
/// `width`, `height`, `src`, `class` and `grid-area`. Missing, `false` and
/// empty values are dropped.
#[derive(Debug, Clone)]
pub struct Tag<'a> {
    name: &'a str,
    attributes: Vec<(&'a str, AttrValue)>,
    width: Option<String>,
    height: Option<String>,
    source: Option<String>,
    styles: Option<&'a StyleRecord>,
    class: Option<String>,
    third_index: Option<usize>,
}

impl<'a> Tag<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            width: None,
            height: None,
            source: None,
            styles: None,
            class: None,
            third_index: None,
        }
    }

    pub fn attr(mut self, name: &'a str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.attributes.push((name, AttrValue::Text(value)));
        }
        self
    }

    pub fn opt_attr(self, name: &'a str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    /// Bare boolean attribute, e.g. `standalone`
    pub fn flag(mut self, name: &'a str, on: bool) -> Self {
        if on {
            self.attributes.push((name, AttrValue::Flag));
        }
        self
    }

    pub fn width(mut self, width: Option<&str>) -> Self {
        self.width = width.filter(|w| !w.is_empty()).map(str::to_string);
        self
    }

    pub fn height(mut self, height: Option<&str>) -> Self {
        self.height = height.filter(|h| !h.is_empty()).map(str::to_string);
        self
    }

    /// Rendered as `src`
    pub fn source(mut self, source: Option<&str>) -> Self {
        self.source = source.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn styles(mut self, styles: Option<&'a StyleRecord>) -> Self {
        self.styles = styles;
        self
    }

    /// Explicit class, placed before the generated one.
    pub fn class(mut self, class: Option<&str>) -> Self {
        self.class = class.filter(|c| !c.is_empty()).map(str::to_string);
        self
    }

    /// Position inside a `thirds` layer, rendered as `grid-area`.
    pub fn third_index(mut self, index: Option<usize>) -> Self {
        self.third_index = index;
        self
    }

    fn takes_flex_default(&self) -> bool {
        !FLEX_EXEMPT_TAGS.contains(&self.name)
    }

    fn resolve_class(
        &self,
        extractor: &mut StyleExtractor,
        path: &str,
    ) -> StoryResult<Option<String>> {
        let effective = if self.takes_flex_default() {
            Some(
                self.styles
                    .cloned()
                    .unwrap_or_default()
                    .with_leading_default("display", json!("flex")),
            )
        } else {
            self.styles.filter(|s| !s.is_empty()).cloned()
        };

        let generated = match effective {
            Some(style) => Some(extractor.append_styles(&style, path)?),
            None => None,
        };

        Ok(match (self.class.clone(), generated) {
            (Some(explicit), Some(generated)) => Some(format!("{} {}", explicit, generated)),
            (explicit, generated) => explicit.or(generated),
        })
    }

    /// Resolves styles through `extractor` and serializes the element.
    ///
    /// `children` is inserted as-is and must already be valid markup.
    /// Void tags ignore it.
    pub fn render(
        self,
        extractor: &mut StyleExtractor,
        path: &str,
        children: &str,
    ) -> StoryResult<String> {
        let class = self.resolve_class(extractor, path)?;

        let mut html = String::new();
        html.push('<');
        html.push_str(self.name);

        for (name, value) in &self.attributes {
            match value {
                AttrValue::Text(v) => push_attr(&mut html, name, v),
                AttrValue::Flag => {
                    html.push(' ');
                    html.push_str(name);
                }
            }
        }
        if let Some(w) = &self.width {
            push_attr(&mut html, "width", w);
        }
        if let Some(h) = &self.height {
            push_attr(&mut html, "height", h);
        }
        if let Some(src) = &self.source {
            push_attr(&mut html, "src", src);
        }
        if let Some(c) = &class {
            push_attr(&mut html, "class", c);
        }
        if let Some(area) = self.third_index.and_then(|i| GRID_AREAS.get(i)) {
            push_attr(&mut html, "grid-area", area);
        }
        html.push('>');

        if !VOID_TAGS.contains(&self.name) {
            html.push_str(children);
            html.push_str("</");
            html.push_str(self.name);
            html.push('>');
        }
        Ok(html)
    }
}

fn push_attr(html: &mut String, name: &str, value: &str) {
    html.push(' ');
    html.push_str(name);
    html.push_str("=\"");
    html.push_str(&escape_html(value));
    html.push('"');
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::render_css;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn record(value: Value) -> StyleRecord {
        StyleRecord::from_value(value).unwrap()
    }

    #[test]
    fn attribute_order_is_fixed() {
        let mut ex = StyleExtractor::new();
        let styles = record(json!({ "opacity": 0.5 }));
        let html = Tag::new("amp-img")
            .source(Some("a.png"))
            .height(Some("20"))
            .width(Some("10"))
            .styles(Some(&styles))
            .attr("layout", "fixed")
            .third_index(Some(1))
            .render(&mut ex, "p", "")
            .unwrap();
        assert_eq!(
            html,
            "<amp-img layout=\"fixed\" width=\"10\" height=\"20\" src=\"a.png\" class=\"s-1\" grid-area=\"middle-third\"></amp-img>"
        );
    }

    #[test]
    fn empty_and_missing_attributes_are_dropped() {
        let mut ex = StyleExtractor::new();
        let html = Tag::new("p")
            .attr("id", "")
            .opt_attr("title", None)
            .flag("hidden", false)
            .width(Some(""))
            .render(&mut ex, "p", "x")
            .unwrap();
        assert_eq!(html, "<p>x</p>");
        assert!(ex.is_empty());
    }

    #[test]
    fn flags_render_bare() {
        let mut ex = StyleExtractor::new();
        let html = Tag::new("amp-story")
            .flag("standalone", true)
            .attr("title", "T")
            .render(&mut ex, "story", "")
            .unwrap();
        assert_eq!(html, "<amp-story standalone title=\"T\"></amp-story>");
    }

    #[test]
    fn div_receives_flex_default() {
        let mut ex = StyleExtractor::new();
        let html = Tag::new("div").render(&mut ex, "p", "").unwrap();
        assert_eq!(html, "<div class=\"s-1\"></div>");
        assert_eq!(render_css(ex.combined_css()), ".s-1{display:flex;grid-gap:0}");
    }

    #[test]
    fn explicit_display_wins_over_flex_default() {
        let mut ex = StyleExtractor::new();
        let styles = record(json!({ "color": "red", "display": "block" }));
        Tag::new("div").styles(Some(&styles)).render(&mut ex, "p", "").unwrap();
        assert_eq!(
            render_css(ex.combined_css()),
            ".s-1{display:block;color:red;grid-gap:0}"
        );
    }

    #[test]
    fn exempt_tags_without_styles_have_no_class() {
        let mut ex = StyleExtractor::new();
        let empty = StyleRecord::new();
        let html = Tag::new("h1").styles(Some(&empty)).render(&mut ex, "p", "Hi").unwrap();
        assert_eq!(html, "<h1>Hi</h1>");
        assert!(ex.is_empty());
    }

    #[test]
    fn explicit_class_precedes_generated() {
        let mut ex = StyleExtractor::new();
        let styles = record(json!({ "color": "red" }));
        let html = Tag::new("p")
            .class(Some("lead"))
            .styles(Some(&styles))
            .render(&mut ex, "p", "")
            .unwrap();
        assert_eq!(html, "<p class=\"lead s-1\"></p>");
    }

    #[test]
    fn void_tags_have_no_closing_tag() {
        let mut ex = StyleExtractor::new();
        let html = Tag::new("source")
            .source(Some("v.mp4"))
            .attr("type", "video/mp4")
            .render(&mut ex, "p", "")
            .unwrap();
        assert_eq!(html, "<source type=\"video/mp4\" src=\"v.mp4\">");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut ex = StyleExtractor::new();
        let html = Tag::new("amp-img")
            .attr("alt", "\"a\" & <b>")
            .render(&mut ex, "p", "")
            .unwrap();
        assert_eq!(html, "<amp-img alt=\"&quot;a&quot; &amp; &lt;b&gt;\"></amp-img>");
    }

    #[test]
    fn grid_areas_for_each_third() {
        let mut ex = StyleExtractor::new();
        let areas: Vec<String> = (0..3)
            .map(|i| Tag::new("p").third_index(Some(i)).render(&mut ex, "p", "").unwrap())
            .collect();
        assert_eq!(
            areas,
            vec![
                "<p grid-area=\"upper-third\"></p>",
                "<p grid-area=\"middle-third\"></p>",
                "<p grid-area=\"lower-third\"></p>",
            ]
        );
    }
}
