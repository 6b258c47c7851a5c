use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::style::{number_to_css, StyleRecord};

/// Root of a story document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Story {
    pub title: Option<String>,
    pub canonical_url: Option<String>,
    pub preview: Option<Preview>,
    pub meta: Option<StoryMeta>,
    pub custom_css: Option<String>,
    /// Element type (`heading`, `paragraph`, …) → style, in document order.
    pub default_styles: Vec<(String, StyleRecord)>,
    pub pages: Vec<Page>,
    pub analytics: Vec<AnalyticsConfig>,
    /// `amp-story-auto-ads` configuration, passed through as JSON.
    pub ads: Option<Value>,
    pub bookend_config_src: Option<String>,
}

/// Attributes shown by platforms that preview the story
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_logo_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_portrait_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_square_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_landscape_src: Option<String>,
}

/// Structured-data block: either ready-made markup or fields for a `NewsArticle`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryMeta {
    Raw(String),
    Structured(Box<MetaData>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_type: Option<String>,
    #[serde(default)]
    pub publisher: Option<MetaPublisher>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaPublisher {
    pub name: String,
    /// `{url, width?, height?}`; merged into an `ImageObject`.
    #[serde(default)]
    pub logo: Option<Map<String, Value>>,
}

/// One `<amp-analytics>` entry. Everything except `type` becomes its JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub analytics_type: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    pub auto_advance_after: Option<AutoAdvance>,
    pub layers: Vec<Layer>,
}

/// Seconds to wait, or the id of a media element whose end advances the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoAdvance {
    Seconds(serde_json::Number),
    ElementId(String),
}

impl AutoAdvance {
    pub fn to_attr(&self) -> String {
        match self {
            AutoAdvance::Seconds(n) => format!("{}s", number_to_css(n)),
            AutoAdvance::ElementId(id) => id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerTemplate {
    Fill,
    Vertical,
    Horizontal,
    Thirds,
}

impl LayerTemplate {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fill" => Some(LayerTemplate::Fill),
            "vertical" => Some(LayerTemplate::Vertical),
            "horizontal" => Some(LayerTemplate::Horizontal),
            "thirds" => Some(LayerTemplate::Thirds),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerTemplate::Fill => "fill",
            LayerTemplate::Vertical => "vertical",
            LayerTemplate::Horizontal => "horizontal",
            LayerTemplate::Thirds => "thirds",
        }
    }
}

/// A layout template and its elements. `fill` layers hold exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub template: LayerTemplate,
    pub styles: Option<StyleRecord>,
    pub elements: Vec<Element>,
}

/// Renderable node of a layer
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Container(Container),
    Text(TextElement),
    Image(ImageElement),
    Video(VideoElement),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub id: Option<String>,
    pub styles: Option<StyleRecord>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Level 1..=6
    Heading(u8),
    Paragraph,
}

impl TextKind {
    /// `heading`, `heading1`..`heading6`, `paragraph`
    pub fn parse(element_type: &str) -> Option<Self> {
        match element_type {
            "heading" => Some(TextKind::Heading(1)),
            "paragraph" => Some(TextKind::Paragraph),
            other => {
                let level: u8 = other.strip_prefix("heading")?.parse().ok()?;
                (1..=6).contains(&level).then_some(TextKind::Heading(level))
            }
        }
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            TextKind::Heading(1) => "h1",
            TextKind::Heading(2) => "h2",
            TextKind::Heading(3) => "h3",
            TextKind::Heading(4) => "h4",
            TextKind::Heading(5) => "h5",
            TextKind::Heading(_) => "h6",
            TextKind::Paragraph => "p",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub kind: TextKind,
    pub id: Option<String>,
    pub text: String,
    pub inline_styles: Vec<InlineTextStyle>,
    pub styles: Option<StyleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageElement {
    pub id: Option<String>,
    pub source: String,
    pub alt: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub layout: Option<MediaLayout>,
    pub styles: Option<StyleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoElement {
    pub id: Option<String>,
    pub sources: Vec<VideoSource>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub layout: Option<MediaLayout>,
    pub poster: Option<String>,
    pub looping: bool,
    pub autoplay: bool,
    pub styles: Option<StyleRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    pub source: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl VideoSource {
    /// `mp4` → `video/mp4`; full MIME types pass through.
    pub fn mime(&self) -> String {
        if self.mime_type.contains('/') {
            self.mime_type.clone()
        } else {
            format!("video/{}", self.mime_type)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaLayout {
    Fill,
    Fixed,
    FixedHeight,
    FlexItem,
    Nodisplay,
    Responsive,
}

impl MediaLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaLayout::Fill => "fill",
            MediaLayout::Fixed => "fixed",
            MediaLayout::FixedHeight => "fixed-height",
            MediaLayout::FlexItem => "flex-item",
            MediaLayout::Nodisplay => "nodisplay",
            MediaLayout::Responsive => "responsive",
        }
    }
}

/// Styles applied to `[start, start + length)` of a text element, counted in chars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineTextStyle {
    pub start: usize,
    pub length: usize,
    #[serde(default)]
    pub styles: StyleRecord,
}

impl InlineTextStyle {
    pub fn covers(&self, index: usize) -> bool {
        index >= self.start && index - self.start < self.length
    }
}
