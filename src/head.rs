//! Document head pieces and the blocks injected ahead of the pages:
//! runtime scripts, AMP boilerplate, JSON-LD metadata, analytics and ads.

use serde_json::{json, Map, Value};

use crate::config::CompileOptions;
use crate::error::StoryResult;
use crate::story::{AnalyticsConfig, MetaData, StoryMeta};
use crate::tag::escape_html;

/// Must be emitted byte-for-byte or AMP validation fails.
pub const AMP_BOILERPLATE: &str = "<style amp-boilerplate>body{-webkit-animation:-amp-start 8s steps(1,end) 0s 1 normal both;-moz-animation:-amp-start 8s steps(1,end) 0s 1 normal both;-ms-animation:-amp-start 8s steps(1,end) 0s 1 normal both;animation:-amp-start 8s steps(1,end) 0s 1 normal both}@-webkit-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-moz-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-ms-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-o-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}</style><noscript><style amp-boilerplate>body{-webkit-animation:none;-moz-animation:none;-ms-animation:none;animation:none}</style></noscript>";

pub const VIEWPORT: &str = "width=device-width,minimum-scale=1,initial-scale=1";

/// AMP extensions loaded only when the story uses them.
/// Ordering here is the order of the script tags in the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuntimeComponent {
    Video,
    Analytics,
    AutoAds,
}

impl RuntimeComponent {
    pub fn element_name(&self) -> &'static str {
        match self {
            RuntimeComponent::Video => "amp-video",
            RuntimeComponent::Analytics => "amp-analytics",
            RuntimeComponent::AutoAds => "amp-story-auto-ads",
        }
    }

    pub fn version(&self) -> &'static str {
        "0.1"
    }
}

fn custom_element_script(host: &str, element: &str, version: &str) -> String {
    format!(
        "<script async custom-element=\"{0}\" src=\"{1}/v0/{0}-{2}.js\"></script>",
        element, host, version
    )
}

/// AMP runtime, the `amp-story` extension, then each needed extension.
pub fn render_runtime_scripts<'a>(
    options: &CompileOptions,
    components: impl IntoIterator<Item = &'a RuntimeComponent>,
) -> String {
    let host = options.runtime_host.trim_end_matches('/');
    let mut html = format!("<script async src=\"{}/v0.js\"></script>", host);
    html.push_str(&custom_element_script(host, "amp-story", &options.story_version));
    for component in components {
        html.push_str(&custom_element_script(
            host,
            component.element_name(),
            component.version(),
        ));
    }
    html
}

/// JSON-LD block for structured metadata, or the raw markup as given.
pub fn render_metadata(meta: &StoryMeta) -> StoryResult<String> {
    match meta {
        StoryMeta::Raw(markup) => Ok(markup.clone()),
        StoryMeta::Structured(data) => {
            let json = serde_json::to_string(&news_article(data))?;
            Ok(format!(
                "<script type=\"application/ld+json\">{}</script>",
                escape_script(&json)
            ))
        }
    }
}

/// schema.org `NewsArticle`; absent fields are left out.
fn news_article(meta: &MetaData) -> Value {
    let mut article = Map::new();
    article.insert("@context".into(), json!("http://schema.org"));
    article.insert("@type".into(), json!("NewsArticle"));
    if let Some(url) = &meta.canonical_url {
        article.insert(
            "mainEntityOfPage".into(),
            json!({ "@type": "WebPage", "@id": url }),
        );
    }
    if let Some(title) = &meta.title {
        article.insert("headline".into(), json!(title));
    }
    if !meta.images.is_empty() {
        article.insert("image".into(), json!(meta.images));
    }
    if let Some(date) = &meta.date_published {
        article.insert("datePublished".into(), json!(date));
    }
    if let Some(date) = &meta.date_modified {
        article.insert("dateModified".into(), json!(date));
    }
    if let Some(author) = &meta.author {
        article.insert(
            "author".into(),
            json!({
                "@type": meta.author_type.as_deref().unwrap_or("Person"),
                "name": author,
            }),
        );
    }
    if let Some(description) = &meta.description {
        article.insert("description".into(), json!(description));
    }
    if let Some(publisher) = &meta.publisher {
        let mut logo = Map::new();
        logo.insert("@type".into(), json!("ImageObject"));
        if let Some(fields) = &publisher.logo {
            for (k, v) in fields {
                logo.insert(k.clone(), v.clone());
            }
        }
        article.insert(
            "publisher".into(),
            json!({
                "@type": "Organization",
                "name": publisher.name,
                "logo": logo,
            }),
        );
    }
    Value::Object(article)
}

/// One `<amp-analytics>` per entry, each wrapping its JSON config.
pub fn render_analytics(entries: &[AnalyticsConfig]) -> StoryResult<String> {
    let mut html = String::new();
    for entry in entries {
        let config = serde_json::to_string(&entry.options)?;
        html.push_str("<amp-analytics");
        if let Some(t) = entry.analytics_type.as_deref().filter(|t| !t.is_empty()) {
            html.push_str(&format!(" type=\"{}\"", escape_html(t)));
        }
        html.push_str(&format!(
            "><script type=\"application/json\">{}</script></amp-analytics>",
            escape_script(&config)
        ));
    }
    Ok(html)
}

/// `<amp-story-auto-ads>` wrapping the ad configuration.
pub fn render_ads(config: &Value) -> StoryResult<String> {
    let json = serde_json::to_string(config)?;
    Ok(format!(
        "<amp-story-auto-ads><script type=\"application/json\">{}</script></amp-story-auto-ads>",
        escape_script(&json)
    ))
}

/// Keeps a JSON payload from closing its `<script>` element early.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn runtime_scripts_in_component_order() {
        let needed: BTreeSet<RuntimeComponent> =
            [RuntimeComponent::Analytics, RuntimeComponent::Video].into_iter().collect();
        let html = render_runtime_scripts(&CompileOptions::default(), &needed);
        assert_eq!(
            html,
            concat!(
                "<script async src=\"https://cdn.ampproject.org/v0.js\"></script>",
                "<script async custom-element=\"amp-story\" src=\"https://cdn.ampproject.org/v0/amp-story-1.0.js\"></script>",
                "<script async custom-element=\"amp-video\" src=\"https://cdn.ampproject.org/v0/amp-video-0.1.js\"></script>",
                "<script async custom-element=\"amp-analytics\" src=\"https://cdn.ampproject.org/v0/amp-analytics-0.1.js\"></script>",
            )
        );
    }

    #[test]
    fn runtime_host_trailing_slash_is_ignored() {
        let options = CompileOptions {
            runtime_host: "https://cdn.example.com/".into(),
            story_version: "0.1".into(),
            ..CompileOptions::default()
        };
        let html = render_runtime_scripts(&options, &[]);
        assert!(html.contains("src=\"https://cdn.example.com/v0.js\""));
        assert!(html.contains("src=\"https://cdn.example.com/v0/amp-story-0.1.js\""));
    }

    #[test]
    fn raw_meta_passes_through() {
        let html = render_metadata(&StoryMeta::Raw("<meta name=\"x\">".into())).unwrap();
        assert_eq!(html, "<meta name=\"x\">");
    }

    #[test]
    fn news_article_fields() {
        let meta: StoryMeta = serde_json::from_value(json!({
            "title": "Headline",
            "canonicalUrl": "https://example.com/story",
            "images": ["https://example.com/a.jpg"],
            "datePublished": "2018-01-01",
            "author": "Jane",
            "publisher": { "name": "Pub", "logo": { "url": "https://example.com/logo.png", "width": 60 } }
        }))
        .unwrap();
        let html = render_metadata(&meta).unwrap();
        assert_eq!(
            html,
            concat!(
                "<script type=\"application/ld+json\">",
                "{\"@context\":\"http://schema.org\",\"@type\":\"NewsArticle\",",
                "\"mainEntityOfPage\":{\"@type\":\"WebPage\",\"@id\":\"https://example.com/story\"},",
                "\"headline\":\"Headline\",\"image\":[\"https://example.com/a.jpg\"],",
                "\"datePublished\":\"2018-01-01\",",
                "\"author\":{\"@type\":\"Person\",\"name\":\"Jane\"},",
                "\"publisher\":{\"@type\":\"Organization\",\"name\":\"Pub\",",
                "\"logo\":{\"@type\":\"ImageObject\",\"url\":\"https://example.com/logo.png\",\"width\":60}}}",
                "</script>"
            )
        );
    }

    #[test]
    fn author_type_overrides_person() {
        let meta: StoryMeta =
            serde_json::from_value(json!({ "author": "Desk", "authorType": "Organization" })).unwrap();
        let html = render_metadata(&meta).unwrap();
        assert!(html.contains("\"author\":{\"@type\":\"Organization\",\"name\":\"Desk\"}"));
    }

    #[test]
    fn analytics_entries() {
        let entries: Vec<AnalyticsConfig> = serde_json::from_value(json!([
            { "type": "gtag", "vars": { "gtag_id": "UA-1" } },
            { "requests": { "pageview": "https://example.com/p" } }
        ]))
        .unwrap();
        let html = render_analytics(&entries).unwrap();
        assert_eq!(
            html,
            concat!(
                "<amp-analytics type=\"gtag\"><script type=\"application/json\">{\"vars\":{\"gtag_id\":\"UA-1\"}}</script></amp-analytics>",
                "<amp-analytics><script type=\"application/json\">{\"requests\":{\"pageview\":\"https://example.com/p\"}}</script></amp-analytics>",
            )
        );
    }

    #[test]
    fn ads_block() {
        let html = render_ads(&json!({ "ad-attributes": { "type": "doubleclick" } })).unwrap();
        assert_eq!(
            html,
            "<amp-story-auto-ads><script type=\"application/json\">{\"ad-attributes\":{\"type\":\"doubleclick\"}}</script></amp-story-auto-ads>"
        );
    }

    #[test]
    fn script_payloads_cannot_close_the_tag() {
        let html = render_ads(&json!({ "x": "</script>" })).unwrap();
        assert!(html.contains("<\\/script>"));
    }
}
