use std::collections::BTreeSet;

use tracing::debug;

use crate::config::CompileOptions;
use crate::css::{convert_style, render_css, CssRule, StyleExtractor};
use crate::error::{StoryError, StoryResult};
use crate::format::pretty_print;
use crate::head::{
    render_ads, render_analytics, render_metadata, render_runtime_scripts, RuntimeComponent,
    AMP_BOILERPLATE, VIEWPORT,
};
use crate::inline::render_text;
use crate::story::*;
use crate::tag::{escape_html, Tag};

/// Selector for a `defaultStyles` key. Unknown keys are used as selectors verbatim.
pub fn default_style_selector(element_type: &str) -> &str {
    match element_type {
        "container" => "div",
        "image" => "amp-img",
        "video" => "amp-video",
        other => TextKind::parse(other).map(|k| k.tag_name()).unwrap_or(other),
    }
}

/// State accumulated while rendering one story
#[derive(Debug, Default)]
struct RenderContext {
    extractor: StyleExtractor,
    runtime: BTreeSet<RuntimeComponent>,
}

impl RenderContext {
    fn render_story(&mut self, story: &Story) -> StoryResult<String> {
        let mut body = String::new();

        if !story.analytics.is_empty() {
            self.runtime.insert(RuntimeComponent::Analytics);
            body.push_str(&render_analytics(&story.analytics)?);
        }
        if let Some(ads) = &story.ads {
            self.runtime.insert(RuntimeComponent::AutoAds);
            body.push_str(&render_ads(ads)?);
        }
        for (i, page) in story.pages.iter().enumerate() {
            body.push_str(&self.render_page(page, &format!("pages[{}]", i))?);
        }

        let preview = story.preview.clone().unwrap_or_default();
        Tag::new("amp-story")
            .flag("standalone", true)
            .opt_attr("bookend-config-src", story.bookend_config_src.as_deref())
            .opt_attr("title", story.title.as_deref())
            .opt_attr("publisher", preview.publisher.as_deref())
            .opt_attr("publisher-logo-src", preview.publisher_logo_src.as_deref())
            .opt_attr("poster-portrait-src", preview.poster_portrait_src.as_deref())
            .opt_attr("poster-square-src", preview.poster_square_src.as_deref())
            .opt_attr("poster-landscape-src", preview.poster_landscape_src.as_deref())
            .render(&mut self.extractor, "story", &body)
    }

    fn render_page(&mut self, page: &Page, path: &str) -> StoryResult<String> {
        let mut layers = String::new();
        for (i, layer) in page.layers.iter().enumerate() {
            layers.push_str(&self.render_layer(layer, &format!("{}.layers[{}]", path, i))?);
        }

        let auto_advance = page.auto_advance_after.as_ref().map(AutoAdvance::to_attr);
        Tag::new("amp-story-page")
            .attr("id", page.id.as_str())
            .opt_attr("auto-advance-after", auto_advance.as_deref())
            .render(&mut self.extractor, path, &layers)
    }

    fn render_layer(&mut self, layer: &Layer, path: &str) -> StoryResult<String> {
        if layer.template == LayerTemplate::Thirds && layer.elements.len() != 3 {
            return Err(StoryError::InvalidThirdsArity {
                path: path.to_string(),
                count: layer.elements.len(),
            });
        }

        let mut children = String::new();
        for (i, element) in layer.elements.iter().enumerate() {
            let (element_path, third) = match layer.template {
                LayerTemplate::Fill => (format!("{}.element", path), None),
                LayerTemplate::Thirds => (format!("{}.elements[{}]", path, i), Some(i)),
                _ => (format!("{}.elements[{}]", path, i), None),
            };
            children.push_str(&self.render_element(element, third, &element_path)?);
        }

        Tag::new("amp-story-grid-layer")
            .attr("template", layer.template.as_str())
            .styles(layer.styles.as_ref())
            .render(&mut self.extractor, path, &children)
    }

    fn render_element(
        &mut self,
        element: &Element,
        third: Option<usize>,
        path: &str,
    ) -> StoryResult<String> {
        match element {
            Element::Container(container) => {
                let mut children = String::new();
                for (i, child) in container.elements.iter().enumerate() {
                    children.push_str(&self.render_element(
                        child,
                        None,
                        &format!("{}.elements[{}]", path, i),
                    )?);
                }
                Tag::new("div")
                    .opt_attr("id", container.id.as_deref())
                    .styles(container.styles.as_ref())
                    .third_index(third)
                    .render(&mut self.extractor, path, &children)
            }
            Element::Text(text) => {
                let body = render_text(&text.text, &text.inline_styles, &mut self.extractor, path)?;
                Tag::new(text.kind.tag_name())
                    .opt_attr("id", text.id.as_deref())
                    .styles(text.styles.as_ref())
                    .third_index(third)
                    .render(&mut self.extractor, path, &body)
            }
            Element::Image(image) => Tag::new("amp-img")
                .opt_attr("id", image.id.as_deref())
                .opt_attr("alt", image.alt.as_deref())
                .opt_attr("layout", image.layout.as_ref().map(MediaLayout::as_str))
                .width(image.width.as_deref())
                .height(image.height.as_deref())
                .source(Some(image.source.as_str()))
                .styles(image.styles.as_ref())
                .third_index(third)
                .render(&mut self.extractor, path, ""),
            Element::Video(video) => {
                self.runtime.insert(RuntimeComponent::Video);

                let mut sources = String::new();
                for source in &video.sources {
                    sources.push_str(
                        &Tag::new("source")
                            .source(Some(source.source.as_str()))
                            .attr("type", source.mime())
                            .render(&mut self.extractor, path, "")?,
                    );
                }
                Tag::new("amp-video")
                    .opt_attr("id", video.id.as_deref())
                    .opt_attr("layout", video.layout.as_ref().map(MediaLayout::as_str))
                    .opt_attr("poster", video.poster.as_deref())
                    .flag("loop", video.looping)
                    .flag("autoplay", video.autoplay)
                    .width(video.width.as_deref())
                    .height(video.height.as_deref())
                    .source(video.sources.first().map(|s| s.source.as_str()))
                    .styles(video.styles.as_ref())
                    .third_index(third)
                    .render(&mut self.extractor, path, &sources)
            }
        }
    }
}

fn default_style_rules(story: &Story) -> StoryResult<Vec<CssRule>> {
    story
        .default_styles
        .iter()
        .map(|(element_type, style)| -> StoryResult<CssRule> {
            let path = format!("defaultStyles.{}", element_type);
            Ok(CssRule::new(
                default_style_selector(element_type),
                convert_style(style, &path)?,
            ))
        })
        .collect()
}

/// Compiles a story into a complete AMP HTML document.
///
/// The body is rendered first so that every class and runtime extension it
/// needs is known before the head is written.
pub fn compile(story: &Story, options: &CompileOptions) -> StoryResult<String> {
    options.validate()?;

    let mut ctx = RenderContext::default();
    let body = ctx.render_story(story)?;
    debug!(
        pages = story.pages.len(),
        classes = ctx.extractor.len(),
        extensions = ctx.runtime.len(),
        "rendered story body"
    );

    let mut css = story.custom_css.clone().unwrap_or_default();
    css.push_str(&render_css(&default_style_rules(story)?));
    css.push_str(&render_css(ctx.extractor.combined_css()));

    let mut html = format!(
        "<!doctype html><html \u{26a1} lang=\"{}\"><head><meta charset=\"utf-8\">",
        escape_html(&options.lang)
    );
    html.push_str(&render_runtime_scripts(options, &ctx.runtime));
    if let Some(title) = &story.title {
        html.push_str(&format!("<title>{}</title>", escape_html(title)));
    }
    if let Some(url) = &story.canonical_url {
        html.push_str(&format!("<link rel=\"canonical\" href=\"{}\">", escape_html(url)));
    }
    html.push_str(&format!("<meta name=\"viewport\" content=\"{}\">", VIEWPORT));
    html.push_str(AMP_BOILERPLATE);
    html.push_str(&format!("<style amp-custom>{}</style>", css));
    if let Some(meta) = &story.meta {
        html.push_str(&render_metadata(meta)?);
    }
    html.push_str("</head><body>");
    html.push_str(&body);
    html.push_str("</body></html>");

    if options.pretty {
        Ok(pretty_print(&html))
    } else {
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleRecord;
    use serde_json::json;

    fn paragraph(text: &str) -> Element {
        Element::Text(TextElement {
            kind: TextKind::Paragraph,
            id: None,
            text: text.to_string(),
            inline_styles: Vec::new(),
            styles: None,
        })
    }

    fn story_with_layer(layer: Layer) -> Story {
        Story {
            pages: vec![Page {
                id: "p".into(),
                auto_advance_after: None,
                layers: vec![layer],
            }],
            ..Story::default()
        }
    }

    #[test]
    fn selectors_for_default_styles() {
        assert_eq!(default_style_selector("heading"), "h1");
        assert_eq!(default_style_selector("heading5"), "h5");
        assert_eq!(default_style_selector("paragraph"), "p");
        assert_eq!(default_style_selector("image"), "amp-img");
        assert_eq!(default_style_selector("video"), "amp-video");
        assert_eq!(default_style_selector("container"), "div");
        assert_eq!(default_style_selector(".custom"), ".custom");
    }

    #[test]
    fn thirds_arity_is_checked_before_rendering() {
        let story = story_with_layer(Layer {
            template: LayerTemplate::Thirds,
            styles: None,
            elements: vec![paragraph("a"), paragraph("b")],
        });
        let err = compile(&story, &CompileOptions::default()).unwrap_err();
        assert_eq!(
            err,
            StoryError::InvalidThirdsArity {
                path: "pages[0].layers[0]".into(),
                count: 2,
            }
        );
    }

    #[test]
    fn children_are_numbered_before_their_container() {
        let story = story_with_layer(Layer {
            template: LayerTemplate::Fill,
            styles: None,
            elements: vec![Element::Container(Container {
                id: None,
                styles: None,
                elements: vec![Element::Text(TextElement {
                    kind: TextKind::Heading(2),
                    id: None,
                    text: "x".into(),
                    inline_styles: Vec::new(),
                    styles: StyleRecord::from_value(json!({ "color": "red" })),
                })],
            })],
        });
        let html = compile(&story, &CompileOptions::default()).unwrap();
        assert!(html.contains("<div class=\"s-2\"><h2 class=\"s-1\">x</h2></div>"));
    }

    #[test]
    fn invalid_options_fail_the_compile() {
        let options = CompileOptions {
            lang: String::new(),
            ..CompileOptions::default()
        };
        let err = compile(&Story::default(), &options).unwrap_err();
        assert!(matches!(err, StoryError::ConfigError(_)));
    }
}
