use std::sync::OnceLock;

use regex::Regex;

use crate::css::StyleExtractor;
use crate::error::StoryResult;
use crate::story::InlineTextStyle;
use crate::tag::escape_html;

/// A maximal run of text sharing one set of annotation classes
#[derive(Debug, Clone, PartialEq)]
pub struct InlineSpan {
    pub text: String,
    /// Classes of the covering annotations, in annotation declaration order.
    pub class_names: Vec<String>,
}

/// Splits `text` into the minimal ordered partition of runs with equal active classes.
///
/// Each annotation is resolved to a class up front, in declaration order.
/// With no annotations the whole text is one unstyled span and the extractor
/// is never touched.
pub fn split_inline(
    text: &str,
    annotations: &[InlineTextStyle],
    extractor: &mut StyleExtractor,
    path: &str,
) -> StoryResult<Vec<InlineSpan>> {
    if annotations.is_empty() {
        return Ok(vec![InlineSpan {
            text: text.to_string(),
            class_names: Vec::new(),
        }]);
    }

    let classes = annotations
        .iter()
        .enumerate()
        .map(|(i, a)| extractor.append_styles(&a.styles, &format!("{}.inlineStyles[{}]", path, i)))
        .collect::<StoryResult<Vec<String>>>()?;

    let mut spans: Vec<InlineSpan> = Vec::new();
    for (index, ch) in text.chars().enumerate() {
        let active: Vec<String> = annotations
            .iter()
            .zip(&classes)
            .filter(|(a, _)| a.covers(index))
            .map(|(_, c)| c.clone())
            .collect();

        match spans.last_mut() {
            Some(last) if last.class_names == active => last.text.push(ch),
            _ => spans.push(InlineSpan {
                text: ch.to_string(),
                class_names: active,
            }),
        }
    }
    Ok(spans)
}

/// Escapes span text and wraps styled spans in `<span class="…">`.
pub fn render_spans(spans: &[InlineSpan]) -> String {
    let mut html = String::new();
    for span in spans {
        if span.class_names.is_empty() {
            html.push_str(&escape_html(&span.text));
        } else {
            html.push_str(&format!(
                "<span class=\"{}\">{}</span>",
                span.class_names.join(" "),
                escape_html(&span.text)
            ));
        }
    }
    html
}

fn line_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"))
}

/// `\r\n`, `\r` and `\n` → `<br>`
pub fn replace_line_breaks(html: &str) -> String {
    line_break_regex().replace_all(html, "<br>").into_owned()
}

/// Full text pipeline for one text element: split, render, then line breaks.
pub fn render_text(
    text: &str,
    annotations: &[InlineTextStyle],
    extractor: &mut StyleExtractor,
    path: &str,
) -> StoryResult<String> {
    let spans = split_inline(text, annotations, extractor, path)?;
    Ok(replace_line_breaks(&render_spans(&spans)))
}
