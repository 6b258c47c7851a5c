use std::collections::HashMap;

use tracing::trace;

use super::{convert_style, CssRule};
use crate::error::StoryResult;
use crate::style::StyleRecord;

/// Deduplicates style records into generated class names.
///
/// One extractor lives for exactly one compilation. Equal records (same keys
/// and values, in any order) always map to the same `s-N` class, and classes
/// are numbered in first-seen order.
#[derive(Debug, Default)]
pub struct StyleExtractor {
    cache: HashMap<String, String>,
    rules: Vec<CssRule>,
}

impl StyleExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the class for `style`, converting and recording it on first use.
    pub fn append_styles(&mut self, style: &StyleRecord, path: &str) -> StoryResult<String> {
        let key = style.canonical_key();
        if let Some(class_name) = self.cache.get(&key) {
            trace!(class = %class_name, path, "style cache hit");
            return Ok(class_name.clone());
        }

        let declarations = convert_style(style, path)?;
        let class_name = format!("s-{}", self.rules.len() + 1);
        self.rules.push(CssRule::class(&class_name, declarations));
        self.cache.insert(key, class_name.clone());
        Ok(class_name)
    }

    /// Rules in class assignment order.
    pub fn combined_css(&self) -> &[CssRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::render_css;
    use crate::error::StoryError;
    use serde_json::{json, Value};

    fn record(value: Value) -> StyleRecord {
        StyleRecord::from_value(value).unwrap()
    }

    #[test]
    fn equal_records_share_a_class() {
        let mut ex = StyleExtractor::new();
        let a = ex.append_styles(&record(json!({ "color": "red", "fontSize": 12 })), "a").unwrap();
        let b = ex.append_styles(&record(json!({ "fontSize": 12, "color": "red" })), "b").unwrap();
        assert_eq!(a, "s-1");
        assert_eq!(b, "s-1");
        assert_eq!(ex.len(), 1);
    }

    #[test]
    fn numerically_equal_records_share_a_class() {
        let mut ex = StyleExtractor::new();
        let a = ex.append_styles(&record(json!({ "fontSize": 12 })), "a").unwrap();
        let b = ex.append_styles(&record(json!({ "fontSize": 12.0 })), "b").unwrap();
        assert_eq!(a, "s-1");
        assert_eq!(b, "s-1");
        assert_eq!(render_css(ex.combined_css()), ".s-1{font-size:12px;grid-gap:0}");
    }

    #[test]
    fn classes_follow_first_seen_order() {
        let mut ex = StyleExtractor::new();
        let names: Vec<String> = [
            json!({ "color": "red" }),
            json!({ "color": "blue" }),
            json!({ "color": "red" }),
            json!({ "color": "green" }),
        ]
        .into_iter()
        .map(|v| ex.append_styles(&record(v), "p").unwrap())
        .collect();
        assert_eq!(names, vec!["s-1", "s-2", "s-1", "s-3"]);

        let selectors: Vec<&str> = ex.combined_css().iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".s-1", ".s-2", ".s-3"]);
    }

    #[test]
    fn rule_table_holds_converted_declarations() {
        let mut ex = StyleExtractor::new();
        ex.append_styles(&record(json!({ "color": "red" })), "p").unwrap();
        assert_eq!(render_css(ex.combined_css()), ".s-1{color:red;grid-gap:0}");
    }

    #[test]
    fn empty_record_still_gets_a_class() {
        let mut ex = StyleExtractor::new();
        assert_eq!(ex.append_styles(&StyleRecord::new(), "p").unwrap(), "s-1");
        assert_eq!(render_css(ex.combined_css()), ".s-1{grid-gap:0}");
    }

    #[test]
    fn malformed_style_does_not_consume_a_class() {
        let mut ex = StyleExtractor::new();
        let err = ex
            .append_styles(&record(json!({ "boxShadow": { "color": "red" } })), "pages[0]")
            .unwrap_err();
        assert!(matches!(err, StoryError::MalformedStyle { .. }));
        assert!(ex.is_empty());
        assert_eq!(ex.append_styles(&record(json!({ "color": "red" })), "p").unwrap(), "s-1");
    }
}
