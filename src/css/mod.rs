//! # Style pipeline
//!
//! Turns [`StyleRecord`](crate::style::StyleRecord)s into CSS.
//!
//! - [`convert`] maps one record to ordered CSS declarations (units,
//!   shadows, gradients, transforms, filters, flex aliases, the `grid-gap`
//!   reset).
//! - [`extractor`] deduplicates records into generated `s-N` classes and
//!   keeps the rule table for the document `<style>` block.
//!
//! ## Usage
//! ```ignore
//! let mut extractor = StyleExtractor::new();
//! let class = extractor.append_styles(&style, "pages[0]")?;
//! let css = render_css(extractor.combined_css());
//! ```

pub mod convert;
pub mod extractor;

pub use convert::convert_style;
pub use extractor::StyleExtractor;

/// Ordered CSS declarations, e.g. `[("color", "red"), ("grid-gap", "0")]`.
///
/// Setting a property that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations(Vec<(String, String)>);

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| p == property) {
            Some(existing) => existing.1 = value,
            None => self.0.push((property.to_string(), value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `color:red;grid-gap:0`
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{}:{}", p, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// A single CSS rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    /// Full CSS selector, e.g. `.s-1` or `h1`
    pub selector: String,
    pub declarations: Declarations,
}

impl CssRule {
    pub fn new(selector: impl Into<String>, declarations: Declarations) -> Self {
        Self {
            selector: selector.into(),
            declarations,
        }
    }

    pub fn class(class_name: &str, declarations: Declarations) -> Self {
        Self::new(format!(".{}", class_name), declarations)
    }
}

/// Serializes rules in the given order as `selector{prop:value;…}`.
pub fn render_css(rules: &[CssRule]) -> String {
    let mut css = String::new();
    for rule in rules {
        css.push_str(&rule.selector);
        css.push('{');
        css.push_str(&rule.declarations.to_css());
        css.push('}');
    }
    css
}

/// `backgroundColor` → `background-color`
pub(crate) fn dasherize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut d = Declarations::new();
        d.set("color", "red");
        d.set("padding", "4px");
        d.set("color", "blue");
        let pairs: Vec<_> = d.iter().collect();
        assert_eq!(pairs, vec![("color", "blue"), ("padding", "4px")]);
    }

    #[test]
    fn render_keeps_rule_order() {
        let mut a = Declarations::new();
        a.set("color", "red");
        let mut b = Declarations::new();
        b.set("margin", "0");
        let css = render_css(&[CssRule::class("s-2", b), CssRule::new("h1", a)]);
        assert_eq!(css, ".s-2{margin:0}h1{color:red}");
    }

    #[test]
    fn empty_rules_render_nothing() {
        assert_eq!(render_css(&[]), "");
    }

    #[test]
    fn dasherize_camel_case() {
        assert_eq!(dasherize("backgroundColor"), "background-color");
        assert_eq!(dasherize("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(dasherize("color"), "color");
        assert_eq!(dasherize("hueRotate"), "hue-rotate");
    }
}
