//! # Story → AMP compiler
//!
//! Compiles a declarative JSON story (pages, layers, styled elements) into a
//! single AMP story HTML document with an embedded, deduplicated stylesheet.
//!
//! ## Features
//! - Typed story model parsed from JSON or YAML, with element paths in errors
//! - Style records converted to CSS (units, shadows, gradients, transforms, filters)
//! - Structurally equal styles collapse to one generated `s-N` class
//! - Overlapping inline text annotations split into minimal `<span>` runs
//! - Runtime extension scripts included only when the story uses them
//! - Optional pretty printing
//!
//! ## Example
//! ```ignore
//! use story_amp::{compile_json, CompileOptions};
//!
//! let json = r#"{
//!   "title": "Hello",
//!   "pages": [{ "layers": [{ "template": "fill",
//!     "element": { "type": "heading", "text": "Hi", "styles": { "color": "red" } } }] }]
//! }"#;
//!
//! let html = compile_json(json, &CompileOptions::default()).expect("Failed to compile story");
//! assert!(html.contains(r#"<h1 class="s-1">Hi</h1>"#));
//! ```

pub mod compiler;
pub mod config;
pub mod css;
pub mod error;
pub mod format;
pub mod head;
pub mod inline;
pub mod parser;
pub mod story;
pub mod style;
pub mod tag;

// --- Core types ---
pub use compiler::compile;
pub use config::CompileOptions;
pub use css::{convert_style, render_css, CssRule, Declarations, StyleExtractor};
pub use error::{StoryError, StoryResult};
pub use inline::{split_inline, InlineSpan};
pub use story::{Element, Layer, LayerTemplate, Page, Story};
pub use style::StyleRecord;

// --- Parsing ---
pub use parser::{parse_story_json, parse_story_value, parse_story_yaml};

/// Parse a JSON story and compile it
pub fn compile_json(json: &str, options: &CompileOptions) -> StoryResult<String> {
    compile(&parse_story_json(json)?, options)
}

/// Parse a YAML story and compile it
pub fn compile_yaml(yaml: &str, options: &CompileOptions) -> StoryResult<String> {
    compile(&parse_story_yaml(yaml)?, options)
}
