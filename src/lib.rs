//! # NullTrace HTML/Markdown → UI tree converter
//!
//! Turns untrusted HTML or Markdown into a tree of typed, keyed UI nodes for a
//! component-based presentation layer.
//!
//! ## Features
//! - Allow-list sanitization before parsing (tags and URL schemes)
//! - Per-tag renderers with a transparent fallback for unknown tags
//! - Elision of comments, empty tags, void elements and blank text
//! - Stable, sibling-unique reconciliation keys
//! - Memoized HTML conversion and last-request-wins Markdown conversion
//!
//! ## Example: HTML
//! ```ignore
//! use nulltrace_htmlui::{convert_html, render_markup, ConvertOptions};
//!
//! let nodes = convert_html("<p>Hello, <em>world</em>!</p>", &ConvertOptions::default());
//! assert_eq!(render_markup(&nodes), "<p>Hello,<em>world</em>!</p>");
//! ```
//!
//! ## Example: Markdown
//! ```ignore
//! use nulltrace_htmlui::{MarkdownConverter, ConvertOptions};
//!
//! let md = MarkdownConverter::new();
//! md.set_content("# Hello, world!").await?;
//! let nodes = md.render(&ConvertOptions::default());
//! ```

pub mod config;
pub mod error;
pub mod html;
pub mod mapper;
pub mod markdown;
pub mod markup;
pub mod node;
pub mod parser;
pub mod registry;
pub mod sanitize;
pub mod ui;
pub mod validator;

// --- Core types ---
pub use config::ConverterConfig;
pub use error::{ConvertError, ConvertResult};
pub use html::{ConvertOptions, HtmlConverter};
pub use markdown::{MarkdownConverter, MarkdownToHtml, PulldownConverter};
pub use node::{Attribute, HtmlNode, NodeKind};
pub use registry::{ElemMap, ElemProps, ElemRenderer, DEFAULT_IGNORE_NODES};
pub use sanitize::{AmmoniaSanitizer, SanitizeConfig, Sanitizer};
pub use parser::{Html5everParser, HtmlParser};
pub use ui::{UiElement, UiNode};

// --- Entry points ---
pub use html::convert_html;
pub use mapper::map_node;
pub use markdown::convert_markdown;
pub use markup::render_markup;
