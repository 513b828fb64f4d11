//! XHTML to wiki event parser.
//!
//! Converts XHTML produced by a wiki renderer back into structural
//! [`Event`](wr_renderer::Event)s. Two kinds of out-of-band markers are
//! honored:
//!
//! - macro calls, carried in `startmacro`/`stopmacro` comments around the
//!   macro's rendered output ([`MacroInfo`])
//! - metadata elements, which may switch the target syntax of their subtree
//!   and mark it as *unchanged content* ([`MetadataDetector`])
//!
//! Unchanged content inside a macro's output is rendered back to text in the
//! resolved target syntax and becomes the macro's content.
//!
//! # Architecture
//!
//! - [`XhtmlTreeParser`]: quick-xml based tree parser
//! - [`XhtmlParser`]: walks the tree and emits [`ScannerEvent`]s
//! - [`TagStack`]: per-parse context (overrides, captures, macros)
//! - [`MacroHandler`]: begin/end handling of metadata elements
//! - [`SyntaxResolver`]: override, then target syntax, then parser syntax
//! - [`GeneratorListener`]: scanner events to structural events
//!
//! # Example
//!
//! ```
//! use wr_renderer::{PrintRenderer, RendererRegistry, Syntax, TextRenderer, XWikiBackend};
//! use wr_xhtml::{StaticSyntaxProvider, XhtmlParser};
//!
//! let registry = RendererRegistry::with_builtin();
//! let provider = StaticSyntaxProvider(Some(Syntax::XWIKI_2_1));
//! let parser = XhtmlParser::new(&registry, &provider);
//!
//! let xhtml = concat!(
//!     "<!--startmacro:info|-||-|-->",
//!     r#"<div class="xwiki-metadata-container" data-xwiki-unchanged-content="">"#,
//!     "<p>Some <em>text</em></p></div><!--stopmacro-->",
//! );
//! let mut renderer = TextRenderer::<XWikiBackend>::new();
//! parser.parse(xhtml, &mut renderer).unwrap();
//! assert_eq!(renderer.printer().as_str(), "{{info}}Some //text//{{/info}}");
//! ```

mod capture;
mod entities;
mod error;
mod generator;
mod macro_handler;
mod macro_info;
mod metadata;
mod parser;
mod resolver;
mod stack;
mod tree;
mod walker;

pub use capture::{CapturePipeline, CaptureTarget};
pub use entities::convert_html_entities;
pub use error::{CaptureWarning, FrameKind, HandlerError, ParseWarning, StackError, XhtmlError};
pub use generator::{GeneratorListener, ScannerContext, ScannerEvent};
pub use macro_handler::MacroHandler;
pub use macro_info::{MacroInfo, MacroMarker};
pub use metadata::{Metadata, MetadataDetector};
pub use parser::XhtmlTreeParser;
pub use resolver::{StaticSyntaxProvider, SyntaxProvider, SyntaxResolver};
pub use stack::{CaptureFlag, TagStack};
pub use tree::{Element, Node};
pub use walker::{ParseResult, XhtmlParser};
