//! Structural wiki events and syntax-specific print renderers.
//!
//! This crate provides the rendering side of the wiki content model:
//! - [`Event`]: structural parse events (containers, words, macros)
//! - [`Listener`]: receiver of events
//! - [`PrintRenderer`]: listener writing text of one [`Syntax`] into a [`WikiPrinter`]
//! - [`RendererFactory`]: renderer lookup by syntax id
//!
//! # Architecture
//!
//! [`TextRenderer`] handles block separation, list nesting and quotation
//! depth generically and delegates the actual markup to a [`SyntaxBackend`]:
//! - [`XWikiBackend`]: XWiki 2.1
//! - [`MarkdownBackend`]: Markdown 1.2
//! - [`PlainTextBackend`]: plain text
//! - [`XhtmlBackend`]: XHTML 1.0
//!
//! [`EventsRenderer`] prints one line per event and is mostly useful for
//! diagnostics.
//!
//! # Example
//!
//! ```
//! use wr_renderer::{Container, Event, TextRenderer, XWikiBackend};
//!
//! let text = TextRenderer::<XWikiBackend>::new().render([
//!     Event::start(Container::Paragraph),
//!     Event::word("Hello"),
//!     Event::end(Container::Paragraph),
//! ]);
//! assert_eq!(text, "Hello");
//! ```

mod backend;
mod event;
mod events;
mod factory;
mod listener;
mod markdown;
mod plain;
mod printer;
mod renderer;
mod syntax;
mod xhtml;
mod xwiki;

pub use backend::SyntaxBackend;
pub use event::{Container, Event, Format, Parameters};
pub use events::EventsRenderer;
pub use factory::{RendererConstructor, RendererFactory, RendererLookupError, RendererRegistry};
pub use listener::{InlineFilterListener, Listener};
pub use markdown::MarkdownBackend;
pub use plain::PlainTextBackend;
pub use printer::WikiPrinter;
pub use renderer::{PrintRenderer, TextRenderer};
pub use syntax::{Syntax, SyntaxError};
pub use xhtml::{XhtmlBackend, escape_html};
pub use xwiki::XWikiBackend;
