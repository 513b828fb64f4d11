//! Renderer lookup by syntax id.

use std::collections::HashMap;

use crate::events::EventsRenderer;
use crate::markdown::MarkdownBackend;
use crate::plain::PlainTextBackend;
use crate::renderer::{PrintRenderer, TextRenderer};
use crate::syntax::Syntax;
use crate::xhtml::XhtmlBackend;
use crate::xwiki::XWikiBackend;

/// Error returned when no renderer can be produced for a syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RendererLookupError {
    /// No renderer is registered for the syntax.
    #[error("no renderer registered for syntax {syntax}")]
    NotFound {
        /// Requested syntax.
        syntax: Syntax,
    },
}

/// Source of print renderers.
pub trait RendererFactory {
    /// Create a fresh renderer producing `syntax`.
    ///
    /// # Errors
    ///
    /// Returns [`RendererLookupError`] if the syntax is not supported.
    fn renderer(&self, syntax: &Syntax) -> Result<Box<dyn PrintRenderer>, RendererLookupError>;
}

/// Constructor for a boxed renderer.
pub type RendererConstructor = fn() -> Box<dyn PrintRenderer>;

/// [`RendererFactory`] backed by a map of syntax ids to constructors.
///
/// # Example
///
/// ```
/// use wr_renderer::{RendererFactory, RendererRegistry, Syntax};
///
/// let registry = RendererRegistry::with_builtin();
/// let renderer = registry.renderer(&Syntax::XWIKI_2_1).unwrap();
/// assert_eq!(renderer.syntax(), Syntax::XWIKI_2_1);
/// ```
#[derive(Default, Clone)]
pub struct RendererRegistry {
    constructors: HashMap<Syntax, RendererConstructor>,
}

impl RendererRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in renderers.
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new()
            .register(Syntax::XWIKI_2_1, || {
                Box::new(TextRenderer::<XWikiBackend>::new())
            })
            .register(Syntax::MARKDOWN_1_2, || {
                Box::new(TextRenderer::<MarkdownBackend>::new())
            })
            .register(Syntax::PLAIN_1_0, || {
                Box::new(TextRenderer::<PlainTextBackend>::new())
            })
            .register(Syntax::XHTML_1_0, || {
                Box::new(TextRenderer::<XhtmlBackend>::new())
            })
            .register(Syntax::EVENT_1_0, || Box::new(EventsRenderer::new()))
    }

    /// Register or replace the renderer for a syntax.
    #[must_use]
    pub fn register(mut self, syntax: Syntax, constructor: RendererConstructor) -> Self {
        self.constructors.insert(syntax, constructor);
        self
    }

    /// Remove the renderer for a syntax.
    #[must_use]
    pub fn without(mut self, syntax: &Syntax) -> Self {
        self.constructors.remove(syntax);
        self
    }

    /// Registered syntaxes, sorted.
    pub fn syntaxes(&self) -> Vec<&Syntax> {
        let mut syntaxes: Vec<_> = self.constructors.keys().collect();
        syntaxes.sort();
        syntaxes
    }
}

impl RendererFactory for RendererRegistry {
    fn renderer(&self, syntax: &Syntax) -> Result<Box<dyn PrintRenderer>, RendererLookupError> {
        self.constructors
            .get(syntax)
            .map(|constructor| constructor())
            .ok_or_else(|| RendererLookupError::NotFound {
                syntax: syntax.clone(),
            })
    }
}
