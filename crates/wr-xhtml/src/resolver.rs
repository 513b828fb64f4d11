//! Target syntax resolution.

use wr_config::ParserConfig;
use wr_renderer::{Listener, Syntax};

use crate::stack::TagStack;

/// Ambient source of the document-wide target syntax.
pub trait SyntaxProvider {
    /// Current target syntax, if one is set.
    fn target_syntax(&self) -> Option<Syntax>;
}

impl SyntaxProvider for ParserConfig {
    fn target_syntax(&self) -> Option<Syntax> {
        self.target_syntax.clone()
    }
}

/// Provider returning a fixed target syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSyntaxProvider(pub Option<Syntax>);

impl SyntaxProvider for StaticSyntaxProvider {
    fn target_syntax(&self) -> Option<Syntax> {
        self.0.clone()
    }
}

/// Resolves the syntax an unchanged-content region is captured in.
///
/// Order: pending override on the stack (consumed), then the provider's
/// target syntax, then the parser's own syntax.
pub struct SyntaxResolver<'a> {
    provider: &'a dyn SyntaxProvider,
    default_syntax: Syntax,
}

impl<'a> SyntaxResolver<'a> {
    pub fn new(provider: &'a dyn SyntaxProvider, default_syntax: Syntax) -> Self {
        Self {
            provider,
            default_syntax,
        }
    }

    /// The parser's own syntax.
    pub fn default_syntax(&self) -> &Syntax {
        &self.default_syntax
    }

    pub fn resolve<L: Listener>(&self, stack: &mut TagStack<L>) -> Syntax {
        stack
            .take_syntax_override()
            .or_else(|| self.provider.target_syntax())
            .unwrap_or_else(|| self.default_syntax.clone())
    }
}
