//! Error types for XHTML parsing.

use std::str::Utf8Error;

use wr_renderer::{RendererLookupError, Syntax};

/// Stack frame kinds, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    SyntaxOverride,
    CaptureFlag,
    Scanner,
    Macro,
    Element,
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SyntaxOverride => "syntax override",
            Self::CaptureFlag => "capture flag",
            Self::Scanner => "scanner context",
            Self::Macro => "macro info",
            Self::Element => "element",
        })
    }
}

/// Tag stack discipline violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// A frame was popped with no matching push.
    #[error("stack underflow: {operation} found no {kind} frame")]
    Underflow {
        /// Kind of frame expected.
        kind: FrameKind,
        /// Operation that attempted the pop.
        operation: &'static str,
    },
}

/// Defect detected while handling metadata elements.
///
/// These indicate a bug in the tree walker or the handler, never bad input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Stack(#[from] StackError),

    /// Captured content was assigned twice to the same macro.
    #[error("content of macro '{macro_id}' was already set by an earlier capture")]
    ContentAlreadySet {
        /// Id of the macro whose content was set twice.
        macro_id: String,
    },
}

/// Recoverable problem with one metadata element.
///
/// The region is parsed without capturing its content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureWarning {
    /// No renderer for the resolved syntax.
    #[error("cannot capture unchanged content as {syntax}")]
    RendererUnavailable {
        /// Resolved syntax.
        syntax: Syntax,
        #[source]
        source: RendererLookupError,
    },
}

/// Error during XHTML parsing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum XhtmlError {
    /// XML parsing error.
    #[error("XML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Metadata handling defect.
    #[error("metadata handling failed")]
    Handler(#[from] HandlerError),
}

impl From<StackError> for XhtmlError {
    fn from(err: StackError) -> Self {
        Self::Handler(HandlerError::Stack(err))
    }
}

/// Recoverable problem reported by a parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    #[error(transparent)]
    Capture(#[from] CaptureWarning),

    /// A `startmacro` comment without a usable macro id.
    #[error("malformed macro marker '{0}'")]
    MalformedMacroMarker(String),

    #[error("stopmacro marker without open macro")]
    UnmatchedStopMacro,

    /// The input ended inside a macro.
    #[error("macro '{id}' is never stopped")]
    UnterminatedMacro {
        /// Id of the open macro.
        id: String,
    },
}
