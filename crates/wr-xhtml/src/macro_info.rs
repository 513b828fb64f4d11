//! Macro placeholders carried in XHTML comments.
//!
//! A macro call rendered to XHTML is delimited by two comments:
//!
//! ```html
//! <!--startmacro:code|-|language="rust"|-|fn main() {}-->
//! ...rendered macro output...
//! <!--stopmacro-->
//! ```
//!
//! The rendered output in between is not part of the document; only the
//! macro call itself is. Its content may be recovered later from an
//! unchanged-content region inside the output.

use std::sync::LazyLock;

use regex::Regex;
use wr_renderer::Parameters;

use crate::error::HandlerError;

const START_MARKER: &str = "startmacro:";
const STOP_MARKER: &str = "stopmacro";
const SEPARATOR: &str = "|-|";

static PARAMETER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s="]+)="((?:[^"\\]|\\.)*)""#).expect("invalid macro parameter regex")
});

/// Kind of a macro marker comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroMarker {
    /// Opening marker with the decoded macro call.
    Start(MacroInfo),
    /// `startmacro` comment that could not be decoded.
    MalformedStart(String),
    Stop,
}

impl MacroMarker {
    /// Classify a comment body. Returns `None` for ordinary comments.
    pub fn from_comment(comment: &str) -> Option<Self> {
        let comment = comment.trim();
        if comment == STOP_MARKER {
            return Some(Self::Stop);
        }
        let call = comment.strip_prefix(START_MARKER)?;
        Some(
            MacroInfo::parse(call)
                .map_or_else(|| Self::MalformedStart(comment.to_owned()), Self::Start),
        )
    }
}

/// An in-flight macro call awaiting its literal content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInfo {
    id: String,
    parameters: Parameters,
    content: Option<String>,
    content_captured: bool,
    inline: bool,
}

impl MacroInfo {
    /// Create a macro call without content.
    pub fn new(id: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            id: id.into(),
            parameters,
            content: None,
            content_captured: false,
            inline: false,
        }
    }

    /// Decode `ID|-|PARAMS|-|CONTENT` (everything after `startmacro:`).
    ///
    /// Returns `None` if the id is empty or contains whitespace.
    pub fn parse(call: &str) -> Option<Self> {
        let mut parts = call.splitn(3, SEPARATOR);
        let id = parts.next().unwrap_or_default().trim();
        if id.is_empty() || id.contains(char::is_whitespace) {
            return None;
        }

        let parameters = parts
            .next()
            .map(parse_parameters)
            .unwrap_or_default();
        let content = parts
            .next()
            .filter(|content| !content.is_empty())
            .map(unescape_comment);

        Some(Self {
            id: unescape_comment(id),
            parameters,
            content,
            content_captured: false,
            inline: false,
        })
    }

    /// Set whether the call appears inline.
    #[must_use]
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Content of the call: captured content if any, else the content
    /// written in the marker.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether the content came from an unchanged-content capture.
    pub fn has_captured_content(&self) -> bool {
        self.content_captured
    }

    /// Assign captured content.
    ///
    /// Captured content replaces the content written in the marker, but may
    /// only be assigned once.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::ContentAlreadySet`] on a second assignment.
    pub fn set_content(&mut self, content: String) -> Result<(), HandlerError> {
        if self.content_captured {
            return Err(HandlerError::ContentAlreadySet {
                macro_id: self.id.clone(),
            });
        }
        self.content = Some(content);
        self.content_captured = true;
        Ok(())
    }
}

fn parse_parameters(params: &str) -> Parameters {
    PARAMETER_PATTERN
        .captures_iter(params)
        .map(|caps| (unescape_comment(&caps[1]), unescape_value(&caps[2])))
        .collect()
}

fn unescape_value(value: &str) -> String {
    let value = unescape_comment(value);
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            unescaped.push(next);
        } else {
            unescaped.push(c);
        }
    }
    unescaped
}

/// Comments cannot hold `--`; it is written as `-\-`.
fn unescape_comment(s: &str) -> String {
    s.replace("-\\-", "--")
}
