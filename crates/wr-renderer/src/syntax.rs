//! Syntax identifiers.
//!
//! A syntax id names a markup dialect as `type/version` (e.g. `xwiki/2.1`).
//! Renderers are selected by syntax id through a
//! [`RendererFactory`](crate::RendererFactory).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Error produced when a syntax id cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// The id is not of the form `type/version`.
    #[error("invalid syntax id '{0}': expected 'type/version'")]
    Invalid(String),
}

/// Identifier of a markup dialect, such as `xwiki/2.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Syntax {
    kind: Cow<'static, str>,
    version: Cow<'static, str>,
}

impl Syntax {
    /// XWiki 2.1 wiki syntax.
    pub const XWIKI_2_1: Self = Self::from_static("xwiki", "2.1");
    /// Markdown 1.2.
    pub const MARKDOWN_1_2: Self = Self::from_static("markdown", "1.2");
    /// Plain text.
    pub const PLAIN_1_0: Self = Self::from_static("plain", "1.0");
    /// XHTML 1.0.
    pub const XHTML_1_0: Self = Self::from_static("xhtml", "1.0");
    /// Event trace, one line per structural event.
    pub const EVENT_1_0: Self = Self::from_static("event", "1.0");

    const fn from_static(kind: &'static str, version: &'static str) -> Self {
        Self {
            kind: Cow::Borrowed(kind),
            version: Cow::Borrowed(version),
        }
    }

    /// Parse a `type/version` id.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Invalid`] unless the id is two non-empty parts
    /// separated by a single `/`.
    pub fn parse(id: &str) -> Result<Self, SyntaxError> {
        let (kind, version) = id
            .split_once('/')
            .ok_or_else(|| SyntaxError::Invalid(id.to_owned()))?;
        if kind.is_empty() || version.is_empty() || version.contains('/') {
            return Err(SyntaxError::Invalid(id.to_owned()));
        }
        Ok(Self {
            kind: Cow::Owned(kind.to_owned()),
            version: Cow::Owned(version.to_owned()),
        })
    }

    /// Syntax for an id taken as is.
    ///
    /// Well-formed ids parse as with [`parse`](Self::parse). Any other id is
    /// kept verbatim as the family with an empty version, so it still names
    /// a syntax but matches no builtin renderer.
    pub fn opaque(id: &str) -> Self {
        Self::parse(id).unwrap_or_else(|_| Self {
            kind: Cow::Owned(id.to_owned()),
            version: Cow::Borrowed(""),
        })
    }

    /// Syntax family, e.g. `xwiki`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Syntax version, e.g. `2.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Full id string, e.g. `xwiki/2.1`.
    pub fn to_id_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.kind)
        } else {
            write!(f, "{}/{}", self.kind, self.version)
        }
    }
}

impl FromStr for Syntax {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Syntax {
    type Error = SyntaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Syntax> for String {
    fn from(syntax: Syntax) -> Self {
        syntax.to_string()
    }
}
