//! Structural events of the wiki content model.

/// Ordered element parameters.
///
/// Keeps insertion order (XHTML attribute order) and holds at most one value
/// per key; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    /// Create an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value of a parameter, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only the parameters for which `f` returns true.
    pub fn retain(&mut self, mut f: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|(k, v)| f(k, v));
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Inline text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// No visual format; carries parameters only.
    None,
    Bold,
    Italic,
    Underlined,
    Strikedout,
    Monospace,
    Superscript,
    Subscript,
}

impl Format {
    /// Event-trace name of the format.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Underlined => "UNDERLINED",
            Self::Strikedout => "STRIKEDOUT",
            Self::Monospace => "MONOSPACE",
            Self::Superscript => "SUPERSCRIPT",
            Self::Subscript => "SUBSCRIPT",
        }
    }
}

/// Structural container opened by [`Event::Start`] and closed by [`Event::End`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Container {
    Document,
    /// Nested group of blocks (a document embedded in another).
    Group,
    Paragraph,
    /// Heading level 1 to 6.
    Heading(u8),
    List {
        ordered: bool,
    },
    ListItem,
    Quotation,
    Format(Format),
}

impl Container {
    /// Whether the container is block-level.
    pub fn is_block(self) -> bool {
        !matches!(self, Self::Format(_))
    }
}

/// Structural parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Start(Container, Parameters),
    End(Container, Parameters),
    Word(String),
    Space,
    SpecialSymbol(char),
    NewLine,
    HorizontalLine(Parameters),
    EmptyLines(usize),
    Verbatim {
        text: String,
        inline: bool,
    },
    Macro {
        id: String,
        parameters: Parameters,
        content: Option<String>,
        inline: bool,
    },
}

impl Event {
    /// Shorthand for a word event.
    pub fn word(word: impl Into<String>) -> Self {
        Self::Word(word.into())
    }

    /// Shorthand for starting a container without parameters.
    pub fn start(container: Container) -> Self {
        Self::Start(container, Parameters::new())
    }

    /// Shorthand for ending a container without parameters.
    pub fn end(container: Container) -> Self {
        Self::End(container, Parameters::new())
    }
}
