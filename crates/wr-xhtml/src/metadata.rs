//! Metadata marker detection.
//!
//! A metadata element carries out-of-band instructions in attributes:
//!
//! ```html
//! <div class="xwiki-metadata-container"
//!      data-xwiki-syntax="markdown/1.2"
//!      data-xwiki-unchanged-content="">...</div>
//! ```

use wr_config::MetadataConfig;
use wr_renderer::Parameters;

/// Metadata decoded from an element's attributes.
///
/// Only recognized keys are kept; absent keys are not defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    syntax: Option<String>,
    unchanged_content: bool,
}

impl Metadata {
    /// Key of the syntax override.
    pub const SYNTAX: &'static str = "syntax";
    /// Key flagging content to capture verbatim.
    pub const UNCHANGED_CONTENT: &'static str = "unchanged-content";

    /// Declared syntax id, unparsed.
    pub fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    /// Whether the unchanged-content flag is present.
    pub fn has_unchanged_content(&self) -> bool {
        self.unchanged_content
    }
}

/// Recognizes metadata elements and decodes their keys.
#[derive(Debug, Clone)]
pub struct MetadataDetector {
    container_class: String,
    attribute_prefix: String,
}

impl Default for MetadataDetector {
    fn default() -> Self {
        Self::from_config(&MetadataConfig::default())
    }
}

impl MetadataDetector {
    #[must_use]
    pub fn from_config(config: &MetadataConfig) -> Self {
        Self {
            container_class: config.container_class.clone(),
            attribute_prefix: config.attribute_prefix.clone(),
        }
    }

    /// Whether the element parameters mark a metadata element.
    ///
    /// True iff the `class` attribute contains the container class token.
    pub fn is_metadata_element(&self, params: &Parameters) -> bool {
        params
            .get("class")
            .is_some_and(|class| class.split_whitespace().any(|c| c == self.container_class))
    }

    /// Decode the recognized metadata keys.
    pub fn decode(&self, params: &Parameters) -> Metadata {
        let mut metadata = Metadata::default();
        for (key, value) in params.iter() {
            match self.metadata_key(key) {
                Some(Metadata::SYNTAX) => metadata.syntax = Some(value.to_owned()),
                Some(Metadata::UNCHANGED_CONTENT) => metadata.unchanged_content = true,
                _ => {}
            }
        }
        metadata
    }

    /// Metadata key of an attribute, if it carries the metadata prefix.
    pub fn metadata_key<'k>(&self, attribute: &'k str) -> Option<&'k str> {
        attribute.strip_prefix(self.attribute_prefix.as_str())
    }

    /// Parameters with metadata attributes and the container class removed.
    pub fn strip(&self, params: &Parameters) -> Parameters {
        let mut stripped = Parameters::new();
        for (key, value) in params.iter() {
            if self.metadata_key(key).is_some() {
                continue;
            }
            if key == "class" {
                let classes: Vec<_> = value
                    .split_whitespace()
                    .filter(|c| *c != self.container_class)
                    .collect();
                if !classes.is_empty() {
                    stripped.insert(key, classes.join(" "));
                }
                continue;
            }
            stripped.insert(key, value);
        }
        stripped
    }
}
