//! HTML entity handling.
//!
//! XHTML produced by browsers and editors uses named HTML entities that an
//! XML reader does not know. They are replaced with Unicode characters before
//! parsing; the five XML entities are left for the XML reader.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Named HTML entities, sorted by name for binary search.
const HTML_ENTITIES: &[(&str, char)] = &[
    ("bull", '\u{2022}'),
    ("cent", '\u{00a2}'),
    ("copy", '\u{00a9}'),
    ("deg", '\u{00b0}'),
    ("euro", '\u{20ac}'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{00ab}'),
    ("larr", '\u{2190}'),
    ("ldquo", '\u{201c}'),
    ("lsquo", '\u{2018}'),
    ("mdash", '\u{2014}'),
    ("middot", '\u{00b7}'),
    ("nbsp", '\u{00a0}'),
    ("ndash", '\u{2013}'),
    ("para", '\u{00b6}'),
    ("pound", '\u{00a3}'),
    ("raquo", '\u{00bb}'),
    ("rarr", '\u{2192}'),
    ("rdquo", '\u{201d}'),
    ("reg", '\u{00ae}'),
    ("rsquo", '\u{2019}'),
    ("sect", '\u{00a7}'),
    ("shy", '\u{00ad}'),
    ("times", '\u{00d7}'),
    ("trade", '\u{2122}'),
    ("yen", '\u{00a5}'),
];

fn lookup(name: &str) -> Option<char> {
    HTML_ENTITIES
        .binary_search_by(|(entity, _)| (*entity).cmp(name))
        .ok()
        .map(|index| HTML_ENTITIES[index].1)
}

/// Replace named HTML entities with their characters.
///
/// Unknown entities and XML entities (`amp`, `lt`, `gt`, `quot`, `apos`)
/// are kept as written.
pub fn convert_html_entities(html: &str) -> Cow<'_, str> {
    ENTITY_PATTERN.replace_all(html, |caps: &regex::Captures| {
        lookup(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
    })
}

/// Decode an entity reference reported by the XML reader (name without `&`/`;`).
pub fn decode_reference(entity: &str) -> String {
    let decoded = match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        s => lookup(s),
    };
    decoded.map_or_else(|| format!("&{entity};"), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(HTML_ENTITIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_convert_named_entities() {
        assert_eq!(
            convert_html_entities("a&nbsp;b&mdash;c"),
            "a\u{00a0}b\u{2014}c"
        );
    }

    #[test]
    fn test_xml_and_unknown_entities_kept() {
        assert_eq!(convert_html_entities("&amp;&lt;&bogus;"), "&amp;&lt;&bogus;");
        assert!(matches!(convert_html_entities("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_reference() {
        assert_eq!(decode_reference("lt"), "<");
        assert_eq!(decode_reference("#65"), "A");
        assert_eq!(decode_reference("#x41"), "A");
        assert_eq!(decode_reference("nbsp"), "\u{00a0}");
        assert_eq!(decode_reference("bogus"), "&bogus;");
    }
}
