//! XHTML tree parser built on quick-xml.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use wr_renderer::Parameters;

use crate::entities::{convert_html_entities, decode_reference};
use crate::error::XhtmlError;
use crate::tree::{Element, Node};

/// Tag of the synthetic element wrapping the parsed fragment.
const ROOT_TAG: &str = "root";

/// Parse XHTML fragments into an [`Element`] tree.
///
/// Comments are kept as [`Node::Comment`] since macro markers are carried
/// in comments.
pub struct XhtmlTreeParser;

impl XhtmlTreeParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an XHTML fragment.
    ///
    /// Returns a synthetic `root` element whose children are the fragment's
    /// top-level nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed as XML.
    pub fn parse(&self, xhtml: &str) -> Result<Element, XhtmlError> {
        let xhtml = convert_html_entities(xhtml);
        let wrapped = format!("<{ROOT_TAG}>{xhtml}</{ROOT_TAG}>");

        let mut reader = Reader::from_str(&wrapped);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let mut root = self.parse_children(&mut reader, ROOT_TAG)?;
                    root.tag = self.decode_tag(&reader, e.name().as_ref());
                    return Ok(root);
                }
                Event::Eof => return Ok(Element::new(ROOT_TAG)),
                _ => {}
            }
            buf.clear();
        }
    }

    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        parent_tag: &str,
    ) -> Result<Element, XhtmlError> {
        let mut buf = Vec::new();
        let mut element = Element::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let tag = self.decode_tag(reader, e.name().as_ref());
                    let params = self.decode_params(reader, &e);
                    let mut child = self.parse_children(reader, &tag)?;
                    child.tag = tag;
                    child.params = params;
                    element.children.push(Node::Element(child));
                }
                Event::Empty(e) => {
                    let child = Element::new(self.decode_tag(reader, e.name().as_ref()))
                        .with_params(self.decode_params(reader, &e));
                    element.children.push(Node::Element(child));
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    element.push_text(&text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    element.push_text(&decode_reference(&entity));
                }
                Event::CData(e) => {
                    element.push_text(&String::from_utf8_lossy(&e));
                }
                Event::Comment(e) => {
                    let comment = reader.decoder().decode(&e)?.into_owned();
                    element.children.push(Node::Comment(comment));
                }
                Event::End(e) => {
                    let end_tag = self.decode_tag(reader, e.name().as_ref());
                    if end_tag == parent_tag {
                        return Ok(element);
                    }
                    // Mismatched end tag - continue
                }
                Event::Eof => return Ok(element),
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn decode_tag<R: BufRead>(&self, reader: &Reader<R>, name: &[u8]) -> String {
        reader.decoder().decode(name).map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
    }

    fn decode_params<R: BufRead>(&self, reader: &Reader<R>, e: &BytesStart) -> Parameters {
        let mut params = Parameters::new();
        for attr in e.attributes().flatten() {
            let key = self.decode_tag(reader, attr.key.as_ref());
            if key.starts_with("xmlns") {
                continue;
            }

            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            params.insert(key, value);
        }
        params
    }
}

impl Default for XhtmlTreeParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(node: &Node) -> &Element {
        match node {
            Node::Element(element) => element,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_elements() {
        let root = XhtmlTreeParser::new()
            .parse("<p><strong>Bold</strong> text</p>")
            .unwrap();
        assert_eq!(root.tag, "root");

        let p = element(&root.children[0]);
        assert_eq!(p.tag, "p");
        assert_eq!(p.children.len(), 2);
        assert_eq!(element(&p.children[0]).text_content(), "Bold");
        assert_eq!(p.children[1], Node::Text(" text".to_owned()));
    }

    #[test]
    fn test_attributes_keep_order() {
        let root = XhtmlTreeParser::new()
            .parse(r#"<span class="a" data-x="1 &amp; 2"/>"#)
            .unwrap();
        let span = element(&root.children[0]);
        let params: Vec<_> = span.params.iter().collect();
        assert_eq!(params, vec![("class", "a"), ("data-x", "1 & 2")]);
    }

    #[test]
    fn test_comments_are_kept() {
        let root = XhtmlTreeParser::new()
            .parse("<!--startmacro:toc|-||-|--><!--stopmacro-->")
            .unwrap();
        assert_eq!(
            root.children,
            vec![
                Node::Comment("startmacro:toc|-||-|".to_owned()),
                Node::Comment("stopmacro".to_owned()),
            ]
        );
    }

    #[test]
    fn test_entities_merge_into_text() {
        let root = XhtmlTreeParser::new()
            .parse("<p>a&lt;b&nbsp;c&#33;</p>")
            .unwrap();
        let p = element(&root.children[0]);
        assert_eq!(p.children, vec![Node::Text("a<b\u{00a0}c!".to_owned())]);
    }

    #[test]
    fn test_empty_input() {
        let root = XhtmlTreeParser::new().parse("").unwrap();
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_mismatched_end_tag_fails() {
        assert!(XhtmlTreeParser::new().parse("<p>x</b>").is_err());
    }
}
