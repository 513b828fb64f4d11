//! XHTML backend.
//!
//! Produces XHTML 1.0 markup, one element per structural container.

use std::borrow::Cow;
use std::fmt::Write;

use crate::backend::SyntaxBackend;
use crate::event::{Format, Parameters};
use crate::printer::WikiPrinter;
use crate::syntax::Syntax;

/// XHTML render backend.
///
/// Produces:
/// - `<p>`, `<h1>`..`<h6>`, `<ul>`/`<ol>`/`<li>`, `<blockquote>`, `<div>`
/// - `<strong>`, `<em>`, `<ins>`, `<del>`, `<tt>`, `<sup>`, `<sub>`, `<span>`
/// - `<pre>` / `<tt class="wikimodel-verbatim">` for verbatim text
/// - macro markers as `startmacro`/`stopmacro` comments
pub struct XhtmlBackend;

/// Escape special characters for XHTML text and attribute values.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn open_tag(tag: &str, params: &Parameters, out: &mut WikiPrinter) {
    out.print_char('<');
    out.print(tag);
    for (key, value) in params.iter() {
        write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
    }
    out.print_char('>');
}

fn format_tag(format: Format) -> &'static str {
    match format {
        Format::None => "span",
        Format::Bold => "strong",
        Format::Italic => "em",
        Format::Underlined => "ins",
        Format::Strikedout => "del",
        Format::Monospace => "tt",
        Format::Superscript => "sup",
        Format::Subscript => "sub",
    }
}

/// Escape `--` sequences that would terminate a comment early.
fn escape_comment(s: &str) -> String {
    s.replace("--", "-\\-")
}

impl SyntaxBackend for XhtmlBackend {
    const BLOCK_SEPARATOR: &'static str = "";
    const LINE_ORIENTED: bool = false;

    fn syntax() -> Syntax {
        Syntax::XHTML_1_0
    }

    fn escape_word(word: &str) -> Cow<'_, str> {
        escape_html(word)
    }

    fn special_symbol(symbol: char, out: &mut WikiPrinter) {
        let mut buf = [0; 4];
        out.print(&escape_html(symbol.encode_utf8(&mut buf)));
    }

    fn new_line(_quote_depth: usize, out: &mut WikiPrinter) {
        out.print("<br/>");
    }

    fn paragraph_start(params: &Parameters, out: &mut WikiPrinter) {
        open_tag("p", params, out);
    }

    fn paragraph_end(out: &mut WikiPrinter) {
        out.print("</p>");
    }

    fn heading_start(level: u8, params: &Parameters, out: &mut WikiPrinter) {
        open_tag(&format!("h{level}"), params, out);
    }

    fn heading_end(level: u8, out: &mut WikiPrinter) {
        write!(out, "</h{level}>").unwrap();
    }

    fn list_start(ordered: bool, params: &Parameters, out: &mut WikiPrinter) {
        open_tag(if ordered { "ol" } else { "ul" }, params, out);
    }

    fn list_end(ordered: bool, out: &mut WikiPrinter) {
        out.print(if ordered { "</ol>" } else { "</ul>" });
    }

    fn list_item_start(_ordered: bool, _depth: usize, out: &mut WikiPrinter) {
        out.print("<li>");
    }

    fn list_item_end(out: &mut WikiPrinter) {
        out.print("</li>");
    }

    fn quotation_start(_depth: usize, out: &mut WikiPrinter) {
        out.print("<blockquote>");
    }

    fn quotation_end(out: &mut WikiPrinter) {
        out.print("</blockquote>");
    }

    fn group_start(params: &Parameters, out: &mut WikiPrinter) {
        open_tag("div", params, out);
    }

    fn group_end(out: &mut WikiPrinter) {
        out.print("</div>");
    }

    fn format_start(format: Format, params: &Parameters, out: &mut WikiPrinter) {
        if format == Format::None && params.is_empty() {
            return;
        }
        open_tag(format_tag(format), params, out);
    }

    fn format_end(format: Format, params: &Parameters, out: &mut WikiPrinter) {
        if format == Format::None && params.is_empty() {
            return;
        }
        write!(out, "</{}>", format_tag(format)).unwrap();
    }

    fn horizontal_line(params: &Parameters, out: &mut WikiPrinter) {
        out.print("<hr");
        for (key, value) in params.iter() {
            write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
        }
        out.print("/>");
    }

    fn verbatim(text: &str, inline: bool, out: &mut WikiPrinter) {
        if inline {
            write!(
                out,
                r#"<tt class="wikimodel-verbatim">{}</tt>"#,
                escape_html(text)
            )
            .unwrap();
        } else {
            write!(out, "<pre>{}</pre>", escape_html(text)).unwrap();
        }
    }

    fn macro_call(
        id: &str,
        params: &Parameters,
        content: Option<&str>,
        _inline: bool,
        out: &mut WikiPrinter,
    ) {
        write!(out, "<!--startmacro:{}|-|", escape_comment(id)).unwrap();
        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                out.print_char(' ');
            }
            write!(
                out,
                r#"{key}="{}""#,
                escape_comment(&value.replace('"', "\\\""))
            )
            .unwrap();
        }
        out.print("|-|");
        if let Some(content) = content {
            out.print(&escape_comment(content));
        }
        out.print("--><!--stopmacro-->");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextRenderer;
    use crate::event::{Container, Event};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_paragraph_with_format() {
        let bold = Container::Format(Format::Bold);
        let events = vec![
            Event::start(Container::Document),
            Event::Start(Container::Paragraph, Parameters::new().with("class", "x")),
            Event::start(bold),
            Event::word("a&b"),
            Event::end(bold),
            Event::end(Container::Paragraph),
            Event::start(Container::Paragraph),
            Event::word("c"),
            Event::end(Container::Paragraph),
            Event::end(Container::Document),
        ];
        let text = TextRenderer::<XhtmlBackend>::new().render(events);
        assert_eq!(
            text,
            r#"<p class="x"><strong>a&amp;b</strong></p><p>c</p>"#
        );
    }

    #[test]
    fn test_macro_marker() {
        let mut out = WikiPrinter::new();
        let params = Parameters::new().with("a", "1");
        XhtmlBackend::macro_call("code", &params, Some("x"), false, &mut out);
        assert_eq!(
            out.as_str(),
            r#"<!--startmacro:code|-|a="1"|-|x--><!--stopmacro-->"#
        );
    }
}
