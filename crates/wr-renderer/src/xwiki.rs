//! XWiki 2.1 backend.

use std::fmt::Write;

use crate::backend::SyntaxBackend;
use crate::event::{Format, Parameters};
use crate::printer::WikiPrinter;
use crate::syntax::Syntax;

/// XWiki 2.1 render backend.
///
/// - `**bold**`, `//italic//`, `__underline__`, `--strike--`, `##mono##`
/// - `= heading =`, `* item` / `1. item`, `> quote`, `----`
/// - `(% key="value" %)` for element parameters
/// - `{{macro key="value"}}content{{/macro}}`
pub struct XWikiBackend;

/// Write `key="value"` pairs separated by spaces, escaping quotes with `~`.
fn write_parameters(params: &Parameters, out: &mut WikiPrinter) {
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            out.print_char(' ');
        }
        write!(out, r#"{key}="{}""#, escape_parameter_value(value)).unwrap();
    }
}

fn escape_parameter_value(value: &str) -> String {
    value.replace('~', "~~").replace('"', "~\"")
}

fn format_marker(format: Format) -> &'static str {
    match format {
        Format::None => "",
        Format::Bold => "**",
        Format::Italic => "//",
        Format::Underlined => "__",
        Format::Strikedout => "--",
        Format::Monospace => "##",
        Format::Superscript => "^^",
        Format::Subscript => ",,",
    }
}

fn block_parameters(params: &Parameters, out: &mut WikiPrinter) {
    if !params.is_empty() {
        out.print("(% ");
        write_parameters(params, out);
        out.println(" %)");
    }
}

impl SyntaxBackend for XWikiBackend {
    fn syntax() -> Syntax {
        Syntax::XWIKI_2_1
    }

    fn new_line(quote_depth: usize, out: &mut WikiPrinter) {
        out.print_char('\n');
        if quote_depth > 0 {
            out.print(&">".repeat(quote_depth));
            out.print_char(' ');
        }
    }

    fn paragraph_start(params: &Parameters, out: &mut WikiPrinter) {
        block_parameters(params, out);
    }

    fn heading_start(level: u8, params: &Parameters, out: &mut WikiPrinter) {
        block_parameters(params, out);
        out.print(&"=".repeat(usize::from(level)));
        out.print_char(' ');
    }

    fn heading_end(level: u8, out: &mut WikiPrinter) {
        out.print_char(' ');
        out.print(&"=".repeat(usize::from(level)));
    }

    fn list_start(_ordered: bool, params: &Parameters, out: &mut WikiPrinter) {
        block_parameters(params, out);
    }

    fn list_item_start(ordered: bool, depth: usize, out: &mut WikiPrinter) {
        if ordered {
            out.print(&"1".repeat(depth));
            out.print(". ");
        } else {
            out.print(&"*".repeat(depth));
            out.print_char(' ');
        }
    }

    fn quotation_start(depth: usize, out: &mut WikiPrinter) {
        out.print(&">".repeat(depth));
        out.print_char(' ');
    }

    fn group_start(params: &Parameters, out: &mut WikiPrinter) {
        block_parameters(params, out);
        out.println("(((");
    }

    fn group_end(out: &mut WikiPrinter) {
        out.print("\n)))");
    }

    fn format_start(format: Format, params: &Parameters, out: &mut WikiPrinter) {
        if !params.is_empty() {
            out.print("(% ");
            write_parameters(params, out);
            out.print(" %)");
        }
        out.print(format_marker(format));
    }

    fn format_end(format: Format, params: &Parameters, out: &mut WikiPrinter) {
        out.print(format_marker(format));
        if !params.is_empty() {
            out.print("(%%)");
        }
    }

    fn horizontal_line(params: &Parameters, out: &mut WikiPrinter) {
        block_parameters(params, out);
        out.print("----");
    }

    fn verbatim(text: &str, _inline: bool, out: &mut WikiPrinter) {
        write!(out, "{{{{{{{text}}}}}}}").unwrap();
    }

    fn macro_call(
        id: &str,
        params: &Parameters,
        content: Option<&str>,
        _inline: bool,
        out: &mut WikiPrinter,
    ) {
        out.print("{{");
        out.print(id);
        if !params.is_empty() {
            out.print_char(' ');
            write_parameters(params, out);
        }
        match content {
            Some(content) => write!(out, "}}}}{content}{{{{/{id}}}}}").unwrap(),
            None => out.print("/}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextRenderer;
    use crate::event::{Container, Event};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_macro_with_content_and_parameters() {
        let mut out = WikiPrinter::new();
        let params = Parameters::new().with("title", r#"say "hi""#);
        XWikiBackend::macro_call("info", &params, Some("body"), false, &mut out);
        assert_eq!(out.as_str(), r#"{{info title="say ~"hi~""}}body{{/info}}"#);
    }

    #[test]
    fn test_macro_without_content() {
        let mut out = WikiPrinter::new();
        XWikiBackend::macro_call("toc", &Parameters::new(), None, true, &mut out);
        assert_eq!(out.as_str(), "{{toc/}}");
    }

    #[test]
    fn test_verbatim() {
        let mut out = WikiPrinter::new();
        XWikiBackend::verbatim("**not bold**", true, &mut out);
        assert_eq!(out.as_str(), "{{{**not bold**}}}");
    }

    #[test]
    fn test_format_with_parameters() {
        let events = vec![
            Event::Start(
                Container::Format(Format::None),
                Parameters::new().with("class", "red"),
            ),
            Event::word("x"),
            Event::End(
                Container::Format(Format::None),
                Parameters::new().with("class", "red"),
            ),
        ];
        let text = TextRenderer::<XWikiBackend>::new().render(events);
        assert_eq!(text, r#"(% class="red" %)x(%%)"#);
    }

    #[test]
    fn test_heading_and_quotation() {
        let events = vec![
            Event::start(Container::Document),
            Event::start(Container::Heading(2)),
            Event::word("Title"),
            Event::end(Container::Heading(2)),
            Event::start(Container::Quotation),
            Event::word("a"),
            Event::NewLine,
            Event::word("b"),
            Event::end(Container::Quotation),
            Event::end(Container::Document),
        ];
        let text = TextRenderer::<XWikiBackend>::new().render(events);
        assert_eq!(text, "== Title ==\n\n> a\n> b");
    }
}
