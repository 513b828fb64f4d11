//! Markdown 1.2 backend.

use std::fmt::Write;

use crate::backend::SyntaxBackend;
use crate::event::{Format, Parameters};
use crate::printer::WikiPrinter;
use crate::syntax::Syntax;

/// Markdown render backend.
///
/// Element parameters have no Markdown equivalent and are dropped. Macros
/// are written in XWiki macro notation so they survive a round trip.
pub struct MarkdownBackend;

fn format_marker(format: Format) -> &'static str {
    match format {
        Format::None | Format::Underlined => "",
        Format::Bold => "**",
        Format::Italic => "*",
        Format::Strikedout => "~~",
        Format::Monospace => "`",
        Format::Superscript => "^",
        Format::Subscript => "~",
    }
}

impl SyntaxBackend for MarkdownBackend {
    fn syntax() -> Syntax {
        Syntax::MARKDOWN_1_2
    }

    fn new_line(quote_depth: usize, out: &mut WikiPrinter) {
        out.print_char('\n');
        for _ in 0..quote_depth {
            out.print("> ");
        }
    }

    fn heading_start(level: u8, _params: &Parameters, out: &mut WikiPrinter) {
        out.print(&"#".repeat(usize::from(level)));
        out.print_char(' ');
    }

    fn heading_end(_level: u8, _out: &mut WikiPrinter) {}

    fn list_item_start(ordered: bool, depth: usize, out: &mut WikiPrinter) {
        let indent = if ordered { "   " } else { "  " };
        out.print(&indent.repeat(depth.saturating_sub(1)));
        out.print(if ordered { "1. " } else { "- " });
    }

    fn quotation_start(_depth: usize, out: &mut WikiPrinter) {
        out.print("> ");
    }

    fn format_start(format: Format, _params: &Parameters, out: &mut WikiPrinter) {
        out.print(format_marker(format));
    }

    fn format_end(format: Format, _params: &Parameters, out: &mut WikiPrinter) {
        out.print(format_marker(format));
    }

    fn horizontal_line(_params: &Parameters, out: &mut WikiPrinter) {
        out.print("---");
    }

    fn verbatim(text: &str, inline: bool, out: &mut WikiPrinter) {
        if inline {
            write!(out, "`{text}`").unwrap();
        } else {
            write!(out, "```\n{text}\n```").unwrap();
        }
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
        for (key, value) in params.iter() {
            write!(out, r#" {key}="{value}""#).unwrap();
        }
        match content {
            Some(content) => write!(out, "}}}}{content}{{{{/{id}}}}}").unwrap(),
            None => out.print("/}}"),
        }
    }
}
