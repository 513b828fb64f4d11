//! Plain text backend.

use crate::backend::SyntaxBackend;
use crate::event::{Format, Parameters};
use crate::printer::WikiPrinter;
use crate::syntax::Syntax;

/// Plain text render backend: text only, all markup dropped.
pub struct PlainTextBackend;

impl SyntaxBackend for PlainTextBackend {
    fn syntax() -> Syntax {
        Syntax::PLAIN_1_0
    }

    fn new_line(_quote_depth: usize, out: &mut WikiPrinter) {
        out.print_char('\n');
    }

    fn heading_start(_level: u8, _params: &Parameters, _out: &mut WikiPrinter) {}

    fn heading_end(_level: u8, _out: &mut WikiPrinter) {}

    fn list_item_start(_ordered: bool, _depth: usize, _out: &mut WikiPrinter) {}

    fn quotation_start(_depth: usize, _out: &mut WikiPrinter) {}

    fn format_start(_format: Format, _params: &Parameters, _out: &mut WikiPrinter) {}

    fn format_end(_format: Format, _params: &Parameters, _out: &mut WikiPrinter) {}

    fn horizontal_line(_params: &Parameters, _out: &mut WikiPrinter) {}

    fn verbatim(text: &str, _inline: bool, out: &mut WikiPrinter) {
        out.print(text);
    }

    fn macro_call(
        _id: &str,
        _params: &Parameters,
        content: Option<&str>,
        _inline: bool,
        out: &mut WikiPrinter,
    ) {
        if let Some(content) = content {
            out.print(content);
        }
    }
}
