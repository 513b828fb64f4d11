//! Syntax backend trait for the generic text renderer.

use std::borrow::Cow;

use crate::event::{Format, Parameters};
use crate::printer::WikiPrinter;
use crate::syntax::Syntax;

/// Syntax-specific output for [`TextRenderer`](crate::TextRenderer).
///
/// The generic renderer tracks nesting, block separation and list depth;
/// backends only decide what markup each construct turns into.
pub trait SyntaxBackend {
    /// Syntax this backend produces.
    fn syntax() -> Syntax;

    /// Text written between two sibling blocks at document level.
    const BLOCK_SEPARATOR: &'static str = "\n\n";

    /// Whether list items and verbatim blocks start on a fresh line.
    const LINE_ORIENTED: bool = true;

    /// Escape a word for this syntax.
    fn escape_word(word: &str) -> Cow<'_, str> {
        Cow::Borrowed(word)
    }

    fn special_symbol(symbol: char, out: &mut WikiPrinter) {
        out.print_char(symbol);
    }

    /// Line break, continuing `quote_depth` levels of quotation.
    fn new_line(quote_depth: usize, out: &mut WikiPrinter);

    fn paragraph_start(_params: &Parameters, _out: &mut WikiPrinter) {}

    fn paragraph_end(_out: &mut WikiPrinter) {}

    fn heading_start(level: u8, params: &Parameters, out: &mut WikiPrinter);

    fn heading_end(level: u8, out: &mut WikiPrinter);

    fn list_start(_ordered: bool, _params: &Parameters, _out: &mut WikiPrinter) {}

    fn list_end(_ordered: bool, _out: &mut WikiPrinter) {}

    /// Item marker; `depth` is 1 for a top-level list.
    fn list_item_start(ordered: bool, depth: usize, out: &mut WikiPrinter);

    fn list_item_end(_out: &mut WikiPrinter) {}

    fn quotation_start(depth: usize, out: &mut WikiPrinter);

    fn quotation_end(_out: &mut WikiPrinter) {}

    fn group_start(_params: &Parameters, _out: &mut WikiPrinter) {}

    fn group_end(_out: &mut WikiPrinter) {}

    fn format_start(format: Format, params: &Parameters, out: &mut WikiPrinter);

    fn format_end(format: Format, params: &Parameters, out: &mut WikiPrinter);

    fn horizontal_line(params: &Parameters, out: &mut WikiPrinter);

    fn verbatim(text: &str, inline: bool, out: &mut WikiPrinter);

    fn macro_call(
        id: &str,
        params: &Parameters,
        content: Option<&str>,
        inline: bool,
        out: &mut WikiPrinter,
    );
}
