//! Generic text renderer with pluggable syntax backend.

use std::marker::PhantomData;

use crate::backend::SyntaxBackend;
use crate::event::{Container, Event, Parameters};
use crate::listener::Listener;
use crate::printer::WikiPrinter;
use crate::syntax::Syntax;

/// Listener that prints the events it receives as text of one syntax.
///
/// The text goes to the [`WikiPrinter`] bound with
/// [`set_printer`](Self::set_printer).
pub trait PrintRenderer: Listener {
    /// Syntax this renderer produces.
    fn syntax(&self) -> Syntax;

    /// Bind a printer, discarding the previous one and any rendering state.
    fn set_printer(&mut self, printer: WikiPrinter);

    fn printer(&self) -> &WikiPrinter;

    /// Take the bound printer, leaving an empty one in its place.
    fn take_printer(&mut self) -> WikiPrinter;
}

/// Generic renderer delegating syntax-specific markup to a [`SyntaxBackend`].
///
/// Handles block separation, list nesting and quotation depth generically.
pub struct TextRenderer<B: SyntaxBackend> {
    printer: WikiPrinter,
    /// Open containers, innermost last.
    containers: Vec<Container>,
    /// Blocks written so far at each block-holding level; index 0 is the root.
    block_counts: Vec<usize>,
    /// Ordered flag of each open list.
    list_stack: Vec<bool>,
    quote_depth: usize,
    _backend: PhantomData<B>,
}

impl<B: SyntaxBackend> TextRenderer<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            printer: WikiPrinter::new(),
            containers: Vec::new(),
            block_counts: vec![0],
            list_stack: Vec::new(),
            quote_depth: 0,
            _backend: PhantomData,
        }
    }

    /// Render a sequence of events and return the text.
    pub fn render<I>(mut self, events: I) -> String
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.event(event);
        }
        self.printer.into_string()
    }

    fn reset(&mut self) {
        self.containers.clear();
        self.block_counts = vec![0];
        self.list_stack.clear();
        self.quote_depth = 0;
    }

    /// Whether a new block at this position is a sibling of earlier blocks.
    fn holds_blocks(&self) -> bool {
        matches!(
            self.containers.last(),
            None | Some(Container::Document | Container::Group | Container::Quotation)
        )
    }

    /// Write the separator before a block if it follows a sibling.
    fn begin_block(&mut self) {
        if !self.holds_blocks() {
            return;
        }
        let Some(count) = self.block_counts.last_mut() else {
            return;
        };
        if *count > 0 {
            if self.quote_depth > 0 {
                B::new_line(self.quote_depth, &mut self.printer);
            } else {
                self.printer.print(B::BLOCK_SEPARATOR);
            }
        }
        *count += 1;
    }

    fn ensure_line_start(&mut self) {
        if B::LINE_ORIENTED && self.printer.last_char().is_some_and(|c| c != '\n') {
            B::new_line(self.quote_depth, &mut self.printer);
        }
    }

    fn start(&mut self, container: Container, params: &Parameters) {
        match container {
            Container::Document => {}
            Container::Group => {
                self.begin_block();
                B::group_start(params, &mut self.printer);
            }
            Container::Paragraph => {
                self.begin_block();
                B::paragraph_start(params, &mut self.printer);
            }
            Container::Heading(level) => {
                self.begin_block();
                B::heading_start(level, params, &mut self.printer);
            }
            Container::List { ordered } => {
                self.begin_block();
                B::list_start(ordered, params, &mut self.printer);
                self.list_stack.push(ordered);
            }
            Container::ListItem => {
                self.ensure_line_start();
                let ordered = self.list_stack.last().copied().unwrap_or(false);
                B::list_item_start(ordered, self.list_stack.len().max(1), &mut self.printer);
            }
            Container::Quotation => {
                self.begin_block();
                self.quote_depth += 1;
                B::quotation_start(self.quote_depth, &mut self.printer);
            }
            Container::Format(format) => B::format_start(format, params, &mut self.printer),
        }

        if matches!(
            container,
            Container::Document | Container::Group | Container::Quotation
        ) {
            self.block_counts.push(0);
        }
        self.containers.push(container);
    }

    fn end(&mut self, container: Container, params: &Parameters) {
        self.containers.pop();
        if matches!(
            container,
            Container::Document | Container::Group | Container::Quotation
        ) && self.block_counts.len() > 1
        {
            self.block_counts.pop();
        }

        match container {
            Container::Document => {}
            Container::Group => B::group_end(&mut self.printer),
            Container::Paragraph => B::paragraph_end(&mut self.printer),
            Container::Heading(level) => B::heading_end(level, &mut self.printer),
            Container::List { ordered } => {
                self.list_stack.pop();
                B::list_end(ordered, &mut self.printer);
            }
            Container::ListItem => B::list_item_end(&mut self.printer),
            Container::Quotation => {
                B::quotation_end(&mut self.printer);
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Container::Format(format) => B::format_end(format, params, &mut self.printer),
        }
    }
}

impl<B: SyntaxBackend> Default for TextRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SyntaxBackend> Listener for TextRenderer<B> {
    fn event(&mut self, event: Event) {
        match event {
            Event::Start(container, params) => self.start(container, &params),
            Event::End(container, params) => self.end(container, &params),
            Event::Word(word) => self.printer.print(&B::escape_word(&word)),
            Event::Space => self.printer.print_char(' '),
            Event::SpecialSymbol(symbol) => B::special_symbol(symbol, &mut self.printer),
            Event::NewLine => B::new_line(self.quote_depth, &mut self.printer),
            Event::HorizontalLine(params) => {
                self.begin_block();
                B::horizontal_line(&params, &mut self.printer);
            }
            Event::EmptyLines(count) => {
                if B::LINE_ORIENTED {
                    for _ in 0..count {
                        self.printer.print_char('\n');
                    }
                }
            }
            Event::Verbatim { text, inline } => {
                if !inline {
                    self.begin_block();
                }
                B::verbatim(&text, inline, &mut self.printer);
            }
            Event::Macro {
                id,
                parameters,
                content,
                inline,
            } => {
                if !inline {
                    self.begin_block();
                }
                B::macro_call(
                    &id,
                    &parameters,
                    content.as_deref(),
                    inline,
                    &mut self.printer,
                );
            }
        }
    }
}

impl<B: SyntaxBackend> PrintRenderer for TextRenderer<B> {
    fn syntax(&self) -> Syntax {
        B::syntax()
    }

    fn set_printer(&mut self, printer: WikiPrinter) {
        self.printer = printer;
        self.reset();
    }

    fn printer(&self) -> &WikiPrinter {
        &self.printer
    }

    fn take_printer(&mut self) -> WikiPrinter {
        std::mem::take(&mut self.printer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XWikiBackend;
    use crate::event::Format;
    use pretty_assertions::assert_eq;

    fn paragraph(words: &[&str]) -> Vec<Event> {
        let mut events = vec![Event::start(Container::Paragraph)];
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                events.push(Event::Space);
            }
            events.push(Event::word(*word));
        }
        events.push(Event::end(Container::Paragraph));
        events
    }

    #[test]
    fn test_sibling_blocks_are_separated() {
        let mut events = vec![Event::start(Container::Document)];
        events.extend(paragraph(&["a", "b"]));
        events.extend(paragraph(&["c"]));
        events.push(Event::end(Container::Document));

        let text = TextRenderer::<XWikiBackend>::new().render(events);
        assert_eq!(text, "a b\n\nc");
    }

    #[test]
    fn test_nested_list_items_start_on_new_lines() {
        let list = Container::List { ordered: false };
        let events = vec![
            Event::start(list),
            Event::start(Container::ListItem),
            Event::word("a"),
            Event::start(list),
            Event::start(Container::ListItem),
            Event::word("b"),
            Event::end(Container::ListItem),
            Event::end(list),
            Event::end(Container::ListItem),
            Event::start(Container::ListItem),
            Event::word("c"),
            Event::end(Container::ListItem),
            Event::end(list),
        ];

        let text = TextRenderer::<XWikiBackend>::new().render(events);
        assert_eq!(text, "* a\n** b\n* c");
    }

    #[test]
    fn test_inline_content_has_no_separator() {
        let bold = Container::Format(Format::Bold);
        let events = vec![
            Event::word("x"),
            Event::start(bold),
            Event::word("y"),
            Event::end(bold),
        ];
        let text = TextRenderer::<XWikiBackend>::new().render(events);
        assert_eq!(text, "x**y**");
    }

    #[test]
    fn test_set_printer_resets_output() {
        let mut renderer = TextRenderer::<XWikiBackend>::new();
        renderer.event(Event::word("old"));
        renderer.set_printer(WikiPrinter::new());
        renderer.event(Event::word("new"));
        assert_eq!(renderer.take_printer().as_str(), "new");
        assert!(renderer.printer().is_empty());
    }
}
