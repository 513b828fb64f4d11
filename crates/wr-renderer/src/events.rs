//! Event trace renderer.

use std::fmt::Write;

use crate::event::{Container, Event, Parameters};
use crate::listener::Listener;
use crate::printer::WikiPrinter;
use crate::renderer::PrintRenderer;
use crate::syntax::Syntax;

/// Prints one line per event, e.g. `beginFormat [BOLD]` or `onWord [text]`.
#[derive(Default)]
pub struct EventsRenderer {
    printer: WikiPrinter,
}

impl EventsRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        self.printer.write_fmt(args).unwrap();
        self.printer.print_char('\n');
    }
}

fn container_name(container: Container) -> String {
    match container {
        Container::Document => "Document".to_owned(),
        Container::Group => "Group".to_owned(),
        Container::Paragraph => "Paragraph".to_owned(),
        Container::Heading(level) => format!("Header [{level}]"),
        Container::List { ordered: true } => "List [NUMBERED]".to_owned(),
        Container::List { ordered: false } => "List [BULLETED]".to_owned(),
        Container::ListItem => "ListItem".to_owned(),
        Container::Quotation => "Quotation".to_owned(),
        Container::Format(format) => format!("Format [{}]", format.name()),
    }
}

fn parameters(params: &Parameters) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut out = String::from(" [");
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push_str("][");
        }
        write!(out, "{key}={value}").unwrap();
    }
    out.push(']');
    out
}

impl Listener for EventsRenderer {
    fn event(&mut self, event: Event) {
        match event {
            Event::Start(container, params) => self.line(format_args!(
                "begin{}{}",
                container_name(container),
                parameters(&params)
            )),
            Event::End(container, params) => self.line(format_args!(
                "end{}{}",
                container_name(container),
                parameters(&params)
            )),
            Event::Word(word) => self.line(format_args!("onWord [{word}]")),
            Event::Space => self.line(format_args!("onSpace")),
            Event::SpecialSymbol(symbol) => self.line(format_args!("onSpecialSymbol [{symbol}]")),
            Event::NewLine => self.line(format_args!("onNewLine")),
            Event::HorizontalLine(params) => {
                self.line(format_args!("onHorizontalLine{}", parameters(&params)));
            }
            Event::EmptyLines(count) => self.line(format_args!("onEmptyLines [{count}]")),
            Event::Verbatim { text, inline } => {
                let kind = if inline { "Inline" } else { "Standalone" };
                self.line(format_args!("onVerbatim{kind} [{text}]"));
            }
            Event::Macro {
                id,
                parameters: params,
                content,
                inline,
            } => {
                let kind = if inline { "Inline" } else { "Standalone" };
                self.line(format_args!(
                    "onMacro{kind} [{id}]{} [{}]",
                    parameters(&params),
                    content.unwrap_or_default()
                ));
            }
        }
    }
}

impl PrintRenderer for EventsRenderer {
    fn syntax(&self) -> Syntax {
        Syntax::EVENT_1_0
    }

    fn set_printer(&mut self, printer: WikiPrinter) {
        self.printer = printer;
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
    use crate::event::Format;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_lines() {
        let mut renderer = EventsRenderer::new();
        renderer.event(Event::Start(
            Container::Format(Format::Bold),
            Parameters::new().with("class", "x"),
        ));
        renderer.event(Event::word("a"));
        renderer.event(Event::Macro {
            id: "toc".to_owned(),
            parameters: Parameters::new(),
            content: None,
            inline: true,
        });
        assert_eq!(
            renderer.printer().as_str(),
            "beginFormat [BOLD] [class=x]\nonWord [a]\nonMacroInline [toc] []\n"
        );
    }
}
