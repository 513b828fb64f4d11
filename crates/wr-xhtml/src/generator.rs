//! Translation of walker-level scanner events into structural [`Event`]s.

use wr_renderer::{Container, Event, Format, Listener, Parameters};

use crate::macro_info::MacroInfo;
use crate::metadata::MetadataDetector;

/// Event produced by the tree walker for the innermost scanner context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerEvent<'a> {
    BeginDocument(&'a Parameters),
    EndDocument,
    /// Inline container carrying only parameters.
    BeginFormat(&'a Parameters),
    EndFormat(&'a Parameters),
    BeginStyle(Format),
    EndStyle(Format),
    BeginParagraph(&'a Parameters),
    EndParagraph,
    BeginHeader(u8, &'a Parameters),
    EndHeader,
    BeginList { ordered: bool, params: &'a Parameters },
    EndList,
    BeginListItem(&'a Parameters),
    EndListItem,
    BeginQuotation(&'a Parameters),
    EndQuotation,
    BeginGroup(&'a Parameters),
    EndGroup,
    /// Raw XHTML text; whitespace is not yet collapsed.
    Text(&'a str),
    LineBreak,
    HorizontalLine(&'a Parameters),
    Verbatim { text: &'a str, inline: bool },
    Macro(&'a MacroInfo),
}

/// Receiver of scanner events.
pub trait ScannerContext {
    fn handle(&mut self, event: ScannerEvent<'_>);
}

/// Scanner context translating scanner events into [`Event`]s on a listener.
///
/// - XHTML whitespace collapses into single [`Event::Space`]s; whitespace at
///   the start of a line or before a block boundary is dropped
/// - ASCII punctuation becomes [`Event::SpecialSymbol`]
/// - metadata attributes and the metadata container class are stripped
/// - a document opened inside another document becomes a [`Container::Group`]
pub struct GeneratorListener<L> {
    listener: L,
    detector: MetadataDetector,
    /// Open containers with the parameters they were opened with.
    open: Vec<(Container, Parameters)>,
    pending_space: bool,
    at_line_start: bool,
}

impl<L: Listener> GeneratorListener<L> {
    pub fn new(listener: L, detector: MetadataDetector) -> Self {
        Self {
            listener,
            detector,
            open: Vec::new(),
            pending_space: false,
            at_line_start: true,
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Unwrap, returning the backing listener.
    pub fn into_listener(self) -> L {
        self.listener
    }

    fn document_open(&self) -> bool {
        self.open
            .iter()
            .any(|(container, _)| *container == Container::Document)
    }

    fn begin_block(&mut self, container: Container, params: &Parameters) {
        self.pending_space = false;
        self.at_line_start = true;
        self.open_container(container, params);
    }

    fn end_block(&mut self) {
        self.pending_space = false;
        self.at_line_start = true;
        self.close_container(None);
    }

    fn begin_inline(&mut self, container: Container, params: &Parameters) {
        self.flush_space();
        self.open_container(container, params);
    }

    fn open_container(&mut self, container: Container, params: &Parameters) {
        let params = self.detector.strip(params);
        self.listener
            .event(Event::Start(container, params.clone()));
        self.open.push((container, params));
    }

    /// Close the innermost container; `params` replaces the recorded ones.
    fn close_container(&mut self, params: Option<&Parameters>) {
        let Some((container, recorded)) = self.open.pop() else {
            tracing::warn!("Ignoring end event without open container");
            return;
        };
        let params = params.map_or(recorded, |params| self.detector.strip(params));
        self.listener.event(Event::End(container, params));
    }

    fn flush_space(&mut self) {
        if self.pending_space {
            self.listener.event(Event::Space);
            self.pending_space = false;
        }
        self.at_line_start = false;
    }

    fn text(&mut self, text: &str) {
        let mut word = String::new();
        for c in text.chars() {
            if c.is_whitespace() && c != '\u{00a0}' {
                self.flush_word(&mut word);
                if !self.at_line_start {
                    self.pending_space = true;
                }
            } else if c.is_ascii_punctuation() {
                self.flush_word(&mut word);
                self.flush_space();
                self.listener.event(Event::SpecialSymbol(c));
            } else {
                if word.is_empty() {
                    self.flush_space();
                }
                word.push(c);
            }
        }
        self.flush_word(&mut word);
    }

    fn flush_word(&mut self, word: &mut String) {
        if !word.is_empty() {
            self.listener.event(Event::Word(std::mem::take(word)));
        }
    }

    fn line_break(&mut self) {
        self.pending_space = false;
        self.at_line_start = true;
        self.listener.event(Event::NewLine);
    }

    fn standalone(&mut self, inline: bool, event: Event) {
        if inline {
            self.flush_space();
        } else {
            self.pending_space = false;
            self.at_line_start = true;
        }
        self.listener.event(event);
    }
}

impl<L: Listener> ScannerContext for GeneratorListener<L> {
    fn handle(&mut self, event: ScannerEvent<'_>) {
        match event {
            ScannerEvent::BeginDocument(params) => {
                let container = if self.document_open() {
                    Container::Group
                } else {
                    Container::Document
                };
                self.begin_block(container, params);
            }
            ScannerEvent::BeginGroup(params) => self.begin_block(Container::Group, params),
            ScannerEvent::BeginParagraph(params) => {
                self.begin_block(Container::Paragraph, params);
            }
            ScannerEvent::BeginHeader(level, params) => {
                self.begin_block(Container::Heading(level), params);
            }
            ScannerEvent::BeginList { ordered, params } => {
                self.begin_block(Container::List { ordered }, params);
            }
            ScannerEvent::BeginListItem(params) => self.begin_block(Container::ListItem, params),
            ScannerEvent::BeginQuotation(params) => {
                self.begin_block(Container::Quotation, params);
            }
            ScannerEvent::EndDocument
            | ScannerEvent::EndGroup
            | ScannerEvent::EndParagraph
            | ScannerEvent::EndHeader
            | ScannerEvent::EndList
            | ScannerEvent::EndListItem
            | ScannerEvent::EndQuotation => self.end_block(),
            ScannerEvent::BeginFormat(params) => {
                self.begin_inline(Container::Format(Format::None), params);
            }
            ScannerEvent::BeginStyle(format) => {
                self.begin_inline(Container::Format(format), &Parameters::new());
            }
            ScannerEvent::EndFormat(params) => self.close_container(Some(params)),
            ScannerEvent::EndStyle(_) => self.close_container(None),
            ScannerEvent::Text(text) => self.text(text),
            ScannerEvent::LineBreak => self.line_break(),
            ScannerEvent::HorizontalLine(params) => {
                let params = self.detector.strip(params);
                self.standalone(false, Event::HorizontalLine(params));
            }
            ScannerEvent::Verbatim { text, inline } => self.standalone(
                inline,
                Event::Verbatim {
                    text: text.to_owned(),
                    inline,
                },
            ),
            ScannerEvent::Macro(info) => self.standalone(
                info.is_inline(),
                Event::Macro {
                    id: info.id().to_owned(),
                    parameters: info.parameters().clone(),
                    content: info.content().map(str::to_owned),
                    inline: info.is_inline(),
                },
            ),
        }
    }
}
