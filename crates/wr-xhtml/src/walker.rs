//! XHTML to wiki event conversion.

use wr_config::Config;
use wr_renderer::{Format, Listener, Parameters, RendererFactory, Syntax};

use crate::error::{ParseWarning, XhtmlError};
use crate::generator::{GeneratorListener, ScannerEvent};
use crate::macro_handler::MacroHandler;
use crate::macro_info::MacroMarker;
use crate::metadata::MetadataDetector;
use crate::parser::XhtmlTreeParser;
use crate::resolver::{SyntaxProvider, SyntaxResolver};
use crate::stack::TagStack;
use crate::tree::{Element, Node};

/// Outcome of a successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Recoverable problems, in document order.
    pub warnings: Vec<ParseWarning>,
}

/// Parser converting XHTML into structural wiki events.
///
/// Metadata elements (see [`MetadataDetector`]) may switch the target syntax
/// of their subtree and mark it as unchanged content, in which case it is
/// rendered back to text in that syntax and attached to the enclosing macro
/// call.
///
/// # Example
///
/// ```
/// use wr_renderer::{Event, RendererRegistry};
/// use wr_xhtml::{StaticSyntaxProvider, XhtmlParser};
///
/// let registry = RendererRegistry::with_builtin();
/// let provider = StaticSyntaxProvider::default();
/// let parser = XhtmlParser::new(&registry, &provider);
///
/// let mut events: Vec<Event> = Vec::new();
/// let result = parser.parse("<p>Hello</p>", &mut events).unwrap();
/// assert!(result.warnings.is_empty());
/// assert!(events.contains(&Event::word("Hello")));
/// ```
pub struct XhtmlParser<'a> {
    factory: &'a dyn RendererFactory,
    provider: &'a dyn SyntaxProvider,
    syntax: Syntax,
    detector: MetadataDetector,
}

impl<'a> XhtmlParser<'a> {
    #[must_use]
    pub fn new(factory: &'a dyn RendererFactory, provider: &'a dyn SyntaxProvider) -> Self {
        Self {
            factory,
            provider,
            syntax: Syntax::XHTML_1_0,
            detector: MetadataDetector::default(),
        }
    }

    /// Apply the parser's own syntax and metadata markers from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.syntax = config.parser_resolved.default_syntax.clone();
        self.detector = MetadataDetector::from_config(&config.metadata);
        self
    }

    /// The parser's own syntax, used when nothing else sets a target.
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Parse an XHTML fragment, sending events to `listener`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not well-formed XML or a metadata
    /// element breaks stack discipline.
    pub fn parse(
        &self,
        xhtml: &str,
        listener: &mut dyn Listener,
    ) -> Result<ParseResult, XhtmlError> {
        let root = XhtmlTreeParser::new().parse(xhtml)?;

        let mut walker = Walker {
            stack: TagStack::new(GeneratorListener::new(listener, self.detector.clone())),
            handler: MacroHandler::new(
                self.factory,
                SyntaxResolver::new(self.provider, self.syntax.clone()),
                self.detector.clone(),
            ),
            warnings: Vec::new(),
        };

        let empty = Parameters::new();
        walker.stack.emit(ScannerEvent::BeginDocument(&empty));
        walker.nodes(&root.children)?;
        walker.close_macros()?;
        walker.stack.emit(ScannerEvent::EndDocument);

        Ok(ParseResult {
            warnings: walker.warnings,
        })
    }
}

/// How an element maps to scanner events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Paragraph,
    Header(u8),
    List { ordered: bool },
    ListItem,
    Quotation,
    Group,
    Format,
    Style(Format),
    LineBreak,
    HorizontalLine,
    Preformatted,
    Transparent,
}

impl Tag {
    fn classify(name: &str) -> Self {
        match name {
            "p" => Self::Paragraph,
            "ul" => Self::List { ordered: false },
            "ol" => Self::List { ordered: true },
            "li" => Self::ListItem,
            "blockquote" => Self::Quotation,
            "div" => Self::Group,
            "span" => Self::Format,
            "strong" | "b" => Self::Style(Format::Bold),
            "em" | "i" => Self::Style(Format::Italic),
            "u" | "ins" => Self::Style(Format::Underlined),
            "del" | "s" | "strike" => Self::Style(Format::Strikedout),
            "tt" | "code" => Self::Style(Format::Monospace),
            "sup" => Self::Style(Format::Superscript),
            "sub" => Self::Style(Format::Subscript),
            "br" => Self::LineBreak,
            "hr" => Self::HorizontalLine,
            "pre" => Self::Preformatted,
            _ => name
                .strip_prefix('h')
                .and_then(|level| level.parse::<u8>().ok())
                .filter(|level| (1..=6).contains(level))
                .map_or(Self::Transparent, Self::Header),
        }
    }

    /// Elements whose content may only be inline.
    fn is_inline_only(self) -> bool {
        matches!(self, Self::Paragraph | Self::Header(_) | Self::ListItem)
    }

    /// Elements consulting the metadata handler.
    fn is_handled(self) -> bool {
        matches!(self, Self::Group | Self::Format)
    }
}

/// State of one parse.
struct Walker<'h, L> {
    stack: TagStack<L>,
    handler: MacroHandler<'h>,
    warnings: Vec<ParseWarning>,
}

impl<L: Listener> Walker<'_, L> {
    fn nodes(&mut self, nodes: &[Node]) -> Result<(), XhtmlError> {
        for node in nodes {
            match node {
                Node::Element(element) => self.element(element)?,
                Node::Text(text) => self.stack.emit(ScannerEvent::Text(text)),
                Node::Comment(comment) => self.comment(comment)?,
            }
        }
        Ok(())
    }

    fn element(&mut self, element: &Element) -> Result<(), XhtmlError> {
        let tag = Tag::classify(&element.local_name());
        let params = &element.params;

        match tag {
            Tag::LineBreak => {
                self.stack.emit(ScannerEvent::LineBreak);
                return Ok(());
            }
            Tag::HorizontalLine => {
                self.stack.emit(ScannerEvent::HorizontalLine(params));
                return Ok(());
            }
            Tag::Preformatted => {
                let text = element.text_content();
                let inline = self.stack.is_inside_block_element();
                self.stack
                    .emit(ScannerEvent::Verbatim { text: &text, inline });
                return Ok(());
            }
            _ => {}
        }

        let consumed = tag.is_handled() && self.begin_handled(params);
        if !consumed {
            self.begin(tag, params);
        }

        self.stack.enter_element(tag.is_inline_only());
        self.nodes(&element.children)?;
        self.stack.leave_element()?;

        let end_consumed =
            tag.is_handled() && self.handler.handle_end(&mut self.stack, params)?;
        // The end event pairs with the begin event; a macro marker among the
        // children can flip the handler's answer between the two calls.
        if !consumed && !end_consumed {
            self.end(tag, params);
        }
        Ok(())
    }

    fn begin_handled(&mut self, params: &Parameters) -> bool {
        let captures = self.stack.capture_depth();
        let consumed = self.handler.handle_begin(&mut self.stack, params);
        if self.stack.capture_depth() > captures
            && let Some(pipeline) = self.stack.capture()
        {
            tracing::debug!(
                syntax = %pipeline.syntax(),
                inline = pipeline.is_inline(),
                "Capturing unchanged content"
            );
        }
        for warning in self.handler.take_warnings() {
            tracing::warn!(%warning, "Unchanged content not captured");
            self.warnings.push(warning.into());
        }
        consumed
    }

    fn begin(&mut self, tag: Tag, params: &Parameters) {
        let event = match tag {
            Tag::Paragraph => ScannerEvent::BeginParagraph(params),
            Tag::Header(level) => ScannerEvent::BeginHeader(level, params),
            Tag::List { ordered } => ScannerEvent::BeginList { ordered, params },
            Tag::ListItem => ScannerEvent::BeginListItem(params),
            Tag::Quotation => ScannerEvent::BeginQuotation(params),
            Tag::Group => ScannerEvent::BeginGroup(params),
            Tag::Format => ScannerEvent::BeginFormat(params),
            Tag::Style(format) => ScannerEvent::BeginStyle(format),
            Tag::LineBreak | Tag::HorizontalLine | Tag::Preformatted | Tag::Transparent => {
                return;
            }
        };
        self.stack.emit(event);
    }

    fn end(&mut self, tag: Tag, params: &Parameters) {
        let event = match tag {
            Tag::Paragraph => ScannerEvent::EndParagraph,
            Tag::Header(_) => ScannerEvent::EndHeader,
            Tag::List { .. } => ScannerEvent::EndList,
            Tag::ListItem => ScannerEvent::EndListItem,
            Tag::Quotation => ScannerEvent::EndQuotation,
            Tag::Group => ScannerEvent::EndGroup,
            Tag::Format => ScannerEvent::EndFormat(params),
            Tag::Style(format) => ScannerEvent::EndStyle(format),
            Tag::LineBreak | Tag::HorizontalLine | Tag::Preformatted | Tag::Transparent => {
                return;
            }
        };
        self.stack.emit(event);
    }

    fn comment(&mut self, comment: &str) -> Result<(), XhtmlError> {
        match MacroMarker::from_comment(comment) {
            None => {}
            Some(MacroMarker::Start(info)) => {
                let inline = self.stack.is_inside_block_element();
                self.stack.push_macro(info.with_inline(inline));
            }
            Some(MacroMarker::MalformedStart(marker)) => {
                tracing::warn!(%marker, "Ignoring malformed macro marker");
                self.warnings.push(ParseWarning::MalformedMacroMarker(marker));
            }
            Some(MacroMarker::Stop) => {
                if self.stack.is_inside_macro() {
                    let info = self.stack.pop_macro()?;
                    self.stack.emit(ScannerEvent::Macro(&info));
                } else {
                    tracing::warn!("Ignoring stopmacro marker without open macro");
                    self.warnings.push(ParseWarning::UnmatchedStopMacro);
                }
            }
        }
        Ok(())
    }

    /// Emit macros still open at the end of input.
    fn close_macros(&mut self) -> Result<(), XhtmlError> {
        while self.stack.is_inside_macro() {
            let info = self.stack.pop_macro()?;
            tracing::warn!(id = info.id(), "Macro is never stopped");
            self.warnings.push(ParseWarning::UnterminatedMacro {
                id: info.id().to_owned(),
            });
            self.stack.emit(ScannerEvent::Macro(&info));
        }
        Ok(())
    }
}
