//! Begin/end handling of metadata elements.
//!
//! A metadata element may request a syntax override for its subtree and may
//! mark its content as *unchanged content*: the content is rendered back to
//! text through a nested pipeline and becomes the content of the enclosing
//! macro call.
//!
//! Per element, [`MacroHandler::handle_begin`] and [`MacroHandler::handle_end`]
//! leave the stack exactly as they found it:
//!
//! | begin                                  | end                                  |
//! |----------------------------------------|--------------------------------------|
//! | push syntax override (if declared)     | pop it (if still pending)            |
//! | push capture pipeline, open format/doc | close format/doc, pop pipeline       |
//! | push capture flag                      | pop capture flag                     |

use wr_renderer::{Listener, Parameters, RendererFactory, Syntax, WikiPrinter};

use crate::capture::CapturePipeline;
use crate::error::{CaptureWarning, FrameKind, HandlerError, StackError};
use crate::generator::ScannerEvent;
use crate::metadata::MetadataDetector;
use crate::resolver::SyntaxResolver;
use crate::stack::{CaptureFlag, TagStack};

/// Drives syntax overrides and unchanged-content captures.
pub struct MacroHandler<'a> {
    factory: &'a dyn RendererFactory,
    resolver: SyntaxResolver<'a>,
    detector: MetadataDetector,
    warnings: Vec<CaptureWarning>,
}

impl<'a> MacroHandler<'a> {
    pub fn new(
        factory: &'a dyn RendererFactory,
        resolver: SyntaxResolver<'a>,
        detector: MetadataDetector,
    ) -> Self {
        Self {
            factory,
            resolver,
            detector,
            warnings: Vec::new(),
        }
    }

    pub fn detector(&self) -> &MetadataDetector {
        &self.detector
    }

    /// Drain the warnings recorded since the last call.
    pub fn take_warnings(&mut self) -> Vec<CaptureWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Handle entering an element with parameters `params`.
    ///
    /// Returns `true` if the element's own events must not be emitted: a
    /// capture started, or a macro is open.
    pub fn handle_begin<L: Listener>(
        &mut self,
        stack: &mut TagStack<L>,
        params: &Parameters,
    ) -> bool {
        if !self.detector.is_metadata_element(params) {
            stack.push_capture_flag(CaptureFlag::NONE);
            return stack.is_inside_macro();
        }

        let metadata = self.detector.decode(params);
        let mut flag = CaptureFlag::NONE;
        if let Some(value) = metadata.syntax() {
            flag.pushed_override = Some(stack.push_syntax_override(Syntax::opaque(value)));
        }

        if metadata.has_unchanged_content() {
            flag.capturing = self.start_capture(stack, params);
        }

        stack.push_capture_flag(flag);
        flag.capturing || stack.is_inside_macro()
    }

    /// Handle leaving the element entered by the matching
    /// [`handle_begin`](Self::handle_begin).
    ///
    /// Returns the same signal as `handle_begin`, evaluated after the
    /// element's frames are popped.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if the stack holds no frame for this element
    /// or the enclosing macro already received captured content.
    pub fn handle_end<L: Listener>(
        &mut self,
        stack: &mut TagStack<L>,
        params: &Parameters,
    ) -> Result<bool, HandlerError> {
        let flag = stack.pop_capture_flag()?;

        if flag.capturing {
            let text = Self::finish_capture(stack, params)?;
            if let Some(info) = stack.macro_info_mut() {
                info.set_content(text)?;
            }
        }

        if let Some(depth) = flag.pushed_override
            && stack.syntax_override_depth() == depth
        {
            stack.pop_syntax_override()?;
        }

        Ok(flag.capturing || stack.is_inside_macro())
    }

    fn start_capture<L: Listener>(&mut self, stack: &mut TagStack<L>, params: &Parameters) -> bool {
        let syntax = self.resolver.resolve(stack);
        let mut renderer = match self.factory.renderer(&syntax) {
            Ok(renderer) => renderer,
            Err(source) => {
                self.warnings
                    .push(CaptureWarning::RendererUnavailable { syntax, source });
                return false;
            }
        };
        renderer.set_printer(WikiPrinter::new());

        let inline = stack.is_inside_block_element();
        let macro_depth = stack.macro_depth();
        stack.push_scanner(CapturePipeline::new(
            renderer,
            inline,
            self.detector.clone(),
            macro_depth,
        ));

        if inline {
            stack.emit(ScannerEvent::BeginFormat(params));
        } else {
            stack.emit(ScannerEvent::BeginDocument(params));
        }
        true
    }

    fn finish_capture<L: Listener>(
        stack: &mut TagStack<L>,
        params: &Parameters,
    ) -> Result<String, StackError> {
        let inline = stack
            .capture()
            .map(CapturePipeline::is_inline)
            .ok_or(StackError::Underflow {
                kind: FrameKind::Scanner,
                operation: "handle_end",
            })?;

        if inline {
            stack.emit(ScannerEvent::EndFormat(params));
        } else {
            stack.emit(ScannerEvent::EndDocument);
        }
        Ok(stack.pop_scanner()?.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::generator::GeneratorListener;
    use crate::macro_info::MacroInfo;
    use crate::resolver::StaticSyntaxProvider;
    use pretty_assertions::assert_eq;
    use wr_renderer::{
        Container, Event, Format, PrintRenderer, RendererLookupError, RendererRegistry,
        TextRenderer, XWikiBackend,
    };

    /// Factory recording every requested syntax.
    struct RecordingFactory {
        registry: RendererRegistry,
        requests: RefCell<Vec<Syntax>>,
    }

    impl RecordingFactory {
        fn new(registry: RendererRegistry) -> Self {
            Self {
                registry,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Syntax> {
            self.requests.borrow().clone()
        }
    }

    impl RendererFactory for RecordingFactory {
        fn renderer(
            &self,
            syntax: &Syntax,
        ) -> Result<Box<dyn PrintRenderer>, RendererLookupError> {
            self.requests.borrow_mut().push(syntax.clone());
            self.registry.renderer(syntax)
        }
    }

    static TARGET: StaticSyntaxProvider = StaticSyntaxProvider(Some(Syntax::XWIKI_2_1));

    fn handler<'a>(
        factory: &'a dyn RendererFactory,
        provider: &'a StaticSyntaxProvider,
    ) -> MacroHandler<'a> {
        MacroHandler::new(
            factory,
            SyntaxResolver::new(provider, Syntax::XHTML_1_0),
            MetadataDetector::default(),
        )
    }

    fn stack() -> TagStack<Vec<Event>> {
        TagStack::new(GeneratorListener::new(Vec::new(), MetadataDetector::default()))
    }

    fn marker() -> Parameters {
        Parameters::new().with("class", "xwiki-metadata-container")
    }

    fn unchanged() -> Parameters {
        marker().with("data-xwiki-unchanged-content", "")
    }

    fn emit_x(stack: &mut TagStack<Vec<Event>>) {
        let empty = Parameters::new();
        stack.emit(ScannerEvent::BeginFormat(&empty));
        stack.emit(ScannerEvent::Text("X"));
        stack.emit(ScannerEvent::EndFormat(&empty));
    }

    #[test]
    fn test_plain_element_only_pushes_flag() {
        let registry = RendererRegistry::with_builtin();
        let mut handler = handler(&registry, &TARGET);
        let mut stack = stack();
        let params = Parameters::new().with("class", "note");

        assert!(!handler.handle_begin(&mut stack, &params));
        assert_eq!(stack.frame_count(), 1);
        assert_eq!(stack.capture_flag_depth(), 1);
        assert!(!handler.handle_end(&mut stack, &params).unwrap());
        assert_eq!(stack.frame_count(), 0);

        stack.push_macro(MacroInfo::new("code", Parameters::new()));
        assert!(handler.handle_begin(&mut stack, &params));
        assert!(handler.handle_end(&mut stack, &params).unwrap());
        assert_eq!(stack.macro_info().unwrap().content(), None);
        assert!(handler.take_warnings().is_empty());
    }

    #[test]
    fn test_inline_capture_sets_macro_content() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();
        stack.push_macro(MacroInfo::new("code", Parameters::new()));

        let block = Parameters::new();
        assert!(handler.handle_begin(&mut stack, &block));
        stack.enter_element(true);

        let span = unchanged();
        assert!(handler.handle_begin(&mut stack, &span));
        assert!(stack.capture().is_some_and(CapturePipeline::is_inline));
        emit_x(&mut stack);
        assert!(handler.handle_end(&mut stack, &span).unwrap());

        stack.leave_element().unwrap();
        assert!(handler.handle_end(&mut stack, &block).unwrap());

        assert_eq!(stack.macro_info().unwrap().content(), Some("X"));
        assert_eq!(factory.requests(), vec![Syntax::XWIKI_2_1]);
        assert_eq!(stack.frame_count(), 1);
        assert!(stack.into_listener().is_empty());
    }

    #[test]
    fn test_failed_acquisition_degrades() {
        let registry = RendererRegistry::with_builtin().without(&Syntax::XWIKI_2_1);
        let mut handler = handler(&registry, &TARGET);
        let mut stack = stack();
        stack.push_macro(MacroInfo::new("code", Parameters::new()));
        stack.enter_element(true);

        let span = unchanged();
        assert!(handler.handle_begin(&mut stack, &span));
        assert!(stack.capture().is_none());
        emit_x(&mut stack);
        assert!(handler.handle_end(&mut stack, &span).unwrap());

        assert_eq!(stack.macro_info().unwrap().content(), None);
        assert_eq!(
            handler.take_warnings(),
            vec![CaptureWarning::RendererUnavailable {
                syntax: Syntax::XWIKI_2_1,
                source: RendererLookupError::NotFound {
                    syntax: Syntax::XWIKI_2_1
                },
            }]
        );
    }

    #[test]
    fn test_failed_acquisition_without_macro() {
        let registry = RendererRegistry::new();
        let mut handler = handler(&registry, &TARGET);
        let mut stack = stack();
        let div = unchanged();

        assert!(!handler.handle_begin(&mut stack, &div));
        assert!(!handler.handle_end(&mut stack, &div).unwrap());
        assert_eq!(handler.take_warnings().len(), 1);
    }

    #[test]
    fn test_both_keys_resolve_once() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();
        stack.push_macro(MacroInfo::new("code", Parameters::new()));

        let div = unchanged().with("data-xwiki-syntax", "plain/1.0");
        assert!(handler.handle_begin(&mut stack, &div));
        assert_eq!(stack.syntax_override_depth(), 0);
        assert_eq!(stack.capture().map(CapturePipeline::syntax), Some(Syntax::PLAIN_1_0));
        stack.emit(ScannerEvent::Text("a b"));
        assert!(handler.handle_end(&mut stack, &div).unwrap());

        assert_eq!(factory.requests(), vec![Syntax::PLAIN_1_0]);
        assert_eq!(stack.macro_info().unwrap().content(), Some("a b"));
        assert!(stack.macro_info().unwrap().has_captured_content());
    }

    #[test]
    fn test_override_scoped_to_element() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();

        let outer = marker().with("data-xwiki-syntax", "markdown/1.2");
        assert!(!handler.handle_begin(&mut stack, &outer));
        assert_eq!(stack.peek_syntax_override(), Some(&Syntax::MARKDOWN_1_2));
        assert!(!handler.handle_end(&mut stack, &outer).unwrap());
        assert_eq!(stack.syntax_override_depth(), 0);

        // Consumed by the first capture inside, then gone for its sibling.
        assert!(!handler.handle_begin(&mut stack, &outer));
        for _ in 0..2 {
            let inner = unchanged();
            assert!(handler.handle_begin(&mut stack, &inner));
            handler.handle_end(&mut stack, &inner).unwrap();
        }
        assert!(!handler.handle_end(&mut stack, &outer).unwrap());

        assert_eq!(factory.requests(), vec![Syntax::MARKDOWN_1_2, Syntax::XWIKI_2_1]);
        assert_eq!(stack.frame_count(), 0);
    }

    #[test]
    fn test_inner_override_shadows_outer() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();

        let outer = marker().with("data-xwiki-syntax", "markdown/1.2");
        let inner = unchanged().with("data-xwiki-syntax", "plain/1.0");
        handler.handle_begin(&mut stack, &outer);
        handler.handle_begin(&mut stack, &inner);
        handler.handle_end(&mut stack, &inner).unwrap();
        assert_eq!(stack.peek_syntax_override(), Some(&Syntax::MARKDOWN_1_2));
        handler.handle_end(&mut stack, &outer).unwrap();

        assert_eq!(factory.requests(), vec![Syntax::PLAIN_1_0]);
        assert_eq!(stack.frame_count(), 0);
    }

    #[test]
    fn test_captured_text_matches_direct_rendering() {
        let expected = TextRenderer::<XWikiBackend>::new().render([
            Event::start(Container::Format(Format::None)),
            Event::start(Container::Format(Format::Bold)),
            Event::word("a"),
            Event::end(Container::Format(Format::Bold)),
            Event::Space,
            Event::word("b"),
            Event::end(Container::Format(Format::None)),
        ]);

        for inline in [true, false] {
            let registry = RendererRegistry::with_builtin();
            let mut handler = handler(&registry, &TARGET);
            let mut stack = stack();
            stack.push_macro(MacroInfo::new("code", Parameters::new()));
            stack.enter_element(inline);

            let span = unchanged();
            let empty = Parameters::new();
            handler.handle_begin(&mut stack, &span);
            if !inline {
                stack.emit(ScannerEvent::BeginFormat(&empty));
            }
            stack.emit(ScannerEvent::BeginStyle(Format::Bold));
            stack.emit(ScannerEvent::Text("a"));
            stack.emit(ScannerEvent::EndStyle(Format::Bold));
            stack.emit(ScannerEvent::Text(" b"));
            if !inline {
                stack.emit(ScannerEvent::EndFormat(&empty));
            }
            handler.handle_end(&mut stack, &span).unwrap();

            assert_eq!(stack.macro_info().unwrap().content(), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_block_capture_renders_document() {
        let registry = RendererRegistry::with_builtin();
        let mut handler = handler(&registry, &TARGET);
        let mut stack = stack();
        stack.push_macro(MacroInfo::new("code", Parameters::new()));

        let div = unchanged();
        let empty = Parameters::new();
        handler.handle_begin(&mut stack, &div);
        assert!(stack.capture().is_some_and(|pipeline| !pipeline.is_inline()));
        for word in ["one", "two"] {
            stack.emit(ScannerEvent::BeginParagraph(&empty));
            stack.emit(ScannerEvent::Text(word));
            stack.emit(ScannerEvent::EndParagraph);
        }
        handler.handle_end(&mut stack, &div).unwrap();

        assert_eq!(stack.macro_info().unwrap().content(), Some("one\n\ntwo"));
    }

    #[test]
    fn test_capture_without_macro_is_discarded() {
        let registry = RendererRegistry::with_builtin();
        let mut handler = handler(&registry, &TARGET);
        let mut stack = stack();
        let div = unchanged();

        assert!(handler.handle_begin(&mut stack, &div));
        stack.emit(ScannerEvent::Text("lost"));
        assert!(handler.handle_end(&mut stack, &div).unwrap());

        assert_eq!(stack.frame_count(), 0);
        assert!(stack.into_listener().is_empty());
        assert!(handler.take_warnings().is_empty());
    }

    #[test]
    fn test_second_capture_in_macro_fails() {
        let registry = RendererRegistry::with_builtin();
        let mut handler = handler(&registry, &TARGET);
        let mut stack = stack();
        stack.push_macro(MacroInfo::new("code", Parameters::new()));
        let div = unchanged();

        handler.handle_begin(&mut stack, &div);
        handler.handle_end(&mut stack, &div).unwrap();
        handler.handle_begin(&mut stack, &div);
        let err = handler.handle_end(&mut stack, &div).unwrap_err();

        assert_eq!(
            err,
            HandlerError::ContentAlreadySet {
                macro_id: "code".to_owned()
            }
        );
    }

    #[test]
    fn test_end_without_begin_underflows() {
        let registry = RendererRegistry::with_builtin();
        let mut handler = handler(&registry, &TARGET);
        let err = handler
            .handle_end(&mut stack(), &Parameters::new())
            .unwrap_err();
        assert_eq!(
            err,
            HandlerError::Stack(StackError::Underflow {
                kind: FrameKind::CaptureFlag,
                operation: "pop_capture_flag",
            })
        );
    }

    #[test]
    fn test_unknown_outer_syntax_reaches_factory() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();
        stack.push_macro(MacroInfo::new("code", Parameters::new()));

        let outer = marker().with("data-xwiki-syntax", "confluence");
        assert!(handler.handle_begin(&mut stack, &outer));
        assert_eq!(stack.peek_syntax_override(), Some(&Syntax::opaque("confluence")));
        stack.enter_element(true);

        let span = unchanged();
        assert!(handler.handle_begin(&mut stack, &span));
        assert!(stack.capture().is_none());
        emit_x(&mut stack);
        assert!(handler.handle_end(&mut stack, &span).unwrap());

        stack.leave_element().unwrap();
        assert!(handler.handle_end(&mut stack, &outer).unwrap());

        let confluence = Syntax::opaque("confluence");
        assert_eq!(factory.requests(), vec![confluence.clone()]);
        assert_eq!(stack.macro_info().unwrap().content(), None);
        assert_eq!(
            handler.take_warnings(),
            vec![CaptureWarning::RendererUnavailable {
                syntax: confluence.clone(),
                source: RendererLookupError::NotFound { syntax: confluence },
            }]
        );
        assert_eq!(stack.frame_count(), 1);
        assert!(stack.into_listener().is_empty());
    }

    #[test]
    fn test_unknown_syntax_with_capture_requests_once() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();
        let div = unchanged().with("data-xwiki-syntax", "bogus");

        assert!(!handler.handle_begin(&mut stack, &div));
        assert_eq!(stack.syntax_override_depth(), 0);
        assert!(!handler.handle_end(&mut stack, &div).unwrap());

        assert_eq!(factory.requests(), vec![Syntax::opaque("bogus")]);
        assert_eq!(handler.take_warnings().len(), 1);
        assert_eq!(stack.frame_count(), 0);
    }

    #[test]
    fn test_marker_without_keys_only_pushes_flag() {
        let factory = RecordingFactory::new(RendererRegistry::with_builtin());
        let mut handler = handler(&factory, &TARGET);
        let mut stack = stack();
        let div = marker();

        assert!(!handler.handle_begin(&mut stack, &div));
        assert_eq!(stack.frame_count(), 1);
        assert_eq!(stack.capture_flag_depth(), 1);
        assert!(!handler.handle_end(&mut stack, &div).unwrap());
        assert_eq!(stack.frame_count(), 0);

        stack.push_macro(MacroInfo::new("code", Parameters::new()));
        assert!(handler.handle_begin(&mut stack, &div));
        assert_eq!(stack.syntax_override_depth(), 0);
        assert!(stack.capture().is_none());
        assert!(handler.handle_end(&mut stack, &div).unwrap());

        assert_eq!(stack.frame_count(), 1);
        assert_eq!(stack.macro_info().unwrap().content(), None);
        assert!(factory.requests().is_empty());
        assert!(handler.take_warnings().is_empty());
    }
}
