//! Nested rendering pipeline of an unchanged-content region.

use wr_renderer::{Event, InlineFilterListener, Listener, PrintRenderer, Syntax};

use crate::generator::{GeneratorListener, ScannerContext, ScannerEvent};
use crate::metadata::MetadataDetector;

/// Listener a capture writes to: the renderer itself, or the renderer behind
/// an inline filter when the region sits where only inline content is allowed.
pub enum CaptureTarget {
    Direct(Box<dyn PrintRenderer>),
    InlineFiltered(InlineFilterListener<Box<dyn PrintRenderer>>),
}

impl CaptureTarget {
    pub fn new(renderer: Box<dyn PrintRenderer>, inline: bool) -> Self {
        if inline {
            Self::InlineFiltered(InlineFilterListener::new(renderer))
        } else {
            Self::Direct(renderer)
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::InlineFiltered(_))
    }

    pub fn renderer(&self) -> &dyn PrintRenderer {
        match self {
            Self::Direct(renderer) => renderer.as_ref(),
            Self::InlineFiltered(filter) => filter.inner().as_ref(),
        }
    }

    /// Unwrap down to the renderer.
    pub fn into_renderer(self) -> Box<dyn PrintRenderer> {
        match self {
            Self::Direct(renderer) => renderer,
            Self::InlineFiltered(filter) => filter.into_inner(),
        }
    }
}

impl Listener for CaptureTarget {
    fn event(&mut self, event: Event) {
        match self {
            Self::Direct(renderer) => renderer.event(event),
            Self::InlineFiltered(filter) => filter.event(event),
        }
    }
}

/// Renderer, sink and translating listener assembled for one capture.
pub struct CapturePipeline {
    generator: GeneratorListener<CaptureTarget>,
    /// Number of macros open when the capture started.
    macro_depth: usize,
}

impl CapturePipeline {
    /// Build a pipeline around a renderer whose printer is already bound.
    pub fn new(
        renderer: Box<dyn PrintRenderer>,
        inline: bool,
        detector: MetadataDetector,
        macro_depth: usize,
    ) -> Self {
        Self {
            generator: GeneratorListener::new(CaptureTarget::new(renderer, inline), detector),
            macro_depth,
        }
    }

    /// Whether the capture was opened in inline mode.
    pub fn is_inline(&self) -> bool {
        self.generator.listener().is_inline()
    }

    /// Syntax the region is captured in.
    pub fn syntax(&self) -> Syntax {
        self.generator.listener().renderer().syntax()
    }

    pub fn macro_depth(&self) -> usize {
        self.macro_depth
    }

    /// Tear down the pipeline and return the text the renderer printed.
    pub fn into_text(self) -> String {
        let mut renderer = self.generator.into_listener().into_renderer();
        renderer.take_printer().into_string()
    }
}

impl ScannerContext for CapturePipeline {
    fn handle(&mut self, event: ScannerEvent<'_>) {
        self.generator.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wr_renderer::{
        Container, Parameters, RendererFactory, RendererRegistry, TextRenderer, WikiPrinter,
        XWikiBackend,
    };

    fn renderer() -> Box<dyn PrintRenderer> {
        let mut renderer = RendererRegistry::with_builtin()
            .renderer(&Syntax::XWIKI_2_1)
            .unwrap();
        renderer.set_printer(WikiPrinter::new());
        renderer
    }

    fn paragraphs() -> Vec<Event> {
        let mut events = Vec::new();
        for word in ["one", "two"] {
            events.push(Event::start(Container::Paragraph));
            events.push(Event::word(word));
            events.push(Event::end(Container::Paragraph));
        }
        events
    }

    #[test]
    fn test_direct_target_renders_blocks() {
        let mut target = CaptureTarget::new(renderer(), false);
        for event in paragraphs() {
            target.event(event);
        }
        let text = target.into_renderer().take_printer().into_string();
        assert_eq!(text, TextRenderer::<XWikiBackend>::new().render(paragraphs()));
    }

    #[test]
    fn test_inline_target_filters_blocks() {
        let mut target = CaptureTarget::new(renderer(), true);
        assert!(target.is_inline());
        for event in paragraphs() {
            target.event(event);
        }
        let text = target.into_renderer().take_printer().into_string();
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_pipeline_returns_printed_text() {
        let params = Parameters::new();
        let mut pipeline =
            CapturePipeline::new(renderer(), true, MetadataDetector::default(), 1);
        pipeline.handle(ScannerEvent::BeginFormat(&params));
        pipeline.handle(ScannerEvent::Text("a  b"));
        pipeline.handle(ScannerEvent::EndFormat(&params));
        assert!(pipeline.is_inline());
        assert_eq!(pipeline.syntax(), Syntax::XWIKI_2_1);
        assert_eq!(pipeline.macro_depth(), 1);
        assert_eq!(pipeline.into_text(), "a b");
    }
}
