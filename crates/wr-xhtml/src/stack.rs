//! Per-parse context stack.
//!
//! Each frame kind lives on its own typed stack. Frames are pushed and
//! popped in strict LIFO order per kind; popping an absent frame is a
//! [`StackError::Underflow`].

use wr_renderer::{Listener, Syntax};

use crate::capture::CapturePipeline;
use crate::error::{FrameKind, StackError};
use crate::generator::{GeneratorListener, ScannerContext, ScannerEvent};
use crate::macro_info::MacroInfo;

/// Capture-flag frame, pushed once per handled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFlag {
    /// Whether the element started a capture.
    pub capturing: bool,
    /// Override depth right after the element pushed its syntax override.
    pub pushed_override: Option<usize>,
}

impl CaptureFlag {
    pub const NONE: Self = Self {
        capturing: false,
        pushed_override: None,
    };
}

/// Context stack of one parse.
///
/// Scanner events go to the innermost scanner context: the top capture
/// pipeline, or the root generator when no capture is active.
pub struct TagStack<L> {
    root: GeneratorListener<L>,
    scanners: Vec<CapturePipeline>,
    syntax_overrides: Vec<Syntax>,
    capture_flags: Vec<CaptureFlag>,
    macros: Vec<MacroInfo>,
    /// One entry per open element: whether it only allows inline content.
    elements: Vec<bool>,
}

impl<L: Listener> TagStack<L> {
    pub fn new(root: GeneratorListener<L>) -> Self {
        Self {
            root,
            scanners: Vec::new(),
            syntax_overrides: Vec::new(),
            capture_flags: Vec::new(),
            macros: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Push a syntax override, returning the override depth after the push.
    pub fn push_syntax_override(&mut self, syntax: Syntax) -> usize {
        self.syntax_overrides.push(syntax);
        self.syntax_overrides.len()
    }

    /// Pending syntax override, if any.
    pub fn peek_syntax_override(&self) -> Option<&Syntax> {
        self.syntax_overrides.last()
    }

    /// Consume the pending syntax override.
    pub fn take_syntax_override(&mut self) -> Option<Syntax> {
        self.syntax_overrides.pop()
    }

    /// Pop a syntax override that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Underflow`] if no override is pending.
    pub fn pop_syntax_override(&mut self) -> Result<Syntax, StackError> {
        self.syntax_overrides.pop().ok_or(StackError::Underflow {
            kind: FrameKind::SyntaxOverride,
            operation: "pop_syntax_override",
        })
    }

    pub fn syntax_override_depth(&self) -> usize {
        self.syntax_overrides.len()
    }

    pub fn push_capture_flag(&mut self, flag: CaptureFlag) {
        self.capture_flags.push(flag);
    }

    /// # Errors
    ///
    /// Returns [`StackError::Underflow`] if no flag was pushed.
    pub fn pop_capture_flag(&mut self) -> Result<CaptureFlag, StackError> {
        self.capture_flags.pop().ok_or(StackError::Underflow {
            kind: FrameKind::CaptureFlag,
            operation: "pop_capture_flag",
        })
    }

    pub fn capture_flag_depth(&self) -> usize {
        self.capture_flags.len()
    }

    pub fn push_scanner(&mut self, pipeline: CapturePipeline) {
        self.scanners.push(pipeline);
    }

    /// # Errors
    ///
    /// Returns [`StackError::Underflow`] if no capture is active.
    pub fn pop_scanner(&mut self) -> Result<CapturePipeline, StackError> {
        self.scanners.pop().ok_or(StackError::Underflow {
            kind: FrameKind::Scanner,
            operation: "pop_scanner",
        })
    }

    /// Number of active captures.
    pub fn capture_depth(&self) -> usize {
        self.scanners.len()
    }

    /// Innermost active capture, if any.
    pub fn capture(&self) -> Option<&CapturePipeline> {
        self.scanners.last()
    }

    /// Innermost scanner context.
    pub fn scanner(&mut self) -> &mut dyn ScannerContext {
        match self.scanners.last_mut() {
            Some(pipeline) => pipeline,
            None => &mut self.root,
        }
    }

    pub fn push_macro(&mut self, info: MacroInfo) {
        self.macros.push(info);
    }

    /// # Errors
    ///
    /// Returns [`StackError::Underflow`] if no macro is open.
    pub fn pop_macro(&mut self) -> Result<MacroInfo, StackError> {
        self.macros.pop().ok_or(StackError::Underflow {
            kind: FrameKind::Macro,
            operation: "pop_macro",
        })
    }

    /// Innermost open macro placeholder.
    pub fn macro_info(&self) -> Option<&MacroInfo> {
        self.macros.last()
    }

    pub fn macro_info_mut(&mut self) -> Option<&mut MacroInfo> {
        self.macros.last_mut()
    }

    pub fn is_inside_macro(&self) -> bool {
        !self.macros.is_empty()
    }

    pub fn macro_depth(&self) -> usize {
        self.macros.len()
    }

    /// Enter an element; `inline_only` marks elements whose content may
    /// only be inline (paragraphs, headings, list items).
    pub fn enter_element(&mut self, inline_only: bool) {
        self.elements.push(inline_only);
    }

    /// # Errors
    ///
    /// Returns [`StackError::Underflow`] if no element is open.
    pub fn leave_element(&mut self) -> Result<(), StackError> {
        self.elements
            .pop()
            .map(|_| ())
            .ok_or(StackError::Underflow {
                kind: FrameKind::Element,
                operation: "leave_element",
            })
    }

    /// Whether an enclosing element only allows inline content.
    pub fn is_inside_block_element(&self) -> bool {
        self.elements.iter().any(|inline_only| *inline_only)
    }

    /// Whether scanner events currently reach a listener.
    ///
    /// Output rendered by an open macro is not part of the document; only a
    /// capture started inside the innermost macro receives it.
    pub fn is_emitting(&self) -> bool {
        self.macros.is_empty()
            || self
                .scanners
                .last()
                .is_some_and(|pipeline| pipeline.macro_depth() == self.macros.len())
    }

    /// Send an event to the innermost scanner context, unless suppressed.
    pub fn emit(&mut self, event: ScannerEvent<'_>) {
        if self.is_emitting() {
            self.scanner().handle(event);
        }
    }

    /// Total frames across all kinds except elements.
    pub fn frame_count(&self) -> usize {
        self.syntax_overrides.len()
            + self.capture_flags.len()
            + self.scanners.len()
            + self.macros.len()
    }

    pub fn root(&self) -> &GeneratorListener<L> {
        &self.root
    }

    /// Tear down the stack, returning the root listener.
    pub fn into_listener(self) -> L {
        self.root.into_listener()
    }
}
