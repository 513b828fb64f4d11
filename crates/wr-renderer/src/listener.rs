//! Event listeners.

use crate::event::{Container, Event};

/// Receiver of structural events.
pub trait Listener {
    /// Handle one event.
    fn event(&mut self, event: Event);
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn event(&mut self, event: Event) {
        (**self).event(event);
    }
}

impl<L: Listener + ?Sized> Listener for Box<L> {
    fn event(&mut self, event: Event) {
        (**self).event(event);
    }
}

/// Collects every event it receives.
impl Listener for Vec<Event> {
    fn event(&mut self, event: Event) {
        self.push(event);
    }
}

/// Listener wrapper that keeps only inline-safe events.
///
/// Used when block content has to be emitted where only inline content is
/// allowed (e.g. inside a paragraph):
/// - `Document` start/end are dropped
/// - `Paragraph` start/end are dropped; a paragraph following another one
///   is separated by a [`Event::NewLine`]
/// - `EmptyLines` are dropped
///
/// Everything else is forwarded unchanged.
pub struct InlineFilterListener<L> {
    inner: L,
    paragraphs_seen: usize,
}

impl<L: Listener> InlineFilterListener<L> {
    /// Wrap a listener.
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            paragraphs_seen: 0,
        }
    }

    /// The wrapped listener.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Unwrap, returning the wrapped listener.
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: Listener> Listener for InlineFilterListener<L> {
    fn event(&mut self, event: Event) {
        match event {
            Event::Start(Container::Document, _)
            | Event::End(Container::Document | Container::Paragraph, _)
            | Event::EmptyLines(_) => {}
            Event::Start(Container::Paragraph, _) => {
                if self.paragraphs_seen > 0 {
                    self.inner.event(Event::NewLine);
                }
                self.paragraphs_seen += 1;
            }
            other => self.inner.event(other),
        }
    }
}
