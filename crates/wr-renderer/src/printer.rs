//! In-memory text sink for print renderers.

/// Text sink a [`PrintRenderer`](crate::PrintRenderer) writes into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiPrinter {
    buffer: String,
}

impl WikiPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text.
    pub fn print(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a single character.
    pub fn print_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    /// Append text followed by a newline.
    pub fn println(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Last character written, if any.
    pub fn last_char(&self) -> Option<char> {
        self.buffer.chars().next_back()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl std::fmt::Write for WikiPrinter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.print(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_print_and_println() {
        let mut printer = WikiPrinter::new();
        printer.print("a");
        printer.println("b");
        write!(printer, "{}", 1).unwrap();
        assert_eq!(printer.as_str(), "ab\n1");
        assert_eq!(printer.last_char(), Some('1'));
    }
}
