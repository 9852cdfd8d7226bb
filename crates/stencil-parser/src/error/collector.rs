//! Collector for accumulating diagnostics during a processing phase.

use log::warn;

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so a phase can report every problem it finds
/// instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// - If any error was emitted, returns `Err(ParseError)` with all
    ///   diagnostics, warnings included.
    /// - Otherwise logs each warning and returns `Ok(())`.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            warn!(code:? = diagnostic.code(); "{}", diagnostic.message());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_new_finish_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_collector_warning_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("unknown master").with_code(ErrorCode::E201));

        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics_on_error() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("duplicate id")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(10..20), "here"),
        );
        collector.emit(Diagnostic::warning("unknown master"));
        collector.emit(Diagnostic::error("another duplicate id"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].message(), "duplicate id");
    }
}
