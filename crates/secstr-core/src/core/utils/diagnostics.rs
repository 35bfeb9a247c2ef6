use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    SheetIdConflict,
    BulgeSideNotInStrand,
    LongC7Ladder,
    MissingBackboneAtoms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Collects non-fatal warnings raised during one assignment run.
///
/// Every recorded warning is also emitted through `tracing`. Warn-once
/// suppression is scoped to the collector, so independent runs never share it.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    reported_once: HashSet<DiagnosticKind>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = ?kind, "{}", message);
        self.entries.push(Diagnostic { kind, message });
    }

    /// Records the warning only if no warning of this kind was recorded through
    /// `warn_once` before.
    pub fn warn_once(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        if self.reported_once.insert(kind) {
            self.warn(kind, message);
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_records_every_call() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(DiagnosticKind::SheetIdConflict, "first");
        diagnostics.warn(DiagnosticKind::SheetIdConflict, "second");
        assert_eq!(diagnostics.count_of(DiagnosticKind::SheetIdConflict), 2);
    }

    #[test]
    fn warn_once_suppresses_repeats_within_one_collector_only() {
        let mut first_run = Diagnostics::new();
        first_run.warn_once(DiagnosticKind::LongC7Ladder, "a");
        first_run.warn_once(DiagnosticKind::LongC7Ladder, "b");
        assert_eq!(first_run.len(), 1);
        assert_eq!(first_run.entries()[0].message, "a");

        let mut second_run = Diagnostics::new();
        second_run.warn_once(DiagnosticKind::LongC7Ladder, "c");
        assert_eq!(second_run.len(), 1);
    }
}
