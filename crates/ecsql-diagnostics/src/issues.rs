//! Issue sinks that collect or forward diagnostics

use crate::{Diagnostic, Severity};

/// Receives diagnostics raised while finalizing a statement
pub trait IssueReporter {
    /// Report a single diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects every reported diagnostic in order
#[derive(Debug, Default, Clone)]
pub struct IssueCollector {
    diagnostics: Vec<Diagnostic>,
}

impl IssueCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics reported so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any error-severity diagnostic was reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Number of reported diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drop collected diagnostics
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Consume the collector
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl IssueReporter for IssueCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogIssueReporter;

impl IssueReporter for LogIssueReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => log::error!(
                target: "ecsql::issues",
                "[{}/{}] {}",
                diagnostic.category,
                diagnostic.issue_type,
                diagnostic
            ),
            Severity::Warning => log::warn!(
                target: "ecsql::issues",
                "[{}/{}] {}",
                diagnostic.category,
                diagnostic.issue_type,
                diagnostic
            ),
            Severity::Info => log::info!(
                target: "ecsql::issues",
                "[{}/{}] {}",
                diagnostic.category,
                diagnostic.issue_type,
                diagnostic
            ),
        }
    }
}

impl<R: IssueReporter + ?Sized> IssueReporter for &mut R {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

#[cfg(feature = "colored")]
impl Diagnostic {
    /// Render the diagnostic for a terminal
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
            Severity::Info => self.severity.to_string().blue().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code, self.message);
        if let Some(expr) = &self.expression {
            out.push_str(&format!("\n  {} {}", "-->".blue(), expr));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".cyan(), help));
        }
        out
    }
}
