//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use super::Diagnostics;
use super::message::Severity;

/// Renders one line per diagnostic:
/// `error[semantic]: cannot find `x` (at /0/decl/1)`.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    min_severity: Severity,
    with_data: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            min_severity: Severity::Info,
            with_data: true,
        }
    }

    /// Skip diagnostics less severe than `severity`.
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn with_data(mut self, value: bool) -> Self {
        self.with_data = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        for diag in self
            .diagnostics
            .iter()
            .filter(|d| d.severity >= self.min_severity)
        {
            write!(w, "{}[{}]: {}", diag.severity, diag.phase, diag.message)?;
            if let Some(location) = &diag.location {
                write!(w, " (at {location})")?;
            }
            if self.with_data
                && let Some(data) = &diag.data
            {
                write!(w, " (data: {data})")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
