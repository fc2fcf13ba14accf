//! miette rendering for [`SchemavizError`].
//!
//! SDL diagnostics keep their codes, severities and labelled spans so the
//! report shows the offending schema lines. I/O, JSON, layout, config and
//! export failures are reported under a `schemaviz::*` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use schemaviz::SchemavizError;
use schemaviz_parser::{Span, error::Diagnostic};

/// A parser [`Diagnostic`] paired with the SDL it points into.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// A [`SchemavizError`] without SDL spans.
pub struct ErrorAdapter<'a>(pub &'a SchemavizError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SchemavizError::Io(_) => "schemaviz::io",
            SchemavizError::Parse { .. } => return None,
            SchemavizError::Json(_) => "schemaviz::json",
            SchemavizError::Layout(_) => "schemaviz::layout",
            SchemavizError::Config(_) => "schemaviz::config",
            SchemavizError::Export(_) => "schemaviz::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SchemavizError::Layout(schemaviz::LayoutError::EmptyGraph) => Some(Box::new(
                "the schema declares no types, scalars or directives; \
                 use `-f mermaid` to render it without a layout",
            )),
            _ => None,
        }
    }
}

/// One miette report: a parser diagnostic with its SDL snippet, or any other
/// pipeline failure.
#[derive(Debug)]
pub enum Reportable<'a> {
    Diagnostic(DiagnosticAdapter<'a>),
    Error(ErrorAdapter<'a>),
}

impl Reportable<'_> {
    fn inner(&self) -> &dyn MietteDiagnostic {
        match self {
            Reportable::Diagnostic(d) => d,
            Reportable::Error(e) => e,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner().source()
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().code()
    }

    fn severity(&self) -> Option<miette::Severity> {
        self.inner().severity()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.inner().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().labels()
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Splits `err` into the reports the CLI prints: one per parser diagnostic,
/// or a single report for every other failure.
pub fn to_reportables(err: &SchemavizError) -> Vec<Reportable<'_>> {
    match err {
        SchemavizError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use schemaviz::LayoutError;
    use schemaviz_parser::error::{ErrorCode, ParseError};

    use super::*;

    #[test]
    fn test_each_diagnostic_is_reported() {
        let diags = vec![
            Diagnostic::error("duplicate type definition `User`")
                .with_code(ErrorCode::E301)
                .with_label(Span::new(20..24), "redefined here")
                .with_secondary_label(Span::new(5..9), "first defined here"),
            Diagnostic::error("unknown directive location `PLACE`")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(40..45), "unknown location")
                .with_help("valid locations include OBJECT and FIELD_DEFINITION"),
        ];
        let err = SchemavizError::new_parse_error(ParseError::from(diags), "x".repeat(50));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()).as_deref(),
            Some("E301")
        );
        let labels: Vec<_> = reportables[0].labels().expect("labels").collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("first defined here"));
        assert!(reportables[1].help().is_some());
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning("type `Date` is referenced but never declared");
        let adapter = DiagnosticAdapter::new(&diag, "");

        assert_eq!(adapter.severity(), Some(miette::Severity::Warning));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_non_parse_errors() {
        let err = SchemavizError::Layout(LayoutError::EmptyGraph);

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.code().map(|c| c.to_string()).as_deref(),
                    Some("schemaviz::layout")
                );
                assert!(e.help().is_some());
                assert!(e.source_code().is_none());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }
}
