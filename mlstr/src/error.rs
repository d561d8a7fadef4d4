use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Rows can only be split on `"\n"`.
    UnsupportedSeparator(String),
    /// A directive has no matching positional argument.
    ArgumentOutOfRange {
        index: usize,
        supplied: usize,
        span: Range<usize>,
    },
    /// A directive's flags are invalid, or its conversion does not accept the argument.
    MalformedDirective {
        directive: String,
        reason: String,
        span: Range<usize>,
    },
}

impl Error {
    /// Byte span of the offending directive within the template text.
    pub fn span(&self) -> Option<&Range<usize>> {
        match self {
            Error::UnsupportedSeparator(_) => None,
            Error::ArgumentOutOfRange { span, .. } => Some(span),
            Error::MalformedDirective { span, .. } => Some(span),
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(self.to_string());
        match self {
            Error::UnsupportedSeparator(_) => diagnostic,
            Error::ArgumentOutOfRange { supplied, span, .. } => diagnostic
                .with_labels(vec![
                    Label::primary(file_id, span.clone()).with_message("no argument for this"),
                ])
                .with_notes(vec![format!("{} argument(s) supplied", supplied)]),
            Error::MalformedDirective { reason, span, .. } => diagnostic.with_labels(vec![
                Label::primary(file_id, span.clone()).with_message(reason.clone()),
            ]),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedSeparator(sep) => write!(
                f,
                "unsupported operation: cannot split rows on {:?}, only \"\\n\" is allowed",
                sep
            ),
            Error::ArgumentOutOfRange {
                index, supplied, ..
            } => write!(
                f,
                "format argument index {} out of range ({} supplied)",
                index, supplied
            ),
            Error::MalformedDirective {
                directive, reason, ..
            } => write!(f, "malformed format directive `{}`: {}", directive, reason),
        }
    }
}

impl std::error::Error for Error {}
