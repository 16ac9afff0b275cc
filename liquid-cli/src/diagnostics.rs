use ariadne::{Color, Label, Report, ReportKind, Source};
use liquid_compiler::{ErrorKind, Span, SyntaxError, TypeError, TypeErrorKind};

type SourceReport<'a> = Report<'a, (&'a str, std::ops::Range<usize>)>;

fn build<'a>(
    source_id: &'a str,
    message: String,
    span: Option<Span>,
    hint: String,
    help: Option<String>,
) -> SourceReport<'a> {
    let offset = span.map(|s| s.offset).unwrap_or(0);
    let mut report = Report::build(ReportKind::Error, source_id, offset).with_message(message);

    if let Some(span) = span {
        let range = span.offset..span.offset + span.length.max(1);
        let label = Label::new((source_id, range))
            .with_message(hint)
            .with_color(Color::Red);
        report = report.with_label(label);
    }

    if let Some(help) = help {
        report = report.with_help(help);
    }

    report.finish()
}

pub fn syntax_report<'a>(error: &SyntaxError, source_id: &'a str) -> SourceReport<'a> {
    let hint = match &error.kind {
        ErrorKind::TokenInvalid(text) => format!("'{}' is not a valid token", text),
        ErrorKind::UnexpectedToken { expected, found } => {
            format!("expected {}, but found '{}'", expected.join(" or "), found)
        }
        ErrorKind::UnexpectedEndOfInput { expected } => {
            format!("input ends here, expected {}", expected.join(" or "))
        }
    };
    let help = match &error.kind {
        ErrorKind::TokenInvalid(_) => {
            Some("Identifiers are letters, digits and '_', starting with a letter".to_string())
        }
        _ => None,
    };
    build(source_id, error.kind.to_string(), error.span, hint, help)
}

pub fn type_report<'a>(error: &TypeError, source_id: &'a str) -> SourceReport<'a> {
    let (hint, help) = match &error.kind {
        TypeErrorKind::VariableUndefined(label) => (
            format!("'{}' is not bound here", label),
            Some("Bind it with 'let' or a function parameter".to_string()),
        ),
        TypeErrorKind::FunctionExpected { found } => {
            (format!("this has type {}, which cannot be applied", found), None)
        }
        TypeErrorKind::ArgumentMismatch { expected, found } => (
            format!("expected {}, found {}", expected, found),
            (expected.as_function().is_some()
                && found.as_function().is_some()
                && expected.is_async() != found.is_async())
            .then(|| "Plain and async functions are different types".to_string()),
        ),
        TypeErrorKind::PairExpected { found } => (
            format!("this has type {}, which is not a pair", found),
            None,
        ),
    };
    build(source_id, error.kind.to_string(), Some(error.span), hint, help)
}

/// Print a syntax error using ariadne formatting
pub fn eprint_syntax(error: &SyntaxError, source_id: &str, source: &str) {
    if syntax_report(error, source_id)
        .eprint((source_id, Source::from(source)))
        .is_err()
    {
        eprintln!("{}", error);
    }
}

/// Print a type error using ariadne formatting
pub fn eprint_type(error: &TypeError, source_id: &str, source: &str) {
    if type_report(error, source_id)
        .eprint((source_id, Source::from(source)))
        .is_err()
    {
        eprintln!("{}", error);
    }
}
