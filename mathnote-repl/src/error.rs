use ariadne::Source;
use mathnote_notation::operation::OperationError;
use std::io::{self, Write};

/// Writes a report of the error to `out`.
///
/// Parsing errors are rendered with [`ariadne`], pointing at the offending part of the input. The
/// `ariadne` crate's [`Report`](ariadne::Report) type does not implement `Display`, so other
/// errors are written as plain text.
pub fn write_report(err: &OperationError, mut out: impl Write) -> io::Result<()> {
    match err {
        OperationError::Parsing(err) => err.error
            .build_report("input")
            .write(("input", Source::from(&err.input)), out),
        OperationError::Computation(err) => writeln!(out, "Error: {}", err.message()),
        err => writeln!(out, "{}: {}", err.kind(), err.message()),
    }
}

/// Reports the error to stderr.
pub fn report_to_stderr(err: &OperationError) {
    if let Err(io_err) = write_report(err, io::stderr()) {
        eprintln!("{} (could not write report: {})", err, io_err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;
    use pretty_assertions::assert_eq;

    fn render(err: &OperationError) -> String {
        let mut buf = Vec::new();
        write_report(err, &mut buf).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    fn failing(line: &str) -> OperationError {
        let command = parse_command(line).unwrap();
        command.operation.run(&command.args).unwrap_err()
    }

    #[test]
    fn parsing_errors_point_at_input() {
        let rendered = render(&failing("2 $ 3"));
        assert!(rendered.contains("$ is an invalid character"));
        assert!(rendered.contains("2 $ 3"));
        assert!(rendered.contains("this character"));
    }

    #[test]
    fn other_errors_are_plain() {
        let err = OperationError::UnknownOperation("frobnicate".to_string());
        assert_eq!(render(&err), "UnknownOperation: Unknown operation: frobnicate\n");

        let rendered = render(&failing("integrate_indefinite: x^x; x"));
        assert!(rendered.starts_with("Error: cannot find the integral of"));
    }
}
