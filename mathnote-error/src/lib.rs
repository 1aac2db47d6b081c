//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

// lets `#[derive(ErrorKind)]` refer to this crate by name in its own tests
#[cfg(test)]
extern crate self as mathnote_error;

use ariadne::{Color, Report};
use std::{any::Any, fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// This trait is usually derived with `mathnote_attrs::ErrorKind`.
pub trait ErrorKind: Debug + Send {
    /// Returns the error as [`Any`], so that callers can inspect the concrete error kind with
    /// [`Any::downcast_ref`].
    fn as_any(&self) -> &dyn Any;

    /// The short, user-facing message of this error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns the concrete error kind if it is of type `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// The short, user-facing message of this error.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne::Source;
    use mathnote_attrs::ErrorKind;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("`{}` is not defined", name),
        labels = ["this name"],
        help = "define it first",
    )]
    struct Undefined {
        name: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "something went wrong")]
    struct Generic;

    #[test]
    fn message_uses_fields() {
        let err = Error::new(vec![0..3], Undefined { name: "foo".to_string() });
        assert_eq!(err.message(), "`foo` is not defined");
        assert_eq!(err.to_string(), "`foo` is not defined");
    }

    #[test]
    fn downcast_to_concrete_kind() {
        let err = Error::new(vec![], Generic);
        assert_eq!(err.downcast_ref::<Generic>(), Some(&Generic));
        assert!(err.downcast_ref::<Undefined>().is_none());
    }

    #[test]
    fn report_contains_message_and_help() {
        let src = "foo + 1";
        let err = Error::new(vec![0..3], Undefined { name: "foo".to_string() });

        let mut buf = Vec::new();
        err.build_report("input")
            .write(("input", Source::from(src)), &mut buf)
            .unwrap();
        let rendered = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();

        assert!(rendered.contains("`foo` is not defined"));
        assert!(rendered.contains("this name"));
        assert!(rendered.contains("define it first"));
    }

    #[test]
    fn report_without_spans() {
        let err = Error::new(vec![], Generic);
        let mut buf = Vec::new();
        err.build_report("input")
            .write(("input", Source::from("")), &mut buf)
            .unwrap();
        let rendered = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(rendered.contains("something went wrong"));
    }
}
