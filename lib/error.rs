use thiserror::Error;

/// Error raised by evaluation and by the built-in procedures. Carries a
/// single human-readable reason; the `Error: ` prefix is applied by the
/// `Display` impl so call sites only supply the reason text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Error: {0}")]
pub struct SemanticError(pub String);

impl SemanticError {
    pub fn reason(&self) -> &str { &self.0 }
}

pub type SemanticResult<T> = Result<T, SemanticError>;

#[macro_export]
macro_rules! serr(
    ( $reason:literal ) => {
        $crate::error::SemanticError($reason.into())
    }
);

#[macro_export]
macro_rules! serr_fmt(
    ( $($arg:tt)* ) => {
        $crate::error::SemanticError(format!($($arg)*))
    }
);

/// Failure modes of the tokenizer and parser. The interpreter facade folds
/// these into its boolean contract; they stay distinct here so tests can
/// pin down which rule rejected the input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected ')'")]
    UnexpectedClose,
    #[error("missing closing ')'")]
    MissingClose,
    #[error("missing closing '\"'")]
    UnterminatedString,
    #[error("empty form '()'")]
    EmptyForm,
    #[error("compound form must begin with an atom")]
    CompoundHead,
    #[error("malformed atom '{0}'")]
    BadAtom(String),
    #[error("unexpected trailing input after expression")]
    TrailingInput,
    #[error("empty input")]
    EmptyInput,
}

pub type ParseResult<T> = Result<T, ParseError>;
