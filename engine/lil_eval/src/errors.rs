//! Evaluation failures.

use thiserror::Error;

/// First failure during a script run.
///
/// Evaluation short-circuits on the first error; the scene sees no further
/// side effects from the failed run past the failure point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A form reached past the end of its argument list.
    #[error("{form}: missing argument {index}")]
    MissingArg { form: &'static str, index: u32 },
    /// An argument position evaluated to nothing (a statement form).
    #[error("{form}: argument {index} produced no value")]
    NoValue { form: &'static str, index: u32 },
    /// An argument had the wrong type.
    #[error("{form}: expected {expected}, got {got}")]
    TypeMismatch {
        form: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    /// Binary arithmetic over mixed or non-numeric operand types.
    #[error("{form}: unsupported operand types {lhs} and {rhs}")]
    UnsupportedOperands {
        form: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    /// An empty node with no child; the grammar only produces these as
    /// trailing leftovers that well-formed scripts never reach.
    #[error("empty expression")]
    EmptyExpression,
    #[error("format string ends with %")]
    FormatTrailingPercent,
    #[error("unknown format conversion %{0}")]
    FormatUnknownConversion(char),
    #[error("not enough arguments for format string")]
    FormatMissingArguments,
}
