//! Error types for the parser and the evaluator.
//!
//! Chef errors come in two families, mirroring the two passes of the
//! interpreter: [`SyntaxError`] from the parser, [`RuntimeError`] from the
//! evaluator. Both wrap a `thiserror`-derived `*Kind` enum together with the
//! source line number the problem was found on, when one is known.

use thiserror::Error;

/// Which kind of container a container-addressing error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContainerKind {
    MixingBowl,
    BakingDish,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContainerKind::MixingBowl => "mixing bowl",
            ContainerKind::BakingDish => "baking dish",
        };
        f.write_str(s)
    }
}

/// A syntax error raised while parsing a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub lineno: Option<u32>,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, lineno: Option<u32>) -> Self {
        Self { lineno, kind }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind, line_suffix(self.lineno))
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// The specific problem behind a [`SyntaxError`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    #[error("missing title")]
    MissingTitle,
    #[error("missing trailing full stop")]
    MissingTrailingFullStop,
    #[error("missing blank line")]
    MissingBlankLine,
    #[error("invalid cooking time")]
    InvalidCookingTime,
    #[error("invalid oven temperature")]
    InvalidOvenTemperature,
    #[error(
        "invalid measure type value {measure_type:?}; only \"heaped\" and \"level\" are allowed"
    )]
    InvalidMeasureType { measure_type: String },
    #[error("the measure {measure:?} and the measure type {measure_type:?} do not form a valid measure declaration")]
    NonMatchingMeasureType { measure: String, measure_type: String },
    #[error("the time {time} is too low; only positive values are allowed")]
    NotAllowedTime { time: i64 },
    #[error("not a valid ordinal identifier: {text:?}")]
    OrdinalIdentifier { text: String },
    #[error("the number {number} and the suffix {suffix:?} do not form a valid ordinal identifier")]
    NonMatchingSuffix { number: u32, suffix: String },
    #[error("the number {number} and the unit {unit:?} do not form a valid cooking time")]
    NonMatchingUnit { number: u32, unit: String },
    #[error("invalid time declaration: '{hours} {unit}'")]
    InvalidTimeDeclaration { hours: u32, unit: String },
    #[error("invalid command {command:?}")]
    InvalidCommand { command: String },
    #[error("missing method section")]
    MissingMethod,
    #[error("unexpected content after the recipe's method/serves section")]
    TrailingContent,
}

/// A runtime error raised while evaluating a parsed recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub lineno: Option<u32>,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub(crate) fn new(kind: RuntimeErrorKind, lineno: Option<u32>) -> Self {
        Self { lineno, kind }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind, line_suffix(self.lineno))
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// The specific problem behind a [`RuntimeError`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("invalid input: {input:?}")]
    InvalidInput { input: String },
    #[error("undefined ingredient: {name:?}")]
    UndefinedIngredient { name: String },
    #[error("invalid ordinal identifier for {kind}: {id}")]
    InvalidContainerId { kind: ContainerKind, id: i64 },
    #[error("the {kind} #{id} does not exist")]
    NonExistingContainer { kind: ContainerKind, id: usize },
    #[error("the {kind} #{id} is empty")]
    EmptyContainer { kind: ContainerKind, id: usize },
    #[error("the loop with the verb {verb:?} does not have a matching until-statement")]
    MissingLoopEnd { verb: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("I/O error: {0}")]
    Io(String),
}

/// Formats the `(line N)` suffix shared by every error's [`Display`] impl.
pub(crate) fn line_suffix(lineno: Option<u32>) -> String {
    match lineno {
        Some(n) => format!(" (line {n})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_includes_line() {
        let err = SyntaxError::new(SyntaxErrorKind::MissingTitle, Some(1));
        assert_eq!(err.to_string(), "missing title (line 1)");
    }

    #[test]
    fn syntax_error_display_without_line() {
        let err = SyntaxError::new(SyntaxErrorKind::MissingMethod, None);
        assert_eq!(err.to_string(), "missing method section");
    }

    #[test]
    fn runtime_error_display_includes_line() {
        let err = RuntimeError::new(
            RuntimeErrorKind::UndefinedIngredient {
                name: "sugar".into(),
            },
            Some(12),
        );
        assert_eq!(err.to_string(), "undefined ingredient: \"sugar\" (line 12)");
    }
}
