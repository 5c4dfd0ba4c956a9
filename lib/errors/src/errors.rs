use std::{
    fmt::{self, Display, Formatter},
    ops::{Deref, DerefMut},
};

use cursor::Line;
use itertools::Itertools;

/// Where on its line a static error occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Scan errors only know their line.
    Unspecified,
    AtEnd,
    /// At the token with the given lexeme.
    At(String),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unspecified => Ok(()),
            Location::AtEnd => write!(f, " at end"),
            Location::At(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

/// A scan or parse error, rendered the way the user sees it.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{location}: {message}")]
pub struct LoxError {
    pub line: Line,
    pub location: Location,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, location: Location, message: impl ToString) -> Self {
        Self { line, location, message: message.to_string() }
    }
}

#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

/// A failed evaluation, rendered the way the user sees it.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeReport {
    pub line: Line,
    pub message: String,
}

/// Sink for everything that goes wrong while running a piece of source.
///
/// Every stage reports its errors here before returning, the driver then
/// decides whether to continue with the next stage.
pub trait Reporter {
    fn error(&mut self, error: LoxError);
    fn runtime_error(&mut self, error: RuntimeReport);
}

/// A [`Reporter`] that keeps everything it was told.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: LoxErrors,
    runtime_errors: Vec<RuntimeReport>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn had_runtime_error(&self) -> bool {
        !self.runtime_errors.is_empty()
    }

    pub fn errors(&self) -> &LoxErrors {
        &self.errors
    }

    pub fn runtime_errors(&self) -> &[RuntimeReport] {
        &self.runtime_errors
    }

    /// Hands out the static errors collected so far, leaving none behind.
    pub fn take_errors(&mut self) -> LoxErrors {
        std::mem::take(&mut self.errors)
    }

    /// Forgets all errors, e.g. between two REPL lines.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.runtime_errors.clear();
    }
}

impl Reporter for Diagnostics {
    fn error(&mut self, error: LoxError) {
        self.errors.push(error);
    }

    fn runtime_error(&mut self, error: RuntimeReport) {
        self.runtime_errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn render_static_errors() {
        let errors = LoxErrors(vec![
            LoxError::new(Line(1), Location::Unspecified, "Unexpected character."),
            LoxError::new(Line(2), Location::At(")".to_string()), "Expected expression."),
            LoxError::new(Line(3), Location::AtEnd, "Expected ')' after expression."),
        ]);

        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unexpected character.\n\
             [line 2] Error at ')': Expected expression.\n\
             [line 3] Error at end: Expected ')' after expression."
        );
    }

    #[test]
    fn render_runtime_error() {
        let report = RuntimeReport { line: Line(4), message: "Operands must be numbers.".into() };
        assert_eq!(report.to_string(), "Operands must be numbers.\n[line 4]");
    }

    #[test]
    fn diagnostics_track_flags() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.had_error());
        assert!(!diagnostics.had_runtime_error());

        diagnostics.error(LoxError::new(Line(1), Location::AtEnd, "Expected expression."));
        assert!(diagnostics.had_error());
        assert!(!diagnostics.had_runtime_error());

        diagnostics.runtime_error(RuntimeReport { line: Line(1), message: "boom".into() });
        assert!(diagnostics.had_runtime_error());
        assert_eq!(diagnostics.runtime_errors().len(), 1);

        let taken = diagnostics.take_errors();
        assert_eq!(taken.len(), 1);
        assert!(!diagnostics.had_error());

        diagnostics.reset();
        assert!(!diagnostics.had_runtime_error());
    }
}
