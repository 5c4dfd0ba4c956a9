use std::{io::Write, unreachable};

use cursor::Line;
use errors::{Diagnostics, LoxErrors, Reporter, RuntimeReport};
use parser::Expr;
use scanner::TokenData;

mod value;
pub use value::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandMustBeNumber { line: Line, operand: Value },
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers { line: Line, left: Value, right: Value },
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings { line: Line, left: Value, right: Value },
}

impl RuntimeError {
    /// Line of the operator that failed.
    pub fn line(&self) -> Line {
        match self {
            RuntimeError::OperandMustBeNumber { line, .. }
            | RuntimeError::OperandsMustBeNumbers { line, .. }
            | RuntimeError::OperandsMustBeNumbersOrStrings { line, .. } => *line,
        }
    }
}

impl From<&RuntimeError> for RuntimeReport {
    fn from(error: &RuntimeError) -> Self {
        RuntimeReport { line: error.line(), message: error.to_string() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("{0}")]
    CompileError(LoxErrors),
    #[error("{}", RuntimeReport::from(.0))]
    RuntimeError(RuntimeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<RuntimeError> for InterpretError {
    fn from(v: RuntimeError) -> Self {
        Self::RuntimeError(v)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Scans, parses and evaluates `source`, writing the resulting value to `output`.
    ///
    /// Nothing is evaluated if scanning or parsing reported any error.
    pub fn run_source(&self, source: &str, output: &mut impl Write) -> Result<(), InterpretError> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scanner::scan(source, &mut diagnostics);
        let expr = match parser::parse(tokens, &mut diagnostics) {
            Ok(expr) if !diagnostics.had_error() => expr,
            _ => return Err(InterpretError::CompileError(diagnostics.take_errors())),
        };

        let value = self.evaluate(&expr)?;
        writeln!(output, "{value}")?;
        Ok(())
    }

    /// Evaluates `expr`, handing a runtime error to `reporter` instead of returning it.
    pub fn interpret(&self, expr: &Expr, reporter: &mut dyn Reporter) -> Option<Value> {
        match self.evaluate(expr) {
            Ok(value) => Some(value),
            Err(e) => {
                reporter.runtime_error((&e).into());
                None
            }
        }
    }

    /// Evaluates both operands of a node before applying its operator, the first failure
    /// aborts the whole evaluation. `expr` is never modified and can be evaluated again.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        let value = match expr {
            Expr::Literal(literal) => literal.into(),

            Expr::Grouping(expr) => self.evaluate(expr)?,

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match (&operator.data, right) {
                    (TokenData::Minus, Value::Number(n)) => (-n).into(),
                    (TokenData::Minus, v) => {
                        return Err(RuntimeError::OperandMustBeNumber {
                            line: operator.line,
                            operand: v,
                        })
                    }
                    (TokenData::Bang, v) => (!v.is_truthy()).into(),
                    _ => unreachable!("Not a unary operator: {operator}"),
                }
            }

            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let line = operator.line;
                match (&left, &right, &operator.data) {
                    (Value::Number(l), Value::Number(r), TokenData::Minus) => (l - r).into(),
                    (Value::Number(l), Value::Number(r), TokenData::Slash) => (l / r).into(),
                    (Value::Number(l), Value::Number(r), TokenData::Star) => (l * r).into(),
                    (Value::Number(l), Value::Number(r), TokenData::Plus) => (l + r).into(),
                    (Value::Str(l), Value::Str(r), TokenData::Plus) => format!("{l}{r}").into(),

                    (Value::Number(l), Value::Number(r), TokenData::Greater) => (l > r).into(),
                    (Value::Number(l), Value::Number(r), TokenData::GreaterEqual) => {
                        (l >= r).into()
                    }
                    (Value::Number(l), Value::Number(r), TokenData::Less) => (l < r).into(),
                    (Value::Number(l), Value::Number(r), TokenData::LessEqual) => {
                        (l <= r).into()
                    }

                    (_, _, TokenData::EqualEqual) => left.eq_in_lox(&right).into(),
                    (_, _, TokenData::BangEqual) => (!left.eq_in_lox(&right)).into(),

                    (_, _, TokenData::Plus) => {
                        return Err(RuntimeError::OperandsMustBeNumbersOrStrings {
                            line,
                            left,
                            right,
                        })
                    }
                    (
                        _,
                        _,
                        TokenData::Minus
                        | TokenData::Slash
                        | TokenData::Star
                        | TokenData::Greater
                        | TokenData::GreaterEqual
                        | TokenData::Less
                        | TokenData::LessEqual,
                    ) => return Err(RuntimeError::OperandsMustBeNumbers { line, left, right }),

                    _ => unreachable!("Not a binary operator: {operator}"),
                }
            }
        };

        log::trace!("{expr} => {value}");
        Ok(value)
    }
}
