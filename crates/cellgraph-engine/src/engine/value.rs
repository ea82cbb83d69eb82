//! Observable cell results.

use std::fmt;

use super::format::format_number;

/// A formula evaluation error. These are values, not failures: they are
/// cached and read by dependent formulas like any other result.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum EvalError {
    /// Reference to a position outside the sheet.
    Ref,
    /// Operand of the wrong kind (e.g. non-numeric text in arithmetic).
    Value,
    /// Division by zero or another non-finite arithmetic result.
    Div0,
}

impl EvalError {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvalError::Ref => "#REF!",
            EvalError::Value => "#VALUE!",
            EvalError::Div0 => "#DIV/0!",
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of a cell: text, a number or an evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Error(EvalError),
}

impl Value {
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<EvalError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<EvalError> for Value {
    fn from(e: EvalError) -> Self {
        Value::Error(e)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}
