//! Rhai-backed formulas.
//!
//! A formula is a Rhai expression in which A1-style references appear as bare
//! identifiers (`A1 + B2 * 2`). Parsing compiles the expression once with
//! every reference declared in the scope and strict variables enabled, so an
//! unknown identifier is a syntax error rather than a runtime surprise.
//! Evaluation binds each reference to a number read through [`CellLookup`].
//! Integer literals compile as floats, so `7 / 2` is `3.5`.

use rhai::{Dynamic, Engine, EvalAltResult, Scope, AST};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::config::FormulaConfig;
use super::deps::{Reference, extract_references};
use super::position::Position;
use super::preprocess::float_literals;
use super::value::{EvalError, Value};

/// Errors raised while turning text into a [`Formula`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Syntax error: {0}")]
    Syntax(String),
}

/// Read-only view of the cells a formula may reference.
pub trait CellLookup {
    /// The current value at `pos`, or `None` if no cell exists there.
    fn cell_value(&self, pos: Position) -> Option<Value>;
}

/// Parses formula text into evaluable [`Formula`] objects.
///
/// Cloning is cheap; all formulas share the same underlying Rhai engine.
#[derive(Clone)]
pub struct FormulaEngine {
    engine: Arc<Engine>,
}

impl FormulaEngine {
    pub fn new() -> Self {
        Self::with_config(&FormulaConfig::default())
    }

    pub fn with_config(config: &FormulaConfig) -> Self {
        FormulaEngine {
            engine: Arc::new(create_engine(config)),
        }
    }

    /// Parse an expression (without the leading `=`).
    pub fn parse(&self, expression: &str) -> Result<Formula, FormulaError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(FormulaError::Syntax("empty expression".to_string()));
        }

        let references = extract_references(expression);

        let mut scope = Scope::new();
        for reference in &references {
            if !scope.contains(&reference.name) {
                scope.push_dynamic(reference.name.clone(), Dynamic::UNIT);
            }
        }

        let ast = self
            .engine
            .compile_expression_with_scope(&scope, &float_literals(expression))
            .map_err(|e| FormulaError::Syntax(e.to_string()))?;

        Ok(Formula {
            engine: Arc::clone(&self.engine),
            ast,
            expression: expression.to_string(),
            references,
        })
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormulaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaEngine").finish_non_exhaustive()
    }
}

/// Create a Rhai engine configured for formula evaluation.
pub fn create_engine(config: &FormulaConfig) -> Engine {
    let mut engine = Engine::new();
    engine.set_strict_variables(true);
    engine.set_max_expr_depths(config.max_expr_depth, config.max_expr_depth);
    engine.set_max_operations(config.max_operations);
    engine.set_max_string_size(config.max_string_size);
    engine
}

/// A parsed formula.
#[derive(Clone)]
pub struct Formula {
    engine: Arc<Engine>,
    ast: AST,
    expression: String,
    references: Vec<Reference>,
}

impl Formula {
    /// Canonical text of the expression (without the leading `=`).
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Referenced positions in order of appearance. May contain duplicates
    /// and invalid positions.
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.references.iter().map(|r| r.position).collect()
    }

    /// Evaluate against `cells`. Errors in referenced cells propagate.
    pub fn evaluate(&self, cells: &dyn CellLookup) -> Result<f64, EvalError> {
        let mut scope = Scope::new();
        for reference in &self.references {
            if scope.contains(&reference.name) {
                continue;
            }
            let operand = resolve_operand(cells, reference.position)?;
            scope.push(reference.name.clone(), operand);
        }

        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map_err(|e| classify_error(&e))?;

        to_number(&result)
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

/// Read a referenced cell in numeric context.
fn resolve_operand(cells: &dyn CellLookup, pos: Position) -> Result<f64, EvalError> {
    if !pos.is_valid() {
        return Err(EvalError::Ref);
    }
    match cells.cell_value(pos) {
        None => Ok(0.0),
        Some(Value::Number(n)) => Ok(n),
        Some(Value::Error(e)) => Err(e),
        Some(Value::Text(s)) if s.is_empty() => Ok(0.0),
        Some(Value::Text(s)) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(EvalError::Value),
        },
    }
}

fn classify_error(err: &EvalAltResult) -> EvalError {
    match err {
        EvalAltResult::ErrorArithmetic(..) => EvalError::Div0,
        _ => EvalError::Value,
    }
}

fn to_number(result: &Dynamic) -> Result<f64, EvalError> {
    if let Ok(n) = result.as_float() {
        if n.is_finite() {
            Ok(n)
        } else {
            Err(EvalError::Div0)
        }
    } else if let Ok(n) = result.as_int() {
        Ok(n as f64)
    } else {
        Err(EvalError::Value)
    }
}
