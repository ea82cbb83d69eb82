//! Cell data structures for the sheet.
//!
//! This module provides the core data types for representing cells:
//! - [`Content`] - What a cell holds (empty, literal text, or formula)
//! - [`Cell`] - Content plus its dependency edges and memoized value

use rustc_hash::FxHashSet;
use std::cell::OnceCell;

use cellgraph_engine::engine::{CellLookup, Formula, FormulaEngine, FormulaError, Position, Value};

/// Leading character that marks input as a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces input to be treated as literal text.
pub const ESCAPE_SIGN: char = '\'';

/// The content stored in a cell.
#[derive(Clone, Debug, Default)]
pub enum Content {
    #[default]
    Empty,
    /// Raw text as entered, including any leading escape sign.
    Text(String),
    Formula(Formula),
}

impl Content {
    /// Parse user input into content.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula (parsed now)
    /// - Anything else -> Text, kept verbatim
    pub fn from_input(input: &str, engine: &FormulaEngine) -> Result<Content, FormulaError> {
        if input.is_empty() {
            return Ok(Content::Empty);
        }

        if let Some(expression) = input.strip_prefix(FORMULA_SIGN)
            && !expression.is_empty()
        {
            return engine.parse(expression).map(Content::Formula);
        }

        Ok(Content::Text(input.to_string()))
    }

    /// Compute the value now. Formulas read referenced cells through `cells`.
    pub fn value(&self, cells: &dyn CellLookup) -> Value {
        match self {
            Content::Empty => Value::empty(),
            Content::Text(s) => {
                Value::Text(s.strip_prefix(ESCAPE_SIGN).unwrap_or(s).to_string())
            }
            Content::Formula(formula) => match formula.evaluate(cells) {
                Ok(n) => Value::Number(n),
                Err(e) => Value::Error(e),
            },
        }
    }

    /// Text form for editing: the raw text, or `=` plus the formula's canonical form.
    pub fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(s) => s.clone(),
            Content::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Positions this content references, as reported by the formula.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            Content::Formula(formula) => formula.referenced_cells(),
            Content::Empty | Content::Text(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

/// A cell in the sheet.
///
/// Edges are stored on both ends: `outgoing` holds the cells this cell's
/// formula reads, `incoming` holds the cells whose formulas read this one.
/// Only [`Sheet`](super::Sheet) mutates them, keeping both sides in sync.
#[derive(Debug, Default)]
pub struct Cell {
    pub(crate) content: Content,
    pub(crate) outgoing: FxHashSet<Position>,
    pub(crate) incoming: FxHashSet<Position>,
    /// Memoized value. Cleared only by the sheet's invalidation walk.
    pub(crate) cache: OnceCell<Value>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Referenced positions, valid only, sorted and deduplicated.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut refs: Vec<Position> = self
            .content
            .referenced_cells()
            .into_iter()
            .filter(Position::is_valid)
            .collect();
        refs.sort_unstable();
        refs.dedup();
        refs
    }

    /// True if this cell reads or is read by another cell.
    pub fn is_referenced(&self) -> bool {
        !self.outgoing.is_empty() || !self.incoming.is_empty()
    }

    /// Cells this cell's formula reads.
    pub fn outgoing(&self) -> impl Iterator<Item = Position> + '_ {
        self.outgoing.iter().copied()
    }

    /// Cells whose formulas read this cell.
    pub fn incoming(&self) -> impl Iterator<Item = Position> + '_ {
        self.incoming.iter().copied()
    }

    /// The memoized value, if one is currently held.
    pub fn cached_value(&self) -> Option<&Value> {
        self.cache.get()
    }

    pub(crate) fn invalidate(&mut self) -> bool {
        self.cache.take().is_some()
    }
}
