use serde::Deserialize;

/// Resource limits applied to the Rhai engine that evaluates formulas.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormulaConfig {
    /// Maximum nesting depth of a formula expression.
    pub max_expr_depth: usize,
    /// Maximum number of operations a single evaluation may perform (0 = unlimited).
    pub max_operations: u64,
    /// Maximum length of any string produced during evaluation (0 = unlimited).
    pub max_string_size: usize,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        FormulaConfig {
            max_expr_depth: 64,
            max_operations: 100_000,
            max_string_size: 65_536,
        }
    }
}
