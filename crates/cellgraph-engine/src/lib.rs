//! cellgraph_engine - Positions, values and Rhai-backed formulas.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use std::collections::HashMap;
    use std::hash::{DefaultHasher, Hash, Hasher};

    struct Cells(HashMap<Position, Value>);

    impl CellLookup for Cells {
        fn cell_value(&self, pos: Position) -> Option<Value> {
            self.0.get(&pos).cloned()
        }
    }

    fn cells(entries: &[(&str, Value)]) -> Cells {
        Cells(
            entries
                .iter()
                .map(|(name, value)| (Position::from_a1(name), value.clone()))
                .collect(),
        )
    }

    fn eval(expression: &str, lookup: &Cells) -> Result<f64, EvalError> {
        FormulaEngine::new().parse(expression).unwrap().evaluate(lookup)
    }

    fn hash_of(pos: Position) -> u64 {
        let mut hasher = DefaultHasher::new();
        pos.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_from_a1_single_letter_columns() {
        let a1 = Position::from_a1("A1");
        assert_eq!(a1.row, 0);
        assert_eq!(a1.col, 0);

        let b1 = Position::from_a1("B1");
        assert_eq!(b1.row, 0);
        assert_eq!(b1.col, 1);

        let z1 = Position::from_a1("Z1");
        assert_eq!(z1.col, 25);
    }

    #[test]
    fn test_from_a1_multi_letter_columns() {
        assert_eq!(Position::from_a1("AA1").col, 26);
        assert_eq!(Position::from_a1("AB1").col, 27);
        assert_eq!(Position::from_a1("AZ1").col, 51);
        assert_eq!(Position::from_a1("BA1").col, 52);
    }

    #[test]
    fn test_from_a1_row_numbers() {
        assert_eq!(Position::from_a1("A1").row, 0);
        assert_eq!(Position::from_a1("A10").row, 9);
        assert_eq!(Position::from_a1("A100").row, 99);
    }

    #[test]
    fn test_from_a1_invalid_inputs() {
        for name in ["", "123", "ABC", "A0", "1A", "A 1", "a1", "A-1"] {
            let pos = Position::from_a1(name);
            assert_eq!(pos, Position::NONE, "{name:?}");
            assert!(!pos.is_valid());
        }
    }

    #[test]
    fn test_from_a1_bounds() {
        assert!(Position::from_a1("XFD16384").is_valid());
        assert!(!Position::from_a1("XFE1").is_valid());
        assert!(!Position::from_a1("A16385").is_valid());
        assert!(!Position::from_a1("A99999999999999999999").is_valid());
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["A1", "Z9", "AA10", "XFD16384"] {
            assert_eq!(Position::from_a1(name).to_string(), name);
        }
        assert_eq!(Position::NONE.to_string(), "");
        assert_eq!(Position::new(4, 27).to_string(), "AB5");
    }

    #[test]
    fn test_col_to_letters() {
        assert_eq!(Position::col_to_letters(0), "A");
        assert_eq!(Position::col_to_letters(701), "ZZ");
        assert_eq!(Position::col_to_letters(Position::NONE.col), "");
        assert_eq!(Position::col_to_letters(i32::MIN), "");
    }

    #[test]
    fn test_from_str_rejects_invalid() {
        assert_eq!("C3".parse::<Position>(), Ok(Position::new(2, 2)));
        assert!("C0".parse::<Position>().is_err());
        assert!("hello".parse::<Position>().is_err());
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_ne!(hash_of(Position::new(1, 2)), hash_of(Position::new(2, 1)));
        assert_eq!(hash_of(Position::new(3, 7)), hash_of(Position::new(3, 7)));
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut positions = vec![
            Position::from_a1("B1"),
            Position::from_a1("A2"),
            Position::from_a1("A1"),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::from_a1("A1"),
                Position::from_a1("B1"),
                Position::from_a1("A2")
            ]
        );
    }

    #[test]
    fn test_extract_references_empty() {
        assert!(extract_references("").is_empty());
        assert!(extract_references("10 + 20").is_empty());
    }

    #[test]
    fn test_extract_references_in_order_with_duplicates() {
        let deps = extract_dependencies("B2 + A1 * B2");
        assert_eq!(
            deps,
            vec![Position::new(1, 1), Position::new(0, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_extract_references_ignores_strings_and_lowercase() {
        assert!(extract_references(r#""A1" + a1"#).is_empty());
        assert!(extract_references(r#""say \"B2\"""#).is_empty());
        assert_eq!(extract_dependencies(r#"len("C3") + C4"#), vec![Position::new(3, 2)]);
    }

    #[test]
    fn test_extract_references_ignores_backtick_strings() {
        assert!(extract_references("`B1`.len()").is_empty());
        assert!(extract_references(r"`C\`.len() + `D2`.len()").is_empty());
        assert_eq!(extract_dependencies("`x` + E5"), vec![Position::new(4, 4)]);
    }

    #[test]
    fn test_extract_references_keeps_out_of_range_names() {
        let refs = extract_references("XFE1 + A1");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "XFE1");
        assert!(!refs[0].position.is_valid());
        assert!(refs[1].position.is_valid());
    }

    #[test]
    fn test_parse_reports_references_and_canonical_text() {
        let formula = FormulaEngine::new().parse("  A1 + B1 * A1 ").unwrap();
        assert_eq!(formula.expression(), "A1 + B1 * A1");
        assert_eq!(
            formula.referenced_cells(),
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 0)]
        );
    }

    #[test]
    fn test_parse_syntax_errors() {
        let engine = FormulaEngine::new();
        for bad in ["", "   ", "1 +", "(A1", "foo + 1", "let x = 1", "A1 +* 2"] {
            assert!(
                matches!(engine.parse(bad), Err(FormulaError::Syntax(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_evaluate_arithmetic() {
        let empty = cells(&[]);
        assert_eq!(eval("1 + 2 * 3", &empty), Ok(7.0));
        assert_eq!(eval("(1 + 2) * 3", &empty), Ok(9.0));
        assert_eq!(eval("7.0 / 2", &empty), Ok(3.5));
        assert_eq!(eval("-4 + 1", &empty), Ok(-3.0));
    }

    #[test]
    fn test_evaluate_integer_literals_as_floats() {
        let empty = cells(&[]);
        assert_eq!(eval("1 / 2", &empty), Ok(0.5));
        assert_eq!(eval("7 / 2", &empty), Ok(3.5));
        assert_eq!(eval("9223372036854775807 + 1", &empty), Ok(9_223_372_036_854_775_808.0));
        assert_eq!(eval("99999999999999999999 * 10", &empty), Ok(1e21));
        assert_eq!(eval("0 / 0", &empty), Err(EvalError::Div0));
    }

    #[test]
    fn test_canonical_text_keeps_integer_literals() {
        let formula = FormulaEngine::new().parse("7 / 2").unwrap();
        assert_eq!(formula.expression(), "7 / 2");
    }

    #[test]
    fn test_evaluate_references() {
        let lookup = cells(&[("A1", Value::Number(5.0)), ("B1", Value::from("2.5"))]);
        assert_eq!(eval("A1 + 1", &lookup), Ok(6.0));
        assert_eq!(eval("A1 * B1", &lookup), Ok(12.5));
        assert_eq!(eval("A1 + A1", &lookup), Ok(10.0));
    }

    #[test]
    fn test_evaluate_missing_and_empty_cells_are_zero() {
        let lookup = cells(&[("A1", Value::empty())]);
        assert_eq!(eval("A1 + C9 + 1", &lookup), Ok(1.0));
    }

    #[test]
    fn test_evaluate_non_numeric_text_is_value_error() {
        let lookup = cells(&[("A1", Value::from("hello"))]);
        assert_eq!(eval("A1 + 1", &lookup), Err(EvalError::Value));

        let lookup = cells(&[("A1", Value::from("nan"))]);
        assert_eq!(eval("A1", &lookup), Err(EvalError::Value));
    }

    #[test]
    fn test_evaluate_errors_are_contagious() {
        let lookup = cells(&[("A1", Value::Error(EvalError::Div0))]);
        assert_eq!(eval("A1 * 0 + 1", &lookup), Err(EvalError::Div0));
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        let lookup = cells(&[("A1", Value::Number(1.0))]);
        assert_eq!(eval("1 / 0", &lookup), Err(EvalError::Div0));
        assert_eq!(eval("A1 / 0", &lookup), Err(EvalError::Div0));
    }

    #[test]
    fn test_evaluate_out_of_range_reference() {
        assert_eq!(eval("XFE1 + 1", &cells(&[])), Err(EvalError::Ref));
    }

    #[test]
    fn test_evaluate_non_numeric_result() {
        assert_eq!(eval(r#""text""#, &cells(&[])), Err(EvalError::Value));
        assert_eq!(eval("1 < 2", &cells(&[])), Err(EvalError::Value));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(12.0).to_string(), "12");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::Error(EvalError::Ref).to_string(), "#REF!");
        assert_eq!(Value::Error(EvalError::Value).to_string(), "#VALUE!");
        assert_eq!(Value::Error(EvalError::Div0).to_string(), "#DIV/0!");
    }

    #[test]
    fn test_value_variants_do_not_coerce() {
        assert_ne!(Value::Number(123.0), Value::from("123"));
        assert_eq!(Value::from("123").as_number(), None);
        assert_eq!(Value::empty(), Value::Text(String::new()));
        assert_eq!(Value::from("abc").as_text(), Some("abc"));
        assert_eq!(Value::Number(1.0).as_text(), None);
        assert_eq!(Value::from(EvalError::Div0).as_error(), Some(EvalError::Div0));
    }

    #[test]
    fn test_config_from_toml_uses_defaults_for_missing_fields() {
        let config: FormulaConfig = toml::from_str("max_operations = 10").unwrap();
        assert_eq!(config.max_operations, 10);
        assert_eq!(config.max_expr_depth, FormulaConfig::default().max_expr_depth);

        assert!(toml::from_str::<FormulaConfig>("unknown = 1").is_err());
    }

    #[test]
    fn test_config_limits_expression_depth() {
        let config = FormulaConfig {
            max_expr_depth: 4,
            ..FormulaConfig::default()
        };
        let engine = FormulaEngine::with_config(&config);
        let nested = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(engine.parse(&nested).is_err());
        assert!(FormulaEngine::new().parse(&nested).is_ok());
    }
}
