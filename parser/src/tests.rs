//! FILENAME: parser/src/tests.rs
//! PURPOSE: Consolidated end-to-end tests for the full compile pipeline.
//! Stage-specific tests live alongside each stage's module.

use crate::ast::{BuiltinFunction, Component};
use crate::coord::Coordinates;
use crate::token::Operator;
use crate::{compile, FormulaError};

fn cell(id: &str) -> Coordinates {
    Coordinates::from_id(id).unwrap()
}

#[test]
fn compiles_plain_number() {
    assert_eq!(compile("42").unwrap(), vec![Component::Number(42.0)]);
}

#[test]
fn compiles_cell_reference() {
    assert_eq!(compile("A1").unwrap(), vec![Component::CellRef(cell("A1"))]);
}

#[test]
fn compiles_arithmetic_with_precedence() {
    // 1 + 2 * 3 -> 1 2 3 * +
    assert_eq!(
        compile("1 + 2 * 3").unwrap(),
        vec![
            Component::Number(1.0),
            Component::Number(2.0),
            Component::Number(3.0),
            Component::Operator(Operator::Asterisk),
            Component::Operator(Operator::Plus),
        ]
    );
}

#[test]
fn compiles_leading_unary_minus() {
    assert_eq!(
        compile("-A1").unwrap(),
        vec![
            Component::Number(0.0),
            Component::CellRef(cell("A1")),
            Component::Operator(Operator::Minus),
        ]
    );
}

#[test]
fn compiles_parenthesized_expression() {
    assert_eq!(
        compile("(1 + 2) * 3").unwrap(),
        vec![
            Component::Number(1.0),
            Component::Number(2.0),
            Component::Operator(Operator::Plus),
            Component::Number(3.0),
            Component::Operator(Operator::Asterisk),
        ]
    );
}

#[test]
fn compiles_function_call_with_range() {
    let postfix = compile("SUMA(A1:A3)").unwrap();
    assert_eq!(postfix.len(), 1);
    match &postfix[0] {
        Component::FunctionCall { func, args } => {
            assert_eq!(*func, BuiltinFunction::Suma);
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected function call, got {:?}", other),
    }
}

#[test]
fn compiles_nested_function_calls() {
    let postfix = compile("MAX(SUMA(A1:A2);MIN(B1:B2);10)").unwrap();
    assert_eq!(postfix.len(), 1);
    assert!(matches!(
        &postfix[0],
        Component::FunctionCall { func, .. } if *func == BuiltinFunction::Max
    ));
}

#[test]
fn compiles_realistic_formula() {
    // SUMA(A1:A10) * 2 + B1 -> SUMA(...) 2 * B1 +
    let postfix = compile("SUMA(A1:A10) * 2 + B1").unwrap();
    assert!(matches!(postfix[0], Component::FunctionCall { .. }));
    assert_eq!(
        &postfix[1..],
        &[
            Component::Number(2.0),
            Component::Operator(Operator::Asterisk),
            Component::CellRef(cell("B1")),
            Component::Operator(Operator::Plus),
        ]
    );
}

#[test]
fn rejects_empty_formula() {
    assert!(matches!(compile(""), Err(FormulaError::EmptyFormula)));
}

#[test]
fn rejects_invalid_character() {
    assert!(matches!(
        compile("A1 & B2"),
        Err(FormulaError::InvalidChar { ch: '&', .. })
    ));
}

#[test]
fn rejects_unknown_function() {
    assert!(matches!(
        compile("VLOOKUP(A1)"),
        Err(FormulaError::InvalidFunction { .. })
    ));
}

#[test]
fn rejects_unbalanced_parentheses() {
    assert!(compile("(1 + 2").is_err());
    assert!(compile("1 + 2)").is_err());
}

#[test]
fn rejects_empty_function_arguments() {
    assert!(matches!(
        compile("MAX()"),
        Err(FormulaError::EmptyFunctionCall { .. })
    ));
}

#[test]
fn rejects_malformed_range() {
    assert!(compile("SUMA(A1:2)").is_err());
}

#[test]
fn rejects_trailing_operator() {
    assert!(compile("1 +").is_err());
}

#[test]
fn rejects_double_binary_operator() {
    assert!(compile("1 + * 2").is_err());
}

#[test]
fn accepts_unary_sign_after_binary_operator() {
    // A leading +/- after a binary operator is a unary prefix on the next
    // term, not a second binary operator: 1 + (+2) == 1 + 2.
    assert!(compile("1 + + 2").is_ok());
    assert!(compile("1 + -2").is_ok());
}

#[test]
fn case_insensitive_function_names_and_cell_refs() {
    assert_eq!(compile("suma(a1:a2)").unwrap(), compile("SUMA(A1:A2)").unwrap());
}
