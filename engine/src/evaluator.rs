//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Executes a compiled postfix component sequence against a sheet
//! snapshot and produces a numeric result or a captured evaluation error.
//! CONTEXT: Fifth and final stage of the formula pipeline.
//! The sheet is taken by immutable reference — evaluation never mutates
//! the grid; the orchestrator installs the result afterward.

use crate::cell::{aggregation_number, operand_number};
use crate::error::EvalError;
use crate::functions;
use crate::sheet::Sheet;
use parser::{Argument, Component, Coordinates, Operator};

/// Evaluates a compiled postfix sequence against `sheet`, returning the
/// single numeric result or the first evaluation error encountered.
pub fn evaluate(postfix: &[Component], sheet: &Sheet) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::new();

    for component in postfix {
        match component {
            Component::Number(n) => stack.push(*n),
            Component::CellRef(c) => stack.push(operand_value(*c, sheet)?),
            Component::FunctionCall { func, args } => {
                let mut values = Vec::new();
                for arg in args {
                    gather_argument(arg, sheet, &mut values)?;
                }
                stack.push(functions::apply(*func, &values)?);
            }
            Component::Operator(op) => {
                let right = stack.pop().ok_or(EvalError::MalformedPostfix)?;
                let left = stack.pop().ok_or(EvalError::MalformedPostfix)?;
                stack.push(apply_operator(*op, left, right)?);
            }
            // The converter never emits these in the final postfix sequence;
            // seeing one means the compiled postfix itself is malformed.
            Component::LParen | Component::RParen => return Err(EvalError::MalformedPostfix),
        }
    }

    match stack.len() {
        1 => Ok(stack[0]),
        _ => Err(EvalError::MalformedPostfix),
    }
}

fn apply_operator(op: Operator, left: f64, right: f64) -> Result<f64, EvalError> {
    let result = match op {
        Operator::Plus => left + right,
        Operator::Minus => left - right,
        Operator::Asterisk => left * right,
        Operator::Slash => {
            if right == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            left / right
        }
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NotANumber)
    }
}

/// A cell reference used in binary-operator operand position: an empty
/// cell (no stored content, or a formula not yet evaluated) coerces to
/// `0.0`.
fn operand_value(coord: Coordinates, sheet: &Sheet) -> Result<f64, EvalError> {
    match sheet.get(coord) {
        Some(cell) => operand_number(&cell.value),
        None => Ok(0.0),
    }
}

/// A cell reference used in function/aggregation argument position: an
/// empty cell is skipped rather than coerced.
fn aggregation_value(coord: Coordinates, sheet: &Sheet) -> Result<Option<f64>, EvalError> {
    match sheet.get(coord) {
        Some(cell) => aggregation_number(&cell.value),
        None => Ok(None),
    }
}

/// Expands one function argument into zero or more numeric values,
/// appending them to `values`.
fn gather_argument(arg: &Argument, sheet: &Sheet, values: &mut Vec<f64>) -> Result<(), EvalError> {
    match arg {
        Argument::Range(range) => {
            for coord in range.coords() {
                if let Some(v) = aggregation_value(coord, sheet)? {
                    values.push(v);
                }
            }
            Ok(())
        }
        Argument::Expression(postfix) => {
            match postfix.as_slice() {
                // A bare literal argument contributes its value directly.
                [Component::Number(n)] => values.push(*n),
                // A bare cell reference argument is the one place a single
                // Coordinates operand is skip-on-empty rather than
                // coerced.
                [Component::CellRef(c)] => {
                    if let Some(v) = aggregation_value(*c, sheet)? {
                        values.push(v);
                    }
                }
                // A nested function call or any compound expression is
                // fully evaluated and contributes its single result.
                _ => values.push(evaluate(postfix, sheet)?),
            }
            Ok(())
        }
    }
}
