//! FILENAME: engine/src/functions.rs
//! PURPOSE: Implements the four aggregate functions over an already
//! gathered value list.
//! CONTEXT: Empty cells are excluded from the list before it ever reaches
//! here — see `cell::Cell::as_aggregation_number` and the evaluator's
//! argument-gathering step — so this module only has to worry about what
//! to do with zero or more plain numbers.

use crate::error::EvalError;
use parser::BuiltinFunction;

/// Applies one of the four closed-set aggregate functions to an already
/// gathered value list. An empty list is not an error here — every one of
/// SUMA/PROMEDIO/MAX/MIN is defined to yield `0.0` on no values, matching
/// rather than the usual "max/min of empty is undefined" rule.
pub fn apply(func: BuiltinFunction, values: &[f64]) -> Result<f64, EvalError> {
    if values.is_empty() {
        return Ok(0.0);
    }

    let result = match func {
        BuiltinFunction::Suma => values.iter().sum(),
        BuiltinFunction::Promedio => values.iter().sum::<f64>() / values.len() as f64,
        BuiltinFunction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        BuiltinFunction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NotANumber)
    }
}
