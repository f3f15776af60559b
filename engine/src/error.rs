//! FILENAME: engine/src/error.rs
//! PURPOSE: Error types for the edit and evaluation stages of the engine.
//! CONTEXT: Lex/Syntax/Reference errors are raised by the parser crate
//! before a formula ever reaches the engine. This module covers the two
//! categories that only the engine can detect: Dependency (circular
//! references, found only once the whole sheet's graph is known) and
//! Evaluation (division by zero, malformed postfix, out-of-range results).

use crate::sheet::AddressError;
use parser::FormulaError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("cell reference out of range: {0}")]
    OutOfRange(#[from] AddressError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error("formula would create a circular reference through {0}")]
    CircularReference(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    #[error("cell reference out of range: {0}")]
    OutOfRange(#[from] AddressError),

    #[error("cell is not a number")]
    NotANumber,

    #[error("cell holds an evaluation error: {0}")]
    CellError(crate::cell::CellError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("malformed postfix expression")]
    MalformedPostfix,

    #[error("value is not a number")]
    NotANumber,

    #[error("reference reads a cell that is itself an evaluation error")]
    UpstreamError,
}
