//! FILENAME: engine/src/cell.rs
//! PURPOSE: The atomic unit of the spreadsheet: user content plus its
//! last-computed value.
//! CONTEXT: Mirrors the content/value split of the original cell design,
//! but content is a single `Content` enum rather than a class hierarchy.

use crate::content::Content;
use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub enum CellError {
    DivisionByZero,
    Upstream,
    Malformed,
}

impl From<&EvalError> for CellError {
    fn from(err: &EvalError) -> Self {
        match err {
            EvalError::DivisionByZero => CellError::DivisionByZero,
            EvalError::MalformedPostfix => CellError::Malformed,
            EvalError::NotANumber => CellError::Malformed,
            EvalError::UpstreamError => CellError::Upstream,
        }
    }
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellError::DivisionByZero => write!(f, "#DIV/0!"),
            CellError::Upstream => write!(f, "#VALUE!"),
            CellError::Malformed => write!(f, "#ERROR!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Error(CellError),
}

/// A single sheet cell: the content the user set, plus the value the last
/// evaluation produced. A `Number`/`Text` cell's value is always in sync
/// with its content; a `Formula` cell's value is only as fresh as the last
/// recalculation pass over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: Content,
    pub value: CellValue,
}

impl Cell {
    pub fn from_number(n: f64) -> Self {
        Cell {
            content: Content::Number(n),
            value: CellValue::Number(n),
        }
    }

    pub fn from_text(text: String) -> Self {
        Cell {
            value: CellValue::Text(text.clone()),
            content: Content::Text(text),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, Content::Formula(_))
    }

    /// The numeric value of this cell when used as a binary-operator
    /// operand: an empty cell coerces to `0.0`; text and errors do not
    /// participate in arithmetic.
    pub fn as_operand_number(&self) -> Result<f64, EvalError> {
        operand_number(&self.value)
    }

    /// The numeric value of this cell when used as a function/aggregation
    /// argument: an empty cell is skipped entirely by the caller rather
    /// than coerced, so this returns `None` for it.
    pub fn as_aggregation_number(&self) -> Result<Option<f64>, EvalError> {
        aggregation_number(&self.value)
    }

    pub fn display_value(&self) -> String {
        match &self.value {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Error(e) => e.to_string(),
        }
    }
}

/// A text cell's content coerces to a number when it parses as one (e.g. a
/// cell holding `"1e10"`, which the content classifier leaves as text since
/// it falls outside the plain numeric grammar `classify` accepts for a raw
/// edit). Anything else is `NotANumber`.
fn text_as_number(s: &str) -> Result<f64, EvalError> {
    s.trim().parse::<f64>().map_err(|_| EvalError::NotANumber)
}

/// Coerces a resolved cell value to an operand number: empty is `0.0`,
/// text coerces if it parses as a float, errors do not participate in
/// arithmetic.
pub fn operand_number(value: &CellValue) -> Result<f64, EvalError> {
    match value {
        CellValue::Number(n) => Ok(*n),
        CellValue::Empty => Ok(0.0),
        CellValue::Text(s) => text_as_number(s),
        CellValue::Error(_) => Err(EvalError::UpstreamError),
    }
}

/// Coerces a resolved cell value to an aggregation-argument number: empty
/// cells are excluded (returned as `None`) rather than coerced to zero;
/// text coerces if it parses as a float.
pub fn aggregation_number(value: &CellValue) -> Result<Option<f64>, EvalError> {
    match value {
        CellValue::Number(n) => Ok(Some(*n)),
        CellValue::Empty => Ok(None),
        CellValue::Text(s) => text_as_number(s).map(Some),
        CellValue::Error(_) => Err(EvalError::UpstreamError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_that_parses_as_a_float_coerces_in_operand_position() {
        // "1e10" falls outside classify's plain numeric grammar and stays
        // text, but it still parses as an f64, so it should coerce here
        // rather than error.
        let v = CellValue::Text("1e10".to_string());
        assert_eq!(operand_number(&v).unwrap(), 1e10);
        assert_eq!(aggregation_number(&v).unwrap(), Some(1e10));
    }

    #[test]
    fn unparseable_text_is_not_a_number_in_either_position() {
        let v = CellValue::Text("hello".to_string());
        assert!(matches!(operand_number(&v), Err(EvalError::NotANumber)));
        assert!(matches!(aggregation_number(&v), Err(EvalError::NotANumber)));
    }

    #[test]
    fn empty_cell_differs_between_operand_and_aggregation_position() {
        assert_eq!(operand_number(&CellValue::Empty).unwrap(), 0.0);
        assert_eq!(aggregation_number(&CellValue::Empty).unwrap(), None);
    }
}
