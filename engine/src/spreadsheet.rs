//! FILENAME: engine/src/spreadsheet.rs
//! PURPOSE: The invariant-preserving edit protocol and the
//! public API the UI/CLI collaborator wires user actions to.
//! CONTEXT: The only place the tokenizer/validator/parser/converter,
//! dependency graph, and postfix evaluator are used together. Every other
//! module in this crate is a pure leaf; this is where they compose.

use crate::cell::{Cell, CellError, CellValue};
use crate::content::{classify, Classification, Content, Formula};
use crate::deps;
use crate::dependency_graph::DependencyGraph;
use crate::error::{EditError, ReadError};
use crate::evaluator;
use crate::sheet::{Address, Config, Sheet};
use parser::Coordinates;

/// The spreadsheet engine: a sheet plus the dependency graph that keeps
/// its formula cells consistent with their inputs.
pub struct Spreadsheet {
    sheet: Sheet,
    graph: DependencyGraph,
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Spreadsheet {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Spreadsheet {
            sheet: Sheet::new(config),
            graph: DependencyGraph::new(),
        }
    }

    pub fn config(&self) -> Config {
        self.sheet.config()
    }

    /// The full edit protocol for `(target, raw_value)`:
    /// classify, and for a formula, compile + cycle-check *before* any
    /// sheet mutation; install content; replace the dependency entry;
    /// cascade recomputation through the dependents. A failure in any of
    /// the pre-mutation steps leaves the sheet and dependency index
    /// bit-identical to their pre-call state.
    pub fn set_cell<'a>(
        &mut self,
        address: impl Into<Address<'a>>,
        raw_value: &str,
    ) -> Result<(), EditError> {
        let target = self.sheet.resolve(address)?;

        match classify(raw_value) {
            Classification::Text(s) => {
                self.install_literal(target, Cell::from_text(s));
                Ok(())
            }
            Classification::Number(n) => {
                self.install_literal(target, Cell::from_number(n));
                Ok(())
            }
            Classification::Formula(expr) => self.install_formula(target, expr),
        }
    }

    fn install_literal(&mut self, target: Coordinates, cell: Cell) {
        self.sheet.set(target, cell);
        self.graph.set_dependencies(target, Default::default());
        log::debug!("{}: installed literal content", target);
        self.cascade(target);
    }

    fn install_formula(&mut self, target: Coordinates, expr: String) -> Result<(), EditError> {
        let postfix = parser::compile(&expr)?;
        log::trace!("{}: compiled formula \"{}\"", target, expr);

        let deps = deps::extract(&postfix);
        if self.graph.has_cycle(target, &deps) {
            log::warn!("{}: edit rejected, would create a circular reference", target);
            return Err(EditError::CircularReference(target.to_string()));
        }
        log::trace!("{}: cycle check passed", target);

        let value = match evaluator::evaluate(&postfix, &self.sheet) {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(CellError::from(&e)),
        };
        log::debug!("{}: evaluated", target);

        self.sheet.set(
            target,
            Cell {
                content: Content::Formula(Formula {
                    expression: expr,
                    postfix,
                }),
                value,
            },
        );
        self.graph.set_dependencies(target, deps);
        self.cascade(target);
        Ok(())
    }

    /// Re-evaluates every transitive dependent of `target` in dependency
    /// order. Cycles are excluded by the pre-check
    /// on every edit, so this always terminates.
    fn cascade(&mut self, target: Coordinates) {
        let order = self.graph.recalc_order(target);
        if !order.is_empty() {
            log::debug!("{}: cascading to {} dependent(s)", target, order.len());
        }
        for coord in order {
            let postfix = match self.sheet.get(coord) {
                Some(cell) => match &cell.content {
                    Content::Formula(f) => f.postfix.clone(),
                    _ => continue,
                },
                None => continue,
            };
            let value = match evaluator::evaluate(&postfix, &self.sheet) {
                Ok(n) => CellValue::Number(n),
                Err(e) => CellValue::Error(CellError::from(&e)),
            };
            self.sheet.update_value(coord, value);
        }
    }

    /// The numeric view of a cell: an empty cell reads as
    /// `0.0`; a non-numeric, non-empty cell is a read error.
    pub fn get_cell_number<'a>(&self, address: impl Into<Address<'a>>) -> Result<f64, ReadError> {
        let coord = self.sheet.resolve(address)?;
        match self.sheet.get(coord) {
            None => Ok(0.0),
            Some(cell) => match &cell.value {
                CellValue::Number(n) => Ok(*n),
                CellValue::Empty => Ok(0.0),
                CellValue::Text(_) => Err(ReadError::NotANumber),
                CellValue::Error(e) => Err(ReadError::CellError(e.clone())),
            },
        }
    }

    /// The textual view of a cell: its display form, or an empty string
    /// for an unset cell.
    pub fn get_cell_string<'a>(&self, address: impl Into<Address<'a>>) -> Result<String, ReadError> {
        let coord = self.sheet.resolve(address)?;
        Ok(self
            .sheet
            .get(coord)
            .map(|c| c.display_value())
            .unwrap_or_default())
    }

    /// The stored `=...` source of a formula cell, or an empty string if
    /// the cell is not a formula.
    pub fn get_formula_expression<'a>(
        &self,
        address: impl Into<Address<'a>>,
    ) -> Result<String, ReadError> {
        let coord = self.sheet.resolve(address)?;
        Ok(self
            .sheet
            .get(coord)
            .and_then(|c| c.content.formula_text())
            .map(|s| format!("={}", s))
            .unwrap_or_default())
    }

    /// Every occupied coordinate, row-major — used by the persistence
    /// collaborator to dump the sheet.
    pub fn occupied(&self) -> Vec<Coordinates> {
        self.sheet.occupied()
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }
}
