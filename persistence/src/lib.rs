//! FILENAME: persistence/src/lib.rs
//! PURPOSE: The `.s2v` on-disk format: one spreadsheet row per line,
//! cells separated by `;`.
//! CONTEXT: The external persistence collaborator — it
//! knows nothing about formula compilation or dependency tracking; `load`
//! replays each dumped cell through `Spreadsheet::set_cell` in on-disk
//! order and relies on cascading recomputation to repair any out-of-order
//! dependency.

mod error;

pub use error::PersistenceError;

use engine::{Content, Spreadsheet};
use std::fs;
use std::path::Path;

/// Saves every occupied cell of `sheet`, one row per line, trimming
/// trailing empty cells per row and trailing empty rows across the whole
/// sheet. Leading empty rows/cells are preserved as empty fields so the
/// grid's absolute position round-trips.
pub fn save(sheet: &Spreadsheet, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let occupied = sheet.occupied();
    let Some(max_row) = occupied.iter().map(|c| c.row).max() else {
        fs::write(path, "").map_err(PersistenceError::SaveIo)?;
        return Ok(());
    };
    let max_col = occupied.iter().map(|c| c.col).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(max_row as usize + 1);
    for row in 0..=max_row {
        let mut fields = Vec::with_capacity(max_col as usize + 1);
        for col in 0..=max_col {
            fields.push(dump_cell(sheet, row, col));
        }
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        lines.push(fields.join(";"));
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    fs::write(path, lines.join("\n")).map_err(PersistenceError::SaveIo)?;
    Ok(())
}

fn dump_cell(sheet: &Spreadsheet, row: u32, col: u32) -> String {
    let Ok(coord) = sheet.sheet().resolve((row, col)) else {
        return String::new();
    };
    let Some(cell) = sheet.sheet().get(coord) else {
        return String::new();
    };
    match &cell.content {
        Content::Text(s) => s.clone(),
        Content::Number(n) => dump_number(*n),
        // `;` is the argument separator inside a formula's expression and
        // would collide with the row's cell separator on disk, so it is
        // swapped for `,` here and restored on load.
        Content::Formula(f) => format!("={}", f.expression.replace(';', ",")),
    }
}

/// Shortest faithful decimal form; an integer-valued float dumps without a
/// trailing `.0` (matching `Cell::display_value`).
fn dump_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Loads a `.s2v` file into a fresh engine, replaying each dumped cell in
/// on-disk (row-major, line order) sequence. A formula cell's `,`-escaped
/// argument separator is restored to `;` before it reaches
/// `Spreadsheet::set_cell`.
pub fn load(path: impl AsRef<Path>) -> Result<Spreadsheet, PersistenceError> {
    let text = fs::read_to_string(path).map_err(PersistenceError::LoadIo)?;
    let mut sheet = Spreadsheet::new();

    for (row, line) in text.lines().enumerate() {
        for (col, field) in line.split(';').enumerate() {
            if field.is_empty() {
                continue;
            }
            let raw = if let Some(expr_body) = field.strip_prefix('=') {
                format!("={}", expr_body.replace(',', ";"))
            } else {
                field.to_string()
            };
            sheet.set_cell((row as u32, col as u32), &raw)?;
        }
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn round_trips_numbers_text_and_formulas() {
        let mut s = Spreadsheet::new();
        s.set_cell("A1", "10").unwrap();
        s.set_cell("B1", "hello").unwrap();
        s.set_cell("A2", "=A1+5").unwrap();

        let file = NamedTempFile::new().unwrap();
        save(&s, file.path()).unwrap();
        let loaded = load(file.path()).unwrap();

        assert_eq!(loaded.get_cell_string("A1").unwrap(), "10");
        assert_eq!(loaded.get_cell_string("B1").unwrap(), "hello");
        assert_eq!(loaded.get_cell_number("A2").unwrap(), 15.0);
        assert_eq!(loaded.get_formula_expression("A2").unwrap(), "=A1+5");
    }

    #[test]
    fn trims_trailing_empty_cells_and_rows_but_keeps_leading_ones() {
        let mut s = Spreadsheet::new();
        // Leave A1 empty; B1 occupied; leave row 1 and 2 entirely empty;
        // row 3 is the last occupied row.
        s.set_cell("B1", "1").unwrap();
        s.set_cell("A4", "2").unwrap();

        let file = NamedTempFile::new().unwrap();
        save(&s, file.path()).unwrap();
        let dumped = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = dumped.lines().collect();

        // Row 0: "" ; "1" (A1 empty, preserved as a leading empty field)
        assert_eq!(lines[0], ";1");
        // No trailing empty rows after the last occupied row.
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "2");
    }

    #[test]
    fn out_of_order_dependency_on_disk_is_repaired_by_cascading() {
        // A formula cell dumped before its precedent still resolves once
        // the precedent line is replayed, because the precedent's edit
        // cascades back into it.
        let mut s = Spreadsheet::new();
        s.set_cell("A1", "=A2+1").unwrap();
        s.set_cell("A2", "10").unwrap();

        let file = NamedTempFile::new().unwrap();
        save(&s, file.path()).unwrap();
        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded.get_cell_number("A1").unwrap(), 11.0);
    }

    #[test]
    fn formula_argument_separator_round_trips_through_comma_escaping() {
        let mut s = Spreadsheet::new();
        s.set_cell("B1", "1").unwrap();
        s.set_cell("B2", "2").unwrap();
        s.set_cell("A1", "=SUMA(B1;B2)").unwrap();

        let file = NamedTempFile::new().unwrap();
        save(&s, file.path()).unwrap();
        let dumped = fs::read_to_string(file.path()).unwrap();
        assert!(dumped.contains("=SUMA(B1,B2)"));

        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded.get_formula_expression("A1").unwrap(), "=SUMA(B1;B2)");
        assert_eq!(loaded.get_cell_number("A1").unwrap(), 3.0);
    }
}
