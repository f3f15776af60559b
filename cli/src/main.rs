//! FILENAME: cli/src/main.rs
//! PURPOSE: The command-line driver for the engine/persistence pair: a
//! handful of one-shot subcommands plus an interactive REPL, as the
//! external collaborator that wires user actions to `Spreadsheet::set_cell`
//! and friends.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{Config, Coordinates, Spreadsheet};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "s2v", version, about = "A minimal spreadsheet engine")]
struct Cli {
    /// Sheet row bound for a freshly created sheet (ignored when opening an
    /// existing file). Defaults to the engine's configured ceiling.
    #[arg(long, global = true)]
    rows: Option<u32>,

    /// Sheet column bound for a freshly created sheet (ignored when opening
    /// an existing file).
    #[arg(long, global = true)]
    cols: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn config(&self) -> Config {
        let default = Config::default();
        Config {
            rows: self.rows.unwrap_or(default.rows),
            cols: self.cols.unwrap_or(default.cols),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sets a cell and writes the sheet back to disk.
    Set {
        file: PathBuf,
        cell: String,
        value: String,
    },
    /// Prints a cell's display value.
    Get { file: PathBuf, cell: String },
    /// Prints a cell's formula source, if it has one.
    Formula { file: PathBuf, cell: String },
    /// Prints the whole sheet as a grid.
    Load { file: PathBuf },
    /// Loads a sheet and re-saves it under a new path.
    Save { file: PathBuf, out: PathBuf },
    /// An interactive `set`/`get`/`formula`/`print`/`save` loop.
    Repl {
        /// Opened if it exists; otherwise the REPL starts from an empty sheet.
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Command::Set { file, cell, value } => cmd_set(&file, &cell, &value, config),
        Command::Get { file, cell } => cmd_get(&file, &cell, config),
        Command::Formula { file, cell } => cmd_formula(&file, &cell, config),
        Command::Load { file } => cmd_load(&file, config),
        Command::Save { file, out } => cmd_save(&file, &out, config),
        Command::Repl { file } => cmd_repl(file, config),
    }
}

fn open_or_new(path: &Path, config: Config) -> Result<Spreadsheet> {
    if path.exists() {
        persistence::load(path).with_context(|| format!("loading {}", path.display()))
    } else {
        Ok(Spreadsheet::with_config(config))
    }
}

fn cmd_set(file: &Path, cell: &str, value: &str, config: Config) -> Result<()> {
    let mut sheet = open_or_new(file, config)?;
    sheet
        .set_cell(cell, value)
        .with_context(|| format!("setting {cell}"))?;
    persistence::save(&sheet, file).with_context(|| format!("saving {}", file.display()))?;
    println!("{cell} = {}", sheet.get_cell_string(cell)?);
    Ok(())
}

fn cmd_get(file: &Path, cell: &str, config: Config) -> Result<()> {
    let sheet = open_or_new(file, config)?;
    println!("{}", sheet.get_cell_string(cell)?);
    Ok(())
}

fn cmd_formula(file: &Path, cell: &str, config: Config) -> Result<()> {
    let sheet = open_or_new(file, config)?;
    let expr = sheet.get_formula_expression(cell)?;
    if expr.is_empty() {
        println!("{cell} has no formula");
    } else {
        println!("{expr}");
    }
    Ok(())
}

fn cmd_load(file: &Path, config: Config) -> Result<()> {
    let sheet = open_or_new(file, config)?;
    print_grid(&sheet);
    Ok(())
}

fn cmd_save(file: &Path, out: &Path, config: Config) -> Result<()> {
    let sheet = open_or_new(file, config)?;
    persistence::save(&sheet, out).with_context(|| format!("saving {}", out.display()))?;
    Ok(())
}

fn cmd_repl(file: Option<PathBuf>, config: Config) -> Result<()> {
    let mut sheet = match &file {
        Some(path) => open_or_new(path, config)?,
        None => Spreadsheet::with_config(config),
    };
    let mut current_path = file;

    println!("commands: set <cell> <value> | get <cell> | formula <cell> | print | save [path] | quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["print"] => print_grid(&sheet),
            ["get", cell] => match sheet.get_cell_string(*cell) {
                Ok(v) => println!("{v}"),
                Err(e) => println!("error: {e}"),
            },
            ["formula", cell] => match sheet.get_formula_expression(*cell) {
                Ok(v) if v.is_empty() => println!("{cell} has no formula"),
                Ok(v) => println!("{v}"),
                Err(e) => println!("error: {e}"),
            },
            ["set", cell, rest @ ..] if !rest.is_empty() => {
                let value = rest.join(" ");
                match sheet.set_cell(*cell, &value) {
                    Ok(()) => println!("{cell} = {}", sheet.get_cell_string(*cell).unwrap_or_default()),
                    Err(e) => println!("rejected: {e}"),
                }
            }
            ["save"] => match &current_path {
                Some(path) => save_or_report(&sheet, path),
                None => println!("no path given yet; use: save <path>"),
            },
            ["save", path] => {
                let path = PathBuf::from(path);
                save_or_report(&sheet, &path);
                current_path = Some(path);
            }
            _ => println!("unrecognized command"),
        }
    }
    Ok(())
}

fn save_or_report(sheet: &Spreadsheet, path: &Path) {
    match persistence::save(sheet, path) {
        Ok(()) => println!("saved to {}", path.display()),
        Err(e) => println!("error: {e}"),
    }
}

/// Renders every occupied row/column as a simple aligned grid.
fn print_grid(sheet: &Spreadsheet) {
    let occupied = sheet.occupied();
    let Some(max_row) = occupied.iter().map(|c| c.row).max() else {
        println!("(empty sheet)");
        return;
    };
    let max_col = occupied.iter().map(|c| c.col).max().unwrap_or(0);

    for row in 0..=max_row {
        let mut fields = Vec::with_capacity(max_col as usize + 1);
        for col in 0..=max_col {
            let coord = Coordinates::new(row, col).expect("within configured bounds");
            fields.push(sheet.get_cell_string(coord).unwrap_or_default());
        }
        println!("{}", fields.join("\t"));
    }
}
