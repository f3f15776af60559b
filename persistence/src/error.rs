//! FILENAME: persistence/src/error.rs
//! PURPOSE: Errors for the `.s2v` save/load collaborator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("save failed: {0}")]
    SaveIo(std::io::Error),

    #[error("load failed: {0}")]
    LoadIo(std::io::Error),

    #[error("load failed: {0}")]
    Edit(#[from] engine::EditError),
}
