use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read input file {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("header column {column} ({cell:?}) has no bracketed group label")]
    Parse { column: usize, cell: String },
    #[error("row {row}: expected {expected} columns, found {found}")]
    RowLength {
        row: u64,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {column}: {value:?} is not a non-negative integer score")]
    ValueConversion {
        row: u64,
        column: usize,
        value: String,
    },
    #[error("header column {column}: group label {label:?} appears more than once")]
    DuplicateGroup { column: usize, label: String },
    #[error("row {row}: person {person:?} appears more than once")]
    DuplicatePerson { row: u64, person: String },
    #[error("person {person:?} has no score for group {group:?}")]
    MissingScore { person: String, group: String },
    #[error("problem is infeasible: {0}")]
    Infeasible(String),
    #[error("solver failed: {0}")]
    Solver(String),
    #[error("cannot write output file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
