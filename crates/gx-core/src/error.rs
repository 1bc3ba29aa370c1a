use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("data directory does not exist: {}", .0.display())]
    DataDirNotFound(PathBuf),

    #[error("invalid test type '{0}': expected <framework>/<subtype>")]
    InvalidTestType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
