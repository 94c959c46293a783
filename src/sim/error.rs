//! Level data errors
//!
//! Level files ship with the game, so any of these means the build is broken.
//! Callers are expected to stop, not retry.

use thiserror::Error;

use super::level::LevelId;

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("{level}: unknown level letter {letter:?} at line {line}, column {column}")]
    UnknownLetter {
        level: LevelId,
        letter: char,
        /// 1-based line in the authored text (top line is 1)
        line: usize,
        /// 1-based column
        column: usize,
    },

    #[error("{level}: level text is empty")]
    Empty { level: LevelId },

    #[error("{0}: no such level in the level set")]
    MissingLevel(LevelId),

    #[error("{level}: failed to read level file: {source}")]
    Io {
        level: LevelId,
        #[source]
        source: std::io::Error,
    },
}
