use colored::Colorize;
use std::{fmt::Display, path::PathBuf};

/// Any error that ends the program.
pub type Fault = Box<dyn std::error::Error>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("failed to read source file {0:?}: {1}")]
    SourceUnreadable(PathBuf, LastError),
    #[error("failed to extract an entity from {0:?}: {1}{2}")]
    SourceMalformed(PathBuf, LastError, Hint),
    #[error("failed to write testbench file {0:?}: {1}")]
    TargetUnwritable(PathBuf, LastError),
    #[error("failed to read configuration file {0:?}: {1}")]
    ConfigUnreadable(PathBuf, LastError),
    #[error("target {0:?} does not start with a testbench name{1}")]
    InvalidTargetName(PathBuf, Hint),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain case if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    EntityExpected,
    TargetName,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EntityExpected => {
                "the source must declare an entity that begins with `entity <name> is` and closes with `end`"
            }
            Self::TargetName => "name the target like `<name>_tb.vhd`",
        };
        write!(
            f,
            "\n\n{}: {}",
            "hint".green(),
            Error::lowerize(message.to_string())
        )
    }
}
