use include_dir::{include_dir, Dir};
use std::fmt;
use std::fs;
use std::path::Path;

static WORDS_DIR: Dir = include_dir!("src/words");

/// Ordered, filtered word list. Immutable after load; replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

#[derive(Debug)]
pub enum PoolError {
    UnknownList(String),
    Unreadable(std::io::Error),
    Empty,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::UnknownList(name) => write!(f, "no embedded word list named '{name}'"),
            PoolError::Unreadable(e) => write!(f, "could not read word list: {e}"),
            PoolError::Empty => write!(f, "word list contains no usable words"),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoolError::Unreadable(e) => Some(e),
            _ => None,
        }
    }
}

impl WordPool {
    /// Parse a newline-delimited word list: trim each line, drop empties.
    pub fn from_text(text: &str) -> Result<Self, PoolError> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if words.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self { words })
    }

    /// Load one of the word lists compiled into the binary.
    pub fn from_embedded(name: &str) -> Result<Self, PoolError> {
        let file = WORDS_DIR
            .get_file(format!("{name}.txt"))
            .ok_or_else(|| PoolError::UnknownList(name.to_string()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| PoolError::UnknownList(name.to_string()))?;
        Self::from_text(text)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PoolError> {
        let text = fs::read_to_string(path).map_err(PoolError::Unreadable)?;
        Self::from_text(&text)
    }

    /// Names of the embedded lists, for --list validation and help text.
    pub fn embedded_names() -> Vec<String> {
        WORDS_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
