use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    Io { path: PathBuf, message: String },
    /// Contents did not parse as the expected format.
    Parse { format: &'static str, message: String },
    /// Profiles could not be serialized.
    Serialize(String),
    /// File extension is neither `.json` nor `.toml`.
    UnsupportedFormat(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Parse { format, message } => write!(f, "{format} parse error: {message}"),
            Self::Serialize(msg) => write!(f, "serialize error: {msg}"),
            Self::UnsupportedFormat(path) => {
                write!(f, "{}: expected a .json or .toml file", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
