use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Sanitize error: {0}")]
    SanitizeError(String),

    #[error("HTML parse error: {0}")]
    ParseError(String),

    #[error("Maximum nesting depth ({max_depth}) exceeded")]
    MaxNestingDepthExceeded { max_depth: usize },

    #[error("Markdown conversion error: {0}")]
    MarkdownError(String),

    #[error("Invalid tag '{tag}': tags must be non-empty, lowercase, and contain only letters, digits or '-'")]
    InvalidTag { tag: String },

    #[error("Invalid attribute '{attribute}': attributes must be non-empty, lowercase, and contain only letters, digits, '-', '_' or ':'")]
    InvalidAttribute { attribute: String },

    #[error("Invalid URL scheme '{scheme}': schemes must start with a letter and contain only letters, digits, '+', '-' or '.'")]
    InvalidScheme { scheme: String },

    #[error("Invalid ignored node '{node}': entries must be non-empty and contain no whitespace")]
    InvalidIgnoredNode { node: String },

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(err: serde_yaml::Error) -> Self {
        ConvertError::YamlError(err.to_string())
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::IoError(err.to_string())
    }
}
