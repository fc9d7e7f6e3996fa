use std::fmt;

use thiserror::Error;

/// Main error type for the playlist library
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid media: {0}")]
    InvalidMedia(#[from] InvalidMedia),

    #[error("Invalid entry: {0}")]
    InvalidEntry(#[from] InvalidEntry),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Rendition validation errors
///
/// Raised when constructing or mutating a [`Media`](crate::Media) would
/// break one of its field rules. The entity is never left half-updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidMedia {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("invalid TYPE {0:?}")]
    InvalidType(String),

    #[error("invalid value {value:?} for {field}, expected YES or NO")]
    InvalidFlag { field: &'static str, value: String },

    #[error("INSTREAM-ID is only allowed on CLOSED-CAPTIONS, not {0}")]
    InstreamIdNotAllowed(String),

    #[error("CLOSED-CAPTIONS requires an INSTREAM-ID")]
    MissingInstreamId,

    #[error("invalid INSTREAM-ID {0:?}")]
    InvalidInstreamId(String),

    #[error("{field} value {value:?} contains a double quote or line break")]
    UnquotableValue { field: &'static str, value: String },
}

/// A variant stream or segment that cannot be written out and read back
/// unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidEntry {
    #[error("{field} value {value:?} contains a double quote or line break")]
    UnquotableValue { field: &'static str, value: String },

    #[error("{field} value {value:?} would not read back as the same line")]
    UnwritableLine { field: &'static str, value: String },

    #[error("{field} value {value:?} is not a valid enumerated string")]
    InvalidEnumerated { field: &'static str, value: String },

    #[error("segment {0:?} has a title but no duration")]
    TitleWithoutDuration(String),
}

/// A scalar value (resolution, byte range, ...) that does not parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value {0:?}")]
pub struct InvalidValue(pub String);

/// Attribute list decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("attribute {0:?} has no '='")]
    MissingEquals(String),
}

/// What went wrong on a manifest line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("attribute {0:?} has no '='")]
    MissingEquals(String),

    #[error("missing required attribute {0}")]
    MissingAttribute(&'static str),

    #[error("invalid value {value:?} for attribute {name}")]
    InvalidAttribute { name: String, value: String },

    #[error("invalid tag value {0:?}")]
    InvalidValue(String),

    #[error("variant stream is not followed by a URI line")]
    MissingUri,

    #[error("unknown tag")]
    UnknownTag,

    #[error("unknown attribute {0}")]
    UnknownAttribute(String),

    #[error(transparent)]
    InvalidMedia(#[from] InvalidMedia),

    #[error(transparent)]
    InvalidEntry(#[from] InvalidEntry),
}

impl From<AttributeError> for ParseErrorKind {
    fn from(err: AttributeError) -> Self {
        match err {
            AttributeError::UnterminatedQuote => ParseErrorKind::UnterminatedQuote,
            AttributeError::MissingEquals(token) => ParseErrorKind::MissingEquals(token),
        }
    }
}

/// A manifest parse failure, with the line it happened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// Tag name (`EXT-X-STREAM-INF`, ...) when the line was a tag.
    pub tag: Option<String>,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, tag: Option<&str>, kind: impl Into<ParseErrorKind>) -> Self {
        Self {
            line,
            tag: tag.map(str::to_string),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "line {}: #{}: {}", self.line, tag, self.kind),
            None => write!(f, "line {}: {}", self.line, self.kind),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::InvalidMedia(e) => Some(e),
            ParseErrorKind::InvalidEntry(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
