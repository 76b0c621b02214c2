/// Error types for document loading, transformation and saving.
use thiserror::Error;

/// Result type for docx-tidy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for docx-tidy operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input package does not exist
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// A required part is missing from the package
    #[error("Part not found: {0}")]
    MissingPart(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Structurally invalid document content
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A table row whose length differs from the header count
    #[error("Table row {row} has {found} cells, expected {expected}")]
    SpecMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A table specification without any header
    #[error("Table specification has no headers")]
    EmptyHeaders,

    /// Heading level outside 0-9
    #[error("Heading level must be 0-9, got {0}")]
    InvalidHeadingLevel(u8),

    /// Malformed length measurement
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Xml(format!("Invalid UTF-8: {}", err))
    }
}
