use thiserror::Error;

pub type Result<T> = std::result::Result<T, SysCharError>;
pub type DeserializationResult<T> = std::result::Result<T, DeserializationError>;
pub type SerializationResult<T> = std::result::Result<T, SerializationError>;

/// Errors raised while turning XML text into a document tree.
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("malformed XML: {0}")]
    MalformedXml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    InvalidAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("{what} is not valid UTF-8")]
    InvalidUtf8 { what: &'static str },

    #[error("document has no root element")]
    EmptyDocument,

    #[error("document has more than one root element (second root is `{name}`)")]
    MultipleRoots { name: String },

    #[error("expected `oval_system_characteristics` root, got `{{{namespace}}}{name}`")]
    UnexpectedRoot { namespace: String, name: String },
}

/// Errors raised while rendering a document tree or a model.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("writing XML failed: {0}")]
    XmlOutput(#[from] quick_xml::Error),

    #[error("an I/O error has occurred while writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("rendered output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("`serde_json` failed with error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SysCharError {
    /// A write was attempted through a token taken from a locked model.
    /// The target is left untouched.
    #[error("attempt to update locked content ({operation})")]
    ModelLocked { operation: &'static str },

    #[error("an item with id `{id}` is already registered in this model")]
    DuplicateItem { id: String },

    #[error("failed to read `{path}`: {source}")]
    FailedToOpenFile {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}
