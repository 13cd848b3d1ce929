use std::fmt;

/// Failure to encode the finished collection.
///
/// Nothing is written when this is returned.
#[derive(Debug)]
pub enum SerializeError {
    /// JSON encoding failed, e.g. a captured response body is not valid UTF-8
    Json(serde_json::Error),
    /// The encoder produced bytes that are not UTF-8
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::Json(e) => {
                write!(f, "Failed to serialize Postman collection: {}", e)
            }
            SerializeError::Utf8(e) => {
                write!(f, "Failed to serialize Postman collection: output is not UTF-8 ({})", e)
            }
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Json(e) => Some(e),
            SerializeError::Utf8(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SerializeError {
    fn from(e: serde_json::Error) -> Self {
        SerializeError::Json(e)
    }
}

impl From<std::string::FromUtf8Error> for SerializeError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        SerializeError::Utf8(e)
    }
}
