use crate::format::FormatKind;

/// Errors that can occur while uploading or decoding a model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("failed to read '{0}': {1}")]
    ReadFailure(String, #[source] std::io::Error),

    #[error("failed to decode {format} model '{name}': {message}")]
    DecodeFailure {
        format: FormatKind,
        name: String,
        message: String,
    },
}

impl LoadError {
    pub(crate) fn decode(format: FormatKind, name: &str, message: impl Into<String>) -> Self {
        LoadError::DecodeFailure {
            format,
            name: name.to_string(),
            message: message.into(),
        }
    }
}
