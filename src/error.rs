use thiserror::Error;

pub type StoryResult<T> = Result<T, StoryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoryError {
    #[error("Malformed style '{key}' at {path}: {reason}")]
    MalformedStyle {
        key: String,
        path: String,
        reason: String,
    },

    #[error("Unknown element type '{element_type}' at {path}")]
    UnknownElementType { element_type: String, path: String },

    #[error("Unknown layer template '{template}' at {path}. Expected one of: fill, vertical, horizontal, thirds")]
    UnknownLayerTemplate { template: String, path: String },

    #[error("Layer at {path} uses the 'thirds' template with {count} elements; it needs exactly 3")]
    InvalidThirdsArity { path: String, count: usize },

    #[error("Missing required property '{property}' at {path}")]
    MissingProperty { property: String, path: String },

    #[error("Invalid property '{property}' at {path}: {reason}")]
    InvalidProperty {
        property: String,
        path: String,
        reason: String,
    },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Invalid compile options: {0}")]
    ConfigError(String),
}

impl StoryError {
    pub(crate) fn malformed_style(
        key: impl Into<String>,
        path: &str,
        reason: impl Into<String>,
    ) -> Self {
        StoryError::MalformedStyle {
            key: key.into(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(property: impl Into<String>, path: &str) -> Self {
        StoryError::MissingProperty {
            property: property.into(),
            path: path.to_string(),
        }
    }

    pub(crate) fn invalid(
        property: impl Into<String>,
        path: &str,
        reason: impl Into<String>,
    ) -> Self {
        StoryError::InvalidProperty {
            property: property.into(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StoryError {
    fn from(err: serde_json::Error) -> Self {
        StoryError::DeserializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for StoryError {
    fn from(err: serde_yaml::Error) -> Self {
        StoryError::DeserializationError(err.to_string())
    }
}
