use thiserror::Error;

/// Main error type for the Reel-Composer library
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled an in-flight export; no artifact was produced.
    #[error("Export cancelled")]
    Cancelled,
}

/// Timeline or export options rejected before any rendering began
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Timeline has no slides")]
    EmptyTimeline,

    #[error("Slide duration must be greater than zero (slide {slide_id})")]
    ZeroDuration { slide_id: String },

    #[error("Invalid filter value on slide {slide_id}: {field} = {value}")]
    InvalidFilter {
        slide_id: String,
        field: &'static str,
        value: f32,
    },

    #[error("Invalid export option: {key} = {value}")]
    InvalidOption { key: String, value: String },
}

/// A slide's source image could not be loaded or decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read image source: {source_name}")]
    LoadFailed { source_name: String },

    #[error("Failed to decode image {source_name}: {reason}")]
    DecodeFailed { source_name: String, reason: String },
}

/// Encoder unsupported or failed mid-stream
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Encoder unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Encoding failed: {reason}")]
    Failed { reason: String },

    #[error("Capture session is not active")]
    NotCapturing,
}

/// Persistence read/write failure
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read project store {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Failed to write project store {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Project store data is corrupt: {reason}")]
    Corrupt { reason: String },
}

/// Remote analysis or generation call failure
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Service unavailable: {service}")]
    Unavailable { service: String },

    #[error("Request to {service} failed: {reason}")]
    RequestFailed { service: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ReelError
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// The failure category surfaced to the user in the terminal notification
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Decode(_) => "DecodeError",
            Self::Encode(_) => "EncodeError",
            Self::Storage(_) => "StorageError",
            Self::Network(_) => "NetworkError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Network(_) => true,
            Self::Storage(StorageError::ReadFailed { .. }) => true,
            Self::Decode(DecodeError::LoadFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::EmptyTimeline) => {
                "Add at least one photo before exporting a reel.".to_string()
            }
            Self::Decode(DecodeError::LoadFailed { source_name }) => {
                format!("Could not load image '{}'. Please check the file exists and is a supported format.", source_name)
            }
            Self::Encode(EncodeError::Unavailable { .. }) => {
                "Video encoding is not available. Please install FFmpeg or choose an image format.".to_string()
            }
            Self::Cancelled => "Export cancelled.".to_string(),
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => format!("{}: {}", self.category(), self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        let err: ReelError = ValidationError::EmptyTimeline.into();
        assert_eq!(err.category(), "ValidationError");

        let err: ReelError = EncodeError::NotCapturing.into();
        assert_eq!(err.category(), "EncodeError");

        assert_eq!(ReelError::Cancelled.category(), "Cancelled");
    }

    #[test]
    fn test_recoverable() {
        let err: ReelError = NetworkError::Unavailable { service: "vision".into() }.into();
        assert!(err.is_recoverable());

        let err: ReelError = EncodeError::Failed { reason: "boom".into() }.into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_user_message_mentions_category() {
        let err: ReelError = StorageError::Corrupt { reason: "bad json".into() }.into();
        assert!(err.user_message().starts_with("StorageError"));
    }
}
