use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZhExtractError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path} is not valid UTF-8: {source}")]
    Decode {
        path: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Input directory not found: {path}")]
    InputDirectoryNotFound { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Cannot prepare output directory {path}: {source}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ZhExtractError {
    fn user_message(&self) -> String {
        match self {
            ZhExtractError::Decode { path, .. } => {
                format!("File is not valid UTF-8 text: {}", path)
            }
            ZhExtractError::InputDirectoryNotFound { path } => {
                format!("Input directory does not exist: {}", path)
            }
            ZhExtractError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            ZhExtractError::OutputDirectory { path, source } => {
                format!("Could not create output directory {}: {}", path, source)
            }
            ZhExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ZhExtractError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ZhExtractError::Decode { .. } => Some(
                "Only UTF-8 input is supported. Convert the file first (e.g. with iconv).".to_string()
            ),
            ZhExtractError::InputDirectoryNotFound { .. } => Some(
                "Check the INPUT_DIR argument or the [paths] input_directory setting.".to_string()
            ),
            ZhExtractError::OutputDirectory { .. } => Some(
                "Ensure you have write permission for the parent of the output directory.".to_string()
            ),
            ZhExtractError::Config { .. } => Some(
                "Check your configuration file syntax, or run with --generate-config to get a sample.".to_string()
            ),
            ZhExtractError::Pattern(_) => Some(
                "Simplify the --connectors value or reset extraction.connectors to its default.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ZhExtractError {
    fn from(error: toml::de::Error) -> Self {
        ZhExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZhExtractError>;
