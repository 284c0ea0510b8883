use thiserror::Error;

#[derive(Error, Debug)]
pub enum IceError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid plate coordinate ({row}, {col}): grid is {rows}x{cols}")]
    InvalidCoordinate {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid cell code: {code}")]
    InvalidCellCode { code: String },

    #[error("Sample has no location: select a well, tube or AddGene id")]
    MissingLocation,

    #[error("No plate cell is open")]
    NoOpenCell,

    #[error("Persistence request failed with status {status}: {message}")]
    PersistenceError { status: u16, message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IceError::ApiError(_) | IceError::PersistenceError { .. } => ErrorCategory::Network,
            IceError::CsvError(_) | IceError::SerializationError(_) => ErrorCategory::Data,
            IceError::InvalidCoordinate { .. }
            | IceError::InvalidCellCode { .. }
            | IceError::MissingLocation
            | IceError::NoOpenCell
            | IceError::ValidationError { .. } => ErrorCategory::Input,
            IceError::ConfigValidationError { .. }
            | IceError::InvalidConfigValueError { .. }
            | IceError::MissingConfigError { .. } => ErrorCategory::Configuration,
            IceError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            IceError::NoOpenCell => ErrorSeverity::Low,
            IceError::ApiError(_) | IceError::PersistenceError { .. } => ErrorSeverity::Medium,
            IceError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the registry server is reachable and the session id is valid",
            ErrorCategory::Data => "The server returned data in an unexpected shape; check the server version",
            ErrorCategory::Input => "Check the plate cell, barcode and request fields and try again",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            IceError::ApiError(_) => "Could not reach the registry server".to_string(),
            IceError::PersistenceError { status, .. } => {
                format!("The registry server rejected the request (HTTP {})", status)
            }
            IceError::MissingLocation => {
                "Pick a well, scan a tube or enter an AddGene id before saving".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_errors_are_input_errors() {
        let err = IceError::InvalidCoordinate {
            row: 8,
            col: 0,
            rows: 8,
            cols: 12,
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("8x12"));
    }

    #[test]
    fn test_persistence_error_message() {
        let err = IceError::PersistenceError {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("403"));
    }
}
