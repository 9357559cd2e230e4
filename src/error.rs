//! Error types and handling for the `Skyview` pipeline

use thiserror::Error;

/// Main error type for the forecast and radar pipeline
#[derive(Error, Debug)]
pub enum SkyviewError {
    /// A raw series is shorter than the window it is sliced with
    #[error("Insufficient data: series '{series}' needs {required} entries, got {available}")]
    InsufficientData {
        series: String,
        required: usize,
        available: usize,
    },

    /// Coordinates outside the range the tile math supports
    #[error("Invalid coordinate: lat={latitude}, lon={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Payload or timestamp decoding errors
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON payload errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkyviewError {
    /// Create a new insufficient-data error for the named series
    pub fn insufficient<S: Into<String>>(series: S, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            series: series.into(),
            required,
            available,
        }
    }

    /// Create a new invalid-coordinate error
    #[must_use]
    pub fn invalid_coordinate(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinate {
            latitude,
            longitude,
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkyviewError::InsufficientData { .. } => {
                "The weather feed returned an incomplete forecast. Please try again later."
                    .to_string()
            }
            SkyviewError::InvalidCoordinate { latitude, longitude } => {
                format!("Location {latitude:.4}, {longitude:.4} cannot be shown on the radar map.")
            }
            SkyviewError::Parse { message } => format!("Unexpected feed data: {message}"),
            SkyviewError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkyviewError::Json { .. } => "The feed payload is not valid JSON.".to_string(),
            SkyviewError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SkyviewError::insufficient("hourly.temperature_2m", 48, 30);
        assert!(matches!(
            err,
            SkyviewError::InsufficientData {
                required: 48,
                available: 30,
                ..
            }
        ));
        assert!(err.to_string().contains("hourly.temperature_2m"));

        let err = SkyviewError::invalid_coordinate(89.0, 0.0);
        assert!(matches!(err, SkyviewError::InvalidCoordinate { .. }));

        let err = SkyviewError::config("zoom out of range");
        assert!(matches!(err, SkyviewError::Config { .. }));
    }

    #[test]
    fn test_user_messages() {
        let err = SkyviewError::insufficient("daily.sunrise", 1, 0);
        assert!(err.user_message().contains("incomplete forecast"));

        let err = SkyviewError::invalid_coordinate(88.5, 12.25);
        assert!(err.user_message().contains("88.5000"));

        let err = SkyviewError::parse("bad timestamp");
        assert!(err.user_message().contains("bad timestamp"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SkyviewError = json_err.into();
        assert!(matches!(err, SkyviewError::Json { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SkyviewError = io_err.into();
        assert!(matches!(err, SkyviewError::Io { .. }));
    }
}
