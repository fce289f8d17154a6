//! Error types and handling for the `SkyCast` pipeline

use thiserror::Error;

/// Failure talking to one of the Open-Meteo endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error(
        "HTTP {status} from {endpoint}{}",
        .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
    )]
    Status {
        status: u16,
        endpoint: String,
        reason: Option<String>,
    },

    /// Body could not be decoded or lacked the expected fields
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse(message.into())
    }
}

/// Main error type for the `SkyCast` application
#[derive(Error, Debug)]
pub enum SkyCastError {
    /// Place lookup could not be completed
    #[error("Error fetching coordinates for {city}: {source}")]
    Geocoding {
        city: String,
        #[source]
        source: ApiError,
    },

    /// Place lookup succeeded but matched nothing
    #[error("Could not find city: {city}")]
    NotFound { city: String },

    /// Historical weather could not be retrieved
    #[error("Error fetching weather data for {city}: {source}")]
    Fetch {
        city: String,
        #[source]
        source: ApiError,
    },

    /// Weather was retrieved but the range holds no samples
    #[error("No weather data for {city} in the selected range")]
    EmptySeries { city: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkyCastError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(city: S) -> Self {
        Self::NotFound { city: city.into() }
    }

    /// Wrap a geocoding API failure for `city`
    pub fn geocoding<S: Into<String>>(city: S, source: ApiError) -> Self {
        Self::Geocoding {
            city: city.into(),
            source,
        }
    }

    /// Wrap an archive API failure for `city`
    pub fn fetch<S: Into<String>>(city: S, source: ApiError) -> Self {
        Self::Fetch {
            city: city.into(),
            source,
        }
    }

    /// Create a new empty-series error
    pub fn empty_series<S: Into<String>>(city: S) -> Self {
        Self::EmptySeries { city: city.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The city this error is about, if any
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        match self {
            SkyCastError::Geocoding { city, .. }
            | SkyCastError::NotFound { city }
            | SkyCastError::Fetch { city, .. }
            | SkyCastError::EmptySeries { city } => Some(city),
            SkyCastError::Config { .. } | SkyCastError::Io { .. } => None,
        }
    }

    /// Whether this error should be shown as a warning rather than an error
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            SkyCastError::Fetch { .. } | SkyCastError::EmptySeries { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkyCastError::Geocoding { city, source } => {
                format!("Error fetching coordinates for {city}: {source}")
            }
            SkyCastError::NotFound { city } => format!("Could not find city: {city}"),
            SkyCastError::Fetch { city, source } => {
                format!("Error fetching weather data for {city}: {source}")
            }
            SkyCastError::EmptySeries { .. } => {
                "No weather data found for the selected range.".to_string()
            }
            SkyCastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkyCastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
