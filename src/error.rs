//! Error types for the Mistralius SDK.
//!
//! Every fallible operation in the crate returns [`Error`]: session usage
//! errors, failures of the remote completion call, and failures while
//! encoding an image from disk.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::types::{Mode, Model};

/// The main error type for the Mistralius SDK.
#[derive(Clone, Debug)]
pub enum Error {
    /// The model is not on the allow-list for the session's mode.
    InvalidModelForMode {
        /// The requested model.
        model: Model,
        /// The mode the session was started in.
        mode: Mode,
    },

    /// The model name is not one of the allow-listed models.
    UnknownModel {
        /// The name as given by the caller.
        name: String,
    },

    /// An image was supplied in text-only mode, or omitted in image mode.
    ModeMismatch {
        /// The mode the session was started in.
        mode: Mode,
        /// Whether the caller supplied an image.
        image_supplied: bool,
    },

    /// The server answered with something other than HTTP 200.
    HttpStatus {
        /// HTTP status code.
        status_code: u16,
        /// The raw response body.
        body: String,
    },

    /// The response body was not a chat completion.
    MalformedResponse {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The request did not complete within the client timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// Connection error.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Missing or unusable credentials.
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// Error during JSON serialization of a request.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// The image path does not resolve to a readable file.
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Any other I/O failure while reading an image.
    ReadFailure {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },
}

impl Error {
    /// Creates a new invalid-model-for-mode error.
    pub fn invalid_model_for_mode(model: Model, mode: Mode) -> Self {
        Error::InvalidModelForMode { model, mode }
    }

    /// Creates a new unknown model error.
    pub fn unknown_model(name: impl Into<String>) -> Self {
        Error::UnknownModel { name: name.into() }
    }

    /// Creates a new mode mismatch error.
    pub fn mode_mismatch(mode: Mode, image_supplied: bool) -> Self {
        Error::ModeMismatch {
            mode,
            image_supplied,
        }
    }

    /// Creates a new HTTP status error.
    pub fn http_status(status_code: u16, body: impl Into<String>) -> Self {
        Error::HttpStatus {
            status_code,
            body: body.into(),
        }
    }

    /// Creates a new malformed response error.
    pub fn malformed_response(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::MalformedResponse {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new read failure error.
    pub fn read_failure(message: impl Into<String>, source: io::Error) -> Self {
        Error::ReadFailure {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Returns true if the model does not belong to the session's mode.
    pub fn is_invalid_model_for_mode(&self) -> bool {
        matches!(self, Error::InvalidModelForMode { .. })
    }

    /// Returns true if the image argument did not match the session's mode.
    pub fn is_mode_mismatch(&self) -> bool {
        matches!(self, Error::ModeMismatch { .. })
    }

    /// Returns true if the server answered with a non-200 status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, Error::HttpStatus { .. })
    }

    /// Returns true if the response body could not be understood.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Error::MalformedResponse { .. })
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is related to authentication.
    ///
    /// A 401 from the server counts as an authentication failure.
    pub fn is_authentication(&self) -> bool {
        match self {
            Error::Authentication { .. } => true,
            Error::HttpStatus { status_code, .. } => *status_code == 401,
            _ => false,
        }
    }

    /// Returns true if the image file could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns true if the image file could not be read.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Error::ReadFailure { .. })
    }

    /// Returns true if this error came from the remote completion call.
    pub fn is_call_error(&self) -> bool {
        matches!(
            self,
            Error::HttpStatus { .. }
                | Error::MalformedResponse { .. }
                | Error::Timeout { .. }
                | Error::Connection { .. }
                | Error::HttpClient { .. }
        )
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidModelForMode { model, mode } => {
                write!(f, "Model {model} is not available in {mode} mode")
            }
            Error::UnknownModel { name } => {
                write!(f, "Unknown model: {name}")
            }
            Error::ModeMismatch {
                mode,
                image_supplied,
            } => {
                if *image_supplied {
                    write!(f, "Mode mismatch: {mode} mode does not accept an image")
                } else {
                    write!(f, "Mode mismatch: {mode} mode requires an image")
                }
            }
            Error::HttpStatus { status_code, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {status_code}")
                } else {
                    write!(f, "HTTP {status_code}: {body}")
                }
            }
            Error::MalformedResponse { message, .. } => {
                write!(f, "Malformed response: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Authentication { message } => {
                write!(f, "Authentication error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::NotFound { message } => {
                write!(f, "File not found: {message}")
            }
            Error::ReadFailure { message, .. } => {
                write!(f, "Read failure: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::MalformedResponse { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            Error::ReadFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for Mistralius operations.
pub type Result<T> = std::result::Result<T, Error>;
