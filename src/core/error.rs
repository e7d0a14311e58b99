//! Error types for the logging facility

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Log directory or log file could not be created
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError {
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Email template failed to compile
    #[error("Email template error: {0}")]
    TemplateError(#[from] Box<handlebars::TemplateError>),

    /// Email template failed to render
    #[error("Email render error: {0}")]
    RenderError(#[from] Box<handlebars::RenderError>),

    /// Mail server rejected a command
    #[error("SMTP error {code}: {message}")]
    SmtpError { code: u16, message: String },

    /// Credentials would cross an unencrypted connection
    #[error("Refusing to send credentials to {host} over an unencrypted connection")]
    InsecureAuth { host: String },

    /// TLS negotiation with the mail server failed
    #[error("TLS error: {0}")]
    TlsError(#[from] rustls::Error),

    /// A panic was caught while sending an alert
    #[error("Alert dispatch panicked: {0}")]
    AlertPanicked(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl From<handlebars::TemplateError> for LoggerError {
    fn from(err: handlebars::TemplateError) -> Self {
        LoggerError::TemplateError(Box::new(err))
    }
}

impl From<handlebars::RenderError> for LoggerError {
    fn from(err: handlebars::RenderError) -> Self {
        LoggerError::RenderError(Box::new(err))
    }
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(
        path: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an SMTP reply error
    pub fn smtp(code: u16, message: impl Into<String>) -> Self {
        LoggerError::SmtpError {
            code,
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
