//! Error types for the logging engine

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Worker pool constructed with zero threads
    #[error("worker pool requires at least one thread")]
    InvalidWorkerCount,

    /// Name collision inside a manager registry
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// Lookup miss inside a manager registry
    #[error("no {kind} named '{name}' is registered")]
    UnknownName { kind: &'static str, name: String },

    /// Sink attached to the same logger twice
    #[error("sink '{name}' is already attached to this logger")]
    DuplicateSink { name: String },

    /// Sink removal from a logger it was never attached to
    #[error("sink '{name}' is not attached to this logger")]
    SinkNotAttached { name: String },

    /// Log call on a logger removed from its manager
    #[error("logger '{name}' has been destroyed")]
    LoggerDestroyed { name: String },

    /// Weak reference to a dropped engine component
    #[error("{resource} is no longer available")]
    ResourceGone { resource: &'static str },

    /// Rotation settings that cannot describe a rotation
    #[error("invalid rotation settings: {message}")]
    InvalidRotation { message: String },

    /// IO error with context
    #[error("IO error while {operation} '{path}': {message}")]
    IoOperation {
        operation: &'static str,
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatter failed to render a record
    #[error("formatter error: {0}")]
    Format(String),

    /// Worker task panicked
    #[error("worker task panicked: {0}")]
    TaskPanic(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Create an IO error with the failing operation and path attached
    pub fn io_operation(
        operation: &'static str,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LogError::IoOperation {
            operation,
            path: path.into(),
            message: source.to_string(),
            source,
        }
    }

    pub fn duplicate_name(kind: &'static str, name: impl Into<String>) -> Self {
        LogError::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    pub fn unknown_name(kind: &'static str, name: impl Into<String>) -> Self {
        LogError::UnknownName {
            kind,
            name: name.into(),
        }
    }

    pub fn resource_gone(resource: &'static str) -> Self {
        LogError::ResourceGone { resource }
    }

    pub fn rotation(message: impl Into<String>) -> Self {
        LogError::InvalidRotation {
            message: message.into(),
        }
    }

    pub fn format<S: Into<String>>(message: S) -> Self {
        LogError::Format(message.into())
    }

    pub fn other<S: Into<String>>(message: S) -> Self {
        LogError::Other(message.into())
    }

    /// The OS error code carried by the underlying IO failure, if any
    pub fn os_error_code(&self) -> Option<i32> {
        match self {
            LogError::IoOperation { source, .. } | LogError::Io(source) => source.raw_os_error(),
            _ => None,
        }
    }
}
