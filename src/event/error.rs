use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("Event kind already registered: {kind}")]
    DuplicateKind { kind: String },

    #[error("Event kind not found: {0}")]
    UnknownKind(String),

    #[error("Event args length not matched: {kind}, expected {expected}, got {got}")]
    ArgsLengthNotMatched {
        kind: String,
        expected: usize,
        got: usize,
    },

    #[error("Event arg type mismatch: {kind}.{field}, expected {expected}, got {got}")]
    ArgTypeMismatch {
        kind: String,
        field: String,
        expected: String,
        got: String,
    },

    #[error("Event Receive failed: {message}")]
    ReceiveFailed { message: String },

    #[error("Event lagged: {count}")]
    Lagged { count: u64 },
}

impl EventError {
    /// Both arity and type errors mean the supplied args do not fit the kind.
    pub fn is_invalid_args(&self) -> bool {
        matches!(
            self,
            EventError::ArgsLengthNotMatched { .. } | EventError::ArgTypeMismatch { .. }
        )
    }
}

pub type EventResult<T> = Result<T, EventError>;
