//! Error types and the RPC status-code taxonomy
//!
//! Every RPC reply starts with a status code. Internally errors are carried
//! as `BridgeError` and converted to `(status, message)` at the dispatch
//! boundary; no error ever panics across it.

/// Status code returned as the first element of every RPC reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum ErrorCode {
    /// Operation succeeded
    Ok = 0,
    /// Generic failure (native construction or operation rejected)
    Error = 1,
    /// Systemic resource pressure, e.g. identifier-space exhaustion
    CriticalError = 2,
    /// Unknown or stale object identifier
    InvalidReference = 3,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

/// Which registry an invalid reference pointed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Meter,
    Source,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Meter => "Meter",
            RefKind::Source => "Source",
        }
    }
}

/// Error type for bridge operations
#[derive(Debug, Clone)]
pub enum BridgeError {
    /// Native resource construction failed
    CreationFailed(String),
    /// The registry cannot issue another identifier
    AllocationExhausted,
    /// The given identifier does not resolve to a live object
    InvalidReference(RefKind),
    /// The native layer rejected an otherwise well-formed operation
    OperationFailed(String),
}

impl BridgeError {
    /// Status code this error maps to on the wire
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::CreationFailed(_) => ErrorCode::Error,
            BridgeError::AllocationExhausted => ErrorCode::CriticalError,
            BridgeError::InvalidReference(_) => ErrorCode::InvalidReference,
            BridgeError::OperationFailed(_) => ErrorCode::Error,
        }
    }
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::CreationFailed(msg) => write!(f, "Failed to create resource: {}", msg),
            BridgeError::AllocationExhausted => write!(f, "Failed to allocate unique id."),
            BridgeError::InvalidReference(kind) => {
                write!(f, "Invalid {} Reference.", kind.as_str())
            }
            BridgeError::OperationFailed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}
