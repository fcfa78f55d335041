//! Registry error types

/// Error type for registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The identifier space is spent; no id can be safely issued
    Exhausted,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Exhausted => write!(f, "Identifier space exhausted"),
        }
    }
}

impl std::error::Error for RegistryError {}
