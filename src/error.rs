//! Error types for the Gestell tools.

use std::fmt::{self, Display};

/// Remote operation that an invocation error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Prompt,
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Search => f.write_str("search"),
            Operation::Prompt => f.write_str("prompt"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GestellError {
    #[error("Gestell API key must be provided (via argument or GESTELL_API_KEY env var)")]
    MissingApiKey,
    #[error("a Gestell collection_id is required (via argument or GESTELL_COLLECTION_ID env var)")]
    MissingCollectionId,
    #[error("query text must not be empty")]
    EmptyQuery,
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),
    /// Any failure of the remote call. Network, auth and remote validation
    /// errors all collapse into this one kind.
    #[error("Gestell {operation} failed: {message}")]
    Invocation { operation: Operation, message: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("blocking Gestell call made on a current-thread Tokio runtime; await the async entry point instead")]
    BlockingInAsyncContext,
    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl GestellError {
    pub(crate) fn invocation(operation: Operation, source: &color_eyre::Report) -> Self {
        let message = source.chain().map(|c| c.to_string()).collect::<Vec<_>>().join(": ");
        GestellError::Invocation { operation, message }
    }

    /// True for errors raised before a tool could be constructed.
    pub fn is_config(&self) -> bool {
        matches!(self, GestellError::MissingApiKey | GestellError::MissingCollectionId)
    }
}

pub type Result<T, E = GestellError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::eyre;

    #[test]
    fn invocation_message_keeps_original() {
        let report = eyre!("connection refused");
        let err = GestellError::invocation(Operation::Search, &report);
        assert_eq!(err.to_string(), "Gestell search failed: connection refused");
    }

    #[test]
    fn invocation_message_includes_chain() {
        let report = eyre!("status 401: bad key").wrap_err("sending prompt request");
        let err = GestellError::invocation(Operation::Prompt, &report);
        let msg = err.to_string();
        assert!(msg.starts_with("Gestell prompt failed: "));
        assert!(msg.contains("status 401: bad key"));
    }

    #[test]
    fn config_classification() {
        assert!(GestellError::MissingApiKey.is_config());
        assert!(GestellError::MissingCollectionId.is_config());
        assert!(!GestellError::EmptyQuery.is_config());
    }
}
