/// Shared error type used across all Parley crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input rejected before any transcript mutation (e.g. blank text).
    #[error("validation: {0}")]
    Validation(String),

    /// A submission is already in flight for this session.
    #[error("session is busy: a submission is already in progress")]
    Busy,

    /// Transport failure: connection refused, DNS, TLS, timeout.
    #[error("network: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status or a body we could
    /// not interpret. `message` is the endpoint's own message when it sent
    /// one.
    #[error("{message}")]
    Endpoint {
        status: Option<u16>,
        message: String,
    },

    /// A well-formed success response that carried no usable text.
    #[error("endpoint returned no usable text")]
    EmptyResponse,

    /// An operation that the transcript invariants forbid.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),
}

impl Error {
    /// Short, stable category name used in trace events and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Busy => "busy",
            Error::Network(_) => "network",
            Error::Endpoint { .. } => "endpoint",
            Error::EmptyResponse => "empty_response",
            Error::InvalidState(_) => "invalid_state",
            Error::Config(_) => "config",
            Error::Auth(_) => "auth",
        }
    }

    /// True for failures that originate at the remote endpoint boundary.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Endpoint { .. } | Error::EmptyResponse
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
