/// Core error type.
///
/// Adapter crates map their transport errors into this type so the moderation
/// core can tell a network failure from a service-level rejection.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Network-class failure (connection, timeout, flood control).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service understood the request and refused it (bad request).
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::Rejected(_))
    }

    /// The bare message without the variant prefix, for user-facing replies.
    pub fn detail(&self) -> &str {
        match self {
            Error::Config(s) | Error::Transport(s) | Error::Rejected(s) | Error::External(s) => s,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
