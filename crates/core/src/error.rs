use std::fmt;

#[derive(Debug)]
pub enum Error {
    ConfigParse(String),
    IoError(std::io::Error),
    InvalidData(String),
    /// Network failure before a response was received
    Transport(String),
    /// Backend answered with a non-success HTTP status
    Status(u16),
    /// Backend answered 2xx but the payload carried an error list
    Graphql(Vec<String>),
    Timeout,
}

impl Error {
    /// Transport and logical failures are retried the same way.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Status(_) | Error::Graphql(_) | Error::Timeout
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigParse(msg) => write!(f, "Configuration parse error: {}", msg),
            Error::IoError(err) => write!(f, "IO error: {}", err),
            Error::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Error::Transport(msg) => write!(f, "Content API transport error: {}", msg),
            Error::Status(code) => write!(f, "Content API returned HTTP {}", code),
            Error::Graphql(messages) => {
                write!(f, "Content API returned errors: {}", messages.join("; "))
            }
            Error::Timeout => write!(f, "Content API request timed out"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
