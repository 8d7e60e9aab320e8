use std::fmt;

/// Gate failure kinds, one per call site that can fail. Handlers log and
/// swallow most of these; keeping the kind explicit lets tests assert on the
/// failure instead of inspecting log output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateError {
    Config(String),
    ClientInit(String),
    Session(String),
    Login(String),
    Logout(String),
    Callback(String),
    Dom(String),
}

impl fmt::Display for GateError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::Config(message) => write!(formatter, "Config error: {message}"),
            GateError::ClientInit(message) => {
                write!(formatter, "Identity client init failed: {message}")
            }
            GateError::Session(message) => write!(formatter, "Session query failed: {message}"),
            GateError::Login(message) => write!(formatter, "Login failed: {message}"),
            GateError::Logout(message) => write!(formatter, "Logout failed: {message}"),
            GateError::Callback(message) => {
                write!(formatter, "Redirect callback failed: {message}")
            }
            GateError::Dom(message) => write!(formatter, "DOM error: {message}"),
        }
    }
}

impl std::error::Error for GateError {}
