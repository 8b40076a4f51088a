/// All error types that can occur when talking to a Yeelight bulb.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The TCP connection to the bulb could not be established.
    #[error("failed to connect to {addr}: {err}")]
    Connect { addr: String, err: std::io::Error },

    /// Writing the command to an established connection failed.
    #[error("socket write error: {0}")]
    Write(std::io::Error),

    /// Reading the response from an established connection failed.
    #[error("socket read error: {0}")]
    Read(std::io::Error),

    /// The bytes received are not a response frame the protocol allows.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response carries a different identifier than the command sent.
    #[error("response id {received} does not match command id {expected}")]
    Mismatch { expected: u16, received: u64 },

    /// The bulb answered with an error object.
    #[error("bulb rejected {command}: {message} (code {code})")]
    Protocol {
        code: i64,
        message: String,
        command: String,
    },

    /// The cached state says the bulb is off and the operation needs it on.
    #[error("{operation} can't be used while the bulb is off, turn it on first")]
    BulbOff { operation: &'static str },

    /// The adjust action is not allowed for the given property.
    #[error("adjust action {action} is not valid for property {property}")]
    InvalidAdjust { action: String, property: String },
}

impl Error {
    /// Create a new connect error
    pub fn connect(addr: &str, err: std::io::Error) -> Self {
        Error::Connect {
            addr: addr.to_string(),
            err,
        }
    }

    /// Create a new malformed response error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedResponse(reason.into())
    }

    /// Returns the device error code if the bulb rejected the command.
    pub fn protocol_code(&self) -> Option<i64> {
        match self {
            Error::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
