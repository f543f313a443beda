use octets::CoreError;
use std::fmt;

/// Codes emitted by the peer's transport envelope (spec.md §7 "Protocol" layer, unified
/// by name with MBIM's but occupying its own numeric space — scenario 4's `error=0x000E`
/// is this dialect's own assignment, distinct from MBIM's code 14).
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ProtocolError {
    TimeoutFragment,
    FragmentOutOfSequence,
    LengthMismatch,
    DuplicatedTid,
    NotOpened,
    Unknown,
    Cancel,
    MaxTransfer,
    /// Any code not named above; the numeric value round-trips intact.
    Invalid(u32),
}

impl ProtocolError {
    pub fn from_code(code: u32) -> ProtocolError {
        match code {
            1 => ProtocolError::TimeoutFragment,
            2 => ProtocolError::FragmentOutOfSequence,
            3 => ProtocolError::LengthMismatch,
            4 => ProtocolError::DuplicatedTid,
            5 => ProtocolError::NotOpened,
            6 => ProtocolError::Unknown,
            7 => ProtocolError::Cancel,
            8 => ProtocolError::MaxTransfer,
            other => ProtocolError::Invalid(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ProtocolError::TimeoutFragment => 1,
            ProtocolError::FragmentOutOfSequence => 2,
            ProtocolError::LengthMismatch => 3,
            ProtocolError::DuplicatedTid => 4,
            ProtocolError::NotOpened => 5,
            ProtocolError::Unknown => 6,
            ProtocolError::Cancel => 7,
            ProtocolError::MaxTransfer => 8,
            ProtocolError::Invalid(code) => *code,
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (code={})", self, self.code())
    }
}

/// Peer-reported operation outcomes; QMI status codes are per-service, so only a small
/// common subset is named and the rest round-trip through `Unknown` (spec.md §7
/// "Status" layer).
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum StatusError {
    GeneralError,
    InternalError,
    NotSupported,
    InvalidClientId,
    NoMemory,
    Unknown(u32),
}

impl StatusError {
    pub fn from_code(code: u32) -> StatusError {
        match code {
            1 => StatusError::GeneralError,
            2 => StatusError::InternalError,
            3 => StatusError::NotSupported,
            22 => StatusError::InvalidClientId,
            29 => StatusError::NoMemory,
            other => StatusError::Unknown(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            StatusError::GeneralError => 1,
            StatusError::InternalError => 2,
            StatusError::NotSupported => 3,
            StatusError::InvalidClientId => 22,
            StatusError::NoMemory => 29,
            StatusError::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (code={})", self, self.code())
    }
}

/// Top-level error type for QMI codec, transaction and client operations (spec.md §7:
/// "three layers").
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Error {
    Core(CoreError),
    Protocol(ProtocolError),
    Status(StatusError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Core(err) => write!(f, "{}", err),
            Error::Protocol(err) => write!(f, "protocol error: {}", err),
            Error::Status(err) => write!(f, "status error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<CoreError> for Error {
    #[inline]
    fn from(err: CoreError) -> Self {
        Error::Core(err)
    }
}

impl From<octets::Error> for Error {
    #[inline]
    fn from(err: octets::Error) -> Self {
        Error::Core(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
