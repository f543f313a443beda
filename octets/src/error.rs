use std::fmt;

/// Errors raised by the raw byte-level accessors in [`crate::reader`] and
/// [`crate::writer`]. Every dialect wraps this in its own `InvalidMessage` variant rather
/// than exposing it directly to callers.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Error {
    /// A bounds-checked read ran past the declared buffer length.
    BufferTooShort { buf: usize, req: usize },
    /// A UTF-16LE sequence contained an unpaired or invalid surrogate.
    InvalidUtf16,
    /// A UUID string was not in canonical `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form.
    InvalidUuid,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BufferTooShort { buf, req } => {
                write!(f, "cannot read {} bytes (buf={} < req={})", req, buf, req)
            }
            Error::InvalidUtf16 => write!(f, "invalid utf-16le sequence"),
            Error::InvalidUuid => write!(f, "invalid uuid string"),
        }
    }
}

impl std::error::Error for Error {}

/// The core error taxonomy shared by both the MBIM and QMI dialects (spec.md
/// §7 "Core" layer). Each dialect's own `Error` type embeds one of these as its
/// framing/timeout/cancellation variant, alongside dialect-specific `Protocol` and
/// `Status` variants.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum CoreError {
    Failed,
    WrongState,
    Timeout,
    InvalidArgs,
    InvalidMessage(String),
    Unsupported,
    Aborted,
    TlvNotFound,
    TlvTooLong,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Failed => write!(f, "operation failed"),
            CoreError::WrongState => write!(f, "device in wrong state"),
            CoreError::Timeout => write!(f, "transaction timed out"),
            CoreError::InvalidArgs => write!(f, "invalid arguments"),
            CoreError::InvalidMessage(reason) => write!(f, "invalid message: {}", reason),
            CoreError::Unsupported => write!(f, "unsupported operation"),
            CoreError::Aborted => write!(f, "transaction aborted"),
            CoreError::TlvNotFound => write!(f, "tlv not found"),
            CoreError::TlvTooLong => write!(f, "tlv too long"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<Error> for CoreError {
    #[inline]
    fn from(err: Error) -> Self {
        CoreError::InvalidMessage(err.to_string())
    }
}
