pub use octets::CoreError;
use std::fmt;

/// Errors carried in an MBIM `HostError`/`FunctionError` frame's `error_status_code`
/// field (spec.md §7 "Protocol" layer — transport-envelope failures, distinct from a
/// successful envelope reporting a peer-side status).
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
    /// Any code the dialect doesn't recognise; the numeric value round-trips intact.
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

/// Peer-reported operation outcomes carried in a successful `CommandDone`/`OpenDone`/
/// `CloseDone` envelope's `status_code` field (spec.md §7 "Status" layer). The numeric
/// code always round-trips via [`StatusError::code`], even for variants this crate
/// doesn't name.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum StatusError {
    Busy,
    Failure,
    SimNotInserted,
    BadSim,
    PinRequired,
    PinDisabled,
    NotRegistered,
    ProvidersNotFound,
    NoDeviceSupport,
    ProviderNotVisible,
    DataClassNotAvailable,
    PacketServiceDetached,
    MaxActivatedContexts,
    NotInitialized,
    VoiceCallInProgress,
    ContextNotActivated,
    ServiceNotActivated,
    InvalidAccessString,
    InvalidUserNamePwd,
    RadioPowerOff,
    InvalidParameters,
    ReadFailure,
    WriteFailure,
    NoPhonebook,
    ParameterTooLong,
    StkBusy,
    OperationNotAllowed,
    MemoryFailure,
    InvalidMemoryIndex,
    MemoryFull,
    FilterNotSupported,
    DssInstanceLimit,
    InvalidDeviceServiceOperation,
    AuthIncorrectAutn,
    AuthSyncFailure,
    AuthAmfNotSet,
    SmsUnknownSmscAddress,
    SmsNetworkTimeout,
    SmsLangNotSupported,
    SmsOperationNotAllowed,
    SmsMemoryFailure,
    SmsInvalidMemoryIndex,
    SmsMemoryFull,
    Unknown(u32),
}

impl StatusError {
    pub fn from_code(code: u32) -> StatusError {
        match code {
            1 => StatusError::Busy,
            2 => StatusError::Failure,
            3 => StatusError::SimNotInserted,
            4 => StatusError::BadSim,
            5 => StatusError::PinRequired,
            6 => StatusError::PinDisabled,
            7 => StatusError::NotRegistered,
            8 => StatusError::ProvidersNotFound,
            9 => StatusError::NoDeviceSupport,
            10 => StatusError::ProviderNotVisible,
            11 => StatusError::DataClassNotAvailable,
            12 => StatusError::PacketServiceDetached,
            13 => StatusError::MaxActivatedContexts,
            14 => StatusError::NotInitialized,
            15 => StatusError::VoiceCallInProgress,
            16 => StatusError::ContextNotActivated,
            17 => StatusError::ServiceNotActivated,
            18 => StatusError::InvalidAccessString,
            19 => StatusError::InvalidUserNamePwd,
            20 => StatusError::RadioPowerOff,
            21 => StatusError::InvalidParameters,
            22 => StatusError::ReadFailure,
            23 => StatusError::WriteFailure,
            24 => StatusError::NoPhonebook,
            25 => StatusError::ParameterTooLong,
            26 => StatusError::StkBusy,
            27 => StatusError::OperationNotAllowed,
            28 => StatusError::MemoryFailure,
            29 => StatusError::InvalidMemoryIndex,
            30 => StatusError::MemoryFull,
            31 => StatusError::FilterNotSupported,
            32 => StatusError::DssInstanceLimit,
            33 => StatusError::InvalidDeviceServiceOperation,
            34 => StatusError::AuthIncorrectAutn,
            35 => StatusError::AuthSyncFailure,
            36 => StatusError::AuthAmfNotSet,
            100 => StatusError::SmsUnknownSmscAddress,
            101 => StatusError::SmsNetworkTimeout,
            102 => StatusError::SmsLangNotSupported,
            103 => StatusError::SmsOperationNotAllowed,
            104 => StatusError::SmsMemoryFailure,
            105 => StatusError::SmsInvalidMemoryIndex,
            106 => StatusError::SmsMemoryFull,
            other => StatusError::Unknown(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            StatusError::Busy => 1,
            StatusError::Failure => 2,
            StatusError::SimNotInserted => 3,
            StatusError::BadSim => 4,
            StatusError::PinRequired => 5,
            StatusError::PinDisabled => 6,
            StatusError::NotRegistered => 7,
            StatusError::ProvidersNotFound => 8,
            StatusError::NoDeviceSupport => 9,
            StatusError::ProviderNotVisible => 10,
            StatusError::DataClassNotAvailable => 11,
            StatusError::PacketServiceDetached => 12,
            StatusError::MaxActivatedContexts => 13,
            StatusError::NotInitialized => 14,
            StatusError::VoiceCallInProgress => 15,
            StatusError::ContextNotActivated => 16,
            StatusError::ServiceNotActivated => 17,
            StatusError::InvalidAccessString => 18,
            StatusError::InvalidUserNamePwd => 19,
            StatusError::RadioPowerOff => 20,
            StatusError::InvalidParameters => 21,
            StatusError::ReadFailure => 22,
            StatusError::WriteFailure => 23,
            StatusError::NoPhonebook => 24,
            StatusError::ParameterTooLong => 25,
            StatusError::StkBusy => 26,
            StatusError::OperationNotAllowed => 27,
            StatusError::MemoryFailure => 28,
            StatusError::InvalidMemoryIndex => 29,
            StatusError::MemoryFull => 30,
            StatusError::FilterNotSupported => 31,
            StatusError::DssInstanceLimit => 32,
            StatusError::InvalidDeviceServiceOperation => 33,
            StatusError::AuthIncorrectAutn => 34,
            StatusError::AuthSyncFailure => 35,
            StatusError::AuthAmfNotSet => 36,
            StatusError::SmsUnknownSmscAddress => 100,
            StatusError::SmsNetworkTimeout => 101,
            StatusError::SmsLangNotSupported => 102,
            StatusError::SmsOperationNotAllowed => 103,
            StatusError::SmsMemoryFailure => 104,
            StatusError::SmsInvalidMemoryIndex => 105,
            StatusError::SmsMemoryFull => 106,
            StatusError::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (code={})", self, self.code())
    }
}

/// Top-level error type returned by MBIM codec, transaction and client operations. Wraps
/// the shared `octets::CoreError` framing layer alongside MBIM's own Protocol and Status
/// layers (spec.md §7: "three layers").
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
