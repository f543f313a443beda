use crate::error::{CoreError, Error};
use crate::service::Service;
use octets::{Reader, Writer};

pub const COMMON_HEADER_SIZE: usize = 12;
pub const FRAGMENT_HEADER_SIZE: usize = 8;

/// The wire-level message type tag (spec.md §4.2.1). Values are fixed by the MBIM wire
/// format, not assigned by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Open,
    Close,
    Command,
    HostError,
    OpenDone,
    CloseDone,
    CommandDone,
    FunctionError,
    Indication,
}

impl MessageType {
    pub fn from_u32(value: u32) -> Option<MessageType> {
        match value {
            0x0000_0001 => Some(MessageType::Open),
            0x0000_0002 => Some(MessageType::Close),
            0x0000_0003 => Some(MessageType::Command),
            0x0000_0004 => Some(MessageType::HostError),
            0x8000_0001 => Some(MessageType::OpenDone),
            0x8000_0002 => Some(MessageType::CloseDone),
            0x8000_0003 => Some(MessageType::CommandDone),
            0x8000_0004 => Some(MessageType::FunctionError),
            0x8000_0007 => Some(MessageType::Indication),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            MessageType::Open => 0x0000_0001,
            MessageType::Close => 0x0000_0002,
            MessageType::Command => 0x0000_0003,
            MessageType::HostError => 0x0000_0004,
            MessageType::OpenDone => 0x8000_0001,
            MessageType::CloseDone => 0x8000_0002,
            MessageType::CommandDone => 0x8000_0003,
            MessageType::FunctionError => 0x8000_0004,
            MessageType::Indication => 0x8000_0007,
        }
    }

    /// Only Command, CommandDone and Indication carry a fragment header and are
    /// splittable across multiple wire frames (spec.md §4.4).
    pub fn is_fragmentable(self) -> bool {
        matches!(
            self,
            MessageType::Command | MessageType::CommandDone | MessageType::Indication
        )
    }
}

/// Whether a `Command` frame is a query or a set (spec.md §4.2.1 `command_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Query,
    Set,
}

impl CommandType {
    pub fn from_u32(value: u32) -> CommandType {
        if value == 1 {
            CommandType::Set
        } else {
            CommandType::Query
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            CommandType::Query => 0,
            CommandType::Set => 1,
        }
    }
}

/// The parsed common header plus message-kind-specific sub-header fields (spec.md §3
/// "Header": "Discriminated union of frame kinds").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Open {
        transaction: u32,
        max_control_transfer: u32,
    },
    Close {
        transaction: u32,
    },
    Command {
        transaction: u32,
        fragment_total: u32,
        fragment_current: u32,
        service: Service,
        cid: u32,
        command_type: CommandType,
        buffer_length: u32,
    },
    HostError {
        transaction: u32,
        error_status_code: u32,
    },
    OpenDone {
        transaction: u32,
        status_code: u32,
    },
    CloseDone {
        transaction: u32,
        status_code: u32,
    },
    CommandDone {
        transaction: u32,
        fragment_total: u32,
        fragment_current: u32,
        service: Service,
        cid: u32,
        status_code: u32,
        buffer_length: u32,
    },
    FunctionError {
        transaction: u32,
        error_status_code: u32,
    },
    Indication {
        transaction: u32,
        fragment_total: u32,
        fragment_current: u32,
        service: Service,
        cid: u32,
        buffer_length: u32,
    },
}

impl Header {
    pub fn message_type(&self) -> MessageType {
        match self {
            Header::Open { .. } => MessageType::Open,
            Header::Close { .. } => MessageType::Close,
            Header::Command { .. } => MessageType::Command,
            Header::HostError { .. } => MessageType::HostError,
            Header::OpenDone { .. } => MessageType::OpenDone,
            Header::CloseDone { .. } => MessageType::CloseDone,
            Header::CommandDone { .. } => MessageType::CommandDone,
            Header::FunctionError { .. } => MessageType::FunctionError,
            Header::Indication { .. } => MessageType::Indication,
        }
    }

    pub fn transaction(&self) -> u32 {
        match self {
            Header::Open { transaction, .. }
            | Header::Close { transaction, .. }
            | Header::Command { transaction, .. }
            | Header::HostError { transaction, .. }
            | Header::OpenDone { transaction, .. }
            | Header::CloseDone { transaction, .. }
            | Header::CommandDone { transaction, .. }
            | Header::FunctionError { transaction, .. }
            | Header::Indication { transaction, .. } => *transaction,
        }
    }

    /// An indication never participates in transaction matching (spec.md §3 invariant).
    pub fn is_indication(&self) -> bool {
        matches!(self, Header::Indication { .. })
    }

    pub fn service(&self) -> Option<Service> {
        match self {
            Header::Command { service, .. }
            | Header::CommandDone { service, .. }
            | Header::Indication { service, .. } => Some(*service),
            _ => None,
        }
    }

    pub fn cid(&self) -> Option<u32> {
        match self {
            Header::Command { cid, .. } | Header::CommandDone { cid, .. } | Header::Indication { cid, .. } => {
                Some(*cid)
            }
            _ => None,
        }
    }

    pub fn fragment(&self) -> Option<(u32, u32)> {
        match self {
            Header::Command {
                fragment_total,
                fragment_current,
                ..
            }
            | Header::CommandDone {
                fragment_total,
                fragment_current,
                ..
            }
            | Header::Indication {
                fragment_total,
                fragment_current,
                ..
            } => Some((*fragment_total, *fragment_current)),
            _ => None,
        }
    }

    pub fn buffer_length(&self) -> usize {
        match self {
            Header::Command { buffer_length, .. }
            | Header::CommandDone { buffer_length, .. }
            | Header::Indication { buffer_length, .. } => *buffer_length as usize,
            _ => 0,
        }
    }

    /// Byte offset of the information buffer within the full on-wire frame.
    pub fn info_buffer_offset(&self) -> usize {
        match self {
            Header::Command { .. } | Header::CommandDone { .. } => {
                COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE + 16 + 4 + 4 + 4
            }
            Header::Indication { .. } => COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE + 16 + 4 + 4,
            _ => 0,
        }
    }

    /// Parses the 12-byte common header plus the message-kind-specific sub-header that
    /// immediately follows it. `buf` must contain at least the full declared length.
    pub fn parse(buf: &[u8]) -> Result<Header, Error> {
        let r = Reader::new(buf);
        let raw_type = r.u32_le(0)?;
        let _length = r.u32_le(4)?;
        let transaction = r.u32_le(8)?;

        let message_type = MessageType::from_u32(raw_type)
            .ok_or_else(|| Error::Core(CoreError::InvalidMessage(format!("unknown message type {:#x}", raw_type))))?;

        match message_type {
            MessageType::Open => Ok(Header::Open {
                transaction,
                max_control_transfer: r.u32_le(COMMON_HEADER_SIZE)?,
            }),
            MessageType::Close => Ok(Header::Close { transaction }),
            MessageType::HostError => Ok(Header::HostError {
                transaction,
                error_status_code: r.u32_le(COMMON_HEADER_SIZE)?,
            }),
            MessageType::FunctionError => Ok(Header::FunctionError {
                transaction,
                error_status_code: r.u32_le(COMMON_HEADER_SIZE)?,
            }),
            MessageType::OpenDone => Ok(Header::OpenDone {
                transaction,
                status_code: r.u32_le(COMMON_HEADER_SIZE)?,
            }),
            MessageType::CloseDone => Ok(Header::CloseDone {
                transaction,
                status_code: r.u32_le(COMMON_HEADER_SIZE)?,
            }),
            MessageType::Command => {
                let fragment_total = r.u32_le(COMMON_HEADER_SIZE)?;
                let fragment_current = r.u32_le(COMMON_HEADER_SIZE + 4)?;
                let uuid_off = COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE;
                let service = Service::from_uuid(r.uuid(uuid_off)?);
                let cid = r.u32_le(uuid_off + 16)?;
                let command_type = CommandType::from_u32(r.u32_le(uuid_off + 20)?);
                let buffer_length = r.u32_le(uuid_off + 24)?;
                Ok(Header::Command {
                    transaction,
                    fragment_total,
                    fragment_current,
                    service,
                    cid,
                    command_type,
                    buffer_length,
                })
            }
            MessageType::CommandDone => {
                let fragment_total = r.u32_le(COMMON_HEADER_SIZE)?;
                let fragment_current = r.u32_le(COMMON_HEADER_SIZE + 4)?;
                let uuid_off = COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE;
                let service = Service::from_uuid(r.uuid(uuid_off)?);
                let cid = r.u32_le(uuid_off + 16)?;
                let status_code = r.u32_le(uuid_off + 20)?;
                let buffer_length = r.u32_le(uuid_off + 24)?;
                Ok(Header::CommandDone {
                    transaction,
                    fragment_total,
                    fragment_current,
                    service,
                    cid,
                    status_code,
                    buffer_length,
                })
            }
            MessageType::Indication => {
                let fragment_total = r.u32_le(COMMON_HEADER_SIZE)?;
                let fragment_current = r.u32_le(COMMON_HEADER_SIZE + 4)?;
                let uuid_off = COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE;
                let service = Service::from_uuid(r.uuid(uuid_off)?);
                let cid = r.u32_le(uuid_off + 16)?;
                let buffer_length = r.u32_le(uuid_off + 20)?;
                Ok(Header::Indication {
                    transaction,
                    fragment_total,
                    fragment_current,
                    service,
                    cid,
                    buffer_length,
                })
            }
        }
    }

    /// Serialises the common header plus sub-header (but not the information buffer) to
    /// `w`. `total_length` is the complete on-wire frame length including any trailing
    /// information buffer the caller appends afterwards.
    pub fn write(&self, w: &mut Writer, total_length: u32) {
        w.u32_le(self.message_type().as_u32());
        w.u32_le(total_length);
        w.u32_le(self.transaction());

        match self {
            Header::Open {
                max_control_transfer, ..
            } => w.u32_le(*max_control_transfer),
            Header::Close { .. } => {}
            Header::HostError { error_status_code, .. } | Header::FunctionError { error_status_code, .. } => {
                w.u32_le(*error_status_code)
            }
            Header::OpenDone { status_code, .. } | Header::CloseDone { status_code, .. } => w.u32_le(*status_code),
            Header::Command {
                fragment_total,
                fragment_current,
                service,
                cid,
                command_type,
                buffer_length,
                ..
            } => {
                w.u32_le(*fragment_total);
                w.u32_le(*fragment_current);
                w.uuid(&service.uuid());
                w.u32_le(*cid);
                w.u32_le(command_type.as_u32());
                w.u32_le(*buffer_length);
            }
            Header::CommandDone {
                fragment_total,
                fragment_current,
                service,
                cid,
                status_code,
                buffer_length,
                ..
            } => {
                w.u32_le(*fragment_total);
                w.u32_le(*fragment_current);
                w.uuid(&service.uuid());
                w.u32_le(*cid);
                w.u32_le(*status_code);
                w.u32_le(*buffer_length);
            }
            Header::Indication {
                fragment_total,
                fragment_current,
                service,
                cid,
                buffer_length,
                ..
            } => {
                w.u32_le(*fragment_total);
                w.u32_le(*fragment_current);
                w.uuid(&service.uuid());
                w.u32_le(*cid);
                w.u32_le(*buffer_length);
            }
        }
    }

    pub fn header_len(&self) -> usize {
        match self {
            Header::Close { .. } => COMMON_HEADER_SIZE,
            Header::Open { .. }
            | Header::HostError { .. }
            | Header::FunctionError { .. }
            | Header::OpenDone { .. }
            | Header::CloseDone { .. } => COMMON_HEADER_SIZE + 4,
            Header::Command { .. } | Header::CommandDone { .. } => {
                COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE + 16 + 4 + 4 + 4
            }
            Header::Indication { .. } => COMMON_HEADER_SIZE + FRAGMENT_HEADER_SIZE + 16 + 4 + 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip_matches_scenario() {
        // spec.md §8 scenario 1: Open, transaction=12345, max_control_transfer=4096.
        let header = Header::Open {
            transaction: 12345,
            max_control_transfer: 4096,
        };
        let mut w = Writer::new();
        header.write(&mut w, 16);
        let bytes = w.into_vec();

        assert_eq!(
            bytes,
            vec![
                0x01, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x39, 0x30, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00,
            ]
        );

        let parsed = Header::parse(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn command_header_reports_correct_info_buffer_offset() {
        let header = Header::Command {
            transaction: 1,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        assert_eq!(header.info_buffer_offset(), 12 + 8 + 16 + 4 + 4 + 4);
        assert_eq!(header.header_len(), header.info_buffer_offset());
    }

    #[test]
    fn indication_never_participates_in_transaction_matching() {
        let header = Header::Indication {
            transaction: 0,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            buffer_length: 0,
        };
        assert!(header.is_indication());
    }
}
