use crate::error::{CoreError, Error};
use crate::header::Header;
use std::fmt;
use std::sync::Arc;

/// An immutable owned byte sequence representing one logical (or, mid-reassembly, one
/// on-wire fragment) MBIM frame (spec.md §3 "Message"). Cloning is cheap: the backing
/// buffer is reference-counted, mirroring the "Reference-counted boxed byte arrays →
/// shared immutable buffer type" remapping in spec.md §9.
#[derive(Clone)]
pub struct Message {
    bytes: Arc<[u8]>,
    header: Header,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.as_ref() == other.bytes.as_ref()
    }
}
impl Eq for Message {}

impl Message {
    /// Parses `bytes` as one complete logical MBIM frame. The embedded `length` field
    /// must equal `bytes.len()` exactly (spec.md §3 invariant).
    pub fn parse(bytes: Vec<u8>) -> Result<Message, Error> {
        if bytes.len() < 12 {
            return Err(Error::Core(CoreError::InvalidMessage(format!(
                "cannot read 12 bytes (buf={} < req=12)",
                bytes.len()
            ))));
        }

        let declared_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        if declared_len != bytes.len() {
            return Err(Error::Core(CoreError::InvalidMessage(format!(
                "declared length {} does not match frame length {}",
                declared_len,
                bytes.len()
            ))));
        }

        let header = Header::parse(&bytes)?;

        let info_end = header.info_buffer_offset() + header.buffer_length();
        if header.buffer_length() > 0 && info_end > bytes.len() {
            return Err(Error::Core(CoreError::InvalidMessage(format!(
                "cannot read {} bytes (buf={} < req={})",
                header.buffer_length(),
                bytes.len(),
                info_end
            ))));
        }

        Ok(Message {
            bytes: Arc::from(bytes),
            header,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The information buffer payload of a Command/CommandDone/Indication message
    /// (spec.md §3 "Information Buffer"). Empty for frame kinds without one.
    pub fn info_buffer(&self) -> &[u8] {
        let start = self.header.info_buffer_offset();
        let len = self.header.buffer_length();
        if len == 0 || start + len > self.bytes.len() {
            &[]
        } else {
            &self.bytes[start..start + len]
        }
    }

    /// Assembles a `Message` from a header and an already-built information buffer
    /// (spec.md §4.3 `Builder::complete`), patching the total length and the header's
    /// own `buffer_length` field to match.
    pub fn assemble(mut header: Header, info_buffer: Vec<u8>) -> Message {
        let buffer_length = info_buffer.len() as u32;
        header = match header {
            Header::Command {
                transaction,
                fragment_total,
                fragment_current,
                service,
                cid,
                command_type,
                ..
            } => Header::Command {
                transaction,
                fragment_total,
                fragment_current,
                service,
                cid,
                command_type,
                buffer_length,
            },
            Header::CommandDone {
                transaction,
                fragment_total,
                fragment_current,
                service,
                cid,
                status_code,
                ..
            } => Header::CommandDone {
                transaction,
                fragment_total,
                fragment_current,
                service,
                cid,
                status_code,
                buffer_length,
            },
            Header::Indication {
                transaction,
                fragment_total,
                fragment_current,
                service,
                cid,
                ..
            } => Header::Indication {
                transaction,
                fragment_total,
                fragment_current,
                service,
                cid,
                buffer_length,
            },
            other => other,
        };

        let mut w = octets::Writer::new();
        let total_len = header.header_len() + info_buffer.len();
        header.write(&mut w, total_len as u32);
        w.bytes(&info_buffer);

        Message {
            header,
            bytes: Arc::from(w.into_vec()),
        }
    }

    /// Builds a header-only message (Open/Close/HostError/.../OpenDone/CloseDone — any
    /// kind without an information buffer).
    pub fn from_header(header: Header) -> Message {
        let mut w = octets::Writer::new();
        let total_len = header.header_len();
        header.write(&mut w, total_len as u32);
        Message {
            header,
            bytes: Arc::from(w.into_vec()),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({:?}, {} bytes)", self.header.message_type(), self.bytes.len())
    }
}

impl fmt::Display for Message {
    /// A deterministic, line-prefixable, multi-line dump (spec.md §4.2.3): header
    /// fields first, then the information buffer as a hex dump. Never fails — a
    /// malformed message still yields a best-effort dump.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MBIM {:?} transaction={}", self.header.message_type(), self.header.transaction())?;
        if let Some(service) = self.header.service() {
            writeln!(f, "  service: {:?} ({})", service, service.uuid())?;
        }
        if let Some(cid) = self.header.cid() {
            writeln!(f, "  cid: {}", cid)?;
        }
        if let Some((total, current)) = self.header.fragment() {
            writeln!(f, "  fragment: {}/{}", current, total)?;
        }
        let payload = self.info_buffer();
        if !payload.is_empty() {
            write!(f, "{}", octets::hex_dump(payload))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::CommandType;
    use crate::service::Service;

    #[test]
    fn parses_own_encoding() {
        let header = Header::Open {
            transaction: 7,
            max_control_transfer: 4096,
        };
        let msg = Message::from_header(header.clone());
        let parsed = Message::parse(msg.as_bytes().to_vec()).unwrap();
        assert_eq!(parsed.header(), &header);
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut bytes = Message::from_header(Header::Close { transaction: 1 })
            .as_bytes()
            .to_vec();
        bytes[4] = 0xff; // corrupt the declared length
        assert!(Message::parse(bytes).is_err());
    }

    #[test]
    fn command_round_trips_info_buffer() {
        let header = Header::Command {
            transaction: 1,
            fragment_total: 1,
            fragment_current: 0,
            service: Service::BasicConnect,
            cid: 1,
            command_type: CommandType::Set,
            buffer_length: 0,
        };
        let info = vec![1, 2, 3, 4];
        let msg = Message::assemble(header, info.clone());
        assert_eq!(msg.info_buffer(), &info[..]);

        let reparsed = Message::parse(msg.as_bytes().to_vec()).unwrap();
        assert_eq!(reparsed.info_buffer(), &info[..]);
        assert_eq!(reparsed.header().buffer_length(), 4);
    }

    #[test]
    fn display_never_fails_even_when_malformed() {
        let msg = Message::from_header(Header::Close { transaction: 1 });
        let rendered = format!("{}", msg);
        assert!(rendered.contains("Close"));
    }
}
