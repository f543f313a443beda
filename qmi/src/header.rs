use crate::error::{Error, Result};
use octets::{CoreError, Reader, Writer};

pub const MARKER: u8 = 0x01;
pub const CONTROL_SERVICE: u8 = 0;

/// Whether a frame is a request, a response, or an unsolicited indication (spec.md §3
/// "Header": QMI's `{Request, Response, Indication}` in a named service). Carried in the
/// per-service sub-header's flags byte — this crate's own bit assignment, since the
/// wire format only specifies the byte exists, not its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
    Indication,
}

impl MessageKind {
    fn from_u8(value: u8) -> Result<MessageKind> {
        match value {
            0 => Ok(MessageKind::Request),
            1 => Ok(MessageKind::Response),
            2 => Ok(MessageKind::Indication),
            other => Err(Error::Core(CoreError::InvalidMessage(format!("unknown qmi message kind {}", other)))),
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            MessageKind::Request => 0,
            MessageKind::Response => 1,
            MessageKind::Indication => 2,
        }
    }
}

/// The parsed QMUX framing plus per-service sub-header (spec.md §4.2.2). The
/// control service (`service == 0`) carries an 8-bit transaction id; every other
/// service carries 16 bits — this crate stores the widened value either way and
/// remembers which width to re-encode with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub kind: MessageKind,
    pub service: u8,
    pub client: u8,
    pub transaction: u16,
    pub message_id: u16,
}

impl Header {
    pub fn is_control(&self) -> bool {
        self.service == CONTROL_SERVICE
    }

    /// Bytes from the marker up to (not including) the TLV stream.
    pub fn header_len(&self) -> usize {
        if self.is_control() {
            // marker + qmux(length,flags,service,client) + svc(flags,tid:u8,message,tlv_len)
            1 + 5 + 1 + 1 + 2 + 2
        } else {
            1 + 5 + 1 + 2 + 2 + 2
        }
    }

    /// Parses the marker, QMUX sub-header and per-service sub-header. `buf` must
    /// contain at least the full declared frame (`qmux.length + 1` bytes).
    pub fn parse(buf: &[u8]) -> Result<(Header, usize)> {
        let r = Reader::new(buf);
        if r.u8(0)? != MARKER {
            return Err(Error::Core(CoreError::InvalidMessage("bad qmux marker".to_string())));
        }

        let qmux_length = r.u16_le(1)? as usize;
        let total_len = qmux_length + 1;
        if buf.len() < total_len {
            return Err(octets::Error::BufferTooShort { buf: buf.len(), req: total_len }.into());
        }

        let service = r.u8(4)?;
        let client = r.u8(5)?;
        let svc_flags = r.u8(6)?;
        let kind = MessageKind::from_u8(svc_flags)?;

        let (transaction, message_id, tlv_length, tlv_start) = if service == CONTROL_SERVICE {
            let transaction = r.u8(7)? as u16;
            let message_id = r.u16_le(8)?;
            let tlv_length = r.u16_le(10)? as usize;
            (transaction, message_id, tlv_length, 12usize)
        } else {
            let transaction = r.u16_le(7)?;
            let message_id = r.u16_le(9)?;
            let tlv_length = r.u16_le(11)? as usize;
            (transaction, message_id, tlv_length, 13usize)
        };

        if tlv_start + tlv_length != total_len {
            return Err(Error::Core(CoreError::InvalidMessage(format!(
                "tlv_length {} inconsistent with frame length {}",
                tlv_length, total_len
            ))));
        }

        Ok((
            Header {
                kind,
                service,
                client,
                transaction,
                message_id,
            },
            tlv_start,
        ))
    }

    /// Serialises the marker, QMUX sub-header and per-service sub-header to `w`.
    /// `tlv_length` is the byte length of the TLV stream the caller appends afterwards.
    pub fn write(&self, w: &mut Writer, tlv_length: u16) {
        let qmux_length = (self.header_len() - 1 + tlv_length as usize) as u16;

        w.u8(MARKER);
        w.u16_le(qmux_length);
        w.u8(0); // qmux-level flags, unused by this crate
        w.u8(self.service);
        w.u8(self.client);
        w.u8(self.kind.as_u8());

        if self.is_control() {
            w.u8(self.transaction as u8);
        } else {
            w.u16_le(self.transaction);
        }
        w.u16_le(self.message_id);
        w.u16_le(tlv_length);
    }
}
