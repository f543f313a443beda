use crate::error::{Error, Result};
use crate::header::Header;
use std::fmt;
use std::sync::Arc;

/// An immutable owned byte sequence representing one QMUX frame (spec.md §3
/// "Message"). Cloning is cheap: the backing buffer is reference-counted.
#[derive(Clone)]
pub struct Message {
    bytes: Arc<[u8]>,
    header: Header,
    tlv_start: usize,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.as_ref() == other.bytes.as_ref()
    }
}
impl Eq for Message {}

impl Message {
    pub fn parse(bytes: Vec<u8>) -> Result<Message> {
        let (header, tlv_start) = Header::parse(&bytes)?;
        Ok(Message {
            bytes: Arc::from(bytes),
            header,
            tlv_start,
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

    /// The concatenated TLV stream following the per-service sub-header.
    pub fn tlv_bytes(&self) -> &[u8] {
        &self.bytes[self.tlv_start..]
    }

    /// Assembles a `Message` from a header and an already-built TLV stream.
    pub fn assemble(header: Header, tlvs: Vec<u8>) -> Message {
        let mut w = octets::Writer::new();
        header.write(&mut w, tlvs.len() as u16);
        w.bytes(&tlvs);
        let bytes = w.into_vec();
        let tlv_start = bytes.len() - tlvs.len();
        Message {
            header,
            bytes: Arc::from(bytes),
            tlv_start,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({:?}, {} bytes)", self.header.kind, self.bytes.len())
    }
}

impl fmt::Display for Message {
    /// A deterministic, line-prefixable, multi-line dump (spec.md §4.2.3). Never fails.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "QMI {:?} service={} client={} transaction={} message={:#06x}",
            self.header.kind, self.header.service, self.header.client, self.header.transaction, self.header.message_id
        )?;
        match crate::tlv::iterate(self.tlv_bytes()) {
            Ok(tlvs) => {
                for tlv in tlvs {
                    writeln!(f, "  tlv type={:#04x} len={}", tlv.tlv_type, tlv.value.len())?;
                    write!(f, "{}", octets::hex_dump(tlv.value))?;
                }
                Ok(())
            }
            Err(err) => writeln!(f, "Fields: {}", err),
        }
    }
}
