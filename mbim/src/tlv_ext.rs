use crate::error::{Error, Result};
use octets::{CoreError, Reader, Writer};

/// Recognised MBIM v3 extended-TLV record kinds (spec.md §4.3.1: "Named retrieval by
/// type is provided for recognised record kinds"). The numeric assignment is this
/// crate's own registry, not part of the wire format itself.
pub const TLV_TYPE_WCHAR_STRING: u16 = 1;
pub const TLV_TYPE_PCO_BLOB: u16 = 2;
pub const TLV_TYPE_WAKE_COMMAND: u16 = 3;
pub const TLV_TYPE_WAKE_PACKET: u16 = 4;

/// One extended-TLV record: `type:u16` (top 2 bits are a padding count, bottom 14 bits
/// the type), `reserved:u16`, `length:u32`, `data:[length]u8`, `pad:0..3` (spec.md
/// §4.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtTlv<'a> {
    pub tlv_type: u16,
    pub data: &'a [u8],
}

/// Appends one extended-TLV record to `w`, computing and emitting its own padding.
pub fn append_ext_tlv(w: &mut Writer, tlv_type: u16, data: &[u8]) {
    let pad_len = (4 - data.len() % 4) % 4;
    let raw_type = ((pad_len as u16) << 14) | (tlv_type & 0x3fff);
    w.u16_le(raw_type);
    w.u16_le(0); // reserved
    w.u32_le(data.len() as u32);
    w.bytes(data);
    for _ in 0..pad_len {
        w.u8(0);
    }
}

/// Walks every extended-TLV record in `buf` in order (spec.md §4.3.1
/// `iterate_unnamed_tlvs`).
pub fn iterate_unnamed_tlvs(buf: &[u8]) -> Result<Vec<ExtTlv<'_>>> {
    let r = Reader::new(buf);
    let mut out = Vec::new();
    let mut offset = 0;

    while offset < buf.len() {
        let raw_type = r.u16_le(offset)?;
        let pad_len = ((raw_type >> 14) & 0x3) as usize;
        let tlv_type = raw_type & 0x3fff;
        let _reserved = r.u16_le(offset + 2)?;
        let length = r.u32_le(offset + 4)? as usize;
        let data = r.bytes(offset + 8, length)?;
        out.push(ExtTlv { tlv_type, data });
        offset += 8 + length + pad_len;
    }

    Ok(out)
}

fn find<'a>(buf: &'a [u8], tlv_type: u16) -> Result<&'a [u8]> {
    iterate_unnamed_tlvs(buf)?
        .into_iter()
        .find(|tlv| tlv.tlv_type == tlv_type)
        .map(|tlv| tlv.data)
        .ok_or(Error::Core(CoreError::TlvNotFound))
}

pub fn wchar_string(buf: &[u8]) -> Result<String> {
    Ok(octets::utf16le_to_utf8(find(buf, TLV_TYPE_WCHAR_STRING)?)?)
}

pub fn pco_blob(buf: &[u8]) -> Result<&[u8]> {
    find(buf, TLV_TYPE_PCO_BLOB)
}

pub fn wake_command(buf: &[u8]) -> Result<&[u8]> {
    find(buf, TLV_TYPE_WAKE_COMMAND)
}

pub fn wake_packet(buf: &[u8]) -> Result<&[u8]> {
    find(buf, TLV_TYPE_WAKE_PACKET)
}
