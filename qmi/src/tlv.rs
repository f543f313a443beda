use crate::error::{Error, Result};
use octets::{CoreError, Reader, Writer};

/// One QMI TLV record: `type:u8, length:u16, value:[length]u8` (spec.md §4.2.2). The
/// value region concatenates TLVs back-to-back with no padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tlv_type: u8,
    pub value: &'a [u8],
}

pub const RESULT_TLV_TYPE: u8 = 0x02;

/// Appends one TLV to `w`.
pub fn append(w: &mut Writer, tlv_type: u8, value: &[u8]) {
    w.u8(tlv_type);
    w.u16_le(value.len() as u16);
    w.bytes(value);
}

/// Walks every TLV in `buf` in order. Rejects a stream whose TLVs collectively overflow
/// the buffer (spec.md §4.2.2: "Validation rejects messages ... whose TLVs collectively
/// overflow the payload").
pub fn iterate(buf: &[u8]) -> Result<Vec<Tlv<'_>>> {
    let r = Reader::new(buf);
    let mut out = Vec::new();
    let mut offset = 0;

    while offset < buf.len() {
        let tlv_type = r.u8(offset)?;
        let length = r.u16_le(offset + 1)? as usize;
        let value = r.bytes(offset + 3, length)?;
        out.push(Tlv { tlv_type, value });
        offset += 3 + length;
    }

    Ok(out)
}

/// Exact-length retrieval: rejects if the stored length differs from `want`.
pub fn get_exact<'a>(buf: &'a [u8], tlv_type: u8, want: usize) -> Result<&'a [u8]> {
    let value = get_variable(buf, tlv_type)?;
    if value.len() != want {
        return Err(Error::Core(CoreError::InvalidMessage(format!(
            "tlv {:#04x} has length {}, expected {}",
            tlv_type,
            value.len(),
            want
        ))));
    }
    Ok(value)
}

/// Bounded retrieval: rejects if the stored length exceeds `cap`.
pub fn get_bounded<'a>(buf: &'a [u8], tlv_type: u8, cap: usize) -> Result<&'a [u8]> {
    let value = get_variable(buf, tlv_type)?;
    if value.len() > cap {
        return Err(Error::Core(CoreError::TlvTooLong));
    }
    Ok(value)
}

/// Variable retrieval: returns the stored length as-is. A missing TLV is a first-class
/// recoverable outcome, not a format error (spec.md §4.2.2).
pub fn get_variable<'a>(buf: &'a [u8], tlv_type: u8) -> Result<&'a [u8]> {
    iterate(buf)?
        .into_iter()
        .find(|tlv| tlv.tlv_type == tlv_type)
        .map(|tlv| tlv.value)
        .ok_or(Error::Core(CoreError::TlvNotFound))
}

/// Decodes the universal result TLV (type `0x02`): `status:u16, error:u16`. Status 0 is
/// success; any other status surfaces `error` as a Protocol error code (spec.md §4.2.2,
/// §8 scenario 4).
pub fn decode_result(buf: &[u8]) -> Result<()> {
    let value = get_exact(buf, RESULT_TLV_TYPE, 4)?;
    let status = u16::from_le_bytes([value[0], value[1]]);
    let error = u16::from_le_bytes([value[2], value[3]]);

    if status == 0 {
        Ok(())
    } else {
        Err(Error::Protocol(crate::error::ProtocolError::from_code(error as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_single_tlv() {
        let mut w = Writer::new();
        append(&mut w, 0x10, &[1, 2, 3]);
        let buf = w.into_vec();

        let tlvs = iterate(&buf).unwrap();
        assert_eq!(tlvs.len(), 1);
        assert_eq!(tlvs[0].tlv_type, 0x10);
        assert_eq!(tlvs[0].value, &[1, 2, 3]);
    }

    #[test]
    fn missing_tlv_yields_not_found_without_side_effect() {
        let buf: Vec<u8> = Vec::new();
        assert_eq!(get_variable(&buf, 0x01).unwrap_err(), Error::Core(CoreError::TlvNotFound));
    }

    #[test]
    fn exact_length_rejects_mismatched_length() {
        let mut w = Writer::new();
        append(&mut w, 0x01, &[1, 2, 3]);
        let buf = w.into_vec();
        assert!(get_exact(&buf, 0x01, 2).is_err());
    }

    #[test]
    fn scenario_4_result_tlv_failure_surfaces_protocol_error_14() {
        // spec.md §8 scenario 4: status=0x0001, error=0x000E.
        let mut w = Writer::new();
        append(&mut w, RESULT_TLV_TYPE, &[0x01, 0x00, 0x0e, 0x00]);
        let buf = w.into_vec();

        let err = decode_result(&buf).unwrap_err();
        assert_eq!(err, Error::Protocol(crate::error::ProtocolError::Invalid(14)));
        assert_eq!(err.to_string(), "protocol error: Invalid(14) (code=14)");
    }

    #[test]
    fn scenario_4_success_status_yields_ok() {
        let mut w = Writer::new();
        append(&mut w, RESULT_TLV_TYPE, &[0x00, 0x00, 0x00, 0x00]);
        let buf = w.into_vec();
        assert!(decode_result(&buf).is_ok());
    }
}
