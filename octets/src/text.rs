use crate::error::Error;

/// Decodes a UTF-16LE byte sequence to a `String`, rejecting unpaired surrogates.
/// Trailing zero padding (spec.md §4.1) is tolerated: a trailing `0x0000` code unit is
/// dropped, since the encoder pads with zero *bytes*, not necessarily an even count of
/// trailing NUL code units, but in practice strings never embed one.
pub fn utf16le_to_utf8(bytes: &[u8]) -> Result<String, Error> {
    if bytes.len() % 2 != 0 {
        return Err(Error::InvalidUtf16);
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    // Drop padding: zero-valued trailing code units are not part of the string, they're
    // padding emitted by `pad_to_4` filling out the variable region.
    let trimmed_len = units.iter().rposition(|&u| u != 0).map_or(0, |pos| pos + 1);

    String::from_utf16(&units[..trimmed_len]).map_err(|_| Error::InvalidUtf16)
}

/// Encodes a `&str` to UTF-16LE bytes, then pads with zero bytes to a 4-byte boundary
/// (spec.md §4.1: "the encoder writes 2 bytes per code unit, then pads with zero bytes
/// until the total reaches a multiple of four").
pub fn utf8_to_utf16le_padded(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2 + 4);
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    let rem = out.len() % 4;
    if rem != 0 {
        out.extend(std::iter::repeat(0u8).take(4 - rem));
    }
    out
}
