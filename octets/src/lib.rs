//! Shared little-endian octet-buffer primitives used by both the `mbim` and `qmi`
//! dialects: bounds-checked typed reads/writes, UUID rendering, UTF-16LE round-trip,
//! hex pretty-printing, and the `Core` layer of the three-layer error taxonomy (spec.md
//! §4.1, §7).

pub mod error;
pub mod hex;
pub mod logging;
pub mod reader;
pub mod text;
pub mod uuid;
pub mod writer;

pub use error::{CoreError, Error};
pub use hex::hex_dump;
pub use reader::Reader;
pub use text::{utf16le_to_utf8, utf8_to_utf16le_padded};
pub use uuid::Uuid;
pub use writer::Writer;

/// Appends zero bytes to `buf` until its length is a multiple of four (spec.md §4.1
/// `pad_to_4`), for callers holding a raw `Vec<u8>` rather than a [`Writer`].
#[inline]
pub fn pad_to_4(buf: &mut Vec<u8>) {
    let rem = buf.len() % 4;
    if rem != 0 {
        buf.extend(std::iter::repeat(0u8).take(4 - rem));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_to_4_on_raw_vec() {
        let mut buf = vec![1u8, 2, 3];
        pad_to_4(&mut buf);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf, vec![1, 2, 3, 0]);
    }
}
