use crate::error::Error;
use crate::uuid::Uuid;
use byteorder::{ByteOrder, LittleEndian};

/// A bounds-checked, non-owning view into a byte buffer. Every accessor validates the
/// requested range against the declared buffer length before touching memory and returns
/// `Error::BufferTooShort` instead of panicking, per spec.md §4.1: "on failure, signal
/// InvalidMessage(...); rejection never aborts the process".
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    #[inline]
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.buf
    }

    #[inline]
    fn check(&self, offset: usize, want: usize) -> Result<(), Error> {
        let req = offset.saturating_add(want);
        if req > self.buf.len() {
            return Err(Error::BufferTooShort {
                buf: self.buf.len(),
                req,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn u8(&self, offset: usize) -> Result<u8, Error> {
        self.check(offset, 1)?;
        Ok(self.buf[offset])
    }

    #[inline]
    pub fn u16_le(&self, offset: usize) -> Result<u16, Error> {
        self.check(offset, 2)?;
        Ok(LittleEndian::read_u16(&self.buf[offset..offset + 2]))
    }

    #[inline]
    pub fn u32_le(&self, offset: usize) -> Result<u32, Error> {
        self.check(offset, 4)?;
        Ok(LittleEndian::read_u32(&self.buf[offset..offset + 4]))
    }

    #[inline]
    pub fn u64_le(&self, offset: usize) -> Result<u64, Error> {
        self.check(offset, 8)?;
        Ok(LittleEndian::read_u64(&self.buf[offset..offset + 8]))
    }

    #[inline]
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], Error> {
        self.check(offset, len)?;
        Ok(&self.buf[offset..offset + len])
    }

    /// Reads a raw 16-byte UUID (MBIM wire order, compared by raw bytes).
    #[inline]
    pub fn uuid(&self, offset: usize) -> Result<Uuid, Error> {
        let raw = self.bytes(offset, 16)?;
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(raw);
        Ok(Uuid::from_bytes(bytes))
    }

    /// Decodes `len` bytes at `offset` as UTF-16LE, rejecting unpaired surrogates.
    #[inline]
    pub fn utf16le(&self, offset: usize, len: usize) -> Result<String, Error> {
        let raw = self.bytes(offset, len)?;
        crate::text::utf16le_to_utf8(raw)
    }

    /// Reads an array of `n` fixed-size elements of width `elem_size`, one contiguous
    /// block starting at `offset` (spec.md §4.3 "fixed-size array inline").
    #[inline]
    pub fn fixed_array(&self, offset: usize, n: usize, elem_size: usize) -> Result<&'a [u8], Error> {
        self.bytes(offset, n * elem_size)
    }

    /// Re-bases this reader at `struct_base_offset`, for reading nested structs whose
    /// offsets are relative to themselves rather than the top-level buffer (spec.md §4.3:
    /// "It accepts a `struct_base_offset` parameter").
    #[inline]
    pub fn nested(&self, struct_base_offset: usize) -> Reader<'a> {
        Reader {
            buf: &self.buf[struct_base_offset.min(self.buf.len())..],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_integers() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00];
        let r = Reader::new(&data);
        assert_eq!(r.u32_le(0).unwrap(), 1);
        assert_eq!(r.u32_le(4).unwrap(), 16);
    }

    #[test]
    fn rejects_out_of_bounds_reads() {
        let data = [0u8; 4];
        let r = Reader::new(&data);
        let err = r.u64_le(0).unwrap_err();
        assert_eq!(
            err,
            Error::BufferTooShort { buf: 4, req: 8 }
        );
        assert_eq!(err.to_string(), "cannot read 8 bytes (buf=4 < req=8)");
    }

    #[test]
    fn reads_uuid_by_raw_bytes() {
        let mut data = [0u8; 16];
        data[0] = 0xaa;
        data[15] = 0xee;
        let r = Reader::new(&data);
        let uuid = r.uuid(0).unwrap();
        assert_eq!(uuid.as_bytes()[0], 0xaa);
        assert_eq!(uuid.as_bytes()[15], 0xee);
    }

    #[test]
    fn nested_reader_rebases_offsets() {
        let data = [0xffu8, 0x01, 0x00, 0x00, 0x00];
        let r = Reader::new(&data).nested(1);
        assert_eq!(r.u32_le(0).unwrap(), 1);
    }
}
