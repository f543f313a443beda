use crate::error::{Error, Result};
use octets::{CoreError, Reader};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Reads a "fixed prefix + offset-referenced variable tail" layout built by
/// [`crate::builder::Builder`] (spec.md §4.3): a bounds-checked cursor over the fixed
/// region, resolving offset fields into the variable region of the same buffer. Nested
/// structs whose own offsets are relative to their own start, not the top-level buffer,
/// are read via [`InfoReader::nested_at`].
#[derive(Clone, Copy)]
pub struct InfoReader<'a> {
    reader: Reader<'a>,
    cursor: usize,
}

impl<'a> InfoReader<'a> {
    pub fn new(buf: &'a [u8]) -> InfoReader<'a> {
        InfoReader {
            reader: Reader::new(buf),
            cursor: 0,
        }
    }

    /// A reader over a nested struct embedded at `struct_base_offset` within this
    /// buffer, whose own fixed-region offsets are relative to that position (spec.md
    /// §4.3: "accepts a `struct_base_offset` parameter").
    pub fn nested_at(&self, struct_base_offset: usize) -> InfoReader<'a> {
        InfoReader {
            reader: self.reader.nested(struct_base_offset),
            cursor: 0,
        }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let v = self.reader.u32_le(self.cursor)?;
        self.cursor += 4;
        Ok(v)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let v = self.reader.u64_le(self.cursor)?;
        self.cursor += 8;
        Ok(v)
    }

    pub fn read_uuid(&mut self) -> Result<octets::Uuid> {
        let v = self.reader.uuid(self.cursor)?;
        self.cursor += 16;
        Ok(v)
    }

    pub fn read_ipv4_inline(&mut self) -> Result<Ipv4Addr> {
        let b = self.reader.bytes(self.cursor, 4)?;
        self.cursor += 4;
        Ok(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
    }

    pub fn read_ipv6_inline(&mut self) -> Result<Ipv6Addr> {
        let b = self.reader.bytes(self.cursor, 16)?;
        let mut octets = [0u8; 16];
        octets.copy_from_slice(b);
        self.cursor += 16;
        Ok(Ipv6Addr::from(octets))
    }

    /// Reads an `(offset, size)` pair and decodes the UTF-16LE string it points to. A
    /// zero offset with zero size, per [`crate::builder::Builder::append_string`], means
    /// absent/empty; a zero offset with non-zero size is invalid (spec.md §3 invariant).
    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.reader.u32_le(self.cursor)?;
        let size = self.reader.u32_le(self.cursor + 4)?;
        self.cursor += 8;
        if size == 0 {
            return Ok(String::new());
        }
        if offset == 0 {
            return Err(Error::Core(CoreError::InvalidMessage(
                "offset 0 with non-zero length is invalid".to_string(),
            )));
        }
        Ok(self.reader.utf16le(offset as usize, size as usize)?)
    }

    /// Mirrors [`crate::builder::Builder::append_byte_array`]'s four layouts. When
    /// `with_length` is `false` the caller must supply the length via `known_length`
    /// (carried by a sibling field, or read to end of message).
    pub fn read_byte_array(
        &mut self,
        with_offset: bool,
        with_length: bool,
        swapped: bool,
        known_length: Option<usize>,
    ) -> Result<&'a [u8]> {
        match (with_offset, with_length) {
            (true, true) => {
                let (offset, length) = if swapped {
                    let length = self.reader.u32_le(self.cursor)?;
                    let offset = self.reader.u32_le(self.cursor + 4)?;
                    (offset, length)
                } else {
                    let offset = self.reader.u32_le(self.cursor)?;
                    let length = self.reader.u32_le(self.cursor + 4)?;
                    (offset, length)
                };
                self.cursor += 8;
                Ok(self.reader.bytes(offset as usize, length as usize)?)
            }
            (false, true) => {
                let length = self.reader.u32_le(self.cursor)? as usize;
                self.cursor += 4;
                let slice = self.reader.bytes(self.cursor, length)?;
                self.cursor += length;
                Ok(slice)
            }
            (true, false) => {
                let offset = self.reader.u32_le(self.cursor)?;
                self.cursor += 4;
                let length = known_length.ok_or(Error::Core(CoreError::InvalidArgs))?;
                Ok(self.reader.bytes(offset as usize, length)?)
            }
            (false, false) => {
                let length = known_length.ok_or(Error::Core(CoreError::InvalidArgs))?;
                let slice = self.reader.bytes(self.cursor, length)?;
                self.cursor += length;
                Ok(slice)
            }
        }
    }

    /// Reads an offset-only indirection to `count` IPv4 addresses (the count is carried
    /// by a sibling field the caller reads separately).
    pub fn read_ipv4_array(&mut self, count: usize) -> Result<Vec<Ipv4Addr>> {
        let offset = self.reader.u32_le(self.cursor)? as usize;
        self.cursor += 4;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let b = self.reader.bytes(offset + i * 4, 4)?;
            out.push(Ipv4Addr::new(b[0], b[1], b[2], b[3]));
        }
        Ok(out)
    }

    pub fn read_ipv6_array(&mut self, count: usize) -> Result<Vec<Ipv6Addr>> {
        let offset = self.reader.u32_le(self.cursor)? as usize;
        self.cursor += 4;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let b = self.reader.bytes(offset + i * 16, 16)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(b);
            out.push(Ipv6Addr::from(octets));
        }
        Ok(out)
    }

    /// Reads an element count followed by `n` `(offset, size)` descriptors, returning one
    /// sub-[`InfoReader`] per struct (spec.md §4.2.1 "Arrays of structs").
    pub fn read_struct_array(&mut self) -> Result<Vec<InfoReader<'a>>> {
        let n = self.read_u32()? as usize;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let offset = self.reader.u32_le(self.cursor)?;
            let size = self.reader.u32_le(self.cursor + 4)?;
            self.cursor += 8;
            let slice = self.reader.bytes(offset as usize, size as usize)?;
            out.push(InfoReader::new(slice));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    #[test]
    fn round_trips_scalars_and_string() {
        let mut b = Builder::new();
        b.append_u32(42);
        b.append_u64(0xdead_beef_u64);
        b.append_string("hello");
        let buf = b.complete();

        let mut r = InfoReader::new(&buf);
        assert_eq!(r.read_u32().unwrap(), 42);
        assert_eq!(r.read_u64().unwrap(), 0xdead_beef_u64);
        assert_eq!(r.read_string().unwrap(), "hello");
    }

    #[test]
    fn round_trips_swapped_byte_array() {
        let mut b = Builder::new();
        b.append_byte_array(true, true, false, &[9, 8, 7], true);
        let buf = b.complete();

        let mut r = InfoReader::new(&buf);
        let data = r.read_byte_array(true, true, true, None).unwrap();
        assert_eq!(data, &[9, 8, 7]);
    }

    #[test]
    fn round_trips_struct_array() {
        let mut inner_a = Builder::new();
        inner_a.append_u32(1);
        let inner_a = inner_a.complete();
        let mut inner_b = Builder::new();
        inner_b.append_u32(2);
        let inner_b = inner_b.complete();

        let mut b = Builder::new();
        b.append_struct_array(&[inner_a, inner_b]);
        let buf = b.complete();

        let mut r = InfoReader::new(&buf);
        let mut items = r.read_struct_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].read_u32().unwrap(), 1);
        assert_eq!(items[1].read_u32().unwrap(), 2);
    }

    #[test]
    fn rejects_out_of_bounds_offset() {
        let buf = [0xffu8, 0xff, 0xff, 0xff, 4, 0, 0, 0];
        let mut r = InfoReader::new(&buf);
        assert!(r.read_string().is_err());
    }

    #[test]
    fn rejects_zero_offset_with_non_zero_length() {
        let buf = [0u8, 0, 0, 0, 4, 0, 0, 0];
        let mut r = InfoReader::new(&buf);
        let err = r.read_string().unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::InvalidMessage(_))));
    }

    #[test]
    fn zero_offset_with_zero_length_is_empty_string() {
        let buf = [0u8, 0, 0, 0, 0, 0, 0, 0];
        let mut r = InfoReader::new(&buf);
        assert_eq!(r.read_string().unwrap(), "");
    }
}
