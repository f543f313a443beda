use octets::{Uuid, Writer};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Assembles an MBIM "fixed prefix + offset-referenced variable tail" layout (spec.md
/// §4.3): the information buffer of a Command/CommandDone/Indication, or any nested
/// struct within one. Every call that emits a variable item records a deferred offset;
/// [`Builder::complete`] patches every placeholder to be relative to the start of the
/// combined buffer, then concatenates fixed and variable.
#[derive(Default)]
pub struct Builder {
    fixed: Writer,
    variable: Writer,
    deferred: Vec<usize>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            fixed: Writer::new(),
            variable: Writer::new(),
            deferred: Vec::new(),
        }
    }

    pub fn append_u32(&mut self, value: u32) {
        self.fixed.u32_le(value);
    }

    pub fn append_u64(&mut self, value: u64) {
        self.fixed.u64_le(value);
    }

    pub fn append_uuid(&mut self, uuid: &Uuid) {
        self.fixed.uuid(uuid);
    }

    pub fn append_ipv4_inline(&mut self, addr: Ipv4Addr) {
        self.fixed.bytes(&addr.octets());
    }

    pub fn append_ipv6_inline(&mut self, addr: Ipv6Addr) {
        self.fixed.bytes(&addr.octets());
    }

    /// Appends a string as `(offset, size)` fields in the fixed region, with the
    /// UTF-16LE bytes in the variable region. An empty string writes `(0, 0)` and emits
    /// nothing into the variable region (spec.md §3: "offset of 0 with length 0 denotes
    /// an absent string").
    pub fn append_string(&mut self, s: &str) {
        if s.is_empty() {
            self.fixed.u32_le(0);
            self.fixed.u32_le(0);
            return;
        }

        let encoded = octets::utf8_to_utf16le_padded(s);
        let size = s.encode_utf16().count() as u32 * 2;
        self.push_offset_len_pair(size, false);
        self.variable.bytes(&encoded);
    }

    /// The five canonical byte-array layouts from spec.md §4.3:
    ///
    /// - `(with_offset=true, with_length=true)`: offset+length in fixed, data in
    ///   variable. `swapped` selects length-then-offset field order.
    /// - `(with_offset=false, with_length=true)`: length in fixed, data immediately
    ///   follows in the fixed region (no indirection).
    /// - `(with_offset=true, with_length=false)`: offset only in fixed; the length is
    ///   carried by a sibling field the caller writes separately, or implied by "read to
    ///   end of message".
    /// - `(with_offset=false, with_length=false)`: fixed-size array inline in fixed.
    #[allow(clippy::fn_params_excessive_bools)]
    pub fn append_byte_array(&mut self, with_offset: bool, with_length: bool, pad: bool, bytes: &[u8], swapped: bool) {
        match (with_offset, with_length) {
            (true, true) => {
                self.push_offset_len_pair(bytes.len() as u32, swapped);
                self.variable.bytes(bytes);
                if pad {
                    self.variable.pad_to_4();
                }
            }
            (false, true) => {
                self.fixed.u32_le(bytes.len() as u32);
                self.fixed.bytes(bytes);
                if pad {
                    self.fixed.pad_to_4();
                }
            }
            (true, false) => {
                self.deferred.push(self.fixed.len());
                self.fixed.u32_le(self.variable.len() as u32);
                self.variable.bytes(bytes);
                if pad {
                    self.variable.pad_to_4();
                }
            }
            (false, false) => {
                self.fixed.bytes(bytes);
                if pad {
                    self.fixed.pad_to_4();
                }
            }
        }
    }

    /// Appends an offset-only indirection to a block of `n` IPv4 addresses; the count
    /// must be written by the caller into a sibling field (spec.md §4.3).
    pub fn append_ipv4_array(&mut self, addrs: &[Ipv4Addr]) {
        self.deferred.push(self.fixed.len());
        self.fixed.u32_le(self.variable.len() as u32);
        for addr in addrs {
            self.variable.bytes(&addr.octets());
        }
    }

    pub fn append_ipv6_array(&mut self, addrs: &[Ipv6Addr]) {
        self.deferred.push(self.fixed.len());
        self.fixed.u32_le(self.variable.len() as u32);
        for addr in addrs {
            self.variable.bytes(&addr.octets());
        }
    }

    /// Appends an element count followed by `n` `(offset, size)` descriptors, each
    /// pointing at one already-serialised struct placed in the variable region
    /// (spec.md §4.2.1 "Arrays of structs").
    pub fn append_struct_array(&mut self, items: &[Vec<u8>]) {
        self.fixed.u32_le(items.len() as u32);
        for item in items {
            self.push_offset_len_pair(item.len() as u32, false);
            self.variable.bytes(item);
            self.variable.pad_to_4();
        }
    }

    fn push_offset_len_pair(&mut self, length: u32, swapped: bool) {
        let var_offset = self.variable.len() as u32;
        if swapped {
            self.fixed.u32_le(length);
            self.deferred.push(self.fixed.len());
            self.fixed.u32_le(var_offset);
        } else {
            self.deferred.push(self.fixed.len());
            self.fixed.u32_le(var_offset);
            self.fixed.u32_le(length);
        }
    }

    /// Patches every deferred offset to be relative to the start of the combined
    /// buffer, then concatenates the fixed and variable regions.
    pub fn complete(mut self) -> Vec<u8> {
        let fixed_len = self.fixed.len() as u32;
        let mut fixed = self.fixed.into_vec();

        for pos in &self.deferred {
            let current = u32::from_le_bytes([fixed[*pos], fixed[*pos + 1], fixed[*pos + 2], fixed[*pos + 3]]);
            let patched = current + fixed_len;
            fixed[*pos..*pos + 4].copy_from_slice(&patched.to_le_bytes());
        }

        fixed.extend_from_slice(self.variable.as_slice());
        self.variable = Writer::new();
        fixed
    }
}
