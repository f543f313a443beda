use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A 16-byte identifier compared by raw bytes and rendered in canonical
/// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` lowercase-hex form (spec.md §6 "UUID
/// rendering").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uuid([u8; 16]);

impl Uuid {
    #[inline]
    pub const fn from_bytes(bytes: [u8; 16]) -> Uuid {
        Uuid(bytes)
    }

    #[inline]
    pub const fn nil() -> Uuid {
        Uuid([0u8; 16])
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
        )
    }
}

impl FromStr for Uuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Uuid, Error> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 5
            || parts[0].len() != 8
            || parts[1].len() != 4
            || parts[2].len() != 4
            || parts[3].len() != 4
            || parts[4].len() != 12
        {
            return Err(Error::InvalidUuid);
        }

        let joined: String = parts.concat();
        if joined.len() != 32 || !joined.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidUuid);
        }

        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hex = &joined[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidUuid)?;
        }

        Ok(Uuid(bytes))
    }
}
