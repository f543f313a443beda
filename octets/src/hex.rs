/// Deterministic hex pretty-printer used by both dialects' `Display` impls (spec.md
/// §4.2.3): 16 bytes per line, an 8-digit hex offset prefix, and an ASCII gutter with
/// non-printable bytes rendered as `.`.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 4);

    for (line_no, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", line_no * 16));

        for (i, byte) in chunk.iter().enumerate() {
            out.push_str(&format!("{:02x} ", byte));
            if i == 7 {
                out.push(' ');
            }
        }

        for _ in chunk.len()..16 {
            out.push_str("   ");
        }
        if chunk.len() <= 8 {
            out.push(' ');
        }

        out.push_str(" |");
        for &byte in chunk {
            let printable = (0x20..=0x7e).contains(&byte);
            out.push(if printable { byte as char } else { '.' });
        }
        out.push('|');
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_offsets_and_ascii_gutter() {
        let dump = hex_dump(b"internet");
        assert!(dump.starts_with("00000000  "));
        assert!(dump.contains("|internet|"));
    }

    #[test]
    fn handles_empty_input() {
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn escapes_non_printable_bytes() {
        let dump = hex_dump(&[0x00, 0x01, 0xff]);
        assert!(dump.contains("|...|"));
    }
}
