use std::fmt::Write;

const BYTES_PER_ROW: usize = 16;

/// Renders a buffer as an offset-annotated hex dump, 16 bytes per row,
/// with a printable-character column: bytes in [32, 126] appear as
/// themselves, everything else as `.`.
///
/// An empty buffer renders as an empty string.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in data.chunks(BYTES_PER_ROW).enumerate() {
        let _ = write!(out, "{:08x}: ", row * BYTES_PER_ROW);
        for col in 0..BYTES_PER_ROW {
            match chunk.get(col) {
                Some(byte) => {
                    let _ = write!(out, "{:02x} ", byte);
                }
                None => out.push_str("   "),
            }
        }
        out.push_str(" | ");
        for col in 0..BYTES_PER_ROW {
            match chunk.get(col) {
                Some(&byte) if (32..=126).contains(&byte) => out.push(byte as char),
                Some(_) => out.push('.'),
                None => out.push(' '),
            }
        }
        out.push('\n');
    }
    out
}
