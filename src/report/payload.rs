//! Binary-safe body rendering.

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Writes at most `max_size` bytes of `payload` to `out` and returns how many
/// bytes were cut off.
///
/// Printable payloads are written as text; anything else becomes a
/// `hexdump -C` style dump (offset, 16 hex bytes, ASCII column).
pub fn print_payload(out: &mut String, payload: &[u8], max_size: usize) -> usize {
    let (shown, cropped) = if payload.len() > max_size {
        (&payload[..max_size], payload.len() - max_size)
    } else {
        (payload, 0)
    };

    if is_printable(shown) {
        out.push_str(&String::from_utf8_lossy(shown));
    } else {
        hex_dump(out, shown);
    }
    cropped
}

/// Byte-wise printability: ASCII graphic characters, space and any byte of a
/// multi-byte UTF-8 sequence. Control characters, newlines included, are not
/// printable.
pub fn is_printable(payload: &[u8]) -> bool {
    payload.iter().all(|&b| (0x20..=0x7e).contains(&b) || b >= 0x80)
}

fn hex_dump(out: &mut String, data: &[u8]) {
    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let _ = write!(out, "{:08x}  ", line * BYTES_PER_LINE);
        for slot in 0..BYTES_PER_LINE {
            match chunk.get(slot) {
                Some(b) => {
                    let _ = write!(out, "{b:02x} ");
                }
                None => out.push_str("   "),
            }
            if slot == 7 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| {
            if (32..=126).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
}
