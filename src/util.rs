use std::{ascii, fmt, str};

/// A type that wraps a single byte with a convenient fmt::Debug impl that
/// escapes the byte.
pub struct DebugByte(pub u8);

impl fmt::Debug for DebugByte {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_byte(f, self.0)
    }
}

/// A type that wraps a scalar value with a fmt::Debug impl that prints
/// printable ASCII as-is and escapes everything else.
pub struct DebugChar(pub char);

impl fmt::Debug for DebugChar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_ascii() {
            fmt_byte(f, self.0 as u8)
        } else {
            write!(f, "\\u{{{:X}}}", self.0 as u32)
        }
    }
}

/// Write the byte in its escaped form (using ascii::escape_default) to the
/// given formatter without allocating.
pub fn fmt_byte(f: &mut fmt::Formatter, b: u8) -> fmt::Result {
    // 10 bytes is enough to cover any output from ascii::escape_default.
    let mut bytes = [0u8; 10];
    let mut len = 0;
    for (i, mut b) in ascii::escape_default(b).enumerate() {
        // capitalize \xab to \xAB
        if i >= 2 && b'a' <= b && b <= b'f' {
            b -= 32;
        }
        bytes[len] = b;
        len += 1;
    }
    // escape_default only ever yields ASCII.
    match str::from_utf8(&bytes[..len]) {
        Ok(s) => write!(f, "{}", s),
        Err(_) => Err(fmt::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_byte() {
        assert_eq!("a", format!("{:?}", DebugByte(b'a')));
        assert_eq!("\\n", format!("{:?}", DebugByte(b'\n')));
        assert_eq!("\\xFF", format!("{:?}", DebugByte(0xFF)));
    }

    #[test]
    fn debug_char() {
        assert_eq!("z", format!("{:?}", DebugChar('z')));
        assert_eq!("\\u{212A}", format!("{:?}", DebugChar('\u{212A}')));
    }
}
