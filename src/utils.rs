use std::fmt;

/// Wrapper around `&[u8]` that has a human-readable debug representation:
/// printable ASCII characters are printed as characters, everything else as
/// escapes. Used in tests to compare byte slices as text.
#[derive(PartialEq)]
pub(crate) struct Bytes<'a>(pub &'a [u8]);

impl<'a> fmt::Debug for Bytes<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "b\"")?;
        for &b in self.0 {
            match b {
                32..=33 | 35..=91 | 93..=126 => write!(f, "{}", b as char)?,
                b'"' => write!(f, "\\\"")?,
                b'\\' => write!(f, "\\\\")?,
                b'\r' => write!(f, "\\r")?,
                b'\n' => write!(f, "\\n")?,
                b'\t' => write!(f, "\\t")?,
                _ => write!(f, "\\x{:02x}", b)?,
            }
        }
        write!(f, "\"")
    }
}
