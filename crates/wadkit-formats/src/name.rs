//! Fixed-width lump name keys
//!
//! Directory names are 16 bytes on disk and are not guaranteed to be NUL
//! terminated. Lookups compare the canonical form: at most 16 significant
//! bytes, ASCII uppercase folded to lowercase, and every byte after the first
//! NUL forced to zero.

use std::fmt;

/// Width of a lump name in bytes
pub const LUMP_NAME_LEN: usize = 16;

/// Canonicalize `input` into `out`.
///
/// Copies at most [`LUMP_NAME_LEN`] bytes, stopping at the first NUL, folds
/// `A-Z` to `a-z` and zero-fills the remainder. Longer inputs are truncated
/// silently.
pub fn canonicalize(input: &[u8], out: &mut [u8; LUMP_NAME_LEN]) {
    let mut i = 0;
    while i < LUMP_NAME_LEN {
        match input.get(i) {
            Some(&c) if c != 0 => {
                out[i] = c.to_ascii_lowercase();
                i += 1;
            }
            _ => break,
        }
    }
    out[i..].fill(0);
}

/// Canonicalize a name in its own storage.
///
/// Each byte is read before it is written, so the result is identical to
/// [`canonicalize`] with the same buffer as input and output.
pub fn canonicalize_in_place(name: &mut [u8; LUMP_NAME_LEN]) {
    let mut terminated = false;
    for byte in name.iter_mut() {
        if *byte == 0 {
            terminated = true;
        }
        *byte = if terminated {
            0
        } else {
            byte.to_ascii_lowercase()
        };
    }
}

/// Canonical 16-byte lump name
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LumpName([u8; LUMP_NAME_LEN]);

impl LumpName {
    /// Build the canonical key for an arbitrary name
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        let mut out = [0u8; LUMP_NAME_LEN];
        canonicalize(name.as_ref(), &mut out);
        Self(out)
    }

    /// Canonicalize a raw on-disk name field
    pub fn from_raw(mut raw: [u8; LUMP_NAME_LEN]) -> Self {
        canonicalize_in_place(&mut raw);
        Self(raw)
    }

    /// Raw canonical bytes
    pub const fn as_bytes(&self) -> &[u8; LUMP_NAME_LEN] {
        &self.0
    }

    /// Significant bytes, without the zero padding
    pub fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(LUMP_NAME_LEN);
        &self.0[..end]
    }

    /// Whether the name has no significant bytes
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Check whether `bytes` already are in canonical form
    pub fn is_canonical(bytes: &[u8; LUMP_NAME_LEN]) -> bool {
        let mut copy = *bytes;
        canonicalize_in_place(&mut copy);
        copy == *bytes
    }
}

impl From<&str> for LumpName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.trimmed()))
    }
}

impl fmt::Debug for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LumpName({:?})", String::from_utf8_lossy(self.trimmed()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lowercases_and_pads() {
        let name = LumpName::new("CONCHARS");
        assert_eq!(&name.as_bytes()[..8], b"conchars");
        assert!(name.as_bytes()[8..].iter().all(|&b| b == 0));
        assert_eq!(name.to_string(), "conchars");
    }

    #[test]
    fn test_truncates_to_sixteen_bytes() {
        let name = LumpName::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(name.as_bytes(), b"abcdefghijklmnop");
        assert_eq!(name, LumpName::new("abcdefghijklmnop"));
    }

    #[test]
    fn test_stops_at_first_nul() {
        let raw = *b"DISC\0GARBAGE\xff\xfe\x01x";
        let name = LumpName::from_raw(raw);
        assert_eq!(name.trimmed(), b"disc");
        assert_eq!(name, LumpName::new("disc"));
    }

    #[test]
    fn test_non_letters_unchanged() {
        let name = LumpName::new("num_0+*[]");
        assert_eq!(name.trimmed(), b"num_0+*[]");
        assert_eq!(LumpName::new("Ä").trimmed(), "Ä".as_bytes());
    }

    #[test]
    fn test_empty_name() {
        let name = LumpName::new("");
        assert!(name.is_empty());
        assert_eq!(name.as_bytes(), &[0u8; LUMP_NAME_LEN]);
    }

    #[test]
    fn test_in_place_matches_copying_form() {
        let mut buf = *b"Sb_Armor1\0\0\0\0\0\0\0";
        let mut copied = [0xAAu8; LUMP_NAME_LEN];
        canonicalize(&buf, &mut copied);
        canonicalize_in_place(&mut buf);
        assert_eq!(buf, copied);
    }

    proptest! {
        #[test]
        fn canonical_form_is_idempotent(input in prop::collection::vec(any::<u8>(), 0..40)) {
            let once = LumpName::new(&input);
            let twice = LumpName::new(once.as_bytes());
            prop_assert_eq!(once, twice);
            prop_assert!(LumpName::is_canonical(once.as_bytes()));
        }

        #[test]
        fn canonical_form_has_no_uppercase(input in prop::collection::vec(any::<u8>(), 0..40)) {
            let name = LumpName::new(&input);
            prop_assert_eq!(name.as_bytes().len(), LUMP_NAME_LEN);
            prop_assert!(!name.as_bytes().iter().any(u8::is_ascii_uppercase));
        }

        #[test]
        fn in_place_agrees_with_copy(raw in prop::array::uniform16(any::<u8>())) {
            let mut out = [0u8; LUMP_NAME_LEN];
            canonicalize(&raw, &mut out);
            let name = LumpName::from_raw(raw);
            prop_assert_eq!(name.as_bytes(), &out);
        }
    }
}
