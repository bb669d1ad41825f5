//! Human-readable order numbers.
//!
//! Seven characters over `0-9A-Z`: short enough to read over the phone,
//! random enough (36^7 combinations) not to leak order volume.

use rand::rngs::OsRng;
use rand::RngCore;

pub const LEN: usize = 7;
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a candidate order number. Prefers the OS entropy source and
/// falls back to the thread-local generator when it is unavailable.
pub fn generate() -> String {
    let mut raw = [0u8; LEN];
    if OsRng.try_fill_bytes(&mut raw).is_err() {
        rand::thread_rng().fill_bytes(&mut raw);
    }
    raw.iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

pub fn is_well_formed(s: &str) -> bool {
    s.len() == LEN && s.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_numbers_are_well_formed() {
        for _ in 0..1000 {
            let n = generate();
            assert!(is_well_formed(&n), "malformed order number: {n}");
        }
    }

    #[test]
    fn shape_check_rejects_bad_input() {
        assert!(is_well_formed("A1B2C3D"));
        assert!(!is_well_formed("A1B2C3"));
        assert!(!is_well_formed("A1B2C3DD"));
        assert!(!is_well_formed("a1b2c3d"));
        assert!(!is_well_formed("A1B2C3-"));
    }
}
