//! Cache Key Module
//!
//! Derives the storage key for a source text.

use super::CACHE_NAMESPACE;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// == Derive Key ==
/// Maps a source text to its namespaced cache key.
///
/// The result depends on the text alone, so it is stable across restarts and
/// matches keys written by earlier processes with the same format version.
pub fn derive_key(source_text: &str) -> String {
    format!("{}{}", CACHE_NAMESPACE, hash_text(source_text))
}

// == Hash Text ==
/// Rolling 31-multiplier hash over UTF-16 code units, printed in base 36.
///
/// Arithmetic wraps at 32 bits; the absolute value is taken after widening
/// so `i32::MIN` maps to 2^31 instead of overflowing.
pub fn hash_text(text: &str) -> String {
    let hash = text.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });
    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
