//! Derivation of entry filenames from call arguments

use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Derives the file stem for an argument.
///
/// With `hash_filenames` the stem is the lowercase hex SHA-256 of the argument's
/// string form. Otherwise it is the string form with every `/` replaced by `_`.
/// No other characters are touched, so `"a/b"` and `"a_b"` share an entry.
pub fn derive_key<A: Display + ?Sized>(arg: &A, hash_filenames: bool) -> String {
    let repr = arg.to_string();
    if hash_filenames {
        hash_key(&repr)
    } else {
        repr.replace('/', "_")
    }
}

fn hash_key(repr: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repr.as_bytes());
    hex::encode(hasher.finalize())
}
