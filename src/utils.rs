//! Small helpers shared across the crate.

use md5::Context as Md5;

/// Computes a prefixed MD5 hash ID for a string.
///
/// # Arguments
/// * `content` - The string to hash
/// * `prefix` - Prefix prepended to the hex digest (e.g. "sum-")
pub fn hash_id(content: &str, prefix: &str) -> String {
    let mut hasher = Md5::new();
    hasher.consume(content.as_bytes());
    format!("{}{:x}", prefix, hasher.compute())
}
