//! Content-derived artifact naming.

use sha2::{
    Digest,
    Sha256,
};

/// Hex characters kept from the digest.
///
/// 6 digits are enough to tell apart the handful of artifacts one build
/// produces; the name is a cache-busting tag, not a cryptographic identity.
const HASH_LEN: usize = 6;

/// Compute the short content hash used in non-development artifact basenames.
///
/// The same bytes always produce the same tag, so two builds over
/// byte-identical merged content publish under byte-identical names.
#[must_use]
pub fn content_hash(content: &[u8]) -> String {
    let mut digest = hex::encode(Sha256::digest(content));
    digest.truncate(HASH_LEN);
    digest
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_content_hash_is_deterministic() {
        let first = content_hash(b"{\"hello\":\"Hello\"}");
        let second = content_hash(b"{\"hello\":\"Hello\"}");

        assert_that!(first, eq(second.as_str()));
    }

    #[rstest]
    fn test_content_hash_changes_with_content() {
        let first = content_hash(b"{\"hello\":\"Hello\"}");
        let second = content_hash(b"{\"hello\":\"Hallo\"}");

        assert_that!(first, not(eq(second.as_str())));
    }

    #[rstest]
    fn test_content_hash_is_six_lowercase_hex_chars() {
        let hash = content_hash(b"content");

        assert_that!(hash.len(), eq(6));
        assert_that!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()), eq(true));
    }
}
