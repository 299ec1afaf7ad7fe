//! Ledger key and content-address encodings.
//!
//! File names are stored on the ledger under a hex key: the UTF-8 bytes of
//! the name, left-padded with zero bytes to a 32-byte word. The value stored
//! under that key is the 32-byte digest of the file content. The content
//! store prefixes that digest with a two-byte multihash header (`0x12` hash
//! algorithm, `0x20` digest length); the header is stripped before the
//! digest goes on the ledger and put back before the store is asked for the
//! content.

use thiserror::Error;

/// Width of a ledger word in bytes.
pub const WORD_LEN: usize = 32;

/// Multihash header in hex: algorithm `0x12`, length `0x20`.
pub const MULTIHASH_HEADER: &str = "1220";

/// Digest length in hex characters.
const DIGEST_HEX_LEN: usize = WORD_LEN * 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("key does not decode to UTF-8")]
    Utf8,

    #[error("content hash lacks the 1220 header: {0}")]
    MissingHeader(String),

    #[error("digest must be 64 hex characters: {0}")]
    BadDigest(String),

    #[error("no value stored")]
    Unset,
}

/// Ledger key for a file name.
///
/// Names longer than a word keep all their bytes. Leading NUL bytes are
/// indistinguishable from padding, so `"a"` and `"\0a"` share a key.
pub fn name_to_key(name: &str) -> String {
    let bytes = name.as_bytes();
    let pad = WORD_LEN.saturating_sub(bytes.len());
    let mut word = vec![0u8; pad];
    word.extend_from_slice(bytes);
    format!("0x{}", hex::encode(word))
}

/// Inverse of [`name_to_key`] for names without leading NUL bytes, which
/// are dropped along with the padding.
pub fn key_to_name(key: &str) -> Result<String, EncodingError> {
    let bytes = hex::decode(strip_0x(key))?;
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    String::from_utf8(bytes[start..].to_vec()).map_err(|_| EncodingError::Utf8)
}

/// Turns a content-store hash (`[0x]1220<digest>`) into the canonical
/// `0x<digest>` value kept on the ledger.
pub fn strip_multihash_header(store_hash: &str) -> Result<String, EncodingError> {
    let hash = strip_0x(store_hash);
    let digest = hash
        .strip_prefix(MULTIHASH_HEADER)
        .ok_or_else(|| EncodingError::MissingHeader(store_hash.to_string()))?;
    check_digest(digest)?;
    Ok(format!("0x{}", digest.to_ascii_lowercase()))
}

/// Rebuilds the content-store address from a digest read off the ledger.
pub fn full_address(stored: &str) -> Result<String, EncodingError> {
    let digest = strip_0x(stored);
    if digest.is_empty() || digest.bytes().all(|b| b == b'0') {
        return Err(EncodingError::Unset);
    }
    check_digest(digest)?;
    Ok(format!("{MULTIHASH_HEADER}{}", digest.to_ascii_lowercase()))
}

fn check_digest(digest: &str) -> Result<(), EncodingError> {
    if digest.len() != DIGEST_HEX_LEN || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EncodingError::BadDigest(digest.to_string()));
    }
    Ok(())
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn short_names_are_left_padded_to_a_word() {
        let key = name_to_key("AB");
        assert_eq!(key.len(), 2 + DIGEST_HEX_LEN);
        assert!(key.starts_with("0x0000"));
        assert!(key.ends_with("4142"));
    }

    #[test]
    fn long_names_are_not_truncated() {
        let name = "a".repeat(40);
        assert_eq!(name_to_key(&name), format!("0x{}", "61".repeat(40)));
    }

    #[test]
    fn key_decodes_back_to_name() {
        let long = "z".repeat(33);
        for name in ["greeting", "AB", "héllo wörld", long.as_str()] {
            assert_eq!(key_to_name(&name_to_key(name)).unwrap(), name);
        }
    }

    #[test]
    fn leading_nul_bytes_collapse_into_padding() {
        assert_eq!(name_to_key("a"), name_to_key("\0a"));
        assert_eq!(key_to_name(&name_to_key("\0a")).unwrap(), "a");
    }

    #[test]
    fn key_to_name_rejects_garbage() {
        assert!(matches!(key_to_name("0xzz"), Err(EncodingError::Hex(_))));
        assert_eq!(key_to_name("0xff"), Err(EncodingError::Utf8));
    }

    #[test]
    fn header_is_stripped_from_store_hash() {
        let stored = strip_multihash_header(&format!("0x1220{DIGEST}")).unwrap();
        assert_eq!(stored, format!("0x{DIGEST}"));

        let stored = strip_multihash_header(&format!("1220{DIGEST}")).unwrap();
        assert_eq!(stored, format!("0x{DIGEST}"));
    }

    #[test]
    fn hash_without_header_is_rejected() {
        let err = strip_multihash_header(&format!("0x1e20{DIGEST}")).unwrap_err();
        assert!(matches!(err, EncodingError::MissingHeader(_)));
    }

    #[test]
    fn truncated_digest_is_rejected() {
        let err = strip_multihash_header("0x1220abcd").unwrap_err();
        assert!(matches!(err, EncodingError::BadDigest(_)));
    }

    #[test]
    fn header_is_restored_for_lookup() {
        assert_eq!(
            full_address(&format!("0x{DIGEST}")).unwrap(),
            format!("1220{DIGEST}")
        );
    }

    #[test]
    fn zero_value_means_unset() {
        assert_eq!(full_address("0x0"), Err(EncodingError::Unset));
        assert_eq!(full_address(""), Err(EncodingError::Unset));
        assert_eq!(full_address("0x"), Err(EncodingError::Unset));
    }
}
