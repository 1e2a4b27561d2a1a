//! Note checksums.

/// Hex-encoded BLAKE3 digest of a note's content.
///
/// Lines are hashed with a `\n` terminator each, so LF and CRLF copies of
/// a note share a checksum. A missing final newline counts as present.
pub fn note_checksum(content: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    for line in content.lines() {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable() {
        // Stored in the index, so it must not change between builds.
        assert_eq!(note_checksum("a\nb\n"), blake3::hash(b"a\nb\n").to_hex().to_string());
        assert_eq!(note_checksum("").len(), 64);
    }

    #[test]
    fn test_checksum_tracks_content() {
        assert_ne!(note_checksum("# Daily"), note_checksum("# Daily\n\nedited"));
    }

    #[test]
    fn test_checksum_ignores_line_endings() {
        assert_eq!(note_checksum("a\nb\n"), note_checksum("a\r\nb\r\n"));
        assert_eq!(note_checksum("a\nb"), note_checksum("a\nb\n"));
    }
}
