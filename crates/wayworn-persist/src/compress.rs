use crate::error::PersistError;

/// Upper bound on a decompressed body. Guards allocation against a corrupt size prefix.
pub const MAX_BODY_SIZE: usize = 256 * 1024 * 1024;

/// Compress a payload body using LZ4 with a size prefix.
pub fn compress_body(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress an LZ4 payload body, refusing oversized declared lengths.
pub fn decompress_body(compressed: &[u8]) -> Result<Vec<u8>, PersistError> {
    if compressed.len() < 4 {
        return Err(PersistError::TruncatedPayload {
            expected: 4,
            actual: compressed.len(),
        });
    }
    let declared =
        u32::from_le_bytes([compressed[0], compressed[1], compressed[2], compressed[3]]) as usize;
    if declared > MAX_BODY_SIZE {
        return Err(PersistError::BodyTooLarge(declared, MAX_BODY_SIZE));
    }

    lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| PersistError::DecompressError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress_roundtrip() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        let compressed = compress_body(&data);
        let decompressed = decompress_body(&compressed).expect("decompress should succeed");
        assert_eq!(data, decompressed);
    }

    #[test]
    fn test_repetitive_body_compresses() {
        let data = vec![0u8; 25 * 4096];
        let compressed = compress_body(&data);
        assert!(compressed.len() < data.len() / 10);
    }

    #[test]
    fn test_oversized_prefix_rejected() {
        let mut bogus = u32::MAX.to_le_bytes().to_vec();
        bogus.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            decompress_body(&bogus),
            Err(PersistError::BodyTooLarge(..))
        ));
    }

    #[test]
    fn test_garbage_body_is_error() {
        let mut bogus = 64u32.to_le_bytes().to_vec();
        bogus.extend_from_slice(&[0xFF; 6]);
        assert!(decompress_body(&bogus).is_err());
        assert!(decompress_body(&[1, 2]).is_err());
    }
}
