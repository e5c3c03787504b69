use glam::IVec3;

use crate::compat;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Decoded payload: the entries that parsed cleanly plus what was dropped.
#[derive(Debug)]
pub struct LoadedPayload<T> {
    pub header: PayloadHeader,
    pub entries: Vec<T>,
    /// Records that were individually malformed and skipped.
    pub skipped: usize,
    /// Compatibility and integrity warnings (header oddities, truncation).
    pub warnings: Vec<String>,
}

/// Decode a touch payload. Bad header or body is an error; bad records are skipped.
pub fn load_touches(bytes: &[u8]) -> Result<LoadedPayload<TouchEntry>, PersistError> {
    let (header, body, mut warnings) = open(bytes, PayloadKind::Touch)?;

    let mut entries = Vec::with_capacity(body.len() / TOUCH_RECORD_SIZE);
    let mut skipped = 0;
    let mut records = body.chunks_exact(TOUCH_RECORD_SIZE);
    for record in records.by_ref() {
        let pos = read_pos(record);
        let touch_count = read_u32(&record[12..16]);
        let last_touch_day = f64::from_le_bytes(to_array(&record[16..24]));
        let flags = record[24];

        if !last_touch_day.is_finite() || flags & !TOUCH_FLAG_HAS_RECORD != 0 {
            skipped += 1;
            continue;
        }
        entries.push(TouchEntry {
            pos,
            touch_count,
            last_touch_day,
            has_record: flags & TOUCH_FLAG_HAS_RECORD != 0,
        });
    }

    let trailing = records.remainder().len();
    if trailing > 0 {
        warnings.push(format!(
            "Touch payload ends with a truncated {trailing}-byte record; ignored."
        ));
    }

    finish(header, entries, skipped, warnings)
}

/// Decode a protection payload. Bad header or body is an error; bad records are skipped.
pub fn load_protections(bytes: &[u8]) -> Result<LoadedPayload<ProtectionEntry>, PersistError> {
    let (header, body, mut warnings) = open(bytes, PayloadKind::Protection)?;

    let mut entries = Vec::new();
    let mut skipped = 0;
    let mut cursor = 0;
    while cursor < body.len() {
        let fixed_end = cursor + PROTECTION_RECORD_FIXED_SIZE;
        if fixed_end > body.len() {
            warnings.push(format!(
                "Protection payload ends with a truncated record at byte {cursor}; ignored."
            ));
            break;
        }
        let fixed = &body[cursor..fixed_end];
        let pos = read_pos(fixed);
        let timestamp_ms = u64::from_le_bytes(to_array(&fixed[12..20]));
        let name_len = u16::from_le_bytes([fixed[20], fixed[21]]) as usize;

        let name_end = fixed_end + name_len;
        if name_end > body.len() {
            warnings.push(format!(
                "Protection record at byte {cursor} declares a {name_len}-byte name past the end of the payload; ignored."
            ));
            break;
        }
        cursor = name_end;

        match std::str::from_utf8(&body[fixed_end..name_end]) {
            Ok(name) if !name.is_empty() => entries.push(ProtectionEntry {
                pos,
                player_name: name.to_string(),
                timestamp_ms,
            }),
            _ => skipped += 1,
        }
    }

    finish(header, entries, skipped, warnings)
}

fn open(
    bytes: &[u8],
    kind: PayloadKind,
) -> Result<(PayloadHeader, Vec<u8>, Vec<String>), PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::PayloadTooSmall(bytes.len(), HEADER_SIZE));
    }

    let header: PayloadHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    let warnings = compat::validate_header(&header, kind)?;

    let body_end = HEADER_SIZE + header.body_len as usize;
    if bytes.len() < body_end {
        return Err(PersistError::TruncatedPayload {
            expected: body_end,
            actual: bytes.len(),
        });
    }

    let body = compress::decompress_body(&bytes[HEADER_SIZE..body_end])?;
    Ok((header, body, warnings))
}

fn finish<T>(
    header: PayloadHeader,
    entries: Vec<T>,
    skipped: usize,
    mut warnings: Vec<String>,
) -> Result<LoadedPayload<T>, PersistError> {
    if let Some(warning) = compat::entry_count_warning(&header, entries.len(), skipped) {
        warnings.push(warning);
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed persisted records");
    }
    for warning in &warnings {
        log::warn!("{warning}");
    }
    Ok(LoadedPayload {
        header,
        entries,
        skipped,
        warnings,
    })
}

fn read_pos(record: &[u8]) -> IVec3 {
    IVec3::new(
        i32::from_le_bytes(to_array(&record[0..4])),
        i32::from_le_bytes(to_array(&record[4..8])),
        i32::from_le_bytes(to_array(&record[8..12])),
    )
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(to_array(bytes))
}

/// Copy a slice of known length into an array. Callers slice exact ranges.
fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{save_protections, save_touches};

    fn touch(x: i32, count: u32, day: f64, has_record: bool) -> TouchEntry {
        TouchEntry {
            pos: IVec3::new(x, 64, -x),
            touch_count: count,
            last_touch_day: day,
            has_record,
        }
    }

    /// Build a touch payload from a raw (uncompressed) body.
    fn raw_touch_payload(body: &[u8], entry_count: u32) -> Vec<u8> {
        let compressed = compress::compress_body(body);
        let header = PayloadHeader {
            magic: TOUCH_MAGIC,
            version: FORMAT_VERSION,
            kind: PayloadKind::Touch as u16,
            entry_count,
            body_len: compressed.len() as u32,
            saved_day: 0.0,
            _pad: 0,
        };
        let mut out = bytemuck::bytes_of(&header).to_vec();
        out.extend_from_slice(&compressed);
        out
    }

    #[test]
    fn test_touch_roundtrip() {
        let entries = vec![
            touch(1, 3, 10.25, true),
            touch(-40, 0, 2.0, false),
            touch(1_000_000, 74, 600.5, true),
        ];
        let data = save_touches(&entries, 601.0);
        let loaded = load_touches(&data).expect("load should succeed");
        assert_eq!(loaded.entries, entries);
        assert_eq!(loaded.skipped, 0);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.header.saved_day, 601.0);
    }

    #[test]
    fn test_protection_roundtrip() {
        let entries = vec![
            ProtectionEntry {
                pos: IVec3::new(5, 70, 5),
                player_name: "Alice".into(),
                timestamp_ms: 42,
            },
            ProtectionEntry {
                pos: IVec3::new(-5, 1, 9),
                player_name: "Bjørn".into(),
                timestamp_ms: 1_700_000_000_123,
            },
        ];
        let data = save_protections(&entries, 3.0);
        let loaded = load_protections(&data).expect("load should succeed");
        assert_eq!(loaded.entries, entries);
        assert_eq!(loaded.skipped, 0);
    }

    #[test]
    fn test_malformed_touch_records_skipped() {
        let good = touch(2, 1, 1.0, true);
        let mut body = Vec::new();
        for (entry, flags) in [(good, 1u8), (touch(3, 1, f64::NAN, true), 1), (good, 0x80)] {
            body.extend_from_slice(&entry.pos.x.to_le_bytes());
            body.extend_from_slice(&entry.pos.y.to_le_bytes());
            body.extend_from_slice(&entry.pos.z.to_le_bytes());
            body.extend_from_slice(&entry.touch_count.to_le_bytes());
            body.extend_from_slice(&entry.last_touch_day.to_le_bytes());
            body.push(flags);
        }
        let loaded = load_touches(&raw_touch_payload(&body, 3)).expect("header is fine");
        assert_eq!(loaded.entries, vec![good]);
        assert_eq!(loaded.skipped, 2);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_truncated_touch_record_warns() {
        let mut body = vec![0u8; TOUCH_RECORD_SIZE];
        body.extend_from_slice(&[1, 2, 3]);
        let loaded = load_touches(&raw_touch_payload(&body, 1)).expect("header is fine");
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("truncated"));
    }

    #[test]
    fn test_protection_record_with_bad_name_skipped() {
        let mut data = save_protections(
            &[ProtectionEntry {
                pos: IVec3::ZERO,
                player_name: "ok".into(),
                timestamp_ms: 1,
            }],
            0.0,
        );
        // Rebuild with an empty-name record appended.
        let mut body = compress::decompress_body(&data[HEADER_SIZE..]).expect("body");
        body.extend_from_slice(&[0u8; 20]);
        body.extend_from_slice(&0u16.to_le_bytes());
        let compressed = compress::compress_body(&body);
        let mut header: PayloadHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
        header.entry_count = 2;
        header.body_len = compressed.len() as u32;
        data = bytemuck::bytes_of(&header).to_vec();
        data.extend_from_slice(&compressed);

        let loaded = load_protections(&data).expect("header is fine");
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.skipped, 1);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_wrong_payload_kind_rejected() {
        let data = save_touches(&[touch(0, 1, 1.0, true)], 0.0);
        assert!(matches!(
            load_protections(&data),
            Err(PersistError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_payload_too_small_rejected() {
        let result = load_touches(&[0u8; 10]);
        assert!(matches!(result, Err(PersistError::PayloadTooSmall(10, 32))));
    }

    #[test]
    fn test_truncated_body_rejected() {
        let data = save_touches(&[touch(0, 1, 1.0, true)], 0.0);
        let result = load_touches(&data[..data.len() - 1]);
        assert!(matches!(result, Err(PersistError::TruncatedPayload { .. })));
    }

    #[test]
    fn test_entry_count_mismatch_warns() {
        let body = vec![0u8; TOUCH_RECORD_SIZE];
        let loaded = load_touches(&raw_touch_payload(&body, 5)).expect("header is fine");
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
    }
}
