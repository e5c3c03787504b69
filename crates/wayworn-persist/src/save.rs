use wayworn_core::BlockPos;

use crate::compress;
use crate::format::*;

/// Serialize touch-store entries into a touch payload.
///
/// Layout: header (32B) + LZ4 body of fixed 25-byte records.
pub fn save_touches(entries: &[TouchEntry], saved_day: f64) -> Vec<u8> {
    let mut body = Vec::with_capacity(entries.len() * TOUCH_RECORD_SIZE);
    for entry in entries {
        write_pos(&mut body, entry.pos);
        body.extend_from_slice(&entry.touch_count.to_le_bytes());
        body.extend_from_slice(&entry.last_touch_day.to_le_bytes());
        let flags = if entry.has_record {
            TOUCH_FLAG_HAS_RECORD
        } else {
            0
        };
        body.push(flags);
    }
    finish(PayloadKind::Touch, entries.len(), &body, saved_day)
}

/// Serialize protection records into a protection payload.
///
/// Record layout: x, y, z (i32), timestamp_ms (u64), name length (u16), UTF-8 name.
/// Names longer than `u16::MAX` bytes are truncated at a char boundary.
pub fn save_protections(entries: &[ProtectionEntry], saved_day: f64) -> Vec<u8> {
    let mut body = Vec::with_capacity(entries.len() * (PROTECTION_RECORD_FIXED_SIZE + 16));
    for entry in entries {
        write_pos(&mut body, entry.pos);
        body.extend_from_slice(&entry.timestamp_ms.to_le_bytes());

        let name = truncate_name(&entry.player_name);
        body.extend_from_slice(&(name.len() as u16).to_le_bytes());
        body.extend_from_slice(name.as_bytes());
    }
    finish(PayloadKind::Protection, entries.len(), &body, saved_day)
}

fn write_pos(body: &mut Vec<u8>, pos: BlockPos) {
    body.extend_from_slice(&pos.x.to_le_bytes());
    body.extend_from_slice(&pos.y.to_le_bytes());
    body.extend_from_slice(&pos.z.to_le_bytes());
}

fn truncate_name(name: &str) -> &str {
    let limit = u16::MAX as usize;
    if name.len() <= limit {
        return name;
    }
    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn finish(kind: PayloadKind, entry_count: usize, body: &[u8], saved_day: f64) -> Vec<u8> {
    let compressed = compress::compress_body(body);
    let header = PayloadHeader {
        magic: kind.magic(),
        version: FORMAT_VERSION,
        kind: kind as u16,
        entry_count: entry_count as u32,
        body_len: compressed.len() as u32,
        saved_day,
        _pad: 0,
    };

    let mut output = Vec::with_capacity(HEADER_SIZE + compressed.len());
    output.extend_from_slice(bytemuck::bytes_of(&header));
    output.extend_from_slice(&compressed);
    output
}
