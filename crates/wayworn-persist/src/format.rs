use wayworn_core::BlockPos;

/// Magic bytes of a touch-store payload.
pub const TOUCH_MAGIC: [u8; 4] = *b"WWTD";

/// Magic bytes of a protection-index payload.
pub const PROTECTION_MAGIC: [u8; 4] = *b"WWPR";

/// Current payload format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the payload header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Size of one encoded touch record: x, y, z (i32), count (u32), day (f64), flags (u8).
pub const TOUCH_RECORD_SIZE: usize = 25;

/// Fixed part of a protection record: x, y, z (i32), timestamp (u64), name length (u16).
pub const PROTECTION_RECORD_FIXED_SIZE: usize = 22;

/// Touch flag: the entry carries a live touch record, not just a decay clock.
pub const TOUCH_FLAG_HAS_RECORD: u8 = 0b0000_0001;

/// Which of the two payloads a header belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PayloadKind {
    Touch = 1,
    Protection = 2,
}

impl PayloadKind {
    pub fn magic(self) -> [u8; 4] {
        match self {
            PayloadKind::Touch => TOUCH_MAGIC,
            PayloadKind::Protection => PROTECTION_MAGIC,
        }
    }
}

/// Payload header. Fixed 32 bytes, repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PayloadHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub kind: u16,
    pub entry_count: u32,
    /// Length of the compressed body that follows the header.
    pub body_len: u32,
    /// World day at which the payload was written.
    pub saved_day: f64,
    pub _pad: u64,
}

/// One persisted touch-store position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEntry {
    pub pos: BlockPos,
    pub touch_count: u32,
    pub last_touch_day: f64,
    /// False for positions that only carry a decay clock (their touch record
    /// was cleared by a transition or devolution).
    pub has_record: bool,
}

/// One persisted protected position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionEntry {
    pub pos: BlockPos,
    pub player_name: String,
    /// Wall-clock milliseconds since the Unix epoch at protection time.
    pub timestamp_ms: u64,
}
