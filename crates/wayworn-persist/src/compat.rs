use crate::error::PersistError;
use crate::format::{PayloadHeader, PayloadKind, FORMAT_VERSION};

/// Validate a payload header and return any compatibility warnings.
///
/// Returns Ok(warnings) on success, Err on fatal errors.
pub fn validate_header(
    header: &PayloadHeader,
    expected: PayloadKind,
) -> Result<Vec<String>, PersistError> {
    if header.magic != expected.magic() {
        return Err(PersistError::InvalidMagic {
            expected: expected.magic(),
            actual: header.magic,
        });
    }

    if header.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    if header.kind != expected as u16 {
        return Err(PersistError::WrongPayloadKind {
            expected: expected as u16,
            actual: header.kind,
        });
    }

    let mut warnings = Vec::new();
    if !header.saved_day.is_finite() || header.saved_day < 0.0 {
        warnings.push(format!(
            "Payload carries an invalid save day ({}); entries are loaded as-is.",
            header.saved_day
        ));
    }

    Ok(warnings)
}

/// Warning text when the decoded entry count differs from the header's.
pub fn entry_count_warning(header: &PayloadHeader, decoded: usize, skipped: usize) -> Option<String> {
    let declared = header.entry_count as usize;
    if declared == decoded + skipped {
        return None;
    }
    Some(format!(
        "Header declares {declared} entries but the body holds {} ({decoded} loaded, {skipped} skipped).",
        decoded + skipped
    ))
}
