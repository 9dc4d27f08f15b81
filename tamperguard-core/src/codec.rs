//! Flat string form of a fingerprint map.
//!
//! ```text
//! speed;-1392847110§label;88213904§doors;4
//! ```
//!
//! Records are separated by `§`, and each record is `name;fingerprint`.
//! Neither separator may appear in a field name.

use crate::error::{CodecError, CodecResult};
use crate::fingerprint::FingerprintMap;

/// Separator between records.
pub const RECORD_SEPARATOR: char = '§';

/// Separator between a field name and its fingerprint.
pub const FIELD_SEPARATOR: char = ';';

/// Whether `name` contains a character the codec reserves.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    name.contains([RECORD_SEPARATOR, FIELD_SEPARATOR])
}

/// Serializes a fingerprint map.
///
/// Records are written in field-name order, so equal maps always encode to
/// the same string.
pub fn encode(map: &FingerprintMap) -> CodecResult<String> {
    let mut out = String::new();
    for (i, (name, fingerprint)) in map.iter().enumerate() {
        if is_reserved(name) {
            return Err(CodecError::ReservedCharacter(name.to_string()));
        }
        if i > 0 {
            out.push(RECORD_SEPARATOR);
        }
        out.push_str(name);
        out.push(FIELD_SEPARATOR);
        out.push_str(&fingerprint.to_string());
    }
    Ok(out)
}

/// Parses a serialized fingerprint map.
///
/// Blank input is an empty map.
pub fn decode(s: &str) -> CodecResult<FingerprintMap> {
    let mut map = FingerprintMap::new();
    if s.trim().is_empty() {
        return Ok(map);
    }
    for (index, record) in s.split(RECORD_SEPARATOR).enumerate() {
        let mut parts = record.split(FIELD_SEPARATOR);
        let name = parts.next().unwrap_or_default();
        let Some(value) = parts.next() else {
            return Err(CodecError::MissingFieldSeparator {
                index,
                record: record.to_string(),
            });
        };
        if parts.next().is_some() {
            return Err(CodecError::ExtraFieldSeparator {
                index,
                record: record.to_string(),
            });
        }
        if name.is_empty() {
            return Err(CodecError::EmptyFieldName { index });
        }
        let fingerprint: i32 = value.parse().map_err(|_| CodecError::InvalidFingerprint {
            name: name.to_string(),
            value: value.to_string(),
        })?;
        if map.insert(name, fingerprint).is_some() {
            return Err(CodecError::DuplicateField(name.to_string()));
        }
    }
    Ok(map)
}
