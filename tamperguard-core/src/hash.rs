//! Stable 32-bit hashes.
//!
//! Fingerprints are persisted and compared across processes, so these hashes
//! must not depend on per-process seeds. Both functions use xxh32 with a
//! fixed seed.

use tamperguard_model::Primitive;
use xxhash_rust::xxh32::xxh32;

const SEED: u32 = 0;

/// Hash of a string's UTF-8 bytes.
#[must_use]
pub fn hash_str(s: &str) -> i32 {
    xxh32(s.as_bytes(), SEED) as i32
}

/// Hash of a primitive's native value.
///
/// The input is a one-byte kind tag followed by the value's little-endian
/// bytes, so `true`, `1` and `1.0` hash differently. Floats are normalized so
/// `-0.0 == 0.0` and every NaN hash alike.
#[must_use]
pub fn hash_primitive(value: &Primitive) -> i32 {
    let (tag, bytes) = match *value {
        Primitive::Bool(b) => (0u8, i64::from(b).to_le_bytes()),
        Primitive::Int(v) => (1, v.to_le_bytes()),
        Primitive::Float(v) => (2, float_bits(v).to_le_bytes()),
        Primitive::Enum(v) => (3, v.to_le_bytes()),
    };
    let mut buf = [0u8; 9];
    buf[0] = tag;
    buf[1..].copy_from_slice(&bytes);
    xxh32(&buf, SEED) as i32
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}
