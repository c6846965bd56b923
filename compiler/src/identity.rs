use crate::layout::{FieldLayout, FieldSlot};
use md5::{Digest, Md5};
use serde::Serialize;
use std::fmt;

/// Content-derived 128-bit type identity. Two independently compiled tables
/// with the same namespace, name, field order, and field type signatures hash
/// to the same value; this is the runtime wire-compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeIdentity {
    pub high: u64,
    pub low:  u64,
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high, self.low)
    }
}

/// Digests namespace segments (each followed by the scope separator), the
/// table name, then one signature per field in declaration order: the emitted
/// type name, the decimal count for static arrays, or the `Vector` marker for
/// dynamic fields. Field names never contribute.
pub fn table_identity(namespace: &[String], table: &str, fields: &[FieldLayout]) -> TypeIdentity {
    let mut hasher = Md5::new();
    for segment in namespace {
        hasher.update(segment.as_bytes());
        hasher.update(b"::");
    }
    hasher.update(table.as_bytes());

    for field in fields {
        hasher.update(field.emitted_type.as_bytes());
        match field.slot {
            FieldSlot::Scalar { .. } => {}
            FieldSlot::Array { count, .. } => hasher.update(count.to_string().as_bytes()),
            FieldSlot::Dynamic { .. } => hasher.update(b"Vector"),
        }
    }

    let digest = hasher.finalize();
    TypeIdentity {
        high: be_u64(&digest[..8]),
        low:  be_u64(&digest[8..16]),
    }
}

fn be_u64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |acc, byte| (acc << 8) | u64::from(*byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(emitted: &str) -> FieldLayout {
        FieldLayout {
            name:         "f".to_string(),
            emitted_type: emitted.to_string(),
            slot:         FieldSlot::Scalar { offset: 4 },
        }
    }

    fn namespace(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn golden_digest() {
        // namespace ns; table T { a: int; }
        let fields = vec![scalar("int32_t")];
        let id = table_identity(&namespace(&["ns"]), "T", &fields);
        assert_eq!(id.high, 0x8bd63a65ee656656);
        assert_eq!(id.low, 0x79bc121357799f45);
    }

    #[test]
    fn identity_is_deterministic() {
        let fields = vec![scalar("int32_t"), scalar("uint32_t")];
        let ns = namespace(&["a", "b"]);
        assert_eq!(
            table_identity(&ns, "T", &fields),
            table_identity(&ns, "T", &fields)
        );
    }

    #[test]
    fn identity_ignores_field_names() {
        let mut renamed = vec![scalar("int32_t")];
        renamed[0].name = "other".to_string();
        assert_eq!(
            table_identity(&[], "T", &[scalar("int32_t")]),
            table_identity(&[], "T", &renamed)
        );
    }

    #[test]
    fn identity_is_order_sensitive() {
        let forward = vec![scalar("int32_t"), scalar("uint32_t")];
        let reversed = vec![scalar("uint32_t"), scalar("int32_t")];
        assert_ne!(
            table_identity(&[], "T", &forward),
            table_identity(&[], "T", &reversed)
        );
    }

    #[test]
    fn namespace_and_name_contribute() {
        let fields = vec![scalar("int32_t")];
        assert_ne!(
            table_identity(&namespace(&["ns"]), "T", &fields),
            table_identity(&[], "T", &fields)
        );
        assert_ne!(
            table_identity(&[], "T", &fields),
            table_identity(&[], "U", &fields)
        );
    }

    #[test]
    fn dynamic_marker_distinguishes_array_shapes() {
        let dynamic = vec![FieldLayout {
            name:         "data".to_string(),
            emitted_type: "int32_t".to_string(),
            slot:         FieldSlot::Dynamic {
                index:         0,
                length_offset: 12,
            },
        }];
        let fixed = vec![FieldLayout {
            name:         "data".to_string(),
            emitted_type: "int32_t".to_string(),
            slot:         FieldSlot::Array {
                offset:    4,
                count:     1,
                byte_size: 4,
            },
        }];
        assert_ne!(
            table_identity(&[], "T", &dynamic),
            table_identity(&[], "T", &fixed)
        );
    }
}
