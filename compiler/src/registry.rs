use crate::error::DriftError;
use serde::Serialize;
use std::collections::HashMap;

/// Builtin scalar keywords: (schema name, byte width, emitted type).
pub const BUILTIN_SCALARS: [(&str, u32, &str); 19] = [
    ("bool",      1,  "bool"),
    ("byte",      1,  "int8_t"),
    ("ubyte",     1,  "uint8_t"),
    ("short",     2,  "int16_t"),
    ("ushort",    2,  "uint16_t"),
    ("int",       4,  "int32_t"),
    ("uint",      4,  "uint32_t"),
    ("ulong",     8,  "uint64_t"),
    ("float",     4,  "float"),
    ("double",    8,  "double"),
    ("int8_t",    1,  "int8_t"),
    ("int16_t",   2,  "int16_t"),
    ("int32_t",   4,  "int32_t"),
    ("int64_t",   8,  "int64_t"),
    ("uint8_t",   1,  "uint8_t"),
    ("uint16_t",  2,  "uint16_t"),
    ("uint32_t",  4,  "uint32_t"),
    ("uint64_t",  8,  "uint64_t"),
    ("uint128_t", 16, "driftbuf::uint128_t"),
];

pub fn is_scalar_keyword(name: &str) -> bool {
    BUILTIN_SCALARS.iter().any(|(scalar, _, _)| *scalar == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeClass {
    Builtin,
    Enum,
    Table,
}

/// A resolved type: its storage width (`None` for the variable-width string
/// marker, which must never be used as a raw storage width) and the type name
/// emitted into generated code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeEntry {
    pub byte_width: Option<u32>,
    pub emitted:    String,
    pub class:      TypeClass,
}

/// Append-only, file-scoped name resolution. Builtin scalars are seeded at
/// construction; each enum and table declaration appends one entry as it is
/// seen, so forward references do not resolve. Namespaces are not registry
/// scopes.
#[derive(Debug)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        for (name, width, emitted) in BUILTIN_SCALARS {
            entries.insert(
                name.to_string(),
                TypeEntry {
                    byte_width: Some(width),
                    emitted:    emitted.to_string(),
                    class:      TypeClass::Builtin,
                },
            );
        }
        entries.insert(
            "string".to_string(),
            TypeEntry {
                byte_width: None,
                emitted:    "char*".to_string(),
                class:      TypeClass::Builtin,
            },
        );
        TypeRegistry { entries }
    }

    pub fn resolve(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn register_enum(
        &mut self,
        name: &str,
        line: usize,
        column: usize,
    ) -> Result<(), DriftError> {
        self.register(name, TypeClass::Enum, line, column)
    }

    pub fn register_table(
        &mut self,
        name: &str,
        line: usize,
        column: usize,
    ) -> Result<(), DriftError> {
        self.register(name, TypeClass::Table, line, column)
    }

    // User declarations always occupy four bytes when embedded in a table.
    fn register(
        &mut self,
        name: &str,
        class: TypeClass,
        line: usize,
        column: usize,
    ) -> Result<(), DriftError> {
        if self.entries.contains_key(name) {
            return Err(DriftError::DuplicateName {
                name: name.to_string(),
                line,
                column,
            });
        }
        self.entries.insert(
            name.to_string(),
            TypeEntry {
                byte_width: Some(4),
                emitted:    name.to_string(),
                class,
            },
        );
        Ok(())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_widths() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.resolve("int").unwrap().byte_width, Some(4));
        assert_eq!(registry.resolve("int").unwrap().emitted, "int32_t");
        assert_eq!(registry.resolve("double").unwrap().byte_width, Some(8));
        assert_eq!(registry.resolve("uint128_t").unwrap().byte_width, Some(16));
        assert_eq!(registry.resolve("string").unwrap().byte_width, None);
        assert!(registry.resolve("quaternion").is_none());
    }

    #[test]
    fn declared_types_resolve_at_four_bytes() {
        let mut registry = TypeRegistry::new();
        registry.register_enum("Mode", 1, 1).unwrap();
        registry.register_table("Point", 2, 1).unwrap();

        let mode = registry.resolve("Mode").unwrap();
        assert_eq!(mode.byte_width, Some(4));
        assert_eq!(mode.class, TypeClass::Enum);

        let point = registry.resolve("Point").unwrap();
        assert_eq!(point.byte_width, Some(4));
        assert_eq!(point.class, TypeClass::Table);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register_enum("Mode", 1, 1).unwrap();

        let again = registry.register_table("Mode", 5, 1);
        assert!(matches!(again, Err(DriftError::DuplicateName { .. })));

        let shadows_builtin = registry.register_table("int", 6, 1);
        assert!(matches!(
            shadows_builtin,
            Err(DriftError::DuplicateName { .. })
        ));
    }

    #[test]
    fn scalar_keywords_exclude_string() {
        assert!(is_scalar_keyword("ubyte"));
        assert!(is_scalar_keyword("uint128_t"));
        assert!(!is_scalar_keyword("string"));
        assert!(!is_scalar_keyword("Speaker"));
    }
}
