use crate::error::DriftError;
use crate::registry::{TypeClass, TypeEntry, TypeRegistry};
use crate::types::{FieldDecl, FieldKind, TableDecl};
use crate::utils::quote;
use serde::Serialize;

/// Leading version slot of every non-empty table.
pub const VERSION_HEADER_SIZE: u32 = 4;
/// Dynamic fields reserve an 8-byte offset plus an 8-byte size word each.
pub const DYNAMIC_HEADER_SIZE: u32 = 16;
pub const DYNAMIC_OFFSET_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldSlot {
    Scalar {
        offset: u32,
    },
    Array {
        offset:    u32,
        count:     u32,
        byte_size: u32,
    },
    Dynamic {
        index:         u32,
        length_offset: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldLayout {
    pub name:         String,
    pub emitted_type: String,
    pub slot:         FieldSlot,
}

impl FieldLayout {
    pub fn is_static(&self) -> bool {
        !matches!(self.slot, FieldSlot::Dynamic { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub name:          String,
    pub static_size:   u32,
    pub dynamic_count: u32,
    pub fields:        Vec<FieldLayout>,
}

impl TableLayout {
    pub fn is_empty(&self) -> bool {
        self.static_size == 0
    }

    pub fn is_static(&self) -> bool {
        self.dynamic_count == 0
    }
}

/// Assigns storage to every field of a table in one left-to-right fold.
/// Static fields take ascending byte offsets after the version slot; dynamic
/// fields take ascending header slots without advancing the static cursor.
pub fn layout_table(table: &TableDecl, registry: &TypeRegistry) -> Result<TableLayout, DriftError> {
    if table.fields.is_empty() {
        return Ok(TableLayout {
            name:          table.name.clone(),
            static_size:   0,
            dynamic_count: 0,
            fields:        Vec::new(),
        });
    }

    let mut cursor = VERSION_HEADER_SIZE;
    let mut dynamic_count = 0u32;
    let mut fields = Vec::with_capacity(table.fields.len());

    for field in &table.fields {
        match &field.kind {
            FieldKind::Str => {
                fields.push(dynamic_layout(field, "char".to_string(), &mut dynamic_count));
            }
            FieldKind::Scalar { type_name } => {
                let entry = resolve(registry, type_name, field)?;
                reject_table_element(entry, type_name, field)?;
                match entry.byte_width {
                    Some(width) => {
                        fields.push(FieldLayout {
                            name:         field.name.clone(),
                            emitted_type: entry.emitted.clone(),
                            slot:         FieldSlot::Scalar { offset: cursor },
                        });
                        cursor += width;
                    }
                    // The string marker is dynamic no matter how it is spelled.
                    None => fields.push(dynamic_layout(
                        field,
                        "char".to_string(),
                        &mut dynamic_count,
                    )),
                }
            }
            FieldKind::DynamicArray { element } => {
                let entry = resolve(registry, element, field)?;
                reject_table_element(entry, element, field)?;
                fields.push(dynamic_layout(field, entry.emitted.clone(), &mut dynamic_count));
            }
            FieldKind::StaticArray { element, count } => {
                let entry = resolve(registry, element, field)?;
                reject_table_element(entry, element, field)?;
                let width = entry.byte_width.ok_or_else(|| {
                    unsupported(
                        field,
                        format!(
                            "static arrays need a fixed element width, {} has none",
                            quote(element)
                        ),
                    )
                })?;
                let byte_size = count * width;
                fields.push(FieldLayout {
                    name:         field.name.clone(),
                    emitted_type: entry.emitted.clone(),
                    slot:         FieldSlot::Array {
                        offset: cursor,
                        count: *count,
                        byte_size,
                    },
                });
                cursor += byte_size;
            }
        }
    }

    Ok(TableLayout {
        name: table.name.clone(),
        static_size: cursor,
        dynamic_count,
        fields,
    })
}

fn dynamic_layout(field: &FieldDecl, emitted_type: String, dynamic_count: &mut u32) -> FieldLayout {
    let index = *dynamic_count;
    *dynamic_count += 1;
    FieldLayout {
        name: field.name.clone(),
        emitted_type,
        slot: FieldSlot::Dynamic {
            index,
            length_offset: VERSION_HEADER_SIZE + index * DYNAMIC_HEADER_SIZE + DYNAMIC_OFFSET_SIZE,
        },
    }
}

fn resolve<'a>(
    registry: &'a TypeRegistry,
    name: &str,
    field: &FieldDecl,
) -> Result<&'a TypeEntry, DriftError> {
    registry.resolve(name).ok_or_else(|| DriftError::UndefinedType {
        name:   name.to_string(),
        field:  field.name.clone(),
        line:   field.line,
        column: field.column,
    })
}

// Tables never embed by value; only enums and builtins have storage here.
fn reject_table_element(
    entry: &TypeEntry,
    name: &str,
    field: &FieldDecl,
) -> Result<(), DriftError> {
    if entry.class == TypeClass::Table {
        return Err(unsupported(
            field,
            format!("table type {} cannot be stored by value", quote(name)),
        ));
    }
    Ok(())
}

fn unsupported(field: &FieldDecl, msg: String) -> DriftError {
    DriftError::UnsupportedShape {
        msg,
        field:  field.name.clone(),
        line:   field.line,
        column: field.column,
    }
}
