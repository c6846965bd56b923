use serde::Serialize;

/// The ordered declaration sequence of one schema file.
/// Immutable once parsed; every later stage is a pure function of it.
#[derive(Debug, PartialEq, Serialize)]
pub struct Schema {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    /// `namespace a.b.c;` rescopes everything that follows it.
    Namespace(Vec<String>),
    Enum(EnumDecl),
    Table(TableDecl),
    /// `root_type Name;` is accepted but contributes nothing to the output.
    RootType(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub kind:   FieldKind,
}

/// Field storage shape, decided once during parsing and matched exhaustively
/// everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Scalar { type_name: String },
    StaticArray { element: String, count: u32 },
    DynamicArray { element: String },
    Str,
}
