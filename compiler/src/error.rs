use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at line {line}, column {column}: {msg}")]
    Syntax {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Undefined type \"{name}\" for field \"{field}\" at line {line}, column {column}")]
    UndefinedType {
        name:   String,
        field:  String,
        line:   usize,
        column: usize,
    },

    #[error("The name \"{name}\" at line {line}, column {column} is already defined")]
    DuplicateName {
        name:   String,
        line:   usize,
        column: usize,
    },

    #[error("Unsupported shape for field \"{field}\" at line {line}, column {column}: {msg}")]
    UnsupportedShape {
        msg:    String,
        field:  String,
        line:   usize,
        column: usize,
    },
}
