use crate::error::DriftError;

/// JSON-escapes and quotes a token for error messages.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn syntax_error(msg: &str, line: usize, column: usize) -> DriftError {
    DriftError::Syntax {
        msg: msg.to_string(),
        line,
        column,
    }
}
