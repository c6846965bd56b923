use crate::error::DriftError;
use crate::gen_cxx::{generate, GeneratedCode};
use crate::parser::parse_schema;
use crate::tokenizer::tokenize_schema;

/// Compile a textual schema into its generated artifacts. `base_name` is the
/// output stem the header uses to include the definitions file.
/// Returns `Err(DriftError)` if tokenization, parsing, or generation fails;
/// nothing is produced for the file in that case.
pub fn compile_schema(text: &str, base_name: &str) -> Result<GeneratedCode, DriftError> {
    let tokens = tokenize_schema(text)?;
    let schema = parse_schema(&tokens)?;
    generate(&schema, base_name)
}
