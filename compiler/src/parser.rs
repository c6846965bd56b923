use crate::error::DriftError;
use crate::registry::is_scalar_keyword;
use crate::tokenizer::Token;
use crate::types::{Declaration, EnumDecl, FieldDecl, FieldKind, Schema, TableDecl};
use crate::utils::{quote, syntax_error};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:        Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref INTEGER:           Regex = Regex::new(r"^\d+$").unwrap();
    static ref SEMICOLON:         Regex = Regex::new(r"^;$").unwrap();
    static ref COLON:             Regex = Regex::new(r"^:$").unwrap();
    static ref COMMA:             Regex = Regex::new(r"^,$").unwrap();
    static ref DOT:               Regex = Regex::new(r"^\.$").unwrap();
    static ref LEFT_BRACE:        Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:       Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_BRACKET:      Regex = Regex::new(r"^\[$").unwrap();
    static ref RIGHT_BRACKET:     Regex = Regex::new(r"^\]$").unwrap();
    static ref NAMESPACE_KEYWORD: Regex = Regex::new(r"^namespace$").unwrap();
    static ref ENUM_KEYWORD:      Regex = Regex::new(r"^enum$").unwrap();
    static ref TABLE_KEYWORD:     Regex = Regex::new(r"^table$").unwrap();
    static ref ROOT_TYPE_KEYWORD: Regex = Regex::new(r"^root_type$").unwrap();
    static ref EOF:               Regex = Regex::new(r"^$").unwrap();
}

fn current_token<'a>(tokens: &'a [Token], index: usize) -> &'a Token {
    tokens.get(index).expect("Unexpected end of tokens")
}

fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
    if test.is_match(&current_token(tokens, *index).text) {
        *index += 1;
        true
    } else {
        false
    }
}

fn expect(
    tokens: &[Token],
    index: &mut usize,
    test: &Regex,
    expected: &str,
) -> Result<(), DriftError> {
    if !eat(tokens, index, test) {
        let tok = current_token(tokens, *index);
        return Err(syntax_error(
            &format!("Expected {} but found {}", expected, quote(&tok.text)),
            tok.line,
            tok.column,
        ));
    }
    Ok(())
}

fn unexpected_token(tokens: &[Token], index: usize) -> DriftError {
    let tok = current_token(tokens, index);
    syntax_error(
        &format!("Unexpected token {}", quote(&tok.text)),
        tok.line,
        tok.column,
    )
}

/// Parses a token stream into the ordered declaration sequence of one file.
/// Declarations may appear in any order; a `namespace` declaration rescopes
/// everything after it.
pub fn parse_schema(tokens: &[Token]) -> Result<Schema, DriftError> {
    let mut declarations = Vec::new();
    let mut index = 0;

    while index < tokens.len() && !eat(tokens, &mut index, &EOF) {
        if eat(tokens, &mut index, &NAMESPACE_KEYWORD) {
            declarations.push(parse_namespace(tokens, &mut index)?);
        } else if eat(tokens, &mut index, &ENUM_KEYWORD) {
            declarations.push(parse_enum(tokens, &mut index)?);
        } else if eat(tokens, &mut index, &TABLE_KEYWORD) {
            declarations.push(parse_table(tokens, &mut index)?);
        } else if eat(tokens, &mut index, &ROOT_TYPE_KEYWORD) {
            let name_tok = current_token(tokens, index);
            let name = name_tok.text.clone();
            expect(tokens, &mut index, &IDENTIFIER, "identifier")?;
            expect(tokens, &mut index, &SEMICOLON, "\";\"")?;
            declarations.push(Declaration::RootType(name));
        } else {
            return Err(unexpected_token(tokens, index));
        }
    }

    Ok(Schema { declarations })
}

fn parse_namespace(tokens: &[Token], index: &mut usize) -> Result<Declaration, DriftError> {
    let mut path = Vec::new();
    loop {
        let segment_tok = current_token(tokens, *index);
        let segment = segment_tok.text.clone();
        expect(tokens, index, &IDENTIFIER, "identifier")?;
        path.push(segment);
        if !eat(tokens, index, &DOT) {
            break;
        }
    }
    expect(tokens, index, &SEMICOLON, "\";\"")?;
    Ok(Declaration::Namespace(path))
}

fn parse_enum(tokens: &[Token], index: &mut usize) -> Result<Declaration, DriftError> {
    let name_tok = current_token(tokens, *index);
    let (name, line, column) = (name_tok.text.clone(), name_tok.line, name_tok.column);
    expect(tokens, index, &IDENTIFIER, "identifier")?;
    expect(tokens, index, &COLON, "\":\"")?;

    // The underlying type is part of the grammar but does not change the
    // stored width; every enum occupies four bytes.
    let base_tok = current_token(tokens, *index);
    let (base, base_line, base_column) = (base_tok.text.clone(), base_tok.line, base_tok.column);
    expect(tokens, index, &IDENTIFIER, "scalar type")?;
    if !is_scalar_keyword(&base) {
        return Err(syntax_error(
            &format!("Expected scalar type but found {}", quote(&base)),
            base_line,
            base_column,
        ));
    }

    expect(tokens, index, &LEFT_BRACE, "\"{\"")?;
    let mut values = Vec::new();
    loop {
        let value_tok = current_token(tokens, *index);
        let value = value_tok.text.clone();
        expect(tokens, index, &IDENTIFIER, "identifier")?;
        values.push(value);
        eat(tokens, index, &COMMA);
        if eat(tokens, index, &RIGHT_BRACE) {
            break;
        }
    }

    Ok(Declaration::Enum(EnumDecl {
        name,
        line,
        column,
        values,
    }))
}

fn parse_table(tokens: &[Token], index: &mut usize) -> Result<Declaration, DriftError> {
    let name_tok = current_token(tokens, *index);
    let (name, line, column) = (name_tok.text.clone(), name_tok.line, name_tok.column);
    expect(tokens, index, &IDENTIFIER, "identifier")?;
    expect(tokens, index, &LEFT_BRACE, "\"{\"")?;

    let mut fields = Vec::new();
    while !eat(tokens, index, &RIGHT_BRACE) {
        let field_tok = current_token(tokens, *index);
        let (field_name, field_line, field_column) =
            (field_tok.text.clone(), field_tok.line, field_tok.column);
        expect(tokens, index, &IDENTIFIER, "identifier")?;
        expect(tokens, index, &COLON, "\":\"")?;
        let kind = parse_field_type(tokens, index)?;
        expect(tokens, index, &SEMICOLON, "\";\"")?;

        fields.push(FieldDecl {
            name:   field_name,
            line:   field_line,
            column: field_column,
            kind,
        });
    }

    Ok(Declaration::Table(TableDecl {
        name,
        line,
        column,
        fields,
    }))
}

fn parse_field_type(tokens: &[Token], index: &mut usize) -> Result<FieldKind, DriftError> {
    if eat(tokens, index, &LEFT_BRACKET) {
        let element_tok = current_token(tokens, *index);
        let element = element_tok.text.clone();
        expect(tokens, index, &IDENTIFIER, "identifier")?;

        if eat(tokens, index, &COLON) {
            let count_tok = current_token(tokens, *index);
            let (count_text, count_line, count_column) =
                (count_tok.text.clone(), count_tok.line, count_tok.column);
            expect(tokens, index, &INTEGER, "integer")?;
            expect(tokens, index, &RIGHT_BRACKET, "\"]\"")?;
            let count = count_text.parse::<u32>().map_err(|_| {
                syntax_error(
                    &format!("Invalid element count {}", quote(&count_text)),
                    count_line,
                    count_column,
                )
            })?;
            return Ok(FieldKind::StaticArray { element, count });
        }

        expect(tokens, index, &RIGHT_BRACKET, "\"]\"")?;
        return Ok(FieldKind::DynamicArray { element });
    }

    let type_tok = current_token(tokens, *index);
    let type_name = type_tok.text.clone();
    expect(tokens, index, &IDENTIFIER, "identifier")?;
    if type_name == "string" {
        Ok(FieldKind::Str)
    } else {
        Ok(FieldKind::Scalar { type_name })
    }
}
