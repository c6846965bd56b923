#![cfg(test)]

use driftbuf_compiler::{
    compile_schema,
    error::DriftError,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    types::{Declaration, FieldKind},
};

const SPEAKER_SCHEMA: &str = r#"
    // speaker registry records
    namespace audio.catalog;

    enum Channel : ubyte {
        Left,
        Right,
        Center,
    }

    table Speaker {
        id: uint;
        gain: float;
        channel: Channel;
        label: string;
        taps: [short:8];
        samples: [int];
    }

    root_type Speaker;
    "#;

#[test]
fn test_parse_schema() {
    let tokens = tokenize_schema(SPEAKER_SCHEMA).expect("tokenize_schema failed");
    let schema = parse_schema(&tokens).expect("parse_schema failed");

    assert_eq!(schema.declarations.len(), 4);

    match &schema.declarations[0] {
        Declaration::Namespace(path) => {
            assert_eq!(path, &vec!["audio".to_string(), "catalog".to_string()]);
        }
        other => panic!("expected a namespace declaration, got {:?}", other),
    }

    match &schema.declarations[1] {
        Declaration::Enum(decl) => {
            assert_eq!(decl.name, "Channel");
            assert_eq!(decl.values, vec!["Left", "Right", "Center"]);
        }
        other => panic!("expected an enum declaration, got {:?}", other),
    }

    match &schema.declarations[2] {
        Declaration::Table(decl) => {
            assert_eq!(decl.name, "Speaker");
            assert_eq!(decl.fields.len(), 6);

            assert_eq!(decl.fields[0].name, "id");
            assert_eq!(
                decl.fields[0].kind,
                FieldKind::Scalar {
                    type_name: "uint".to_string()
                }
            );

            assert_eq!(decl.fields[1].name, "gain");
            assert_eq!(
                decl.fields[1].kind,
                FieldKind::Scalar {
                    type_name: "float".to_string()
                }
            );

            assert_eq!(decl.fields[2].name, "channel");
            assert_eq!(
                decl.fields[2].kind,
                FieldKind::Scalar {
                    type_name: "Channel".to_string()
                }
            );

            assert_eq!(decl.fields[3].name, "label");
            assert_eq!(decl.fields[3].kind, FieldKind::Str);

            assert_eq!(decl.fields[4].name, "taps");
            assert_eq!(
                decl.fields[4].kind,
                FieldKind::StaticArray {
                    element: "short".to_string(),
                    count:   8,
                }
            );

            assert_eq!(decl.fields[5].name, "samples");
            assert_eq!(
                decl.fields[5].kind,
                FieldKind::DynamicArray {
                    element: "int".to_string()
                }
            );
        }
        other => panic!("expected a table declaration, got {:?}", other),
    }

    match &schema.declarations[3] {
        Declaration::RootType(name) => assert_eq!(name, "Speaker"),
        other => panic!("expected a root_type declaration, got {:?}", other),
    }
}

#[test]
fn test_compile_generates_cross_referencing_artifacts() {
    let code = compile_schema(SPEAKER_SCHEMA, "speaker").expect("compile_schema failed");

    // Declarations artifact
    assert!(code.header.contains("#pragma once"));
    assert!(code.header.contains("namespace audio\n{\nnamespace catalog\n{\n"));
    assert!(code.header.contains("enum Channel"));
    assert!(code.header.contains("    Channel_Left,"));
    assert!(code.header.contains("    Channel_Center,"));
    assert!(code.header.contains("class SpeakerBase : public driftbuf::Driftbuf"));
    assert!(code.header.contains("    uint32_t getId() const;"));
    assert!(code.header.contains("    Channel getChannel() const;"));
    assert!(code.header.contains("    std::string getLabelString() const;"));
    assert!(code.header.contains("    void setTaps( int16_t value[ 8 ] );"));
    assert!(code.header.contains("    typedef ::driftbuf::Vector< int32_t > Samples;"));
    assert!(code.header.contains("#include \"speaker.ipp\""));

    // Definitions artifact, with offsets from the layout fold:
    // id@4, gain@8, channel@12, taps@16..32, label dyn0, samples dyn1.
    assert!(code
        .implementation
        .contains("return getAllocator()->template getItem< uint32_t >( 4 );"));
    assert!(code
        .implementation
        .contains("return getAllocator()->template getItem< float >( 8 );"));
    assert!(code
        .implementation
        .contains("return getAllocator()->template getItem< Channel >( 12 );"));
    assert!(code
        .implementation
        .contains("return getAllocator()->template getItemPtr< int16_t >( 16 );"));
    assert!(code.implementation.contains("new Alloc( 32, 2 )"));
    assert!(code
        .implementation
        .contains("getAllocator()->template getItem< uint64_t >( 12 )"));
    assert!(code
        .implementation
        .contains("getAllocator()->template getItem< uint64_t >( 28 )"));

    // Introspection descriptor
    assert!(code
        .implementation
        .contains("std::make_tuple( \"label\", \"char\", 0, 12, false )"));
    assert!(code
        .implementation
        .contains("std::make_tuple( \"taps\", \"int16_t\", 16, 8, true )"));
    assert!(code
        .implementation
        .contains("std::make_tuple( \"samples\", \"int32_t\", 1, 28, false )"));
    assert!(code
        .implementation
        .contains("template class SpeakerBase< ::driftbuf::NonMovingAllocator >;"));
}

#[test]
fn test_identical_schemas_compile_to_identical_artifacts() {
    let first = compile_schema("namespace ns;\ntable T { a: int; }", "t")
        .expect("first compile failed");
    let second = compile_schema("namespace ns;\ntable T { a: int; }", "t")
        .expect("second compile failed");
    assert_eq!(first.header, second.header);
    assert_eq!(first.implementation, second.implementation);
}

#[test]
fn test_unclosed_table_reports_syntax_error() {
    let input = "table Broken { x: int;";
    let tokens = tokenize_schema(input).expect("tokenize_schema failed");
    let err = parse_schema(&tokens).unwrap_err();
    assert!(
        matches!(err, DriftError::Syntax { .. }),
        "expected a Syntax error but got {:?}",
        err
    );
    assert!(compile_schema(input, "broken").is_err());
}

#[test]
fn test_undefined_field_type_fails_compilation() {
    let err = compile_schema("table T { x: Quaternion; }", "t").unwrap_err();
    assert!(matches!(err, DriftError::UndefinedType { .. }));
}

#[test]
fn test_duplicate_definition_fails_compilation() {
    let err = compile_schema("enum A : ubyte { X }\ntable A { }", "t").unwrap_err();
    assert!(matches!(err, DriftError::DuplicateName { .. }));
}
