use crate::error::DriftError;
use crate::identity::{table_identity, TypeIdentity};
use crate::layout::{layout_table, FieldLayout, FieldSlot, TableLayout};
use crate::registry::TypeRegistry;
use crate::types::{Declaration, EnumDecl, Schema};

/// Generated text artifacts for one schema file: the declarations header and
/// the inline definitions it includes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCode {
    pub header:         String,
    pub implementation: String,
}

/// Renders every declaration of a parsed schema. The registry and the current
/// namespace are threaded through the walk; tables are laid out and hashed as
/// they are reached, so any error aborts before partial text escapes.
pub fn generate(schema: &Schema, base_name: &str) -> Result<GeneratedCode, DriftError> {
    let mut registry = TypeRegistry::new();
    let mut gen = Generator::new(base_name);

    for declaration in &schema.declarations {
        match declaration {
            Declaration::Namespace(path) => gen.set_namespace(path),
            Declaration::Enum(decl) => {
                registry.register_enum(&decl.name, decl.line, decl.column)?;
                gen.write_enum(decl);
            }
            Declaration::Table(decl) => {
                registry.register_table(&decl.name, decl.line, decl.column)?;
                let layout = layout_table(decl, &registry)?;
                let identity = table_identity(&gen.namespace, &decl.name, &layout.fields);
                gen.write_table(&layout, identity);
            }
            Declaration::RootType(_) => {}
        }
    }

    Ok(gen.finish())
}

struct Generator {
    namespace:      Vec<String>,
    header:         String,
    implementation: String,
    base_name:      String,
}

impl Generator {
    fn new(base_name: &str) -> Self {
        let mut header = String::new();
        header.push_str("// Generated by driftc\n\n");
        header.push_str("#pragma once\n");
        header.push_str("#include <driftbuf/ConstVector.h>\n");
        header.push_str("#include <driftbuf/Driftbuf.h>\n");
        header.push_str("#include <driftbuf/NonMovingAllocator.h>\n");
        header.push_str("#include <driftbuf/Schema.h>\n");
        header.push_str("#include <driftbuf/Vector.h>\n\n");

        Generator {
            namespace:      Vec::new(),
            header,
            implementation: String::from("// Generated by driftc\n\n"),
            base_name:      base_name.to_string(),
        }
    }

    fn set_namespace(&mut self, path: &[String]) {
        for _ in &self.namespace {
            self.header.push_str("}\n");
            self.implementation.push_str("}\n");
        }
        self.namespace = path.to_vec();
        for segment in &self.namespace {
            self.header.push_str(&format!("namespace {}\n{{\n", segment));
            self.implementation
                .push_str(&format!("namespace {}\n{{\n", segment));
        }
    }

    fn finish(mut self) -> GeneratedCode {
        for _ in &self.namespace {
            self.header.push_str("}\n");
            self.implementation.push_str("}\n");
        }
        self.header
            .push_str(&format!("\n#include \"{}.ipp\"\n", self.base_name));

        GeneratedCode {
            header:         self.header,
            implementation: self.implementation,
        }
    }

    fn write_enum(&mut self, decl: &EnumDecl) {
        self.header.push_str(&format!("enum {}\n{{\n", decl.name));
        for value in &decl.values {
            self.header
                .push_str(&format!("    {}_{},\n", decl.name, value));
        }
        self.header.push_str("};\n\n");
    }

    fn write_table(&mut self, layout: &TableLayout, identity: TypeIdentity) {
        let table = layout.name.clone();
        self.header.push_str(&format!(
            "template< class Alloc = driftbuf::NonMovingAllocator >\nclass {}Base : public driftbuf::Driftbuf\n{{\npublic:\n",
            table
        ));

        let mut entries = Vec::with_capacity(layout.fields.len());
        for field in &layout.fields {
            match &field.slot {
                FieldSlot::Dynamic {
                    index,
                    length_offset,
                } => {
                    self.write_dynamic_field(&table, field, *index, *length_offset);
                    entries.push(format!(
                        "std::make_tuple( \"{}\", \"{}\", {}, {}, false )",
                        field.name, field.emitted_type, index, length_offset
                    ));
                }
                FieldSlot::Scalar { offset } => {
                    self.write_scalar_field(&table, field, *offset);
                    entries.push(format!(
                        "std::make_tuple( \"{}\", \"{}\", {}, 0, true )",
                        field.name, field.emitted_type, offset
                    ));
                }
                FieldSlot::Array {
                    offset,
                    count,
                    byte_size,
                } => {
                    self.write_array_field(&table, field, *offset, *count, *byte_size);
                    entries.push(format!(
                        "std::make_tuple( \"{}\", \"{}\", {}, {}, true )",
                        field.name, field.emitted_type, offset, count
                    ));
                }
            }
        }

        self.write_constructors(&table, layout);
        self.write_introspection(&table, layout, identity, &entries);

        self.header.push_str("private:\n};\n\n");
        self.header.push_str(&format!(
            "typedef {}Base< ::driftbuf::NonMovingAllocator > {};\n\n",
            table, table
        ));
        self.implementation.push_str(&format!(
            "template class {}Base< ::driftbuf::NonMovingAllocator >;\n\n",
            table
        ));
    }

    fn write_dynamic_field(
        &mut self,
        table: &str,
        field: &FieldLayout,
        index: u32,
        length_offset: u32,
    ) {
        let accessor = accessor_name(&field.name);
        let elem = field.emitted_type.clone();
        self.header.push_str(&format!(
            "    typedef ::driftbuf::Vector< {} > {};\n",
            elem, accessor
        ));
        self.header.push_str(&format!(
            "    typedef ::driftbuf::ConstVector< {} > Const{};\n",
            elem, accessor
        ));

        self.method(
            table,
            &format!("typename {}Base< Alloc >::{}", table, accessor),
            &format!("get{}()", accessor),
            &format!("return {}( getAllocator(), {} );", accessor, index),
        );
        self.method(
            table,
            &format!("typename {}Base< Alloc >::Const{}", table, accessor),
            &format!("get{}() const", accessor),
            &format!("return Const{}( getAllocator(), {} );", accessor, index),
        );
        self.method(
            table,
            "void",
            &format!("set{}( {} const * value, size_t size )", accessor, elem),
            &format!(
                "_setDriftbufArray( value, size * sizeof( {} ), {} );",
                elem, index
            ),
        );
        self.method(
            table,
            &format!("std::vector< {} >", elem),
            &format!("get{}Vector() const", accessor),
            &format!(
                "const Const{0}& vec = get{0}();\n    return std::vector< {1} >( vec.data(), vec.data() + vec.size( ));",
                accessor, elem
            ),
        );
        self.method(
            table,
            "void",
            &format!("set{}( const std::vector< {} >& value )", accessor, elem),
            &format!(
                "_setDriftbufArray( value.data(), value.size() * sizeof( {} ), {} );",
                elem, index
            ),
        );
        self.method(
            table,
            "std::string",
            &format!("get{}String() const", accessor),
            &format!(
                "const uint8_t* ptr = getAllocator()->template getDynamic< const uint8_t >( {} );\n    return std::string( ptr, ptr + getAllocator()->template getItem< uint64_t >( {} ));",
                index, length_offset
            ),
        );
        self.method(
            table,
            "void",
            &format!("set{}( const std::string& value )", accessor),
            &format!(
                "_setDriftbufArray( value.c_str(), value.length(), {} );",
                index
            ),
        );
        self.header.push('\n');
    }

    fn write_scalar_field(&mut self, table: &str, field: &FieldLayout, offset: u32) {
        let accessor = accessor_name(&field.name);
        let cxxtype = field.emitted_type.clone();
        self.method(
            table,
            &cxxtype,
            &format!("get{}() const", accessor),
            &format!(
                "return getAllocator()->template getItem< {} >( {} );",
                cxxtype, offset
            ),
        );
        self.method(
            table,
            "void",
            &format!("set{}( {} value )", accessor, cxxtype),
            &format!(
                "getAllocator()->template getItem< {} >( {} ) = value;",
                cxxtype, offset
            ),
        );
        self.header.push('\n');
    }

    fn write_array_field(
        &mut self,
        table: &str,
        field: &FieldLayout,
        offset: u32,
        count: u32,
        byte_size: u32,
    ) {
        let accessor = accessor_name(&field.name);
        let cxxtype = field.emitted_type.clone();
        self.method(
            table,
            &format!("{}*", cxxtype),
            &format!("get{}()", accessor),
            &format!(
                "return getAllocator()->template getItemPtr< {} >( {} );",
                cxxtype, offset
            ),
        );
        self.method(
            table,
            &format!("const {}*", cxxtype),
            &format!("get{}() const", accessor),
            &format!(
                "return getAllocator()->template getItemPtr< {} >( {} );",
                cxxtype, offset
            ),
        );
        self.method(
            table,
            &format!("std::vector< {} >", cxxtype),
            &format!("get{}Vector() const", accessor),
            &format!(
                "const {0}* ptr = getAllocator()->template getItemPtr< {0} >( {1} );\n    return std::vector< {0} >( ptr, ptr + {2} );",
                cxxtype, offset, count
            ),
        );
        self.method(
            table,
            "void",
            &format!("set{}( {} value[ {} ] )", accessor, cxxtype, count),
            &format!(
                "::memcpy( getAllocator()->template getItemPtr< {} >( {} ), value, {} * sizeof( {} ));",
                cxxtype, offset, count, cxxtype
            ),
        );
        self.method(
            table,
            "void",
            &format!("set{}( const std::vector< {} >& value )", accessor, cxxtype),
            &format!(
                "if( {} >= value.size( ))\n        ::memcpy( getAllocator()->template getItemPtr<{}>( {} ), value.data(), value.size() * sizeof( {}));",
                count, cxxtype, offset, cxxtype
            ),
        );
        self.method(
            table,
            "void",
            &format!("set{}( const std::string& value )", accessor),
            &format!(
                "if( {} >= value.length( ))\n        ::memcpy( getAllocator()->template getItemPtr<{}>( {} ), value.data(), value.length( ));",
                byte_size, cxxtype, offset
            ),
        );
        self.header.push('\n');
    }

    fn write_constructors(&mut self, table: &str, layout: &TableLayout) {
        if layout.is_empty() {
            // No storage to allocate or clone.
            self.header
                .push_str(&format!("    {0}Base() : Driftbuf() {{}}\n", table));
            self.header.push_str(&format!(
                "    {0}Base( const {0}Base& ) : Driftbuf() {{}}\n",
                table
            ));
            self.header
                .push_str(&format!("    virtual ~{}Base() {{}}\n\n", table));
            self.header.push_str(&format!(
                "    {0}Base& operator = ( const {0}Base& ) {{ return *this; }}\n\n",
                table
            ));
            return;
        }

        self.constructor(
            table,
            &format!("{}Base()", table),
            &format!(
                ": driftbuf::Driftbuf( new Alloc( {}, {} ))\n{{}}",
                layout.static_size, layout.dynamic_count
            ),
            false,
        );
        self.constructor(
            table,
            &format!("{}Base( const ::driftbuf::Driftbuf& from )", table),
            ": driftbuf::Driftbuf( new Alloc( *static_cast< const Alloc* >( from.getAllocator( ))))\n{}",
            true,
        );
        self.constructor(
            table,
            &format!("{0}Base( const {0}Base& from )", table),
            ": driftbuf::Driftbuf( new Alloc( *static_cast< const Alloc* >( from.getAllocator( ))))\n{}",
            false,
        );
        self.header
            .push_str(&format!("    virtual ~{}Base() {{}}\n\n", table));
        self.header.push_str(&format!(
            "    {0}Base& operator = ( const {0}Base& rhs )\n        {{ ::driftbuf::Driftbuf::operator = ( rhs ); return *this; }}\n\n",
            table
        ));
    }

    fn write_introspection(
        &mut self,
        table: &str,
        layout: &TableLayout,
        identity: TypeIdentity,
        entries: &[String],
    ) {
        self.header.push_str(&format!(
            "    static bool isEmptyDriftbuf() {{ return {}; }}\n",
            layout.is_empty()
        ));
        self.header.push_str(&format!(
            "    static bool isStaticDriftbuf() {{ return {}; }}\n",
            layout.is_static()
        ));

        let id = identity_literal(identity);
        self.header.push_str(&format!(
            "    driftbuf::uint128_t getDriftbufType() const override\n        {{ return {}; }}\n\n",
            id
        ));

        self.static_method(
            table,
            "::driftbuf::Schema",
            "schema()",
            &format!(
                "return {{ {}, {},\n        {},\n        {{\n         {}\n         }} }};",
                layout.static_size,
                layout.dynamic_count,
                id,
                entries.join(",\n         ")
            ),
        );
        self.header
            .push_str("    ::driftbuf::Schema getSchema() const override { return schema(); }\n\n");
    }

    fn method(&mut self, table: &str, ret: &str, signature: &str, body: &str) {
        self.header
            .push_str(&format!("    {} {};\n", ret, signature));
        self.implementation.push_str(&format!(
            "template< class Alloc >\ninline {} {}Base< Alloc >::{}\n{{\n    {}\n}}\n\n",
            ret, table, signature, body
        ));
    }

    fn static_method(&mut self, table: &str, ret: &str, signature: &str, body: &str) {
        self.header
            .push_str(&format!("    static {} {};\n", ret, signature));
        self.implementation.push_str(&format!(
            "template< class Alloc >\ninline {} {}Base< Alloc >::{}\n{{\n    {}\n}}\n\n",
            ret, table, signature, body
        ));
    }

    fn constructor(&mut self, table: &str, signature: &str, body: &str, explicit: bool) {
        self.header.push_str(&format!(
            "    {}{};\n",
            if explicit { "explicit " } else { "" },
            signature
        ));
        self.implementation.push_str(&format!(
            "template< class Alloc >\ninline {}Base< Alloc >::{}\n    {}\n\n",
            table, signature, body
        ));
    }
}

fn identity_literal(identity: TypeIdentity) -> String {
    format!(
        "driftbuf::uint128_t( 0x{:016x}ull, 0x{:016x}ull )",
        identity.high, identity.low
    )
}

fn accessor_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
