//! Lowering from the syntax tree to the flat declaration set.
//!
//! Inline enums and records are promoted to top-level declarations named after
//! their lexical path, eg. the inline record in field `address` of `User`
//! becomes `UserAddress`. A promoted declaration is registered before the
//! declaration that contains it.

use tracing::debug;

use crate::{
    naming::NamingContext,
    syntax::{
        Definition, EnumDef, EnumItemDef, FieldTypeSource, ParamDef, RecordBody, RecordDef,
        ResponseSource, ServiceBodySource, ServiceDef, SyntaxFile,
    },
    types::{
        Declaration, DeclarationSet, EnumDecl, EnumItem, EnumItemRef, Param, RecordDecl,
        RecordItem, Response, ServiceDecl, Type,
    },
};

/// Accumulates declarations from any number of syntax trees into one namespace.
#[derive(Debug, Default)]
pub struct Collector {
    declarations: DeclarationSet,
}

impl Collector {
    pub fn new() -> Collector {
        Collector::default()
    }

    /// Append every declaration of `file`. Returns how many were registered,
    /// synthesized inline types included.
    pub fn collect(&mut self, file: &SyntaxFile) -> usize {
        let before = self.declarations.len();
        for definition in &file.definitions {
            collect_definition(&mut self.declarations, definition);
        }
        self.declarations.len() - before
    }

    pub fn declarations(&self) -> &DeclarationSet {
        &self.declarations
    }

    pub fn into_declarations(self) -> DeclarationSet {
        self.declarations
    }
}

fn register(declarations: &mut DeclarationSet, declaration: Declaration) {
    debug!(name = declaration.name(), "registered declaration");
    declarations.register(declaration);
}

fn collect_definition(declarations: &mut DeclarationSet, definition: &Definition) {
    // Top-level definitions root their own naming path.
    let context = NamingContext::root(definition.name());
    let declaration = match definition {
        Definition::Enum(def)    => Declaration::Enum(build_enum(def)),
        Definition::Record(def)  => Declaration::Record(build_record(declarations, &context, def)),
        Definition::Service(def) => Declaration::Service(build_service(declarations, &context, def)),
    };
    register(declarations, declaration);
}

fn build_enum_items(items: &[EnumItemDef]) -> Vec<EnumItem> {
    items
        .iter()
        .map(|item| EnumItem {
            name:        item.name.clone(),
            description: item.description.clone(),
            alias_of:    item.alias_enum.as_ref().map(|enum_name| EnumItemRef {
                enum_name: enum_name.clone(),
                item_name: item.name.clone(),
            }),
        })
        .collect()
}

fn build_enum(def: &EnumDef) -> EnumDecl {
    EnumDecl {
        name:        def.name.clone(),
        description: def.description.clone(),
        items:       build_enum_items(&def.items),
    }
}

fn build_record(declarations: &mut DeclarationSet, context: &NamingContext, def: &RecordDef) -> RecordDecl {
    RecordDecl {
        name:        def.name.clone(),
        description: def.description.clone(),
        items:       build_record_items(declarations, context, &def.body),
    }
}

fn build_record_items(
    declarations: &mut DeclarationSet,
    context: &NamingContext,
    body: &RecordBody,
) -> Vec<RecordItem> {
    body.items
        .iter()
        .map(|item| {
            let item_context = context.child(item.name.as_str());
            let type_ = build_field_type(declarations, &item_context, &item.source, &item.description);
            RecordItem {
                name:        item.name.clone(),
                description: item.description.clone(),
                type_,
                optional:    item.optional,
                is_property: item.is_property,
            }
        })
        .collect()
}

/// Resolve a field's type, promoting inline types named after `context`.
fn build_field_type(
    declarations: &mut DeclarationSet,
    context: &NamingContext,
    source: &FieldTypeSource,
    description: &str,
) -> Type {
    match source {
        FieldTypeSource::Type(type_) => type_.clone(),
        FieldTypeSource::InlineEnum(items) => {
            let name = context.to_type_name();
            register(
                declarations,
                Declaration::Enum(EnumDecl {
                    name:        name.clone(),
                    description: description.to_string(),
                    items:       build_enum_items(items),
                }),
            );
            Type::Ref(name)
        }
        FieldTypeSource::InlineRecord(body) => build_inline_record(declarations, context, body, description),
    }
}

fn build_inline_record(
    declarations: &mut DeclarationSet,
    context: &NamingContext,
    body: &RecordBody,
    description: &str,
) -> Type {
    let name = context.to_type_name();
    let items = build_record_items(declarations, context, body);
    register(
        declarations,
        Declaration::Record(RecordDecl {
            name:        name.clone(),
            description: description.to_string(),
            items,
        }),
    );
    Type::Ref(name)
}

fn build_params(params: &[ParamDef]) -> Vec<Param> {
    params
        .iter()
        .map(|param| Param {
            name:        param.name.clone(),
            description: param.description.clone(),
            type_:       param.type_,
        })
        .collect()
}

fn build_service(declarations: &mut DeclarationSet, context: &NamingContext, def: &ServiceDef) -> ServiceDecl {
    let body = def.body.as_ref().map(|source| match source {
        ServiceBodySource::Type(type_) => type_.clone(),
        ServiceBodySource::Inline { description, body } => {
            build_inline_record(declarations, &context.child("request"), body, description)
        }
    });

    let responses = def
        .responses
        .iter()
        .map(|response| {
            let type_ = match &response.source {
                ResponseSource::Type(type_) => type_.clone(),
                ResponseSource::Inline(body) => {
                    let response_context = context.child("response").child(response.status.to_string());
                    build_inline_record(declarations, &response_context, body, &response.description)
                }
            };
            Response {
                status:      response.status,
                description: response.description.clone(),
                type_,
            }
        })
        .collect();

    ServiceDecl {
        name:        def.name.clone(),
        description: def.description.clone(),
        method:      def.method,
        url:         def.url.clone(),
        params:      build_params(&def.params),
        query:       build_params(&def.query),
        body,
        responses,
    }
}
