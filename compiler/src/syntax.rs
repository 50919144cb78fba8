//! Concrete syntax tree produced by the parser.
//!
//! Inline types are still anonymous here; the collector names and promotes
//! them to top-level declarations.

use crate::types::{Method, Primitive, Type, UrlSegment};

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxFile {
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Enum(EnumDef),
    Record(RecordDef),
    Service(ServiceDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Enum(def)    => &def.name,
            Definition::Record(def)  => &def.name,
            Definition::Service(def) => &def.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name:        String,
    pub description: String,
    pub items:       Vec<EnumItemDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumItemDef {
    pub name:        String,
    pub description: String,
    /// Enum named by `Enum.Item`; the item name is `name`.
    pub alias_enum:  Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    pub name:        String,
    pub description: String,
    pub body:        RecordBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordBody {
    pub items: Vec<RecordItemDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordItemDef {
    pub name:        String,
    pub description: String,
    pub optional:    bool,
    pub is_property: bool,
    pub source:      FieldTypeSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldTypeSource {
    Type(Type),
    InlineEnum(Vec<EnumItemDef>),
    InlineRecord(RecordBody),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub name:        String,
    pub description: String,
    pub type_:       Primitive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceBodySource {
    Type(Type),
    Inline {
        description: String,
        body:        RecordBody,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSource {
    Type(Type),
    Inline(RecordBody),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDef {
    pub status:      u16,
    pub description: String,
    pub source:      ResponseSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub name:        String,
    pub description: String,
    pub method:      Method,
    pub url:         Vec<UrlSegment>,
    pub params:      Vec<ParamDef>,
    pub query:       Vec<ParamDef>,
    pub body:        Option<ServiceBodySource>,
    pub responses:   Vec<ResponseDef>,
}
