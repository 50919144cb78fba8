use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Serialize as DeriveSerialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Number,
    Int,
    String,
    Bool,
    Json,
    Date,
}

impl Primitive {
    pub fn from_keyword(text: &str) -> Option<Primitive> {
        match text {
            "number"        => Some(Primitive::Number),
            "int"           => Some(Primitive::Int),
            "string"        => Some(Primitive::String),
            "bool"          => Some(Primitive::Bool),
            "json"          => Some(Primitive::Json),
            "date" | "Date" => Some(Primitive::Date),
            _               => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Number => "number",
            Primitive::Int    => "int",
            Primitive::String => "string",
            Primitive::Bool   => "bool",
            Primitive::Json   => "json",
            Primitive::Date   => "date",
        }
    }
}

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("tag", self.keyword())?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(Primitive),
    List(Box<Type>),
    /// Keys are always strings on the wire.
    Dict(Box<Type>),
    /// Resolved lazily against the `DeclarationSet`.
    Ref(String),
}

impl Type {
    pub fn reference<N: Into<String>>(name: N) -> Type {
        Type::Ref(name.into())
    }

    pub fn list(item: Type) -> Type {
        Type::List(Box::new(item))
    }

    pub fn dict(value: Type) -> Type {
        Type::Dict(Box::new(value))
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Type::Primitive(primitive) => primitive.serialize(serializer),
            Type::List(item) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("tag", "list")?;
                map.serialize_entry("item_type", item)?;
                map.end()
            }
            Type::Dict(value) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("tag", "dict")?;
                map.serialize_entry("value_type", value)?;
                map.end()
            }
            Type::Ref(name) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("tag", "ref")?;
                map.serialize_entry("ref", name)?;
                map.end()
            }
        }
    }
}

/// A pending `Enum.Item` alias, resolved at generation time.
#[derive(Debug, Clone, PartialEq, Eq, DeriveSerialize)]
pub struct EnumItemRef {
    #[serde(rename = "enum")]
    pub enum_name: String,
    #[serde(rename = "item")]
    pub item_name: String,
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct EnumItem {
    pub name:        String,
    pub description: String,
    #[serde(rename = "alias")]
    pub alias_of:    Option<EnumItemRef>,
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct EnumDecl {
    pub name:        String,
    pub description: String,
    pub items:       Vec<EnumItem>,
}

impl EnumDecl {
    pub fn item(&self, name: &str) -> Option<&EnumItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct RecordItem {
    pub name:        String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_:       Type,
    pub optional:    bool,
    #[serde(rename = "property")]
    pub is_property: bool,
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct RecordDecl {
    pub name:        String,
    pub description: String,
    pub items:       Vec<RecordItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DeriveSerialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn from_keyword(text: &str) -> Option<Method> {
        match text {
            "GET"    => Some(Method::Get),
            "POST"   => Some(Method::Post),
            "PUT"    => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            _        => None,
        }
    }

    /// Name of the abstract verb on the generated service class.
    pub fn verb(self) -> &'static str {
        match self {
            Method::Get    => "get",
            Method::Post   => "post",
            Method::Put    => "put",
            Method::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, DeriveSerialize)]
#[serde(tag = "tag")]
pub enum UrlSegment {
    #[serde(rename = "url")]
    Literal { url: String },
    #[serde(rename = "param")]
    Param { param: String },
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct Param {
    pub name:        String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_:       Primitive,
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct Response {
    pub status:      u16,
    pub description: String,
    #[serde(rename = "type")]
    pub type_:       Type,
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
pub struct ServiceDecl {
    pub name:        String,
    pub description: String,
    pub method:      Method,
    pub url:         Vec<UrlSegment>,
    pub params:      Vec<Param>,
    pub query:       Vec<Param>,
    pub body:        Option<Type>,
    pub responses:   Vec<Response>,
}

#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Declaration {
    Enum(EnumDecl),
    Record(RecordDecl),
    Service(ServiceDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Enum(decl)    => &decl.name,
            Declaration::Record(decl)  => &decl.name,
            Declaration::Service(decl) => &decl.name,
        }
    }
}

/// A reference resolved against the declaration set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefKind<'a> {
    Enum(&'a EnumDecl),
    Record(&'a RecordDecl),
    Service(&'a ServiceDecl),
}

/// Every declaration of one compiler run, in first-registration order.
///
/// Append-only: later units add to the same namespace. Duplicate names are
/// kept here and rejected by the verifier; lookups see the first registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSet {
    declarations: Vec<Declaration>,
    index:        HashMap<String, usize>,
}

impl DeclarationSet {
    pub fn new() -> DeclarationSet {
        DeclarationSet::default()
    }

    pub fn register(&mut self, declaration: Declaration) {
        let position = self.declarations.len();
        self.index
            .entry(declaration.name().to_string())
            .or_insert(position);
        self.declarations.push(declaration);
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.index.get(name).map(|&i| &self.declarations[i])
    }

    pub fn resolve(&self, name: &str) -> Option<RefKind<'_>> {
        self.get(name).map(|declaration| match declaration {
            Declaration::Enum(decl)    => RefKind::Enum(decl),
            Declaration::Record(decl)  => RefKind::Record(decl),
            Declaration::Service(decl) => RefKind::Service(decl),
        })
    }

    pub fn is_enum(&self, name: &str) -> bool {
        matches!(self.resolve(name), Some(RefKind::Enum(_)))
    }

    pub fn is_record(&self, name: &str) -> bool {
        matches!(self.resolve(name), Some(RefKind::Record(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Enum(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Record(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Service(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl Serialize for DeclarationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.declarations)
    }
}
