//! TypeScript code templates for each type form.
//!
//! Nested list and dict traversals bind `el1`, `el2`, ... so that the lambda at
//! each depth has its own parameter name.

use crate::{
    error::IgorError,
    types::{DeclarationSet, Primitive, RefKind, Type},
};

pub struct TypeModel<'a> {
    declarations: &'a DeclarationSet,
    /// Prepended to referenced names, eg. `Protocol.` in the service module.
    prefix:       &'a str,
}

fn bound_var(depth: usize) -> String {
    format!("el{}", depth)
}

impl<'a> TypeModel<'a> {
    pub fn new(declarations: &'a DeclarationSet, prefix: &'a str) -> TypeModel<'a> {
        TypeModel { declarations, prefix }
    }

    /// Classify a reference as an enum or a record.
    pub fn classify(&self, name: &str) -> Result<RefKind<'a>, IgorError> {
        match self.declarations.resolve(name) {
            Some(RefKind::Service(_)) => Err(IgorError::UnknownType(name.to_string())),
            Some(kind) => Ok(kind),
            None => Err(IgorError::UnresolvedReference(name.to_string())),
        }
    }

    fn full_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// The TypeScript type signature.
    pub fn declaration(&self, type_: &Type) -> Result<String, IgorError> {
        Ok(match type_ {
            Type::Primitive(primitive) => primitive_declaration(*primitive).to_string(),
            Type::List(item) => format!("Array<{}>", self.declaration(item)?),
            Type::Dict(value) => format!("{{[key: string]: {}}}", self.declaration(value)?),
            Type::Ref(name) => {
                self.classify(name)?;
                self.full_name(name)
            }
        })
    }

    /// Decode the wire value `expr`.
    pub fn from_json(&self, type_: &Type, expr: &str) -> Result<String, IgorError> {
        self.from_json_at(type_, expr, 1)
    }

    fn from_json_at(&self, type_: &Type, expr: &str, depth: usize) -> Result<String, IgorError> {
        Ok(match type_ {
            Type::Primitive(Primitive::Date) => format!("new Date({} * 1000)", expr),
            Type::Primitive(primitive) => format!("<{}>{}", primitive_declaration(*primitive), expr),
            Type::List(item) => {
                let var = bound_var(depth);
                format!("listFromJson({}, {} => {})", expr, var, self.from_json_at(item, &var, depth + 1)?)
            }
            Type::Dict(value) => {
                let var = bound_var(depth);
                format!("dictFromJson({}, {} => {})", expr, var, self.from_json_at(value, &var, depth + 1)?)
            }
            Type::Ref(name) => match self.classify(name)? {
                RefKind::Enum(_) => format!("{}FromString({})", self.full_name(name), expr),
                RefKind::Record(_) => format!("{}.fromJson({})", self.full_name(name), expr),
                RefKind::Service(_) => return Err(IgorError::UnknownType(name.clone())),
            },
        })
    }

    /// Encode the value `expr` for the wire.
    pub fn to_json(&self, type_: &Type, expr: &str) -> Result<String, IgorError> {
        self.to_json_at(type_, expr, 1)
    }

    fn to_json_at(&self, type_: &Type, expr: &str, depth: usize) -> Result<String, IgorError> {
        Ok(match type_ {
            Type::Primitive(Primitive::Date) => format!("Math.ceil({}.getTime() / 1000)", expr),
            Type::Primitive(_) => expr.to_string(),
            Type::List(item) => {
                let var = bound_var(depth);
                format!("listToJson({}, {} => {})", expr, var, self.to_json_at(item, &var, depth + 1)?)
            }
            Type::Dict(value) => {
                let var = bound_var(depth);
                format!("dictToJson({}, {} => {})", expr, var, self.to_json_at(value, &var, depth + 1)?)
            }
            Type::Ref(name) => match self.classify(name)? {
                RefKind::Enum(_) => format!("{}ToString({})", self.full_name(name), expr),
                RefKind::Record(_) => format!("{}.toJson()", expr),
                RefKind::Service(_) => return Err(IgorError::UnknownType(name.clone())),
            },
        })
    }

    /// Deep-copy the value `expr`.
    pub fn clone_value(&self, type_: &Type, expr: &str) -> Result<String, IgorError> {
        self.clone_at(type_, expr, 1)
    }

    fn clone_at(&self, type_: &Type, expr: &str, depth: usize) -> Result<String, IgorError> {
        Ok(match type_ {
            Type::Primitive(Primitive::Date) => format!("new Date({}.getTime())", expr),
            Type::Primitive(Primitive::String) => format!("(\" \" + {}).slice(1)", expr),
            Type::Primitive(Primitive::Json) => format!("jsonClone({})", expr),
            Type::Primitive(Primitive::Number | Primitive::Int | Primitive::Bool) => expr.to_string(),
            Type::List(item) => {
                let var = bound_var(depth);
                format!("listClone({}, {} => {})", expr, var, self.clone_at(item, &var, depth + 1)?)
            }
            Type::Dict(value) => {
                let var = bound_var(depth);
                format!("dictClone({}, {} => {})", expr, var, self.clone_at(value, &var, depth + 1)?)
            }
            Type::Ref(name) => match self.classify(name)? {
                RefKind::Enum(_) => expr.to_string(),
                RefKind::Record(_) => format!("{}.clone()", expr),
                RefKind::Service(_) => return Err(IgorError::UnknownType(name.clone())),
            },
        })
    }
}

fn primitive_declaration(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Number | Primitive::Int => "number",
        Primitive::String => "string",
        Primitive::Bool   => "boolean",
        Primitive::Json   => "any",
        Primitive::Date   => "Date",
    }
}
