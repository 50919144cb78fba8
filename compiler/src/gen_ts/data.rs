use crate::{
    error::IgorError,
    type_model::TypeModel,
    types::{DeclarationSet, EnumDecl, EnumItem, RecordDecl, RecordItem, RefKind},
    utils::{offset, quote, type_name, var_name},
};

const HEADER: &str = r#"
function listFromJson<T>(json: any, fromJson: (json: any) => T): Array<T>
{
    return (<Array<any>>json).map(fromJson);
}

function listToJson<T>(data: Array<T>, toJson: (data: T) => any): Array<any>
{
    return data.map(toJson);
}

function listClone<T>(data: Array<T>, clone: (data: T) => T): Array<T>
{
    return data.map(clone);
}

function dictFromJson<T>(json: any, fromJson: (json: any) => T): {[key: string]: T}
{
    let res: {[key: string]: T} = {};
    for (let key in json)
        res[key] = fromJson(json[key]);
    return res;
}

function dictToJson<T>(data: {[key: string]: T}, toJson: (data: T) => any): {[key: string]: any}
{
    let res: {[key: string]: any} = {};
    for (let key in data)
        res[key] = toJson(data[key]);
    return res;
}

function dictClone<T>(data: {[key: string]: T}, clone: (data: T) => T): {[key: string]: T}
{
    let res: {[key: string]: T} = {};
    for (let key in data)
        res[key] = clone(data[key]);
    return res;
}

function jsonClone(json: any): any
{
    return json === undefined ? undefined : JSON.parse(JSON.stringify(json));
}

function jsonHasKey(json: any, key: string): boolean
{
    return key in json;
}

function jsonHasValue(json: any, key: string): boolean
{
    return key in json && json[key] != null;
}
"#;

/// Render the data module: helpers, then every enum, then every record.
pub fn generate_data(declarations: &DeclarationSet) -> Result<String, IgorError> {
    let model = TypeModel::new(declarations, "");
    let mut code: Vec<String> = vec![HEADER.to_string()];

    for decl in declarations.enums() {
        code.push(generate_enum(declarations, decl)?);
    }
    for decl in declarations.records() {
        code.push(generate_record(&model, decl)?);
    }

    Ok(code.join("\n"))
}

/// The description of `item`, following `Enum.Item` aliases to the end of the chain.
pub fn item_description(declarations: &DeclarationSet, enum_name: &str, item: &EnumItem) -> Result<String, IgorError> {
    let mut current = item;
    let mut visited: Vec<(String, String)> = vec![(enum_name.to_string(), item.name.clone())];

    while let Some(alias) = &current.alias_of {
        let missing = || IgorError::MissingAlias {
            enum_name: alias.enum_name.clone(),
            item_name: alias.item_name.clone(),
        };
        let target_enum = match declarations.resolve(&alias.enum_name) {
            Some(RefKind::Enum(decl)) => decl,
            _ => return Err(missing()),
        };
        let target = target_enum.item(&alias.item_name).ok_or_else(missing)?;

        let key = (target_enum.name.clone(), target.name.clone());
        if visited.contains(&key) {
            return Err(IgorError::AliasCycle {
                enum_name: alias.enum_name.clone(),
                item_name: alias.item_name.clone(),
            });
        }
        visited.push(key);
        current = target;
    }

    Ok(current.description.clone())
}

fn description_comment(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }
    description.split('\n').map(|line| format!("// {}", line)).collect()
}

fn generate_enum(declarations: &DeclarationSet, decl: &EnumDecl) -> Result<String, IgorError> {
    let name = &decl.name;
    let members: Vec<String> = decl.items.iter().map(|item| type_name(&item.name)).collect();

    let mut lines = description_comment(&decl.description);

    lines.push(format!("export const enum {}", name));
    lines.push("{".to_string());
    let values: Vec<String> = std::iter::once("Null".to_string())
        .chain(members.iter().cloned())
        .map(|member| offset(1, &member))
        .collect();
    lines.push(values.join(",\n"));
    lines.push("}".to_string());

    lines.push(format!("export function {}ToString(val: {}): string | null", name, name));
    lines.push("{".to_string());
    lines.push("    let arr: Array<string | null> = [".to_string());
    let wire_names: Vec<String> = std::iter::once("null".to_string())
        .chain(decl.items.iter().map(|item| quote(&item.name)))
        .map(|wire| offset(2, &wire))
        .collect();
    lines.push(wire_names.join(",\n"));
    lines.push("    ];".to_string());
    lines.push("    return arr[val];".to_string());
    lines.push("}".to_string());

    lines.push(format!("export function {}FromString(json: string): {}", name, name));
    lines.push("{".to_string());
    lines.push("    switch (json)".to_string());
    lines.push("    {".to_string());
    for (item, member) in decl.items.iter().zip(&members) {
        lines.push(format!("        case {}: return {}.{};", quote(&item.name), name, member));
    }
    lines.push(format!("        default: return {}.Null;", name));
    lines.push("    }".to_string());
    lines.push("}".to_string());

    lines.push(format!("export function {}ToDescription(val: {}): string", name, name));
    lines.push("{".to_string());
    lines.push("    switch (val)".to_string());
    lines.push("    {".to_string());
    for (item, member) in decl.items.iter().zip(&members) {
        let description = item_description(declarations, name, item)?;
        lines.push(format!("        case {}.{}: return {};", name, member, quote(&description)));
    }
    lines.push("        default: return \"\";".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    Ok(lines.join("\n") + "\n")
}

/// Per-field snippets of a record class.
struct Field<'a> {
    item:        &'a RecordItem,
    var:         String,
    key:         String,
    declaration: String,
}

impl<'a> Field<'a> {
    fn new(model: &TypeModel, item: &'a RecordItem) -> Result<Field<'a>, IgorError> {
        let mut declaration = model.declaration(&item.type_)?;
        if item.optional {
            declaration.push_str(" | null");
        }
        Ok(Field {
            item,
            var: var_name(&item.name),
            key: quote(&item.name),
            declaration,
        })
    }

    /// Where the value lives on `this`: the backing field for properties.
    fn storage(&self) -> String {
        if self.item.is_property {
            format!("this._{}", self.var)
        } else {
            format!("this.{}", self.var)
        }
    }

    fn is_set_flag(&self) -> String {
        format!("this._{}IsSet", self.var)
    }

    /// `expr` guarded so that a null optional value stays null.
    fn nullable(&self, value: &str, expr: String) -> String {
        if self.item.optional {
            format!("{} == null ? null : {}", value, expr)
        } else {
            expr
        }
    }

    fn declaration_lines(&self) -> Vec<String> {
        let comment = if self.item.description.is_empty() {
            String::new()
        } else {
            format!(" // {}", self.item.description.replace('\n', " "))
        };
        if self.item.is_property {
            vec![
                format!("    private _{}: {};{}", self.var, self.declaration, comment),
                format!("    private _{}IsSet: boolean = false;", self.var),
            ]
        } else {
            vec![format!("    {}: {};{}", self.var, self.declaration, comment)]
        }
    }

    fn accessor_lines(&self) -> Vec<String> {
        vec![
            format!("    get {}(): {}", self.var, self.declaration),
            "    {".to_string(),
            format!("        return this._{};", self.var),
            "    }".to_string(),
            "".to_string(),
            format!("    set {}(value: {})", self.var, self.declaration),
            "    {".to_string(),
            format!("        this._{} = value;", self.var),
            format!("        {} = true;", self.is_set_flag()),
            "    }".to_string(),
            "".to_string(),
        ]
    }

    fn from_json_lines(&self, model: &TypeModel) -> Result<Vec<String>, IgorError> {
        let wire = format!("json[{}]", self.key);
        let mut decoded = model.from_json(&self.item.type_, &wire)?;
        if self.item.optional {
            decoded = format!("jsonHasValue(json, {}) ? {} : null", self.key, decoded);
        }
        let assignment = format!("obj.{} = {};", self.var, decoded);
        Ok(if self.item.is_property {
            vec![
                format!("        if (jsonHasKey(json, {}))", self.key),
                format!("            {}", assignment),
            ]
        } else {
            vec![format!("        {}", assignment)]
        })
    }

    fn to_json_entry(&self, model: &TypeModel) -> Result<String, IgorError> {
        let storage = self.storage();
        let encoded = model.to_json(&self.item.type_, &storage)?;
        Ok(self.nullable(&storage, encoded))
    }

    fn clone_lines(&self, model: &TypeModel) -> Result<Vec<String>, IgorError> {
        let storage = self.storage();
        let copied = self.nullable(&storage, model.clone_value(&self.item.type_, &storage)?);
        let assignment = format!("obj.{} = {};", self.var, copied);
        Ok(if self.item.is_property {
            vec![
                format!("        if ({})", self.is_set_flag()),
                format!("            {}", assignment),
            ]
        } else {
            vec![format!("        {}", assignment)]
        })
    }
}

fn generate_record(model: &TypeModel, decl: &RecordDecl) -> Result<String, IgorError> {
    let name = &decl.name;
    let fields = decl
        .items
        .iter()
        .map(|item| Field::new(model, item))
        .collect::<Result<Vec<_>, _>>()?;

    let mut lines = description_comment(&decl.description);
    lines.push(format!("export class {}", name));
    lines.push("{".to_string());

    for field in &fields {
        lines.extend(field.declaration_lines());
    }
    lines.push("".to_string());
    for field in fields.iter().filter(|f| f.item.is_property) {
        lines.extend(field.accessor_lines());
    }

    lines.push(format!("    static fromJson(json: any): {}", name));
    lines.push("    {".to_string());
    lines.push(format!("        let obj = new {}();", name));
    for field in &fields {
        lines.extend(field.from_json_lines(model)?);
    }
    lines.push("        return obj;".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());

    lines.push("    toJson(): any".to_string());
    lines.push("    {".to_string());
    lines.push("        let obj: any =".to_string());
    lines.push("        {".to_string());
    for field in fields.iter().filter(|f| !f.item.is_property) {
        lines.push(format!("            {}: {},", field.key, field.to_json_entry(model)?));
    }
    lines.push("        };".to_string());
    for field in fields.iter().filter(|f| f.item.is_property) {
        lines.push(format!("        if ({})", field.is_set_flag()));
        lines.push(format!("            obj[{}] = {};", field.key, field.to_json_entry(model)?));
    }
    lines.push("        return obj;".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());

    lines.push(format!("    clone(): {}", name));
    lines.push("    {".to_string());
    lines.push(format!("        let obj = new {}();", name));
    for field in &fields {
        lines.extend(field.clone_lines(model)?);
    }
    lines.push("        return obj;".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    Ok(lines.join("\n") + "\n")
}
