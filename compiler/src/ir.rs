use crate::{error::IgorError, types::DeclarationSet};

/// Render the declaration set as canonical JSON with sorted keys.
///
/// Going through `serde_json::Value` sorts object keys, so the output does not
/// depend on struct field order.
pub fn to_ir_json(declarations: &DeclarationSet, compact: bool) -> Result<String, IgorError> {
    let value = serde_json::to_value(declarations)?;
    let text = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_schema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_compact_ir() {
        let set = compile_schema("# c\nenum Color { Red; Shade.Dark; }").unwrap();
        assert_eq!(
            to_ir_json(&set, true).unwrap(),
            r#"[{"description":"c","items":[{"alias":null,"description":"","name":"Red"},{"alias":{"enum":"Shade","item":"Dark"},"description":"","name":"Dark"}],"name":"Color","tag":"enum"}]"#
        );
    }

    #[test]
    fn test_readable_ir_is_indented() {
        let set = compile_schema("record A { int x; }").unwrap();
        let text = to_ir_json(&set, false).unwrap();
        assert!(text.starts_with("[\n  {\n"));
        let compact = to_ir_json(&set, true).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_service_ir() {
        let set = compile_schema(
            "record User { @?list<dict<string, User>> friends; }\n\
             service GetUser {\n\
               method GET;\n\
               url users/{id};\n\
               param int id;\n\
               query date since;\n\
               # missing\n\
               response 404 { string error; }\n\
               response 200 User;\n\
             }",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_ir_json(&set, true).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "tag": "record",
                    "name": "User",
                    "description": "",
                    "items": [{
                        "name": "friends",
                        "description": "",
                        "optional": true,
                        "property": true,
                        "type": {
                            "tag": "list",
                            "item_type": {
                                "tag": "dict",
                                "value_type": { "tag": "ref", "ref": "User" }
                            }
                        }
                    }]
                },
                {
                    "tag": "record",
                    "name": "GetUserResponse404",
                    "description": "missing",
                    "items": [{
                        "name": "error",
                        "description": "",
                        "optional": false,
                        "property": false,
                        "type": { "tag": "string" }
                    }]
                },
                {
                    "tag": "service",
                    "name": "GetUser",
                    "description": "",
                    "method": "GET",
                    "url": [
                        { "tag": "url", "url": "users/" },
                        { "tag": "param", "param": "id" }
                    ],
                    "params": [{ "name": "id", "description": "", "type": { "tag": "int" } }],
                    "query": [{ "name": "since", "description": "", "type": { "tag": "date" } }],
                    "body": null,
                    "responses": [
                        {
                            "status": 404,
                            "description": "missing",
                            "type": { "tag": "ref", "ref": "GetUserResponse404" }
                        },
                        {
                            "status": 200,
                            "description": "",
                            "type": { "tag": "ref", "ref": "User" }
                        }
                    ]
                }
            ])
        );
    }
}
