use crate::{
    error::IgorError,
    type_model::TypeModel,
    types::{DeclarationSet, Method, ServiceDecl, Type, UrlSegment},
    utils::{quote, var_name},
};

use super::TsOptions;

/// Render the service module: the abstract client with one method per service.
pub fn generate_service(declarations: &DeclarationSet, options: &TsOptions) -> Result<String, IgorError> {
    let prefix = format!("{}.", options.data_alias);
    let model = TypeModel::new(declarations, &prefix);

    let mut lines = vec![
        "import {Observable, throwError} from \"rxjs\";".to_string(),
        "import {catchError, map} from \"rxjs/operators\";".to_string(),
        format!("import * as {} from {};", options.data_alias, quote(&options.data_import())),
        "".to_string(),
        "export interface HttpResponse".to_string(),
        "{".to_string(),
        "    status: number;".to_string(),
        "    json(): any;".to_string(),
        "}".to_string(),
        "".to_string(),
        format!("export abstract class {}", options.service_class),
        "{".to_string(),
        "    abstract get(path: string, query: any): Observable<HttpResponse>;".to_string(),
        "    abstract put(path: string, query: any, body: any): Observable<HttpResponse>;".to_string(),
        "    abstract post(path: string, query: any, body: any): Observable<HttpResponse>;".to_string(),
        "    abstract delete(path: string, query: any, body: any): Observable<HttpResponse>;".to_string(),
    ];

    for service in declarations.services() {
        lines.push("".to_string());
        lines.extend(generate_method(&model, service)?);
    }
    lines.push("}".to_string());

    Ok(lines.join("\n") + "\n")
}

fn ok_response(service: &ServiceDecl) -> Result<&Type, IgorError> {
    service
        .responses
        .iter()
        .find(|response| response.status == 200)
        .map(|response| &response.type_)
        .ok_or_else(|| IgorError::MissingOkResponse(service.name.clone()))
}

fn url_expression(model: &TypeModel, service: &ServiceDecl) -> Result<String, IgorError> {
    let parts = service
        .url
        .iter()
        .map(|segment| match segment {
            UrlSegment::Literal { url } => Ok(quote(url)),
            UrlSegment::Param { param } => {
                let declared = service
                    .params
                    .iter()
                    .find(|p| &p.name == param)
                    .ok_or_else(|| IgorError::UndeclaredPathParam {
                        service: service.name.clone(),
                        param:   param.clone(),
                    })?;
                let encoded = model.to_json(&Type::Primitive(declared.type_), &var_name(param))?;
                Ok(format!("{}.toString()", encoded))
            }
        })
        .collect::<Result<Vec<_>, IgorError>>()?;
    Ok(parts.join(" + "))
}

fn query_expression(model: &TypeModel, service: &ServiceDecl) -> Result<String, IgorError> {
    let entries = service
        .query
        .iter()
        .map(|q| {
            let encoded = model.to_json(&Type::Primitive(q.type_), &var_name(&q.name))?;
            Ok(format!("{}: {}", quote(&q.name), encoded))
        })
        .collect::<Result<Vec<_>, IgorError>>()?;
    Ok(format!("{{{}}}", entries.join(", ")))
}

fn generate_method(model: &TypeModel, service: &ServiceDecl) -> Result<Vec<String>, IgorError> {
    let ok_type = ok_response(service)?;

    let mut args = Vec::new();
    for param in service.params.iter().chain(&service.query) {
        let declaration = model.declaration(&Type::Primitive(param.type_))?;
        args.push(format!("{}: {}", var_name(&param.name), declaration));
    }
    if let Some(body) = &service.body {
        args.push(format!("body: {}", model.declaration(body)?));
    }

    let mut call_args = vec![url_expression(model, service)?, query_expression(model, service)?];
    if service.method != Method::Get {
        call_args.push(match &service.body {
            Some(body) => model.to_json(body, "body")?,
            None => "{}".to_string(),
        });
    }

    let mut lines: Vec<String> = service
        .description
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| format!("    // {}", line))
        .collect();

    lines.push(format!(
        "    {}({}): Observable<{}>",
        var_name(&service.name),
        args.join(", "),
        model.declaration(ok_type)?
    ));
    lines.push("    {".to_string());
    lines.push(format!(
        "        return this.{}({})",
        service.method.verb(),
        call_args.join(", ")
    ));
    lines.push("            .pipe(".to_string());
    lines.push("                catchError(response =>".to_string());
    lines.push("                {".to_string());
    lines.push("                    switch (response.status)".to_string());
    lines.push("                    {".to_string());
    for response in service.responses.iter().filter(|r| r.status != 200) {
        lines.push(format!(
            "                        case {}: return throwError(() => {});",
            response.status,
            model.from_json(&response.type_, "response.json()")?
        ));
    }
    lines.push("                        default: return throwError(() => response);".to_string());
    lines.push("                    }".to_string());
    lines.push("                }),".to_string());
    lines.push(format!(
        "                map((response: HttpResponse) => {})",
        model.from_json(ok_type, "response.json()")?
    ));
    lines.push("            );".to_string());
    lines.push("    }".to_string());

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_schema;
    use pretty_assertions::assert_eq;

    fn service(text: &str) -> Result<String, IgorError> {
        generate_service(&compile_schema(text)?, &TsOptions::default())
    }

    #[test]
    fn test_get_method() {
        let code = service(
            "record User { int id; }\n\
             record NotFound { string reason; }\n\
             # fetch one user\n\
             service GetUser {\n\
               method GET;\n\
               url users/{id};\n\
               param int id;\n\
               query string some_q;\n\
               response 404 NotFound;\n\
               response 200 User;\n\
             }",
        )
        .unwrap();
        let expected = r#"
    // fetch one user
    getUser(id: number, someQ: string): Observable<Protocol.User>
    {
        return this.get("users/" + id.toString(), {"some_q": someQ})
            .pipe(
                catchError(response =>
                {
                    switch (response.status)
                    {
                        case 404: return throwError(() => Protocol.NotFound.fromJson(response.json()));
                        default: return throwError(() => response);
                    }
                }),
                map((response: HttpResponse) => Protocol.User.fromJson(response.json()))
            );
    }
}
"#;
        assert!(code.ends_with(expected), "unexpected service code:\n{}", code);
        assert!(code.starts_with("import {Observable, throwError} from \"rxjs\";"));
        assert!(code.contains("import * as Protocol from \"./protocol.data\";"));
        assert!(code.contains("export abstract class ProtocolService\n{"));
    }

    #[test]
    fn test_body_and_encoded_parameters() {
        let code = service(
            "enum Mode { fast; }\n\
             service PostLog {\n\
               method POST;\n\
               url /api/log/{at}/x;\n\
               param date at;\n\
               query date since;\n\
               body { Mode mode; }\n\
               response 200 list<Mode>;\n\
             }",
        )
        .unwrap();
        assert!(code.contains(
            "    postLog(at: Date, since: Date, body: Protocol.PostLogRequest): Observable<Array<Protocol.Mode>>"
        ));
        assert!(code.contains(
            "        return this.post(\"/api/log/\" + Math.ceil(at.getTime() / 1000).toString() + \"/x\", {\"since\": Math.ceil(since.getTime() / 1000)}, body.toJson())"
        ));
        assert!(code.contains(
            "                map((response: HttpResponse) => listFromJson(response.json(), el1 => Protocol.ModeFromString(el1)))"
        ));
    }

    #[test]
    fn test_non_get_without_body_sends_empty_object() {
        let code = service("service Ping { method PUT; url ping; response 200 bool; }").unwrap();
        assert!(code.contains("        return this.put(\"ping\", {}, {})"));
        assert!(code.contains("    ping(): Observable<boolean>"));
    }

    #[test]
    fn test_custom_options() {
        let options = TsOptions {
            data_file:     "api.data.ts".to_string(),
            service_class: "ApiService".to_string(),
            data_alias:    "Api".to_string(),
            ..TsOptions::default()
        };
        let set = compile_schema("record A {}\nservice GetA { method GET; url a; response 200 A; }").unwrap();
        let code = generate_service(&set, &options).unwrap();
        assert!(code.contains("import * as Api from \"./api.data\";"));
        assert!(code.contains("export abstract class ApiService"));
        assert!(code.contains("getA(): Observable<Api.A>"));
    }

    #[test]
    fn test_missing_ok_response() {
        let err = service("service S { method GET; url a; response 500 string; }").unwrap_err();
        assert!(matches!(err, IgorError::MissingOkResponse(ref name) if name == "S"));
        assert_eq!(
            err.to_string(),
            "empty_200_reply: service \"S\" has no response with status 200"
        );
    }

    #[test]
    fn test_undeclared_path_param() {
        let err = service("service S { method GET; url a/{id}; response 200 int; }").unwrap_err();
        assert!(matches!(
            err,
            IgorError::UndeclaredPathParam { ref service, ref param } if service == "S" && param == "id"
        ));
    }
}
