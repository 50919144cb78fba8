use crate::{
    tokenizer::Token,
    syntax::{
        Definition, EnumDef, EnumItemDef, FieldTypeSource, ParamDef, RecordBody, RecordDef,
        RecordItemDef, ResponseDef, ResponseSource, ServiceBodySource, ServiceDef, SyntaxFile,
    },
    types::{Method, Primitive, Type, UrlSegment},
    utils::{error, quote},
    error::IgorError,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:       Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref NUMBER:           Regex = Regex::new(r"^\d+$").unwrap();
    static ref DESCRIPTION:      Regex = Regex::new(r"^#").unwrap();
    static ref SEMICOLON:        Regex = Regex::new(r"^;$").unwrap();
    static ref COMMA:            Regex = Regex::new(r"^,$").unwrap();
    static ref DOT:              Regex = Regex::new(r"^\.$").unwrap();
    static ref AT:               Regex = Regex::new(r"^@$").unwrap();
    static ref QUESTION:         Regex = Regex::new(r"^\?$").unwrap();
    static ref LEFT_BRACE:       Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:      Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_ANGLE:       Regex = Regex::new(r"^<$").unwrap();
    static ref RIGHT_ANGLE:      Regex = Regex::new(r"^>$").unwrap();
    static ref ENUM_KEYWORD:     Regex = Regex::new(r"^enum$").unwrap();
    static ref RECORD_KEYWORD:   Regex = Regex::new(r"^record$").unwrap();
    static ref SERVICE_KEYWORD:  Regex = Regex::new(r"^service$").unwrap();
    static ref LIST_KEYWORD:     Regex = Regex::new(r"^list$").unwrap();
    static ref DICT_KEYWORD:     Regex = Regex::new(r"^dict$").unwrap();
    static ref STRING_KEYWORD:   Regex = Regex::new(r"^string$").unwrap();
    static ref METHOD_KEYWORD:   Regex = Regex::new(r"^method$").unwrap();
    static ref URL_KEYWORD:      Regex = Regex::new(r"^url$").unwrap();
    static ref PARAM_KEYWORD:    Regex = Regex::new(r"^param$").unwrap();
    static ref QUERY_KEYWORD:    Regex = Regex::new(r"^query$").unwrap();
    static ref BODY_KEYWORD:     Regex = Regex::new(r"^body$").unwrap();
    static ref RESPONSE_KEYWORD: Regex = Regex::new(r"^response$").unwrap();
    static ref SIMPLE_TYPE:      Regex = Regex::new(r"^(number|int|string|bool|json|date|Date)$").unwrap();
    static ref HTTP_METHOD:      Regex = Regex::new(r"^(GET|POST|PUT|DELETE)$").unwrap();
    static ref URL_LITERAL:      Regex = Regex::new(r"^([A-Za-z0-9_]+|/|-|\.)$").unwrap();
    static ref RESERVED_NAME:    Regex = Regex::new(r"^(number|int|string|bool|json|date|Date|list|dict|enum|record|service)$").unwrap();
    static ref EOF:              Regex = Regex::new(r"^$").unwrap();
}

struct Parser<'a> {
    tokens: &'a [Token],
    index:  usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.index.min(last)]
    }

    fn peek(&self, test: &Regex) -> bool {
        test.is_match(&self.current().text)
    }

    fn eat(&mut self, test: &Regex) -> bool {
        if self.peek(test) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, test: &Regex, expected: &str) -> Result<&'a Token, IgorError> {
        let tok = self.current();
        if !self.eat(test) {
            return Err(error(
                &format!("Expected {} but found {}", expected, quote(&tok.text)),
                tok.line,
                tok.column,
                &tok.text,
            ));
        }
        Ok(tok)
    }

    fn unexpected_token(&self) -> IgorError {
        let tok = self.current();
        error(
            &format!("Unexpected token {}", quote(&tok.text)),
            tok.line,
            tok.column,
            &tok.text,
        )
    }

    /// A declaration or type name: an identifier that is not a keyword.
    fn expect_name(&mut self) -> Result<&'a Token, IgorError> {
        let tok = self.expect(&IDENTIFIER, "identifier")?;
        if RESERVED_NAME.is_match(&tok.text) {
            return Err(error(
                &format!("The name {} is reserved", quote(&tok.text)),
                tok.line,
                tok.column,
                &tok.text,
            ));
        }
        Ok(tok)
    }

    /// Consecutive `#` lines, joined with newlines.
    fn descriptions(&mut self) -> String {
        let mut lines = Vec::new();
        while self.peek(&DESCRIPTION) {
            lines.push(self.current().text[1..].trim().to_string());
            self.index += 1;
        }
        lines.join("\n")
    }

    fn parse_type(&mut self) -> Result<Type, IgorError> {
        if self.eat(&LIST_KEYWORD) {
            self.expect(&LEFT_ANGLE, "\"<\"")?;
            let item = self.parse_type()?;
            self.expect(&RIGHT_ANGLE, "\">\"")?;
            return Ok(Type::list(item));
        }
        if self.eat(&DICT_KEYWORD) {
            self.expect(&LEFT_ANGLE, "\"<\"")?;
            self.expect(&STRING_KEYWORD, "\"string\"")?;
            self.expect(&COMMA, "\",\"")?;
            let value = self.parse_type()?;
            self.expect(&RIGHT_ANGLE, "\">\"")?;
            return Ok(Type::dict(value));
        }
        if self.peek(&SIMPLE_TYPE) {
            return Ok(Type::Primitive(self.parse_primitive()?));
        }
        let name_tok = self.expect_name()?;
        Ok(Type::reference(name_tok.text.as_str()))
    }

    fn parse_primitive(&mut self) -> Result<Primitive, IgorError> {
        let tok = self.expect(&SIMPLE_TYPE, "simple type")?;
        Primitive::from_keyword(&tok.text)
            .ok_or_else(|| error("Unknown simple type", tok.line, tok.column, &tok.text))
    }

    fn parse_enum_items(&mut self) -> Result<Vec<EnumItemDef>, IgorError> {
        self.expect(&LEFT_BRACE, "\"{\"")?;
        let mut items = Vec::new();
        while !self.eat(&RIGHT_BRACE) {
            let description = self.descriptions();
            let first = self.expect(&IDENTIFIER, "identifier")?;
            let (alias_enum, name) = if self.eat(&DOT) {
                let item = self.expect(&IDENTIFIER, "identifier")?;
                (Some(first.text.clone()), item.text.clone())
            } else {
                (None, first.text.clone())
            };
            self.expect(&SEMICOLON, "\";\"")?;
            items.push(EnumItemDef {
                name,
                description,
                alias_enum,
            });
        }
        Ok(items)
    }

    fn parse_record_body(&mut self) -> Result<RecordBody, IgorError> {
        self.expect(&LEFT_BRACE, "\"{\"")?;
        let mut items = Vec::new();
        while !self.eat(&RIGHT_BRACE) {
            let description = self.descriptions();
            let is_property = self.eat(&AT);
            let optional = self.eat(&QUESTION);

            let source = if self.eat(&ENUM_KEYWORD) {
                FieldTypeSource::InlineEnum(self.parse_enum_items()?)
            } else if self.eat(&RECORD_KEYWORD) {
                FieldTypeSource::InlineRecord(self.parse_record_body()?)
            } else {
                FieldTypeSource::Type(self.parse_type()?)
            };

            let name_tok = self.expect(&IDENTIFIER, "identifier")?;
            self.expect(&SEMICOLON, "\";\"")?;

            items.push(RecordItemDef {
                name: name_tok.text.clone(),
                description,
                optional,
                is_property,
                source,
            });
        }
        Ok(RecordBody { items })
    }

    fn parse_param(&mut self, description: String) -> Result<ParamDef, IgorError> {
        let type_ = self.parse_primitive()?;
        let name_tok = self.expect(&IDENTIFIER, "identifier")?;
        self.expect(&SEMICOLON, "\";\"")?;
        Ok(ParamDef {
            name: name_tok.text.clone(),
            description,
            type_,
        })
    }

    fn parse_url(&mut self) -> Result<Vec<UrlSegment>, IgorError> {
        let mut segments: Vec<UrlSegment> = Vec::new();
        loop {
            if self.eat(&LEFT_BRACE) {
                let name_tok = self.expect(&IDENTIFIER, "identifier")?;
                self.expect(&RIGHT_BRACE, "\"}\"")?;
                segments.push(UrlSegment::Param { param: name_tok.text.clone() });
            } else if self.peek(&URL_LITERAL) {
                let piece = &self.current().text;
                match segments.last_mut() {
                    Some(UrlSegment::Literal { url }) => url.push_str(piece),
                    _ => segments.push(UrlSegment::Literal { url: piece.clone() }),
                }
                self.index += 1;
            } else if !segments.is_empty() && self.eat(&SEMICOLON) {
                return Ok(segments);
            } else if segments.is_empty() {
                let tok = self.current();
                return Err(error(
                    &format!("Expected url segment but found {}", quote(&tok.text)),
                    tok.line,
                    tok.column,
                    &tok.text,
                ));
            } else {
                return Err(self.unexpected_token());
            }
        }
    }

    fn parse_enum(&mut self, description: String) -> Result<EnumDef, IgorError> {
        let name_tok = self.expect_name()?;
        let items = self.parse_enum_items()?;
        Ok(EnumDef {
            name:   name_tok.text.clone(),
            description,
            items,
        })
    }

    fn parse_record(&mut self, description: String) -> Result<RecordDef, IgorError> {
        let name_tok = self.expect_name()?;
        let body = self.parse_record_body()?;
        Ok(RecordDef {
            name:   name_tok.text.clone(),
            description,
            body,
        })
    }

    fn parse_service(&mut self, description: String) -> Result<ServiceDef, IgorError> {
        let name_tok = self.expect_name()?;
        self.expect(&LEFT_BRACE, "\"{\"")?;

        let duplicate = |tok: &Token, what: &str| {
            error(
                &format!("Service {} declares {} twice", quote(&name_tok.text), what),
                tok.line,
                tok.column,
                &tok.text,
            )
        };

        let mut method    = None;
        let mut url       = None;
        let mut params    = Vec::new();
        let mut query     = Vec::new();
        let mut body      = None;
        let mut responses = Vec::new();

        while !self.eat(&RIGHT_BRACE) {
            let member_description = self.descriptions();
            let keyword = self.current();

            if self.eat(&METHOD_KEYWORD) {
                if method.is_some() {
                    return Err(duplicate(keyword, "a method"));
                }
                let tok = self.expect(&HTTP_METHOD, "GET, POST, PUT or DELETE")?;
                self.expect(&SEMICOLON, "\";\"")?;
                method = Method::from_keyword(&tok.text);
            } else if self.eat(&URL_KEYWORD) {
                if url.is_some() {
                    return Err(duplicate(keyword, "a url"));
                }
                url = Some(self.parse_url()?);
            } else if self.eat(&PARAM_KEYWORD) {
                params.push(self.parse_param(member_description)?);
            } else if self.eat(&QUERY_KEYWORD) {
                query.push(self.parse_param(member_description)?);
            } else if self.eat(&BODY_KEYWORD) {
                if body.is_some() {
                    return Err(duplicate(keyword, "a body"));
                }
                body = Some(if self.peek(&LEFT_BRACE) {
                    let inline = self.parse_record_body()?;
                    self.eat(&SEMICOLON);
                    ServiceBodySource::Inline {
                        description: member_description,
                        body:        inline,
                    }
                } else {
                    let type_ = self.parse_type()?;
                    self.expect(&SEMICOLON, "\";\"")?;
                    ServiceBodySource::Type(type_)
                });
            } else if self.eat(&RESPONSE_KEYWORD) {
                let status_tok = self.expect(&NUMBER, "status code")?;
                let status = status_tok.text.parse::<u16>().map_err(|_| {
                    error(
                        &format!("Invalid status code {}", quote(&status_tok.text)),
                        status_tok.line,
                        status_tok.column,
                        &status_tok.text,
                    )
                })?;
                let source = if self.peek(&LEFT_BRACE) {
                    let inline = self.parse_record_body()?;
                    self.eat(&SEMICOLON);
                    ResponseSource::Inline(inline)
                } else {
                    let type_ = self.parse_type()?;
                    self.expect(&SEMICOLON, "\";\"")?;
                    ResponseSource::Type(type_)
                };
                responses.push(ResponseDef {
                    status,
                    description: member_description,
                    source,
                });
            } else {
                return Err(self.unexpected_token());
            }
        }

        let missing = |what: &str| {
            error(
                &format!("Service {} has no {}", quote(&name_tok.text), what),
                name_tok.line,
                name_tok.column,
                &name_tok.text,
            )
        };
        let method = method.ok_or_else(|| missing("method"))?;
        let url = url.ok_or_else(|| missing("url"))?;

        Ok(ServiceDef {
            name:   name_tok.text.clone(),
            description,
            method,
            url,
            params,
            query,
            body,
            responses,
        })
    }
}

/// Parse a token stream into a syntax tree. Stops at the first error.
pub fn parse_schema(tokens: &[Token]) -> Result<SyntaxFile, IgorError> {
    let mut definitions = Vec::new();
    if tokens.is_empty() {
        return Ok(SyntaxFile { definitions });
    }

    let mut parser = Parser { tokens, index: 0 };

    loop {
        let description = parser.descriptions();
        if parser.eat(&EOF) {
            break;
        }

        let definition = if parser.eat(&ENUM_KEYWORD) {
            Definition::Enum(parser.parse_enum(description)?)
        } else if parser.eat(&RECORD_KEYWORD) {
            Definition::Record(parser.parse_record(description)?)
        } else if parser.eat(&SERVICE_KEYWORD) {
            Definition::Service(parser.parse_service(description)?)
        } else {
            return Err(parser.unexpected_token());
        };
        definitions.push(definition);
    }

    Ok(SyntaxFile { definitions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_schema;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Result<SyntaxFile, IgorError> {
        parse_schema(&tokenize_schema(text)?)
    }

    fn parse_error(text: &str) -> (String, usize, usize, String) {
        match parse(text).unwrap_err() {
            IgorError::ParseError { msg, line, column, text } => (msg, line, column, text),
            other => panic!("expected a ParseError but got {:?}", other),
        }
    }

    #[test]
    fn test_parse_enum_with_alias() {
        let file = parse("# colors\nenum Color {\n # red\n Red;\n Shade.Dark;\n}").unwrap();
        let expected = Definition::Enum(EnumDef {
            name:        "Color".into(),
            description: "colors".into(),
            items: vec![
                EnumItemDef { name: "Red".into(),  description: "red".into(), alias_enum: None },
                EnumItemDef { name: "Dark".into(), description: "".into(),    alias_enum: Some("Shade".into()) },
            ],
        });
        assert_eq!(file.definitions, vec![expected]);
    }

    #[test]
    fn test_parse_record_items() {
        let file = parse(
            "record User {\n\
             ?string name;\n\
             @?int age;\n\
             list<dict<string, list<Role>>> roles;\n\
             enum { a; b; } kind;\n\
             record { int x; } point;\n\
             }",
        )
        .unwrap();
        let record = match &file.definitions[0] {
            Definition::Record(record) => record,
            other => panic!("expected a record, got {:?}", other),
        };
        let items = &record.body.items;
        assert_eq!(items.len(), 5);
        assert!(items[0].optional && !items[0].is_property);
        assert!(items[1].optional && items[1].is_property);
        assert_eq!(
            items[2].source,
            FieldTypeSource::Type(Type::list(Type::dict(Type::list(Type::reference("Role")))))
        );
        match &items[3].source {
            FieldTypeSource::InlineEnum(values) => assert_eq!(values.len(), 2),
            other => panic!("expected an inline enum, got {:?}", other),
        }
        match &items[4].source {
            FieldTypeSource::InlineRecord(body) => assert_eq!(body.items[0].name, "x"),
            other => panic!("expected an inline record, got {:?}", other),
        }
        assert_eq!(items[4].name, "point");
    }

    #[test]
    fn test_parse_service() {
        let file = parse(
            "# fetch a user\n\
             service GetUser {\n\
               method GET;\n\
               url /api/users/{id}/profile-v2;\n\
               param int id;\n\
               # filter\n\
               query string fields;\n\
               response 200 User;\n\
               response 404 { string error; }\n\
             }",
        )
        .unwrap();
        let service = match &file.definitions[0] {
            Definition::Service(service) => service,
            other => panic!("expected a service, got {:?}", other),
        };
        assert_eq!(service.description, "fetch a user");
        assert_eq!(service.method, Method::Get);
        assert_eq!(
            service.url,
            vec![
                UrlSegment::Literal { url: "/api/users/".into() },
                UrlSegment::Param { param: "id".into() },
                UrlSegment::Literal { url: "/profile-v2".into() },
            ]
        );
        assert_eq!(service.params[0].type_, Primitive::Int);
        assert_eq!(service.query[0].description, "filter");
        assert_eq!(service.body, None);
        assert_eq!(service.responses.len(), 2);
        assert_eq!(service.responses[0].source, ResponseSource::Type(Type::reference("User")));
        assert!(matches!(service.responses[1].source, ResponseSource::Inline(_)));
    }

    #[test]
    fn test_parse_service_inline_body() {
        let file = parse(
            "service Create { method POST; url users; body { string name; }; response 200 int; }",
        )
        .unwrap();
        match &file.definitions[0] {
            Definition::Service(service) => {
                assert!(matches!(service.body, Some(ServiceBodySource::Inline { .. })));
            }
            other => panic!("expected a service, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multiline_description() {
        let file = parse("# first\n#  second  \nrecord A {}").unwrap();
        match &file.definitions[0] {
            Definition::Record(record) => assert_eq!(record.description, "first\nsecond"),
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_location() {
        let (msg, line, column, text) = parse_error("record A {\n  int ;\n}");
        assert_eq!(msg, "Expected identifier but found \";\"");
        assert_eq!((line, column), (2, 7));
        assert_eq!(text, ";");
    }

    #[test]
    fn test_parse_rejects_param_with_complex_type() {
        let (msg, ..) = parse_error("service S { method GET; url a; param User id; }");
        assert_eq!(msg, "Expected simple type but found \"User\"");
    }

    #[test]
    fn test_parse_rejects_incomplete_service() {
        let (msg, line, column, _) = parse_error("service S { url a; }");
        assert_eq!(msg, "Service \"S\" has no method");
        assert_eq!((line, column), (1, 9));

        let (msg, ..) = parse_error("service S { method GET; method PUT; url a; }");
        assert_eq!(msg, "Service \"S\" declares a method twice");
    }

    #[test]
    fn test_parse_rejects_reserved_names() {
        let (msg, ..) = parse_error("record list {}");
        assert_eq!(msg, "The name \"list\" is reserved");
    }

    #[test]
    fn test_parse_rejects_unknown_definition() {
        let (msg, ..) = parse_error("struct A {}");
        assert_eq!(msg, "Unexpected token \"struct\"");
    }

    #[test]
    fn test_parse_empty_file() {
        assert_eq!(parse("// nothing here\n").unwrap().definitions, vec![]);
    }
}
