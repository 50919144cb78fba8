use thiserror::Error;

#[derive(Debug, Error)]
pub enum IgorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
        text:   String,
    },

    #[error("Unresolved reference \"{0}\"")]
    UnresolvedReference(String),

    #[error("Unknown type \"{0}\": not an enum or a record")]
    UnknownType(String),

    #[error("Enum alias \"{enum_name}.{item_name}\" does not exist")]
    MissingAlias {
        enum_name: String,
        item_name: String,
    },

    #[error("Enum alias cycle through \"{enum_name}.{item_name}\"")]
    AliasCycle {
        enum_name: String,
        item_name: String,
    },

    #[error("empty_200_reply: service \"{0}\" has no response with status 200")]
    MissingOkResponse(String),

    #[error("Service \"{0}\" declares more than one response with status 200")]
    MultipleOkResponses(String),

    #[error("Service \"{service}\" uses undeclared path parameter \"{param}\"")]
    UndeclaredPathParam {
        service: String,
        param:   String,
    },

    #[error("The declaration \"{0}\" is defined twice")]
    DuplicateDeclaration(String),

    #[error("Services \"{first}\" and \"{second}\" both generate the client method \"{method}\"")]
    DuplicateServiceMethod {
        first:  String,
        second: String,
        method: String,
    },

    #[error("Service \"{service}\" generates the reserved client method \"{method}\"")]
    ReservedServiceMethod {
        service: String,
        method:  String,
    },
}

impl IgorError {
    /// True for errors raised while reading schema text.
    pub fn is_syntax(&self) -> bool {
        matches!(self, IgorError::ParseError { .. })
    }

    /// True for errors raised while verifying or generating from a declaration set.
    pub fn is_generation(&self) -> bool {
        !matches!(
            self,
            IgorError::ParseError { .. } | IgorError::Io(_) | IgorError::Json(_)
        )
    }
}
