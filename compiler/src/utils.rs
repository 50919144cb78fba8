use crate::error::IgorError;
use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Quote `text` as a double-quoted literal, valid in both JSON and TypeScript.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn error(msg: &str, line: usize, column: usize, text: &str) -> IgorError {
    IgorError::ParseError {
        msg:    msg.to_string(),
        line,
        column,
        text:   text.to_string(),
    }
}

/// `user_id` -> `UserId`
pub fn type_name(s: &str) -> String {
    s.to_upper_camel_case()
}

/// `user_id` -> `userId`
pub fn var_name(s: &str) -> String {
    s.to_lower_camel_case()
}

/// Indent every non-empty line of `text` by `count` levels of four spaces.
pub fn offset(count: usize, text: &str) -> String {
    let pad = "    ".repeat(count);
    text.split('\n')
        .map(|line| if line.is_empty() { String::new() } else { format!("{}{}", pad, line) })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("Red"), "\"Red\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(type_name("data_enum"), "DataEnum");
        assert_eq!(type_name("200"), "200");
        assert_eq!(var_name("some_q"), "someQ");
        assert_eq!(var_name("GetUser"), "getUser");
    }

    #[test]
    fn test_offset_skips_blank_lines() {
        assert_eq!(offset(1, "a\n\nb"), "    a\n\n    b");
    }
}
