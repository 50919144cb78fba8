use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::error::IgorError;

lazy_static! {
    pub static ref TOKEN_REGEX:   Regex = Regex::new(r"(/\*[\s\S]*?\*/|//.*|#.*|\d+|[A-Za-z_][A-Za-z0-9_]*|[{}<>;,.@?/\-]|\s+)").unwrap();
    pub static ref SKIPPED_RX:    Regex = Regex::new(r"^(/\*[\s\S]*\*/|//.*|\s+)$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

/// Line and column (both 1-based, columns counted in chars) of the next unread char.
#[derive(Debug, Clone, Copy)]
struct Position {
    line:   usize,
    column: usize,
}

impl Position {
    fn advance(&mut self, part: &str) {
        match part.rfind('\n') {
            Some(last_newline) => {
                self.line += part.matches('\n').count();
                self.column = part[last_newline + 1..].chars().count() + 1;
            }
            None => self.column += part.chars().count(),
        }
    }

    fn token(self, text: &str) -> Token {
        Token {
            text:   text.to_string(),
            line:   self.line,
            column: self.column,
        }
    }

    fn unexpected(self, text: &str) -> IgorError {
        error(&format!("Syntax error: {}", quote(text)), self.line, self.column, text)
    }
}

/// Split schema text into tokens. Whitespace and comments are dropped,
/// `#` descriptions are kept. The last token is always an empty EOF token.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, IgorError> {
    let mut tokens = Vec::new();
    let mut position = Position { line: 1, column: 1 };
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        // Gap between matches: nothing in the grammar starts here
        if mat.start() > last_end {
            return Err(position.unexpected(&text[last_end..mat.start()]));
        }

        let part = mat.as_str();
        if !SKIPPED_RX.is_match(part) {
            tokens.push(position.token(part));
        }
        position.advance(part);
        last_end = mat.end();
    }

    if last_end != text.len() {
        return Err(position.unexpected(&text[last_end..]));
    }

    // EOF
    tokens.push(position.token(""));
    Ok(tokens)
}
