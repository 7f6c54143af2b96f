//! Tokenizer for snippet text.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// `${name}`; the name is kept verbatim.
    Reference(String),
    Identifier(String),
    String(String),
    Integer(i64),
    Float(f64),
    Dot,
    Comma,
    Colon,
    Plus,
    Assign,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
}

impl fmt::Display for Token {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Reference(name) => write!(formatter, "reference '${{{name}}}'"),
            Token::Identifier(name) => write!(formatter, "identifier '{name}'"),
            Token::String(text) => write!(formatter, "string {text:?}"),
            Token::Integer(integer) => write!(formatter, "number {integer}"),
            Token::Float(float) => write!(formatter, "number {float}"),
            Token::Dot => formatter.write_str("'.'"),
            Token::Comma => formatter.write_str("','"),
            Token::Colon => formatter.write_str("':'"),
            Token::Plus => formatter.write_str("'+'"),
            Token::Assign => formatter.write_str("'='"),
            Token::LeftParen => formatter.write_str("'('"),
            Token::RightParen => formatter.write_str("')'"),
            Token::LeftBracket => formatter.write_str("'['"),
            Token::RightBracket => formatter.write_str("']'"),
            Token::LeftBrace => formatter.write_str("'{'"),
            Token::RightBrace => formatter.write_str("'}'"),
        }
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let mut lexer = Lexer { source, position: 0 };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a str,
    position: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut remaining = self.source[self.position..].chars();
        remaining.next();
        remaining.next()
    }

    fn bump(&mut self) -> Option<char> {
        let character = self.peek()?;
        self.position += character.len_utf8();
        Some(character)
    }

    fn next_token(&mut self) -> Result<Option<Token>, String> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        let start = self.position;
        let Some(character) = self.bump() else {
            return Ok(None);
        };

        let token = match character {
            '$' => self.reference(start)?,
            '"' | '\'' => Token::String(self.string(character)?),
            '0'..='9' => self.number(start)?,
            '-' if self.peek().is_some_and(|next| next.is_ascii_digit()) => self.number(start)?,
            '.' => Token::Dot,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '+' => Token::Plus,
            '=' => Token::Assign,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            letter if letter.is_alphabetic() || letter == '_' => {
                while self.peek().is_some_and(|next| next.is_alphanumeric() || next == '_') {
                    self.bump();
                }
                Token::Identifier(self.source[start..self.position].to_string())
            }
            other => return Err(format!("unexpected character '{other}' at offset {start}")),
        };
        Ok(Some(token))
    }

    fn reference(&mut self, start: usize) -> Result<Token, String> {
        if self.bump() != Some('{') {
            return Err(format!("expected '{{' after '$' at offset {start}"));
        }
        let name_start = self.position;
        loop {
            match self.bump() {
                Some('}') => break,
                Some(_) => {}
                None => return Err(format!("unterminated reference starting at offset {start}")),
            }
        }
        Ok(Token::Reference(self.source[name_start..self.position - 1].to_string()))
    }

    fn string(&mut self, quote: char) -> Result<String, String> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(character) if character == quote => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(escaped @ ('\\' | '"' | '\'')) => text.push(escaped),
                    Some(other) => return Err(format!("unsupported escape '\\{other}'")),
                    None => return Err("unterminated string literal".to_string()),
                },
                Some(character) => text.push(character),
                None => return Err("unterminated string literal".to_string()),
            }
        }
    }

    fn number(&mut self, start: usize) -> Result<Token, String> {
        while self.peek().is_some_and(|next| next.is_ascii_digit()) {
            self.bump();
        }
        let is_float = self.peek() == Some('.') && self.peek_second().is_some_and(|next| next.is_ascii_digit());
        if is_float {
            self.bump();
            while self.peek().is_some_and(|next| next.is_ascii_digit()) {
                self.bump();
            }
        }

        let text = &self.source[start..self.position];
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|error| format!("invalid number '{text}': {error}"))
        } else {
            text.parse::<i64>()
                .map(Token::Integer)
                .map_err(|error| format!("invalid number '{text}': {error}"))
        }
    }
}
