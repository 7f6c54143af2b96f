//! Recursive-descent parser for snippets.
//!
//! ```text
//! snippet := [ IDENT "=" ] expr
//! expr    := postfix { "+" postfix }
//! postfix := primary { "." IDENT [ "(" args ")" ] | "[" expr "]" }
//! primary := REF | STRING | NUMBER | true | false | null
//!          | "[" [ args ] "]" | "{" [ STRING ":" expr { "," STRING ":" expr } ] "}"
//!          | "(" expr ")" | BUILTIN "(" args ")"
//! ```

use graphwright_types::Value;

use super::{BUILTIN_FUNCTIONS, RESULT_IDENTIFIER, lexer::Token};

/// Deepest expression tree a snippet may produce. Every bracket, `+` operand
/// and postfix member adds a level.
pub(crate) const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Value),
    Reference(String),
    List(Vec<Expr>),
    Map(Vec<(String, Expr)>),
    Field { target: Box<Expr>, name: String },
    MethodCall { target: Box<Expr>, method: String, args: Vec<Expr> },
    Index { target: Box<Expr>, index: Box<Expr> },
    Builtin { function: String, args: Vec<Expr> },
    Add(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Collects every `${name}` the expression reads, in source order.
    pub(crate) fn references<'a>(&'a self, found: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Reference(name) => found.push(name),
            Expr::List(items) | Expr::Builtin { args: items, .. } => items.iter().for_each(|item| item.references(found)),
            Expr::Map(entries) => entries.iter().for_each(|(_, item)| item.references(found)),
            Expr::Field { target, .. } => target.references(found),
            Expr::MethodCall { target, args, .. } => {
                target.references(found);
                args.iter().for_each(|arg| arg.references(found));
            }
            Expr::Index { target, index } => {
                target.references(found);
                index.references(found);
            }
            Expr::Add(left, right) => {
                left.references(found);
                right.references(found);
            }
        }
    }
}

/// A parsed snippet: one binding of `target` to `expr`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snippet {
    pub target: String,
    pub expr: Expr,
}

pub(crate) fn parse(tokens: Vec<Token>) -> Result<Snippet, String> {
    let mut parser = Parser {
        tokens,
        position: 0,
        depth: 0,
    };
    let target = match (parser.tokens.first(), parser.tokens.get(1)) {
        (Some(Token::Identifier(name)), Some(Token::Assign)) => {
            let name = name.clone();
            parser.position = 2;
            name
        }
        _ => RESULT_IDENTIFIER.to_string(),
    };

    if parser.peek().is_none() {
        return Err("snippet is empty".to_string());
    }
    let expr = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(format!("unexpected {token} after the end of the expression"));
    }
    Ok(Snippet { target, expr })
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.next() {
            Some(token) if &token == expected => Ok(()),
            Some(token) => Err(format!("expected {expected}, found {token}")),
            None => Err(format!("expected {expected}, found end of snippet")),
        }
    }

    fn descend(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(format!("expression nests deeper than {MAX_NESTING} levels"));
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Expr, String> {
        let entry = self.depth;
        self.descend()?;
        let mut left = self.postfix()?;
        while self.eat(&Token::Plus) {
            self.descend()?;
            let right = self.postfix()?;
            left = Expr::Add(Box::new(left), Box::new(right));
        }
        self.depth = entry;
        Ok(left)
    }

    fn postfix(&mut self) -> Result<Expr, String> {
        let entry = self.depth;
        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::Dot) {
                self.descend()?;
                let name = match self.next() {
                    Some(Token::Identifier(name)) => name,
                    Some(token) => return Err(format!("expected a member name after '.', found {token}")),
                    None => return Err("expected a member name after '.'".to_string()),
                };
                expr = if self.eat(&Token::LeftParen) {
                    let args = self.arguments(&Token::RightParen)?;
                    Expr::MethodCall {
                        target: Box::new(expr),
                        method: name,
                        args,
                    }
                } else {
                    Expr::Field {
                        target: Box::new(expr),
                        name,
                    }
                };
            } else if self.eat(&Token::LeftBracket) {
                self.descend()?;
                let index = self.expression()?;
                self.expect(&Token::RightBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                self.depth = entry;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, String> {
        let Some(token) = self.next() else {
            return Err("unexpected end of snippet".to_string());
        };
        match token {
            Token::Reference(name) => Ok(Expr::Reference(name)),
            Token::String(text) => Ok(Expr::Literal(Value::String(text))),
            Token::Integer(integer) => Ok(Expr::Literal(Value::Integer(integer))),
            Token::Float(float) => Ok(Expr::Literal(Value::Float(float))),
            Token::Identifier(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                function if self.peek() == Some(&Token::LeftParen) => {
                    if !BUILTIN_FUNCTIONS.contains(&function) {
                        return Err(format!("unknown function '{function}'; available: {}", BUILTIN_FUNCTIONS.join(", ")));
                    }
                    self.position += 1;
                    let args = self.arguments(&Token::RightParen)?;
                    Ok(Expr::Builtin {
                        function: function.to_string(),
                        args,
                    })
                }
                _ => Err(format!("bare identifier '{name}' is not supported; refer to pooled objects with ${{name}}")),
            },
            Token::LeftBracket => Ok(Expr::List(self.arguments(&Token::RightBracket)?)),
            Token::LeftBrace => self.map(),
            Token::LeftParen => {
                let inner = self.expression()?;
                self.expect(&Token::RightParen)?;
                Ok(inner)
            }
            other => Err(format!("unexpected {other}")),
        }
    }

    /// Comma-separated expressions up to and including `closing`.
    fn arguments(&mut self, closing: &Token) -> Result<Vec<Expr>, String> {
        let mut items = Vec::new();
        if self.eat(closing) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if self.eat(closing) {
                return Ok(items);
            }
            self.expect(&Token::Comma)?;
        }
    }

    fn map(&mut self) -> Result<Expr, String> {
        let mut entries = Vec::new();
        if self.eat(&Token::RightBrace) {
            return Ok(Expr::Map(entries));
        }
        loop {
            let key = match self.next() {
                Some(Token::String(key)) => key,
                Some(token) => return Err(format!("map keys must be strings, found {token}")),
                None => return Err("unterminated map literal".to_string()),
            };
            self.expect(&Token::Colon)?;
            entries.push((key, self.expression()?));
            if self.eat(&Token::RightBrace) {
                return Ok(Expr::Map(entries));
            }
            self.expect(&Token::Comma)?;
        }
    }
}
