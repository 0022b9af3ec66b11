//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::{Dialect, SqlDialect};

/// SQL Token - every element the pivot queries are built from.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    As,
    On,
    Join,
    Left,
    Using,
    GroupBy,
    OrderBy,
    Asc,
    Desc,
    In,
    False,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Lt,
    Gt,
    Plus,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Simple identifier (table, column, alias)
    Ident(String),
    /// Integer literal
    LitInt(i64),
    /// String literal
    LitString(String),
    /// Function name, rendered verbatim.
    FunctionName(String),
}

/// How whitespace tokens are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Newlines and indentation as emitted by the builders.
    #[default]
    Pretty,
    /// Everything on one line: newlines become spaces, indentation is dropped.
    Compact,
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.serialize_with(dialect, Layout::Pretty)
    }

    /// Serialize this token with an explicit whitespace layout.
    pub fn serialize_with(&self, dialect: Dialect, layout: Layout) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::Left => "LEFT".into(),
            Token::Using => "USING".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::In => "IN".into(),
            Token::False => dialect.format_bool(false).into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Plus => "+".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => match layout {
                Layout::Pretty => "\n".into(),
                Layout::Compact => " ".into(),
            },
            Token::Indent(n) => match layout {
                Layout::Pretty => "  ".repeat(*n),
                Layout::Compact => String::new(),
            },

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => dialect.quote_string(s),
            Token::FunctionName(name) => dialect.format_function_name(name),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Append `parts` separated by `, `.
    pub fn append_comma_separated(
        &mut self,
        parts: impl IntoIterator<Item = TokenStream>,
    ) -> &mut Self {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.append(&part);
        }
        self
    }

    /// Append another token stream, shifting every indentation level by `depth`.
    ///
    /// Used to nest a rendered subquery inside an enclosing statement.
    pub fn append_indented(&mut self, other: &TokenStream, depth: usize) -> &mut Self {
        for token in &other.tokens {
            match token {
                Token::Newline => {
                    self.tokens.push(Token::Newline);
                    self.tokens.push(Token::Indent(depth));
                }
                Token::Indent(n) => self.tokens.push(Token::Indent(*n)),
                other => self.tokens.push(other.clone()),
            }
        }
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.serialize_with(dialect, Layout::Pretty)
    }

    /// Serialize all tokens with an explicit whitespace layout.
    pub fn serialize_with(&self, dialect: Dialect, layout: Layout) -> String {
        self.tokens
            .iter()
            .map(|t| t.serialize_with(dialect, layout))
            .collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
