use logos::Logos;
use tracing::trace;

use super::error::{ParseError, ParseResult};
use super::literal::{decode_char, decode_floating, decode_integer, decode_string, strip_quotes};
use super::span::Location;
use crate::config::Config;
use crate::model::{Constant, DocComment};

/// Java source tokens
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("native")]
    Native,
    #[token("synchronized")]
    Synchronized,
    #[token("transient")]
    Transient,
    #[token("volatile")]
    Volatile,
    #[token("strictfp")]
    Strictfp,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("instanceof")]
    InstanceOf,
    #[token("void")]
    Void,
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Operators
    #[token("=")]
    Assign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("%=")]
    ModAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<=")]
    LShiftAssign,
    #[token(">>=")]
    RShiftAssign,
    #[token(">>>=")]
    URShiftAssign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token(">>>")]
    URShift,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    PipePipe,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,

    // Separators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,

    // Literals; values are decoded by the `Lexer` wrapper
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    StringLiteral,
    // Permissive on purpose: `decode_char` reports literals with more than one char
    #[regex(r"'([^'\\\r\n]|\\[^\r\n])+'")]
    CharLiteral,
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?|0[bB][01_]+[lL]?|[0-9][0-9_]*[lL]?")]
    IntegerLiteral,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9][0-9_]*)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    #[regex(r"0[xX][0-9a-fA-F_]*\.?[0-9a-fA-F_]*[pP][+-]?[0-9]+[fFdD]?")]
    FloatingLiteral,

    // Identifiers: letters, currency symbols and connectors start one
    #[regex(r"[\p{L}\p{Nl}\p{Sc}\p{Pc}][\p{L}\p{Nl}\p{Sc}\p{Pc}\p{Nd}\p{Mn}\p{Mc}]*")]
    Identifier,

    // Comments and whitespace
    #[regex(r"//[^\r\n]*")]
    LineComment,
    // Block/Javadoc comment (handles /**...*/, /*...*/, and multiple '*')
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r\f]+", priority = 2)]
    Whitespace,

    // Unicode BOM (Byte Order Mark) - treat as ignorable whitespace
    #[token("\u{FEFF}")]
    Bom,
}

impl Token {
    /// Check if this token is a primitive type or `void`
    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Token::Boolean
                | Token::Byte
                | Token::Short
                | Token::Int
                | Token::Long
                | Token::Char
                | Token::Float
                | Token::Double
                | Token::Void
        )
    }

    fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Bom | Token::LineComment | Token::BlockComment)
    }
}

/// Lexical token with location information
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
    /// Decoded value of int, float, char and string literals
    pub value: Option<Constant>,
    /// Javadoc comment written immediately before this token
    pub doc: Option<DocComment>,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, location: Location) -> Self {
        Self {
            token,
            lexeme,
            location,
            value: None,
            doc: None,
        }
    }

    /// Byte offset just past the token
    pub fn end_offset(&self) -> usize {
        self.location.offset + self.lexeme.len()
    }
}

/// Streaming lexer over one source unit.
///
/// Iterating yields significant tokens only; whitespace and comments are
/// dropped, javadoc comments ride along on the token that follows them.
/// The first lexical error ends the stream.
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    current_line: usize,
    current_column: usize,
    current_offset: usize,
    pending_doc: Option<DocComment>,
    failed: bool,
    trace_tokens: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            current_line: 1,
            current_column: 1,
            current_offset: 0,
            pending_doc: None,
            failed: false,
            trace_tokens: false,
        }
    }

    pub fn with_config(source: &'a str, config: &Config) -> Self {
        let mut lexer = Self::new(source);
        lexer.trace_tokens = config.debug_lexer;
        lexer
    }

    /// Get the next raw token, trivia included
    pub fn next_token(&mut self) -> Option<ParseResult<LexicalToken>> {
        let token = self.lexer.next()?;
        let lexeme = self.lexer.slice().to_string();
        let location = Location::new(self.current_line, self.current_column, self.current_offset);
        self.update_position(&lexeme);

        let token = match token {
            // `/*` only lexes as a slash when the comment never closes
            Ok(Token::Slash) if self.lexer.remainder().starts_with('*') => {
                return Some(Err(ParseError::lexical("unterminated block comment", location)));
            }
            Ok(token) => token,
            Err(_) => return Some(Err(Self::classify_error(&lexeme, location))),
        };

        let value = match token {
            Token::IntegerLiteral => Some(decode_integer(&lexeme, location)),
            Token::FloatingLiteral => Some(decode_floating(&lexeme, location)),
            Token::CharLiteral => Some(decode_char(&lexeme, location).map(Constant::Char)),
            Token::StringLiteral => Some(decode_string(strip_quotes(&lexeme, '"'), location).map(Constant::String)),
            _ => None,
        };

        let mut lexical = LexicalToken::new(token, lexeme, location);
        match value.transpose() {
            Ok(value) => lexical.value = value,
            Err(e) => return Some(Err(e)),
        }
        Some(Ok(lexical))
    }

    fn classify_error(lexeme: &str, location: Location) -> ParseError {
        if lexeme.starts_with("/*") {
            return ParseError::lexical("unterminated block comment", location);
        }
        match lexeme.chars().next() {
            Some('"') => ParseError::lexical("unterminated string literal", location),
            Some('\'') => ParseError::lexical("malformed char literal", location),
            Some(c) => ParseError::lexical(format!("unexpected character '{}'", c.escape_default()), location),
            None => ParseError::lexical("unexpected input", location),
        }
    }

    /// Update the current position based on the lexeme
    fn update_position(&mut self, lexeme: &str) {
        let mut chars = lexeme.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\n' => {
                    self.current_line += 1;
                    self.current_column = 1;
                }
                // `\r\n` counts once, at its `\n`
                '\r' if chars.peek() == Some(&'\n') => {}
                '\r' => {
                    self.current_line += 1;
                    self.current_column = 1;
                }
                _ => {
                    self.current_column += 1;
                }
            }
            self.current_offset += ch.len_utf8();
        }
    }

    /// Get all significant tokens from the source
    pub fn tokenize(self) -> ParseResult<Vec<LexicalToken>> {
        self.collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<LexicalToken>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            let mut token = match self.next_token()? {
                Ok(token) => token,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            if token.token.is_trivia() {
                if token.token == Token::BlockComment && token.lexeme.starts_with("/**") && token.lexeme.len() > 4 {
                    self.pending_doc = Some(DocComment::parse(&token.lexeme, token.location.line));
                }
                continue;
            }

            token.doc = self.pending_doc.take();
            if self.trace_tokens {
                trace!(token = ?token.token, lexeme = %token.lexeme, line = token.location.line, "token");
            }
            return Some(Ok(token));
        }
    }
}
