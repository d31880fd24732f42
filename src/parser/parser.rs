//! Recursive-descent parser over the lexer's token stream.
//!
//! Declarations are handed to a `ModelBuilder` as soon as they are
//! recognized; method bodies and field initializers are skipped and kept as
//! source text. Tokens are pulled from the lexer on demand into a small
//! lookahead buffer.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use super::error::{ErrorRecovery, ParseError};
use super::lexer::{Lexer, LexicalToken, Token};
use super::span::Location;
use crate::config::{Config, RecoveryPolicy};
use crate::error::{Error, Result};
use crate::model::{
    BoundKind, BuildError, ClassKind, DocComment, Import, JavaAnnotation, JavaClass, JavaField, JavaMethod,
    JavaParameter, ModelBuilder, Modifier, SourceUnit, TypeArg, TypeParam, TypeRef,
};

/// Where parsing resumes after a recoverable error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipScope {
    TopLevel,
    /// Inside a class body opened at this bracket level
    Member { level: usize },
}

/// Parser for one Java source unit
pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    lookahead: VecDeque<LexicalToken>,
    pub(super) last_location: Location,
    last_end: usize,
    /// Open `(`, `[` and `{` among the consumed tokens
    brackets: usize,
    builder: ModelBuilder,
    recovery: ErrorRecovery,
    pub(super) config: Config,
    pub(super) depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, config: &Config) -> Self {
        Self {
            source,
            lexer: Lexer::with_config(source, config),
            lookahead: VecDeque::new(),
            last_location: Location::start(),
            last_end: 0,
            brackets: 0,
            builder: ModelBuilder::new(),
            recovery: ErrorRecovery::new(config.recovery == RecoveryPolicy::SkipDeclaration, config.max_errors),
            config: config.clone(),
            depth: 0,
        }
    }

    /// Parse the whole unit and return its frozen model
    pub fn parse(mut self) -> Result<SourceUnit> {
        debug!(bytes = self.source.len(), "parsing source unit");

        while self.peek_token_type(0)?.is_some() {
            if let Err(e) = self.parse_top_level() {
                self.recover(e, 0, SkipScope::TopLevel)?;
            }
        }

        for error in std::mem::take(&mut self.recovery.errors) {
            self.builder.record_diagnostic(error)?;
        }
        Ok(self.builder.finish()?)
    }

    // Helper methods

    fn fill(&mut self, n: usize) -> Result<()> {
        while self.lookahead.len() <= n {
            match self.lexer.next() {
                Some(Ok(token)) => self.lookahead.push_back(token),
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }
        Ok(())
    }

    pub(super) fn peek_token_type(&mut self, idx: usize) -> Result<Option<Token>> {
        self.fill(idx)?;
        Ok(self.lookahead.get(idx).map(|t| t.token))
    }

    pub(super) fn peek(&mut self) -> Result<Option<&LexicalToken>> {
        self.fill(0)?;
        Ok(self.lookahead.front())
    }

    pub(super) fn check(&mut self, token_type: &Token) -> Result<bool> {
        Ok(self.peek_token_type(0)? == Some(*token_type))
    }

    pub(super) fn check_at(&mut self, idx: usize, token_type: &Token) -> Result<bool> {
        Ok(self.peek_token_type(idx)? == Some(*token_type))
    }

    pub(super) fn advance(&mut self) -> Result<LexicalToken> {
        self.fill(0)?;
        match self.lookahead.pop_front() {
            Some(token) => {
                self.last_location = token.location;
                self.last_end = token.end_offset();
                match token.token {
                    Token::LParen | Token::LBracket | Token::LBrace => self.brackets += 1,
                    Token::RParen | Token::RBracket | Token::RBrace => {
                        self.brackets = self.brackets.saturating_sub(1)
                    }
                    _ => {}
                }
                Ok(token)
            }
            None => Err(ParseError::unexpected_end_of_input("token", self.last_location).into()),
        }
    }

    pub(super) fn consume(&mut self, token_type: &Token, expected: &str) -> Result<LexicalToken> {
        if self.check(token_type)? {
            self.advance()
        } else {
            Err(self.error_here(expected))
        }
    }

    pub(super) fn match_token(&mut self, token_type: &Token) -> Result<bool> {
        if self.check(token_type)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Syntax error at the next token, or end-of-input past the last one
    pub(super) fn error_here(&mut self, expected: &str) -> Error {
        if let Err(e) = self.fill(0) {
            return e;
        }
        match self.lookahead.front() {
            Some(token) => ParseError::syntax(expected, format!("'{}'", token.lexeme), token.location).into(),
            None => ParseError::unexpected_end_of_input(expected, self.last_location).into(),
        }
    }

    fn peek_doc(&mut self) -> Result<Option<DocComment>> {
        Ok(self.peek()?.and_then(|t| t.doc.clone()))
    }

    pub(super) fn parse_identifier(&mut self) -> Result<LexicalToken> {
        self.consume(&Token::Identifier, "identifier")
    }

    pub(super) fn parse_qualified_name(&mut self) -> Result<String> {
        let mut name = self.parse_identifier()?.lexeme;
        while self.check(&Token::Dot)? && self.check_at(1, &Token::Identifier)? {
            self.advance()?;
            name.push('.');
            name.push_str(&self.parse_identifier()?.lexeme);
        }
        Ok(name)
    }

    // Error recovery

    fn recover(&mut self, error: Error, depth: usize, scope: SkipScope) -> Result<()> {
        let parse_error = match error {
            Error::Parse(e) if self.recovery.can_recover(&e) => e,
            other => return Err(other),
        };

        warn!(line = parse_error.line(), error = %parse_error, "skipping declaration");
        self.builder.discard_above(depth);
        self.recovery.add_error(parse_error);

        match scope {
            SkipScope::TopLevel => self.synchronize(0, false),
            SkipScope::Member { level } => self.synchronize(level, true),
        }
    }

    /// Skip to the end of the declaration that failed.
    ///
    /// The failure may be raised anywhere inside brackets the declaration
    /// opened; skipping ends at a `;` back at `level`, or at the `}` that
    /// brings the bracket count back to `level`. Inside a class body the
    /// body's own closing brace is left for the caller.
    fn synchronize(&mut self, level: usize, in_class_body: bool) -> Result<()> {
        while let Some(token) = self.peek_token_type(0)? {
            let open = self.brackets;
            match token {
                Token::RBrace if in_class_body && open <= level => return Ok(()),
                Token::Semicolon if open <= level => {
                    self.advance()?;
                    return Ok(());
                }
                _ => {}
            }
            self.advance()?;
            if token == Token::RBrace && self.brackets <= level {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Consume a `{ ... }` block and return the text between the braces
    pub(super) fn skip_block(&mut self) -> Result<String> {
        let open = self.consume(&Token::LBrace, "'{'")?;
        let start = open.end_offset();
        let mut depth = 1usize;
        loop {
            let token = match self.peek_token_type(0)? {
                Some(token) => token,
                None => return Err(ParseError::unexpected_end_of_input("'}'", self.last_location).into()),
            };
            let consumed = self.advance()?;
            match token {
                Token::LBrace => depth += 1,
                Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        let end = consumed.location.offset;
                        return Ok(self.source.get(start..end).unwrap_or_default().to_string());
                    }
                }
                _ => {}
            }
        }
    }

    /// Consume a balanced `( ... )` group
    fn skip_parens(&mut self) -> Result<()> {
        self.consume(&Token::LParen, "'('")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_token_type(0)? {
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::unexpected_end_of_input("')'", self.last_location).into()),
            }
            self.advance()?;
        }
        Ok(())
    }

    // Top level

    fn parse_top_level(&mut self) -> Result<()> {
        if self.match_token(&Token::Semicolon)? {
            return Ok(());
        }

        let doc = self.peek_doc()?;
        let annotations = self.parse_annotations()?;
        match self.peek_token_type(0)? {
            Some(Token::Package) => self.parse_package_decl(annotations, doc),
            Some(Token::Import) if annotations.is_empty() => self.parse_import_decl(),
            _ => self.parse_type_decl(annotations, doc),
        }
    }

    fn parse_package_decl(&mut self, annotations: Vec<JavaAnnotation>, doc: Option<DocComment>) -> Result<()> {
        let keyword = self.consume(&Token::Package, "'package'")?;
        let name = self.parse_qualified_name()?;

        // Rejected before the `;` so that skipping stops right after it
        match self.builder.set_package(name.as_str(), annotations, keyword.location.line, doc) {
            Ok(()) => {}
            Err(BuildError::DuplicatePackage(_)) | Err(BuildError::PackageAfterType) => {
                return Err(ParseError::syntax("type declaration", "'package'", keyword.location).into());
            }
            Err(e) => return Err(e.into()),
        }
        self.consume(&Token::Semicolon, "';'")?;
        Ok(())
    }

    fn parse_import_decl(&mut self) -> Result<()> {
        let keyword = self.consume(&Token::Import, "'import'")?;
        let is_static = self.match_token(&Token::Static)?;
        let mut name = self.parse_identifier()?.lexeme;
        let mut is_wildcard = false;
        while self.match_token(&Token::Dot)? {
            if self.match_token(&Token::Star)? {
                is_wildcard = true;
                break;
            }
            name.push('.');
            name.push_str(&self.parse_identifier()?.lexeme);
        }
        self.consume(&Token::Semicolon, "';'")?;

        self.builder.add_import(Import {
            name,
            is_static,
            is_wildcard,
            line_number: keyword.location.line,
        })?;
        Ok(())
    }

    fn parse_type_decl(&mut self, mut annotations: Vec<JavaAnnotation>, doc: Option<DocComment>) -> Result<()> {
        let modifiers = self.parse_modifiers(&mut annotations)?;
        self.parse_class_decl(modifiers, annotations, doc)
    }

    fn parse_modifiers(&mut self, annotations: &mut Vec<JavaAnnotation>) -> Result<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            match self.peek_token_type(0)? {
                Some(Token::At) if !self.check_at(1, &Token::Interface)? => {
                    annotations.push(self.parse_annotation()?);
                }
                Some(token) => match Self::modifier_for(token) {
                    Some(modifier) => {
                        self.advance()?;
                        modifiers.push(modifier);
                    }
                    None => break,
                },
                None => break,
            }
        }
        Ok(modifiers)
    }

    fn modifier_for(token: Token) -> Option<Modifier> {
        match token {
            Token::Public => Some(Modifier::Public),
            Token::Protected => Some(Modifier::Protected),
            Token::Private => Some(Modifier::Private),
            Token::Abstract => Some(Modifier::Abstract),
            Token::Static => Some(Modifier::Static),
            Token::Final => Some(Modifier::Final),
            Token::Native => Some(Modifier::Native),
            Token::Synchronized => Some(Modifier::Synchronized),
            Token::Transient => Some(Modifier::Transient),
            Token::Volatile => Some(Modifier::Volatile),
            Token::Strictfp => Some(Modifier::Strictfp),
            Token::Default => Some(Modifier::Default),
            _ => None,
        }
    }

    fn is_type_decl_start(&mut self) -> Result<bool> {
        Ok(match self.peek_token_type(0)? {
            Some(Token::Class) | Some(Token::Interface) | Some(Token::Enum) => true,
            Some(Token::At) => self.check_at(1, &Token::Interface)?,
            _ => false,
        })
    }

    /// Class, interface, enum or annotation type, modifiers already parsed
    fn parse_class_decl(
        &mut self,
        modifiers: Vec<Modifier>,
        annotations: Vec<JavaAnnotation>,
        doc: Option<DocComment>,
    ) -> Result<()> {
        let (kind, keyword) = match self.peek_token_type(0)? {
            Some(Token::Class) => (ClassKind::Class, self.advance()?),
            Some(Token::Interface) => (ClassKind::Interface, self.advance()?),
            Some(Token::Enum) => (ClassKind::Enum, self.advance()?),
            Some(Token::At) if self.check_at(1, &Token::Interface)? => {
                let at = self.advance()?;
                self.advance()?;
                (ClassKind::Annotation, at)
            }
            _ => return Err(self.error_here("type declaration")),
        };

        let name = self.parse_identifier()?.lexeme;
        let mut class = JavaClass::new(name.as_str(), name.as_str(), kind);
        class.modifiers = modifiers;
        class.annotations = annotations;
        class.doc = doc;
        class.line_number = keyword.location.line;

        if self.check(&Token::Lt)? {
            class.type_params = self.parse_type_parameters()?;
        }
        if self.match_token(&Token::Extends)? {
            match kind {
                ClassKind::Class => class.superclass = Some(self.parse_type_ref()?),
                ClassKind::Interface => class.implements = self.parse_type_list()?,
                _ => return Err(ParseError::syntax("'{'", "'extends'", self.last_location).into()),
            }
        }
        if self.check(&Token::Implements)? {
            if matches!(kind, ClassKind::Class | ClassKind::Enum) {
                self.advance()?;
                class.implements = self.parse_type_list()?;
            } else {
                return Err(self.error_here("'{'"));
            }
        }
        self.consume(&Token::LBrace, "'{'")?;

        if self.config.debug_parser {
            trace!(class = %name, kind = ?kind, line = class.line_number, "type declaration");
        }
        self.builder.begin_class(class)?;
        let depth = self.builder.depth();
        let body = SkipScope::Member { level: self.brackets };

        if kind == ClassKind::Enum {
            if let Err(e) = self.parse_enum_constants(&name) {
                self.recover(e, depth, body)?;
            }
        }
        self.parse_class_body(&name, kind, depth, body)?;

        self.consume(&Token::RBrace, "'}'")?;
        self.builder.end_class()?;
        Ok(())
    }

    fn parse_class_body(&mut self, class_name: &str, kind: ClassKind, depth: usize, body: SkipScope) -> Result<()> {
        while !matches!(self.peek_token_type(0)?, Some(Token::RBrace) | None) {
            if let Err(e) = self.parse_member(class_name, kind) {
                self.recover(e, depth, body)?;
            }
        }
        Ok(())
    }

    fn parse_enum_constants(&mut self, enum_name: &str) -> Result<()> {
        loop {
            match self.peek_token_type(0)? {
                Some(Token::Semicolon) => {
                    self.advance()?;
                    return Ok(());
                }
                Some(Token::RBrace) | None => return Ok(()),
                _ => {}
            }

            let doc = self.peek_doc()?;
            let annotations = self.parse_annotations()?;
            let name = self.parse_identifier()?;
            if self.check(&Token::LParen)? {
                self.skip_parens()?;
            }
            if self.check(&Token::LBrace)? {
                self.skip_block()?;
            }

            self.builder.add_field(JavaField {
                name: name.lexeme,
                type_ref: TypeRef::new(enum_name),
                modifiers: vec![Modifier::Public, Modifier::Static, Modifier::Final],
                annotations,
                initializer: None,
                enum_constant: true,
                line_number: name.location.line,
                doc,
            })?;

            if !self.match_token(&Token::Comma)? && !self.check(&Token::Semicolon)? && !self.check(&Token::RBrace)? {
                return Err(self.error_here("',', ';' or '}'"));
            }
        }
    }

    fn parse_member(&mut self, class_name: &str, class_kind: ClassKind) -> Result<()> {
        if self.match_token(&Token::Semicolon)? {
            return Ok(());
        }
        // Initializer blocks carry nothing for the model
        if self.check(&Token::LBrace)? {
            self.skip_block()?;
            return Ok(());
        }
        if self.check(&Token::Static)? && self.check_at(1, &Token::LBrace)? {
            self.advance()?;
            self.skip_block()?;
            return Ok(());
        }

        let doc = self.peek_doc()?;
        let mut annotations = Vec::new();
        let modifiers = self.parse_modifiers(&mut annotations)?;

        if self.is_type_decl_start()? {
            return self.nested(|parser| parser.parse_class_decl(modifiers, annotations, doc));
        }

        let type_params = if self.check(&Token::Lt)? {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        // Constructor: a bare name directly followed by the parameter list
        if self.check(&Token::Identifier)? && self.check_at(1, &Token::LParen)? {
            let name = self.parse_identifier()?;
            if name.lexeme != class_name {
                return Err(ParseError::syntax("return type", format!("'{}'", name.lexeme), name.location).into());
            }
            let method = self.parse_method_rest(modifiers, annotations, doc, type_params, None, name, class_kind)?;
            self.builder.add_constructor(method)?;
            return Ok(());
        }

        let type_ref = self.parse_type_ref()?;
        let name = self.parse_identifier()?;
        if self.check(&Token::LParen)? {
            let method =
                self.parse_method_rest(modifiers, annotations, doc, type_params, Some(type_ref), name, class_kind)?;
            if self.config.debug_parser {
                trace!(method = %method.name, line = method.line_number, "method declaration");
            }
            self.builder.add_method(method)?;
            return Ok(());
        }
        if !type_params.is_empty() {
            return Err(self.error_here("'('"));
        }

        self.parse_field_declarators(modifiers, annotations, doc, type_ref, name)
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_method_rest(
        &mut self,
        modifiers: Vec<Modifier>,
        annotations: Vec<JavaAnnotation>,
        doc: Option<DocComment>,
        type_params: Vec<TypeParam>,
        mut return_type: Option<TypeRef>,
        name: LexicalToken,
        class_kind: ClassKind,
    ) -> Result<JavaMethod> {
        let parameters = self.parse_parameter_list()?;

        // `int f()[]` is an old spelling of `int[] f()`
        let extra_dims = self.parse_dims()?;
        if let Some(ret) = &mut return_type {
            ret.dimensions += extra_dims;
        }

        let mut exceptions = Vec::new();
        if self.match_token(&Token::Throws)? {
            exceptions = self.parse_type_list()?;
        }

        let mut default_value = None;
        if class_kind == ClassKind::Annotation && self.match_token(&Token::Default)? {
            default_value = Some(self.parse_element_value()?);
        }

        let source_code = if self.check(&Token::LBrace)? {
            Some(self.skip_block()?)
        } else {
            self.consume(&Token::Semicolon, "'{' or ';'")?;
            None
        };

        Ok(JavaMethod {
            name: name.lexeme,
            modifiers,
            type_params,
            return_type,
            parameters,
            exceptions,
            annotations,
            default_value,
            source_code,
            line_number: name.location.line,
            doc,
        })
    }

    fn parse_field_declarators(
        &mut self,
        modifiers: Vec<Modifier>,
        annotations: Vec<JavaAnnotation>,
        doc: Option<DocComment>,
        type_ref: TypeRef,
        first_name: LexicalToken,
    ) -> Result<()> {
        let mut fields = Vec::new();
        let mut name = first_name;
        loop {
            let mut field_type = type_ref.clone();
            field_type.dimensions += self.parse_dims()?;
            let initializer = if self.match_token(&Token::Assign)? {
                Some(self.capture_initializer()?)
            } else {
                None
            };

            fields.push(JavaField {
                name: name.lexeme,
                type_ref: field_type,
                modifiers: modifiers.clone(),
                annotations: annotations.clone(),
                initializer,
                enum_constant: false,
                line_number: name.location.line,
                doc: doc.clone(),
            });

            if !self.match_token(&Token::Comma)? {
                break;
            }
            name = self.parse_identifier()?;
        }
        // Nothing reaches the builder until the whole statement parsed
        self.consume(&Token::Semicolon, "';'")?;

        for field in fields {
            if self.config.debug_parser {
                trace!(field = %field.name, line = field.line_number, "field declaration");
            }
            self.builder.add_field(field)?;
        }
        Ok(())
    }

    /// Raw text of an initializer expression up to its `,` or `;`
    fn capture_initializer(&mut self) -> Result<String> {
        let start = match self.peek()? {
            Some(token) => token.location.offset,
            None => return Err(self.error_here("initializer")),
        };

        let mut depth = 0usize;
        let mut consumed = false;
        loop {
            match self.peek_token_type(0)? {
                None => return Err(self.error_here("';'")),
                Some(Token::LParen | Token::LBrace | Token::LBracket) => depth += 1,
                Some(Token::RParen | Token::RBrace | Token::RBracket) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Some(Token::Semicolon) if depth == 0 => break,
                Some(Token::Comma) if depth == 0 && self.starts_declarator(1)? => break,
                // Type arguments hold commas of their own: `new HashMap<K, V[]>()`
                Some(Token::New) => {
                    self.advance()?;
                    consumed = true;
                    if matches!(self.peek_token_type(0)?, Some(Token::Identifier | Token::At)) {
                        self.parse_type_ref()?;
                    }
                    continue;
                }
                // Explicit type arguments of a call: `Collections.<K, V>emptyMap()`
                Some(Token::Dot) if self.check_at(1, &Token::Lt)? => {
                    self.advance()?;
                    self.parse_type_arguments()?;
                    consumed = true;
                    continue;
                }
                Some(_) => {}
            }
            self.advance()?;
            consumed = true;
        }

        if !consumed {
            return Err(self.error_here("initializer"));
        }
        Ok(self.source.get(start..self.last_end).unwrap_or_default().trim().to_string())
    }

    /// `name`, `name = ...` or `name[][] ...` ending in `=`, `,` or `;`
    fn starts_declarator(&mut self, idx: usize) -> Result<bool> {
        if !self.check_at(idx, &Token::Identifier)? {
            return Ok(false);
        }
        let mut next = idx + 1;
        while self.check_at(next, &Token::LBracket)? && self.check_at(next + 1, &Token::RBracket)? {
            next += 2;
        }
        Ok(matches!(
            self.peek_token_type(next)?,
            Some(Token::Assign | Token::Comma | Token::Semicolon)
        ))
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<JavaParameter>> {
        self.consume(&Token::LParen, "'('")?;
        let mut parameters = Vec::new();
        if self.match_token(&Token::RParen)? {
            return Ok(parameters);
        }

        loop {
            let mut annotations = Vec::new();
            let modifiers = self.parse_modifiers(&mut annotations)?;
            let mut type_ref = self.parse_type_ref()?;
            // Annotations on the ellipsis are type-use annotations of the array
            let extra = self.parse_annotations()?;
            type_ref.annotations.extend(extra);
            let varargs = self.match_token(&Token::Ellipsis)?;

            // Receiver parameter: `Foo this` or `Foo Outer.this`
            let is_receiver = if self.match_token(&Token::This)? {
                true
            } else if self.check(&Token::Identifier)?
                && self.check_at(1, &Token::Dot)?
                && self.check_at(2, &Token::This)?
            {
                for _ in 0..3 {
                    self.advance()?;
                }
                true
            } else {
                false
            };

            if !is_receiver {
                let name = self.parse_identifier()?.lexeme;
                type_ref.dimensions += self.parse_dims()?;
                parameters.push(JavaParameter {
                    name,
                    type_ref,
                    modifiers,
                    annotations,
                    varargs,
                });
            }

            if !self.match_token(&Token::Comma)? {
                break;
            }
        }

        self.consume(&Token::RParen, "')'")?;
        Ok(parameters)
    }

    // Types

    fn parse_dims(&mut self) -> Result<usize> {
        let mut dims = 0;
        while self.check(&Token::LBracket)? && self.check_at(1, &Token::RBracket)? {
            self.advance()?;
            self.advance()?;
            dims += 1;
        }
        Ok(dims)
    }

    pub(super) fn parse_type_ref(&mut self) -> Result<TypeRef> {
        let annotations = self.parse_annotations()?;

        let mut type_ref = match self.peek_token_type(0)? {
            Some(token) if token.is_primitive_type() => TypeRef::new(self.advance()?.lexeme),
            Some(Token::Identifier) => {
                let mut name = self.parse_identifier()?.lexeme;
                let mut type_args = Vec::new();
                loop {
                    if self.check(&Token::Lt)? {
                        type_args = self.parse_type_arguments()?;
                    }
                    if self.check(&Token::Dot)? && self.check_at(1, &Token::Identifier)? {
                        self.advance()?;
                        name.push('.');
                        name.push_str(&self.parse_identifier()?.lexeme);
                    } else {
                        break;
                    }
                }
                TypeRef::new(name).with_type_args(type_args)
            }
            _ => return Err(self.error_here("type")),
        };

        type_ref.annotations = annotations;
        type_ref.dimensions = self.parse_dims()?;
        Ok(type_ref)
    }

    fn parse_type_list(&mut self) -> Result<Vec<TypeRef>> {
        let mut types = vec![self.parse_type_ref()?];
        while self.match_token(&Token::Comma)? {
            types.push(self.parse_type_ref()?);
        }
        Ok(types)
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<TypeArg>> {
        self.nested(|parser| parser.parse_type_argument_list())
    }

    fn parse_type_argument_list(&mut self) -> Result<Vec<TypeArg>> {
        self.consume(&Token::Lt, "'<'")?;
        let mut args = Vec::new();
        // Diamond
        if self.match_token(&Token::Gt)? {
            return Ok(args);
        }

        loop {
            let annotations = self.parse_annotations()?;
            if self.match_token(&Token::Question)? {
                let bound = if self.match_token(&Token::Extends)? {
                    Some((BoundKind::Extends, self.parse_type_ref()?))
                } else if self.match_token(&Token::Super)? {
                    Some((BoundKind::Super, self.parse_type_ref()?))
                } else {
                    None
                };
                args.push(TypeArg::Wildcard(bound));
            } else {
                let mut arg = self.parse_type_ref()?;
                arg.annotations.splice(0..0, annotations);
                args.push(TypeArg::Type(arg));
            }
            if !self.match_token(&Token::Comma)? {
                break;
            }
        }

        self.close_type_arguments()?;
        Ok(args)
    }

    /// Consume one `>`, splitting `>>` and `>>>` closers of nested arguments
    fn close_type_arguments(&mut self) -> Result<()> {
        match self.peek_token_type(0)? {
            Some(Token::Gt) => {
                self.advance()?;
                Ok(())
            }
            Some(Token::RShift) | Some(Token::URShift) => {
                if let Some(token) = self.lookahead.front_mut() {
                    token.token = if token.token == Token::RShift { Token::Gt } else { Token::RShift };
                    token.lexeme.remove(0);
                    token.location.column += 1;
                    token.location.offset += 1;
                }
                Ok(())
            }
            _ => Err(self.error_here("'>'")),
        }
    }

    fn parse_type_parameters(&mut self) -> Result<Vec<TypeParam>> {
        self.consume(&Token::Lt, "'<'")?;
        let mut params = Vec::new();
        loop {
            let annotations = self.parse_annotations()?;
            let name = self.parse_identifier()?.lexeme;
            let mut bounds = Vec::new();
            if self.match_token(&Token::Extends)? {
                bounds.push(self.parse_type_ref()?);
                while self.match_token(&Token::Amp)? {
                    bounds.push(self.parse_type_ref()?);
                }
            }
            params.push(TypeParam {
                name,
                bounds,
                annotations,
            });
            if !self.match_token(&Token::Comma)? {
                break;
            }
        }
        self.close_type_arguments()?;
        Ok(params)
    }
}

/// Parse one source unit
pub fn parse(source: &str, config: &Config) -> Result<SourceUnit> {
    Parser::new(source, config).parse()
}
