//! Annotation and annotation-value grammar.
//!
//! Element values are constants, `{...}` lists, nested annotations,
//! class-literals, field references, or `+` chains of those. The chain is
//! folded left-associatively and never evaluated.

use super::error::ParseError;
use super::lexer::Token;
use super::literal::needs_negation;
use super::parser::Parser;
use crate::consts::DEFAULT_ELEMENT_NAME;
use crate::error::Result;
use crate::model::{
    AnnotationElement, AnnotationValue, BinaryExpression, BinaryOperator, Constant, FieldRef, JavaAnnotation, TypeRef,
};

impl<'a> Parser<'a> {
    /// Zero or more annotations; stops before `@interface`
    pub(super) fn parse_annotations(&mut self) -> Result<Vec<JavaAnnotation>> {
        let mut annotations = Vec::new();
        while self.check(&Token::At)? && !self.check_at(1, &Token::Interface)? {
            annotations.push(self.parse_annotation()?);
        }
        Ok(annotations)
    }

    /// `@Name`, `@Name()`, `@Name(value)` or `@Name(k = v, ...)`
    pub(super) fn parse_annotation(&mut self) -> Result<JavaAnnotation> {
        let at = self.consume(&Token::At, "'@'")?;
        let name = self.parse_qualified_name()?;
        let mut annotation = JavaAnnotation::new(TypeRef::new(name), at.location.line);

        if !self.match_token(&Token::LParen)? || self.match_token(&Token::RParen)? {
            return Ok(annotation);
        }

        if self.check(&Token::Identifier)? && self.check_at(1, &Token::Assign)? {
            loop {
                let key = self.parse_identifier()?;
                if annotation.has_property(&key.lexeme) {
                    return Err(ParseError::syntax(
                        "unique element name",
                        format!("duplicate '{}'", key.lexeme),
                        key.location,
                    )
                    .into());
                }
                self.consume(&Token::Assign, "'='")?;
                let value = self.parse_element_value()?;
                annotation.elements.push(AnnotationElement { name: key.lexeme, value });
                if !self.match_token(&Token::Comma)? {
                    break;
                }
            }
        } else {
            let value = self.parse_element_value()?;
            annotation.elements.push(AnnotationElement {
                name: DEFAULT_ELEMENT_NAME.to_string(),
                value,
            });
        }

        self.consume(&Token::RParen, "')'")?;
        Ok(annotation)
    }

    /// Right-hand side of an annotation element or `default` clause
    pub(super) fn parse_element_value(&mut self) -> Result<AnnotationValue> {
        let mut value = self.parse_primary_value()?;
        let mut operands = 1;
        loop {
            match self.peek_token_type(0)? {
                Some(Token::Plus) => {
                    // The fold nests to the left, one level per operand
                    operands += 1;
                    if self.depth + operands > self.config.max_nesting_depth {
                        return Err(self.too_deep());
                    }
                    self.advance()?;
                    let right = self.parse_primary_value()?;
                    value = AnnotationValue::BinaryExpression(BinaryExpression::new(BinaryOperator::Add, value, right));
                }
                Some(token) if is_binary_operator(token) => {
                    let op = self.advance()?;
                    return Err(ParseError::unsupported(
                        format!("operator '{}' in annotation value", op.lexeme),
                        op.location,
                    )
                    .into());
                }
                _ => return Ok(value),
            }
        }
    }

    /// Run `f` one level deeper, bounded by the configured depth.
    ///
    /// Lists, nested annotations, groups, type arguments and member types
    /// all share the one counter.
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        let result = if self.depth > self.config.max_nesting_depth {
            Err(self.too_deep())
        } else {
            f(self)
        };
        self.depth -= 1;
        result
    }

    fn too_deep(&mut self) -> crate::error::Error {
        let location = match self.peek() {
            Ok(Some(token)) => token.location,
            _ => self.last_location,
        };
        ParseError::unsupported(format!("nesting deeper than {}", self.config.max_nesting_depth), location).into()
    }

    fn parse_primary_value(&mut self) -> Result<AnnotationValue> {
        let token = match self.peek_token_type(0)? {
            Some(token) => token,
            None => return Err(self.error_here("annotation value")),
        };

        match token {
            Token::LBrace => self.nested(|parser| parser.parse_value_list()),
            Token::At => self.nested(|parser| {
                let annotation = parser.parse_annotation()?;
                Ok(AnnotationValue::NestedAnnotation(Box::new(annotation)))
            }),
            // Grouping only; no node of its own
            Token::LParen => self.nested(|parser| {
                parser.advance()?;
                let value = parser.parse_element_value()?;
                parser.consume(&Token::RParen, "')'")?;
                Ok(value)
            }),
            Token::Minus => {
                let minus = self.advance()?;
                let negated = match self.peek()? {
                    Some(next) if matches!(next.token, Token::IntegerLiteral | Token::FloatingLiteral) => {
                        next.value.as_ref().and_then(Constant::negate)
                    }
                    _ => None,
                };
                match negated {
                    Some(constant) => {
                        self.advance()?;
                        Ok(AnnotationValue::Constant(constant))
                    }
                    None => Err(ParseError::unsupported("unary '-' on a non-numeric value", minus.location).into()),
                }
            }
            Token::Plus | Token::Bang | Token::Tilde | Token::Inc | Token::Dec => {
                let op = self.advance()?;
                Err(ParseError::unsupported(format!("unary operator '{}' in annotation value", op.lexeme), op.location)
                    .into())
            }
            Token::IntegerLiteral | Token::FloatingLiteral | Token::CharLiteral | Token::StringLiteral => {
                let literal = self.advance()?;
                if literal.token == Token::IntegerLiteral && needs_negation(&literal.lexeme) {
                    return Err(ParseError::lexical(
                        format!("integer literal {} out of range", literal.lexeme),
                        literal.location,
                    )
                    .into());
                }
                match literal.value {
                    Some(constant) => Ok(AnnotationValue::Constant(constant)),
                    None => Err(ParseError::syntax("literal", format!("'{}'", literal.lexeme), literal.location).into()),
                }
            }
            Token::True | Token::False => {
                self.advance()?;
                Ok(AnnotationValue::Constant(Constant::Boolean(token == Token::True)))
            }
            Token::Null => {
                let null = self.advance()?;
                Err(ParseError::unsupported("'null' is not a constant annotation value", null.location).into())
            }
            Token::New => {
                let new = self.advance()?;
                Err(ParseError::unsupported("object creation in annotation value", new.location).into())
            }
            token if token.is_primitive_type() => {
                let name = self.advance()?.lexeme;
                self.parse_class_literal_suffix(name)
            }
            Token::Identifier => self.parse_name_value(),
            _ => Err(self.error_here("annotation value")),
        }
    }

    fn parse_value_list(&mut self) -> Result<AnnotationValue> {
        self.consume(&Token::LBrace, "'{'")?;
        let mut values = Vec::new();
        loop {
            if self.match_token(&Token::RBrace)? {
                break;
            }
            values.push(self.parse_element_value()?);
            if !self.match_token(&Token::Comma)? {
                self.consume(&Token::RBrace, "',' or '}'")?;
                break;
            }
        }
        Ok(AnnotationValue::ValueList(values))
    }

    /// `[]... .class` after a type name
    fn parse_class_literal_suffix(&mut self, name: String) -> Result<AnnotationValue> {
        let mut dims = 0;
        while self.match_token(&Token::LBracket)? {
            self.consume(&Token::RBracket, "']'")?;
            dims += 1;
        }
        self.consume(&Token::Dot, "'.class'")?;
        self.consume(&Token::Class, "'class'")?;
        Ok(AnnotationValue::TypeRef(TypeRef::new(name).with_dimensions(dims)))
    }

    /// Dotted name: a class-literal when `.class` follows, else a field reference
    fn parse_name_value(&mut self) -> Result<AnnotationValue> {
        let first = self.parse_identifier()?;
        let mut name = first.lexeme;
        loop {
            if !self.check(&Token::Dot)? {
                break;
            }
            match self.peek_token_type(1)? {
                Some(Token::Class) => {
                    self.advance()?;
                    self.advance()?;
                    return Ok(AnnotationValue::TypeRef(TypeRef::new(name)));
                }
                Some(Token::Identifier) => {
                    self.advance()?;
                    name.push('.');
                    name.push_str(&self.parse_identifier()?.lexeme);
                }
                _ => break,
            }
        }

        match self.peek_token_type(0)? {
            Some(Token::LBracket) => self.parse_class_literal_suffix(name),
            Some(Token::LParen) => Err(ParseError::unsupported(
                format!("method invocation '{}(...)' in annotation value", name),
                first.location,
            )
            .into()),
            _ => Ok(AnnotationValue::FieldRef(FieldRef::from_qualified(&name))),
        }
    }
}

fn is_binary_operator(token: Token) -> bool {
    matches!(
        token,
        Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Amp
            | Token::Pipe
            | Token::Caret
            | Token::LShift
            | Token::RShift
            | Token::URShift
            | Token::AndAnd
            | Token::PipePipe
            | Token::Eq
            | Token::Ne
            | Token::Lt
            | Token::Le
            | Token::Gt
            | Token::Ge
            | Token::Question
            | Token::InstanceOf
    )
}
