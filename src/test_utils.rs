//! Test utilities simulating the host boundary.
//!
//! The analyzer owns no parsing: in production the host hands it a syntax
//! tree and a semantic model. The fixture here is a minimal lexer and
//! recursive-descent parser for the statement subset of [`crate::syntax`],
//! plus [`type_table_for`], which derives a [`TypeTable`] from local
//! declarations the way a host's flow-insensitive local typing would. This
//! lets the test suite drive end-to-end scenarios from source text.

use crate::constants::NULLABLE_TYPE_NAME;
use crate::semantics::{TypeInfo, TypeTable};
use crate::syntax::{BinaryOp, Expr, Literal, SourceUnit, Span, Stmt, TypeName, UnaryOp};
use compact_str::CompactString;
use thiserror::Error;

/// Error produced while parsing fixture source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character outside the fixture grammar.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte offset of the character.
        offset: usize,
    },
    /// A token where the grammar demands something else.
    #[error("unexpected token {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        /// Display of the offending token.
        found: String,
        /// Byte offset of the token.
        offset: usize,
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// Input ended mid-construct.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(CompactString),
    Int(i64),
    Str(CompactString),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semi,
    Comma,
    Dot,
    Question,
    Bang,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Assign,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    span: Span,
}

fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    let single = |kind: TokenKind, at: usize| Token {
        kind,
        span: Span::new(at, at + 1),
    };

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '(' => {
                tokens.push(single(TokenKind::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push(single(TokenKind::RParen, i));
                i += 1;
            }
            '{' => {
                tokens.push(single(TokenKind::LBrace, i));
                i += 1;
            }
            '}' => {
                tokens.push(single(TokenKind::RBrace, i));
                i += 1;
            }
            ';' => {
                tokens.push(single(TokenKind::Semi, i));
                i += 1;
            }
            ',' => {
                tokens.push(single(TokenKind::Comma, i));
                i += 1;
            }
            '.' => {
                tokens.push(single(TokenKind::Dot, i));
                i += 1;
            }
            '?' => {
                tokens.push(single(TokenKind::Question, i));
                i += 1;
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token {
                        kind: TokenKind::EqEq,
                        span: Span::new(i, i + 2),
                    });
                    i += 2;
                } else {
                    tokens.push(single(TokenKind::Assign, i));
                    i += 1;
                }
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token {
                        kind: TokenKind::NotEq,
                        span: Span::new(i, i + 2),
                    });
                    i += 2;
                } else {
                    tokens.push(single(TokenKind::Bang, i));
                    i += 1;
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(Token {
                        kind: TokenKind::AndAnd,
                        span: Span::new(i, i + 2),
                    });
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar {
                        found: '&',
                        offset: i,
                    });
                }
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(Token {
                        kind: TokenKind::OrOr,
                        span: Span::new(i, i + 2),
                    });
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar {
                        found: '|',
                        offset: i,
                    });
                }
            }
            '"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(ParseError::UnexpectedEof {
                        expected: "closing '\"'",
                    });
                }
                let content = CompactString::from(&source[start + 1..i]);
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Str(content),
                    span: Span::new(start, i),
                });
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let value = source[start..i].parse::<i64>().map_err(|_| {
                    ParseError::UnexpectedChar {
                        found: c,
                        offset: start,
                    }
                })?;
                tokens.push(Token {
                    kind: TokenKind::Int(value),
                    span: Span::new(start, i),
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(CompactString::from(&source[start..i])),
                    span: Span::new(start, i),
                });
            }
            other => {
                return Err(ParseError::UnexpectedChar {
                    found: other,
                    offset: i,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self, expected: &'static str) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEof { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        let token = self.advance(expected)?;
        if token.kind == *kind {
            Ok(token)
        } else {
            Err(ParseError::UnexpectedToken {
                found: format!("{:?}", token.kind),
                offset: token.span.start,
                expected,
            })
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<(CompactString, Span), ParseError> {
        let token = self.advance(expected)?;
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.span)),
            other => Err(ParseError::UnexpectedToken {
                found: format!("{other:?}"),
                offset: token.span.start,
                expected,
            }),
        }
    }

    fn ident_text_at(&self, offset: usize) -> Option<&str> {
        match self.kind_at(offset) {
            Some(TokenKind::Ident(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.ident_text_at(0) {
            Some("if") => return self.if_stmt(),
            Some("while") => return self.while_stmt(),
            Some("return") => return self.return_stmt(),
            Some(_) => {
                // `T name ...` or `T? name ...` is a declaration.
                let is_decl = matches!(self.kind_at(1), Some(TokenKind::Ident(_)))
                    || (matches!(self.kind_at(1), Some(TokenKind::Question))
                        && matches!(self.kind_at(2), Some(TokenKind::Ident(_))));
                if is_decl {
                    return self.decl_stmt();
                }
                if matches!(self.kind_at(1), Some(TokenKind::Assign)) {
                    return self.assign_stmt();
                }
            }
            None => {}
        }
        self.expr_stmt()
    }

    fn block(&mut self) -> Result<(Vec<Stmt>, usize), ParseError> {
        self.eat(&TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        loop {
            if matches!(self.kind_at(0), Some(TokenKind::RBrace)) {
                let rbrace = self.advance("'}'")?;
                return Ok((body, rbrace.span.end));
            }
            if self.at_eof() {
                return Err(ParseError::UnexpectedEof { expected: "'}'" });
            }
            body.push(self.stmt()?);
        }
    }

    fn if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance("'if'")?;
        self.eat(&TokenKind::LParen, "'('")?;
        let cond = self.expr()?;
        self.eat(&TokenKind::RParen, "')'")?;
        let (then_body, then_end) = self.block()?;
        let (else_body, end) = if self.ident_text_at(0) == Some("else") {
            self.advance("'else'")?;
            self.block()?
        } else {
            (Vec::new(), then_end)
        };
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
            span: Span::new(keyword.span.start, end),
        })
    }

    fn while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance("'while'")?;
        self.eat(&TokenKind::LParen, "'('")?;
        let cond = self.expr()?;
        self.eat(&TokenKind::RParen, "')'")?;
        let (body, end) = self.block()?;
        Ok(Stmt::While {
            cond,
            body,
            span: Span::new(keyword.span.start, end),
        })
    }

    fn return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance("'return'")?;
        let value = if matches!(self.kind_at(0), Some(TokenKind::Semi)) {
            None
        } else {
            Some(self.expr()?)
        };
        let semi = self.eat(&TokenKind::Semi, "';'")?;
        Ok(Stmt::Return {
            value,
            span: Span::new(keyword.span.start, semi.span.end),
        })
    }

    fn decl_stmt(&mut self) -> Result<Stmt, ParseError> {
        let (ty_name, ty_span) = self.expect_ident("type name")?;
        let nullable = if matches!(self.kind_at(0), Some(TokenKind::Question)) {
            self.advance("'?'")?;
            true
        } else {
            false
        };
        let (name, _) = self.expect_ident("variable name")?;
        let init = if matches!(self.kind_at(0), Some(TokenKind::Assign)) {
            self.advance("'='")?;
            Some(self.expr()?)
        } else {
            None
        };
        let semi = self.eat(&TokenKind::Semi, "';'")?;
        Ok(Stmt::LocalDecl {
            ty: TypeName {
                name: ty_name,
                nullable,
            },
            name,
            init,
            span: Span::new(ty_span.start, semi.span.end),
        })
    }

    fn assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let (target, target_span) = self.expect_ident("assignment target")?;
        self.eat(&TokenKind::Assign, "'='")?;
        let value = self.expr()?;
        let semi = self.eat(&TokenKind::Semi, "';'")?;
        Ok(Stmt::Assign {
            target,
            value,
            span: Span::new(target_span.start, semi.span.end),
        })
    }

    fn expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expr()?;
        let semi = self.eat(&TokenKind::Semi, "';'")?;
        let span = Span::new(expr.span().start, semi.span.end);
        Ok(Stmt::Expr { expr, span })
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.and_expr()?;
        while matches!(self.kind_at(0), Some(TokenKind::OrOr)) {
            self.advance("'||'")?;
            let right = self.and_expr()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.equality_expr()?;
        while matches!(self.kind_at(0), Some(TokenKind::AndAnd)) {
            self.advance("'&&'")?;
            let right = self.equality_expr()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn equality_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary_expr()?;
        loop {
            let op = match self.kind_at(0) {
                Some(TokenKind::EqEq) => BinaryOp::Eq,
                Some(TokenKind::NotEq) => BinaryOp::NotEq,
                _ => return Ok(left),
            };
            self.advance("comparison operator")?;
            let right = self.unary_expr()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
    }

    fn unary_expr(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.kind_at(0), Some(TokenKind::Bang)) {
            let bang = self.advance("'!'")?;
            let operand = self.unary_expr()?;
            let span = Span::new(bang.span.start, operand.span().end);
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            });
        }
        self.postfix_expr()
    }

    fn postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary_expr()?;
        loop {
            match self.kind_at(0) {
                Some(TokenKind::Dot) => {
                    self.advance("'.'")?;
                    let (member, member_span) = self.expect_ident("member name")?;
                    let span = Span::new(expr.span().start, member_span.end);
                    expr = Expr::MemberAccess {
                        receiver: Box::new(expr),
                        member,
                        member_span,
                        span,
                    };
                }
                Some(TokenKind::LParen) => {
                    self.advance("'('")?;
                    let mut args = Vec::new();
                    if !matches!(self.kind_at(0), Some(TokenKind::RParen)) {
                        loop {
                            args.push(self.expr()?);
                            if matches!(self.kind_at(0), Some(TokenKind::Comma)) {
                                self.advance("','")?;
                            } else {
                                break;
                            }
                        }
                    }
                    let rparen = self.eat(&TokenKind::RParen, "')'")?;
                    let span = Span::new(expr.span().start, rparen.span.end);
                    expr = Expr::Invocation {
                        callee: Box::new(expr),
                        args,
                        span,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary_expr(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance("expression")?;
        match token.kind {
            TokenKind::Ident(name) => match name.as_str() {
                "null" => Ok(Expr::Literal {
                    value: Literal::Null,
                    span: token.span,
                }),
                "true" | "false" => Ok(Expr::Literal {
                    value: Literal::Bool(name == "true"),
                    span: token.span,
                }),
                _ => Ok(Expr::Identifier {
                    name,
                    span: token.span,
                }),
            },
            TokenKind::Int(value) => Ok(Expr::Literal {
                value: Literal::Int(value),
                span: token.span,
            }),
            TokenKind::Str(content) => Ok(Expr::Literal {
                value: Literal::Str(content),
                span: token.span,
            }),
            TokenKind::LParen => {
                let inner = self.expr()?;
                let rparen = self.eat(&TokenKind::RParen, "')'")?;
                Ok(Expr::Parenthesized {
                    inner: Box::new(inner),
                    span: Span::new(token.span.start, rparen.span.end),
                })
            }
            other => Err(ParseError::UnexpectedToken {
                found: format!("{other:?}"),
                offset: token.span.start,
                expected: "expression",
            }),
        }
    }
}

/// Parses fixture source into a [`SourceUnit`], standing in for the host's
/// parser.
pub fn parse_unit(source: &str) -> Result<SourceUnit, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut body = Vec::new();
    while !parser.at_eof() {
        body.push(parser.stmt()?);
    }
    Ok(SourceUnit { body })
}

/// Derives a [`TypeTable`] from the local declarations of a unit.
///
/// `T?` resolves to the nullable wrapper, C# builtin keywords map to their
/// runtime type names, and any other declared type resolves to its own
/// written name. Identifiers never declared stay unresolvable.
#[must_use]
pub fn type_table_for(unit: &SourceUnit) -> TypeTable {
    let mut table = TypeTable::new();
    collect_decls(&unit.body, &mut table);
    table
}

fn collect_decls(body: &[Stmt], table: &mut TypeTable) {
    for stmt in body {
        match stmt {
            Stmt::LocalDecl { ty, name, .. } => {
                let resolved = if ty.nullable {
                    TypeInfo::new(NULLABLE_TYPE_NAME)
                } else {
                    TypeInfo::new(runtime_type_name(ty.name.as_str()))
                };
                table.insert(name.clone(), resolved);
            }
            Stmt::If {
                then_body,
                else_body,
                ..
            } => {
                collect_decls(then_body, table);
                collect_decls(else_body, table);
            }
            Stmt::While { body, .. } => collect_decls(body, table),
            Stmt::Assign { .. } | Stmt::Return { .. } | Stmt::Expr { .. } => {}
        }
    }
}

fn runtime_type_name(written: &str) -> CompactString {
    match written {
        "int" => CompactString::const_new("Int32"),
        "long" => CompactString::const_new("Int64"),
        "bool" => CompactString::const_new("Boolean"),
        "double" => CompactString::const_new("Double"),
        "string" => CompactString::const_new("String"),
        other => CompactString::from(other),
    }
}
