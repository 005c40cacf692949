use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{ConstDeclStmt, EntryStmt, ProcDeclStmt, VarDeclStmt},
        types::TypeAnnotation,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_expr, parse_proc_signature_and_body, parse_sequence_expr},
        lookups::BindingPower,
    },
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected `proc`, `const`, `var` or `entry`"),
            },
            parser.get_position(),
        ));
    };

    handler(parser)
}

/// `proc name(params) -> R { body }`
pub fn parse_proc_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Proc)?.span.start;

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier after `proc` at the top level"),
        },
        parser.get_position(),
    );
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let literal = parse_proc_signature_and_body(parser, start.clone())?;

    Ok(Stmt::ProcDecl(ProcDeclStmt {
        span: Span {
            start,
            end: literal.span.end.clone(),
        },
        identifier,
        literal,
    }))
}

/// Shared shape of `const` and `var`: `name [: T] = value ;`
fn parse_binding_tail(
    parser: &mut Parser,
) -> Result<(String, Option<TypeAnnotation>, Expr), Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.get_position(),
    );
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Assignment)?;
    let assigned_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok((identifier, explicit_type, assigned_value))
}

pub fn parse_const_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Const)?.span.start;
    let (identifier, explicit_type, assigned_value) = parse_binding_tail(parser)?;

    Ok(Stmt::ConstDecl(ConstDeclStmt {
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
        identifier,
        explicit_type,
        assigned_value,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Var)?.span.start;
    let (identifier, explicit_type, assigned_value) = parse_binding_tail(parser)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
        identifier,
        explicit_type,
        assigned_value,
    }))
}

pub fn parse_entry_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::Entry)?.span.start;
    let body = parse_sequence_expr(parser)?;

    Ok(Stmt::Entry(EntryStmt {
        span: Span {
            start,
            end: body.get_span().end.clone(),
        },
        body,
    }))
}
