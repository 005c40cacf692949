use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryExpr, BooleanExpr, CallExpr, IfExpr, LetDeclaration, LetExpr, NumberExpr,
            Parameter, PrefixExpr, ProcLiteralExpr, SequenceExpr, StringExpr, SymbolExpr,
            UnitExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        let binding_power = parser.current_binding_power();
        left = led(parser, left, binding_power)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let Ok(value) = parser.current_token().value.parse::<i32>() else {
                return Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ));
            };

            Ok(Expr::Number(NumberExpr {
                value,
                span: parser.advance().span.clone(),
            }))
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(Expr::Symbol(SymbolExpr {
                value: token.value,
                span: token.span,
            }))
        }
        TokenKind::String => {
            let token = parser.advance().clone();
            Ok(Expr::String(StringExpr {
                value: token.value,
                span: token.span,
            }))
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance().clone();
            Ok(Expr::Boolean(BooleanExpr {
                value: token.kind == TokenKind::True,
                span: token.span,
            }))
        }
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: rhs.get_span().end.clone(),
        },
        operator: operator_token,
        right_expr: Box::new(rhs),
    }))
}

/// `( expr )`, or the unit literal `()`.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::CloseParen {
        let close = parser.advance().clone();
        return Ok(Expr::Unit(UnitExpr {
            span: Span {
                start: open.span.start,
                end: close.span.end,
            },
        }));
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let mut args = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: close.span.end,
        },
        callee: Box::new(left),
        arguments: args,
    }))
}

/// `{ e; e; ... }`
///
/// A trailing `;` appends a unit value so the block evaluates to unit.
pub fn parse_sequence_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.expect(TokenKind::OpenCurly)?;
    let mut body = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_expr(parser, BindingPower::Default)?);

        match parser.current_token_kind() {
            TokenKind::Semicolon => {
                let semicolon = parser.advance().clone();
                if parser.current_token_kind() == TokenKind::CloseCurly {
                    body.push(Expr::Unit(UnitExpr {
                        span: semicolon.span,
                    }));
                }
            }
            TokenKind::CloseCurly => {}
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: parser.current_token().value.clone(),
                        message: String::from("expected `;` or `}`"),
                    },
                    parser.get_position(),
                ))
            }
        }
    }

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::Sequence(SequenceExpr {
        body,
        span: Span {
            start: open.span.start,
            end: close.span.end,
        },
    }))
}

/// `if cond { ... } [else { ... } | else if ...]`
pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::If)?.span.start;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_body = parse_sequence_expr(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            Some(Box::new(parse_if_expr(parser)?))
        } else {
            Some(Box::new(parse_sequence_expr(parser)?))
        }
    } else {
        None
    };

    let end = match &else_body {
        Some(else_body) => else_body.get_span().end.clone(),
        None => then_body.get_span().end.clone(),
    };

    Ok(Expr::If(IfExpr {
        condition: Box::new(condition),
        then_body: Box::new(then_body),
        else_body,
        span: Span { start, end },
    }))
}

fn parse_let_declaration(parser: &mut Parser) -> Result<LetDeclaration, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(LetDeclaration {
        span: Span {
            start: name.span.start,
            end: value.get_span().end.clone(),
        },
        name: name.value,
        explicit_type,
        value,
    })
}

/// `let a = 1, b: str = "x" { body }`
pub fn parse_let_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::Let)?.span.start;

    let mut declarations = vec![parse_let_declaration(parser)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        declarations.push(parse_let_declaration(parser)?);
    }

    let body = parse_sequence_expr(parser)?;

    Ok(Expr::Let(LetExpr {
        span: Span {
            start,
            end: body.get_span().end.clone(),
        },
        declarations,
        body: Box::new(body),
    }))
}

/// Parses `( params )` including the parentheses.
pub fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        let name = parser.expect(TokenKind::Identifier)?;

        let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(parse_type(parser, BindingPower::Default)?)
        } else {
            None
        };

        parameters.push(Parameter {
            name: name.value,
            explicit_type,
            span: Span {
                start: name.span.start,
                end: parser.get_previous_end(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(parameters)
}

/// Parses everything after the `proc` keyword (and name, for declarations):
/// `( params ) [-> T] { body }`
pub fn parse_proc_signature_and_body(
    parser: &mut Parser,
    start: crate::Position,
) -> Result<ProcLiteralExpr, Error> {
    let parameters = parse_parameters(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = parse_sequence_expr(parser)?;

    Ok(ProcLiteralExpr {
        span: Span {
            start,
            end: body.get_span().end.clone(),
        },
        parameters,
        return_type,
        body: Box::new(body),
    })
}

pub fn parse_proc_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::Proc)?.span.start;

    Ok(Expr::ProcLiteral(parse_proc_signature_and_body(
        parser, start,
    )?))
}
