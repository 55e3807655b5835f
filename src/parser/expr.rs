use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayInstantiationExpr, ArrayLiteralExpr, AssignmentExpr, BinaryExpr, BooleanExpr,
            CallExpr, ComputedExpr, FloatExpr, FunctionExpr, IntExpr, MemberExpr, NewExpr,
            PrefixExpr, RangeExpr, StringExpr, StructInstantiationExpr, SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    stmt::{parse_block, parse_parameters},
    types::parse_type,
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_grammar().get_nud(token_kind) else {
        return Err(Error::new(
            ErrorImpl::MissingNudHandler {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // Keep folding while the next operator binds tighter than the caller
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = parser.get_grammar().get_bp(token_kind);
        if token_bp <= bp {
            break;
        }

        let Some(led) = parser.get_grammar().get_led(token_kind) else {
            return Err(Error::new(
                ErrorImpl::MissingLedHandler {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

/// Comma separated expressions up to and including `closing`.
fn parse_expr_list(parser: &mut Parser, closing: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != closing && parser.has_tokens() {
        items.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(closing)?;
    Ok(items)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let expr = match token.kind {
        TokenKind::Int => match token.value.parse() {
            Ok(value) => Expr::Int(IntExpr {
                value,
                span: token.span,
            }),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::Float => match token.value.parse() {
            Ok(value) => Expr::Float(FloatExpr {
                value,
                span: token.span,
            }),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::String => Expr::String(StringExpr {
            value: token.value,
            span: token.span,
        }),
        TokenKind::True | TokenKind::False => Expr::Boolean(BooleanExpr {
            value: token.kind == TokenKind::True,
            span: token.span,
        }),
        TokenKind::Identifier | TokenKind::This => Expr::Symbol(SymbolExpr {
            value: token.value,
            span: token.span,
        }),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    parser.advance();
    Ok(expr)
}

/// The right operand is parsed at the operator's own binding power, so
/// operators of equal precedence group to the left.
pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_range_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let upper = parse_expr(parser, bp)?;

    Ok(Expr::Range(RangeExpr {
        span: left.get_span().to(upper.get_span()),
        lower: Box::new(left),
        upper: Box::new(upper),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator.span.to(right.get_span()),
        operator,
        right_expr: Box::new(right),
    }))
}

/// Right associative: the value is parsed one level below `Assignment`,
/// so a following `=` is folded into the value.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Comma)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: left.get_span().to(value.get_span()),
        assignee: Box::new(left),
        operator,
        value: Box::new(value),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: parser.span_from(left.get_span().start.clone()),
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_member_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let property = parser.expect(TokenKind::Identifier)?;

    Ok(Expr::Member(MemberExpr {
        span: left.get_span().to(&property.span),
        object: Box::new(left),
        property: property.value,
    }))
}

pub fn parse_computed_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let property = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Computed(ComputedExpr {
        span: parser.span_from(left.get_span().start.clone()),
        object: Box::new(left),
        property: Box::new(property),
    }))
}

/// `[a, b]` is a literal; `[]T{a, b}` instantiates a list of `T`.
pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let is_instantiation = parser.current_token_kind() == TokenKind::CloseBracket
        && parser.get_grammar().get_type_nud(parser.peek_kind()).is_some();

    if is_instantiation {
        parser.advance();
        let underlying = parse_type(parser, BindingPower::Default)?;
        parser.expect(TokenKind::OpenCurly)?;
        let contents = parse_expr_list(parser, TokenKind::CloseCurly)?;

        return Ok(Expr::ArrayInstantiation(ArrayInstantiationExpr {
            underlying,
            contents,
            span: parser.span_from(start),
        }));
    }

    let contents = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::ArrayLiteral(ArrayLiteralExpr {
        contents,
        span: parser.span_from(start),
    }))
}

/// `new Name { field: value }` or `new Name(args)`.
pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();
            let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

            Ok(Expr::New(NewExpr {
                name,
                arguments,
                span: parser.span_from(start),
            }))
        }
        TokenKind::OpenCurly => {
            parser.advance();

            let mut fields = vec![];
            while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
                let field_name = parser.expect(TokenKind::Identifier)?.value;
                parser.expect(TokenKind::Colon)?;
                let field_value = parse_expr(parser, BindingPower::Default)?;

                fields.push((field_name, field_value));

                if parser.current_token_kind() == TokenKind::Comma {
                    parser.advance();
                } else {
                    break;
                }
            }

            parser.expect(TokenKind::CloseCurly)?;

            Ok(Expr::StructInstantiation(StructInstantiationExpr {
                name,
                fields,
                span: parser.span_from(start),
            }))
        }
        _ => Err(parser.unexpected("expected `{` or `(` after class name")),
    }
}

pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let parameters = parse_parameters(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Expr::Function(FunctionExpr {
        parameters,
        return_type,
        body: body.body,
        span: parser.span_from(start),
    }))
}
