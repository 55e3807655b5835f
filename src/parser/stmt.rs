use tracing::trace;

use crate::{
    ast::{
        ast::Stmt,
        statements::{
            BlockStmt, ClassDeclStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, ImportStmt,
            Parameter, ReturnStmt, VarDeclStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_grammar().get_stmt(kind) {
        trace!(?kind, "statement handler");
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let expression = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        expression,
        span: parser.span_from(start),
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();
    let is_constant = start_token.kind == TokenKind::Const;

    let error = parser.unexpected("expected identifier during variable declaration");
    let identifier = parser
        .expect_error(TokenKind::Identifier, Some(error))?
        .value;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let assigned_value = if parser.current_token_kind() != TokenKind::Semicolon {
        parser.expect(TokenKind::Assignment)?;
        Some(parse_expr(parser, BindingPower::Default)?)
    } else if explicit_type.is_none() {
        return Err(parser.unexpected("expected rhs or explicit type"));
    } else {
        None
    };

    if is_constant && assigned_value.is_none() {
        return Err(parser.unexpected("expected rhs in constant definition"));
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: parser.span_from(start_token.span.start),
        is_constant,
        identifier,
        assigned_value,
        explicit_type,
    }))
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let identifier = parser.expect(TokenKind::Identifier)?.value;

    let from = if parser.current_token_kind() == TokenKind::From {
        parser.advance();
        if parser.current_token_kind() == TokenKind::String {
            Some(parser.advance().value.clone())
        } else {
            Some(parser.expect(TokenKind::Identifier)?.value)
        }
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Import(ImportStmt {
        identifier,
        from,
        span: parser.span_from(start),
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(Box::new(parse_if_stmt(parser)?))
        } else {
            Some(Box::new(Stmt::Block(parse_block(parser)?)))
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        span: parser.span_from(start),
    }))
}

/// Either `for init?; cond?; post? body` or `for cond body`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let init = match parser.current_token_kind() {
        // `for { ... }` loops forever
        TokenKind::OpenCurly => {
            let body = parse_stmt(parser)?;
            return Ok(Stmt::For(ForStmt {
                init: None,
                condition: None,
                post: None,
                body: Box::new(body),
                span: parser.span_from(start),
            }));
        }
        TokenKind::Semicolon => {
            parser.advance();
            None
        }
        TokenKind::Let | TokenKind::Const => Some(Box::new(parse_var_decl_stmt(parser)?)),
        _ => {
            let expr_start = parser.get_position();
            let expression = parse_expr(parser, BindingPower::Default)?;

            if parser.current_token_kind() != TokenKind::Semicolon {
                let body = parse_stmt(parser)?;
                return Ok(Stmt::For(ForStmt {
                    init: None,
                    condition: Some(expression),
                    post: None,
                    body: Box::new(body),
                    span: parser.span_from(start),
                }));
            }

            parser.advance();
            Some(Box::new(Stmt::Expression(ExpressionStmt {
                expression,
                span: parser.span_from(expr_start),
            })))
        }
    };

    let condition = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let post = if parser.current_token_kind() == TokenKind::OpenCurly {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    let body = parse_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        post,
        body: Box::new(body),
        span: parser.span_from(start),
    }))
}

/// `{ stmt* }`
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// `(name: Type, ...)`
pub fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen && parser.has_tokens() {
        let name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser, BindingPower::Default)?;
        parameters.push(Parameter { name, ty });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // An anonymous function in statement position is an expression
    if parser.peek_kind() != TokenKind::Identifier {
        return parse_expression_stmt(parser);
    }

    let start = parser.advance().span.start.clone();
    let identifier = parser.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        span: parser.span_from(start),
        identifier,
        parameters,
        return_type,
        body,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_class_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected class name"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let body = parse_block(parser)?;

    Ok(Stmt::ClassDecl(ClassDeclStmt {
        name,
        body,
        span: parser.span_from(start),
    }))
}
