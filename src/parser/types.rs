//! Type parsing implementation.
//!
//! Type annotations go through the same binding power loop as expressions,
//! over their own NUD/LED tables in the `Grammar`. The default tables know:
//!
//! - named types: identifiers and the primitive keywords
//! - list types: `[]T`

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::{BindingPower, Grammar},
    parser::Parser,
};

pub fn create_token_type_lookups(grammar: &mut Grammar) {
    grammar.type_nud(TokenKind::Identifier, parse_symbol_type);
    grammar.type_nud(TokenKind::IntType, parse_symbol_type);
    grammar.type_nud(TokenKind::FloatType, parse_symbol_type);
    grammar.type_nud(TokenKind::BoolType, parse_symbol_type);
    grammar.type_nud(TokenKind::StringType, parse_symbol_type);
    grammar.type_nud(TokenKind::OpenBracket, parse_list_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance();
    Ok(Type::Symbol(token.value.clone()))
}

pub fn parse_list_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    let underlying = parse_type(parser, BindingPower::Default)?;
    Ok(Type::list(underlying))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_grammar().get_type_nud(token_kind) else {
        return Err(Error::new(
            ErrorImpl::MissingNudHandler {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = parser.get_grammar().get_type_bp(token_kind);
        if token_bp <= bp {
            break;
        }

        let Some(led) = parser.get_grammar().get_type_led(token_kind) else {
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
