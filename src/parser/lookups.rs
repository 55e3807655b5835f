use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        types::Type,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*, types::create_token_type_lookups};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Comma,
    Assignment,
    Logical,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Member,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;
pub type TypeLEDHandler = fn(&mut Parser, Type, BindingPower) -> Result<Type, Error>;

pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Handler registry for one language.
///
/// Built up front and then shared with any number of parsers through an
/// `Rc`. Parsing never mutates it.
#[derive(Clone)]
pub struct Grammar {
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
    type_led_lookup: TypeLEDLookup,
    type_binding_power_lookup: BPLookup,
}

impl Grammar {
    /// A grammar with no handlers at all.
    pub fn empty() -> Self {
        Grammar {
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
        }
    }

    /// The default language.
    pub fn new() -> Self {
        let mut grammar = Grammar::empty();
        create_token_lookups(&mut grammar);
        create_token_type_lookups(&mut grammar);
        grammar
    }

    /// Registers an infix handler and the binding power it is entered at.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a prefix handler. The token's binding power is left alone,
    /// tokens such as `-` and `(` get theirs from the infix registration.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn get_stmt(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn get_nud(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn get_led(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    /// Binding power of `kind`; unregistered tokens bind at `Default`.
    pub fn get_bp(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    pub fn get_type_nud(&self, kind: TokenKind) -> Option<TypeNUDHandler> {
        self.type_nud_lookup.get(&kind).copied()
    }

    pub fn get_type_led(&self, kind: TokenKind) -> Option<TypeLEDHandler> {
        self.type_led_lookup.get(&kind).copied()
    }

    pub fn get_type_bp(&self, kind: TokenKind) -> BindingPower {
        self.type_binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new()
    }
}

pub fn create_token_lookups(grammar: &mut Grammar) {
    grammar.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);
    grammar.led(TokenKind::PlusEquals, BindingPower::Assignment, parse_assignment_expr);
    grammar.led(TokenKind::MinusEquals, BindingPower::Assignment, parse_assignment_expr);
    grammar.led(TokenKind::StarEquals, BindingPower::Assignment, parse_assignment_expr);
    grammar.led(TokenKind::SlashEquals, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    grammar.led(TokenKind::And, BindingPower::Logical, parse_binary_expr);
    grammar.led(TokenKind::Or, BindingPower::Logical, parse_binary_expr);

    // Relational
    grammar.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    grammar.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    grammar.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    grammar.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    grammar.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    grammar.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);
    grammar.led(TokenKind::DotDot, BindingPower::Relational, parse_range_expr);

    // Additive and multiplicative
    grammar.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    grammar.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    grammar.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    grammar.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    grammar.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);

    // Call and member
    grammar.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    grammar.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);
    grammar.led(TokenKind::OpenBracket, BindingPower::Member, parse_computed_expr);

    // Literals and symbols
    grammar.nud(TokenKind::Int, parse_primary_expr);
    grammar.nud(TokenKind::Float, parse_primary_expr);
    grammar.nud(TokenKind::String, parse_primary_expr);
    grammar.nud(TokenKind::True, parse_primary_expr);
    grammar.nud(TokenKind::False, parse_primary_expr);
    grammar.nud(TokenKind::Identifier, parse_primary_expr);
    grammar.nud(TokenKind::This, parse_primary_expr);

    grammar.nud(TokenKind::Dash, parse_prefix_expr);
    grammar.nud(TokenKind::Not, parse_prefix_expr);
    grammar.nud(TokenKind::OpenParen, parse_grouping_expr);
    grammar.nud(TokenKind::OpenBracket, parse_array_expr);
    grammar.nud(TokenKind::New, parse_new_expr);
    grammar.nud(TokenKind::Function, parse_function_expr);

    // Statements
    grammar.stmt(TokenKind::Const, parse_var_decl_stmt);
    grammar.stmt(TokenKind::Let, parse_var_decl_stmt);
    grammar.stmt(TokenKind::Import, parse_import_stmt);
    grammar.stmt(TokenKind::If, parse_if_stmt);
    grammar.stmt(TokenKind::For, parse_for_stmt);
    grammar.stmt(TokenKind::OpenCurly, parse_block_stmt);
    grammar.stmt(TokenKind::Function, parse_fn_decl_stmt);
    grammar.stmt(TokenKind::Class, parse_class_decl_stmt);
    grammar.stmt(TokenKind::Return, parse_return_stmt);
}
