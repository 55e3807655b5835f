use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{AssignmentExpr, CallExpr, MemberExpr},
        statements::{BlockStmt, ClassDeclStmt, FnDeclStmt, Parameter, ReturnStmt, VarDeclStmt},
        types::{Type, BOOL, FLOAT, INT, STRING, VOID},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

const KNOWN_MODULES: [&str; 3] = ["math", "strings", "json"];

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub ty: Type,
    pub is_constant: bool,
}

/// Symbols visible in one function or class body.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Binds `name`, replacing any earlier binding of the same name.
    pub fn declare(&mut self, name: &str, ty: Type, is_constant: bool) {
        let previous = self
            .symbols
            .insert(name.to_string(), Symbol { ty, is_constant });

        if previous.is_some() {
            trace!(name, "redeclared symbol");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// What a `return` is checked against.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnContext {
    /// Not inside any function.
    TopLevel,
    /// Inside a function, with its declared return type if it has one.
    Function(Option<Type>),
}

#[derive(Debug)]
pub struct TypeChecker {
    pub symbol_table: SymbolTable,
    pub return_context: ReturnContext,
    pub current_class: Option<ClassDeclStmt>,
    pub imported_modules: HashSet<String>,
    pub known_modules: HashSet<String>,
    pub class_types: HashMap<String, Type>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        TypeChecker::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            symbol_table: SymbolTable::new(),
            return_context: ReturnContext::TopLevel,
            current_class: None,
            imported_modules: HashSet::new(),
            known_modules: KNOWN_MODULES.iter().map(|m| m.to_string()).collect(),
            class_types: HashMap::new(),
        }
    }

    /// Runs `check` against `table` in place of the current symbol table.
    ///
    /// The caller's table is restored afterwards, error or not, and the
    /// table that was used is handed back.
    pub fn in_scope<T>(
        &mut self,
        table: SymbolTable,
        check: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> (SymbolTable, Result<T, Error>) {
        let outer = std::mem::replace(&mut self.symbol_table, table);
        trace!(symbols = outer.len(), "entering scope");

        let result = check(self);

        let inner = std::mem::replace(&mut self.symbol_table, outer);
        trace!(symbols = inner.len(), "leaving scope");
        (inner, result)
    }

    /// Resolves an annotation: primitives stay symbols, class names become
    /// their struct type.
    pub fn resolve_type(&self, ty: &Type, position: &Position) -> Result<Type, Error> {
        match ty {
            Type::Symbol(name) => {
                if [INT, FLOAT, STRING, BOOL, VOID].contains(&name.as_str()) {
                    Ok(ty.clone())
                } else if let Some(class) = self.class_types.get(name) {
                    Ok(class.clone())
                } else {
                    Err(Error::new(
                        ErrorImpl::UnknownType {
                            type_: name.clone(),
                        },
                        position.clone(),
                    ))
                }
            }
            Type::List(underlying) => Ok(Type::list(self.resolve_type(underlying, position)?)),
            Type::Function {
                parameters,
                return_type,
            } => Ok(Type::Function {
                parameters: parameters
                    .iter()
                    .map(|parameter| self.resolve_type(parameter, position))
                    .collect::<Result<_, _>>()?,
                return_type: Box::new(self.resolve_type(return_type, position)?),
            }),
            Type::Struct { .. } => Ok(ty.clone()),
        }
    }

    fn fetch_symbol(&self, name: &str, position: &Position) -> Result<&Symbol, Error> {
        self.symbol_table.get(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: name.to_string(),
                },
                position.clone(),
            )
        })
    }

    fn class_type(&self, name: &str, position: &Position) -> Result<Type, Error> {
        self.class_types.get(name).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownType {
                    type_: name.to_string(),
                },
                position.clone(),
            )
        })
    }
}

fn type_mismatch(expected: &Type, received: &Type, position: &Position) -> Error {
    Error::new(
        ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        position.clone(),
    )
}

fn expect_type(expected: &Type, received: &Type, position: &Position) -> Result<(), Error> {
    if expected != received {
        return Err(type_mismatch(expected, received, position));
    }
    Ok(())
}

fn expect_condition(type_checker: &mut TypeChecker, condition: &Expr) -> Result<(), Error> {
    let ty = type_check_expr(type_checker, condition)?;
    if ty != Type::bool() {
        return Err(Error::new(
            ErrorImpl::ConditionNotBoolean {
                received: ty.to_string(),
            },
            condition.get_span().start.clone(),
        ));
    }
    Ok(())
}

pub fn type_check_expr(type_checker: &mut TypeChecker, ast: &Expr) -> Result<Type, Error> {
    let position = &ast.get_span().start;

    match ast {
        Expr::Int(_) => Ok(Type::int()),
        Expr::Float(_) => Ok(Type::float()),
        Expr::String(_) => Ok(Type::string()),
        Expr::Boolean(_) => Ok(Type::bool()),
        Expr::Symbol(symbol) => {
            if symbol.value == "this" {
                let Some(class) = &type_checker.current_class else {
                    return Err(Error::new(ErrorImpl::ThisOutsideClass, position.clone()));
                };
                let name = class.name.clone();
                return type_checker.class_type(&name, position);
            }

            Ok(type_checker.fetch_symbol(&symbol.value, position)?.ty.clone())
        }
        Expr::Binary(binary) => {
            let left = type_check_expr(type_checker, &binary.left)?;
            let right = type_check_expr(type_checker, &binary.right)?;

            expect_type(&left, &right, &binary.right.get_span().start)?;

            match binary.operator.kind {
                TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::Less
                | TokenKind::LessEquals
                | TokenKind::Greater
                | TokenKind::GreaterEquals => Ok(Type::bool()),
                _ => Ok(left),
            }
        }
        Expr::Prefix(prefix) => {
            let operand = type_check_expr(type_checker, &prefix.right_expr)?;
            let operand_position = &prefix.right_expr.get_span().start;

            match prefix.operator.kind {
                TokenKind::Not => {
                    expect_type(&Type::bool(), &operand, operand_position)?;
                }
                _ => {
                    if operand != Type::int() && operand != Type::float() {
                        return Err(type_mismatch(&Type::int(), &operand, operand_position));
                    }
                }
            }

            Ok(operand)
        }
        Expr::Assignment(assignment) => type_check_assignment(type_checker, assignment),
        Expr::Member(member) => type_check_member(type_checker, member),
        Expr::Computed(computed) => {
            let underlying = match type_check_expr(type_checker, &computed.object)? {
                Type::List(underlying) => underlying,
                other => {
                    return Err(Error::new(
                        ErrorImpl::NotAList {
                            type_: other.to_string(),
                        },
                        position.clone(),
                    ))
                }
            };

            let index = type_check_expr(type_checker, &computed.property)?;
            expect_type(&Type::int(), &index, &computed.property.get_span().start)?;

            Ok(*underlying)
        }
        Expr::Call(call) => type_check_call(type_checker, call),
        Expr::Range(range) => {
            let lower = type_check_expr(type_checker, &range.lower)?;
            expect_type(&Type::int(), &lower, &range.lower.get_span().start)?;
            let upper = type_check_expr(type_checker, &range.upper)?;
            expect_type(&Type::int(), &upper, &range.upper.get_span().start)?;

            Ok(Type::list(Type::int()))
        }
        Expr::Function(function) => type_check_function(
            type_checker,
            &function.parameters,
            function.return_type.as_ref(),
            &function.body,
            position,
        ),
        Expr::ArrayLiteral(array) => {
            let Some((first, rest)) = array.contents.split_first() else {
                return Err(Error::new(ErrorImpl::EmptyArrayLiteral, position.clone()));
            };

            let element = type_check_expr(type_checker, first)?;
            for item in rest {
                let ty = type_check_expr(type_checker, item)?;
                expect_type(&element, &ty, &item.get_span().start)?;
            }

            Ok(Type::list(element))
        }
        Expr::ArrayInstantiation(array) => {
            let element = type_checker.resolve_type(&array.underlying, position)?;
            for item in &array.contents {
                let ty = type_check_expr(type_checker, item)?;
                expect_type(&element, &ty, &item.get_span().start)?;
            }

            Ok(Type::list(element))
        }
        Expr::StructInstantiation(instantiation) => {
            let struct_type = type_checker.class_type(&instantiation.name, position)?;

            for (name, value) in &instantiation.fields {
                let value_position = &value.get_span().start;
                let Some(expected) = struct_type.get_member_type(name).cloned() else {
                    return Err(Error::new(
                        ErrorImpl::UnknownProperty {
                            property: name.clone(),
                            type_: instantiation.name.clone(),
                        },
                        value_position.clone(),
                    ));
                };

                let received = type_check_expr(type_checker, value)?;
                if expected != received {
                    return Err(Error::new(
                        ErrorImpl::FieldTypeMatchError {
                            expected: expected.to_string(),
                            received: received.to_string(),
                        },
                        value_position.clone(),
                    ));
                }
            }

            Ok(struct_type)
        }
        Expr::New(new) => {
            let struct_type = type_checker.class_type(&new.name, position)?;
            for argument in &new.arguments {
                type_check_expr(type_checker, argument)?;
            }

            Ok(struct_type)
        }
    }
}

fn type_check_assignment(
    type_checker: &mut TypeChecker,
    assignment: &AssignmentExpr,
) -> Result<Type, Error> {
    let position = &assignment.assignee.get_span().start;

    match assignment.assignee.as_ref() {
        Expr::Symbol(symbol) if symbol.value != "this" => {
            if type_checker.fetch_symbol(&symbol.value, position)?.is_constant {
                return Err(Error::new(
                    ErrorImpl::AssignToConstant {
                        variable: symbol.value.clone(),
                    },
                    position.clone(),
                ));
            }
        }
        Expr::Member(_) | Expr::Computed(_) => {}
        _ => return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, position.clone())),
    }

    let assignee = type_check_expr(type_checker, &assignment.assignee)?;
    let value = type_check_expr(type_checker, &assignment.value)?;
    expect_type(&assignee, &value, &assignment.value.get_span().start)?;

    Ok(assignee)
}

fn type_check_member(type_checker: &mut TypeChecker, member: &MemberExpr) -> Result<Type, Error> {
    let position = &member.object.get_span().start;

    if let Expr::Symbol(symbol) = member.object.as_ref() {
        if symbol.value == "this" {
            let Some(class) = type_checker.current_class.clone() else {
                return Err(Error::new(ErrorImpl::ThisOutsideClass, position.clone()));
            };

            for stmt in class.body.iter() {
                match stmt {
                    Stmt::VarDecl(field) if field.identifier == member.property => {
                        return field_type(type_checker, field);
                    }
                    Stmt::FnDecl(method) if method.identifier == member.property => {
                        return function_signature(
                            type_checker,
                            &method.parameters,
                            method.return_type.as_ref(),
                            &method.span.start,
                        );
                    }
                    _ => {}
                }
            }

            return Err(Error::new(
                ErrorImpl::UnknownProperty {
                    property: member.property.clone(),
                    type_: class.name,
                },
                member.span.end.clone(),
            ));
        }
    }

    // Struct types captured while their class was still being checked only
    // carry annotated fields, so members come from the registered class.
    let object = match type_check_expr(type_checker, &member.object)? {
        Type::Struct { name, members } => match type_checker.class_types.get(&name) {
            Some(class) => class.clone(),
            None => Type::Struct { name, members },
        },
        other => {
            return Err(Error::new(
                ErrorImpl::NotAStruct {
                    type_: other.to_string(),
                },
                position.clone(),
            ))
        }
    };

    object.get_member_type(&member.property).cloned().ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownProperty {
                property: member.property.clone(),
                type_: object.to_string(),
            },
            member.span.end.clone(),
        )
    })
}

fn type_check_call(type_checker: &mut TypeChecker, call: &CallExpr) -> Result<Type, Error> {
    let (parameters, return_type) = match type_check_expr(type_checker, &call.callee)? {
        Type::Function {
            parameters,
            return_type,
        } => (parameters, return_type),
        other => {
            return Err(Error::new(
                ErrorImpl::NotCallable {
                    type_: other.to_string(),
                },
                call.callee.get_span().start.clone(),
            ))
        }
    };

    if call.arguments.len() > parameters.len() {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                expected: parameters.len(),
                received: call.arguments.len(),
            },
            call.arguments[parameters.len()].get_span().start.clone(),
        ));
    } else if call.arguments.len() < parameters.len() {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                expected: parameters.len(),
                received: call.arguments.len(),
            },
            call.span.end.clone(),
        ));
    }

    for (argument, expected) in call.arguments.iter().zip(parameters.iter()) {
        let received = type_check_expr(type_checker, argument)?;
        if &received != expected {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                argument.get_span().start.clone(),
            ));
        }
    }

    Ok(*return_type)
}

/// Type of a class field: its annotation, or the type of its initializer.
fn field_type(type_checker: &mut TypeChecker, field: &VarDeclStmt) -> Result<Type, Error> {
    let position = &field.span.start;
    match (&field.explicit_type, &field.assigned_value) {
        (Some(explicit_type), _) => type_checker.resolve_type(explicit_type, position),
        (None, Some(value)) => type_check_expr(type_checker, value),
        (None, None) => Err(Error::new(ErrorImpl::ExpectedExplicitValue, position.clone())),
    }
}

/// Resolved parameter types and return type; a missing return type is `void`.
fn resolve_signature(
    type_checker: &TypeChecker,
    parameters: &[Parameter],
    return_type: Option<&Type>,
    position: &Position,
) -> Result<(Vec<Type>, Type), Error> {
    let parameters = parameters
        .iter()
        .map(|parameter| type_checker.resolve_type(&parameter.ty, position))
        .collect::<Result<_, _>>()?;
    let return_type = match return_type {
        Some(ty) => type_checker.resolve_type(ty, position)?,
        None => Type::void(),
    };

    Ok((parameters, return_type))
}

fn function_signature(
    type_checker: &TypeChecker,
    parameters: &[Parameter],
    return_type: Option<&Type>,
    position: &Position,
) -> Result<Type, Error> {
    let (parameters, return_type) =
        resolve_signature(type_checker, parameters, return_type, position)?;

    Ok(Type::Function {
        parameters,
        return_type: Box::new(return_type),
    })
}

/// Checks a function body in a fresh table holding only its parameters.
fn type_check_function(
    type_checker: &mut TypeChecker,
    parameters: &[Parameter],
    return_type: Option<&Type>,
    body: &[Stmt],
    position: &Position,
) -> Result<Type, Error> {
    let (parameter_types, resolved_return) =
        resolve_signature(type_checker, parameters, return_type, position)?;

    let mut table = SymbolTable::new();
    for (parameter, ty) in parameters.iter().zip(&parameter_types) {
        table.declare(&parameter.name, ty.clone(), false);
    }

    let expected = return_type.map(|_| resolved_return.clone());
    let outer_context = std::mem::replace(
        &mut type_checker.return_context,
        ReturnContext::Function(expected),
    );

    let (_, result) = type_checker.in_scope(table, |type_checker| {
        body.iter()
            .try_for_each(|stmt| type_check_stmt(type_checker, stmt))
    });

    type_checker.return_context = outer_context;
    result?;

    Ok(Type::Function {
        parameters: parameter_types,
        return_type: Box::new(resolved_return),
    })
}

fn type_check_var_decl(type_checker: &mut TypeChecker, stmt: &VarDeclStmt) -> Result<(), Error> {
    let position = &stmt.span.start;

    let explicit_type = match &stmt.explicit_type {
        Some(ty) => Some(type_checker.resolve_type(ty, position)?),
        None => None,
    };

    let value_type = match &stmt.assigned_value {
        Some(value) => Some((type_check_expr(type_checker, value)?, value)),
        None => None,
    };

    let ty = match (explicit_type, value_type) {
        (Some(explicit_type), Some((value_type, value))) => {
            expect_type(&explicit_type, &value_type, &value.get_span().start)?;
            explicit_type
        }
        (Some(explicit_type), None) => explicit_type,
        (None, Some((value_type, _))) => value_type,
        (None, None) => return Err(Error::new(ErrorImpl::ExpectedExplicitValue, position.clone())),
    };

    type_checker
        .symbol_table
        .declare(&stmt.identifier, ty, stmt.is_constant);
    Ok(())
}

fn type_check_fn_decl(type_checker: &mut TypeChecker, stmt: &FnDeclStmt) -> Result<(), Error> {
    let position = &stmt.span.start;

    let signature = function_signature(
        type_checker,
        &stmt.parameters,
        stmt.return_type.as_ref(),
        position,
    )?;
    type_checker
        .symbol_table
        .declare(&stmt.identifier, signature, true);

    debug!(function = %stmt.identifier, "checking function body");
    type_check_function(
        type_checker,
        &stmt.parameters,
        stmt.return_type.as_ref(),
        &stmt.body.body,
        position,
    )?;

    Ok(())
}

fn type_check_class_decl(
    type_checker: &mut TypeChecker,
    stmt: &ClassDeclStmt,
) -> Result<(), Error> {
    // Annotated fields are known up front so methods can refer to them
    // through a parameter of the class type.
    type_checker.class_types.insert(
        stmt.name.clone(),
        Type::Struct {
            name: stmt.name.clone(),
            members: vec![],
        },
    );
    let mut annotated = vec![];
    for field in stmt.body.iter() {
        if let Stmt::VarDecl(VarDeclStmt {
            identifier,
            explicit_type: Some(ty),
            span,
            ..
        }) = field
        {
            annotated.push((identifier.clone(), type_checker.resolve_type(ty, &span.start)?));
        }
    }
    type_checker.class_types.insert(
        stmt.name.clone(),
        Type::Struct {
            name: stmt.name.clone(),
            members: annotated,
        },
    );

    debug!(class = %stmt.name, "checking class body");
    let outer_class = type_checker.current_class.replace(stmt.clone());
    let (table, result) = type_checker.in_scope(SymbolTable::new(), |type_checker| {
        type_check_block(type_checker, &stmt.body)
    });
    type_checker.current_class = outer_class;
    result?;

    let members = stmt
        .body
        .iter()
        .filter_map(|member| match member {
            Stmt::VarDecl(field) => Some(field.identifier.as_str()),
            Stmt::FnDecl(method) => Some(method.identifier.as_str()),
            _ => None,
        })
        .filter_map(|name| {
            table
                .get(name)
                .map(|symbol| (name.to_string(), symbol.ty.clone()))
        })
        .collect();

    type_checker.class_types.insert(
        stmt.name.clone(),
        Type::Struct {
            name: stmt.name.clone(),
            members,
        },
    );

    Ok(())
}

fn type_check_return(type_checker: &mut TypeChecker, stmt: &ReturnStmt) -> Result<(), Error> {
    let position = &stmt.span.start;

    let expected = match &type_checker.return_context {
        ReturnContext::TopLevel => {
            return Err(Error::new(ErrorImpl::ReturnOutsideFunction, position.clone()))
        }
        ReturnContext::Function(expected) => expected.clone(),
    };

    let received = match &stmt.value {
        Some(value) => type_check_expr(type_checker, value)?,
        None => Type::void(),
    };

    let expected = expected.unwrap_or_else(Type::void);
    if expected != received {
        return Err(Error::new(
            ErrorImpl::ReturnTypeMatchError {
                expected: expected.to_string(),
                received: received.to_string(),
            },
            position.clone(),
        ));
    }

    Ok(())
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, ast: &Stmt) -> Result<(), Error> {
    match ast {
        Stmt::Block(block) => type_check_block(type_checker, block),
        Stmt::Expression(stmt) => type_check_expr(type_checker, &stmt.expression).map(|_| ()),
        Stmt::VarDecl(stmt) => type_check_var_decl(type_checker, stmt),
        Stmt::FnDecl(stmt) => type_check_fn_decl(type_checker, stmt),
        Stmt::ClassDecl(stmt) => type_check_class_decl(type_checker, stmt),
        Stmt::If(stmt) => {
            expect_condition(type_checker, &stmt.condition)?;
            type_check_block(type_checker, &stmt.then_body)?;
            if let Some(else_body) = &stmt.else_body {
                type_check_stmt(type_checker, else_body)?;
            }
            Ok(())
        }
        Stmt::For(stmt) => {
            if let Some(init) = &stmt.init {
                type_check_stmt(type_checker, init)?;
            }
            if let Some(condition) = &stmt.condition {
                expect_condition(type_checker, condition)?;
            }
            if let Some(post) = &stmt.post {
                type_check_expr(type_checker, post)?;
            }
            type_check_stmt(type_checker, &stmt.body)
        }
        Stmt::Return(stmt) => type_check_return(type_checker, stmt),
        Stmt::Import(stmt) => {
            let position = stmt.span.start.clone();
            if type_checker.imported_modules.contains(&stmt.identifier) {
                return Err(Error::new(
                    ErrorImpl::ModuleAlreadyImported {
                        module: stmt.identifier.clone(),
                    },
                    position,
                ));
            }
            if !type_checker.known_modules.contains(&stmt.identifier) {
                return Err(Error::new(
                    ErrorImpl::UnknownModule {
                        module: stmt.identifier.clone(),
                    },
                    position,
                ));
            }

            type_checker
                .imported_modules
                .insert(stmt.identifier.clone());
            Ok(())
        }
    }
}

pub fn type_check_block(type_checker: &mut TypeChecker, ast: &BlockStmt) -> Result<(), Error> {
    for stmt in ast.iter() {
        type_check_stmt(type_checker, stmt)?;
    }
    Ok(())
}

/// Checks a whole program. Stops at the first error.
pub fn type_check(ast: &BlockStmt) -> (TypeChecker, Option<Error>) {
    let mut type_checker = TypeChecker::new();

    match type_check_block(&mut type_checker, ast) {
        Ok(()) => (type_checker, None),
        Err(error) => {
            debug!(error = %error, "type check failed");
            (type_checker, Some(error))
        }
    }
}
