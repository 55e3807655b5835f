/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The closed `Expr` and `Stmt` enums and their S-expression rendering
/// - expressions: Payloads for each expression kind
/// - statements: Payloads for each statement kind
/// - types: Type representations shared by the parser and the type checker
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
