/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Expr` and `Stmt` enums tying the node structs together
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for the top-level items
/// - types: Type annotations and the semantic type representation
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
