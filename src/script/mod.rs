//! Embedded expression language: lexer, symbol table, built-ins and parser.

pub mod builtins;
mod error;
pub mod lexer;
pub mod parser;
pub mod symtable;

pub use builtins::{FunctionRegistry, ScriptFunction};
pub use error::ScriptError;
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ExpressionParser, ParserState, UNDEFINED};
pub use symtable::SymbolTable;
