//! Statement-at-a-time expression parser.
//!
//! A program is a sequence of `lhs = rhs;` statements where `rhs` is one
//! operand, `f(a, b, ...)`, `a + b + ...` or `c ? a : b`. Each statement is
//! evaluated as soon as its `;` arrives and the result is written to the
//! symbol table under `lhs`.

use crate::options::ProcessorOptions;
use crate::script::builtins::{FunctionRegistry, ScriptFunction};
use crate::script::error::ScriptError;
use crate::script::lexer::{Lexer, Token, TokenKind, near_text, unescape_literal};
use crate::script::symtable::SymbolTable;

/// Value stored for unresolved symbols and undefined functions.
pub const UNDEFINED: &str = "undefined";

/// Which token class the parser accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    LhsRequired,
    OpAssignRequired,
    IdentifierRequired,
    OpAnyRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand<'a> {
    Identifier(&'a str),
    Literal(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallShape {
    /// `f(...)`; `true` while the argument list is open.
    Parens(bool),
    /// `a + b`
    Concat,
    /// `c ? a : b`; `true` once `:` was seen.
    Conditional(bool),
}

#[derive(Clone)]
enum Callee {
    Known(ScriptFunction),
    Undefined,
}

#[derive(Default)]
struct Statement<'a> {
    lhs: &'a str,
    operands: Vec<Operand<'a>>,
    call: Option<(CallShape, Callee)>,
}

/// Parser bounds taken from [`ProcessorOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionParser {
    max_identifiers: usize,
    max_statement_len: usize,
    max_value_len: usize,
}

impl ExpressionParser {
    pub fn new(options: &ProcessorOptions) -> Self {
        Self {
            max_identifiers: options.max_identifiers,
            max_statement_len: options.max_statement_len,
            max_value_len: options.max_value_len,
        }
    }

    /// Runs `program`, writing every assignment into `symbols`.
    ///
    /// Statements already evaluated stay in `symbols` when a later one
    /// fails.
    pub fn parse(
        &self,
        program: &str,
        symbols: &mut SymbolTable,
        registry: &FunctionRegistry,
    ) -> Result<(), ScriptError> {
        let mut lexer = Lexer::new(program);
        let mut state = ParserState::LhsRequired;
        let mut statement = Statement::default();
        loop {
            let token = lexer.next_token()?;
            if token.text.len() > self.max_statement_len {
                return Err(ScriptError::overflow(
                    "statement token",
                    token.text.len(),
                    self.max_statement_len,
                ));
            }
            state = match (state, token.kind) {
                (ParserState::LhsRequired, TokenKind::End) => return Ok(()),
                (ParserState::LhsRequired, TokenKind::Semicolon) => ParserState::LhsRequired,
                (state, TokenKind::End) => {
                    tracing::error!(?state, "program ended mid-statement");
                    return Err(ScriptError::UnexpectedEnd { state });
                }
                (ParserState::LhsRequired, TokenKind::Identifier) => {
                    statement = Statement {
                        lhs: token.text,
                        ..Statement::default()
                    };
                    ParserState::OpAssignRequired
                }
                (ParserState::OpAssignRequired, TokenKind::Assign) => {
                    ParserState::IdentifierRequired
                }
                (ParserState::IdentifierRequired, TokenKind::Identifier) => {
                    self.push_operand(&mut statement, Operand::Identifier(token.text))?;
                    ParserState::OpAnyRequired
                }
                (ParserState::IdentifierRequired, TokenKind::Literal) => {
                    self.push_operand(&mut statement, Operand::Literal(token.text))?;
                    ParserState::OpAnyRequired
                }
                (ParserState::OpAnyRequired, TokenKind::Semicolon) => {
                    self.finish(&statement, symbols)?;
                    statement = Statement::default();
                    ParserState::LhsRequired
                }
                (ParserState::OpAnyRequired, kind) => {
                    match self.operator(&mut statement, kind, registry) {
                        Some(next) => next,
                        None => return Err(invalid(program, &token, state)),
                    }
                }
                (state, _) => return Err(invalid(program, &token, state)),
            };
        }
    }

    fn push_operand<'a>(
        &self,
        statement: &mut Statement<'a>,
        operand: Operand<'a>,
    ) -> Result<(), ScriptError> {
        if statement.operands.len() >= self.max_identifiers {
            return Err(ScriptError::overflow(
                "statement operands",
                statement.operands.len() + 1,
                self.max_identifiers,
            ));
        }
        statement.operands.push(operand);
        Ok(())
    }

    // Applies an operator seen after an operand. `None` rejects the token.
    fn operator(
        &self,
        statement: &mut Statement<'_>,
        kind: TokenKind,
        registry: &FunctionRegistry,
    ) -> Option<ParserState> {
        let shape = statement.call.as_ref().map(|(shape, _)| *shape);
        match (kind, shape) {
            (TokenKind::LeftParen, None) => {
                // Only `lhs = name(` can open a call.
                let [Operand::Identifier(name)] = statement.operands.as_slice() else {
                    return None;
                };
                let callee = resolve(registry, name);
                statement.operands.clear();
                statement.call = Some((CallShape::Parens(true), callee));
                Some(ParserState::IdentifierRequired)
            }
            (TokenKind::Comma, Some(CallShape::Parens(true))) => {
                Some(ParserState::IdentifierRequired)
            }
            (TokenKind::RightParen, Some(CallShape::Parens(true))) => {
                set_shape(statement, CallShape::Parens(false));
                Some(ParserState::OpAnyRequired)
            }
            (TokenKind::Plus, None) => {
                statement.call = Some((CallShape::Concat, resolve(registry, "concat")));
                Some(ParserState::IdentifierRequired)
            }
            (TokenKind::Plus, Some(CallShape::Concat)) => Some(ParserState::IdentifierRequired),
            (TokenKind::Question, None) if statement.operands.len() == 1 => {
                statement.call = Some((
                    CallShape::Conditional(false),
                    resolve(registry, "conditional"),
                ));
                Some(ParserState::IdentifierRequired)
            }
            (TokenKind::Colon, Some(CallShape::Conditional(false)))
                if statement.operands.len() == 2 =>
            {
                set_shape(statement, CallShape::Conditional(true));
                Some(ParserState::IdentifierRequired)
            }
            _ => None,
        }
    }

    fn finish(&self, statement: &Statement<'_>, symbols: &mut SymbolTable) -> Result<(), ScriptError> {
        if let Some((CallShape::Parens(true), _)) = statement.call {
            return Err(ScriptError::InvalidState {
                token: ";".to_string(),
                state: ParserState::OpAnyRequired,
                context: statement.lhs.to_string(),
            });
        }
        let values: Vec<String> = statement
            .operands
            .iter()
            .map(|operand| match operand {
                Operand::Literal(text) => unescape_literal(text),
                Operand::Identifier(name) => symbols.get(name).unwrap_or(UNDEFINED).to_string(),
            })
            .collect();
        let value = match &statement.call {
            None => values.into_iter().next().unwrap_or_default(),
            Some((_, Callee::Undefined)) => UNDEFINED.to_string(),
            Some((_, Callee::Known(function))) => {
                let args: Vec<&str> = values.iter().map(String::as_str).collect();
                let mut out = String::new();
                function(&args, &mut out)?;
                if out.len() > self.max_value_len {
                    return Err(ScriptError::overflow(
                        "function result",
                        out.len(),
                        self.max_value_len,
                    ));
                }
                out
            }
        };
        symbols.put(statement.lhs, &value)
    }
}

fn set_shape(statement: &mut Statement<'_>, shape: CallShape) {
    if let Some((current, _)) = statement.call.as_mut() {
        *current = shape;
    }
}

fn resolve(registry: &FunctionRegistry, name: &str) -> Callee {
    match registry.get(name) {
        Some(function) => Callee::Known(function),
        None => {
            tracing::warn!(function = name, "undefined function");
            Callee::Undefined
        }
    }
}

fn invalid(program: &str, token: &Token<'_>, state: ParserState) -> ScriptError {
    let context = near_text(program, token.span);
    tracing::error!(token = token.text, ?state, context = %context, "invalid token");
    ScriptError::InvalidState {
        token: token.text.to_string(),
        state,
        context,
    }
}
