use thiserror::Error;

use sable_lex::{Token, TokenKind};

use crate::grammar::{SymbolKind, DOLLAR};
use crate::lalr::{Action, LalrTable};

// the parser hit an empty ACTION cell; carries the offending token and its
// index in the input stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at input {index}: unexpected {token:?}")]
pub struct SyntaxError<K: std::fmt::Debug> {
    pub token: Token<K>,
    pub index: usize,
}

impl LalrTable {
    // stack-based shift/reduce recognizer. terminals are looked up by kind
    // name; an EOF token maps to $, and a missing one is synthesized.
    pub fn parse<K: TokenKind>(&self, tokens: &[Token<K>]) -> Result<(), SyntaxError<K>> {
        let mut stack: Vec<usize> = vec![self.start_state()];
        let mut ip = 0;

        loop {
            let state = *stack.last().expect("state stack starts non-empty");

            let current = tokens.get(ip);
            let offending = || SyntaxError {
                token: current.cloned().unwrap_or_else(|| eof_token(tokens)),
                index: ip,
            };

            let terminal = match current {
                None => DOLLAR,
                Some(token) if token.kind == K::eof() => DOLLAR,
                Some(token) => match self.grammar.symbol_id(token.kind.name()) {
                    Some(id) if self.grammar.symbol_kind(id) == SymbolKind::Terminal => id,
                    _ => return Err(offending()),
                },
            };

            match self.action(state, terminal) {
                Some(Action::Shift(next)) => {
                    stack.push(next);
                    ip += 1;
                }
                Some(Action::Reduce(production)) => {
                    // an ε-production pops nothing
                    let count = self.grammar.rhs_symbols(production).len();
                    if stack.len() <= count {
                        return Err(offending());
                    }
                    stack.truncate(stack.len() - count);

                    let top = *stack.last().expect("truncate kept the bottom state");
                    let lhs = self.grammar.productions()[production].lhs;
                    match self.goto(top, lhs) {
                        Some(target) => stack.push(target),
                        None => return Err(offending()),
                    }
                }
                Some(Action::Accept) => return Ok(()),
                None => return Err(offending()),
            }
        }
    }
}

fn eof_token<K: TokenKind>(tokens: &[Token<K>]) -> Token<K> {
    let (position, line, column) = tokens
        .last()
        .map(|t| (t.position + t.lexeme.len(), t.line, t.column))
        .unwrap_or((0, 1, 1));
    Token {
        kind: K::eof(),
        lexeme: String::new(),
        position,
        line,
        column,
    }
}
