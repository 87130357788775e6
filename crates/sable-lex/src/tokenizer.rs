use std::collections::HashMap;

use thiserror::Error;

use sable_re::{Accept, BadRegex, Dfa, DfaTable, Fragment, NfaBuilder};

use crate::rules::{LexicalRule, TokenKind};
use crate::token::Token;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerOptions {
    // when set, a rule whose pattern fails to compile falls back to a
    // byte-for-byte literal automaton instead of failing the build
    pub literal_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to compile rule {rule_index}: {cause}")]
pub struct BuildError {
    pub rule_index: usize,
    #[source]
    pub cause: BadRegex,
}

// all rule automata fused into one prioritized recognizer; immutable after
// construction
#[derive(Debug)]
pub struct Tokenizer<K> {
    table: DfaTable,
    kinds: Vec<K>,     // tag -> kind
    ignored: Vec<bool>, // tag -> drop matches
}

impl<K: TokenKind> Tokenizer<K> {
    pub fn build(rules: &[LexicalRule<K>]) -> Result<Tokenizer<K>, BuildError> {
        Self::build_with(rules, TokenizerOptions::default())
    }

    pub fn build_with(
        rules: &[LexicalRule<K>],
        options: TokenizerOptions,
    ) -> Result<Tokenizer<K>, BuildError> {
        // ascending priority so iteration order is deterministic; the
        // priority value itself still governs tie-breaks downstream
        let mut order: Vec<usize> = (0..rules.len()).collect();
        order.sort_by_key(|&i| rules[i].priority);

        let mut kinds: Vec<K> = Vec::new();
        let mut ignored: Vec<bool> = Vec::new();
        let mut tag_of: HashMap<K, u32> = HashMap::new();

        let mut builder = NfaBuilder::new();
        let mut fragments: Vec<(Fragment, Accept)> = Vec::new();

        for &i in &order {
            let rule = &rules[i];
            let tag = *tag_of.entry(rule.kind).or_insert_with(|| {
                kinds.push(rule.kind);
                ignored.push(rule.ignore);
                (kinds.len() - 1) as u32
            });
            let fragment = match builder.add_pattern(&rule.pattern) {
                Ok(fragment) => fragment,
                Err(_) if options.literal_fallback => builder.add_literal(&rule.pattern),
                Err(cause) => {
                    return Err(BuildError {
                        rule_index: i,
                        cause,
                    })
                }
            };
            fragments.push((
                fragment,
                Accept {
                    tag,
                    priority: rule.priority,
                },
            ));
        }

        let nfa = builder.fuse(&fragments);
        let dfa = Dfa::from_nfa(&nfa).minimize();

        Ok(Tokenizer {
            table: DfaTable::from_dfa(&dfa),
            kinds,
            ignored,
        })
    }

    // maximal munch: returns the end offset and tag of the longest match
    // starting at `start`, if any rule matched at least one byte
    fn next_match(&self, bytes: &[u8], start: usize) -> Option<(usize, u32)> {
        let mut state = self.table.start();
        let mut best: Option<(usize, u32)> = None;
        let mut cursor = start;

        while cursor < bytes.len() {
            state = self.table.next_state(state, bytes[cursor]);
            if state == self.table.error_state() {
                break;
            }
            cursor += 1;
            if let Some((tag, _)) = self.table.accept(state) {
                best = Some((cursor, tag));
            }
        }
        best
    }

    pub fn tokenize(&self, input: &str) -> Vec<Token<K>> {
        let bytes = input.as_bytes();
        let mut tokens = Vec::new();
        let mut position = 0usize;
        let mut line = 1u32;
        let mut column = 1u32;

        while position < bytes.len() {
            match self.next_match(bytes, position) {
                Some((end, tag)) => {
                    // matches only consume ascii bytes, so both bounds sit
                    // on char boundaries
                    let lexeme = &input[position..end];
                    if !self.ignored[tag as usize] {
                        tokens.push(Token {
                            kind: self.kinds[tag as usize],
                            lexeme: lexeme.to_string(),
                            position,
                            line,
                            column,
                        });
                    }
                    advance(lexeme, &mut line, &mut column);
                    position = end;
                }
                None => {
                    // unmatched input becomes an UNKNOWN token, one
                    // character at a time
                    let ch = input[position..]
                        .chars()
                        .next()
                        .expect("scan position is a char boundary");
                    let lexeme = ch.to_string();
                    tokens.push(Token {
                        kind: K::unknown(),
                        lexeme: lexeme.clone(),
                        position,
                        line,
                        column,
                    });
                    advance(&lexeme, &mut line, &mut column);
                    position += ch.len_utf8();
                }
            }
        }

        tokens.push(Token {
            kind: K::eof(),
            lexeme: String::new(),
            position,
            line,
            column,
        });
        tokens
    }
}

fn advance(lexeme: &str, line: &mut u32, column: &mut u32) {
    for c in lexeme.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}
