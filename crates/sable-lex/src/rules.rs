// Expected usage: implement TokenKind for an enum whose variants encode all
// tokens of a language's microsyntax, then describe their patterns with an
// ordered rule list.

use std::fmt::Debug;
use std::hash::Hash;

// a kind is plain copyable data with a stable display name; EOF and UNKNOWN
// are required members because the tokenizer synthesizes both
pub trait TokenKind: Copy + Eq + Hash + Debug {
    fn name(self) -> &'static str;
    fn eof() -> Self;
    fn unknown() -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRule<K> {
    pub pattern: String,
    pub kind: K,
    pub priority: u32,
    pub ignore: bool,
}

// insertion order fixes priority: an earlier rule gets a lower value and
// wins equal-length matches
#[derive(Debug)]
pub struct RuleSetBuilder<K> {
    rules: Vec<LexicalRule<K>>,
    next_priority: u32,
}

impl<K: TokenKind> RuleSetBuilder<K> {
    pub fn new() -> RuleSetBuilder<K> {
        RuleSetBuilder {
            rules: Vec::new(),
            next_priority: 0,
        }
    }

    pub fn rule(mut self, pattern: &str, kind: K) -> Self {
        self.push(pattern, kind, false);
        self
    }

    // typically whitespace and comments
    pub fn ignored(mut self, pattern: &str, kind: K) -> Self {
        self.push(pattern, kind, true);
        self
    }

    fn push(&mut self, pattern: &str, kind: K, ignore: bool) {
        self.rules.push(LexicalRule {
            pattern: pattern.to_string(),
            kind,
            priority: self.next_priority,
            ignore,
        });
        self.next_priority += 1;
    }

    pub fn build(self) -> Vec<LexicalRule<K>> {
        self.rules
    }
}

impl<K: TokenKind> Default for RuleSetBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
