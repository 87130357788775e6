mod mini_c;
mod rules;
mod token;
mod tokenizer;

pub use mini_c::{mini_c_rules, MiniCKind};
pub use rules::{LexicalRule, RuleSetBuilder, TokenKind};
pub use token::Token;
pub use tokenizer::{BuildError, Tokenizer, TokenizerOptions};
