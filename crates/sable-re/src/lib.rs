mod alphabet;
mod dfa;
mod minimize;
mod nfa;
mod postfix;
mod preprocess;
mod table;

#[cfg(test)]
mod fa_tests;

pub type AsciiChar = u8;

pub use alphabet::Alphabet;
pub use dfa::Dfa;
pub use nfa::{Accept, Fragment, Nfa, NfaBuilder};
pub use postfix::{to_postfix, PostfixOp, ReOp};
pub use preprocess::{preprocess, BadRegex, BadRegexReason, Positioned, ReTok};
pub use table::DfaTable;
