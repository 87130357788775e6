mod driver;
mod first_follow;
mod grammar;
mod lalr;
mod lr1;

pub use driver::SyntaxError;
pub use first_follow::{FirstFollow, SymbolSet};
pub use grammar::{
    Grammar, GrammarBuilder, GrammarError, Production, SymbolId, SymbolKind, DOLLAR, EPSILON,
};
pub use lalr::{Action, ConflictKind, LalrTable, TableConflict};
pub use lr1::{Lr1Automaton, Lr1Item};

pub fn build_table(grammar: &Grammar) -> LalrTable {
    LalrTable::build(grammar)
}
