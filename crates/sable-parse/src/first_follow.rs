use bit_set::BitSet;

use crate::grammar::{Grammar, SymbolId, SymbolKind, DOLLAR, EPSILON};

// set of symbol ids; ε membership drives the nullable chaining
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    bits: BitSet,
}

impl SymbolSet {
    pub fn new() -> SymbolSet {
        SymbolSet::default()
    }

    pub fn insert(&mut self, id: SymbolId) -> bool {
        self.bits.insert(id)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.bits.contains(id)
    }

    pub fn contains_epsilon(&self) -> bool {
        self.contains(EPSILON)
    }

    pub fn extend(&mut self, other: &SymbolSet) -> bool {
        let before = self.bits.len();
        self.bits.union_with(&other.bits);
        self.bits.len() != before
    }

    pub fn extend_without_epsilon(&mut self, other: &SymbolSet) -> bool {
        let before = self.bits.len();
        for id in other.bits.iter() {
            if id != EPSILON {
                self.bits.insert(id);
            }
        }
        self.bits.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.bits.iter()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

// FIRST and FOLLOW, fixed-point iterated until no set grows; both vectors
// are indexed by symbol id
pub struct FirstFollow {
    pub first: Vec<SymbolSet>,
    pub follow: Vec<SymbolSet>,
}

impl FirstFollow {
    pub fn compute(grammar: &Grammar) -> FirstFollow {
        let first = first_sets(grammar);
        let follow = follow_sets(grammar, &first);
        FirstFollow { first, follow }
    }

    // FIRST of a sentential tail followed by a lookahead terminal; the
    // result never contains ε
    pub fn first_of_seq(&self, seq: &[SymbolId], lookahead: SymbolId) -> SymbolSet {
        let mut result = SymbolSet::new();
        for &x in seq {
            result.extend_without_epsilon(&self.first[x]);
            if !self.first[x].contains_epsilon() {
                return result;
            }
        }
        result.extend_without_epsilon(&self.first[lookahead]);
        result
    }
}

fn first_sets(grammar: &Grammar) -> Vec<SymbolSet> {
    let n = grammar.symbol_count();
    let mut first = vec![SymbolSet::new(); n];
    // FIRST(t) = {t} for terminals, which also covers ε and $
    for id in 0..n {
        if grammar.symbol_kind(id) == SymbolKind::Terminal {
            first[id].insert(id);
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (pi, p) in grammar.productions().iter().enumerate() {
            let rhs = grammar.rhs_symbols(pi);

            let mut add = SymbolSet::new();
            let mut all_epsilon = true;
            for &x in rhs {
                add.extend_without_epsilon(&first[x]);
                if !first[x].contains_epsilon() {
                    all_epsilon = false;
                    break;
                }
            }
            if all_epsilon {
                add.insert(EPSILON);
            }
            changed |= first[p.lhs].extend(&add);
        }
    }
    first
}

fn follow_sets(grammar: &Grammar, first: &[SymbolSet]) -> Vec<SymbolSet> {
    let n = grammar.symbol_count();
    let mut follow = vec![SymbolSet::new(); n];
    follow[grammar.start()].insert(DOLLAR);

    let mut changed = true;
    while changed {
        changed = false;
        for (pi, p) in grammar.productions().iter().enumerate() {
            let rhs = grammar.rhs_symbols(pi);
            for (i, &x) in rhs.iter().enumerate() {
                if grammar.symbol_kind(x) != SymbolKind::NonTerminal {
                    continue;
                }

                let mut add = SymbolSet::new();
                let mut tail_epsilon = true;
                for &y in &rhs[i + 1..] {
                    add.extend_without_epsilon(&first[y]);
                    if !first[y].contains_epsilon() {
                        tail_epsilon = false;
                        break;
                    }
                }
                if tail_epsilon {
                    add.extend_without_epsilon(&follow[p.lhs]);
                }
                changed |= follow[x].extend(&add);
            }
        }
    }
    follow
}
