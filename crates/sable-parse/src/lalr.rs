use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::grammar::{Grammar, SymbolId, SymbolKind, DOLLAR};
use crate::lr1::{Lr1Automaton, Lr1Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

// recorded during table fill, never raised; the first action written to a
// cell stays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConflict {
    pub state: usize,
    pub symbol: String,
    pub kind: ConflictKind,
}

impl fmt::Display for TableConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::ShiftReduce => {
                write!(f, "state {}: shift/reduce on {}", self.state, self.symbol)
            }
            ConflictKind::ReduceReduce => {
                write!(f, "state {}: reduce/reduce on {}", self.state, self.symbol)
            }
        }
    }
}

// merged LALR(1) states plus the ACTION/GOTO tables; owns the augmented
// grammar so reductions can be interpreted without the caller's copy
pub struct LalrTable {
    pub(crate) grammar: Grammar,
    states: Vec<Vec<Lr1Item>>,
    action: Vec<BTreeMap<SymbolId, Action>>,
    goto_: Vec<BTreeMap<SymbolId, usize>>,
    start_state: usize,
    conflicts: Vec<TableConflict>,
}

impl LalrTable {
    pub fn build(grammar: &Grammar) -> LalrTable {
        Self::from_lr1(Lr1Automaton::build(grammar))
    }

    fn from_lr1(lr1: Lr1Automaton) -> LalrTable {
        // group LR(1) states sharing a kernel; first appearance in state-id
        // order fixes the merged numbering
        let mut kernel_ids: HashMap<Vec<(usize, usize)>, usize> = HashMap::new();
        let mut lr1_to_lalr = Vec::with_capacity(lr1.states.len());
        let mut merged: Vec<Vec<Lr1Item>> = Vec::new();
        for state in &lr1.states {
            let kernel = kernel_of(state);
            let id = *kernel_ids.entry(kernel).or_insert_with(|| {
                merged.push(Vec::new());
                merged.len() - 1
            });
            merge_items(&mut merged[id], state);
            lr1_to_lalr.push(id);
        }
        let states = merged;

        // transitions lift through the group map; same-kernel states step
        // to same-kernel targets, so the insert is conflict-free
        let mut transitions: Vec<BTreeMap<SymbolId, usize>> = vec![BTreeMap::new(); states.len()];
        for (i, state_transitions) in lr1.transitions.iter().enumerate() {
            for (&symbol, &j) in state_transitions {
                let previous = transitions[lr1_to_lalr[i]].insert(symbol, lr1_to_lalr[j]);
                debug_assert!(previous.map_or(true, |p| p == lr1_to_lalr[j]));
            }
        }

        let grammar = lr1.grammar;
        let augmented_production = lr1.augmented_production;
        let start_state = lr1_to_lalr[0];

        let mut action: Vec<BTreeMap<SymbolId, Action>> = vec![BTreeMap::new(); states.len()];
        let mut goto_: Vec<BTreeMap<SymbolId, usize>> = vec![BTreeMap::new(); states.len()];
        let mut conflicts = Vec::new();

        for (s, items) in states.iter().enumerate() {
            for item in items {
                let rhs = grammar.rhs_symbols(item.production);
                match rhs.get(item.dot) {
                    Some(&x) if grammar.symbol_kind(x) == SymbolKind::Terminal => {
                        if let Some(&target) = transitions[s].get(&x) {
                            insert_action(
                                &mut action,
                                &mut conflicts,
                                &grammar,
                                s,
                                x,
                                Action::Shift(target),
                            );
                        }
                    }
                    Some(_) => {} // non-terminal after the dot: handled by GOTO
                    None => {
                        if item.production == augmented_production {
                            insert_action(
                                &mut action,
                                &mut conflicts,
                                &grammar,
                                s,
                                DOLLAR,
                                Action::Accept,
                            );
                        } else {
                            insert_action(
                                &mut action,
                                &mut conflicts,
                                &grammar,
                                s,
                                item.lookahead,
                                Action::Reduce(item.production),
                            );
                        }
                    }
                }
            }
            for (&symbol, &target) in &transitions[s] {
                if grammar.symbol_kind(symbol) == SymbolKind::NonTerminal {
                    goto_[s].insert(symbol, target);
                }
            }
        }

        LalrTable {
            grammar,
            states,
            action,
            goto_,
            start_state,
            conflicts,
        }
    }

    pub fn start_state(&self) -> usize {
        self.start_state
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn conflicts(&self) -> &[TableConflict] {
        &self.conflicts
    }

    pub fn action(&self, state: usize, terminal: SymbolId) -> Option<Action> {
        self.action[state].get(&terminal).copied()
    }

    pub fn goto(&self, state: usize, non_terminal: SymbolId) -> Option<usize> {
        self.goto_[state].get(&non_terminal).copied()
    }

    pub fn terminal_id(&self, name: &str) -> Option<SymbolId> {
        self.grammar
            .symbol_id(name)
            .filter(|&id| self.grammar.symbol_kind(id) == SymbolKind::Terminal)
    }
}

// the kernel ignores lookaheads
fn kernel_of(state: &[Lr1Item]) -> Vec<(usize, usize)> {
    let mut kernel: Vec<(usize, usize)> = state
        .iter()
        .map(|item| (item.production, item.dot))
        .collect();
    kernel.dedup(); // items are sorted, duplicates are adjacent
    kernel
}

// union of sorted item vectors; lookaheads merge as separate item records
fn merge_items(into: &mut Vec<Lr1Item>, items: &[Lr1Item]) {
    into.extend_from_slice(items);
    into.sort();
    into.dedup();
}

fn insert_action(
    action: &mut [BTreeMap<SymbolId, Action>],
    conflicts: &mut Vec<TableConflict>,
    grammar: &Grammar,
    state: usize,
    symbol: SymbolId,
    new: Action,
) {
    match action[state].get(&symbol) {
        None => {
            action[state].insert(symbol, new);
        }
        Some(&existing) if existing == new => {}
        Some(&existing) => {
            let kind = match (existing, new) {
                (Action::Shift(_), _) | (_, Action::Shift(_)) => ConflictKind::ShiftReduce,
                _ => ConflictKind::ReduceReduce,
            };
            conflicts.push(TableConflict {
                state,
                symbol: grammar.symbol_name(symbol).to_string(),
                kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn conflict_free_grammar_reports_none() {
        let grammar = Grammar::from_text(
            "E -> E + T | T\n\
             T -> T * F | F\n\
             F -> ( E ) | id\n",
        )
        .unwrap();
        let table = LalrTable::build(&grammar);
        assert!(table.conflicts().is_empty());
    }

    #[test]
    fn merge_shrinks_the_canonical_collection() {
        let grammar = Grammar::from_text(
            "E -> E + T | T\n\
             T -> T * F | F\n\
             F -> ( E ) | id\n",
        )
        .unwrap();
        let lr1 = Lr1Automaton::build(&grammar);
        let lr1_count = lr1.state_count();
        let table = LalrTable::from_lr1(lr1);
        assert!(table.state_count() < lr1_count);
    }

    #[test]
    fn reduce_reduce_conflict_is_recorded() {
        let grammar = Grammar::from_text(
            "S -> A | B\n\
             A -> a\n\
             B -> a\n",
        )
        .unwrap();
        let table = LalrTable::build(&grammar);
        assert_eq!(table.conflicts().len(), 1);
        let conflict = &table.conflicts()[0];
        assert_eq!(conflict.kind, ConflictKind::ReduceReduce);
        assert_eq!(conflict.symbol, "$");
        assert!(conflict.to_string().contains("reduce/reduce on $"));
    }

    #[test]
    fn dangling_else_is_a_shift_reduce_conflict() {
        let grammar = Grammar::from_text("S -> i S e S | i S | x\n").unwrap();
        let table = LalrTable::build(&grammar);
        assert!(table
            .conflicts()
            .iter()
            .any(|c| c.kind == ConflictKind::ShiftReduce && c.symbol == "e"));
    }

    // the textbook grammar that is LR(1) but not LALR(1): merging the
    // same-kernel states manufactures a reduce/reduce conflict
    #[test]
    fn lalr_merge_can_introduce_reduce_reduce_conflicts() {
        let grammar = Grammar::from_text(
            "S -> a A d | b B d | a B e | b A e\n\
             A -> c\n\
             B -> c\n",
        )
        .unwrap();

        let table = LalrTable::build(&grammar);
        assert!(table
            .conflicts()
            .iter()
            .any(|c| c.kind == ConflictKind::ReduceReduce));
    }
}
