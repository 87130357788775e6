use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, SymbolId, SymbolKind, DOLLAR};

// equality and ordering over all three fields; states are sorted item
// vectors, so they double as canonical map keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lr1Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: SymbolId,
}

// canonical LR(1) collection over the augmented grammar; only the LALR
// merge consumes it, the states are discarded afterwards
pub struct Lr1Automaton {
    pub grammar: Grammar,
    pub augmented_production: usize,
    pub states: Vec<Vec<Lr1Item>>,
    pub transitions: Vec<BTreeMap<SymbolId, usize>>,
}

impl Lr1Automaton {
    pub fn build(grammar: &Grammar) -> Lr1Automaton {
        let mut grammar = grammar.clone();
        let (_, augmented_production) = grammar.push_augmented(grammar.start());

        let first = FirstFollow::compute(&grammar);
        let productions_of = grammar.productions_of();

        let seed = BTreeSet::from([Lr1Item {
            production: augmented_production,
            dot: 0,
            lookahead: DOLLAR,
        }]);
        let initial = closure(&grammar, &first, &productions_of, seed);

        let mut states = vec![initial.clone()];
        let mut transitions: Vec<BTreeMap<SymbolId, usize>> = vec![BTreeMap::new()];
        let mut ids: HashMap<Vec<Lr1Item>, usize> = HashMap::new();
        ids.insert(initial, 0);

        let mut work: VecDeque<usize> = VecDeque::from([0]);
        while let Some(id) = work.pop_front() {
            let current = states[id].clone();
            // symbols in id order; ε and $ can never follow a dot
            for symbol in (DOLLAR + 1)..grammar.symbol_count() {
                let target = goto_set(&grammar, &first, &productions_of, &current, symbol);
                if target.is_empty() {
                    continue;
                }
                let target_id = match ids.get(&target) {
                    Some(&t) => t,
                    None => {
                        let t = states.len();
                        states.push(target.clone());
                        transitions.push(BTreeMap::new());
                        ids.insert(target, t);
                        work.push_back(t);
                        t
                    }
                };
                transitions[id].insert(symbol, target_id);
            }
        }

        Lr1Automaton {
            grammar,
            augmented_production,
            states,
            transitions,
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

// saturate under "dot before non-terminal": for [A -> α·Bβ, a] add
// [B -> ·γ, t] for every production of B and t ∈ FIRST(βa) \ {ε}
fn closure(
    grammar: &Grammar,
    first: &FirstFollow,
    productions_of: &[Vec<usize>],
    seed: BTreeSet<Lr1Item>,
) -> Vec<Lr1Item> {
    let mut items = seed;
    let mut work: VecDeque<Lr1Item> = items.iter().copied().collect();

    while let Some(item) = work.pop_front() {
        let rhs = grammar.rhs_symbols(item.production);
        let Some(&b) = rhs.get(item.dot) else {
            continue;
        };
        if grammar.symbol_kind(b) != SymbolKind::NonTerminal {
            continue;
        }

        let beta = &rhs[item.dot + 1..];
        let lookaheads = first.first_of_seq(beta, item.lookahead);
        for &production in &productions_of[b] {
            for lookahead in lookaheads.iter() {
                let new_item = Lr1Item {
                    production,
                    dot: 0,
                    lookahead,
                };
                if items.insert(new_item) {
                    work.push_back(new_item);
                }
            }
        }
    }

    items.into_iter().collect()
}

fn goto_set(
    grammar: &Grammar,
    first: &FirstFollow,
    productions_of: &[Vec<usize>],
    state: &[Lr1Item],
    symbol: SymbolId,
) -> Vec<Lr1Item> {
    let mut moved = BTreeSet::new();
    for item in state {
        if grammar.rhs_symbols(item.production).get(item.dot) == Some(&symbol) {
            moved.insert(Lr1Item {
                dot: item.dot + 1,
                ..*item
            });
        }
    }
    if moved.is_empty() {
        return Vec::new();
    }
    closure(grammar, first, productions_of, moved)
}
