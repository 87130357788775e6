use std::collections::HashMap;

use crate::dfa::{Dfa, DfaState};

// table-filling minimization. two states start out distinguishable when
// their accept classes differ (finality or tag); pairs are then marked
// whenever some byte sends them to a marked pair or to diverging
// presence/absence of a transition. the unmarked relation is an
// equivalence, collapsed with union-find.
impl Dfa {
    pub fn minimize(&self) -> Dfa {
        let n = self.states.len();
        let idx = |i: usize, j: usize| i * n + j; // callers keep i < j
        let mut marked = vec![false; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let distinct = match (self.states[i].accept, self.states[j].accept) {
                    (Some(a), Some(b)) => a.tag != b.tag,
                    (None, None) => false,
                    _ => true,
                };
                if distinct {
                    marked[idx(i, j)] = true;
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    if marked[idx(i, j)] {
                        continue;
                    }
                    for c in self.alphabet.iter() {
                        let distinct = match (self.transition(i, c), self.transition(j, c)) {
                            (None, None) => false,
                            (Some(x), Some(y)) => {
                                x != y && {
                                    let (lo, hi) = if x < y { (x, y) } else { (y, x) };
                                    marked[idx(lo, hi)]
                                }
                            }
                            _ => true,
                        };
                        if distinct {
                            marked[idx(i, j)] = true;
                            changed = true;
                            break;
                        }
                    }
                }
            }
        }

        let mut parent: Vec<usize> = (0..n).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                if !marked[idx(i, j)] {
                    union(&mut parent, i, j);
                }
            }
        }

        // classes numbered by first member, keeping the result deterministic
        let mut class_of = vec![usize::MAX; n];
        let mut members_of: Vec<Vec<usize>> = Vec::new();
        let mut root_class: HashMap<usize, usize> = HashMap::new();
        for s in 0..n {
            let root = find(&mut parent, s);
            let class = *root_class.entry(root).or_insert_with(|| {
                members_of.push(Vec::new());
                members_of.len() - 1
            });
            class_of[s] = class;
            members_of[class].push(s);
        }

        let states = members_of
            .iter()
            .map(|members| {
                // members agree on transition shape up to equivalence, so
                // any representative works
                let repr = members[0];
                let transitions = self.states[repr]
                    .transitions
                    .iter()
                    .map(|&(c, to)| (c, class_of[to]))
                    .collect();
                let accept = members
                    .iter()
                    .filter_map(|&m| self.states[m].accept)
                    .min_by_key(|a| a.priority);
                DfaState {
                    transitions,
                    accept,
                }
            })
            .collect();

        Dfa {
            states,
            start: class_of[self.start],
            alphabet: self.alphabet.clone(),
        }
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // smaller root wins so class numbering follows original state order
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi] = lo;
    }
}
