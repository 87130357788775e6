use crate::alphabet::Alphabet;
use crate::postfix::{to_postfix, PostfixOp, ReOp};
use crate::preprocess::{preprocess, BadRegex, BadRegexReason};
use crate::AsciiChar;

// pointer-based graphs in safe rust are awkward, so states live in an arena
// and transitions hold indices; a `None` label is an epsilon edge
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub(crate) transitions: Vec<(Option<AsciiChar>, usize)>,
    pub(crate) accept: Option<Accept>,
}

// accept class carried from rule ends through subset construction and
// minimization; a lower priority value wins ties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accept {
    pub tag: u32,
    pub priority: u32,
}

// thompson fragment: single entry, single exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug)]
pub struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) start: usize,
    pub(crate) alphabet: Alphabet,
}

impl Nfa {
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

// one builder per construction: state ids are arena offsets, so nothing
// leaks between builds
#[derive(Debug)]
pub struct NfaBuilder {
    states: Vec<NfaState>,
    alphabet: Alphabet,
}

impl NfaBuilder {
    pub fn new() -> NfaBuilder {
        NfaBuilder {
            states: Vec::new(),
            alphabet: Alphabet::core(),
        }
    }

    fn state(&mut self) -> usize {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    fn edge(&mut self, from: usize, label: Option<AsciiChar>, to: usize) {
        self.states[from].transitions.push((label, to));
    }

    pub fn add_pattern(&mut self, pattern: &str) -> Result<Fragment, BadRegex> {
        let tokens = preprocess(pattern)?;
        let postfix = to_postfix(&tokens)?;
        self.thompson(&postfix, pattern.len())
    }

    // fallback for patterns that refuse to compile: match them byte for byte
    pub fn add_literal(&mut self, pattern: &str) -> Fragment {
        let start = self.state();
        let mut current = start;
        for &b in pattern.as_bytes() {
            let next = self.state();
            self.edge(current, Some(b), next);
            self.alphabet.insert(b);
            current = next;
        }
        Fragment {
            start,
            end: current,
        }
    }

    fn thompson(&mut self, postfix: &[PostfixOp], end_pos: usize) -> Result<Fragment, BadRegex> {
        fn pop(stack: &mut Vec<Fragment>, pos: usize) -> Result<Fragment, BadRegex> {
            stack.pop().ok_or(BadRegex {
                position: pos,
                reason: BadRegexReason::MissingOperand,
            })
        }

        let mut stack: Vec<Fragment> = Vec::new();
        for op in postfix {
            match op.op {
                ReOp::Char(c) => {
                    let start = self.state();
                    let end = self.state();
                    self.edge(start, Some(c), end);
                    self.alphabet.insert(c);
                    stack.push(Fragment { start, end });
                }
                ReOp::Concat => {
                    let b = pop(&mut stack, op.pos)?;
                    let a = pop(&mut stack, op.pos)?;
                    self.edge(a.end, None, b.start);
                    stack.push(Fragment {
                        start: a.start,
                        end: b.end,
                    });
                }
                ReOp::Alt => {
                    let b = pop(&mut stack, op.pos)?;
                    let a = pop(&mut stack, op.pos)?;
                    let start = self.state();
                    let end = self.state();
                    self.edge(start, None, a.start);
                    self.edge(start, None, b.start);
                    self.edge(a.end, None, end);
                    self.edge(b.end, None, end);
                    stack.push(Fragment { start, end });
                }
                ReOp::Star => {
                    let a = pop(&mut stack, op.pos)?;
                    let start = self.state();
                    let end = self.state();
                    self.edge(start, None, a.start);
                    self.edge(start, None, end);
                    self.edge(a.end, None, a.start);
                    self.edge(a.end, None, end);
                    stack.push(Fragment { start, end });
                }
                ReOp::Plus => {
                    // star without the empty bypass
                    let a = pop(&mut stack, op.pos)?;
                    let start = self.state();
                    let end = self.state();
                    self.edge(start, None, a.start);
                    self.edge(a.end, None, a.start);
                    self.edge(a.end, None, end);
                    stack.push(Fragment { start, end });
                }
                ReOp::Opt => {
                    // star without the loop back
                    let a = pop(&mut stack, op.pos)?;
                    let start = self.state();
                    let end = self.state();
                    self.edge(start, None, a.start);
                    self.edge(start, None, end);
                    self.edge(a.end, None, end);
                    stack.push(Fragment { start, end });
                }
            }
        }

        if stack.len() != 1 {
            return Err(BadRegex {
                position: end_pos,
                reason: BadRegexReason::MissingOperand,
            });
        }
        Ok(stack.pop().expect("stack holds exactly one fragment"))
    }

    // wire a fresh common start to every rule fragment and annotate the
    // fragment ends with their accept class
    pub fn fuse(mut self, rules: &[(Fragment, Accept)]) -> Nfa {
        let start = self.state();
        for &(fragment, accept) in rules {
            self.states[fragment.end].accept = Some(accept);
            self.edge(start, None, fragment.start);
        }
        Nfa {
            states: self.states,
            start,
            alphabet: self.alphabet,
        }
    }
}

impl Default for NfaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
