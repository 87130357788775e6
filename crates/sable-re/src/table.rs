use serde::{Deserialize, Serialize};

use crate::dfa::Dfa;
use crate::AsciiChar;

pub const INPUTS: usize = 128;

// dense row-major transition table for the scan loop; one extra implicit
// error state occupies the last row, so every lookup stays in bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfaTable {
    data: Vec<u32>,
    accepts: Vec<Option<(u32, u32)>>,
    states: u32,
    start: u32,
}

impl DfaTable {
    pub fn from_dfa(dfa: &Dfa) -> DfaTable {
        let states = dfa.states.len() as u32 + 1;
        let error = states - 1;

        let mut data = vec![error; states as usize * INPUTS];
        for (i, state) in dfa.states.iter().enumerate() {
            for &(c, to) in &state.transitions {
                data[i * INPUTS + c as usize] = to as u32;
            }
        }

        let mut accepts: Vec<Option<(u32, u32)>> = dfa
            .states
            .iter()
            .map(|s| s.accept.map(|a| (a.tag, a.priority)))
            .collect();
        accepts.push(None); // error row

        DfaTable {
            data,
            accepts,
            states,
            start: dfa.start as u32,
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn error_state(&self) -> u32 {
        self.states - 1
    }

    pub fn state_count(&self) -> u32 {
        self.states
    }

    pub fn next_state(&self, state: u32, c: AsciiChar) -> u32 {
        if (c as usize) >= INPUTS {
            return self.error_state();
        }
        self.data[state as usize * INPUTS + c as usize]
    }

    // (tag, priority) of an accepting state
    pub fn accept(&self, state: u32) -> Option<(u32, u32)> {
        self.accepts[state as usize]
    }
}
