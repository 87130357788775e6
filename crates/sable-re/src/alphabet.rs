use bit_set::BitSet;

use crate::AsciiChar;

// live input bytes for subset construction: common whitespace and the
// printable range, extended with any literal byte seen in a rule pattern
#[derive(Debug, Clone)]
pub struct Alphabet {
    set: BitSet,
}

impl Alphabet {
    pub fn core() -> Alphabet {
        let mut set = BitSet::with_capacity(128);
        set.insert(b'\t' as usize);
        set.insert(b'\n' as usize);
        set.insert(b'\r' as usize);
        for c in 32..=126 {
            set.insert(c);
        }
        Alphabet { set }
    }

    pub fn insert(&mut self, c: AsciiChar) {
        if c < 128 {
            self.set.insert(c as usize);
        }
    }

    pub fn contains(&self, c: AsciiChar) -> bool {
        c < 128 && self.set.contains(c as usize)
    }

    // ascending byte order keeps every construction pass deterministic
    pub fn iter(&self) -> impl Iterator<Item = AsciiChar> + '_ {
        self.set.iter().map(|c| c as AsciiChar)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
