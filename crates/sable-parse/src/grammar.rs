use std::collections::HashMap;

use thiserror::Error;

// everything is interned to indices; it is simpler and makes set-keyed
// lookups cheap
pub type SymbolId = usize;

// reserved terminals, interned first by every builder
pub const EPSILON: SymbolId = 0;
pub const DOLLAR: SymbolId = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

#[derive(Debug, Clone)]
struct SymbolInfo {
    name: String,
    kind: SymbolKind,
}

// an empty production is stored with an [ε] body; `rhs_symbols` hides that
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: Vec<SymbolInfo>,
    by_name: HashMap<String, SymbolId>,
    productions: Vec<Production>,
    start: SymbolId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("non-terminal '{0}' appears on a right-hand side but has no production")]
    UndefinedNonTerminal(String),
    #[error("start symbol '{0}' has no production")]
    NoStartProduction(String),
    #[error("no start symbol set")]
    NoStartSymbol,
    #[error("symbol '{0}' is used as both a terminal and a non-terminal")]
    KindMismatch(String),
    #[error("malformed grammar text: {0}")]
    Malformed(String),
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    // line-oriented BNF: `Lhs -> sym sym | other | ε`, one non-terminal per
    // line, '#' comments. the first lhs is the start symbol; a symbol that
    // never appears on a lhs is a terminal.
    pub fn from_text(text: &str) -> Result<Grammar, GrammarError> {
        let mut rules: Vec<(&str, Vec<Vec<&str>>)> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (lhs, rest) = line
                .split_once("->")
                .ok_or_else(|| GrammarError::Malformed(format!("missing '->' in '{line}'")))?;
            let lhs = lhs.trim();
            if lhs.is_empty() || lhs.split_whitespace().count() != 1 {
                return Err(GrammarError::Malformed(format!(
                    "expected a single symbol left of '->' in '{line}'"
                )));
            }
            let alternatives = rest
                .split('|')
                .map(|alt| alt.split_whitespace().collect())
                .collect();
            rules.push((lhs, alternatives));
        }
        if rules.is_empty() {
            return Err(GrammarError::Malformed("no rules".to_string()));
        }

        let mut builder = Grammar::builder();
        let heads: Vec<&str> = rules.iter().map(|(lhs, _)| *lhs).collect();
        let start = builder.non_terminal(rules[0].0);
        builder.set_start(start);
        for (lhs, alternatives) in &rules {
            let lhs_id = builder.non_terminal(lhs);
            for alt in alternatives {
                let mut rhs = Vec::with_capacity(alt.len());
                for sym in alt {
                    let id = if *sym == "ε" {
                        EPSILON
                    } else if heads.contains(sym) {
                        builder.non_terminal(sym)
                    } else {
                        builder.terminal(sym)
                    };
                    rhs.push(id);
                }
                builder.add_production(lhs_id, rhs);
            }
        }
        builder.build()
    }

    pub fn start(&self) -> SymbolId {
        self.start
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        &self.symbols[id].name
    }

    pub fn symbol_kind(&self, id: SymbolId) -> SymbolKind {
        self.symbols[id].kind
    }

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    // the effective body: empty for an ε-production
    pub fn rhs_symbols(&self, production: usize) -> &[SymbolId] {
        let rhs = &self.productions[production].rhs;
        if rhs.len() == 1 && rhs[0] == EPSILON {
            &[]
        } else {
            rhs
        }
    }

    // production indices grouped by their lhs
    pub(crate) fn productions_of(&self) -> Vec<Vec<usize>> {
        let mut map: Vec<Vec<usize>> = vec![Vec::new(); self.symbols.len()];
        for (i, p) in self.productions.iter().enumerate() {
            map[p.lhs].push(i);
        }
        map
    }

    // used when augmenting: a fresh non-terminal plus its production
    pub(crate) fn push_augmented(&mut self, start: SymbolId) -> (SymbolId, usize) {
        let mut name = format!("{}'", self.symbols[start].name);
        while self.by_name.contains_key(&name) {
            name.push('\'');
        }
        let id = self.symbols.len();
        self.symbols.push(SymbolInfo {
            name: name.clone(),
            kind: SymbolKind::NonTerminal,
        });
        self.by_name.insert(name, id);
        self.productions.push(Production {
            lhs: id,
            rhs: vec![start],
        });
        (id, self.productions.len() - 1)
    }
}

pub struct GrammarBuilder {
    symbols: Vec<SymbolInfo>,
    by_name: HashMap<String, SymbolId>,
    productions: Vec<Production>,
    start: Option<SymbolId>,
    mismatch: Option<String>,
}

impl GrammarBuilder {
    fn new() -> GrammarBuilder {
        let mut builder = GrammarBuilder {
            symbols: Vec::new(),
            by_name: HashMap::new(),
            productions: Vec::new(),
            start: None,
            mismatch: None,
        };
        builder.intern("ε", SymbolKind::Terminal);
        builder.intern("$", SymbolKind::Terminal);
        builder
    }

    fn intern(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        match self.by_name.get(name) {
            Some(&id) => {
                if self.symbols[id].kind != kind && self.mismatch.is_none() {
                    self.mismatch = Some(name.to_string());
                }
                id
            }
            None => {
                let id = self.symbols.len();
                self.symbols.push(SymbolInfo {
                    name: name.to_string(),
                    kind,
                });
                self.by_name.insert(name.to_string(), id);
                id
            }
        }
    }

    pub fn terminal(&mut self, name: &str) -> SymbolId {
        self.intern(name, SymbolKind::Terminal)
    }

    pub fn non_terminal(&mut self, name: &str) -> SymbolId {
        self.intern(name, SymbolKind::NonTerminal)
    }

    pub fn set_start(&mut self, start: SymbolId) {
        self.start = Some(start);
    }

    pub fn add_production(&mut self, lhs: SymbolId, rhs: Vec<SymbolId>) {
        let mut rhs: Vec<SymbolId> = rhs.into_iter().filter(|&s| s != EPSILON).collect();
        if rhs.is_empty() {
            rhs.push(EPSILON);
        }
        self.productions.push(Production { lhs, rhs });
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(name) = self.mismatch {
            return Err(GrammarError::KindMismatch(name));
        }
        let start = self.start.ok_or(GrammarError::NoStartSymbol)?;

        let mut has_production = vec![false; self.symbols.len()];
        for p in &self.productions {
            if self.symbols[p.lhs].kind != SymbolKind::NonTerminal {
                return Err(GrammarError::KindMismatch(self.symbols[p.lhs].name.clone()));
            }
            has_production[p.lhs] = true;
        }
        for p in &self.productions {
            for &s in &p.rhs {
                if self.symbols[s].kind == SymbolKind::NonTerminal && !has_production[s] {
                    return Err(GrammarError::UndefinedNonTerminal(
                        self.symbols[s].name.clone(),
                    ));
                }
            }
        }
        if !has_production[start] {
            return Err(GrammarError::NoStartProduction(
                self.symbols[start].name.clone(),
            ));
        }

        Ok(Grammar {
            symbols: self.symbols,
            by_name: self.by_name,
            productions: self.productions,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_classifies_symbols() {
        let grammar = Grammar::from_text(
            "E -> E + T | T\n\
             T -> T * F | F\n\
             F -> ( E ) | id\n",
        )
        .unwrap();

        assert_eq!(grammar.symbol_name(grammar.start()), "E");
        assert_eq!(
            grammar.symbol_kind(grammar.symbol_id("T").unwrap()),
            SymbolKind::NonTerminal
        );
        assert_eq!(
            grammar.symbol_kind(grammar.symbol_id("id").unwrap()),
            SymbolKind::Terminal
        );
        assert_eq!(grammar.productions().len(), 6);
    }

    #[test]
    fn epsilon_alternative_is_an_empty_production() {
        let grammar = Grammar::from_text("S -> a S | ε\n").unwrap();
        assert_eq!(grammar.rhs_symbols(1), &[] as &[SymbolId]);
        assert_eq!(grammar.productions()[1].rhs, vec![EPSILON]);
    }

    #[test]
    fn undefined_non_terminal_is_rejected() {
        let mut builder = Grammar::builder();
        let s = builder.non_terminal("S");
        let x = builder.non_terminal("X");
        builder.set_start(s);
        builder.add_production(s, vec![x]);
        assert_eq!(
            builder.build().unwrap_err(),
            GrammarError::UndefinedNonTerminal("X".to_string())
        );
    }

    #[test]
    fn start_without_production_is_rejected() {
        let mut builder = Grammar::builder();
        let s = builder.non_terminal("S");
        let a = builder.non_terminal("A");
        let t = builder.terminal("t");
        builder.set_start(s);
        builder.add_production(a, vec![t]);
        assert_eq!(
            builder.build().unwrap_err(),
            GrammarError::NoStartProduction("S".to_string())
        );
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut builder = Grammar::builder();
        let s = builder.non_terminal("S");
        let a = builder.terminal("a");
        builder.non_terminal("a");
        builder.set_start(s);
        builder.add_production(s, vec![a]);
        assert_eq!(
            builder.build().unwrap_err(),
            GrammarError::KindMismatch("a".to_string())
        );
    }
}
