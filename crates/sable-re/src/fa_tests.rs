use crate::dfa::Dfa;
use crate::nfa::{Accept, NfaBuilder};
use crate::postfix::ReOp;
use crate::preprocess::{Positioned, ReTok};

fn compile_pattern(re_str: &str) -> Dfa {
    let mut builder = NfaBuilder::new();
    let fragment = builder.add_pattern(re_str).expect("failed to parse regex");
    let nfa = builder.fuse(&[(
        fragment,
        Accept {
            tag: 0,
            priority: 0,
        },
    )]);
    Dfa::from_nfa(&nfa).minimize()
}

// rule index doubles as tag and priority, like a real ruleset would
fn compile_pattern_set(re_strs: &[&str]) -> (Dfa, Dfa) {
    let mut builder = NfaBuilder::new();
    let fragments: Vec<_> = re_strs
        .iter()
        .enumerate()
        .map(|(i, re)| {
            let fragment = builder.add_pattern(re).expect("failed to parse regex");
            (
                fragment,
                Accept {
                    tag: i as u32,
                    priority: i as u32,
                },
            )
        })
        .collect();
    let nfa = builder.fuse(&fragments);
    let dfa = Dfa::from_nfa(&nfa);
    let minimized = dfa.minimize();
    (dfa, minimized)
}

fn simulate(dfa: &Dfa, input: &str) -> Option<Accept> {
    let mut state = dfa.start();
    for &b in input.as_bytes() {
        match dfa.transition(state, b) {
            Some(next) => state = next,
            None => return None,
        }
    }
    dfa.accept(state)
}

fn run_vectors(tests: &[(&str, bool)], dfa: &Dfa, re_str: &str) {
    for (test, expected) in tests {
        let result = simulate(dfa, test).is_some();
        assert_eq!(
            result, *expected,
            "'{}' failed on input '{}', expect match: {}",
            re_str, test, expected
        );
    }
}

fn run_vectors_tagged(tests: &[(&str, i32)], dfa: &Dfa, re_strs: &[&str]) {
    for (test, expected) in tests {
        let tag = simulate(dfa, test).map(|a| a.tag as i32).unwrap_or(-1);
        assert_eq!(
            tag, *expected,
            "'{:?}' failed on input '{}', expected tag: {}",
            re_strs, test, expected
        );
    }
}

#[test]
fn basic() {
    let re_str = r"a(b|c)*";
    let dfa = compile_pattern(re_str);

    let test_vectors = [
        ("a", true),
        ("b", false),
        ("x", false),
        ("ab", true),
        ("ac", true),
        ("abcbc", true),
        ("acbcb", true),
        ("bcbc", false),
        ("abbbbbbbbbb", true),
    ];

    run_vectors(&test_vectors, &dfa, re_str);
}

#[test]
fn class_ranges() {
    let re_str = r"[a-fA-Z]+";
    let dfa = compile_pattern(re_str);

    let test_vectors = [
        ("a", true),
        ("b", true),
        ("x", false),
        ("ABCDEF", true),
        ("", false),
        ("g", false),
        ("GG", true),
        ("1234", false),
        ("qqqqq", false),
    ];

    run_vectors(&test_vectors, &dfa, re_str);
}

#[test]
fn optional_group() {
    let re_str = r"(a*b)?c";
    let dfa = compile_pattern(re_str);

    let test_vectors = [
        ("c", true),
        ("bc", true),
        ("aaabc", true),
        ("aaac", false),
        ("", false),
    ];

    run_vectors(&test_vectors, &dfa, re_str);
}

#[test]
fn floating_point() {
    let re_str = r"[\-+]?([0-9]*\.)?[0-9]+([eE][\-+]?[0-9]+)?";
    let dfa = compile_pattern(re_str);

    let test_vectors = [
        ("a", false),
        ("", false),
        ("1234", true),
        ("-99.99e12", true),
        ("-99.99e1a2", false),
        ("3..14", false),
        ("314.1592e-2", true),
    ];

    run_vectors(&test_vectors, &dfa, re_str);
}

#[test]
fn escape_shorthands() {
    run_vectors(
        &[("123", true), ("12a", false), ("", false)],
        &compile_pattern(r"\d+"),
        r"\d+",
    );
    run_vectors(
        &[("a_9Z", true), ("a-b", false)],
        &compile_pattern(r"\w+"),
        r"\w+",
    );
    run_vectors(
        &[(" \t\r\n", true), ("x", false)],
        &compile_pattern(r"\s+"),
        r"\s+",
    );
    // any other escape is the literal character
    run_vectors(&[("(", true), ("x", false)], &compile_pattern(r"\("), r"\(");
}

#[test]
fn dot_excludes_newline() {
    let re_str = r"a.b";
    let dfa = compile_pattern(re_str);

    let test_vectors = [("axb", true), ("a b", true), ("a\nb", false), ("ab", false)];

    run_vectors(&test_vectors, &dfa, re_str);
}

#[test]
fn negated_class() {
    let re_str = r#""[^"]*""#;
    let dfa = compile_pattern(re_str);

    let test_vectors = [
        ("\"\"", true),
        ("\"hello world\"", true),
        ("\"a\"b\"", false),
        ("\"unterminated", false),
    ];

    run_vectors(&test_vectors, &dfa, re_str);
}

#[test]
fn multiple_regex_priority() {
    let re_strs = [r"ab+", r"cd+", r"(cdd)|(ef)"];
    let (_, dfa) = compile_pattern_set(&re_strs);

    let test_vectors = [
        ("xx", -1),
        ("abbbbb", 0),
        ("cdd", 1),
        ("cd", 1),
        ("ef", 2),
        ("bad", -1),
    ];

    run_vectors_tagged(&test_vectors, &dfa, &re_strs);
}

#[test]
fn identical_patterns_lowest_priority_wins() {
    let re_strs = [r"abc", r"abc"];
    let (dfa, minimized) = compile_pattern_set(&re_strs);

    assert_eq!(simulate(&dfa, "abc").unwrap().tag, 0);
    assert_eq!(simulate(&minimized, "abc").unwrap().tag, 0);
}

#[test]
fn subset_accept_is_lowest_priority_origin() {
    // keyword vs identifier shape: both accept "if", rule 0 must win
    let re_strs = [r"if", r"[a-z]+"];
    let (dfa, _) = compile_pattern_set(&re_strs);

    assert_eq!(simulate(&dfa, "if").unwrap().tag, 0);
    assert_eq!(simulate(&dfa, "i").unwrap().tag, 1);
    assert_eq!(simulate(&dfa, "iff").unwrap().tag, 1);
}

fn prefix_accepts(dfa: &Dfa, input: &str) -> Vec<Option<u32>> {
    let mut out = Vec::new();
    let mut state = Some(dfa.start());
    for &b in input.as_bytes() {
        state = state.and_then(|s| dfa.transition(s, b));
        out.push(state.and_then(|s| dfa.accept(s)).map(|a| a.tag));
    }
    out
}

#[test]
fn minimization_preserves_accept_classes() {
    let re_strs = [r"if", r"[a-z]+", r"[0-9]+", r"\s+"];
    let (dfa, minimized) = compile_pattern_set(&re_strs);

    assert!(minimized.state_count() <= dfa.state_count());
    for input in ["if", "iff", "i", "42", "x9", "  \t", "if 42", "9a", ""] {
        assert_eq!(
            prefix_accepts(&dfa, input),
            prefix_accepts(&minimized, input),
            "prefix accepts diverged on '{}'",
            input
        );
    }
}

// rebuilds a fully parenthesized infix token stream from valid postfix;
// running the shunting yard over it must reproduce the operator sequence
fn to_infix(ops: &[ReOp]) -> Vec<Positioned> {
    fn tok(t: ReTok) -> Positioned {
        Positioned { tok: t, pos: 0 }
    }

    let mut stack: Vec<Vec<Positioned>> = Vec::new();
    for op in ops {
        match *op {
            ReOp::Char(c) => stack.push(vec![tok(ReTok::Atom(c))]),
            ReOp::Star | ReOp::Plus | ReOp::Opt => {
                let a = stack.pop().expect("valid postfix");
                let mut out = vec![tok(ReTok::LParen)];
                out.extend(a);
                out.push(tok(ReTok::RParen));
                out.push(tok(match *op {
                    ReOp::Star => ReTok::Star,
                    ReOp::Plus => ReTok::Plus,
                    _ => ReTok::Opt,
                }));
                stack.push(out);
            }
            ReOp::Concat | ReOp::Alt => {
                let b = stack.pop().expect("valid postfix");
                let a = stack.pop().expect("valid postfix");
                let mut out = vec![tok(ReTok::LParen)];
                out.extend(a);
                out.push(tok(ReTok::RParen));
                out.push(tok(if *op == ReOp::Concat {
                    ReTok::Concat
                } else {
                    ReTok::Alt
                }));
                out.push(tok(ReTok::LParen));
                out.extend(b);
                out.push(tok(ReTok::RParen));
                stack.push(out);
            }
        }
    }
    stack.pop().expect("valid postfix")
}

mod postfix_roundtrip {
    use proptest::prelude::*;

    use super::to_infix;
    use crate::postfix::{to_postfix, ReOp};

    fn arb_postfix() -> impl Strategy<Value = Vec<ReOp>> {
        let leaf = (32u8..=126).prop_map(|c| vec![ReOp::Char(c)]);
        leaf.prop_recursive(8, 64, 2, |inner| {
            prop_oneof![
                (
                    inner.clone(),
                    inner.clone(),
                    prop_oneof![Just(ReOp::Concat), Just(ReOp::Alt)]
                )
                    .prop_map(|(a, b, op)| {
                        let mut v = a;
                        v.extend(b);
                        v.push(op);
                        v
                    }),
                (
                    inner,
                    prop_oneof![Just(ReOp::Star), Just(ReOp::Plus), Just(ReOp::Opt)]
                )
                    .prop_map(|(a, op)| {
                        let mut v = a;
                        v.push(op);
                        v
                    }),
            ]
        })
    }

    proptest! {
        #[test]
        fn shunting_yard_inverts_to_infix(ops in arb_postfix()) {
            let infix = to_infix(&ops);
            let back: Vec<ReOp> = to_postfix(&infix)
                .unwrap()
                .into_iter()
                .map(|p| p.op)
                .collect();
            prop_assert_eq!(back, ops);
        }
    }
}

mod table {
    use super::compile_pattern_set;
    use crate::table::DfaTable;

    #[test]
    fn dense_table_agrees_with_dfa() {
        let (_, dfa) = compile_pattern_set(&[r"ab+", r"a"]);
        let table = DfaTable::from_dfa(&dfa);

        let walk = |input: &str| -> Option<(u32, u32)> {
            let mut state = table.start();
            for &b in input.as_bytes() {
                state = table.next_state(state, b);
                if state == table.error_state() {
                    return None;
                }
            }
            table.accept(state)
        };

        assert_eq!(walk("a").map(|a| a.0), Some(1));
        assert_eq!(walk("abbb").map(|a| a.0), Some(0));
        assert_eq!(walk("ba"), None);
        assert_eq!(walk("ab\u{7f}"), None);
    }
}
