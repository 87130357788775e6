// pattern surface: literals, `| * + ? ( )`, classes `[...]` with ranges and
// leading `^` negation, `.` (any printable except newline), and escapes
// `\s \d \w` (any other `\c` is the literal c). everything desugars to
// atoms and the operator set below before the shunting yard runs.

use bit_set::BitSet;
use thiserror::Error;

use crate::AsciiChar;

// tokens after sugar expansion; escaped literals stay atoms so later passes
// never confuse them with operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReTok {
    Atom(AsciiChar),
    Alt,
    Concat,
    Star,
    Plus,
    Opt,
    LParen,
    RParen,
}

// every token remembers the byte offset in the source pattern it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positioned {
    pub tok: ReTok,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad regex at byte {position}: {reason}")]
pub struct BadRegex {
    pub position: usize,
    pub reason: BadRegexReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BadRegexReason {
    #[error("unmatched '('")]
    UnmatchedOpenParen,
    #[error("unmatched ')'")]
    UnmatchedCloseParen,
    #[error("operator is missing an operand")]
    MissingOperand,
    #[error("malformed character class")]
    MalformedClass,
    #[error("dangling escape")]
    DanglingEscape,
    #[error("pattern must be ascii")]
    NotAscii,
}

const PRINTABLE_LO: AsciiChar = 32;
const PRINTABLE_HI: AsciiChar = 126;

pub fn preprocess(pattern: &str) -> Result<Vec<Positioned>, BadRegex> {
    if !pattern.is_ascii() {
        let position = pattern
            .char_indices()
            .find(|(_, c)| !c.is_ascii())
            .map(|(i, _)| i)
            .unwrap_or(0);
        return Err(BadRegex {
            position,
            reason: BadRegexReason::NotAscii,
        });
    }

    let bytes = pattern.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let pos = i;
        match bytes[i] {
            b'\\' => {
                let Some(&code) = bytes.get(i + 1) else {
                    return Err(BadRegex {
                        position: pos,
                        reason: BadRegexReason::DanglingEscape,
                    });
                };
                i += 2;
                match code {
                    b's' => push_group(&mut out, pos, [b' ', b'\t', b'\n', b'\r'].into_iter()),
                    b'd' => push_group(&mut out, pos, b'0'..=b'9'),
                    b'w' => push_group(&mut out, pos, word_chars()),
                    other => out.push(Positioned {
                        tok: ReTok::Atom(other),
                        pos,
                    }),
                }
            }
            b'[' => i = expand_class(bytes, i, &mut out)?,
            b'.' => {
                push_group(
                    &mut out,
                    pos,
                    (PRINTABLE_LO..=PRINTABLE_HI).filter(|&c| c != b'\n'),
                );
                i += 1;
            }
            b'|' => {
                out.push(Positioned {
                    tok: ReTok::Alt,
                    pos,
                });
                i += 1;
            }
            b'*' => {
                out.push(Positioned {
                    tok: ReTok::Star,
                    pos,
                });
                i += 1;
            }
            b'+' => {
                out.push(Positioned {
                    tok: ReTok::Plus,
                    pos,
                });
                i += 1;
            }
            b'?' => {
                out.push(Positioned {
                    tok: ReTok::Opt,
                    pos,
                });
                i += 1;
            }
            b'(' => {
                out.push(Positioned {
                    tok: ReTok::LParen,
                    pos,
                });
                i += 1;
            }
            b')' => {
                out.push(Positioned {
                    tok: ReTok::RParen,
                    pos,
                });
                i += 1;
            }
            other => {
                out.push(Positioned {
                    tok: ReTok::Atom(other),
                    pos,
                });
                i += 1;
            }
        }
    }

    Ok(insert_concat(out))
}

fn word_chars() -> impl Iterator<Item = AsciiChar> {
    (b'a'..=b'z')
        .chain(b'A'..=b'Z')
        .chain(b'0'..=b'9')
        .chain(std::iter::once(b'_'))
}

// a set of alternatives becomes a parenthesized alternation so quantifiers
// bind to the whole group
fn push_group(out: &mut Vec<Positioned>, pos: usize, members: impl Iterator<Item = AsciiChar>) {
    out.push(Positioned {
        tok: ReTok::LParen,
        pos,
    });
    for (n, c) in members.enumerate() {
        if n > 0 {
            out.push(Positioned {
                tok: ReTok::Alt,
                pos,
            });
        }
        out.push(Positioned {
            tok: ReTok::Atom(c),
            pos,
        });
    }
    out.push(Positioned {
        tok: ReTok::RParen,
        pos,
    });
}

// `[...]` starting at bytes[start]; returns the index past the closing ']'
fn expand_class(
    bytes: &[u8],
    start: usize,
    out: &mut Vec<Positioned>,
) -> Result<usize, BadRegex> {
    let malformed = BadRegex {
        position: start,
        reason: BadRegexReason::MalformedClass,
    };

    let mut i = start + 1;
    let negated = bytes.get(i) == Some(&b'^');
    if negated {
        i += 1;
    }

    let mut members = BitSet::with_capacity(128);
    let mut closed = false;
    while i < bytes.len() {
        if bytes[i] == b']' {
            closed = true;
            i += 1;
            break;
        }
        let (lo, next) = class_char(bytes, i, malformed)?;
        i = next;
        // `a-z` is a range unless the '-' is the last member
        if bytes.get(i) == Some(&b'-') && bytes.get(i + 1).is_some_and(|&c| c != b']') {
            let (hi, next) = class_char(bytes, i + 1, malformed)?;
            i = next;
            if lo > hi {
                return Err(malformed);
            }
            for c in lo..=hi {
                members.insert(c as usize);
            }
        } else {
            members.insert(lo as usize);
        }
    }
    if !closed {
        return Err(malformed);
    }

    if negated {
        let mut inverted = BitSet::with_capacity(128);
        for c in PRINTABLE_LO..=PRINTABLE_HI {
            if !members.contains(c as usize) {
                inverted.insert(c as usize);
            }
        }
        members = inverted;
    }
    if members.is_empty() {
        return Err(malformed);
    }

    push_group(out, start, members.iter().map(|c| c as AsciiChar));
    Ok(i)
}

fn class_char(bytes: &[u8], i: usize, malformed: BadRegex) -> Result<(AsciiChar, usize), BadRegex> {
    match bytes[i] {
        b'\\' => match bytes.get(i + 1) {
            Some(&c) => Ok((c, i + 2)),
            None => Err(malformed),
        },
        c => Ok((c, i + 1)),
    }
}

// make implicit concatenation explicit: between atom/')'/postfix on the
// left and atom/'(' on the right
fn insert_concat(tokens: Vec<Positioned>) -> Vec<Positioned> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    for (i, t) in tokens.iter().enumerate() {
        out.push(*t);
        let Some(next) = tokens.get(i + 1) else {
            continue;
        };
        let left = matches!(
            t.tok,
            ReTok::Atom(_) | ReTok::RParen | ReTok::Star | ReTok::Plus | ReTok::Opt
        );
        let right = matches!(next.tok, ReTok::Atom(_) | ReTok::LParen);
        if left && right {
            out.push(Positioned {
                tok: ReTok::Concat,
                pos: next.pos,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(tokens: &[Positioned]) -> Vec<ReTok> {
        tokens.iter().map(|t| t.tok).collect()
    }

    #[test]
    fn concat_is_made_explicit() {
        let tokens = preprocess("ab").unwrap();
        assert_eq!(
            atoms(&tokens),
            vec![ReTok::Atom(b'a'), ReTok::Concat, ReTok::Atom(b'b')]
        );
    }

    #[test]
    fn escaped_paren_stays_an_atom() {
        let tokens = preprocess(r"\(").unwrap();
        assert_eq!(atoms(&tokens), vec![ReTok::Atom(b'(')]);
    }

    #[test]
    fn class_expands_to_alternation() {
        let tokens = preprocess("[ab]").unwrap();
        assert_eq!(
            atoms(&tokens),
            vec![
                ReTok::LParen,
                ReTok::Atom(b'a'),
                ReTok::Alt,
                ReTok::Atom(b'b'),
                ReTok::RParen
            ]
        );
    }

    #[test]
    fn negated_class_excludes_members() {
        let tokens = preprocess("[^a]").unwrap();
        let has = |c: u8| tokens.iter().any(|t| t.tok == ReTok::Atom(c));
        assert!(!has(b'a'));
        assert!(has(b'b'));
        assert!(has(b'~'));
        // negation is against printable ascii only
        assert!(!has(b'\n'));
    }

    #[test]
    fn trailing_dash_is_a_literal() {
        let tokens = preprocess("[a-]").unwrap();
        let has = |c: u8| tokens.iter().any(|t| t.tok == ReTok::Atom(c));
        assert!(has(b'a'));
        assert!(has(b'-'));
        assert!(!has(b'b'));
    }

    #[test]
    fn malformed_classes_are_rejected() {
        for pattern in ["[", "[]", "[z-a]", "[^ -~]"] {
            let err = preprocess(pattern).unwrap_err();
            assert_eq!(err.reason, BadRegexReason::MalformedClass, "{pattern}");
        }
    }

    #[test]
    fn dangling_escape_is_rejected() {
        let err = preprocess("a\\").unwrap_err();
        assert_eq!(err.reason, BadRegexReason::DanglingEscape);
        assert_eq!(err.position, 1);
    }

    #[test]
    fn non_ascii_pattern_is_rejected() {
        let err = preprocess("a·b").unwrap_err();
        assert_eq!(err.reason, BadRegexReason::NotAscii);
    }
}
