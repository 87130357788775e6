use crate::preprocess::{BadRegex, BadRegexReason, Positioned, ReTok};
use crate::AsciiChar;

// postfix program consumed by the thompson builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReOp {
    Char(AsciiChar),
    Concat,
    Alt,
    Star,
    Plus,
    Opt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostfixOp {
    pub op: ReOp,
    pub pos: usize,
}

fn precedence(tok: ReTok) -> u8 {
    match tok {
        ReTok::Alt => 1,
        ReTok::Concat => 2,
        ReTok::Star | ReTok::Plus | ReTok::Opt => 3,
        ReTok::Atom(_) | ReTok::LParen | ReTok::RParen => unreachable!("not an operator"),
    }
}

fn op_of(tok: ReTok) -> ReOp {
    match tok {
        ReTok::Alt => ReOp::Alt,
        ReTok::Concat => ReOp::Concat,
        ReTok::Star => ReOp::Star,
        ReTok::Plus => ReOp::Plus,
        ReTok::Opt => ReOp::Opt,
        ReTok::Atom(_) | ReTok::LParen | ReTok::RParen => unreachable!("not an operator"),
    }
}

// shunting yard over the preprocessed tokens; all operators are
// left-associative, so a stack top of equal precedence pops first
pub fn to_postfix(tokens: &[Positioned]) -> Result<Vec<PostfixOp>, BadRegex> {
    let mut output: Vec<PostfixOp> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Positioned> = Vec::new();

    for t in tokens {
        match t.tok {
            ReTok::Atom(c) => output.push(PostfixOp {
                op: ReOp::Char(c),
                pos: t.pos,
            }),
            ReTok::LParen => stack.push(*t),
            ReTok::RParen => loop {
                let Some(top) = stack.pop() else {
                    return Err(BadRegex {
                        position: t.pos,
                        reason: BadRegexReason::UnmatchedCloseParen,
                    });
                };
                if top.tok == ReTok::LParen {
                    break;
                }
                output.push(PostfixOp {
                    op: op_of(top.tok),
                    pos: top.pos,
                });
            },
            _ => {
                while let Some(top) = stack.last() {
                    if top.tok == ReTok::LParen || precedence(top.tok) < precedence(t.tok) {
                        break;
                    }
                    let top = stack.pop().expect("stack top was just inspected");
                    output.push(PostfixOp {
                        op: op_of(top.tok),
                        pos: top.pos,
                    });
                }
                stack.push(*t);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.tok == ReTok::LParen {
            return Err(BadRegex {
                position: top.pos,
                reason: BadRegexReason::UnmatchedOpenParen,
            });
        }
        output.push(PostfixOp {
            op: op_of(top.tok),
            pos: top.pos,
        });
    }

    Ok(output)
}
