// default ruleset for a small c-like language; doubles as the conformance
// surface for the end-to-end tests

use crate::rules::{LexicalRule, RuleSetBuilder, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MiniCKind {
    Whitespace,
    Comment,

    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwInt,
    KwFloat,
    KwBoolean,
    KwTrue,
    KwFalse,
    KwReturn,
    KwVoid,

    Eq,
    Ne,
    Le,
    Ge,
    And,
    Or,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Lt,
    Gt,
    Not,
    Amp,
    Pipe,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,

    Number,
    Ident,
    Str,

    Eof,
    Unknown,
}

impl TokenKind for MiniCKind {
    fn name(self) -> &'static str {
        match self {
            MiniCKind::Whitespace => "WHITESPACE",
            MiniCKind::Comment => "COMMENT",
            MiniCKind::KwIf => "KW_IF",
            MiniCKind::KwElse => "KW_ELSE",
            MiniCKind::KwWhile => "KW_WHILE",
            MiniCKind::KwFor => "KW_FOR",
            MiniCKind::KwInt => "KW_INT",
            MiniCKind::KwFloat => "KW_FLOAT",
            MiniCKind::KwBoolean => "KW_BOOLEAN",
            MiniCKind::KwTrue => "KW_TRUE",
            MiniCKind::KwFalse => "KW_FALSE",
            MiniCKind::KwReturn => "KW_RETURN",
            MiniCKind::KwVoid => "KW_VOID",
            MiniCKind::Eq => "EQ",
            MiniCKind::Ne => "NE",
            MiniCKind::Le => "LE",
            MiniCKind::Ge => "GE",
            MiniCKind::And => "AND",
            MiniCKind::Or => "OR",
            MiniCKind::Plus => "PLUS",
            MiniCKind::Minus => "MINUS",
            MiniCKind::Star => "STAR",
            MiniCKind::Slash => "SLASH",
            MiniCKind::Percent => "PERCENT",
            MiniCKind::Assign => "ASSIGN",
            MiniCKind::Lt => "LT",
            MiniCKind::Gt => "GT",
            MiniCKind::Not => "NOT",
            MiniCKind::Amp => "AMP",
            MiniCKind::Pipe => "PIPE",
            MiniCKind::LParen => "LPAREN",
            MiniCKind::RParen => "RPAREN",
            MiniCKind::LBrace => "LBRACE",
            MiniCKind::RBrace => "RBRACE",
            MiniCKind::LBracket => "LBRACKET",
            MiniCKind::RBracket => "RBRACKET",
            MiniCKind::Semi => "SEMI",
            MiniCKind::Comma => "COMMA",
            MiniCKind::Dot => "DOT",
            MiniCKind::Number => "NUMBER",
            MiniCKind::Ident => "IDENT",
            MiniCKind::Str => "STRING",
            MiniCKind::Eof => "EOF",
            MiniCKind::Unknown => "UNKNOWN",
        }
    }

    fn eof() -> Self {
        MiniCKind::Eof
    }

    fn unknown() -> Self {
        MiniCKind::Unknown
    }
}

// keywords are added before the identifier rule so they win the
// equal-length tie; two-character operators come before their one-character
// prefixes, though maximal munch would resolve those anyway
pub fn mini_c_rules() -> Vec<LexicalRule<MiniCKind>> {
    RuleSetBuilder::new()
        .ignored(r"\s+", MiniCKind::Whitespace)
        .ignored(r"//.*", MiniCKind::Comment)
        .rule("if", MiniCKind::KwIf)
        .rule("else", MiniCKind::KwElse)
        .rule("while", MiniCKind::KwWhile)
        .rule("for", MiniCKind::KwFor)
        .rule("int", MiniCKind::KwInt)
        .rule("float", MiniCKind::KwFloat)
        .rule("boolean", MiniCKind::KwBoolean)
        .rule("true", MiniCKind::KwTrue)
        .rule("false", MiniCKind::KwFalse)
        .rule("return", MiniCKind::KwReturn)
        .rule("void", MiniCKind::KwVoid)
        .rule("==", MiniCKind::Eq)
        .rule("!=", MiniCKind::Ne)
        .rule("<=", MiniCKind::Le)
        .rule(">=", MiniCKind::Ge)
        .rule("&&", MiniCKind::And)
        .rule(r"\|\|", MiniCKind::Or)
        .rule(r"\+", MiniCKind::Plus)
        .rule("-", MiniCKind::Minus)
        .rule(r"\*", MiniCKind::Star)
        .rule("/", MiniCKind::Slash)
        .rule("%", MiniCKind::Percent)
        .rule("=", MiniCKind::Assign)
        .rule("<", MiniCKind::Lt)
        .rule(">", MiniCKind::Gt)
        .rule("!", MiniCKind::Not)
        .rule("&", MiniCKind::Amp)
        .rule(r"\|", MiniCKind::Pipe)
        .rule(r"\(", MiniCKind::LParen)
        .rule(r"\)", MiniCKind::RParen)
        .rule(r"\{", MiniCKind::LBrace)
        .rule(r"\}", MiniCKind::RBrace)
        .rule(r"\[", MiniCKind::LBracket)
        .rule(r"\]", MiniCKind::RBracket)
        .rule(";", MiniCKind::Semi)
        .rule(",", MiniCKind::Comma)
        .rule(r"\.", MiniCKind::Dot)
        .rule("[0-9]+", MiniCKind::Number)
        .rule("[a-zA-Z_][a-zA-Z0-9_]*", MiniCKind::Ident)
        .rule(r#""[^"]*""#, MiniCKind::Str)
        .build()
}
