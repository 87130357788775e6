use sable_lex::{mini_c_rules, TokenKind, Tokenizer};
use sable_parse::{build_table, Grammar};

const GRAMMAR: &str = "\
Program -> Program Stmt | Stmt
Stmt -> KW_INT IDENT ASSIGN Expr SEMI | KW_IF LPAREN Expr RPAREN Block | KW_RETURN Expr SEMI | Block
Block -> LBRACE Program RBRACE
Expr -> Expr LE Term | Expr PLUS Term | Term
Term -> IDENT | NUMBER
";

fn main() {
    let source = "int x = 42;\nif (x <= 99) { return x; }";

    let tokenizer = Tokenizer::build(&mini_c_rules()).expect("default ruleset must compile");
    let tokens = tokenizer.tokenize(source);

    println!("tokens for {:?}:", source);
    for token in &tokens {
        println!(
            "{:>4} {:>2}:{:<3} {:<10} {:?}",
            token.position,
            token.line,
            token.column,
            token.kind.name(),
            token.lexeme
        );
    }

    let grammar = Grammar::from_text(GRAMMAR).expect("demo grammar is well-formed");
    let table = build_table(&grammar);
    println!(
        "table: {} states, {} conflicts",
        table.state_count(),
        table.conflicts().len()
    );
    for conflict in table.conflicts() {
        println!("  {conflict}");
    }

    match table.parse(&tokens) {
        Ok(()) => println!("accepted"),
        Err(err) => println!(
            "rejected at {}:{}: {:?}",
            err.token.line, err.token.column, err.token.lexeme
        ),
    }
}
