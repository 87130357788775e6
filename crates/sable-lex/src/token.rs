// position is a 0-based byte offset; line and column are 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub kind: K,
    pub lexeme: String,
    pub position: usize,
    pub line: u32,
    pub column: u32,
}
