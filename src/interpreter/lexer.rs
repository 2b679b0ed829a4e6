use logos::Logos;

/// The kind of a lexical token.
///
/// A token kind is the minimal classification the parser dispatches on. The
/// lexer recognizes kinds with one pattern each; the surrounding [`Token`]
/// carries the matched source text and line number.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    /// `=`
    #[token("=")]
    Assign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `!`
    #[token("!")]
    Bang,
    /// `*`
    #[token("*")]
    Asterisk,
    /// `/`
    #[token("/")]
    Slash,
    /// `<`
    #[token("<")]
    LessThan,
    /// `>`
    #[token(">")]
    GreaterThan,
    /// `==`
    #[token("==")]
    Equal,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `@`
    #[token("@")]
    At,
    /// `fn`
    #[token("fn")]
    Function,
    /// `import`
    #[token("import")]
    Import,
    /// `let`
    #[token("let")]
    Let,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `return`
    #[token("return")]
    Return,
    /// Identifier tokens; binding names such as `x` or `adder`. Identifiers
    /// consist of letters and underscores only, so a trailing digit starts a
    /// new token.
    #[regex(r"[A-Za-z_]+")]
    Identifier,
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+")]
    Int,
    /// Float literal tokens: a digit run containing a `.`. The pattern is
    /// deliberately loose (`1.2.3` lexes as one token) and the parser rejects
    /// literals that do not convert.
    #[regex(r"[0-9]+\.[0-9.]*")]
    Float,
    /// String literal tokens. No escape processing; the literal ends at the
    /// next `"` or at end of input.
    #[regex(r#""[^"]*"?"#)]
    String,
    /// Line breaks are skipped, but advance the line counter first.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// A NUL byte ends the input early.
    #[token("\0")]
    Eof,
    /// Any other character the lexer does not recognize.
    #[regex(r".", priority = 1)]
    Illegal,
}

/// Additional state carried by the lexer during tokenization.
///
/// Tracks the current line number so every token can record where it began.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1 }
    }
}

/// A lexical token: its kind, the matched source text, and the line on which
/// it began.
///
/// String tokens store the text between the quotes; every other kind stores
/// the matched slice verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's kind.
    pub kind:    TokenKind,
    /// The matched source text.
    pub literal: String,
    /// The line number on which the token began.
    pub line:    usize,
}

impl Token {
    /// Creates the synthetic end-of-input token the parser dispatches on once
    /// the real tokens run out.
    #[must_use]
    pub const fn eof(line: usize) -> Self {
        Self { kind: TokenKind::Eof,
               literal: String::new(),
               line }
    }
}

/// Tokenizes a full source string.
///
/// The returned sequence always ends with an [`TokenKind::Eof`] token, so a
/// parser that keeps reading past the end sees end-of-input rather than
/// running out of tokens. Characters the lexer cannot classify become
/// [`TokenKind::Illegal`] tokens; the parser reports those as missing parse
/// rules.
///
/// # Example
/// ```
/// use tensora::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("let five = 5;");
/// let kinds = tokens.iter().map(|t| t.kind).collect::<Vec<_>>();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Let,
///                 TokenKind::Identifier,
///                 TokenKind::Assign,
///                 TokenKind::Int,
///                 TokenKind::Semicolon,
///                 TokenKind::Eof]);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let line = lexer.extras.line;
        match result {
            Ok(kind) => {
                let literal = match kind {
                    TokenKind::String => trim_quotes(lexer.slice()),
                    _ => lexer.slice(),
                };
                tokens.push(Token { kind,
                                    literal: literal.to_string(),
                                    line });
            },
            Err(()) => {
                tokens.push(Token { kind:    TokenKind::Illegal,
                                    literal: lexer.slice().to_string(),
                                    line, });
            },
        }
    }

    tokens.push(Token::eof(lexer.extras.line));
    tokens
}

/// Strips the delimiting quotes from a string literal's matched slice. The
/// closing quote is absent when the literal ran to end of input.
fn trim_quotes(slice: &str) -> &str {
    let slice = slice.strip_prefix('"').unwrap_or(slice);
    slice.strip_suffix('"').unwrap_or(slice)
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Bang => "!",
            Self::Asterisk => "*",
            Self::Slash => "/",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::At => "@",
            Self::Function => "FUNCTION",
            Self::Import => "IMPORT",
            Self::Let => "LET",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::Return => "RETURN",
            Self::Identifier => "IDENT",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::NewLine => "NEWLINE",
            Self::Eof => "EOF",
            Self::Illegal => "ILLEGAL",
        };
        write!(f, "{name}")
    }
}
