use crate::interpreter::lexer::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while parsing.
///
/// The parser does not stop at the first failure; it records an error,
/// recovers where it can, and keeps going. The full list is handed to the
/// caller once parsing finishes.
pub enum ParseError {
    /// The token after the current one was not the expected kind.
    UnexpectedToken {
        /// The token kind the grammar required.
        expected: TokenKind,
        /// The token kind that was actually found.
        got:      TokenKind,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An integer literal could not be converted to a 64-bit value.
    InvalidIntegerLiteral {
        /// The offending literal text.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A float literal could not be converted to a 64-bit value.
    InvalidFloatLiteral {
        /// The offending literal text.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// No prefix parse rule exists for the token at an expression position.
    NoPrefixParseFn {
        /// The token kind that has no prefix rule.
        token: TokenKind,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { expected, got, line } => write!(f,
                                                                    "On line {line}, expected next token to be {expected}, got {got} instead"),

            Self::InvalidIntegerLiteral { literal, line } => write!(f,
                                                                    "Syntax error on line {line}: could not parse \"{literal}\" as integer"),

            Self::InvalidFloatLiteral { literal, line } => write!(f,
                                                                  "Syntax error on line {line}: could not parse \"{literal}\" as float"),

            Self::NoPrefixParseFn { token, line } => {
                write!(f, "On line {line}, no prefix parse function for {token} found")
            },
        }
    }
}

impl std::error::Error for ParseError {}
