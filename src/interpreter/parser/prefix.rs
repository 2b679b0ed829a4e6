use crate::{
    ast::{Expr, PrefixOperator},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{Parser, Precedence},
    },
};

impl Parser {
    /// Dispatches the prefix parse rule for the current token.
    ///
    /// A token without a prefix rule in expression position is a syntax
    /// error; it is recorded and the production fails.
    pub(in crate::interpreter::parser) fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current().kind {
            TokenKind::Identifier => Some(self.parse_identifier()),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::String => Some(self.parse_string_literal()),
            TokenKind::True | TokenKind::False => Some(self.parse_boolean()),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::At => self.parse_tensor_literal(),
            TokenKind::Import => Some(self.parse_import_literal()),
            kind => {
                self.errors.push(ParseError::NoPrefixParseFn { token: kind,
                                                               line:  self.current().line, });
                None
            },
        }
    }

    fn parse_identifier(&self) -> Expr {
        Expr::Identifier { name: self.current().literal.clone(),
                           line: self.current().line, }
    }

    /// Converts the current token's literal to an `i64`. A literal that does
    /// not fit is recorded as a syntax error.
    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let literal = self.current().literal.clone();
        let line = self.current().line;

        match literal.parse::<i64>() {
            Ok(value) => Some(Expr::Integer { value, line }),
            Err(_) => {
                self.errors.push(ParseError::InvalidIntegerLiteral { literal, line });
                None
            },
        }
    }

    /// Converts the current token's literal to an `f64`. Literals the lexer
    /// over-matched (such as `1.2.3`) fail here.
    fn parse_float_literal(&mut self) -> Option<Expr> {
        let literal = self.current().literal.clone();
        let line = self.current().line;

        match literal.parse::<f64>() {
            Ok(value) => Some(Expr::Float { value, line }),
            Err(_) => {
                self.errors.push(ParseError::InvalidFloatLiteral { literal, line });
                None
            },
        }
    }

    fn parse_string_literal(&self) -> Expr {
        Expr::String { value: self.current().literal.clone(),
                       line:  self.current().line, }
    }

    fn parse_boolean(&self) -> Expr {
        Expr::Boolean { value: self.current_is(TokenKind::True),
                        line:  self.current().line, }
    }

    /// Parses `!operand` or `-operand`; the operand binds at prefix
    /// precedence.
    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let line = self.current().line;
        let operator = match self.current().kind {
            TokenKind::Bang => PrefixOperator::Bang,
            _ => PrefixOperator::Minus,
        };

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expr::Prefix { operator,
                            right: Box::new(right),
                            line })
    }

    /// Parses `( expression )`; the parentheses reset precedence to lowest.
    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();

        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(expr)
    }

    /// Parses a conditional expression.
    ///
    /// Grammar: `if := "if" "(" expression ")" block ("else" block)?`
    ///
    /// # Returns
    /// An `Expr::If` node, or `None` when the parentheses or braces are
    /// missing.
    fn parse_if_expression(&mut self) -> Option<Expr> {
        let line = self.current().line;

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();

            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }

            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If { condition: Box::new(condition),
                        consequence,
                        alternative,
                        line })
    }

    /// Parses a function literal.
    ///
    /// Grammar: `fnLiteral := "fn" "(" params? ")" block`
    ///
    /// The literal's name stays empty here; a `let` that binds it fills the
    /// name in afterwards.
    fn parse_function_literal(&mut self) -> Option<Expr> {
        let line = self.current().line;

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expr::Function { parameters,
                              body,
                              name: String::new(),
                              line })
    }

    /// Parses a parenthesized, comma-separated parameter name list.
    fn parse_function_parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.next_token();
        parameters.push(self.current().literal.clone());

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            parameters.push(self.current().literal.clone());
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let line = self.current().line;
        let elements = self.parse_expression_list(TokenKind::RBracket)?;

        Some(Expr::Array { elements, line })
    }

    /// Parses a hash literal.
    ///
    /// Grammar: `hash := "{" (expression ":" expression ("," ...)*)? "}"`
    ///
    /// Keys are arbitrary expressions; whether a key is hashable is a
    /// runtime question.
    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let line = self.current().line;
        let mut pairs = Vec::new();

        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();

            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expr::Hash { pairs, line })
    }

    /// Parses `@ [shape] , data`.
    ///
    /// The `@` must be followed by a bracketed shape expression; the data
    /// operand is any expression producing an array. Whether the operands
    /// actually are integer and numeric arrays is checked at evaluation.
    fn parse_tensor_literal(&mut self) -> Option<Expr> {
        let line = self.current().line;

        if !self.expect_peek(TokenKind::LBracket) {
            return None;
        }

        let shape = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Comma) {
            return None;
        }
        self.next_token();

        let data = self.parse_expression(Precedence::Lowest)?;

        Some(Expr::Tensor { shape: Box::new(shape),
                            data:  Box::new(data),
                            line, })
    }

    /// Parses `import "path"`: everything up to the next semicolon is
    /// consumed and the last token's text is the path.
    fn parse_import_literal(&mut self) -> Expr {
        let line = self.current().line;
        let mut path = String::new();

        while !self.peek_is(TokenKind::Semicolon) && !self.current_is(TokenKind::Eof) {
            self.next_token();
            path = self.current().literal.clone();
        }

        Expr::Import { path, line }
    }
}
