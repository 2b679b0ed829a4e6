use crate::{
    ast::{Block, Expr, Statement},
    interpreter::{
        lexer::TokenKind,
        parser::core::{Parser, Precedence},
    },
};

impl Parser {
    /// Parses a single statement: `let`, `return`, or an expression
    /// statement.
    ///
    /// Returns `None` when the production fails; the error has already been
    /// recorded and the caller drops the statement.
    pub(in crate::interpreter::parser) fn parse_statement(&mut self) -> Option<Statement> {
        match self.current().kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses a binding statement.
    ///
    /// Grammar: `let := "let" IDENT "=" expression ";"?`
    ///
    /// When the bound value is a function literal, the bound name is written
    /// into the literal so the compiler can resolve self-references without
    /// capturing the function as a free variable.
    ///
    /// # Returns
    /// The parsed statement, or `None` after a recorded syntax error.
    fn parse_let_statement(&mut self) -> Option<Statement> {
        let line = self.current().line;

        if !self.expect_peek(TokenKind::Identifier) {
            return None;
        }
        let name = self.current().literal.clone();

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let mut value = self.parse_expression(Precedence::Lowest)?;
        if let Expr::Function { name: function_name, .. } = &mut value {
            function_name.clone_from(&name);
        }

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let { name, value, line })
    }

    /// Parses a return statement.
    ///
    /// Grammar: `return := "return" expression ";"?`
    fn parse_return_statement(&mut self) -> Option<Statement> {
        let line = self.current().line;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return { value, line })
    }

    /// Parses an expression in statement position, with an optional trailing
    /// semicolon.
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let line = self.current().line;
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression { expr, line })
    }

    /// Parses a brace-delimited statement sequence. The current token must be
    /// the opening `{`.
    ///
    /// Grammar: `block := "{" statement* "}"`
    ///
    /// Statements that fail to parse are dropped; the block keeps whatever
    /// parsed cleanly, consistent with the parser's recover-and-continue
    /// policy.
    pub(in crate::interpreter::parser) fn parse_block_statement(&mut self) -> Block {
        let line = self.current().line;
        let mut statements = Vec::new();

        self.next_token();

        while !self.current_is(TokenKind::RBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Block { statements, line }
    }
}
