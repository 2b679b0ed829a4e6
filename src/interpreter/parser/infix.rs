use crate::{
    ast::{Expr, InfixOperator},
    interpreter::{
        lexer::TokenKind,
        parser::core::{Parser, Precedence},
    },
};

impl Parser {
    /// Parses the right-hand side of a binary operator. The current token is
    /// the operator; the right operand binds at the operator's own
    /// precedence, making every binary operator left-associative.
    pub(in crate::interpreter::parser) fn parse_infix_expression(&mut self,
                                                                 left: Expr)
                                                                 -> Option<Expr> {
        let line = self.current().line;
        let operator = infix_operator(self.current().kind)?;
        let precedence = Precedence::of(self.current().kind);

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix { left: Box::new(left),
                           operator,
                           right: Box::new(right),
                           line })
    }

    /// Parses a call's argument list. The current token is the `(` that
    /// follows the callee.
    pub(in crate::interpreter::parser) fn parse_call_expression(&mut self,
                                                                function: Expr)
                                                                -> Option<Expr> {
        let line = self.current().line;
        let arguments = self.parse_expression_list(TokenKind::RParen)?;

        Some(Expr::Call { function: Box::new(function),
                          arguments,
                          line })
    }

    /// Parses `receiver[index]`. The current token is the `[`.
    pub(in crate::interpreter::parser) fn parse_index_expression(&mut self,
                                                                 left: Expr)
                                                                 -> Option<Expr> {
        let line = self.current().line;
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        Some(Expr::Index { left:  Box::new(left),
                           index: Box::new(index),
                           line, })
    }
}

/// Maps an operator token onto its AST operator. Kinds that are not binary
/// operators produce `None`, ending the production.
const fn infix_operator(kind: TokenKind) -> Option<InfixOperator> {
    let operator = match kind {
        TokenKind::Plus => InfixOperator::Add,
        TokenKind::Minus => InfixOperator::Sub,
        TokenKind::Asterisk => InfixOperator::Mul,
        TokenKind::Slash => InfixOperator::Div,
        TokenKind::LessThan => InfixOperator::LessThan,
        TokenKind::GreaterThan => InfixOperator::GreaterThan,
        TokenKind::Equal => InfixOperator::Equal,
        TokenKind::NotEqual => InfixOperator::NotEqual,
        _ => return None,
    };
    Some(operator)
}
